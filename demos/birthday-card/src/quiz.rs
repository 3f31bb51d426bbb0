use serde::Serialize;

use crate::content::QuizQuestion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Wrong,
    /// An answer is already selected, the quiz is over, or the index is out of range.
    Rejected,
}

/// Multiple-choice quiz state. Timing between questions belongs to the caller.
#[derive(Debug, Clone)]
pub struct Quiz {
    questions: Vec<QuizQuestion>,
    current: usize,
    selected: Option<usize>,
    score: u32,
}

/// What the host needs to draw the current question.
#[derive(Debug, Clone, Serialize)]
pub struct QuizView<'a> {
    pub number: usize,
    pub total: usize,
    pub question: &'a str,
    pub answers: &'a [String],
    pub selected: Option<usize>,
    /// Revealed once an answer is selected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct: Option<usize>,
    pub score: u32,
}

impl Quiz {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self { questions, current: 0, selected: None, score: 0 }
    }

    /// Record an answer for the current question. Input is locked until `advance`.
    pub fn answer(&mut self, index: usize) -> AnswerOutcome {
        if self.selected.is_some() {
            return AnswerOutcome::Rejected;
        }
        let Some(question) = self.questions.get(self.current) else {
            return AnswerOutcome::Rejected;
        };
        if index >= question.answers.len() {
            return AnswerOutcome::Rejected;
        }
        self.selected = Some(index);
        if index == question.correct {
            self.score += 1;
            AnswerOutcome::Correct
        } else {
            AnswerOutcome::Wrong
        }
    }

    /// Move to the next question and clear the selection.
    /// Returns false when the answered question was the last one.
    pub fn advance(&mut self) -> bool {
        self.selected = None;
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    pub fn is_locked(&self) -> bool {
        self.selected.is_some()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn view(&self) -> Option<QuizView<'_>> {
        let q = self.questions.get(self.current)?;
        Some(QuizView {
            number: self.current + 1,
            total: self.questions.len(),
            question: &q.question,
            answers: &q.answers,
            selected: self.selected,
            correct: self.selected.map(|_| q.correct),
            score: self.score,
        })
    }
}
