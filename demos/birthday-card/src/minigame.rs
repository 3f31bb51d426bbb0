use std::time::Duration;

use glam::Vec2;
use party_engine::{Rng, Scheduler, Trigger, TriggerState};
use serde::Serialize;

use crate::content::CardContent;
use crate::quiz::{AnswerOutcome, Quiz, QuizView};
use crate::renderer::{Completion, Finish};
use crate::wishes::{WishList, WishOutcome, WishRejection};

const TO_QUIZ: Duration = Duration::from_millis(1000);
const NEXT_QUESTION: Duration = Duration::from_millis(1500);
const TO_GIFTBOX: Duration = Duration::from_millis(1000);
const GIFT_REVEAL: Duration = Duration::from_millis(2000);
const REPORT_COMPLETE: Duration = Duration::from_millis(3000);
const STAR_COUNT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MiniGameStage {
    Wishes,
    Quiz,
    Giftbox,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MiniTimer {
    ToQuiz,
    NextQuestion,
    ToGiftbox,
    Reveal,
    Report,
}

/// Decorative background star, in percent of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Star {
    pub id: u32,
    pub at: Vec2,
}

/// The interactive overlay: wishes, then a quiz, then a gift box.
/// Completion is reported once, 3 s after the gift reveal.
pub struct MiniGameSequencer {
    stage: MiniGameStage,
    prompts: Vec<String>,
    wishes: WishList,
    quiz: Quiz,
    gift: Trigger,
    stars: Vec<Star>,
    timers: Scheduler<MiniTimer>,
    report_due: bool,
    finish: Finish,
}

#[derive(Debug, Serialize)]
pub struct MiniGameView<'a> {
    pub stage: MiniGameStage,
    pub stars: &'a [Star],
    pub wishes: &'a WishList,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz: Option<QuizView<'a>>,
    pub gift: TriggerState,
    pub score: u32,
    pub questions: usize,
}

impl MiniGameSequencer {
    pub fn new(content: &CardContent, rng: &mut Rng) -> Self {
        let stars = (0..STAR_COUNT as u32)
            .map(|id| Star {
                id,
                at: Vec2::new(rng.range(0.0, 100.0), rng.range(0.0, 100.0)),
            })
            .collect();

        Self {
            stage: MiniGameStage::Wishes,
            prompts: content.wish_prompts.clone(),
            wishes: WishList::new(),
            quiz: Quiz::new(content.quiz.clone()),
            gift: Trigger::new(),
            stars,
            timers: Scheduler::new(),
            report_due: false,
            finish: Finish::new(),
        }
    }

    pub fn submit_wish(&mut self, text: &str) -> WishOutcome {
        if self.stage != MiniGameStage::Wishes {
            log::debug!("wish ignored outside the wish step");
            return WishOutcome::Rejected(WishRejection::Full);
        }
        let outcome = self.wishes.submit(text);
        if outcome.is_accepted() && self.wishes.is_full() {
            self.timers.after(TO_QUIZ, MiniTimer::ToQuiz);
        }
        outcome
    }

    pub fn answer(&mut self, index: usize) -> AnswerOutcome {
        if self.stage != MiniGameStage::Quiz {
            log::debug!("answer {} ignored outside the quiz", index);
            return AnswerOutcome::Rejected;
        }
        let outcome = self.quiz.answer(index);
        if outcome != AnswerOutcome::Rejected {
            self.timers.after(NEXT_QUESTION, MiniTimer::NextQuestion);
        }
        outcome
    }

    /// Open the gift box. Only the first call in the gift step counts.
    pub fn open_gift(&mut self) -> bool {
        if self.stage != MiniGameStage::Giftbox || !self.gift.fire() {
            log::debug!("gift open ignored");
            return false;
        }
        self.timers.after(GIFT_REVEAL, MiniTimer::Reveal);
        true
    }

    pub fn tick(&mut self, dt: Duration) -> Completion {
        for timer in self.timers.advance(dt) {
            match timer {
                MiniTimer::ToQuiz => self.stage = MiniGameStage::Quiz,
                MiniTimer::NextQuestion => {
                    if !self.quiz.advance() {
                        self.timers.after(TO_GIFTBOX, MiniTimer::ToGiftbox);
                    }
                }
                MiniTimer::ToGiftbox => self.stage = MiniGameStage::Giftbox,
                MiniTimer::Reveal => {
                    self.gift.settle();
                    self.stage = MiniGameStage::Complete;
                    self.timers.after(REPORT_COMPLETE, MiniTimer::Report);
                }
                MiniTimer::Report => self.report_due = true,
            }
        }
        if self.report_due {
            self.finish.report()
        } else {
            Completion::Pending
        }
    }

    pub fn stage(&self) -> MiniGameStage {
        self.stage
    }

    pub fn wishes(&self) -> &WishList {
        &self.wishes
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn view(&self) -> MiniGameView<'_> {
        MiniGameView {
            stage: self.stage,
            stars: &self.stars,
            wishes: &self.wishes,
            prompt: self.wishes.prompt(&self.prompts),
            quiz: if self.stage == MiniGameStage::Quiz { self.quiz.view() } else { None },
            gift: self.gift.state(),
            score: self.quiz.score(),
            questions: self.quiz.len(),
        }
    }
}
