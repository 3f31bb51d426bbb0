use std::fmt;

use serde::{Deserialize, Serialize};

use crate::wishes::WISH_CAP;

/// Everything personal about a card: who it is for and what it says.
/// Missing fields in a JSON document fall back to the built-in card.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CardContent {
    pub recipient: String,
    pub wish_prompts: Vec<String>,
    pub quiz: Vec<QuizQuestion>,
    pub quotes: Vec<String>,
    pub photos: Vec<Photo>,
    pub share: SharePayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub answers: Vec<String>,
    /// Index into `answers`.
    pub correct: usize,
}

/// A gallery entry. `is_favorite` is the catalog's own flag; favourites
/// toggled during the session are tracked by the gallery, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: u32,
    pub url: String,
    pub caption: String,
    pub memory: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
}

/// Static share text. The page URL is read at share time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub hashtags: Vec<String>,
}

/// Why a content document was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    TooFewPrompts { have: usize, need: usize },
    NoQuestions,
    AnswerOutOfRange { question: usize, correct: usize, answers: usize },
    NoQuotes,
    EmptyCatalog,
    DuplicatePhoto(u32),
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::TooFewPrompts { have, need } => {
                write!(f, "need at least {} wish prompts, got {}", need, have)
            }
            ContentError::NoQuestions => write!(f, "quiz has no questions"),
            ContentError::AnswerOutOfRange { question, correct, answers } => write!(
                f,
                "question {} marks answer {} correct but has only {} answers",
                question, correct, answers
            ),
            ContentError::NoQuotes => write!(f, "envelope needs at least one quote"),
            ContentError::EmptyCatalog => write!(f, "photo catalog is empty"),
            ContentError::DuplicatePhoto(id) => write!(f, "photo id {} appears twice", id),
        }
    }
}

impl std::error::Error for ContentError {}

impl CardContent {
    /// Parse content from a JSON string. Does not validate.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check the invariants the sequencers rely on.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.wish_prompts.len() < WISH_CAP {
            return Err(ContentError::TooFewPrompts {
                have: self.wish_prompts.len(),
                need: WISH_CAP,
            });
        }
        if self.quiz.is_empty() {
            return Err(ContentError::NoQuestions);
        }
        for (i, q) in self.quiz.iter().enumerate() {
            if q.correct >= q.answers.len() {
                return Err(ContentError::AnswerOutOfRange {
                    question: i,
                    correct: q.correct,
                    answers: q.answers.len(),
                });
            }
        }
        if self.quotes.is_empty() {
            return Err(ContentError::NoQuotes);
        }
        if self.photos.is_empty() {
            return Err(ContentError::EmptyCatalog);
        }
        let mut seen = std::collections::BTreeSet::new();
        for photo in &self.photos {
            if !seen.insert(photo.id) {
                return Err(ContentError::DuplicatePhoto(photo.id));
            }
        }
        Ok(())
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn question(question: &str, answers: [&str; 4], correct: usize) -> QuizQuestion {
    QuizQuestion {
        question: question.to_string(),
        answers: strings(&answers),
        correct,
    }
}

fn photo(id: u32, file: &str, caption: &str, memory: &str, location: &str, date: &str, favorite: bool) -> Photo {
    Photo {
        id,
        url: format!("image/{}", file),
        caption: caption.to_string(),
        memory: memory.to_string(),
        location: Some(location.to_string()),
        date: Some(date.to_string()),
        is_favorite: favorite,
    }
}

impl Default for CardContent {
    fn default() -> Self {
        Self {
            recipient: "Eda Saner".to_string(),
            wish_prompts: strings(&[
                "✨ What's your biggest dream for this year?",
                "💫 What adventure would you love to go on?",
                "🌟 What skill would you like to master?",
                "💖 What would make you happiest right now?",
                "🎯 What goal excites you the most?",
            ]),
            quiz: vec![
                question(
                    "What makes Eda's smile so special?",
                    [
                        "It lights up any room",
                        "It's contagious and spreads joy",
                        "It comes from her beautiful heart",
                        "All of the above! ✨",
                    ],
                    3,
                ),
                question(
                    "What's Eda's superpower?",
                    [
                        "Making everyone feel loved",
                        "Bringing out the best in people",
                        "Creating magical moments",
                        "All of these amazing things! 💫",
                    ],
                    3,
                ),
                question(
                    "How does Eda make the world better?",
                    [
                        "With her kindness",
                        "Through her positive energy",
                        "By being authentically wonderful",
                        "In every possible way! 🌟",
                    ],
                    3,
                ),
            ],
            quotes: strings(&[
                "✨ \"Your kindness lights up every room you enter\" ✨",
                "💫 \"You make ordinary moments extraordinary\" 💫",
                "🌟 \"The world is brighter because you're in it\" 🌟",
                "💖 \"Your smile has the power to heal hearts\" 💖",
            ]),
            photos: vec![
                photo(1, "edasaner.jpg", "🎂 Eda's Amazing Birthday Celebration",
                    "Remember this incredible celebration, Eda? The way you lit up when everyone sang happy birthday - your smile was absolutely radiant! 💫",
                    "Your Favorite Restaurant", "Last Year", true),
                photo(2, "edawish.jpg", "🌟 Making Wishes with Eda",
                    "That magical moment when you closed your eyes and made your special wish. We all knew it would come true because you deserve all the happiness in the world! ✨",
                    "Garden Party", "Summer", true),
                photo(3, "edajoy.jpg", "🎈 Eda's Joyful Laughter",
                    "Your infectious laughter that day filled everyone's hearts with joy. Eda, you have this amazing ability to make every moment brighter! 💖",
                    "Park Picnic", "Spring", false),
                photo(4, "edafamily.jpg", "🎉 Eda Surrounded by Love",
                    "Look at all the love surrounding you, Eda! Every person in this photo adores you, and it shows. You bring out the best in everyone around you! 🥰",
                    "Family Gathering", "Winter", true),
                photo(5, "edaspirit.jpg", "✨ Eda's Sparkling Personality",
                    "This photo captures your beautiful spirit perfectly, Eda. The way you embrace life with such enthusiasm and grace inspires everyone who knows you! 🌈",
                    "Beach Day", "Summer", false),
                photo(6, "edadreams.jpg", "💫 Eda's Dreams Coming True",
                    "Every birthday marks another year of your dreams becoming reality, Eda. Keep dreaming big because the world needs more people like you! 🌟",
                    "Rooftop Celebration", "Evening", true),
            ],
            share: SharePayload {
                title: "🎉 Happy Birthday Eda Saner! 🎂".to_string(),
                text: "Just experienced the most magical birthday card ever created for amazing Eda! This interactive celebration is absolutely beautiful! ✨🎈💖".to_string(),
                hashtags: strings(&["HappyBirthdayEda", "BirthdayMagic", "EdaSaner", "SpecialDay", "BirthdayWishes"]),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_card_is_valid() {
        let content = CardContent::default();
        assert!(content.validate().is_ok());
        assert_eq!(content.quiz.len(), 3);
        assert_eq!(content.photos.len(), 6);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let content = CardContent::from_json(r#"{ "recipient": "Ada" }"#).unwrap();
        assert_eq!(content.recipient, "Ada");
        assert_eq!(content.quotes.len(), 4);
        assert!(content.validate().is_ok());
    }

    #[test]
    fn photo_optional_fields_default() {
        let json = r#"{ "photos": [
            { "id": 9, "url": "a.jpg", "caption": "c", "memory": "m" }
        ] }"#;
        let content = CardContent::from_json(json).unwrap();
        let p = &content.photos[0];
        assert_eq!(p.location, None);
        assert_eq!(p.date, None);
        assert!(!p.is_favorite);
    }

    #[test]
    fn validate_rejects_bad_answer_index() {
        let json = r#"{ "quiz": [ { "question": "q", "answers": ["a", "b"], "correct": 2 } ] }"#;
        let content = CardContent::from_json(json).unwrap();
        assert_eq!(
            content.validate(),
            Err(ContentError::AnswerOutOfRange { question: 0, correct: 2, answers: 2 })
        );
    }

    #[test]
    fn validate_rejects_short_prompt_list_and_empty_catalog() {
        let mut content = CardContent::default();
        content.wish_prompts.truncate(2);
        assert_eq!(
            content.validate(),
            Err(ContentError::TooFewPrompts { have: 2, need: WISH_CAP })
        );

        let mut content = CardContent::default();
        content.photos.clear();
        assert_eq!(content.validate(), Err(ContentError::EmptyCatalog));
    }

    #[test]
    fn validate_rejects_duplicate_photo_ids() {
        let mut content = CardContent::default();
        let dup = content.photos[0].clone();
        content.photos.push(dup);
        assert_eq!(content.validate(), Err(ContentError::DuplicatePhoto(1)));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(CardContent::from_json("{ recipient: ").is_err());
    }
}
