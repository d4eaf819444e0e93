//! Journal models
//!
//! Rust structs representing persisted journal data.
//! Field names are camelCase on disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A guided prompt shown during a session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub prompt: String,
}

impl Question {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt: prompt.into(),
        }
    }
}

/// One response to one prompt
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: Uuid,
    /// Copy of the prompt text at the time the answer was drafted
    pub question_prompt: String,
    #[serde(default)]
    pub audio_file_name: Option<String>,
    #[serde(default)]
    pub video_file_name: Option<String>,
    #[serde(default)]
    pub transcript: String,
}

impl Answer {
    /// Empty answer for the given prompt
    pub fn blank(question_prompt: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            question_prompt: question_prompt.into(),
            audio_file_name: None,
            video_file_name: None,
            transcript: String::new(),
        }
    }

    pub fn with_transcript(question_prompt: impl Into<String>, transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            ..Self::blank(question_prompt)
        }
    }
}

/// A completed journaling session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub coping_plan: String,
    #[serde(default)]
    pub coping_plan_audio_file_name: Option<String>,
}

impl Entry {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self::at(Utc::now(), answers)
    }

    pub fn at(timestamp: DateTime<Utc>, answers: Vec<Answer>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            answers,
            coping_plan: String::new(),
            coping_plan_audio_file_name: None,
        }
    }

    /// Whether the coping plan has any non-whitespace content
    pub fn has_coping_plan(&self) -> bool {
        !self.coping_plan.trim().is_empty()
    }

    /// Short preview made of the first two non-empty transcripts
    pub fn preview(&self) -> String {
        self.answers
            .iter()
            .map(|a| a.transcript.as_str())
            .filter(|t| !t.is_empty())
            .take(2)
            .collect::<Vec<_>>()
            .join(" • ")
    }
}

/// The favorite photo set shown in the calm gallery
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FavoritePhotos {
    #[serde(default)]
    pub filenames: Vec<String>,
}

/// A gratitude note
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GoodThing {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub text: String,
}

/// A reflection prompt card
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReflectCard {
    pub id: Uuid,
    pub title: String,
    pub body: String,
}

impl ReflectCard {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            body: body.into(),
        }
    }

    /// Built-in cards used until the user has any of their own
    pub fn seed() -> Vec<ReflectCard> {
        vec![
            ReflectCard::new(
                "Name the feeling",
                "Write 3 words for what you feel right now. Then write one helpful response you would give a friend.",
            ),
            ReflectCard::new(
                "Trigger check",
                "What situation, person, or thought preceded your symptoms? Note time and place.",
            ),
            ReflectCard::new(
                "Body scan",
                "Where does the anxiety live in your body? Describe sensation and intensity (1–10).",
            ),
            ReflectCard::new(
                "Reframe",
                "Write one thought that fuels anxiety. Now write a balanced thought that is true and kind.",
            ),
            ReflectCard::new(
                "Gratitude x3",
                "List three small wins from today (no matter how small).",
            ),
        ]
    }
}
