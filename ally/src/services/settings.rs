//! Settings service
//!
//! Manages journal settings persistence using an atomically written JSON
//! document. A damaged file never stops the journal from opening.
//! Retention count and favorites cap are policy parameters kept here
//! rather than hard-coded at their call sites.

use crate::config::{
    DEFAULT_FAVORITES_CAP, DEFAULT_PAGE_STEP, DEFAULT_QUESTIONS, DEFAULT_RETENTION_KEEP,
    DEFAULT_TRANSCRIPTION_TIMEOUT_SECS, MAX_FAVORITES_CAP, MAX_PAGE_STEP, MAX_RETENTION_KEEP,
    MAX_TRANSCRIPTION_TIMEOUT_SECS, MIN_RETENTION_KEEP, MIN_TRANSCRIPTION_TIMEOUT_SECS,
    SETTINGS_FILE,
};
use crate::error::{AppError, Result};
use crate::journal::Question;
use crate::storage::JsonDocument;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Bulk deletion policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionSettings {
    /// Entries kept by "delete older"
    #[serde(default = "default_keep_newest")]
    pub keep_newest: usize,
}

fn default_keep_newest() -> usize {
    DEFAULT_RETENTION_KEEP
}

impl Default for RetentionSettings {
    fn default() -> Self {
        Self {
            keep_newest: default_keep_newest(),
        }
    }
}

/// Calm gallery settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GallerySettings {
    #[serde(default = "default_favorites_cap")]
    pub favorites_cap: usize,
}

fn default_favorites_cap() -> usize {
    DEFAULT_FAVORITES_CAP
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self {
            favorites_cap: default_favorites_cap(),
        }
    }
}

/// Journal list settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSettings {
    /// Rows revealed per "load more" step
    #[serde(default = "default_page_step")]
    pub page_step: usize,
}

fn default_page_step() -> usize {
    DEFAULT_PAGE_STEP
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            page_step: default_page_step(),
        }
    }
}

/// Speech-to-text settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// External recognizer run as `<command> <audio file>`, printing the
    /// transcript on stdout. Voice answers stay untranscribed without one.
    #[serde(default)]
    pub command: Option<String>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TRANSCRIPTION_TIMEOUT_SECS
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            command: None,
        }
    }
}

fn default_questions() -> Vec<String> {
    DEFAULT_QUESTIONS.iter().map(|q| q.to_string()).collect()
}

/// Journal settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalSettings {
    /// Prompts presented, in order, for each new entry
    #[serde(default = "default_questions")]
    pub questions: Vec<String>,
    #[serde(default)]
    pub retention: RetentionSettings,
    #[serde(default)]
    pub gallery: GallerySettings,
    #[serde(default)]
    pub list: ListSettings,
    #[serde(default)]
    pub transcription: TranscriptionSettings,
}

impl Default for JournalSettings {
    fn default() -> Self {
        Self {
            questions: default_questions(),
            retention: RetentionSettings::default(),
            gallery: GallerySettings::default(),
            list: ListSettings::default(),
            transcription: TranscriptionSettings::default(),
        }
    }
}

impl JournalSettings {
    /// Configured prompts as session questions (blank prompts skipped)
    pub fn session_questions(&self) -> Vec<Question> {
        self.questions
            .iter()
            .map(|q| q.trim())
            .filter(|q| !q.is_empty())
            .map(Question::new)
            .collect()
    }

    pub fn transcription_timeout(&self) -> Duration {
        Duration::from_secs(self.transcription.timeout_secs)
    }

    /// Check every value against its allowed range
    pub fn validate(&self) -> Result<()> {
        let keep = self.retention.keep_newest;
        if !(MIN_RETENTION_KEEP..=MAX_RETENTION_KEEP).contains(&keep) {
            return Err(AppError::InvalidSettings(format!(
                "retention.keep_newest must be between {} and {}, got {}",
                MIN_RETENTION_KEEP, MAX_RETENTION_KEEP, keep
            )));
        }

        let cap = self.gallery.favorites_cap;
        if !(1..=MAX_FAVORITES_CAP).contains(&cap) {
            return Err(AppError::InvalidSettings(format!(
                "gallery.favorites_cap must be between 1 and {}, got {}",
                MAX_FAVORITES_CAP, cap
            )));
        }

        let step = self.list.page_step;
        if !(1..=MAX_PAGE_STEP).contains(&step) {
            return Err(AppError::InvalidSettings(format!(
                "list.page_step must be between 1 and {}, got {}",
                MAX_PAGE_STEP, step
            )));
        }

        let timeout = self.transcription.timeout_secs;
        if !(MIN_TRANSCRIPTION_TIMEOUT_SECS..=MAX_TRANSCRIPTION_TIMEOUT_SECS).contains(&timeout) {
            return Err(AppError::InvalidSettings(format!(
                "transcription.timeout_secs must be between {} and {}, got {}",
                MIN_TRANSCRIPTION_TIMEOUT_SECS, MAX_TRANSCRIPTION_TIMEOUT_SECS, timeout
            )));
        }

        Ok(())
    }
}

/// Service for managing journal settings
#[derive(Debug, Clone)]
pub struct SettingsService {
    doc: JsonDocument<JournalSettings>,
}

impl SettingsService {
    pub fn new(app_data_dir: PathBuf) -> Self {
        Self {
            doc: JsonDocument::new(app_data_dir.join(SETTINGS_FILE)),
        }
    }

    /// Load settings, creating the default file if there is none.
    ///
    /// An unreadable, undecodable or out-of-range file is left on disk
    /// untouched and the defaults are used instead.
    pub fn load(&self) -> JournalSettings {
        match self.doc.try_load() {
            Ok(Some(settings)) => match settings.validate() {
                Ok(()) => settings,
                Err(e) => {
                    tracing::warn!("Ignoring {:?}, using defaults: {}", self.doc.path(), e);
                    JournalSettings::default()
                }
            },
            Ok(None) => {
                tracing::info!("Settings file not found, creating default settings");
                let default = JournalSettings::default();
                self.doc.save(&default);
                default
            }
            Err(e) => {
                tracing::warn!("Ignoring {:?}, using defaults: {}", self.doc.path(), e);
                JournalSettings::default()
            }
        }
    }

    /// Validate and save settings atomically
    pub fn save(&self, settings: &JournalSettings) -> Result<()> {
        settings.validate()?;
        self.doc.try_save(settings)?;
        tracing::info!("Settings saved to {:?}", self.doc.path());
        Ok(())
    }

    /// Replace the guided prompts
    pub fn update_questions(&self, questions: Vec<String>) -> Result<JournalSettings> {
        self.update(|settings| settings.questions = questions)
    }

    /// Update the retention policy
    pub fn update_retention(&self, retention: RetentionSettings) -> Result<JournalSettings> {
        self.update(|settings| settings.retention = retention)
    }

    /// Update the gallery settings
    pub fn update_gallery(&self, gallery: GallerySettings) -> Result<JournalSettings> {
        self.update(|settings| settings.gallery = gallery)
    }

    /// Update the transcription settings
    pub fn update_transcription(
        &self,
        transcription: TranscriptionSettings,
    ) -> Result<JournalSettings> {
        self.update(|settings| settings.transcription = transcription)
    }

    // Nothing is written when the changed settings fail validation.
    fn update(&self, change: impl FnOnce(&mut JournalSettings)) -> Result<JournalSettings> {
        let mut settings = self.load();
        change(&mut settings);
        self.save(&settings)?;
        Ok(settings)
    }
}
