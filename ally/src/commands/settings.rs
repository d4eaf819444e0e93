//! Settings commands
//!
//! Show and change the journal settings. Every change is written to disk
//! and applied to the running state.

use crate::app::AppState;
use crate::config::DEFAULT_QUESTIONS;
use crate::error::Result;
use crate::services::settings::{GallerySettings, RetentionSettings, TranscriptionSettings};
use crate::services::{GalleryService, JournalSettings};

/// Current settings as pretty JSON
pub fn show_settings(state: &AppState) -> Result<String> {
    Ok(serde_json::to_string_pretty(&state.settings)?)
}

/// Replace the guided prompts. An empty list restores the defaults.
pub fn set_questions(state: &mut AppState, questions: Vec<String>) -> Result<String> {
    let mut questions: Vec<String> = questions
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .collect();
    if questions.is_empty() {
        questions = DEFAULT_QUESTIONS.iter().map(|q| q.to_string()).collect();
    }

    let updated = state.settings_service.update_questions(questions)?;
    apply(state, updated);

    Ok(format!(
        "Using {} guided prompts",
        state.settings.session_questions().len()
    ))
}

/// Change how many entries "prune" keeps by default
pub fn set_retention(state: &mut AppState, keep_newest: usize) -> Result<String> {
    let updated = state
        .settings_service
        .update_retention(RetentionSettings { keep_newest })?;
    apply(state, updated);

    Ok(format!("Prune keeps the {} newest entries", keep_newest))
}

/// Change how many favorite photos an import keeps
pub fn set_favorites_cap(state: &mut AppState, favorites_cap: usize) -> Result<String> {
    let updated = state
        .settings_service
        .update_gallery(GallerySettings { favorites_cap })?;
    apply(state, updated);

    Ok(format!("Favorites hold up to {} photos", favorites_cap))
}

/// Set the external recognizer and its time limit.
///
/// A blank command turns transcription off; `None` keeps the current one.
pub fn set_transcriber(
    state: &mut AppState,
    command: Option<String>,
    timeout_secs: Option<u64>,
) -> Result<String> {
    let current = state.settings.transcription.clone();
    let command = match command {
        Some(c) if c.trim().is_empty() => None,
        Some(c) => Some(c.trim().to_string()),
        None => current.command,
    };
    let timeout_secs = timeout_secs.unwrap_or(current.timeout_secs);

    let updated = state
        .settings_service
        .update_transcription(TranscriptionSettings {
            timeout_secs,
            command,
        })?;
    apply(state, updated);

    let transcription = &state.settings.transcription;
    Ok(match &transcription.command {
        Some(command) => format!(
            "Transcribing with {:?}, giving up after {}s",
            command, transcription.timeout_secs
        ),
        None => "Transcription off".to_string(),
    })
}

fn apply(state: &mut AppState, settings: JournalSettings) {
    if settings.gallery.favorites_cap != state.gallery.favorites_cap() {
        state.gallery = GalleryService::new(state.media.clone(), settings.gallery.favorites_cap);
    }
    state.settings = settings;
    tracing::debug!("Settings applied");
}
