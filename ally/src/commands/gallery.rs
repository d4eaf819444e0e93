//! Gallery commands
//!
//! Favorite photos, good things, reflect cards and the calm quote.

use crate::app::AppState;
use crate::error::{AppError, Result};
use crate::services::gallery::calm_quote;
use chrono::Local;
use std::path::PathBuf;

/// Import picked photos as the new favorite set
pub async fn import_favorites(state: &mut AppState, paths: &[PathBuf]) -> Result<String> {
    let mut photos = Vec::with_capacity(paths.len());
    for path in paths.iter().take(state.gallery.favorites_cap()) {
        match tokio::fs::read(path).await {
            Ok(data) => photos.push(data),
            Err(e) => tracing::warn!("Could not read photo {:?}: {}", path, e),
        }
    }

    if photos.is_empty() {
        return Err(AppError::Generic("No readable photos given".to_string()));
    }

    let names = state.gallery.import_favorites(&mut state.repo, &photos).await;
    Ok(format!("Imported {} favorite photos", names.len()))
}

/// Current favorite photos with their locations
pub fn list_favorites(state: &AppState) -> Result<String> {
    let picks = state.gallery.slideshow_picks(&state.repo);
    if picks.is_empty() {
        return Ok("No favorite photos".to_string());
    }

    let lines = picks
        .iter()
        .map(|name| state.media.path_for(name).map(|p| p.display().to_string()))
        .collect::<Result<Vec<_>>>()?;
    Ok(lines.join("\n"))
}

/// Record something good that happened
pub fn add_good_thing(state: &mut AppState, text: &str) -> Result<String> {
    state
        .repo
        .insert_good_thing(text)
        .map(|g| format!("Added: {}", g.text))
        .ok_or_else(|| AppError::Generic("Nothing to add".to_string()))
}

/// Good things, most recent first
pub fn list_good_things(state: &AppState) -> Result<String> {
    if state.repo.good_things().is_empty() {
        return Ok("No good things yet".to_string());
    }
    let lines: Vec<String> = state
        .repo
        .good_things()
        .iter()
        .map(|g| format!("{}  {}", g.date.with_timezone(&Local).format("%Y-%m-%d"), g.text))
        .collect();
    Ok(lines.join("\n"))
}

/// Reflect cards, seeding the defaults on first use
pub fn list_reflect_cards(state: &mut AppState) -> Result<String> {
    let cards: Vec<String> = state
        .repo
        .reflect_cards()
        .iter()
        .map(|c| format!("{}\n  {}", c.title, c.body))
        .collect();
    Ok(cards.join("\n\n"))
}

/// Add a user-defined reflect card
pub fn add_reflect_card(state: &mut AppState, title: &str, body: &str) -> Result<String> {
    state
        .repo
        .insert_reflect_card(title, body)
        .map(|c| format!("Added card: {}", c.title))
        .ok_or_else(|| AppError::Generic("Card title is empty".to_string()))
}

/// Quote for the calm screen, with the latest coping-plan voice note
pub fn show_quote(state: &AppState) -> Result<String> {
    let mut out = calm_quote(&state.repo);
    if let Some(audio) = state.repo.latest_coping_plan_audio() {
        out.push_str(&format!("\nVoice note: {}", state.media.path_for(audio)?.display()));
    }
    Ok(out)
}
