//! Commands exposed to the front-end
//!
//! Each command takes the application state, performs one user action
//! and returns the text to show. Submodules:
//! - `entries`: Recording, listing, searching, editing and pruning entries
//! - `export`: CSV / JSON / text export
//! - `gallery`: Favorites, good things, reflect cards and the calm quote
//! - `settings`: Guided prompts, retention and gallery settings

pub mod entries;
pub mod export;
pub mod gallery;
pub mod settings;

use crate::app::AppState;
use crate::error::{AppError, Result};
use uuid::Uuid;

pub use entries::*;
pub use export::*;
pub use gallery::*;
pub use settings::*;

// ===== General Commands =====

/// Application information
#[derive(serde::Serialize)]
pub struct AppInfo {
    pub version: String,
    pub app_data_dir: String,
    pub entries: usize,
    pub good_things: usize,
    pub favorites: usize,
}

/// Get application information
pub fn get_app_info(state: &AppState) -> Result<String> {
    let info = AppInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        app_data_dir: state.app_data_dir.to_string_lossy().to_string(),
        entries: state.repo.entries().len(),
        good_things: state.repo.good_things().len(),
        favorites: state.repo.favorites().filenames.len(),
    };
    Ok(serde_json::to_string_pretty(&info)?)
}

/// Resolve a full ID or a unique ID prefix to an entry ID
pub(crate) fn resolve_entry_id(state: &AppState, id: &str) -> Result<Uuid> {
    let needle = id.trim().to_ascii_lowercase();
    if needle.is_empty() {
        return Err(AppError::Generic("Entry ID is empty".to_string()));
    }

    let mut matches = state
        .repo
        .entries()
        .iter()
        .filter(|e| e.id.to_string().starts_with(&needle));

    match (matches.next(), matches.next()) {
        (Some(entry), None) => Ok(entry.id),
        (None, _) => Err(AppError::Generic(format!("No entry matches {:?}", id))),
        (Some(_), Some(_)) => Err(AppError::Generic(format!(
            "Entry ID {:?} is ambiguous, use more characters",
            id
        ))),
    }
}

/// First eight characters of an ID, as shown in lists
pub(crate) fn short_id(id: &Uuid) -> String {
    id.to_string().chars().take(8).collect()
}
