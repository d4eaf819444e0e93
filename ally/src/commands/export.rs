//! Export commands
//!
//! Render the journal for sharing, either to a file or to the terminal.

use crate::app::AppState;
use crate::error::Result;
use crate::journal::{search, Entry};
use crate::services::ExportFormat;
use std::path::Path;

fn selected_entries(state: &AppState, query: &str) -> Vec<Entry> {
    search(state.repo.entries(), query)
        .into_iter()
        .cloned()
        .collect()
}

/// Render entries matching `query` as text for printing
pub fn render_export(state: &AppState, format: ExportFormat, query: &str) -> Result<String> {
    format.render(&selected_entries(state, query))
}

/// Write an export file.
///
/// With no `out` path the file goes to the scratch directory under a
/// unique name. Returns where it was written.
pub async fn export_entries(
    state: &AppState,
    format: ExportFormat,
    query: &str,
    out: Option<&Path>,
) -> Result<String> {
    let entries = selected_entries(state, query);

    let path = match out {
        Some(path) => {
            let contents = format.render(&entries)?;
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(path, contents).await?;
            tracing::info!("Export written to {:?}", path);
            path.to_path_buf()
        }
        None => state.export_service.export(&entries, format).await?,
    };

    Ok(format!("Exported {} entries to {}", entries.len(), path.display()))
}
