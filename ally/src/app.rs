//! Application state and initialization
//!
//! This module manages the central application state and lifecycle.
//! All services are created once here and handed to whoever needs them;
//! nothing lives in a global.

use crate::config::{APP_DIR_NAME, DATA_DIR_ENV, EXPORT_SCRATCH_DIR};
use crate::error::{AppError, Result};
use crate::journal::{JournalRepository, Pager};
use crate::services::{ExportService, GalleryService, JournalSettings, SessionBuilder, SettingsService};
use crate::storage::MediaStore;
use std::path::{Path, PathBuf};

/// Central application state holding all services
pub struct AppState {
    pub app_data_dir: PathBuf,
    pub settings: JournalSettings,
    pub settings_service: SettingsService,
    pub repo: JournalRepository,
    pub session: SessionBuilder,
    pub media: MediaStore,
    pub gallery: GalleryService,
    pub export_service: ExportService,
}

impl AppState {
    /// Open the journal stored in `app_data_dir`, creating it if needed
    pub async fn open(app_data_dir: PathBuf) -> Result<Self> {
        tracing::info!("Initializing application");
        tracing::info!("App data directory: {:?}", app_data_dir);

        std::fs::create_dir_all(&app_data_dir)?;

        let settings_service = SettingsService::new(app_data_dir.clone());
        let settings = settings_service.load();

        let media = MediaStore::new(app_data_dir.clone());
        media.initialize().await?;

        let repo = JournalRepository::open(&app_data_dir);
        let gallery = GalleryService::new(media.clone(), settings.gallery.favorites_cap);
        let export_service = ExportService::new(std::env::temp_dir().join(EXPORT_SCRATCH_DIR));

        tracing::info!("Application initialized successfully");

        Ok(Self {
            app_data_dir,
            settings,
            settings_service,
            repo,
            session: SessionBuilder::new(),
            media,
            gallery,
            export_service,
        })
    }

    /// Fresh pager using the configured step
    pub fn pager(&self) -> Pager {
        Pager::new(self.settings.list.page_step)
    }
}

/// Pick the data directory: explicit path, then `ALLY_DATA_DIR`, then the
/// platform data directory
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }

    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        let dir = dir.trim();
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    dirs::data_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .ok_or_else(|| AppError::Generic("Failed to get app data dir".to_string()))
}
