//! Gallery service
//!
//! Favorite photo imports, the calm slideshow and imported videos.
//! Integrates JournalRepository and MediaStore.

use crate::config::{FALLBACK_QUOTE, FILE_PREFIX};
use crate::error::{AppError, Result};
use crate::journal::JournalRepository;
use crate::storage::{is_image_filename, is_video_filename, MediaStore};

/// Identifies one photo import so that only the newest one is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportTicket(u64);

/// Service for the calm gallery
pub struct GalleryService {
    media: MediaStore,
    favorites_cap: usize,
    latest_import: u64,
}

impl GalleryService {
    pub fn new(media: MediaStore, favorites_cap: usize) -> Self {
        Self {
            media,
            favorites_cap,
            latest_import: 0,
        }
    }

    pub fn favorites_cap(&self) -> usize {
        self.favorites_cap
    }

    /// Start a photo import; any earlier unfinished import becomes stale
    pub fn begin_import(&mut self) -> ImportTicket {
        self.latest_import += 1;
        ImportTicket(self.latest_import)
    }

    /// Store picked photos, at most the favorites cap.
    ///
    /// Photos that fail to save are skipped. Returns the stored names.
    pub async fn store_photos(&self, photos: &[Vec<u8>]) -> Vec<String> {
        let mut names = Vec::new();
        for data in photos.iter().take(self.favorites_cap) {
            match self.media.save_photo(data).await {
                Ok(name) => names.push(name),
                Err(e) => tracing::warn!("Skipping photo that failed to save: {}", e),
            }
        }
        names
    }

    /// Replace the favorite set with an import's photos.
    ///
    /// Returns `false` and changes nothing if a newer import has started.
    pub fn apply_import(
        &self,
        ticket: ImportTicket,
        names: Vec<String>,
        repo: &mut JournalRepository,
    ) -> bool {
        if ticket.0 != self.latest_import {
            tracing::debug!("Dropping stale photo import");
            return false;
        }
        let names: Vec<String> = names.into_iter().take(self.favorites_cap).collect();
        tracing::info!("Importing {} favorite photos", names.len());
        repo.insert_favorite_set(names);
        true
    }

    /// Store the picked photos and make them the favorite set
    pub async fn import_favorites(
        &mut self,
        repo: &mut JournalRepository,
        photos: &[Vec<u8>],
    ) -> Vec<String> {
        let ticket = self.begin_import();
        let names = self.store_photos(photos).await;
        self.apply_import(ticket, names.clone(), repo);
        names
    }

    /// Photos for the calm slideshow: favorite images up to the cap
    pub fn slideshow_picks(&self, repo: &JournalRepository) -> Vec<String> {
        repo.favorites()
            .filenames
            .iter()
            .filter(|name| is_image_filename(name))
            .take(self.favorites_cap)
            .cloned()
            .collect()
    }

    /// Store an imported video, returns its filename
    pub async fn import_video(&self, data: &[u8], ext: &str) -> Result<String> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        if !is_video_filename(&format!("clip.{}", ext)) {
            return Err(AppError::MediaStore(format!(
                "Unsupported video type: {:?}",
                ext
            )));
        }
        self.media.save(data, FILE_PREFIX, &ext).await
    }
}

/// Quote shown on the calm screen: the latest coping plan, or a default
pub fn calm_quote(repo: &JournalRepository) -> String {
    repo.latest_coping_plan()
        .map(str::trim)
        .filter(|plan| !plan.is_empty())
        .unwrap_or(FALLBACK_QUOTE)
        .to_string()
}
