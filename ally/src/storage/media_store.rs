//! Media file storage
//!
//! Stores recorded audio, imported photos and other picked media next to
//! the journal documents. Files get a collision-resistant name of the form
//! `<prefix>-<uuid>.<ext>` and are referenced by that bare filename only,
//! never by absolute path.

use crate::config::{
    AUDIO_EXTENSION, AUDIO_PREFIX, IMAGE_EXTENSIONS, PHOTO_EXTENSION, PHOTO_PREFIX,
    VIDEO_EXTENSIONS,
};
use crate::error::{AppError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Media store rooted at the app data directory
#[derive(Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    /// Create a new media store at the given root directory
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Initialize the media store (create directory if needed)
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        tracing::info!("Media store initialized at: {:?}", self.root);
        Ok(())
    }

    /// Write data under a fresh name, returns the filename
    pub async fn save(&self, data: &[u8], prefix: &str, ext: &str) -> Result<String> {
        let filename = unique_filename(prefix, ext);
        let path = self.root.join(&filename);

        fs::create_dir_all(&self.root).await?;

        // Write to temp file first (atomic write)
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;

        fs::rename(temp_path, &path).await?;

        tracing::debug!("Wrote media file: {} ({} bytes)", filename, data.len());

        Ok(filename)
    }

    /// Store an imported photo
    pub async fn save_photo(&self, data: &[u8]) -> Result<String> {
        self.save(data, PHOTO_PREFIX, PHOTO_EXTENSION).await
    }

    /// Store an imported voice note
    pub async fn save_recording(&self, data: &[u8]) -> Result<String> {
        self.save(data, AUDIO_PREFIX, AUDIO_EXTENSION).await
    }

    /// Path the audio capture service should record the next answer into
    pub fn new_recording_path(&self) -> PathBuf {
        self.root.join(unique_filename(AUDIO_PREFIX, AUDIO_EXTENSION))
    }

    /// Read a media file
    pub async fn read(&self, filename: &str) -> Result<Vec<u8>> {
        let path = self.path_for(filename)?;

        if !path.exists() {
            return Err(AppError::MediaStore(format!(
                "Media file not found: {}",
                filename
            )));
        }

        Ok(fs::read(&path).await?)
    }

    /// Check if a media file exists
    pub async fn exists(&self, filename: &str) -> Result<bool> {
        let path = self.path_for(filename)?;
        Ok(fs::try_exists(&path).await?)
    }

    /// Delete a media file
    pub async fn delete(&self, filename: &str) -> Result<()> {
        let path = self.path_for(filename)?;

        if !path.exists() {
            return Ok(()); // Already deleted
        }

        fs::remove_file(&path).await?;

        tracing::debug!("Deleted media file: {}", filename);

        Ok(())
    }

    /// Resolve a stored filename to its location on disk.
    ///
    /// Only bare filenames are accepted; anything with a directory
    /// component is rejected.
    pub fn path_for(&self, filename: &str) -> Result<PathBuf> {
        let bare = Path::new(filename).file_name().and_then(|n| n.to_str());
        if filename.is_empty() || bare != Some(filename) {
            return Err(AppError::MediaStore(format!(
                "Not a plain media filename: {:?}",
                filename
            )));
        }
        Ok(self.root.join(filename))
    }

    /// Get media store root directory
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn unique_filename(prefix: &str, ext: &str) -> String {
    format!("{}-{}.{}", prefix, Uuid::new_v4(), ext)
}

fn lowercase_extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// True if the name looks like an image file
pub fn is_image_filename(name: &str) -> bool {
    lowercase_extension(name).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// True if the name looks like a video file
pub fn is_video_filename(name: &str) -> bool {
    lowercase_extension(name).is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
}
