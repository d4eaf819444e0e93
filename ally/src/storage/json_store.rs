//! File-backed JSON documents
//!
//! Each journal collection lives in its own JSON file. Loads never fail:
//! a missing, unreadable or undecodable file yields the type's default.
//! Saves write the whole document to a sibling temp file, sync it and
//! rename it over the target, so a torn write is never visible under the
//! real name.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A single JSON document holding a value of type `T`
#[derive(Debug, Clone)]
pub struct JsonDocument<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonDocument<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Location of the persisted document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document, falling back to `T::default()` on any failure
    pub fn load(&self) -> T {
        match self.try_load() {
            Ok(Some(value)) => value,
            Ok(None) => {
                tracing::debug!("No document at {:?}, starting empty", self.path);
                T::default()
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable document {:?}: {}", self.path, e);
                T::default()
            }
        }
    }

    /// Load the document, reporting failures. `Ok(None)` when it does not exist.
    pub fn try_load(&self) -> Result<Option<T>> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&raw)?))
    }

    /// Persist the full value. Failures are logged and otherwise ignored.
    pub fn save(&self, value: &T) {
        if let Err(e) = self.try_save(value) {
            tracing::error!("Failed to save {:?}: {}", self.path, e);
        }
    }

    /// Persist the full value atomically, reporting failures
    pub fn try_save(&self, value: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_vec_pretty(value)?;
        let temp_path = self.temp_path();

        let written = write_synced(&temp_path, &data).and_then(|_| fs::rename(&temp_path, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        tracing::debug!("Saved {:?} ({} bytes)", self.path, data.len());
        Ok(())
    }

    // Same directory as the target so the rename never crosses filesystems.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.path
            .with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4().simple()))
    }
}

fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}
