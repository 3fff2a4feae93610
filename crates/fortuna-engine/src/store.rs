//! Single-document JSON persistence for the wheel.
//!
//! The browser original keeps everything under one localStorage key; this
//! store mirrors that shape with one JSON document at one path. There is
//! no format guarantee beyond "the document round-trips": no migrations,
//! no versioning, no partial writes.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fortuna_types::Participant;

/// Errors that can occur reading or writing the wheel document.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Failed to read or write the document file.
    #[error("failed to access wheel document: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The document file held something other than a wheel document.
    #[error("failed to parse wheel document: {source}")]
    Json {
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}

impl From<serde_json::Error> for StoreError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source }
    }
}

/// Everything that persists across reloads: the participant list, the
/// description text, and the effect toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelDocument {
    /// The ordered participant list, chosen flags included.
    pub participants: Vec<Participant>,
    /// Free-form description text shown next to the wheel.
    pub description: String,
    /// Whether the confetti effect plays on selection.
    pub confetti_enabled: bool,
    /// When this document was written.
    pub saved_at: DateTime<Utc>,
}

/// File-backed store holding one wheel document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WheelStore {
    path: PathBuf,
}

impl WheelStore {
    /// Create a store backed by the given path. Nothing is touched on
    /// disk until [`save`] or [`clear`] is called.
    ///
    /// [`save`]: WheelStore::save
    /// [`clear`]: WheelStore::clear
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted document. An absent file is not an error --
    /// it means nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] on read failures other than absence,
    /// or [`StoreError::Json`] if the file does not parse.
    pub fn load(&self) -> Result<Option<WheelDocument>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Write the document, replacing whatever was there.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization or the write fails.
    pub fn save(&self, document: &WheelDocument) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(document)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Remove the persisted document. Idempotent: clearing an already
    /// absent document succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] on removal failures other than absence.
    pub fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
