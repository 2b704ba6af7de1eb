//! Durable slot for the report collection.
//!
//! The collection is stored as one JSON array under one key. Reads are
//! fail-soft: a missing or unparsable value yields an empty collection.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::report::Report;

pub const MAX_KEY_LENGTH: usize = 512;
pub const MAX_VALUE_SIZE: usize = 10 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: &'static str },

    #[error("value too large: {size} bytes exceeds maximum of {max} bytes")]
    ValueTooLarge { size: usize, max: usize },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage error: {0}")]
    Storage(String),
}

/// A single durable key-value slot holding the serialized collection.
pub trait ReportSlot {
    fn read(&self) -> Result<Option<Vec<u8>>, SlotError>;
    fn write(&mut self, bytes: Vec<u8>) -> Result<(), SlotError>;
}

pub fn validate_key(key: &str) -> Result<(), SlotError> {
    let invalid = |reason| {
        Err(SlotError::InvalidKey {
            key: key.chars().take(50).collect(),
            reason,
        })
    };

    if key.trim().is_empty() {
        return invalid("key cannot be empty");
    }
    if key.len() > MAX_KEY_LENGTH {
        return invalid("key exceeds maximum length");
    }
    if key.contains("..") {
        return invalid("key cannot contain path traversal sequences");
    }
    if key.contains('/') || key.contains('\\') {
        return invalid("key cannot contain path separators");
    }
    if key.chars().any(char::is_control) {
        return invalid("key contains control characters");
    }
    Ok(())
}

pub fn encode(reports: &[Report]) -> Result<Vec<u8>, SlotError> {
    let bytes = serde_json::to_vec(reports)?;
    if bytes.len() > MAX_VALUE_SIZE {
        return Err(SlotError::ValueTooLarge {
            size: bytes.len(),
            max: MAX_VALUE_SIZE,
        });
    }
    Ok(bytes)
}

pub fn decode(bytes: &[u8]) -> Result<Vec<Report>, SlotError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Overwrites the slot with the full collection.
#[instrument(skip_all, fields(count = reports.len()))]
pub fn save<S: ReportSlot + ?Sized>(slot: &mut S, reports: &[Report]) -> Result<(), SlotError> {
    let bytes = encode(reports)?;
    slot.write(bytes)
}

/// Never fails: absent, unreadable or malformed data all degrade to an empty collection.
#[instrument(skip_all)]
pub fn load<S: ReportSlot + ?Sized>(slot: &S) -> Vec<Report> {
    let bytes = match slot.read() {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            debug!("no persisted reports");
            return Vec::new();
        }
        Err(e) => {
            warn!(error = %e, "failed to read persisted reports");
            return Vec::new();
        }
    };

    match decode(&bytes) {
        Ok(reports) => {
            debug!(count = reports.len(), "restored reports");
            reports
        }
        Err(e) => {
            warn!(error = %e, size = bytes.len(), "discarding malformed persisted reports");
            Vec::new()
        }
    }
}

/// In-memory slot, for tests and shells without durable storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    value: Option<Vec<u8>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            value: Some(bytes.into()),
        }
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        self.value.as_deref()
    }

    pub fn clear(&mut self) {
        self.value = None;
    }
}

impl ReportSlot for MemorySlot {
    fn read(&self) -> Result<Option<Vec<u8>>, SlotError> {
        Ok(self.value.clone())
    }

    fn write(&mut self, bytes: Vec<u8>) -> Result<(), SlotError> {
        self.value = Some(bytes);
        Ok(())
    }
}

/// File-backed slot. Writes go to a sibling temp file and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/<key>.json`
    pub fn in_dir(dir: impl AsRef<Path>, key: &str) -> Result<Self, SlotError> {
        validate_key(key)?;
        Ok(Self::new(dir.as_ref().join(format!("{key}.json"))))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSlot for FileSlot {
    fn read(&self) -> Result<Option<Vec<u8>>, SlotError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, bytes: Vec<u8>) -> Result<(), SlotError> {
        let tmp_path = self.path.with_extension("tmp");

        let mut file = File::create(&tmp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;

        std::fs::rename(&tmp_path, &self.path)?;

        if let Some(parent) = self.path.parent() {
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }

        Ok(())
    }
}
