use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::tle::{TleError, TleRecord};

/// Local persistence for the last element set fetched.
pub trait TleCache: Send + Sync {
    fn load(&self) -> Result<Option<TleRecord>, TleError>;
    fn save(&self, record: &TleRecord) -> Result<(), TleError>;
}

/// Single JSON document on disk.
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TleCache for FileCache {
    fn load(&self) -> Result<Option<TleRecord>, TleError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, record: &TleRecord) -> Result<(), TleError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Write aside and rename so readers never see a half-written file.
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, serde_json::to_vec(record)?)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryCache {
    slot: Mutex<Option<TleRecord>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: TleRecord) -> Self {
        Self {
            slot: Mutex::new(Some(record)),
        }
    }
}

impl TleCache for MemoryCache {
    fn load(&self) -> Result<Option<TleRecord>, TleError> {
        Ok(self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, record: &TleRecord) -> Result<(), TleError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(record.clone());
        Ok(())
    }
}
