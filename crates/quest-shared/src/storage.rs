//! Key-value backends behind the progress store.
//!
//! Keys are logical record names (`profile`, `progress`, `badges`); each
//! backend namespaces them with [`STORAGE_PREFIX`]. Values are JSON blobs.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{QuestError, Result};

pub const STORAGE_PREFIX: &str = "dq-";

pub trait KeyValueBackend: Send {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    /// Short name for logs
    fn describe(&self) -> String;
}

/// One JSON file per record under a data directory
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}{}.json", STORAGE_PREFIX, key))
    }
}

impl KeyValueBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file:{}", self.dir.display())
    }
}

/// In-process map, lost on exit
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| QuestError::Storage("memory backend poisoned".to_string()))?;
        Ok(entries.get(&format!("{}{}", STORAGE_PREFIX, key)).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| QuestError::Storage("memory backend poisoned".to_string()))?;
        entries.insert(format!("{}{}", STORAGE_PREFIX, key), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| QuestError::Storage("memory backend poisoned".to_string()))?;
        entries.remove(&format!("{}{}", STORAGE_PREFIX, key));
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// No storage in this execution context; every call fails
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableBackend;

impl KeyValueBackend for UnavailableBackend {
    fn read(&self, _key: &str) -> Result<Option<String>> {
        Err(QuestError::StorageUnavailable)
    }

    fn write(&self, _key: &str, _value: &str) -> Result<()> {
        Err(QuestError::StorageUnavailable)
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Err(QuestError::StorageUnavailable)
    }

    fn describe(&self) -> String {
        "unavailable".to_string()
    }
}
