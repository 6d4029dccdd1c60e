//! Key-value preference storage.
//!
//! The popup only ever stores one value (the backend base URL) but the store
//! is a general string map so the file format stays forward compatible.

use crate::Result;
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Async get/set contract over persisted preferences.
pub trait ConfigStore {
    /// Read a value. `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<()>> + Send;
}

/// JSON object file on disk, e.g. `~/.config/leetsearch/storage.json`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current contents. An unparseable file reads as empty so the next
    /// write replaces it.
    async fn load(&self) -> Result<HashMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(HashMap::new()),
            Ok(content) => match serde_json::from_str(&content) {
                Ok(values) => Ok(values),
                Err(e) => {
                    tracing::warn!(
                        "Ignoring corrupt preference file {}: {}",
                        self.path.display(),
                        e
                    );
                    Ok(HashMap::new())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, values: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(values)?;
        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, content).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        tracing::debug!("Saved {} stored preferences to {}", values.len(), self.path.display());
        Ok(())
    }
}

impl ConfigStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut values = self.load().await?;
        Ok(values.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut values = self.load().await?;
        values.insert(key.to_string(), value.to_string());
        self.persist(&values).await
    }
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one entry
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut values = HashMap::new();
        values.insert(key.to_string(), value.to_string());
        Self {
            values: Mutex::new(values),
        }
    }
}

impl ConfigStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
