//! Storage collaborators for published artifacts

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::StorageError;

/// Durable destination for serialized datasets
pub trait StorageClient: Send + Sync {
    /// Store `bytes` under `name`, replacing any previous artifact
    fn put(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Whether an artifact called `name` is present
    fn exists(&self, name: &str) -> bool;

    /// Human-readable location of artifact `name`
    fn location(&self, name: &str) -> String;
}

/// Stores artifacts as files in a local directory
#[derive(Debug, Clone)]
pub struct LocalDirectoryStorage {
    root: PathBuf,
}

impl LocalDirectoryStorage {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of artifact `name` inside the storage directory
    #[must_use]
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl StorageClient for LocalDirectoryStorage {
    fn put(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root).map_err(|source| StorageError::Io {
            path: self.root.clone(),
            source,
        })?;
        let path = self.path_of(name);
        fs::write(&path, bytes).map_err(|source| StorageError::Io { path, source })
    }

    fn exists(&self, name: &str) -> bool {
        self.path_of(name).is_file()
    }

    fn location(&self, name: &str) -> String {
        self.path_of(name).display().to_string()
    }
}

/// Keeps artifacts in memory, for dry runs and tests
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    artifacts: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of artifact `name`, if stored
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.artifacts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageClient for InMemoryStorage {
    fn put(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.artifacts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn exists(&self, name: &str) -> bool {
        self.artifacts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    fn location(&self, name: &str) -> String {
        format!("memory://{name}")
    }
}

impl<S: StorageClient + ?Sized> StorageClient for &S {
    fn put(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        (**self).put(name, bytes)
    }

    fn exists(&self, name: &str) -> bool {
        (**self).exists(name)
    }

    fn location(&self, name: &str) -> String {
        (**self).location(name)
    }
}
