//! Token cache with pluggable storage backends
//!
//! The token manager only talks to [`CacheStorage`]; which backend sits
//! behind it is decided by the caller. Payloads are opaque strings.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;

/// Cache storage trait for different backends
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Check whether a value exists. Never fails; backend errors read as absent.
    async fn has(&self, key: &str) -> bool;

    /// Get the raw stored payload
    async fn get(&self, key: &str) -> Result<String, CacheError>;

    /// Store a payload, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Remove a value
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Cache errors
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Key not found: {0}")]
    NotFound(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// In-memory cache storage
#[derive(Default)]
pub struct MemoryCacheStorage {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn has(&self, key: &str) -> bool {
        self.data.read().await.contains_key(key)
    }

    async fn get(&self, key: &str) -> Result<String, CacheError> {
        self.data
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| CacheError::NotFound(key.to_string()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.data
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.data
            .write()
            .await
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| CacheError::NotFound(key.to_string()))
    }
}

/// Storage that never holds anything
///
/// Writes succeed and are discarded, so every lookup misses.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCacheStorage;

#[async_trait]
impl CacheStorage for NoopCacheStorage {
    async fn has(&self, _key: &str) -> bool {
        false
    }

    async fn get(&self, key: &str) -> Result<String, CacheError> {
        Err(CacheError::NotFound(key.to_string()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }
}

/// File-based cache storage
///
/// Each key maps to `{base_dir}/{key}.cache`. Files are not locked: two
/// processes sharing a directory race on read and write of the same file,
/// and the last writer wins.
#[derive(Debug, Clone)]
pub struct FileCacheStorage {
    base_dir: PathBuf,
}

impl FileCacheStorage {
    /// Create a file cache rooted at `base_dir`
    ///
    /// The directory is created lazily on the first write.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the file backing `key`
    pub fn key_to_path(&self, key: &str) -> Result<PathBuf, CacheError> {
        // Simple validation to prevent directory traversal
        if key.is_empty() || key.contains("..") || key.contains('/') || key.contains('\\') {
            return Err(CacheError::InvalidKey(key.to_string()));
        }

        Ok(self.base_dir.join(format!("{}.cache", key)))
    }
}

#[async_trait]
impl CacheStorage for FileCacheStorage {
    async fn has(&self, key: &str) -> bool {
        match self.key_to_path(key) {
            Ok(path) => tokio::fs::metadata(&path).await.is_ok(),
            Err(_) => false,
        }
    }

    async fn get(&self, key: &str) -> Result<String, CacheError> {
        let path = self.key_to_path(key)?;

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                debug!("Read cache entry from {}", path.display());
                Ok(content)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CacheError::NotFound(key.to_string()))
            }
            Err(e) => Err(CacheError::Io(e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let path = self.key_to_path(key)?;

        tokio::fs::create_dir_all(&self.base_dir).await?;
        tokio::fs::write(&path, value).await?;

        debug!("Wrote cache entry to {}", path.display());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let path = self.key_to_path(key)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CacheError::NotFound(key.to_string()))
            }
            Err(e) => Err(CacheError::Io(e)),
        }
    }
}
