//! Key-value store abstraction with automatic serialization.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::{CacheError, FileStore, MemoryStore};

/// Raw byte store backing every persisted store.
///
/// Implementations only move bytes; JSON encoding lives in [`Cache`].
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read the bytes stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store `value` under `key`, replacing anything already there.
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Check if a key exists.
    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.get(key).await?.is_some())
    }

    /// List every key in the store.
    async fn keys(&self) -> Result<Vec<String>, CacheError>;
}

/// Type-safe cache over any [`KvStore`].
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`.
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn KvStore>,
}

impl Cache {
    /// Wrap an existing store.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Cache backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Cache backed by a directory on disk.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::open_dir("/var/lib/crocus").await?;
    /// ```
    pub async fn open_dir(path: impl Into<std::path::PathBuf>) -> Result<Self, CacheError> {
        let store = FileStore::open(path).await?;
        Ok(Self::new(Arc::new(store)))
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cart: Option<CartState> = cache.get("cart-storage").await?;
    /// ```
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.store.set(key, &bytes).await
    }

    /// Delete a value from the cache.
    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.delete(key).await
    }

    /// Check if a key exists in the cache.
    pub async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.store.exists(key).await
    }

    /// Get all keys in the cache.
    pub async fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.store.keys().await
    }

    /// The underlying byte store.
    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust,ignore
/// let key = cache_key!("vouchers", user_id);
/// // Returns "vouchers:user123"
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Line {
        sku: String,
        quantity: u32,
    }

    #[tokio::test]
    async fn test_cache_roundtrip() {
        let cache = Cache::in_memory();
        let line = Line {
            sku: "P1".to_string(),
            quantity: 2,
        };

        cache.set("line", &line).await.unwrap();
        let loaded: Option<Line> = cache.get("line").await.unwrap();

        assert_eq!(loaded, Some(line));
    }

    #[tokio::test]
    async fn test_cache_missing_key() {
        let cache = Cache::in_memory();
        let loaded: Option<Line> = cache.get("nothing").await.unwrap();
        assert!(loaded.is_none());
        assert!(!cache.exists("nothing").await.unwrap());
    }

    #[tokio::test]
    async fn test_cache_rejects_malformed_payload() {
        let cache = Cache::in_memory();
        cache.store().set("line", b"not json").await.unwrap();

        let result: Result<Option<Line>, _> = cache.get("line").await;
        assert!(matches!(result, Err(CacheError::SerializeError(_))));
    }

    #[tokio::test]
    async fn test_cache_delete() {
        let cache = Cache::in_memory();
        cache.set("k", &1u32).await.unwrap();
        cache.delete("k").await.unwrap();
        assert!(cache.keys().await.unwrap().is_empty());
    }

    #[test]
    fn test_cache_key_macro() {
        let key = cache_key!("spins", "user-1", 2024);
        assert_eq!(key, "spins:user-1:2024");
    }
}
