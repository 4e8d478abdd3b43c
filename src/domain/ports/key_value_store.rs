//! Local persistent key-value storage port.
//!
//! The analog of browser local storage: namespaced string keys, string values,
//! synchronous access, no native TTL. The TTL cache layers expiry on top.
//! Correctness never depends on this store; loss or corruption only degrades
//! reads to the slower store-backed path.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Injected storage port so cache components can be tested against an
/// in-memory fake rather than a real persistent store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Every key currently present, in no particular order.
    fn keys(&self) -> StorageResult<Vec<String>>;
}
