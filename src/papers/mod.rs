//! Title-keyed research paper store with typo-tolerant lookup.
//!
//! Papers are opaque `title -> summary` pairs held by a [`KeyValueStore`].
//! [`resolver::resolve`] finds the stored title closest to a query when no
//! exact title exists.

pub mod distance;
pub mod resolver;
pub mod store;

use thiserror::Error;

/// Failure of the backing key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("store lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Flat string-keyed store consulted by the resolver.
///
/// Implementations must be safe to share across threads; they are not
/// required to give read consistency across separate calls.
pub trait KeyValueStore: Send + Sync {
    /// Exact, case-sensitive lookup.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Create or overwrite `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Every key currently held, fully drained. Order is implementation-defined.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}
