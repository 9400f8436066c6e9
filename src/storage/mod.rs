//! Key-value storage behind draft persistence.
//!
//! The flow only ever needs get/set/remove of serialized blobs under a
//! fixed key, so the seam is kept that narrow. `MemoryStorage` backs tests
//! and embedders; `FileStorage` backs the CLI.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use anyhow::Result;

/// A durable string store keyed by well-known storage keys.
///
/// Implementations report failures as errors; callers decide whether a
/// failure is fatal. Removing a missing key must succeed.
pub trait DraftStorage: Send + Sync {
    /// Returns the stored value, or `None` if the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Succeeds when the key does not exist.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: DraftStorage + ?Sized> DraftStorage for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
