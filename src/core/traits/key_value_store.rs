use crate::core::errors::Result;

/// Port for the string key/value storage that backs the key cache.
///
/// Implementations live in `adapters::key_stores`. Each key holds one
/// JSON document; the cache never interprets keys beyond that.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`. `Ok(None)` when nothing is stored.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Create or replace the value under `key`.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<()>;
}
