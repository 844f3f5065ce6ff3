use async_trait::async_trait;

use crate::Result;

/// Key/value store backing the memoization of collaborator calls.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the stored JSON value for `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>>;

    async fn put(&self, key: &str, value: serde_json::Value) -> Result<()>;

    async fn clear(&self) -> Result<()>;
}
