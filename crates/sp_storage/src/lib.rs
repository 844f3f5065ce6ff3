use std::path::Path;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use sp_core::{CacheKind, CacheStore, Result};

pub mod backends;
pub mod memo;

pub use backends::*;
pub use memo::{CachedFetcher, CachedGenerator, CachedSearch, Memo};

pub trait StorageBackend: CacheStore + 'static {
    fn backend_name(&self) -> &'static str;
}

fn into_store<T: StorageBackend>(backend: T) -> Arc<dyn CacheStore> {
    tracing::info!("💾 Response cache enabled (using {})", backend.backend_name());
    Arc::new(backend)
}

/// Cache key for a call: SHA-256 over the function name and its arguments.
pub fn cache_key(function: &str, args: &[&str]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(function.as_bytes());
    for arg in args {
        hasher.update([0u8]);
        hasher.update(arg.len().to_le_bytes());
        hasher.update(arg.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// Builds the configured cache backend, or `None` when caching is off.
pub async fn create_cache(kind: CacheKind, dir: &Path) -> Result<Option<Arc<dyn CacheStore>>> {
    let cache = match kind {
        CacheKind::None => return Ok(None),
        CacheKind::Memory => into_store(MemoryCache::new()),
        CacheKind::File => into_store(FileCache::new(dir).await?),
    };
    Ok(Some(cache))
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{cache_key, create_cache, StorageBackend};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_separates_arguments() {
        let a = cache_key("search", &["ab", "c"]);
        let b = cache_key("search", &["a", "bc"]);
        assert_ne!(a, b);
        assert_eq!(a, cache_key("search", &["ab", "c"]));
        assert_ne!(a, cache_key("fetch", &["ab", "c"]));
        assert_eq!(a.len(), 64);
    }

    #[tokio::test]
    async fn test_create_cache_none() {
        let dir = std::env::temp_dir();
        assert!(create_cache(CacheKind::None, &dir).await.unwrap().is_none());
        assert!(create_cache(CacheKind::Memory, &dir).await.unwrap().is_some());
    }
}
