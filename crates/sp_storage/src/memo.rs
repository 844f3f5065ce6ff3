//! Memoization of collaborator calls keyed by function name and arguments.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sp_core::{CacheStore, ContentFetcher, ReportGenerator, Result, SearchProvider, SearchResult};

use crate::cache_key;

#[derive(Clone)]
pub struct Memo {
    store: Arc<dyn CacheStore>,
}

impl Memo {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Returns the cached value for `(function, args)` or runs `fetch` and
    /// stores its result when `keep` accepts it. Errors are never cached, and
    /// cache failures only cost a cache miss.
    pub async fn get_or_fetch<T, F, Fut>(
        &self,
        function: &str,
        args: &[&str],
        keep: fn(&T) -> bool,
        fetch: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let key = cache_key(function, args);
        match self.store.get(&key).await {
            Ok(Some(value)) => match serde_json::from_value::<T>(value) {
                Ok(hit) => {
                    tracing::debug!("Cache hit for {}", function);
                    return Ok(hit);
                }
                Err(e) => tracing::warn!("Discarding unreadable cache entry for {}: {}", function, e),
            },
            Ok(None) => {}
            Err(e) => tracing::warn!("Cache lookup failed for {}: {}", function, e),
        }

        let value = fetch().await?;
        if keep(&value) {
            match serde_json::to_value(&value) {
                Ok(json) => {
                    if let Err(e) = self.store.put(&key, json).await {
                        tracing::warn!("Failed to cache result of {}: {}", function, e);
                    }
                }
                Err(e) => tracing::warn!("Failed to serialize result of {}: {}", function, e),
            }
        }
        Ok(value)
    }
}

fn always<T>(_: &T) -> bool {
    true
}

fn is_some<T>(value: &Option<T>) -> bool {
    value.is_some()
}

pub struct CachedSearch {
    inner: Arc<dyn SearchProvider>,
    memo: Memo,
}

impl CachedSearch {
    pub fn new(inner: Arc<dyn SearchProvider>, memo: Memo) -> Self {
        Self { inner, memo }
    }
}

#[async_trait]
impl SearchProvider for CachedSearch {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn search(&self, keyword: &str) -> Result<Vec<SearchResult>> {
        self.memo
            .get_or_fetch("search", &[self.inner.name(), keyword], always, || {
                self.inner.search(keyword)
            })
            .await
    }
}

pub struct CachedFetcher {
    inner: Arc<dyn ContentFetcher>,
    memo: Memo,
}

impl CachedFetcher {
    pub fn new(inner: Arc<dyn ContentFetcher>, memo: Memo) -> Self {
        Self { inner, memo }
    }
}

#[async_trait]
impl ContentFetcher for CachedFetcher {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn fetch(&self, url: &str) -> Result<Option<String>> {
        self.memo
            .get_or_fetch("fetch_content", &[self.inner.name(), url], always, || {
                self.inner.fetch(url)
            })
            .await
    }
}

/// Caches generated reports. Empty generations are not cached so a later
/// run can retry them.
pub struct CachedGenerator {
    inner: Arc<dyn ReportGenerator>,
    memo: Memo,
}

impl CachedGenerator {
    pub fn new(inner: Arc<dyn ReportGenerator>, memo: Memo) -> Self {
        Self { inner, memo }
    }
}

#[async_trait]
impl ReportGenerator for CachedGenerator {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn generate(&self, corpus: &str, keyword: &str) -> Result<Option<String>> {
        self.memo
            .get_or_fetch(
                "generate_report",
                &[self.inner.name(), keyword, corpus],
                is_some::<String>,
                || self.inner.generate(corpus, keyword),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryCache;
    use sp_core::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingGenerator {
        calls: AtomicUsize,
        answer: Option<String>,
    }

    #[async_trait]
    impl ReportGenerator for CountingGenerator {
        fn name(&self) -> &str {
            "counting"
        }

        async fn generate(&self, _corpus: &str, _keyword: &str) -> Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.answer.clone())
        }
    }

    struct FlakySearch {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SearchProvider for FlakySearch {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn search(&self, keyword: &str) -> Result<Vec<SearchResult>> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(Error::NoResults("first call fails".to_string()));
            }
            Ok(vec![SearchResult::new(keyword, "https://example.com")])
        }
    }

    struct LocaleSearch {
        label: &'static str,
    }

    #[async_trait]
    impl SearchProvider for LocaleSearch {
        fn name(&self) -> &str {
            self.label
        }

        async fn search(&self, _keyword: &str) -> Result<Vec<SearchResult>> {
            Ok(vec![SearchResult::new(self.label, "https://example.com")])
        }
    }

    fn memo() -> Memo {
        Memo::new(Arc::new(MemoryCache::new()))
    }

    #[tokio::test]
    async fn test_generator_results_are_reused() {
        let inner = Arc::new(CountingGenerator {
            calls: AtomicUsize::new(0),
            answer: Some("### 1. A\nbody".to_string()),
        });
        let cached = CachedGenerator::new(inner.clone(), memo());

        let first = cached.generate("corpus", "kw").await.unwrap();
        let second = cached.generate("corpus", "kw").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);

        cached.generate("other corpus", "kw").await.unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_generation_not_cached() {
        let inner = Arc::new(CountingGenerator {
            calls: AtomicUsize::new(0),
            answer: None,
        });
        let cached = CachedGenerator::new(inner.clone(), memo());
        assert!(cached.generate("c", "k").await.unwrap().is_none());
        assert!(cached.generate("c", "k").await.unwrap().is_none());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_errors_not_cached() {
        let inner = Arc::new(FlakySearch {
            calls: AtomicUsize::new(0),
        });
        let cached = CachedSearch::new(inner.clone(), memo());

        assert!(cached.search("buty").await.is_err());
        assert_eq!(cached.search("buty").await.unwrap().len(), 1);
        assert_eq!(cached.search("buty").await.unwrap().len(), 1);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_provider_settings_separate_entries() {
        let shared = memo();
        let polish = CachedSearch::new(Arc::new(LocaleSearch { label: "google:pl:10" }), shared.clone());
        let english = CachedSearch::new(Arc::new(LocaleSearch { label: "google:en:10" }), shared);

        assert_eq!(polish.search("buty").await.unwrap()[0].title, "google:pl:10");
        assert_eq!(english.search("buty").await.unwrap()[0].title, "google:en:10");
    }
}
