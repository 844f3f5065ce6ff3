use std::collections::HashMap;

use async_trait::async_trait;

use crate::types::SearchResult;
use crate::Result;

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider name used in logs and cache keys. Includes every setting
    /// that changes the results, such as locale and result count.
    fn name(&self) -> &str;

    /// Ranked results for a keyword phrase. An empty list is a valid answer.
    async fn search(&self, keyword: &str) -> Result<Vec<SearchResult>>;
}

#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetcher name used in logs and cache keys, including the length floor.
    fn name(&self) -> &str;

    /// Extracted plain text for a page, or `None` when extraction failed or
    /// produced too little text.
    async fn fetch(&self, url: &str) -> Result<Option<String>>;
}

#[async_trait]
pub trait ReportGenerator: Send + Sync {
    fn name(&self) -> &str;

    /// Generates a Markdown report for the corpus. `None` means the model
    /// answered with nothing usable.
    async fn generate(&self, corpus: &str, keyword: &str) -> Result<Option<String>>;
}

/// Monthly search volume lookup. Keywords missing from the map, or mapped to
/// `None`, have unknown volume.
#[async_trait]
pub trait KeywordVolume: Send + Sync {
    fn name(&self) -> &str;

    async fn volumes(&self, keywords: &[String]) -> Result<HashMap<String, Option<u64>>>;
}
