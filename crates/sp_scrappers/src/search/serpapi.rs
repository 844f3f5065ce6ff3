use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use sp_core::{Error, Language, Result, SearchProvider, SearchResult, Stage};

use crate::http::{build_client, ensure_success};

const SERPAPI_URL: &str = "https://serpapi.com/search.json";

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    position: Option<u32>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
}

fn into_results(response: SerpApiResponse, limit: usize) -> Result<Vec<SearchResult>> {
    if let Some(error) = response.error {
        // SerpApi reports an empty results page as an error string.
        if error.contains("hasn't returned any results") {
            return Ok(Vec::new());
        }
        return Err(Error::upstream(Stage::Search, format!("SerpApi: {}", error)));
    }
    let mut organic = response.organic_results;
    organic.sort_by_key(|r| r.position.unwrap_or(u32::MAX));
    Ok(organic
        .into_iter()
        .take(limit)
        .map(|r| SearchResult::new(r.title.unwrap_or_default(), r.link.unwrap_or_default()))
        .collect())
}

/// SerpApi structured Google results.
pub struct SerpApiSearch {
    client: Client,
    api_key: String,
    results: usize,
    language: Language,
    label: String,
}

impl SerpApiSearch {
    pub fn new(api_key: String, results: usize, language: Language, timeout: Duration) -> Result<Self> {
        let results = results.max(1);
        Ok(Self {
            client: build_client(timeout)?,
            api_key,
            results,
            language,
            label: format!("serpapi:{}:{}", language.code(), results),
        })
    }
}

impl fmt::Debug for SerpApiSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerpApiSearch")
            .field("api_key", &"<redacted>")
            .field("results", &self.results)
            .finish()
    }
}

#[async_trait]
impl SearchProvider for SerpApiSearch {
    fn name(&self) -> &str {
        &self.label
    }

    async fn search(&self, keyword: &str) -> Result<Vec<SearchResult>> {
        let num = self.results.to_string();
        let response = self
            .client
            .get(SERPAPI_URL)
            .query(&[
                ("engine", "google"),
                ("q", keyword),
                ("api_key", self.api_key.as_str()),
                ("num", num.as_str()),
                ("hl", self.language.code()),
                ("gl", self.language.country()),
            ])
            .send()
            .await?;
        let response = ensure_success(response, Stage::Search, "SerpApi").await?;
        into_results(response.json::<SerpApiResponse>().await?, self.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_results_orders_by_position() {
        let json = r#"{
            "search_metadata": {"status": "Success"},
            "organic_results": [
                {"position": 2, "title": "Second", "link": "https://b.pl"},
                {"position": 1, "title": "First", "link": "https://a.pl"},
                {"position": 3, "title": "Third", "link": "https://c.pl"}
            ]
        }"#;
        let results = into_results(serde_json::from_str(json).unwrap(), 2).unwrap();
        let titles: Vec<_> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[test]
    fn test_error_field() {
        let json = r#"{"error": "Invalid API key."}"#;
        assert!(into_results(serde_json::from_str(json).unwrap(), 10).is_err());

        let json = r#"{"error": "Google hasn't returned any results for this query."}"#;
        assert!(into_results(serde_json::from_str(json).unwrap(), 10).unwrap().is_empty());
    }
}
