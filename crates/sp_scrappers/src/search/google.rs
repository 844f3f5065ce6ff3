use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use sp_core::{Language, Result, SearchProvider, SearchResult, Stage};

use crate::http::{build_client, ensure_success};

const GOOGLE_API_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// The Custom Search API returns at most ten results per request.
const MAX_RESULTS: usize = 10;

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    items: Option<Vec<GoogleItem>>,
}

#[derive(Debug, Deserialize)]
struct GoogleItem {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
}

fn into_results(response: GoogleResponse) -> Vec<SearchResult> {
    response
        .items
        .unwrap_or_default()
        .into_iter()
        .map(|item| SearchResult::new(item.title.unwrap_or_default(), item.link.unwrap_or_default()))
        .collect()
}

/// Google Custom Search JSON API.
pub struct GoogleSearch {
    client: Client,
    api_key: String,
    cx: String,
    results: usize,
    language: Language,
    label: String,
}

impl GoogleSearch {
    pub fn new(api_key: String, cx: String, results: usize, language: Language, timeout: Duration) -> Result<Self> {
        let results = results.clamp(1, MAX_RESULTS);
        Ok(Self {
            client: build_client(timeout)?,
            api_key,
            label: format!("google:{}:{}:{}", cx, language.code(), results),
            cx,
            results,
            language,
        })
    }
}

impl fmt::Debug for GoogleSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleSearch")
            .field("api_key", &"<redacted>")
            .field("cx", &self.cx)
            .field("results", &self.results)
            .finish()
    }
}

#[async_trait]
impl SearchProvider for GoogleSearch {
    fn name(&self) -> &str {
        &self.label
    }

    async fn search(&self, keyword: &str) -> Result<Vec<SearchResult>> {
        let num = self.results.to_string();
        let response = self
            .client
            .get(GOOGLE_API_URL)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.cx.as_str()),
                ("q", keyword),
                ("num", num.as_str()),
                ("gl", self.language.country()),
                ("hl", self.language.code()),
            ])
            .send()
            .await?;
        let response = ensure_success(response, Stage::Search, "Google Custom Search").await?;
        Ok(into_results(response.json::<GoogleResponse>().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_results() {
        let json = r#"{
            "kind": "customsearch#search",
            "items": [
                {"title": "Jak dbać o buty", "link": "https://a.pl/buty", "snippet": "..."},
                {"title": "Bez linku"}
            ]
        }"#;
        let results = into_results(serde_json::from_str(json).unwrap());
        assert_eq!(results.len(), 2);
        assert_eq!(results[0], SearchResult::new("Jak dbać o buty", "https://a.pl/buty"));
        assert_eq!(results[1].url, "");
    }

    #[test]
    fn test_missing_items_is_empty() {
        let results = into_results(serde_json::from_str(r#"{"kind": "customsearch#search"}"#).unwrap());
        assert!(results.is_empty());
    }

    #[test]
    fn test_result_count_is_capped() {
        let search = GoogleSearch::new("k".into(), "cx".into(), 50, Language::Pl, Duration::from_secs(1)).unwrap();
        assert_eq!(search.results, 10);
    }
}
