use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use sp_core::{ContentFetcher, Result, Stage};

use super::extract::{accept_content, extract_main_text};
use crate::http::{build_client, ensure_success};

pub const SCRAPINGBEE_API_URL: &str = "https://app.scrapingbee.com/api/v1/";

/// Fetches pages through the ScrapingBee rendering proxy.
pub struct ScrapingBeeFetcher {
    client: Client,
    api_key: String,
    base_url: String,
    min_length: usize,
    label: String,
}

impl ScrapingBeeFetcher {
    pub fn new(api_key: String, min_length: usize, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            api_key,
            base_url: SCRAPINGBEE_API_URL.to_string(),
            min_length,
            label: format!("scrapingbee:{}", min_length),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl fmt::Debug for ScrapingBeeFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrapingBeeFetcher")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("min_length", &self.min_length)
            .finish()
    }
}

#[async_trait]
impl ContentFetcher for ScrapingBeeFetcher {
    fn name(&self) -> &str {
        &self.label
    }

    async fn fetch(&self, url: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("url", url),
                ("premium_proxy", "true"),
                ("block_resources", "false"),
            ])
            .send()
            .await?;
        let html = ensure_success(response, Stage::Content, "ScrapingBee").await?.text().await?;
        Ok(accept_content(extract_main_text(&html), self.min_length))
    }
}
