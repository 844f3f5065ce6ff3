use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use sp_core::{ContentFetcher, Result, Stage};

use super::extract::{accept_content, extract_main_text};
use crate::http::{build_client, ensure_success};

/// Fetches pages with a plain HTTP GET, no proxy.
#[derive(Debug)]
pub struct DirectFetcher {
    client: Client,
    min_length: usize,
    label: String,
}

impl DirectFetcher {
    pub fn new(min_length: usize, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            min_length,
            label: format!("direct:{}", min_length),
        })
    }
}

#[async_trait]
impl ContentFetcher for DirectFetcher {
    fn name(&self) -> &str {
        &self.label
    }

    async fn fetch(&self, url: &str) -> Result<Option<String>> {
        let response = self.client.get(url).send().await?;
        let html = ensure_success(response, Stage::Content, url).await?.text().await?;
        Ok(accept_content(extract_main_text(&html), self.min_length))
    }
}
