use std::sync::Arc;

use sp_core::config::require;
use sp_core::{ContentFetcher, FetcherKind, PlannerConfig, Result, Secrets};

pub mod direct;
pub mod extract;
pub mod scrapingbee;

pub use direct::DirectFetcher;
pub use scrapingbee::ScrapingBeeFetcher;

/// Builds the content fetcher selected in the configuration.
pub fn create_fetcher(config: &PlannerConfig) -> Result<Arc<dyn ContentFetcher>> {
    let fetcher: Arc<dyn ContentFetcher> = match config.fetcher {
        FetcherKind::Scrapingbee => Arc::new(ScrapingBeeFetcher::new(
            require(&config.secrets.scrapingbee_api_key, Secrets::SCRAPINGBEE_API_KEY)?,
            config.min_content_length,
            config.http_timeout,
        )?),
        FetcherKind::Direct => Arc::new(DirectFetcher::new(config.min_content_length, config.http_timeout)?),
    };
    Ok(fetcher)
}
