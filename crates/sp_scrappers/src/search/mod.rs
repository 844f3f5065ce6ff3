use std::sync::Arc;

use sp_core::config::require;
use sp_core::{PlannerConfig, Result, SearchKind, SearchProvider, Secrets};

pub mod google;
pub mod scrapingbee;
pub mod serpapi;

pub use google::GoogleSearch;
pub use scrapingbee::ScrapingBeeSearch;
pub use serpapi::SerpApiSearch;

/// Builds the search provider selected in the configuration.
pub fn create_search_provider(config: &PlannerConfig) -> Result<Arc<dyn SearchProvider>> {
    let secrets = &config.secrets;
    let provider: Arc<dyn SearchProvider> = match config.search {
        SearchKind::Google => Arc::new(GoogleSearch::new(
            require(&secrets.search_api_key, Secrets::SEARCH_API_KEY)?,
            require(&secrets.search_engine_id, Secrets::SEARCH_ENGINE_ID)?,
            config.results,
            config.language,
            config.http_timeout,
        )?),
        SearchKind::Scrapingbee => Arc::new(ScrapingBeeSearch::new(
            require(&secrets.scrapingbee_api_key, Secrets::SCRAPINGBEE_API_KEY)?,
            config.results,
            config.language,
            config.http_timeout,
        )?),
        SearchKind::Serpapi => Arc::new(SerpApiSearch::new(
            require(&secrets.serpapi_api_key, Secrets::SERPAPI_API_KEY)?,
            config.results,
            config.language,
            config.http_timeout,
        )?),
    };
    Ok(provider)
}

/// Name and description of every search backend, for `providers` listings.
pub fn available_providers() -> Vec<(&'static str, &'static str)> {
    vec![
        ("google", "Google Custom Search JSON API (SEARCH_API_KEY, SEARCH_ENGINE_ID)"),
        ("scrapingbee", "Google results page scraped through ScrapingBee (SCRAPINGBEE_API_KEY)"),
        ("serpapi", "SerpApi Google engine (SERPAPI_API_KEY)"),
    ]
}
