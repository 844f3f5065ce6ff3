use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::filter::default_blocklist;
use crate::language::Language;
use crate::{Error, Result};

/// Which ranked-search backend supplies the candidate URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    /// Google Custom Search JSON API
    #[default]
    Google,
    /// Google results page fetched through the ScrapingBee proxy
    Scrapingbee,
    /// SerpApi Google engine
    Serpapi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FetcherKind {
    #[default]
    Scrapingbee,
    Direct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    #[default]
    Gemini,
    /// Any OpenAI-compatible chat completions endpoint
    Openai,
    /// Offline generator producing a fixed report skeleton
    Dummy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CacheKind {
    None,
    #[default]
    Memory,
    File,
}

/// API credentials. Every field is optional until the backend that needs it
/// is constructed.
#[derive(Clone, Default)]
pub struct Secrets {
    pub gemini_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub search_api_key: Option<String>,
    pub search_engine_id: Option<String>,
    pub scrapingbee_api_key: Option<String>,
    pub serpapi_api_key: Option<String>,
    pub dataforseo_login: Option<String>,
    pub dataforseo_password: Option<String>,
}

impl Secrets {
    pub const GEMINI_API_KEY: &'static str = "GEMINI_API_KEY";
    pub const OPENAI_API_KEY: &'static str = "OPENAI_API_KEY";
    pub const SEARCH_API_KEY: &'static str = "SEARCH_API_KEY";
    pub const SEARCH_ENGINE_ID: &'static str = "SEARCH_ENGINE_ID";
    pub const SCRAPINGBEE_API_KEY: &'static str = "SCRAPINGBEE_API_KEY";
    pub const SERPAPI_API_KEY: &'static str = "SERPAPI_API_KEY";
    pub const DATAFORSEO_LOGIN: &'static str = "DATAFORSEO_LOGIN";
    pub const DATAFORSEO_PASSWORD: &'static str = "DATAFORSEO_PASSWORD";

    /// Reads every secret from the process environment. Blank values count
    /// as missing.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Self {
            gemini_api_key: get(Self::GEMINI_API_KEY),
            openai_api_key: get(Self::OPENAI_API_KEY),
            search_api_key: get(Self::SEARCH_API_KEY),
            search_engine_id: get(Self::SEARCH_ENGINE_ID),
            scrapingbee_api_key: get(Self::SCRAPINGBEE_API_KEY),
            serpapi_api_key: get(Self::SERPAPI_API_KEY),
            dataforseo_login: get(Self::DATAFORSEO_LOGIN),
            dataforseo_password: get(Self::DATAFORSEO_PASSWORD),
        }
    }
}

/// Returns the secret or a configuration error naming the variable.
pub fn require(value: &Option<String>, name: &str) -> Result<String> {
    value
        .clone()
        .ok_or_else(|| Error::Config(format!("missing secret {}", name)))
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("Secrets")
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("search_api_key", &redact(&self.search_api_key))
            .field("search_engine_id", &self.search_engine_id)
            .field("scrapingbee_api_key", &redact(&self.scrapingbee_api_key))
            .field("serpapi_api_key", &redact(&self.serpapi_api_key))
            .field("dataforseo_login", &self.dataforseo_login)
            .field("dataforseo_password", &redact(&self.dataforseo_password))
            .finish()
    }
}

/// Everything one planning run needs, built once by the binary.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub search: SearchKind,
    pub fetcher: FetcherKind,
    pub generator: GeneratorKind,
    /// Model name override for the generator
    pub model: Option<String>,
    /// Base URL override for the OpenAI-compatible generator
    pub model_url: Option<String>,
    pub language: Language,
    pub results: usize,
    pub concurrency: usize,
    pub min_content_length: usize,
    pub blocklist: Vec<String>,
    pub enrich_volumes: bool,
    pub cache: CacheKind,
    pub cache_dir: PathBuf,
    pub http_timeout: Duration,
    pub generation_timeout: Duration,
    pub secrets: Secrets,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            search: SearchKind::default(),
            fetcher: FetcherKind::default(),
            generator: GeneratorKind::default(),
            model: None,
            model_url: None,
            language: Language::default(),
            results: 10,
            concurrency: 5,
            min_content_length: 100,
            blocklist: default_blocklist(),
            enrich_volumes: false,
            cache: CacheKind::default(),
            cache_dir: PathBuf::from(".seo-planner-cache"),
            http_timeout: Duration::from_secs(90),
            generation_timeout: Duration::from_secs(180),
            secrets: Secrets::default(),
        }
    }
}

impl PlannerConfig {
    /// Checks settings and that the secrets for every selected backend are
    /// present, before any request is made.
    pub fn validate(&self) -> Result<()> {
        if self.results == 0 {
            return Err(Error::Config("results must be at least 1".to_string()));
        }
        if self.concurrency == 0 {
            return Err(Error::Config("concurrency must be at least 1".to_string()));
        }

        let s = &self.secrets;
        match self.search {
            SearchKind::Google => {
                require(&s.search_api_key, Secrets::SEARCH_API_KEY)?;
                require(&s.search_engine_id, Secrets::SEARCH_ENGINE_ID)?;
            }
            SearchKind::Scrapingbee => {
                require(&s.scrapingbee_api_key, Secrets::SCRAPINGBEE_API_KEY)?;
            }
            SearchKind::Serpapi => {
                require(&s.serpapi_api_key, Secrets::SERPAPI_API_KEY)?;
            }
        }
        if self.fetcher == FetcherKind::Scrapingbee {
            require(&s.scrapingbee_api_key, Secrets::SCRAPINGBEE_API_KEY)?;
        }
        match self.generator {
            GeneratorKind::Gemini => {
                require(&s.gemini_api_key, Secrets::GEMINI_API_KEY)?;
            }
            GeneratorKind::Openai => {
                require(&s.openai_api_key, Secrets::OPENAI_API_KEY)?;
            }
            GeneratorKind::Dummy => {}
        }
        if self.enrich_volumes {
            require(&s.dataforseo_login, Secrets::DATAFORSEO_LOGIN)?;
            require(&s.dataforseo_password, Secrets::DATAFORSEO_PASSWORD)?;
        }
        Ok(())
    }
}
