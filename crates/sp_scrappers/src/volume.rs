use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sp_core::config::require;
use sp_core::{Error, KeywordVolume, Language, PlannerConfig, Result, Secrets, Stage};

use crate::http::{build_client, ensure_success};

const DATAFORSEO_VOLUME_URL: &str =
    "https://api.dataforseo.com/v3/keywords_data/google_ads/search_volume/live";
const STATUS_OK: u32 = 20000;
const MAX_KEYWORDS: usize = 1000;

#[derive(Serialize)]
struct VolumeTask<'a> {
    keywords: &'a [String],
    language_code: &'static str,
    location_code: u32,
}

#[derive(Deserialize)]
struct VolumeResponse {
    status_code: u32,
    #[serde(default)]
    status_message: String,
    #[serde(default)]
    tasks: Vec<VolumeTaskResult>,
}

#[derive(Deserialize)]
struct VolumeTaskResult {
    status_code: u32,
    #[serde(default)]
    status_message: String,
    #[serde(default)]
    result: Option<Vec<VolumeItem>>,
}

#[derive(Deserialize)]
struct VolumeItem {
    keyword: String,
    #[serde(default)]
    search_volume: Option<u64>,
}

fn location_code(language: Language) -> u32 {
    match language {
        Language::Pl => 2616,
        Language::En => 2840,
    }
}

fn into_volumes(response: VolumeResponse, keywords: &[String]) -> Result<HashMap<String, Option<u64>>> {
    if response.status_code != STATUS_OK {
        return Err(Error::upstream(
            Stage::KeywordVolume,
            format!("DataForSEO {}: {}", response.status_code, response.status_message),
        ));
    }
    let task = response
        .tasks
        .into_iter()
        .next()
        .ok_or_else(|| Error::upstream(Stage::KeywordVolume, "DataForSEO returned no task"))?;
    if task.status_code != STATUS_OK {
        return Err(Error::upstream(
            Stage::KeywordVolume,
            format!("DataForSEO task {}: {}", task.status_code, task.status_message),
        ));
    }

    let mut volumes: HashMap<String, Option<u64>> = keywords.iter().map(|k| (k.clone(), None)).collect();
    for item in task.result.unwrap_or_default() {
        volumes.insert(item.keyword, item.search_volume);
    }
    Ok(volumes)
}

/// Google Ads search volume through DataForSEO.
pub struct DataForSeoVolume {
    client: Client,
    login: String,
    password: String,
    language: Language,
}

impl DataForSeoVolume {
    pub fn new(login: String, password: String, language: Language, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            login,
            password,
            language,
        })
    }

    pub fn from_config(config: &PlannerConfig) -> Result<Self> {
        Self::new(
            require(&config.secrets.dataforseo_login, Secrets::DATAFORSEO_LOGIN)?,
            require(&config.secrets.dataforseo_password, Secrets::DATAFORSEO_PASSWORD)?,
            config.language,
            config.http_timeout,
        )
    }
}

impl fmt::Debug for DataForSeoVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataForSeoVolume")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl KeywordVolume for DataForSeoVolume {
    fn name(&self) -> &str {
        "dataforseo"
    }

    async fn volumes(&self, keywords: &[String]) -> Result<HashMap<String, Option<u64>>> {
        if keywords.is_empty() {
            return Ok(HashMap::new());
        }
        let keywords = &keywords[..keywords.len().min(MAX_KEYWORDS)];
        let body = [VolumeTask {
            keywords,
            language_code: self.language.code(),
            location_code: location_code(self.language),
        }];

        let response = self
            .client
            .post(DATAFORSEO_VOLUME_URL)
            .basic_auth(&self.login, Some(&self.password))
            .json(&body)
            .send()
            .await?;
        let response = ensure_success(response, Stage::KeywordVolume, "DataForSEO").await?;
        into_volumes(response.json::<VolumeResponse>().await?, keywords)
    }
}
