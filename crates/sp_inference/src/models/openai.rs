use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sp_core::{Error, Language, ReportGenerator, Result, Stage};

use crate::prompt::build_prompt;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

fn response_text(response: ChatResponse) -> Option<String> {
    let choice = response.choices.into_iter().next()?;
    match choice.message.content {
        Some(text) if !text.trim().is_empty() => Some(text),
        _ => {
            tracing::warn!(
                "⚠️ Chat completion returned no content (finish reason: {})",
                choice.finish_reason.as_deref().unwrap_or("unknown")
            );
            None
        }
    }
}

/// Report generator for any OpenAI-compatible chat completions endpoint.
pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    language: Language,
    label: String,
}

impl OpenAiGenerator {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
        language: Language,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let model = model.unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());
        let base_url = base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| OPENAI_BASE_URL.to_string());
        url::Url::parse(&base_url).map_err(|e| Error::Config(format!("invalid model URL {}: {}", base_url, e)))?;
        Ok(Self {
            client,
            api_key,
            label: format!("openai:{}:{}", model, language.code()),
            base_url,
            model,
            language,
        })
    }
}

impl fmt::Debug for OpenAiGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiGenerator")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl ReportGenerator for OpenAiGenerator {
    fn name(&self) -> &str {
        &self.label
    }

    async fn generate(&self, corpus: &str, keyword: &str) -> Result<Option<String>> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: build_prompt(self.language, keyword, corpus),
            }],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::upstream(
                Stage::Generation,
                format!("chat completions returned {}: {}", status, body.trim()),
            ));
        }

        Ok(response_text(response.json::<ChatResponse>().await?))
    }
}
