use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sp_core::{Error, Language, ReportGenerator, Result, Stage};

use crate::prompt::build_prompt;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-latest";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Pulls the generated text out of a response, logging why there is none.
fn response_text(response: GenerateResponse) -> Option<String> {
    let text: String = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if !text.trim().is_empty() {
        return Some(text);
    }

    tracing::warn!("⚠️ Gemini returned an empty response");
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        tracing::warn!("Prompt blocked: {}", reason);
    }
    if let Some(reason) = response.candidates.first().and_then(|c| c.finish_reason.as_deref()) {
        tracing::warn!("Generation finish reason: {}", reason);
    }
    None
}

pub struct GeminiGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    language: Language,
    label: String,
}

impl GeminiGenerator {
    pub fn new(api_key: String, model: Option<String>, language: Language, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let model = model.unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        Ok(Self {
            client,
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
            label: format!("gemini:{}:{}", model, language.code()),
            model,
            language,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl fmt::Debug for GeminiGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiGenerator")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl ReportGenerator for GeminiGenerator {
    fn name(&self) -> &str {
        &self.label
    }

    async fn generate(&self, corpus: &str, keyword: &str) -> Result<Option<String>> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(build_prompt(self.language, keyword, corpus)),
                }],
            }],
        };

        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, self.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::upstream(
                Stage::Generation,
                format!("Gemini API returned {}: {}", status, body.trim()),
            ));
        }

        let response = response.json::<GenerateResponse>().await?;
        Ok(response_text(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Option<String> {
        response_text(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_response_text_joins_parts() {
        let json = r####"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "### 1. A\n"}, {"text": "body"}]},
                "finishReason": "STOP"
            }]
        }"####;
        assert_eq!(parse(json).as_deref(), Some("### 1. A\nbody"));
    }

    #[test]
    fn test_blocked_prompt_yields_none() {
        let json = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        assert!(parse(json).is_none());

        let json = r#"{"candidates": [{"finishReason": "MAX_TOKENS", "content": {"parts": [{"text": "  "}]}}]}"#;
        assert!(parse(json).is_none());
    }

    #[test]
    fn test_debug_redacts_key() {
        let generator = GeminiGenerator::new(
            "secret-key".to_string(),
            None,
            Language::Pl,
            Duration::from_secs(5),
        )
        .unwrap();
        assert!(!format!("{:?}", generator).contains("secret-key"));
        assert_eq!(generator.name(), "gemini:gemini-1.5-flash-latest:pl");
    }
}
