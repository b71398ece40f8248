//! OpenAI chat-completions backend

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::core::config::TranslateConfig;
use crate::core::errors::{Result, TranslationError};
use crate::services::TranslationService;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default system prompt; `{source_lang}` and `{target_lang}` are
/// substituted before each request.
pub const DEFAULT_PROMPT: &str = "You are a professional translation assistant. \
Translate the following text from {source_lang} to {target_lang}, \
preserving the original formatting and markers.";

/// Backend for the OpenAI chat-completions API.
#[derive(Debug, Clone)]
pub struct OpenAiTranslate {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    prompt_template: Option<String>,
}

impl OpenAiTranslate {
    /// Build the backend; the configuration must carry an API key.
    pub fn new(config: &TranslateConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| TranslationError::Config {
                message: "openai requires an API key".to_string(),
            })?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            client,
            api_key,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: config.model_or_default().to_string(),
            prompt_template: config.prompt_template.clone(),
        })
    }
}

/// Render the system prompt for a language pair.
pub fn system_prompt(template: Option<&str>, lang_in: &str, lang_out: &str) -> String {
    template
        .unwrap_or(DEFAULT_PROMPT)
        .replace("{source_lang}", lang_in)
        .replace("{target_lang}", lang_out)
}

/// POST one chat-completions request and pull out the reply text.
///
/// Shared with the DeepSeek backend, whose API is OpenAI-compatible.
pub(crate) async fn chat_translate(
    client: &reqwest::Client,
    endpoint: &str,
    api_key: &str,
    model: &str,
    prompt: &str,
    text: &str,
) -> Result<String> {
    let body = serde_json::json!({
        "model": model,
        "messages": [
            { "role": "system", "content": prompt },
            { "role": "user", "content": text },
        ],
        "temperature": 0.3,
    });

    let response = client
        .post(endpoint)
        .header("Authorization", format!("Bearer {api_key}"))
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await
        .map_err(|e| TranslationError::Network {
            message: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        if status.as_u16() == 429 {
            return Err(TranslationError::RateLimit);
        }
        return Err(TranslationError::Api {
            status: status.as_u16(),
            message: response.text().await.unwrap_or_default(),
        });
    }

    let json: serde_json::Value =
        response
            .json()
            .await
            .map_err(|e| TranslationError::InvalidResponse {
                message: e.to_string(),
            })?;

    json["choices"]
        .get(0)
        .and_then(|c| c["message"]["content"].as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| TranslationError::InvalidResponse {
            message: "no message content in response".to_string(),
        })
}

#[async_trait]
impl TranslationService for OpenAiTranslate {
    async fn translate(&self, text: &str, lang_in: &str, lang_out: &str) -> Result<String> {
        let prompt = system_prompt(self.prompt_template.as_deref(), lang_in, lang_out);
        let endpoint = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        debug!("openai translate via {} model {}", endpoint, self.model);

        chat_translate(&self.client, &endpoint, &self.api_key, &self.model, &prompt, text).await
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
