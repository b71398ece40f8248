//! DeepSeek backend (OpenAI-compatible chat completions)

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::core::config::TranslateConfig;
use crate::core::errors::{Result, TranslationError};
use crate::services::openai::{chat_translate, system_prompt};
use crate::services::TranslationService;

/// Backend for DeepSeek-compatible endpoints.
///
/// The configured base URL is used verbatim as the request endpoint, so
/// self-hosted OpenAI-compatible gateways work unchanged.
#[derive(Debug, Clone)]
pub struct DeepseekTranslate {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    prompt_template: Option<String>,
}

impl DeepseekTranslate {
    /// Build the backend; the configuration must carry a key and base URL.
    pub fn new(config: &TranslateConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| TranslationError::Config {
                message: "deepseek requires an API key".to_string(),
            })?;
        let endpoint = config
            .base_url
            .clone()
            .ok_or_else(|| TranslationError::Config {
                message: "deepseek requires a base URL".to_string(),
            })?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
            model: config.model_or_default().to_string(),
            prompt_template: config.prompt_template.clone(),
        })
    }
}

#[async_trait]
impl TranslationService for DeepseekTranslate {
    async fn translate(&self, text: &str, lang_in: &str, lang_out: &str) -> Result<String> {
        let prompt = system_prompt(self.prompt_template.as_deref(), lang_in, lang_out);
        debug!("deepseek translate via {} model {}", self.endpoint, self.model);

        chat_translate(&self.client, &self.endpoint, &self.api_key, &self.model, &prompt, text)
            .await
    }

    fn name(&self) -> &'static str {
        "deepseek"
    }
}
