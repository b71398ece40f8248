//! DeepL REST backend

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::core::config::TranslateConfig;
use crate::core::errors::{Result, TranslationError};
use crate::services::TranslationService;

const DEEPL_ENDPOINT: &str = "https://api-free.deepl.com/v2/translate";

/// Backend for the DeepL v2 REST API.
#[derive(Debug, Clone)]
pub struct DeeplTranslate {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct DeeplResponse {
    translations: Vec<DeeplTranslation>,
}

#[derive(Debug, Deserialize)]
struct DeeplTranslation {
    text: String,
}

impl DeeplTranslate {
    /// Build the backend; the configuration must carry an API key.
    pub fn new(config: &TranslateConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| TranslationError::Config {
                message: "deepl requires an API key".to_string(),
            })?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            endpoint: DEEPL_ENDPOINT.to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl TranslationService for DeeplTranslate {
    async fn translate(&self, text: &str, lang_in: &str, lang_out: &str) -> Result<String> {
        let source = lang_in.to_uppercase();
        let target = lang_out.to_uppercase();
        debug!("deepl translate {} -> {}", source, target);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .form(&[
                ("text", text),
                ("source_lang", source.as_str()),
                ("target_lang", target.as_str()),
            ])
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

        let body: DeeplResponse =
            response
                .json()
                .await
                .map_err(|e| TranslationError::InvalidResponse {
                    message: e.to_string(),
                })?;

        body.translations
            .into_iter()
            .next()
            .map(|t| t.text)
            .ok_or_else(|| TranslationError::InvalidResponse {
                message: "empty translations list".to_string(),
            })
    }

    fn name(&self) -> &'static str {
        "deepl"
    }
}
