//! Google web translation backend

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::core::errors::{Result, TranslationError};
use crate::services::TranslationService;

const GOOGLE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Backend using the public Google web endpoint (`client=gtx`).
///
/// Requires no API key; the response is a nested JSON array whose
/// `[0][i][0]` entries hold the translated sentence fragments.
#[derive(Debug, Clone)]
pub struct GoogleTranslate {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleTranslate {
    /// Build the backend with a 30 second request timeout.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            endpoint: GOOGLE_ENDPOINT.to_string(),
        })
    }
}

/// Map common short codes onto the forms the web endpoint accepts.
fn google_lang_code(code: &str) -> String {
    match code {
        "zh" | "zh-CN" => "zh-cn".to_string(),
        "zh-TW" => "zh-tw".to_string(),
        other => other.to_ascii_lowercase(),
    }
}

#[async_trait]
impl TranslationService for GoogleTranslate {
    async fn translate(&self, text: &str, lang_in: &str, lang_out: &str) -> Result<String> {
        let sl = google_lang_code(lang_in);
        let tl = google_lang_code(lang_out);
        debug!("google translate {} -> {}", sl, tl);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", sl.as_str()),
                ("tl", tl.as_str()),
                ("dt", "t"),
                ("q", text),
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

        let json: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| TranslationError::InvalidResponse {
                    message: e.to_string(),
                })?;

        let sentences = json
            .get(0)
            .and_then(|v| v.as_array())
            .ok_or_else(|| TranslationError::InvalidResponse {
                message: "no sentence list in response".to_string(),
            })?;

        let mut translated = String::new();
        for sentence in sentences {
            if let Some(fragment) = sentence.get(0).and_then(|v| v.as_str()) {
                translated.push_str(fragment);
            }
        }
        Ok(translated)
    }

    fn name(&self) -> &'static str {
        "google"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_code_mapping() {
        assert_eq!(google_lang_code("zh"), "zh-cn");
        assert_eq!(google_lang_code("zh-CN"), "zh-cn");
        assert_eq!(google_lang_code("zh-TW"), "zh-tw");
        assert_eq!(google_lang_code("en"), "en");
        assert_eq!(google_lang_code("JA"), "ja");
    }
}
