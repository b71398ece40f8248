//! Pluggable translation backends
//!
//! The pipeline depends only on the [`TranslationService`] capability,
//! never on backend identity; one variant implementation exists per
//! supported service.

use async_trait::async_trait;

use crate::core::config::{Service, TranslateConfig};
use crate::core::errors::Result;

pub mod deepl;
pub mod deepseek;
pub mod google;
pub mod mock;
pub mod openai;

pub use deepl::DeeplTranslate;
pub use deepseek::DeepseekTranslate;
pub use google::GoogleTranslate;
pub use mock::MockService;
pub use openai::OpenAiTranslate;

/// A translation backend.
#[async_trait]
pub trait TranslationService: Send + Sync {
    /// Translate `text` from `lang_in` to `lang_out`.
    async fn translate(&self, text: &str, lang_in: &str, lang_out: &str) -> Result<String>;

    /// Stable identifier, used for cache partitioning and logging.
    fn name(&self) -> &'static str;
}

/// Build the backend named by the configuration.
pub fn create_service(config: &TranslateConfig) -> Result<Box<dyn TranslationService>> {
    config.validate()?;
    let service: Box<dyn TranslationService> = match config.service {
        Service::Google => Box::new(GoogleTranslate::new()?),
        Service::Deepl => Box::new(DeeplTranslate::new(config)?),
        Service::Openai => Box::new(OpenAiTranslate::new(config)?),
        Service::Deepseek => Box::new(DeepseekTranslate::new(config)?),
    };
    Ok(service)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_builds_google_without_key() {
        let config = TranslateConfig::default();
        let service = create_service(&config).unwrap();
        assert_eq!(service.name(), "google");
    }

    #[test]
    fn test_factory_rejects_keyless_deepl() {
        let config = TranslateConfig {
            service: Service::Deepl,
            ..Default::default()
        };
        assert!(create_service(&config).is_err());
    }

    #[test]
    fn test_factory_builds_configured_backends() {
        let config = TranslateConfig {
            service: Service::Openai,
            api_key: Some("k".to_string()),
            ..Default::default()
        };
        assert_eq!(create_service(&config).unwrap().name(), "openai");

        let config = TranslateConfig {
            service: Service::Deepseek,
            api_key: Some("k".to_string()),
            base_url: Some("https://api.deepseek.com/chat/completions".to_string()),
            ..Default::default()
        };
        assert_eq!(create_service(&config).unwrap().name(), "deepseek");
    }
}
