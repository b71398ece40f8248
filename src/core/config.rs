//! Configuration management

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::core::errors::{Result, TranslationError};

/// Supported translation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    /// Google web translation endpoint (no key required)
    Google,
    /// DeepL REST API
    Deepl,
    /// OpenAI chat completions
    Openai,
    /// DeepSeek (OpenAI-compatible) chat completions
    Deepseek,
}

impl Service {
    /// Stable identifier, also used for cache partitioning.
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Google => "google",
            Service::Deepl => "deepl",
            Service::Openai => "openai",
            Service::Deepseek => "deepseek",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model used when none is configured for openai/deepseek.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Full configuration for one translation run.
///
/// Every field is explicit; the only implicit behavior is the documented
/// environment fallback applied by [`TranslateConfig::apply_env`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Which backend to call
    pub service: Service,
    /// Model name (openai/deepseek only)
    pub model: Option<String>,
    /// API key (deepl/openai/deepseek only)
    pub api_key: Option<String>,
    /// API base URL (openai/deepseek only)
    pub base_url: Option<String>,
    /// Source language code
    pub lang_in: String,
    /// Target language code
    pub lang_out: String,
    /// System prompt template with `{source_lang}`/`{target_lang}` holes
    pub prompt_template: Option<String>,
    /// Bypass the on-disk translation cache entirely
    pub ignore_cache: bool,
    /// Directory holding the cache files
    pub cache_dir: PathBuf,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            service: Service::Google,
            model: None,
            api_key: None,
            base_url: None,
            lang_in: "en".to_string(),
            lang_out: "zh".to_string(),
            prompt_template: None,
            ignore_cache: false,
            cache_dir: PathBuf::from("."),
        }
    }
}

impl TranslateConfig {
    /// Fill unset credentials from environment variables.
    ///
    /// CLI-provided values always win; only `None` fields are touched.
    pub fn apply_env(&mut self) {
        match self.service {
            Service::Google => {}
            Service::Deepl => {
                if self.api_key.is_none() {
                    self.api_key = env_var("DEEPL_API_KEY");
                }
            }
            Service::Openai => {
                if self.api_key.is_none() {
                    self.api_key = env_var("OPENAI_API_KEY");
                }
                if self.base_url.is_none() {
                    self.base_url = env_var("OPENAI_API_BASE");
                }
            }
            Service::Deepseek => {
                if self.api_key.is_none() {
                    self.api_key = env_var("DEEPSEEK_API_KEY");
                }
                if self.base_url.is_none() {
                    self.base_url = env_var("DEEPSEEK_API_URL");
                }
                if self.model.is_none() {
                    self.model = env_var("DEEPSEEK_MODEL");
                }
            }
        }
    }

    /// Validate that the selected backend has what it needs.
    pub fn validate(&self) -> Result<()> {
        let needs_key = matches!(
            self.service,
            Service::Deepl | Service::Openai | Service::Deepseek
        );
        if needs_key && self.api_key.is_none() {
            return Err(TranslationError::Config {
                message: format!("{} requires an API key", self.service),
            });
        }
        if self.service == Service::Deepseek && self.base_url.is_none() {
            return Err(TranslationError::Config {
                message: "deepseek requires a base URL".to_string(),
            });
        }
        Ok(())
    }

    /// Configured model, or the documented default.
    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}

/// Non-empty environment variable, if set.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TranslateConfig::default();
        assert_eq!(config.service, Service::Google);
        assert_eq!(config.lang_in, "en");
        assert_eq!(config.lang_out, "zh");
        assert!(!config.ignore_cache);
        assert_eq!(config.model_or_default(), "gpt-3.5-turbo");
    }

    #[test]
    fn test_google_needs_no_key() {
        let config = TranslateConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_keyed_services_require_key() {
        let config = TranslateConfig {
            service: Service::Deepl,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = TranslateConfig {
            service: Service::Deepl,
            api_key: Some("k".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deepseek_requires_base_url() {
        let config = TranslateConfig {
            service: Service::Deepseek,
            api_key: Some("k".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_value_beats_env() {
        std::env::set_var("DEEPL_API_KEY", "env_key");
        let mut config = TranslateConfig {
            service: Service::Deepl,
            api_key: Some("cli_key".to_string()),
            ..Default::default()
        };
        config.apply_env();
        assert_eq!(config.api_key.as_deref(), Some("cli_key"));
    }
}
