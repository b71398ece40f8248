//! CLI command definitions and handlers

use clap::{Args, Subcommand};
use std::path::PathBuf;
use tracing::info;

use crate::core::config::{Service, TranslateConfig};
use crate::core::pipeline::MarkdownTranslator;

/// Options shared by both translate commands.
#[derive(Args, Debug, Clone)]
pub struct TranslateArgs {
    /// Source language code
    #[arg(long, default_value = "en")]
    pub lang_in: String,

    /// Target language code
    #[arg(long, default_value = "zh")]
    pub lang_out: String,

    /// Translation service
    #[arg(long, value_enum, default_value_t = Service::Google)]
    pub service: Service,

    /// Model name (openai/deepseek only)
    #[arg(long)]
    pub model: Option<String>,

    /// API key (deepl/openai/deepseek only)
    #[arg(long)]
    pub api_key: Option<String>,

    /// API base URL (openai/deepseek only)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Skip the translation cache
    #[arg(long)]
    pub ignore_cache: bool,

    /// Prompt template; {source_lang} and {target_lang} are substituted
    /// (openai/deepseek only)
    #[arg(long)]
    pub prompt_template: Option<String>,
}

impl TranslateArgs {
    /// Turn the parsed flags into a pipeline configuration.
    pub fn into_config(self) -> TranslateConfig {
        TranslateConfig {
            service: self.service,
            model: self.model,
            api_key: self.api_key,
            base_url: self.base_url,
            lang_in: self.lang_in,
            lang_out: self.lang_out,
            prompt_template: self.prompt_template,
            ignore_cache: self.ignore_cache,
            ..Default::default()
        }
    }
}

/// Commands for the Markdown translator
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate a Markdown file
    TranslateFile {
        /// Input file path
        input: PathBuf,

        /// Output file path
        output: PathBuf,

        /// Shared translation options
        #[command(flatten)]
        args: TranslateArgs,
    },

    /// Translate Markdown text to standard output
    TranslateText {
        /// Text to translate
        text: String,

        /// Shared translation options
        #[command(flatten)]
        args: TranslateArgs,
    },
}

/// Handle the translate-file command.
pub async fn handle_translate_file(
    input: PathBuf,
    output: PathBuf,
    args: TranslateArgs,
) -> anyhow::Result<()> {
    info!("translating {} -> {}", input.display(), output.display());

    let markdown = std::fs::read_to_string(&input)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {}", input.display(), e))?;

    let translator = MarkdownTranslator::from_config(args.into_config())?;
    let translated = translator.translate(&markdown).await?;

    // Written only after the whole document succeeded; no partial output.
    std::fs::write(&output, translated)
        .map_err(|e| anyhow::anyhow!("failed to write {}: {}", output.display(), e))?;

    info!("translation saved to {}", output.display());
    println!("✅ Translation saved to {}", output.display());
    Ok(())
}

/// Handle the translate-text command.
pub async fn handle_translate_text(text: String, args: TranslateArgs) -> anyhow::Result<()> {
    let translator = MarkdownTranslator::from_config(args.into_config())?;
    let translated = translator.translate(&text).await?;
    println!("{translated}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_into_config() {
        let args = TranslateArgs {
            lang_in: "en".to_string(),
            lang_out: "ja".to_string(),
            service: Service::Openai,
            model: Some("gpt-4o-mini".to_string()),
            api_key: Some("k".to_string()),
            base_url: None,
            ignore_cache: true,
            prompt_template: None,
        };

        let config = args.into_config();
        assert_eq!(config.service, Service::Openai);
        assert_eq!(config.lang_out, "ja");
        assert!(config.ignore_cache);
        assert_eq!(config.model.as_deref(), Some("gpt-4o-mini"));
    }
}
