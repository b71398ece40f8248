//! Main entry point for the Markdown translator CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use md_translate::cli::commands::{self, Commands};

/// Markdown translator that keeps LaTeX, code, links and images intact
#[derive(Parser, Debug)]
#[command(name = "md-translate", version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("md_translate={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Execute command; any error exits nonzero
    match cli.command {
        Commands::TranslateFile {
            input,
            output,
            args,
        } => {
            commands::handle_translate_file(input, output, args).await?;
        }
        Commands::TranslateText { text, args } => {
            commands::handle_translate_text(text, args).await?;
        }
    }

    Ok(())
}
