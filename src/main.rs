//! Ragdesk CLI entry point.

use anyhow::Result;
use clap::Parser;
use ragdesk::cli::{commands, Cli, Commands};
use ragdesk::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the environment may already carry the key.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let config_path = cli
        .config
        .as_ref()
        .map(|p| Settings::expand_path(p))
        .unwrap_or_else(Settings::default_config_path);
    let settings = Settings::load_from(Some(&config_path))?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            format!("ragdesk={},tower_http={}", log_level, log_level)
        })))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Ensure data directory exists
    std::fs::create_dir_all(settings.data_dir())?;

    // Execute command
    match cli.command {
        Commands::Init => {
            commands::run_init(&settings)?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Serve { host, port, profile } => {
            commands::run_serve(host, port, profile, settings).await?;
        }

        Commands::Ingest { path, force } => {
            commands::run_ingest(&path, force, settings).await?;
        }

        Commands::Ask {
            question,
            profile,
            model,
        } => {
            commands::run_ask(&question, profile, model, settings).await?;
        }

        Commands::Chat { profile, model } => {
            commands::run_chat(profile, model, settings).await?;
        }

        Commands::Transcribe { file } => {
            commands::run_transcribe(&file, settings).await?;
        }

        Commands::List => {
            commands::run_list(settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, config_path, settings)?;
        }
    }

    Ok(())
}
