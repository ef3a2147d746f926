use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod cli;
mod core;
mod daemon;

use crate::core::settings::Settings;
use crate::daemon::OutputFormat;

#[derive(Parser)]
#[command(name = "traxmate-poller")]
#[command(author, version, about = "Log in to the Traxmate API and fetch customers on a schedule")]
struct Cli {
    /// Path to the config file (default: <config dir>/traxmate-poller/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print cycle outcomes as JSON lines
    #[arg(long, global = true)]
    json: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll forever: one cycle now, then one per interval
    Run {
        /// Seconds between cycles (overrides the config file)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Run a single cycle and exit
    Once,

    /// Print the effective configuration
    Config,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_logging(debug: bool, json: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let dotenv = dotenvy::dotenv();
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Commands::Run {
        interval: Some(secs),
    } = cli.command
    {
        settings.polling.interval_secs = secs;
        settings.validate()?;
    }

    init_logging(settings.debug, cli.log_json);

    let config_path = cli.config.clone().or_else(Settings::config_path);
    match &config_path {
        Some(path) if path.exists() => tracing::info!(?path, "Loaded config"),
        _ => tracing::info!(path = ?config_path, "Config file not found, using defaults"),
    }

    match dotenv {
        Ok(path) => tracing::debug!(?path, "Loaded .env file"),
        Err(e) if e.not_found() => tracing::warn!("No .env file found, using process environment"),
        Err(e) => tracing::warn!(error = %e, "Failed to load .env file"),
    }

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    match cli.command {
        Commands::Run { .. } => daemon::run(&settings, format).await,
        Commands::Once => cli::once::run(&settings, format).await,
        Commands::Config => cli::config::run(&settings),
        Commands::Completions { .. } => Ok(()),
    }
}
