//! pfegen - Command-line drafting assistant for LaTeX project reports.

use clap::Parser;
use pfegen_cli::commands;
use pfegen_cli::repl::{self, ReplSession};
use pfegen_cli::{Cli, Command, Config, Formatter};
use pfegen_drafter::{DraftClient, DraftStudio};
use pfegen_llm::GeminiProvider;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> pfegen_cli::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = match cli.config.clone() {
        Some(path) => path,
        None => Config::path()?,
    };
    let mut config = load_or_create(&config_path)?;

    if let Some(model) = cli.model.clone() {
        config.generation.model = model;
    }

    let color_enabled = !cli.no_color && config.settings.color;
    if !color_enabled {
        colored::control::set_override(false);
    }
    let formatter = Formatter::new(color_enabled);

    let command = match cli.command.unwrap_or(Command::Repl) {
        Command::Config(args) => return commands::execute_config(args, &config, &config_path),
        command => command,
    };

    let api_key = config.resolve_api_key(cli.api_key.clone())?;
    let mut provider = GeminiProvider::new(api_key);
    if let Some(endpoint) = &config.generation.endpoint {
        provider = provider.with_endpoint(endpoint.clone());
    }

    let drafter_config = config.drafter_config();
    drafter_config.validate().map_err(pfegen_cli::CliError::Config)?;
    let studio = DraftStudio::new(DraftClient::new(provider, drafter_config));
    let defaults = config.default_metadata();

    match command {
        Command::Repl => {
            let mut session = ReplSession::new(studio, defaults, formatter);
            repl::run_repl(&mut session, config.settings.history_size).await?;
        }
        Command::Generate(args) => {
            commands::execute_generate(args, &studio, &defaults, &formatter).await?;
        }
        Command::Config(_) => {}
    }

    Ok(())
}

/// Install the stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load the config file, writing the defaults on first run.
fn load_or_create(path: &Path) -> pfegen_cli::Result<Config> {
    if path.exists() {
        return Config::load_from(path);
    }

    let config = Config::default();
    if let Err(e) = config.save_to(path) {
        tracing::warn!(path = %path.display(), error = %e, "Could not write default config");
    }
    Ok(config)
}
