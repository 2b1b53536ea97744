//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// pfegen - Draft and refine LaTeX project reports with an LLM.
#[derive(Debug, Parser)]
#[command(name = "pfegen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Gemini API key (otherwise read from the variable named by `generation.api_key_env`)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Model to use instead of the configured one
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a report from a metadata file, optionally applying edits
    Generate(GenerateArgs),

    /// Show or locate the configuration
    Config(ConfigArgs),

    /// Enter interactive REPL mode
    Repl,
}

/// Arguments for the generate command.
#[derive(Debug, Parser)]
pub struct GenerateArgs {
    /// TOML file describing the project
    #[arg(short = 'f', long = "metadata")]
    pub metadata: PathBuf,

    /// Edit instruction applied after the first draft (repeatable, in order)
    #[arg(short, long = "edit")]
    pub edits: Vec<String>,

    /// Write the final document to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Print the configuration file path
    Path,
}
