//! pfegen CLI library.
//!
//! Configuration, the project form, the interactive REPL and the terminal
//! rendering used by the `pfegen` binary.

pub mod cli;
pub mod clipboard;
pub mod commands;
pub mod config;
pub mod error;
pub mod highlight;
pub mod metadata_file;
pub mod output;
pub mod repl;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
