//! Command implementations.

pub mod config_cmd;
pub mod export;
pub mod form;
pub mod generate;

pub use self::config_cmd::execute_config;
pub use self::export::{copy_document, save_document};
pub use self::form::{execute_list, execute_load, execute_set, ListAction, ListKind};
pub use self::generate::{execute_generate, run_edit, run_generation};
