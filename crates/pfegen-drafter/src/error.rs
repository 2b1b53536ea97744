//! Error types for the drafter

use pfegen_domain::MetadataError;
use pfegen_llm::LlmError;
use thiserror::Error;

/// Errors that can occur while drafting or editing a document
#[derive(Error, Debug)]
pub enum DraftError {
    /// Local precondition failed; nothing was sent to the model
    #[error("{0}")]
    Validation(String),

    /// Another generation or edit is still in flight
    #[error("A request is already in progress, wait for it to finish")]
    Busy,

    /// The generation service failed
    #[error("Generation service error: {0}")]
    Service(#[from] LlmError),
}

impl From<MetadataError> for DraftError {
    fn from(e: MetadataError) -> Self {
        DraftError::Validation(e.to_string())
    }
}

impl DraftError {
    /// Whether the error was raised locally, before any service call
    pub fn is_validation(&self) -> bool {
        matches!(self, DraftError::Validation(_))
    }
}
