//! Status module - top-level state of the drafting workflow

use std::fmt;

/// State of the most recent generation request
///
/// ```text
/// Idle -> Loading -> Success
///                 -> Error
/// ```
///
/// `Error` is not terminal: a new generation or an edit can follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GenerationStatus {
    /// Nothing requested yet
    #[default]
    Idle,

    /// A generation request is in flight
    Loading,

    /// Last generation produced a document
    Success,

    /// Last generation failed
    Error,
}

impl GenerationStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStatus::Idle => "idle",
            GenerationStatus::Loading => "loading",
            GenerationStatus::Success => "success",
            GenerationStatus::Error => "error",
        }
    }

    /// Whether a generation is currently running
    pub fn is_loading(&self) -> bool {
        matches!(self, GenerationStatus::Loading)
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
