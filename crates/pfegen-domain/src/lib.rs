//! pfegen Domain Layer
//!
//! Core data model for the report drafting workflow. Like any domain layer
//! it stays free of I/O and carries no dependencies beyond `uuid`.
//!
//! ## Key Concepts
//!
//! - **ProjectMetadata**: the structured form a student fills in before drafting
//! - **NameList**: ordered, bounded list of people (supervisors, jury members)
//! - **Transcript**: display-only chat history between the user and the assistant
//! - **GenerationStatus**: top-level state of the drafting workflow

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod metadata;
pub mod names;
pub mod status;
pub mod transcript;

// Re-exports for convenience
pub use metadata::{MetadataError, MetadataField, ProjectMetadata};
pub use names::{ListError, NameList, JURY_CAPACITY, SUPERVISOR_CAPACITY};
pub use status::GenerationStatus;
pub use transcript::{EntryId, Role, Transcript, TranscriptEntry};
