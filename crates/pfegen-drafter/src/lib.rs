//! pfegen Drafter
//!
//! Turns project metadata into a LaTeX report through a conversational
//! model, then revises it turn by turn.
//!
//! # Architecture
//!
//! ```text
//! ProjectMetadata → DraftStudio → DraftClient → ChatSession → raw reply
//!                        ↑                                        │
//!                        └──────────── parser (extract) ←─────────┘
//! ```
//!
//! - **parser**: pure extraction of the document body and change summary
//! - **client**: prompt construction and session handling
//! - **studio**: state machine, transcript and in-flight guard
//!
//! # Example Usage
//!
//! ```
//! use pfegen_drafter::{DraftClient, DraftStudio, DrafterConfig, EditOutcome};
//! use pfegen_domain::ProjectMetadata;
//! use pfegen_llm::MockProvider;
//!
//! # let rt = tokio::runtime::Runtime::new().unwrap();
//! # rt.block_on(async {
//! let provider = MockProvider::new("Done.\n```latex\n\\documentclass{report}\n```");
//! let studio = DraftStudio::new(DraftClient::new(provider, DrafterConfig::default()));
//!
//! let mut metadata = ProjectMetadata::default();
//! metadata.title = "Fraud detection".to_string();
//! metadata.description = "Graph neural networks for banking".to_string();
//!
//! studio.generate(&metadata).await.unwrap();
//! assert_eq!(studio.document(), "\\documentclass{report}");
//!
//! let outcome = studio.send_edit("add a conclusion").await.unwrap();
//! assert_eq!(outcome, EditOutcome::Applied { summary: "Done.".to_string() });
//! # });
//! ```

#![warn(missing_docs)]

mod client;
mod config;
mod error;
mod parser;
mod prompt;
mod studio;


pub use client::{DraftClient, NO_RESPONSE_PLACEHOLDER};
pub use config::{DrafterConfig, DEFAULT_LANGUAGE, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
pub use error::DraftError;
pub use parser::{extract_document, split_summary_and_document, DEFAULT_EDIT_SUMMARY, DOCUMENT_START};
pub use prompt::{edit_prompt, system_instruction, InitialPromptBuilder, FORMATTING_RULES};
pub use studio::{
    DraftStudio, EditOutcome, StudioSnapshot, EDIT_FAILURE_MESSAGE, INITIAL_ASSISTANT_MESSAGE,
    NO_DOCUMENT_NOTICE,
};
