//! Generation service client
//!
//! Every interaction with the model goes through [`DraftClient`]: it opens
//! sessions with the fixed system instruction and turns metadata or edit
//! requests into prompts.

use crate::config::DrafterConfig;
use crate::prompt::{edit_prompt, system_instruction, InitialPromptBuilder};
use pfegen_domain::ProjectMetadata;
use pfegen_llm::{ChatProvider, ChatSession, LlmError, SessionConfig};
use tracing::{debug, info};

/// Substituted when the first turn produces no text
pub const NO_RESPONSE_PLACEHOLDER: &str = "No response generated.";

/// Client for drafting and editing sessions
pub struct DraftClient<P: ChatProvider> {
    provider: P,
    config: DrafterConfig,
}

impl<P: ChatProvider> DraftClient<P> {
    /// Create a new client
    pub fn new(provider: P, config: DrafterConfig) -> Self {
        Self { provider, config }
    }

    /// Drafter configuration in use
    pub fn config(&self) -> &DrafterConfig {
        &self.config
    }

    /// Session settings derived from the configuration
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new(
            self.config.model.clone(),
            self.config.temperature,
            system_instruction(
                &self.config.institution,
                &self.config.department,
                &self.config.language,
            ),
        )
    }

    /// Open a fresh session with no prior context
    pub fn open_session(&self) -> P::Session {
        debug!(model = %self.config.model, "Opening drafting session");
        self.provider.open_session(&self.session_config())
    }

    /// Ask for the first draft of the report.
    ///
    /// A reply without text yields [`NO_RESPONSE_PLACEHOLDER`] rather than an error.
    pub async fn request_initial_document(
        &self,
        session: &P::Session,
        metadata: &ProjectMetadata,
    ) -> Result<String, LlmError> {
        let prompt = InitialPromptBuilder::new(metadata, &self.config.language).build();
        info!(title = %metadata.title, prompt_chars = prompt.len(), "Requesting initial draft");

        let reply = session.send_message(&prompt).await?;
        Ok(reply.unwrap_or_else(|| NO_RESPONSE_PLACEHOLDER.to_string()))
    }

    /// Ask for an edit of the current document on the same session.
    ///
    /// A reply without text yields an empty string.
    pub async fn request_edit(
        &self,
        session: &P::Session,
        current_document: &str,
        instruction: &str,
    ) -> Result<String, LlmError> {
        let prompt = edit_prompt(current_document, instruction);
        info!(
            document_chars = current_document.len(),
            prompt_chars = prompt.len(),
            "Requesting edit"
        );

        let reply = session.send_message(&prompt).await?;
        Ok(reply.unwrap_or_default())
    }
}
