//! Drafting studio: owns the session, the document and the transcript
//!
//! # State machine
//!
//! ```text
//! Idle --generate--> Loading --ok--> Success
//!                            --err-> Error
//! ```
//!
//! Edits run beside that machine under a separate `sending` flag and never
//! change the top-level status. At most one request (generation or edit) is
//! in flight at any time; a second one is rejected with [`DraftError::Busy`]
//! because turn order on the session matters.
//!
//! Dropping a `generate` or `send_edit` future before its reply arrives
//! counts as a failed request: a generation moves to `Error`, an edit gets
//! the failure message, and the studio accepts new requests again.

use crate::client::DraftClient;
use crate::error::DraftError;
use crate::parser::{extract_document, split_summary_and_document};
use pfegen_domain::{
    GenerationStatus, ProjectMetadata, Role, Transcript, TranscriptEntry,
};
use pfegen_llm::ChatProvider;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime};
use tracing::{info, warn};

/// Assistant message shown after a successful first draft
pub const INITIAL_ASSISTANT_MESSAGE: &str =
    "Here is the preliminary LaTeX structure. You can use this assistant to edit the document.";

/// Assistant message shown when an edit request fails
pub const EDIT_FAILURE_MESSAGE: &str =
    "Sorry, an error occurred while updating the document. Please try again.";

/// Notice for edits attempted before any document exists
pub const NO_DOCUMENT_NOTICE: &str = "Generate a document before editing it.";

/// How far the synthetic user entry is backdated relative to the reply
const INITIAL_REQUEST_OFFSET: Duration = Duration::from_secs(2);

/// Result of an edit that reached the generation service
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// The document was replaced
    Applied {
        /// Explanation extracted from the reply
        summary: String,
    },
    /// The service failed; document and session are unchanged
    Failed {
        /// Error description, for logs
        reason: String,
    },
}

/// Read-only copy of the studio state
#[derive(Debug, Clone)]
pub struct StudioSnapshot {
    /// Top-level status
    pub status: GenerationStatus,
    /// Whether an edit is in flight
    pub sending: bool,
    /// Current document body
    pub document: String,
    /// Chat history
    pub transcript: Transcript,
    /// Whether a conversation session exists
    pub has_session: bool,
}

struct StudioState<S> {
    session: Option<Arc<S>>,
    document: String,
    transcript: Transcript,
    status: GenerationStatus,
    sending: bool,
}

impl<S> StudioState<S> {
    fn is_busy(&self) -> bool {
        self.status.is_loading() || self.sending
    }
}

fn lock_state<S>(state: &Mutex<StudioState<S>>) -> MutexGuard<'_, StudioState<S>> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone, Copy)]
enum RequestKind {
    Generation,
    Edit,
}

/// Releases the in-flight flag if the request future is dropped before the
/// reply is recorded, so a cancelled call never leaves the studio busy.
struct InFlight<'a, S> {
    state: &'a Mutex<StudioState<S>>,
    kind: RequestKind,
    armed: bool,
}

impl<'a, S> InFlight<'a, S> {
    fn new(state: &'a Mutex<StudioState<S>>, kind: RequestKind) -> Self {
        Self {
            state,
            kind,
            armed: true,
        }
    }

    /// The reply arrived; the caller records the outcome itself.
    fn complete(mut self) {
        self.armed = false;
    }
}

impl<S> Drop for InFlight<'_, S> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let mut state = lock_state(self.state);
        match self.kind {
            RequestKind::Generation => {
                warn!("Initial draft cancelled before a reply arrived");
                if state.status.is_loading() {
                    state.status = GenerationStatus::Error;
                }
            }
            RequestKind::Edit => {
                warn!("Edit cancelled before a reply arrived");
                state.sending = false;
                state
                    .transcript
                    .push(TranscriptEntry::new(Role::Assistant, EDIT_FAILURE_MESSAGE));
            }
        }
    }
}

/// Orchestrates drafting and editing on top of a [`DraftClient`]
pub struct DraftStudio<P: ChatProvider> {
    client: DraftClient<P>,
    state: Mutex<StudioState<P::Session>>,
}

impl<P: ChatProvider> DraftStudio<P> {
    /// Create a studio in the idle state
    pub fn new(client: DraftClient<P>) -> Self {
        Self {
            client,
            state: Mutex::new(StudioState {
                session: None,
                document: String::new(),
                transcript: Transcript::new(),
                status: GenerationStatus::Idle,
                sending: false,
            }),
        }
    }

    /// Underlying client
    pub fn client(&self) -> &DraftClient<P> {
        &self.client
    }

    fn lock(&self) -> MutexGuard<'_, StudioState<P::Session>> {
        lock_state(&self.state)
    }

    /// Generate a first draft, replacing any previous session and transcript.
    ///
    /// Fails with [`DraftError::Validation`] before any call when the title or
    /// description is blank, with [`DraftError::Busy`] while another request
    /// runs, and with [`DraftError::Service`] when the model call fails (the
    /// status then becomes `Error`).
    pub async fn generate(&self, metadata: &ProjectMetadata) -> Result<(), DraftError> {
        metadata.validate_for_generation()?;

        let session = {
            let mut state = self.lock();
            if state.is_busy() {
                return Err(DraftError::Busy);
            }
            state.status = GenerationStatus::Loading;

            let session = Arc::new(self.client.open_session());
            state.session = Some(Arc::clone(&session));
            state.transcript.clear();
            session
        };

        info!(title = %metadata.title, "Generating initial draft");
        let in_flight = InFlight::new(&self.state, RequestKind::Generation);
        let result = self
            .client
            .request_initial_document(&session, metadata)
            .await;
        in_flight.complete();

        let mut state = self.lock();
        match result {
            Ok(raw) => {
                state.document = extract_document(&raw);
                let replied_at = SystemTime::now();
                let user_at = replied_at
                    .checked_sub(INITIAL_REQUEST_OFFSET)
                    .unwrap_or(replied_at);
                state.transcript.push(TranscriptEntry::at(
                    Role::User,
                    format!("Generate the report for: {}", metadata.title),
                    user_at,
                ));
                state
                    .transcript
                    .push(TranscriptEntry::new(Role::Assistant, INITIAL_ASSISTANT_MESSAGE));
                state.status = GenerationStatus::Success;
                info!(document_chars = state.document.len(), "Initial draft ready");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Initial draft failed");
                state.status = GenerationStatus::Error;
                Err(DraftError::Service(e))
            }
        }
    }

    /// Ask the model to revise the current document.
    ///
    /// Local preconditions (non-blank instruction, existing document and
    /// session, nothing in flight) are reported as errors. A service failure
    /// is not an error here: it is recorded in the transcript and returned as
    /// [`EditOutcome::Failed`], leaving the document untouched.
    pub async fn send_edit(&self, instruction: &str) -> Result<EditOutcome, DraftError> {
        if instruction.trim().is_empty() {
            return Err(DraftError::Validation(
                "Edit instruction must not be empty.".to_string(),
            ));
        }

        let (session, current_document) = {
            let mut state = self.lock();
            if state.document.is_empty() {
                return Err(DraftError::Validation(NO_DOCUMENT_NOTICE.to_string()));
            }
            let session = state.session.clone().ok_or_else(|| {
                DraftError::Validation("No active session, generate a document first.".to_string())
            })?;
            if state.is_busy() {
                return Err(DraftError::Busy);
            }

            state.sending = true;
            state
                .transcript
                .push(TranscriptEntry::new(Role::User, instruction));
            (session, state.document.clone())
        };

        let in_flight = InFlight::new(&self.state, RequestKind::Edit);
        let result = self
            .client
            .request_edit(&session, &current_document, instruction)
            .await;
        in_flight.complete();

        let mut state = self.lock();
        state.sending = false;
        match result {
            Ok(raw) => {
                let (summary, document) = split_summary_and_document(&raw);
                state.document = document;
                state
                    .transcript
                    .push(TranscriptEntry::new(Role::Assistant, summary.clone()));
                info!(document_chars = state.document.len(), "Edit applied");
                Ok(EditOutcome::Applied { summary })
            }
            Err(e) => {
                warn!(error = %e, "Edit request failed");
                state
                    .transcript
                    .push(TranscriptEntry::new(Role::Assistant, EDIT_FAILURE_MESSAGE));
                Ok(EditOutcome::Failed {
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Copy of the whole state
    pub fn snapshot(&self) -> StudioSnapshot {
        let state = self.lock();
        StudioSnapshot {
            status: state.status,
            sending: state.sending,
            document: state.document.clone(),
            transcript: state.transcript.clone(),
            has_session: state.session.is_some(),
        }
    }

    /// Current status
    pub fn status(&self) -> GenerationStatus {
        self.lock().status
    }

    /// Whether an edit is in flight
    pub fn is_sending(&self) -> bool {
        self.lock().sending
    }

    /// Current document body (empty before the first draft)
    pub fn document(&self) -> String {
        self.lock().document.clone()
    }

    /// Current chat history
    pub fn transcript(&self) -> Transcript {
        self.lock().transcript.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DrafterConfig;
    use pfegen_llm::{LlmError, MockProvider};

    fn studio(provider: &MockProvider) -> DraftStudio<MockProvider> {
        DraftStudio::new(DraftClient::new(provider.clone(), DrafterConfig::default()))
    }

    fn metadata() -> ProjectMetadata {
        let mut metadata = ProjectMetadata::default();
        metadata.title = "X".to_string();
        metadata.description = "Y".to_string();
        metadata
    }

    #[test]
    fn test_new_studio_is_idle() {
        let provider = MockProvider::default();
        let snapshot = studio(&provider).snapshot();
        assert_eq!(snapshot.status, GenerationStatus::Idle);
        assert!(snapshot.document.is_empty());
        assert!(snapshot.transcript.is_empty());
        assert!(!snapshot.has_session);
    }

    #[tokio::test]
    async fn test_generate_seeds_transcript() {
        let provider = MockProvider::new("Intro text\n```latex\n\\documentclass{report}\n```");
        let studio = studio(&provider);

        studio.generate(&metadata()).await.unwrap();

        let snapshot = studio.snapshot();
        assert_eq!(snapshot.status, GenerationStatus::Success);
        assert_eq!(snapshot.document, "\\documentclass{report}");
        let entries = snapshot.transcript.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].role, Role::User);
        assert_eq!(entries[0].text, "Generate the report for: X");
        assert_eq!(entries[1].role, Role::Assistant);
        // The model's own explanation is not surfaced for the first draft
        assert_eq!(entries[1].text, INITIAL_ASSISTANT_MESSAGE);
        assert!(entries[0].created_at < entries[1].created_at);
    }

    #[tokio::test]
    async fn test_generate_failure_sets_error() {
        let provider = MockProvider::default();
        provider.push_error(LlmError::Communication("offline".to_string()));
        let studio = studio(&provider);

        let err = studio.generate(&metadata()).await.unwrap_err();
        assert!(matches!(err, DraftError::Service(LlmError::Communication(_))));

        let snapshot = studio.snapshot();
        assert_eq!(snapshot.status, GenerationStatus::Error);
        assert!(snapshot.document.is_empty());
        assert!(snapshot.transcript.is_empty());
    }

    #[tokio::test]
    async fn test_error_is_not_sticky() {
        let provider = MockProvider::new("```latex\n\\documentclass{report}\n```");
        provider.push_error(LlmError::Communication("offline".to_string()));
        let studio = studio(&provider);

        assert!(studio.generate(&metadata()).await.is_err());
        studio.generate(&metadata()).await.unwrap();
        assert_eq!(studio.status(), GenerationStatus::Success);
    }

    #[tokio::test]
    async fn test_regenerate_replaces_session_and_clears_transcript() {
        let provider = MockProvider::new("```latex\n\\documentclass{report}\n```");
        let studio = studio(&provider);

        studio.generate(&metadata()).await.unwrap();
        studio.send_edit("add a conclusion").await.unwrap();
        assert_eq!(studio.transcript().len(), 4);

        studio.generate(&metadata()).await.unwrap();
        assert_eq!(provider.session_count(), 2);
        assert_eq!(studio.transcript().len(), 2);
        assert_eq!(provider.sent_messages().last().unwrap().session, 1);
    }

    #[tokio::test]
    async fn test_edit_rejected_without_instruction() {
        let provider = MockProvider::new("```latex\n\\documentclass{report}\n```");
        let studio = studio(&provider);
        studio.generate(&metadata()).await.unwrap();

        let err = studio.send_edit("   ").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(provider.call_count(), 1);
        assert_eq!(studio.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_edit_failure_keeps_status_and_document() {
        let provider = MockProvider::new("```latex\nv1\n```");
        let studio = studio(&provider);
        studio.generate(&metadata()).await.unwrap();

        provider.push_error(LlmError::RateLimitExceeded("quota".to_string()));
        let outcome = studio.send_edit("add a conclusion").await.unwrap();

        assert!(matches!(outcome, EditOutcome::Failed { .. }));
        assert_eq!(studio.document(), "v1");
        assert_eq!(studio.status(), GenerationStatus::Success);
        assert!(!studio.is_sending());
        let transcript = studio.transcript();
        assert_eq!(transcript.last().unwrap().text, EDIT_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_edit_sends_current_document() {
        let provider = MockProvider::new("```latex\n\\documentclass{report}\nv1\n```");
        let studio = studio(&provider);
        studio.generate(&metadata()).await.unwrap();

        provider.push_response("Done.\n```latex\n\\documentclass{report}\nv2\n```");
        studio.send_edit("bump").await.unwrap();

        let prompt = provider.last_prompt().unwrap();
        assert!(prompt.contains("\\documentclass{report}\nv1"));
        assert_eq!(studio.document(), "\\documentclass{report}\nv2");
    }
}
