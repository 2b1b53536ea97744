//! Scripted mock provider
//!
//! Returns pre-configured replies without making any network calls. Every
//! opened session and every prompt is recorded so tests can assert on what
//! would have been sent.

use crate::{ChatProvider, ChatSession, LlmError, SessionConfig};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// One scripted reply
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Empty,
    Error(LlmError),
}

/// A prompt received by a mock session
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    /// Index of the session (in opening order) that received the prompt
    pub session: usize,
    /// Prompt text
    pub prompt: String,
}

#[derive(Debug, Default)]
struct MockState {
    default_response: String,
    replies: VecDeque<MockReply>,
    sessions: Vec<SessionConfig>,
    sent: Vec<SentMessage>,
    latency: Option<Duration>,
}

/// Mock LLM provider for deterministic testing
///
/// Scripted replies are consumed in order across all sessions; once the
/// script runs out the default response is returned.
///
/// # Examples
///
/// ```
/// use pfegen_llm::{ChatProvider, ChatSession, MockProvider, SessionConfig};
///
/// # let rt = tokio::runtime::Runtime::new().unwrap();
/// # rt.block_on(async {
/// let provider = MockProvider::default();
/// provider.push_response("first");
/// provider.push_empty();
///
/// let session = provider.open_session(&SessionConfig::new("mock", 0.5, ""));
/// assert_eq!(session.send_message("a").await.unwrap().as_deref(), Some("first"));
/// assert_eq!(session.send_message("b").await.unwrap(), None);
/// assert_eq!(provider.call_count(), 2);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                default_response: response.into(),
                ..MockState::default()
            })),
        }
    }

    /// Delay every reply, to exercise callers while a request is in flight
    pub fn with_latency(self, latency: Duration) -> Self {
        self.lock().latency = Some(latency);
        self
    }

    /// Queue a text reply
    pub fn push_response(&self, response: impl Into<String>) {
        self.lock().replies.push_back(MockReply::Text(response.into()));
    }

    /// Queue a reply that carries no text
    pub fn push_empty(&self) {
        self.lock().replies.push_back(MockReply::Empty);
    }

    /// Queue a failure
    pub fn push_error(&self, error: LlmError) {
        self.lock().replies.push_back(MockReply::Error(error));
    }

    /// Number of prompts sent across all sessions
    pub fn call_count(&self) -> usize {
        self.lock().sent.len()
    }

    /// Number of sessions opened
    pub fn session_count(&self) -> usize {
        self.lock().sessions.len()
    }

    /// Configurations of every opened session, in order
    pub fn sessions(&self) -> Vec<SessionConfig> {
        self.lock().sessions.clone()
    }

    /// Every prompt received, in order
    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.lock().sent.clone()
    }

    /// Most recent prompt, if any
    pub fn last_prompt(&self) -> Option<String> {
        self.lock().sent.last().map(|message| message.prompt.clone())
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl ChatProvider for MockProvider {
    type Session = MockSession;

    fn open_session(&self, config: &SessionConfig) -> Self::Session {
        let mut state = self.lock();
        state.sessions.push(config.clone());
        MockSession {
            index: state.sessions.len() - 1,
            provider: self.clone(),
        }
    }
}

/// Session handed out by [`MockProvider`]
#[derive(Debug)]
pub struct MockSession {
    index: usize,
    provider: MockProvider,
}

impl MockSession {
    /// Opening-order index of this session
    pub fn index(&self) -> usize {
        self.index
    }
}

#[async_trait]
impl ChatSession for MockSession {
    async fn send_message(&self, message: &str) -> Result<Option<String>, LlmError> {
        let (reply, latency) = {
            let mut state = self.provider.lock();
            state.sent.push(SentMessage {
                session: self.index,
                prompt: message.to_string(),
            });
            let reply = state
                .replies
                .pop_front()
                .unwrap_or_else(|| MockReply::Text(state.default_response.clone()));
            (reply, state.latency)
        };

        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        match reply {
            MockReply::Text(text) => Ok(Some(text)),
            MockReply::Empty => Ok(None),
            MockReply::Error(error) => Err(error),
        }
    }
}
