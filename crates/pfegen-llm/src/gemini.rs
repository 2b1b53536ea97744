//! Gemini Provider Implementation
//!
//! Talks to the Gemini `generateContent` REST endpoint.
//!
//! # Features
//!
//! - Async HTTP communication with the Gemini API
//! - Configurable endpoint (useful for proxies and tests)
//! - Multi-turn sessions: the REST API is stateless, so each session keeps
//!   its completed turns and resends them with every new message
//!
//! No retries and no client-side timeout: a failed turn is reported to the
//! caller as-is.
//!
//! # Examples
//!
//! ```no_run
//! use pfegen_llm::{ChatProvider, ChatSession, GeminiProvider, SessionConfig};
//!
//! # async fn example() -> Result<(), pfegen_llm::LlmError> {
//! let provider = GeminiProvider::new("my-api-key");
//! let session = provider.open_session(&SessionConfig::new(
//!     "gemini-3-flash-preview",
//!     0.5,
//!     "You write LaTeX.",
//! ));
//! let reply = session.send_message("Draft a title page").await?;
//! # Ok(())
//! # }
//! ```

use crate::{ChatProvider, ChatSession, LlmError, SessionConfig};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

/// Default Gemini API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini API provider
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a provider for the public Gemini endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Override the API endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Configured endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ChatProvider for GeminiProvider {
    type Session = GeminiSession;

    fn open_session(&self, config: &SessionConfig) -> Self::Session {
        GeminiSession {
            client: self.client.clone(),
            api_key: self.api_key.clone(),
            url: format!("{}/models/{}:generateContent", self.endpoint, config.model),
            model: config.model.clone(),
            system_instruction: config.system_instruction.clone(),
            temperature: config.temperature,
            history: Mutex::new(Vec::new()),
        }
    }
}

/// One conversation with Gemini
#[derive(Debug)]
pub struct GeminiSession {
    client: reqwest::Client,
    api_key: String,
    url: String,
    model: String,
    system_instruction: String,
    temperature: f32,
    history: Mutex<Vec<Content>>,
}

impl GeminiSession {
    /// Number of completed turns (user + model messages) kept as context
    pub async fn history_len(&self) -> usize {
        self.history.lock().await.len()
    }
}

#[async_trait]
impl ChatSession for GeminiSession {
    async fn send_message(&self, message: &str) -> Result<Option<String>, LlmError> {
        // Held for the whole turn so turns on one session never interleave
        let mut history = self.history.lock().await;

        let user_turn = Content::text("user", message);
        let request = build_request(
            &self.system_instruction,
            self.temperature,
            &history,
            &user_turn,
        );

        debug!(
            model = %self.model,
            turns = history.len(),
            prompt_chars = message.len(),
            "Sending Gemini request"
        );

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(map_http_error(status, &body, &self.model));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let text = extract_text(&parsed);
        if let Some(reply) = &text {
            history.push(user_turn);
            history.push(Content::text("model", reply.clone()));
        }

        Ok(text)
    }
}

/// Request body for the generateContent API
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content,
    contents: Vec<&'a Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: Some(role.to_string()),
            parts: vec![Part {
                text: Some(text.into()),
                thought: None,
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thought: Option<bool>,
}

/// Response from the generateContent API
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn build_request<'a>(
    system_instruction: &str,
    temperature: f32,
    history: &'a [Content],
    user_turn: &'a Content,
) -> GenerateContentRequest<'a> {
    let mut contents: Vec<&Content> = history.iter().collect();
    contents.push(user_turn);

    GenerateContentRequest {
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: Some(system_instruction.to_string()),
                thought: None,
            }],
        },
        contents,
        generation_config: GenerationConfig { temperature },
    }
}

/// Concatenate the text parts of the first candidate, skipping thoughts
fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    let content = response.candidates.first()?.content.as_ref()?;
    let texts: Vec<&str> = content
        .parts
        .iter()
        .filter(|part| part.thought != Some(true))
        .filter_map(|part| part.text.as_deref())
        .collect();

    if texts.is_empty() {
        None
    } else {
        Some(texts.concat())
    }
}

fn map_http_error(status: StatusCode, body: &str, model: &str) -> LlmError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .map(|wrapper| {
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            match wrapper.error.status {
                Some(status_text) if !status_text.is_empty() => format!("{}: {}", status_text, msg),
                _ => msg,
            }
        })
        .unwrap_or_else(|| body.to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Authentication(message),
        StatusCode::BAD_REQUEST if message.contains("API key") => LlmError::Authentication(message),
        StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(model.to_string()),
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded(message),
        _ => LlmError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_config() -> SessionConfig {
        SessionConfig::new("gemini-3-flash-preview", 0.5, "You write LaTeX.")
    }

    #[test]
    fn test_gemini_provider_creation() {
        let provider = GeminiProvider::new("key");
        assert_eq!(provider.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(provider.api_key, "key");
    }

    #[test]
    fn test_gemini_provider_with_endpoint_trims_slash() {
        let provider = GeminiProvider::new("key").with_endpoint("http://localhost:8089/v1beta/");
        assert_eq!(provider.endpoint(), "http://localhost:8089/v1beta");
    }

    #[test]
    fn test_session_url_includes_model() {
        let provider = GeminiProvider::new("key");
        let session = provider.open_session(&session_config());
        assert_eq!(
            session.url,
            format!("{}/models/gemini-3-flash-preview:generateContent", DEFAULT_ENDPOINT)
        );
        assert_eq!(session.temperature, 0.5);
    }

    #[test]
    fn test_request_serialization() {
        let history = vec![
            Content::text("user", "first"),
            Content::text("model", "reply"),
        ];
        let turn = Content::text("user", "second");
        let request = build_request("system text", 0.5, &history, &turn);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "system text");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["generationConfig"]["temperature"], 0.5);
        assert_eq!(json["contents"].as_array().unwrap().len(), 3);
        assert_eq!(json["contents"][1]["role"], "model");
        assert_eq!(json["contents"][2]["parts"][0]["text"], "second");
    }

    #[test]
    fn test_extract_text_concatenates_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[
                {"text":"thinking...","thought":true},
                {"text":"Hello "},
                {"text":"world"}
            ]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(&response).as_deref(), Some("Hello world"));
    }

    #[test]
    fn test_extract_text_missing() {
        let empty: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(extract_text(&empty), None);

        let no_content: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert_eq!(extract_text(&no_content), None);

        let no_candidates: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(extract_text(&no_candidates), None);
    }

    #[test]
    fn test_map_http_error() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(
            map_http_error(StatusCode::TOO_MANY_REQUESTS, body, "m"),
            LlmError::RateLimitExceeded("RESOURCE_EXHAUSTED: Quota exceeded".to_string())
        );

        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        assert!(matches!(
            map_http_error(StatusCode::BAD_REQUEST, body, "m"),
            LlmError::Authentication(_)
        ));

        assert_eq!(
            map_http_error(StatusCode::NOT_FOUND, "", "gemini-x"),
            LlmError::ModelNotAvailable("gemini-x".to_string())
        );

        assert_eq!(
            map_http_error(StatusCode::BAD_GATEWAY, "upstream down", "m"),
            LlmError::Api {
                status: 502,
                message: "upstream down".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_gemini_error_handling() {
        // Nothing listens on port 9 locally
        let provider = GeminiProvider::new("key").with_endpoint("http://127.0.0.1:9/v1beta");
        let session = provider.open_session(&session_config());

        let result = session.send_message("test").await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
        // A failed turn is not recorded
        assert_eq!(session.history_len().await, 0);
    }

    // Integration test (requires GEMINI_API_KEY and network access)
    #[tokio::test]
    #[ignore]
    async fn test_gemini_multi_turn_integration() {
        let Ok(api_key) = std::env::var("GEMINI_API_KEY") else {
            return;
        };
        let provider = GeminiProvider::new(api_key);
        let session = provider.open_session(&session_config());

        let first = session.send_message("Remember the word 'ENSAO'. Reply OK.").await.unwrap();
        assert!(first.is_some());
        let second = session.send_message("Which word did I ask you to remember?").await.unwrap();
        assert!(second.unwrap_or_default().contains("ENSAO"));
        assert_eq!(session.history_len().await, 4);
    }
}
