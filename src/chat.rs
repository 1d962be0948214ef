//! # Chat/Analysis Boundary
//!
//! Policy layer for the music-theory chat collaborator. The HTTP hop itself
//! belongs to the host application; this module owns everything the core is
//! responsible for:
//!
//! - the request/response wire shapes (serde, camelCase)
//! - the upstream chat-completion payload, including the system prompt
//! - gating on the API credential: a missing secret produces an explicit
//!   "service unavailable" failure instead of an unauthenticated call
//! - interpreting the upstream reply: any non-2xx status or missing field is
//!   a recoverable [`ClavierError::UpstreamError`], never an uncaught fault
//! - the single apologetic fallback message appended to the conversation
//!   when a chat request fails

use serde::{Deserialize, Serialize};

use crate::error::ClavierError;

/// Environment variable holding the LLM API credential.
pub const API_KEY_ENV: &str = "NEBIUS_API_KEY";

const SYSTEM_PROMPT: &str = "You are a helpful music theory assistant. Help users \
understand music concepts, chord progressions, and sheet music analysis.";

/// A chat request from the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    /// Raw MusicXML of the currently loaded score, when one is loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Chord symbol the user clicked, when the request came from the chord list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chord_hint: Option<String>,
}

impl ChatRequest {
    /// The question sent when the user clicks a chord chip.
    pub fn for_chord(chord: &str, context: Option<String>) -> Self {
        ChatRequest {
            message: format!(
                "How do I play the chord {}? Tell me the notes and how to \
                 position my fingers on a piano keyboard.",
                chord
            ),
            context,
            chord_hint: Some(chord.to_string()),
        }
    }

    /// An empty or blank message is rejected before anything is sent upstream.
    pub fn validate(&self) -> Result<(), ClavierError> {
        if self.message.trim().is_empty() {
            return Err(ClavierError::UpstreamError("Message is required".to_string()));
        }
        Ok(())
    }
}

/// One message in the upstream chat-completion payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamMessage {
    pub role: String,
    pub content: String,
}

/// The payload posted to the upstream chat-completion endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct UpstreamRequest {
    pub model: String,
    pub messages: Vec<UpstreamMessage>,
    pub temperature: f64,
}

#[derive(Debug, Deserialize)]
struct UpstreamChoice {
    message: Option<UpstreamMessage>,
}

#[derive(Debug, Deserialize)]
struct UpstreamResponse {
    #[serde(default)]
    choices: Vec<UpstreamChoice>,
}

/// Credential configuration, read from the process environment.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_key: String,
}

impl ChatConfig {
    /// Read the required API credential.
    ///
    /// Absence is an explicit service-unavailable condition; the caller must
    /// surface it rather than attempt an unauthenticated call.
    pub fn from_env() -> Result<Self, ClavierError> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(ChatConfig { api_key: key }),
            _ => Err(ClavierError::UpstreamError("API key not configured".to_string())),
        }
    }
}

/// Build the upstream chat-completion payload for a validated request.
pub fn build_upstream_request(request: &ChatRequest, model: &str) -> UpstreamRequest {
    let mut content = request.message.clone();
    if let Some(context) = &request.context {
        if !context.is_empty() {
            content = format!("{}\n\nCurrent sheet music (MusicXML):\n{}", content, context);
        }
    }
    UpstreamRequest {
        model: model.to_string(),
        messages: vec![
            UpstreamMessage {
                role: "system".to_string(),
                content: SYSTEM_PROMPT.to_string(),
            },
            UpstreamMessage {
                role: "user".to_string(),
                content,
            },
        ],
        temperature: 0.7,
    }
}

/// Interpret an upstream reply.
///
/// Any non-2xx status or a body without `choices[0].message.content` is a
/// recoverable [`ClavierError::UpstreamError`].
///
/// # Example
/// ```
/// use clavier::chat::interpret_response;
///
/// let body = r#"{"choices":[{"message":{"role":"assistant","content":"A triad."}}]}"#;
/// assert_eq!(interpret_response(200, body).unwrap(), "A triad.");
/// assert!(interpret_response(503, body).is_err());
/// ```
pub fn interpret_response(status: u16, body: &str) -> Result<String, ClavierError> {
    if !(200..300).contains(&status) {
        return Err(ClavierError::UpstreamError(format!(
            "Failed to get response from API (status {})",
            status
        )));
    }

    let parsed: UpstreamResponse = serde_json::from_str(body)
        .map_err(|_| ClavierError::UpstreamError("Invalid response format from API".to_string()))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .map(|message| message.content)
        .filter(|content| !content.is_empty())
        .ok_or_else(|| ClavierError::UpstreamError("Invalid response format from API".to_string()))
}

/// The assistant-role entry appended to the conversation when a request
/// fails. The rest of the log stays intact; nothing is retried.
pub fn fallback_message(error: &ClavierError) -> String {
    format!("Sorry, I encountered an error: {}", error)
}
