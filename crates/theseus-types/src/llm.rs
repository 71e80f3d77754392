//! Model backend request/response types for Theseus.
//!
//! These types model the data shapes for backend interactions: role-tagged
//! message sequences, single-shot completions, streaming events, and the
//! backend error taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A message as sent to the backend.
///
/// Unlike the persisted [`crate::chat::Message`], a request message may
/// carry inline image bytes for vision-capable models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMessage {
    pub role: MessageRole,
    pub content: String,
    /// Raw encoded image bytes attached to this message, if any.
    /// Encoding to the wire format (base64) happens in the backend.
    pub images: Vec<Vec<u8>>,
}

impl RequestMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            images: Vec::new(),
        }
    }

    /// Attach raw image bytes to this message.
    pub fn with_image(mut self, bytes: Vec<u8>) -> Self {
        self.images.push(bytes);
        self
    }
}

impl From<&crate::chat::Message> for RequestMessage {
    fn from(msg: &crate::chat::Message) -> Self {
        Self::new(msg.role, msg.content.clone())
    }
}

/// A request to the model backend.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<RequestMessage>,
}

/// Response from the backend for a non-streaming completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    pub usage: Option<TokenUsage>,
}

/// Token counts reported by the backend for one completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Events emitted during a streaming backend response.
///
/// The sequence is finite and not restartable; concatenating every
/// `TextDelta` yields the full response text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Connection established with the backend.
    Connected,

    /// A chunk of response text.
    TextDelta { text: String },

    /// Token usage information (typically arrives with the final chunk).
    Usage(TokenUsage),

    /// The stream has completed.
    Done,
}

/// Errors from model backend operations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("backend not reachable at {0} (is `ollama serve` running?)")]
    ServerUnavailable(String),

    #[error("model '{0}' not found (pull it with: ollama pull {0})")]
    ModelNotFound(String),
}

/// Input modality a model accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Text in, text out.
    Text,
    /// Accepts inline image bytes alongside text.
    Vision,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Text => write!(f, "text"),
            ModelKind::Vision => write!(f, "vision"),
        }
    }
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ModelKind::Text),
            "vision" => Ok(ModelKind::Vision),
            other => Err(format!("invalid model kind: '{other}'")),
        }
    }
}

/// A selectable model: its backend name plus what it accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelProfile {
    pub name: String,
    pub kind: ModelKind,
}

impl ModelProfile {
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ModelKind::Text,
        }
    }

    pub fn vision(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ModelKind::Vision,
        }
    }

    /// Whether this model accepts inline image input.
    pub fn supports_images(&self) -> bool {
        self.kind == ModelKind::Vision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_roundtrip() {
        for role in [MessageRole::System, MessageRole::User, MessageRole::Assistant] {
            let s = role.to_string();
            let parsed: MessageRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_message_role_serde() {
        let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        let parsed: MessageRole = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, MessageRole::Assistant);
    }

    #[test]
    fn test_model_kind_roundtrip() {
        for kind in [ModelKind::Text, ModelKind::Vision] {
            let s = kind.to_string();
            let parsed: ModelKind = s.parse().unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn test_model_profile_supports_images() {
        assert!(!ModelProfile::text("gemma2:27b").supports_images());
        assert!(ModelProfile::vision("llava").supports_images());
    }

    #[test]
    fn test_request_message_from_persisted() {
        let msg = crate::chat::Message::user("Hello");
        let req = RequestMessage::from(&msg);
        assert_eq!(req.role, MessageRole::User);
        assert_eq!(req.content, "Hello");
        assert!(req.images.is_empty());
    }

    #[test]
    fn test_request_message_with_image() {
        let req = RequestMessage::new(MessageRole::User, "what is this?")
            .with_image(vec![0x89, 0x50, 0x4e, 0x47]);
        assert_eq!(req.images.len(), 1);
    }

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::ModelNotFound("llava".to_string());
        assert!(err.to_string().contains("ollama pull llava"));
    }
}
