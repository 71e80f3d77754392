//! Wire types for the native Ollama chat API.
//!
//! Shapes follow `POST /api/chat`: a role-tagged message list with optional
//! base64 image attachments per message, and newline-delimited JSON chunks
//! in streaming mode. The final chunk carries `done: true` plus prompt/eval
//! token counts.

use base64::Engine;
use serde::{Deserialize, Serialize};

use theseus_types::llm::{ChatRequest, RequestMessage};

#[derive(Debug, Serialize)]
pub(crate) struct OllamaChatRequest {
    pub model: String,
    pub messages: Vec<OllamaMessage>,
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct OllamaMessage {
    pub role: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

impl From<&RequestMessage> for OllamaMessage {
    fn from(msg: &RequestMessage) -> Self {
        let images = if msg.images.is_empty() {
            None
        } else {
            Some(
                msg.images
                    .iter()
                    .map(|bytes| base64::engine::general_purpose::STANDARD.encode(bytes))
                    .collect(),
            )
        };
        Self {
            role: msg.role.to_string(),
            content: msg.content.clone(),
            images,
        }
    }
}

impl OllamaChatRequest {
    pub fn from_request(request: &ChatRequest, stream: bool) -> Self {
        Self {
            model: request.model.clone(),
            messages: request.messages.iter().map(OllamaMessage::from).collect(),
            stream,
        }
    }
}

/// One response chunk. Non-streaming responses use the same shape with
/// `done: true` and the full content in a single message.
#[derive(Debug, Deserialize)]
pub(crate) struct OllamaChatChunk {
    #[serde(default)]
    pub message: Option<OllamaChunkMessage>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub prompt_eval_count: Option<u32>,
    #[serde(default)]
    pub eval_count: Option<u32>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OllamaChunkMessage {
    pub content: String,
}

/// Response from `/api/tags` (installed models).
#[derive(Debug, Deserialize)]
pub(crate) struct OllamaTagsResponse {
    pub models: Vec<OllamaModelTag>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OllamaModelTag {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use theseus_types::llm::MessageRole;

    #[test]
    fn test_request_serializes_with_system() {
        let request = ChatRequest {
            model: "gemma2:27b".to_string(),
            messages: vec![
                RequestMessage::new(MessageRole::System, "profile"),
                RequestMessage::new(MessageRole::User, "hello"),
            ],
        };
        let wire = OllamaChatRequest::from_request(&request, true);
        let json = serde_json::to_string(&wire).unwrap();
        assert!(json.contains("\"stream\":true"));
        assert!(json.contains("gemma2:27b"));
        assert!(json.contains("\"role\":\"system\""));
        // No image attachments: the field is omitted entirely.
        assert!(!json.contains("images"));
    }

    #[test]
    fn test_request_encodes_images_as_base64() {
        let request = ChatRequest {
            model: "llava".to_string(),
            messages: vec![
                RequestMessage::new(MessageRole::User, "what is this?")
                    .with_image(vec![1, 2, 3, 4]),
            ],
        };
        let wire = OllamaChatRequest::from_request(&request, false);
        let json = serde_json::to_string(&wire).unwrap();
        assert!(json.contains("\"images\":[\"AQIDBA==\"]"));
        assert!(json.contains("\"stream\":false"));
    }

    #[test]
    fn test_chunk_deserializes() {
        let json = r#"{"model":"gemma2:27b","message":{"role":"assistant","content":"Hi"},"done":false}"#;
        let chunk: OllamaChatChunk = serde_json::from_str(json).unwrap();
        assert_eq!(chunk.message.unwrap().content, "Hi");
        assert!(!chunk.done);
        assert!(chunk.error.is_none());
    }

    #[test]
    fn test_final_chunk_carries_token_counts() {
        let json = r#"{"model":"gemma2:27b","message":{"role":"assistant","content":""},"done":true,"done_reason":"stop","prompt_eval_count":26,"eval_count":298}"#;
        let chunk: OllamaChatChunk = serde_json::from_str(json).unwrap();
        assert!(chunk.done);
        assert_eq!(chunk.prompt_eval_count, Some(26));
        assert_eq!(chunk.eval_count, Some(298));
    }

    #[test]
    fn test_tags_response_deserializes() {
        let json = r#"{"models":[{"name":"gemma2:27b","size":15628387458},{"name":"llava:latest"}]}"#;
        let tags: OllamaTagsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(tags.models.len(), 2);
        assert_eq!(tags.models[0].name, "gemma2:27b");
    }
}
