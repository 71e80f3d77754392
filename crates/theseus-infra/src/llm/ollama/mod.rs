//! Ollama backend implementation.
//!
//! Speaks the native Ollama chat API (`POST /api/chat`) over plain HTTP:
//! a single-shot mode for vision requests (image bytes ride as base64
//! attachments on a message) and a streaming mode that consumes
//! newline-delimited JSON chunks.

pub(crate) mod streaming;
pub(crate) mod types;

use std::pin::Pin;

use futures_util::{Stream, StreamExt};

use theseus_core::llm::provider::ChatBackend;
use theseus_types::llm::{BackendError, ChatRequest, CompletionResponse, StreamEvent, TokenUsage};

use self::streaming::ndjson_stream;
use self::types::{OllamaChatChunk, OllamaChatRequest, OllamaTagsResponse};

/// Default Ollama server URL.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

pub struct OllamaBackend {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaBackend {
    /// Create a backend talking to `base_url`.
    ///
    /// The HTTP client sets no request timeout: a hung model call blocks
    /// that turn until the server responds or drops the connection.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    /// Check that the server is running and the model is installed.
    ///
    /// Distinguishes "server not running" from "model not pulled" so the
    /// user gets an actionable message.
    pub async fn check_availability(&self, model: &str) -> Result<(), BackendError> {
        let tags_url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&tags_url)
            .send()
            .await
            .map_err(|_| BackendError::ServerUnavailable(self.base_url.clone()))?;

        if !response.status().is_success() {
            return Err(BackendError::ServerUnavailable(self.base_url.clone()));
        }

        let tags: OllamaTagsResponse = response
            .json()
            .await
            .map_err(|err| BackendError::Deserialization(err.to_string()))?;

        let base = model.split(':').next().unwrap_or(model);
        let found = tags
            .models
            .iter()
            .any(|m| m.name == model || m.name.starts_with(&format!("{base}:")));

        if !found {
            return Err(BackendError::ModelNotFound(model.to_string()));
        }
        Ok(())
    }

    fn map_transport_error(&self, err: reqwest::Error) -> BackendError {
        if err.is_connect() {
            BackendError::ServerUnavailable(self.base_url.clone())
        } else {
            BackendError::Provider {
                message: err.to_string(),
            }
        }
    }
}

/// Pass a successful response through; turn anything else into a backend
/// error, reading the body for the server's explanation.
async fn ensure_success(
    response: reqwest::Response,
    model: &str,
) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(BackendError::ModelNotFound(model.to_string()));
    }
    let body = response.text().await.unwrap_or_default();
    Err(BackendError::Provider {
        message: format!("{status}: {body}"),
    })
}

impl ChatBackend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<CompletionResponse, BackendError> {
        let wire = OllamaChatRequest::from_request(request, false);

        let response = self
            .client
            .post(self.chat_url())
            .json(&wire)
            .send()
            .await
            .map_err(|err| self.map_transport_error(err))?;

        let response = ensure_success(response, &request.model).await?;

        let chunk: OllamaChatChunk = response
            .json()
            .await
            .map_err(|err| BackendError::Deserialization(err.to_string()))?;

        if let Some(message) = chunk.error {
            return Err(BackendError::Provider { message });
        }

        let usage = match (chunk.prompt_eval_count, chunk.eval_count) {
            (Some(input), Some(output)) => Some(TokenUsage {
                input_tokens: input,
                output_tokens: output,
            }),
            _ => None,
        };

        Ok(CompletionResponse {
            content: chunk.message.map(|m| m.content).unwrap_or_default(),
            usage,
        })
    }

    fn stream(
        &self,
        request: ChatRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, BackendError>> + Send + 'static>> {
        let wire = OllamaChatRequest::from_request(&request, true);
        let client = self.client.clone();
        let url = self.chat_url();
        let base_url = self.base_url.clone();
        let model = request.model;

        Box::pin(async_stream::try_stream! {
            yield StreamEvent::Connected;

            let response = client
                .post(&url)
                .json(&wire)
                .send()
                .await
                .map_err(|err| {
                    if err.is_connect() {
                        BackendError::ServerUnavailable(base_url.clone())
                    } else {
                        BackendError::Provider { message: err.to_string() }
                    }
                })?;

            let response = ensure_success(response, &model).await?;

            let mut inner = ndjson_stream(response);
            while let Some(event) = inner.next().await {
                match event {
                    Ok(ev) => yield ev,
                    Err(e) => Err(e)?,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url_constant() {
        let backend = OllamaBackend::new(DEFAULT_OLLAMA_URL);
        assert_eq!(backend.base_url(), "http://localhost:11434");
        assert_eq!(backend.chat_url(), "http://localhost:11434/api/chat");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let backend = OllamaBackend::new("http://192.168.1.100:11434/");
        assert_eq!(backend.base_url(), "http://192.168.1.100:11434");
    }

    #[test]
    fn test_backend_name() {
        let backend = OllamaBackend::new(DEFAULT_OLLAMA_URL);
        assert_eq!(backend.name(), "ollama");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_server_unavailable() {
        // Nothing listens on this port; connection is refused immediately.
        let backend = OllamaBackend::new("http://127.0.0.1:9");
        let result = backend.check_availability("gemma2:27b").await;
        assert!(matches!(result, Err(BackendError::ServerUnavailable(_))));
    }
}
