//! ChatBackend trait definition.
//!
//! The abstraction over the local model runtime. Uses RPITIT for
//! `complete`; `stream` returns a boxed stream because streams need to be
//! object-safe for callers that hold the backend behind a generic.

use std::pin::Pin;

use futures_util::Stream;

use theseus_types::llm::{BackendError, ChatRequest, CompletionResponse, StreamEvent};

/// Trait for model backends (Ollama in production, fakes in tests).
///
/// Implementations live in `theseus-infra`.
pub trait ChatBackend: Send + Sync {
    /// Human-readable backend name (e.g., "ollama").
    fn name(&self) -> &str;

    /// Send a request and receive the full response in one shot.
    ///
    /// Request messages may carry inline image bytes; this is the call mode
    /// used for vision models.
    fn complete(
        &self,
        request: &ChatRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, BackendError>> + Send;

    /// Send a streaming request. Returns a finite, non-restartable stream
    /// of events; concatenating every `TextDelta` equals the full response.
    fn stream(
        &self,
        request: ChatRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, BackendError>> + Send + 'static>>;
}
