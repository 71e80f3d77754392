//! Chat orchestrator: appends, persists, assembles context, dispatches.
//!
//! A turn moves through `Idle -> UserAppended(persisted) -> Dispatching ->
//! {Completed(persisted) | Failed}`. The user message is persisted before
//! dispatch, so a backend failure (or a crash) never loses user input; on
//! failure no assistant message is appended and no retry is attempted.

use futures_util::StreamExt;
use tracing::debug;

use theseus_types::chat::Message;
use theseus_types::context::ContextBlob;
use theseus_types::error::StoreError;
use theseus_types::llm::{
    BackendError, ChatRequest, MessageRole, ModelProfile, RequestMessage, StreamEvent, TokenUsage,
};

use crate::llm::provider::ChatBackend;
use crate::session::state::SessionState;
use crate::session::store::SessionStore;

/// Number of trailing session messages included in a request.
///
/// Bounds request size without token-aware accounting; an explicit, simple
/// windowing policy.
pub const CONTEXT_WINDOW: usize = 10;

/// Errors from a chat turn.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Result of a completed turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub response: String,
    pub usage: Option<TokenUsage>,
}

/// The trailing window of a message sequence, in original order.
pub fn context_window(messages: &[Message], window: usize) -> &[Message] {
    let start = messages.len().saturating_sub(window);
    &messages[start..]
}

/// Orchestrates chat turns over a session store and a model backend.
pub struct ChatOrchestrator<S: SessionStore, B: ChatBackend> {
    store: S,
    backend: B,
    system_profile: String,
}

impl<S: SessionStore, B: ChatBackend> ChatOrchestrator<S, B> {
    pub fn new(store: S, backend: B, system_profile: String) -> Self {
        Self {
            store,
            backend,
            system_profile,
        }
    }

    /// Access the session store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Access the model backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run one chat turn.
    ///
    /// Appends the user message and persists it, dispatches to the backend
    /// (streaming, or single-shot for an image turn on a vision model),
    /// feeds each response chunk to `on_delta`, then appends and persists
    /// the assistant message. On dispatch failure the session keeps the
    /// user message and gains nothing else.
    pub async fn submit_turn(
        &self,
        state: &mut SessionState,
        user_text: &str,
        context: Option<&ContextBlob>,
        model: &ModelProfile,
        mut on_delta: impl FnMut(&str),
    ) -> Result<TurnOutcome, TurnError> {
        state.messages.push(Message::user(user_text));
        self.store.save_session(&state.id, &state.messages).await?;

        let outcome = match (context, model.supports_images()) {
            // Vision turn: only the immediate prompt and the image bytes.
            // System profile, document context, and history are deliberately
            // absent from this branch.
            (Some(ContextBlob::Image(bytes)), true) => {
                debug!(model = %model.name, "dispatching single-shot image request");
                let request = ChatRequest {
                    model: model.name.clone(),
                    messages: vec![
                        RequestMessage::new(MessageRole::User, user_text)
                            .with_image(bytes.clone()),
                    ],
                };
                let response = self.backend.complete(&request).await?;
                on_delta(&response.content);
                TurnOutcome {
                    response: response.content,
                    usage: response.usage,
                }
            }
            _ => {
                let request = self.build_text_request(state, context, model);
                debug!(
                    model = %model.name,
                    messages = request.messages.len(),
                    "dispatching streaming request"
                );
                let mut stream = self.backend.stream(request);

                let mut full_response = String::new();
                let mut usage = None;
                while let Some(event) = stream.next().await {
                    match event? {
                        StreamEvent::TextDelta { text } => {
                            on_delta(&text);
                            full_response.push_str(&text);
                        }
                        StreamEvent::Usage(u) => usage = Some(u),
                        StreamEvent::Done => break,
                        StreamEvent::Connected => {}
                    }
                }
                TurnOutcome {
                    response: full_response,
                    usage,
                }
            }
        };

        state.messages.push(Message::assistant(outcome.response.clone()));
        self.store.save_session(&state.id, &state.messages).await?;
        Ok(outcome)
    }

    /// Assemble the request for a streamed text turn: the system profile,
    /// the document context verbatim (when text context is attached), then
    /// the trailing window of the session. An image context on a non-vision
    /// model contributes nothing here.
    fn build_text_request(
        &self,
        state: &SessionState,
        context: Option<&ContextBlob>,
        model: &ModelProfile,
    ) -> ChatRequest {
        let window = context_window(&state.messages, CONTEXT_WINDOW);
        let mut messages = Vec::with_capacity(window.len() + 2);

        messages.push(RequestMessage::new(
            MessageRole::System,
            self.system_profile.clone(),
        ));
        if let Some(text) = context.and_then(ContextBlob::as_text) {
            messages.push(RequestMessage::new(MessageRole::System, text));
        }
        messages.extend(window.iter().map(RequestMessage::from));

        ChatRequest {
            model: model.name.clone(),
            messages,
        }
    }
}
