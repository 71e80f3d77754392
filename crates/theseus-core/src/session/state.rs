//! Explicit application state and the startup boot policy.
//!
//! The active session is a value passed to and returned from operations,
//! not process-global state.

use tracing::warn;

use theseus_types::chat::{Message, SessionId};
use theseus_types::error::StoreError;

use super::store::SessionStore;

/// The active session: its identifier and in-memory message sequence.
///
/// The message vector mirrors the persisted file; the orchestrator appends
/// to it and persists through the store on every mutation.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub id: SessionId,
    pub messages: Vec<Message>,
}

impl SessionState {
    /// A freshly created, empty session.
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            messages: Vec::new(),
        }
    }
}

/// Startup policy: resume the most recent session, or create one.
///
/// A deliberate default with no user prompt. When the most recent session
/// file turns out to be unreadable, a fresh session is created instead of
/// aborting startup.
pub async fn boot<S: SessionStore>(store: &S) -> Result<SessionState, StoreError> {
    let sessions = store.list_sessions().await?;

    if let Some(latest) = sessions.first() {
        match store.load_session(&latest.id).await {
            Ok(messages) => {
                return Ok(SessionState {
                    id: latest.id.clone(),
                    messages,
                });
            }
            Err(e @ (StoreError::Corrupt { .. } | StoreError::NotFound(_))) => {
                warn!(session = %latest.id, error = %e, "latest session unreadable, starting fresh");
            }
            Err(e) => return Err(e),
        }
    }

    let id = store.create_session().await?;
    Ok(SessionState::new(id))
}
