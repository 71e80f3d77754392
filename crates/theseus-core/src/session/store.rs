//! SessionStore trait definition and session label derivation.
//!
//! Provides persistence operations for chat sessions. Follows the RPITIT
//! pattern used by the other trait seams; implementations live in
//! `theseus-infra` (e.g., `JsonDirSessionStore`).

use theseus_types::chat::{Message, MessageRole, SessionId, SessionSummary};
use theseus_types::error::StoreError;

/// Maximum label length derived from the first user message.
pub const LABEL_MAX_CHARS: usize = 25;

/// Repository trait for session persistence.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait SessionStore: Send + Sync {
    /// Create a new empty session with a timestamp-derived identifier and
    /// persist it. Fails with `StoreError::Storage` when the storage
    /// location is not writable.
    fn create_session(
        &self,
    ) -> impl std::future::Future<Output = Result<SessionId, StoreError>> + Send;

    /// List all known sessions, most recent first (identifier descending).
    ///
    /// Labels are best-effort: a corrupt or unreadable session file loses
    /// its label, never its row.
    fn list_sessions(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<SessionSummary>, StoreError>> + Send;

    /// Load the ordered message sequence for a session.
    fn load_session(
        &self,
        id: &SessionId,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, StoreError>> + Send;

    /// Overwrite the persisted messages for a session atomically (a
    /// concurrent reader never observes a partially written file).
    fn save_session(
        &self,
        id: &SessionId,
        messages: &[Message],
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}

/// Derive a display label from a message sequence.
///
/// The label is the first user message's content, truncated to
/// [`LABEL_MAX_CHARS`] characters with a trailing ellipsis when the content
/// is longer. Returns `None` when no user message exists; callers fall back
/// to the raw identifier.
pub fn session_label(messages: &[Message]) -> Option<String> {
    let first_user = messages.iter().find(|m| m.role == MessageRole::User)?;
    let content = first_user.content.as_str();

    if content.chars().count() <= LABEL_MAX_CHARS {
        return Some(content.to_string());
    }
    let truncated: String = content.chars().take(LABEL_MAX_CHARS).collect();
    Some(format!("{truncated}..."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_short_content_verbatim() {
        let messages = vec![Message::user("Hi")];
        assert_eq!(session_label(&messages), Some("Hi".to_string()));
    }

    #[test]
    fn test_label_exactly_at_limit_no_ellipsis() {
        let content = "a".repeat(LABEL_MAX_CHARS);
        let messages = vec![Message::user(content.clone())];
        assert_eq!(session_label(&messages), Some(content));
    }

    #[test]
    fn test_label_long_content_truncated_with_ellipsis() {
        let messages = vec![Message::user(
            "Explain the Thevenin equivalent of this circuit",
        )];
        let label = session_label(&messages).unwrap();
        assert_eq!(label, "Explain the Thevenin equi...");
        assert_eq!(label.chars().count(), LABEL_MAX_CHARS + 3);
    }

    #[test]
    fn test_label_multibyte_content_truncates_on_char_boundary() {
        let messages = vec![Message::user("Ω".repeat(30))];
        let label = session_label(&messages).unwrap();
        assert_eq!(label, format!("{}...", "Ω".repeat(LABEL_MAX_CHARS)));
    }

    #[test]
    fn test_label_skips_non_user_messages() {
        let messages = vec![
            Message::system("profile"),
            Message::assistant("welcome"),
            Message::user("actual question"),
        ];
        assert_eq!(session_label(&messages), Some("actual question".to_string()));
    }

    #[test]
    fn test_label_none_without_user_message() {
        assert_eq!(session_label(&[]), None);
        assert_eq!(session_label(&[Message::assistant("hello")]), None);
    }
}
