//! Chat session and message types for Theseus.
//!
//! A session is an ordered sequence of messages identified by a
//! timestamp-derived [`SessionId`]. Sessions are persisted one file per
//! session; insertion order is conversation order.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

// Re-export MessageRole from the llm module (it's used in both chat and llm contexts).
pub use crate::llm::MessageRole;

/// Filename prefix for persisted sessions.
const SESSION_PREFIX: &str = "chat_";

/// Timestamp layout embedded in a session identifier.
const SESSION_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// File extension for persisted sessions.
pub const SESSION_EXTENSION: &str = "json";

/// A single message within a chat session.
///
/// Immutable once appended. Serialized with exactly the attribute names
/// `role` and `content` so session files stay hand-editable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Build an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }

    /// Build a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }
}

/// Identifier of a persisted chat session.
///
/// Derived from the creation timestamp with the fixed pattern
/// `chat_%Y%m%d_%H%M%S`, so lexicographic order on identifiers equals
/// chronological order. Whole-second resolution is sufficient for
/// uniqueness under single-user sequential use.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Derive an identifier from a creation timestamp.
    pub fn from_timestamp(ts: NaiveDateTime) -> Self {
        Self(format!(
            "{SESSION_PREFIX}{}",
            ts.format(SESSION_TIMESTAMP_FORMAT)
        ))
    }

    /// Parse an identifier from a file stem (the filename without extension).
    ///
    /// Returns `None` for files that don't follow the session naming
    /// pattern, so foreign files in the sessions directory are ignored
    /// rather than misread.
    pub fn from_file_stem(stem: &str) -> Option<Self> {
        let ts = stem.strip_prefix(SESSION_PREFIX)?;
        NaiveDateTime::parse_from_str(ts, SESSION_TIMESTAMP_FORMAT).ok()?;
        Some(Self(stem.to_string()))
    }

    /// The filename this session persists under.
    pub fn file_name(&self) -> String {
        format!("{}.{SESSION_EXTENSION}", self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SessionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_file_stem(s).ok_or_else(|| format!("invalid session identifier: '{s}'"))
    }
}

/// A session as it appears in a listing: identifier plus derived metadata.
///
/// The label is the first user message's content (truncated); it is `None`
/// when the session has no user message yet or its file could not be read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub label: Option<String>,
    pub message_count: usize,
}

impl SessionSummary {
    /// Label to display: the derived label, or the raw identifier.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(self.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_session_id_format() {
        let id = SessionId::from_timestamp(ts(2026, 8, 7, 14, 30, 5));
        assert_eq!(id.as_str(), "chat_20260807_143005");
        assert_eq!(id.file_name(), "chat_20260807_143005.json");
    }

    #[test]
    fn test_session_id_lexicographic_order_is_chronological() {
        let earlier = SessionId::from_timestamp(ts(2026, 8, 7, 9, 0, 0));
        let later = SessionId::from_timestamp(ts(2026, 8, 7, 10, 0, 0));
        let next_day = SessionId::from_timestamp(ts(2026, 8, 8, 0, 0, 0));
        assert!(earlier < later);
        assert!(later < next_day);
    }

    #[test]
    fn test_session_id_from_file_stem() {
        let id = SessionId::from_file_stem("chat_20260807_143005").unwrap();
        assert_eq!(id.as_str(), "chat_20260807_143005");

        assert!(SessionId::from_file_stem("notes").is_none());
        assert!(SessionId::from_file_stem("chat_garbage").is_none());
        assert!(SessionId::from_file_stem("chat_20261399_999999").is_none());
    }

    #[test]
    fn test_session_id_roundtrip() {
        let id = SessionId::from_timestamp(ts(2026, 1, 2, 3, 4, 5));
        let parsed: SessionId = id.as_str().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_message_serde_attribute_names() {
        let msg = Message::user("Hello");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"Hello"}"#);
        let parsed: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, msg);
    }

    #[test]
    fn test_summary_display_label_fallback() {
        let id = SessionId::from_timestamp(ts(2026, 8, 7, 14, 30, 5));
        let unlabeled = SessionSummary {
            id: id.clone(),
            label: None,
            message_count: 0,
        };
        assert_eq!(unlabeled.display_label(), "chat_20260807_143005");

        let labeled = SessionSummary {
            id,
            label: Some("Voltage dividers".to_string()),
            message_count: 4,
        };
        assert_eq!(labeled.display_label(), "Voltage dividers");
    }
}
