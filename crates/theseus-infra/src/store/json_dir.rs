//! JSON-directory implementation of the SessionStore trait.
//!
//! Directory structure:
//! ```text
//! sessions/
//! ├── chat_20260806_091500.json
//! └── chat_20260807_143005.json
//! ```
//!
//! Each file holds the session's ordered message sequence as a
//! pretty-printed JSON array of `{role, content}` objects: human-readable
//! and hand-editable. Saves go through a temp file plus rename in the same
//! directory, so a concurrent reader never observes a partial file. There
//! is no locking; a single process with a single active editor is assumed.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::fs;
use tracing::warn;

use theseus_core::session::store::{session_label, SessionStore};
use theseus_types::chat::{Message, SessionId, SessionSummary, SESSION_EXTENSION};
use theseus_types::error::StoreError;

pub struct JsonDirSessionStore {
    dir: PathBuf,
}

impl JsonDirSessionStore {
    /// Open (creating if needed) a session store rooted at `dir`.
    ///
    /// Fails with `StoreError::Storage` when the directory cannot be
    /// created, which also catches an unwritable storage location early.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    /// The directory session files live in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &SessionId) -> PathBuf {
        self.dir.join(id.file_name())
    }

    async fn read_messages(&self, id: &SessionId) -> Result<Vec<Message>, StoreError> {
        let path = self.path_for(id);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.clone()));
            }
            Err(err) => return Err(StoreError::Storage(err)),
        };

        serde_json::from_str(&content).map_err(|err| StoreError::Corrupt {
            id: id.clone(),
            reason: err.to_string(),
        })
    }

    async fn write_messages(&self, id: &SessionId, messages: &[Message]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(messages)
            .map_err(|err| StoreError::Storage(std::io::Error::other(err)))?;

        // Temp file in the same directory so the rename stays on one
        // filesystem and is atomic.
        let final_path = self.path_for(id);
        let tmp_path = self.dir.join(format!("{}.tmp", id.file_name()));
        fs::write(&tmp_path, &json).await?;
        fs::rename(&tmp_path, &final_path).await?;
        Ok(())
    }
}

impl SessionStore for JsonDirSessionStore {
    async fn create_session(&self) -> Result<SessionId, StoreError> {
        let id = SessionId::from_timestamp(Local::now().naive_local());
        self.write_messages(&id, &[]).await?;
        Ok(id)
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, StoreError> {
        let mut entries = fs::read_dir(&self.dir).await?;
        let mut ids = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(OsStr::to_str) != Some(SESSION_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(OsStr::to_str) else {
                continue;
            };
            // Foreign files in the directory are ignored, not errors.
            if let Some(id) = SessionId::from_file_stem(stem) {
                ids.push(id);
            }
        }

        // Identifier descending == chronological descending.
        ids.sort_by(|a, b| b.cmp(a));

        let mut summaries = Vec::with_capacity(ids.len());
        for id in ids {
            match self.read_messages(&id).await {
                Ok(messages) => summaries.push(SessionSummary {
                    label: session_label(&messages),
                    message_count: messages.len(),
                    id,
                }),
                Err(err) => {
                    // A corrupt or unreadable file loses its label, never
                    // its row in the listing.
                    warn!(session = %id, error = %err, "could not derive session label");
                    summaries.push(SessionSummary {
                        id,
                        label: None,
                        message_count: 0,
                    });
                }
            }
        }

        Ok(summaries)
    }

    async fn load_session(&self, id: &SessionId) -> Result<Vec<Message>, StoreError> {
        self.read_messages(id).await
    }

    async fn save_session(&self, id: &SessionId, messages: &[Message]) -> Result<(), StoreError> {
        self.write_messages(id, messages).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn id(stem: &str) -> SessionId {
        SessionId::from_file_stem(stem).unwrap()
    }

    async fn store(tmp: &TempDir) -> JsonDirSessionStore {
        JsonDirSessionStore::open(tmp.path().join("sessions"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_save_and_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp).await;
        let id = id("chat_20260807_120000");

        let messages = vec![
            Message::user("Hello"),
            Message::assistant("Hi there"),
            Message::user("And again"),
        ];
        store.save_session(&id, &messages).await.unwrap();

        let loaded = store.load_session(&id).await.unwrap();
        assert_eq!(loaded, messages);
    }

    #[tokio::test]
    async fn test_persisted_file_is_human_readable_json() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp).await;
        let id = id("chat_20260807_120000");

        store
            .save_session(&id, &[Message::user("Hello")])
            .await
            .unwrap();

        let raw = tokio::fs::read_to_string(store.dir().join("chat_20260807_120000.json"))
            .await
            .unwrap();
        assert!(raw.contains("\"role\": \"user\""));
        assert!(raw.contains("\"content\": \"Hello\""));
    }

    #[tokio::test]
    async fn test_save_leaves_no_temp_files() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp).await;
        let id = id("chat_20260807_120000");
        store.save_session(&id, &[Message::user("x")]).await.unwrap();

        let mut entries = tokio::fs::read_dir(store.dir()).await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        assert_eq!(names, vec!["chat_20260807_120000.json".to_string()]);
    }

    #[tokio::test]
    async fn test_create_session_persists_empty_file() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp).await;

        let id = store.create_session().await.unwrap();
        let loaded = store.load_session(&id).await.unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_list_sessions_most_recent_first() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp).await;

        for stem in [
            "chat_20260805_100000",
            "chat_20260807_090000",
            "chat_20260806_230000",
        ] {
            store.save_session(&id(stem), &[]).await.unwrap();
        }

        let sessions = store.list_sessions().await.unwrap();
        let order: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            order,
            vec![
                "chat_20260807_090000",
                "chat_20260806_230000",
                "chat_20260805_100000",
            ]
        );
    }

    #[tokio::test]
    async fn test_list_derives_labels_from_first_user_message() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp).await;

        store
            .save_session(
                &id("chat_20260807_090000"),
                &[
                    Message::user("How do op-amps saturate under rail limits?"),
                    Message::assistant("They clip at the rails."),
                ],
            )
            .await
            .unwrap();
        store
            .save_session(&id("chat_20260806_090000"), &[])
            .await
            .unwrap();

        let sessions = store.list_sessions().await.unwrap();
        assert_eq!(
            sessions[0].label.as_deref(),
            Some("How do op-amps saturate u...")
        );
        assert_eq!(sessions[0].message_count, 2);
        // No user message: label falls back to the identifier.
        assert_eq!(sessions[1].label, None);
        assert_eq!(sessions[1].display_label(), "chat_20260806_090000");
    }

    #[tokio::test]
    async fn test_corrupt_file_keeps_its_row_without_label() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp).await;

        store
            .save_session(&id("chat_20260807_090000"), &[Message::user("fine")])
            .await
            .unwrap();
        tokio::fs::write(
            store.dir().join("chat_20260806_090000.json"),
            "{not valid json",
        )
        .await
        .unwrap();

        let sessions = store.list_sessions().await.unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[1].id.as_str(), "chat_20260806_090000");
        assert_eq!(sessions[1].label, None);
    }

    #[tokio::test]
    async fn test_list_ignores_foreign_files() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp).await;

        store
            .save_session(&id("chat_20260807_090000"), &[])
            .await
            .unwrap();
        tokio::fs::write(store.dir().join("notes.txt"), "not a session")
            .await
            .unwrap();
        tokio::fs::write(store.dir().join("rogue.json"), "[]")
            .await
            .unwrap();

        let sessions = store.list_sessions().await.unwrap();
        assert_eq!(sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_load_missing_session_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp).await;

        let result = store.load_session(&id("chat_20260807_090000")).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_load_corrupt_session_is_corrupt_error() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp).await;

        tokio::fs::write(store.dir().join("chat_20260807_090000.json"), "oops")
            .await
            .unwrap();

        let result = store.load_session(&id("chat_20260807_090000")).await;
        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_contents() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp).await;
        let id = id("chat_20260807_090000");

        store.save_session(&id, &[Message::user("one")]).await.unwrap();
        store
            .save_session(&id, &[Message::user("one"), Message::assistant("two")])
            .await
            .unwrap();

        let loaded = store.load_session(&id).await.unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[tokio::test]
    async fn test_open_unwritable_location_fails_with_storage_error() {
        // A path under a regular file cannot be created as a directory.
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        tokio::fs::write(&blocker, "file").await.unwrap();

        let result = JsonDirSessionStore::open(blocker.join("sessions")).await;
        assert!(matches!(result, Err(StoreError::Storage(_))));
    }
}
