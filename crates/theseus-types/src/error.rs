use thiserror::Error;

use crate::chat::SessionId;

/// Errors from session store operations.
///
/// `Storage` aborts the operation and is reported to the user; `NotFound`
/// and `Corrupt` fail an explicit load but only degrade a listing (the
/// session keeps its row, losing only its label).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session not found: {0}")]
    NotFound(SessionId),

    #[error("corrupt session file {id}: {reason}")]
    Corrupt { id: SessionId, reason: String },

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_store_error_display() {
        let id = SessionId::from_timestamp(
            NaiveDate::from_ymd_opt(2026, 8, 7)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        );
        let err = StoreError::Corrupt {
            id,
            reason: "expected value at line 1".to_string(),
        };
        assert!(err.to_string().contains("chat_20260807_120000"));
        assert!(err.to_string().contains("line 1"));
    }
}
