//! Session lifecycle: the store seam, label derivation, and boot policy.

pub mod state;
pub mod store;

pub use state::{boot, SessionState};
pub use store::{session_label, SessionStore, LABEL_MAX_CHARS};
