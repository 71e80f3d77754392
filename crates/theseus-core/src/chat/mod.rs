//! Chat turn orchestration.

pub mod orchestrator;

pub use orchestrator::{ChatOrchestrator, TurnError, TurnOutcome, CONTEXT_WINDOW};
