//! Application state wiring the core to its infrastructure.
//!
//! The orchestrator and extractor are generic over trait seams; AppState
//! pins them to the concrete infra implementations.

use std::path::PathBuf;

use theseus_core::chat::ChatOrchestrator;
use theseus_infra::config::load_global_config;
use theseus_infra::extract::MediaExtractor;
use theseus_infra::llm::OllamaBackend;
use theseus_infra::paths::{resolve_data_dir, sessions_dir};
use theseus_infra::store::JsonDirSessionStore;
use theseus_types::config::GlobalConfig;

/// Concrete type alias for the orchestrator pinned to infra implementations.
pub type ConcreteOrchestrator = ChatOrchestrator<JsonDirSessionStore, OllamaBackend>;

/// Shared application state for all CLI commands.
pub struct AppState {
    pub orchestrator: ConcreteOrchestrator,
    pub extractor: MediaExtractor,
    pub config: GlobalConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: resolve paths, load config, open
    /// the session store, wire the backend.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_global_config(&data_dir).await;

        let store = JsonDirSessionStore::open(sessions_dir(&data_dir)).await?;
        let backend = OllamaBackend::new(&config.base_url);
        let orchestrator = ChatOrchestrator::new(store, backend, config.system_profile.clone());
        let extractor = MediaExtractor::new(config.max_upload_bytes);

        Ok(Self {
            orchestrator,
            extractor,
            config,
            data_dir,
        })
    }
}
