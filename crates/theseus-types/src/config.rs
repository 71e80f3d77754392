//! Global configuration shape for Theseus.
//!
//! Loaded from `config.toml` in the data directory; every field has a
//! default so a missing or partial file still yields a working setup.

use serde::{Deserialize, Serialize};

use crate::llm::{ModelKind, ModelProfile};

/// Fixed system profile sent as the leading system message of every text
/// turn when the config does not override it.
const DEFAULT_SYSTEM_PROFILE: &str =
    "You are a concise, technically precise assistant running on local hardware. \
     Provide detailed explanations and practical examples.";

/// Default Ollama endpoint.
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default upload size bound (32 MiB).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// One configured model: backend name plus the input modality it accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEntry {
    pub name: String,
    #[serde(default = "default_model_kind")]
    pub kind: ModelKind,
}

fn default_model_kind() -> ModelKind {
    ModelKind::Text
}

impl From<&ModelEntry> for ModelProfile {
    fn from(entry: &ModelEntry) -> Self {
        ModelProfile {
            name: entry.name.clone(),
            kind: entry.kind,
        }
    }
}

/// Global configuration, deserialized from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// System profile string prepended to every text request.
    #[serde(default = "default_system_profile")]
    pub system_profile: String,

    /// Base URL of the Ollama server.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Selectable models; the first entry is the startup default.
    #[serde(default = "default_models")]
    pub models: Vec<ModelEntry>,

    /// Defensive bound on uploaded file size, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_system_profile() -> String {
    DEFAULT_SYSTEM_PROFILE.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_models() -> Vec<ModelEntry> {
    vec![
        ModelEntry {
            name: "gemma2:27b".to_string(),
            kind: ModelKind::Text,
        },
        ModelEntry {
            name: "deepseek-r1:14b".to_string(),
            kind: ModelKind::Text,
        },
        ModelEntry {
            name: "llava".to_string(),
            kind: ModelKind::Vision,
        },
    ]
}

fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            system_profile: default_system_profile(),
            base_url: default_base_url(),
            models: default_models(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl GlobalConfig {
    /// The model selected at startup: the first configured entry.
    pub fn default_model(&self) -> ModelProfile {
        self.models
            .first()
            .map(ModelProfile::from)
            .unwrap_or_else(|| ModelProfile::text("gemma2:27b"))
    }

    /// Look up a configured model by name.
    pub fn find_model(&self, name: &str) -> Option<ModelProfile> {
        self.models
            .iter()
            .find(|m| m.name == name)
            .map(ModelProfile::from)
    }
}
