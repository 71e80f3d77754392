//! Data directory resolution.

use std::path::{Path, PathBuf};

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `THESEUS_DATA_DIR` environment variable
/// 2. `~/.theseus`
/// 3. `.theseus` in the current directory (last resort)
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("THESEUS_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".theseus");
    }

    PathBuf::from(".theseus")
}

/// Sessions directory under the data directory.
pub fn sessions_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("sessions")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_dir_layout() {
        let data_dir = PathBuf::from("/home/user/.theseus");
        assert_eq!(
            sessions_dir(&data_dir),
            PathBuf::from("/home/user/.theseus/sessions")
        );
    }

    #[test]
    fn test_resolve_data_dir_from_env() {
        // SAFETY: This test is single-threaded and restores the env var immediately.
        unsafe {
            std::env::set_var("THESEUS_DATA_DIR", "/tmp/test-theseus");
        }
        let dir = resolve_data_dir();
        assert_eq!(dir, PathBuf::from("/tmp/test-theseus"));
        unsafe {
            std::env::remove_var("THESEUS_DATA_DIR");
        }
    }
}
