//! Path management for keyseal
//!
//! ## Path Resolution Order
//!
//! 1. `KEYSEAL_HOME` environment variable (if set)
//! 2. The platform config directory from `directories`
//!    (`~/.config/keyseal` on Linux)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::SealError;

/// Environment variable overriding the base directory
pub const HOME_VAR: &str = "KEYSEAL_HOME";

/// Manages all paths used by keyseal
#[derive(Debug, Clone)]
pub struct KeysealPaths {
    base_dir: PathBuf,
}

impl KeysealPaths {
    /// Create a new KeysealPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, SealError> {
        let base_dir = match std::env::var(HOME_VAR) {
            Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => ProjectDirs::from("", "", "keyseal")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    SealError::Config("Could not determine a config directory".into())
                })?,
        };

        Ok(Self { base_dir })
    }

    /// Create KeysealPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Default sealed keys file
    pub fn keys_file(&self) -> PathBuf {
        self.base_dir.join("keys.json")
    }

    /// Default dotenv file holding the secrets
    pub fn env_file(&self) -> PathBuf {
        self.base_dir.join(".env")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), SealError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| SealError::Io(format!("Failed to create base directory: {}", e)))
    }
}
