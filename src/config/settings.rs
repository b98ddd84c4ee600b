//! Non-secret settings for keyseal
//!
//! Key derivation parameters and default file locations, persisted as JSON.
//! Secrets never go in here; see [`super::secrets`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::KeysealPaths;
use crate::error::{SealError, SealResult};

/// Default PBKDF2 iteration count
pub const DEFAULT_ITERATIONS: u32 = 10_000;

/// Default derived key size
pub const DEFAULT_KEY_SIZE_BITS: u32 = 256;

/// Key derivation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfSettings {
    /// Derived key size: 128, 192 or 256
    #[serde(default = "default_key_size_bits")]
    pub key_size_bits: u32,

    /// PBKDF2 rounds
    #[serde(default = "default_iterations")]
    pub iterations: u32,
}

fn default_key_size_bits() -> u32 {
    DEFAULT_KEY_SIZE_BITS
}

fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

impl Default for KdfSettings {
    fn default() -> Self {
        Self {
            key_size_bits: default_key_size_bits(),
            iterations: default_iterations(),
        }
    }
}

impl KdfSettings {
    /// Default key size with a custom iteration count
    pub fn with_iterations(iterations: u32) -> Self {
        Self {
            iterations,
            ..Default::default()
        }
    }

    /// Derived key length in bytes
    pub fn key_len(&self) -> usize {
        (self.key_size_bits / 8) as usize
    }

    /// Reject parameters PBKDF2 or AES cannot use
    pub fn validate(&self) -> SealResult<()> {
        if !matches!(self.key_size_bits, 128 | 192 | 256) {
            return Err(SealError::KeyDerivation(format!(
                "Unsupported key size: {} bits",
                self.key_size_bits
            )));
        }
        if self.iterations == 0 {
            return Err(SealError::KeyDerivation(
                "Iteration count must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// User settings for keyseal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub kdf: KdfSettings,

    /// Dotenv file to read secrets from when the environment lacks them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_file: Option<PathBuf>,

    /// Sealed keys file used by `keyseal keys`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys_file: Option<PathBuf>,
}

fn default_schema_version() -> u32 {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            kdf: KdfSettings::default(),
            env_file: None,
            keys_file: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &KeysealPaths) -> Result<Self, SealError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| SealError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                SealError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &KeysealPaths) -> Result<(), SealError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| SealError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| SealError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Effective dotenv file
    pub fn env_file(&self, paths: &KeysealPaths) -> PathBuf {
        self.env_file.clone().unwrap_or_else(|| paths.env_file())
    }

    /// Effective sealed keys file
    pub fn keys_file(&self, paths: &KeysealPaths) -> PathBuf {
        self.keys_file.clone().unwrap_or_else(|| paths.keys_file())
    }
}
