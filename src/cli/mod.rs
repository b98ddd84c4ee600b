//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the library.

pub mod encrypt;
pub mod keys;

use std::path::PathBuf;

pub use encrypt::{handle_decrypt, handle_encrypt, handle_keygen};
pub use keys::{handle_keys_command, KeysCommands};

use crate::config::{KeysealPaths, SecretConfig, Settings};
use crate::error::SealResult;
use crate::sealer::Sealer;

/// Everything a command needs besides its own arguments
#[derive(Debug, Clone)]
pub struct CliContext {
    pub paths: KeysealPaths,
    pub settings: Settings,
    /// Dotenv file consulted for secrets the environment lacks
    pub env_file: PathBuf,
}

impl CliContext {
    pub fn new(paths: KeysealPaths, settings: Settings, env_file: Option<PathBuf>) -> Self {
        let env_file = env_file.unwrap_or_else(|| settings.env_file(&paths));
        Self {
            paths,
            settings,
            env_file,
        }
    }

    /// Resolve secrets and build a sealer with the configured KDF settings
    pub fn sealer(&self) -> SealResult<Sealer> {
        let config = SecretConfig::from_env_or_file(&self.env_file)?.with_kdf(self.settings.kdf);
        Ok(Sealer::new(config))
    }

    pub fn keys_file(&self) -> PathBuf {
        self.settings.keys_file(&self.paths)
    }
}
