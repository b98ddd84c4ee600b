//! Configuration module for keyseal
//!
//! This module provides:
//! - Secret resolution from the environment or a dotenv file
//! - Platform path resolution
//! - Non-secret settings persistence (key derivation parameters)

pub mod env_file;
pub mod paths;
pub mod secrets;
pub mod settings;

pub use env_file::EnvVars;
pub use paths::KeysealPaths;
pub use secrets::SecretConfig;
pub use settings::{KdfSettings, Settings};
