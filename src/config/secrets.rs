//! Secret configuration: pepper, secret key and environment salt
//!
//! Resolved once by the caller and passed explicitly to the sealer; nothing
//! in the crate reads process-wide state on its own.

use std::path::Path;

use super::env_file::EnvVars;
use super::settings::KdfSettings;
use crate::crypto::SecureString;
use crate::error::{SealError, SealResult};

/// Variable holding the pepper
pub const PEPPER_VAR: &str = "KEYSEAL_PEPPER";
/// Variable holding the secret key
pub const SECRET_KEY_VAR: &str = "KEYSEAL_SECRET_KEY";
/// Variable holding the environment salt
pub const SALT_VAR: &str = "KEYSEAL_SALT";

/// Older names, still honoured after the primary ones
pub const LEGACY_PEPPER_VAR: &str = "VITE_PEPPER";
pub const LEGACY_SECRET_KEY_VAR: &str = "VITE_SECRET_KEY";
pub const LEGACY_SALT_VAR: &str = "VITE_SALT";

/// The three secrets plus key derivation parameters
#[derive(Debug, Clone)]
pub struct SecretConfig {
    pepper: SecureString,
    secret_key: SecureString,
    environment_salt: SecureString,
    kdf: KdfSettings,
}

impl SecretConfig {
    /// Build from explicit values with default KDF settings
    ///
    /// # Errors
    ///
    /// `Config` if any value is empty.
    pub fn new(
        pepper: impl Into<SecureString>,
        secret_key: impl Into<SecureString>,
        environment_salt: impl Into<SecureString>,
    ) -> SealResult<Self> {
        let config = Self {
            pepper: pepper.into(),
            secret_key: secret_key.into(),
            environment_salt: environment_salt.into(),
            kdf: KdfSettings::default(),
        };

        for (name, value) in [
            (PEPPER_VAR, &config.pepper),
            (SECRET_KEY_VAR, &config.secret_key),
            (SALT_VAR, &config.environment_salt),
        ] {
            if value.is_empty() {
                return Err(SealError::Config(format!("{} must not be empty", name)));
            }
        }

        Ok(config)
    }

    /// Resolve from the process environment
    pub fn from_env() -> SealResult<Self> {
        Self::resolve(|name| std::env::var(name).ok().map(SecureString::new))
    }

    /// Resolve from a dotenv-style file
    pub fn from_env_file(path: impl AsRef<Path>) -> SealResult<Self> {
        let vars = EnvVars::read(path)?;
        Self::from_env_vars(&vars)
    }

    /// Resolve from already parsed env file variables
    pub fn from_env_vars(vars: &EnvVars) -> SealResult<Self> {
        Self::resolve(|name| vars.get(name).cloned())
    }

    /// Resolve from the environment, then from `path` for anything missing
    pub fn from_env_or_file(path: impl AsRef<Path>) -> SealResult<Self> {
        let path = path.as_ref();
        let vars = if path.exists() {
            EnvVars::read(path)?
        } else {
            EnvVars::default()
        };
        Self::resolve_layered(|name| std::env::var(name).ok(), &vars)
    }

    /// `env` takes precedence per variable; `vars` fills the gaps
    fn resolve_layered(env: impl Fn(&str) -> Option<String>, vars: &EnvVars) -> SealResult<Self> {
        Self::resolve(|name| {
            env(name)
                .map(SecureString::new)
                .filter(|v| !v.is_empty())
                .or_else(|| vars.get(name).cloned())
        })
    }

    fn resolve(lookup: impl Fn(&str) -> Option<SecureString>) -> SealResult<Self> {
        let fetch = |primary: &str, legacy: &str| -> SealResult<SecureString> {
            lookup(primary)
                .filter(|v| !v.is_empty())
                .or_else(|| lookup(legacy).filter(|v| !v.is_empty()))
                .ok_or_else(|| SealError::Config(format!("{} is not set", primary)))
        };

        Self::new(
            fetch(PEPPER_VAR, LEGACY_PEPPER_VAR)?,
            fetch(SECRET_KEY_VAR, LEGACY_SECRET_KEY_VAR)?,
            fetch(SALT_VAR, LEGACY_SALT_VAR)?,
        )
    }

    /// Replace the key derivation parameters
    pub fn with_kdf(mut self, kdf: KdfSettings) -> Self {
        self.kdf = kdf;
        self
    }

    pub fn pepper(&self) -> &str {
        self.pepper.as_str()
    }

    pub fn secret_key(&self) -> &str {
        self.secret_key.as_str()
    }

    pub fn environment_salt(&self) -> &str {
        self.environment_salt.as_str()
    }

    pub fn kdf(&self) -> &KdfSettings {
        &self.kdf
    }
}
