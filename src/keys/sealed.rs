//! Sealed keys file
//!
//! A JSON map from key name to envelope, produced from a dotenv file so that
//! application credentials can ship encrypted and be opened at runtime.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::EnvVars;
use crate::crypto::RandomSource;
use crate::error::{SealError, SealResult};
use crate::sealer::Sealer;
use crate::storage::{read_json, write_json_atomic};

/// Named envelopes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedKeys {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    keys: BTreeMap<String, String>,
}

fn default_version() -> u32 {
    1
}

impl Default for SealedKeys {
    fn default() -> Self {
        Self {
            version: default_version(),
            keys: BTreeMap::new(),
        }
    }
}

impl SealedKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from disk; a missing file is an empty set
    pub fn load(path: impl AsRef<Path>) -> SealResult<Self> {
        read_json(path)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> SealResult<()> {
        write_json_atomic(path, self)
    }

    /// Store an envelope under `name`, replacing any previous one
    pub fn insert(&mut self, name: impl Into<String>, envelope: impl Into<String>) {
        self.keys.insert(name.into(), envelope.into());
    }

    /// Add every entry of `other`, overwriting duplicates
    pub fn merge(&mut self, other: SealedKeys) {
        self.keys.extend(other.keys);
    }

    pub fn envelope(&self, name: &str) -> Option<&str> {
        self.keys.get(name).map(String::as_str)
    }

    /// Names and envelopes in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Decrypt the value stored under `name`
    ///
    /// `None` when the name is unknown or the envelope does not open.
    pub fn get_key<R: RandomSource>(&self, sealer: &Sealer<R>, name: &str) -> Option<String> {
        let envelope = self.envelope(name)?;
        let plaintext = sealer.decrypt(envelope);
        if plaintext.is_empty() {
            None
        } else {
            Some(plaintext)
        }
    }
}

/// Encrypt the listed variables of a parsed env file
///
/// # Errors
///
/// `MissingKeys` naming every requested variable that is absent or empty,
/// before anything is encrypted; otherwise the first encryption failure.
pub fn seal_vars<R, S>(sealer: &Sealer<R>, vars: &EnvVars, names: &[S]) -> SealResult<SealedKeys>
where
    R: RandomSource,
    S: AsRef<str>,
{
    let missing: Vec<String> = names
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| vars.get(name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SealError::MissingKeys(missing));
    }

    let mut sealed = SealedKeys::new();
    for name in names.iter().map(|name| name.as_ref()) {
        let value = vars
            .get(name)
            .ok_or_else(|| SealError::MissingKeys(vec![name.to_string()]))?;
        let envelope = sealer.try_encrypt(value)?;
        if envelope.is_empty() {
            return Err(SealError::Cipher(format!("Failed to seal {}", name)));
        }
        sealed.insert(name, envelope);
    }

    info!(count = sealed.len(), "sealed variables");
    Ok(sealed)
}

/// Read `env_path` and encrypt the listed variables
pub fn seal_env_file<R, S>(
    sealer: &Sealer<R>,
    env_path: impl AsRef<Path>,
    names: &[S],
) -> SealResult<SealedKeys>
where
    R: RandomSource,
    S: AsRef<str>,
{
    let vars = EnvVars::read(env_path)?;
    seal_vars(sealer, &vars, names)
}
