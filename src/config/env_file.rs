//! Dotenv-style file reader
//!
//! `KEY=VALUE` per line. Blank lines and lines starting with `#` are skipped,
//! the value is everything after the first `=` (trimmed), and one pair of
//! matching surrounding quotes is removed. Values are held in
//! [`SecureString`] since these files carry the secrets.

use std::collections::BTreeMap;
use std::path::Path;

use crate::crypto::SecureString;
use crate::error::{SealError, SealResult};

/// Parsed variables of one env file
#[derive(Debug, Default, Clone)]
pub struct EnvVars {
    vars: BTreeMap<String, SecureString>,
}

impl EnvVars {
    /// Parse env file contents
    pub fn parse(contents: &str) -> Self {
        let mut vars = BTreeMap::new();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            vars.insert(key.to_string(), SecureString::new(unquote(value.trim())));
        }

        Self { vars }
    }

    /// Read and parse an env file
    pub fn read(path: impl AsRef<Path>) -> SealResult<Self> {
        let path = path.as_ref();
        let contents = SecureString::new(std::fs::read_to_string(path).map_err(|e| {
            SealError::Io(format!("Failed to read env file {}: {}", path.display(), e))
        })?);
        Ok(Self::parse(&contents))
    }

    /// Non-empty value of `name`
    pub fn get(&self, name: &str) -> Option<&SecureString> {
        self.vars.get(name).filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
