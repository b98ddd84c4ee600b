//! Encrypt/decrypt orchestration and the fail-closed boundary
//!
//! The `try_` functions return the distinguishable [`SealError`] kind. The
//! plain string functions keep the established contract instead: every
//! failure comes back as `""`, which callers cannot tell apart from an empty
//! input. The kind is still logged before it is discarded.

use tracing::{debug, warn};

use crate::config::SecretConfig;
use crate::crypto::{
    decrypt_string, derive_key, encrypt_string, Envelope, OperationMaterial, OsRandom,
    RandomSource, IV_SIZE, SALT_SIZE,
};
use crate::error::SealResult;

/// Encrypt `text` into an envelope string
///
/// Empty input yields `Ok("")`. The derived key and the salt/IV buffers are
/// scrubbed when they go out of scope, on the error paths as well.
pub fn seal(config: &SecretConfig, rng: &impl RandomSource, text: &str) -> SealResult<String> {
    if text.is_empty() {
        return Ok(String::new());
    }

    let mut material = OperationMaterial {
        salt: [0u8; SALT_SIZE],
        iv: [0u8; IV_SIZE],
    };
    rng.fill_bytes(&mut material.salt)?;
    rng.fill_bytes(&mut material.iv)?;

    let key = derive_key(config, &material.salt)?;
    let ciphertext = encrypt_string(&key, &material.iv, text)?;

    let envelope = Envelope {
        material,
        ciphertext,
    };
    Ok(envelope.encode())
}

/// Decrypt an envelope string back to its text
///
/// Empty input yields `Ok("")`.
pub fn open(config: &SecretConfig, envelope: &str) -> SealResult<String> {
    if envelope.is_empty() {
        return Ok(String::new());
    }

    let envelope = Envelope::decode(envelope)?;
    let key = derive_key(config, envelope.salt())?;
    decrypt_string(&key, envelope.iv(), &envelope.ciphertext)
}

fn fail_closed(operation: &'static str, result: SealResult<String>) -> String {
    match result {
        Ok(output) => {
            debug!(operation, output_len = output.len(), "operation complete");
            output
        }
        Err(err) => {
            warn!(operation, kind = err.kind(), error = %err, "operation failed, returning empty string");
            String::new()
        }
    }
}

/// Encrypt with OS randomness; `""` on empty input or any failure
pub fn encrypt(config: &SecretConfig, text: &str) -> String {
    fail_closed("encrypt", seal(config, &OsRandom, text))
}

/// Decrypt; `""` on empty input or any failure
pub fn decrypt(config: &SecretConfig, envelope: &str) -> String {
    fail_closed("decrypt", open(config, envelope))
}

/// Secret configuration bound to a randomness source
#[derive(Debug, Clone)]
pub struct Sealer<R = OsRandom> {
    config: SecretConfig,
    rng: R,
}

impl Sealer<OsRandom> {
    /// Sealer drawing from the OS CSPRNG
    pub fn new(config: SecretConfig) -> Self {
        Self {
            config,
            rng: OsRandom,
        }
    }
}

impl<R: RandomSource> Sealer<R> {
    /// Sealer with a caller-supplied randomness source
    pub fn with_random(config: SecretConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &SecretConfig {
        &self.config
    }

    /// Encrypt, keeping the error kind
    pub fn try_encrypt(&self, text: &str) -> SealResult<String> {
        seal(&self.config, &self.rng, text)
    }

    /// Decrypt, keeping the error kind
    pub fn try_decrypt(&self, envelope: &str) -> SealResult<String> {
        open(&self.config, envelope)
    }

    /// Encrypt; `""` on empty input or any failure
    pub fn encrypt(&self, text: &str) -> String {
        fail_closed("encrypt", self.try_encrypt(text))
    }

    /// Decrypt; `""` on empty input or any failure
    pub fn decrypt(&self, envelope: &str) -> String {
        fail_closed("decrypt", self.try_decrypt(envelope))
    }
}
