//! Randomness for operation salts, IVs and freshly minted secrets
//!
//! Production code always draws from the operating system CSPRNG through
//! [`OsRandom`]. `FixedRandom`, available in test builds and with the
//! `test-util` feature, lets fixtures pin an exact envelope.

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::{SealError, SealResult};

/// Size of the per-operation salt in bytes (128 bits)
pub const SALT_SIZE: usize = 16;

/// Size of the AES-CBC initialization vector in bytes (128 bits)
pub const IV_SIZE: usize = 16;

/// Default length of a generated secret in bytes
pub const SECRET_SIZE: usize = 64;

/// Source of random bytes for one encrypt call
pub trait RandomSource {
    /// Fill `dest` entirely with random bytes
    fn fill_bytes(&self, dest: &mut [u8]) -> SealResult<()>;
}

/// Operating system CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill_bytes(&self, dest: &mut [u8]) -> SealResult<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| SealError::Random(format!("OS random source failed: {}", e)))
    }
}

/// Deterministic source that hands out a fixed salt, then a fixed IV
///
/// Requests of [`SALT_SIZE`] bytes alternate between the two, starting with
/// the salt. Every envelope made with it reuses the same salt and IV, so it
/// only exists in test builds and behind the `test-util` feature.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Clone)]
pub struct FixedRandom {
    salt: [u8; SALT_SIZE],
    iv: [u8; IV_SIZE],
    calls: std::cell::Cell<usize>,
}

#[cfg(any(test, feature = "test-util"))]
impl FixedRandom {
    /// Create a source replaying `salt` and `iv`
    pub fn new(salt: [u8; SALT_SIZE], iv: [u8; IV_SIZE]) -> Self {
        Self {
            salt,
            iv,
            calls: std::cell::Cell::new(0),
        }
    }
}

#[cfg(any(test, feature = "test-util"))]
impl RandomSource for FixedRandom {
    fn fill_bytes(&self, dest: &mut [u8]) -> SealResult<()> {
        let n = self.calls.get();
        self.calls.set(n + 1);

        let source: &[u8] = if n % 2 == 0 { &self.salt } else { &self.iv };
        if dest.len() != source.len() {
            return Err(SealError::Random(format!(
                "FixedRandom serves {} bytes, {} requested",
                source.len(),
                dest.len()
            )));
        }
        dest.copy_from_slice(source);
        Ok(())
    }
}

/// Generate `len` random bytes and return them hex encoded
///
/// Used to mint pepper, secret key and environment salt values.
pub fn generate_secret_hex(rng: &impl RandomSource, len: usize) -> SealResult<String> {
    let mut bytes = Zeroizing::new(vec![0u8; len]);
    rng.fill_bytes(&mut bytes)?;
    Ok(hex::encode(&*bytes))
}
