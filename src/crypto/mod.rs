//! Cryptographic building blocks for keyseal
//!
//! Provides AES-CBC encryption with peppered PBKDF2-HMAC-SHA256 key
//! derivation, the hex envelope codec, the randomness source and
//! zeroizing containers for transient key material.

pub mod encryption;
pub mod envelope;
pub mod key_derivation;
pub mod random;
pub mod secure_memory;

pub use encryption::{decrypt, decrypt_string, encrypt, encrypt_string};
pub use envelope::{Envelope, OperationMaterial};
pub use key_derivation::{derive_key, DerivedKey};
pub use random::{generate_secret_hex, OsRandom, RandomSource, IV_SIZE, SALT_SIZE};
#[cfg(any(test, feature = "test-util"))]
pub use random::FixedRandom;
pub use secure_memory::{secure_erase, SecureBytes, SecureString};
