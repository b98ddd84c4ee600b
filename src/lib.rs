//! keyseal - password-derived text encryption envelopes
//!
//! Encrypts short strings (API tokens, service IDs) under a key derived from
//! three configured secrets (a pepper, a secret key and an environment salt)
//! plus a fresh random salt per call. The result is a self-contained
//! envelope `hex(salt):hex(iv):hex(ciphertext)` that decrypts back to the
//! original text under the same configuration.
//!
//! # Architecture
//!
//! - `config`: secret resolution, paths and key derivation settings
//! - `crypto`: randomness, PBKDF2 key derivation, AES-CBC, envelope codec
//!   and zeroizing containers
//! - `sealer`: orchestration and the fail-closed string API
//! - `keys`: named envelopes sealed from a dotenv file into JSON
//! - `storage`: atomic JSON file I/O
//! - `cli`: command handlers for the `keyseal` binary
//!
//! # Example
//!
//! ```rust,no_run
//! use keyseal::{SecretConfig, Sealer};
//!
//! let config = SecretConfig::from_env()?;
//! let sealer = Sealer::new(config);
//! let envelope = sealer.encrypt("ghp_example");
//! assert_eq!(sealer.decrypt(&envelope), "ghp_example");
//! # Ok::<(), keyseal::SealError>(())
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod keys;
pub mod sealer;
pub mod storage;

pub use config::{KdfSettings, SecretConfig};
pub use crypto::Envelope;
pub use error::{SealError, SealResult};
pub use keys::SealedKeys;
pub use sealer::{decrypt, encrypt, Sealer};
