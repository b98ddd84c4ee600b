//! Key derivation using PBKDF2-HMAC-SHA256
//!
//! The password fed to PBKDF2 is the concatenation
//! `pepper ∥ secret_key ∥ environment_salt ∥ hex(operation_salt)`, and the raw
//! operation salt doubles as the PBKDF2 salt. The same configuration and salt
//! always yield the same key, which is what lets decryption rebuild it from
//! the salt stored in the envelope.

use std::fmt;

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::SecretConfig;
use crate::error::SealResult;

use super::random::SALT_SIZE;
use super::secure_memory::SecureBytes;

/// A derived encryption key, scrubbed on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: Vec<u8>,
}

impl DerivedKey {
    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    /// Key length in bytes
    pub fn len(&self) -> usize {
        self.key.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKey")
            .field("bits", &(self.key.len() * 8))
            .finish()
    }
}

/// Build the peppered password bytes for one operation
fn peppered_password(config: &SecretConfig, salt: &[u8; SALT_SIZE]) -> SecureBytes {
    let salt_hex = hex::encode(salt);
    let mut password = SecureBytes::with_capacity(
        config.pepper().len()
            + config.secret_key().len()
            + config.environment_salt().len()
            + salt_hex.len(),
    );
    password.extend_from_slice(config.pepper().as_bytes());
    password.extend_from_slice(config.secret_key().as_bytes());
    password.extend_from_slice(config.environment_salt().as_bytes());
    password.extend_from_slice(salt_hex.as_bytes());
    password
}

/// Derive the symmetric key for one encrypt or decrypt call
pub fn derive_key(config: &SecretConfig, salt: &[u8; SALT_SIZE]) -> SealResult<DerivedKey> {
    let kdf = config.kdf();
    kdf.validate()?;

    let password = peppered_password(config, salt);
    let mut key = vec![0u8; kdf.key_len()];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, kdf.iterations, &mut key);

    Ok(DerivedKey { key })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KdfSettings;
    use crate::error::SealError;

    fn config(pepper: &str, secret: &str, env_salt: &str) -> SecretConfig {
        SecretConfig::new(pepper, secret, env_salt)
            .unwrap()
            .with_kdf(KdfSettings::with_iterations(1_000))
    }

    #[test]
    fn test_peppered_password_layout() {
        let cfg = config("p", "s", "e");
        let password = peppered_password(&cfg, &[0u8; SALT_SIZE]);
        assert_eq!(
            password.as_bytes(),
            b"pse00000000000000000000000000000000"
        );
    }

    #[test]
    fn test_derive_key_length() {
        let key = derive_key(&config("p", "s", "e"), &[7u8; SALT_SIZE]).unwrap();
        assert_eq!(key.len(), 32);

        let cfg = config("p", "s", "e").with_kdf(KdfSettings {
            key_size_bits: 128,
            iterations: 1_000,
        });
        let key = derive_key(&cfg, &[7u8; SALT_SIZE]).unwrap();
        assert_eq!(key.len(), 16);
    }

    #[test]
    fn test_known_key_for_default_settings() {
        let cfg = SecretConfig::new("p", "s", "e").unwrap();
        let key = derive_key(&cfg, &[0u8; SALT_SIZE]).unwrap();
        assert_eq!(
            hex::encode(key.as_bytes()),
            "34cbe319bfe9db86450bb46780bc39703c157a4390bd133173088bb8450bd48f"
        );
    }

    #[test]
    fn test_same_inputs_same_key() {
        let cfg = config("pepper", "secret", "env");
        let key1 = derive_key(&cfg, &[1u8; SALT_SIZE]).unwrap();
        let key2 = derive_key(&cfg, &[1u8; SALT_SIZE]).unwrap();
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_salt_different_key() {
        let cfg = config("pepper", "secret", "env");
        let key1 = derive_key(&cfg, &[1u8; SALT_SIZE]).unwrap();
        let key2 = derive_key(&cfg, &[2u8; SALT_SIZE]).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_each_secret_changes_key() {
        let salt = [3u8; SALT_SIZE];
        let base = derive_key(&config("pepper", "secret", "env"), &salt).unwrap();
        for cfg in [
            config("pepper2", "secret", "env"),
            config("pepper", "secret2", "env"),
            config("pepper", "secret", "env2"),
        ] {
            let other = derive_key(&cfg, &salt).unwrap();
            assert_ne!(base.as_bytes(), other.as_bytes());
        }
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let cfg = config("p", "s", "e").with_kdf(KdfSettings::with_iterations(0));
        let err = derive_key(&cfg, &[0u8; SALT_SIZE]).unwrap_err();
        assert!(matches!(err, SealError::KeyDerivation(_)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let key = derive_key(&config("p", "s", "e"), &[0u8; SALT_SIZE]).unwrap();
        let debug = format!("{:?}", key);
        assert!(debug.contains("256"));
        assert!(!debug.contains(&hex::encode(key.as_bytes())));
    }
}
