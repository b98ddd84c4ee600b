//! AES-CBC encryption/decryption with PKCS#7 padding
//!
//! The AES variant follows the key length: 16, 24 or 32 bytes select
//! AES-128, AES-192 or AES-256.
//!
//! CBC carries no authentication tag. A tampered ciphertext is usually
//! rejected by the PKCS#7 padding check or by the UTF-8 check in
//! [`decrypt_string`], but not always: a change to any block but the last
//! garbles one plaintext block and flips bits in the next, and that output
//! can still unpad and decode. Callers needing integrity must add it
//! outside the envelope.

use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::{
    block_padding::Pkcs7, BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit,
};

use zeroize::Zeroizing;

use crate::error::{SealError, SealResult};

use super::random::IV_SIZE;
use super::DerivedKey;

/// AES block size in bytes
pub const BLOCK_SIZE: usize = 16;

fn cbc_encrypt<C>(key: &[u8], iv: &[u8], plaintext: &[u8]) -> SealResult<Vec<u8>>
where
    C: BlockEncryptMut + BlockCipher + KeyInit,
{
    let encryptor = cbc::Encryptor::<C>::new_from_slices(key, iv)
        .map_err(|e| SealError::Cipher(format!("Failed to create cipher: {}", e)))?;
    Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

fn cbc_decrypt<C>(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> SealResult<Vec<u8>>
where
    C: BlockDecryptMut + BlockCipher + KeyInit,
{
    let decryptor = cbc::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|e| SealError::Cipher(format!("Failed to create cipher: {}", e)))?;

    // Decrypted blocks are scrubbed even when unpadding fails
    let mut buffer = Zeroizing::new(ciphertext.to_vec());
    let len = decryptor
        .decrypt_padded_mut::<Pkcs7>(&mut buffer[..])
        .map_err(|_| {
            SealError::Cipher("Decryption failed: invalid key or corrupted data".to_string())
        })?
        .len();
    Ok(buffer[..len].to_vec())
}

fn check_iv(iv: &[u8]) -> SealResult<()> {
    if iv.len() != IV_SIZE {
        return Err(SealError::Cipher(format!(
            "Invalid IV size: expected {}, got {}",
            IV_SIZE,
            iv.len()
        )));
    }
    Ok(())
}

/// Encrypt plaintext bytes
pub fn encrypt(key: &DerivedKey, iv: &[u8], plaintext: &[u8]) -> SealResult<Vec<u8>> {
    check_iv(iv)?;
    match key.len() {
        16 => cbc_encrypt::<Aes128>(key.as_bytes(), iv, plaintext),
        24 => cbc_encrypt::<Aes192>(key.as_bytes(), iv, plaintext),
        32 => cbc_encrypt::<Aes256>(key.as_bytes(), iv, plaintext),
        n => Err(SealError::Cipher(format!("Unsupported key size: {} bytes", n))),
    }
}

/// Decrypt ciphertext bytes
pub fn decrypt(key: &DerivedKey, iv: &[u8], ciphertext: &[u8]) -> SealResult<Vec<u8>> {
    check_iv(iv)?;
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(SealError::Cipher(format!(
            "Ciphertext length {} is not a positive multiple of {}",
            ciphertext.len(),
            BLOCK_SIZE
        )));
    }

    match key.len() {
        16 => cbc_decrypt::<Aes128>(key.as_bytes(), iv, ciphertext),
        24 => cbc_decrypt::<Aes192>(key.as_bytes(), iv, ciphertext),
        32 => cbc_decrypt::<Aes256>(key.as_bytes(), iv, ciphertext),
        n => Err(SealError::Cipher(format!("Unsupported key size: {} bytes", n))),
    }
}

/// Encrypt a string
pub fn encrypt_string(key: &DerivedKey, iv: &[u8], plaintext: &str) -> SealResult<Vec<u8>> {
    encrypt(key, iv, plaintext.as_bytes())
}

/// Decrypt to a string
pub fn decrypt_string(key: &DerivedKey, iv: &[u8], ciphertext: &[u8]) -> SealResult<String> {
    let plaintext = decrypt(key, iv, ciphertext)?;
    String::from_utf8(plaintext).map_err(|e| {
        let mut bytes = e.into_bytes();
        super::secure_memory::secure_erase(&mut bytes);
        SealError::Cipher("Invalid UTF-8 in decrypted data".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{KdfSettings, SecretConfig};
    use crate::crypto::derive_key;
    use crate::crypto::random::SALT_SIZE;

    const IV: [u8; IV_SIZE] = [0x11; IV_SIZE];

    fn key_with(secret: &str, bits: u32) -> DerivedKey {
        let config = SecretConfig::new("pepper", secret, "env")
            .unwrap()
            .with_kdf(KdfSettings {
                key_size_bits: bits,
                iterations: 1_000,
            });
        derive_key(&config, &[0u8; SALT_SIZE]).unwrap()
    }

    fn test_key() -> DerivedKey {
        key_with("secret", 256)
    }

    #[test]
    fn test_encrypt_decrypt() {
        let key = test_key();
        let plaintext = b"Hello, World!";

        let ciphertext = encrypt(&key, &IV, plaintext).unwrap();
        let decrypted = decrypt(&key, &IV, &ciphertext).unwrap();

        assert_eq!(plaintext, decrypted.as_slice());
    }

    #[test]
    fn test_all_key_sizes() {
        for bits in [128, 192, 256] {
            let key = key_with("secret", bits);
            let ciphertext = encrypt_string(&key, &IV, "sized").unwrap();
            assert_eq!(decrypt_string(&key, &IV, &ciphertext).unwrap(), "sized");
        }
    }

    #[test]
    fn test_padding_always_added() {
        let key = test_key();
        assert_eq!(encrypt(&key, &IV, b"").unwrap().len(), BLOCK_SIZE);
        assert_eq!(encrypt(&key, &IV, &[0u8; 15]).unwrap().len(), BLOCK_SIZE);
        assert_eq!(encrypt(&key, &IV, &[0u8; 16]).unwrap().len(), 2 * BLOCK_SIZE);
    }

    #[test]
    fn test_wrong_key_fails() {
        let ciphertext = encrypt_string(&test_key(), &IV, "Hello, World!").unwrap();
        let result = decrypt_string(&key_with("other", 256), &IV, &ciphertext);
        assert!(matches!(result, Err(SealError::Cipher(_))));
    }

    #[test]
    fn test_truncated_ciphertext_fails() {
        let key = test_key();
        let ciphertext = encrypt(&key, &IV, b"Hello, World!").unwrap();
        let result = decrypt(&key, &IV, &ciphertext[..ciphertext.len() - 1]);
        assert!(matches!(result, Err(SealError::Cipher(_))));
        assert!(decrypt(&key, &IV, &[]).is_err());
    }

    #[test]
    fn test_bad_iv_length() {
        let key = test_key();
        assert!(matches!(
            encrypt(&key, &[0u8; 8], b"data"),
            Err(SealError::Cipher(_))
        ));
    }

    #[test]
    fn test_non_utf8_plaintext_rejected_as_string() {
        let key = test_key();
        let ciphertext = encrypt(&key, &IV, &[0xFF, 0xFE, 0xFD]).unwrap();
        assert!(decrypt(&key, &IV, &ciphertext).is_ok());
        assert!(matches!(
            decrypt_string(&key, &IV, &ciphertext),
            Err(SealError::Cipher(_))
        ));
    }

    #[test]
    fn test_padding_failure_reports_cipher_error() {
        let key = test_key();
        let mut ciphertext = encrypt(&key, &IV, b"Hello, World!").unwrap();
        let last = ciphertext.len() - 1;
        ciphertext[last] ^= 0x01;

        let result = decrypt(&key, &IV, &ciphertext);
        assert!(matches!(result, Err(SealError::Cipher(_))));
    }

    #[test]
    fn test_no_integrity_check_on_earlier_blocks() {
        let key = test_key();
        let plaintext = b"0123456789abcdefWXYZ";
        let mut ciphertext = encrypt(&key, &IV, plaintext).unwrap();
        assert_eq!(ciphertext.len(), 2 * BLOCK_SIZE);

        // Flipping a bit in the first block flips the same bit in the second
        // block's plaintext and leaves the padding intact
        ciphertext[0] ^= 0x01;
        let decrypted = decrypt(&key, &IV, &ciphertext).unwrap();
        assert_eq!(decrypted.len(), plaintext.len());
        assert_eq!(decrypted[BLOCK_SIZE], b'W' ^ 0x01);
        assert_eq!(&decrypted[BLOCK_SIZE + 1..], b"XYZ");
        assert_ne!(&decrypted[..BLOCK_SIZE], &plaintext[..BLOCK_SIZE]);
    }

    #[test]
    fn test_large_plaintext() {
        let key = test_key();
        let plaintext: Vec<u8> = (0..10000).map(|i| (i % 256) as u8).collect();

        let ciphertext = encrypt(&key, &IV, &plaintext).unwrap();
        let decrypted = decrypt(&key, &IV, &ciphertext).unwrap();

        assert_eq!(plaintext, decrypted);
    }
}
