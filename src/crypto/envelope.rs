//! Envelope wire format
//!
//! `hex(operation_salt):hex(iv):hex(ciphertext)`, `:` being the only
//! delimiter. Output is lowercase hex; either case is accepted on input.

use std::fmt;
use std::str::FromStr;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{SealError, SealResult};

use super::random::{IV_SIZE, SALT_SIZE};

/// Segment delimiter
pub const DELIMITER: char = ':';

/// Random parameters of one operation, scrubbed on drop
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct OperationMaterial {
    /// Per-operation salt, also the PBKDF2 salt
    pub salt: [u8; SALT_SIZE],
    /// CBC initialization vector
    pub iv: [u8; IV_SIZE],
}

impl fmt::Debug for OperationMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationMaterial")
            .field("salt", &hex::encode(self.salt))
            .field("iv", &hex::encode(self.iv))
            .finish()
    }
}

/// A decoded envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub material: OperationMaterial,
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Pack one operation's output
    pub fn new(salt: [u8; SALT_SIZE], iv: [u8; IV_SIZE], ciphertext: Vec<u8>) -> Self {
        Self {
            material: OperationMaterial { salt, iv },
            ciphertext,
        }
    }

    pub fn salt(&self) -> &[u8; SALT_SIZE] {
        &self.material.salt
    }

    pub fn iv(&self) -> &[u8; IV_SIZE] {
        &self.material.iv
    }

    /// Serialize to the wire string
    pub fn encode(&self) -> String {
        format!(
            "{}{d}{}{d}{}",
            hex::encode(self.material.salt),
            hex::encode(self.material.iv),
            hex::encode(&self.ciphertext),
            d = DELIMITER
        )
    }

    /// Parse a wire string
    pub fn decode(s: &str) -> SealResult<Self> {
        let segments: Vec<&str> = s.split(DELIMITER).collect();
        let [salt_hex, iv_hex, ciphertext_hex] = segments.as_slice() else {
            return Err(SealError::MalformedEnvelope(format!(
                "expected 3 segments, found {}",
                segments.len()
            )));
        };

        let salt = decode_fixed::<SALT_SIZE>("salt", salt_hex)?;
        let iv = decode_fixed::<IV_SIZE>("iv", iv_hex)?;
        let ciphertext = decode_segment("ciphertext", ciphertext_hex)?;

        Ok(Self::new(salt, iv, ciphertext))
    }
}

fn decode_segment(name: &str, segment: &str) -> SealResult<Vec<u8>> {
    if segment.is_empty() {
        return Err(SealError::MalformedEnvelope(format!("empty {} segment", name)));
    }
    hex::decode(segment)
        .map_err(|e| SealError::MalformedEnvelope(format!("invalid {} hex: {}", name, e)))
}

fn decode_fixed<const N: usize>(name: &str, segment: &str) -> SealResult<[u8; N]> {
    let mut bytes = decode_segment(name, segment)?;
    let result = <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| {
        SealError::MalformedEnvelope(format!(
            "{} must be {} bytes, got {}",
            name,
            N,
            bytes.len()
        ))
    });
    bytes.zeroize();
    result
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Envelope {
    type Err = SealError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "00000000000000000000000000000000:\
                          11111111111111111111111111111111:\
                          4e60ab5bbc62d82a9e202b9890d1540d";

    #[test]
    fn test_encode_layout() {
        let envelope = Envelope::new([0u8; SALT_SIZE], [0x11u8; IV_SIZE], vec![0xAB, 0xCD]);
        assert_eq!(
            envelope.encode(),
            "00000000000000000000000000000000:11111111111111111111111111111111:abcd"
        );
        assert_eq!(envelope.to_string(), envelope.encode());
    }

    #[test]
    fn test_decode_sample() {
        let envelope: Envelope = SAMPLE.parse().unwrap();
        assert_eq!(envelope.salt(), &[0u8; SALT_SIZE]);
        assert_eq!(envelope.iv(), &[0x11u8; IV_SIZE]);
        assert_eq!(envelope.ciphertext.len(), 16);
        assert_eq!(envelope.encode(), SAMPLE);
    }

    #[test]
    fn test_decode_accepts_uppercase() {
        let upper = SAMPLE.to_uppercase();
        let envelope = Envelope::decode(&upper).unwrap();
        assert_eq!(envelope.encode(), SAMPLE);
    }

    #[test]
    fn test_wrong_segment_count() {
        for input in ["not-a-valid-envelope", "aa:bb", "aa:bb:cc:dd", ""] {
            let err = Envelope::decode(input).unwrap_err();
            assert!(err.is_malformed(), "{input:?} gave {err:?}");
        }
    }

    #[test]
    fn test_empty_segment() {
        let input = format!("{}:{}:", "00".repeat(16), "11".repeat(16));
        assert!(Envelope::decode(&input).unwrap_err().is_malformed());

        let input = format!(":{}:abcd", "11".repeat(16));
        assert!(Envelope::decode(&input).unwrap_err().is_malformed());
    }

    #[test]
    fn test_invalid_hex() {
        let input = format!("{}:{}:zz", "00".repeat(16), "11".repeat(16));
        assert!(Envelope::decode(&input).unwrap_err().is_malformed());

        let input = format!("{}:{}:abc", "00".repeat(16), "11".repeat(16));
        assert!(Envelope::decode(&input).unwrap_err().is_malformed());
    }

    #[test]
    fn test_wrong_salt_or_iv_length() {
        let input = format!("{}:{}:abcd", "00".repeat(8), "11".repeat(16));
        assert!(Envelope::decode(&input).unwrap_err().is_malformed());

        let input = format!("{}:{}:abcd", "00".repeat(16), "11".repeat(17));
        assert!(Envelope::decode(&input).unwrap_err().is_malformed());
    }
}
