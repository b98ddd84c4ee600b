//! Secure memory handling for sensitive data
//!
//! Secrets live only in these wrappers or in types deriving `ZeroizeOnDrop`,
//! so they are scrubbed on every exit path, success or failure. Scrubbing is
//! best-effort: anything already copied into a plain `String` handed back to
//! a caller (a recovered plaintext, for instance) is out of reach.

use std::fmt;
use std::ops::Deref;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Overwrite a buffer with zeros
///
/// Never panics; the write cannot be optimized away.
pub fn secure_erase(buffer: &mut [u8]) {
    buffer.zeroize();
}

/// A string type that zeros its contents on drop
///
/// Use this for the pepper, secret key and environment salt.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecureString {
    inner: String,
}

impl SecureString {
    /// Create a new SecureString
    pub fn new(s: impl Into<String>) -> Self {
        Self { inner: s.into() }
    }

    /// Get the string contents
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Get the length
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Deref for SecureString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl AsRef<str> for SecureString {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl From<String> for SecureString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecureString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// Don't print the contents in Debug output
impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureString")
            .field("len", &self.inner.len())
            .finish()
    }
}

// Don't print the contents in Display output
impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED {} bytes]", self.inner.len())
    }
}

/// A byte vector that zeros its contents on drop
///
/// Use this for key derivation input and other sensitive binary data.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecureBytes {
    inner: Vec<u8>,
}

impl SecureBytes {
    /// Create new SecureBytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            inner: bytes.into(),
        }
    }

    /// Create SecureBytes with a specific capacity
    ///
    /// Reserve enough up front: growing past the capacity reallocates and
    /// leaves the old allocation unscrubbed.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Vec::with_capacity(capacity),
        }
    }

    /// Append bytes
    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        self.inner.extend_from_slice(bytes);
    }

    /// Get the bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    /// Get mutable bytes
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.inner
    }

    /// Get the length
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Deref for SecureBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl AsRef<[u8]> for SecureBytes {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

impl From<Vec<u8>> for SecureBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for SecureBytes {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }
}

// Don't print the contents in Debug output
impl fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureBytes")
            .field("len", &self.inner.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_erase() {
        let mut buf = [0xAAu8; 16];
        secure_erase(&mut buf);
        assert_eq!(buf, [0u8; 16]);
    }

    #[test]
    fn test_secure_erase_empty_buffer() {
        let mut buf: [u8; 0] = [];
        secure_erase(&mut buf);
    }

    #[test]
    fn test_secure_string_creation() {
        let s = SecureString::new("pepper");
        assert_eq!(s.as_str(), "pepper");
        assert_eq!(s.len(), 6);
        assert!(!s.is_empty());
    }

    #[test]
    fn test_secure_string_from_str() {
        let s: SecureString = "pepper".into();
        assert_eq!(&*s, "pepper");
    }

    #[test]
    fn test_secure_string_explicit_zeroize() {
        let mut s = SecureString::new("pepper");
        s.zeroize();
        assert!(s.is_empty());
    }

    #[test]
    fn test_secure_string_debug() {
        let s = SecureString::new("secret");
        let debug = format!("{:?}", s);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("SecureString"));
    }

    #[test]
    fn test_secure_string_display() {
        let s = SecureString::new("secret");
        let display = format!("{}", s);
        assert!(!display.contains("secret"));
        assert!(display.contains("REDACTED"));
    }

    #[test]
    fn test_secure_bytes_extend() {
        let mut b = SecureBytes::with_capacity(6);
        b.extend_from_slice(b"abc");
        b.extend_from_slice(b"def");
        assert_eq!(b.as_bytes(), b"abcdef");
        assert_eq!(b.len(), 6);
    }

    #[test]
    fn test_secure_bytes_from_slice() {
        let b: SecureBytes = (&[1u8, 2, 3][..]).into();
        assert_eq!(b.as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_secure_bytes_debug() {
        let b = SecureBytes::new(vec![1, 2, 3, 4, 5]);
        let debug = format!("{:?}", b);
        assert!(debug.contains("SecureBytes"));
        assert!(debug.contains("5"));
    }
}
