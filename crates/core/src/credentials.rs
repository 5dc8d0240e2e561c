//! Password hashing.
//!
//! Passwords are stored as the lowercase hex SHA-256 digest of their UTF-8 bytes and
//! authentication is a comparison of digests. There is no salt or work factor; the format is
//! kept so existing collection files stay readable.

use sha2::{Digest, Sha256};
use std::fmt;

/// Hex-encoded SHA-256 digest of a password.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn from_plaintext(password: &str) -> Self {
        let digest = Sha256::digest(password.as_bytes());
        Self(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// True when `stored` is this digest. An empty stored hash never matches.
    pub fn matches(&self, stored: &str) -> bool {
        !stored.is_empty() && self.0 == stored
    }
}

impl fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
