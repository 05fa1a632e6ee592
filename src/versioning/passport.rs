//! Passport key fallback.
//!
//! A client may send a passport key in the `versionKey` slot instead of a
//! real version key. Valid passport keys are configured as SHA-256 digests
//! (never plaintext) and compared in constant time.

use crate::config::{ConfigHandle, PassportConfig};
use sha2::{Digest, Sha256};

/// Alternate-authentication check consulted after a version key mismatch.
pub trait PassportVerifier: Send + Sync {
    fn is_valid_token(&self, candidate: &str) -> bool;
}

/// SHA-256 hash a passport key for storage.
pub fn hash_passport_key(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}

/// Verifier backed by the configured set of passport key digests.
#[derive(Debug, Clone, Default)]
pub struct PassportKeyRing {
    key_hashes: Vec<String>,
}

impl PassportKeyRing {
    pub fn new(key_hashes: impl IntoIterator<Item = String>) -> Self {
        Self {
            key_hashes: key_hashes
                .into_iter()
                .map(|hash| hash.trim().to_ascii_lowercase())
                .filter(|hash| !hash.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &PassportConfig) -> Self {
        Self::new(config.key_hashes.iter().cloned())
    }

    pub fn len(&self) -> usize {
        self.key_hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key_hashes.is_empty()
    }
}

impl PassportVerifier for PassportKeyRing {
    fn is_valid_token(&self, candidate: &str) -> bool {
        if candidate.trim().is_empty() {
            return false;
        }
        let hash = hash_passport_key(candidate);
        let mut matched = false;
        for stored in &self.key_hashes {
            matched |= constant_time_eq(stored, &hash);
        }
        matched
    }
}

/// Verifier bound to the live config.
///
/// Digests are read from the current snapshot on every check, so a reload
/// that adds or revokes a key applies to the next request.
#[derive(Clone)]
pub struct ConfiguredPassport {
    config: ConfigHandle,
}

impl ConfiguredPassport {
    pub fn new(config: ConfigHandle) -> Self {
        Self { config }
    }
}

impl PassportVerifier for ConfiguredPassport {
    fn is_valid_token(&self, candidate: &str) -> bool {
        PassportKeyRing::from_config(&self.config.load().passport).is_valid_token(candidate)
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
