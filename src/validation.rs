//! Content digests used to check a blob against its identity.

use sha2::{Digest, Sha256};

/// Recomputes a digest over content and compares it to a claimed one.
pub trait Validator {
    /// Raw digest bytes of `data`.
    fn digest(&self, data: &[u8]) -> Vec<u8>;

    /// Lowercase hex of [`Validator::digest`], the conventional blob identity.
    fn hex_digest(&self, data: &[u8]) -> String {
        hex::encode(self.digest(data))
    }

    /// `true` when the digest of `data` equals `claimed` byte for byte.
    fn validate(&self, data: &[u8], claimed: &[u8]) -> bool {
        self.digest(data).as_slice() == claimed
    }
}

/// SHA-256, the digest blob identities are named after by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Validator;

impl Validator for Sha256Validator {
    fn digest(&self, data: &[u8]) -> Vec<u8> {
        Sha256::digest(data).to_vec()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Validator;

impl Validator for Blake3Validator {
    fn digest(&self, data: &[u8]) -> Vec<u8> {
        blake3::hash(data).as_bytes().to_vec()
    }
}
