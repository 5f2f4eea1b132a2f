use sha2::{Digest, Sha256};

/// Turns a plaintext secret into the digest stored in the `password` column.
pub trait PasswordHasher: Send + Sync {
    fn digest(&self, plaintext: &str) -> String;
}

/// Unsalted SHA-256, lowercase hex (64 chars).
///
/// Login is an exact `(username, digest)` lookup, so the digest must be a pure
/// function of the password. Identical passwords produce identical digests; a salted
/// KDF would need a verify-against-stored-salt login instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl PasswordHasher for Sha256Hasher {
    fn digest(&self, plaintext: &str) -> String {
        hex::encode(Sha256::digest(plaintext.as_bytes()))
    }
}
