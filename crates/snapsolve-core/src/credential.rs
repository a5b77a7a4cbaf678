//! One-way credential digest helpers.
//!
//! The account record stores a SHA-256 hex digest of the secret. Verification
//! recomputes the digest and compares digest-to-digest; the plaintext secret
//! is never persisted or compared directly.

use sha2::{Digest as _, Sha256};

/// Digest a secret into the fixed-length lowercase hex form stored on the
/// account record.
pub fn digest_secret(secret: &str) -> String {
  hex::encode(Sha256::digest(secret.as_bytes()))
}

/// Check a candidate secret against a stored digest.
pub fn verify_secret(secret: &str, stored_digest: &str) -> bool {
  digest_secret(secret) == stored_digest
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn digest_is_64_hex_chars() {
    let digest = digest_secret("hunter2");
    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
  }

  #[test]
  fn digest_is_deterministic() {
    assert_eq!(digest_secret("hunter2"), digest_secret("hunter2"));
  }

  #[test]
  fn verify_accepts_matching_secret() {
    let digest = digest_secret("correct horse");
    assert!(verify_secret("correct horse", &digest));
  }

  #[test]
  fn verify_rejects_wrong_secret() {
    let digest = digest_secret("correct horse");
    assert!(!verify_secret("battery staple", &digest));
  }
}
