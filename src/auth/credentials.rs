//! Credential storage and verification
//!
//! Secrets are kept as salted SHA-256 digests and compared in constant time.

use sha2::{Digest, Sha256};

const DIGEST_LEN: usize = 32;

/// A salted secret digest for one user.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    salt: String,
    digest: [u8; DIGEST_LEN],
}

impl Credential {
    /// Hashes `secret` under `salt`.
    pub fn from_secret(salt: &str, secret: &str) -> Self {
        Self {
            salt: salt.to_string(),
            digest: salted_digest(salt, secret),
        }
    }

    /// Builds a credential from a hex digest previously produced by [`Credential::digest_hex`].
    pub fn from_hex(salt: &str, digest_hex: &str) -> Result<Self, hex::FromHexError> {
        let mut digest = [0u8; DIGEST_LEN];
        hex::decode_to_slice(digest_hex, &mut digest)?;
        Ok(Self {
            salt: salt.to_string(),
            digest,
        })
    }

    /// Returns true if `candidate` hashes to the stored digest.
    pub fn verify(&self, candidate: &str) -> bool {
        constant_time_eq(&salted_digest(&self.salt, candidate), &self.digest)
    }

    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

// Never print the digest.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("salt", &self.salt)
            .finish_non_exhaustive()
    }
}

fn salted_digest(salt: &str, secret: &str) -> [u8; DIGEST_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update([0u8]);
    hasher.update(secret.as_bytes());
    hasher.finalize().into()
}

fn constant_time_eq(a: &[u8; DIGEST_LEN], b: &[u8; DIGEST_LEN]) -> bool {
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_accepts_only_exact_secret() {
        let cred = Credential::from_secret("alice", "Password01");
        assert!(cred.verify("Password01"));
        assert!(!cred.verify("password01"));
        assert!(!cred.verify("Password01 "));
        assert!(!cred.verify(""));
    }

    #[test]
    fn test_salt_changes_digest() {
        let a = Credential::from_secret("alice", "same");
        let b = Credential::from_secret("bryan", "same");
        assert_ne!(a.digest_hex(), b.digest_hex());
    }

    #[test]
    fn test_hex_round_trip_verifies() {
        let original = Credential::from_secret("carol", "s3cret");
        let restored = Credential::from_hex("carol", &original.digest_hex()).unwrap();
        assert_eq!(restored, original);
        assert!(restored.verify("s3cret"));
    }

    #[test]
    fn test_from_hex_rejects_wrong_length() {
        assert!(Credential::from_hex("x", "abcd").is_err());
        assert!(Credential::from_hex("x", "zz").is_err());
    }

    #[test]
    fn test_debug_hides_digest() {
        let cred = Credential::from_secret("alice", "Password01");
        let printed = format!("{:?}", cred);
        assert!(!printed.contains(&cred.digest_hex()));
    }
}
