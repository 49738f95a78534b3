//! Password digests for the bundled store.
//!
//! Uses BLAKE3 in key-derivation mode over `salt || password`.

use crate::types::PasswordDigest;

/// Domain-separation context for password digests.
const DIGEST_CONTEXT: &str = "confab 2026-01 password digest";

/// Bytes of OS randomness per salt.
const SALT_LEN: usize = 16;

/// Generate a per-user salt: 16 random bytes as 32 hex chars.
pub fn generate_salt() -> Result<String, getrandom::Error> {
    let mut bytes = [0u8; SALT_LEN];
    getrandom::fill(&mut bytes)?;
    Ok(bytes.iter().map(|b| format!("{:02x}", b)).collect())
}

/// Digest `password` under `salt`.
pub fn digest_password(salt: &str, password: &str) -> PasswordDigest {
    let mut hasher = blake3::Hasher::new_derive_key(DIGEST_CONTEXT);
    hasher.update(salt.as_bytes());
    hasher.update(&[0]);
    hasher.update(password.as_bytes());
    PasswordDigest(*hasher.finalize().as_bytes())
}

/// Check `password` against a stored digest in constant time.
pub fn verify_password(salt: &str, password: &str, expected: &PasswordDigest) -> bool {
    digest_password(salt, password).as_hash() == expected.as_hash()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic_for_same_salt() {
        assert_eq!(digest_password("s1", "pw"), digest_password("s1", "pw"));
    }

    #[test]
    fn salt_changes_digest() {
        assert_ne!(digest_password("s1", "pw"), digest_password("s2", "pw"));
    }

    #[test]
    fn salt_and_password_boundary_is_unambiguous() {
        assert_ne!(digest_password("ab", "c"), digest_password("a", "bc"));
    }

    #[test]
    fn verify_accepts_only_the_right_password() {
        let digest = digest_password("salt", "hunter2");
        assert!(verify_password("salt", "hunter2", &digest));
        assert!(!verify_password("salt", "hunter3", &digest));
        assert!(!verify_password("other", "hunter2", &digest));
    }

    #[test]
    fn salt_is_32_hex_chars() {
        let salt = generate_salt().unwrap();
        assert_eq!(salt.len(), 32);
        assert!(salt.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn salts_differ_between_calls() {
        assert_ne!(generate_salt().unwrap(), generate_salt().unwrap());
    }
}
