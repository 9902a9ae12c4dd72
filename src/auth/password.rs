//! Argon2id credential hashing. Only PHC strings ever reach the account store.

use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

/// Longest password accepted at registration, in bytes.
pub const MAX_PASSWORD_LEN: usize = 1024;

/// Registration-time rules; the message is shown on the form.
pub fn check_policy(plain: &str) -> Result<(), &'static str> {
    if plain.is_empty() {
        Err("Password is required")
    } else if plain.len() > MAX_PASSWORD_LEN {
        Err("Password is too long")
    } else {
        Ok(())
    }
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| anyhow::anyhow!("hashing password: {e}"))
}

/// `Ok(false)` on a mismatch. Errors only when `stored` is not a usable hash.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed =
        PasswordHash::new(stored).map_err(|e| anyhow::anyhow!("reading stored hash: {e}"))?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("verifying password: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hash = hash_password("walk-10k-a-day").expect("hashing should succeed");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("walk-10k-a-day", &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("correct-horse").expect("hashing should succeed");
        assert!(!verify_password("wrong-horse", &hash).expect("verify should not error"));
    }

    #[test]
    fn same_password_hashes_differently() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "plaintext-from-an-old-db").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn policy_rejects_empty_and_oversized_passwords() {
        assert_eq!(check_policy(""), Err("Password is required"));
        assert!(check_policy(&"x".repeat(MAX_PASSWORD_LEN)).is_ok());
        assert_eq!(check_policy(&"x".repeat(MAX_PASSWORD_LEN + 1)), Err("Password is too long"));
    }
}
