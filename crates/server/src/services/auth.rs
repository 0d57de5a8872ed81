//! Admin password hashing and policy checks.
//!
//! Passwords are stored as unsalted SHA-256 hex digests. A deliberately
//! simple scheme for a single-admin demo shop; do not reuse it elsewhere.

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Minimum length for a new admin password.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Errors from checking a new password against the policy.
#[derive(Debug, Error)]
pub enum PasswordPolicyError {
    /// The password is shorter than the minimum.
    #[error("New password must be at least {min} characters long")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The password lacks a letter or a digit.
    #[error("New password must contain at least one letter and one number")]
    MissingLetterOrDigit,
}

/// Hash a password to its stored form.
#[must_use]
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Check a new password against the policy: at least six characters, with at
/// least one letter and one digit.
///
/// # Errors
///
/// Returns `PasswordPolicyError` describing the first failed rule.
pub fn validate_new_password(password: &str) -> Result<(), PasswordPolicyError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }

    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(PasswordPolicyError::MissingLetterOrDigit);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_known_digest() {
        // sha256("admin123")
        assert_eq!(
            hash_password("admin123"),
            "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9"
        );
    }

    #[test]
    fn test_hash_password_is_deterministic_hex() {
        let hash = hash_password("hunter42");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, hash_password("hunter42"));
        assert_ne!(hash, hash_password("hunter43"));
    }

    #[test]
    fn test_validate_new_password_ok() {
        assert!(validate_new_password("abc123").is_ok());
        assert!(validate_new_password("longer-password-9").is_ok());
    }

    #[test]
    fn test_validate_new_password_too_short() {
        assert!(matches!(
            validate_new_password("a1"),
            Err(PasswordPolicyError::TooShort { .. })
        ));
    }

    #[test]
    fn test_validate_new_password_needs_letter_and_digit() {
        assert!(matches!(
            validate_new_password("abcdef"),
            Err(PasswordPolicyError::MissingLetterOrDigit)
        ));
        assert!(matches!(
            validate_new_password("123456"),
            Err(PasswordPolicyError::MissingLetterOrDigit)
        ));
    }
}
