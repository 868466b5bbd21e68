//! Account password handling for the bundled identity provider
//!
//! - Policy check (length, control characters, well-known weak values)
//! - Argon2id hashing in PHC string format
//! - Zeroization of clear text on drop
//!
//! Passwords never reach the session layer; only the identity provider
//! (sign-up, password sign-in, password reset) touches this module.

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Password policy enforced at sign-up and password reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Minimum length in Unicode code points
    pub min_length: usize,
    /// Maximum length in Unicode code points
    pub max_length: usize,
    /// Reject entries of the built-in weak password list
    pub reject_weak: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
            reject_weak: true,
        }
    }
}

/// Password policy violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password should be at least {min} characters")]
    TooShort { min: usize },

    #[error("Password should be at most {max} characters")]
    TooLong { max: usize },

    #[error("Password cannot be empty")]
    Empty,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,

    #[error("Password is too easy to guess")]
    Weak,
}

/// Hashing failures
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

/// Clear text password, zeroized on drop. Not `Clone`; `Debug` is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Normalize (NFKC) and validate against `policy`.
    pub fn parse(raw: &str, policy: &PasswordPolicy) -> Result<Self, PasswordPolicyError> {
        let normalized: String = raw.nfkc().collect();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::Empty);
        }

        let char_count = normalized.chars().count();
        if char_count < policy.min_length {
            return Err(PasswordPolicyError::TooShort {
                min: policy.min_length,
            });
        }
        if char_count > policy.max_length {
            return Err(PasswordPolicyError::TooLong {
                max: policy.max_length,
            });
        }

        if normalized
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        if policy.reject_weak && is_weak(&normalized) {
            return Err(PasswordPolicyError::Weak);
        }

        Ok(Self(normalized))
    }

    /// Wrap a sign-in attempt without policy checks.
    ///
    /// Sign-in must compare whatever the user typed; the policy only applies
    /// when a password is being set.
    pub fn for_verification(raw: &str) -> Self {
        Self(raw.nfkc().collect())
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Vec<u8> {
        let mut bytes = self.0.as_bytes().to_vec();
        if let Some(p) = pepper {
            bytes.extend_from_slice(p);
        }
        bytes
    }

    /// Hash with Argon2id (default OWASP parameters) and a random salt.
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(OsRng);
        let mut input = self.peppered(pepper);

        let result = Argon2::default()
            .hash_password(&input, &salt)
            .map(|h| HashedPassword { hash: h.to_string() })
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()));

        input.zeroize();
        result
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

/// Argon2id hash in PHC format (`$argon2id$v=19$...`)
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Constant-time verification (Argon2 compares internally).
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.hash) else {
            return false;
        };
        let mut input = password.peppered(pepper);
        let ok = Argon2::default().verify_password(&input, &parsed).is_ok();
        input.zeroize();
        ok
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

fn is_weak(password: &str) -> bool {
    const WEAK: &[&str] = &[
        "password",
        "password1",
        "password123",
        "12345678",
        "123456789",
        "1234567890",
        "qwertyuiop",
        "iloveyou",
        "letmein1",
        "trustno1",
        "11111111",
        "abc12345",
    ];

    let lower = password.to_lowercase();
    let mut chars = lower.chars();
    let all_same = match chars.next() {
        Some(first) => chars.all(|c| c == first),
        None => true,
    };

    all_same || WEAK.contains(&lower.as_str())
}
