//! Account Entity
//!
//! Registry record kept by the bundled identity emulator.

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;

use crate::domain::value_object::{email::Email, uid::Uid};

#[derive(Debug, Clone)]
pub struct Account {
    pub uid: Uid,
    pub email: Email,
    pub password_hash: HashedPassword,
    /// Disabled accounts cannot sign in and fail credential verification
    pub disabled: bool,
    /// Bumped on every revocation; tokens carrying an older value are revoked
    pub token_generation: u64,
    pub last_sign_in_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(email: Email, password_hash: HashedPassword) -> Self {
        let now = Utc::now();
        Self {
            uid: Uid::generate(),
            email,
            password_hash,
            disabled: false,
            token_generation: 0,
            last_sign_in_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn record_sign_in(&mut self) {
        let now = Utc::now();
        self.last_sign_in_at = Some(now);
        self.updated_at = now;
    }

    /// Invalidate every token issued so far
    pub fn revoke_tokens(&mut self) {
        self.token_generation += 1;
        self.updated_at = Utc::now();
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        self.updated_at = Utc::now();
    }

    pub fn set_password(&mut self, password_hash: HashedPassword) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }

    pub fn is_revoked(&self, token_generation: u64) -> bool {
        token_generation < self.token_generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::ClearTextPassword;

    fn account() -> Account {
        let hash = ClearTextPassword::for_verification("correct horse battery")
            .hash(None)
            .unwrap();
        Account::new(Email::new("user@example.com").unwrap(), hash)
    }

    #[test]
    fn test_revoke_bumps_generation() {
        let mut account = account();
        assert!(!account.is_revoked(0));

        account.revoke_tokens();
        assert!(account.is_revoked(0));
        assert!(!account.is_revoked(1));
    }

    #[test]
    fn test_record_sign_in() {
        let mut account = account();
        assert!(account.last_sign_in_at.is_none());
        account.record_sign_in();
        assert!(account.last_sign_in_at.is_some());
    }
}
