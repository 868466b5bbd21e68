//! Repository Traits
//!
//! Account registry interface used by the bundled identity emulator.
//! Implementation is in the infrastructure layer.

use crate::domain::entity::account::Account;
use crate::domain::value_object::{email::Email, uid::Uid};
use crate::error::AuthResult;

/// Account repository trait
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Insert a new account; fails with `EmailExists` on a duplicate email
    async fn create(&self, account: &Account) -> AuthResult<()>;

    async fn find_by_uid(&self, uid: &Uid) -> AuthResult<Option<Account>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>>;

    /// Apply `change` to the stored account atomically and return the
    /// result. Fails with `UserNotFound` if absent; nothing is written when
    /// `change` returns an error.
    async fn modify<F>(&self, uid: &Uid, change: F) -> AuthResult<Account>
    where
        F: FnOnce(&mut Account) -> AuthResult<()> + Send;

    /// Returns whether an account was removed
    async fn delete(&self, uid: &Uid) -> AuthResult<bool>;
}
