//! In-memory Repository Implementation

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{email::Email, uid::Uid};
use crate::error::{AuthError, AuthResult};

/// Process-local account registry; cheap to clone, clones share state
#[derive(Clone, Default)]
pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<HashMap<Uid, Account>>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: &Account) -> AuthResult<()> {
        let mut accounts = self.accounts.write().await;

        if accounts.values().any(|a| a.email == account.email) {
            return Err(AuthError::EmailExists);
        }
        if accounts.contains_key(&account.uid) {
            return Err(AuthError::Internal(format!(
                "Duplicate uid {}",
                account.uid
            )));
        }

        accounts.insert(account.uid.clone(), account.clone());
        Ok(())
    }

    async fn find_by_uid(&self, uid: &Uid) -> AuthResult<Option<Account>> {
        Ok(self.accounts.read().await.get(uid).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|a| &a.email == email)
            .cloned())
    }

    async fn modify<F>(&self, uid: &Uid, change: F) -> AuthResult<Account>
    where
        F: FnOnce(&mut Account) -> AuthResult<()> + Send,
    {
        let mut accounts = self.accounts.write().await;
        let stored = accounts.get_mut(uid).ok_or(AuthError::UserNotFound)?;

        // work on a copy so a failed change leaves the record untouched
        let mut updated = stored.clone();
        change(&mut updated)?;
        *stored = updated.clone();

        Ok(updated)
    }

    async fn delete(&self, uid: &Uid) -> AuthResult<bool> {
        Ok(self.accounts.write().await.remove(uid).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::ClearTextPassword;

    fn account(email: &str) -> Account {
        let hash = ClearTextPassword::for_verification("correct horse battery")
            .hash(None)
            .unwrap();
        Account::new(Email::new(email).unwrap(), hash)
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = InMemoryAccountRepository::new();
        let account = account("a@example.com");
        repo.create(&account).await.unwrap();

        let by_uid = repo.find_by_uid(&account.uid).await.unwrap().unwrap();
        assert_eq!(by_uid.email, account.email);

        let by_email = repo
            .find_by_email(&Email::new("A@Example.com").unwrap())
            .await
            .unwrap();
        assert!(by_email.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryAccountRepository::new();
        repo.create(&account("a@example.com")).await.unwrap();
        assert_eq!(
            repo.create(&account("a@example.com")).await,
            Err(AuthError::EmailExists)
        );
    }

    #[tokio::test]
    async fn test_modify_and_delete() {
        let repo = InMemoryAccountRepository::new();
        let account = account("a@example.com");
        repo.create(&account).await.unwrap();

        let modified = repo
            .modify(&account.uid, |a| {
                a.set_disabled(true);
                Ok(())
            })
            .await
            .unwrap();
        assert!(modified.disabled);
        assert!(repo.find_by_uid(&account.uid).await.unwrap().unwrap().disabled);

        assert!(repo.delete(&account.uid).await.unwrap());
        assert!(!repo.delete(&account.uid).await.unwrap());
        assert!(matches!(
            repo.modify(&account.uid, |_| Ok(())).await,
            Err(AuthError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_failed_modify_writes_nothing() {
        let repo = InMemoryAccountRepository::new();
        let account = account("a@example.com");
        repo.create(&account).await.unwrap();

        let result = repo
            .modify(&account.uid, |a| {
                a.revoke_tokens();
                Err(AuthError::UserDisabled)
            })
            .await;
        assert!(matches!(result, Err(AuthError::UserDisabled)));

        let stored = repo.find_by_uid(&account.uid).await.unwrap().unwrap();
        assert_eq!(stored.token_generation, 0);
    }
}
