//! Identity Emulator
//!
//! In-process identity provider for development and tests. It plays both
//! sides of a hosted provider: the client-facing account API (sign-up,
//! password sign-in, password reset) and the admin API the session layer
//! talks to through [`IdentityProvider`].
//!
//! Revocation works on a per-account token generation: every token records
//! the generation it was minted under and revoking bumps the counter.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use platform::password::ClearTextPassword;
use tokio::sync::RwLock;

use crate::application::config::IdentityConfig;
use crate::domain::entity::{account::Account, claims::DecodedClaims};
use crate::domain::provider::{IdentityProvider, is_valid_session_duration};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    email::Email,
    token::{IdToken, SessionCredential},
    uid::Uid,
};
use crate::error::{AuthError, AuthResult};
use crate::infra::jwt::{TokenClaims, TokenCodec, TokenKind};
use crate::infra::memory::InMemoryAccountRepository;

/// Result of a successful sign-up or password sign-in
#[derive(Debug, Clone)]
pub struct SignInResult {
    pub id_token: IdToken,
    pub uid: Uid,
    pub email: Email,
    /// Identity token lifetime in seconds
    pub expires_in: u64,
}

/// Single-use password reset code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetCode(String);

impl PasswordResetCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

struct PendingReset {
    uid: Uid,
    expires_at: DateTime<Utc>,
}

pub struct EmulatorIdentityProvider<R = InMemoryAccountRepository>
where
    R: AccountRepository + Send + Sync + 'static,
{
    repo: Arc<R>,
    codec: TokenCodec,
    config: Arc<IdentityConfig>,
    reset_codes: Arc<RwLock<HashMap<String, PendingReset>>>,
}

impl<R> Clone for EmulatorIdentityProvider<R>
where
    R: AccountRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            codec: self.codec.clone(),
            config: self.config.clone(),
            reset_codes: self.reset_codes.clone(),
        }
    }
}

impl EmulatorIdentityProvider<InMemoryAccountRepository> {
    /// Emulator backed by a fresh in-memory registry
    pub fn in_memory(config: IdentityConfig) -> AuthResult<Self> {
        Self::new(InMemoryAccountRepository::new(), config)
    }
}

impl<R> EmulatorIdentityProvider<R>
where
    R: AccountRepository + Send + Sync + 'static,
{
    pub fn new(repo: R, config: IdentityConfig) -> AuthResult<Self> {
        if config.signing_secret.is_empty() {
            return Err(AuthError::Internal(
                "Identity emulator requires a signing secret".to_string(),
            ));
        }

        Ok(Self {
            repo: Arc::new(repo),
            codec: TokenCodec::new(&config),
            config: Arc::new(config),
            reset_codes: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }

    // ========================================================================
    // Client-facing account API
    // ========================================================================

    /// Create an account and sign it in
    pub async fn sign_up(&self, email: &str, password: &str) -> AuthResult<SignInResult> {
        let email = Email::new(email)?;
        let password = ClearTextPassword::parse(password, &self.config.password_policy)?;
        let hash = password.hash(self.config.pepper())?;

        let mut account = Account::new(email, hash);
        account.record_sign_in();
        self.repo.create(&account).await?;

        tracing::info!(uid = %account.uid, "Account created");
        self.issue_id_token(&account)
    }

    /// Password sign-in; unknown email and wrong password look the same
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> AuthResult<SignInResult> {
        let email = Email::new(email).map_err(|_| AuthError::InvalidLoginCredentials)?;
        let found = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidLoginCredentials)?;

        let attempt = ClearTextPassword::for_verification(password);
        if !found.password_hash.verify(&attempt, self.config.pepper()) {
            return Err(AuthError::InvalidLoginCredentials);
        }

        // The account may have changed since the lookup above
        let account = self
            .repo
            .modify(&found.uid, |account| {
                if account.password_hash != found.password_hash {
                    return Err(AuthError::InvalidLoginCredentials);
                }
                if account.disabled {
                    return Err(AuthError::UserDisabled);
                }
                account.record_sign_in();
                Ok(())
            })
            .await
            .map_err(|e| match e {
                AuthError::UserNotFound => AuthError::InvalidLoginCredentials,
                other => other,
            })?;

        tracing::info!(uid = %account.uid, "Password sign-in");
        self.issue_id_token(&account)
    }

    /// Issue a reset code. The code is written to the log in place of an
    /// e-mail.
    pub async fn send_password_reset(&self, email: &str) -> AuthResult<PasswordResetCode> {
        let email = Email::new(email)?;
        let account = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::EmailNotFound)?;

        let now = Utc::now();
        let code = uuid::Uuid::new_v4().simple().to_string();
        let ttl = chrono::Duration::from_std(self.config.reset_code_ttl)
            .map_err(|e| AuthError::Internal(format!("Invalid reset code TTL: {e}")))?;

        {
            let mut codes = self.reset_codes.write().await;
            codes.retain(|_, pending| pending.expires_at > now);
            codes.insert(
                code.clone(),
                PendingReset {
                    uid: account.uid.clone(),
                    expires_at: now + ttl,
                },
            );
        }

        tracing::info!(
            uid = %account.uid,
            email = %account.email,
            oob_code = %code,
            "Password reset code issued"
        );

        Ok(PasswordResetCode(code))
    }

    /// Consume a reset code and set a new password. Outstanding sessions
    /// are revoked.
    /// A code is only spent once the new password passes the policy, so a
    /// rejected password can be retried with the same code.
    pub async fn confirm_password_reset(&self, code: &str, new_password: &str) -> AuthResult<Email> {
        let password = ClearTextPassword::parse(new_password, &self.config.password_policy)?;
        let hash = password.hash(self.config.pepper())?;

        let pending = self
            .reset_codes
            .write()
            .await
            .remove(code)
            .ok_or(AuthError::InvalidResetCode)?;

        if pending.expires_at <= Utc::now() {
            return Err(AuthError::InvalidResetCode);
        }

        let account = self
            .repo
            .modify(&pending.uid, |account| {
                account.set_password(hash);
                account.revoke_tokens();
                Ok(())
            })
            .await?;

        tracing::info!(uid = %account.uid, "Password reset completed");
        Ok(account.email)
    }

    // ========================================================================
    // Admin API
    // ========================================================================

    pub async fn get_account(&self, uid: &Uid) -> AuthResult<Account> {
        self.load_account(uid).await
    }

    pub async fn set_disabled(&self, uid: &Uid, disabled: bool) -> AuthResult<()> {
        self.repo
            .modify(uid, |account| {
                account.set_disabled(disabled);
                Ok(())
            })
            .await?;

        tracing::info!(uid = %uid, disabled, "Account status changed");
        Ok(())
    }

    pub async fn delete_account(&self, uid: &Uid) -> AuthResult<()> {
        if !self.repo.delete(uid).await? {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(uid = %uid, "Account deleted");
        Ok(())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn load_account(&self, uid: &Uid) -> AuthResult<Account> {
        self.repo
            .find_by_uid(uid)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    fn issue_id_token(&self, account: &Account) -> AuthResult<SignInResult> {
        let auth_time = Utc::now().timestamp();
        let token = self.codec.issue(
            TokenKind::IdToken,
            account,
            auth_time,
            self.config.id_token_ttl,
        )?;

        Ok(SignInResult {
            id_token: IdToken::new(token)?,
            uid: account.uid.clone(),
            email: account.email.clone(),
            expires_in: self.config.id_token_ttl.as_secs(),
        })
    }

    /// Account must exist, be enabled and not have revoked `claims`
    async fn ensure_active(&self, claims: &TokenClaims) -> AuthResult<Account> {
        let uid = Uid::parse_str(&claims.sub)
            .map_err(|_| AuthError::InvalidCredential("Token has an invalid subject".to_string()))?;
        let account = self.load_account(&uid).await?;

        if account.disabled {
            return Err(AuthError::UserDisabled);
        }
        if account.is_revoked(claims.token_generation) {
            return Err(AuthError::RevokedCredential);
        }

        Ok(account)
    }
}

impl<R> IdentityProvider for EmulatorIdentityProvider<R>
where
    R: AccountRepository + Send + Sync + 'static,
{
    async fn verify_id_token(&self, id_token: &IdToken) -> AuthResult<DecodedClaims> {
        self.codec
            .decode(TokenKind::IdToken, id_token.as_str())?
            .to_decoded()
    }

    async fn create_session_credential(
        &self,
        id_token: &IdToken,
        valid_for: Duration,
    ) -> AuthResult<SessionCredential> {
        if !is_valid_session_duration(valid_for) {
            return Err(AuthError::InvalidSessionDuration);
        }

        let claims = self.codec.decode(TokenKind::IdToken, id_token.as_str())?;

        let signed_in_for = Utc::now().timestamp() - claims.auth_time;
        let window =
            i64::try_from(self.config.recent_sign_in_window.as_secs()).unwrap_or(i64::MAX);
        if signed_in_for > window {
            return Err(AuthError::RecentSignInRequired);
        }

        let account = self.ensure_active(&claims).await?;

        let credential = self.codec.issue(
            TokenKind::SessionCredential,
            &account,
            claims.auth_time,
            valid_for,
        )?;
        SessionCredential::new(credential)
    }

    async fn verify_session_credential(
        &self,
        credential: &SessionCredential,
        check_revoked: bool,
    ) -> AuthResult<DecodedClaims> {
        let claims = self
            .codec
            .decode(TokenKind::SessionCredential, credential.as_str())?;

        if check_revoked {
            self.ensure_active(&claims).await?;
        }

        claims.to_decoded()
    }

    async fn revoke_refresh_tokens(&self, uid: &Uid) -> AuthResult<()> {
        let account = self
            .repo
            .modify(uid, |account| {
                account.revoke_tokens();
                Ok(())
            })
            .await?;

        tracing::info!(
            uid = %uid,
            token_generation = account.token_generation,
            "Refresh tokens revoked"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSWORD: &str = "correct horse battery";
    const FIVE_DAYS: Duration = Duration::from_secs(5 * 24 * 3600);

    fn emulator() -> EmulatorIdentityProvider {
        EmulatorIdentityProvider::in_memory(IdentityConfig::with_random_secret("demo")).unwrap()
    }

    /// Registry whose email lookups stall, widening the gap between a
    /// sign-in's read and its write
    #[derive(Clone, Default)]
    struct SlowLookupRepository {
        inner: InMemoryAccountRepository,
    }

    impl AccountRepository for SlowLookupRepository {
        async fn create(&self, account: &Account) -> AuthResult<()> {
            self.inner.create(account).await
        }

        async fn find_by_uid(&self, uid: &Uid) -> AuthResult<Option<Account>> {
            self.inner.find_by_uid(uid).await
        }

        async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
            let found = self.inner.find_by_email(email).await;
            tokio::time::sleep(Duration::from_millis(200)).await;
            found
        }

        async fn modify<F>(&self, uid: &Uid, change: F) -> AuthResult<Account>
        where
            F: FnOnce(&mut Account) -> AuthResult<()> + Send,
        {
            self.inner.modify(uid, change).await
        }

        async fn delete(&self, uid: &Uid) -> AuthResult<bool> {
            self.inner.delete(uid).await
        }
    }

    #[tokio::test]
    async fn test_requires_signing_secret() {
        assert!(EmulatorIdentityProvider::in_memory(IdentityConfig::default()).is_err());
    }

    #[tokio::test]
    async fn test_sign_up_and_sign_in() {
        let idp = emulator();
        let signed_up = idp.sign_up("Alice@Example.com", PASSWORD).await.unwrap();
        assert_eq!(signed_up.email.as_str(), "alice@example.com");
        assert_eq!(signed_up.expires_in, 3600);

        let signed_in = idp
            .sign_in_with_password("alice@example.com", PASSWORD)
            .await
            .unwrap();
        assert_eq!(signed_in.uid, signed_up.uid);

        let claims = idp.verify_id_token(&signed_in.id_token).await.unwrap();
        assert_eq!(claims.uid, signed_up.uid);
        assert_eq!(claims.aud, "demo");
    }

    #[tokio::test]
    async fn test_sign_up_rejections() {
        let idp = emulator();
        idp.sign_up("alice@example.com", PASSWORD).await.unwrap();

        assert_eq!(
            idp.sign_up("alice@example.com", PASSWORD).await.unwrap_err(),
            AuthError::EmailExists
        );
        assert!(matches!(
            idp.sign_up("bob@example.com", "short").await,
            Err(AuthError::PasswordPolicy(_))
        ));
        assert!(matches!(
            idp.sign_up("not-an-email", PASSWORD).await,
            Err(AuthError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_sign_in_failures_are_generic() {
        let idp = emulator();
        idp.sign_up("alice@example.com", PASSWORD).await.unwrap();

        assert_eq!(
            idp.sign_in_with_password("alice@example.com", "wrong password")
                .await
                .unwrap_err(),
            AuthError::InvalidLoginCredentials
        );
        assert_eq!(
            idp.sign_in_with_password("nobody@example.com", PASSWORD)
                .await
                .unwrap_err(),
            AuthError::InvalidLoginCredentials
        );
    }

    #[tokio::test]
    async fn test_session_credential_round_trip() {
        let idp = emulator();
        let signed_in = idp.sign_up("alice@example.com", PASSWORD).await.unwrap();

        let credential = idp
            .create_session_credential(&signed_in.id_token, FIVE_DAYS)
            .await
            .unwrap();
        let claims = idp.verify_session_credential(&credential, true).await.unwrap();

        assert_eq!(claims.uid, signed_in.uid);
        assert_eq!(claims.iss, idp.config().session_issuer());
        assert_eq!(claims.exp - claims.iat, FIVE_DAYS.as_secs() as i64);
    }

    #[tokio::test]
    async fn test_tokens_are_not_interchangeable() {
        let idp = emulator();
        let signed_in = idp.sign_up("alice@example.com", PASSWORD).await.unwrap();

        let as_credential = SessionCredential::new(signed_in.id_token.as_str()).unwrap();
        assert!(matches!(
            idp.verify_session_credential(&as_credential, false).await,
            Err(AuthError::InvalidCredential(_))
        ));

        let credential = idp
            .create_session_credential(&signed_in.id_token, FIVE_DAYS)
            .await
            .unwrap();
        let as_id_token = IdToken::new(credential.as_str()).unwrap();
        assert!(idp.verify_id_token(&as_id_token).await.is_err());
    }

    #[tokio::test]
    async fn test_session_duration_bounds() {
        let idp = emulator();
        let signed_in = idp.sign_up("alice@example.com", PASSWORD).await.unwrap();

        for valid_for in [Duration::from_secs(60), Duration::from_secs(15 * 24 * 3600)] {
            assert_eq!(
                idp.create_session_credential(&signed_in.id_token, valid_for)
                    .await
                    .unwrap_err(),
                AuthError::InvalidSessionDuration
            );
        }
    }

    #[tokio::test]
    async fn test_recent_sign_in_required() {
        let idp = emulator();
        let signed_in = idp.sign_up("alice@example.com", PASSWORD).await.unwrap();

        let mut claims = idp
            .codec
            .decode(TokenKind::IdToken, signed_in.id_token.as_str())
            .unwrap();
        claims.auth_time -= 10 * 60;
        let stale = IdToken::new(idp.codec.encode_claims(&claims).unwrap()).unwrap();

        assert_eq!(
            idp.create_session_credential(&stale, FIVE_DAYS)
                .await
                .unwrap_err(),
            AuthError::RecentSignInRequired
        );
    }

    #[tokio::test]
    async fn test_revocation() {
        let idp = emulator();
        let signed_in = idp.sign_up("alice@example.com", PASSWORD).await.unwrap();
        let credential = idp
            .create_session_credential(&signed_in.id_token, FIVE_DAYS)
            .await
            .unwrap();

        idp.revoke_refresh_tokens(&signed_in.uid).await.unwrap();

        assert_eq!(
            idp.verify_session_credential(&credential, true)
                .await
                .unwrap_err(),
            AuthError::RevokedCredential
        );
        // without the revocation check only the signature is consulted
        assert!(idp.verify_session_credential(&credential, false).await.is_ok());
        // an identity token minted before revocation cannot start a new session
        assert_eq!(
            idp.create_session_credential(&signed_in.id_token, FIVE_DAYS)
                .await
                .unwrap_err(),
            AuthError::RevokedCredential
        );
    }

    #[tokio::test]
    async fn test_disabled_and_deleted_accounts() {
        let idp = emulator();
        let signed_in = idp.sign_up("alice@example.com", PASSWORD).await.unwrap();
        let credential = idp
            .create_session_credential(&signed_in.id_token, FIVE_DAYS)
            .await
            .unwrap();

        idp.set_disabled(&signed_in.uid, true).await.unwrap();
        assert_eq!(
            idp.verify_session_credential(&credential, true)
                .await
                .unwrap_err(),
            AuthError::UserDisabled
        );
        assert_eq!(
            idp.sign_in_with_password("alice@example.com", PASSWORD)
                .await
                .unwrap_err(),
            AuthError::UserDisabled
        );

        idp.set_disabled(&signed_in.uid, false).await.unwrap();
        assert!(idp.verify_session_credential(&credential, true).await.is_ok());

        idp.delete_account(&signed_in.uid).await.unwrap();
        assert_eq!(
            idp.verify_session_credential(&credential, true)
                .await
                .unwrap_err(),
            AuthError::UserNotFound
        );
        assert_eq!(
            idp.delete_account(&signed_in.uid).await.unwrap_err(),
            AuthError::UserNotFound
        );
    }

    #[tokio::test]
    async fn test_password_reset() {
        let idp = emulator();
        let signed_in = idp.sign_up("alice@example.com", PASSWORD).await.unwrap();
        let credential = idp
            .create_session_credential(&signed_in.id_token, FIVE_DAYS)
            .await
            .unwrap();

        assert_eq!(
            idp.send_password_reset("nobody@example.com").await.unwrap_err(),
            AuthError::EmailNotFound
        );

        let code = idp.send_password_reset("alice@example.com").await.unwrap();
        let email = idp
            .confirm_password_reset(code.as_str(), "a brand new passphrase")
            .await
            .unwrap();
        assert_eq!(email.as_str(), "alice@example.com");

        // single use
        assert_eq!(
            idp.confirm_password_reset(code.as_str(), "another new passphrase")
                .await
                .unwrap_err(),
            AuthError::InvalidResetCode
        );

        assert_eq!(
            idp.sign_in_with_password("alice@example.com", PASSWORD)
                .await
                .unwrap_err(),
            AuthError::InvalidLoginCredentials
        );
        assert!(
            idp.sign_in_with_password("alice@example.com", "a brand new passphrase")
                .await
                .is_ok()
        );
        assert_eq!(
            idp.verify_session_credential(&credential, true)
                .await
                .unwrap_err(),
            AuthError::RevokedCredential
        );
    }

    #[tokio::test]
    async fn test_concurrent_sign_in_keeps_revocation() {
        let idp = EmulatorIdentityProvider::new(
            SlowLookupRepository::default(),
            IdentityConfig::with_random_secret("demo"),
        )
        .unwrap();
        let signed_in = idp.sign_up("alice@example.com", PASSWORD).await.unwrap();
        let credential = idp
            .create_session_credential(&signed_in.id_token, FIVE_DAYS)
            .await
            .unwrap();

        let signing_in = {
            let idp = idp.clone();
            tokio::spawn(async move {
                idp.sign_in_with_password("alice@example.com", PASSWORD)
                    .await
            })
        };
        // lands while the sign-in above is still holding its stale copy
        tokio::time::sleep(Duration::from_millis(50)).await;
        idp.revoke_refresh_tokens(&signed_in.uid).await.unwrap();

        let fresh = signing_in.await.unwrap().unwrap();

        assert_eq!(
            idp.verify_session_credential(&credential, true)
                .await
                .unwrap_err(),
            AuthError::RevokedCredential
        );
        // the sign-in finished after the revocation, so its token is current
        assert!(
            idp.create_session_credential(&fresh.id_token, FIVE_DAYS)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_concurrent_disable_blocks_sign_in() {
        let idp = EmulatorIdentityProvider::new(
            SlowLookupRepository::default(),
            IdentityConfig::with_random_secret("demo"),
        )
        .unwrap();
        let signed_in = idp.sign_up("alice@example.com", PASSWORD).await.unwrap();

        let signing_in = {
            let idp = idp.clone();
            tokio::spawn(async move {
                idp.sign_in_with_password("alice@example.com", PASSWORD)
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        idp.set_disabled(&signed_in.uid, true).await.unwrap();

        assert_eq!(
            signing_in.await.unwrap().unwrap_err(),
            AuthError::UserDisabled
        );
        assert!(idp.get_account(&signed_in.uid).await.unwrap().disabled);
    }

    #[tokio::test]
    async fn test_rejected_reset_password_keeps_code() {
        let idp = emulator();
        idp.sign_up("alice@example.com", PASSWORD).await.unwrap();
        let code = idp.send_password_reset("alice@example.com").await.unwrap();

        assert!(matches!(
            idp.confirm_password_reset(code.as_str(), "short").await,
            Err(AuthError::PasswordPolicy(_))
        ));

        let email = idp
            .confirm_password_reset(code.as_str(), "a brand new passphrase")
            .await
            .unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
        assert!(
            idp.sign_in_with_password("alice@example.com", "a brand new passphrase")
                .await
                .is_ok()
        );
    }
}
