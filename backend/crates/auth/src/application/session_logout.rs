//! Session Logout Use Case
//!
//! Revokes the subject's tokens at the provider and clears the cookie.

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::application::config::AuthConfig;
use crate::application::session_store::SessionStore;
use crate::domain::provider::IdentityProvider;
use crate::error::{AuthError, AuthResult};

/// Session logout output
#[derive(Debug, Clone)]
pub struct SessionLogoutOutput {
    pub redirect_to: String,
    /// `Set-Cookie` value that expires the session cookie
    pub set_cookie: String,
}

/// Session logout use case
pub struct SessionLogoutUseCase<P>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    provider: Arc<P>,
    store: SessionStore,
    config: Arc<AuthConfig>,
}

impl<P> SessionLogoutUseCase<P>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    pub fn new(provider: Arc<P>, store: SessionStore, config: Arc<AuthConfig>) -> Self {
        Self {
            provider,
            store,
            config,
        }
    }

    /// Fails without touching the cookie when the credential is missing,
    /// invalid or already revoked.
    pub async fn execute(&self, headers: &HeaderMap) -> AuthResult<SessionLogoutOutput> {
        let session = self.store.get(headers);
        let credential = session.credential().ok_or(AuthError::MissingCredential)?;

        let claims = self
            .provider
            .verify_session_credential(credential, true)
            .await?;

        self.provider.revoke_refresh_tokens(&claims.uid).await?;

        tracing::info!(uid = %claims.uid, "Session revoked");

        Ok(SessionLogoutOutput {
            redirect_to: self.config.login_path.clone(),
            set_cookie: self.store.destroy(&session),
        })
    }
}
