//! Session Login Use Case
//!
//! Exchanges a client's identity token for a session credential and
//! stores it in the session cookie.

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::application::config::AuthConfig;
use crate::application::session_store::SessionStore;
use crate::domain::provider::IdentityProvider;
use crate::domain::value_object::token::IdToken;
use crate::error::AuthResult;

/// Session login output
#[derive(Debug, Clone)]
pub struct SessionLoginOutput {
    /// Sanitized redirect target
    pub redirect_to: String,
    /// `Set-Cookie` value carrying the new session
    pub set_cookie: String,
}

/// Session login use case
pub struct SessionLoginUseCase<P>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    provider: Arc<P>,
    store: SessionStore,
    config: Arc<AuthConfig>,
}

impl<P> SessionLoginUseCase<P>
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

    /// Verify `id_token`, mint a session credential and commit it.
    ///
    /// Nothing is committed unless every step succeeds.
    pub async fn execute(
        &self,
        headers: &HeaderMap,
        id_token: &str,
        redirect_to: Option<&str>,
    ) -> AuthResult<SessionLoginOutput> {
        let id_token = IdToken::new(id_token)?;

        let claims = self.provider.verify_id_token(&id_token).await?;

        let credential = self
            .provider
            .create_session_credential(&id_token, self.config.session_validity)
            .await?;

        // keep anything else the cookie already holds (flash data)
        let session = self.store.get(headers).with_credential(credential);
        let set_cookie = self.store.commit(&session)?;

        tracing::info!(uid = %claims.uid, "Session created");

        Ok(SessionLoginOutput {
            redirect_to: safe_redirect(redirect_to, &self.config.default_redirect),
            set_cookie,
        })
    }
}

/// Only same-site relative paths are followed; anything else falls back.
pub fn safe_redirect(target: Option<&str>, fallback: &str) -> String {
    match target.map(str::trim) {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path.to_string()
        }
        _ => fallback.to_string(),
    }
}
