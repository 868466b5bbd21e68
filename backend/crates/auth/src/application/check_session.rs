//! Check Session Use Case
//!
//! Decides whether the request carries a live session.

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::application::session_store::SessionStore;
use crate::domain::entity::claims::DecodedClaims;
use crate::domain::provider::IdentityProvider;
use crate::error::AuthError;

/// Outcome of a session check. Failures are data, never `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionValidity {
    Valid(DecodedClaims),
    Invalid(AuthError),
}

impl SessionValidity {
    pub fn into_claims(self) -> Option<DecodedClaims> {
        match self {
            SessionValidity::Valid(claims) => Some(claims),
            SessionValidity::Invalid(_) => None,
        }
    }
}

/// Check session use case
pub struct CheckSessionUseCase<P>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    provider: Arc<P>,
    store: SessionStore,
}

impl<P> CheckSessionUseCase<P>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    pub fn new(provider: Arc<P>, store: SessionStore) -> Self {
        Self { provider, store }
    }

    /// Verify the session credential from the cookie, including revocation.
    pub async fn execute(&self, headers: &HeaderMap) -> SessionValidity {
        let session = self.store.get(headers);

        let Some(credential) = session.credential() else {
            return SessionValidity::Invalid(AuthError::MissingCredential);
        };

        match self
            .provider
            .verify_session_credential(credential, true)
            .await
        {
            Ok(claims) => SessionValidity::Valid(claims),
            Err(e) => {
                e.log();
                SessionValidity::Invalid(e)
            }
        }
    }
}
