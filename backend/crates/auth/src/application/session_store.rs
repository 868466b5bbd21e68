//! Session Store
//!
//! Cookie-backed session storage. The cookie value is
//! `base64url(json).base64url(hmac)`; the HMAC protects integrity only,
//! trust in the session comes from re-verifying the credential inside it.

use std::sync::Arc;

use axum::http::HeaderMap;
use platform::cookie::extract_cookie;
use platform::crypto::{from_base64url, sign_value, to_base64url, unsign_value};

use crate::application::config::AuthConfig;
use crate::domain::entity::session_data::SessionData;
use crate::error::{AuthError, AuthResult};

#[derive(Clone)]
pub struct SessionStore {
    config: Arc<AuthConfig>,
}

impl SessionStore {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    /// Load the session carried by the request's `Cookie` header.
    ///
    /// Missing, tampered or malformed cookies yield an empty session.
    pub fn get(&self, headers: &HeaderMap) -> SessionData {
        extract_cookie(headers, &self.config.session_cookie_name)
            .and_then(|raw| self.decode(&raw))
            .unwrap_or_default()
    }

    fn decode(&self, raw: &str) -> Option<SessionData> {
        let Some(payload) = unsign_value(raw, &self.config.session_secrets) else {
            tracing::debug!("Session cookie signature mismatch, ignoring cookie");
            return None;
        };

        let json = match from_base64url(&payload) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(error = %e, "Session cookie is not valid base64url");
                return None;
            }
        };

        match serde_json::from_slice(&json) {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::debug!(error = %e, "Session cookie payload is malformed");
                None
            }
        }
    }

    /// Serialize and sign `data`, returning the `Set-Cookie` value.
    pub fn commit(&self, data: &SessionData) -> AuthResult<String> {
        let json = serde_json::to_vec(data)
            .map_err(|e| AuthError::Internal(format!("Session serialization failed: {e}")))?;
        let signed = sign_value(&to_base64url(&json), self.config.signing_secret()?);

        Ok(self.config.cookie_config().build_set_cookie(&signed))
    }

    /// `Set-Cookie` value that removes the session cookie.
    ///
    /// Works the same for empty and populated sessions.
    pub fn destroy(&self, _data: &SessionData) -> String {
        self.config.cookie_config().build_delete_cookie()
    }
}
