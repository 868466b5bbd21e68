//! Application Configuration
//!
//! Configuration for the session layer and the bundled identity emulator.

use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::password::PasswordPolicy;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

use crate::domain::provider::is_valid_session_duration;
use crate::error::{AuthError, AuthResult};

/// Five days, the session lifetime used unless configured otherwise
pub const DEFAULT_SESSION_VALIDITY: Duration = Duration::from_secs(5 * 24 * 3600);

/// Session layer configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// HMAC secrets for the cookie signature, newest first.
    /// The first one signs; all of them verify.
    pub session_secrets: Vec<Vec<u8>>,
    /// How long the provider-issued session credential stays valid
    pub session_validity: Duration,
    /// Cookie Max-Age; independent of the credential's own validity
    pub cookie_max_age: Duration,
    /// Domain attribute, set in production
    pub cookie_domain: Option<String>,
    pub cookie_path: String,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Where logout sends the browser
    pub login_path: String,
    /// Redirect target after login when none (or an unsafe one) is given
    pub default_redirect: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "fb:token".to_string(),
            session_secrets: Vec::new(),
            session_validity: DEFAULT_SESSION_VALIDITY,
            cookie_max_age: DEFAULT_SESSION_VALIDITY,
            cookie_domain: None,
            cookie_path: "/".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            login_path: "/login".to_string(),
            default_redirect: "/".to_string(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        Self {
            session_secrets: vec![platform::crypto::random_bytes(32)],
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie, no Domain)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Production cookie attributes: Secure plus the given Domain
    pub fn production(secrets: Vec<Vec<u8>>, domain: Option<String>) -> Self {
        Self {
            session_secrets: secrets,
            cookie_domain: domain,
            cookie_secure: true,
            ..Default::default()
        }
    }

    /// Secret used to sign new cookies
    pub fn signing_secret(&self) -> AuthResult<&[u8]> {
        self.session_secrets
            .first()
            .map(Vec::as_slice)
            .ok_or_else(|| AuthError::Internal("No session secret configured".to_string()))
    }

    /// Cookie attributes shared by commit and destroy
    pub fn cookie_config(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: self.cookie_path.clone(),
            domain: self.cookie_domain.clone(),
            // Duration seconds are u64; clamp rather than wrap negative
            max_age_secs: Some(
                i64::try_from(self.cookie_max_age.as_secs()).unwrap_or(i64::MAX),
            ),
        }
    }

    /// Reject unusable settings; warn about surprising ones
    pub fn validate(&self) -> AuthResult<()> {
        if self.session_secrets.is_empty() || self.session_secrets.iter().any(Vec::is_empty) {
            return Err(AuthError::Internal(
                "At least one non-empty session secret is required".to_string(),
            ));
        }

        if !is_valid_session_duration(self.session_validity) {
            return Err(AuthError::InvalidSessionDuration);
        }

        if self.cookie_max_age > self.session_validity {
            tracing::warn!(
                cookie_max_age_secs = self.cookie_max_age.as_secs(),
                session_validity_secs = self.session_validity.as_secs(),
                "Session cookie outlives the session credential it carries"
            );
        }

        if self.cookie_same_site == SameSite::None && !self.cookie_secure {
            tracing::warn!("SameSite=None without Secure is rejected by browsers");
        }

        Ok(())
    }
}

/// Configuration of the bundled identity emulator
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Project id; the audience of every token
    pub project_id: String,
    /// HS256 key shared by identity tokens and session credentials
    pub signing_secret: Vec<u8>,
    /// Identity token lifetime
    pub id_token_ttl: Duration,
    /// Maximum age of a sign-in that may still mint a session credential
    pub recent_sign_in_window: Duration,
    /// Lifetime of password reset codes
    pub reset_code_ttl: Duration,
    pub password_policy: PasswordPolicy,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            project_id: "demo-project".to_string(),
            signing_secret: Vec::new(),
            id_token_ttl: Duration::from_secs(3600),
            recent_sign_in_window: Duration::from_secs(5 * 60),
            reset_code_ttl: Duration::from_secs(3600),
            password_policy: PasswordPolicy::default(),
            password_pepper: None,
        }
    }
}

impl IdentityConfig {
    /// Create config with a random signing secret (for development)
    pub fn with_random_secret(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            signing_secret: platform::crypto::random_bytes(32),
            ..Default::default()
        }
    }

    /// Issuer of identity tokens
    pub fn id_token_issuer(&self) -> String {
        format!("https://securetoken.emulator.local/{}", self.project_id)
    }

    /// Issuer of session credentials
    pub fn session_issuer(&self) -> String {
        format!("https://session.emulator.local/{}", self.project_id)
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
