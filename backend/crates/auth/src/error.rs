//! Auth Error Types
//!
//! Session and identity provider failures, integrated with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The session cookie carries no credential
    #[error("No idToken found")]
    MissingCredential,

    /// Token or credential failed signature, issuer or format checks
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    #[error("Credential has expired")]
    CredentialExpired,

    /// Credential was minted before the account's tokens were revoked
    #[error("Credential has been revoked")]
    RevokedCredential,

    #[error("User account has been disabled")]
    UserDisabled,

    #[error("User not found")]
    UserNotFound,

    /// Session credentials may only be minted shortly after sign-in
    #[error("Recent sign-in required")]
    RecentSignInRequired,

    #[error("Session duration must be between 5 minutes and 14 days")]
    InvalidSessionDuration,

    #[error("Email already exists")]
    EmailExists,

    #[error("Email not found")]
    EmailNotFound,

    /// Unknown email or wrong password (deliberately indistinguishable)
    #[error("Invalid login credentials")]
    InvalidLoginCredentials,

    #[error("Invalid or expired password reset code")]
    InvalidResetCode,

    #[error("Password policy violation: {0}")]
    PasswordPolicy(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Identity provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of session failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    MissingCredential,
    InvalidCredential,
    RevokedCredential,
    ProviderUnavailable,
    Other,
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::MissingCredential
            | AuthError::InvalidCredential(_)
            | AuthError::CredentialExpired
            | AuthError::RevokedCredential
            | AuthError::InvalidLoginCredentials
            | AuthError::RecentSignInRequired => ErrorKind::Unauthorized,
            AuthError::UserDisabled => ErrorKind::Forbidden,
            AuthError::UserNotFound | AuthError::EmailNotFound => ErrorKind::NotFound,
            AuthError::EmailExists => ErrorKind::Conflict,
            AuthError::InvalidSessionDuration
            | AuthError::InvalidResetCode
            | AuthError::InvalidInput(_) => ErrorKind::BadRequest,
            AuthError::PasswordPolicy(_) => ErrorKind::UnprocessableEntity,
            AuthError::ProviderUnavailable(_) => ErrorKind::ServiceUnavailable,
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn failure_class(&self) -> FailureClass {
        match self {
            AuthError::MissingCredential => FailureClass::MissingCredential,
            AuthError::InvalidCredential(_) | AuthError::CredentialExpired => {
                FailureClass::InvalidCredential
            }
            AuthError::RevokedCredential
            | AuthError::UserDisabled
            | AuthError::UserNotFound => FailureClass::RevokedCredential,
            AuthError::ProviderUnavailable(_) => FailureClass::ProviderUnavailable,
            _ => FailureClass::Other,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self.failure_class() {
            FailureClass::MissingCredential
            | FailureClass::InvalidCredential
            | FailureClass::RevokedCredential => err.with_action("Sign in again"),
            _ => err,
        }
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::ProviderUnavailable(msg) => {
                tracing::error!(message = %msg, "Identity provider unavailable");
            }
            AuthError::RevokedCredential => {
                tracing::warn!("Revoked credential presented");
            }
            AuthError::InvalidCredential(reason) => {
                tracing::warn!(reason = %reason, "Invalid credential presented");
            }
            AuthError::InvalidLoginCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest | ErrorKind::UnprocessableEntity => {
                AuthError::InvalidInput(err.message().to_string())
            }
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<platform::password::PasswordPolicyError> for AuthError {
    fn from(err: platform::password::PasswordPolicyError) -> Self {
        AuthError::PasswordPolicy(err.to_string())
    }
}

impl From<platform::password::PasswordHashError> for AuthError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
