//! Application Error
//!
//! [`AppError`] is what crosses crate boundaries and what gets rendered to
//! clients. Crate-local enums (`auth::AuthError`) convert into it.

use std::borrow::Cow;

use serde::Serialize;
use thiserror::Error;

use super::kind::ErrorKind;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Unified error: a kind, a message safe to show, an optional hint for the
/// user, and an optional cause that only ever reaches the logs.
///
/// ```rust
/// use kernel::error::app_error::AppError;
///
/// let err = AppError::unauthorized("Credential has been revoked").with_action("Sign in again");
/// assert_eq!(err.status_code(), 401);
/// assert_eq!(err.action(), Some("Sign in again"));
/// ```
#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct AppError {
    kind: ErrorKind,
    message: Cow<'static, str>,
    action: Option<Cow<'static, str>>,
    #[source]
    source: Option<BoxError>,
}

pub type AppResult<T> = Result<T, AppError>;

/// RFC 7807 problem document
#[derive(Debug, Serialize)]
pub struct ProblemDetails<'a> {
    #[serde(rename = "type")]
    pub type_uri: String,
    pub title: &'static str,
    pub status: u16,
    pub detail: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<&'a str>,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            action: None,
            source: None,
        }
    }

    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InternalServerError, message)
    }

    pub fn service_unavailable(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    /// Hint telling the user what to do next
    pub fn with_action(mut self, action: impl Into<Cow<'static, str>>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Underlying cause; never rendered
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    pub fn problem(&self) -> ProblemDetails<'_> {
        ProblemDetails {
            type_uri: self.kind.type_uri(),
            title: self.kind.title(),
            status: self.status_code(),
            detail: self.message(),
            action: self.action(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_display_includes_kind() {
        let err = AppError::unauthorized("No idToken found");
        assert_eq!(err.to_string(), "[Unauthorized] No idToken found");
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_source_is_kept_for_logs() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = AppError::service_unavailable("Identity provider unreachable").with_source(io);
        assert_eq!(err.status_code(), 503);
        assert!(err.source().is_some());
        assert!(!err.to_string().contains("refused"));
    }

    #[test]
    fn test_problem_document() {
        let err = AppError::conflict("Email already exists");
        let json = serde_json::to_value(err.problem()).unwrap();
        assert_eq!(json["type"], "https://httpstatuses.io/409");
        assert_eq!(json["title"], "Conflict");
        assert_eq!(json["status"], 409);
        assert_eq!(json["detail"], "Email already exists");
        assert!(json.get("action").is_none());

        let err = AppError::unauthorized("Credential expired").with_action("Sign in again");
        let json = serde_json::to_value(err.problem()).unwrap();
        assert_eq!(json["action"], "Sign in again");
    }
}
