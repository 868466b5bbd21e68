//! Error classification

use serde::Serialize;

/// Coarse classification of a failure. Each kind owns exactly one HTTP
/// status and reason phrase.
///
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// assert_eq!(ErrorKind::Unauthorized.status_code(), 401);
/// assert_eq!(ErrorKind::Unauthorized.title(), "Unauthorized");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    BadRequest,
    /// No session, or a credential that no longer verifies
    Unauthorized,
    /// Signed in but not allowed, e.g. a disabled account
    Forbidden,
    NotFound,
    /// Clashes with existing state, e.g. an email that is already registered
    Conflict,
    /// Well-formed input rejected by a policy
    UnprocessableEntity,
    InternalServerError,
    /// The identity provider could not be reached
    ServiceUnavailable,
}

impl ErrorKind {
    const fn meta(self) -> (u16, &'static str) {
        match self {
            ErrorKind::BadRequest => (400, "Bad Request"),
            ErrorKind::Unauthorized => (401, "Unauthorized"),
            ErrorKind::Forbidden => (403, "Forbidden"),
            ErrorKind::NotFound => (404, "Not Found"),
            ErrorKind::Conflict => (409, "Conflict"),
            ErrorKind::UnprocessableEntity => (422, "Unprocessable Entity"),
            ErrorKind::InternalServerError => (500, "Internal Server Error"),
            ErrorKind::ServiceUnavailable => (503, "Service Unavailable"),
        }
    }

    #[inline]
    pub const fn status_code(self) -> u16 {
        self.meta().0
    }

    /// Reason phrase, used as the problem `title`
    #[inline]
    pub const fn title(self) -> &'static str {
        self.meta().1
    }

    /// `type` member of a problem document
    pub fn type_uri(self) -> String {
        format!("https://httpstatuses.io/{}", self.status_code())
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}
