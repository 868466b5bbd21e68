//! Auth (Session Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, identity provider seam, repository traits
//! - `application/` - Session store and session use cases
//! - `infra/` - Bundled identity emulator (JWT codec, in-memory accounts)
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Flow
//! 1. The client signs in with the identity provider and obtains a
//!    short-lived identity token
//! 2. `POST /login` exchanges it for a long-lived session credential,
//!    stored in a signed cookie
//! 3. Every request re-verifies the credential with the provider,
//!    including the revocation check
//! 4. `GET /logout` revokes the subject's tokens and expires the cookie
//!
//! ## Security Model
//! - The cookie HMAC protects integrity only; trust comes from the provider
//! - Cookie secrets rotate: the newest signs, all listed secrets verify
//! - Session credentials are only minted right after a fresh sign-in
//! - Login redirects are restricted to same-site paths

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{AuthConfig, IdentityConfig};
pub use application::{SessionStore, SessionValidity};
pub use domain::provider::IdentityProvider;
pub use error::{AuthError, AuthResult, FailureClass};
pub use infra::emulator::EmulatorIdentityProvider;
pub use presentation::router::{auth_router, identity_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::entity::{
        account::Account, claims::DecodedClaims, session_data::SessionData,
    };
    pub use crate::domain::value_object::*;
    pub use crate::domain::value_object::{
        email::Email,
        token::{IdToken, SessionCredential},
        uid::Uid,
    };
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
