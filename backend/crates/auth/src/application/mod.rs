//! Application Layer
//!
//! Use cases and application services.

pub mod check_session;
pub mod config;
pub mod session_login;
pub mod session_logout;
pub mod session_store;

// Re-exports
pub use check_session::{CheckSessionUseCase, SessionValidity};
pub use config::{AuthConfig, IdentityConfig};
pub use session_login::{SessionLoginOutput, SessionLoginUseCase};
pub use session_logout::{SessionLogoutOutput, SessionLogoutUseCase};
pub use session_store::SessionStore;
