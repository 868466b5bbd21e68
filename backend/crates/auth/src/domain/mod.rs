//! Domain Layer
//!
//! Contains entities, value objects, the identity provider seam and the
//! account repository trait.

pub mod entity;
pub mod provider;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{account::Account, claims::DecodedClaims, session_data::SessionData};
pub use provider::IdentityProvider;
pub use repository::AccountRepository;
