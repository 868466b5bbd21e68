//! Shared Kernel
//!
//! The error vocabulary every backend crate speaks: [`error::app_error::AppError`],
//! its [`error::kind::ErrorKind`], and the problem-document rendering used
//! by the HTTP layer (feature `axum`).

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
