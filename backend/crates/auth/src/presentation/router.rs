//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::provider::IdentityProvider;
use crate::infra::emulator::EmulatorIdentityProvider;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::identity_handlers;

/// Session routes backed by the bundled identity emulator
pub fn auth_router(provider: EmulatorIdentityProvider, config: AuthConfig) -> Router {
    auth_router_generic(Arc::new(provider), config)
}

/// Session routes for any identity provider implementation
pub fn auth_router_generic<P>(provider: Arc<P>, config: AuthConfig) -> Router
where
    P: IdentityProvider + Send + Sync + 'static,
{
    session_routes(AuthAppState::new(provider, config))
}

/// Session routes over an existing state (share it with the middleware)
pub fn session_routes<P>(state: AuthAppState<P>) -> Router
where
    P: IdentityProvider + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(handlers::session_page::<P>))
        .route(
            "/login",
            get(handlers::session_page::<P>).post(handlers::login_action::<P>),
        )
        .route("/logout", get(handlers::logout::<P>))
        .route("/api/session", get(handlers::session_status::<P>))
        .with_state(state)
}

/// Client-facing emulator account API, mount under `/identity/v1`
pub fn identity_router(provider: EmulatorIdentityProvider) -> Router {
    Router::new()
        .route("/accounts:signUp", post(identity_handlers::sign_up))
        .route(
            "/accounts:signInWithPassword",
            post(identity_handlers::sign_in_with_password),
        )
        .route("/accounts:sendOobCode", post(identity_handlers::send_oob_code))
        .route("/accounts:resetPassword", post(identity_handlers::reset_password))
        .with_state(provider)
}
