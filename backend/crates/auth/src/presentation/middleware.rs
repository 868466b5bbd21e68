//! Auth Middleware
//!
//! Session checks for routes mounted behind the session layer. Use with
//! `axum::middleware::from_fn_with_state`.

use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::application::SessionValidity;
use crate::domain::entity::claims::DecodedClaims;
use crate::domain::provider::IdentityProvider;
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

/// Authentication status stored in request extensions
#[derive(Debug, Clone)]
pub struct AuthStatus {
    pub is_authenticated: bool,
    pub claims: Option<DecodedClaims>,
}

/// Middleware that requires a valid session.
///
/// On success the verified [`DecodedClaims`] are added to the request
/// extensions. Otherwise responds 401 with `X-Auth-Required: true`; when a
/// stale credential was presented, the reason is stored as a flash error.
pub async fn require_auth_session<P>(
    State(state): State<AuthAppState<P>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    match state.check_session().execute(req.headers()).await {
        SessionValidity::Valid(claims) => {
            req.extensions_mut().insert(claims);
            Ok(next.run(req).await)
        }
        SessionValidity::Invalid(err) => {
            let mut response =
                (StatusCode::UNAUTHORIZED, [("X-Auth-Required", "true")]).into_response();

            if err != AuthError::MissingCredential {
                let session = state.store.get(req.headers()).with_flash_error(err.to_string());
                let cookie = state
                    .store
                    .commit(&session)
                    .ok()
                    .and_then(|c| platform::cookie::set_cookie_header(&c));
                if let Some(cookie) = cookie {
                    response.headers_mut().insert(header::SET_COOKIE, cookie);
                }
            }

            Err(response)
        }
    }
}

/// Middleware that checks the session but doesn't require it
pub async fn check_auth_session<P>(
    State(state): State<AuthAppState<P>>,
    mut req: Request,
    next: Next,
) -> Response
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let claims = state
        .check_session()
        .execute(req.headers())
        .await
        .into_claims();

    req.extensions_mut().insert(AuthStatus {
        is_authenticated: claims.is_some(),
        claims,
    });

    next.run(req).await
}
