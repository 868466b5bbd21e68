//! HTTP Handlers
//!
//! Session pages and actions. Login and logout report failures as
//! `{ "error": { "message" } }` and never touch the cookie when they fail.

use axum::Json;
use axum::extract::{Form, FromRequest, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    CheckSessionUseCase, SessionLoginUseCase, SessionLogoutUseCase, SessionStore,
};
use crate::domain::provider::IdentityProvider;
use crate::error::AuthError;
use crate::presentation::dto::{
    ActionErrorResponse, LoginForm, SessionPageData, SessionStatusResponse,
};

/// Shared state for session handlers
pub struct AuthAppState<P>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    pub provider: Arc<P>,
    pub config: Arc<AuthConfig>,
    pub store: SessionStore,
}

impl<P> AuthAppState<P>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    pub fn new(provider: Arc<P>, config: AuthConfig) -> Self {
        let config = Arc::new(config);
        Self {
            provider,
            store: SessionStore::new(config.clone()),
            config,
        }
    }

    pub fn check_session(&self) -> CheckSessionUseCase<P> {
        CheckSessionUseCase::new(self.provider.clone(), self.store.clone())
    }
}

impl<P> Clone for AuthAppState<P>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            config: self.config.clone(),
            store: self.store.clone(),
        }
    }
}

/// Failed login/logout action
pub struct ActionFailure {
    status: StatusCode,
    message: String,
}

impl From<AuthError> for ActionFailure {
    fn from(err: AuthError) -> Self {
        err.log();
        Self {
            status: err.status_code(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ActionFailure {
    fn into_response(self) -> Response {
        (self.status, Json(ActionErrorResponse::new(self.message))).into_response()
    }
}

/// Login form accepted as `application/json` or urlencoded form data
pub struct LoginPayload(pub LoginForm);

impl<S> FromRequest<S> for LoginPayload
where
    S: Send + Sync,
{
    type Rejection = ActionFailure;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        let form = if is_json {
            Json::<LoginForm>::from_request(req, state)
                .await
                .map(|Json(form)| form)
                .map_err(|e| AuthError::InvalidInput(e.body_text()))?
        } else {
            Form::<LoginForm>::from_request(req, state)
                .await
                .map(|Form(form)| form)
                .map_err(|e| AuthError::InvalidInput(e.body_text()))?
        };

        Ok(Self(form))
    }
}

// ============================================================================
// Login
// ============================================================================

/// POST /login
pub async fn login_action<P>(
    State(state): State<AuthAppState<P>>,
    headers: HeaderMap,
    LoginPayload(form): LoginPayload,
) -> Result<Response, ActionFailure>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let use_case =
        SessionLoginUseCase::new(state.provider.clone(), state.store.clone(), state.config.clone());

    let output = use_case
        .execute(&headers, &form.id_token, form.redirect_to.as_deref())
        .await?;

    Ok((
        [(header::SET_COOKIE, output.set_cookie)],
        Redirect::to(&output.redirect_to),
    )
        .into_response())
}

/// GET /login and GET /
///
/// Claims of the current session, or `null`.
pub async fn session_page<P>(
    State(state): State<AuthAppState<P>>,
    headers: HeaderMap,
) -> Json<Option<SessionPageData>>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let claims = state.check_session().execute(&headers).await.into_claims();

    Json(claims.map(|decoded_claims| SessionPageData { decoded_claims }))
}

// ============================================================================
// Logout
// ============================================================================

/// GET /logout
pub async fn logout<P>(
    State(state): State<AuthAppState<P>>,
    headers: HeaderMap,
) -> Result<Response, ActionFailure>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let use_case =
        SessionLogoutUseCase::new(state.provider.clone(), state.store.clone(), state.config.clone());

    let output = use_case.execute(&headers).await?;

    Ok((
        [(header::SET_COOKIE, output.set_cookie)],
        Redirect::to(&output.redirect_to),
    )
        .into_response())
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /api/session
///
/// Reading a pending flash error consumes it, so the response then carries
/// a `Set-Cookie` with the flash removed.
pub async fn session_status<P>(
    State(state): State<AuthAppState<P>>,
    headers: HeaderMap,
) -> Result<Response, AuthError>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let validity = state.check_session().execute(&headers).await;

    let (flash_error, session) = state.store.get(&headers).take_flash_error();
    let set_cookie = match flash_error {
        Some(_) => Some(state.store.commit(&session)?),
        None => None,
    };

    let claims = validity.into_claims();
    let body = Json(SessionStatusResponse {
        authenticated: claims.is_some(),
        uid: claims.as_ref().map(|c| c.uid.to_string()),
        email: claims
            .as_ref()
            .and_then(|c| c.email.as_ref())
            .map(|e| e.to_string()),
        expires_at: claims.as_ref().map(|c| c.exp),
        flash_error,
    });

    Ok(match set_cookie {
        Some(cookie) => ([(header::SET_COOKIE, cookie)], body).into_response(),
        None => body.into_response(),
    })
}
