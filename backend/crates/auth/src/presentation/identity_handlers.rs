//! Identity Emulator Handlers
//!
//! Client-facing account endpoints of the bundled emulator, shaped after the
//! hosted identity toolkit REST API so client code can target either.

use axum::Json;
use axum::extract::State;

use crate::error::{AuthError, AuthResult};
use crate::infra::emulator::{EmulatorIdentityProvider, SignInResult};
use crate::presentation::dto::{
    PasswordCredentialsRequest, ResetPasswordRequest, ResetPasswordResponse, SendOobCodeRequest,
    SendOobCodeResponse, SignInResponse,
};

const PASSWORD_RESET: &str = "PASSWORD_RESET";

fn sign_in_response(result: SignInResult) -> SignInResponse {
    SignInResponse {
        id_token: result.id_token.into_inner(),
        local_id: result.uid.to_string(),
        email: result.email.to_string(),
        expires_in: result.expires_in.to_string(),
    }
}

/// POST /accounts:signUp
pub async fn sign_up(
    State(idp): State<EmulatorIdentityProvider>,
    Json(req): Json<PasswordCredentialsRequest>,
) -> AuthResult<Json<SignInResponse>> {
    let result = idp.sign_up(&req.email, &req.password).await?;
    Ok(Json(sign_in_response(result)))
}

/// POST /accounts:signInWithPassword
pub async fn sign_in_with_password(
    State(idp): State<EmulatorIdentityProvider>,
    Json(req): Json<PasswordCredentialsRequest>,
) -> AuthResult<Json<SignInResponse>> {
    let result = idp.sign_in_with_password(&req.email, &req.password).await?;
    Ok(Json(sign_in_response(result)))
}

/// POST /accounts:sendOobCode
///
/// Only `PASSWORD_RESET` is supported. The code goes to the server log.
pub async fn send_oob_code(
    State(idp): State<EmulatorIdentityProvider>,
    Json(req): Json<SendOobCodeRequest>,
) -> AuthResult<Json<SendOobCodeResponse>> {
    if req.request_type != PASSWORD_RESET {
        return Err(AuthError::InvalidInput(format!(
            "Unsupported requestType: {}",
            req.request_type
        )));
    }

    idp.send_password_reset(&req.email).await?;

    Ok(Json(SendOobCodeResponse {
        email: req.email.trim().to_lowercase(),
    }))
}

/// POST /accounts:resetPassword
pub async fn reset_password(
    State(idp): State<EmulatorIdentityProvider>,
    Json(req): Json<ResetPasswordRequest>,
) -> AuthResult<Json<ResetPasswordResponse>> {
    let email = idp
        .confirm_password_reset(&req.oob_code, &req.new_password)
        .await?;

    Ok(Json(ResetPasswordResponse {
        email: email.to_string(),
        request_type: PASSWORD_RESET.to_string(),
    }))
}
