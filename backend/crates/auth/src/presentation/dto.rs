//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::claims::DecodedClaims;

// ============================================================================
// Session Login
// ============================================================================

/// Login form posted by the client after it signed in with the provider
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    #[serde(default)]
    pub id_token: String,
    /// Where to go after login; only same-site paths are honored
    pub redirect_to: Option<String>,
}

/// Failure payload of the login and logout actions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionErrorResponse {
    pub error: ActionErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionErrorBody {
    pub message: String,
}

impl ActionErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ActionErrorBody {
                message: message.into(),
            },
        }
    }
}

// ============================================================================
// Page data
// ============================================================================

/// Data for pages that show the signed-in user; `null` when logged out
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPageData {
    pub decoded_claims: DecodedClaims,
}

// ============================================================================
// Session Status
// ============================================================================

/// Session status response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    pub uid: Option<String>,
    pub email: Option<String>,
    /// Credential expiry (seconds since epoch)
    pub expires_at: Option<i64>,
    /// Why the last protected request was rejected; shown once
    pub flash_error: Option<String>,
}

// ============================================================================
// Identity emulator account API
// ============================================================================

/// Sign up / password sign-in request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordCredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Sign up / password sign-in response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub id_token: String,
    pub local_id: String,
    pub email: String,
    /// Identity token lifetime in seconds, as a string
    pub expires_in: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOobCodeRequest {
    pub request_type: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOobCodeResponse {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub oob_code: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordResponse {
    pub email: String,
    pub request_type: String,
}
