//! JWT codec for the identity emulator
//!
//! Identity tokens and session credentials are both HS256 JWTs signed with
//! the emulator's secret. They carry different issuers so one can never be
//! accepted in place of the other.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::application::config::IdentityConfig;
use crate::domain::entity::{account::Account, claims::DecodedClaims};
use crate::domain::value_object::{email::Email, uid::Uid};
use crate::error::{AuthError, AuthResult};

/// Which kind of token is being issued or checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    IdToken,
    SessionCredential,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::IdToken => write!(f, "ID token"),
            TokenKind::SessionCredential => write!(f, "session credential"),
        }
    }
}

/// Registered and private claims carried by emulator tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub iss: String,
    pub aud: String,
    pub auth_time: i64,
    pub iat: i64,
    pub exp: i64,
    /// Account token generation at issue time
    #[serde(rename = "gen")]
    pub token_generation: u64,
    pub jti: String,
}

impl TokenClaims {
    pub fn to_decoded(&self) -> AuthResult<DecodedClaims> {
        let uid = Uid::parse_str(&self.sub)
            .map_err(|_| AuthError::InvalidCredential("Token has an invalid subject".to_string()))?;
        let email = self
            .email
            .as_deref()
            .map(Email::new)
            .transpose()
            .map_err(|_| AuthError::InvalidCredential("Token has an invalid email".to_string()))?;

        Ok(DecodedClaims {
            uid,
            email,
            iss: self.iss.clone(),
            aud: self.aud.clone(),
            auth_time: self.auth_time,
            iat: self.iat,
            exp: self.exp,
        })
    }
}

/// JWT service for emulator tokens
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    project_id: String,
    id_token_issuer: String,
    session_issuer: String,
}

impl TokenCodec {
    pub fn new(config: &IdentityConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(&config.signing_secret),
            decoding_key: DecodingKey::from_secret(&config.signing_secret),
            project_id: config.project_id.clone(),
            id_token_issuer: config.id_token_issuer(),
            session_issuer: config.session_issuer(),
        }
    }

    fn issuer(&self, kind: TokenKind) -> &str {
        match kind {
            TokenKind::IdToken => &self.id_token_issuer,
            TokenKind::SessionCredential => &self.session_issuer,
        }
    }

    /// Issue a token of `kind` for `account`, valid for `ttl` from now.
    pub fn issue(
        &self,
        kind: TokenKind,
        account: &Account,
        auth_time: i64,
        ttl: Duration,
    ) -> AuthResult<String> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: account.uid.to_string(),
            email: Some(account.email.to_string()),
            iss: self.issuer(kind).to_string(),
            aud: self.project_id.clone(),
            auth_time,
            iat: now,
            exp: now.saturating_add(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)),
            token_generation: account.token_generation,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        self.encode_claims(&claims)
    }

    pub(crate) fn encode_claims(&self, claims: &TokenClaims) -> AuthResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Token encoding failed: {e}")))
    }

    /// Validate signature, issuer, audience and expiry of a `kind` token.
    pub fn decode(&self, kind: TokenKind, token: &str) -> AuthResult<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer(kind)]);
        validation.set_audience(&[&self.project_id]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        // Strict expiration checking
        validation.leeway = 0;

        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| map_jwt_error(kind, e))
    }
}

fn map_jwt_error(kind: TokenKind, err: jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::CredentialExpired,
        ErrorKind::InvalidIssuer => {
            AuthError::InvalidCredential(format!("Token is not a valid {kind}"))
        }
        ErrorKind::InvalidAudience => {
            AuthError::InvalidCredential("Token was issued for another project".to_string())
        }
        ErrorKind::InvalidSignature => {
            AuthError::InvalidCredential(format!("{kind} has an invalid signature"))
        }
        _ => AuthError::InvalidCredential(format!("Malformed {kind}")),
    }
}
