//! Identity Provider Seam
//!
//! The session layer treats the identity provider as an opaque collaborator:
//! it hands tokens over and gets claims or errors back. Verification
//! internals (key rotation, signature schemes) stay behind this trait.

use std::time::Duration;

use crate::domain::entity::claims::DecodedClaims;
use crate::domain::value_object::{
    token::{IdToken, SessionCredential},
    uid::Uid,
};
use crate::error::AuthResult;

/// Shortest session credential a provider will mint
pub const MIN_SESSION_DURATION: Duration = Duration::from_secs(5 * 60);

/// Longest session credential a provider will mint
pub const MAX_SESSION_DURATION: Duration = Duration::from_secs(14 * 24 * 3600);

#[trait_variant::make(IdentityProvider: Send)]
pub trait LocalIdentityProvider {
    /// Verify a short-lived identity token issued to a client
    async fn verify_id_token(&self, id_token: &IdToken) -> AuthResult<DecodedClaims>;

    /// Exchange a freshly issued identity token for a session credential
    /// valid for `valid_for`
    async fn create_session_credential(
        &self,
        id_token: &IdToken,
        valid_for: Duration,
    ) -> AuthResult<SessionCredential>;

    /// Verify a session credential; with `check_revoked` the provider is
    /// asked whether the subject's tokens were revoked, disabled or deleted
    async fn verify_session_credential(
        &self,
        credential: &SessionCredential,
        check_revoked: bool,
    ) -> AuthResult<DecodedClaims>;

    /// Revoke every refresh token and session credential issued to `uid`
    async fn revoke_refresh_tokens(&self, uid: &Uid) -> AuthResult<()>;
}

/// Whether `valid_for` lies within the bounds providers accept
pub fn is_valid_session_duration(valid_for: Duration) -> bool {
    (MIN_SESSION_DURATION..=MAX_SESSION_DURATION).contains(&valid_for)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_duration_bounds() {
        assert!(is_valid_session_duration(Duration::from_secs(5 * 60)));
        assert!(is_valid_session_duration(Duration::from_secs(5 * 24 * 3600)));
        assert!(is_valid_session_duration(Duration::from_secs(14 * 24 * 3600)));
        assert!(!is_valid_session_duration(Duration::from_secs(299)));
        assert!(!is_valid_session_duration(Duration::from_secs(14 * 24 * 3600 + 1)));
    }
}
