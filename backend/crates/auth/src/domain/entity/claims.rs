//! Decoded Claims
//!
//! What a verified identity token or session credential says about its
//! subject. Recomputed on every request and never persisted.

use serde::{Deserialize, Serialize};

use crate::domain::value_object::{email::Email, uid::Uid};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedClaims {
    /// Subject identifier
    pub uid: Uid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    /// Issuer URL
    pub iss: String,
    /// Audience (provider project id)
    pub aud: String,
    /// Seconds since epoch of the user's sign-in
    pub auth_time: i64,
    pub iat: i64,
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims() -> DecodedClaims {
        DecodedClaims {
            uid: Uid::parse_str("user-1").unwrap(),
            email: Some(Email::new("user@example.com").unwrap()),
            iss: "https://session.example/demo".to_string(),
            aud: "demo".to_string(),
            auth_time: 1_700_000_000,
            iat: 1_700_000_000,
            exp: 1_700_000_600,
        }
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(claims()).unwrap();
        assert_eq!(json["uid"], "user-1");
        assert_eq!(json["email"], "user@example.com");
        assert_eq!(json["auth_time"], 1_700_000_000);
    }
}
