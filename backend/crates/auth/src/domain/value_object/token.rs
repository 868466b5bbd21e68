//! Token Value Objects
//!
//! Opaque provider-issued strings. The session layer never looks inside
//! them; it only hands them back to the identity provider. `Debug` output
//! is redacted so tokens never end up in logs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// Short-lived identity token obtained by the client from the provider
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdToken(String);

/// Long-lived session credential minted by the provider from an identity token
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionCredential(String);

macro_rules! opaque_token {
    ($name:ident) => {
        impl $name {
            /// Wrap a raw token; blank input is rejected.
            pub fn new(raw: impl Into<String>) -> AuthResult<Self> {
                let raw = raw.into();
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(AuthError::InvalidCredential(
                        concat!(stringify!($name), " is empty").to_string(),
                    ));
                }
                Ok(Self(trimmed.to_string()))
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[inline]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&"[REDACTED]").finish()
            }
        }
    };
}

opaque_token!(IdToken);
opaque_token!(SessionCredential);
