//! Session Data
//!
//! Contents of the signed session cookie: the session credential under
//! `idToken` and an optional one-shot flash error. Values are immutable;
//! every change produces a new `SessionData` that must be committed to
//! reach the browser.

use serde::{Deserialize, Serialize};

use crate::domain::value_object::token::SessionCredential;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(rename = "idToken", default, skip_serializing_if = "Option::is_none")]
    credential: Option<SessionCredential>,
    #[serde(
        rename = "__flash_error__",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    flash_error: Option<String>,
}

impl SessionData {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn credential(&self) -> Option<&SessionCredential> {
        self.credential.as_ref()
    }

    pub fn flash_error(&self) -> Option<&str> {
        self.flash_error.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.credential.is_none() && self.flash_error.is_none()
    }

    pub fn with_credential(self, credential: SessionCredential) -> Self {
        Self {
            credential: Some(credential),
            ..self
        }
    }

    pub fn with_flash_error(self, message: impl Into<String>) -> Self {
        Self {
            flash_error: Some(message.into()),
            ..self
        }
    }

    /// Read the flash error once; the returned session no longer holds it.
    pub fn take_flash_error(self) -> (Option<String>, Self) {
        let Self {
            credential,
            flash_error,
        } = self;
        (
            flash_error,
            Self {
                credential,
                flash_error: None,
            },
        )
    }
}
