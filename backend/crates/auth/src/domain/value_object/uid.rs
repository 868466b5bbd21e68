//! Uid Value Object
//!
//! Provider-assigned subject identifier. Accounts created by the bundled
//! emulator get a Nanoid; uids read back from credentials are taken as-is.
//!
//! ## Usage
//! ```rust
//! use auth::domain::value_object::uid::Uid;
//!
//! let uid = Uid::generate();
//! assert_eq!(uid.as_str().len(), 21);
//! ```

use derive_more::Display;
use kernel::error::app_error::{AppError, AppResult};
use nid::Nanoid;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Maximum uid length accepted from a credential
const UID_MAX_LENGTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(transparent)]
#[display("{_0}")]
pub struct Uid(String);

impl Uid {
    #[inline]
    pub fn generate() -> Self {
        let id: Nanoid = Nanoid::new();
        Self(id.as_str().to_string())
    }

    pub fn parse_str(s: &str) -> AppResult<Self> {
        if s.is_empty() || s.len() > UID_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Uid must be 1 to {} characters",
                UID_MAX_LENGTH
            )));
        }
        Ok(Self(s.to_string()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Uid {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        Uid::parse_str(s)
    }
}

impl AsRef<str> for Uid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
