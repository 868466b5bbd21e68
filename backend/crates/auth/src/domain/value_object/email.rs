//! Email Value Object
//!
//! Account email as used for sign-up, password sign-in and reset.
//! Stored trimmed and lowercased, so registry lookups ignore case.

use derive_more::Display;
use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// RFC 5321 path limit
const MAX_LEN: usize = 254;
const MAX_LOCAL_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(try_from = "String", into = "String")]
#[display("{_0}")]
pub struct Email(String);

impl Email {
    pub fn new(email: impl Into<String>) -> AppResult<Self> {
        let email = email.into().trim().to_lowercase();
        check(&email).map_err(|reason| AppError::bad_request(format!("Invalid email: {reason}")))?;
        Ok(Self(email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Syntax check only; deliverability is the mail system's problem
fn check(email: &str) -> Result<(), &'static str> {
    if email.is_empty() {
        return Err("empty");
    }
    if email.len() > MAX_LEN {
        return Err("too long");
    }

    let (local, host) = email.split_once('@').ok_or("missing @")?;
    if local.is_empty() || local.len() > MAX_LOCAL_LEN {
        return Err("bad local part");
    }

    let labels_ok = host.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    if !host.contains('.') || !labels_ok {
        return Err("bad domain");
    }

    Ok(())
}

impl FromStr for Email {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        Email::new(s)
    }
}

impl TryFrom<String> for Email {
    type Error = AppError;

    fn try_from(s: String) -> AppResult<Self> {
        Email::new(s)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}
