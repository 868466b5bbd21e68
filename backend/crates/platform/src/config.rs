//! Environment configuration helpers
//!
//! Thin wrappers over `std::env` used by the binary to assemble typed config.
//! Blank values are treated the same as unset ones.

use std::env;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {name} has invalid value {value:?}")]
    Invalid { name: String, value: String },
}

/// Non-blank value of `name`, if set.
pub fn env_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn env_or(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}

/// Parse `name` into `T`; unset yields `Ok(None)`.
pub fn env_parse<T: FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match env_opt(name) {
        None => Ok(None),
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                name: name.to_string(),
                value,
            }),
    }
}

/// Comma separated list; empty entries are skipped, order is preserved.
pub fn env_list(name: &str) -> Vec<String> {
    env_opt(name).map(|v| split_list(&v)).unwrap_or_default()
}

pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// `APP_ENV=production` (case-insensitive)
pub fn is_production() -> bool {
    env_opt("APP_ENV").is_some_and(|v| v.eq_ignore_ascii_case("production"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list("new-secret, old-secret,,  "),
            vec!["new-secret".to_string(), "old-secret".to_string()]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_unset_variables() {
        let name = "PLATFORM_CONFIG_TEST_SURELY_UNSET";
        assert_eq!(env_opt(name), None);
        assert_eq!(env_or(name, "fb:token"), "fb:token");
        assert_eq!(env_parse::<u64>(name), Ok(None));
        assert!(env_list(name).is_empty());
    }
}
