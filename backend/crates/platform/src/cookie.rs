//! Cookies
//!
//! `Set-Cookie` rendering and `Cookie` header parsing.

use std::fmt::Write as _;
use std::str::FromStr;

use axum::http::{HeaderMap, HeaderValue, header};

/// Fixed date in the past used to expire cookies immediately
const EPOCH_EXPIRES: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

impl FromStr for SameSite {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(SameSite::Strict),
            "lax" => Ok(SameSite::Lax),
            "none" => Ok(SameSite::None),
            other => Err(format!("unknown SameSite policy: {other}")),
        }
    }
}

/// Attributes of one named cookie. The same attributes must be used to set
/// and to delete it, or the browser treats them as different cookies.
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    pub domain: Option<String>,
    pub max_age_secs: Option<i64>,
}

enum Lifetime {
    Session,
    MaxAge(i64),
    Expired,
}

impl CookieConfig {
    fn render(&self, value: &str, lifetime: Lifetime) -> String {
        let mut out = format!("{}={}", self.name, value);

        // fmt::Write into a String cannot fail
        let _ = match lifetime {
            Lifetime::Session => Ok(()),
            Lifetime::MaxAge(secs) => write!(out, "; Max-Age={secs}"),
            Lifetime::Expired => write!(out, "; Max-Age=0; Expires={EPOCH_EXPIRES}"),
        };
        if let Some(domain) = &self.domain {
            let _ = write!(out, "; Domain={domain}");
        }
        let _ = write!(out, "; Path={}", self.path);
        if self.http_only {
            out.push_str("; HttpOnly");
        }
        // browsers drop SameSite=None cookies that are not Secure
        if self.secure || self.same_site == SameSite::None {
            out.push_str("; Secure");
        }
        let _ = write!(out, "; SameSite={}", self.same_site.as_str());

        out
    }

    /// `Set-Cookie` value storing `value`
    pub fn build_set_cookie(&self, value: &str) -> String {
        let lifetime = match self.max_age_secs {
            Some(secs) => Lifetime::MaxAge(secs),
            None => Lifetime::Session,
        };
        self.render(value, lifetime)
    }

    /// `Set-Cookie` value that expires the cookie immediately
    pub fn build_delete_cookie(&self) -> String {
        self.render("", Lifetime::Expired)
    }
}

/// Extract a cookie value from headers.
///
/// Looks through every `Cookie` header; surrounding double quotes are removed.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;

            if key.trim() == name {
                let value = value.trim();
                let value = value
                    .strip_prefix('"')
                    .and_then(|v| v.strip_suffix('"'))
                    .unwrap_or(value);
                Some(value.to_string())
            } else {
                None
            }
        })
}

/// Create a Set-Cookie header value
pub fn set_cookie_header(cookie: &str) -> Option<HeaderValue> {
    match HeaderValue::from_str(cookie) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!(error = %e, "Set-Cookie value is not a valid header");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CookieConfig {
        CookieConfig {
            name: "fb:token".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            domain: Some("example.com".to_string()),
            max_age_secs: Some(600),
        }
    }

    #[test]
    fn test_cookie_config_build() {
        let cookie = config().build_set_cookie("value123");
        assert!(cookie.starts_with("fb:token=value123"));
        assert!(cookie.contains("Max-Age=600"));
        assert!(cookie.contains("Domain=example.com"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Lax"));
    }

    #[test]
    fn test_cookie_without_optional_attributes() {
        let config = CookieConfig {
            secure: false,
            domain: None,
            max_age_secs: None,
            ..config()
        };
        let cookie = config.build_set_cookie("v");
        assert!(!cookie.contains("Secure"));
        assert!(!cookie.contains("Domain="));
        assert!(!cookie.contains("Max-Age"));
    }

    #[test]
    fn test_same_site_none_forces_secure() {
        let config = CookieConfig {
            secure: false,
            same_site: SameSite::None,
            ..config()
        };
        let cookie = config.build_set_cookie("v");
        assert!(cookie.contains("; Secure"));
        assert!(cookie.ends_with("SameSite=None"));
    }

    #[test]
    fn test_delete_cookie() {
        let cookie = config().build_delete_cookie();
        assert!(cookie.starts_with("fb:token=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
        assert!(cookie.contains("Domain=example.com"));
        assert!(cookie.contains("Path=/"));
    }

    #[test]
    fn test_extract_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("foo=bar; fb:token=abc.def; quoted=\"xyz\""),
        );

        assert_eq!(extract_cookie(&headers, "fb:token"), Some("abc.def".to_string()));
        assert_eq!(extract_cookie(&headers, "foo"), Some("bar".to_string()));
        assert_eq!(extract_cookie(&headers, "quoted"), Some("xyz".to_string()));
        assert_eq!(extract_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_extract_cookie_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::COOKIE, HeaderValue::from_static("fb:token=t"));

        assert_eq!(extract_cookie(&headers, "fb:token"), Some("t".to_string()));
    }

    #[test]
    fn test_same_site_from_str() {
        assert_eq!("lax".parse::<SameSite>().unwrap(), SameSite::Lax);
        assert_eq!("Strict".parse::<SameSite>().unwrap(), SameSite::Strict);
        assert_eq!(" NONE ".parse::<SameSite>().unwrap(), SameSite::None);
        assert!("sometimes".parse::<SameSite>().is_err());
    }
}
