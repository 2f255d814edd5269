//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use std::fmt;

/// A validated backend base URL.
///
/// This newtype ensures the URL is non-empty, carries an `http://` or
/// `https://` scheme, and is normalized with no trailing slash so paths can
/// be appended directly.
///
/// # Example
///
/// ```rust
/// use habit_api::BaseUrl;
///
/// let url = BaseUrl::new("http://127.0.0.1:8000/").unwrap();
/// assert_eq!(url.as_ref(), "http://127.0.0.1:8000");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// Trailing slashes are trimmed so `http://host/` and `http://host`
    /// produce the same value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyBaseUrl`] if the URL is empty, or
    /// [`ConfigError::InvalidBaseUrl`] if it does not start with `http://`
    /// or `https://`.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        if url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::InvalidBaseUrl { url });
        }
        let trimmed = url.trim_end_matches('/');
        if trimmed == "http://" || trimmed == "https://" {
            return Err(ConfigError::InvalidBaseUrl { url });
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_accepts_http_and_https() {
        assert!(BaseUrl::new("http://127.0.0.1:8000").is_ok());
        assert!(BaseUrl::new("https://tracker.example.com").is_ok());
    }

    #[test]
    fn test_base_url_rejects_empty() {
        assert!(matches!(BaseUrl::new(""), Err(ConfigError::EmptyBaseUrl)));
    }

    #[test]
    fn test_base_url_rejects_missing_scheme() {
        let result = BaseUrl::new("127.0.0.1:8000");
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_base_url_rejects_bare_scheme() {
        let result = BaseUrl::new("https://");
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_base_url_trims_trailing_slashes() {
        let url = BaseUrl::new("http://localhost:8000///").unwrap();
        assert_eq!(url.as_ref(), "http://localhost:8000");
    }

    #[test]
    fn test_base_url_display_matches_as_ref() {
        let url = BaseUrl::new("https://tracker.example.com").unwrap();
        assert_eq!(url.to_string(), url.as_ref());
    }
}
