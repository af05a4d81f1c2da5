//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use std::fmt;

/// A validated API key id.
///
/// # Example
///
/// ```rust
/// use identity_sdk::ApiKeyId;
///
/// let id = ApiKeyId::new("6YQB0A8VXM0X8RVDPPLRHBI7J").unwrap();
/// assert_eq!(id.as_ref(), "6YQB0A8VXM0X8RVDPPLRHBI7J");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiKeyId(String);

impl ApiKeyId {
    /// Creates a new validated API key id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKeyId`] if the id is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ConfigError::EmptyApiKeyId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for ApiKeyId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated API key secret.
///
/// The `Debug` implementation masks the secret value, displaying only
/// `ApiKeySecret(*****)` instead of the actual secret.
///
/// ```rust
/// use identity_sdk::ApiKeySecret;
///
/// let secret = ApiKeySecret::new("my-secret").unwrap();
/// assert_eq!(format!("{:?}", secret), "ApiKeySecret(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKeySecret(String);

impl ApiKeySecret {
    /// Creates a new validated API key secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKeySecret`] if the secret is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::EmptyApiKeySecret);
        }
        Ok(Self(secret))
    }
}

impl AsRef<str> for ApiKeySecret {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKeySecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKeySecret(*****)")
    }
}

/// A validated base URL of the REST service.
///
/// Relative resource hrefs are resolved against this URL. A trailing slash
/// is removed on construction.
///
/// # Example
///
/// ```rust
/// use identity_sdk::BaseUrl;
///
/// let url = BaseUrl::new("https://api.example.com/v1/").unwrap();
/// assert_eq!(url.as_ref(), "https://api.example.com/v1");
/// assert_eq!(url.scheme(), "https");
/// assert_eq!(url.host_name(), "api.example.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL has no scheme or host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();

        let scheme_end = url
            .find("://")
            .ok_or_else(|| ConfigError::InvalidBaseUrl { url: url.clone() })?;

        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidBaseUrl { url });
        }

        let host_start = scheme_end + 3;
        if host_start >= url.len() {
            return Err(ConfigError::InvalidBaseUrl { url });
        }

        let remainder = &url[host_start..];
        let host_end = remainder
            .find([':', '/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);

        if host_end == host_start {
            return Err(ConfigError::InvalidBaseUrl { url });
        }

        Ok(Self {
            url,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.url[self.host_start..self.host_end]
    }

    /// Resolves an href against this base URL.
    ///
    /// Absolute hrefs are returned unchanged.
    #[must_use]
    pub fn resolve(&self, href: &str) -> String {
        if href.contains("://") {
            href.to_string()
        } else if href.starts_with('/') {
            format!("{}{href}", self.url)
        } else {
            format!("{}/{href}", self.url)
        }
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_id_rejects_empty_string() {
        assert!(matches!(ApiKeyId::new(""), Err(ConfigError::EmptyApiKeyId)));
        assert!(matches!(ApiKeyId::new("  "), Err(ConfigError::EmptyApiKeyId)));
    }

    #[test]
    fn test_api_key_secret_masks_value_in_debug() {
        let secret = ApiKeySecret::new("super-secret-key").unwrap();
        let debug_output = format!("{:?}", secret);
        assert_eq!(debug_output, "ApiKeySecret(*****)");
        assert!(!debug_output.contains("super-secret-key"));
    }

    #[test]
    fn test_base_url_validates_format() {
        let url = BaseUrl::new("https://api.example.com/v1").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_name(), "api.example.com");

        let url = BaseUrl::new("http://localhost:8080").unwrap();
        assert_eq!(url.host_name(), "localhost");
    }

    #[test]
    fn test_base_url_rejects_invalid() {
        assert!(BaseUrl::new("api.example.com").is_err());
        assert!(BaseUrl::new("https://").is_err());
        assert!(BaseUrl::new("://example.com").is_err());
    }

    #[test]
    fn test_base_url_resolves_relative_and_absolute_hrefs() {
        let url = BaseUrl::new("https://api.example.com/v1/").unwrap();
        assert_eq!(
            url.resolve("/organizations/abc"),
            "https://api.example.com/v1/organizations/abc"
        );
        assert_eq!(
            url.resolve("organizations/abc"),
            "https://api.example.com/v1/organizations/abc"
        );
        assert_eq!(
            url.resolve("https://other.example.com/x"),
            "https://other.example.com/x"
        );
    }
}
