//! Configuration types for the identity SDK.
//!
//! This module provides the configuration used to construct an
//! [`HttpDataStore`](crate::datastore::HttpDataStore) and to pick default
//! pagination settings for collection queries.
//!
//! # Overview
//!
//! - [`ClientConfig`]: The main configuration struct holding all SDK settings
//! - [`ClientConfigBuilder`]: A builder for constructing [`ClientConfig`] instances
//! - [`ApiKeyId`] / [`ApiKeySecret`]: Validated API key pair (secret masked in debug output)
//! - [`BaseUrl`]: The validated base URL of the REST service
//!
//! # Example
//!
//! ```rust
//! use identity_sdk::{ApiKeyId, ApiKeySecret, BaseUrl, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://api.example.com/v1").unwrap())
//!     .api_key(ApiKeyId::new("id").unwrap(), ApiKeySecret::new("secret").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.default_page_limit(), 25);
//! ```

mod newtypes;

use std::time::Duration;

pub use newtypes::{ApiKeyId, ApiKeySecret, BaseUrl};

use crate::error::ConfigError;

/// Page size used when neither the caller nor the configuration picks one.
pub const DEFAULT_PAGE_LIMIT: u32 = 25;

/// Configuration for the identity SDK.
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: BaseUrl,
    api_key: Option<(ApiKeyId, ApiKeySecret)>,
    user_agent_prefix: Option<String>,
    default_page_limit: u32,
    request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the base URL of the REST service.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the API key id, if configured.
    #[must_use]
    pub fn api_key_id(&self) -> Option<&ApiKeyId> {
        self.api_key.as_ref().map(|(id, _)| id)
    }

    /// Returns the API key secret, if configured.
    #[must_use]
    pub fn api_key_secret(&self) -> Option<&ApiKeySecret> {
        self.api_key.as_ref().map(|(_, secret)| secret)
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the page limit used for collection queries without an explicit limit.
    #[must_use]
    pub const fn default_page_limit(&self) -> u32 {
        self.default_page_limit
    }

    /// Returns the per-request timeout applied by the HTTP data store, if any.
    #[must_use]
    pub const fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// `base_url` is required. All other fields have defaults.
///
/// # Defaults
///
/// - `api_key`: `None` (requests are sent without credentials)
/// - `user_agent_prefix`: `None`
/// - `default_page_limit`: [`DEFAULT_PAGE_LIMIT`]
/// - `request_timeout`: `None`
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<BaseUrl>,
    api_key: Option<(ApiKeyId, ApiKeySecret)>,
    user_agent_prefix: Option<String>,
    default_page_limit: Option<u32>,
    request_timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL (required).
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API key pair sent as HTTP Basic credentials.
    #[must_use]
    pub fn api_key(mut self, id: ApiKeyId, secret: ApiKeySecret) -> Self {
        self.api_key = Some((id, secret));
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the default page limit for collection queries.
    #[must_use]
    pub const fn default_page_limit(mut self, limit: u32) -> Self {
        self.default_page_limit = Some(limit);
        self
    }

    /// Sets a timeout applied to every HTTP request.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Builds the [`ClientConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `base_url` is not set
    /// and [`ConfigError::InvalidPageLimit`] if the page limit is zero.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;

        let default_page_limit = self.default_page_limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        if default_page_limit == 0 {
            return Err(ConfigError::InvalidPageLimit {
                limit: default_page_limit,
            });
        }

        Ok(ClientConfig {
            base_url,
            api_key: self.api_key,
            user_agent_prefix: self.user_agent_prefix,
            default_page_limit,
            request_timeout: self.request_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> BaseUrl {
        BaseUrl::new("https://api.example.com/v1").unwrap()
    }

    #[test]
    fn test_builder_requires_base_url() {
        let result = ClientConfigBuilder::new().build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "base_url" })
        ));
    }

    #[test]
    fn test_builder_rejects_zero_page_limit() {
        let result = ClientConfig::builder()
            .base_url(base_url())
            .default_page_limit(0)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidPageLimit { limit: 0 })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = ClientConfig::builder().base_url(base_url()).build().unwrap();

        assert_eq!(config.default_page_limit(), DEFAULT_PAGE_LIMIT);
        assert!(config.api_key_id().is_none());
        assert!(config.api_key_secret().is_none());
        assert!(config.user_agent_prefix().is_none());
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let config = ClientConfig::builder()
            .base_url(base_url())
            .api_key(
                ApiKeyId::new("key-id").unwrap(),
                ApiKeySecret::new("key-secret").unwrap(),
            )
            .user_agent_prefix("MyApp/1.0")
            .default_page_limit(100)
            .request_timeout(Duration::from_secs(10))
            .build()
            .unwrap();

        assert_eq!(config.api_key_id().unwrap().as_ref(), "key-id");
        assert_eq!(config.api_key_secret().unwrap().as_ref(), "key-secret");
        assert_eq!(config.user_agent_prefix(), Some("MyApp/1.0"));
        assert_eq!(config.default_page_limit(), 100);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_config_debug_masks_secret() {
        let config = ClientConfig::builder()
            .base_url(base_url())
            .api_key(
                ApiKeyId::new("key-id").unwrap(),
                ApiKeySecret::new("very-secret").unwrap(),
            )
            .build()
            .unwrap();

        let debug_str = format!("{:?}", config);
        assert!(debug_str.contains("ClientConfig"));
        assert!(!debug_str.contains("very-secret"));
    }
}
