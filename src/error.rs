//! Error types for SDK configuration.
//!
//! This module contains the error type returned while building a
//! [`ClientConfig`](crate::ClientConfig) and its validated newtypes.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use identity_sdk::{ApiKeyId, ConfigError};
//!
//! let result = ApiKeyId::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKeyId)));
//! ```

use thiserror::Error;

/// Errors that can occur during SDK configuration.
///
/// Each variant provides a clear, actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API key id cannot be empty.
    #[error("API key id cannot be empty. Please provide a valid API key id.")]
    EmptyApiKeyId,

    /// API key secret cannot be empty.
    #[error("API key secret cannot be empty. Please provide a valid API key secret.")]
    EmptyApiKeySecret,

    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://api.example.com/v1').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// The default page limit must be positive.
    #[error("Invalid page limit {limit}. The page limit must be greater than zero.")]
    InvalidPageLimit {
        /// The rejected limit.
        limit: u32,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}

// Verify ConfigError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ConfigError>();
};
