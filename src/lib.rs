//! # Identity SDK
//!
//! The resource layer of a client SDK for an identity-management REST
//! service. Remote JSON resources (organizations, account creation policies,
//! email templates, authentication factors) are represented as typed local
//! objects that fetch themselves lazily, validate every write against a
//! per-type property registry, and track local changes for later saving.
//!
//! ## Overview
//!
//! This SDK provides:
//! - A closed property descriptor model ([`resource::PropertyDescriptor`],
//!   [`resource::PropertyRegistry`])
//! - The generic instance engine ([`resource::InstanceResource`]) with lazy
//!   materialization and dirty tracking
//! - Paginated collections ([`resource::CollectionResource`]) with lazy page
//!   advancement
//! - The [`datastore::DataStore`] contract with an in-memory and an HTTP store
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//!
//! ## Quick Start
//!
//! ```rust
//! use identity_sdk::{ApiKeyId, ApiKeySecret, BaseUrl, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://api.example.com/v1").unwrap())
//!     .api_key(ApiKeyId::new("id").unwrap(), ApiKeySecret::new("secret").unwrap())
//!     .default_page_limit(50)
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Working with Resources
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use identity_sdk::datastore::{HttpDataStore, QueryParams};
//! use identity_sdk::resource::{AccountCreationPolicy, EmailStatus, Href, ResourceType};
//!
//! let store = Arc::new(HttpDataStore::new(&config)?);
//!
//! // Nothing is fetched yet
//! let policy = AccountCreationPolicy::from_href(
//!     store.clone(),
//!     Href::new("/accountCreationPolicies/abc")?,
//! );
//!
//! // First read of an absent property fetches the policy once
//! if policy.welcome_email_status().await? == Some(EmailStatus::Disabled) {
//!     policy.set_welcome_email_status(EmailStatus::Enabled).await?;
//!     policy.save().await?; // POSTs only welcomeEmailStatus
//! }
//!
//! // Collection references never fetch the policy itself
//! let templates = policy
//!     .verification_email_templates(QueryParams::new(0, 25)?)
//!     .await?
//!     .iter()
//!     .collect_all()
//!     .await?;
//! ```
//!
//! ## Logging
//!
//! The crate emits `tracing` events (materialization, saves, page queries,
//! failures). Install a subscriber in the application to see them.
//!
//! ## Thread Safety
//!
//! Resources, collections, stores and configuration are `Send + Sync`.

pub mod clients;
pub mod config;
pub mod datastore;
pub mod error;
pub mod resource;

// Re-export public types at crate root for convenience
pub use config::{ApiKeyId, ApiKeySecret, BaseUrl, ClientConfig, ClientConfigBuilder};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError,
};

// Re-export the data store and resource layer
pub use datastore::{DataStore, HttpDataStore, MemoryDataStore, QueryParams, QueryResult};
pub use resource::{
    CollectionResource, Href, InstanceResource, PropertyDescriptor, PropertyRegistry,
    PropertyValue, ResourceError, ResourceType,
};
