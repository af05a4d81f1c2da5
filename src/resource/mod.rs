//! Resource materialization layer.
//!
//! This module turns remote JSON resources into typed local objects:
//!
//! - **[`PropertyDescriptor`]**: Declares one property's name and [`PropertyKind`]
//! - **[`PropertyRegistry`]**: The closed set of descriptors of one resource type
//! - **[`InstanceResource`]**: Lazy materialization, typed get/set and dirty tracking
//! - **[`CollectionResource`]**: One frozen page of a paginated query, with lazy advancement
//! - **[`ResourceType`]**: Implemented by concrete types wrapping an [`InstanceResource`]
//! - **[`ResourceError`]**: Validation and store errors
//!
//! # Overview
//!
//! Concrete types (in [`types`]) are thin: they declare descriptors as
//! associated constants, build a registry once, and expose typed accessors
//! that forward to the engine. All behavior lives in [`InstanceResource`] and
//! [`CollectionResource`].
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use identity_sdk::datastore::{MemoryDataStore, QueryParams};
//! use identity_sdk::resource::{AccountCreationPolicy, EmailStatus, Href, ResourceType};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let store = Arc::new(MemoryDataStore::new());
//! let href = Href::new("/accountCreationPolicies/1").unwrap();
//! store.insert(&href, json!({
//!     "verificationEmailStatus": "disabled",
//!     "verificationSuccessEmailStatus": "DISABLED",
//!     "welcomeEmailStatus": "Enabled",
//! }).as_object().unwrap().clone());
//!
//! let policy = AccountCreationPolicy::from_href(store.clone(), href);
//! assert_eq!(policy.welcome_email_status().await.unwrap(), Some(EmailStatus::Enabled));
//!
//! policy.set_verification_email_status(EmailStatus::Enabled).await.unwrap();
//! assert_eq!(policy.dirty_properties().await, vec!["verificationEmailStatus".to_string()]);
//! policy.save().await.unwrap();
//! # });
//! ```

mod collection;
mod errors;
mod href;
mod instance;
mod property;
mod registry;
pub mod types;
mod value;

pub use collection::{CollectionIter, CollectionResource};
pub use errors::ResourceError;
pub use href::Href;
pub use instance::{InstanceResource, Materialization, ResourceType};
pub use property::{
    EnumType, ItemType, PropertyDescriptor, PropertyKind, ResourceTypeRef, ScalarType, StatusEnum,
};
pub use registry::PropertyRegistry;
pub use value::{PropertyMap, PropertyValue};

pub use types::{
    AccountCreationPolicy, EmailStatus, GoogleAuthenticatorFactor, ModeledEmailTemplate,
    Organization, OrganizationList, Status, UnmodeledEmailTemplate,
};
