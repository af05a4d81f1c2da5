//! Error types for resource operations.
//!
//! Validation errors ([`ResourceError::UnknownProperty`],
//! [`ResourceError::InvalidPropertyValue`], [`ResourceError::NullNotAllowed`],
//! [`ResourceError::InvalidEnumValue`]) are detected locally before any call
//! reaches the data store. Remote errors ([`ResourceError::ResourceNotFound`],
//! [`ResourceError::Persistence`], [`ResourceError::Query`],
//! [`ResourceError::Transport`]) are surfaced exactly as the store reports
//! them. Nothing is retried automatically.
//!
//! # Example
//!
//! ```rust,ignore
//! use identity_sdk::resource::ResourceError;
//!
//! match policy.save().await {
//!     Ok(()) => println!("saved"),
//!     Err(ResourceError::Persistence { href, message }) => {
//!         // dirty properties are still pending, the save can be retried
//!         println!("could not save {href}: {message}");
//!     }
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```

use thiserror::Error;

use crate::clients::HttpError;

/// Error type for resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The property name has no descriptor in the resource type's registry.
    #[error("{resource} has no property named '{property}'")]
    UnknownProperty {
        /// The resource type name (e.g., "Organization").
        resource: &'static str,
        /// The requested property name.
        property: String,
    },

    /// A value does not match the shape declared by the property's descriptor.
    #[error("Invalid value for property '{property}': {reason}")]
    InvalidPropertyValue {
        /// The property name.
        property: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A required property was set to null.
    #[error("Property '{property}' cannot be null")]
    NullNotAllowed {
        /// The property name.
        property: String,
    },

    /// A stored value is not a member of the property's enum type.
    #[error("Value '{value}' of property '{property}' is not a valid {enum_type}")]
    InvalidEnumValue {
        /// The property name.
        property: String,
        /// The enum type name (e.g., "EmailStatus").
        enum_type: &'static str,
        /// The unrecognized raw value.
        value: String,
    },

    /// A registry was declared with the same property name twice.
    #[error("{resource} declares property '{property}' more than once")]
    DuplicateProperty {
        /// The resource type name.
        resource: &'static str,
        /// The duplicated property name.
        property: &'static str,
    },

    /// The operation needs a resource identity but the resource has none yet.
    #[error("{resource} has no href; {operation} requires a persisted resource")]
    MissingHref {
        /// The resource type name.
        resource: &'static str,
        /// The attempted operation (e.g., "save", "delete").
        operation: &'static str,
    },

    /// The remote resource does not exist.
    #[error("Resource {href} not found")]
    ResourceNotFound {
        /// The href that was requested.
        href: String,
    },

    /// The data store refused to persist the resource.
    #[error("Failed to persist {href}: {message}")]
    Persistence {
        /// The href of the resource being saved.
        href: String,
        /// The store's error description.
        message: String,
    },

    /// The data store rejected a collection query.
    #[error("Query on {href} failed: {message}")]
    Query {
        /// The queried collection href.
        href: String,
        /// The store's error description.
        message: String,
    },

    /// The data store returned a representation the resource layer cannot read.
    #[error("Malformed representation from {href}: {reason}")]
    Malformed {
        /// The href whose representation was malformed.
        href: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Transport-level failure passed through from the data store.
    #[error(transparent)]
    Transport(#[from] HttpError),
}

impl ResourceError {
    /// Returns `true` for errors detected locally, before any remote call.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnknownProperty { .. }
                | Self::InvalidPropertyValue { .. }
                | Self::NullNotAllowed { .. }
                | Self::InvalidEnumValue { .. }
                | Self::DuplicateProperty { .. }
                | Self::MissingHref { .. }
        )
    }

    pub(crate) fn invalid_value(property: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPropertyValue {
            property: property.to_string(),
            reason: reason.into(),
        }
    }
}

// Verify ResourceError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceError>();
};
