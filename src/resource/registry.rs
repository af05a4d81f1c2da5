//! Per-type property descriptor registries.
//!
//! A [`PropertyRegistry`] is built once per concrete resource type and
//! shared by every instance of that type. Concrete types keep it in a
//! `static OnceLock`:
//!
//! ```rust
//! use std::sync::OnceLock;
//! use identity_sdk::resource::{PropertyDescriptor, PropertyRegistry};
//!
//! fn registry() -> &'static PropertyRegistry {
//!     static REGISTRY: OnceLock<PropertyRegistry> = OnceLock::new();
//!     REGISTRY.get_or_init(|| {
//!         PropertyRegistry::define(
//!             "Directory",
//!             &[
//!                 PropertyDescriptor::string("name").required(),
//!                 PropertyDescriptor::string("description"),
//!             ],
//!         )
//!     })
//! }
//!
//! assert!(registry().descriptor_for("name").is_ok());
//! assert!(registry().descriptor_for("nickname").is_err());
//! // Same instance on every call
//! assert!(std::ptr::eq(registry(), registry()));
//! ```

use std::collections::HashMap;

use crate::resource::{PropertyDescriptor, ResourceError};

/// Mapping from property name to descriptor for one resource type.
///
/// Keeps declaration order for [`PropertyRegistry::all_descriptors`].
#[derive(Debug)]
pub struct PropertyRegistry {
    type_name: &'static str,
    descriptors: Vec<PropertyDescriptor>,
    by_name: HashMap<&'static str, usize>,
}

impl PropertyRegistry {
    /// Builds a registry from a descriptor list.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::DuplicateProperty`] if two descriptors share a name.
    pub fn new(
        type_name: &'static str,
        descriptors: &[PropertyDescriptor],
    ) -> Result<Self, ResourceError> {
        let mut by_name = HashMap::with_capacity(descriptors.len());
        for (index, descriptor) in descriptors.iter().enumerate() {
            if by_name.insert(descriptor.name(), index).is_some() {
                return Err(ResourceError::DuplicateProperty {
                    resource: type_name,
                    property: descriptor.name(),
                });
            }
        }

        Ok(Self {
            type_name,
            descriptors: descriptors.to_vec(),
            by_name,
        })
    }

    /// Builds the registry of a statically declared resource type.
    ///
    /// # Panics
    ///
    /// Panics if two descriptors share a name. Static declarations are fixed
    /// at compile time, so a duplicate is a programming error in the type.
    #[must_use]
    pub fn define(type_name: &'static str, descriptors: &[PropertyDescriptor]) -> Self {
        match Self::new(type_name, descriptors) {
            Ok(registry) => registry,
            Err(error) => panic!("invalid property registry: {error}"),
        }
    }

    /// Returns the resource type name this registry describes.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Looks up the descriptor for a property name.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownProperty`] if the name is not registered.
    pub fn descriptor_for(&self, name: &str) -> Result<&PropertyDescriptor, ResourceError> {
        self.by_name
            .get(name)
            .map(|&index| &self.descriptors[index])
            .ok_or_else(|| ResourceError::UnknownProperty {
                resource: self.type_name,
                property: name.to_string(),
            })
    }

    /// Returns `true` if the name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Iterates over all descriptors in declaration order.
    pub fn all_descriptors(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.descriptors.iter()
    }

    /// Returns the number of registered descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` if no descriptors are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
