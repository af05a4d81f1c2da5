//! Property descriptors.
//!
//! A [`PropertyDescriptor`] declares one property of a resource type: its
//! wire name and its [`PropertyKind`]. Descriptors are `const`-constructible
//! so concrete resource types can declare them as associated constants and
//! hand them to a [`PropertyRegistry`](crate::resource::PropertyRegistry).
//!
//! # Example
//!
//! ```rust
//! use identity_sdk::resource::{EnumType, PropertyDescriptor, PropertyKind, ScalarType};
//!
//! const STATUS_TYPE: EnumType = EnumType::new("Status", &["ENABLED", "DISABLED"]);
//!
//! const NAME: PropertyDescriptor = PropertyDescriptor::string("name").required();
//! const STATUS: PropertyDescriptor = PropertyDescriptor::status("status", STATUS_TYPE);
//!
//! assert_eq!(NAME.kind(), PropertyKind::Scalar(ScalarType::String));
//! assert!(NAME.is_required());
//! assert_eq!(STATUS_TYPE.resolve("enabled"), Some("ENABLED"));
//! ```

use std::fmt;

use crate::resource::registry::PropertyRegistry;
use crate::resource::ResourceType;

/// The scalar value types a property can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// A JSON string.
    String,
    /// A JSON number.
    Number,
    /// A JSON boolean.
    Boolean,
    /// An RFC 3339 timestamp carried as a JSON string.
    Date,
    /// A free-form JSON object.
    Map,
    /// A nested resource reference, `{"href": "..."}` on the wire.
    Reference,
}

impl ScalarType {
    /// Returns a human-readable name for error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Map => "map",
            Self::Reference => "resource reference",
        }
    }
}

/// A closed set of symbolic values backing a status property.
///
/// Members are declared in their canonical, upper-case form. Raw strings are
/// resolved against them case-insensitively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EnumType {
    name: &'static str,
    members: &'static [&'static str],
}

impl EnumType {
    /// Declares an enum type with its canonical members.
    #[must_use]
    pub const fn new(name: &'static str, members: &'static [&'static str]) -> Self {
        Self { name, members }
    }

    /// Returns the enum type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the canonical member names in declaration order.
    #[must_use]
    pub const fn members(&self) -> &'static [&'static str] {
        self.members
    }

    /// Resolves a raw string to its canonical member, ignoring case.
    #[must_use]
    pub fn resolve(&self, raw: &str) -> Option<&'static str> {
        self.members
            .iter()
            .copied()
            .find(|member| member.eq_ignore_ascii_case(raw))
    }
}

/// A Rust enum mirroring an [`EnumType`].
///
/// Implemented by the status enums of concrete resource types so that
/// status properties can be read and written as typed values.
pub trait StatusEnum: Copy + Sized + 'static {
    /// The enum type this Rust enum mirrors.
    const ENUM_TYPE: EnumType;

    /// Returns the canonical member name.
    fn as_str(self) -> &'static str;

    /// Maps a canonical member name back to the Rust value.
    fn from_canonical(canonical: &str) -> Option<Self>;

    /// Parses a raw string case-insensitively.
    fn parse(raw: &str) -> Option<Self> {
        Self::ENUM_TYPE.resolve(raw).and_then(Self::from_canonical)
    }
}

/// A reference to a resource type used as an item type.
///
/// Holds the type's name and a function returning its registry, so item
/// types can be declared in `const` descriptors.
#[derive(Clone, Copy)]
pub struct ResourceTypeRef {
    name: &'static str,
    registry: fn() -> &'static PropertyRegistry,
}

impl ResourceTypeRef {
    /// Creates a reference from a type name and registry accessor.
    #[must_use]
    pub const fn new(name: &'static str, registry: fn() -> &'static PropertyRegistry) -> Self {
        Self { name, registry }
    }

    /// Creates a reference to a concrete [`ResourceType`].
    #[must_use]
    pub const fn of<T: ResourceType>() -> Self {
        Self::new(T::TYPE_NAME, T::registry)
    }

    /// Returns the referenced type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the referenced type's registry.
    #[must_use]
    pub fn registry(&self) -> &'static PropertyRegistry {
        (self.registry)()
    }
}

impl fmt::Debug for ResourceTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResourceTypeRef").field(&self.name).finish()
    }
}

// Type names are unique per process, comparing them avoids fn pointer equality.
impl PartialEq for ResourceTypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ResourceTypeRef {}

/// The element type of an inline array property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemType {
    /// Elements are scalar values.
    Scalar(ScalarType),
    /// Elements are inline resource representations or references.
    Resource(ResourceTypeRef),
}

/// The semantic kind of a property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    /// A single scalar value.
    Scalar(ScalarType),
    /// A string restricted to the members of an enum type.
    StatusEnum(EnumType),
    /// An array carried inline in the resource representation.
    InlineArray(ItemType),
    /// A pointer to a paginated query over other resources.
    CollectionReference(ResourceTypeRef),
}

/// Immutable declaration of one property of a resource type.
///
/// Descriptor identity is its name; a registry rejects two descriptors with
/// the same name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertyDescriptor {
    name: &'static str,
    kind: PropertyKind,
    required: bool,
}

impl PropertyDescriptor {
    /// Declares a property of the given kind.
    #[must_use]
    pub const fn new(name: &'static str, kind: PropertyKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }

    /// Declares a string property.
    #[must_use]
    pub const fn string(name: &'static str) -> Self {
        Self::new(name, PropertyKind::Scalar(ScalarType::String))
    }

    /// Declares a numeric property.
    #[must_use]
    pub const fn number(name: &'static str) -> Self {
        Self::new(name, PropertyKind::Scalar(ScalarType::Number))
    }

    /// Declares a boolean property.
    #[must_use]
    pub const fn boolean(name: &'static str) -> Self {
        Self::new(name, PropertyKind::Scalar(ScalarType::Boolean))
    }

    /// Declares a timestamp property.
    #[must_use]
    pub const fn date(name: &'static str) -> Self {
        Self::new(name, PropertyKind::Scalar(ScalarType::Date))
    }

    /// Declares a free-form map property.
    #[must_use]
    pub const fn map(name: &'static str) -> Self {
        Self::new(name, PropertyKind::Scalar(ScalarType::Map))
    }

    /// Declares a nested resource reference property.
    #[must_use]
    pub const fn reference(name: &'static str) -> Self {
        Self::new(name, PropertyKind::Scalar(ScalarType::Reference))
    }

    /// Declares an enum-backed status property.
    #[must_use]
    pub const fn status(name: &'static str, enum_type: EnumType) -> Self {
        Self::new(name, PropertyKind::StatusEnum(enum_type))
    }

    /// Declares an inline array property.
    #[must_use]
    pub const fn array(name: &'static str, item: ItemType) -> Self {
        Self::new(name, PropertyKind::InlineArray(item))
    }

    /// Declares a collection reference property.
    #[must_use]
    pub const fn collection(name: &'static str, item: ResourceTypeRef) -> Self {
        Self::new(name, PropertyKind::CollectionReference(item))
    }

    /// Marks the property as required: setting it to null is rejected.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Returns the property name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the property kind.
    #[must_use]
    pub const fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// Returns `true` if null values are rejected on write.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Returns `true` for collection reference properties.
    #[must_use]
    pub const fn is_collection_reference(&self) -> bool {
        matches!(self.kind, PropertyKind::CollectionReference(_))
    }
}
