//! Typed property values and their conversion to and from raw JSON.
//!
//! Resources store raw [`serde_json::Value`]s exactly as the data store
//! returned them. Every read and write goes through the property's
//! descriptor, which converts between the raw form and [`PropertyValue`].

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Number, Value};

use crate::resource::{
    Href, ItemType, PropertyDescriptor, PropertyKind, ResourceError, ResourceTypeRef, ScalarType,
    StatusEnum,
};

/// Raw property map of a resource representation.
pub type PropertyMap = Map<String, Value>;

/// A property value checked against its descriptor.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// Absent or explicit null.
    Null,
    /// A string.
    String(String),
    /// A number.
    Number(Number),
    /// A boolean.
    Boolean(bool),
    /// A timestamp.
    Date(DateTime<Utc>),
    /// A free-form JSON object.
    Map(PropertyMap),
    /// A nested resource reference.
    Reference(Href),
    /// A canonical enum member.
    Enum(&'static str),
    /// An inline array.
    Array(Vec<PropertyValue>),
    /// A collection reference.
    Collection(Href),
}

impl PropertyValue {
    /// Wraps a typed status enum value.
    #[must_use]
    pub fn enum_member<E: StatusEnum>(value: E) -> Self {
        Self::Enum(value.as_str())
    }

    /// Returns `true` for [`PropertyValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string content of string and enum values.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            Self::Enum(s) => Some(*s),
            _ => None,
        }
    }

    /// Returns the boolean content.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the numeric content as an `i64` when it fits.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Returns the href of references and collection references.
    #[must_use]
    pub const fn as_href(&self) -> Option<&Href> {
        match self {
            Self::Reference(href) | Self::Collection(href) => Some(href),
            _ => None,
        }
    }

    pub(crate) fn type_label(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::Date(_) => "date",
            Self::Map(_) => "map",
            Self::Reference(_) => "resource reference",
            Self::Enum(_) => "enum",
            Self::Array(_) => "array",
            Self::Collection(_) => "collection reference",
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for PropertyValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<DateTime<Utc>> for PropertyValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl From<PropertyMap> for PropertyValue {
    fn from(value: PropertyMap) -> Self {
        Self::Map(value)
    }
}

impl From<Href> for PropertyValue {
    fn from(value: Href) -> Self {
        Self::Reference(value)
    }
}

impl From<Vec<Self>> for PropertyValue {
    fn from(value: Vec<Self>) -> Self {
        Self::Array(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for PropertyValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Extracts the `href` of a `{"href": "..."}` object.
pub(crate) fn href_of(value: &Value) -> Option<Href> {
    value
        .get("href")
        .and_then(Value::as_str)
        .and_then(|s| Href::new(s).ok())
}

fn reference_value(href: &Href) -> Value {
    let mut map = Map::new();
    map.insert("href".to_string(), Value::String(href.as_str().to_string()));
    Value::Object(map)
}

fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

fn raw_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(property: &str, expected: &str, found: &str) -> ResourceError {
    ResourceError::invalid_value(property, format!("expected {expected}, found {found}"))
}

fn decode_scalar(property: &str, scalar: ScalarType, raw: &Value) -> Result<PropertyValue, ResourceError> {
    match (scalar, raw) {
        (_, Value::Null) => Ok(PropertyValue::Null),
        (ScalarType::String, Value::String(s)) => Ok(PropertyValue::String(s.clone())),
        (ScalarType::Number, Value::Number(n)) => Ok(PropertyValue::Number(n.clone())),
        (ScalarType::Number, Value::String(s)) => s
            .trim()
            .parse::<Number>()
            .map(PropertyValue::Number)
            .map_err(|_| mismatch(property, "number", "non-numeric string")),
        (ScalarType::Boolean, Value::Bool(b)) => Ok(PropertyValue::Boolean(*b)),
        (ScalarType::Boolean, Value::String(s)) if s.eq_ignore_ascii_case("true") => {
            Ok(PropertyValue::Boolean(true))
        }
        (ScalarType::Boolean, Value::String(s)) if s.eq_ignore_ascii_case("false") => {
            Ok(PropertyValue::Boolean(false))
        }
        (ScalarType::Date, Value::String(s)) => parse_date(s)
            .map(PropertyValue::Date)
            .ok_or_else(|| ResourceError::invalid_value(property, format!("'{s}' is not an RFC 3339 timestamp"))),
        (ScalarType::Map, Value::Object(map)) => Ok(PropertyValue::Map(map.clone())),
        (ScalarType::Reference, Value::Object(_)) => href_of(raw)
            .map(PropertyValue::Reference)
            .ok_or_else(|| ResourceError::invalid_value(property, "reference has no href")),
        (scalar, raw) => Err(mismatch(property, scalar.name(), raw_label(raw))),
    }
}

fn encode_scalar(property: &str, scalar: ScalarType, value: PropertyValue) -> Result<Value, ResourceError> {
    match (scalar, value) {
        (ScalarType::String, PropertyValue::String(s)) => Ok(Value::String(s)),
        (ScalarType::Number, PropertyValue::Number(n)) => Ok(Value::Number(n)),
        (ScalarType::Boolean, PropertyValue::Boolean(b)) => Ok(Value::Bool(b)),
        (ScalarType::Date, PropertyValue::Date(d)) => Ok(Value::String(format_date(&d))),
        (ScalarType::Date, PropertyValue::String(s)) => parse_date(&s)
            .map(|d| Value::String(format_date(&d)))
            .ok_or_else(|| ResourceError::invalid_value(property, format!("'{s}' is not an RFC 3339 timestamp"))),
        (ScalarType::Map, PropertyValue::Map(map)) => Ok(Value::Object(map)),
        (ScalarType::Reference, PropertyValue::Reference(href)) => Ok(reference_value(&href)),
        (scalar, value) => Err(mismatch(property, scalar.name(), value.type_label())),
    }
}

fn decode_item(property: &str, item: ItemType, raw: &Value) -> Result<PropertyValue, ResourceError> {
    match item {
        ItemType::Scalar(scalar) => decode_scalar(property, scalar, raw),
        ItemType::Resource(kind) => match raw {
            Value::Object(map) => {
                verify_item(property, kind, map)?;
                Ok(PropertyValue::Map(map.clone()))
            }
            other => Err(mismatch(property, "resource representation", raw_label(other))),
        },
    }
}

fn item_error(property: &str, kind: ResourceTypeRef, error: &ResourceError) -> ResourceError {
    ResourceError::invalid_value(property, format!("invalid {} item: {error}", kind.name()))
}

/// Checks the known properties of a stored item representation.
///
/// Names the item type does not declare are tolerated on read, as they are
/// for top-level representations.
fn verify_item(
    property: &str,
    kind: ResourceTypeRef,
    map: &PropertyMap,
) -> Result<(), ResourceError> {
    let registry = kind.registry();
    for (name, raw) in map {
        if name == "href" || !registry.contains(name) {
            continue;
        }
        registry
            .descriptor_for(name)
            .and_then(|descriptor| descriptor.decode(Some(raw)))
            .map_err(|error| item_error(property, kind, &error))?;
    }
    Ok(())
}

/// Validates an item representation against its type's registry before it
/// is written, normalizing status values.
fn normalize_item(
    property: &str,
    kind: ResourceTypeRef,
    map: PropertyMap,
) -> Result<PropertyMap, ResourceError> {
    let registry = kind.registry();
    map.into_iter()
        .map(|(name, raw)| {
            if name == "href" {
                return Ok((name, raw));
            }
            let descriptor = registry
                .descriptor_for(&name)
                .map_err(|error| item_error(property, kind, &error))?;
            let typed = descriptor
                .decode(Some(&raw))
                .map_err(|error| item_error(property, kind, &error))?;
            let value = match descriptor.kind() {
                PropertyKind::CollectionReference(_) => raw,
                _ => descriptor
                    .encode(typed)
                    .map_err(|error| item_error(property, kind, &error))?,
            };
            Ok((name, value))
        })
        .collect()
}

fn encode_item(property: &str, item: ItemType, value: PropertyValue) -> Result<Value, ResourceError> {
    match (item, value) {
        (_, PropertyValue::Null) => Err(ResourceError::NullNotAllowed {
            property: property.to_string(),
        }),
        (ItemType::Scalar(scalar), value) => encode_scalar(property, scalar, value),
        (ItemType::Resource(kind), PropertyValue::Map(map)) => {
            normalize_item(property, kind, map).map(Value::Object)
        }
        (ItemType::Resource(_), PropertyValue::Reference(href)) => Ok(reference_value(&href)),
        (ItemType::Resource(kind), value) => Err(mismatch(property, kind.name(), value.type_label())),
    }
}

impl PropertyDescriptor {
    /// Converts a raw stored value into a typed value.
    ///
    /// `None` (absent) and JSON null both read as [`PropertyValue::Null`].
    pub(crate) fn decode(&self, raw: Option<&Value>) -> Result<PropertyValue, ResourceError> {
        let name = self.name();
        let raw = match raw {
            None | Some(Value::Null) => return Ok(PropertyValue::Null),
            Some(raw) => raw,
        };

        match self.kind() {
            PropertyKind::Scalar(scalar) => decode_scalar(name, scalar, raw),
            PropertyKind::StatusEnum(enum_type) => match raw {
                Value::String(s) => enum_type.resolve(s).map(PropertyValue::Enum).ok_or_else(|| {
                    ResourceError::InvalidEnumValue {
                        property: name.to_string(),
                        enum_type: enum_type.name(),
                        value: s.clone(),
                    }
                }),
                other => Err(mismatch(name, enum_type.name(), raw_label(other))),
            },
            PropertyKind::InlineArray(item) => match raw {
                Value::Array(values) => values
                    .iter()
                    .map(|value| decode_item(name, item, value))
                    .collect::<Result<Vec<_>, _>>()
                    .map(PropertyValue::Array),
                other => Err(mismatch(name, "array", raw_label(other))),
            },
            PropertyKind::CollectionReference(_) => href_of(raw)
                .map(PropertyValue::Collection)
                .ok_or_else(|| ResourceError::invalid_value(name, "collection reference has no href")),
        }
    }

    /// Validates a typed value and converts it to its stored raw form.
    ///
    /// Status values are normalized to their canonical member.
    pub(crate) fn encode(&self, value: PropertyValue) -> Result<Value, ResourceError> {
        let name = self.name();
        if value.is_null() {
            if self.is_required() {
                return Err(ResourceError::NullNotAllowed {
                    property: name.to_string(),
                });
            }
            return Ok(Value::Null);
        }

        match self.kind() {
            PropertyKind::Scalar(scalar) => encode_scalar(name, scalar, value),
            PropertyKind::StatusEnum(enum_type) => {
                let raw = match &value {
                    PropertyValue::String(s) => s.as_str(),
                    PropertyValue::Enum(s) => *s,
                    other => return Err(mismatch(name, enum_type.name(), other.type_label())),
                };
                enum_type
                    .resolve(raw)
                    .map(|canonical| Value::String(canonical.to_string()))
                    .ok_or_else(|| {
                        ResourceError::invalid_value(
                            name,
                            format!(
                                "'{raw}' is not one of {} ({})",
                                enum_type.name(),
                                enum_type.members().join(", ")
                            ),
                        )
                    })
            }
            PropertyKind::InlineArray(item) => match value {
                PropertyValue::Array(values) => values
                    .into_iter()
                    .map(|value| encode_item(name, item, value))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array),
                other => Err(mismatch(name, "array", other.type_label())),
            },
            PropertyKind::CollectionReference(_) => Err(ResourceError::invalid_value(
                name,
                "collection references are resolved by query and cannot be assigned",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::EnumType;
    use chrono::TimeZone;
    use serde_json::json;

    const STATUS: EnumType = EnumType::new("Status", &["ENABLED", "DISABLED"]);

    #[test]
    fn test_status_writes_are_normalized_to_canonical_case() {
        let descriptor = PropertyDescriptor::status("status", STATUS);
        for raw in ["enabled", "ENABLED", "Enabled"] {
            let encoded = descriptor.encode(raw.into()).unwrap();
            assert_eq!(encoded, json!("ENABLED"));
            assert_eq!(
                descriptor.decode(Some(&encoded)).unwrap(),
                PropertyValue::Enum("ENABLED")
            );
        }
    }

    #[test]
    fn test_status_rejects_non_members_on_write_and_read() {
        let descriptor = PropertyDescriptor::status("status", STATUS);
        assert!(matches!(
            descriptor.encode("archived".into()),
            Err(ResourceError::InvalidPropertyValue { .. })
        ));
        assert!(matches!(
            descriptor.decode(Some(&json!("ARCHIVED"))),
            Err(ResourceError::InvalidEnumValue { enum_type: "Status", .. })
        ));
    }

    #[test]
    fn test_required_property_rejects_null() {
        let descriptor = PropertyDescriptor::string("name").required();
        assert!(matches!(
            descriptor.encode(PropertyValue::Null),
            Err(ResourceError::NullNotAllowed { .. })
        ));
        let optional = PropertyDescriptor::string("description");
        assert_eq!(optional.encode(PropertyValue::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_shape_mismatch_is_rejected() {
        let descriptor = PropertyDescriptor::boolean("enabled");
        let error = descriptor.encode("yes".into()).unwrap_err();
        assert!(error.to_string().contains("expected boolean, found string"));
    }

    #[test]
    fn test_date_round_trip_keeps_subseconds() {
        let descriptor = PropertyDescriptor::date("createdAt");
        let date = Utc.with_ymd_and_hms(2016, 5, 4, 12, 30, 15).unwrap()
            + chrono::Duration::milliseconds(123);
        let encoded = descriptor.encode(date.into()).unwrap();
        assert_eq!(encoded, json!("2016-05-04T12:30:15.123Z"));
        assert_eq!(
            descriptor.decode(Some(&encoded)).unwrap(),
            PropertyValue::Date(date)
        );
    }

    #[test]
    fn test_lenient_reads_of_numbers_and_booleans_in_strings() {
        let number = PropertyDescriptor::number("count");
        assert_eq!(number.decode(Some(&json!("42"))).unwrap().as_i64(), Some(42));

        let flag = PropertyDescriptor::boolean("enabled");
        assert_eq!(flag.decode(Some(&json!("TRUE"))).unwrap().as_bool(), Some(true));
    }

    #[test]
    fn test_reference_is_stored_as_href_object() {
        let descriptor = PropertyDescriptor::reference("customData");
        let href = Href::new("/customData/1").unwrap();
        let encoded = descriptor.encode(href.clone().into()).unwrap();
        assert_eq!(encoded, json!({"href": "/customData/1"}));
        assert_eq!(
            descriptor.decode(Some(&encoded)).unwrap(),
            PropertyValue::Reference(href)
        );
    }

    #[test]
    fn test_inline_array_of_scalars() {
        let descriptor = PropertyDescriptor::array("tags", ItemType::Scalar(ScalarType::String));
        let value = PropertyValue::Array(vec!["a".into(), "b".into()]);
        let encoded = descriptor.encode(value.clone()).unwrap();
        assert_eq!(encoded, json!(["a", "b"]));
        assert_eq!(descriptor.decode(Some(&encoded)).unwrap(), value);

        assert!(descriptor
            .encode(PropertyValue::Array(vec![PropertyValue::Null]))
            .is_err());
    }

    #[test]
    fn test_absent_and_null_read_as_null() {
        let descriptor = PropertyDescriptor::string("description");
        assert!(descriptor.decode(None).unwrap().is_null());
        assert!(descriptor.decode(Some(&Value::Null)).unwrap().is_null());
    }
}
