//! The generic instance resource engine.
//!
//! An [`InstanceResource`] is a local view of one remote resource: an
//! optional href, a map of raw property values, the names of properties
//! changed locally, and a materialization state. Every concrete resource
//! type wraps one and supplies its [`PropertyRegistry`].
//!
//! # Materialization
//!
//! A resource created from an href alone is *unmaterialized*: reading a
//! property it does not hold fetches the full representation once, merges it
//! under local changes and marks the resource materialized. The fetch runs
//! while the instance lock is held, so concurrent readers wait for it rather
//! than fetching again.
//!
//! ```text
//! Unmaterialized --read of absent property--> Materializing --fetch ok--> Materialized
//!        ^                                          |
//!        +-------------- fetch failed --------------+
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use identity_sdk::datastore::{DataStore, MemoryDataStore};
//! use identity_sdk::resource::{Href, Organization, ResourceType};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let store = Arc::new(MemoryDataStore::new());
//! let href = Href::new("/organizations/1").unwrap();
//! store.insert(&href, json!({"name": "Acme", "status": "ENABLED"}).as_object().unwrap().clone());
//!
//! let org = Organization::from_href(store.clone(), href);
//! assert_eq!(org.name().await.unwrap().as_deref(), Some("Acme"));
//!
//! org.set_name("Acme Corp").await.unwrap();
//! org.save().await.unwrap();
//! assert!(!org.is_dirty().await);
//! # });
//! ```

use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use serde_json::{Number, Value};
use tokio::sync::{Mutex, MutexGuard};

use crate::datastore::{DataStore, QueryParams};
use crate::resource::value::href_of;
use crate::resource::{
    CollectionResource, Href, ItemType, PropertyDescriptor, PropertyKind, PropertyMap,
    PropertyRegistry, PropertyValue, ResourceError, StatusEnum,
};

/// A concrete resource type: a registry plus a wrapper around [`InstanceResource`].
///
/// Implementors only declare their registry and how to wrap and unwrap the
/// engine; construction and deletion come from the default methods.
#[allow(async_fn_in_trait)]
pub trait ResourceType: Sized + Send + Sync + 'static {
    /// The type name used in errors and logs (e.g., "Organization").
    const TYPE_NAME: &'static str;

    /// Returns the process-wide registry of this type.
    fn registry() -> &'static PropertyRegistry;

    /// Wraps an engine instance.
    fn from_resource(resource: InstanceResource) -> Self;

    /// Returns the wrapped engine instance.
    fn resource(&self) -> &InstanceResource;

    /// Unwraps the engine instance.
    fn into_resource(self) -> InstanceResource;

    /// Creates a new local resource with no href.
    #[must_use]
    fn instantiate(data_store: Arc<dyn DataStore>) -> Self {
        Self::from_resource(InstanceResource::new(Self::registry(), data_store))
    }

    /// Creates an unmaterialized reference to the resource at `href`.
    #[must_use]
    fn from_href(data_store: Arc<dyn DataStore>, href: Href) -> Self {
        Self::from_resource(InstanceResource::with_href(
            Self::registry(),
            data_store,
            href,
        ))
    }

    /// Creates a resource from a representation returned by the store.
    #[must_use]
    fn from_properties(data_store: Arc<dyn DataStore>, properties: PropertyMap) -> Self {
        Self::from_resource(InstanceResource::from_properties(
            Self::registry(),
            data_store,
            properties,
        ))
    }

    /// Fetches the resource at `href` eagerly.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ResourceNotFound`] if the resource does not exist.
    async fn get(data_store: Arc<dyn DataStore>, href: Href) -> Result<Self, ResourceError> {
        let resource = Self::from_href(data_store, href);
        resource.resource().materialize().await?;
        Ok(resource)
    }

    /// Deletes the remote resource, consuming the local view.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingHref`] for local resources and any
    /// error reported by the store.
    async fn delete(self) -> Result<(), ResourceError> {
        self.into_resource().delete().await
    }
}

/// Materialization state of an [`InstanceResource`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Materialization {
    /// Only locally known properties are present.
    Unmaterialized,
    /// A fetch is in progress, or was abandoned before completing.
    Materializing,
    /// The full representation has been merged in.
    Materialized,
}

#[derive(Debug)]
struct ResourceState {
    properties: PropertyMap,
    dirty: Vec<String>,
    materialization: Materialization,
}

/// The generic engine behind every concrete resource type.
///
/// # Thread Safety
///
/// `InstanceResource` is `Send + Sync`. All mutable state sits behind one
/// async mutex per instance; distinct instances share nothing but the data
/// store.
#[derive(Debug)]
pub struct InstanceResource {
    registry: &'static PropertyRegistry,
    data_store: Arc<dyn DataStore>,
    href: OnceLock<Href>,
    state: Mutex<ResourceState>,
}

// Verify InstanceResource is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<InstanceResource>();
};

impl InstanceResource {
    fn build(
        registry: &'static PropertyRegistry,
        data_store: Arc<dyn DataStore>,
        href: Option<Href>,
        properties: PropertyMap,
        materialization: Materialization,
    ) -> Self {
        let cell = OnceLock::new();
        if let Some(href) = href {
            // A fresh cell cannot already be set.
            let _ = cell.set(href);
        }
        Self {
            registry,
            data_store,
            href: cell,
            state: Mutex::new(ResourceState {
                properties,
                dirty: Vec::new(),
                materialization,
            }),
        }
    }

    /// Creates a new local resource. It has no href until [`create`](Self::create) succeeds.
    #[must_use]
    pub fn new(registry: &'static PropertyRegistry, data_store: Arc<dyn DataStore>) -> Self {
        Self::build(
            registry,
            data_store,
            None,
            PropertyMap::new(),
            Materialization::Materialized,
        )
    }

    /// Creates an unmaterialized reference to the resource at `href`.
    #[must_use]
    pub fn with_href(
        registry: &'static PropertyRegistry,
        data_store: Arc<dyn DataStore>,
        href: Href,
    ) -> Self {
        Self::build(
            registry,
            data_store,
            Some(href),
            PropertyMap::new(),
            Materialization::Unmaterialized,
        )
    }

    /// Creates a resource from a representation.
    ///
    /// The `href` entry becomes the resource identity. A map holding nothing
    /// but an href is a bare reference and stays unmaterialized.
    #[must_use]
    pub fn from_properties(
        registry: &'static PropertyRegistry,
        data_store: Arc<dyn DataStore>,
        mut properties: PropertyMap,
    ) -> Self {
        let href = properties
            .remove("href")
            .and_then(|raw| raw.as_str().and_then(|s| Href::new(s).ok()));
        let materialization = if href.is_some() && properties.is_empty() {
            Materialization::Unmaterialized
        } else {
            Materialization::Materialized
        };
        Self::build(registry, data_store, href, properties, materialization)
    }

    /// Returns the resource type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.registry.type_name()
    }

    /// Returns the registry this resource is checked against.
    #[must_use]
    pub const fn registry(&self) -> &'static PropertyRegistry {
        self.registry
    }

    /// Returns the data store this resource reads from and writes to.
    #[must_use]
    pub fn data_store(&self) -> &Arc<dyn DataStore> {
        &self.data_store
    }

    /// Returns the resource identity, if it has one.
    #[must_use]
    pub fn href(&self) -> Option<&Href> {
        self.href.get()
    }

    fn require_href(&self, operation: &'static str) -> Result<&Href, ResourceError> {
        self.href.get().ok_or(ResourceError::MissingHref {
            resource: self.type_name(),
            operation,
        })
    }

    /// Returns the current materialization state.
    pub async fn materialization(&self) -> Materialization {
        self.state.lock().await.materialization
    }

    /// Returns `true` once the full representation has been merged in.
    pub async fn is_materialized(&self) -> bool {
        self.materialization().await == Materialization::Materialized
    }

    /// Returns `true` if any property was set since the last successful save.
    pub async fn is_dirty(&self) -> bool {
        !self.state.lock().await.dirty.is_empty()
    }

    /// Returns the names of locally changed properties, in the order first set.
    pub async fn dirty_properties(&self) -> Vec<String> {
        self.state.lock().await.dirty.clone()
    }

    /// Returns a copy of the raw properties currently held.
    pub async fn properties_snapshot(&self) -> PropertyMap {
        self.state.lock().await.properties.clone()
    }

    /// Fetches and merges the full representation if not done yet.
    ///
    /// Resources without an href are considered materialized.
    ///
    /// # Errors
    ///
    /// Returns the store's error; the resource stays unmaterialized and the
    /// next read tries again.
    pub async fn materialize(&self) -> Result<(), ResourceError> {
        let mut state = self.state.lock().await;
        self.materialize_locked(&mut state).await
    }

    async fn materialize_locked(
        &self,
        state: &mut MutexGuard<'_, ResourceState>,
    ) -> Result<(), ResourceError> {
        match state.materialization {
            Materialization::Materialized => return Ok(()),
            Materialization::Materializing => {
                tracing::debug!(
                    resource = self.type_name(),
                    "previous materialization did not complete, fetching again"
                );
            }
            Materialization::Unmaterialized => {}
        }

        let Some(href) = self.href.get() else {
            state.materialization = Materialization::Materialized;
            return Ok(());
        };

        state.materialization = Materialization::Materializing;
        tracing::debug!(resource = self.type_name(), href = %href, "materializing");

        match self.data_store.fetch(href).await {
            Ok(fetched) => {
                let dirty = state.dirty.clone();
                for (name, value) in fetched {
                    if name == "href" || dirty.contains(&name) {
                        continue;
                    }
                    state.properties.insert(name, value);
                }
                state.materialization = Materialization::Materialized;
                Ok(())
            }
            Err(error) => {
                state.materialization = Materialization::Unmaterialized;
                tracing::warn!(
                    resource = self.type_name(),
                    href = %href,
                    error = %error,
                    "materialization failed"
                );
                Err(error)
            }
        }
    }

    async fn read_raw(
        &self,
        name: &str,
    ) -> Result<(&'static PropertyDescriptor, Option<Value>), ResourceError> {
        let descriptor = self.registry.descriptor_for(name)?;
        let mut state = self.state.lock().await;
        if !state.properties.contains_key(name) {
            self.materialize_locked(&mut state).await?;
        }
        Ok((descriptor, state.properties.get(name).cloned()))
    }

    /// Reads a property.
    ///
    /// Absent values read as [`PropertyValue::Null`]. Collection references
    /// resolve to [`PropertyValue::Collection`] without materializing.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownProperty`] for names outside the
    /// registry, [`ResourceError::InvalidEnumValue`] for stored status values
    /// outside the enum, and any error raised while materializing.
    pub async fn get_property(&self, name: &str) -> Result<PropertyValue, ResourceError> {
        let descriptor = self.registry.descriptor_for(name)?;
        if descriptor.is_collection_reference() {
            return self
                .collection_href(descriptor)
                .await
                .map(PropertyValue::Collection);
        }
        let (descriptor, raw) = self.read_raw(name).await?;
        descriptor.decode(raw.as_ref())
    }

    /// Sets a property and marks it dirty.
    ///
    /// The value is validated before anything is stored; status values are
    /// normalized to their canonical member.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownProperty`],
    /// [`ResourceError::InvalidPropertyValue`] or
    /// [`ResourceError::NullNotAllowed`]; the resource is left unchanged.
    pub async fn set_property(
        &self,
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<(), ResourceError> {
        let descriptor = self.registry.descriptor_for(name)?;
        let raw = descriptor.encode(value.into())?;

        let mut state = self.state.lock().await;
        state.properties.insert(name.to_string(), raw);
        if !state.dirty.iter().any(|dirty| dirty == name) {
            state.dirty.push(name.to_string());
        }
        Ok(())
    }

    /// Reads a status property as a typed enum.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidEnumValue`] if the stored value is not
    /// a member, and [`ResourceError::InvalidPropertyValue`] if the property
    /// is not a status of `E`'s enum type.
    pub async fn get_enum_property<E: StatusEnum>(
        &self,
        name: &str,
    ) -> Result<Option<E>, ResourceError> {
        self.check_enum_kind::<E>(name)?;
        match self.get_property(name).await? {
            PropertyValue::Null => Ok(None),
            PropertyValue::Enum(canonical) => E::from_canonical(canonical).map(Some).ok_or_else(|| {
                ResourceError::InvalidEnumValue {
                    property: name.to_string(),
                    enum_type: E::ENUM_TYPE.name(),
                    value: canonical.to_string(),
                }
            }),
            other => Err(unexpected(name, E::ENUM_TYPE.name(), &other)),
        }
    }

    /// Sets a status property from a typed enum.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidPropertyValue`] if the property is not
    /// a status of `E`'s enum type.
    pub async fn set_enum_property<E: StatusEnum>(
        &self,
        name: &str,
        value: E,
    ) -> Result<(), ResourceError> {
        self.check_enum_kind::<E>(name)?;
        self.set_property(name, PropertyValue::enum_member(value))
            .await
    }

    fn check_enum_kind<E: StatusEnum>(&self, name: &str) -> Result<(), ResourceError> {
        match self.registry.descriptor_for(name)?.kind() {
            PropertyKind::StatusEnum(enum_type) if enum_type == E::ENUM_TYPE => Ok(()),
            _ => Err(ResourceError::invalid_value(
                name,
                format!("not a {} property", E::ENUM_TYPE.name()),
            )),
        }
    }

    /// Reads a string property.
    ///
    /// # Errors
    ///
    /// See [`get_property`](Self::get_property).
    pub async fn get_string(&self, name: &str) -> Result<Option<String>, ResourceError> {
        match self.get_property(name).await? {
            PropertyValue::Null => Ok(None),
            PropertyValue::String(s) => Ok(Some(s)),
            PropertyValue::Enum(s) => Ok(Some(s.to_string())),
            other => Err(unexpected(name, "string", &other)),
        }
    }

    /// Reads a number property.
    ///
    /// # Errors
    ///
    /// See [`get_property`](Self::get_property).
    pub async fn get_number(&self, name: &str) -> Result<Option<Number>, ResourceError> {
        match self.get_property(name).await? {
            PropertyValue::Null => Ok(None),
            PropertyValue::Number(n) => Ok(Some(n)),
            other => Err(unexpected(name, "number", &other)),
        }
    }

    /// Reads an integer property.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidPropertyValue`] if the number does not
    /// fit an `i64`.
    pub async fn get_i64(&self, name: &str) -> Result<Option<i64>, ResourceError> {
        self.get_number(name)
            .await?
            .map(|n| {
                n.as_i64().ok_or_else(|| {
                    ResourceError::invalid_value(name, format!("{n} is not an integer"))
                })
            })
            .transpose()
    }

    /// Reads a boolean property.
    ///
    /// # Errors
    ///
    /// See [`get_property`](Self::get_property).
    pub async fn get_bool(&self, name: &str) -> Result<Option<bool>, ResourceError> {
        match self.get_property(name).await? {
            PropertyValue::Null => Ok(None),
            PropertyValue::Boolean(b) => Ok(Some(b)),
            other => Err(unexpected(name, "boolean", &other)),
        }
    }

    /// Reads a date property.
    ///
    /// # Errors
    ///
    /// See [`get_property`](Self::get_property).
    pub async fn get_date(&self, name: &str) -> Result<Option<DateTime<Utc>>, ResourceError> {
        match self.get_property(name).await? {
            PropertyValue::Null => Ok(None),
            PropertyValue::Date(d) => Ok(Some(d)),
            other => Err(unexpected(name, "date", &other)),
        }
    }

    /// Reads a free-form map property.
    ///
    /// # Errors
    ///
    /// See [`get_property`](Self::get_property).
    pub async fn get_map(&self, name: &str) -> Result<Option<PropertyMap>, ResourceError> {
        match self.get_property(name).await? {
            PropertyValue::Null => Ok(None),
            PropertyValue::Map(map) => Ok(Some(map)),
            other => Err(unexpected(name, "map", &other)),
        }
    }

    /// Reads a nested resource reference as a typed resource.
    ///
    /// An expanded reference (one carrying more than its href) yields a
    /// materialized resource; a bare `{"href": ...}` yields a reference that
    /// materializes on first read.
    ///
    /// # Errors
    ///
    /// See [`get_property`](Self::get_property).
    pub async fn get_reference<T: ResourceType>(
        &self,
        name: &str,
    ) -> Result<Option<T>, ResourceError> {
        let (descriptor, raw) = self.read_raw(name).await?;
        match descriptor.decode(raw.as_ref())? {
            PropertyValue::Null => Ok(None),
            PropertyValue::Reference(_) => {
                let properties = match raw {
                    Some(Value::Object(map)) => map,
                    _ => PropertyMap::new(),
                };
                Ok(Some(T::from_properties(self.data_store.clone(), properties)))
            }
            other => Err(unexpected(name, "resource reference", &other)),
        }
    }

    /// Reads an inline array of resource representations.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidPropertyValue`] if the property is not
    /// an inline array of `T`.
    pub async fn get_resource_array<T: ResourceType>(
        &self,
        name: &str,
    ) -> Result<Vec<T>, ResourceError> {
        match self.registry.descriptor_for(name)?.kind() {
            PropertyKind::InlineArray(ItemType::Resource(item)) if item.name() == T::TYPE_NAME => {}
            _ => {
                return Err(ResourceError::invalid_value(
                    name,
                    format!("not an inline array of {}", T::TYPE_NAME),
                ))
            }
        }

        let (descriptor, raw) = self.read_raw(name).await?;
        descriptor.decode(raw.as_ref())?;
        let items = match raw {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };
        Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(T::from_properties(self.data_store.clone(), map)),
                _ => None,
            })
            .collect())
    }

    /// Returns a page of a collection reference property.
    ///
    /// Never materializes this resource: the collection href comes from the
    /// stored `{"href": ...}` value when present, otherwise from
    /// `{resource href}/{property name}`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidPropertyValue`] if the property is not
    /// a collection of `T`, and [`ResourceError::MissingHref`] if neither
    /// href is known.
    pub async fn get_collection_property<T: ResourceType>(
        &self,
        name: &str,
        params: QueryParams,
    ) -> Result<CollectionResource<T>, ResourceError> {
        let descriptor = self.registry.descriptor_for(name)?;
        match descriptor.kind() {
            PropertyKind::CollectionReference(item) if item.name() == T::TYPE_NAME => {}
            _ => {
                return Err(ResourceError::invalid_value(
                    name,
                    format!("not a collection of {}", T::TYPE_NAME),
                ))
            }
        }
        let href = self.collection_href(descriptor).await?;
        Ok(CollectionResource::new(
            self.data_store.clone(),
            href,
            params,
        ))
    }

    async fn collection_href(&self, descriptor: &PropertyDescriptor) -> Result<Href, ResourceError> {
        let name = descriptor.name();
        if let Some(href) = self.state.lock().await.properties.get(name).and_then(href_of) {
            return Ok(href);
        }
        self.require_href("collection query")
            .map(|href| href.child(name))
    }

    /// Persists the dirty properties.
    ///
    /// Only changed properties are sent. A clean resource makes no remote
    /// call. On failure the dirty set is kept so the save can be retried.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingHref`] for local resources (use
    /// [`create`](Self::create)) and [`ResourceError::Persistence`] when the
    /// store refuses the update.
    pub async fn save(&self) -> Result<(), ResourceError> {
        let href = self.require_href("save")?;
        let mut state = self.state.lock().await;
        if state.dirty.is_empty() {
            tracing::debug!(resource = self.type_name(), href = %href, "nothing to save");
            return Ok(());
        }

        let changes: PropertyMap = state
            .dirty
            .iter()
            .filter_map(|name| {
                state
                    .properties
                    .get(name)
                    .map(|value| (name.clone(), value.clone()))
            })
            .collect();

        tracing::debug!(
            resource = self.type_name(),
            href = %href,
            properties = changes.len(),
            "saving"
        );

        match self.data_store.save(href, &changes).await {
            Ok(()) => {
                state.dirty.clear();
                Ok(())
            }
            Err(error) => {
                tracing::warn!(
                    resource = self.type_name(),
                    href = %href,
                    error = %error,
                    "save failed, keeping dirty properties"
                );
                Err(error)
            }
        }
    }

    /// Creates this local resource in the collection at `parent`.
    ///
    /// On success the resource adopts the server-assigned href and
    /// representation and becomes clean.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidPropertyValue`] if the resource
    /// already has an href, [`ResourceError::Malformed`] if the store's
    /// answer carries none, and [`ResourceError::Persistence`] when the store
    /// refuses the resource.
    pub async fn create(&self, parent: &Href) -> Result<(), ResourceError> {
        let mut state = self.state.lock().await;
        if self.href.get().is_some() {
            return Err(ResourceError::invalid_value(
                "href",
                "resource already exists remotely",
            ));
        }

        tracing::debug!(resource = self.type_name(), parent = %parent, "creating");
        let mut created = self.data_store.create(parent, &state.properties).await?;

        let href = created
            .remove("href")
            .and_then(|raw| raw.as_str().and_then(|s| Href::new(s).ok()))
            .ok_or_else(|| ResourceError::Malformed {
                href: parent.to_string(),
                reason: "created resource has no href".to_string(),
            })?;
        self.href
            .set(href)
            .map_err(|_| ResourceError::invalid_value("href", "resource already exists remotely"))?;

        state.properties = created;
        state.dirty.clear();
        state.materialization = Materialization::Materialized;
        Ok(())
    }

    /// Re-fetches the full representation, discarding local changes.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingHref`] for local resources and any
    /// error reported by the store.
    pub async fn refresh(&self) -> Result<(), ResourceError> {
        let href = self.require_href("refresh")?;
        let mut state = self.state.lock().await;
        tracing::debug!(resource = self.type_name(), href = %href, "refreshing");

        let mut fetched = self.data_store.fetch(href).await?;
        fetched.remove("href");
        state.properties = fetched;
        state.dirty.clear();
        state.materialization = Materialization::Materialized;
        Ok(())
    }

    /// Deletes the remote resource, consuming the local view.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingHref`] for local resources and
    /// [`ResourceError::ResourceNotFound`] if the resource is already gone.
    pub async fn delete(self) -> Result<(), ResourceError> {
        let href = self.require_href("delete")?;
        tracing::debug!(resource = self.type_name(), href = %href, "deleting");
        self.data_store.delete(href).await
    }
}

fn unexpected(name: &str, expected: &str, value: &PropertyValue) -> ResourceError {
    ResourceError::invalid_value(
        name,
        format!("expected {expected}, found {}", value.type_label()),
    )
}
