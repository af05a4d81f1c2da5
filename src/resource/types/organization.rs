//! Organization resource.

use std::ops::Deref;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};

use crate::resource::types::Status;
use crate::resource::{
    CollectionResource, Href, InstanceResource, PropertyDescriptor, PropertyRegistry,
    PropertyValue, ResourceError, ResourceType, StatusEnum,
};

/// A paginated list of organizations.
pub type OrganizationList = CollectionResource<Organization>;

/// A tenant grouping of account stores.
#[derive(Debug)]
pub struct Organization(InstanceResource);

impl Organization {
    pub const NAME: PropertyDescriptor = PropertyDescriptor::string("name").required();
    pub const NAME_KEY: PropertyDescriptor = PropertyDescriptor::string("nameKey").required();
    pub const DESCRIPTION: PropertyDescriptor = PropertyDescriptor::string("description");
    pub const STATUS: PropertyDescriptor =
        PropertyDescriptor::status("status", Status::ENUM_TYPE).required();
    pub const CUSTOM_DATA: PropertyDescriptor = PropertyDescriptor::reference("customData");
    pub const CREATED_AT: PropertyDescriptor = PropertyDescriptor::date("createdAt");
    pub const MODIFIED_AT: PropertyDescriptor = PropertyDescriptor::date("modifiedAt");

    pub async fn name(&self) -> Result<Option<String>, ResourceError> {
        self.0.get_string(Self::NAME.name()).await
    }

    pub async fn set_name(&self, name: impl Into<String>) -> Result<&Self, ResourceError> {
        self.0
            .set_property(Self::NAME.name(), PropertyValue::String(name.into()))
            .await?;
        Ok(self)
    }

    /// The unique, DNS-safe key of the organization.
    pub async fn name_key(&self) -> Result<Option<String>, ResourceError> {
        self.0.get_string(Self::NAME_KEY.name()).await
    }

    pub async fn set_name_key(&self, name_key: impl Into<String>) -> Result<&Self, ResourceError> {
        self.0
            .set_property(Self::NAME_KEY.name(), PropertyValue::String(name_key.into()))
            .await?;
        Ok(self)
    }

    pub async fn description(&self) -> Result<Option<String>, ResourceError> {
        self.0.get_string(Self::DESCRIPTION.name()).await
    }

    pub async fn set_description(
        &self,
        description: Option<String>,
    ) -> Result<&Self, ResourceError> {
        self.0
            .set_property(Self::DESCRIPTION.name(), description)
            .await?;
        Ok(self)
    }

    pub async fn status(&self) -> Result<Option<Status>, ResourceError> {
        self.0.get_enum_property(Self::STATUS.name()).await
    }

    pub async fn set_status(&self, status: Status) -> Result<&Self, ResourceError> {
        self.0
            .set_enum_property(Self::STATUS.name(), status)
            .await?;
        Ok(self)
    }

    /// The href of the organization's custom data.
    pub async fn custom_data_href(&self) -> Result<Option<Href>, ResourceError> {
        Ok(self
            .0
            .get_property(Self::CUSTOM_DATA.name())
            .await?
            .as_href()
            .cloned())
    }

    pub async fn created_at(&self) -> Result<Option<DateTime<Utc>>, ResourceError> {
        self.0.get_date(Self::CREATED_AT.name()).await
    }

    pub async fn modified_at(&self) -> Result<Option<DateTime<Utc>>, ResourceError> {
        self.0.get_date(Self::MODIFIED_AT.name()).await
    }
}

impl ResourceType for Organization {
    const TYPE_NAME: &'static str = "Organization";

    fn registry() -> &'static PropertyRegistry {
        static REGISTRY: OnceLock<PropertyRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            PropertyRegistry::define(
                Self::TYPE_NAME,
                &[
                    Self::NAME,
                    Self::NAME_KEY,
                    Self::DESCRIPTION,
                    Self::STATUS,
                    Self::CUSTOM_DATA,
                    Self::CREATED_AT,
                    Self::MODIFIED_AT,
                ],
            )
        })
    }

    fn from_resource(resource: InstanceResource) -> Self {
        Self(resource)
    }

    fn resource(&self) -> &InstanceResource {
        &self.0
    }

    fn into_resource(self) -> InstanceResource {
        self.0
    }
}

impl Deref for Organization {
    type Target = InstanceResource;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
