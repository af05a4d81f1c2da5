//! Email template resources.
//!
//! Modeled templates carry a `defaultModel` map whose values are substituted
//! into the body; unmodeled templates are sent as written.

use std::ops::Deref;
use std::sync::OnceLock;

use crate::resource::{
    InstanceResource, PropertyDescriptor, PropertyMap, PropertyRegistry, PropertyValue,
    ResourceError, ResourceType,
};

const NAME: PropertyDescriptor = PropertyDescriptor::string("name");
const DESCRIPTION: PropertyDescriptor = PropertyDescriptor::string("description");
const FROM_NAME: PropertyDescriptor = PropertyDescriptor::string("fromName");
const FROM_EMAIL_ADDRESS: PropertyDescriptor = PropertyDescriptor::string("fromEmailAddress");
const SUBJECT: PropertyDescriptor = PropertyDescriptor::string("subject");
const TEXT_BODY: PropertyDescriptor = PropertyDescriptor::string("textBody");
const HTML_BODY: PropertyDescriptor = PropertyDescriptor::string("htmlBody");
const MIME_TYPE: PropertyDescriptor = PropertyDescriptor::string("mimeType");

const COMMON: [PropertyDescriptor; 8] = [
    NAME,
    DESCRIPTION,
    FROM_NAME,
    FROM_EMAIL_ADDRESS,
    SUBJECT,
    TEXT_BODY,
    HTML_BODY,
    MIME_TYPE,
];

// String accessors shared by both template kinds.
macro_rules! template_accessors {
    ($($getter:ident, $setter:ident => $descriptor:ident;)*) => {
        $(
            pub async fn $getter(&self) -> Result<Option<String>, ResourceError> {
                self.0.get_string($descriptor.name()).await
            }

            pub async fn $setter(&self, value: impl Into<String>) -> Result<&Self, ResourceError> {
                self.0
                    .set_property($descriptor.name(), PropertyValue::String(value.into()))
                    .await?;
                Ok(self)
            }
        )*
    };
}

/// An email template with a default substitution model.
#[derive(Debug)]
pub struct ModeledEmailTemplate(InstanceResource);

impl ModeledEmailTemplate {
    pub const DEFAULT_MODEL: PropertyDescriptor = PropertyDescriptor::map("defaultModel");

    template_accessors! {
        name, set_name => NAME;
        description, set_description => DESCRIPTION;
        from_name, set_from_name => FROM_NAME;
        from_email_address, set_from_email_address => FROM_EMAIL_ADDRESS;
        subject, set_subject => SUBJECT;
        text_body, set_text_body => TEXT_BODY;
        html_body, set_html_body => HTML_BODY;
        mime_type, set_mime_type => MIME_TYPE;
    }

    pub async fn default_model(&self) -> Result<Option<PropertyMap>, ResourceError> {
        self.0.get_map(Self::DEFAULT_MODEL.name()).await
    }

    pub async fn set_default_model(&self, model: PropertyMap) -> Result<&Self, ResourceError> {
        self.0
            .set_property(Self::DEFAULT_MODEL.name(), model)
            .await?;
        Ok(self)
    }
}

impl ResourceType for ModeledEmailTemplate {
    const TYPE_NAME: &'static str = "ModeledEmailTemplate";

    fn registry() -> &'static PropertyRegistry {
        static REGISTRY: OnceLock<PropertyRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let mut descriptors = COMMON.to_vec();
            descriptors.push(Self::DEFAULT_MODEL);
            PropertyRegistry::define(Self::TYPE_NAME, &descriptors)
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

impl Deref for ModeledEmailTemplate {
    type Target = InstanceResource;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// An email template sent as written.
#[derive(Debug)]
pub struct UnmodeledEmailTemplate(InstanceResource);

impl UnmodeledEmailTemplate {
    template_accessors! {
        name, set_name => NAME;
        description, set_description => DESCRIPTION;
        from_name, set_from_name => FROM_NAME;
        from_email_address, set_from_email_address => FROM_EMAIL_ADDRESS;
        subject, set_subject => SUBJECT;
        text_body, set_text_body => TEXT_BODY;
        html_body, set_html_body => HTML_BODY;
        mime_type, set_mime_type => MIME_TYPE;
    }
}

impl ResourceType for UnmodeledEmailTemplate {
    const TYPE_NAME: &'static str = "UnmodeledEmailTemplate";

    fn registry() -> &'static PropertyRegistry {
        static REGISTRY: OnceLock<PropertyRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| PropertyRegistry::define(Self::TYPE_NAME, &COMMON))
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

impl Deref for UnmodeledEmailTemplate {
    type Target = InstanceResource;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
