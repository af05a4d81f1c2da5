//! Account creation policy resource.

use std::ops::Deref;
use std::sync::OnceLock;

use crate::datastore::QueryParams;
use crate::resource::types::{EmailStatus, ModeledEmailTemplate, UnmodeledEmailTemplate};
use crate::resource::{
    CollectionResource, InstanceResource, PropertyDescriptor, PropertyRegistry, ResourceError,
    ResourceType, ResourceTypeRef, StatusEnum,
};

/// Which emails a directory sends when accounts are created.
#[derive(Debug)]
pub struct AccountCreationPolicy(InstanceResource);

impl AccountCreationPolicy {
    pub const VERIFICATION_EMAIL_STATUS: PropertyDescriptor =
        PropertyDescriptor::status("verificationEmailStatus", EmailStatus::ENUM_TYPE).required();
    pub const VERIFICATION_SUCCESS_EMAIL_STATUS: PropertyDescriptor =
        PropertyDescriptor::status("verificationSuccessEmailStatus", EmailStatus::ENUM_TYPE)
            .required();
    pub const WELCOME_EMAIL_STATUS: PropertyDescriptor =
        PropertyDescriptor::status("welcomeEmailStatus", EmailStatus::ENUM_TYPE).required();
    pub const VERIFICATION_EMAIL_TEMPLATES: PropertyDescriptor = PropertyDescriptor::collection(
        "verificationEmailTemplates",
        ResourceTypeRef::of::<ModeledEmailTemplate>(),
    );
    pub const VERIFICATION_SUCCESS_EMAIL_TEMPLATES: PropertyDescriptor =
        PropertyDescriptor::collection(
            "verificationSuccessEmailTemplates",
            ResourceTypeRef::of::<UnmodeledEmailTemplate>(),
        );
    pub const WELCOME_EMAIL_TEMPLATES: PropertyDescriptor = PropertyDescriptor::collection(
        "welcomeEmailTemplates",
        ResourceTypeRef::of::<UnmodeledEmailTemplate>(),
    );

    pub async fn verification_email_status(&self) -> Result<Option<EmailStatus>, ResourceError> {
        self.0
            .get_enum_property(Self::VERIFICATION_EMAIL_STATUS.name())
            .await
    }

    pub async fn set_verification_email_status(
        &self,
        status: EmailStatus,
    ) -> Result<&Self, ResourceError> {
        self.0
            .set_enum_property(Self::VERIFICATION_EMAIL_STATUS.name(), status)
            .await?;
        Ok(self)
    }

    pub async fn verification_success_email_status(
        &self,
    ) -> Result<Option<EmailStatus>, ResourceError> {
        self.0
            .get_enum_property(Self::VERIFICATION_SUCCESS_EMAIL_STATUS.name())
            .await
    }

    pub async fn set_verification_success_email_status(
        &self,
        status: EmailStatus,
    ) -> Result<&Self, ResourceError> {
        self.0
            .set_enum_property(Self::VERIFICATION_SUCCESS_EMAIL_STATUS.name(), status)
            .await?;
        Ok(self)
    }

    pub async fn welcome_email_status(&self) -> Result<Option<EmailStatus>, ResourceError> {
        self.0
            .get_enum_property(Self::WELCOME_EMAIL_STATUS.name())
            .await
    }

    pub async fn set_welcome_email_status(
        &self,
        status: EmailStatus,
    ) -> Result<&Self, ResourceError> {
        self.0
            .set_enum_property(Self::WELCOME_EMAIL_STATUS.name(), status)
            .await?;
        Ok(self)
    }

    /// Templates of the verification email. Does not materialize the policy.
    pub async fn verification_email_templates(
        &self,
        params: QueryParams,
    ) -> Result<CollectionResource<ModeledEmailTemplate>, ResourceError> {
        self.0
            .get_collection_property(Self::VERIFICATION_EMAIL_TEMPLATES.name(), params)
            .await
    }

    pub async fn verification_success_email_templates(
        &self,
        params: QueryParams,
    ) -> Result<CollectionResource<UnmodeledEmailTemplate>, ResourceError> {
        self.0
            .get_collection_property(Self::VERIFICATION_SUCCESS_EMAIL_TEMPLATES.name(), params)
            .await
    }

    pub async fn welcome_email_templates(
        &self,
        params: QueryParams,
    ) -> Result<CollectionResource<UnmodeledEmailTemplate>, ResourceError> {
        self.0
            .get_collection_property(Self::WELCOME_EMAIL_TEMPLATES.name(), params)
            .await
    }
}

impl ResourceType for AccountCreationPolicy {
    const TYPE_NAME: &'static str = "AccountCreationPolicy";

    fn registry() -> &'static PropertyRegistry {
        static REGISTRY: OnceLock<PropertyRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            PropertyRegistry::define(
                Self::TYPE_NAME,
                &[
                    Self::VERIFICATION_EMAIL_STATUS,
                    Self::VERIFICATION_SUCCESS_EMAIL_STATUS,
                    Self::WELCOME_EMAIL_STATUS,
                    Self::VERIFICATION_EMAIL_TEMPLATES,
                    Self::VERIFICATION_SUCCESS_EMAIL_TEMPLATES,
                    Self::WELCOME_EMAIL_TEMPLATES,
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

impl Deref for AccountCreationPolicy {
    type Target = InstanceResource;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::PropertyKind;

    #[test]
    fn test_registry_declares_all_properties() {
        let registry = AccountCreationPolicy::registry();
        let names: Vec<&str> = registry.all_descriptors().map(|d| d.name()).collect();
        assert_eq!(
            names,
            vec![
                "verificationEmailStatus",
                "verificationSuccessEmailStatus",
                "welcomeEmailStatus",
                "verificationEmailTemplates",
                "verificationSuccessEmailTemplates",
                "welcomeEmailTemplates",
            ]
        );
        assert!(registry
            .descriptor_for("welcomeEmailStatus")
            .unwrap()
            .is_required());
    }

    #[test]
    fn test_template_collections_point_at_template_types() {
        assert!(matches!(
            AccountCreationPolicy::VERIFICATION_EMAIL_TEMPLATES.kind(),
            PropertyKind::CollectionReference(item) if item.name() == "ModeledEmailTemplate"
        ));
        assert!(matches!(
            AccountCreationPolicy::WELCOME_EMAIL_TEMPLATES.kind(),
            PropertyKind::CollectionReference(item) if item.name() == "UnmodeledEmailTemplate"
        ));
    }
}
