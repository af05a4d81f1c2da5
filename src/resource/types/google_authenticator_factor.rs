//! Google Authenticator factor resource.

use std::ops::Deref;
use std::sync::OnceLock;

use crate::resource::types::Status;
use crate::resource::{
    Href, InstanceResource, PropertyDescriptor, PropertyRegistry, PropertyValue, ResourceError,
    ResourceType, StatusEnum,
};

/// A time-based one-time password factor of an account.
///
/// `secret`, `keyUri` and `base64QRImage` are generated by the server when
/// the factor is created.
#[derive(Debug)]
pub struct GoogleAuthenticatorFactor(InstanceResource);

impl GoogleAuthenticatorFactor {
    pub const ACCOUNT_NAME: PropertyDescriptor = PropertyDescriptor::string("accountName");
    pub const ISSUER: PropertyDescriptor = PropertyDescriptor::string("issuer");
    pub const SECRET: PropertyDescriptor = PropertyDescriptor::string("secret");
    pub const KEY_URI: PropertyDescriptor = PropertyDescriptor::string("keyUri");
    pub const BASE64_QR_IMAGE: PropertyDescriptor = PropertyDescriptor::string("base64QRImage");
    pub const STATUS: PropertyDescriptor = PropertyDescriptor::status("status", Status::ENUM_TYPE);
    pub const ACCOUNT: PropertyDescriptor = PropertyDescriptor::reference("account");

    pub async fn account_name(&self) -> Result<Option<String>, ResourceError> {
        self.0.get_string(Self::ACCOUNT_NAME.name()).await
    }

    pub async fn set_account_name(
        &self,
        account_name: impl Into<String>,
    ) -> Result<&Self, ResourceError> {
        self.0
            .set_property(
                Self::ACCOUNT_NAME.name(),
                PropertyValue::String(account_name.into()),
            )
            .await?;
        Ok(self)
    }

    pub async fn issuer(&self) -> Result<Option<String>, ResourceError> {
        self.0.get_string(Self::ISSUER.name()).await
    }

    pub async fn set_issuer(&self, issuer: impl Into<String>) -> Result<&Self, ResourceError> {
        self.0
            .set_property(Self::ISSUER.name(), PropertyValue::String(issuer.into()))
            .await?;
        Ok(self)
    }

    pub async fn secret(&self) -> Result<Option<String>, ResourceError> {
        self.0.get_string(Self::SECRET.name()).await
    }

    pub async fn key_uri(&self) -> Result<Option<String>, ResourceError> {
        self.0.get_string(Self::KEY_URI.name()).await
    }

    pub async fn base64_qr_image(&self) -> Result<Option<String>, ResourceError> {
        self.0.get_string(Self::BASE64_QR_IMAGE.name()).await
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

    /// The href of the account this factor belongs to.
    pub async fn account_href(&self) -> Result<Option<Href>, ResourceError> {
        Ok(self
            .0
            .get_property(Self::ACCOUNT.name())
            .await?
            .as_href()
            .cloned())
    }
}

impl ResourceType for GoogleAuthenticatorFactor {
    const TYPE_NAME: &'static str = "GoogleAuthenticatorFactor";

    fn registry() -> &'static PropertyRegistry {
        static REGISTRY: OnceLock<PropertyRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            PropertyRegistry::define(
                Self::TYPE_NAME,
                &[
                    Self::ACCOUNT_NAME,
                    Self::ISSUER,
                    Self::SECRET,
                    Self::KEY_URI,
                    Self::BASE64_QR_IMAGE,
                    Self::STATUS,
                    Self::ACCOUNT,
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

impl Deref for GoogleAuthenticatorFactor {
    type Target = InstanceResource;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
