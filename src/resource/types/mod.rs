//! Concrete resource types.
//!
//! Each type wraps an [`InstanceResource`](crate::resource::InstanceResource),
//! declares its descriptors as associated constants and exposes typed
//! accessors. The engine's methods (`save`, `is_dirty`, ...) are reachable
//! through `Deref`.

mod account_creation_policy;
mod email_template;
mod google_authenticator_factor;
mod organization;
mod status;

pub use account_creation_policy::AccountCreationPolicy;
pub use email_template::{ModeledEmailTemplate, UnmodeledEmailTemplate};
pub use google_authenticator_factor::GoogleAuthenticatorFactor;
pub use organization::{Organization, OrganizationList};
pub use status::{EmailStatus, Status};
