//! Resource identity.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::resource::ResourceError;

/// The opaque identity of a remote resource.
///
/// Hrefs may be absolute URLs or paths relative to the service base URL.
///
/// # Example
///
/// ```rust
/// use identity_sdk::resource::Href;
///
/// let href = Href::new("/accountCreationPolicies/abc").unwrap();
/// assert_eq!(
///     href.child("welcomeEmailTemplates").as_str(),
///     "/accountCreationPolicies/abc/welcomeEmailTemplates"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Href(String);

impl Href {
    /// Creates a new href.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidPropertyValue`] if the href is blank.
    pub fn new(href: impl Into<String>) -> Result<Self, ResourceError> {
        let href = href.into();
        if href.trim().is_empty() {
            return Err(ResourceError::invalid_value("href", "href cannot be empty"));
        }
        Ok(Self(href))
    }

    /// Returns the href as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the href of a sub-resource named `segment`.
    #[must_use]
    pub fn child(&self, segment: &str) -> Self {
        Self(format!("{}/{segment}", self.0.trim_end_matches('/')))
    }
}

impl fmt::Display for Href {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Href {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Href {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Href {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}
