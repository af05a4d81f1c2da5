//! Status enums shared by concrete resource types.

use std::fmt;

use crate::resource::{EnumType, StatusEnum};

/// Whether an email workflow is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmailStatus {
    Enabled,
    Disabled,
}

impl StatusEnum for EmailStatus {
    const ENUM_TYPE: EnumType = EnumType::new("EmailStatus", &["ENABLED", "DISABLED"]);

    fn as_str(self) -> &'static str {
        match self {
            Self::Enabled => "ENABLED",
            Self::Disabled => "DISABLED",
        }
    }

    fn from_canonical(canonical: &str) -> Option<Self> {
        match canonical {
            "ENABLED" => Some(Self::Enabled),
            "DISABLED" => Some(Self::Disabled),
            _ => None,
        }
    }
}

impl fmt::Display for EmailStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a resource is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Enabled,
    Disabled,
}

impl StatusEnum for Status {
    const ENUM_TYPE: EnumType = EnumType::new("Status", &["ENABLED", "DISABLED"]);

    fn as_str(self) -> &'static str {
        match self {
            Self::Enabled => "ENABLED",
            Self::Disabled => "DISABLED",
        }
    }

    fn from_canonical(canonical: &str) -> Option<Self> {
        match canonical {
            "ENABLED" => Some(Self::Enabled),
            "DISABLED" => Some(Self::Disabled),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
