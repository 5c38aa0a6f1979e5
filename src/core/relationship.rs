//! Reference relationship kinds.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Kind of directed edge between two components.
///
/// Serialized as the numeric type code the inventory API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relationship {
    /// repository -> package, carrying the pinned version
    DependsOnVersion,
    /// application -> repository
    Maintains,
    /// hosting platform -> repository
    Hosts,
}

impl Relationship {
    /// Wire code used by the inventory API.
    pub fn code(self) -> u32 {
        match self {
            Relationship::DependsOnVersion => 3,
            Relationship::Maintains => 4,
            Relationship::Hosts => 5,
        }
    }

    /// Look up a relationship by wire code.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            3 => Some(Relationship::DependsOnVersion),
            4 => Some(Relationship::Maintains),
            5 => Some(Relationship::Hosts),
            _ => None,
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relationship::DependsOnVersion => write!(f, "depends-on-version"),
            Relationship::Maintains => write!(f, "maintains"),
            Relationship::Hosts => write!(f, "hosts"),
        }
    }
}

impl Serialize for Relationship {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.code())
    }
}

impl<'de> Deserialize<'de> for Relationship {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = u32::deserialize(deserializer)?;
        Relationship::from_code(code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown relationship code {}", code)))
    }
}
