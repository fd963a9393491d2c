//! Physical storage locations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named physical storage site ("Main", "ICU", "Lab 2"...).
///
/// Location names come from the facility's own configuration; the inventory
/// core treats them as opaque and only compares them for equality. Ordered so
/// reporting can render locations deterministically.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageLocation(String);

impl StorageLocation {
    /// Creates a location from a facility-defined name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The location name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StorageLocation {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for StorageLocation {
    fn from(name: String) -> Self {
        Self(name)
    }
}
