//! The eight ABO/Rh blood groups.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rhesus factor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rh {
    /// Rh-positive.
    Positive,
    /// Rh-negative.
    Negative,
}

/// One of the eight ABO/Rh blood groups.
///
/// Serialized with the clinical labels (`"A+"`, `"O-"`, ...) so values
/// round-trip unchanged through the ordering UIs and reporting layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodGroup {
    /// A Rh-positive.
    #[serde(rename = "A+")]
    APos,
    /// A Rh-negative.
    #[serde(rename = "A-")]
    ANeg,
    /// B Rh-positive.
    #[serde(rename = "B+")]
    BPos,
    /// B Rh-negative.
    #[serde(rename = "B-")]
    BNeg,
    /// AB Rh-positive.
    #[serde(rename = "AB+")]
    AbPos,
    /// AB Rh-negative.
    #[serde(rename = "AB-")]
    AbNeg,
    /// O Rh-positive.
    #[serde(rename = "O+")]
    OPos,
    /// O Rh-negative.
    #[serde(rename = "O-")]
    ONeg,
}

impl BloodGroup {
    /// All eight groups, in a fixed order used for table indexing and
    /// exhaustive summaries.
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::APos,
        BloodGroup::ANeg,
        BloodGroup::BPos,
        BloodGroup::BNeg,
        BloodGroup::AbPos,
        BloodGroup::AbNeg,
        BloodGroup::OPos,
        BloodGroup::ONeg,
    ];

    /// Stable index into [`BloodGroup::ALL`], usable for matrix lookups.
    pub fn index(self) -> usize {
        match self {
            BloodGroup::APos => 0,
            BloodGroup::ANeg => 1,
            BloodGroup::BPos => 2,
            BloodGroup::BNeg => 3,
            BloodGroup::AbPos => 4,
            BloodGroup::AbNeg => 5,
            BloodGroup::OPos => 6,
            BloodGroup::ONeg => 7,
        }
    }

    /// The Rhesus factor of this group.
    pub fn rh(self) -> Rh {
        match self {
            BloodGroup::APos | BloodGroup::BPos | BloodGroup::AbPos | BloodGroup::OPos => {
                Rh::Positive
            }
            BloodGroup::ANeg | BloodGroup::BNeg | BloodGroup::AbNeg | BloodGroup::ONeg => {
                Rh::Negative
            }
        }
    }

    /// The clinical label, e.g. `"AB-"`.
    pub fn label(self) -> &'static str {
        match self {
            BloodGroup::APos => "A+",
            BloodGroup::ANeg => "A-",
            BloodGroup::BPos => "B+",
            BloodGroup::BNeg => "B-",
            BloodGroup::AbPos => "AB+",
            BloodGroup::AbNeg => "AB-",
            BloodGroup::OPos => "O+",
            BloodGroup::ONeg => "O-",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string is not a recognized blood group label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseBloodGroupError(pub String);

impl fmt::Display for ParseBloodGroupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized blood group label: {:?}", self.0)
    }
}

impl std::error::Error for ParseBloodGroupError {}

impl FromStr for BloodGroup {
    type Err = ParseBloodGroupError;

    /// Parses a clinical label, case-insensitively (`"ab+"` parses as AB+).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A+" => Ok(BloodGroup::APos),
            "A-" => Ok(BloodGroup::ANeg),
            "B+" => Ok(BloodGroup::BPos),
            "B-" => Ok(BloodGroup::BNeg),
            "AB+" => Ok(BloodGroup::AbPos),
            "AB-" => Ok(BloodGroup::AbNeg),
            "O+" => Ok(BloodGroup::OPos),
            "O-" => Ok(BloodGroup::ONeg),
            _ => Err(ParseBloodGroupError(s.to_string())),
        }
    }
}
