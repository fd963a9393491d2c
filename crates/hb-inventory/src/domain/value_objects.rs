//! Value objects for the inventory subsystem.
//!
//! Immutable types used for ordering, filtering, and reporting.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{BloodGroup, StorageLocation, UnitId};
use std::cmp::Ordering;

/// A unit reference ordered for first-expiry-first-out scans.
///
/// Implements `Ord` so that the earliest expiry date comes first; ties are
/// broken by unit id for deterministic iteration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ExpiryRank {
    /// Expiry date of the unit (earlier = issued first).
    pub expiry_date: NaiveDate,
    /// Unit identifier (deterministic tie-breaker).
    pub unit: UnitId,
}

impl ExpiryRank {
    /// Creates a rank entry for a unit.
    pub fn new(expiry_date: NaiveDate, unit: UnitId) -> Self {
        Self { expiry_date, unit }
    }
}

impl Ord for ExpiryRank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.expiry_date
            .cmp(&other.expiry_date)
            .then_with(|| self.unit.cmp(&other.unit))
    }
}

impl PartialOrd for ExpiryRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Optional constraints for availability queries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityFilter {
    /// Restrict to one blood group.
    pub blood_group: Option<BloodGroup>,
    /// Restrict to one storage site.
    pub location: Option<StorageLocation>,
}

impl AvailabilityFilter {
    /// No constraints: every available unit matches.
    pub fn any() -> Self {
        Self::default()
    }

    /// Restrict to one blood group.
    pub fn for_group(blood_group: BloodGroup) -> Self {
        Self {
            blood_group: Some(blood_group),
            ..Self::default()
        }
    }

    /// Restrict to one storage site, composing with other constraints.
    pub fn at_location(mut self, location: StorageLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Check a unit's group and location against the constraints. Status is
    /// the store's concern, not the filter's.
    pub fn matches(&self, blood_group: BloodGroup, location: &StorageLocation) -> bool {
        self.blood_group.map_or(true, |g| g == blood_group)
            && self.location.as_ref().map_or(true, |l| l == location)
    }
}

/// Stock counts for one blood group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// The blood group this row describes.
    pub blood_group: BloodGroup,
    /// Units in Available status.
    pub available: usize,
    /// Units in Reserved status.
    pub reserved: usize,
    /// Stock on hand: available + reserved.
    pub total: usize,
}

impl GroupSummary {
    /// Builds a row, deriving `total`.
    pub fn new(blood_group: BloodGroup, available: usize, reserved: usize) -> Self {
        Self {
            blood_group,
            available,
            reserved,
            total: available + reserved,
        }
    }
}

/// Live per-status unit counts for one blood group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    /// Units in Available status.
    pub available: u64,
    /// Units in Reserved status.
    pub reserved: u64,
    /// Units in Used status.
    pub used: u64,
    /// Units in Expired status.
    pub expired: u64,
}

impl StatusCounts {
    /// Sum over all statuses. Under the conservation property this equals
    /// the number of units ever registered for the group.
    pub fn total(&self) -> u64 {
        self.available + self.reserved + self.used + self.expired
    }
}

/// Available stock bucketed by days since donation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBuckets {
    /// Donated 0–7 days ago.
    pub d0_7: usize,
    /// Donated 8–14 days ago.
    pub d8_14: usize,
    /// Donated 15–21 days ago.
    pub d15_21: usize,
    /// Donated 22–28 days ago.
    pub d22_28: usize,
    /// Donated 29–35 days ago.
    pub d29_35: usize,
    /// Donated more than 35 days ago.
    pub over_35: usize,
}

impl AgeBuckets {
    /// Files one unit by its age in days.
    pub fn record(&mut self, age_days: i64) {
        match age_days {
            i64::MIN..=7 => self.d0_7 += 1,
            8..=14 => self.d8_14 += 1,
            15..=21 => self.d15_21 += 1,
            22..=28 => self.d22_28 += 1,
            29..=35 => self.d29_35 += 1,
            _ => self.over_35 += 1,
        }
    }

    /// Total units filed.
    pub fn total(&self) -> usize {
        self.d0_7 + self.d8_14 + self.d15_21 + self.d22_28 + self.d29_35 + self.over_35
    }
}

/// Result of resolving a transfusion request against inventory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FulfillmentOutcome {
    /// Every requested unit was reserved; the request is now Fulfilled.
    Fulfilled {
        /// Reserved units in issuance order.
        units: Vec<UnitId>,
    },
    /// Some compatible stock existed but not enough; nothing stays reserved
    /// and the request remains Pending.
    PartialShortage {
        /// Units that could have been reserved.
        have: u32,
        /// Units the request needs.
        need: u32,
    },
    /// No compatible stock at all; the request remains Pending.
    NoSupply,
}

/// Audit entry for an administrative unit removal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionRecord {
    /// The removed unit.
    pub unit: UnitId,
    /// Its blood group at removal time.
    pub blood_group: BloodGroup,
    /// Operator-supplied justification.
    pub reason: String,
    /// When the removal happened.
    pub removed_at: DateTime<Utc>,
}
