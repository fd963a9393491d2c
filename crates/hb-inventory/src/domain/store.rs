//! Blood unit store: the authoritative collection of units.
//!
//! Data structures:
//!
//! - `units`: O(1) lookup by unit id
//! - `available`: expiry-ordered set of Available units (FEFO scans)
//! - `registered`: monotonic per-group intake counters
//!
//! The store is the single writer for every unit: status changes go through
//! [`BloodUnitStore::transition`], location changes through
//! [`BloodUnitStore::relocate`], and both demand the version the caller last
//! read. A stale version is rejected with `VersionConflict` and the caller
//! re-reads and retries; the store itself never blocks.

use chrono::{DateTime, Utc};
use shared_types::{BloodGroup, StorageLocation, UnitId};
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

use super::entities::{BloodUnit, InventoryConfig, NewBloodUnitInput, UnitStatus};
use super::errors::InventoryError;
use super::value_objects::{AvailabilityFilter, CorrectionRecord, ExpiryRank, StatusCounts};

/// Authoritative collection of blood units with lifecycle enforcement.
#[derive(Debug, Default)]
pub struct BloodUnitStore {
    /// Policy knobs (shelf life).
    config: InventoryConfig,

    /// All units indexed by id.
    units: HashMap<UnitId, BloodUnit>,

    /// Available units ordered by expiry date (earliest first).
    /// Kept in lockstep with `units` on every status flip.
    available: BTreeSet<ExpiryRank>,

    /// Units ever registered, per group. Never decremented: together with a
    /// live status scan this backs the conservation check
    /// available + reserved + used + expired == registered.
    registered: HashMap<BloodGroup, u64>,

    /// Audit trail of administrative removals.
    corrections: Vec<CorrectionRecord>,
}

impl BloodUnitStore {
    /// Creates an empty store under the given policy.
    pub fn new(config: InventoryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Creates an empty store with default policy.
    pub fn with_defaults() -> Self {
        Self::new(InventoryConfig::default())
    }

    /// Returns the active policy.
    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    /// Number of units currently held (all statuses).
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns true if no units are held.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Registers a freshly donated unit.
    ///
    /// The expiry date is derived from the donation date and the current
    /// shelf-life policy, then stored on the unit for good.
    ///
    /// # Errors
    /// - `InvalidVolume` for a non-positive collected volume
    /// - `FutureDonationDate` if the donation date is after `now`'s date
    /// - `AlreadyExpired` if the derived expiry is not after `now`'s date
    pub fn register(
        &mut self,
        input: NewBloodUnitInput,
        now: DateTime<Utc>,
    ) -> Result<&BloodUnit, InventoryError> {
        let today = now.date_naive();

        if input.volume_ml == 0 {
            return Err(InventoryError::InvalidVolume {
                volume_ml: input.volume_ml,
            });
        }
        if input.donation_date > today {
            return Err(InventoryError::FutureDonationDate {
                donation_date: input.donation_date,
                today,
            });
        }
        let expiry_date = self.config.expiry_for(input.donation_date);
        if expiry_date <= today {
            return Err(InventoryError::AlreadyExpired {
                expiry: expiry_date,
                today,
            });
        }

        let unit = BloodUnit {
            id: UnitId::new(),
            blood_group: input.blood_group,
            volume_ml: input.volume_ml,
            donation_date: input.donation_date,
            expiry_date,
            donor: input.donor,
            location: input.location,
            status: UnitStatus::Available,
            cross_match_tested: input.cross_match_tested,
            version: 0,
            created_at: now,
            updated_at: now,
        };

        let id = unit.id;
        self.available.insert(ExpiryRank::new(unit.expiry_date, id));
        *self.registered.entry(unit.blood_group).or_default() += 1;
        Ok(&*self.units.entry(id).or_insert(unit))
    }

    /// Gets a unit by id.
    pub fn get(&self, id: &UnitId) -> Option<&BloodUnit> {
        self.units.get(id)
    }

    /// Checks if a unit exists.
    pub fn contains(&self, id: &UnitId) -> bool {
        self.units.contains_key(id)
    }

    /// Lazy, restartable scan over Available units matching the filter, in
    /// expiry order (earliest first).
    pub fn query_available(
        &self,
        filter: AvailabilityFilter,
    ) -> impl Iterator<Item = &BloodUnit> + '_ {
        self.available.iter().filter_map(move |rank| {
            let unit = self.units.get(&rank.unit)?;
            filter
                .matches(unit.blood_group, &unit.location)
                .then_some(unit)
        })
    }

    /// Read-only scan over every unit, all statuses, unordered.
    pub fn units(&self) -> impl Iterator<Item = &BloodUnit> + '_ {
        self.units.values()
    }

    /// Moves a unit along the lifecycle graph. The sole mutator of `status`.
    ///
    /// `expected_version` must be the version the caller read immediately
    /// before; a concurrent mutation bumps the stored version and this call
    /// returns `VersionConflict`, leaving the unit untouched.
    ///
    /// # Errors
    /// - `UnitNotFound`
    /// - `VersionConflict` (recoverable: re-read and retry)
    /// - `IllegalTransition` for a move that is not an edge of the graph
    pub fn transition(
        &mut self,
        id: UnitId,
        expected_version: u64,
        next: UnitStatus,
        now: DateTime<Utc>,
    ) -> Result<&BloodUnit, InventoryError> {
        let unit = self
            .units
            .get_mut(&id)
            .ok_or(InventoryError::UnitNotFound(id))?;

        if unit.version != expected_version {
            return Err(InventoryError::VersionConflict {
                unit: id,
                expected: expected_version,
                actual: unit.version,
            });
        }
        if !unit.status.can_transition_to(next) {
            warn!(unit = %id, from = ?unit.status, to = ?next, "illegal status transition rejected");
            return Err(InventoryError::IllegalTransition {
                unit: id,
                from: unit.status,
                to: next,
            });
        }

        let rank = ExpiryRank::new(unit.expiry_date, id);
        if unit.status == UnitStatus::Available {
            self.available.remove(&rank);
        }
        if next == UnitStatus::Available {
            self.available.insert(rank);
        }

        unit.status = next;
        unit.version += 1;
        unit.updated_at = now;
        Ok(&*unit)
    }

    /// Moves a unit to a new storage site. The sole mutator of `location`.
    ///
    /// Permitted only while the unit is Available: units mid-transfer stay
    /// Available so inventory never loses sight of stock in transit, and
    /// Reserved units are pinned where the reserving workflow expects them.
    ///
    /// # Errors
    /// - `UnitNotFound`
    /// - `VersionConflict` (recoverable: re-read and retry)
    /// - `UnitNotAvailable` if the unit is Reserved, Used, or Expired
    pub fn relocate(
        &mut self,
        id: UnitId,
        expected_version: u64,
        new_location: StorageLocation,
        now: DateTime<Utc>,
    ) -> Result<&BloodUnit, InventoryError> {
        let unit = self
            .units
            .get_mut(&id)
            .ok_or(InventoryError::UnitNotFound(id))?;

        if unit.version != expected_version {
            return Err(InventoryError::VersionConflict {
                unit: id,
                expected: expected_version,
                actual: unit.version,
            });
        }
        if unit.status != UnitStatus::Available {
            return Err(InventoryError::UnitNotAvailable {
                unit: id,
                status: unit.status,
            });
        }

        unit.location = new_location;
        unit.version += 1;
        unit.updated_at = now;
        Ok(&*unit)
    }

    /// Administrative correction: removes a unit outright.
    ///
    /// Not part of the normal lifecycle; used to repair data-entry mistakes.
    /// The removal is audited via [`BloodUnitStore::corrections`] and logged;
    /// the per-group registration counter is left untouched.
    pub fn remove(
        &mut self,
        id: UnitId,
        expected_version: u64,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<BloodUnit, InventoryError> {
        let unit = self
            .units
            .get(&id)
            .ok_or(InventoryError::UnitNotFound(id))?;
        if unit.version != expected_version {
            return Err(InventoryError::VersionConflict {
                unit: id,
                expected: expected_version,
                actual: unit.version,
            });
        }

        // Checks passed; take the record out.
        let unit = self
            .units
            .remove(&id)
            .ok_or(InventoryError::UnitNotFound(id))?;
        if unit.status == UnitStatus::Available {
            self.available.remove(&ExpiryRank::new(unit.expiry_date, id));
        }
        warn!(unit = %id, reason, "administrative removal of unit");
        self.corrections.push(CorrectionRecord {
            unit: id,
            blood_group: unit.blood_group,
            reason: reason.to_string(),
            removed_at: now,
        });
        Ok(unit)
    }

    /// Audit trail of administrative removals, oldest first.
    pub fn corrections(&self) -> &[CorrectionRecord] {
        &self.corrections
    }

    /// Units ever registered for a group. Monotonic.
    pub fn registered_count(&self, group: BloodGroup) -> u64 {
        self.registered.get(&group).copied().unwrap_or(0)
    }

    /// Live per-status counts for a group, computed by scan.
    pub fn status_counts(&self, group: BloodGroup) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for unit in self.units.values().filter(|u| u.blood_group == group) {
            match unit.status {
                UnitStatus::Available => counts.available += 1,
                UnitStatus::Reserved => counts.reserved += 1,
                UnitStatus::Used => counts.used += 1,
                UnitStatus::Expired => counts.expired += 1,
            }
        }
        counts
    }
}
