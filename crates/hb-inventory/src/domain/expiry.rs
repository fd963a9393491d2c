//! Expiry monitoring over the unit store.
//!
//! Stateless sweeps and reports; the host application decides when to run
//! them (typically from a timer). Nothing here spawns a thread.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use super::entities::{BloodUnit, UnitStatus};
use super::store::BloodUnitStore;
use super::value_objects::{AgeBuckets, AvailabilityFilter};
use shared_types::UnitId;

/// Available units whose expiry falls within `(as_of, as_of + days]`.
///
/// Already-expired stock is excluded: it belongs to the sweep, not the
/// "expiring soon" report. Restartable, no side effects, earliest expiry
/// first.
pub fn expiring_within(
    store: &BloodUnitStore,
    days: u32,
    as_of: DateTime<Utc>,
) -> impl Iterator<Item = &BloodUnit> + '_ {
    let today = as_of.date_naive();
    let horizon = today + Duration::days(i64::from(days));
    store
        .query_available(AvailabilityFilter::any())
        .skip_while(move |unit| unit.expiry_date <= today)
        .take_while(move |unit| unit.expiry_date <= horizon)
}

/// Expires every Available unit whose shelf life has run out by `as_of`.
///
/// Each unit is moved with the version read during the scan; a conflict
/// means another actor reserved or used the unit in the meantime, which is
/// the correct outcome, so the unit is skipped silently and reconsidered on
/// the next sweep. Running the sweep twice with the same `as_of` changes
/// nothing the second time.
///
/// Returns the number of units expired by this call.
pub fn sweep_expired(store: &mut BloodUnitStore, as_of: DateTime<Utc>) -> usize {
    let today = as_of.date_naive();

    let due: Vec<(UnitId, u64)> = store
        .query_available(AvailabilityFilter::any())
        .take_while(|unit| unit.expiry_date <= today)
        .map(|unit| (unit.id, unit.version))
        .collect();

    let mut expired = 0;
    for (id, version) in due {
        match store.transition(id, version, UnitStatus::Expired, as_of) {
            Ok(_) => expired += 1,
            // Grabbed or corrected between scan and apply; the next sweep
            // sees the current state.
            Err(err) => debug!(unit = %id, %err, "sweep skipped unit"),
        }
    }

    if expired > 0 {
        info!(count = expired, %today, "expiry sweep withdrew units");
    }
    expired
}

/// Available stock bucketed by days since donation.
pub fn age_buckets(store: &BloodUnitStore, as_of: DateTime<Utc>) -> AgeBuckets {
    let today = as_of.date_naive();
    let mut buckets = AgeBuckets::default();
    for unit in store.query_available(AvailabilityFilter::any()) {
        buckets.record(unit.age_days(today));
    }
    buckets
}
