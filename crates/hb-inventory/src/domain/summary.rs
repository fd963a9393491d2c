//! Derived inventory summaries.
//!
//! Every figure here is computed from a live scan of the unit store at call
//! time. Nothing is cached, so a summary can never disagree with the stock
//! it describes.

use shared_types::{BloodGroup, StorageLocation};
use std::collections::BTreeMap;

use super::entities::UnitStatus;
use super::store::BloodUnitStore;
use super::value_objects::GroupSummary;

/// Stock on hand per blood group: one row for each of the eight groups, in
/// [`BloodGroup::ALL`] order, zero rows included.
pub fn summary_by_group(store: &BloodUnitStore) -> Vec<GroupSummary> {
    let mut available = [0usize; 8];
    let mut reserved = [0usize; 8];
    for unit in store.units() {
        match unit.status {
            UnitStatus::Available => available[unit.blood_group.index()] += 1,
            UnitStatus::Reserved => reserved[unit.blood_group.index()] += 1,
            UnitStatus::Used | UnitStatus::Expired => {}
        }
    }

    BloodGroup::ALL
        .into_iter()
        .map(|group| GroupSummary::new(group, available[group.index()], reserved[group.index()]))
        .collect()
}

/// Stock on hand per storage site, each site broken down by blood group in
/// [`BloodGroup::ALL`] order with zero rows omitted. Sites with no stock on
/// hand do not appear.
pub fn summary_by_location(
    store: &BloodUnitStore,
) -> BTreeMap<StorageLocation, Vec<GroupSummary>> {
    let mut per_site: BTreeMap<StorageLocation, ([usize; 8], [usize; 8])> = BTreeMap::new();
    for unit in store.units() {
        let slot = match unit.status {
            UnitStatus::Available => 0,
            UnitStatus::Reserved => 1,
            UnitStatus::Used | UnitStatus::Expired => continue,
        };
        let (available, reserved) = per_site.entry(unit.location.clone()).or_default();
        if slot == 0 {
            available[unit.blood_group.index()] += 1;
        } else {
            reserved[unit.blood_group.index()] += 1;
        }
    }

    per_site
        .into_iter()
        .map(|(location, (available, reserved))| {
            let rows = BloodGroup::ALL
                .into_iter()
                .filter_map(|group| {
                    let row = GroupSummary::new(
                        group,
                        available[group.index()],
                        reserved[group.index()],
                    );
                    (row.total > 0).then_some(row)
                })
                .collect();
            (location, rows)
        })
        .collect()
}
