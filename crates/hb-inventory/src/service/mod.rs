//! Concrete inventory service.
//!
//! `BloodBankService` composes the unit store, the transfer coordinator,
//! and the request ledger behind a single `RwLock` so many threads can
//! share one handle: ward staff, lab staff, and transfer clerks all issue
//! calls concurrently. Per-unit writes still go through the optimistic
//! version check, so two callers holding the same stale version get exactly
//! one winner regardless of how the lock interleaves them.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::info;

use crate::domain::{
    expiry, fulfillment, summary, AgeBuckets, AvailabilityFilter, BloodRequest, BloodUnit,
    BloodUnitStore, CorrectionRecord, FulfillmentOutcome, GroupSummary, InventoryConfig,
    InventoryError, NewBloodUnitInput, NewRequestInput, RequestLedger, StatusCounts, Transfer,
    TransferCoordinator, TransferStatus, UnitStatus,
};
use crate::ports::inbound::BloodBankApi;
use crate::ports::outbound::{DonorDirectory, OpenDonorDirectory, SystemClock, TimeSource};
use shared_types::{BloodGroup, RequestId, StaffId, StorageLocation, TransferId, UnitId};

/// Composed mutable state: one store per facility, with the coordinator and
/// ledger that operate against it.
#[derive(Debug, Default)]
struct BankState {
    store: BloodUnitStore,
    transfers: TransferCoordinator,
    requests: RequestLedger,
}

/// Thread-safe facade over the inventory domain.
pub struct BloodBankService<C = SystemClock, D = OpenDonorDirectory>
where
    C: TimeSource,
    D: DonorDirectory,
{
    state: RwLock<BankState>,
    clock: C,
    donors: D,
}

impl BloodBankService<SystemClock, OpenDonorDirectory> {
    /// Creates a service on the wall clock with no donor checking.
    pub fn with_defaults() -> Self {
        Self::new(InventoryConfig::default(), SystemClock, OpenDonorDirectory)
    }
}

impl<C, D> BloodBankService<C, D>
where
    C: TimeSource,
    D: DonorDirectory,
{
    /// Creates a service with explicit policy, clock, and donor directory.
    pub fn new(config: InventoryConfig, clock: C, donors: D) -> Self {
        Self {
            state: RwLock::new(BankState {
                store: BloodUnitStore::new(config),
                transfers: TransferCoordinator::new(),
                requests: RequestLedger::new(),
            }),
            clock,
            donors,
        }
    }

    /// Units ever registered for a group. Monotonic; together with
    /// [`BloodBankApi::summary_by_group`] and the terminal counts this backs
    /// conservation checks in the host's own auditing.
    pub fn registered_count(&self, group: BloodGroup) -> u64 {
        self.state.read().store.registered_count(group)
    }

    /// Live per-status counts for a group.
    pub fn status_counts(&self, group: BloodGroup) -> StatusCounts {
        self.state.read().store.status_counts(group)
    }

    /// The clock this service stamps mutations with. Hosts use it to drive
    /// sweep timers; tests use it to move time deterministically.
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<C, D> BloodBankApi for BloodBankService<C, D>
where
    C: TimeSource,
    D: DonorDirectory,
{
    fn register_unit(&self, input: NewBloodUnitInput) -> Result<BloodUnit, InventoryError> {
        if !self.donors.donor_exists(&input.donor) {
            return Err(InventoryError::UnknownDonor(input.donor));
        }
        let now = self.clock.now();
        let mut state = self.state.write();
        let unit = state.store.register(input, now)?.clone();
        info!(unit = %unit.id, group = %unit.blood_group, location = %unit.location,
              "unit registered");
        Ok(unit)
    }

    fn get_unit(&self, id: &UnitId) -> Option<BloodUnit> {
        self.state.read().store.get(id).cloned()
    }

    fn list_available(&self, filter: AvailabilityFilter) -> Vec<BloodUnit> {
        self.state
            .read()
            .store
            .query_available(filter)
            .cloned()
            .collect()
    }

    fn transition_unit(
        &self,
        id: UnitId,
        expected_version: u64,
        next: UnitStatus,
    ) -> Result<BloodUnit, InventoryError> {
        let now = self.clock.now();
        let mut state = self.state.write();
        let unit = state.store.transition(id, expected_version, next, now)?.clone();
        info!(unit = %id, status = ?unit.status, version = unit.version, "unit transitioned");
        Ok(unit)
    }

    fn relocate_unit(
        &self,
        id: UnitId,
        expected_version: u64,
        to: StorageLocation,
    ) -> Result<BloodUnit, InventoryError> {
        let now = self.clock.now();
        let mut state = self.state.write();
        Ok(state.store.relocate(id, expected_version, to, now)?.clone())
    }

    fn remove_unit(
        &self,
        id: UnitId,
        expected_version: u64,
        reason: &str,
    ) -> Result<BloodUnit, InventoryError> {
        let now = self.clock.now();
        let mut state = self.state.write();
        state.store.remove(id, expected_version, reason, now)
    }

    fn expiring_within(&self, days: u32) -> Vec<BloodUnit> {
        let now = self.clock.now();
        let state = self.state.read();
        expiry::expiring_within(&state.store, days, now)
            .cloned()
            .collect()
    }

    fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let mut state = self.state.write();
        expiry::sweep_expired(&mut state.store, now)
    }

    fn age_buckets(&self) -> AgeBuckets {
        let now = self.clock.now();
        let state = self.state.read();
        expiry::age_buckets(&state.store, now)
    }

    fn request_transfer(
        &self,
        from: StorageLocation,
        to: StorageLocation,
        unit_ids: Vec<UnitId>,
        requested_by: StaffId,
    ) -> Result<Transfer, InventoryError> {
        let now = self.clock.now();
        let mut guard = self.state.write();
        let state = &mut *guard;
        Ok(state
            .transfers
            .request(&state.store, from, to, unit_ids, requested_by, now)?
            .clone())
    }

    fn dispatch_transfer(
        &self,
        id: TransferId,
        approved_by: StaffId,
    ) -> Result<Transfer, InventoryError> {
        let now = self.clock.now();
        let mut state = self.state.write();
        Ok(state.transfers.dispatch(id, approved_by, now)?.clone())
    }

    fn complete_transfer(&self, id: TransferId) -> Result<Transfer, InventoryError> {
        let now = self.clock.now();
        let mut guard = self.state.write();
        let state = &mut *guard;
        Ok(state.transfers.complete(&mut state.store, id, now)?.clone())
    }

    fn cancel_transfer(&self, id: TransferId) -> Result<Transfer, InventoryError> {
        let now = self.clock.now();
        let mut state = self.state.write();
        Ok(state.transfers.cancel(id, now)?.clone())
    }

    fn get_transfer(&self, id: &TransferId) -> Option<Transfer> {
        self.state.read().transfers.get(id).cloned()
    }

    fn transfers_by_status(&self, status: TransferStatus) -> Vec<Transfer> {
        self.state
            .read()
            .transfers
            .list_by_status(status)
            .into_iter()
            .cloned()
            .collect()
    }

    fn create_request(&self, input: NewRequestInput) -> Result<BloodRequest, InventoryError> {
        let now = self.clock.now();
        let mut state = self.state.write();
        let request = state.requests.create(input, now)?.clone();
        info!(request = %request.id, group = %request.blood_group,
              quantity = request.quantity, "request placed");
        Ok(request)
    }

    fn cancel_request(&self, id: RequestId) -> Result<BloodRequest, InventoryError> {
        let mut state = self.state.write();
        Ok(state.requests.cancel(id)?.clone())
    }

    fn get_request(&self, id: &RequestId) -> Option<BloodRequest> {
        self.state.read().requests.get(id).cloned()
    }

    fn fulfill_request(&self, id: RequestId) -> Result<FulfillmentOutcome, InventoryError> {
        let now = self.clock.now();
        let mut guard = self.state.write();
        let state = &mut *guard;
        fulfillment::fulfill(&mut state.requests, &mut state.store, id, now)
    }

    fn summary_by_group(&self) -> Vec<GroupSummary> {
        summary::summary_by_group(&self.state.read().store)
    }

    fn summary_by_location(&self) -> BTreeMap<StorageLocation, Vec<GroupSummary>> {
        summary::summary_by_location(&self.state.read().store)
    }

    fn corrections(&self) -> Vec<CorrectionRecord> {
        self.state.read().store.corrections().to_vec()
    }
}
