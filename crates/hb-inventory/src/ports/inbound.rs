//! # Inbound Port - BloodBankApi
//!
//! Primary driving port exposing the inventory subsystem to the surrounding
//! application: ward staff reserve and use units, lab staff register intake
//! and sweep expiry, transfer clerks move stock between sites, and
//! dashboards read summaries. No wire format is prescribed; transport is the
//! caller's concern.

use std::collections::BTreeMap;

use crate::domain::{
    AgeBuckets, AvailabilityFilter, BloodRequest, BloodUnit, CorrectionRecord, FulfillmentOutcome,
    GroupSummary, InventoryError, NewBloodUnitInput, NewRequestInput, Transfer, TransferStatus,
    UnitStatus,
};
use shared_types::{RequestId, StaffId, StorageLocation, TransferId, UnitId};

/// Primary API for the inventory subsystem.
///
/// Every mutating method returns the record as written, including the fresh
/// `version` token a caller needs for its next optimistic write. Every
/// fallible method returns a typed `InventoryError`; no method blocks.
pub trait BloodBankApi: Send + Sync {
    // --- unit lifecycle ---

    /// Registers a freshly donated unit and returns it (status Available,
    /// version 0).
    ///
    /// # Errors
    /// - `UnknownDonor` if the donor directory rejects the donor id
    /// - `InvalidVolume`, `FutureDonationDate`, `AlreadyExpired` for
    ///   malformed intake data
    fn register_unit(&self, input: NewBloodUnitInput) -> Result<BloodUnit, InventoryError>;

    /// Gets a unit by id.
    fn get_unit(&self, id: &UnitId) -> Option<BloodUnit>;

    /// Available units matching the filter, earliest expiry first.
    fn list_available(&self, filter: AvailabilityFilter) -> Vec<BloodUnit>;

    /// Moves a unit along the lifecycle graph (reserve, release, use,
    /// expire). The caller presents the version it last read.
    ///
    /// # Errors
    /// - `UnitNotFound`
    /// - `VersionConflict`: re-read and retry
    /// - `IllegalTransition`: not an edge of the graph
    fn transition_unit(
        &self,
        id: UnitId,
        expected_version: u64,
        next: UnitStatus,
    ) -> Result<BloodUnit, InventoryError>;

    /// Moves an Available unit to a new storage site.
    fn relocate_unit(
        &self,
        id: UnitId,
        expected_version: u64,
        to: StorageLocation,
    ) -> Result<BloodUnit, InventoryError>;

    /// Administrative correction: removes a unit outright, with an audited
    /// reason. Not part of the normal lifecycle.
    fn remove_unit(
        &self,
        id: UnitId,
        expected_version: u64,
        reason: &str,
    ) -> Result<BloodUnit, InventoryError>;

    // --- expiry ---

    /// Available units expiring within the next `days` days, earliest
    /// first. Already-expired stock is excluded.
    fn expiring_within(&self, days: u32) -> Vec<BloodUnit>;

    /// Expires every Available unit past its shelf life. Idempotent for a
    /// fixed date; returns how many units this call expired.
    fn sweep_expired(&self) -> usize;

    /// Available stock bucketed by days since donation.
    fn age_buckets(&self) -> AgeBuckets;

    // --- transfers ---

    /// Admits a transfer of Available units between two sites,
    /// all-or-nothing.
    fn request_transfer(
        &self,
        from: StorageLocation,
        to: StorageLocation,
        unit_ids: Vec<UnitId>,
        requested_by: StaffId,
    ) -> Result<Transfer, InventoryError>;

    /// Approves and dispatches a requested transfer.
    fn dispatch_transfer(
        &self,
        id: TransferId,
        approved_by: StaffId,
    ) -> Result<Transfer, InventoryError>;

    /// Completes a transfer: every unit reaches the destination, or the
    /// transfer is cancelled with nothing moved and `TransferAborted` names
    /// the unit that failed re-validation.
    fn complete_transfer(&self, id: TransferId) -> Result<Transfer, InventoryError>;

    /// Cancels an open transfer, releasing its units for new requests.
    fn cancel_transfer(&self, id: TransferId) -> Result<Transfer, InventoryError>;

    /// Gets a transfer by id.
    fn get_transfer(&self, id: &TransferId) -> Option<Transfer>;

    /// All transfers currently in the given status.
    fn transfers_by_status(&self, status: TransferStatus) -> Vec<Transfer>;

    // --- transfusion requests ---

    /// Places a transfusion request (status Pending).
    fn create_request(&self, input: NewRequestInput) -> Result<BloodRequest, InventoryError>;

    /// Withdraws a pending request.
    fn cancel_request(&self, id: RequestId) -> Result<BloodRequest, InventoryError>;

    /// Gets a request by id.
    fn get_request(&self, id: &RequestId) -> Option<BloodRequest>;

    /// Resolves a pending request against available compatible stock,
    /// first-expiry-first-out. On shortage nothing stays reserved and the
    /// request remains Pending.
    fn fulfill_request(&self, id: RequestId) -> Result<FulfillmentOutcome, InventoryError>;

    // --- summaries ---

    /// Stock on hand per blood group, all eight rows.
    fn summary_by_group(&self) -> Vec<GroupSummary>;

    /// Stock on hand per storage site.
    fn summary_by_location(&self) -> BTreeMap<StorageLocation, Vec<GroupSummary>>;

    /// Audit trail of administrative removals, oldest first.
    fn corrections(&self) -> Vec<CorrectionRecord>;
}
