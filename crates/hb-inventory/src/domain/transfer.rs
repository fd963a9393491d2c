//! Inter-location transfer coordination.
//!
//! The coordinator owns the `Transfer` records and the in-transfer lock map;
//! unit locations are only ever changed through the store's `relocate`, so
//! the store stays the single writer for every unit.
//!
//! Invariants enforced here:
//!
//! - a unit is referenced by at most one non-terminal transfer at a time
//! - admission is all-or-nothing: a rejected request creates no record and
//!   locks no unit
//! - completion is all-or-nothing across the unit set: either every unit
//!   reaches the destination or the transfer is cancelled with every unit
//!   still at its pre-call location

use chrono::{DateTime, Utc};
use shared_types::{StaffId, StorageLocation, TransferId, UnitId};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

use super::entities::{Transfer, TransferStatus, UnitStatus};
use super::errors::InventoryError;
use super::store::BloodUnitStore;

/// Coordinates atomic multi-unit moves between storage sites.
#[derive(Debug, Default)]
pub struct TransferCoordinator {
    /// All transfers indexed by id.
    transfers: HashMap<TransferId, Transfer>,

    /// Units currently referenced by a non-terminal transfer.
    in_transfer: HashMap<UnitId, TransferId>,
}

impl TransferCoordinator {
    /// Creates an empty coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a transfer by id.
    pub fn get(&self, id: &TransferId) -> Option<&Transfer> {
        self.transfers.get(id)
    }

    /// All transfers currently in the given status, in no particular order.
    pub fn list_by_status(&self, status: TransferStatus) -> Vec<&Transfer> {
        self.transfers
            .values()
            .filter(|t| t.status == status)
            .collect()
    }

    /// The non-terminal transfer currently holding a unit, if any.
    pub fn transfer_for_unit(&self, unit: &UnitId) -> Option<TransferId> {
        self.in_transfer.get(unit).copied()
    }

    /// Admits a transfer request, all-or-nothing.
    ///
    /// Every check runs against current store state before anything is
    /// created: origin and destination differ, the unit list is non-empty
    /// and duplicate-free, and every unit exists, is Available, sits at the
    /// origin, and is free of other open transfers. Any failure rejects the
    /// whole request with nothing locked.
    pub fn request(
        &mut self,
        store: &BloodUnitStore,
        from: StorageLocation,
        to: StorageLocation,
        unit_ids: Vec<UnitId>,
        requested_by: StaffId,
        now: DateTime<Utc>,
    ) -> Result<&Transfer, InventoryError> {
        if from == to {
            return Err(InventoryError::SameLocation(from));
        }
        if unit_ids.is_empty() {
            return Err(InventoryError::EmptyTransfer);
        }
        let mut seen = HashSet::with_capacity(unit_ids.len());
        for id in &unit_ids {
            if !seen.insert(*id) {
                return Err(InventoryError::DuplicateTransferUnit(*id));
            }
        }

        for id in &unit_ids {
            let unit = store.get(id).ok_or(InventoryError::UnitNotFound(*id))?;
            if unit.status != UnitStatus::Available {
                return Err(InventoryError::UnitNotAvailable {
                    unit: *id,
                    status: unit.status,
                });
            }
            if unit.location != from {
                return Err(InventoryError::UnitLocationMismatch {
                    unit: *id,
                    expected: from,
                    actual: unit.location.clone(),
                });
            }
            if let Some(holder) = self.in_transfer.get(id) {
                return Err(InventoryError::UnitAlreadyInTransfer {
                    unit: *id,
                    transfer: *holder,
                });
            }
        }

        let transfer = Transfer {
            id: TransferId::new(),
            from,
            to,
            unit_ids,
            status: TransferStatus::Requested,
            requested_by,
            approved_by: None,
            requested_at: now,
            dispatched_at: None,
            closed_at: None,
        };

        let id = transfer.id;
        for unit in &transfer.unit_ids {
            self.in_transfer.insert(*unit, id);
        }
        info!(transfer = %id, from = %transfer.from, to = %transfer.to,
              units = transfer.unit_ids.len(), "transfer admitted");
        Ok(&*self.transfers.entry(id).or_insert(transfer))
    }

    /// Approves and dispatches a requested transfer.
    pub fn dispatch(
        &mut self,
        id: TransferId,
        approved_by: StaffId,
        now: DateTime<Utc>,
    ) -> Result<&Transfer, InventoryError> {
        let transfer = self
            .transfers
            .get_mut(&id)
            .ok_or(InventoryError::TransferNotFound(id))?;

        if transfer.status.is_terminal() {
            return Err(InventoryError::TransferAlreadyTerminal {
                transfer: id,
                status: transfer.status,
            });
        }
        if transfer.status != TransferStatus::Requested {
            return Err(InventoryError::IllegalTransferTransition {
                transfer: id,
                from: transfer.status,
                to: TransferStatus::InTransit,
            });
        }

        transfer.status = TransferStatus::InTransit;
        transfer.approved_by = Some(approved_by);
        transfer.dispatched_at = Some(now);
        Ok(&*transfer)
    }

    /// Completes a transfer: every unit is relocated to the destination, or
    /// none is.
    ///
    /// Two phases. Phase 1 re-validates each unit against live store state
    /// (still Available, still at the origin) and captures its current
    /// version; a unit that was reserved, used, expired, relocated, or
    /// removed since admission aborts the whole completion: the transfer is
    /// marked Cancelled, its locks released, and `TransferAborted` names the
    /// offending unit. Phase 2 applies the relocations with the captured
    /// versions.
    pub fn complete(
        &mut self,
        store: &mut BloodUnitStore,
        id: TransferId,
        now: DateTime<Utc>,
    ) -> Result<&Transfer, InventoryError> {
        let transfer = self
            .transfers
            .get_mut(&id)
            .ok_or(InventoryError::TransferNotFound(id))?;

        if transfer.status.is_terminal() {
            return Err(InventoryError::TransferAlreadyTerminal {
                transfer: id,
                status: transfer.status,
            });
        }

        // Phase 1: re-validate the whole set before touching anything.
        let mut planned: Vec<(UnitId, u64)> = Vec::with_capacity(transfer.unit_ids.len());
        let mut failed: Option<UnitId> = None;
        for unit_id in &transfer.unit_ids {
            match store.get(unit_id) {
                Some(u) if u.status == UnitStatus::Available && u.location == transfer.from => {
                    planned.push((*unit_id, u.version));
                }
                _ => {
                    failed = Some(*unit_id);
                    break;
                }
            }
        }

        if let Some(unit) = failed {
            transfer.status = TransferStatus::Cancelled;
            transfer.closed_at = Some(now);
            for unit_id in &transfer.unit_ids {
                self.in_transfer.remove(unit_id);
            }
            warn!(transfer = %id, %unit, "transfer completion aborted; no unit moved");
            return Err(InventoryError::TransferAborted { transfer: id, unit });
        }

        // Phase 2: apply. The versions were captured an instant ago under
        // the same exclusive borrow, so these writes land; if one does not,
        // undo the moves already applied before reporting the abort.
        let mut applied: Vec<UnitId> = Vec::with_capacity(planned.len());
        for (unit_id, version) in &planned {
            match store.relocate(*unit_id, *version, transfer.to.clone(), now) {
                Ok(_) => applied.push(*unit_id),
                Err(_) => {
                    for moved in &applied {
                        if let Some(u) = store.get(moved) {
                            let v = u.version;
                            let _ = store.relocate(*moved, v, transfer.from.clone(), now);
                        }
                    }
                    transfer.status = TransferStatus::Cancelled;
                    transfer.closed_at = Some(now);
                    for u in &transfer.unit_ids {
                        self.in_transfer.remove(u);
                    }
                    warn!(transfer = %id, unit = %unit_id, "transfer apply failed; rolled back");
                    return Err(InventoryError::TransferAborted {
                        transfer: id,
                        unit: *unit_id,
                    });
                }
            }
        }

        transfer.status = TransferStatus::Completed;
        transfer.closed_at = Some(now);
        for unit_id in &transfer.unit_ids {
            self.in_transfer.remove(unit_id);
        }
        info!(transfer = %id, to = %transfer.to, units = transfer.unit_ids.len(),
              "transfer completed");
        Ok(&*transfer)
    }

    /// Cancels an open transfer and releases its units for new requests.
    pub fn cancel(
        &mut self,
        id: TransferId,
        now: DateTime<Utc>,
    ) -> Result<&Transfer, InventoryError> {
        let transfer = self
            .transfers
            .get_mut(&id)
            .ok_or(InventoryError::TransferNotFound(id))?;

        if transfer.status.is_terminal() {
            return Err(InventoryError::TransferAlreadyTerminal {
                transfer: id,
                status: transfer.status,
            });
        }

        transfer.status = TransferStatus::Cancelled;
        transfer.closed_at = Some(now);
        for unit_id in &transfer.unit_ids {
            self.in_transfer.remove(unit_id);
        }
        info!(transfer = %id, "transfer cancelled");
        Ok(&*transfer)
    }
}
