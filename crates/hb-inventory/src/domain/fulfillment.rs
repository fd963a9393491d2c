//! Transfusion request fulfillment.
//!
//! Resolves a pending request against available compatible stock. Issuance
//! is first-expiry-first-out across every compatible donor group: the unit
//! closest to expiry goes first, with ties preferring the exact requested
//! group, then the lowest unit id for determinism. A half-filled request is
//! never left behind: either the full quantity is reserved or every
//! reservation made by the call is released again.

use chrono::{DateTime, NaiveDate, Utc};
use shared_types::{BloodGroup, RequestId, UnitId};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use super::compatibility::compatible_donors;
use super::entities::{BloodRequest, NewRequestInput, RequestStatus, UnitStatus};
use super::errors::InventoryError;
use super::store::BloodUnitStore;
use super::value_objects::{AvailabilityFilter, FulfillmentOutcome};

/// Owns the transfusion request records.
#[derive(Debug, Default)]
pub struct RequestLedger {
    requests: HashMap<RequestId, BloodRequest>,
}

impl RequestLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a new request.
    ///
    /// # Errors
    /// `EmptyRequest` for a zero quantity.
    pub fn create(
        &mut self,
        input: NewRequestInput,
        now: DateTime<Utc>,
    ) -> Result<&BloodRequest, InventoryError> {
        if input.quantity == 0 {
            return Err(InventoryError::EmptyRequest);
        }

        let request = BloodRequest {
            id: RequestId::new(),
            patient: input.patient,
            blood_group: input.blood_group,
            quantity: input.quantity,
            priority: input.priority,
            status: RequestStatus::Pending,
            requested_at: now,
            required_by: input.required_by,
            fulfilled_units: Vec::new(),
        };
        let id = request.id;
        Ok(&*self.requests.entry(id).or_insert(request))
    }

    /// Gets a request by id.
    pub fn get(&self, id: &RequestId) -> Option<&BloodRequest> {
        self.requests.get(id)
    }

    /// All requests currently in the given status, in no particular order.
    pub fn list_by_status(&self, status: RequestStatus) -> Vec<&BloodRequest> {
        self.requests
            .values()
            .filter(|r| r.status == status)
            .collect()
    }

    /// Withdraws a pending request.
    ///
    /// # Errors
    /// - `RequestNotFound`
    /// - `RequestNotPending` once fulfilled or already cancelled
    pub fn cancel(&mut self, id: RequestId) -> Result<&BloodRequest, InventoryError> {
        let request = self
            .requests
            .get_mut(&id)
            .ok_or(InventoryError::RequestNotFound(id))?;
        if request.status != RequestStatus::Pending {
            return Err(InventoryError::RequestNotPending {
                request: id,
                status: request.status,
            });
        }
        request.status = RequestStatus::Cancelled;
        Ok(&*request)
    }
}

/// A reservable unit captured during the candidate scan.
struct Candidate {
    expiry_date: NaiveDate,
    exact_group: bool,
    unit: UnitId,
    version: u64,
}

/// Resolves a pending request against available compatible inventory.
///
/// Reserves ranked candidates one at a time; a `VersionConflict` means
/// another fulfillment got there first, so the loser skips that unit and
/// keeps walking the ranking rather than failing. On shortage, every
/// reservation made by this call is released and the request stays Pending.
pub fn fulfill(
    ledger: &mut RequestLedger,
    store: &mut BloodUnitStore,
    id: RequestId,
    now: DateTime<Utc>,
) -> Result<FulfillmentOutcome, InventoryError> {
    let request = ledger
        .requests
        .get_mut(&id)
        .ok_or(InventoryError::RequestNotFound(id))?;
    if request.status != RequestStatus::Pending {
        return Err(InventoryError::RequestNotPending {
            request: id,
            status: request.status,
        });
    }

    let donors: HashSet<BloodGroup> = compatible_donors(request.blood_group).into_iter().collect();
    let mut candidates: Vec<Candidate> = store
        .query_available(AvailabilityFilter::any())
        .filter(|unit| donors.contains(&unit.blood_group))
        .map(|unit| Candidate {
            expiry_date: unit.expiry_date,
            exact_group: unit.blood_group == request.blood_group,
            unit: unit.id,
            version: unit.version,
        })
        .collect();
    // Earliest expiry first; exact group, then id, break ties.
    candidates.sort_by_key(|c| (c.expiry_date, !c.exact_group, c.unit));

    let need = request.quantity;
    let mut reserved: Vec<UnitId> = Vec::with_capacity(need as usize);
    for candidate in &candidates {
        if reserved.len() == need as usize {
            break;
        }
        match store.transition(candidate.unit, candidate.version, UnitStatus::Reserved, now) {
            Ok(_) => reserved.push(candidate.unit),
            Err(InventoryError::VersionConflict { .. }) => {
                // Another request grabbed it between scan and reserve.
                debug!(unit = %candidate.unit, "candidate lost to concurrent fulfillment");
            }
            Err(InventoryError::IllegalTransition { .. } | InventoryError::UnitNotFound(_)) => {
                // Expired, used, or corrected since the scan; walk on.
                debug!(unit = %candidate.unit, "candidate no longer reservable");
            }
            Err(other) => return Err(other),
        }
    }

    if reserved.len() == need as usize {
        request.status = RequestStatus::Fulfilled;
        request.fulfilled_units = reserved.clone();
        info!(request = %id, units = reserved.len(), "request fulfilled");
        return Ok(FulfillmentOutcome::Fulfilled { units: reserved });
    }

    // Shortage: release everything this call reserved. A half-filled
    // request would read as progress while the patient still has nothing.
    let have = reserved.len() as u32;
    for unit in reserved {
        if let Some(current) = store.get(&unit) {
            let version = current.version;
            let _ = store.transition(unit, version, UnitStatus::Available, now);
        }
    }

    let outcome = if have == 0 {
        info!(request = %id, "no compatible supply");
        FulfillmentOutcome::NoSupply
    } else {
        info!(request = %id, have, need, "insufficient compatible supply");
        FulfillmentOutcome::PartialShortage { have, need }
    };
    Ok(outcome)
}
