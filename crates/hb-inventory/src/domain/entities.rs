//! Core domain entities for the inventory subsystem.
//!
//! Defines the blood unit state machine and the records for transfusion
//! requests and inter-location transfers.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{
    BloodGroup, DonorId, PatientId, RequestId, StaffId, StorageLocation, TransferId, UnitId,
};

/// Lifecycle status of a physical blood unit.
///
/// State machine:
/// ```text
/// [AVAILABLE] ⇄ [RESERVED]
///      │    \        │
///      │     \       └──use──→ [USED]      (terminal)
///      │      └───────use────→ [USED]
///      └────expiry sweep─────→ [EXPIRED]   (terminal)
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitStatus {
    /// In stock and eligible for reservation, transfer, and expiry.
    #[default]
    Available,
    /// Held for a transfusion request; released back to Available if the
    /// request falls through.
    Reserved,
    /// Transfused. Terminal.
    Used,
    /// Past shelf life, withdrawn by the expiry sweep. Terminal.
    Expired,
}

impl UnitStatus {
    /// Check if a status change is an edge of the lifecycle graph.
    pub fn can_transition_to(self, next: UnitStatus) -> bool {
        matches!(
            (self, next),
            (Self::Available, Self::Reserved)
                | (Self::Reserved, Self::Available)
                | (Self::Available, Self::Used)
                | (Self::Reserved, Self::Used)
                | (Self::Available, Self::Expired)
        )
    }

    /// Check if the status admits no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Used | Self::Expired)
    }
}

/// One physical donation unit.
///
/// Owned exclusively by the unit store; `version` is the optimistic
/// concurrency token and is bumped on every mutation, so a caller must
/// present the version it last read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodUnit {
    /// Unique identifier, assigned at registration, never reused.
    pub id: UnitId,
    /// ABO/Rh group of the donation.
    pub blood_group: BloodGroup,
    /// Collected volume in milliliters. Always positive.
    pub volume_ml: u32,
    /// Date the unit was collected.
    pub donation_date: NaiveDate,
    /// Mandatory withdrawal date, fixed at registration. A later shelf-life
    /// policy change does not touch units already on the shelf.
    pub expiry_date: NaiveDate,
    /// Donor reference. The donor record itself lives elsewhere.
    pub donor: DonorId,
    /// Current physical storage site.
    pub location: StorageLocation,
    /// Lifecycle status.
    pub status: UnitStatus,
    /// Whether the lab has cross-match tested this unit.
    pub cross_match_tested: bool,
    /// Optimistic concurrency token, incremented on every mutation.
    pub version: u64,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the most recent mutation.
    pub updated_at: DateTime<Utc>,
}

impl BloodUnit {
    /// Check if the unit is in stock.
    pub fn is_available(&self) -> bool {
        self.status == UnitStatus::Available
    }

    /// Check if the unit's shelf life has run out on the given date.
    pub fn is_expired_by(&self, as_of: NaiveDate) -> bool {
        self.expiry_date <= as_of
    }

    /// Days elapsed since donation. Negative if `as_of` predates donation.
    pub fn age_days(&self, as_of: NaiveDate) -> i64 {
        (as_of - self.donation_date).num_days()
    }
}

/// Intake data for registering a freshly donated unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBloodUnitInput {
    /// ABO/Rh group.
    pub blood_group: BloodGroup,
    /// Collected volume in milliliters.
    pub volume_ml: u32,
    /// Collection date.
    pub donation_date: NaiveDate,
    /// Donor reference.
    pub donor: DonorId,
    /// Initial storage site.
    pub location: StorageLocation,
    /// Whether cross-match testing has already been done at intake.
    pub cross_match_tested: bool,
}

/// Clinical urgency of a transfusion request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestPriority {
    /// Scheduled or elective need.
    #[default]
    Normal,
    /// Life-threatening need.
    Urgent,
}

/// Lifecycle status of a transfusion request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Awaiting fulfillment.
    #[default]
    Pending,
    /// Fully reserved against inventory. Terminal.
    Fulfilled,
    /// Withdrawn by the ordering workflow. Terminal.
    Cancelled,
}

impl RequestStatus {
    /// Check if the status admits no further changes.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Fulfilled | Self::Cancelled)
    }
}

/// A clinical need for blood.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodRequest {
    /// Unique identifier.
    pub id: RequestId,
    /// Patient the transfusion is for.
    pub patient: PatientId,
    /// Recipient blood group; compatible donor groups may be issued.
    pub blood_group: BloodGroup,
    /// Number of units needed. Always positive.
    pub quantity: u32,
    /// Clinical urgency.
    pub priority: RequestPriority,
    /// Lifecycle status.
    pub status: RequestStatus,
    /// When the request was placed.
    pub requested_at: DateTime<Utc>,
    /// Latest clinically acceptable date.
    pub required_by: NaiveDate,
    /// Units reserved for this request, in issuance order. Populated only
    /// when the request is fulfilled in full.
    pub fulfilled_units: Vec<UnitId>,
}

impl BloodRequest {
    /// Check the fulfillment invariant: the unit list is complete exactly
    /// when the request is Fulfilled, and empty otherwise.
    pub fn is_consistent(&self) -> bool {
        match self.status {
            RequestStatus::Fulfilled => self.fulfilled_units.len() == self.quantity as usize,
            _ => self.fulfilled_units.is_empty(),
        }
    }
}

/// Ordering data for placing a transfusion request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRequestInput {
    /// Patient the transfusion is for.
    pub patient: PatientId,
    /// Recipient blood group.
    pub blood_group: BloodGroup,
    /// Number of units needed.
    pub quantity: u32,
    /// Clinical urgency.
    pub priority: RequestPriority,
    /// Latest clinically acceptable date.
    pub required_by: NaiveDate,
}

/// Lifecycle status of an inter-location transfer.
///
/// State machine:
/// ```text
/// [REQUESTED] ──dispatch──→ [IN_TRANSIT] ──complete──→ [COMPLETED]  (terminal)
///      │    \______________________│
///      │           complete        └──cancel/abort──→ [CANCELLED]   (terminal)
///      └──────────cancel─────────────────────────────→ [CANCELLED]
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferStatus {
    /// Admitted; units are locked against other transfers.
    #[default]
    Requested,
    /// Physically on the move between sites.
    InTransit,
    /// All units relocated to the destination. Terminal.
    Completed,
    /// Abandoned or aborted; no unit changed location. Terminal.
    Cancelled,
}

impl TransferStatus {
    /// Check if a status change is an edge of the lifecycle graph.
    pub fn can_transition_to(self, next: TransferStatus) -> bool {
        matches!(
            (self, next),
            (Self::Requested, Self::InTransit)
                | (Self::Requested, Self::Completed)
                | (Self::Requested, Self::Cancelled)
                | (Self::InTransit, Self::Completed)
                | (Self::InTransit, Self::Cancelled)
        )
    }

    /// Check if the status admits no further changes.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// A coordinated move of a set of units between two storage sites.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Unique identifier.
    pub id: TransferId,
    /// Origin site. All units sat here when the transfer was admitted.
    pub from: StorageLocation,
    /// Destination site. Differs from `from`.
    pub to: StorageLocation,
    /// Units being moved. Non-empty, duplicate-free.
    pub unit_ids: Vec<UnitId>,
    /// Lifecycle status.
    pub status: TransferStatus,
    /// Staff member who requested the move.
    pub requested_by: StaffId,
    /// Staff member who approved dispatch, once dispatched.
    pub approved_by: Option<StaffId>,
    /// When the transfer was admitted.
    pub requested_at: DateTime<Utc>,
    /// When the transfer left the origin, once dispatched.
    pub dispatched_at: Option<DateTime<Utc>>,
    /// When the transfer reached a terminal status.
    pub closed_at: Option<DateTime<Utc>>,
}

/// Inventory policy knobs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Shelf life applied at registration, in days. The derived expiry date
    /// is stored on the unit and survives later changes to this value.
    pub shelf_life_days: u32,
    /// Default horizon for "expiring soon" reporting, in days.
    pub expiring_soon_days: u32,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            shelf_life_days: 35,
            expiring_soon_days: 7,
        }
    }
}

impl InventoryConfig {
    /// Short shelf life so expiry paths are easy to exercise in tests.
    pub fn for_testing() -> Self {
        Self {
            shelf_life_days: 5,
            expiring_soon_days: 2,
        }
    }

    /// The expiry date a unit donated on `donation_date` gets under this
    /// policy.
    pub fn expiry_for(&self, donation_date: NaiveDate) -> NaiveDate {
        donation_date + Duration::days(i64::from(self.shelf_life_days))
    }
}
