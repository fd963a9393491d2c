//! Inventory error types.
//!
//! Every fallible operation in the subsystem returns one of these variants;
//! nothing is thrown, and nothing is partially applied when a variant is
//! returned from an admission check.

use chrono::NaiveDate;
use shared_types::{DonorId, RequestId, StorageLocation, TransferId, UnitId};
use thiserror::Error;

use super::entities::{RequestStatus, TransferStatus, UnitStatus};

/// Inventory error type.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    /// Unknown unit id. Surfaced to the caller, never retried internally.
    #[error("unit not found: {0}")]
    UnitNotFound(UnitId),

    /// Unknown transfer id.
    #[error("transfer not found: {0}")]
    TransferNotFound(TransferId),

    /// Unknown request id.
    #[error("request not found: {0}")]
    RequestNotFound(RequestId),

    /// Donor id rejected by the donor directory at registration.
    #[error("unknown donor: {0}")]
    UnknownDonor(DonorId),

    /// The caller's view of the unit is stale: another mutation landed
    /// between its read and this write. Recoverable by re-read and retry.
    #[error("version conflict on unit {unit}: expected {expected}, actual {actual}")]
    VersionConflict {
        /// Unit the write was aimed at.
        unit: UnitId,
        /// Version the caller presented.
        expected: u64,
        /// Version currently stored.
        actual: u64,
    },

    /// Attempted status change that is not an edge of the lifecycle graph.
    #[error("illegal transition on unit {unit}: {from:?} -> {to:?}")]
    IllegalTransition {
        /// Unit the change was aimed at.
        unit: UnitId,
        /// Status at the time of the attempt.
        from: UnitStatus,
        /// Status the caller asked for.
        to: UnitStatus,
    },

    /// Operation requires an Available unit (relocation, transfer admission).
    #[error("unit {unit} is not available (status {status:?})")]
    UnitNotAvailable {
        /// Unit in question.
        unit: UnitId,
        /// Its actual status.
        status: UnitStatus,
    },

    /// Registration with a non-positive collected volume.
    #[error("invalid collected volume: {volume_ml} ml")]
    InvalidVolume {
        /// The rejected volume.
        volume_ml: u32,
    },

    /// Registration with a donation date after the current date.
    #[error("donation date {donation_date} is after today ({today})")]
    FutureDonationDate {
        /// The rejected donation date.
        donation_date: NaiveDate,
        /// Current date at the time of the attempt.
        today: NaiveDate,
    },

    /// Registration of a unit whose derived expiry is not in the future.
    #[error("unit would already be expired: {expiry} is not after {today}")]
    AlreadyExpired {
        /// Derived expiry date.
        expiry: NaiveDate,
        /// Current date at the time of the attempt.
        today: NaiveDate,
    },

    /// Transfer with identical origin and destination.
    #[error("transfer origin and destination are both {0}")]
    SameLocation(StorageLocation),

    /// Transfer admission with an empty unit list.
    #[error("transfer contains no units")]
    EmptyTransfer,

    /// Transfer admission listing the same unit twice.
    #[error("unit {0} listed more than once in transfer")]
    DuplicateTransferUnit(UnitId),

    /// Unit already locked by another open transfer.
    #[error("unit {unit} is already referenced by transfer {transfer}")]
    UnitAlreadyInTransfer {
        /// The contended unit.
        unit: UnitId,
        /// The transfer currently holding it.
        transfer: TransferId,
    },

    /// Unit is not stored at the transfer's origin.
    #[error("unit {unit} is at {actual}, not at {expected}")]
    UnitLocationMismatch {
        /// The misplaced unit.
        unit: UnitId,
        /// The transfer's origin.
        expected: StorageLocation,
        /// Where the unit actually is.
        actual: StorageLocation,
    },

    /// Transfer operation on an already Completed/Cancelled transfer.
    #[error("transfer {transfer} is already terminal ({status:?})")]
    TransferAlreadyTerminal {
        /// Transfer in question.
        transfer: TransferId,
        /// Its terminal status.
        status: TransferStatus,
    },

    /// Attempted transfer status change that is not an edge of its graph.
    #[error("illegal transition on transfer {transfer}: {from:?} -> {to:?}")]
    IllegalTransferTransition {
        /// Transfer in question.
        transfer: TransferId,
        /// Status at the time of the attempt.
        from: TransferStatus,
        /// Status the caller asked for.
        to: TransferStatus,
    },

    /// Completion aborted because a unit changed underneath the transfer.
    /// The transfer is Cancelled and no unit changed location.
    #[error("transfer {transfer} aborted: unit {unit} changed since admission")]
    TransferAborted {
        /// The cancelled transfer.
        transfer: TransferId,
        /// The unit whose re-validation failed.
        unit: UnitId,
    },

    /// Request with a zero quantity.
    #[error("request quantity must be positive")]
    EmptyRequest,

    /// Fulfillment or cancellation of a request that is no longer pending.
    #[error("request {request} is not pending (status {status:?})")]
    RequestNotPending {
        /// Request in question.
        request: RequestId,
        /// Its actual status.
        status: RequestStatus,
    },
}
