//! # Shared Types Crate
//!
//! Domain vocabulary shared between the inventory core and the surrounding
//! application crates (donor records, ordering UIs, reporting).
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: blood groups, identifiers, and storage
//!   locations are defined here and nowhere else.
//! - **Values, not records**: this crate holds immutable vocabulary only.
//!   Stateful entities (units, requests, transfers) live in the subsystem
//!   that owns them.

pub mod blood_group;
pub mod ids;
pub mod location;

pub use blood_group::{BloodGroup, ParseBloodGroupError, Rh};
pub use ids::{DonorId, PatientId, RequestId, StaffId, TransferId, UnitId};
pub use location::StorageLocation;
