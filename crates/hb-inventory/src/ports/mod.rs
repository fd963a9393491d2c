//! Ports for the inventory subsystem.
//!
//! `inbound` is the driving API the surrounding application calls;
//! `outbound` holds the dependencies the subsystem itself needs (clock,
//! donor directory).

pub mod inbound;
pub mod outbound;

pub use inbound::BloodBankApi;
pub use outbound::{DonorDirectory, OpenDonorDirectory, SystemClock, TimeSource};
