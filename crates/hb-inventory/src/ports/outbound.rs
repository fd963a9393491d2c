//! Outbound (driven) ports for the inventory subsystem.
//!
//! These traits define the dependencies the subsystem needs from its host:
//! a clock, and the read-only donor directory owned by the donor-records
//! collaborator.

use chrono::{DateTime, Utc};
use shared_types::DonorId;

/// Time source for consistent timestamp handling.
///
/// Abstracted so tests can drive expiry and audit timestamps
/// deterministically; the subsystem never reads the system clock directly.
pub trait TimeSource: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Default wall-clock time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Read-only lookup into the donor records collaborator.
///
/// Consulted at unit registration; the inventory core never writes donor
/// data.
pub trait DonorDirectory: Send + Sync {
    /// Checks whether a donor id is known.
    fn donor_exists(&self, donor: &DonorId) -> bool;
}

/// Directory that accepts every donor id.
///
/// For deployments where intake tooling has already validated the donor, or
/// where donor records live out of reach of this process.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenDonorDirectory;

impl DonorDirectory for OpenDonorDirectory {
    fn donor_exists(&self, _donor: &DonorId) -> bool {
        true
    }
}

/// Deterministic test doubles for the outbound ports. Shared with the
/// integration test crate.
pub mod testing {
    use super::{DonorDirectory, TimeSource};
    use chrono::{DateTime, Duration, Utc};
    use parking_lot::Mutex;
    use shared_types::DonorId;
    use std::collections::HashSet;

    /// Clock that only moves when told to.
    #[derive(Debug)]
    pub struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        /// Creates a clock pinned at the given instant.
        pub fn at(now: DateTime<Utc>) -> Self {
            Self {
                now: Mutex::new(now),
            }
        }

        /// Advances the clock by whole days.
        pub fn advance_days(&self, days: i64) {
            *self.now.lock() += Duration::days(days);
        }

        /// Moves the clock to an exact instant.
        pub fn set(&self, now: DateTime<Utc>) {
            *self.now.lock() = now;
        }
    }

    impl TimeSource for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock()
        }
    }

    /// Directory backed by an explicit allow-list.
    #[derive(Debug, Default)]
    pub struct KnownDonors {
        donors: HashSet<DonorId>,
    }

    impl KnownDonors {
        /// Creates an empty directory (rejects everyone).
        pub fn new() -> Self {
            Self::default()
        }

        /// Adds a donor to the allow-list.
        pub fn with_donor(mut self, donor: DonorId) -> Self {
            self.donors.insert(donor);
            self
        }
    }

    impl DonorDirectory for KnownDonors {
        fn donor_exists(&self, donor: &DonorId) -> bool {
            self.donors.contains(donor)
        }
    }
}
