//! Identifier newtypes.
//!
//! Each record family gets its own id type so a `DonorId` can never be passed
//! where a `UnitId` is expected. Ids are v4 UUIDs: assigned once, never
//! reused.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a fresh random id.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing UUID (e.g. one read back from storage).
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// The underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_id!(
    /// Identifies one physical blood unit.
    UnitId
);
define_id!(
    /// Identifies a donor record (owned by the donor-records collaborator).
    DonorId
);
define_id!(
    /// Identifies a patient record (owned by the clinical collaborator).
    PatientId
);
define_id!(
    /// Identifies a transfusion request.
    RequestId
);
define_id!(
    /// Identifies an inter-location transfer.
    TransferId
);
define_id!(
    /// Identifies a staff member (owned by the HR collaborator).
    StaffId
);
