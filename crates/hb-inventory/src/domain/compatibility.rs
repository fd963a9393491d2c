//! ABO/Rh donor-compatibility rules.
//!
//! Pure table lookups with no state and no error path: `BloodGroup` is a
//! closed enum, so every input is valid.
//!
//! The clinical rules encoded here: O donates across ABO, A donates to A/AB,
//! B donates to B/AB, AB donates to AB only; Rh-negative donates to either
//! Rh sign of a compatible ABO type, Rh-positive only to Rh-positive. O- is
//! the universal donor and AB+ the universal recipient.

use shared_types::BloodGroup;

/// Donor→recipient compatibility matrix, indexed by [`BloodGroup::index`].
/// `MATRIX[donor][recipient]` is true when the donor group may be transfused
/// into the recipient group.
#[rustfmt::skip]
const MATRIX: [[bool; 8]; 8] = [
    // recipient:  A+     A-     B+     B-     AB+    AB-    O+     O-
    /* A+  */ [ true,  false, false, false, true,  false, false, false ],
    /* A-  */ [ true,  true,  false, false, true,  true,  false, false ],
    /* B+  */ [ false, false, true,  false, true,  false, false, false ],
    /* B-  */ [ false, false, true,  true,  true,  true,  false, false ],
    /* AB+ */ [ false, false, false, false, true,  false, false, false ],
    /* AB- */ [ false, false, false, false, true,  true,  false, false ],
    /* O+  */ [ true,  false, true,  false, true,  false, true,  false ],
    /* O-  */ [ true,  true,  true,  true,  true,  true,  true,  true  ],
];

/// Check whether `donor` blood may be transfused into a `recipient`.
pub fn can_donate_to(donor: BloodGroup, recipient: BloodGroup) -> bool {
    MATRIX[donor.index()][recipient.index()]
}

/// All donor groups acceptable for a recipient, in [`BloodGroup::ALL`] order.
pub fn compatible_donors(recipient: BloodGroup) -> Vec<BloodGroup> {
    BloodGroup::ALL
        .into_iter()
        .filter(|donor| can_donate_to(*donor, recipient))
        .collect()
}

/// All recipient groups a donor group may serve, in [`BloodGroup::ALL`] order.
pub fn compatible_recipients(donor: BloodGroup) -> Vec<BloodGroup> {
    BloodGroup::ALL
        .into_iter()
        .filter(|recipient| can_donate_to(donor, *recipient))
        .collect()
}
