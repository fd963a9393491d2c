//! # Hemobank Test Suite
//!
//! Unified test crate containing cross-component scenarios.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── support.rs        # Service fixtures on a manual clock
//! └── integration/      # Cross-component choreography
//!     ├── lifecycle.rs    # intake → reserve → use, expiry, corrections
//!     ├── transfers.rs    # admission, atomic completion, aborts
//!     ├── fulfillment.rs  # compatibility + FEFO issuance scenarios
//!     └── properties.rs   # conservation, idempotence, races
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p hb-tests
//!
//! # By category
//! cargo test -p hb-tests integration::transfers::
//! cargo test -p hb-tests integration::properties::
//! ```

#![allow(dead_code)]

pub mod integration;
