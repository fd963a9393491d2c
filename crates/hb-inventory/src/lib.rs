//! # Blood Bank Inventory Subsystem
//!
//! Tracks individual units of donated blood through their lifecycle,
//! resolves ABO/Rh compatibility for transfusion requests, and coordinates
//! atomic multi-unit moves between storage sites.
//!
//! ## Unit Lifecycle
//!
//! ```text
//! [AVAILABLE] ⇄ [RESERVED] ──use──→ [USED]     (terminal)
//!      │   \__________use_________→ [USED]
//!      └────────expiry sweep─────→ [EXPIRED]   (terminal)
//! ```
//!
//! Every status or location change presents the `version` the caller last
//! read; a mismatch returns `VersionConflict` and the caller re-reads and
//! retries. No operation blocks and no background thread exists; the host
//! drives the expiry sweep from its own timer.
//!
//! ## Multi-Unit Operations
//!
//! Transfer completion and request fulfillment follow the same two-phase
//! shape: validate every unit against live state, then apply, and on any
//! failure undo everything the call did. Inventory never observes a
//! half-moved transfer or a half-filled request.
//!
//! ## Module Structure
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  service/ - BloodBankService: RwLock facade over the domain    │
//! └────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - BloodBankApi trait                        │
//! │  ports/outbound.rs - TimeSource, DonorDirectory traits         │
//! └────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌────────────────────────────────────────────────────────────────┐
//! │  domain/store.rs         - BloodUnitStore (versioned units)    │
//! │  domain/compatibility.rs - ABO/Rh donor table                  │
//! │  domain/expiry.rs        - sweeps and age reports              │
//! │  domain/transfer.rs      - TransferCoordinator                 │
//! │  domain/fulfillment.rs   - RequestLedger, FEFO issuance        │
//! │  domain/summary.rs       - derived stock summaries             │
//! └────────────────────────────────────────────────────────────────┘
//! ```

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::*;
pub use service::BloodBankService;
