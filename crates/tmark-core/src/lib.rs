#![deny(missing_docs)]

//! # tmark-core — Foundational Types for the Trademark Tracker
//!
//! Defines the type-system primitives every other crate in the workspace
//! builds on: validated identifiers, pure calendar dates, integer-cents
//! monetary amounts, the asset record with its append-only audit log, and
//! the structured error hierarchy.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `AssetId`, `Jurisdiction`,
//!    `CalendarDate`, `Money` — all newtypes with validated constructors.
//!    No bare strings for identifiers, no floats for amounts.
//!
//! 2. **Calendar dates, not instants.** Deadline arithmetic compares pure
//!    calendar dates. There is no timezone in a renewal deadline, so the
//!    type excludes the ambiguity rather than documenting it away.
//!
//! 3. **Audit log is structurally append-only.** The entry vector is
//!    private; the only mutating operation is `append`. Every mutation of
//!    an asset's status, renewal date, or cost records exactly one entry
//!    in the same call.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tmark-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize` where they are persisted.

pub mod asset;
pub mod audit;
pub mod error;
pub mod identity;
pub mod licensing;
pub mod money;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use asset::{Asset, AssetStatus};
pub use audit::{AuditAction, AuditEntry, AuditLog};
pub use error::{DispatchError, PersistenceError, TrackError, ValidationError};
pub use identity::{AssetId, Jurisdiction};
pub use licensing::{AgreementStatus, LicensingAgreement};
pub use money::Money;
pub use temporal::{CalendarDate, Timestamp};
