//! # tmark-engine — Deadline Evaluation and Notification Dispatch
//!
//! The temporal core of the tracker. Given a registry snapshot and a
//! reference date, it computes which assets require action, classifies
//! urgency into 90/60/30/overdue tiers, deduplicates repeated alerts, and
//! emits each external side effect at most once per qualifying transition.
//!
//! ## Data Flow
//!
//! ```text
//! RegistryStore ──▶ evaluate() ──▶ AlertState::filter_new() ──▶ dispatch_all()
//!                      │                                            │
//!                      │                            mark_alerted() on success only
//!                      │
//!                      └──▶ Report::build()   (read-only, no dedup)
//! ```
//!
//! ## Determinism
//!
//! Every evaluation takes `today` as an explicit parameter — pure logic
//! never reads the ambient clock. Obligation ordering, idempotency keys,
//! and report contents are fully determined by (snapshot, today, config).
//!
//! ## Crate Policy
//!
//! - No I/O in this crate. Stores and sinks are traits implemented by
//!   `tmark-store` and `tmark-webhook`.
//! - No `unsafe`, no `panic!()` or `.unwrap()` outside tests.

pub mod batch;
pub mod dedup;
pub mod dispatch;
pub mod evaluate;
pub mod obligation;
pub mod report;
pub mod store;
pub mod territory;

// Re-export primary types for ergonomic imports.
pub use batch::{run_alert_cycle, CycleOutcome};
pub use dedup::{AlertKey, AlertRecord, AlertState};
pub use dispatch::{dispatch_all, DispatchAction, DispatchResult, DispatchSink};
pub use evaluate::{evaluate, Evaluation, EvaluationConfig, ExcludedAsset};
pub use obligation::{Obligation, ObligationKind, UrgencyTier};
pub use report::{PortfolioTotals, Report};
pub use store::{AlertStore, RegistrySnapshot, RegistryStore};
pub use territory::{analyze_coverage, TerritoryConflict, TerritoryCoverage};
