//! # Alert Cycle — the Daily Batch
//!
//! Wires evaluator, deduplicator, and dispatcher into the single
//! run-to-completion pass a scheduler invokes:
//!
//! load registry (fail-fast) → evaluate → filter already-alerted →
//! dispatch → mark successes → save alert state.
//!
//! ## Ordering guarantees
//!
//! - A registry or alert-store load failure aborts before any dispatch.
//! - An obligation is marked alerted only after its sink call succeeded,
//!   and the updated state is saved after the dispatch loop. A failed
//!   save after successful sends means the next cycle re-dispatches, and
//!   sinks are idempotent by key — at-most-once holds at the external
//!   system either way.
//! - Dispatch failures are collected per obligation and never abort the
//!   remaining sends.

use tmark_core::{CalendarDate, DispatchError, TrackError, Timestamp, ValidationError};

use crate::dispatch::{dispatch_all, DispatchSink};
use crate::evaluate::{evaluate, EvaluationConfig, ExcludedAsset};
use crate::obligation::Obligation;
use crate::store::{AlertStore, RegistryStore};

/// What one alert cycle did, structured for reporting.
#[derive(Debug, Default)]
pub struct CycleOutcome {
    /// Total obligations computed this pass.
    pub evaluated: usize,
    /// Obligations that were new (not deduplicated).
    pub new: usize,
    /// Successfully dispatched alerts.
    pub dispatched: Vec<Obligation>,
    /// Per-obligation dispatch failures; retried next cycle.
    pub failed: Vec<(Obligation, DispatchError)>,
    /// Assets excluded for validation reasons (store rejects + date
    /// inconsistencies), never silently dropped.
    pub excluded: Vec<ExcludedAsset>,
    /// Stored-status mismatches flagged for the operator.
    pub mismatches: Vec<ValidationError>,
}

impl CycleOutcome {
    /// Whether the cycle completed without validation or dispatch problems.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.excluded.is_empty() && self.mismatches.is_empty()
    }
}

/// Run one full alert cycle against the given stores and sink.
///
/// `today` is injected by the caller; nothing in here reads the clock
/// except the `alerted_at` stamp on successfully dispatched records.
///
/// # Errors
///
/// Only persistence failures abort the cycle ([`TrackError::Persistence`]):
/// an unreadable registry or alert store fails fast before any dispatch,
/// and an unwritable alert store fails after (with the dispatched actions
/// protected by their idempotency keys).
pub fn run_alert_cycle(
    registry: &dyn RegistryStore,
    alerts: &dyn AlertStore,
    sink: &mut dyn DispatchSink,
    today: CalendarDate,
    config: &EvaluationConfig,
) -> Result<CycleOutcome, TrackError> {
    // Fail-fast: both stores must load before any external side effect.
    let snapshot = registry.load()?;
    let mut state = alerts.load()?;

    tracing::debug!(
        assets = snapshot.assets.len(),
        rejected = snapshot.rejected.len(),
        known_alerts = state.len(),
        %today,
        "alert cycle starting"
    );

    let evaluation = evaluate(&snapshot.assets, today, config);
    let new_obligations = state.filter_new(&evaluation.obligations);

    let mut outcome = CycleOutcome {
        evaluated: evaluation.obligations.len(),
        new: new_obligations.len(),
        excluded: snapshot
            .rejected
            .into_iter()
            .chain(evaluation.excluded)
            .collect(),
        mismatches: evaluation.mismatches,
        ..CycleOutcome::default()
    };

    let results = dispatch_all(&new_obligations, &snapshot.assets, sink);
    let now = Timestamp::now();
    for result in results {
        match result.outcome {
            Ok(()) => {
                // Mark only after the sink confirmed the send.
                state.mark_alerted(&result.obligation, now);
                outcome.dispatched.push(result.obligation);
            }
            Err(err) => outcome.failed.push((result.obligation, err)),
        }
    }

    alerts.save(&state)?;

    tracing::info!(
        evaluated = outcome.evaluated,
        new = outcome.new,
        dispatched = outcome.dispatched.len(),
        failed = outcome.failed.len(),
        excluded = outcome.excluded.len(),
        "alert cycle finished"
    );
    Ok(outcome)
}
