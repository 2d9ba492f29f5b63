//! # Notification Dispatcher
//!
//! Turns new obligations into external actions through a pluggable
//! [`DispatchSink`]. Each action carries a deterministic idempotency key
//! derived from (asset, tier, due date), so a retried dispatch against an
//! external system is safe to repeat.
//!
//! A sink failure is captured per obligation and does not block the rest
//! of the batch; failed obligations are not marked as alerted and come
//! back on the next cycle.

use tmark_core::{Asset, AssetId, DispatchError};

use crate::obligation::{Obligation, ObligationKind, UrgencyTier};

/// One external action ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchAction {
    /// Short human-readable summary (issue title).
    pub title: String,
    /// Full description (issue body).
    pub body: String,
    /// Deterministic key: `{asset_id}_{tier}_{due_date}`.
    pub idempotency_key: String,
}

impl DispatchAction {
    /// Build the action for an obligation. `asset` supplies the display
    /// fields; pass `None` when the asset is not in the lookup (the action
    /// is still well-formed, just terser).
    pub fn build(obligation: &Obligation, asset: Option<&Asset>) -> Self {
        let name = asset.map(|a| a.name.as_str()).unwrap_or("(unknown mark)");
        let jurisdiction = asset
            .map(|a| a.jurisdiction.as_str())
            .unwrap_or("(unknown)");

        let title = match obligation.kind {
            ObligationKind::Overdue => format!(
                "OVERDUE: {} ({}) renewal was due {}",
                name, jurisdiction, obligation.due_date
            ),
            ObligationKind::Unfiled => format!(
                "UNFILED: {} has no registration in {}",
                name, jurisdiction
            ),
            ObligationKind::RenewalDue => format!(
                "Renewal due in {} days: {} ({})",
                obligation.days_remaining, name, jurisdiction
            ),
        };

        let urgency = match obligation.tier {
            UrgencyTier::Overdue => "CRITICAL",
            UrgencyTier::Within30 => "HIGH",
            UrgencyTier::Within60 => "MEDIUM",
            UrgencyTier::Within90 => "LOW",
        };

        let mut body = format!(
            "Trademark: {name}\nJurisdiction: {jurisdiction}\nDue date: {}\nDays remaining: {}\nUrgency: {urgency}\nEstimated cost: {}\n",
            obligation.due_date, obligation.days_remaining, obligation.cost
        );
        if let Some(reg) = asset.and_then(|a| a.registration_number.as_deref()) {
            body.push_str(&format!("Registration #: {reg}\n"));
        }

        Self {
            title,
            body,
            idempotency_key: obligation.idempotency_key(),
        }
    }
}

/// Where actions go: issue trackers, outbox directories, stdout.
///
/// Implementations must be idempotent per `idempotency_key` — creating
/// the same action twice is a success, not a duplicate. Network sinks
/// must bound their wait and surface a timeout as a per-action error.
pub trait DispatchSink {
    /// Emit one action.
    fn create_action(&mut self, action: &DispatchAction) -> Result<(), DispatchError>;

    /// Short sink name for logs.
    fn name(&self) -> &str;
}

/// Outcome of dispatching one obligation.
#[derive(Debug)]
pub struct DispatchResult {
    /// The dispatched obligation.
    pub obligation: Obligation,
    /// Success, or the per-obligation error.
    pub outcome: Result<(), DispatchError>,
}

impl DispatchResult {
    /// Whether the sink confirmed the send.
    pub fn is_sent(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Dispatch every new obligation, continuing past individual failures.
///
/// `assets` supplies display fields for the action bodies, looked up by
/// id. Results come back in input order, one per obligation.
pub fn dispatch_all(
    new_obligations: &[&Obligation],
    assets: &[Asset],
    sink: &mut dyn DispatchSink,
) -> Vec<DispatchResult> {
    let lookup: std::collections::HashMap<&AssetId, &Asset> =
        assets.iter().map(|a| (&a.id, a)).collect();

    new_obligations
        .iter()
        .map(|obligation| {
            let action = DispatchAction::build(obligation, lookup.get(&obligation.asset_id).copied());
            let outcome = sink.create_action(&action);
            match &outcome {
                Ok(()) => {
                    tracing::info!(
                        key = %action.idempotency_key,
                        sink = sink.name(),
                        "dispatched alert"
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        key = %action.idempotency_key,
                        sink = sink.name(),
                        %err,
                        "dispatch failed; will retry next cycle"
                    );
                }
            }
            DispatchResult {
                obligation: (*obligation).clone(),
                outcome,
            }
        })
        .collect()
}
