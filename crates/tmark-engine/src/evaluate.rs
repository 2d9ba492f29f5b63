//! # Deadline Evaluator
//!
//! Pure function from (registry snapshot, reference date) to an ordered
//! list of [`Obligation`]s. No I/O, no clock reads — `today` is always an
//! explicit parameter so the same snapshot evaluates identically in tests
//! and in production.
//!
//! ## Exclusion, not silence
//!
//! An asset with inconsistent dates is excluded from the obligation output
//! and reported in [`Evaluation::excluded`]; the batch continues for the
//! remaining assets. A stored status that disagrees with the computed
//! urgency is reported as a mismatch finding without excluding the asset
//! and without rewriting the stored status — the dates are authoritative
//! for obligations, the operator resolves the status.

use serde::{Deserialize, Serialize};

use tmark_core::{Asset, AssetStatus, CalendarDate, ValidationError};

use crate::obligation::{Obligation, ObligationKind, UrgencyTier};

/// Tunables for an evaluation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// How far ahead (in days) an unfiled asset's filing target is
    /// actionable. Mirrors the 90-day renewal window by default.
    pub filing_window_days: i64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            filing_window_days: 90,
        }
    }
}

/// An asset excluded from evaluation, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedAsset {
    /// The raw asset identifier (raw because the id itself may be what
    /// failed validation at the store boundary).
    pub asset_id: String,
    /// Why the asset was excluded.
    pub reason: String,
}

impl ExcludedAsset {
    /// Build from a validation error.
    pub fn new(asset_id: impl Into<String>, reason: &ValidationError) -> Self {
        Self {
            asset_id: asset_id.into(),
            reason: reason.to_string(),
        }
    }
}

/// The result of one evaluation pass.
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    /// Obligations sorted most urgent first (ascending days remaining,
    /// ties by asset id).
    pub obligations: Vec<Obligation>,
    /// Assets excluded for inconsistent dates.
    pub excluded: Vec<ExcludedAsset>,
    /// Stored-status/computed-urgency disagreements (non-excluding).
    pub mismatches: Vec<ValidationError>,
}

/// Evaluate the registry against a reference date.
///
/// For each asset:
/// - `abandoned` assets are skipped entirely;
/// - `needs_filing` assets yield an [`ObligationKind::Unfiled`] obligation
///   against their filing target (the stored renewal date), or an
///   immediately-overdue one when no target or filing date exists;
/// - all others yield a renewal obligation when the renewal date is within
///   the 90-day window, overdue when it has passed, nothing when it is
///   further out.
pub fn evaluate(assets: &[Asset], today: CalendarDate, config: &EvaluationConfig) -> Evaluation {
    let mut evaluation = Evaluation::default();

    for asset in assets {
        if asset.status == AssetStatus::Abandoned {
            continue;
        }

        if let Err(reason) = asset.validate() {
            tracing::warn!(asset = %asset.id, %reason, "asset excluded from evaluation");
            evaluation
                .excluded
                .push(ExcludedAsset::new(asset.id.as_str(), &reason));
            continue;
        }

        match asset.status {
            AssetStatus::NeedsFiling => {
                if let Some(obligation) = evaluate_unfiled(asset, today, config) {
                    evaluation.obligations.push(obligation);
                }
            }
            AssetStatus::Active | AssetStatus::Overdue => {
                // validate() guarantees the renewal date is present here.
                let Some(due) = asset.renewal_date else {
                    continue;
                };
                let days = due.days_until(today);
                if let Some(mismatch) = status_mismatch(asset, days) {
                    evaluation.mismatches.push(mismatch);
                }
                let Some(tier) = UrgencyTier::from_days_remaining(days) else {
                    continue;
                };
                let kind = if days < 0 {
                    ObligationKind::Overdue
                } else {
                    ObligationKind::RenewalDue
                };
                evaluation.obligations.push(Obligation {
                    asset_id: asset.id.clone(),
                    kind,
                    tier,
                    due_date: due,
                    days_remaining: days,
                    cost: asset.cost,
                });
            }
            AssetStatus::Abandoned => {}
        }
    }

    evaluation.obligations.sort();
    evaluation
}

/// Obligation for an asset that has never been filed.
///
/// The stored renewal date doubles as the filing target when present and
/// gets the same tier math as renewals, bounded by the configured filing
/// window. With no target and no filing date the asset is already past
/// its expected filing target: unfiled, overdue, due today.
fn evaluate_unfiled(
    asset: &Asset,
    today: CalendarDate,
    config: &EvaluationConfig,
) -> Option<Obligation> {
    match asset.renewal_date {
        Some(target) => {
            let days = target.days_until(today);
            if days > config.filing_window_days {
                return None;
            }
            let tier = UrgencyTier::from_days_remaining(days)?;
            Some(Obligation {
                asset_id: asset.id.clone(),
                kind: ObligationKind::Unfiled,
                tier,
                due_date: target,
                days_remaining: days,
                cost: asset.cost,
            })
        }
        None if asset.filing_date.is_none() => Some(Obligation {
            asset_id: asset.id.clone(),
            kind: ObligationKind::Unfiled,
            tier: UrgencyTier::Overdue,
            due_date: today,
            days_remaining: 0,
            cost: asset.cost,
        }),
        None => None,
    }
}

/// Detect a stored status that disagrees with the computed urgency.
fn status_mismatch(asset: &Asset, days_remaining: i64) -> Option<ValidationError> {
    let expected = if days_remaining < 0 {
        AssetStatus::Overdue
    } else {
        AssetStatus::Active
    };
    if asset.status == expected {
        return None;
    }
    Some(ValidationError::StatusMismatch {
        asset_id: asset.id.to_string(),
        stored: asset.status.to_string(),
        expected: expected.to_string(),
    })
}
