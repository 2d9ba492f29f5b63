//! # Obligations and Urgency Tiers
//!
//! An [`Obligation`] is a derived, time-bound action item for one asset at
//! evaluation time. Obligations are recomputed fresh on every pass and
//! never persisted — only the deduplicator remembers which ones have
//! already been alerted.
//!
//! ## Tier boundaries
//!
//! Boundary days belong to the tighter, more urgent tier: exactly 30 days
//! remaining is tier 30, exactly 60 is tier 60, exactly 90 is tier 90.
//! Past 90 days the asset is not yet actionable and no obligation exists.

use serde::{Deserialize, Serialize};

use tmark_core::{AssetId, CalendarDate, Money};

// ─── Urgency tier ────────────────────────────────────────────────────

/// Coarse urgency bucket controlling alert cadence.
///
/// Ordered most urgent first, so `Overdue < Within30 < Within60 < Within90`
/// and sorting ascending puts the most time-critical tier first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyTier {
    /// The due date has passed.
    Overdue,
    /// Due within 30 days (inclusive).
    Within30,
    /// Due within 31-60 days (inclusive upper bound).
    Within60,
    /// Due within 61-90 days (inclusive upper bound).
    Within90,
}

impl UrgencyTier {
    /// Classify a signed days-remaining value.
    ///
    /// Returns `None` above 90 days: the asset is not yet actionable.
    pub fn from_days_remaining(days: i64) -> Option<Self> {
        match days {
            d if d < 0 => Some(Self::Overdue),
            0..=30 => Some(Self::Within30),
            31..=60 => Some(Self::Within60),
            61..=90 => Some(Self::Within90),
            _ => None,
        }
    }

    /// Stable short name used in idempotency keys and persisted records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::Within30 => "30",
            Self::Within60 => "60",
            Self::Within90 => "90",
        }
    }

}

impl std::fmt::Display for UrgencyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Kind ────────────────────────────────────────────────────────────

/// What kind of action an obligation calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObligationKind {
    /// A renewal filing is coming due.
    RenewalDue,
    /// The renewal deadline has already passed.
    Overdue,
    /// The asset has never been filed in its jurisdiction.
    Unfiled,
}

impl ObligationKind {
    /// Stable snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RenewalDue => "renewal_due",
            Self::Overdue => "overdue",
            Self::Unfiled => "unfiled",
        }
    }
}

impl std::fmt::Display for ObligationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Obligation ──────────────────────────────────────────────────────

/// One pending action for one asset at evaluation time.
///
/// Derived from asset state and the reference date; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obligation {
    /// The asset this obligation belongs to.
    pub asset_id: AssetId,
    /// What action is called for.
    pub kind: ObligationKind,
    /// Urgency bucket.
    pub tier: UrgencyTier,
    /// The date action is due.
    pub due_date: CalendarDate,
    /// Signed days until the due date; negative means overdue.
    pub days_remaining: i64,
    /// The asset's filing/renewal fee, carried for budget forecasting.
    pub cost: Money,
}

impl Obligation {
    /// Deterministic key identifying this obligation for external systems:
    /// `{asset_id}_{tier}_{due_date}`.
    ///
    /// Retried dispatch attempts produce the same key, so the external
    /// side is safe to repeat; a renewal-date change produces a new key.
    pub fn idempotency_key(&self) -> String {
        format!("{}_{}_{}", self.asset_id, self.tier, self.due_date)
    }

    /// Ordering key: most urgent first, ties broken by asset id.
    fn sort_key(&self) -> (i64, &AssetId) {
        (self.days_remaining, &self.asset_id)
    }
}

impl PartialOrd for Obligation {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Obligation {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}
