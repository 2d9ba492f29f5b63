//! # Alert Deduplicator
//!
//! Remembers which (asset, urgency tier) pairs have already triggered a
//! notification, so each qualifying transition alerts exactly once.
//!
//! ## Reset semantics
//!
//! Each record stores the due date it was alerted for. When a renewal is
//! filed and the renewal date advances, every tier's stored due date goes
//! stale at once, so all tiers for that asset implicitly reset and future
//! cycles can alert again. Tiers usually arrive monotonically
//! (90 → 60 → 30 → overdue) but nothing here assumes that: only tiers the
//! evaluator actually computed are ever marked, and skipped tiers are
//! never synthesized.
//!
//! ## Commit discipline
//!
//! [`AlertState::mark_alerted`] is called by the batch only after the
//! dispatch sink reported success, and the state is persisted only after
//! the dispatch loop — an obligation is never marked "sent" before it was.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use tmark_core::{AssetId, CalendarDate, Timestamp};

use crate::obligation::{Obligation, UrgencyTier};

/// Composite key for one asset at one urgency tier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlertKey {
    /// The alerted asset.
    pub asset_id: AssetId,
    /// The tier the alert fired at.
    pub tier: UrgencyTier,
}

impl AlertKey {
    /// The key for an obligation.
    pub fn of(obligation: &Obligation) -> Self {
        Self {
            asset_id: obligation.asset_id.clone(),
            tier: obligation.tier,
        }
    }
}

/// Persisted marker for one fired alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecord {
    /// The due date the alert was fired for. A different due date on the
    /// same key means the deadline moved and the alert is due again.
    pub due_date: CalendarDate,
    /// When the alert was dispatched.
    pub alerted_at: Timestamp,
}

/// The full set of fired-alert markers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertState {
    records: HashMap<AlertKey, AlertRecord>,
}

impl AlertState {
    /// An empty state (no alerts ever fired).
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted entries.
    pub fn from_records(records: impl IntoIterator<Item = (AlertKey, AlertRecord)>) -> Self {
        Self {
            records: records.into_iter().collect(),
        }
    }

    /// Whether this obligation is worth dispatching: no record exists for
    /// its (asset, tier), or the recorded due date differs from the
    /// obligation's (the renewal date has advanced since the alert fired).
    pub fn is_new(&self, obligation: &Obligation) -> bool {
        match self.records.get(&AlertKey::of(obligation)) {
            None => true,
            Some(record) => record.due_date != obligation.due_date,
        }
    }

    /// Keep only the obligations worth dispatching, preserving order.
    pub fn filter_new<'a>(&self, obligations: &'a [Obligation]) -> Vec<&'a Obligation> {
        obligations.iter().filter(|ob| self.is_new(ob)).collect()
    }

    /// Record that an obligation's alert was successfully dispatched.
    ///
    /// Call only after the sink confirmed the send; a failed dispatch must
    /// leave the state untouched so the next cycle retries.
    pub fn mark_alerted(&mut self, obligation: &Obligation, now: Timestamp) {
        self.records.insert(
            AlertKey::of(obligation),
            AlertRecord {
                due_date: obligation.due_date,
                alerted_at: now,
            },
        );
    }

    /// Number of stored markers.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no alert has ever been marked.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records for persistence.
    pub fn records(&self) -> impl Iterator<Item = (&AlertKey, &AlertRecord)> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obligation::ObligationKind;
    use tmark_core::Money;

    fn now() -> Timestamp {
        Timestamp::parse("2026-08-30T06:00:00Z").unwrap()
    }

    fn obligation(id: &str, tier: UrgencyTier, due: &str) -> Obligation {
        Obligation {
            asset_id: AssetId::new(id).unwrap(),
            kind: ObligationKind::RenewalDue,
            tier,
            due_date: CalendarDate::parse(due).unwrap(),
            days_remaining: 29,
            cost: Money::from_dollars(3900),
        }
    }

    #[test]
    fn unseen_obligation_is_new() {
        let state = AlertState::new();
        assert!(state.is_new(&obligation("AZ-TM", UrgencyTier::Within30, "2026-09-28")));
    }

    #[test]
    fn marked_obligation_is_not_new() {
        let ob = obligation("AZ-TM", UrgencyTier::Within30, "2026-09-28");
        let mut state = AlertState::new();
        state.mark_alerted(&ob, now());
        assert!(!state.is_new(&ob));
    }

    #[test]
    fn filter_new_is_idempotent() {
        let obligations = vec![obligation("AZ-TM", UrgencyTier::Within30, "2026-09-28")];
        let mut state = AlertState::new();

        let first = state.filter_new(&obligations);
        assert_eq!(first.len(), 1);
        state.mark_alerted(first[0], now());

        // Second pass with unchanged state yields nothing.
        let second = state.filter_new(&obligations);
        assert!(second.is_empty());
    }

    #[test]
    fn different_tier_same_asset_is_new() {
        let at_60 = obligation("AZ-TM", UrgencyTier::Within60, "2026-09-28");
        let at_30 = obligation("AZ-TM", UrgencyTier::Within30, "2026-09-28");
        let mut state = AlertState::new();
        state.mark_alerted(&at_60, now());
        assert!(state.is_new(&at_30));
    }

    #[test]
    fn advanced_due_date_resets_the_tier() {
        let before = obligation("AZ-TM", UrgencyTier::Within30, "2026-09-28");
        let mut state = AlertState::new();
        state.mark_alerted(&before, now());

        // Renewal filed; the same tier with a new due date alerts again.
        let after = obligation("AZ-TM", UrgencyTier::Within30, "2036-09-28");
        assert!(state.is_new(&after));
    }

    #[test]
    fn skipped_tiers_are_never_synthesized() {
        // First evaluation ever lands at 29 days: only tier 30 is marked.
        let ob = obligation("AZ-TM", UrgencyTier::Within30, "2026-09-28");
        let mut state = AlertState::new();
        state.mark_alerted(&ob, now());
        assert_eq!(state.len(), 1);
        let (key, _) = state.records().next().unwrap();
        assert_eq!(key.tier, UrgencyTier::Within30);
    }

    #[test]
    fn filter_preserves_order() {
        let obligations = vec![
            obligation("A-TM", UrgencyTier::Overdue, "2026-08-01"),
            obligation("B-TM", UrgencyTier::Within30, "2026-09-10"),
            obligation("C-TM", UrgencyTier::Within60, "2026-10-15"),
        ];
        let mut state = AlertState::new();
        state.mark_alerted(&obligations[1], now());

        let new: Vec<_> = state
            .filter_new(&obligations)
            .into_iter()
            .map(|ob| ob.asset_id.as_str().to_string())
            .collect();
        assert_eq!(new, vec!["A-TM", "C-TM"]);
    }

    #[test]
    fn from_records_roundtrip() {
        let ob = obligation("AZ-TM", UrgencyTier::Within30, "2026-09-28");
        let mut state = AlertState::new();
        state.mark_alerted(&ob, now());

        let restored =
            AlertState::from_records(state.records().map(|(k, r)| (k.clone(), *r)));
        assert_eq!(restored, state);
        assert!(!restored.is_new(&ob));
    }
}
