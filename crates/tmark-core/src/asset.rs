//! # Asset Records
//!
//! One [`Asset`] per tracked trademark registration, carrying the
//! jurisdiction-specific filing and renewal dates that the deadline
//! engine evaluates.
//!
//! ## Mutation discipline
//!
//! Status, renewal date, and cost are only changed through methods that
//! append an audit entry in the same call. Mutation and audit entry are
//! committed together or not at all — a method that rejects its input
//! leaves both untouched.

use serde::{Deserialize, Serialize};

use crate::audit::{AuditAction, AuditEntry, AuditLog};
use crate::error::ValidationError;
use crate::identity::{AssetId, Jurisdiction};
use crate::money::Money;
use crate::temporal::{CalendarDate, Timestamp};

// ─── Status ──────────────────────────────────────────────────────────

/// The tracked state of a trademark registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    /// Registered and in good standing; renewal dates drive obligations.
    Active,
    /// Not yet filed in its jurisdiction; filing itself is the obligation.
    NeedsFiling,
    /// A renewal deadline has passed without a recorded filing.
    Overdue,
    /// Deliberately let go; generates no obligations.
    Abandoned,
}

impl AssetStatus {
    /// Canonical lowercase name, matching the persisted representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::NeedsFiling => "needs_filing",
            Self::Overdue => "overdue",
            Self::Abandoned => "abandoned",
        }
    }

    /// Whether this status requires a renewal date to be present.
    pub fn requires_renewal_date(&self) -> bool {
        !matches!(self, Self::NeedsFiling)
    }
}

impl std::fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Active => "ACTIVE",
            Self::NeedsFiling => "NEEDS_FILING",
            Self::Overdue => "OVERDUE",
            Self::Abandoned => "ABANDONED",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for AssetStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "needs_filing" | "needs-filing" => Ok(Self::NeedsFiling),
            "overdue" => Ok(Self::Overdue),
            "abandoned" => Ok(Self::Abandoned),
            other => Err(ValidationError::InvalidStatus(other.to_string())),
        }
    }
}

// ─── Asset ───────────────────────────────────────────────────────────

/// One tracked trademark registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Stable unique identifier, immutable after creation.
    pub id: AssetId,
    /// Display name of the mark.
    pub name: String,
    /// Filing scope (state, federal, or foreign office).
    pub jurisdiction: Jurisdiction,
    /// When the mark was filed; absent while status is `needs_filing`.
    pub filing_date: Option<CalendarDate>,
    /// The next date action is due; advanced each time a renewal is filed.
    /// For `needs_filing` assets it doubles as the filing target, if known.
    pub renewal_date: Option<CalendarDate>,
    /// Current tracked status.
    pub status: AssetStatus,
    /// Filing/renewal fee for this asset.
    pub cost: Money,
    /// Registry-assigned registration number, once granted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    /// Ordered, append-only mutation history.
    #[serde(default)]
    pub audit_log: AuditLog,
}

impl Asset {
    /// Create a new asset, writing the initial audit entry.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: AssetId,
        name: impl Into<String>,
        jurisdiction: Jurisdiction,
        filing_date: Option<CalendarDate>,
        renewal_date: Option<CalendarDate>,
        status: AssetStatus,
        cost: Money,
        actor: &str,
    ) -> Self {
        let name = name.into();
        let mut asset = Self {
            id,
            name,
            jurisdiction,
            filing_date,
            renewal_date,
            status,
            cost,
            registration_number: None,
            audit_log: AuditLog::new(),
        };
        asset.record(
            actor,
            AuditAction::Created,
            format!("created with status {status}"),
        );
        asset
    }

    /// Record a successful renewal filing, advancing `renewal_date`.
    ///
    /// The next renewal date must be strictly after the current one (when
    /// one is set) — a renewal never moves a deadline backwards. Sets the
    /// status back to `active` when it was `overdue`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::NonForwardRenewal`] when `next` does not advance
    /// past the current renewal date. Nothing is mutated on error.
    pub fn record_renewal(
        &mut self,
        next: CalendarDate,
        actor: &str,
    ) -> Result<(), ValidationError> {
        if let Some(current) = self.renewal_date {
            if next <= current {
                return Err(ValidationError::NonForwardRenewal {
                    asset_id: self.id.to_string(),
                    current: current.to_string(),
                    next: next.to_string(),
                });
            }
        }
        let previous = self
            .renewal_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "none".to_string());
        self.renewal_date = Some(next);
        if self.status == AssetStatus::Overdue {
            self.status = AssetStatus::Active;
        }
        self.record(
            actor,
            AuditAction::RenewalRecorded,
            format!("renewal date {previous} -> {next}"),
        );
        Ok(())
    }

    /// Mark an unfiled asset as filed, setting both dates.
    ///
    /// # Errors
    ///
    /// [`ValidationError::RenewalBeforeFiling`] when the renewal date
    /// precedes the filing date.
    pub fn mark_filed(
        &mut self,
        filing_date: CalendarDate,
        renewal_date: CalendarDate,
        actor: &str,
    ) -> Result<(), ValidationError> {
        if renewal_date < filing_date {
            return Err(ValidationError::RenewalBeforeFiling {
                asset_id: self.id.to_string(),
                filing_date: filing_date.to_string(),
                renewal_date: renewal_date.to_string(),
            });
        }
        self.filing_date = Some(filing_date);
        self.renewal_date = Some(renewal_date);
        self.status = AssetStatus::Active;
        self.record(
            actor,
            AuditAction::Filed,
            format!("filed {filing_date}, next renewal {renewal_date}"),
        );
        Ok(())
    }

    /// Manually change the status.
    pub fn set_status(&mut self, status: AssetStatus, actor: &str) {
        let previous = self.status;
        self.status = status;
        self.record(
            actor,
            AuditAction::StatusChanged,
            format!("{previous} -> {status}"),
        );
    }

    /// Change the filing/renewal fee.
    pub fn set_cost(&mut self, cost: Money, actor: &str) {
        let previous = self.cost;
        self.cost = cost;
        self.record(
            actor,
            AuditAction::CostChanged,
            format!("{previous} -> {cost}"),
        );
    }

    /// Check structural date consistency.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::MissingRenewalDate`] when the status requires a
    ///   renewal date and none is set.
    /// - [`ValidationError::RenewalBeforeFiling`] when both dates are set
    ///   and the renewal precedes the filing.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.status.requires_renewal_date() && self.renewal_date.is_none() {
            return Err(ValidationError::MissingRenewalDate {
                asset_id: self.id.to_string(),
                status: self.status.to_string(),
            });
        }
        if let (Some(filing), Some(renewal)) = (self.filing_date, self.renewal_date) {
            if renewal < filing {
                return Err(ValidationError::RenewalBeforeFiling {
                    asset_id: self.id.to_string(),
                    filing_date: filing.to_string(),
                    renewal_date: renewal.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Append one audit entry for a mutation that just happened.
    fn record(&mut self, actor: &str, action: AuditAction, detail: String) {
        self.audit_log.append(AuditEntry {
            timestamp: Timestamp::now(),
            actor: actor.to_string(),
            action,
            detail,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        CalendarDate::parse(s).unwrap()
    }

    fn make_active() -> Asset {
        Asset::new(
            AssetId::new("AZ-TM").unwrap(),
            "DR. GREENTHUMB",
            Jurisdiction::new("Arizona").unwrap(),
            Some(date("2025-11-15")),
            Some(date("2035-11-15")),
            AssetStatus::Active,
            Money::from_dollars(3900),
            "test-operator",
        )
    }

    // ── Creation ─────────────────────────────────────────────────────

    #[test]
    fn new_asset_writes_created_entry() {
        let asset = make_active();
        assert_eq!(asset.audit_log.len(), 1);
        assert_eq!(asset.audit_log.last().unwrap().action, AuditAction::Created);
        assert!(asset.validate().is_ok());
    }

    // ── Renewal ──────────────────────────────────────────────────────

    #[test]
    fn record_renewal_advances_date_and_audits() {
        let mut asset = make_active();
        asset
            .record_renewal(date("2045-11-15"), "test-operator")
            .unwrap();
        assert_eq!(asset.renewal_date, Some(date("2045-11-15")));
        assert_eq!(asset.audit_log.len(), 2);
        assert_eq!(
            asset.audit_log.last().unwrap().action,
            AuditAction::RenewalRecorded
        );
    }

    #[test]
    fn record_renewal_rejects_backward_date_without_mutation() {
        let mut asset = make_active();
        let before = asset.clone();
        let result = asset.record_renewal(date("2030-01-01"), "test-operator");
        assert!(result.is_err());
        // Rejected input mutates nothing, including the audit log.
        assert_eq!(asset, before);
    }

    #[test]
    fn record_renewal_rejects_same_date() {
        let mut asset = make_active();
        assert!(asset
            .record_renewal(date("2035-11-15"), "test-operator")
            .is_err());
    }

    #[test]
    fn record_renewal_clears_overdue_status() {
        let mut asset = make_active();
        asset.set_status(AssetStatus::Overdue, "test-operator");
        asset
            .record_renewal(date("2045-11-15"), "test-operator")
            .unwrap();
        assert_eq!(asset.status, AssetStatus::Active);
    }

    #[test]
    fn record_renewal_on_unfiled_target() {
        let mut asset = Asset::new(
            AssetId::new("NM-TM").unwrap(),
            "DR. GREENTHUMB",
            Jurisdiction::new("New Mexico").unwrap(),
            None,
            None,
            AssetStatus::NeedsFiling,
            Money::from_dollars(3900),
            "test-operator",
        );
        asset
            .record_renewal(date("2027-01-01"), "test-operator")
            .unwrap();
        assert_eq!(asset.renewal_date, Some(date("2027-01-01")));
    }

    // ── Filing ───────────────────────────────────────────────────────

    #[test]
    fn mark_filed_sets_dates_and_status() {
        let mut asset = Asset::new(
            AssetId::new("NM-TM").unwrap(),
            "DR. GREENTHUMB",
            Jurisdiction::new("New Mexico").unwrap(),
            None,
            None,
            AssetStatus::NeedsFiling,
            Money::from_dollars(3900),
            "test-operator",
        );
        asset
            .mark_filed(date("2026-09-01"), date("2036-09-01"), "test-operator")
            .unwrap();
        assert_eq!(asset.status, AssetStatus::Active);
        assert_eq!(asset.filing_date, Some(date("2026-09-01")));
        assert_eq!(asset.audit_log.last().unwrap().action, AuditAction::Filed);
    }

    #[test]
    fn mark_filed_rejects_renewal_before_filing() {
        let mut asset = make_active();
        assert!(asset
            .mark_filed(date("2026-09-01"), date("2026-08-01"), "test-operator")
            .is_err());
    }

    // ── Status and cost ──────────────────────────────────────────────

    #[test]
    fn set_status_appends_exactly_one_entry() {
        let mut asset = make_active();
        let before = asset.audit_log.len();
        asset.set_status(AssetStatus::Abandoned, "test-operator");
        assert_eq!(asset.audit_log.len(), before + 1);
        assert!(asset
            .audit_log
            .last()
            .unwrap()
            .detail
            .contains("ACTIVE -> ABANDONED"));
    }

    #[test]
    fn set_cost_appends_exactly_one_entry() {
        let mut asset = make_active();
        asset.set_cost(Money::from_dollars(4100), "test-operator");
        assert_eq!(asset.cost, Money::from_dollars(4100));
        assert_eq!(
            asset.audit_log.last().unwrap().action,
            AuditAction::CostChanged
        );
    }

    // ── Validation ───────────────────────────────────────────────────

    #[test]
    fn validate_requires_renewal_date_for_active() {
        let mut asset = make_active();
        asset.renewal_date = None;
        assert!(matches!(
            asset.validate(),
            Err(ValidationError::MissingRenewalDate { .. })
        ));
    }

    #[test]
    fn validate_allows_missing_renewal_for_needs_filing() {
        let asset = Asset::new(
            AssetId::new("NM-TM").unwrap(),
            "DR. GREENTHUMB",
            Jurisdiction::new("New Mexico").unwrap(),
            None,
            None,
            AssetStatus::NeedsFiling,
            Money::from_dollars(3900),
            "test-operator",
        );
        assert!(asset.validate().is_ok());
    }

    #[test]
    fn validate_rejects_renewal_before_filing() {
        let mut asset = make_active();
        asset.renewal_date = Some(date("2020-01-01"));
        assert!(matches!(
            asset.validate(),
            Err(ValidationError::RenewalBeforeFiling { .. })
        ));
    }

    // ── Status parsing and display ───────────────────────────────────

    #[test]
    fn status_from_str_roundtrip() {
        for s in ["active", "needs_filing", "overdue", "abandoned"] {
            let status: AssetStatus = s.parse().unwrap();
            assert_eq!(status.as_str(), s);
        }
        assert!("pending".parse::<AssetStatus>().is_err());
    }

    #[test]
    fn status_display_uppercase() {
        assert_eq!(AssetStatus::NeedsFiling.to_string(), "NEEDS_FILING");
    }

    // ── Serialization ────────────────────────────────────────────────

    #[test]
    fn asset_serde_roundtrip() {
        let asset = make_active();
        let json = serde_json::to_string(&asset).unwrap();
        let parsed: Asset = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, asset);
    }

    #[test]
    fn asset_deserializes_without_audit_log_field() {
        let json = r#"{
            "id": "AZ-TM",
            "name": "DR. GREENTHUMB",
            "jurisdiction": "Arizona",
            "filing_date": "2025-11-15",
            "renewal_date": "2035-11-15",
            "status": "active",
            "cost": 390000
        }"#;
        let asset: Asset = serde_json::from_str(json).unwrap();
        assert!(asset.audit_log.is_empty());
        assert_eq!(asset.status, AssetStatus::Active);
    }
}
