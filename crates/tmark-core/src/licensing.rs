//! # Licensing Agreements
//!
//! Records of brand licensing deals, maintained outside the tracker and
//! read in for territory analysis: a territory where a licensee sells
//! under the brand but no active trademark protects it is a coverage
//! gap, and the tracker's job is to surface it.
//!
//! Agreements are read-only here. The tracker never edits the licensing
//! file; it belongs to whoever manages the deals.

use serde::{Deserialize, Serialize};

use crate::identity::Jurisdiction;
use crate::temporal::CalendarDate;

// ─── Status ──────────────────────────────────────────────────────────

/// The lifecycle state of a licensing agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgreementStatus {
    /// Signed and in force; its territories need trademark coverage.
    Active,
    /// Under negotiation; not yet binding for coverage purposes.
    Pending,
    /// No longer in force.
    Terminated,
}

impl std::fmt::Display for AgreementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Active => "ACTIVE",
            Self::Pending => "PENDING",
            Self::Terminated => "TERMINATED",
        };
        f.write_str(s)
    }
}

// ─── Agreement ───────────────────────────────────────────────────────

/// One licensing agreement covering a set of territories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicensingAgreement {
    /// Identifier assigned by the licensing database.
    pub id: u32,
    /// The licensed party.
    pub licensee: String,
    /// The brand being licensed.
    pub brand: String,
    /// Territories the licensee may sell in. Compared case-insensitively
    /// against asset jurisdictions.
    pub territories: Vec<String>,
    /// Lifecycle state; only `active` agreements count for coverage.
    pub status: AgreementStatus,
    /// When the agreement took (or takes) effect.
    pub start_date: CalendarDate,
    /// Royalty terms, free-form (e.g. `"8%"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub royalty_rate: Option<String>,
}

impl LicensingAgreement {
    /// Whether this agreement is currently in force.
    pub fn is_active(&self) -> bool {
        self.status == AgreementStatus::Active
    }

    /// Whether the agreement's territories include the given jurisdiction,
    /// ignoring case.
    pub fn covers(&self, jurisdiction: &Jurisdiction) -> bool {
        self.territories
            .iter()
            .any(|t| t.eq_ignore_ascii_case(jurisdiction.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agreement(territories: &[&str], status: AgreementStatus) -> LicensingAgreement {
        LicensingAgreement {
            id: 1,
            licensee: "Barney's Farm (California)".to_string(),
            brand: "DR. GREENTHUMB".to_string(),
            territories: territories.iter().map(|t| t.to_string()).collect(),
            status,
            start_date: CalendarDate::parse("2024-01-01").unwrap(),
            royalty_rate: Some("8%".to_string()),
        }
    }

    #[test]
    fn covers_is_case_insensitive() {
        let deal = agreement(&["california", "arizona"], AgreementStatus::Active);
        assert!(deal.covers(&Jurisdiction::new("Arizona").unwrap()));
        assert!(deal.covers(&Jurisdiction::new("CALIFORNIA").unwrap()));
        assert!(!deal.covers(&Jurisdiction::new("Illinois").unwrap()));
    }

    #[test]
    fn only_active_agreements_are_in_force() {
        assert!(agreement(&[], AgreementStatus::Active).is_active());
        assert!(!agreement(&[], AgreementStatus::Pending).is_active());
        assert!(!agreement(&[], AgreementStatus::Terminated).is_active());
    }

    #[test]
    fn deserializes_database_record() {
        let json = r#"{
            "id": 2,
            "licensee": "Canada Partner",
            "brand": "DR. GREENTHUMB",
            "territories": ["canada"],
            "status": "pending",
            "start_date": "2025-01-01",
            "royalty_rate": "10%"
        }"#;
        let deal: LicensingAgreement = serde_json::from_str(json).unwrap();
        assert_eq!(deal.status, AgreementStatus::Pending);
        assert_eq!(deal.territories, vec!["canada"]);
        assert_eq!(deal.royalty_rate.as_deref(), Some("10%"));
    }

    #[test]
    fn royalty_rate_is_optional() {
        let json = r#"{
            "id": 3,
            "licensee": "Interim Partner",
            "brand": "DR. GREENTHUMB",
            "territories": ["illinois"],
            "status": "active",
            "start_date": "2026-03-01"
        }"#;
        let deal: LicensingAgreement = serde_json::from_str(json).unwrap();
        assert!(deal.royalty_rate.is_none());
    }
}
