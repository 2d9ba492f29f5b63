//! # Territory Coverage Analysis
//!
//! Cross-references the trademark portfolio with licensing agreements:
//! a licensee operating in a territory where no active mark protects the
//! brand is exposure, whether or not any deadline is near. Pure like the
//! rest of the engine — agreements come in as a slice, nothing is read
//! from disk here.
//!
//! Territory names are compared case-insensitively; the licensing
//! database stores them lowercase while jurisdictions are title-cased.

use std::collections::BTreeSet;

use serde::Serialize;

use tmark_core::{Asset, AssetId, AssetStatus, Jurisdiction, LicensingAgreement, Money};

// ─── Conflicts ───────────────────────────────────────────────────────

/// An unprotected mark inside a territory an active licensee sells in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerritoryConflict {
    /// The unprotected asset.
    pub asset_id: AssetId,
    /// Display name of the mark.
    pub name: String,
    /// The jurisdiction at risk.
    pub jurisdiction: Jurisdiction,
    /// The licensee operating there.
    pub licensee: String,
    /// The agreement granting the territory.
    pub agreement_id: u32,
}

impl std::fmt::Display for TerritoryConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} in {}: licensed to {} (agreement {}) without trademark protection",
            self.asset_id, self.jurisdiction, self.licensee, self.agreement_id
        )
    }
}

// ─── Coverage ────────────────────────────────────────────────────────

/// The coverage picture for one (portfolio, agreements) pair.
///
/// Territory lists are lowercase and sorted, so two runs over the same
/// inputs render identically.
#[derive(Debug, Clone, Serialize)]
pub struct TerritoryCoverage {
    /// Territories some active agreement licenses.
    pub licensed: Vec<String>,
    /// Jurisdictions an active mark protects.
    pub protected: Vec<String>,
    /// Licensed territories with no active mark. The gap to close.
    pub unprotected: Vec<String>,
    /// Unfiled or abandoned marks sitting inside actively licensed
    /// territories, most specific form of the gap.
    pub conflicts: Vec<TerritoryConflict>,
    /// Estimated cost to file in every unprotected territory.
    pub filing_estimate: Money,
}

impl TerritoryCoverage {
    /// Whether the licensed footprint is fully covered.
    pub fn is_clean(&self) -> bool {
        self.unprotected.is_empty() && self.conflicts.is_empty()
    }
}

/// Analyze the portfolio's trademark coverage against active licensing
/// agreements.
///
/// `filing_cost` is the per-territory estimate used when no asset exists
/// for an unprotected territory yet.
pub fn analyze_coverage(
    assets: &[Asset],
    agreements: &[LicensingAgreement],
    filing_cost: Money,
) -> TerritoryCoverage {
    let licensed: BTreeSet<String> = agreements
        .iter()
        .filter(|a| a.is_active())
        .flat_map(|a| a.territories.iter())
        .map(|t| t.to_ascii_lowercase())
        .collect();
    let protected: BTreeSet<String> = assets
        .iter()
        .filter(|a| a.status == AssetStatus::Active)
        .map(|a| a.jurisdiction.as_str().to_ascii_lowercase())
        .collect();
    let unprotected: Vec<String> = licensed.difference(&protected).cloned().collect();

    let mut conflicts = Vec::new();
    for asset in assets {
        if !matches!(
            asset.status,
            AssetStatus::NeedsFiling | AssetStatus::Abandoned
        ) {
            continue;
        }
        for agreement in agreements {
            if agreement.is_active() && agreement.covers(&asset.jurisdiction) {
                conflicts.push(TerritoryConflict {
                    asset_id: asset.id.clone(),
                    name: asset.name.clone(),
                    jurisdiction: asset.jurisdiction.clone(),
                    licensee: agreement.licensee.clone(),
                    agreement_id: agreement.id,
                });
            }
        }
    }
    conflicts.sort_by(|a, b| (&a.asset_id, a.agreement_id).cmp(&(&b.asset_id, b.agreement_id)));

    let filing_estimate = Money::sum(unprotected.iter().map(|_| filing_cost));

    TerritoryCoverage {
        licensed: licensed.into_iter().collect(),
        protected: protected.into_iter().collect(),
        unprotected,
        conflicts,
        filing_estimate,
    }
}

impl TerritoryCoverage {
    /// Render the human-readable territory report.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let rule = "=".repeat(78);

        out.push_str(&rule);
        out.push_str("\nTRADEMARK & LICENSING TERRITORY COVERAGE\n");
        out.push_str(&rule);
        out.push_str(&format!(
            "\n\nLicensed territories:    {}\nProtected by trademark:  {}\nUnprotected:             {}\n",
            self.licensed.len(),
            self.protected.len(),
            self.unprotected.len(),
        ));

        if !self.unprotected.is_empty() {
            out.push_str("\nOPERATING WITHOUT TRADEMARK PROTECTION:\n");
            for territory in &self.unprotected {
                out.push_str(&format!("  - {territory}\n"));
            }
            out.push_str(&format!(
                "Estimated cost to secure: {}\n",
                self.filing_estimate
            ));
        }

        if !self.conflicts.is_empty() {
            out.push_str("\nLICENSING CONFLICTS:\n");
            for conflict in &self.conflicts {
                out.push_str(&format!("  ! {conflict}\n"));
            }
        }

        out.push_str(&rule);
        out.push('\n');
        out
    }
}
