//! # Report Generator
//!
//! Renders a point-in-time snapshot of obligations and portfolio totals.
//! Strictly read-only: building or rendering a report never touches alert
//! state or audit logs, so it can run on demand whether or not dispatch
//! ran today.

use serde::Serialize;

use tmark_core::{Asset, AssetStatus, CalendarDate, Money};

use crate::evaluate::Evaluation;
use crate::obligation::{Obligation, UrgencyTier};

/// Counts and cost rollups across the whole portfolio.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PortfolioTotals {
    /// Assets with status `active`.
    pub active: usize,
    /// Assets with status `needs_filing`.
    pub needs_filing: usize,
    /// Assets with status `overdue`.
    pub overdue: usize,
    /// Assets with status `abandoned`.
    pub abandoned: usize,
    /// Sum of cost across `needs_filing` and `overdue` assets — the money
    /// the portfolio is currently exposed for.
    pub exposure: Money,
}

impl PortfolioTotals {
    /// Tally the asset list.
    pub fn tally(assets: &[Asset]) -> Self {
        let mut totals = Self::default();
        for asset in assets {
            match asset.status {
                AssetStatus::Active => totals.active += 1,
                AssetStatus::NeedsFiling => totals.needs_filing += 1,
                AssetStatus::Overdue => totals.overdue += 1,
                AssetStatus::Abandoned => totals.abandoned += 1,
            }
            if matches!(
                asset.status,
                AssetStatus::NeedsFiling | AssetStatus::Overdue
            ) {
                totals.exposure = totals
                    .exposure
                    .checked_add(asset.cost)
                    .unwrap_or(totals.exposure);
            }
        }
        totals
    }

    /// Total number of tracked assets.
    pub fn tracked(&self) -> usize {
        self.active + self.needs_filing + self.overdue + self.abandoned
    }
}

/// A rendered snapshot of the portfolio's obligations and totals.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// The reference date the report was evaluated against.
    pub generated_on: CalendarDate,
    /// Obligations, most urgent first.
    pub obligations: Vec<Obligation>,
    /// Portfolio rollups.
    pub totals: PortfolioTotals,
    /// Budget horizon in days for the forecast.
    pub horizon_days: i64,
    /// Sum of cost over obligations due within the horizon. Each asset
    /// appears in at most one obligation per pass, so each is counted
    /// exactly once.
    pub forecast: Money,
    /// Validation problems found during evaluation, rendered for review.
    pub findings: Vec<String>,
}

impl Report {
    /// Build a report from an evaluation pass.
    pub fn build(
        evaluation: &Evaluation,
        assets: &[Asset],
        generated_on: CalendarDate,
        horizon_days: i64,
    ) -> Self {
        let forecast = Money::sum(
            evaluation
                .obligations
                .iter()
                .filter(|ob| ob.days_remaining <= horizon_days)
                .map(|ob| ob.cost),
        );
        let findings = evaluation
            .excluded
            .iter()
            .map(|e| format!("excluded {}: {}", e.asset_id, e.reason))
            .chain(evaluation.mismatches.iter().map(|m| m.to_string()))
            .collect();

        Self {
            generated_on,
            obligations: evaluation.obligations.clone(),
            totals: PortfolioTotals::tally(assets),
            horizon_days,
            forecast,
            findings,
        }
    }

    /// Count of obligations at or tighter than a tier (the "within N
    /// days" rollups are cumulative, matching the alert banner).
    pub fn due_within_tier(&self, tier: UrgencyTier) -> usize {
        self.obligations
            .iter()
            .filter(|ob| ob.tier <= tier && ob.tier != UrgencyTier::Overdue)
            .count()
    }

    /// Render the human-readable portfolio report.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let rule = "=".repeat(78);

        out.push_str(&rule);
        out.push_str(&format!(
            "\nTRADEMARK PORTFOLIO\nGenerated: {}\n",
            self.generated_on
        ));
        out.push_str(&rule);
        out.push_str(&format!(
            "\n\nTracked: {}  (active {}, needs filing {}, overdue {}, abandoned {})\n",
            self.totals.tracked(),
            self.totals.active,
            self.totals.needs_filing,
            self.totals.overdue,
            self.totals.abandoned,
        ));
        out.push_str(&format!(
            "Exposure (needs filing + overdue): {}\n",
            self.totals.exposure
        ));
        out.push_str(&format!(
            "Forecast (due within {} days): {}\n",
            self.horizon_days, self.forecast
        ));

        let overdue = self
            .obligations
            .iter()
            .filter(|ob| ob.tier == UrgencyTier::Overdue)
            .count();
        out.push_str(&format!(
            "\nRENEWAL ALERTS:\n  Overdue:        {}\n  Within 30 days: {}\n  Within 60 days: {}\n  Within 90 days: {}\n",
            overdue,
            self.due_within_tier(UrgencyTier::Within30),
            self.due_within_tier(UrgencyTier::Within60),
            self.due_within_tier(UrgencyTier::Within90),
        ));

        if !self.obligations.is_empty() {
            out.push_str("\nACTION LIST (most urgent first):\n");
            for ob in &self.obligations {
                out.push_str(&format!(
                    "  - {} [{}] due {} ({} days, {})\n",
                    ob.asset_id, ob.kind, ob.due_date, ob.days_remaining, ob.cost
                ));
            }
        }

        if !self.findings.is_empty() {
            out.push_str("\nVALIDATION FINDINGS:\n");
            for finding in &self.findings {
                out.push_str(&format!("  ! {finding}\n"));
            }
        }

        out.push_str(&rule);
        out.push('\n');
        out
    }

    /// Render the obligations as CSV, most urgent first.
    pub fn render_csv(&self) -> String {
        let mut out =
            String::from("asset_id,kind,urgency_tier,due_date,days_remaining,cost_cents\n");
        for ob in &self.obligations {
            out.push_str(&format!(
                "{},{},{},{},{},{}\n",
                csv_field(ob.asset_id.as_str()),
                ob.kind,
                ob.tier,
                ob.due_date,
                ob.days_remaining,
                ob.cost.cents()
            ));
        }
        out
    }
}

/// Render the full asset registry as CSV for export.
pub fn portfolio_csv(assets: &[Asset]) -> String {
    let mut out = String::from(
        "id,name,jurisdiction,filing_date,renewal_date,status,cost_cents,registration_number\n",
    );
    for asset in assets {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            csv_field(asset.id.as_str()),
            csv_field(&asset.name),
            csv_field(asset.jurisdiction.as_str()),
            asset.filing_date.map(|d| d.to_string()).unwrap_or_default(),
            asset
                .renewal_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            asset.status.as_str(),
            asset.cost.cents(),
            csv_field(asset.registration_number.as_deref().unwrap_or_default()),
        ));
    }
    out
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate::{evaluate, EvaluationConfig};
    use tmark_core::{AssetId, Jurisdiction};

    fn today() -> CalendarDate {
        CalendarDate::from_ymd(2026, 8, 30).unwrap()
    }

    fn asset(id: &str, status: AssetStatus, renewal_in_days: Option<i64>, dollars: u64) -> Asset {
        Asset::new(
            AssetId::new(id).unwrap(),
            "DR. GREENTHUMB",
            Jurisdiction::new("Arizona").unwrap(),
            Some(CalendarDate::from_ymd(2020, 11, 15).unwrap()),
            renewal_in_days.map(|d| today().plus_days(d)),
            status,
            Money::from_dollars(dollars),
            "test",
        )
    }

    fn report_for(assets: &[Asset], horizon: i64) -> Report {
        let evaluation = evaluate(assets, today(), &EvaluationConfig::default());
        Report::build(&evaluation, assets, today(), horizon)
    }

    // ── Totals ───────────────────────────────────────────────────────

    #[test]
    fn totals_count_by_status() {
        let assets = vec![
            asset("A-TM", AssetStatus::Active, Some(20), 3900),
            asset("B-TM", AssetStatus::Overdue, Some(-5), 1000),
            asset("C-TM", AssetStatus::Abandoned, Some(500), 100),
        ];
        let totals = PortfolioTotals::tally(&assets);
        assert_eq!(totals.active, 1);
        assert_eq!(totals.overdue, 1);
        assert_eq!(totals.abandoned, 1);
        assert_eq!(totals.tracked(), 3);
    }

    #[test]
    fn exposure_sums_needs_filing_and_overdue_only() {
        let mut unfiled = asset("B-TM", AssetStatus::NeedsFiling, None, 3900);
        unfiled.filing_date = None;
        let assets = vec![
            asset("A-TM", AssetStatus::Active, Some(20), 5000),
            unfiled,
            asset("C-TM", AssetStatus::Overdue, Some(-5), 1000),
        ];
        let totals = PortfolioTotals::tally(&assets);
        assert_eq!(totals.exposure, Money::from_dollars(4900));
    }

    // ── Forecast ─────────────────────────────────────────────────────

    #[test]
    fn forecast_counts_needs_filing_cost_exactly_once() {
        let mut unfiled = asset("NM-TM", AssetStatus::NeedsFiling, None, 3900);
        unfiled.filing_date = None;
        let report = report_for(&[unfiled], 90);
        assert_eq!(report.forecast, Money::from_dollars(3900));
    }

    #[test]
    fn forecast_respects_horizon() {
        let assets = vec![
            asset("A-TM", AssetStatus::Active, Some(20), 1000),
            asset("B-TM", AssetStatus::Active, Some(80), 2000),
        ];
        let within_30 = report_for(&assets, 30);
        assert_eq!(within_30.forecast, Money::from_dollars(1000));
        let within_90 = report_for(&assets, 90);
        assert_eq!(within_90.forecast, Money::from_dollars(3000));
    }

    #[test]
    fn forecast_includes_overdue() {
        let assets = vec![asset("A-TM", AssetStatus::Overdue, Some(-10), 1500)];
        let report = report_for(&assets, 30);
        assert_eq!(report.forecast, Money::from_dollars(1500));
    }

    // ── Rollup counts ────────────────────────────────────────────────

    #[test]
    fn within_counts_are_cumulative() {
        let assets = vec![
            asset("A-TM", AssetStatus::Active, Some(10), 100),
            asset("B-TM", AssetStatus::Active, Some(45), 100),
            asset("C-TM", AssetStatus::Active, Some(85), 100),
        ];
        let report = report_for(&assets, 90);
        assert_eq!(report.due_within_tier(UrgencyTier::Within30), 1);
        assert_eq!(report.due_within_tier(UrgencyTier::Within60), 2);
        assert_eq!(report.due_within_tier(UrgencyTier::Within90), 3);
    }

    // ── Rendering ────────────────────────────────────────────────────

    #[test]
    fn text_report_lists_most_urgent_first() {
        let assets = vec![
            asset("B-TM", AssetStatus::Active, Some(10), 100),
            asset("A-TM", AssetStatus::Overdue, Some(-5), 100),
        ];
        let text = report_for(&assets, 90).render_text();
        let a_pos = text.find("A-TM").unwrap();
        let b_pos = text.find("B-TM").unwrap();
        assert!(a_pos < b_pos);
        assert!(text.contains("Overdue:        1"));
    }

    #[test]
    fn text_report_includes_findings() {
        let assets = vec![asset("A-TM", AssetStatus::Active, None, 100)];
        let text = report_for(&assets, 90).render_text();
        assert!(text.contains("VALIDATION FINDINGS"));
        assert!(text.contains("A-TM"));
    }

    #[test]
    fn csv_has_header_and_one_row_per_obligation() {
        let assets = vec![
            asset("A-TM", AssetStatus::Active, Some(10), 100),
            asset("B-TM", AssetStatus::Active, Some(45), 100),
        ];
        let csv = report_for(&assets, 90).render_csv();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("asset_id,"));
        assert!(lines[1].starts_with("A-TM,renewal_due,30,"));
    }

    #[test]
    fn portfolio_csv_quotes_embedded_commas() {
        let mut a = asset("A-TM", AssetStatus::Active, Some(10), 100);
        a.name = "GREENTHUMB, DR.".to_string();
        let csv = portfolio_csv(&[a]);
        assert!(csv.contains("\"GREENTHUMB, DR.\""));
    }

    #[test]
    fn report_is_read_only_with_respect_to_assets() {
        let assets = vec![asset("A-TM", AssetStatus::Active, Some(10), 100)];
        let audit_len_before = assets[0].audit_log.len();
        let _ = report_for(&assets, 90);
        assert_eq!(assets[0].audit_log.len(), audit_len_before);
    }
}
