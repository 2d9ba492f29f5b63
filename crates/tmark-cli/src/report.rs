//! # Reporting Subcommands
//!
//! Read-only views over the portfolio: `upcoming`, `report`, `export`,
//! and `territory`. None of these touch the alert store or the audit
//! logs, and none take the store lock; they evaluate against a snapshot
//! and render.
//!
//! `report` exits non-zero when validation findings exist, so the weekly
//! scheduled run surfaces damaged records even if nobody reads the output.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use tmark_core::{CalendarDate, Money};
use tmark_engine::evaluate::{evaluate, EvaluationConfig};
use tmark_engine::report::{portfolio_csv, Report};
use tmark_engine::store::RegistryStore;
use tmark_engine::territory::analyze_coverage;
use tmark_store::{JsonLicensingStore, JsonRegistryStore};

use crate::StorePaths;

/// Arguments for `tmark upcoming`.
#[derive(Args, Debug)]
pub struct UpcomingArgs {
    /// Only show obligations due within this many days.
    #[arg(long, default_value_t = 90)]
    pub days: i64,
}

/// Arguments for `tmark report`.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Also write the obligations as CSV to this path.
    #[arg(long)]
    pub csv: Option<PathBuf>,
    /// Budget forecast horizon in days.
    #[arg(long, default_value_t = 90)]
    pub horizon: i64,
}

/// Arguments for `tmark export`.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Destination path for the portfolio CSV.
    #[arg(long)]
    pub output: PathBuf,
}

/// Arguments for `tmark territory`.
#[derive(Args, Debug)]
pub struct TerritoryArgs {
    /// Path to the licensing agreements JSON file.
    #[arg(long)]
    pub licensing: Option<PathBuf>,
    /// Estimated filing cost per unprotected territory, in dollars.
    #[arg(long, default_value = "3900")]
    pub filing_cost: String,
}

/// Execute `tmark upcoming`.
pub fn run_upcoming(args: &UpcomingArgs, paths: &StorePaths) -> Result<u8> {
    cmd_upcoming(args, paths, CalendarDate::today_utc())
}

/// Execute `tmark report`.
pub fn run_report(args: &ReportArgs, paths: &StorePaths) -> Result<u8> {
    cmd_report(args, paths, CalendarDate::today_utc())
}

fn cmd_upcoming(args: &UpcomingArgs, paths: &StorePaths, today: CalendarDate) -> Result<u8> {
    let snapshot = JsonRegistryStore::new(&paths.registry).load()?;
    let evaluation = evaluate(&snapshot.assets, today, &EvaluationConfig::default());

    let mut shown = 0;
    for ob in evaluation
        .obligations
        .iter()
        .filter(|ob| ob.days_remaining <= args.days)
    {
        let when = if ob.days_remaining < 0 {
            format!("{} days overdue", -ob.days_remaining)
        } else {
            format!("in {} days", ob.days_remaining)
        };
        println!(
            "{:<12} {:>8}  due {} ({when}), {}",
            ob.asset_id,
            format!("[{}]", ob.tier),
            ob.due_date,
            ob.cost
        );
        shown += 1;
    }
    if shown == 0 {
        println!("Nothing due within {} days.", args.days);
    }

    let findings = snapshot.rejected.len() + evaluation.excluded.len() + evaluation.mismatches.len();
    for reject in &snapshot.rejected {
        eprintln!("warning: excluded {}: {}", reject.asset_id, reject.reason);
    }
    for excluded in &evaluation.excluded {
        eprintln!("warning: excluded {}: {}", excluded.asset_id, excluded.reason);
    }
    for mismatch in &evaluation.mismatches {
        eprintln!("warning: {mismatch}");
    }
    Ok(if findings == 0 { 0 } else { 1 })
}

fn cmd_report(args: &ReportArgs, paths: &StorePaths, today: CalendarDate) -> Result<u8> {
    let snapshot = JsonRegistryStore::new(&paths.registry).load()?;
    let mut evaluation = evaluate(&snapshot.assets, today, &EvaluationConfig::default());
    evaluation.excluded.extend(snapshot.rejected.clone());

    let report = Report::build(&evaluation, &snapshot.assets, today, args.horizon);
    print!("{}", report.render_text());

    if let Some(csv_path) = &args.csv {
        std::fs::write(csv_path, report.render_csv())
            .with_context(|| format!("failed to write {}", csv_path.display()))?;
        println!("Wrote obligations CSV to {}", csv_path.display());
    }

    Ok(if report.findings.is_empty() { 0 } else { 1 })
}

/// Execute `tmark territory`.
pub fn run_territory(args: &TerritoryArgs, paths: &StorePaths) -> Result<u8> {
    let filing_cost = Money::parse(&args.filing_cost).context("invalid --filing-cost")?;
    let licensing_path = args.licensing.as_deref().unwrap_or(&paths.licensing);

    let snapshot = JsonRegistryStore::new(&paths.registry).load()?;
    let agreements = JsonLicensingStore::new(licensing_path).load()?;

    let coverage = analyze_coverage(&snapshot.assets, &agreements, filing_cost);
    print!("{}", coverage.render_text());

    for reject in &snapshot.rejected {
        eprintln!("warning: excluded {}: {}", reject.asset_id, reject.reason);
    }
    Ok(if coverage.is_clean() && snapshot.rejected.is_empty() {
        0
    } else {
        1
    })
}

/// Execute `tmark export`.
pub fn run_export(args: &ExportArgs, paths: &StorePaths) -> Result<u8> {
    let snapshot = JsonRegistryStore::new(&paths.registry).load()?;
    std::fs::write(&args.output, portfolio_csv(&snapshot.assets))
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!(
        "Exported {} assets to {}",
        snapshot.assets.len(),
        args.output.display()
    );
    Ok(0)
}
