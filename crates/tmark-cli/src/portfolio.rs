//! # Portfolio Subcommands
//!
//! Data-entry commands that mutate the registry: `add`, `renew`,
//! `set-status`, plus the read-only `show`. Every mutation goes through
//! the asset's own audited operations and is written back under the
//! store lock, so an overlapping `check` run cannot interleave.

use anyhow::{bail, Context, Result};
use clap::Args;

use tmark_core::{Asset, AssetId, AssetStatus, CalendarDate, Jurisdiction, Money};
use tmark_engine::store::RegistryStore;
use tmark_store::{JsonRegistryStore, StoreLock};

use crate::{audit_actor, StorePaths};

/// Arguments for `tmark add`.
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Asset identifier (stable slug, e.g. "AZ-TM").
    pub id: String,
    /// Display name of the mark.
    #[arg(long)]
    pub name: String,
    /// Filing scope (e.g. "Arizona", "USPTO-Federal", "EUIPO").
    #[arg(long)]
    pub jurisdiction: String,
    /// Original filing date (YYYY-MM-DD).
    #[arg(long)]
    pub filing_date: Option<String>,
    /// Next renewal due date (YYYY-MM-DD).
    #[arg(long)]
    pub renewal_date: Option<String>,
    /// Initial status.
    #[arg(long, default_value = "active")]
    pub status: AssetStatus,
    /// Filing/renewal fee (e.g. "525" or "$3,900.00").
    #[arg(long, default_value = "0")]
    pub cost: String,
    /// Registration number once granted.
    #[arg(long)]
    pub registration: Option<String>,
}

/// Arguments for `tmark renew`.
#[derive(Args, Debug)]
pub struct RenewArgs {
    /// Asset identifier.
    pub id: String,
    /// The next renewal due date after this filing (YYYY-MM-DD).
    #[arg(long)]
    pub next: String,
    /// Filing date, for a first filing of a needs_filing asset
    /// (YYYY-MM-DD). Omit for an ordinary renewal.
    #[arg(long)]
    pub filing_date: Option<String>,
}

/// Arguments for `tmark set-status`.
#[derive(Args, Debug)]
pub struct SetStatusArgs {
    /// Asset identifier.
    pub id: String,
    /// New status (active, needs_filing, overdue, abandoned).
    pub status: AssetStatus,
}

/// Arguments for `tmark show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Asset identifier.
    pub id: String,
}

/// Execute `tmark add`.
pub fn run_add(args: &AddArgs, paths: &StorePaths) -> Result<u8> {
    let _lock = StoreLock::acquire(&paths.lock)?;
    let store = JsonRegistryStore::new(&paths.registry);
    let mut snapshot = store.load()?;

    let id = AssetId::new(args.id.as_str())?;
    if snapshot.assets.iter().any(|a| a.id == id) {
        bail!("asset already exists: {id}");
    }

    let filing_date = parse_date_opt(args.filing_date.as_deref(), "filing date")?;
    let renewal_date = parse_date_opt(args.renewal_date.as_deref(), "renewal date")?;
    let cost = Money::parse(&args.cost)?;

    let mut asset = Asset::new(
        id,
        args.name.as_str(),
        Jurisdiction::new(args.jurisdiction.as_str())?,
        filing_date,
        renewal_date,
        args.status,
        cost,
        &audit_actor(),
    );
    asset.registration_number = args.registration.clone();
    asset.validate()?;

    snapshot.assets.push(asset);
    store.save(&snapshot.assets)?;
    println!("OK: added {}", args.id);
    Ok(0)
}

/// Execute `tmark renew`.
pub fn run_renew(args: &RenewArgs, paths: &StorePaths) -> Result<u8> {
    let next = CalendarDate::parse(&args.next).context("invalid --next date")?;
    let filing = parse_date_opt(args.filing_date.as_deref(), "filing date")?;

    let _lock = StoreLock::acquire(&paths.lock)?;
    let store = JsonRegistryStore::new(&paths.registry);
    let mut snapshot = store.load()?;
    let asset = find_mut(&mut snapshot.assets, &args.id)?;

    let actor = audit_actor();
    match filing {
        Some(filing_date) => asset.mark_filed(filing_date, next, &actor)?,
        None => asset.record_renewal(next, &actor)?,
    }

    store.save(&snapshot.assets)?;
    println!("OK: {} next renewal {next}", args.id);
    Ok(0)
}

/// Execute `tmark set-status`.
pub fn run_set_status(args: &SetStatusArgs, paths: &StorePaths) -> Result<u8> {
    let _lock = StoreLock::acquire(&paths.lock)?;
    let store = JsonRegistryStore::new(&paths.registry);
    let mut snapshot = store.load()?;
    let asset = find_mut(&mut snapshot.assets, &args.id)?;

    asset.set_status(args.status, &audit_actor());
    asset.validate()?;

    store.save(&snapshot.assets)?;
    println!("OK: {} is now {}", args.id, args.status);
    Ok(0)
}

/// Execute `tmark show`.
pub fn run_show(args: &ShowArgs, paths: &StorePaths) -> Result<u8> {
    let snapshot = JsonRegistryStore::new(&paths.registry).load()?;
    let Some(asset) = snapshot.assets.iter().find(|a| a.id.as_str() == args.id) else {
        bail!("asset not found: {}", args.id);
    };

    println!("{} ({})", asset.name, asset.id);
    println!("  Jurisdiction: {}", asset.jurisdiction);
    println!("  Status: {}", asset.status);
    println!("  Filing date: {}", date_or_dash(asset.filing_date));
    println!("  Renewal date: {}", date_or_dash(asset.renewal_date));
    println!("  Cost: {}", asset.cost);
    if let Some(reg) = asset.registration_number.as_deref() {
        println!("  Registration #: {reg}");
    }
    println!("  Audit log ({} entries):", asset.audit_log.len());
    for entry in asset.audit_log.entries() {
        println!(
            "    {} [{}] {}: {}",
            entry.timestamp.to_iso8601(),
            entry.actor,
            entry.action,
            entry.detail
        );
    }
    Ok(0)
}

fn parse_date_opt(raw: Option<&str>, what: &str) -> Result<Option<CalendarDate>> {
    raw.map(|s| CalendarDate::parse(s).with_context(|| format!("invalid {what}")))
        .transpose()
}

fn find_mut<'a>(assets: &'a mut [Asset], id: &str) -> Result<&'a mut Asset> {
    match assets.iter_mut().find(|a| a.id.as_str() == id) {
        Some(asset) => Ok(asset),
        None => bail!("asset not found: {id}"),
    }
}

fn date_or_dash(date: Option<CalendarDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}
