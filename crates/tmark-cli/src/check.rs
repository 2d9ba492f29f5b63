//! # Check Subcommand
//!
//! The scheduled alert cycle: evaluate the portfolio, drop already-seen
//! obligations, dispatch the rest, persist the alert markers. Runs under
//! the exclusive store lock so overlapping cron triggers cannot
//! double-dispatch or clobber each other's saves.
//!
//! `--dry-run` evaluates and prints what would be dispatched without
//! sending anything or writing any state.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use tmark_core::CalendarDate;
use tmark_engine::batch::{run_alert_cycle, CycleOutcome};
use tmark_engine::dispatch::{DispatchAction, DispatchSink};
use tmark_engine::evaluate::{evaluate, EvaluationConfig};
use tmark_engine::store::{AlertStore, RegistryStore};
use tmark_store::{JsonAlertStore, JsonRegistryStore, OutboxSink, StoreLock};
use tmark_webhook::{WebhookConfig, WebhookSink};

use crate::StorePaths;

/// Where `check` sends its alerts.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    /// Print actions to stdout.
    Console,
    /// Write one JSON file per action into the outbox directory.
    Outbox,
    /// POST actions to the configured webhook endpoint.
    Webhook,
}

/// Arguments for `tmark check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Dispatch sink for new alerts.
    #[arg(long, value_enum, default_value_t = SinkKind::Console)]
    pub sink: SinkKind,
    /// Outbox directory (with `--sink outbox`).
    #[arg(long)]
    pub outbox: Option<PathBuf>,
    /// Evaluate against this date instead of the system clock (YYYY-MM-DD).
    #[arg(long)]
    pub today: Option<String>,
    /// Show what would be dispatched without sending or saving anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Dispatch sink that prints each action to stdout.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl DispatchSink for ConsoleSink {
    fn create_action(&mut self, action: &DispatchAction) -> Result<(), tmark_core::DispatchError> {
        println!("--- {} ---", action.title);
        print!("{}", action.body);
        println!("(key: {})", action.idempotency_key);
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

/// Execute `tmark check`.
pub fn run_check(args: &CheckArgs, paths: &StorePaths) -> Result<u8> {
    let today = match &args.today {
        Some(raw) => CalendarDate::parse(raw).context("invalid --today date")?,
        None => CalendarDate::today_utc(),
    };
    let config = EvaluationConfig::default();

    if args.dry_run {
        return cmd_dry_run(paths, today, &config);
    }

    // The lock spans load through save; a second invocation fails fast.
    let _lock = StoreLock::acquire(&paths.lock)?;
    let registry = JsonRegistryStore::new(&paths.registry);
    let alerts = JsonAlertStore::new(&paths.alerts);

    let outcome = match args.sink {
        SinkKind::Console => {
            let mut sink = ConsoleSink;
            run_alert_cycle(&registry, &alerts, &mut sink, today, &config)?
        }
        SinkKind::Outbox => {
            let dir = args.outbox.clone().unwrap_or_else(|| paths.outbox.clone());
            let mut sink = OutboxSink::new(dir);
            run_alert_cycle(&registry, &alerts, &mut sink, today, &config)?
        }
        SinkKind::Webhook => {
            let config_env = WebhookConfig::from_env()?;
            let mut sink = WebhookSink::new(config_env)?;
            run_alert_cycle(&registry, &alerts, &mut sink, today, &config)?
        }
    };

    print_outcome(&outcome);
    Ok(if outcome.failed.is_empty() { 0 } else { 1 })
}

fn cmd_dry_run(paths: &StorePaths, today: CalendarDate, config: &EvaluationConfig) -> Result<u8> {
    let snapshot = JsonRegistryStore::new(&paths.registry).load()?;
    let state = JsonAlertStore::new(&paths.alerts).load()?;
    let evaluation = evaluate(&snapshot.assets, today, config);
    let new_obligations = state.filter_new(&evaluation.obligations);

    println!(
        "Dry run for {today}: {} obligations, {} new.",
        evaluation.obligations.len(),
        new_obligations.len()
    );
    for ob in &new_obligations {
        println!("  would dispatch {}", ob.idempotency_key());
    }
    for reject in snapshot.rejected.iter().chain(&evaluation.excluded) {
        eprintln!("warning: excluded {}: {}", reject.asset_id, reject.reason);
    }
    for mismatch in &evaluation.mismatches {
        eprintln!("warning: {mismatch}");
    }
    Ok(0)
}

fn print_outcome(outcome: &CycleOutcome) {
    println!(
        "Checked: {} obligations, {} new, {} dispatched, {} failed.",
        outcome.evaluated,
        outcome.new,
        outcome.dispatched.len(),
        outcome.failed.len()
    );
    for (ob, err) in &outcome.failed {
        eprintln!("error: dispatch {} failed: {err}", ob.idempotency_key());
    }
    for excluded in &outcome.excluded {
        eprintln!("warning: excluded {}: {}", excluded.asset_id, excluded.reason);
    }
    for mismatch in &outcome.mismatches {
        eprintln!("warning: {mismatch}");
    }
}
