//! # tmark CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tmark_cli::check::{run_check, CheckArgs};
use tmark_cli::portfolio::{
    run_add, run_renew, run_set_status, run_show, AddArgs, RenewArgs, SetStatusArgs, ShowArgs,
};
use tmark_cli::report::{
    run_export, run_report, run_territory, run_upcoming, ExportArgs, ReportArgs, TerritoryArgs,
    UpcomingArgs,
};
use tmark_cli::StorePaths;

/// Trademark portfolio tracker.
///
/// Maintains a registry of trademark registrations with their filing and
/// renewal deadlines, and turns that registry into deadline alerts and
/// budget reports on a schedule.
#[derive(Parser, Debug)]
#[command(name = "tmark", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the portfolio registry JSON file.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Path to the fired-alert markers JSON file.
    #[arg(long, global = true)]
    alerts: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a trademark asset to the portfolio.
    Add(AddArgs),

    /// Record a successful renewal filing, advancing the renewal date.
    Renew(RenewArgs),

    /// Manually override an asset's status.
    SetStatus(SetStatusArgs),

    /// Show one asset with its full audit log.
    Show(ShowArgs),

    /// List obligations due within a window (default 90 days).
    Upcoming(UpcomingArgs),

    /// Full portfolio report with totals and budget forecast.
    Report(ReportArgs),

    /// Export the portfolio as CSV.
    Export(ExportArgs),

    /// Trademark coverage vs. active licensing agreements.
    Territory(TerritoryArgs),

    /// Run the alert cycle: evaluate, dedup, dispatch.
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let paths = StorePaths::resolve(cli.data.as_deref(), cli.alerts.as_deref());
    tracing::debug!(registry = %paths.registry.display(), alerts = %paths.alerts.display(), "resolved store paths");

    let result = match cli.command {
        Commands::Add(args) => run_add(&args, &paths),
        Commands::Renew(args) => run_renew(&args, &paths),
        Commands::SetStatus(args) => run_set_status(&args, &paths),
        Commands::Show(args) => run_show(&args, &paths),
        Commands::Upcoming(args) => run_upcoming(&args, &paths),
        Commands::Report(args) => run_report(&args, &paths),
        Commands::Export(args) => run_export(&args, &paths),
        Commands::Territory(args) => run_territory(&args, &paths),
        Commands::Check(args) => run_check(&args, &paths),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
