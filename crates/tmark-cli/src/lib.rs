//! # tmark-cli — CLI for the Trademark Tracker
//!
//! Provides the `tmark` command-line interface over the portfolio
//! registry and the alert cycle.
//!
//! ## Subcommands
//!
//! - `tmark add` / `renew` / `set-status` / `show` — portfolio data entry.
//! - `tmark upcoming` — obligations due within a window.
//! - `tmark report` — full portfolio report, optional obligations CSV.
//! - `tmark export` — portfolio CSV export.
//! - `tmark territory` — trademark coverage vs. licensing agreements.
//! - `tmark check` — the scheduled alert cycle (evaluate, dedup, dispatch).
//!
//! Scheduling itself is external: cron (or equivalent) runs `tmark check`
//! daily and `tmark report --csv` weekly.

pub mod check;
pub mod portfolio;
pub mod report;

use std::path::{Path, PathBuf};

/// Resolved locations of the durable stores for one invocation.
#[derive(Debug, Clone)]
pub struct StorePaths {
    /// The portfolio registry JSON file.
    pub registry: PathBuf,
    /// The fired-alert markers JSON file.
    pub alerts: PathBuf,
    /// The exclusive lock file guarding both.
    pub lock: PathBuf,
    /// The default outbox directory for the file sink.
    pub outbox: PathBuf,
    /// The licensing agreements JSON file (read-only).
    pub licensing: PathBuf,
}

impl StorePaths {
    /// Resolve store paths from CLI overrides and the environment.
    ///
    /// The base directory is `$TMARK_HOME` when set, otherwise the current
    /// directory. `--data` and `--alerts` override the individual files;
    /// the lock file always sits next to the registry.
    pub fn resolve(data: Option<&Path>, alerts: Option<&Path>) -> Self {
        let base = std::env::var_os("TMARK_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let registry = data
            .map(Path::to_path_buf)
            .unwrap_or_else(|| base.join("trademarks.json"));
        let alerts = alerts
            .map(Path::to_path_buf)
            .unwrap_or_else(|| base.join("alerts.json"));
        let lock = registry.with_extension("lock");
        let outbox = base.join("outbox");
        let licensing = base.join("licensing_agreements.json");
        Self {
            registry,
            alerts,
            lock,
            outbox,
            licensing,
        }
    }

    /// Paths rooted in an explicit directory, for tests.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            registry: dir.join("trademarks.json"),
            alerts: dir.join("alerts.json"),
            lock: dir.join("trademarks.lock"),
            outbox: dir.join("outbox"),
            licensing: dir.join("licensing_agreements.json"),
        }
    }
}

/// The actor recorded in audit entries for CLI-driven mutations.
pub fn audit_actor() -> String {
    std::env::var("USER").unwrap_or_else(|_| "cli".to_string())
}
