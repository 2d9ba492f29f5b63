//! # Error Hierarchy
//!
//! Structured error types for the tracker, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Each subsystem defines specific error variants that carry diagnostic
//! context: the record that failed, the state at the time of failure, and
//! actionable information for operators. The three concerns map to three
//! enums with different blast radii:
//!
//! - [`ValidationError`] — one asset is malformed; it is excluded and
//!   reported, the batch continues for the rest.
//! - [`PersistenceError`] — a store is unreadable or unwritable; fatal,
//!   the batch aborts before any dispatch.
//! - [`DispatchError`] — an external sink failed for one obligation;
//!   non-fatal, the obligation is retried on the next cycle.

use thiserror::Error;

/// Top-level error type for the tracker.
#[derive(Error, Debug)]
pub enum TrackError {
    /// Asset record validation failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Store read/write failure.
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// External notification sink failure.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// I/O error outside the stores.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors for asset records and domain primitives.
///
/// These carry the invalid input and the expected format so operators can
/// fix the registry without guesswork.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Asset identifier is empty, too long, or contains invalid characters.
    #[error("invalid asset id: \"{0}\" (expected 1-64 of [A-Za-z0-9._-])")]
    InvalidAssetId(String),

    /// Jurisdiction is empty.
    #[error("invalid jurisdiction: must be non-empty")]
    InvalidJurisdiction,

    /// A date field failed to parse.
    #[error("invalid {field} for asset \"{asset_id}\": \"{value}\" ({reason})")]
    InvalidDate {
        /// The asset the date belongs to.
        asset_id: String,
        /// Which field failed (`filing_date` or `renewal_date`).
        field: &'static str,
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Monetary amount is not an integer-cents representation.
    #[error("invalid amount: \"{0}\" (expected dollars with at most 2 decimals, e.g. 3900 or 3900.00)")]
    InvalidAmount(String),

    /// Timestamp string is not valid UTC ISO 8601 with Z suffix.
    #[error("invalid timestamp: \"{value}\" ({reason})")]
    InvalidTimestamp {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The renewal date precedes the filing date.
    #[error("asset \"{asset_id}\": renewal date {renewal_date} precedes filing date {filing_date}")]
    RenewalBeforeFiling {
        /// The inconsistent asset.
        asset_id: String,
        /// The stored filing date.
        filing_date: String,
        /// The stored renewal date.
        renewal_date: String,
    },

    /// The asset status requires a renewal date but none is set.
    #[error("asset \"{asset_id}\": status {status} requires a renewal date")]
    MissingRenewalDate {
        /// The inconsistent asset.
        asset_id: String,
        /// The stored status.
        status: String,
    },

    /// Status string is not one of the known statuses.
    #[error("invalid status: \"{0}\" (expected active|needs_filing|overdue|abandoned)")]
    InvalidStatus(String),

    /// Stored status disagrees with the urgency computed from the dates.
    ///
    /// Reported as a finding, never silently overwritten.
    #[error("asset \"{asset_id}\": stored status {stored} but dates imply {expected}")]
    StatusMismatch {
        /// The inconsistent asset.
        asset_id: String,
        /// The stored status.
        stored: String,
        /// The status the dates imply.
        expected: String,
    },

    /// A renewal filing must advance the renewal date forward.
    #[error("asset \"{asset_id}\": next renewal date {next} does not advance past {current}")]
    NonForwardRenewal {
        /// The asset being renewed.
        asset_id: String,
        /// The current renewal date.
        current: String,
        /// The rejected next renewal date.
        next: String,
    },
}

/// Errors reading or writing the registry and alert stores.
///
/// Always fatal for the current invocation: the batch aborts before any
/// dispatch rather than acting on a partial registry.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The store file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The store path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The store file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// The store path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The store content is not structurally valid.
    #[error("malformed store {path}: {reason}")]
    Malformed {
        /// The store path.
        path: String,
        /// What was wrong with the content.
        reason: String,
    },

    /// Another invocation holds the store lock.
    #[error("store lock is held by another process: {path}")]
    LockHeld {
        /// The lock file path.
        path: String,
    },

    /// The store lock could not be acquired for a reason other than contention.
    #[error("failed to acquire store lock {path}: {source}")]
    Lock {
        /// The lock file path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors dispatching a single obligation to an external sink.
///
/// Per-obligation and non-fatal: the failed obligation is not marked as
/// alerted and is retried on the next cycle.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The sink endpoint could not be reached.
    #[error("sink unavailable ({endpoint}): {reason}")]
    Unavailable {
        /// The sink endpoint or name.
        endpoint: String,
        /// Why the sink was unreachable.
        reason: String,
    },

    /// The sink rejected the action.
    #[error("sink rejected action {key}: HTTP {status}")]
    Rejected {
        /// Idempotency key of the rejected action.
        key: String,
        /// HTTP status code returned by the sink.
        status: u16,
    },

    /// The sink did not respond within the bounded timeout.
    #[error("sink timed out for action {key}")]
    Timeout {
        /// Idempotency key of the timed-out action.
        key: String,
    },

    /// Local I/O failure while emitting the action.
    #[error("failed to emit action {key}: {source}")]
    Io {
        /// Idempotency key of the failed action.
        key: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
