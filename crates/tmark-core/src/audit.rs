//! # Append-Only Audit Log
//!
//! Every mutation of an asset's status, renewal date, or cost appends
//! exactly one entry here, in the same operation as the mutation itself.
//!
//! The log is structurally append-only: the entry vector is private and
//! the only mutating method is [`AuditLog::append`]. There is no API that
//! removes or rewrites an entry, so the "length only grows" invariant is
//! enforced by the type rather than by convention.

use serde::{Deserialize, Serialize};

use crate::temporal::Timestamp;

/// What a single audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Asset was created.
    Created,
    /// A renewal filing was recorded and the renewal date advanced.
    RenewalRecorded,
    /// Status was changed.
    StatusChanged,
    /// Cost was changed.
    CostChanged,
    /// An unfiled asset was filed (filing and renewal dates set).
    Filed,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::RenewalRecorded => "renewal_recorded",
            Self::StatusChanged => "status_changed",
            Self::CostChanged => "cost_changed",
            Self::Filed => "filed",
        };
        f.write_str(s)
    }
}

/// One immutable audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the mutation happened.
    pub timestamp: Timestamp,
    /// Who performed it (operator name or "system").
    pub actor: String,
    /// What kind of mutation it was.
    pub action: AuditAction,
    /// Human-readable detail (old and new values).
    pub detail: String,
}

/// An ordered, append-only sequence of audit entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditLog(Vec<AuditEntry>);

impl AuditLog {
    /// An empty log.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append one entry. The only mutating operation on the log.
    pub fn append(&mut self, entry: AuditEntry) {
        self.0.push(entry);
    }

    /// Number of entries. Only ever grows.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the log has no entries yet.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Read-only iteration in append order.
    pub fn entries(&self) -> impl Iterator<Item = &AuditEntry> {
        self.0.iter()
    }

    /// The most recent entry, if any.
    pub fn last(&self) -> Option<&AuditEntry> {
        self.0.last()
    }
}
