//! # Store Traits
//!
//! Narrow interfaces to the durable collaborators: the asset registry and
//! the alert-record store. The engine stays free of I/O; `tmark-store`
//! provides the JSON-file implementations.

use tmark_core::{Asset, PersistenceError};

use crate::dedup::AlertState;
use crate::evaluate::ExcludedAsset;

/// What a registry load produced.
///
/// Records whose dates fail to parse are rejected individually — the
/// batch continues for the well-formed rest, and the rejects are merged
/// into the evaluation's exclusion report. Damage to the store as a whole
/// (unreadable file, invalid JSON, duplicate ids) is a
/// [`PersistenceError`] instead: fatal, before any dispatch.
#[derive(Debug, Default)]
pub struct RegistrySnapshot {
    /// Well-formed assets.
    pub assets: Vec<Asset>,
    /// Individually rejected records with reasons.
    pub rejected: Vec<ExcludedAsset>,
}

/// Durable collection of asset records, loaded and saved as a whole.
pub trait RegistryStore {
    /// Load the registry.
    fn load(&self) -> Result<RegistrySnapshot, PersistenceError>;

    /// Persist the full asset collection.
    fn save(&self, assets: &[Asset]) -> Result<(), PersistenceError>;
}

/// Durable set of fired-alert markers.
pub trait AlertStore {
    /// Load the alert state; an absent store is an empty state.
    fn load(&self) -> Result<AlertState, PersistenceError>;

    /// Persist the alert state.
    fn save(&self, state: &AlertState) -> Result<(), PersistenceError>;
}
