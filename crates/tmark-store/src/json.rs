//! # JSON File Stores
//!
//! The registry store holds the portfolio as a JSON array of asset
//! records; the alert store holds fired-alert markers as a JSON array of
//! flat entries. An absent file is an empty store for both.
//!
//! ## Damage policy
//!
//! A record that fails to deserialize (bad date, bad id, bad amount) is
//! rejected individually with its reason and the load continues, so one
//! damaged record cannot silence alerts for the rest of the portfolio.
//! Damage to the file as a whole, or two records claiming the same id,
//! is fatal: the caller gets a [`PersistenceError`] and must not act on
//! the partial registry.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tmark_core::{Asset, AssetId, CalendarDate, LicensingAgreement, PersistenceError, Timestamp};
use tmark_engine::dedup::{AlertKey, AlertRecord, AlertState};
use tmark_engine::evaluate::ExcludedAsset;
use tmark_engine::obligation::UrgencyTier;
use tmark_engine::store::{AlertStore, RegistrySnapshot, RegistryStore};

// ─── Shared file helpers ─────────────────────────────────────────────

fn read_to_string(path: &Path) -> Result<Option<String>, PersistenceError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(PersistenceError::Read {
            path: path.display().to_string(),
            source: err,
        }),
    }
}

/// Write through a temp file in the same directory, then rename over the
/// target. The rename is atomic on POSIX filesystems, so a crash leaves
/// either the old content or the new, never a truncated mix.
fn write_atomic(path: &Path, contents: &str) -> Result<(), PersistenceError> {
    let write_err = |source| PersistenceError::Write {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
    }

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents).map_err(|source| PersistenceError::Write {
        path: tmp.display().to_string(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(write_err)
}

// ─── Registry store ──────────────────────────────────────────────────

/// The portfolio registry as a pretty-printed JSON array of assets.
#[derive(Debug, Clone)]
pub struct JsonRegistryStore {
    path: PathBuf,
}

impl JsonRegistryStore {
    /// Store backed by the given file. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RegistryStore for JsonRegistryStore {
    fn load(&self) -> Result<RegistrySnapshot, PersistenceError> {
        let Some(text) = read_to_string(&self.path)? else {
            return Ok(RegistrySnapshot::default());
        };

        // The outer array must parse; individual records may not.
        let raw: Vec<Value> =
            serde_json::from_str(&text).map_err(|err| PersistenceError::Malformed {
                path: self.path.display().to_string(),
                reason: format!("not a JSON array of asset records: {err}"),
            })?;

        let mut snapshot = RegistrySnapshot::default();
        let mut seen: HashSet<AssetId> = HashSet::new();
        for (index, value) in raw.into_iter().enumerate() {
            let raw_id = value
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_else(|| format!("(record #{index})"));
            match serde_json::from_value::<Asset>(value) {
                Ok(asset) => {
                    if !seen.insert(asset.id.clone()) {
                        return Err(PersistenceError::Malformed {
                            path: self.path.display().to_string(),
                            reason: format!("duplicate asset id {}", asset.id),
                        });
                    }
                    snapshot.assets.push(asset);
                }
                Err(err) => {
                    tracing::warn!(asset_id = %raw_id, error = %err, "rejecting damaged registry record");
                    snapshot.rejected.push(ExcludedAsset {
                        asset_id: raw_id,
                        reason: err.to_string(),
                    });
                }
            }
        }
        Ok(snapshot)
    }

    fn save(&self, assets: &[Asset]) -> Result<(), PersistenceError> {
        let json =
            serde_json::to_string_pretty(assets).map_err(|err| PersistenceError::Malformed {
                path: self.path.display().to_string(),
                reason: err.to_string(),
            })?;
        write_atomic(&self.path, &json)
    }
}

// ─── Alert store ─────────────────────────────────────────────────────

/// One persisted fired-alert marker, flattened for the file format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredAlert {
    asset_id: AssetId,
    tier: UrgencyTier,
    due_date: CalendarDate,
    alerted_at: Timestamp,
}

/// Fired-alert markers as a JSON array, sorted by (asset, tier) so saves
/// are deterministic and diffs stay readable.
#[derive(Debug, Clone)]
pub struct JsonAlertStore {
    path: PathBuf,
}

impl JsonAlertStore {
    /// Store backed by the given file. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AlertStore for JsonAlertStore {
    fn load(&self) -> Result<AlertState, PersistenceError> {
        let Some(text) = read_to_string(&self.path)? else {
            return Ok(AlertState::new());
        };
        let stored: Vec<StoredAlert> =
            serde_json::from_str(&text).map_err(|err| PersistenceError::Malformed {
                path: self.path.display().to_string(),
                reason: err.to_string(),
            })?;
        Ok(AlertState::from_records(stored.into_iter().map(|entry| {
            (
                AlertKey {
                    asset_id: entry.asset_id,
                    tier: entry.tier,
                },
                AlertRecord {
                    due_date: entry.due_date,
                    alerted_at: entry.alerted_at,
                },
            )
        })))
    }

    fn save(&self, state: &AlertState) -> Result<(), PersistenceError> {
        let mut stored: Vec<StoredAlert> = state
            .records()
            .map(|(key, record)| StoredAlert {
                asset_id: key.asset_id.clone(),
                tier: key.tier,
                due_date: record.due_date,
                alerted_at: record.alerted_at,
            })
            .collect();
        stored.sort_by(|a, b| (&a.asset_id, a.tier).cmp(&(&b.asset_id, b.tier)));
        let json =
            serde_json::to_string_pretty(&stored).map_err(|err| PersistenceError::Malformed {
                path: self.path.display().to_string(),
                reason: err.to_string(),
            })?;
        write_atomic(&self.path, &json)
    }
}

// ─── Licensing store ─────────────────────────────────────────────────

/// Licensing agreements as a JSON array, read-only from the tracker's
/// point of view. The file is maintained by whoever manages the deals;
/// an absent file means no agreements, and a damaged file is fatal
/// rather than partially trusted.
#[derive(Debug, Clone)]
pub struct JsonLicensingStore {
    path: PathBuf,
}

impl JsonLicensingStore {
    /// Store backed by the given file. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every agreement, or an empty list if the file is absent.
    pub fn load(&self) -> Result<Vec<LicensingAgreement>, PersistenceError> {
        let Some(text) = read_to_string(&self.path)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&text).map_err(|err| PersistenceError::Malformed {
            path: self.path.display().to_string(),
            reason: format!("not a JSON array of licensing agreements: {err}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tmark_core::{AssetStatus, Jurisdiction, Money};
    use tmark_engine::obligation::{Obligation, ObligationKind};

    fn asset(id: &str, renewal: &str) -> Asset {
        Asset::new(
            AssetId::new(id).unwrap(),
            "GreenThumb",
            Jurisdiction::new("USPTO").unwrap(),
            Some(CalendarDate::parse("2020-03-15").unwrap()),
            Some(CalendarDate::parse(renewal).unwrap()),
            AssetStatus::Active,
            Money::from_dollars(525),
            "tests",
        )
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonRegistryStore::new(dir.path().join("assets.json"));
        let snapshot = store.load().unwrap();
        assert!(snapshot.assets.is_empty());
        assert!(snapshot.rejected.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonRegistryStore::new(dir.path().join("assets.json"));
        let assets = vec![asset("US-TM-001", "2026-09-28"), asset("EU-TM-002", "2027-01-10")];
        store.save(&assets).unwrap();

        let snapshot = store.load().unwrap();
        assert_eq!(snapshot.assets, assets);
        assert!(snapshot.rejected.is_empty());
        // No leftover temp file after the rename.
        assert!(!dir.path().join("assets.tmp").exists());
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonRegistryStore::new(dir.path().join("nested/deep/assets.json"));
        store.save(&[asset("US-TM-001", "2026-09-28")]).unwrap();
        assert_eq!(store.load().unwrap().assets.len(), 1);
    }

    #[test]
    fn damaged_record_is_rejected_individually() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assets.json");
        let good = serde_json::to_value(asset("US-TM-001", "2026-09-28")).unwrap();
        let text = format!(
            "[{}, {{\"id\": \"BAD TM\", \"name\": \"x\", \"jurisdiction\": \"USPTO\", \
             \"renewal_date\": \"2026-13-45\", \"status\": \"active\", \"cost\": 0}}]",
            good
        );
        fs::write(&path, text).unwrap();

        let snapshot = JsonRegistryStore::new(&path).load().unwrap();
        assert_eq!(snapshot.assets.len(), 1);
        assert_eq!(snapshot.assets[0].id.as_str(), "US-TM-001");
        assert_eq!(snapshot.rejected.len(), 1);
        assert_eq!(snapshot.rejected[0].asset_id, "BAD TM");
    }

    #[test]
    fn invalid_json_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assets.json");
        fs::write(&path, "{ not json").unwrap();
        let err = JsonRegistryStore::new(&path).load().unwrap_err();
        assert!(matches!(err, PersistenceError::Malformed { .. }));
    }

    #[test]
    fn duplicate_id_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assets.json");
        let assets = vec![asset("US-TM-001", "2026-09-28"), asset("US-TM-001", "2027-01-10")];
        fs::write(&path, serde_json::to_string(&assets).unwrap()).unwrap();
        let err = JsonRegistryStore::new(&path).load().unwrap_err();
        match err {
            PersistenceError::Malformed { reason, .. } => {
                assert!(reason.contains("duplicate asset id US-TM-001"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn alert_store_round_trips_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonAlertStore::new(dir.path().join("alerts.json"));
        assert!(store.load().unwrap().is_empty());

        let now = Timestamp::parse("2026-08-30T06:00:00Z").unwrap();
        let mut state = AlertState::new();
        for (id, tier, due) in [
            ("ZZ-TM", UrgencyTier::Within60, "2026-10-20"),
            ("AA-TM", UrgencyTier::Within30, "2026-09-10"),
        ] {
            state.mark_alerted(
                &Obligation {
                    asset_id: AssetId::new(id).unwrap(),
                    kind: ObligationKind::RenewalDue,
                    tier,
                    due_date: CalendarDate::parse(due).unwrap(),
                    days_remaining: 11,
                    cost: Money::from_dollars(525),
                },
                now,
            );
        }
        store.save(&state).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded, state);

        // Sorted output: AA-TM before ZZ-TM.
        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.find("AA-TM").unwrap() < text.find("ZZ-TM").unwrap());
    }

    #[test]
    fn missing_licensing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonLicensingStore::new(dir.path().join("licensing_agreements.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn licensing_store_loads_agreements() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("licensing_agreements.json");
        fs::write(
            &path,
            r#"[{
                "id": 1,
                "licensee": "Barney's Farm (California)",
                "brand": "DR. GREENTHUMB",
                "territories": ["california", "arizona"],
                "status": "active",
                "start_date": "2024-01-01",
                "royalty_rate": "8%"
            }]"#,
        )
        .unwrap();

        let agreements = JsonLicensingStore::new(&path).load().unwrap();
        assert_eq!(agreements.len(), 1);
        assert!(agreements[0].is_active());
        assert_eq!(agreements[0].territories.len(), 2);
    }

    #[test]
    fn damaged_licensing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("licensing_agreements.json");
        fs::write(&path, "{ not json").unwrap();
        let err = JsonLicensingStore::new(&path).load().unwrap_err();
        assert!(matches!(err, PersistenceError::Malformed { .. }));
    }
}
