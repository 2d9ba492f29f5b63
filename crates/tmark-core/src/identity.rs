//! # Identity Newtypes
//!
//! Domain-primitive newtypes for the tracker's identifiers. An [`AssetId`]
//! is a distinct type from a plain string — you cannot pass one where a
//! jurisdiction is expected, and an invalid identifier cannot be
//! constructed in the first place.
//!
//! ## Validation
//!
//! Asset identifiers are operator-assigned slugs (e.g. `AZ-TM`,
//! `CA-TM.cannabis`), stable for the asset's lifetime. They appear in
//! idempotency keys and outbox filenames, so the charset is restricted to
//! characters that are safe in both.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum length of an asset identifier.
const ASSET_ID_MAX_LEN: usize = 64;

/// A stable, unique identifier for one tracked trademark registration.
///
/// Assigned at creation, immutable for the asset's lifetime. Ordered so
/// that obligation tie-breaks are deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct AssetId(String);

impl AssetId {
    /// Create an asset identifier, validating the slug format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAssetId`] if the string is empty,
    /// longer than 64 characters, or contains characters outside
    /// `[A-Za-z0-9._-]`.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.is_empty()
            || s.len() > ASSET_ID_MAX_LEN
            || !s
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err(ValidationError::InvalidAssetId(s));
        }
        Ok(Self(s))
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AssetId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The filing scope of a trademark registration.
///
/// Free text by design: the portfolio spans state registries ("Arizona"),
/// federal filings ("USPTO-Federal"), and foreign offices ("EUIPO"), and
/// registries disagree on naming. Non-empty is the only structural rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct Jurisdiction(String);

impl Jurisdiction {
    /// Create a jurisdiction, rejecting empty or whitespace-only input.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidJurisdiction`] for empty input.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.trim().is_empty() {
            return Err(ValidationError::InvalidJurisdiction);
        }
        Ok(Self(s))
    }

    /// Access the jurisdiction as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Jurisdiction {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── AssetId ──────────────────────────────────────────────────────

    #[test]
    fn asset_id_accepts_slug() {
        let id = AssetId::new("AZ-TM").unwrap();
        assert_eq!(id.as_str(), "AZ-TM");
        assert_eq!(id.to_string(), "AZ-TM");
    }

    #[test]
    fn asset_id_accepts_dots_and_underscores() {
        assert!(AssetId::new("CA-TM.cannabis_2").is_ok());
    }

    #[test]
    fn asset_id_rejects_empty() {
        assert!(AssetId::new("").is_err());
    }

    #[test]
    fn asset_id_rejects_spaces_and_separators() {
        assert!(AssetId::new("AZ TM").is_err());
        assert!(AssetId::new("AZ/TM").is_err());
        assert!(AssetId::new("AZ:TM").is_err());
    }

    #[test]
    fn asset_id_rejects_overlong() {
        let long = "a".repeat(65);
        assert!(AssetId::new(long).is_err());
        let max = "a".repeat(64);
        assert!(AssetId::new(max).is_ok());
    }

    #[test]
    fn asset_id_ordering_is_lexicographic() {
        let a = AssetId::new("AZ-TM").unwrap();
        let b = AssetId::new("CA-TM").unwrap();
        assert!(a < b);
    }

    #[test]
    fn asset_id_serde_roundtrip() {
        let id = AssetId::new("AZ-TM").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"AZ-TM\"");
        let parsed: AssetId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn asset_id_deserialization_validates() {
        assert!(serde_json::from_str::<AssetId>("\"BAD TM\"").is_err());
        assert!(serde_json::from_str::<AssetId>("\"\"").is_err());
    }

    // ── Jurisdiction ─────────────────────────────────────────────────

    #[test]
    fn jurisdiction_accepts_free_text() {
        let j = Jurisdiction::new("New Mexico").unwrap();
        assert_eq!(j.as_str(), "New Mexico");
    }

    #[test]
    fn jurisdiction_rejects_empty_and_whitespace() {
        assert!(Jurisdiction::new("").is_err());
        assert!(Jurisdiction::new("   ").is_err());
    }
}
