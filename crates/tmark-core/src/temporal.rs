//! # Temporal Types — Calendar Dates and UTC Timestamps
//!
//! Two distinct kinds of time live in the tracker and they must not mix:
//!
//! - [`CalendarDate`] — a pure calendar date (`YYYY-MM-DD`). Filing and
//!   renewal deadlines are calendar dates in the records of a trademark
//!   office; there is no timezone to get wrong, and "days remaining" is
//!   plain calendar arithmetic.
//!
//! - [`Timestamp`] — a UTC-only instant with Z suffix, truncated to
//!   seconds precision, used for audit entries and alert records. Non-UTC
//!   inputs are **rejected at construction** — there is no silent
//!   conversion that could introduce ambiguity.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// ─── CalendarDate ────────────────────────────────────────────────────

/// A pure calendar date with no time-of-day or timezone component.
///
/// Deadline arithmetic ([`CalendarDate::days_until`]) is signed whole-day
/// subtraction: a negative result means the date is in the past.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Construct from year, month, day.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Parse a strict `YYYY-MM-DD` date string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDate`] with the offending value
    /// and parse reason. The `asset_id`/`field` context is filled in by
    /// the caller that knows which record the string came from.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|e| ValidationError::InvalidDate {
                asset_id: String::new(),
                field: "date",
                value: s.to_string(),
                reason: e.to_string(),
            })
    }

    /// Today's date in UTC.
    ///
    /// Only the outermost caller (the CLI) should use this; all evaluation
    /// logic takes the reference date as an explicit parameter.
    pub fn today_utc() -> Self {
        Self(Utc::now().date_naive())
    }

    /// Signed number of calendar days from `reference` to `self`.
    ///
    /// Positive when `self` is in the future relative to `reference`,
    /// negative when it has already passed.
    pub fn days_until(&self, reference: CalendarDate) -> i64 {
        (self.0 - reference.0).num_days()
    }

    /// The date `days` calendar days after this one.
    pub fn plus_days(&self, days: i64) -> Self {
        Self(self.0 + chrono::Duration::days(days))
    }
}

impl std::fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

// ─── Timestamp ───────────────────────────────────────────────────────

/// A UTC-only timestamp, truncated to seconds precision.
///
/// Used for audit entries and alert records, where "when did this
/// happen" must serialize identically everywhere: `YYYY-MM-DDTHH:MM:SSZ`,
/// no sub-seconds, no `+00:00`, always `Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse a timestamp from an RFC 3339 string.
    ///
    /// **Rejects non-UTC inputs.** Only the `Z` suffix is accepted — even
    /// `+00:00`, which is semantically equivalent, is rejected so that the
    /// persisted representation is byte-for-byte deterministic.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimestamp`] if the string is not
    /// valid RFC 3339 or uses a non-Z offset.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        if !s.ends_with('Z') {
            return Err(ValidationError::InvalidTimestamp {
                value: s.to_string(),
                reason: "must use Z suffix (UTC only)".to_string(),
            });
        }
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| ValidationError::InvalidTimestamp {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// The calendar date (UTC) this instant falls on.
    pub fn date(&self) -> CalendarDate {
        CalendarDate(self.0.date_naive())
    }

    /// Render as ISO 8601 with Z suffix (e.g. `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    // ── CalendarDate ─────────────────────────────────────────────────

    #[test]
    fn date_parse_iso() {
        let d = CalendarDate::parse("2035-11-15").unwrap();
        assert_eq!(d.to_string(), "2035-11-15");
    }

    #[test]
    fn date_parse_rejects_garbage() {
        assert!(CalendarDate::parse("not-a-date").is_err());
        assert!(CalendarDate::parse("2035-13-01").is_err());
        assert!(CalendarDate::parse("2035-02-30").is_err());
        assert!(CalendarDate::parse("15/11/2035").is_err());
        assert!(CalendarDate::parse("").is_err());
    }

    #[test]
    fn days_until_future_is_positive() {
        let today = CalendarDate::from_ymd(2026, 8, 30).unwrap();
        let due = CalendarDate::from_ymd(2026, 9, 29).unwrap();
        assert_eq!(due.days_until(today), 30);
    }

    #[test]
    fn days_until_past_is_negative() {
        let today = CalendarDate::from_ymd(2026, 8, 30).unwrap();
        let due = CalendarDate::from_ymd(2026, 8, 25).unwrap();
        assert_eq!(due.days_until(today), -5);
    }

    #[test]
    fn days_until_same_day_is_zero() {
        let today = CalendarDate::from_ymd(2026, 8, 30).unwrap();
        assert_eq!(today.days_until(today), 0);
    }

    #[test]
    fn days_until_crosses_leap_day() {
        let today = CalendarDate::from_ymd(2028, 2, 28).unwrap();
        let due = CalendarDate::from_ymd(2028, 3, 1).unwrap();
        assert_eq!(due.days_until(today), 2);
    }

    #[test]
    fn plus_days_roundtrip() {
        let today = CalendarDate::from_ymd(2026, 8, 30).unwrap();
        let later = today.plus_days(90);
        assert_eq!(later.days_until(today), 90);
    }

    #[test]
    fn date_serde_is_iso_string() {
        let d = CalendarDate::from_ymd(2035, 11, 15).unwrap();
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "\"2035-11-15\"");
        let parsed: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, d);
    }

    #[test]
    fn date_ordering() {
        let a = CalendarDate::from_ymd(2026, 1, 1).unwrap();
        let b = CalendarDate::from_ymd(2026, 1, 2).unwrap();
        assert!(a < b);
    }

    // ── Timestamp ────────────────────────────────────────────────────

    #[test]
    fn timestamp_now_has_no_subseconds() {
        let ts = Timestamp::now();
        assert!(ts.to_iso8601().ends_with('Z'));
    }

    #[test]
    fn timestamp_parse_z_suffix_accepted() {
        let ts = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-01-15T12:00:00Z");
    }

    #[test]
    fn timestamp_parse_offset_rejected() {
        assert!(Timestamp::parse("2026-01-15T12:00:00+00:00").is_err());
        assert!(Timestamp::parse("2026-01-15T17:00:00+05:00").is_err());
    }

    #[test]
    fn timestamp_parse_subseconds_truncated() {
        let ts = Timestamp::parse("2026-01-15T12:00:00.123456Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-01-15T12:00:00Z");
    }

    #[test]
    fn timestamp_date_projection() {
        let dt = Utc.with_ymd_and_hms(2026, 1, 15, 23, 59, 59).unwrap();
        let ts = Timestamp::from_utc(dt);
        assert_eq!(ts.date().to_string(), "2026-01-15");
    }

    #[test]
    fn timestamp_serde_roundtrip() {
        let ts = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, parsed);
    }

    proptest! {
        #[test]
        fn plus_days_and_days_until_are_inverse(offset in -20_000i64..=20_000) {
            let base = CalendarDate::from_ymd(2026, 8, 30).unwrap();
            prop_assert_eq!(base.plus_days(offset).days_until(base), offset);
        }

        #[test]
        fn days_until_is_antisymmetric(a in -10_000i64..=10_000, b in -10_000i64..=10_000) {
            let base = CalendarDate::from_ymd(2026, 8, 30).unwrap();
            let (x, y) = (base.plus_days(a), base.plus_days(b));
            prop_assert_eq!(x.days_until(y), -y.days_until(x));
        }
    }
}
