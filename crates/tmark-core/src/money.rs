//! # Monetary Amounts — Integer Cents Only
//!
//! Filing and renewal fees are stored as integer cents. Floats never enter
//! the system: a `3900.00` in a JSON export and a `3899.9999999` from float
//! arithmetic must be impossible to confuse, so the representation rejects
//! floats at the boundary instead of rounding them.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A monetary amount in integer US cents.
///
/// Serializes as a plain integer (cents). Totals use checked addition;
/// a portfolio that overflows `u64` cents is a data-entry problem, not a
/// wrap-around.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Zero dollars.
    pub const ZERO: Money = Money(0);

    /// Construct from integer cents.
    pub fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Construct from whole dollars.
    pub fn from_dollars(dollars: u64) -> Self {
        Self(dollars * 100)
    }

    /// Parse a dollar amount string: `"3900"`, `"3900.00"`, or `"$3,900.00"`.
    ///
    /// At most two decimal places are accepted. Anything that would require
    /// rounding is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAmount`] for empty input, more
    /// than two decimals, or non-numeric characters.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let cleaned: String = s
            .trim()
            .trim_start_matches('$')
            .chars()
            .filter(|c| *c != ',')
            .collect();
        if cleaned.is_empty() {
            return Err(ValidationError::InvalidAmount(s.to_string()));
        }

        let (whole, frac) = match cleaned.split_once('.') {
            None => (cleaned.as_str(), ""),
            Some((w, f)) => (w, f),
        };
        if whole.is_empty()
            || frac.len() > 2
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ValidationError::InvalidAmount(s.to_string()));
        }

        let dollars: u64 = whole
            .parse()
            .map_err(|_| ValidationError::InvalidAmount(s.to_string()))?;
        let cents: u64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u64>().unwrap_or(0) * 10,
            _ => frac.parse::<u64>().unwrap_or(0),
        };

        dollars
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidAmount(s.to_string()))
    }

    /// The amount in integer cents.
    pub fn cents(&self) -> u64 {
        self.0
    }

    /// Checked addition, `None` on overflow.
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Sum an iterator of amounts, saturating at `u64::MAX` cents.
    pub fn sum<I: IntoIterator<Item = Money>>(amounts: I) -> Money {
        amounts
            .into_iter()
            .fold(Money::ZERO, |acc, m| {
                acc.checked_add(m).unwrap_or(Money(u64::MAX))
            })
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}
