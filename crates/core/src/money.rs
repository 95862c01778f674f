//! Fixed-point currency amounts.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// A currency amount held as integer **cents**.
///
/// Prices, fees, and payouts are kept in the smallest currency unit so fee
/// arithmetic and round-trip checks stay exact. Negative amounts are
/// representable (profit can be a loss); operations that require a
/// non-negative amount validate at the call site.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, other: Money) -> DomainResult<Money> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or_else(|| DomainError::invariant("amount overflow"))
    }

    pub fn checked_sub(self, other: Money) -> DomainResult<Money> {
        self.0
            .checked_sub(other.0)
            .map(Money)
            .ok_or_else(|| DomainError::invariant("amount overflow"))
    }
}

impl ValueObject for Money {}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl FromStr for Money {
    type Err = DomainError;

    /// Parse a decimal currency string (`"12"`, `"12.9"`, `"12.95"`, `"-0.50"`).
    ///
    /// At most two fraction digits are accepted; anything finer would silently
    /// lose precision, so it is rejected instead.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, s) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(DomainError::validation("empty amount"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::validation(format!("invalid amount: {s:?}")));
        }
        if frac.len() > 2 || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::validation(format!("invalid amount: {s:?}")));
        }

        let dollars: i64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| DomainError::validation(format!("amount out of range: {s:?}")))?
        };

        let mut cents_part: i64 = 0;
        if !frac.is_empty() {
            cents_part = frac.parse::<i64>().unwrap_or(0);
            if frac.len() == 1 {
                cents_part *= 10;
            }
        }

        let cents = dollars
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents_part))
            .ok_or_else(|| DomainError::validation(format!("amount out of range: {s:?}")))?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}
