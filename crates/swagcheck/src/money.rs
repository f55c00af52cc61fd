//! Exact prices.
//!
//! Prices are rendered as `$29.99`, sometimes behind a label such as
//! `Item total: $`. They are parsed into whole cents so sums compare exactly.

use crate::result::{SwagError, SwagResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Amount in US cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Zero dollars
    pub const ZERO: Self = Self(0);

    /// From a cent amount
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Cent amount
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Parse rendered text such as `$29.99` or `Tax: $6.40`.
    ///
    /// Everything up to and including the first `$` is ignored. The amount
    /// must have at most two decimals.
    pub fn parse(text: &str) -> SwagResult<Self> {
        let err = || SwagError::Parse {
            what: "price",
            text: text.to_string(),
        };
        let amount = text.split_once('$').map_or(text, |(_, rest)| rest).trim();
        let (whole, frac) = amount.split_once('.').unwrap_or((amount, ""));
        if whole.is_empty() || frac.len() > 2 || !all_digits(whole) || !all_digits(frac) {
            return Err(err());
        }
        let dollars: i64 = whole.parse().map_err(|_| err())?;
        let cents: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| err())? * 10,
            _ => frac.parse().map_err(|_| err())?,
        };
        dollars
            .checked_mul(100)
            .and_then(|d| d.checked_add(cents))
            .map(Self)
            .ok_or_else(err)
    }
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_labelled() {
        assert_eq!(Money::parse("$29.99").unwrap().cents(), 2999);
        assert_eq!(Money::parse("Item total: $79.98").unwrap().cents(), 7998);
        assert_eq!(Money::parse("Tax: $6.40").unwrap().cents(), 640);
        assert_eq!(Money::parse("Total: $86.38").unwrap().cents(), 8638);
    }

    #[test]
    fn test_parse_short_fractions() {
        assert_eq!(Money::parse("$7").unwrap().cents(), 700);
        assert_eq!(Money::parse("$7.9").unwrap().cents(), 790);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for text in ["", "$", "$abc", "$1.234", "Total: $1,000.00", "$-3.00"] {
            let err = Money::parse(text).unwrap_err();
            assert!(matches!(err, SwagError::Parse { what: "price", .. }), "{text}");
        }
    }

    #[test]
    fn test_sum_is_exact() {
        let total: Money = [2999, 4999].into_iter().map(Money::from_cents).sum();
        assert_eq!(total, Money::parse("79.98").unwrap());
        assert_eq!(total.to_string(), "$79.98");
    }

    #[test]
    fn test_display_pads_cents() {
        assert_eq!(Money::from_cents(799).to_string(), "$7.99");
        assert_eq!(Money::from_cents(640).to_string(), "$6.40");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
    }
}
