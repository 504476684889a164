//! Fixed-precision monetary amounts stored as integer minor units.

use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const CENTS_PER_UNIT: i64 = 100;
const BPS_PER_WHOLE: i128 = 10_000;
const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥', '₹', '৳'];

/// Monetary amount in cents. All allocation arithmetic happens on this type so
/// splits and caps never drift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyParseError {
    #[error("`{0}` is not a number")]
    NotANumber(String),
    #[error("`{0}` is too large")]
    Overflow(String),
}

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn from_units(units: i64) -> Self {
        Self(units * CENTS_PER_UNIT)
    }

    /// Converts a floating-point amount in currency units, rounding half away
    /// from zero to the nearest cent. Returns `None` for NaN and infinities.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let cents = (value * CENTS_PER_UNIT as f64).round();
        if cents.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(Self(cents as i64))
    }

    /// Parses user input such as `12.5`, `$1,200.00` or `+3`.
    ///
    /// Digits past the second decimal place round half away from zero. Zero and
    /// negative values parse successfully; positivity is a business rule checked
    /// by the allocation engine, not a syntax rule.
    pub fn parse(input: &str) -> Result<Self, MoneyParseError> {
        let raw = input.trim();
        let cleaned: String = raw
            .chars()
            .filter(|ch| !matches!(ch, ',' | '_' | ' '))
            .collect();
        let (negative, unsigned) = match cleaned.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
        };
        let unsigned = unsigned.trim_start_matches(CURRENCY_SYMBOLS);

        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };
        let is_digits = |part: &str| part.chars().all(|ch| ch.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction)
        {
            return Err(MoneyParseError::NotANumber(raw.to_string()));
        }

        let overflow = || MoneyParseError::Overflow(raw.to_string());
        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let digits: Vec<i64> = fraction
            .chars()
            .filter_map(|ch| ch.to_digit(10).map(i64::from))
            .collect();
        let tenths = digits.first().copied().unwrap_or(0);
        let hundredths = digits.get(1).copied().unwrap_or(0);
        let round_up = digits.get(2).map(|digit| *digit >= 5).unwrap_or(false);

        let mut cents = whole_value
            .checked_mul(CENTS_PER_UNIT)
            .and_then(|value| value.checked_add(tenths * 10 + hundredths))
            .ok_or_else(overflow)?;
        if round_up {
            cents = cents.checked_add(1).ok_or_else(overflow)?;
        }
        Ok(Self(if negative { -cents } else { cents }))
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / CENTS_PER_UNIT as f64
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Absolute value.
    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// `self - other`, floored at zero.
    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0).max(0))
    }

    /// `None` when the sum does not fit in an `i64` count of cents.
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Applies a rate expressed in basis points (`800` = 8%), rounding half away
    /// from zero.
    pub fn percent_bps(self, bps: u32) -> Money {
        let product = self.0 as i128 * bps as i128;
        let mut quotient = product / BPS_PER_WHOLE;
        let remainder = product % BPS_PER_WHOLE;
        if remainder.abs() * 2 >= BPS_PER_WHOLE {
            quotient += product.signum();
        }
        Money(quotient as i64)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(
            f,
            "{}{}.{:02}",
            sign,
            abs / CENTS_PER_UNIT as u64,
            abs % CENTS_PER_UNIT as u64
        )
    }
}

impl FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

// Snapshots carry plain currency-unit numbers (`12.5`) on the wire.
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Money::from_f64(value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid monetary amount {value}")))
    }
}
