//! Fixed-point monetary amounts stored as whole cents.

use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

const CENTS_PER_UNIT: i64 = 100;
/// Largest magnitude accepted from text or JSON: ten trillion units.
pub const MAX_ABS_CENTS: i64 = 1_000_000_000_000_000;

/// A signed amount with two-digit cent precision.
///
/// All arithmetic stays in integer cents so that rounding and splitting are
/// exact; decimal text and JSON numbers are converted at the boundary with
/// half-away-from-zero rounding to the nearest cent.
///
/// Parsed amounts are bounded by [`MAX_ABS_CENTS`], which leaves room for
/// about nine thousand maximal amounts to be summed without overflowing the
/// `i64` used by the arithmetic operators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);
    pub const CENT: Money = Money(1);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Converts an arbitrary decimal to cents, rounding half away from zero.
    pub fn from_decimal(value: Decimal) -> Result<Self, MoneyError> {
        let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let cents = rounded
            .checked_mul(Decimal::from(CENTS_PER_UNIT))
            .and_then(|scaled| scaled.trunc().to_i64())
            .ok_or(MoneyError::OutOfRange)?;
        Self::bounded(cents)
    }

    fn bounded(cents: i64) -> Result<Self, MoneyError> {
        if cents.checked_abs().map_or(true, |abs| abs > MAX_ABS_CENTS) {
            return Err(MoneyError::OutOfRange);
        }
        Ok(Self(cents))
    }

    /// Converts a float through its shortest textual form so `4.5` maps to 450 cents.
    pub fn from_f64(value: f64) -> Result<Self, MoneyError> {
        if !value.is_finite() {
            return Err(MoneyError::OutOfRange);
        }
        Self::parse(&value.to_string())
    }

    pub fn parse(raw: &str) -> Result<Self, MoneyError> {
        let trimmed = raw.trim();
        let decimal =
            Decimal::from_str(trimmed).map_err(|_| MoneyError::Parse(trimmed.to_string()))?;
        Self::from_decimal(decimal)
    }

    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / CENTS_PER_UNIT as f64
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Splits the amount into `parts` cent-exact shares.
    ///
    /// Every share gets the floored per-part cent count and the leftover cents
    /// are handed out one by one starting with the first share, so the shares
    /// sum back to `self` and differ by at most one cent.
    pub fn split(self, parts: usize) -> Result<Vec<Money>, MoneyError> {
        if parts == 0 {
            return Err(MoneyError::InvalidSplit);
        }
        let count = i64::try_from(parts).map_err(|_| MoneyError::OutOfRange)?;
        let base = self.0.div_euclid(count);
        let remainder = self.0.rem_euclid(count);
        Ok((0..count)
            .map(|index| {
                if index < remainder {
                    Money(base + 1)
                } else {
                    Money(base)
                }
            })
            .collect())
    }

    /// Returns `self * numerator / denominator` rounded half-to-even to the cent.
    pub fn scale_half_even(self, numerator: i64, denominator: i64) -> Result<Self, MoneyError> {
        if denominator == 0 {
            return Err(MoneyError::OutOfRange);
        }
        let (mut p, mut q) = (self.0 as i128 * numerator as i128, denominator as i128);
        if q < 0 {
            p = -p;
            q = -q;
        }
        let floor = p.div_euclid(q);
        let twice_rem = 2 * p.rem_euclid(q);
        let rounded = match twice_rem.cmp(&q) {
            std::cmp::Ordering::Greater => floor + 1,
            std::cmp::Ordering::Less => floor,
            std::cmp::Ordering::Equal if floor.rem_euclid(2) == 0 => floor,
            std::cmp::Ordering::Equal => floor + 1,
        };
        i64::try_from(rounded)
            .map(Money)
            .map_err(|_| MoneyError::OutOfRange)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_decimal(), f)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

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

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
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

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal amount as a number or a string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(CENTS_PER_UNIT)
            .ok_or(MoneyError::OutOfRange)
            .and_then(Money::bounded)
            .map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .map_err(|_| E::custom(MoneyError::OutOfRange))
            .and_then(|v| self.visit_i64(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Money::from_f64(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        Money::parse(v).map_err(E::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Errors raised when converting or splitting [`Money`] values.
pub enum MoneyError {
    Parse(String),
    OutOfRange,
    InvalidSplit,
}

impl fmt::Display for MoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyError::Parse(raw) => write!(f, "`{raw}` is not a valid amount"),
            MoneyError::OutOfRange => f.write_str("amount is out of range"),
            MoneyError::InvalidSplit => f.write_str("an amount must be split in at least one part"),
        }
    }
}

impl std::error::Error for MoneyError {}
