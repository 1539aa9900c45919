use crate::error::QuoteError;
use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

/// A non-negative amount of currency.
///
/// Wraps `rust_decimal::Decimal` so that prices, surcharges and totals cannot be
/// built from negative input or above [`Money::MAX`]. Arithmetic is exact;
/// rounding happens only when a value is presented (see [`Money::rounded`]).
/// Sums and products saturate at `Decimal::MAX` instead of panicking.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);
    /// Largest amount accepted from configuration or user input.
    pub const MAX: Self = Self(dec!(10000000000));

    pub fn new(value: Decimal) -> Result<Self, QuoteError> {
        if value < Decimal::ZERO {
            Err(QuoteError::ValidationError(format!(
                "Amount must not be negative, got {value}"
            )))
        } else if value > Self::MAX.0 {
            Err(QuoteError::ValidationError(format!(
                "Amount must not exceed {}, got {value}",
                Self::MAX.0
            )))
        } else {
            Ok(Self(value))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Rounds to cents with banker's rounding (half to even).
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
            .normalize()
    }

    /// The share of this amount given by `percent`.
    pub fn percent_of(&self, percent: Percent) -> Self {
        Self((self.0 * percent.value() / Decimal::ONE_HUNDRED).normalize())
    }

    /// Subtraction that saturates at zero.
    ///
    /// Used for `total = subtotal - discount`, where the discount never exceeds
    /// the subtotal because percentages are capped at 100. There is no `Sub`
    /// impl, so every subtraction site opts into the clamp explicitly.
    pub fn saturating_sub(self, rhs: Self) -> Self {
        if rhs.0 >= self.0 {
            Self::ZERO
        } else {
            Self(self.0 - rhs.0)
        }
    }
}

impl TryFrom<Decimal> for Money {
    type Error = QuoteError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl From<u32> for Money {
    fn from(value: u32) -> Self {
        Self(Decimal::from(value))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.rounded())
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.checked_add(rhs.0).unwrap_or(Decimal::MAX))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Scales a price by a unit count (HVAC systems, etc).
impl Mul<u32> for Money {
    type Output = Self;
    fn mul(self, rhs: u32) -> Self::Output {
        Self(self.0.checked_mul(Decimal::from(rhs)).unwrap_or(Decimal::MAX))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// A percentage in the closed range `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Percent(Decimal);

impl Percent {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Result<Self, QuoteError> {
        if value >= Decimal::ZERO && value <= Decimal::ONE_HUNDRED {
            Ok(Self(value))
        } else {
            Err(QuoteError::ValidationError(format!(
                "Percentage must be between 0 and 100, got {value}"
            )))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Percent {
    type Error = QuoteError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percent> for Decimal {
    fn from(percent: Percent) -> Self {
        percent.0
    }
}
