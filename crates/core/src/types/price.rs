//! Type-safe money representation using decimal arithmetic.
//!
//! Catalog prices arrive as JSON numbers (`9.99`). They are held as
//! [`Decimal`] so that cart arithmetic never picks up binary floating point
//! error, and are rounded to cents only when displayed.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::Quantity;

/// An amount of money in the store currency (US dollars).
///
/// Serializes as an unrounded decimal string and deserializes from either a
/// JSON number or a string. Two-decimal precision is applied only by
/// [`Money::display`] and `Display`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The amount rounded half away from zero to two decimal places.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Fixed two-decimal rendering without a currency symbol (`"28.50"`).
    #[must_use]
    pub fn display(&self) -> String {
        format!("{:.2}", self.rounded())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.display())
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Mul<Quantity> for Money {
    type Output = Self;

    fn mul(self, rhs: Quantity) -> Self {
        Self(self.0 * Decimal::from(rhs.get()))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_cents() {
        assert_eq!(Money::from_cents(2500).display(), "25.00");
        assert_eq!(Money::from_cents(2850).to_string(), "$28.50");
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        let money = Money::new(Decimal::new(10_005, 3)); // 10.005
        assert_eq!(money.display(), "10.01");
    }

    #[test]
    fn test_line_total_and_sum() {
        let lines = [
            Money::from_cents(1000) * Quantity::new(2),
            Money::from_cents(500) * Quantity::new(1),
        ];
        let subtotal: Money = lines.into_iter().sum();
        assert_eq!(subtotal.display(), "25.00");
    }

    #[test]
    fn test_deserializes_from_json_number() {
        let money: Money = serde_json::from_str("9.99").unwrap();
        assert_eq!(money, Money::from_cents(999));
    }
}
