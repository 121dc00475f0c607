//! Cart line quantity.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A cart line quantity. Always at least 1.
///
/// Every constructor clamps, so a zero or negative quantity can never be
/// stored. Deserialization clamps as well, which repairs carts written by
/// older clients that allowed `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// The smallest storable quantity.
    pub const ONE: Self = Self(1);

    /// Create a quantity, clamping zero up to one.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        if value == 0 { Self::ONE } else { Self(value) }
    }

    /// Create a quantity from signed user input, clamping to `[1, u32::MAX]`.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        Self::new(u32::try_from(value.max(1)).unwrap_or(u32::MAX))
    }

    /// Parse free-form user input the way a number field does: anything
    /// that is not an integer becomes 1, everything else is clamped.
    #[must_use]
    pub fn from_input(input: &str) -> Self {
        input.trim().parse::<i64>().map_or(Self::ONE, Self::clamped)
    }

    /// The quantity as an integer.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The quantity plus one, saturating.
    #[must_use]
    pub const fn incremented(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Sum of two quantities, saturating.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i64::deserialize(deserializer).map(Self::clamped)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_and_negative_clamp_to_one() {
        assert_eq!(Quantity::new(0).get(), 1);
        assert_eq!(Quantity::clamped(0).get(), 1);
        assert_eq!(Quantity::clamped(-4).get(), 1);
        assert_eq!(Quantity::clamped(3).get(), 3);
    }

    #[test]
    fn test_from_input() {
        assert_eq!(Quantity::from_input("5").get(), 5);
        assert_eq!(Quantity::from_input(" 2 ").get(), 2);
        assert_eq!(Quantity::from_input("").get(), 1);
        assert_eq!(Quantity::from_input("abc").get(), 1);
        assert_eq!(Quantity::from_input("-3").get(), 1);
    }

    #[test]
    fn test_deserialize_clamps() {
        let quantity: Quantity = serde_json::from_str("0").unwrap();
        assert_eq!(quantity, Quantity::ONE);
        assert!(serde_json::from_str::<Quantity>("\"two\"").is_err());
    }

    #[test]
    fn test_increment_saturates() {
        assert_eq!(Quantity::new(u32::MAX).incremented().get(), u32::MAX);
    }
}
