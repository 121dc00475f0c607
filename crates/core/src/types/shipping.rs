//! Shipping options offered at checkout.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Money;

/// The fixed set of shipping methods and their costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShippingOption {
    /// In-store pickup.
    Free,
    /// Ground shipping.
    #[default]
    Standard,
    /// Next-day shipping.
    Express,
}

/// Returned when a shipping option name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown shipping option: {0} (expected free, standard or express)")]
pub struct UnknownShippingOption(pub String);

impl ShippingOption {
    /// Every option, in display order.
    pub const ALL: [Self; 3] = [Self::Free, Self::Standard, Self::Express];

    /// The flat cost of this option.
    #[must_use]
    pub fn cost(self) -> Money {
        match self {
            Self::Free => Money::ZERO,
            Self::Standard => Money::from_cents(350),
            Self::Express => Money::from_cents(1000),
        }
    }

    /// Stable lowercase name used in query strings and CLI flags.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Standard => "standard",
            Self::Express => "express",
        }
    }
}

impl fmt::Display for ShippingOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShippingOption {
    type Err = UnknownShippingOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|option| option.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownShippingOption(s.to_owned()))
    }
}
