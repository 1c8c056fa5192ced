//! Prices

use std::fmt;
use std::ops::Deref;

use rust_decimal::Decimal;

/// Represents a price in whole currency units.
///
/// The shop trades in won, which has no minor unit, so prices are plain
/// non-negative integers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price {
    value: u64,
}

impl Price {
    /// A zero price.
    pub const ZERO: Price = Price { value: 0 };

    /// Creates a new Price
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Price { value }
    }

    /// Returns the raw value in whole currency units.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.value
    }

    /// Returns the price as a decimal for fractional arithmetic.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::from(self.value)
    }
}

impl Deref for Price {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl From<u64> for Price {
    fn from(value: u64) -> Self {
        Price::new(value)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_price() {
        let price = Price::new(1000);

        assert_eq!(price.value(), 1000);
    }

    #[test]
    fn price_derefs_to_u64() {
        let price = Price { value: 100 };

        assert_eq!(*price, 100);
    }

    #[test]
    fn price_to_decimal() {
        let price = Price::new(10_000);

        assert_eq!(price.to_decimal(), Decimal::from(10_000u64));
    }
}
