//! Products

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use smallvec::SmallVec;

use crate::prices::Price;

/// Stable product identifier, unique within a catalog.
///
/// Ids are plain strings so they survive persistence across sessions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a product id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        ProductId(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        ProductId::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        ProductId(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A quantity-gated bulk discount.
///
/// Buying at least `quantity` units of the product prices every unit of the
/// line at `1 - rate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountTier {
    quantity: u32,
    rate: Percentage,
}

impl DiscountTier {
    /// Creates a new tier unlocking `rate` at `quantity` units.
    pub fn new(quantity: u32, rate: Percentage) -> Self {
        Self { quantity, rate }
    }

    /// Minimum units purchased to unlock the tier.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Fractional discount rate in `[0, 1)`.
    pub fn rate(&self) -> Percentage {
        self.rate
    }

    /// The rate as a plain decimal fraction.
    pub fn rate_fraction(&self) -> Decimal {
        // decimal_percentage doesn't expose the underlying Decimal directly
        self.rate * Decimal::ONE
    }

    /// Whether a line of `quantity` units unlocks this tier.
    pub fn applies_to(&self, quantity: u32) -> bool {
        quantity >= self.quantity
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Stable identifier.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Unit price.
    pub price: Price,

    /// Units available for sale.
    pub stock: u32,

    /// Bulk discount tiers. Order carries no meaning; the best applicable
    /// rate wins.
    pub discounts: SmallVec<[DiscountTier; 2]>,

    /// Optional display description.
    pub description: Option<String>,

    /// Display flag for the recommended badge.
    pub is_recommended: bool,
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use super::*;

    #[test]
    fn tier_applies_at_and_above_its_quantity() {
        let tier = DiscountTier::new(10, Percentage::from(Decimal::new(1, 1)));

        assert!(!tier.applies_to(9));
        assert!(tier.applies_to(10));
        assert!(tier.applies_to(11));
    }

    #[test]
    fn tier_rate_fraction_matches_constructor_rate() {
        let tier = DiscountTier::new(10, Percentage::from(Decimal::new(15, 2)));

        assert_eq!(tier.rate_fraction(), Decimal::new(15, 2));
    }

    #[test]
    fn product_id_display_matches_inner_string() {
        let id = ProductId::from("p1");

        assert_eq!(id.to_string(), "p1");
        assert_eq!(id.as_str(), "p1");
    }

    #[test]
    fn product_fields_are_plain_data() {
        let product = Product {
            id: ProductId::from("p1"),
            name: "테스트 상품".to_string(),
            price: Price::new(10_000),
            stock: 20,
            discounts: smallvec![DiscountTier::new(10, Percentage::from(Decimal::new(1, 1)))],
            description: None,
            is_recommended: false,
        };

        assert_eq!(product.price.value(), 10_000);
        assert_eq!(product.discounts.len(), 1);
    }
}
