//! Pricing
//!
//! Pure totals over catalog and cart snapshots. Nothing here holds state:
//! every function recomputes from its inputs, so consumers re-derive totals
//! after any mutation to the cart, the catalog or the selected coupon.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    cart::Cart,
    catalog::Catalog,
    coupons::{Coupon, CouponDiscount},
    products::{DiscountTier, Product, ProductId},
};

/// Errors that can occur while computing totals.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// A cart line references a product missing from the catalog.
    #[error("product {0} is not in the catalog")]
    ProductNotFound(ProductId),

    /// A total could not be represented.
    #[error("total arithmetic overflowed")]
    Overflow,
}

/// Units of the product still available once the cart's holdings are taken
/// out: `stock - quantity in cart`.
///
/// The raw value may be negative (stock edited below the cart's holdings);
/// display clamping is the formatter's concern. A product is sold out when
/// the result is `<= 0`.
pub fn remaining_stock(product: &Product, cart: &Cart) -> i64 {
    i64::from(product.stock) - i64::from(cart.quantity_of(&product.id))
}

/// The best discount tier a line of `quantity` units unlocks.
///
/// Among tiers whose threshold is met, the maximum rate wins, regardless of
/// threshold order. Ties on rate resolve to the later-listed tier; the
/// resulting total is identical either way.
pub fn best_tier(product: &Product, quantity: u32) -> Option<&DiscountTier> {
    product
        .discounts
        .iter()
        .filter(|tier| tier.applies_to(quantity))
        .max_by_key(|tier| tier.rate_fraction())
}

/// The total for a line of `quantity` units: `price * quantity * (1 - rate)`,
/// with rate 0 when no tier qualifies.
///
/// No rounding happens at this layer; rounding, if any, belongs to display
/// formatting. Tiers are evaluated per line and never combine across
/// products.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the total cannot be represented.
pub fn line_total(product: &Product, quantity: u32) -> Result<Decimal, PricingError> {
    let base = product
        .price
        .to_decimal()
        .checked_mul(Decimal::from(quantity))
        .ok_or(PricingError::Overflow)?;

    let rate = best_tier(product, quantity).map_or(Decimal::ZERO, DiscountTier::rate_fraction);

    base.checked_mul(Decimal::ONE - rate)
        .ok_or(PricingError::Overflow)
}

/// Totals for a cart, before and after discounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    total_before_discount: Decimal,
    total_after_discount: Decimal,
}

impl CartTotals {
    /// Sum of `price * quantity` over all lines, no discount applied.
    pub fn total_before_discount(&self) -> Decimal {
        self.total_before_discount
    }

    /// Sum of line totals with bulk discounts, then the coupon applied once
    /// on top.
    pub fn total_after_discount(&self) -> Decimal {
        self.total_after_discount
    }

    /// Amount saved by bulk discounts and the coupon together.
    pub fn savings(&self) -> Decimal {
        self.total_before_discount - self.total_after_discount
    }
}

/// Computes cart totals from the current catalog, cart and selected coupon.
///
/// The coupon is applied once to the bulk-discounted subtotal: an amount
/// coupon subtracts its value (floored at 0), a percentage coupon scales the
/// subtotal. The coupon never affects `total_before_discount`.
///
/// # Errors
///
/// - [`PricingError::ProductNotFound`]: a line references a product missing
///   from the catalog.
/// - [`PricingError::Overflow`]: a total could not be represented.
pub fn cart_totals(
    catalog: &Catalog,
    cart: &Cart,
    coupon: Option<&Coupon>,
) -> Result<CartTotals, PricingError> {
    let mut before = Decimal::ZERO;
    let mut after = Decimal::ZERO;

    for line in cart.iter() {
        let product = catalog
            .get(line.product())
            .ok_or_else(|| PricingError::ProductNotFound(line.product().clone()))?;

        let base = product
            .price
            .to_decimal()
            .checked_mul(Decimal::from(line.quantity()))
            .ok_or(PricingError::Overflow)?;

        before = before.checked_add(base).ok_or(PricingError::Overflow)?;

        after = after
            .checked_add(line_total(product, line.quantity())?)
            .ok_or(PricingError::Overflow)?;
    }

    let after = match coupon {
        Some(coupon) => apply_coupon_discount(after, coupon.discount())?,
        None => after,
    };

    Ok(CartTotals {
        total_before_discount: before,
        total_after_discount: after,
    })
}

/// Applies a coupon discount to the bulk-discounted subtotal.
fn apply_coupon_discount(
    subtotal: Decimal,
    discount: &CouponDiscount,
) -> Result<Decimal, PricingError> {
    match discount {
        CouponDiscount::Amount(amount) => Ok(subtotal
            .checked_sub(amount.to_decimal())
            .ok_or(PricingError::Overflow)?
            .max(Decimal::ZERO)),
        CouponDiscount::Percentage(rate) => subtotal
            .checked_mul(Decimal::ONE - (*rate) * Decimal::ONE)
            .ok_or(PricingError::Overflow),
    }
}
