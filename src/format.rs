//! Formatting
//!
//! Price labels for the two storefront surfaces. The admin view writes
//! `10,000원`, the customer view `₩10,000`, and a product with no remaining
//! stock shows `SOLD OUT` instead of a price.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::{cart::Cart, prices::Price, pricing::remaining_stock, products::Product};

/// Which storefront surface is rendering the price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceView {
    /// The admin product list: `10,000원`.
    Admin,

    /// The customer shop: `₩10,000`.
    Customer,
}

/// Label shown in place of a price when no stock remains.
pub const SOLD_OUT_LABEL: &str = "SOLD OUT";

/// Formats a bare price for the given view.
#[must_use]
pub fn price_label(price: Price, view: PriceView) -> String {
    let grouped = group_digits(price.value());

    match view {
        PriceView::Admin => format!("{grouped}원"),
        PriceView::Customer => format!("₩{grouped}"),
    }
}

/// Formats a computed total for the given view, rounding to whole currency
/// units. Rounding happens here and nowhere else.
#[must_use]
pub fn total_label(total: Decimal, view: PriceView) -> String {
    let rounded = total.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    rounded
        .to_u64()
        .map_or_else(|| rounded.to_string(), |value| price_label(Price::new(value), view))
}

/// Price label for a product card.
///
/// Shows [`SOLD_OUT_LABEL`] whenever the product's remaining stock, net of
/// the cart's holdings, is zero or less.
#[must_use]
pub fn product_price_label(product: &Product, cart: &Cart, view: PriceView) -> String {
    if remaining_stock(product, cart) <= 0 {
        return SOLD_OUT_LABEL.to_string();
    }

    price_label(product.price, view)
}

/// Groups digits in threes: `1234567` becomes `1,234,567`.
fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }

        grouped.push(digit);
    }

    grouped
}
