//! Coupons
//!
//! A coupon is a cart-wide discount applied once to the bulk-discounted
//! subtotal, either a flat subtraction or a percentage reduction.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::prices::Price;

/// Errors related to the coupon store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CouponError {
    /// A coupon with the same code already exists.
    #[error("coupon code {0} already exists")]
    DuplicateCode(String),
}

/// How a coupon reduces the bulk-discounted cart subtotal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CouponDiscount {
    /// Flat subtraction, floored at a zero total.
    Amount(Price),

    /// Fractional reduction of the subtotal.
    Percentage(Percentage),
}

impl CouponDiscount {
    /// Builds a fractional reduction from percent points, e.g. `10` for 10% off.
    #[must_use]
    pub fn from_percent_points(points: u32) -> Self {
        CouponDiscount::Percentage(Percentage::from(
            Decimal::from(points) / Decimal::ONE_HUNDRED,
        ))
    }
}

/// A named coupon, uniquely identified by its code.
#[derive(Debug, Clone, PartialEq)]
pub struct Coupon {
    code: String,
    name: String,
    discount: CouponDiscount,
}

impl Coupon {
    /// Creates a new coupon.
    pub fn new(code: impl Into<String>, name: impl Into<String>, discount: CouponDiscount) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            discount,
        }
    }

    /// The unique coupon code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The display label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The discount this coupon applies.
    pub fn discount(&self) -> &CouponDiscount {
        &self.discount
    }
}

/// Coupon store keyed by code, insertion order preserved for display.
#[derive(Debug, Clone, Default)]
pub struct CouponBook {
    coupons: Vec<Coupon>,
}

impl CouponBook {
    /// Creates an empty coupon book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a coupon book from a list of coupons.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::DuplicateCode`] if two coupons share a code.
    pub fn with_coupons(coupons: impl Into<Vec<Coupon>>) -> Result<Self, CouponError> {
        let mut book = Self::new();

        for coupon in coupons.into() {
            book.add(coupon)?;
        }

        Ok(book)
    }

    /// Adds a coupon.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::DuplicateCode`] if a coupon with the same code
    /// is already present; the book is left unchanged.
    pub fn add(&mut self, coupon: Coupon) -> Result<(), CouponError> {
        if self.get(coupon.code()).is_some() {
            return Err(CouponError::DuplicateCode(coupon.code().to_string()));
        }

        self.coupons.push(coupon);

        Ok(())
    }

    /// Removes the coupon with the given code, returning it if present.
    pub fn remove(&mut self, code: &str) -> Option<Coupon> {
        let position = self.coupons.iter().position(|c| c.code() == code)?;

        Some(self.coupons.remove(position))
    }

    /// Looks up a coupon by code.
    pub fn get(&self, code: &str) -> Option<&Coupon> {
        self.coupons.iter().find(|c| c.code() == code)
    }

    /// Iterates over the coupons in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Coupon> {
        self.coupons.iter()
    }

    /// Number of coupons in the book.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coupons.len()
    }

    /// Whether the book holds no coupons.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }
}
