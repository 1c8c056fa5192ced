//! Checkout
//!
//! Business rules applied when a coupon is selected for an order.
//!
//! Flat-amount coupons are safe on any order; percentage coupons are gated
//! behind a minimum bulk-discounted subtotal so tiny orders can't be
//! discounted disproportionately.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    coupons::{Coupon, CouponDiscount},
    prices::Price,
};

/// Minimum bulk-discounted subtotal a percentage coupon requires by default.
pub const DEFAULT_PERCENTAGE_COUPON_MINIMUM: Price = Price::new(10_000);

/// Errors raised while validating a coupon selection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// A percentage coupon was selected below the minimum order value. The
    /// previous selection stays in place.
    #[error("percentage coupons require a subtotal of at least {minimum}")]
    CouponThresholdNotMet {
        /// The configured minimum subtotal.
        minimum: Price,
    },
}

/// Order-level policy knobs.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutPolicy {
    percentage_coupon_minimum: Price,
}

impl CheckoutPolicy {
    /// Creates a policy with the given percentage-coupon minimum.
    #[must_use]
    pub const fn new(percentage_coupon_minimum: Price) -> Self {
        Self {
            percentage_coupon_minimum,
        }
    }

    /// The minimum bulk-discounted subtotal a percentage coupon requires.
    #[must_use]
    pub const fn percentage_coupon_minimum(&self) -> Price {
        self.percentage_coupon_minimum
    }

    /// Validates selecting `coupon` against the pre-coupon, bulk-discounted
    /// subtotal.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::CouponThresholdNotMet`] for a percentage
    /// coupon when the subtotal is below the configured minimum. Amount
    /// coupons always pass.
    pub fn validate_coupon_selection(
        &self,
        coupon: &Coupon,
        subtotal_after_bulk: Decimal,
    ) -> Result<(), CheckoutError> {
        match coupon.discount() {
            CouponDiscount::Percentage(_)
                if subtotal_after_bulk < self.percentage_coupon_minimum.to_decimal() =>
            {
                Err(CheckoutError::CouponThresholdNotMet {
                    minimum: self.percentage_coupon_minimum,
                })
            }
            CouponDiscount::Percentage(_) | CouponDiscount::Amount(_) => Ok(()),
        }
    }
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_PERCENTAGE_COUPON_MINIMUM)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn percent_coupon() -> Coupon {
        Coupon::new("PERCENT10", "10% 할인", CouponDiscount::from_percent_points(10))
    }

    fn amount_coupon() -> Coupon {
        Coupon::new(
            "AMOUNT5000",
            "5000원 할인",
            CouponDiscount::Amount(Price::new(5_000)),
        )
    }

    #[test]
    fn percentage_coupon_below_minimum_is_rejected() {
        let policy = CheckoutPolicy::default();

        let result = policy.validate_coupon_selection(&percent_coupon(), Decimal::from(3_000u64));

        assert_eq!(
            result,
            Err(CheckoutError::CouponThresholdNotMet {
                minimum: Price::new(10_000)
            })
        );
    }

    #[test]
    fn percentage_coupon_at_the_minimum_passes() -> TestResult {
        let policy = CheckoutPolicy::default();

        policy.validate_coupon_selection(&percent_coupon(), Decimal::from(10_000u64))?;

        Ok(())
    }

    #[test]
    fn amount_coupon_is_never_gated() -> TestResult {
        let policy = CheckoutPolicy::default();

        policy.validate_coupon_selection(&amount_coupon(), Decimal::ZERO)?;

        Ok(())
    }

    #[test]
    fn minimum_is_configurable() -> TestResult {
        let policy = CheckoutPolicy::new(Price::new(50_000));

        let rejected =
            policy.validate_coupon_selection(&percent_coupon(), Decimal::from(30_000u64));

        assert!(matches!(
            rejected,
            Err(CheckoutError::CouponThresholdNotMet { minimum }) if minimum == Price::new(50_000)
        ));

        policy.validate_coupon_selection(&percent_coupon(), Decimal::from(50_000u64))?;

        Ok(())
    }
}
