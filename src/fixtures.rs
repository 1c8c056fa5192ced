//! Fixtures
//!
//! Built-in seed data, used whenever persisted state is absent or
//! unreadable.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use smallvec::smallvec;

use crate::{
    coupons::{Coupon, CouponDiscount},
    prices::Price,
    products::{DiscountTier, Product, ProductId},
};

/// The built-in product set.
pub fn seed_products() -> Vec<Product> {
    vec![
        Product {
            id: ProductId::from("p1"),
            name: "상품1".to_string(),
            price: Price::new(10_000),
            stock: 20,
            discounts: smallvec![
                DiscountTier::new(10, Percentage::from(Decimal::new(1, 1))),
                DiscountTier::new(20, Percentage::from(Decimal::new(2, 1))),
            ],
            description: Some("최고급 품질의 프리미엄 상품입니다.".to_string()),
            is_recommended: false,
        },
        Product {
            id: ProductId::from("p2"),
            name: "상품2".to_string(),
            price: Price::new(20_000),
            stock: 20,
            discounts: smallvec![DiscountTier::new(10, Percentage::from(Decimal::new(15, 2)))],
            description: Some("다양한 기능을 갖춘 실용적인 상품입니다.".to_string()),
            is_recommended: true,
        },
        Product {
            id: ProductId::from("p3"),
            name: "상품3".to_string(),
            price: Price::new(30_000),
            stock: 20,
            discounts: smallvec![
                DiscountTier::new(10, Percentage::from(Decimal::new(2, 1))),
                DiscountTier::new(30, Percentage::from(Decimal::new(25, 2))),
            ],
            description: Some("대용량과 고성능을 자랑하는 상품입니다.".to_string()),
            is_recommended: false,
        },
    ]
}

/// The built-in coupon set.
pub fn seed_coupons() -> Vec<Coupon> {
    vec![
        Coupon::new(
            "AMOUNT5000",
            "5000원 할인",
            CouponDiscount::Amount(Price::new(5_000)),
        ),
        Coupon::new("PERCENT10", "10% 할인", CouponDiscount::from_percent_points(10)),
    ]
}
