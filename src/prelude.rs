//! Cartwheel prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine},
    catalog::{Catalog, CatalogError},
    checkout::{CheckoutError, CheckoutPolicy, DEFAULT_PERCENTAGE_COUPON_MINIMUM},
    coupons::{Coupon, CouponBook, CouponDiscount, CouponError},
    format::{PriceView, SOLD_OUT_LABEL, price_label, product_price_label, total_label},
    notifications::{
        DEFAULT_LIFETIME_MS, Notification, NotificationCenter, NotificationKey, NotificationKind,
    },
    prices::Price,
    pricing::{CartTotals, PricingError, best_tier, cart_totals, line_total, remaining_stock},
    products::{DiscountTier, Product, ProductId},
    schedule::{Debouncer, Scheduler, TaskKey},
    storage::{
        CART_KEY, COUPONS_KEY, JsonFileStorage, MemoryStorage, PRODUCTS_KEY, Storage, StorageError,
    },
    storefront::{SEARCH_DEBOUNCE_MS, Storefront},
};
