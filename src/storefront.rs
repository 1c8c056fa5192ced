//! Storefront
//!
//! Headless orchestration of the stores, the pricing engine, notifications
//! and persistence: the surface a UI shell drives.
//!
//! Every mutation is synchronous and atomic; consumers re-derive totals
//! after any mutation — nothing here tracks dependencies or re-renders.
//! Persistence runs best-effort after each successful mutation and never
//! fails the mutation itself.

use tracing::warn;

use crate::{
    cart::{Cart, CartError},
    catalog::Catalog,
    checkout::{CheckoutError, CheckoutPolicy},
    coupons::{Coupon, CouponBook, CouponError},
    format::{self, PriceView},
    notifications::{NotificationCenter, NotificationKey, NotificationKind},
    pricing::{self, CartTotals, PricingError},
    products::{Product, ProductId},
    schedule::Debouncer,
    storage::{self, Storage},
};

/// Quiescence window for the product search input, in milliseconds.
pub const SEARCH_DEBOUNCE_MS: u64 = 500;

/// The storefront application state.
///
/// Owns the catalog, coupon book, cart, coupon selection, notification
/// center and search debouncer, and glues them to a [`Storage`] backend.
#[derive(Debug)]
pub struct Storefront<S: Storage> {
    storage: S,
    catalog: Catalog,
    coupons: CouponBook,
    cart: Cart,
    selected_coupon: Option<Coupon>,
    notifications: NotificationCenter,
    search: Debouncer<String>,
    policy: CheckoutPolicy,
    order_seq: u64,
}

impl<S: Storage> Storefront<S> {
    /// Opens a storefront over `storage` with the default checkout policy.
    ///
    /// Missing or unreadable stored state falls back to the built-in seed
    /// data; opening never fails.
    pub fn open(storage: S) -> Self {
        Self::with_policy(storage, CheckoutPolicy::default())
    }

    /// Opens a storefront with a custom checkout policy.
    pub fn with_policy(storage: S, policy: CheckoutPolicy) -> Self {
        let catalog = storage::load_catalog(&storage);
        let coupons = storage::load_coupons(&storage);
        let cart = storage::load_cart(&storage, &catalog);

        Self {
            storage,
            catalog,
            coupons,
            cart,
            selected_coupon: None,
            notifications: NotificationCenter::new(),
            search: Debouncer::new(String::new(), SEARCH_DEBOUNCE_MS),
            policy,
            order_seq: 0,
        }
    }

    /// The product catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The coupon book.
    pub fn coupons(&self) -> &CouponBook {
        &self.coupons
    }

    /// The cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The currently selected coupon, if any.
    pub fn selected_coupon(&self) -> Option<&Coupon> {
        self.selected_coupon.as_ref()
    }

    /// The live notifications.
    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// The checkout policy in force.
    pub fn policy(&self) -> &CheckoutPolicy {
        &self.policy
    }

    /// The storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Consumes the storefront, returning the storage backend.
    pub fn into_storage(self) -> S {
        self.storage
    }

    // ----- admin: products -----

    /// Adds a product to the catalog.
    pub fn add_product(&mut self, product: Product) {
        match self.catalog.add(product) {
            Ok(()) => {
                self.notify("상품이 추가되었습니다.", NotificationKind::Success);
                self.persist_products();
            }
            Err(_) => self.notify("이미 존재하는 상품 ID입니다.", NotificationKind::Error),
        }
    }

    /// Edits a product in place. The edit must not change the product id.
    pub fn update_product(&mut self, id: &ProductId, edit: impl FnOnce(&mut Product)) {
        match self.catalog.update(id, edit) {
            Ok(()) => {
                self.notify("상품이 수정되었습니다.", NotificationKind::Success);
                self.persist_products();
            }
            Err(_) => self.notify("상품을 찾을 수 없습니다.", NotificationKind::Error),
        }
    }

    /// Deletes a product, pruning its cart line with it.
    pub fn delete_product(&mut self, id: &ProductId) {
        if self.catalog.remove(id).is_none() {
            self.notify("상품을 찾을 수 없습니다.", NotificationKind::Error);
            return;
        }

        self.cart.remove(id);
        self.notify("상품이 삭제되었습니다.", NotificationKind::Success);
        self.persist_products();
        self.persist_cart();
    }

    // ----- admin: coupons -----

    /// Adds a coupon; duplicate codes are rejected.
    pub fn add_coupon(&mut self, coupon: Coupon) {
        match self.coupons.add(coupon) {
            Ok(()) => {
                self.notify("쿠폰이 추가되었습니다.", NotificationKind::Success);
                self.persist_coupons();
            }
            Err(CouponError::DuplicateCode(_)) => {
                self.notify("이미 존재하는 쿠폰 코드입니다.", NotificationKind::Error);
            }
        }
    }

    /// Deletes a coupon, clearing the selection if it pointed at this code.
    pub fn delete_coupon(&mut self, code: &str) {
        if self.coupons.remove(code).is_none() {
            return;
        }

        if self
            .selected_coupon
            .as_ref()
            .is_some_and(|selected| selected.code() == code)
        {
            self.selected_coupon = None;
        }

        self.notify("쿠폰이 삭제되었습니다.", NotificationKind::Success);
        self.persist_coupons();
    }

    // ----- cart -----

    /// Adds one unit of the product to the cart.
    pub fn add_to_cart(&mut self, id: &ProductId) {
        let Some(product) = self.catalog.get(id) else {
            self.notify("상품을 찾을 수 없습니다.", NotificationKind::Error);
            return;
        };

        match self.cart.add(product) {
            Ok(()) => {
                self.notify("장바구니에 담았습니다", NotificationKind::Success);
                self.persist_cart();
            }
            Err(_) => self.notify("재고가 부족합니다!", NotificationKind::Error),
        }
    }

    /// Removes the product's cart line; silent no-op when absent.
    pub fn remove_from_cart(&mut self, id: &ProductId) {
        self.cart.remove(id);
        self.persist_cart();
    }

    /// Sets the quantity of an existing cart line. Zero removes the line.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: u32) {
        let Some(product) = self.catalog.get(id) else {
            self.notify("상품을 찾을 수 없습니다.", NotificationKind::Error);
            return;
        };

        match self.cart.set_quantity(product, quantity) {
            Ok(()) => self.persist_cart(),
            Err(CartError::InsufficientStock { available, .. }) => {
                self.notify(
                    format!("재고는 {available}개까지만 있습니다."),
                    NotificationKind::Error,
                );
            }
            Err(CartError::LineNotFound(_)) => {}
        }
    }

    // ----- coupon selection & checkout -----

    /// Selects a coupon by code.
    ///
    /// Percentage coupons are rejected while the bulk-discounted subtotal is
    /// below the policy minimum; the previous selection stays in place.
    pub fn apply_coupon(&mut self, code: &str) {
        let Some(coupon) = self.coupons.get(code).cloned() else {
            self.notify("쿠폰을 찾을 수 없습니다.", NotificationKind::Error);
            return;
        };

        let subtotal = match pricing::cart_totals(&self.catalog, &self.cart, None) {
            Ok(totals) => totals.total_after_discount(),
            Err(err) => {
                warn!(error = %err, "totals unavailable; keeping previous coupon selection");
                return;
            }
        };

        match self.policy.validate_coupon_selection(&coupon, subtotal) {
            Ok(()) => {
                self.selected_coupon = Some(coupon);
                self.notify("쿠폰이 적용되었습니다.", NotificationKind::Success);
            }
            Err(CheckoutError::CouponThresholdNotMet { minimum }) => {
                self.notify(
                    format!(
                        "percentage 쿠폰은 {} 이상 구매 시 사용 가능합니다.",
                        format::price_label(minimum, PriceView::Admin)
                    ),
                    NotificationKind::Error,
                );
            }
        }
    }

    /// Clears the coupon selection.
    pub fn deselect_coupon(&mut self) {
        self.selected_coupon = None;
    }

    /// Completes the order: clears the cart and coupon selection and returns
    /// the order number.
    pub fn complete_order(&mut self) -> String {
        self.order_seq += 1;
        let order_number = format!("ORD-{}", self.order_seq);

        self.notify(
            format!("주문이 완료되었습니다. 주문번호: {order_number}"),
            NotificationKind::Success,
        );

        self.cart.clear();
        self.selected_coupon = None;
        self.persist_cart();

        order_number
    }

    // ----- derived views -----

    /// Cart totals under the current catalog, cart and coupon selection.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] when a line references a missing product
    /// or a total cannot be represented.
    pub fn totals(&self) -> Result<CartTotals, PricingError> {
        pricing::cart_totals(&self.catalog, &self.cart, self.selected_coupon.as_ref())
    }

    /// Remaining stock for a product, net of the cart's holdings.
    pub fn remaining_stock(&self, id: &ProductId) -> Option<i64> {
        self.catalog
            .get(id)
            .map(|product| pricing::remaining_stock(product, &self.cart))
    }

    /// Total units across all cart lines.
    pub fn total_item_count(&self) -> u32 {
        self.cart.total_item_count()
    }

    /// Price label for a product card, `SOLD OUT` when none remains.
    pub fn product_price_label(&self, id: &ProductId, view: PriceView) -> Option<String> {
        self.catalog
            .get(id)
            .map(|product| format::product_price_label(product, &self.cart, view))
    }

    // ----- search -----

    /// Feeds the search input; the filter term settles after the debounce
    /// window.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search.set(term.into());
    }

    /// The raw search input, reflecting every keystroke.
    pub fn search_term(&self) -> &str {
        self.search.value()
    }

    /// The settled search term used for filtering.
    pub fn settled_search_term(&self) -> &str {
        self.search.settled()
    }

    /// Products matching the settled search term, in catalog order.
    pub fn search_results(&self) -> Vec<&Product> {
        self.catalog.search(self.search.settled())
    }

    // ----- clock -----

    /// Advances the storefront's logical clock: settles the search debounce
    /// and expires notifications.
    pub fn tick(&mut self, delta_ms: u64) {
        self.search.advance(delta_ms);
        self.notifications.advance(delta_ms);
    }

    /// Dismisses a notification ahead of its expiry.
    pub fn dismiss_notification(&mut self, key: NotificationKey) {
        self.notifications.dismiss(key);
    }

    // ----- internals -----

    fn notify(&mut self, message: impl Into<String>, kind: NotificationKind) {
        self.notifications.push(message, kind);
    }

    fn persist_products(&mut self) {
        if let Err(err) = storage::save_products(&mut self.storage, &self.catalog) {
            warn!(error = %err, "failed to persist products");
        }
    }

    fn persist_coupons(&mut self) {
        if let Err(err) = storage::save_coupons(&mut self.storage, &self.coupons) {
            warn!(error = %err, "failed to persist coupons");
        }
    }

    fn persist_cart(&mut self) {
        if let Err(err) = storage::save_cart(&mut self.storage, &self.cart) {
            warn!(error = %err, "failed to persist cart");
        }
    }
}
