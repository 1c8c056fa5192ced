//! Cart

use thiserror::Error;

use crate::products::{Product, ProductId};

/// Errors related to cart mutations.
///
/// Every variant is recoverable: the mutation is rejected and the cart keeps
/// its prior state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The product's stock cannot satisfy the requested quantity.
    /// `available` is the most that could have been granted.
    #[error("insufficient stock for product {product}: {available} available")]
    InsufficientStock {
        /// Product whose stock ran out.
        product: ProductId,
        /// Units that could still be granted.
        available: u32,
    },

    /// No cart line exists for the product.
    #[error("no cart line for product {0}")]
    LineNotFound(ProductId),
}

/// One product-quantity pairing within a cart.
///
/// Lines hold the product id, never a price snapshot, so totals always read
/// the product's current data from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    product: ProductId,
    quantity: u32,
}

impl CartLine {
    /// Creates a new line. Quantity must be positive; a line that would drop
    /// to zero is removed from the cart instead of retained.
    pub fn new(product: ProductId, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// The product this line refers to.
    pub fn product(&self) -> &ProductId {
        &self.product
    }

    /// Units of the product held in the cart.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Ordered collection of cart lines, at most one line per product.
///
/// Insertion order is preserved for display; it has no pricing significance.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Units of the given product currently in the cart, 0 when absent.
    pub fn quantity_of(&self, id: &ProductId) -> u32 {
        self.lines
            .iter()
            .find(|line| line.product == *id)
            .map_or(0, CartLine::quantity)
    }

    /// Adds one unit of the product.
    ///
    /// An existing line is incremented; otherwise a new line with quantity 1
    /// is appended.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InsufficientStock`] when no stock remains beyond
    /// what the cart already holds; the cart is left unchanged.
    pub fn add(&mut self, product: &Product) -> Result<(), CartError> {
        let in_cart = self.quantity_of(&product.id);

        if in_cart >= product.stock {
            return Err(CartError::InsufficientStock {
                product: product.id.clone(),
                available: 0,
            });
        }

        match self.lines.iter_mut().find(|line| line.product == product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine::new(product.id.clone(), 1)),
        }

        Ok(())
    }

    /// Deletes the line for the given product id; silent no-op when absent.
    pub fn remove(&mut self, id: &ProductId) {
        self.lines.retain(|line| line.product != *id);
    }

    /// Sets the quantity of an existing line.
    ///
    /// A quantity of 0 behaves as [`Cart::remove`].
    ///
    /// # Errors
    ///
    /// - [`CartError::InsufficientStock`] when the quantity exceeds the
    ///   product's stock; the line keeps its prior quantity.
    /// - [`CartError::LineNotFound`] when no line exists for the product.
    pub fn set_quantity(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            self.remove(&product.id);
            return Ok(());
        }

        let line = self
            .lines
            .iter_mut()
            .find(|line| line.product == product.id)
            .ok_or_else(|| CartError::LineNotFound(product.id.clone()))?;

        if quantity > product.stock {
            return Err(CartError::InsufficientStock {
                product: product.id.clone(),
                available: product.stock,
            });
        }

        line.quantity = quantity;

        Ok(())
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Iterates over the lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    /// Number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    pub fn total_item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |sum, line| sum.saturating_add(line.quantity))
    }

    /// Appends an already-built line. The caller keeps the invariants: one
    /// line per product, positive quantity.
    pub(crate) fn push_line(&mut self, line: CartLine) {
        self.lines.push(line);
    }
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;
    use testresult::TestResult;

    use crate::prices::Price;

    use super::*;

    fn product(id: &str, stock: u32) -> Product {
        Product {
            id: ProductId::from(id),
            name: format!("상품 {id}"),
            price: Price::new(10_000),
            stock,
            discounts: smallvec![],
            description: None,
            is_recommended: false,
        }
    }

    #[test]
    fn add_inserts_then_increments() -> TestResult {
        let p = product("p1", 2);
        let mut cart = Cart::new();

        cart.add(&p)?;
        cart.add(&p)?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(&p.id), 2);

        Ok(())
    }

    #[test]
    fn add_rejects_when_stock_exhausted() -> TestResult {
        let p = product("p1", 1);
        let mut cart = Cart::new();

        cart.add(&p)?;

        let result = cart.add(&p);

        assert!(matches!(
            result,
            Err(CartError::InsufficientStock { available: 0, .. })
        ));
        assert_eq!(cart.quantity_of(&p.id), 1);

        Ok(())
    }

    #[test]
    fn add_rejects_out_of_stock_product_and_leaves_cart_unchanged() {
        let p = product("p1", 0);
        let mut cart = Cart::new();

        let result = cart.add(&p);

        assert!(matches!(
            result,
            Err(CartError::InsufficientStock { available: 0, .. })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn remove_is_a_no_op_for_missing_line() -> TestResult {
        let p = product("p1", 5);
        let mut cart = Cart::new();

        cart.add(&p)?;
        cart.remove(&ProductId::from("other"));

        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[test]
    fn set_quantity_zero_removes_line() -> TestResult {
        let p = product("p1", 5);
        let mut cart = Cart::new();

        cart.add(&p)?;
        cart.set_quantity(&p, 0)?;

        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn set_quantity_above_stock_keeps_prior_quantity() -> TestResult {
        let p = product("p1", 5);
        let mut cart = Cart::new();

        cart.add(&p)?;

        let result = cart.set_quantity(&p, 6);

        assert!(matches!(
            result,
            Err(CartError::InsufficientStock { available: 5, .. })
        ));
        assert_eq!(cart.quantity_of(&p.id), 1);

        Ok(())
    }

    #[test]
    fn set_quantity_requires_an_existing_line() {
        let p = product("p1", 5);
        let mut cart = Cart::new();

        let result = cart.set_quantity(&p, 3);

        assert!(matches!(result, Err(CartError::LineNotFound(_))));
    }

    #[test]
    fn total_item_count_sums_quantities() -> TestResult {
        let p1 = product("p1", 5);
        let p2 = product("p2", 5);
        let mut cart = Cart::new();

        cart.add(&p1)?;
        cart.add(&p1)?;
        cart.add(&p2)?;

        assert_eq!(cart.total_item_count(), 3);

        Ok(())
    }

    #[test]
    fn iter_preserves_insertion_order() -> TestResult {
        let p1 = product("p1", 5);
        let p2 = product("p2", 5);
        let mut cart = Cart::new();

        cart.add(&p2)?;
        cart.add(&p1)?;

        let ids: Vec<&str> = cart.iter().map(|line| line.product().as_str()).collect();

        assert_eq!(ids, vec!["p2", "p1"]);

        Ok(())
    }
}
