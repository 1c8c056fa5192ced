//! Catalog

use thiserror::Error;

use crate::products::{Product, ProductId};

/// Errors related to the product catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// A product with the same id already exists.
    #[error("product id {0} already exists")]
    DuplicateId(ProductId),

    /// No product with the given id.
    #[error("product {0} not found")]
    NotFound(ProductId),
}

/// Insertion-ordered product store.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog from a list of products.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two products share an id.
    pub fn with_products(products: impl Into<Vec<Product>>) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();

        for product in products.into() {
            catalog.add(product)?;
        }

        Ok(catalog)
    }

    /// Adds a product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if a product with the same id is
    /// already present; the catalog is left unchanged.
    pub fn add(&mut self, product: Product) -> Result<(), CatalogError> {
        if self.get(&product.id).is_some() {
            return Err(CatalogError::DuplicateId(product.id.clone()));
        }

        self.products.push(product);

        Ok(())
    }

    /// Edits a product in place. The edit must not change the product id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no product has the given id.
    pub fn update(
        &mut self,
        id: &ProductId,
        edit: impl FnOnce(&mut Product),
    ) -> Result<(), CatalogError> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == *id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;

        edit(product);

        Ok(())
    }

    /// Removes the product with the given id, returning it if present.
    pub fn remove(&mut self, id: &ProductId) -> Option<Product> {
        let position = self.products.iter().position(|p| p.id == *id)?;

        Some(self.products.remove(position))
    }

    /// Looks up a product by id.
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == *id)
    }

    /// Iterates over the products in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog holds no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Case-insensitive substring search over product names and descriptions.
    ///
    /// An empty (or all-whitespace) term matches every product.
    pub fn search(&self, term: &str) -> Vec<&Product> {
        let term = term.trim().to_lowercase();

        if term.is_empty() {
            return self.products.iter().collect();
        }

        self.products
            .iter()
            .filter(|product| {
                product.name.to_lowercase().contains(&term)
                    || product
                        .description
                        .as_ref()
                        .is_some_and(|d| d.to_lowercase().contains(&term))
            })
            .collect()
    }
}
