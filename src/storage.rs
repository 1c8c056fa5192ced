//! Storage
//!
//! Key-addressed persistence for products, coupons and the cart.
//!
//! The durable interface is deliberately small: string values under string
//! keys, the shape of the browser's local storage. Domain types never
//! carry serde derives; they convert through the record types below, and a
//! payload that fails to parse or violates a data invariant falls back to
//! the built-in seed data instead of failing startup.

use std::{fs, io, path::PathBuf};

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::warn;

use crate::{
    cart::{Cart, CartLine},
    catalog::Catalog,
    coupons::{Coupon, CouponBook, CouponDiscount},
    fixtures,
    prices::Price,
    products::{DiscountTier, Product, ProductId},
};

/// Storage key for the product list.
pub const PRODUCTS_KEY: &str = "products";

/// Storage key for the coupon list.
pub const COUPONS_KEY: &str = "coupons";

/// Storage key for the cart contents.
pub const CART_KEY: &str = "cart";

/// Errors from storage backends and record encoding.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend IO failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Stored payload failed to parse as JSON.
    #[error("stored value for key {key} is not valid JSON")]
    MalformedJson {
        /// The storage key that held the payload.
        key: String,
        /// The parser failure.
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be encoded for storage.
    #[error("failed to encode value for key {key}")]
    Encode {
        /// The storage key being written.
        key: String,
        /// The encoder failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Invariant violations found while decoding stored records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// A discount tier rate outside `[0, 1)`.
    #[error("discount rate {rate} outside [0, 1)")]
    RateOutOfRange {
        /// The offending rate.
        rate: Decimal,
    },

    /// A discount tier with a zero quantity threshold.
    #[error("discount tier quantity must be at least 1")]
    ZeroTierQuantity,

    /// A coupon whose discount value cannot be represented.
    #[error("coupon {code} has invalid discount value {value}")]
    InvalidCouponValue {
        /// The coupon code.
        code: String,
        /// The offending value.
        value: Decimal,
    },
}

/// Key-addressed string storage.
pub trait Storage {
    /// Reads the value for `key`, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes `value` under `key`, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend cannot be written.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key` if present.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Volatile in-memory storage, for tests, demos and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: FxHashMap<String, String>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a value exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);

        Ok(())
    }
}

/// Durable storage writing one `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Creates a storage rooted at `dir`. The directory is created lazily on
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for JsonFileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Persisted form of a discount tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountTierRecord {
    /// Minimum units to unlock the tier.
    pub quantity: u32,

    /// Fractional rate in `[0, 1)`.
    pub rate: Decimal,
}

/// Persisted form of [`Product`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Stable identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Unit price in whole currency units.
    pub price: u64,

    /// Units available for sale.
    pub stock: u32,

    /// Bulk discount tiers.
    #[serde(default)]
    pub discounts: Vec<DiscountTierRecord>,

    /// Optional display description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Recommended badge flag, omitted when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_recommended: Option<bool>,
}

impl From<&Product> for ProductRecord {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_str().to_string(),
            name: product.name.clone(),
            price: product.price.value(),
            stock: product.stock,
            discounts: product
                .discounts
                .iter()
                .map(|tier| DiscountTierRecord {
                    quantity: tier.quantity(),
                    rate: tier.rate_fraction(),
                })
                .collect(),
            description: product.description.clone(),
            is_recommended: product.is_recommended.then_some(true),
        }
    }
}

impl TryFrom<ProductRecord> for Product {
    type Error = RecordError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let discounts = record
            .discounts
            .into_iter()
            .map(|tier| {
                if tier.quantity == 0 {
                    return Err(RecordError::ZeroTierQuantity);
                }

                if tier.rate < Decimal::ZERO || tier.rate >= Decimal::ONE {
                    return Err(RecordError::RateOutOfRange { rate: tier.rate });
                }

                Ok(DiscountTier::new(tier.quantity, Percentage::from(tier.rate)))
            })
            .collect::<Result<_, _>>()?;

        Ok(Product {
            id: ProductId::from(record.id),
            name: record.name,
            price: Price::new(record.price),
            stock: record.stock,
            discounts,
            description: record.description,
            is_recommended: record.is_recommended.unwrap_or(false),
        })
    }
}

/// Discriminant of a persisted coupon discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CouponTypeRecord {
    /// Flat currency subtraction.
    Amount,

    /// Percentage reduction, value in percent points.
    Percentage,
}

/// Persisted form of [`Coupon`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponRecord {
    /// Unique coupon code.
    pub code: String,

    /// Display label.
    pub name: String,

    /// Discount discriminant.
    pub discount_type: CouponTypeRecord,

    /// Flat value or percent points, depending on `discount_type`.
    pub discount_value: Decimal,
}

impl From<&Coupon> for CouponRecord {
    fn from(coupon: &Coupon) -> Self {
        let (discount_type, discount_value) = match coupon.discount() {
            CouponDiscount::Amount(amount) => (CouponTypeRecord::Amount, amount.to_decimal()),
            CouponDiscount::Percentage(rate) => (
                CouponTypeRecord::Percentage,
                (*rate) * Decimal::ONE_HUNDRED,
            ),
        };

        Self {
            code: coupon.code().to_string(),
            name: coupon.name().to_string(),
            discount_type,
            discount_value,
        }
    }
}

impl TryFrom<CouponRecord> for Coupon {
    type Error = RecordError;

    fn try_from(record: CouponRecord) -> Result<Self, Self::Error> {
        let discount = match record.discount_type {
            CouponTypeRecord::Amount => {
                if record.discount_value.is_sign_negative()
                    || !record.discount_value.fract().is_zero()
                {
                    return Err(RecordError::InvalidCouponValue {
                        code: record.code,
                        value: record.discount_value,
                    });
                }

                let value = record.discount_value.to_u64().ok_or_else(|| {
                    RecordError::InvalidCouponValue {
                        code: record.code.clone(),
                        value: record.discount_value,
                    }
                })?;

                CouponDiscount::Amount(Price::new(value))
            }
            CouponTypeRecord::Percentage => {
                if record.discount_value < Decimal::ZERO
                    || record.discount_value > Decimal::ONE_HUNDRED
                {
                    return Err(RecordError::InvalidCouponValue {
                        code: record.code,
                        value: record.discount_value,
                    });
                }

                CouponDiscount::Percentage(Percentage::from(
                    record.discount_value / Decimal::ONE_HUNDRED,
                ))
            }
        };

        Ok(Coupon::new(record.code, record.name, discount))
    }
}

/// Persisted form of [`CartLine`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineRecord {
    /// Id of the product in the line.
    pub product_id: String,

    /// Units held in the cart.
    pub quantity: u32,
}

impl From<&CartLine> for CartLineRecord {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product().as_str().to_string(),
            quantity: line.quantity(),
        }
    }
}

fn read_key<T: DeserializeOwned>(
    storage: &dyn Storage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = storage.read(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::MalformedJson {
            key: key.to_string(),
            source,
        })
}

fn write_key<T: Serialize>(
    storage: &mut dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let encoded = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;

    storage.write(key, &encoded)
}

/// Loads the catalog, falling back to the seed set when the stored payload
/// is absent, unreadable or invalid.
pub fn load_catalog(storage: &dyn Storage) -> Catalog {
    let records = match read_key::<Vec<ProductRecord>>(storage, PRODUCTS_KEY) {
        Ok(Some(records)) => records,
        Ok(None) => return seed_catalog(),
        Err(err) => {
            warn!(key = PRODUCTS_KEY, error = %err, "discarding stored data");
            return seed_catalog();
        }
    };

    let products: Result<Vec<Product>, RecordError> =
        records.into_iter().map(Product::try_from).collect();

    products
        .map_err(StoredDataError::Record)
        .and_then(|products| Catalog::with_products(products).map_err(StoredDataError::Duplicate))
        .unwrap_or_else(|err| {
            warn!(key = PRODUCTS_KEY, error = %err, "discarding stored data");
            seed_catalog()
        })
}

/// Loads the coupon book, falling back to the seed set when the stored
/// payload is absent, unreadable or invalid.
pub fn load_coupons(storage: &dyn Storage) -> CouponBook {
    let records = match read_key::<Vec<CouponRecord>>(storage, COUPONS_KEY) {
        Ok(Some(records)) => records,
        Ok(None) => return seed_coupon_book(),
        Err(err) => {
            warn!(key = COUPONS_KEY, error = %err, "discarding stored data");
            return seed_coupon_book();
        }
    };

    let coupons: Result<Vec<Coupon>, RecordError> =
        records.into_iter().map(Coupon::try_from).collect();

    coupons
        .map_err(StoredDataError::Record)
        .and_then(|coupons| {
            CouponBook::with_coupons(coupons).map_err(StoredDataError::DuplicateCoupon)
        })
        .unwrap_or_else(|err| {
            warn!(key = COUPONS_KEY, error = %err, "discarding stored data");
            seed_coupon_book()
        })
}

/// Loads the cart, dropping lines that reference products missing from the
/// catalog. An absent or unreadable payload yields an empty cart.
pub fn load_cart(storage: &dyn Storage, catalog: &Catalog) -> Cart {
    let records = match read_key::<Vec<CartLineRecord>>(storage, CART_KEY) {
        Ok(Some(records)) => records,
        Ok(None) => return Cart::new(),
        Err(err) => {
            warn!(key = CART_KEY, error = %err, "discarding stored data");
            return Cart::new();
        }
    };

    let mut cart = Cart::new();

    for record in records {
        if record.quantity == 0 {
            continue;
        }

        let id = ProductId::from(record.product_id);

        if catalog.get(&id).is_none() || cart.quantity_of(&id) > 0 {
            continue;
        }

        cart.push_line(CartLine::new(id, record.quantity));
    }

    cart
}

/// Rewrites the stored product list from the catalog.
///
/// # Errors
///
/// Returns a [`StorageError`] when encoding or the backend write fails.
pub fn save_products(storage: &mut dyn Storage, catalog: &Catalog) -> Result<(), StorageError> {
    let records: Vec<ProductRecord> = catalog.iter().map(ProductRecord::from).collect();

    write_key(storage, PRODUCTS_KEY, &records)
}

/// Rewrites the stored coupon list from the coupon book.
///
/// # Errors
///
/// Returns a [`StorageError`] when encoding or the backend write fails.
pub fn save_coupons(storage: &mut dyn Storage, coupons: &CouponBook) -> Result<(), StorageError> {
    let records: Vec<CouponRecord> = coupons.iter().map(CouponRecord::from).collect();

    write_key(storage, COUPONS_KEY, &records)
}

/// Writes the cart when it holds lines; removes the key when it is empty.
///
/// # Errors
///
/// Returns a [`StorageError`] when encoding or the backend write fails.
pub fn save_cart(storage: &mut dyn Storage, cart: &Cart) -> Result<(), StorageError> {
    if cart.is_empty() {
        return storage.remove(CART_KEY);
    }

    let records: Vec<CartLineRecord> = cart.iter().map(CartLineRecord::from).collect();

    write_key(storage, CART_KEY, &records)
}

fn seed_catalog() -> Catalog {
    Catalog::with_products(fixtures::seed_products()).unwrap_or_default()
}

fn seed_coupon_book() -> CouponBook {
    CouponBook::with_coupons(fixtures::seed_coupons()).unwrap_or_default()
}

/// Internal composite of the ways stored data can be invalid.
#[derive(Debug, Error)]
enum StoredDataError {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Duplicate(#[from] crate::catalog::CatalogError),

    #[error(transparent)]
    DuplicateCoupon(#[from] crate::coupons::CouponError),
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn seeded_memory() -> Result<MemoryStorage, StorageError> {
        let mut storage = MemoryStorage::new();
        let catalog = seed_catalog();
        let coupons = seed_coupon_book();

        save_products(&mut storage, &catalog)?;
        save_coupons(&mut storage, &coupons)?;

        Ok(storage)
    }

    #[test]
    fn missing_keys_fall_back_to_seed_data() {
        let storage = MemoryStorage::new();

        let catalog = load_catalog(&storage);
        let coupons = load_coupons(&storage);
        let cart = load_cart(&storage, &catalog);

        assert_eq!(catalog.len(), 3);
        assert_eq!(coupons.len(), 2);
        assert!(cart.is_empty());
    }

    #[test]
    fn malformed_json_falls_back_to_seed_data() -> TestResult {
        let mut storage = MemoryStorage::new();

        storage.write(PRODUCTS_KEY, "{not json")?;
        storage.write(COUPONS_KEY, "[1, 2, 3]")?;
        storage.write(CART_KEY, "oops")?;

        let catalog = load_catalog(&storage);
        let coupons = load_coupons(&storage);
        let cart = load_cart(&storage, &catalog);

        assert_eq!(catalog.len(), 3);
        assert_eq!(coupons.len(), 2);
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn invalid_discount_rate_falls_back_to_seed_data() -> TestResult {
        let mut storage = MemoryStorage::new();

        storage.write(
            PRODUCTS_KEY,
            r#"[{"id":"x","name":"x","price":1000,"stock":5,"discounts":[{"quantity":10,"rate":"1.5"}]}]"#,
        )?;

        let catalog = load_catalog(&storage);

        assert_eq!(catalog.len(), 3);
        assert!(catalog.get(&ProductId::from("p1")).is_some());

        Ok(())
    }

    #[test]
    fn products_round_trip_through_storage() -> TestResult {
        let storage = seeded_memory()?;

        let catalog = load_catalog(&storage);
        let p1 = catalog
            .get(&ProductId::from("p1"))
            .expect("p1 missing after round trip");

        assert_eq!(p1.price.value(), 10_000);
        assert_eq!(p1.discounts.len(), 2);
        assert_eq!(p1.description.as_deref(), Some("최고급 품질의 프리미엄 상품입니다."));

        let p2 = catalog
            .get(&ProductId::from("p2"))
            .expect("p2 missing after round trip");

        assert!(p2.is_recommended);

        Ok(())
    }

    #[test]
    fn coupons_round_trip_through_storage() -> TestResult {
        let storage = seeded_memory()?;

        let coupons = load_coupons(&storage);
        let percent = coupons
            .get("PERCENT10")
            .expect("PERCENT10 missing after round trip");

        assert_eq!(percent.discount(), &CouponDiscount::from_percent_points(10));

        let amount = coupons
            .get("AMOUNT5000")
            .expect("AMOUNT5000 missing after round trip");

        assert_eq!(
            amount.discount(),
            &CouponDiscount::Amount(Price::new(5_000))
        );

        Ok(())
    }

    #[test]
    fn coupon_records_accept_plain_json_numbers() -> TestResult {
        let mut storage = MemoryStorage::new();

        storage.write(
            COUPONS_KEY,
            r#"[{"code":"WELCOME","name":"환영 쿠폰","discountType":"percentage","discountValue":10}]"#,
        )?;

        let coupons = load_coupons(&storage);

        assert_eq!(coupons.len(), 1);
        assert_eq!(
            coupons.get("WELCOME").map(Coupon::discount),
            Some(&CouponDiscount::from_percent_points(10))
        );

        Ok(())
    }

    #[test]
    fn save_cart_removes_the_key_when_empty() -> TestResult {
        let mut storage = MemoryStorage::new();
        let catalog = seed_catalog();
        let mut cart = Cart::new();

        let p1 = catalog
            .get(&ProductId::from("p1"))
            .expect("seed p1 missing")
            .clone();

        cart.add(&p1)?;
        save_cart(&mut storage, &cart)?;

        assert!(storage.contains(CART_KEY));

        cart.clear();
        save_cart(&mut storage, &cart)?;

        assert!(!storage.contains(CART_KEY));

        Ok(())
    }

    #[test]
    fn load_cart_drops_lines_for_missing_products() -> TestResult {
        let mut storage = MemoryStorage::new();

        storage.write(
            CART_KEY,
            r#"[{"productId":"p1","quantity":2},{"productId":"ghost","quantity":1}]"#,
        )?;

        let catalog = seed_catalog();
        let cart = load_cart(&storage, &catalog);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(&ProductId::from("p1")), 2);

        Ok(())
    }

    #[test]
    fn json_file_storage_round_trips_and_removes() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut storage = JsonFileStorage::new(dir.path());

        assert_eq!(storage.read("cart")?, None);

        storage.write("cart", "[]")?;

        assert_eq!(storage.read("cart")?, Some("[]".to_string()));

        storage.remove("cart")?;
        storage.remove("cart")?;

        assert_eq!(storage.read("cart")?, None);

        Ok(())
    }
}
