//! Catalog
//!
//! The pricer only needs two things from a catalog: the currency every price is
//! expressed in, and a unit price lookup by product name. [`ProductCatalog`] is
//! the in-memory implementation; callers may supply their own.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::products::Product;

/// Errors related to catalog construction.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// A product has a negative price.
    #[error("Product {0} has a negative price")]
    NegativePrice(String),

    /// A product's currency differs from the catalog currency (product, product currency, catalog currency).
    #[error("Product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),

    /// The same product name was added twice.
    #[error("Duplicate product: {0}")]
    DuplicateProduct(String),
}

/// Read-only product price lookup.
pub trait Catalog {
    /// Currency all catalog prices are expressed in.
    fn currency(&self) -> &'static Currency;

    /// Unit price of the named product in major units, or `None` if the product is unknown.
    fn unit_price(&self, product: &str) -> Option<Decimal>;
}

/// In-memory catalog keyed by product name.
#[derive(Debug)]
pub struct ProductCatalog<'a> {
    products: FxHashMap<String, Product<'a>>,
    currency: &'static Currency,
}

impl<'a> ProductCatalog<'a> {
    /// Create an empty catalog for the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            products: FxHashMap::default(),
            currency,
        }
    }

    /// Create a catalog from a list of products.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if any product is invalid or duplicated.
    pub fn with_products(
        products: impl IntoIterator<Item = Product<'a>>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new(currency);

        for product in products {
            catalog.insert(product)?;
        }

        Ok(catalog)
    }

    /// Add a product to the catalog.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NegativePrice`]: the price is below zero.
    /// - [`CatalogError::CurrencyMismatch`]: the price is in another currency.
    /// - [`CatalogError::DuplicateProduct`]: a product with the same name exists.
    pub fn insert(&mut self, product: Product<'a>) -> Result<&mut Self, CatalogError> {
        if product.price.to_minor_units() < 0 {
            return Err(CatalogError::NegativePrice(product.name));
        }

        let product_currency = product.price.currency();

        if product_currency != self.currency {
            return Err(CatalogError::CurrencyMismatch(
                product.name,
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if self.products.contains_key(&product.name) {
            return Err(CatalogError::DuplicateProduct(product.name));
        }

        self.products.insert(product.name.clone(), product);

        Ok(self)
    }

    /// Get a product by name.
    pub fn get(&self, name: &str) -> Option<&Product<'a>> {
        self.products.get(name)
    }

    /// Get the number of products in the catalog.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Catalog for ProductCatalog<'_> {
    fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn unit_price(&self, product: &str) -> Option<Decimal> {
        self.products.get(product).map(Product::unit_price)
    }
}
