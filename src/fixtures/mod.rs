//! Fixtures
//!
//! YAML fixture sets laid out as `products/<set>.yml`, `offers/<set>.yml` and
//! `baskets/<set>.yml` under a base path.

use std::{fs, path::PathBuf};

use rusty_money::{Money, iso::Currency};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{
    basket::{Basket, BasketError},
    catalog::{Catalog, CatalogError, ProductCatalog},
    fixtures::{
        baskets::BasketFixture,
        offers::OffersFixture,
        products::{ProductsFixture, parse_price},
    },
    offers::{Offer, OfferError, OfferIndex},
    products::Product,
};

pub mod baskets;
pub mod offers;
pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// An offer or basket line names a product that was not loaded
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Unsupported offer type
    #[error("Unsupported offer type: {0}")]
    UnsupportedOfferType(String),

    /// Offer is missing the data its type needs
    #[error("Invalid offer data: {0}")]
    InvalidOfferData(String),

    /// Offer construction error
    #[error("Invalid offer: {0}")]
    Offer(#[from] OfferError),

    /// Catalog construction error
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// Basket creation error
    #[error("Failed to create basket: {0}")]
    Basket(#[from] BasketError),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Catalog built from the loaded products
    catalog: Option<ProductCatalog<'a>>,

    /// Loaded offers, in file order
    offers: Vec<Offer>,

    /// Loaded basket
    basket: Option<Basket>,
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: None,
            offers: Vec::new(),
            basket: None,
        }
    }

    /// Load products from a YAML fixture file into the catalog.
    ///
    /// The first product loaded fixes the catalog currency.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a product
    /// is rejected by the catalog (duplicate, negative price, other currency).
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: ProductsFixture = self.read("products", name)?;

        let mut products: Vec<_> = fixture.products.into_iter().collect();

        // Hash map order is arbitrary; keep loading deterministic.
        products.sort_by(|(a, _), (b, _)| a.cmp(b));

        for (key, product_fixture) in products {
            let (minor_units, currency) = parse_price(&product_fixture.price)?;

            self.catalog
                .get_or_insert_with(|| ProductCatalog::new(currency))
                .insert(Product::new(key, Money::from_minor(minor_units, currency)))?;
        }

        Ok(self)
    }

    /// Load offers from a YAML fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if an offer is
    /// invalid or of an unsupported type, or if it targets an unknown product.
    pub fn load_offers(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: OffersFixture = self.read("offers", name)?;

        for offer_fixture in fixture.offers {
            let offer = Offer::try_from(offer_fixture)?;

            self.ensure_product(offer.product())?;
            self.offers.push(offer);
        }

        Ok(self)
    }

    /// Load a basket from a YAML fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if no products
    /// have been loaded, or if a line is invalid or names an unknown product.
    pub fn load_basket(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: BasketFixture = self.read("baskets", name)?;
        let mut basket = Basket::new(self.currency()?);

        for line in fixture.lines {
            self.ensure_product(&line.product)?;
            basket.add(line.product, line.quantity)?;
        }

        self.basket = Some(basket);

        Ok(self)
    }

    /// Load a complete fixture set (products, offers, and basket with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture
            .load_products(name)?
            .load_offers(name)?
            .load_basket(name)?;

        Ok(fixture)
    }

    /// The catalog built from the loaded products.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoCurrency`] if no products have been loaded.
    pub fn catalog(&self) -> Result<&ProductCatalog<'a>, FixtureError> {
        self.catalog.as_ref().ok_or(FixtureError::NoCurrency)
    }

    /// Loaded offers, in file order.
    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    /// Index of the loaded offers.
    pub fn offer_index(&self) -> OfferIndex {
        OfferIndex::new(self.offers.iter().cloned())
    }

    /// The loaded basket, or an empty basket if none was loaded.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoCurrency`] if no products have been loaded.
    pub fn basket(&self) -> Result<Basket, FixtureError> {
        match &self.basket {
            Some(basket) => Ok(basket.clone()),
            None => Ok(Basket::new(self.currency()?)),
        }
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        Ok(self.catalog()?.currency())
    }

    fn read<T: DeserializeOwned>(&self, category: &str, name: &str) -> Result<T, FixtureError> {
        let file_path = self.base_path.join(category).join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        Ok(serde_norway::from_str(&contents)?)
    }

    fn ensure_product(&self, product: &str) -> Result<(), FixtureError> {
        self.catalog()?
            .get(product)
            .map(|_product| ())
            .ok_or_else(|| FixtureError::ProductNotFound(product.to_string()))
    }
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}
