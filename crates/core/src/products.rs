//! Products

use std::fmt;

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};

use crate::fixtures::{FixtureError, products::ProductsFixture};

const DEFAULT_CATALOG_YAML: &str = include_str!("../../../fixtures/products/catalog.yml");

/// Product identifier, unique within a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Unit price, never negative
    pub price: Decimal,

    /// Icon shown in place of a product photo
    pub emoji: String,

    /// Short description
    pub description: String,
}

/// Static, read-only product list with lookup by id.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    index: FxHashMap<ProductId, usize>,
    currency: &'static Currency,
}

impl Catalog {
    /// Build a catalog from products priced in `currency`.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or two products share an id.
    pub fn new(products: Vec<Product>, currency: &'static Currency) -> Result<Self, FixtureError> {
        if products.is_empty() {
            return Err(FixtureError::NoProducts);
        }

        let mut index = FxHashMap::default();

        for (position, product) in products.iter().enumerate() {
            if index.insert(product.id, position).is_some() {
                return Err(FixtureError::DuplicateProduct(product.id.0));
            }
        }

        Ok(Self {
            products,
            index,
            currency,
        })
    }

    /// Load a catalog from a products fixture.
    ///
    /// # Errors
    ///
    /// Returns an error when the YAML cannot be parsed, a price is invalid,
    /// currencies are inconsistent across products, ids repeat, or no
    /// products are present.
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        let fixture: ProductsFixture = serde_norway::from_str(yaml)?;

        let mut products = Vec::with_capacity(fixture.products.len());
        let mut currency: Option<&'static Currency> = None;

        for product_fixture in fixture.products {
            let (product, parsed_currency) = product_fixture.into_product()?;

            if let Some(existing) = currency
                && existing != parsed_currency
            {
                return Err(FixtureError::CurrencyMismatch(
                    existing.iso_alpha_code.to_string(),
                    parsed_currency.iso_alpha_code.to_string(),
                ));
            }

            currency = Some(parsed_currency);
            products.push(product);
        }

        let currency = currency.ok_or(FixtureError::NoProducts)?;

        Self::new(products, currency)
    }

    /// The merchandise catalog shipped with the shop.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled fixture is invalid.
    pub fn bundled() -> Result<Self, FixtureError> {
        Self::from_yaml(DEFAULT_CATALOG_YAML)
    }

    /// Look up a product by id.
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.index
            .get(&id)
            .and_then(|position| self.products.get(*position))
    }

    /// Products in display order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Always false for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Currency every price is expressed in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
