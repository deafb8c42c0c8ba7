//! Product Fixtures

use rust_decimal::Decimal;
use rusty_money::iso::{Currency, EUR, GBP, USD};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    products::{Product, ProductId},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Products in display order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product id
    pub id: u32,

    /// Product name
    pub name: String,

    /// Product price (e.g., "89.99 EUR")
    pub price: String,

    /// Icon shown in place of a product photo
    pub emoji: String,

    /// Short description
    #[serde(default)]
    pub description: String,
}

impl ProductFixture {
    /// Convert the fixture into a product, returning the currency its price was written in.
    ///
    /// # Errors
    ///
    /// Returns an error if the price cannot be parsed or is negative.
    pub fn into_product(self) -> Result<(Product, &'static Currency), FixtureError> {
        let (price, currency) = parse_price(&self.price)?;

        if price.is_sign_negative() {
            return Err(FixtureError::NegativePrice(self.id));
        }

        let product = Product {
            id: ProductId(self.id),
            name: self.name,
            price,
            emoji: self.emoji,
            description: self.description,
        };

        Ok((product, currency))
    }
}

/// Parse price string (e.g., "89.99 EUR") into a decimal amount and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(Decimal, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let currency = match *currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((amount.round_dp(currency.exponent), currency))
}
