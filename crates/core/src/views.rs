//! View models
//!
//! Plain data for the page: what each product card, cart line and checkout
//! line shows, with prices already formatted.

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::iso::Currency;

use crate::{
    cart::{CartLineItem, CartObserver, CartStore, total_price, total_quantity},
    checkout::CheckoutSnapshot,
    products::{Catalog, ProductId},
    storage::Storage,
};

/// Format `amount` with the currency's minor-unit precision followed by its
/// symbol, as the page shows it: `89.99€`.
pub fn format_price(amount: Decimal, currency: &Currency) -> String {
    let precision = usize::try_from(currency.exponent).unwrap_or(2);
    let rounded = amount.round_dp_with_strategy(currency.exponent, RoundingStrategy::MidpointAwayFromZero);

    format!("{rounded:.precision$}{}", currency.symbol)
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    /// Product id, passed back on "add to cart"
    pub id: ProductId,
    /// Icon
    pub emoji: String,
    /// Name
    pub name: String,
    /// Description
    pub description: String,
    /// Formatted unit price
    pub price: String,
}

/// Cards for every product, in catalog order.
pub fn product_cards(catalog: &Catalog) -> Vec<ProductCard> {
    let currency = catalog.currency();

    catalog
        .products()
        .iter()
        .map(|product| ProductCard {
            id: product.id,
            emoji: product.emoji.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: format_price(product.price, currency),
        })
        .collect()
}

/// One line of the cart sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    /// Product id for the quantity and remove controls
    pub id: ProductId,
    /// Icon
    pub emoji: String,
    /// Name
    pub name: String,
    /// Formatted unit price
    pub unit_price: String,
    /// Quantity
    pub quantity: u32,
}

/// Cart sidebar contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    /// Badge count: total units in the cart
    pub count: u64,
    /// Formatted cart total
    pub total: String,
    /// Lines in add order
    pub lines: Vec<CartLineView>,
    /// Whether the "empty cart" message shows
    pub is_empty: bool,
    /// Whether the checkout button is enabled
    pub checkout_enabled: bool,
}

/// Sidebar contents for `items`.
pub fn cart_summary_of(items: &[CartLineItem], currency: &Currency) -> CartSummary {
    let lines = items
        .iter()
        .map(|item| CartLineView {
            id: item.id,
            emoji: item.emoji.clone(),
            name: item.name.clone(),
            unit_price: format_price(item.price, currency),
            quantity: item.quantity,
        })
        .collect();

    CartSummary {
        count: total_quantity(items),
        total: format_price(total_price(items), currency),
        lines,
        is_empty: items.is_empty(),
        checkout_enabled: !items.is_empty(),
    }
}

/// Sidebar contents for the cart held by `cart`.
pub fn cart_summary<S: Storage, O: CartObserver>(cart: &CartStore<S, O>) -> CartSummary {
    cart_summary_of(cart.items(), cart.currency())
}

/// One line of the checkout recap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLineView {
    /// `"name xN"`
    pub label: String,
    /// Formatted line total
    pub total: String,
}

/// Checkout recap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSummary {
    /// Lines in add order
    pub lines: Vec<CheckoutLineView>,
    /// Formatted order total
    pub total: String,
}

/// Recap of `items` as shown beside the checkout form.
pub fn checkout_summary(items: &[CartLineItem], currency: &Currency) -> CheckoutSummary {
    CheckoutSummary {
        lines: items
            .iter()
            .map(|item| CheckoutLineView {
                label: format!("{} x{}", item.name, item.quantity),
                total: format_price(item.line_total(), currency),
            })
            .collect(),
        total: format_price(total_price(items), currency),
    }
}

/// Recap of a checkout snapshot.
pub fn snapshot_summary(snapshot: &CheckoutSnapshot, currency: &Currency) -> CheckoutSummary {
    checkout_summary(&snapshot.items, currency)
}
