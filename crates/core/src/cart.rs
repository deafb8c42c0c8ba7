//! Cart
//!
//! The cart store owns the line items, persists them after every mutation and
//! derives the totals. Line item ids are unique and quantities are always at
//! least one.

use std::rc::Rc;

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    products::{Catalog, Product, ProductId},
    storage::{CART_STORAGE_KEY, Storage, StorageError},
};

/// A product in the cart with its quantity.
///
/// Carries a copy of the product fields so a persisted cart stays readable on
/// its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Unit price
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Product icon
    pub emoji: String,

    /// Product description
    #[serde(default)]
    pub description: String,

    /// Units of this product, at least one
    pub quantity: u32,
}

impl CartLineItem {
    /// A new line holding one unit of `product`.
    pub fn new(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            emoji: product.emoji.clone(),
            description: product.description.clone(),
            quantity: 1,
        }
    }

    /// Unit price times quantity, saturating at [`Decimal::MAX`].
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// Sum of quantities over `items`.
pub fn total_quantity(items: &[CartLineItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}

/// Sum of line totals over `items`, saturating at [`Decimal::MAX`].
pub fn total_price(items: &[CartLineItem]) -> Decimal {
    items
        .iter()
        .map(CartLineItem::line_total)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Notified after every cart mutation.
pub trait CartObserver {
    /// Called with the cart contents after a change has been applied.
    fn cart_changed(&self, items: &[CartLineItem]);
}

/// Observer that ignores every change.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CartObserver for NoopObserver {
    fn cart_changed(&self, _items: &[CartLineItem]) {}
}

impl<F: Fn(&[CartLineItem])> CartObserver for F {
    fn cart_changed(&self, items: &[CartLineItem]) {
        self(items);
    }
}

/// Shopping cart backed by a [`Storage`].
#[derive(Debug)]
pub struct CartStore<S: Storage, O: CartObserver = NoopObserver> {
    catalog: Rc<Catalog>,
    storage: S,
    observer: O,
    items: Vec<CartLineItem>,
}

impl<S: Storage> CartStore<S> {
    /// Restore the cart persisted in `storage` without change notifications.
    pub fn restore(catalog: Rc<Catalog>, storage: S) -> Self {
        Self::restore_with_observer(catalog, storage, NoopObserver)
    }
}

impl<S: Storage, O: CartObserver> CartStore<S, O> {
    /// Restore the cart persisted in `storage`.
    ///
    /// An absent, unreadable or malformed snapshot gives an empty cart.
    pub fn restore_with_observer(catalog: Rc<Catalog>, storage: S, observer: O) -> Self {
        let items = load_snapshot(&storage);

        Self {
            catalog,
            storage,
            observer,
            items,
        }
    }

    /// Add one unit of a catalog product.
    ///
    /// Unknown product ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart could not be persisted. The
    /// in-memory cart keeps the change.
    pub fn add_item(&mut self, product_id: ProductId) -> Result<(), StorageError> {
        let Some(product) = self.catalog.get(product_id) else {
            debug!(%product_id, "ignoring add of unknown product");
            return Ok(());
        };

        match self.items.iter_mut().find(|item| item.id == product_id) {
            Some(item) => item.quantity = item.quantity.saturating_add(1),
            None => self.items.push(CartLineItem::new(product)),
        }

        self.commit()
    }

    /// Change a line's quantity by `delta`, removing the line when it drops
    /// to zero or below.
    ///
    /// Ids not in the cart are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart could not be persisted.
    pub fn set_quantity(&mut self, product_id: ProductId, delta: i64) -> Result<(), StorageError> {
        let Some(position) = self.items.iter().position(|item| item.id == product_id) else {
            debug!(%product_id, delta, "ignoring quantity change for product not in cart");
            return Ok(());
        };

        let current = self
            .items
            .get(position)
            .map_or(0, |item| i64::from(item.quantity));
        let next = current.saturating_add(delta);

        if next <= 0 {
            self.items.remove(position);
        } else if let Some(item) = self.items.get_mut(position) {
            item.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        }

        self.commit()
    }

    /// Remove a line entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart could not be persisted.
    pub fn remove_item(&mut self, product_id: ProductId) -> Result<(), StorageError> {
        let before = self.items.len();

        self.items.retain(|item| item.id != product_id);

        if self.items.len() == before {
            debug!(%product_id, "ignoring removal of product not in cart");
            return Ok(());
        }

        self.commit()
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the empty cart could not be persisted.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.items.clear();

        self.commit()
    }

    /// Sum of all line quantities.
    pub fn total_quantity(&self) -> u64 {
        total_quantity(&self.items)
    }

    /// Sum of price times quantity over all lines.
    pub fn total_price(&self) -> Decimal {
        total_price(&self.items)
    }

    /// Line items in the order they were first added.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Line for `product_id`, if present.
    pub fn line(&self, product_id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id == product_id)
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Catalog the cart adds from.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Currency of every price in the cart.
    pub fn currency(&self) -> &'static Currency {
        self.catalog.currency()
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        let persisted = serde_json::to_string(&self.items)
            .map_err(StorageError::from)
            .and_then(|snapshot| self.storage.set(CART_STORAGE_KEY, &snapshot));

        self.observer.cart_changed(&self.items);

        persisted
    }
}

fn load_snapshot<S: Storage>(storage: &S) -> Vec<CartLineItem> {
    let raw = match storage.get(CART_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(error) => {
            warn!(%error, "failed to read cart snapshot, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<CartLineItem>>(&raw) {
        Ok(items) => normalize(items),
        Err(error) => {
            warn!(%error, "malformed cart snapshot, starting empty");
            Vec::new()
        }
    }
}

/// Drop empty and negatively priced lines, merge repeated ids into the first
/// occurrence, then drop any line that would overflow the cart total.
fn normalize(items: Vec<CartLineItem>) -> Vec<CartLineItem> {
    let mut lines: Vec<CartLineItem> = Vec::with_capacity(items.len());

    for item in items.into_iter().filter(|item| item.quantity > 0) {
        if item.price < Decimal::ZERO {
            warn!(
                product_id = %item.id,
                price = %item.price,
                "dropping cart line with negative price"
            );
            continue;
        }

        match lines.iter_mut().find(|line| line.id == item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(item.quantity),
            None => lines.push(item),
        }
    }

    let mut total = Decimal::ZERO;

    lines.retain(|line| {
        let next = line
            .price
            .checked_mul(Decimal::from(line.quantity))
            .and_then(|line_total| total.checked_add(line_total));

        match next {
            Some(next) => {
                total = next;
                true
            }
            None => {
                warn!(product_id = %line.id, "dropping cart line whose total overflows");
                false
            }
        }
    });

    lines
}
