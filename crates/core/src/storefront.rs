//! Storefront
//!
//! The shop as one value: catalog, cart, order log and checkout flow wired
//! to a single storage backend. Front-ends drive everything through here.

use std::rc::Rc;

use rusty_money::iso::Currency;

use crate::{
    cart::{CartObserver, CartStore, NoopObserver},
    checkout::{CheckoutError, CheckoutFlow, CheckoutSnapshot, CheckoutState},
    clock::Clock,
    orders::{Customer, Order, OrderId, OrderLog},
    products::{Catalog, ProductId},
    storage::{Storage, StorageError},
    views::{self, CartSummary, CheckoutSummary},
};

/// Catalog, cart, order log and checkout flow sharing one storage backend.
#[derive(Debug)]
pub struct Storefront<S: Storage + Clone, C: Clock, O: CartObserver = NoopObserver> {
    catalog: Rc<Catalog>,
    cart: CartStore<S, O>,
    orders: OrderLog<S>,
    flow: CheckoutFlow<C>,
}

impl<S: Storage + Clone, C: Clock> Storefront<S, C> {
    /// Open the shop, restoring any cart saved in `storage`.
    pub fn open(catalog: Rc<Catalog>, storage: S, clock: C) -> Self {
        Self::open_with_observer(catalog, storage, clock, NoopObserver)
    }
}

impl<S: Storage + Clone, C: Clock, O: CartObserver> Storefront<S, C, O> {
    /// Open the shop, reporting every cart change to `observer`.
    pub fn open_with_observer(catalog: Rc<Catalog>, storage: S, clock: C, observer: O) -> Self {
        Self {
            cart: CartStore::restore_with_observer(
                Rc::clone(&catalog),
                storage.clone(),
                observer,
            ),
            orders: OrderLog::new(storage),
            flow: CheckoutFlow::new(clock),
            catalog,
        }
    }

    /// Product list.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Currency every price is in.
    pub fn currency(&self) -> &'static Currency {
        self.catalog.currency()
    }

    /// Cart contents and totals.
    pub fn cart(&self) -> &CartStore<S, O> {
        &self.cart
    }

    /// Where the customer is in the purchase flow.
    pub fn state(&self) -> &CheckoutState {
        self.flow.state()
    }

    /// Id of the last placed order while its confirmation is showing.
    pub fn confirmed_order_id(&self) -> Option<&OrderId> {
        self.flow.confirmed_order_id()
    }

    /// Cart sidebar view.
    pub fn cart_summary(&self) -> CartSummary {
        views::cart_summary(&self.cart)
    }

    /// Checkout recap view, while checking out.
    pub fn checkout_summary(&self) -> Option<CheckoutSummary> {
        self.flow
            .checkout_summary()
            .map(|snapshot| views::snapshot_summary(snapshot, self.currency()))
    }

    /// Add one unit of a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    pub fn add_to_cart(&mut self, product_id: ProductId) -> Result<(), StorageError> {
        self.cart.add_item(product_id)
    }

    /// Change a line's quantity by `delta`, removing it at zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    pub fn update_quantity(&mut self, product_id: ProductId, delta: i64) -> Result<(), StorageError> {
        self.cart.set_quantity(product_id, delta)
    }

    /// Drop a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    pub fn remove_from_cart(&mut self, product_id: ProductId) -> Result<(), StorageError> {
        self.cart.remove_item(product_id)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    pub fn clear_cart(&mut self) -> Result<(), StorageError> {
        self.cart.clear()
    }

    /// Open the checkout page for the current cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is empty or checkout is already open.
    pub fn go_to_checkout(&mut self) -> Result<&CheckoutSnapshot, CheckoutError> {
        self.flow.enter_checkout(&self.cart)
    }

    /// Leave the checkout page, keeping the cart.
    ///
    /// # Errors
    ///
    /// Returns an error unless checking out.
    pub fn cancel_checkout(&mut self) -> Result<(), CheckoutError> {
        self.flow.cancel()
    }

    /// Place an order for the current cart.
    ///
    /// # Errors
    ///
    /// See [`CheckoutFlow::submit`].
    pub fn place_order(&mut self, customer: Customer) -> Result<Order, CheckoutError> {
        self.flow.submit(&mut self.cart, &self.orders, customer)
    }

    /// Close the confirmation and return to the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error unless an order has just been confirmed.
    pub fn reset_shop(&mut self) -> Result<(), CheckoutError> {
        self.flow.reset()
    }
}
