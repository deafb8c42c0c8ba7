//! Checkout
//!
//! Linear flow from browsing the catalog, through the checkout form, to an
//! order confirmation. Confirmation can only be left by resetting back to
//! browsing.

use jiff::Timestamp;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    cart::{CartLineItem, CartObserver, CartStore, total_price},
    clock::Clock,
    orders::{Customer, CustomerField, Order, OrderId, OrderLog},
    storage::{Storage, StorageError},
};

/// Checkout errors.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout needs at least one line item
    #[error("cart is empty")]
    EmptyCart,

    /// The action is not available in the current state
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        /// Attempted action
        action: &'static str,
        /// State the flow was in
        state: &'static str,
    },

    /// Required customer fields were left blank
    #[error("missing required fields: {}", display_fields(.0))]
    MissingCustomerFields(Vec<CustomerField>),

    /// The order or the emptied cart could not be persisted
    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn display_fields(fields: &[CustomerField]) -> String {
    fields
        .iter()
        .copied()
        .map(CustomerField::dom_id)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Cart contents and total captured on entering checkout, for display.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSnapshot {
    /// Line items
    pub items: Vec<CartLineItem>,

    /// Sum of price times quantity
    pub total: Decimal,
}

impl CheckoutSnapshot {
    /// Capture `items`.
    pub fn new(items: &[CartLineItem]) -> Self {
        Self {
            items: items.to_vec(),
            total: total_price(items),
        }
    }
}

/// Where the customer is in the purchase flow.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CheckoutState {
    /// Looking at the catalog
    #[default]
    Browsing,

    /// Filling in the checkout form
    Checkout(CheckoutSnapshot),

    /// Order placed
    Confirmed(OrderId),
}

impl CheckoutState {
    fn name(&self) -> &'static str {
        match self {
            Self::Browsing => "browsing",
            Self::Checkout(_) => "checking out",
            Self::Confirmed(_) => "confirmed",
        }
    }
}

/// Checkout state machine.
#[derive(Debug)]
pub struct CheckoutFlow<C: Clock> {
    clock: C,
    state: CheckoutState,
    last_issued: Option<Timestamp>,
}

impl<C: Clock> CheckoutFlow<C> {
    /// Flow starting in [`CheckoutState::Browsing`].
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            state: CheckoutState::Browsing,
            last_issued: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Snapshot shown on the checkout page, while checking out.
    pub fn checkout_summary(&self) -> Option<&CheckoutSnapshot> {
        match &self.state {
            CheckoutState::Checkout(snapshot) => Some(snapshot),
            CheckoutState::Browsing | CheckoutState::Confirmed(_) => None,
        }
    }

    /// Id of the placed order, once confirmed.
    pub fn confirmed_order_id(&self) -> Option<&OrderId> {
        match &self.state {
            CheckoutState::Confirmed(id) => Some(id),
            CheckoutState::Browsing | CheckoutState::Checkout(_) => None,
        }
    }

    /// Open the checkout form for the current cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] for an empty cart and
    /// [`CheckoutError::InvalidTransition`] outside of browsing. The state is
    /// unchanged in both cases.
    pub fn enter_checkout<S: Storage, O: CartObserver>(
        &mut self,
        cart: &CartStore<S, O>,
    ) -> Result<&CheckoutSnapshot, CheckoutError> {
        self.require_browsing("enter checkout")?;

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        self.state = CheckoutState::Checkout(CheckoutSnapshot::new(cart.items()));

        self.checkout_summary().ok_or(CheckoutError::InvalidTransition {
            action: "enter checkout",
            state: "browsing",
        })
    }

    /// Go back to browsing without touching the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidTransition`] unless checking out.
    pub fn cancel(&mut self) -> Result<(), CheckoutError> {
        match self.state {
            CheckoutState::Checkout(_) => {
                self.state = CheckoutState::Browsing;
                Ok(())
            }
            CheckoutState::Browsing | CheckoutState::Confirmed(_) => {
                Err(self.invalid("cancel checkout"))
            }
        }
    }

    /// Place the order: record it in `log`, empty `cart` and confirm.
    ///
    /// The order is built from the cart as it is now, not from the snapshot
    /// taken on entering checkout.
    ///
    /// # Errors
    ///
    /// Returns an error when not checking out, when customer fields are
    /// missing, when the cart has been emptied meanwhile, or when the order
    /// cannot be logged; in those cases nothing changes. Once the order is
    /// logged it is always returned: a failure to persist the emptied cart is
    /// only logged, and the in-memory cart is still emptied.
    pub fn submit<S: Storage, O: CartObserver, L: Storage>(
        &mut self,
        cart: &mut CartStore<S, O>,
        log: &OrderLog<L>,
        customer: Customer,
    ) -> Result<Order, CheckoutError> {
        if !matches!(self.state, CheckoutState::Checkout(_)) {
            return Err(self.invalid("submit an order"));
        }

        let missing = customer.missing_fields();
        if !missing.is_empty() {
            return Err(CheckoutError::MissingCustomerFields(missing));
        }

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let created_at = self.next_order_time();
        let order = Order::new(created_at, cart.items(), customer);

        log.append(&order)?;
        self.last_issued = Some(created_at);
        self.state = CheckoutState::Confirmed(order.id().clone());

        info!(
            order_id = %order.id(),
            items = order.items().len(),
            total = %order.total(),
            "order placed"
        );

        if let Err(error) = cart.clear() {
            warn!(
                order_id = %order.id(),
                %error,
                "order placed but the emptied cart was not saved"
            );
        }

        Ok(order)
    }

    /// Leave the confirmation and go back to browsing.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidTransition`] unless confirmed.
    pub fn reset(&mut self) -> Result<(), CheckoutError> {
        match self.state {
            CheckoutState::Confirmed(_) => {
                self.state = CheckoutState::Browsing;
                Ok(())
            }
            CheckoutState::Browsing | CheckoutState::Checkout(_) => Err(self.invalid("reset")),
        }
    }

    fn require_browsing(&self, action: &'static str) -> Result<(), CheckoutError> {
        match self.state {
            CheckoutState::Browsing => Ok(()),
            CheckoutState::Checkout(_) | CheckoutState::Confirmed(_) => Err(self.invalid(action)),
        }
    }

    fn invalid(&self, action: &'static str) -> CheckoutError {
        CheckoutError::InvalidTransition {
            action,
            state: self.state.name(),
        }
    }

    /// Clock time, nudged forward a millisecond at a time so ids issued by
    /// this flow never repeat.
    fn next_order_time(&self) -> Timestamp {
        let now = self.clock.now();

        match self.last_issued {
            Some(last) if last.as_millisecond() >= now.as_millisecond() => {
                Timestamp::from_millisecond(last.as_millisecond().saturating_add(1)).unwrap_or(now)
            }
            Some(_) | None => now,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use jiff::SignedDuration;
    use mockall::Sequence;
    use testresult::TestResult;

    use crate::{
        clock::FixedClock,
        products::ProductId,
        storage::{MemoryStorage, MockStorage, ORDERS_STORAGE_KEY},
        test_support::{catalog, customer},
    };

    use super::*;

    struct Fixture {
        storage: Rc<MemoryStorage>,
        cart: CartStore<Rc<MemoryStorage>>,
        log: OrderLog<Rc<MemoryStorage>>,
        clock: FixedClock,
        flow: CheckoutFlow<FixedClock>,
    }

    fn fixture() -> Result<Fixture, Box<dyn std::error::Error>> {
        let storage = Rc::new(MemoryStorage::new());
        let clock = FixedClock::new(Timestamp::from_millisecond(1_718_000_000_000)?);

        Ok(Fixture {
            cart: CartStore::restore(catalog()?, Rc::clone(&storage)),
            log: OrderLog::new(Rc::clone(&storage)),
            flow: CheckoutFlow::new(clock.clone()),
            storage,
            clock,
        })
    }

    fn logged_orders(storage: &MemoryStorage) -> Result<Vec<Order>, Box<dyn std::error::Error>> {
        let raw = storage.get(ORDERS_STORAGE_KEY)?.unwrap_or_else(|| "[]".to_string());

        Ok(serde_json::from_str(&raw)?)
    }

    #[test]
    fn empty_cart_blocks_checkout() -> TestResult {
        let mut fx = fixture()?;

        let result = fx.flow.enter_checkout(&fx.cart);

        assert!(
            matches!(result, Err(CheckoutError::EmptyCart)),
            "expected EmptyCart, got {result:?}"
        );
        assert_eq!(fx.flow.state(), &CheckoutState::Browsing);

        Ok(())
    }

    #[test]
    fn entering_checkout_snapshots_without_mutating() -> TestResult {
        let mut fx = fixture()?;
        fx.cart.add_item(ProductId(1))?;
        fx.cart.add_item(ProductId(2))?;

        let snapshot = fx.flow.enter_checkout(&fx.cart)?.clone();

        assert_eq!(snapshot.items, fx.cart.items());
        assert_eq!(snapshot.total, Decimal::new(114_98, 2));
        assert_eq!(fx.cart.len(), 2);

        Ok(())
    }

    #[test]
    fn cancel_returns_to_browsing_and_keeps_cart() -> TestResult {
        let mut fx = fixture()?;
        fx.cart.add_item(ProductId(4))?;

        fx.flow.enter_checkout(&fx.cart)?;
        fx.flow.cancel()?;

        assert_eq!(fx.flow.state(), &CheckoutState::Browsing);
        assert_eq!(fx.cart.total_quantity(), 1);

        Ok(())
    }

    #[test]
    fn submit_logs_order_and_clears_cart() -> TestResult {
        let mut fx = fixture()?;
        fx.cart.add_item(ProductId(1))?;
        fx.cart.add_item(ProductId(1))?;
        fx.cart.add_item(ProductId(3))?;

        fx.flow.enter_checkout(&fx.cart)?;
        let order = fx.flow.submit(&mut fx.cart, &fx.log, customer())?;

        assert_eq!(order.id().as_str(), "OM-1718000000000");
        assert_eq!(order.total(), Decimal::new(199_97, 2));
        assert_eq!(fx.flow.confirmed_order_id(), Some(order.id()));
        assert!(fx.cart.is_empty());

        let orders = logged_orders(&fx.storage)?;
        assert_eq!(orders, vec![order]);

        Ok(())
    }

    #[test]
    fn missing_fields_keep_checkout_open() -> TestResult {
        let mut fx = fixture()?;
        fx.cart.add_item(ProductId(2))?;
        fx.flow.enter_checkout(&fx.cart)?;

        let mut incomplete = customer();
        incomplete.city = String::new();
        incomplete.phone = " ".to_string();

        let result = fx.flow.submit(&mut fx.cart, &fx.log, incomplete);

        assert!(
            matches!(
                result,
                Err(CheckoutError::MissingCustomerFields(ref fields))
                    if fields == &[CustomerField::Phone, CustomerField::City]
            ),
            "expected MissingCustomerFields, got {result:?}"
        );
        assert!(fx.flow.checkout_summary().is_some());
        assert_eq!(fx.cart.len(), 1);
        assert!(logged_orders(&fx.storage)?.is_empty());

        Ok(())
    }

    #[test]
    fn submit_outside_checkout_is_rejected() -> TestResult {
        let mut fx = fixture()?;
        fx.cart.add_item(ProductId(2))?;

        let result = fx.flow.submit(&mut fx.cart, &fx.log, customer());

        assert!(
            matches!(result, Err(CheckoutError::InvalidTransition { .. })),
            "expected InvalidTransition, got {result:?}"
        );
        assert_eq!(fx.cart.len(), 1);

        Ok(())
    }

    #[test]
    fn confirmed_only_leaves_through_reset() -> TestResult {
        let mut fx = fixture()?;
        fx.cart.add_item(ProductId(2))?;
        fx.flow.enter_checkout(&fx.cart)?;
        fx.flow.submit(&mut fx.cart, &fx.log, customer())?;

        assert!(fx.flow.cancel().is_err(), "cancel should fail once confirmed");
        assert!(
            fx.flow.enter_checkout(&fx.cart).is_err(),
            "checkout should not reopen from confirmation"
        );

        fx.flow.reset()?;

        assert_eq!(fx.flow.state(), &CheckoutState::Browsing);
        assert!(fx.flow.reset().is_err(), "reset should only work once");
        assert_eq!(logged_orders(&fx.storage)?.len(), 1);

        Ok(())
    }

    #[test]
    fn order_ids_do_not_repeat_within_a_millisecond() -> TestResult {
        let mut fx = fixture()?;

        let mut ids = Vec::new();
        for _ in 0..3 {
            fx.cart.add_item(ProductId(5))?;
            fx.flow.enter_checkout(&fx.cart)?;
            ids.push(fx.flow.submit(&mut fx.cart, &fx.log, customer())?.id().clone());
            fx.flow.reset()?;
        }

        fx.clock.advance(SignedDuration::from_secs(1));
        fx.cart.add_item(ProductId(5))?;
        fx.flow.enter_checkout(&fx.cart)?;
        ids.push(fx.flow.submit(&mut fx.cart, &fx.log, customer())?.id().clone());

        let ids: Vec<&str> = ids.iter().map(OrderId::as_str).collect();

        assert_eq!(
            ids,
            vec![
                "OM-1718000000000",
                "OM-1718000000001",
                "OM-1718000000002",
                "OM-1718000001000",
            ]
        );

        Ok(())
    }

    #[test]
    fn failed_log_write_changes_nothing() -> TestResult {
        let cart_storage = Rc::new(MemoryStorage::new());
        let mut cart = CartStore::restore(catalog()?, Rc::clone(&cart_storage));
        cart.add_item(ProductId(1))?;

        let mut log_storage = MockStorage::new();
        log_storage.expect_get().returning(|_| Ok(None));
        log_storage
            .expect_set()
            .returning(|_, _| Err(StorageError::Backend("quota exceeded".to_string())));
        let log = OrderLog::new(log_storage);

        let mut flow = CheckoutFlow::new(FixedClock::new(Timestamp::UNIX_EPOCH));
        flow.enter_checkout(&cart)?;

        let result = flow.submit(&mut cart, &log, customer());

        assert!(
            matches!(result, Err(CheckoutError::Storage(_))),
            "expected Storage error, got {result:?}"
        );
        assert!(flow.checkout_summary().is_some());
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[test]
    fn failed_cart_write_still_returns_logged_order() -> TestResult {
        let mut sequence = Sequence::new();
        let mut cart_storage = MockStorage::new();
        cart_storage.expect_get().returning(|_| Ok(None));
        cart_storage
            .expect_set()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| Ok(()));
        cart_storage
            .expect_set()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| Err(StorageError::Backend("quota exceeded".to_string())));

        let mut cart = CartStore::restore(catalog()?, cart_storage);
        cart.add_item(ProductId(1))?;

        let log_storage = Rc::new(MemoryStorage::new());
        let log = OrderLog::new(Rc::clone(&log_storage));
        let mut flow = CheckoutFlow::new(FixedClock::new(Timestamp::from_millisecond(
            1_718_000_000_000,
        )?));
        flow.enter_checkout(&cart)?;

        let order = flow.submit(&mut cart, &log, customer())?;

        assert_eq!(order.id().as_str(), "OM-1718000000000");
        assert_eq!(flow.confirmed_order_id(), Some(order.id()));
        assert_eq!(logged_orders(&log_storage)?.len(), 1);
        assert!(cart.is_empty());

        Ok(())
    }
}
