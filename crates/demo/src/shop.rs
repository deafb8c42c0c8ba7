//! Shared shop state for the page.

use std::{fmt::Display, rc::Rc, time::Duration};

use leptos::prelude::*;
use mandanda::{
    cart::{CartLineItem, CartObserver},
    checkout::CheckoutState,
    clock::SystemClock,
    products::Catalog,
    scheduler::Scheduler,
    storefront::Storefront,
};

use crate::{scheduler::TimeoutScheduler, storage::PageStorage};

/// How long the cart icon stays enlarged after an add.
const CART_BUMP_DURATION: Duration = Duration::from_millis(300);

/// Bumps the page revision whenever the cart changes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RevisionObserver(RwSignal<u64>);

impl CartObserver for RevisionObserver {
    fn cart_changed(&self, _items: &[CartLineItem]) {
        self.0.update(|revision| *revision = revision.wrapping_add(1));
    }
}

pub(crate) type Shop = Storefront<PageStorage, SystemClock, RevisionObserver>;

/// Copyable handle to the storefront and the signals the page renders from.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ShopHandle {
    store: StoredValue<Shop, LocalStorage>,
    revision: RwSignal<u64>,

    /// Status line under the header; storage and checkout failures land here.
    pub(crate) notice: RwSignal<Option<String>>,

    /// Whether the cart sidebar is open.
    pub(crate) sidebar_open: RwSignal<bool>,

    /// Whether the cart icon is mid-bump.
    pub(crate) cart_bump: RwSignal<bool>,
}

impl ShopHandle {
    pub(crate) fn open(catalog: Catalog) -> Self {
        let revision = RwSignal::new(0_u64);
        let shop = Storefront::open_with_observer(
            Rc::new(catalog),
            PageStorage::detect(),
            SystemClock,
            RevisionObserver(revision),
        );

        Self {
            store: StoredValue::new_local(shop),
            revision,
            notice: RwSignal::new(None),
            sidebar_open: RwSignal::new(false),
            cart_bump: RwSignal::new(false),
        }
    }

    /// Read the shop once, without subscribing to changes.
    pub(crate) fn peek<T>(self, read: impl FnOnce(&Shop) -> T) -> T {
        self.store.with_value(read)
    }

    /// Read the shop, re-running the caller on every change.
    pub(crate) fn read<T>(self, read: impl FnOnce(&Shop) -> T) -> T {
        self.revision.track();
        self.store.with_value(read)
    }

    /// Where the customer is in the purchase flow, tracked.
    pub(crate) fn state(self) -> CheckoutState {
        self.read(|storefront| storefront.state().clone())
    }

    /// Change the shop and refresh everything that reads it.
    ///
    /// Errors are shown in the notice line and swallowed.
    pub(crate) fn act<E: Display>(self, action: impl FnOnce(&mut Shop) -> Result<(), E>) -> bool {
        let outcome = self.store.try_update_value(action);
        self.revision.update(|revision| *revision = revision.wrapping_add(1));

        match outcome {
            Some(Ok(())) => {
                self.notice.set(None);
                true
            }
            Some(Err(error)) => {
                tracing::warn!(%error, "shop action failed");
                self.notice.set(Some(error.to_string()));
                false
            }
            None => false,
        }
    }

    /// Enlarge the cart icon briefly.
    pub(crate) fn bump_cart_icon(self) {
        let cart_bump = self.cart_bump;

        cart_bump.set(true);
        TimeoutScheduler.schedule(CART_BUMP_DURATION, Box::new(move || cart_bump.set(false)));
    }
}
