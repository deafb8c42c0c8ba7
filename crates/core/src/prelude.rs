//! Front-end prelude.
//!
//! Everything a page or command needs to drive the shop.

pub use crate::{
    cart::{CartLineItem, CartObserver, CartStore},
    checkout::{CheckoutError, CheckoutState},
    clock::{Clock, SystemClock},
    contact::{
        ContactError, ContactField, ContactForm, ContactFormController, ContactPhase,
        SubmitOutcome,
    },
    orders::{Customer, CustomerField, Order, OrderId},
    products::{Catalog, ProductId},
    scheduler::{Scheduler, Task},
    storage::{FileStorage, MemoryStorage, Storage, StorageError},
    storefront::Storefront,
    views::{CartSummary, CheckoutSummary, ProductCard, format_price, product_cards},
};
