//! Mandanda
//!
//! Merchandise shop for the Steve Mandanda tribute page: product catalog,
//! persisted cart, checkout with an order log, and the contact form.

pub mod cart;
pub mod checkout;
pub mod clock;
pub mod contact;
pub mod dom;
pub mod fixtures;
pub mod orders;
pub mod prelude;
pub mod products;
pub mod scheduler;
pub mod storage;
pub mod storefront;
pub mod views;

#[cfg(test)]
mod test_support;
