//! Element ids the page markup and its stylesheet rely on.
//!
//! Customer and contact input ids come from
//! [`CustomerField::dom_id`](crate::orders::CustomerField::dom_id) and
//! [`ContactField::dom_id`](crate::contact::ContactField::dom_id).

/// Section wrapping the catalog
pub const PRODUCTS_SECTION: &str = "products";

/// Product card grid
pub const PRODUCTS_GRID: &str = "products-grid";

/// Cart badge count
pub const CART_COUNT: &str = "cart-count";

/// Cart line list
pub const CART_ITEMS: &str = "cart-items";

/// Cart total
pub const CART_TOTAL: &str = "cart-total";

/// Checkout button in the cart sidebar
pub const CHECKOUT_BUTTON: &str = "checkout-btn";

/// Cart sidebar
pub const CART_SIDEBAR: &str = "cart-sidebar";

/// Checkout page
pub const CHECKOUT_SECTION: &str = "checkout-section";

/// Checkout recap lines
pub const CHECKOUT_ITEMS: &str = "checkout-items";

/// Checkout recap total
pub const CHECKOUT_TOTAL: &str = "checkout-total";

/// Customer details form
pub const CHECKOUT_FORM: &str = "checkout-form";

/// Order confirmation page
pub const CONFIRMATION_SECTION: &str = "confirmation-section";

/// Placed order id
pub const ORDER_NUMBER: &str = "order-number";

/// Contact form
pub const CONTACT_FORM: &str = "contactForm";

/// Contact confirmation message
pub const CONTACT_CONFIRMATION: &str = "confirmationMessage";
