use leptos::prelude::*;
use mandanda::{dom, views::CartLineView};

use crate::shop::ShopHandle;

/// Floating cart button with the unit count.
#[component]
pub(crate) fn CartIcon(shop: ShopHandle) -> impl IntoView {
    let count = move || shop.read(|storefront| storefront.cart().total_quantity());

    view! {
        <button
            type="button"
            class="cart-icon-fixed"
            aria-label="Ouvrir le panier"
            style:transform=move || if shop.cart_bump.get() { "scale(1.3)" } else { "scale(1)" }
            on:click=move |_| shop.sidebar_open.update(|open| *open = !*open)
        >
            "🛒"
            <span id=dom::CART_COUNT class="cart-count">{count}</span>
        </button>
    }
}

#[component]
fn CartLine(line: CartLineView, shop: ShopHandle) -> impl IntoView {
    let CartLineView {
        id,
        emoji,
        name,
        unit_price,
        quantity,
    } = line;

    view! {
        <div class="cart-item">
            <div class="cart-item-image" aria-hidden="true">{emoji}</div>
            <div class="cart-item-details">
                <h4>{name}</h4>
                <div>{unit_price}</div>
                <div class="cart-item-controls">
                    <button
                        type="button"
                        class="quantity-btn"
                        on:click=move |_| {
                            shop.act(|storefront| storefront.update_quantity(id, -1));
                        }
                    >
                        "-"
                    </button>
                    <span>{quantity}</span>
                    <button
                        type="button"
                        class="quantity-btn"
                        on:click=move |_| {
                            shop.act(|storefront| storefront.update_quantity(id, 1));
                        }
                    >
                        "+"
                    </button>
                    <button
                        type="button"
                        class="remove-btn"
                        on:click=move |_| {
                            shop.act(|storefront| storefront.remove_from_cart(id));
                        }
                    >
                        "Retirer"
                    </button>
                </div>
            </div>
        </div>
    }
}

/// Slide-in cart with its lines, total and checkout button.
#[component]
pub(crate) fn CartSidebar(shop: ShopHandle) -> impl IntoView {
    let summary = Memo::new(move |_| shop.read(|storefront| storefront.cart_summary()));

    let go_to_checkout = move |_| {
        if shop.act(|storefront| storefront.go_to_checkout().map(|_| ())) {
            shop.sidebar_open.set(false);
        }
    };

    view! {
        <aside
            id=dom::CART_SIDEBAR
            class=move || if shop.sidebar_open.get() { "cart-sidebar open" } else { "cart-sidebar" }
        >
            <div class="cart-header">
                <h3>"Mon panier"</h3>
                <button
                    type="button"
                    class="close-cart"
                    aria-label="Fermer le panier"
                    on:click=move |_| shop.sidebar_open.set(false)
                >
                    "×"
                </button>
            </div>
            <div id=dom::CART_ITEMS class="cart-items">
                {move || {
                    let summary = summary.get();

                    if summary.is_empty {
                        view! { <div class="empty-cart">"Votre panier est vide 🛒"</div> }.into_any()
                    } else {
                        summary
                            .lines
                            .into_iter()
                            .map(|line| view! { <CartLine line=line shop=shop /> })
                            .collect_view()
                            .into_any()
                    }
                }}
            </div>
            <div class="cart-footer">
                <div class="cart-total-line">
                    "Total: "
                    <span id=dom::CART_TOTAL>{move || summary.get().total}</span>
                </div>
                <button
                    type="button"
                    id=dom::CHECKOUT_BUTTON
                    class="checkout-btn"
                    prop:disabled=move || !summary.get().checkout_enabled
                    style:opacity=move || if summary.get().checkout_enabled { "1" } else { "0.5" }
                    on:click=go_to_checkout
                >
                    "Passer commande"
                </button>
            </div>
        </aside>
    }
}
