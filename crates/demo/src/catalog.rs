use leptos::prelude::*;
use mandanda::{
    checkout::CheckoutState,
    dom,
    views::{ProductCard, product_cards},
};

use crate::shop::ShopHandle;

#[component]
fn ProductTile(card: ProductCard, shop: ShopHandle) -> impl IntoView {
    let ProductCard {
        id,
        emoji,
        name,
        description,
        price,
    } = card;

    view! {
        <div class="product-card">
            <div class="product-image" aria-hidden="true">{emoji}</div>
            <div class="product-info">
                <h3>{name}</h3>
                <p class="product-description">{description}</p>
                <div class="product-footer">
                    <span class="product-price">{price}</span>
                    <button
                        type="button"
                        class="add-to-cart-btn"
                        on:click=move |_| {
                            if shop.act(|storefront| storefront.add_to_cart(id)) {
                                shop.bump_cart_icon();
                            }
                        }
                    >
                        "Ajouter au panier"
                    </button>
                </div>
            </div>
        </div>
    }
}

/// Catalog grid, hidden while checking out.
#[component]
pub(crate) fn ProductsSection(shop: ShopHandle) -> impl IntoView {
    let cards = shop.peek(|storefront| product_cards(storefront.catalog()));
    let browsing = move || matches!(shop.state(), CheckoutState::Browsing);

    view! {
        <section
            id=dom::PRODUCTS_SECTION
            class="products"
            style:display=move || if browsing() { "block" } else { "none" }
        >
            <h2>"Boutique officielle"</h2>
            <div id=dom::PRODUCTS_GRID class="products-grid">
                {cards
                    .into_iter()
                    .map(|card| view! { <ProductTile card=card shop=shop /> })
                    .collect_view()}
            </div>
        </section>
    }
}
