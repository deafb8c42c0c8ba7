//! Leptos Mandanda Shop Page

use leptos::prelude::*;
use mandanda::products::Catalog;

mod cart;
mod catalog;
mod checkout;
mod contact;
mod scheduler;
mod shop;
mod storage;

use crate::shop::ShopHandle;

/// Page tabs. The shop and the contact form never share the page, so their
/// `email` inputs never clash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Shop,
    Contact,
}

#[component]
fn TabButton(tab: Tab, label: &'static str, current: RwSignal<Tab>) -> impl IntoView {
    view! {
        <button
            type="button"
            class=move || if current.get() == tab { "tab active" } else { "tab" }
            on:click=move |_| current.set(tab)
        >
            {label}
        </button>
    }
}

#[component]
fn ShopTab(shop: ShopHandle) -> impl IntoView {
    view! {
        <cart::CartIcon shop=shop />
        <cart::CartSidebar shop=shop />
        <catalog::ProductsSection shop=shop />
        <checkout::CheckoutSection shop=shop />
        <checkout::ConfirmationSection shop=shop />
    }
}

/// Main page shell.
#[component]
fn App() -> impl IntoView {
    match Catalog::bundled() {
        Ok(catalog) => {
            let shop = ShopHandle::open(catalog);
            let tab = RwSignal::new(Tab::Shop);

            view! {
                <header class="site-header">
                    <h1>"Steve Mandanda"</h1>
                    <nav class="tabs">
                        <TabButton tab=Tab::Shop label="Boutique" current=tab />
                        <TabButton tab=Tab::Contact label="Contact" current=tab />
                    </nav>
                </header>
                <p class="notice" role="status" aria-live="polite">
                    {move || shop.notice.get()}
                </p>
                <main>
                    <Show
                        when=move || tab.get() == Tab::Shop
                        fallback=|| view! { <contact::ContactSection /> }
                    >
                        <ShopTab shop=shop />
                    </Show>
                </main>
            }
            .into_any()
        }
        Err(error) => view! {
            <main class="error">
                <h1>"Steve Mandanda"</h1>
                <p>{format!("Impossible de charger la boutique : {error}")}</p>
            </main>
        }
        .into_any(),
    }
}

fn main() {
    console_error_panic_hook::set_once();

    leptos::mount::mount_to_body(App);
}
