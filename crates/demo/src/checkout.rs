use leptos::{ev::SubmitEvent, prelude::*};
use mandanda::{
    checkout::CheckoutState,
    dom,
    orders::{Customer, CustomerField},
};

use crate::shop::ShopHandle;

#[component]
fn CustomerInput(field: CustomerField, customer: RwSignal<Customer>) -> impl IntoView {
    let input_type = match field {
        CustomerField::Email => "email",
        CustomerField::Phone => "tel",
        _ => "text",
    };

    view! {
        <div class="form-group">
            <label for=field.dom_id()>{field.label()}</label>
            <input
                id=field.dom_id()
                name=field.dom_id()
                type=input_type
                required=true
                prop:value=move || customer.with(|customer| customer.field(field).to_string())
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    customer.update(|customer| *customer.field_mut(field) = value);
                }
            />
        </div>
    }
}

/// Recap and customer form, shown while checking out.
#[component]
pub(crate) fn CheckoutSection(shop: ShopHandle) -> impl IntoView {
    let customer = RwSignal::new(Customer::default());
    let summary = Memo::new(move |_| shop.read(|storefront| storefront.checkout_summary()));

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();

        let details = customer.get_untracked();

        if shop.act(|storefront| storefront.place_order(details).map(|_| ())) {
            customer.set(Customer::default());
        }
    };

    view! {
        <section
            id=dom::CHECKOUT_SECTION
            class="checkout-section"
            style:display=move || if summary.get().is_some() { "block" } else { "none" }
        >
            <h2>"Finaliser la commande"</h2>
            <div class="checkout-container">
                <div class="checkout-summary">
                    <h3>"Récapitulatif"</h3>
                    <div id=dom::CHECKOUT_ITEMS>
                        {move || {
                            summary
                                .get()
                                .map(|summary| {
                                    summary
                                        .lines
                                        .into_iter()
                                        .map(|line| {
                                            view! {
                                                <div class="checkout-item">
                                                    <span>{line.label}</span>
                                                    <span>{line.total}</span>
                                                </div>
                                            }
                                        })
                                        .collect_view()
                                })
                        }}
                    </div>
                    <div class="checkout-total-line">
                        "Total: "
                        <span id=dom::CHECKOUT_TOTAL>
                            {move || summary.get().map(|summary| summary.total)}
                        </span>
                    </div>
                </div>
                <form id=dom::CHECKOUT_FORM class="checkout-form" on:submit=on_submit>
                    {CustomerField::ALL
                        .into_iter()
                        .map(|field| view! { <CustomerInput field=field customer=customer /> })
                        .collect_view()}
                    <div class="form-actions">
                        <button
                            type="button"
                            class="cancel-btn"
                            on:click=move |_| {
                                shop.act(|storefront| storefront.cancel_checkout());
                            }
                        >
                            "Retour"
                        </button>
                        <button type="submit" class="submit-order-btn">
                            "Confirmer la commande"
                        </button>
                    </div>
                </form>
            </div>
        </section>
    }
}

/// Order confirmation with the order number.
#[component]
pub(crate) fn ConfirmationSection(shop: ShopHandle) -> impl IntoView {
    let order_id = move || match shop.state() {
        CheckoutState::Confirmed(order_id) => Some(order_id.to_string()),
        CheckoutState::Browsing | CheckoutState::Checkout(_) => None,
    };

    view! {
        <section
            id=dom::CONFIRMATION_SECTION
            class="confirmation-section"
            style:display=move || if order_id().is_some() { "block" } else { "none" }
        >
            <div class="confirmation-icon" aria-hidden="true">"✅"</div>
            <h2>"Merci pour votre commande !"</h2>
            <p>"Numéro de commande : " <strong id=dom::ORDER_NUMBER>{order_id}</strong></p>
            <button
                type="button"
                class="back-to-shop-btn"
                on:click=move |_| {
                    shop.act(|storefront| storefront.reset_shop());
                }
            >
                "Retour à la boutique"
            </button>
        </section>
    }
}
