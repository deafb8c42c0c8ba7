use leptos::{
    ev::{Event, SubmitEvent},
    prelude::*,
};
use mandanda::{
    clock::SystemClock,
    contact::{ContactErrors, ContactField, ContactForm, ContactFormController, ContactPhase},
    dom,
};

use crate::scheduler::TimeoutScheduler;

type Controller = ContactFormController<TimeoutScheduler, SystemClock>;

#[component]
fn ContactInput(
    field: ContactField,
    label: &'static str,
    controller: StoredValue<Controller, LocalStorage>,
    values: RwSignal<ContactForm>,
    errors: RwSignal<ContactErrors>,
) -> impl IntoView {
    let value = move || values.with(|form| form.field(field).to_string());
    let error = move || errors.with(|errors| errors.get(field)).map(|error| error.to_string());

    let on_input = move |ev: Event| {
        let typed = event_target_value(&ev);

        controller.with_value(|controller| {
            controller.input(field, &typed);
            values.set(controller.form());
            errors.set(controller.errors());
        });
    };

    let input = if field == ContactField::Message {
        view! {
            <textarea
                id=field.dom_id()
                name=field.dom_id()
                rows="5"
                prop:value=value
                on:input=on_input
            ></textarea>
        }
        .into_any()
    } else {
        let input_type = if field == ContactField::Email { "email" } else { "text" };

        view! {
            <input
                id=field.dom_id()
                name=field.dom_id()
                type=input_type
                prop:value=value
                on:input=on_input
            />
        }
        .into_any()
    };

    view! {
        <div class=move || if error().is_some() { "form-group error" } else { "form-group" }>
            <label for=field.dom_id()>{label}</label>
            {input}
            <span class="error-message">{error}</span>
        </div>
    }
}

/// Contact form with its simulated send.
#[component]
pub(crate) fn ContactSection() -> impl IntoView {
    let phase = RwSignal::new(ContactPhase::Editing);
    let values = RwSignal::new(ContactForm::default());
    let errors = RwSignal::new(ContactErrors::default());

    let controller = StoredValue::new_local(
        ContactFormController::new(TimeoutScheduler, SystemClock).with_listener(move |next| {
            if next == ContactPhase::Confirmed {
                values.set(ContactForm::default());
            }

            phase.set(next);
        }),
    );

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();

        controller.with_value(|controller| {
            controller.submit();
            errors.set(controller.errors());
        });
    };

    view! {
        <section class="contact">
            <h2>"Contact"</h2>
            <form
                id=dom::CONTACT_FORM
                class=move || {
                    if phase.get() == ContactPhase::Confirmed { "contact-form hidden" } else { "contact-form" }
                }
                novalidate=true
                on:submit=on_submit
            >
                {[
                    (ContactField::Name, "Nom"),
                    (ContactField::Email, "Email"),
                    (ContactField::Message, "Message"),
                ]
                    .into_iter()
                    .map(|(field, label)| {
                        view! {
                            <ContactInput
                                field=field
                                label=label
                                controller=controller
                                values=values
                                errors=errors
                            />
                        }
                    })
                    .collect_view()}
                <button
                    type="submit"
                    class="submit-btn"
                    prop:disabled=move || phase.get() != ContactPhase::Editing
                >
                    {move || if phase.get() == ContactPhase::Sending { "Envoi..." } else { "Envoyer" }}
                </button>
            </form>
            <div
                id=dom::CONTACT_CONFIRMATION
                class=move || {
                    if phase.get() == ContactPhase::Confirmed {
                        "confirmation-message show"
                    } else {
                        "confirmation-message"
                    }
                }
            >
                "Merci ! Votre message a bien été envoyé."
            </div>
        </section>
    }
}
