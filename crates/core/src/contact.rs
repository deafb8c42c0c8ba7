//! Contact form
//!
//! Validation for the three-field contact form and the controller that
//! fakes its submission with two timed steps: a network delay, then a
//! confirmation that falls back to the empty form.

use std::{cell::RefCell, fmt, rc::Rc, time::Duration};

use jiff::Timestamp;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, info};

use crate::{clock::Clock, scheduler::Scheduler};

/// Delay before a submission is treated as sent.
pub const SEND_DELAY: Duration = Duration::from_millis(1_000);

/// How long the confirmation stays up before the form comes back.
pub const CONFIRMATION_DURATION: Duration = Duration::from_millis(5_000);

/// Shortest accepted message, in characters after trimming.
pub const MIN_MESSAGE_CHARS: usize = 10;

/// Contact form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    /// Sender name
    Name,
    /// Sender email
    Email,
    /// Message body
    Message,
}

impl ContactField {
    /// Every field, in form order.
    pub const ALL: [Self; 3] = [Self::Name, Self::Email, Self::Message];

    /// Id of the matching input element.
    pub fn dom_id(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Message => "message",
        }
    }
}

/// A field validation failure. The message is shown under the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactError {
    /// Name left blank
    #[error("Veuillez entrer votre nom")]
    NameMissing,

    /// Email left blank
    #[error("Veuillez entrer votre email")]
    EmailMissing,

    /// Email not shaped like `local@domain.tld`
    #[error("Veuillez entrer un email valide")]
    EmailInvalid,

    /// Message left blank
    #[error("Veuillez entrer un message")]
    MessageMissing,

    /// Message shorter than [`MIN_MESSAGE_CHARS`]
    #[error("Le message doit contenir au moins 10 caractères")]
    MessageTooShort,
}

impl ContactError {
    /// Field the error belongs to.
    pub fn field(self) -> ContactField {
        match self {
            Self::NameMissing => ContactField::Name,
            Self::EmailMissing | Self::EmailInvalid => ContactField::Email,
            Self::MessageMissing | Self::MessageTooShort => ContactField::Message,
        }
    }
}

/// Errors currently shown on the form, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactErrors(SmallVec<[ContactError; 3]>);

impl ContactErrors {
    /// Error shown for `field`, if any.
    pub fn get(&self, field: ContactField) -> Option<ContactError> {
        self.0.iter().copied().find(|error| error.field() == field)
    }

    /// Show `error`, replacing any error already on its field.
    pub fn set(&mut self, error: ContactError) {
        self.clear(error.field());
        self.0.push(error);
    }

    /// Hide the error on `field`.
    pub fn clear(&mut self, field: ContactField) {
        self.0.retain(|error| error.field() != field);
    }

    /// Whether no errors are shown.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields in error.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Errors in the order they were raised.
    pub fn iter(&self) -> impl Iterator<Item = ContactError> + '_ {
        self.0.iter().copied()
    }
}

/// Raw form values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    /// Sender name
    pub name: String,
    /// Sender email
    pub email: String,
    /// Message body
    pub message: String,
}

impl ContactForm {
    /// Value of one field.
    pub fn field(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Message => &self.message,
        }
    }

    fn field_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::Name => &mut self.name,
            ContactField::Email => &mut self.email,
            ContactField::Message => &mut self.message,
        }
    }
}

/// A validated, trimmed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    /// Sender name
    pub name: String,
    /// Sender email
    pub email: String,
    /// Message body
    pub message: String,
    /// When the form was submitted
    pub submitted_at: Timestamp,
}

/// Whether `email` looks like `local@domain.tld`: no whitespace, exactly one
/// `@`, and a dot in the domain with something on both sides of it.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(position, c)| c == '.' && position > 0 && position + 1 < domain.len())
}

/// Check one field's value.
///
/// # Errors
///
/// Returns the error to display under the field.
pub fn validate_field(field: ContactField, value: &str) -> Result<(), ContactError> {
    let value = value.trim();

    match field {
        ContactField::Name if value.is_empty() => Err(ContactError::NameMissing),
        ContactField::Email if value.is_empty() => Err(ContactError::EmailMissing),
        ContactField::Email if !is_valid_email(value) => Err(ContactError::EmailInvalid),
        ContactField::Message if value.is_empty() => Err(ContactError::MessageMissing),
        ContactField::Message if value.chars().count() < MIN_MESSAGE_CHARS => {
            Err(ContactError::MessageTooShort)
        }
        ContactField::Name | ContactField::Email | ContactField::Message => Ok(()),
    }
}

/// Check every field of `form`.
///
/// # Errors
///
/// Returns every field error, in form order.
pub fn validate(form: &ContactForm) -> Result<(), ContactErrors> {
    let mut errors = ContactErrors::default();

    for field in ContactField::ALL {
        if let Err(error) = validate_field(field, form.field(field)) {
            errors.set(error);
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Incremental check while typing: hides the field's error once the value is
/// valid, and never shows a new one.
pub fn revalidate_on_input(errors: &mut ContactErrors, field: ContactField, value: &str) {
    if validate_field(field, value).is_ok() {
        errors.clear(field);
    }
}

/// What the contact section is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactPhase {
    /// Form visible and editable
    #[default]
    Editing,
    /// Submitted, waiting for the simulated network
    Sending,
    /// Confirmation message visible
    Confirmed,
}

/// Result of pressing submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Form is valid; sending has started
    Sending(ContactSubmission),
    /// Form has errors; they are now shown
    Invalid(ContactErrors),
    /// A submission is already in flight or confirmed
    Ignored,
}

#[derive(Debug, Default)]
struct ContactState {
    phase: ContactPhase,
    form: ContactForm,
    errors: ContactErrors,
}

type Listener = Rc<dyn Fn(ContactPhase)>;

/// Contact form controller.
///
/// Clones share the same form. Phase changes are reported to the listener,
/// including the ones made later by scheduled tasks.
#[derive(Clone)]
pub struct ContactFormController<S: Scheduler + Clone + 'static, C: Clock> {
    scheduler: S,
    clock: C,
    state: Rc<RefCell<ContactState>>,
    listener: Listener,
}

impl<S: Scheduler + Clone + 'static, C: Clock> ContactFormController<S, C> {
    /// Empty form in [`ContactPhase::Editing`].
    pub fn new(scheduler: S, clock: C) -> Self {
        Self {
            scheduler,
            clock,
            state: Rc::new(RefCell::new(ContactState::default())),
            listener: Rc::new(|_| {}),
        }
    }

    /// Report phase changes to `listener`.
    #[must_use]
    pub fn with_listener(mut self, listener: impl Fn(ContactPhase) + 'static) -> Self {
        self.listener = Rc::new(listener);
        self
    }

    /// Current phase.
    pub fn phase(&self) -> ContactPhase {
        self.state.borrow().phase
    }

    /// Current field values.
    pub fn form(&self) -> ContactForm {
        self.state.borrow().form.clone()
    }

    /// Errors currently shown.
    pub fn errors(&self) -> ContactErrors {
        self.state.borrow().errors.clone()
    }

    /// Record a keystroke in `field`, hiding its error once the value is valid.
    pub fn input(&self, field: ContactField, value: &str) {
        let mut state = self.state.borrow_mut();
        let ContactState { form, errors, .. } = &mut *state;

        value.clone_into(form.field_mut(field));
        revalidate_on_input(errors, field, value);
    }

    /// Validate and, when valid, start the simulated send.
    pub fn submit(&self) -> SubmitOutcome {
        let submission = {
            let mut state = self.state.borrow_mut();

            if state.phase != ContactPhase::Editing {
                debug!(phase = ?state.phase, "ignoring contact submit");
                return SubmitOutcome::Ignored;
            }

            if let Err(errors) = validate(&state.form) {
                state.errors = errors.clone();
                return SubmitOutcome::Invalid(errors);
            }

            state.errors = ContactErrors::default();
            state.phase = ContactPhase::Sending;

            ContactSubmission {
                name: state.form.name.trim().to_string(),
                email: state.form.email.trim().to_string(),
                message: state.form.message.trim().to_string(),
                submitted_at: self.clock.now(),
            }
        };

        info!(
            message_chars = submission.message.chars().count(),
            submitted_at = %submission.submitted_at,
            "contact form submitted"
        );
        debug!(name = %submission.name, email = %submission.email, "contact form sender");

        (self.listener)(ContactPhase::Sending);
        self.schedule_confirmation();

        SubmitOutcome::Sending(submission)
    }

    fn schedule_confirmation(&self) {
        let state = Rc::clone(&self.state);
        let listener = Rc::clone(&self.listener);
        let scheduler = self.scheduler.clone();

        self.scheduler.schedule(
            SEND_DELAY,
            Box::new(move || {
                {
                    let mut state = state.borrow_mut();
                    state.phase = ContactPhase::Confirmed;
                    state.form = ContactForm::default();
                }
                listener(ContactPhase::Confirmed);

                scheduler.schedule(
                    CONFIRMATION_DURATION,
                    Box::new(move || {
                        state.borrow_mut().phase = ContactPhase::Editing;
                        listener(ContactPhase::Editing);
                    }),
                );
            }),
        );
    }
}

impl<S: Scheduler + Clone + 'static, C: Clock> fmt::Debug for ContactFormController<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContactFormController")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::RefCell,
        io,
        sync::{Arc, Mutex},
    };

    use crate::{
        clock::FixedClock,
        scheduler::{ImmediateScheduler, ManualScheduler},
    };

    use super::*;

    fn message_of(chars: usize) -> String {
        "a".repeat(chars)
    }

    fn filled_form(message: &str) -> ContactForm {
        ContactForm {
            name: "Steve".to_string(),
            email: "steve@om.fr".to_string(),
            message: message.to_string(),
        }
    }

    fn controller() -> (
        ContactFormController<ManualScheduler, FixedClock>,
        ManualScheduler,
        Rc<RefCell<Vec<ContactPhase>>>,
    ) {
        let scheduler = ManualScheduler::new();
        let phases = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&phases);

        let controller =
            ContactFormController::new(scheduler.clone(), FixedClock::new(Timestamp::UNIX_EPOCH))
                .with_listener(move |phase| sink.borrow_mut().push(phase));

        (controller, scheduler, phases)
    }

    #[test]
    fn email_shapes() {
        for valid in ["a@b.co", "first.last@om.fr", "x@sub.domain.org", "é@ß.de"] {
            assert!(is_valid_email(valid), "{valid} should be valid");
        }

        for invalid in [
            "", "plain", "@om.fr", "a@", "a@om", "a@.fr", "a@om.", "a b@om.fr", "a@@om.fr",
            "a@b@om.fr",
        ] {
            assert!(!is_valid_email(invalid), "{invalid} should be invalid");
        }
    }

    #[test]
    fn nine_character_message_is_rejected() {
        let result = validate(&filled_form(&message_of(9)));

        let errors = result.err().unwrap_or_default();
        assert_eq!(errors.get(ContactField::Message), Some(ContactError::MessageTooShort));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn ten_character_message_passes() {
        assert_eq!(validate(&filled_form(&message_of(10))), Ok(()));
    }

    #[test]
    fn message_length_ignores_surrounding_whitespace() {
        let padded = format!("   {}   ", message_of(9));

        assert_eq!(
            validate_field(ContactField::Message, &padded),
            Err(ContactError::MessageTooShort)
        );
    }

    #[test]
    fn message_length_counts_characters() {
        assert_eq!(validate_field(ContactField::Message, "éééééééééé"), Ok(()));
    }

    #[test]
    fn empty_form_reports_every_field() {
        let errors = validate(&ContactForm::default()).err().unwrap_or_default();

        let raised: Vec<ContactError> = errors.iter().collect();

        assert_eq!(
            raised,
            vec![
                ContactError::NameMissing,
                ContactError::EmailMissing,
                ContactError::MessageMissing,
            ]
        );
    }

    #[test]
    fn malformed_email_has_its_own_message() {
        assert_eq!(
            validate_field(ContactField::Email, "steve@om"),
            Err(ContactError::EmailInvalid)
        );
        assert_eq!(
            ContactError::EmailInvalid.to_string(),
            "Veuillez entrer un email valide"
        );
    }

    #[test]
    fn input_only_clears_errors() {
        let (controller, _, _) = controller();

        let SubmitOutcome::Invalid(errors) = controller.submit() else {
            unreachable!("empty form must be invalid");
        };
        assert_eq!(errors.len(), 3);

        controller.input(ContactField::Message, "short");
        assert_eq!(
            controller.errors().get(ContactField::Message),
            Some(ContactError::MessageMissing),
            "a still-invalid value must leave the original error in place"
        );

        controller.input(ContactField::Name, "Steve");
        assert_eq!(controller.errors().get(ContactField::Name), None);

        controller.input(ContactField::Name, "");
        assert_eq!(
            controller.errors().get(ContactField::Name),
            None,
            "typing must never raise a new error"
        );
    }

    #[test]
    fn valid_submit_walks_through_timed_phases() {
        let (controller, scheduler, phases) = controller();

        controller.input(ContactField::Name, "  Steve ");
        controller.input(ContactField::Email, "steve@om.fr");
        controller.input(ContactField::Message, "Allez l'OM, merci Steve !");

        let SubmitOutcome::Sending(submission) = controller.submit() else {
            unreachable!("filled form must be sent");
        };
        assert_eq!(submission.name, "Steve");
        assert_eq!(controller.phase(), ContactPhase::Sending);

        scheduler.advance(Duration::from_millis(999));
        assert_eq!(controller.phase(), ContactPhase::Sending);

        scheduler.advance(Duration::from_millis(1));
        assert_eq!(controller.phase(), ContactPhase::Confirmed);
        assert_eq!(controller.form(), ContactForm::default());

        scheduler.advance(Duration::from_millis(4_999));
        assert_eq!(controller.phase(), ContactPhase::Confirmed);

        scheduler.advance(Duration::from_millis(1));
        assert_eq!(controller.phase(), ContactPhase::Editing);

        assert_eq!(
            *phases.borrow(),
            vec![
                ContactPhase::Sending,
                ContactPhase::Confirmed,
                ContactPhase::Editing,
            ]
        );
    }

    #[test]
    fn submit_while_sending_is_ignored() {
        let (controller, scheduler, _) = controller();

        controller.input(ContactField::Name, "Steve");
        controller.input(ContactField::Email, "steve@om.fr");
        controller.input(ContactField::Message, &message_of(12));

        assert!(matches!(controller.submit(), SubmitOutcome::Sending(_)));
        assert_eq!(controller.submit(), SubmitOutcome::Ignored);

        scheduler.advance(SEND_DELAY);
        assert_eq!(controller.submit(), SubmitOutcome::Ignored);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn invalid_submit_stays_editing_and_schedules_nothing() {
        let (controller, scheduler, phases) = controller();

        controller.input(ContactField::Name, "Steve");
        controller.input(ContactField::Email, "steve@om.fr");
        controller.input(ContactField::Message, &message_of(9));

        assert!(matches!(controller.submit(), SubmitOutcome::Invalid(_)));
        assert_eq!(controller.phase(), ContactPhase::Editing);
        assert_eq!(scheduler.pending(), 0);
        assert!(phases.borrow().is_empty());
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            self.0
                .lock()
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                .unwrap_or_default()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0
                .lock()
                .map_err(|error| io::Error::other(error.to_string()))?
                .extend_from_slice(buf);

            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn info_log_leaves_out_sender_and_message() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let (controller, _scheduler, _phases) = controller();

        let outcome = tracing::subscriber::with_default(subscriber, || {
            controller.input(ContactField::Name, "Steve");
            controller.input(ContactField::Email, "steve@om.fr");
            controller.input(ContactField::Message, "Allez l'OM, merci pour tout");
            controller.submit()
        });

        let output = logs.contents();

        assert!(matches!(outcome, SubmitOutcome::Sending(_)), "got {outcome:?}");
        assert!(output.contains("contact form submitted"), "no submit line in {output:?}");
        assert!(!output.contains("steve@om.fr"), "email leaked into {output:?}");
        assert!(!output.contains("Steve"), "name leaked into {output:?}");
        assert!(!output.contains("Allez"), "message leaked into {output:?}");
    }

    #[test]
    fn immediate_scheduler_completes_the_round_trip_inline() {
        let controller =
            ContactFormController::new(ImmediateScheduler, FixedClock::new(Timestamp::UNIX_EPOCH));

        controller.input(ContactField::Name, "Steve");
        controller.input(ContactField::Email, "steve@om.fr");
        controller.input(ContactField::Message, &message_of(10));

        assert!(matches!(controller.submit(), SubmitOutcome::Sending(_)));
        assert_eq!(controller.phase(), ContactPhase::Editing);
        assert_eq!(controller.form(), ContactForm::default());
    }
}
