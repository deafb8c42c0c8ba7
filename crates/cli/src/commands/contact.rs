use std::io;

use clap::Args;

use mandanda::{
    clock::SystemClock,
    contact::{ContactField, ContactFormController, SubmitOutcome},
    scheduler::ImmediateScheduler,
};

use super::CliError;

#[derive(Debug, Args)]
pub(crate) struct ContactArgs {
    /// Your name
    #[arg(long, default_value = "")]
    name: String,

    /// Your email address
    #[arg(long, default_value = "")]
    email: String,

    /// Message, at least 10 characters
    #[arg(long, default_value = "")]
    message: String,
}

pub(crate) fn run(args: ContactArgs, out: &mut impl io::Write) -> Result<(), CliError> {
    let controller = ContactFormController::new(ImmediateScheduler, SystemClock);

    controller.input(ContactField::Name, &args.name);
    controller.input(ContactField::Email, &args.email);
    controller.input(ContactField::Message, &args.message);

    match controller.submit() {
        SubmitOutcome::Sending(submission) => {
            writeln!(out, "Merci {}, votre message a bien été envoyé !", submission.name)?;
            Ok(())
        }
        SubmitOutcome::Invalid(errors) => {
            for error in errors.iter() {
                writeln!(out, "{}: {error}", error.field().dom_id())?;
            }

            Err(CliError::InvalidContact(errors.len()))
        }
        SubmitOutcome::Ignored => Ok(()),
    }
}
