//! Subcommands

use std::{io, ops::Range, path::Path, rc::Rc};

use clap::Subcommand;
use tabled::{
    Table,
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use mandanda::{
    checkout::CheckoutError,
    clock::SystemClock,
    fixtures::FixtureError,
    products::Catalog,
    storage::{FileStorage, StorageError},
    storefront::Storefront,
};

mod cart;
mod checkout;
mod contact;
mod products;

pub(crate) use cart::CartCommand;
#[cfg(test)]
pub(crate) use cart::CartSubcommand;

/// Errors surfaced to the user; any of them ends the process with status 1.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Bundled catalog could not be loaded
    #[error("failed to load the catalog: {0}")]
    Catalog(#[from] FixtureError),

    /// Cart or order log could not be read or written
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Checkout was refused
    #[error("checkout failed: {0}")]
    Checkout(#[from] CheckoutError),

    /// Contact form has field errors
    #[error("contact form has {0} invalid field(s)")]
    InvalidContact(usize),

    /// Writing to stdout failed
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// List the catalog
    Products,

    /// Show or change the cart
    Cart(CartCommand),

    /// Place an order for the cart
    Checkout(checkout::CheckoutArgs),

    /// Send a message through the contact form
    Contact(contact::ContactArgs),
}

type Shop = Storefront<FileStorage, SystemClock>;

/// Run `command` against the shop stored in `data_dir`, writing to `out`.
pub(crate) fn run(
    command: Command,
    data_dir: &Path,
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    match command {
        Command::Products => products::run(&Catalog::bundled()?, out),
        Command::Cart(command) => cart::run(command, &mut open_shop(data_dir)?, out),
        Command::Checkout(args) => checkout::run(args, &mut open_shop(data_dir)?, out),
        Command::Contact(args) => contact::run(args, out),
    }
}

fn open_shop(data_dir: &Path) -> Result<Shop, CliError> {
    Ok(Storefront::open(
        Rc::new(Catalog::bundled()?),
        FileStorage::open(data_dir)?,
        SystemClock,
    ))
}

/// Rounded table with the given columns right-aligned.
fn render_table(builder: Builder, numeric_columns: Range<usize>) -> Table {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(numeric_columns), Alignment::right());

    table
}
