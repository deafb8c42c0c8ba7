use std::io;

use clap::Args;
use tabled::builder::Builder;

use mandanda::{
    cart::CartObserver, clock::Clock, orders::Customer, storage::Storage, storefront::Storefront,
};

use super::{CliError, render_table};

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Prénom
    #[arg(long)]
    first_name: String,

    /// Nom
    #[arg(long)]
    last_name: String,

    /// Email
    #[arg(long)]
    email: String,

    /// Téléphone
    #[arg(long)]
    phone: String,

    /// Adresse
    #[arg(long)]
    address: String,

    /// Ville
    #[arg(long)]
    city: String,

    /// Code postal
    #[arg(long)]
    postal_code: String,

    /// Pays
    #[arg(long)]
    country: String,
}

impl From<CheckoutArgs> for Customer {
    fn from(args: CheckoutArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            phone: args.phone,
            address: args.address,
            city: args.city,
            postal_code: args.postal_code,
            country: args.country,
        }
    }
}

pub(crate) fn run<S, C, O>(
    args: CheckoutArgs,
    shop: &mut Storefront<S, C, O>,
    out: &mut impl io::Write,
) -> Result<(), CliError>
where
    S: Storage + Clone,
    C: Clock,
    O: CartObserver,
{
    shop.go_to_checkout()?;

    if let Some(summary) = shop.checkout_summary() {
        let mut builder = Builder::default();
        builder.push_record(["Article", "Total"]);

        for line in summary.lines {
            builder.push_record([line.label, line.total]);
        }

        builder.push_record(["Total".to_string(), summary.total]);

        writeln!(out, "{}", render_table(builder, 1..2))?;
    }

    let order = shop.place_order(args.into())?;

    writeln!(out, "Commande confirmée")?;
    writeln!(out, "Numéro de commande: {}", order.id())?;

    shop.reset_shop()?;

    Ok(())
}
