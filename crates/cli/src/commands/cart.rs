use std::io;

use clap::{Args, Subcommand};
use tabled::builder::Builder;
use tracing::warn;

use mandanda::{
    cart::CartObserver, clock::Clock, products::ProductId, storage::Storage,
    storefront::Storefront, views::CartSummary,
};

use super::{CliError, render_table};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    pub(crate) command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum CartSubcommand {
    /// Show the cart
    Show,

    /// Add one unit of a product
    Add {
        /// Product id
        id: u32,
    },

    /// Change a line's quantity by a signed amount
    Update {
        /// Product id
        id: u32,

        /// Units to add, or remove when negative
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },

    /// Remove a line
    Remove {
        /// Product id
        id: u32,
    },

    /// Empty the cart
    Clear,
}

pub(crate) fn run<S, C, O>(
    command: CartCommand,
    shop: &mut Storefront<S, C, O>,
    out: &mut impl io::Write,
) -> Result<(), CliError>
where
    S: Storage + Clone,
    C: Clock,
    O: CartObserver,
{
    match command.command {
        CartSubcommand::Show => {}
        CartSubcommand::Add { id } => {
            let product_id = ProductId(id);

            if shop.catalog().get(product_id).is_none() {
                warn!(%product_id, "no such product");
            }

            shop.add_to_cart(product_id)?;
        }
        CartSubcommand::Update { id, delta } => shop.update_quantity(ProductId(id), delta)?,
        CartSubcommand::Remove { id } => shop.remove_from_cart(ProductId(id))?,
        CartSubcommand::Clear => shop.clear_cart()?,
    }

    write_cart(&shop.cart_summary(), out)
}

fn write_cart(summary: &CartSummary, out: &mut impl io::Write) -> Result<(), CliError> {
    if summary.is_empty {
        writeln!(out, "Votre panier est vide 🛒")?;
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["ID", "", "Article", "Prix", "Quantité"]);

    for line in &summary.lines {
        builder.push_record([
            line.id.to_string(),
            line.emoji.clone(),
            line.name.clone(),
            line.unit_price.clone(),
            line.quantity.to_string(),
        ]);
    }

    writeln!(out, "{}", render_table(builder, 3..5))?;
    writeln!(out, "Articles: {}", summary.count)?;
    writeln!(out, "Total: {}", summary.total)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use mandanda::{clock::SystemClock, products::Catalog, storage::MemoryStorage};
    use testresult::TestResult;

    use super::*;

    fn shop() -> Result<Storefront<Rc<MemoryStorage>, SystemClock>, Box<dyn std::error::Error>> {
        Ok(Storefront::open(
            Rc::new(Catalog::bundled()?),
            Rc::new(MemoryStorage::new()),
            SystemClock,
        ))
    }

    fn exec(
        shop: &mut Storefront<Rc<MemoryStorage>, SystemClock>,
        command: CartSubcommand,
    ) -> Result<String, Box<dyn std::error::Error>> {
        let mut out = Vec::new();
        run(CartCommand { command }, shop, &mut out)?;

        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn empty_cart_says_so() -> TestResult {
        let output = exec(&mut shop()?, CartSubcommand::Show)?;

        assert_eq!(output.trim(), "Votre panier est vide 🛒");

        Ok(())
    }

    #[test]
    fn adds_show_running_total() -> TestResult {
        let mut shop = shop()?;

        exec(&mut shop, CartSubcommand::Add { id: 1 })?;
        exec(&mut shop, CartSubcommand::Add { id: 1 })?;
        let output = exec(&mut shop, CartSubcommand::Add { id: 2 })?;

        assert!(output.contains("Total: 204.97€"), "unexpected output:\n{output}");
        assert!(output.contains("Articles: 3"), "unexpected output:\n{output}");

        Ok(())
    }

    #[test]
    fn decrement_to_zero_removes_the_line() -> TestResult {
        let mut shop = shop()?;

        exec(&mut shop, CartSubcommand::Add { id: 4 })?;
        let output = exec(&mut shop, CartSubcommand::Update { id: 4, delta: -1 })?;

        assert_eq!(output.trim(), "Votre panier est vide 🛒");

        Ok(())
    }
}
