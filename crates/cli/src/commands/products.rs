use std::io;

use tabled::builder::Builder;

use mandanda::{products::Catalog, views::product_cards};

use super::{CliError, render_table};

pub(crate) fn run(catalog: &Catalog, out: &mut impl io::Write) -> Result<(), CliError> {
    let mut builder = Builder::default();
    builder.push_record(["ID", "", "Produit", "Description", "Prix"]);

    for card in product_cards(catalog) {
        builder.push_record([
            card.id.to_string(),
            card.emoji,
            card.name,
            card.description,
            card.price,
        ]);
    }

    writeln!(out, "{}", render_table(builder, 4..5))?;

    Ok(())
}
