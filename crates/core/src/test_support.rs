//! Shared test fixtures.

use std::{error::Error, rc::Rc};

use crate::{
    cart::CartLineItem,
    orders::Customer,
    products::{Catalog, ProductId},
};

pub(crate) fn catalog() -> Result<Rc<Catalog>, Box<dyn Error>> {
    Ok(Rc::new(Catalog::bundled()?))
}

pub(crate) fn line(id: u32, quantity: u32) -> Result<CartLineItem, Box<dyn Error>> {
    let catalog = Catalog::bundled()?;
    let product = catalog.get(ProductId(id)).ok_or("unknown product")?;

    Ok(CartLineItem {
        quantity,
        ..CartLineItem::new(product)
    })
}

pub(crate) fn customer() -> Customer {
    Customer {
        first_name: "Steve".to_string(),
        last_name: "Mandanda".to_string(),
        email: "steve@om.fr".to_string(),
        phone: "0491000000".to_string(),
        address: "3 boulevard Michelet".to_string(),
        city: "Marseille".to_string(),
        postal_code: "13008".to_string(),
        country: "France".to_string(),
    }
}
