//! Orders

use std::fmt;

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use tracing::warn;

use crate::{
    cart::{CartLineItem, total_price},
    storage::{ORDERS_STORAGE_KEY, Storage, StorageError},
};

/// Prefix of every order id.
pub const ORDER_ID_PREFIX: &str = "OM-";

/// Order identifier: [`ORDER_ID_PREFIX`] followed by the creation time in Unix milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Id for an order created at `created_at`.
    pub fn from_timestamp(created_at: Timestamp) -> Self {
        Self(format!("{ORDER_ID_PREFIX}{}", created_at.as_millisecond()))
    }

    /// The id as shown to the customer.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Checkout form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerField {
    /// First name
    FirstName,
    /// Last name
    LastName,
    /// Email address
    Email,
    /// Phone number
    Phone,
    /// Street address
    Address,
    /// City
    City,
    /// Postal code
    PostalCode,
    /// Country
    Country,
}

impl CustomerField {
    /// Every field, in form order.
    pub const ALL: [Self; 8] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Phone,
        Self::Address,
        Self::City,
        Self::PostalCode,
        Self::Country,
    ];

    /// Id of the matching input element.
    pub fn dom_id(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::City => "city",
            Self::PostalCode => "postalCode",
            Self::Country => "country",
        }
    }

    /// Form label.
    pub fn label(self) -> &'static str {
        match self {
            Self::FirstName => "Prénom",
            Self::LastName => "Nom",
            Self::Email => "Email",
            Self::Phone => "Téléphone",
            Self::Address => "Adresse",
            Self::City => "Ville",
            Self::PostalCode => "Code postal",
            Self::Country => "Pays",
        }
    }
}

impl fmt::Display for CustomerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dom_id())
    }
}

/// Customer details collected at checkout. Free text, not format-checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// Postal code
    pub postal_code: String,
    /// Country
    pub country: String,
}

impl Customer {
    /// Value of one field.
    pub fn field(&self, field: CustomerField) -> &str {
        match field {
            CustomerField::FirstName => &self.first_name,
            CustomerField::LastName => &self.last_name,
            CustomerField::Email => &self.email,
            CustomerField::Phone => &self.phone,
            CustomerField::Address => &self.address,
            CustomerField::City => &self.city,
            CustomerField::PostalCode => &self.postal_code,
            CustomerField::Country => &self.country,
        }
    }

    /// Mutable access to one field.
    pub fn field_mut(&mut self, field: CustomerField) -> &mut String {
        match field {
            CustomerField::FirstName => &mut self.first_name,
            CustomerField::LastName => &mut self.last_name,
            CustomerField::Email => &mut self.email,
            CustomerField::Phone => &mut self.phone,
            CustomerField::Address => &mut self.address,
            CustomerField::City => &mut self.city,
            CustomerField::PostalCode => &mut self.postal_code,
            CustomerField::Country => &mut self.country,
        }
    }

    /// Required fields that are blank, in form order.
    pub fn missing_fields(&self) -> Vec<CustomerField> {
        CustomerField::ALL
            .into_iter()
            .filter(|field| self.field(*field).trim().is_empty())
            .collect()
    }
}

/// A completed checkout. Never changes once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    #[serde(serialize_with = "serialize_date")]
    date: Timestamp,
    items: Vec<CartLineItem>,
    customer: Customer,
    #[serde(with = "rust_decimal::serde::float")]
    total: Decimal,
}

impl Order {
    /// Snapshot `items` into an order placed at `created_at`.
    pub fn new(created_at: Timestamp, items: &[CartLineItem], customer: Customer) -> Self {
        Self {
            id: OrderId::from_timestamp(created_at),
            date: created_at,
            items: items.to_vec(),
            customer,
            total: total_price(items),
        }
    }

    /// Order id.
    pub fn id(&self) -> &OrderId {
        &self.id
    }

    /// When the order was placed.
    pub fn date(&self) -> Timestamp {
        self.date
    }

    /// Cart contents at checkout.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Customer details.
    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    /// Sum of price times quantity over the items.
    pub fn total(&self) -> Decimal {
        self.total
    }
}

/// UTC with millisecond precision, the same shape whatever the milliseconds.
fn serialize_date<S: Serializer>(date: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.strftime("%Y-%m-%dT%H:%M:%S%.3fZ"))
}

/// Append-only persisted history of orders.
///
/// Existing entries are carried over untouched as raw JSON, whatever their
/// shape.
#[derive(Debug, Clone)]
pub struct OrderLog<S: Storage> {
    storage: S,
}

impl<S: Storage> OrderLog<S> {
    /// Log persisted in `storage`.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Append `order` to the end of the log.
    ///
    /// An absent or malformed log is started afresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be read or written.
    pub fn append(&self, order: &Order) -> Result<(), StorageError> {
        let mut entries = match self.storage.get(ORDERS_STORAGE_KEY)? {
            Some(raw) => serde_json::from_str::<Vec<serde_json::Value>>(&raw).unwrap_or_else(|error| {
                warn!(%error, "malformed order log, starting a new one");
                Vec::new()
            }),
            None => Vec::new(),
        };

        entries.push(serde_json::to_value(order)?);

        self.storage
            .set(ORDERS_STORAGE_KEY, &serde_json::to_string(&entries)?)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use testresult::TestResult;

    use crate::{
        storage::MemoryStorage,
        test_support::{customer, line},
    };

    use super::*;

    #[test]
    fn order_id_is_prefix_and_millis() -> TestResult {
        let created_at = Timestamp::from_millisecond(1_718_000_000_123)?;

        let order = Order::new(created_at, &[line(1, 1)?], customer());

        assert_eq!(order.id().as_str(), "OM-1718000000123");
        assert_eq!(
            serde_json::to_value(&order)?["date"],
            "2024-06-10T06:13:20.123Z"
        );

        Ok(())
    }

    #[test]
    fn order_total_sums_lines() -> TestResult {
        let order = Order::new(Timestamp::UNIX_EPOCH, &[line(1, 2)?, line(3, 1)?], customer());

        assert_eq!(order.total(), Decimal::new(199_97, 2));
        assert_eq!(order.items().len(), 2);

        Ok(())
    }

    #[test]
    fn order_serializes_in_page_shape() -> TestResult {
        let created_at = Timestamp::from_millisecond(1_718_000_000_000)?;
        let order = Order::new(created_at, &[line(7, 1)?], customer());

        let value = serde_json::to_value(&order)?;

        assert_eq!(value["id"], "OM-1718000000000");
        assert_eq!(value["date"], "2024-06-10T06:13:20.000Z");
        assert_eq!(value["total"], 12.99);
        assert_eq!(value["customer"]["firstName"], "Steve");
        assert_eq!(value["customer"]["postalCode"], "13008");
        assert_eq!(value["items"][0]["quantity"], 1);

        Ok(())
    }

    #[test]
    fn missing_fields_lists_blank_values_in_form_order() {
        let mut partial = customer();
        partial.email = "   ".to_string();
        partial.country = String::new();

        assert_eq!(
            partial.missing_fields(),
            vec![CustomerField::Email, CustomerField::Country]
        );
        assert!(customer().missing_fields().is_empty());
    }

    #[test]
    fn log_appends_without_rewriting_history() -> TestResult {
        let storage = Rc::new(MemoryStorage::new());
        storage.set(ORDERS_STORAGE_KEY, r#"[{"id":"OM-1","legacy":true}]"#)?;

        let log = OrderLog::new(Rc::clone(&storage));
        let order = Order::new(Timestamp::UNIX_EPOCH, &[line(2, 1)?], customer());

        log.append(&order)?;
        log.append(&order)?;

        let raw = storage.get(ORDERS_STORAGE_KEY)?.ok_or("log missing")?;
        let entries: Vec<serde_json::Value> = serde_json::from_str(&raw)?;

        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries.first(),
            Some(&serde_json::json!({"id": "OM-1", "legacy": true}))
        );
        assert_eq!(entries.get(2).map(|entry| &entry["id"]), Some(&serde_json::json!("OM-0")));

        Ok(())
    }

    #[test]
    fn malformed_log_is_replaced() -> TestResult {
        let storage = Rc::new(MemoryStorage::new());
        storage.set(ORDERS_STORAGE_KEY, "{oops")?;

        let log = OrderLog::new(Rc::clone(&storage));
        log.append(&Order::new(Timestamp::UNIX_EPOCH, &[line(2, 1)?], customer()))?;

        let raw = storage.get(ORDERS_STORAGE_KEY)?.ok_or("log missing")?;
        let entries: Vec<Order> = serde_json::from_str(&raw)?;

        assert_eq!(entries.len(), 1);

        Ok(())
    }
}
