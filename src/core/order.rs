//! Order and line item types
//!
//! An [`Order`] owns an ordered list of [`Item`]s and a derived `total_price`.
//! Items have no identity of their own: they are addressed by position, which
//! is what the partial-update merge relies on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

/// A customer purchase record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique identifier, assigned at creation
    pub id: Uuid,

    pub customer_name: String,

    pub customer_email: String,

    pub items: Vec<Item>,

    /// Always equals the sum of `price * quantity` over `items`
    pub total_price: f64,

    /// Creation timestamp, never changed afterwards
    pub created_at: DateTime<Utc>,

    /// Last mutation timestamp; absent until the first successful update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Build a freshly created order with a new id and `created_at = now`
    pub fn new(
        customer_name: String,
        customer_email: String,
        items: Vec<Item>,
        total_price: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_name,
            customer_email,
            items,
            total_price,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Apply a staged update set to this order
    ///
    /// Stores call this while holding their write lock so the whole update is
    /// visible at once.
    pub fn apply(&mut self, update: OrderUpdate) {
        if let Some(name) = update.customer_name {
            self.customer_name = name;
        }
        if let Some(email) = update.customer_email {
            self.customer_email = email;
        }
        if let Some((items, total_price)) = update.items {
            self.items = items;
            self.total_price = total_price;
        }
        self.updated_at = Some(update.updated_at);
    }
}

/// A named, priced, quantified line within an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

impl Item {
    pub fn new(name: impl Into<String>, price: f64, quantity: u32) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
        }
    }
}

/// Request payload for creating an order
///
/// Unknown fields are rejected, including a client-supplied `totalPrice`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewOrder {
    #[validate(length(min = 1, message = "customerName must not be empty"))]
    pub customer_name: String,

    #[validate(email(message = "customerEmail must be a valid email address"))]
    pub customer_email: String,

    /// Line items as sent; every field is checked by the pricing rules
    pub items: Vec<ItemPatch>,
}

/// Partial update of an order
///
/// `None` means the field was absent from the request and must be left
/// untouched. An explicit JSON `null` deserializes to `None` as well.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderPatch {
    #[serde(default)]
    #[validate(length(min = 1, message = "customerName must not be empty"))]
    pub customer_name: Option<String>,

    #[serde(default)]
    #[validate(email(message = "customerEmail must be a valid email address"))]
    pub customer_email: Option<String>,

    #[serde(default)]
    pub items: Option<Vec<ItemPatch>>,
}

/// A line item as it arrives over the wire
///
/// On create every field is required; on update it is merged over the item at
/// the same position. Numbers are kept as raw JSON so that a negative,
/// fractional or non-numeric value is reported as an item error with its
/// position rather than as a malformed body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemPatch {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub price: Option<Value>,

    #[serde(default)]
    pub quantity: Option<Value>,
}

impl ItemPatch {
    /// A complete item, as sent on create
    pub fn new(name: impl Into<String>, price: f64, quantity: u32) -> Self {
        Self {
            name: Some(name.into()),
            price: Some(Value::from(price)),
            quantity: Some(Value::from(quantity)),
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(Value::from(price));
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(Value::from(quantity));
        self
    }
}

impl From<&Item> for ItemPatch {
    fn from(item: &Item) -> Self {
        Self::new(item.name.clone(), item.price, item.quantity)
    }
}

/// Validated update set handed to the store
///
/// Built by the order service once every merged value has passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderUpdate {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    /// Replacement items together with their recomputed total
    pub items: Option<(Vec<Item>, f64)>,
    pub updated_at: DateTime<Utc>,
}
