//! # Cart Types
//!
//! Shopping carts awaiting checkout. The checkout flow only ever reads
//! carts; it never writes them back.

use crate::customer::CustomerId;
use crate::product::{Product, ProductId};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Cart identifier
pub type CartId = u64;

/// A line in a cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product being bought (denormalized, as loaded with the cart)
    pub product: Product,

    /// Quantity
    pub quantity: u64,
}

impl LineItem {
    pub fn new(product: Product, quantity: u64) -> Self {
        Self { product, quantity }
    }

    pub fn product_id(&self) -> ProductId {
        self.product.id
    }
}

/// A customer's shopping cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    /// Cart ID
    pub id: CartId,

    /// Owning customer
    pub customer_id: CustomerId,

    /// Line items, in insertion order
    #[serde(default)]
    pub items: Vec<LineItem>,

    /// Creation date
    pub created_on: NaiveDate,
}

impl Cart {
    /// Create an empty cart dated today
    pub fn new(id: CartId, customer_id: CustomerId) -> Self {
        Self {
            id,
            customer_id,
            items: Vec::new(),
            created_on: Utc::now().date_naive(),
        }
    }

    /// Add a line item
    pub fn add_item(&mut self, item: LineItem) {
        self.items.push(item);
    }

    /// Builder: add a product with quantity
    pub fn with_product(mut self, product: Product, quantity: u64) -> Self {
        self.add_item(LineItem::new(product, quantity));
        self
    }

    /// Builder: set creation date
    pub fn dated(mut self, date: NaiveDate) -> Self {
        self.created_on = date;
        self
    }

    /// Check if cart is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Product ids and quantities as the parallel sequences stock providers take
    pub fn stock_request(&self) -> (Vec<ProductId>, Vec<u64>) {
        self.items
            .iter()
            .map(|item| (item.product_id(), item.quantity))
            .unzip()
    }
}
