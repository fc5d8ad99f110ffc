//! # Product Types
//!
//! Catalog products as the checkout sees them.
//! Products arrive from external storage, so weight may be missing and
//! price may be malformed; [`Product::validate`] is the gate the pricing
//! engine runs before touching them.

use crate::error::{CheckoutError, CheckoutResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product identifier
pub type ProductId = u64;

/// Product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Food,
    Electronics,
    Furniture,
    Clothing,
    Book,
}

impl Default for ProductCategory {
    fn default() -> Self {
        ProductCategory::Electronics
    }
}

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Unit price
    pub price: Decimal,

    /// Physical weight in kilograms (required for shipping, may be absent in bad data)
    #[serde(default)]
    pub weight: Option<Decimal>,

    /// Fragile items carry a per-unit shipping surcharge
    #[serde(default)]
    pub fragile: bool,

    /// Product category
    #[serde(default)]
    pub category: ProductCategory,
}

impl Product {
    /// Create a new non-fragile product
    pub fn new(id: ProductId, name: impl Into<String>, price: Decimal, weight: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            price,
            weight: Some(weight),
            fragile: false,
            category: ProductCategory::default(),
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: mark as fragile
    pub fn fragile(mut self) -> Self {
        self.fragile = true;
        self
    }

    /// Builder: set category
    pub fn with_category(mut self, category: ProductCategory) -> Self {
        self.category = category;
        self
    }

    /// Builder: clear the weight (models incomplete catalog data)
    pub fn without_weight(mut self) -> Self {
        self.weight = None;
        self
    }

    /// Check the product can be priced.
    ///
    /// Returns the weight on success so callers don't unwrap it again.
    pub fn validate(&self) -> CheckoutResult<Decimal> {
        if self.price < Decimal::ZERO {
            return Err(CheckoutError::InvalidProduct(format!(
                "product {} has negative price {}",
                self.id, self.price
            )));
        }

        match self.weight {
            None => Err(CheckoutError::InvalidProduct(format!(
                "product {} has no weight",
                self.id
            ))),
            Some(weight) if weight <= Decimal::ZERO => Err(CheckoutError::InvalidProduct(
                format!("product {} has non-positive weight {}", self.id, weight),
            )),
            Some(weight) => Ok(weight),
        }
    }
}
