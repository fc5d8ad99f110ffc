//! # Customer Types

use serde::{Deserialize, Serialize};

/// Customer identifier
pub type CustomerId = u64;

/// Shipping region of a customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    North,
    Northeast,
    Midwest,
    Southeast,
    South,
}

impl Default for Region {
    fn default() -> Self {
        Region::Southeast
    }
}

/// Loyalty tier of a customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerTier {
    Gold,
    Silver,
    Bronze,
}

impl Default for CustomerTier {
    fn default() -> Self {
        CustomerTier::Bronze
    }
}

/// A store customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    #[serde(default)]
    pub region: Region,
    #[serde(default)]
    pub tier: CustomerTier,
}

impl Customer {
    pub fn new(id: CustomerId, name: impl Into<String>, region: Region, tier: CustomerTier) -> Self {
        Self {
            id,
            name: name.into(),
            region,
            tier,
        }
    }
}
