//! # Collaborator Traits
//!
//! Narrow seams to everything the checkout does not own: customer and cart
//! storage, the stock service and the payment gateway.
//!
//! ```text
//! ┌──────────────────────┐   ┌──────────────────────┐
//! │ CustomerRepository   │   │ CartRepository       │
//! │  └── find_by_id()    │   │  └── find_by_id_and_ │
//! └──────────────────────┘   │      customer()      │
//!                            └──────────────────────┘
//! ┌──────────────────────┐   ┌──────────────────────┐
//! │ StockProvider        │   │ PaymentProvider      │
//! │  ├── check_avail..() │   │  ├── authorize()     │
//! │  └── deduct()        │   │  └── cancel()        │
//! └──────────────────────┘   └──────────────────────┘
//! ```
//!
//! A collaborator that cannot answer at all returns `Err`; a collaborator
//! that answers "no" returns `Ok` with a negative result.

use crate::cart::{Cart, CartId};
use crate::customer::{Customer, CustomerId};
use crate::error::CheckoutResult;
use crate::product::ProductId;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Payment transaction identifier
pub type TransactionId = u64;

/// Answer to a batched availability query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub available: bool,
    /// Products that cannot be reserved in the requested quantity
    #[serde(default)]
    pub unavailable: Vec<ProductId>,
}

impl Availability {
    pub fn available() -> Self {
        Self {
            available: true,
            unavailable: Vec::new(),
        }
    }

    pub fn unavailable(product_ids: Vec<ProductId>) -> Self {
        Self {
            available: false,
            unavailable: product_ids,
        }
    }
}

/// Answer to a batched stock deduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockDeduction {
    pub success: bool,
}

impl StockDeduction {
    pub fn succeeded() -> Self {
        Self { success: true }
    }

    pub fn failed() -> Self {
        Self { success: false }
    }
}

/// Answer to a payment authorization request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentAuthorization {
    pub authorized: bool,
    #[serde(default)]
    pub transaction_id: Option<TransactionId>,
}

impl PaymentAuthorization {
    pub fn approved(transaction_id: TransactionId) -> Self {
        Self {
            authorized: true,
            transaction_id: Some(transaction_id),
        }
    }

    pub fn declined() -> Self {
        Self {
            authorized: false,
            transaction_id: None,
        }
    }
}

/// Customer lookup
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_by_id(&self, id: CustomerId) -> CheckoutResult<Option<Customer>>;
}

/// Cart lookup scoped to the owning customer
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Returns `None` when the cart is missing or belongs to someone else.
    async fn find_by_id_and_customer(
        &self,
        id: CartId,
        customer: &Customer,
    ) -> CheckoutResult<Option<Cart>>;
}

/// Stock service.
///
/// Both operations take parallel slices of equal length. Implementations
/// must answer a length mismatch with a negative result rather than an error.
#[async_trait]
pub trait StockProvider: Send + Sync {
    /// Check every requested quantity can be reserved, in one call.
    async fn check_availability(
        &self,
        product_ids: &[ProductId],
        quantities: &[u64],
    ) -> CheckoutResult<Availability>;

    /// Commit the reservation, in one call.
    async fn deduct(
        &self,
        product_ids: &[ProductId],
        quantities: &[u64],
    ) -> CheckoutResult<StockDeduction>;
}

/// Payment gateway
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Authorize a charge of `amount` for `customer_id`.
    async fn authorize(
        &self,
        customer_id: CustomerId,
        amount: Decimal,
    ) -> CheckoutResult<PaymentAuthorization>;

    /// Cancel a previously authorized transaction.
    ///
    /// The checkout calls this at most once per attempt and never retries,
    /// so an implementation backed by a real gateway should treat repeated
    /// cancellation of the same transaction as a no-op.
    async fn cancel(
        &self,
        customer_id: CustomerId,
        transaction_id: TransactionId,
    ) -> CheckoutResult<()>;
}

pub type SharedCustomerRepository = Arc<dyn CustomerRepository>;
pub type SharedCartRepository = Arc<dyn CartRepository>;
pub type SharedStockProvider = Arc<dyn StockProvider>;
pub type SharedPaymentProvider = Arc<dyn PaymentProvider>;
