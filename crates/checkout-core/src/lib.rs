//! # checkout-core
//!
//! Pricing and checkout orchestration for storefront-checkout-rs.
//!
//! This crate provides:
//! - `PricingEngine` and `PricingRules` for volume discounts and
//!   weight/fragility based shipping
//! - `CheckoutService`, which validates stock, prices the cart, authorizes
//!   payment, deducts stock and cancels the payment if the deduction fails
//! - `StockProvider`, `PaymentProvider`, `CustomerRepository` and
//!   `CartRepository` traits for the external collaborators
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use checkout_core::CheckoutService;
//!
//! let service = CheckoutService::new(customers, carts, stock, payments);
//!
//! let outcome = service.finalize_checkout(cart_id, customer_id).await?;
//! assert!(outcome.success);
//! ```

pub mod cart;
pub mod checkout;
pub mod customer;
pub mod error;
pub mod pricing;
pub mod product;
pub mod provider;

// Re-exports for convenience
pub use cart::{Cart, CartId, LineItem};
pub use checkout::{CheckoutOutcome, CheckoutService, CheckoutStage, CHECKOUT_CONFIRMATION};
pub use customer::{Customer, CustomerId, CustomerTier, Region};
pub use error::{CheckoutError, CheckoutResult};
pub use pricing::{DiscountTier, PriceBreakdown, PricingEngine, PricingRules, WeightBand};
pub use product::{Product, ProductCategory, ProductId};
pub use provider::{
    Availability, CartRepository, CustomerRepository, PaymentAuthorization, PaymentProvider,
    SharedCartRepository, SharedCustomerRepository, SharedPaymentProvider, SharedStockProvider,
    StockDeduction, StockProvider, TransactionId,
};
