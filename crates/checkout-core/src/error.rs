//! # Checkout Error Types
//!
//! Typed error handling for the checkout flow.
//! All checkout and pricing operations return `Result<T, CheckoutError>`.

use crate::cart::CartId;
use crate::customer::CustomerId;
use crate::product::ProductId;
use crate::provider::TransactionId;
use thiserror::Error;

/// Core error type for all checkout operations
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Customer or cart missing (or cart not owned by the customer)
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: u64 },

    /// Malformed product data in a cart line (missing/zero weight, negative price)
    #[error("Invalid product: {0}")]
    InvalidProduct(String),

    /// Stock provider reported at least one line as unavailable
    #[error("Items out of stock: {product_ids:?}")]
    StockUnavailable { product_ids: Vec<ProductId> },

    /// Payment provider refused the authorization
    #[error("Payment not authorized for customer {customer_id}")]
    PaymentDeclined { customer_id: CustomerId },

    /// Stock deduction failed after payment was authorized; the payment was cancelled
    #[error("Failed to deduct stock, payment {transaction_id:?} cancelled")]
    StockDeduction {
        transaction_id: Option<TransactionId>,
    },

    /// An external collaborator failed outright
    #[error("Provider error [{provider}]: {message}")]
    Provider { provider: String, message: String },

    /// Configuration errors (bad pricing table, unreadable seed file)
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CheckoutError {
    pub fn customer_not_found(id: CustomerId) -> Self {
        CheckoutError::NotFound {
            entity: "customer",
            id,
        }
    }

    pub fn cart_not_found(id: CartId) -> Self {
        CheckoutError::NotFound { entity: "cart", id }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        CheckoutError::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Returns true if a caller may reasonably try again.
    ///
    /// Business-rule failures are final; only a collaborator that failed
    /// outright is worth retrying. The core itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CheckoutError::Provider { .. })
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::NotFound { .. } => 404,
            CheckoutError::InvalidProduct(_) => 422,
            CheckoutError::StockUnavailable { .. } => 409,
            CheckoutError::PaymentDeclined { .. } => 402,
            CheckoutError::StockDeduction { .. } => 409,
            CheckoutError::Provider { .. } => 502,
            CheckoutError::Configuration(_) => 500,
        }
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;
