//! # Checkout Orchestration
//!
//! Runs one checkout attempt against the external collaborators:
//!
//! ```text
//! start ─► customer_loaded ─► cart_loaded ─► stock_checked ─► priced
//!                                                               │
//!            stock_deducted ◄─ payment_authorized ◄─────────────┘
//!                  │ (deduction refused)
//!                  ▼
//!          payment_cancelled ─► failure reported
//! ```
//!
//! Every edge can exit with an error. Steps run strictly in this order:
//! the cancellation on a refused deduction relies on payment having been
//! authorized first. Nothing is locked between the availability check and
//! the deduction; a concurrent checkout winning that race is handled by the
//! cancellation, not prevented.

use crate::cart::{Cart, CartId};
use crate::customer::{Customer, CustomerId};
use crate::error::{CheckoutError, CheckoutResult};
use crate::pricing::{PriceBreakdown, PricingEngine};
use crate::provider::{
    PaymentAuthorization, SharedCartRepository, SharedCustomerRepository, SharedPaymentProvider,
    SharedStockProvider, TransactionId,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Message carried by a successful [`CheckoutOutcome`]
pub const CHECKOUT_CONFIRMATION: &str = "Purchase completed successfully.";

/// Progress of a single checkout attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStage {
    Start,
    CustomerLoaded,
    CartLoaded,
    StockChecked,
    Priced,
    PaymentAuthorized,
    StockDeducted,
    PaymentCancelled,
}

impl CheckoutStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStage::Start => "start",
            CheckoutStage::CustomerLoaded => "customer_loaded",
            CheckoutStage::CartLoaded => "cart_loaded",
            CheckoutStage::StockChecked => "stock_checked",
            CheckoutStage::Priced => "priced",
            CheckoutStage::PaymentAuthorized => "payment_authorized",
            CheckoutStage::StockDeducted => "stock_deducted",
            CheckoutStage::PaymentCancelled => "payment_cancelled",
        }
    }

    fn advance(self, next: CheckoutStage) -> CheckoutStage {
        debug!(from = self.as_str(), to = next.as_str(), "checkout stage");
        next
    }
}

impl std::fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a completed checkout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,
    pub message: String,
}

impl CheckoutOutcome {
    pub fn completed(transaction_id: Option<TransactionId>) -> Self {
        Self {
            success: true,
            transaction_id,
            message: CHECKOUT_CONFIRMATION.to_string(),
        }
    }
}

/// Checkout orchestrator.
///
/// Holds no per-attempt state, so one instance can serve concurrent
/// checkouts of different carts. Concurrent checkouts of the same cart
/// are not serialized here.
#[derive(Clone)]
pub struct CheckoutService {
    customers: SharedCustomerRepository,
    carts: SharedCartRepository,
    stock: SharedStockProvider,
    payments: SharedPaymentProvider,
    pricing: PricingEngine,
}

impl CheckoutService {
    /// Create a service with the default pricing rules
    pub fn new(
        customers: SharedCustomerRepository,
        carts: SharedCartRepository,
        stock: SharedStockProvider,
        payments: SharedPaymentProvider,
    ) -> Self {
        Self {
            customers,
            carts,
            stock,
            payments,
            pricing: PricingEngine::default(),
        }
    }

    /// Builder: replace the pricing engine
    pub fn with_pricing(mut self, pricing: PricingEngine) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn pricing(&self) -> &PricingEngine {
        &self.pricing
    }

    /// Finalize the checkout of `cart_id` for `customer_id`.
    ///
    /// On any error no stock has been deducted and no payment is left
    /// authorized, except when cancelling the payment itself fails; that
    /// case is logged and still reported as [`CheckoutError::StockDeduction`].
    #[instrument(skip(self), fields(attempt_id = %Uuid::new_v4()))]
    pub async fn finalize_checkout(
        &self,
        cart_id: CartId,
        customer_id: CustomerId,
    ) -> CheckoutResult<CheckoutOutcome> {
        let mut stage = CheckoutStage::Start;

        let customer = self
            .load_customer(customer_id)
            .await
            .map_err(|e| failed(stage, e))?;
        stage = stage.advance(CheckoutStage::CustomerLoaded);

        let cart = self
            .load_cart(cart_id, &customer)
            .await
            .map_err(|e| failed(stage, e))?;
        stage = stage.advance(CheckoutStage::CartLoaded);

        let (product_ids, quantities) = cart.stock_request();

        let availability = self
            .stock
            .check_availability(&product_ids, &quantities)
            .await
            .map_err(|e| failed(stage, e))?;
        if !availability.available {
            return Err(failed(
                stage,
                CheckoutError::StockUnavailable {
                    product_ids: availability.unavailable,
                },
            ));
        }
        stage = stage.advance(CheckoutStage::StockChecked);

        let total = self
            .pricing
            .compute_total_cost(&cart, customer.region, customer.tier)
            .map_err(|e| failed(stage, e))?;
        debug!(%total, "cart priced");
        stage = stage.advance(CheckoutStage::Priced);

        let authorization = self
            .payments
            .authorize(customer.id, total)
            .await
            .map_err(|e| failed(stage, e))?;
        if !authorization.authorized {
            return Err(failed(
                stage,
                CheckoutError::PaymentDeclined {
                    customer_id: customer.id,
                },
            ));
        }
        stage = stage.advance(CheckoutStage::PaymentAuthorized);

        // A provider error here leaves the payment authorized just like a
        // refusal would, so both paths compensate.
        let deducted = match self.stock.deduct(&product_ids, &quantities).await {
            Ok(deduction) => deduction.success,
            Err(e) => {
                error!(error = %e, "stock deduction call failed");
                false
            }
        };
        if !deducted {
            if self.compensate(customer.id, &authorization).await {
                stage = stage.advance(CheckoutStage::PaymentCancelled);
            }
            return Err(failed(
                stage,
                CheckoutError::StockDeduction {
                    transaction_id: authorization.transaction_id,
                },
            ));
        }
        let stage = stage.advance(CheckoutStage::StockDeducted);

        info!(
            %stage,
            cart_id,
            customer_id,
            %total,
            transaction_id = ?authorization.transaction_id,
            "checkout completed"
        );
        Ok(CheckoutOutcome::completed(authorization.transaction_id))
    }

    /// Price a cart without touching stock or payment
    #[instrument(skip(self))]
    pub async fn quote(
        &self,
        cart_id: CartId,
        customer_id: CustomerId,
    ) -> CheckoutResult<PriceBreakdown> {
        let customer = self.load_customer(customer_id).await?;
        let cart = self.load_cart(cart_id, &customer).await?;
        self.pricing.quote(&cart, customer.region, customer.tier)
    }

    async fn load_customer(&self, customer_id: CustomerId) -> CheckoutResult<Customer> {
        self.customers
            .find_by_id(customer_id)
            .await?
            .ok_or_else(|| CheckoutError::customer_not_found(customer_id))
    }

    async fn load_cart(&self, cart_id: CartId, customer: &Customer) -> CheckoutResult<Cart> {
        self.carts
            .find_by_id_and_customer(cart_id, customer)
            .await?
            .ok_or_else(|| CheckoutError::cart_not_found(cart_id))
    }

    /// Best-effort cancellation of an authorized payment. Never retried.
    ///
    /// Returns whether the payment provider confirmed the cancellation.
    async fn compensate(
        &self,
        customer_id: CustomerId,
        authorization: &PaymentAuthorization,
    ) -> bool {
        let Some(transaction_id) = authorization.transaction_id else {
            error!(customer_id, "payment authorized without transaction id, nothing to cancel");
            return false;
        };

        error!(customer_id, transaction_id, "cancelling payment after failed stock deduction");
        match self.payments.cancel(customer_id, transaction_id).await {
            Ok(()) => true,
            Err(e) => {
                error!(customer_id, transaction_id, error = %e, "payment cancellation failed");
                false
            }
        }
    }
}

fn failed(stage: CheckoutStage, err: CheckoutError) -> CheckoutError {
    warn!(%stage, error = %err, "checkout failed");
    err
}
