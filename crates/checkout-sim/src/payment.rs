//! # Simulated Payment Gateway
//!
//! Credit-limit based authorization behind the `PaymentProvider` trait.
//! Customers without a configured limit can spend without bound.

use async_trait::async_trait;
use checkout_core::{
    CheckoutError, CheckoutResult, CustomerId, PaymentAuthorization, PaymentProvider, TransactionId,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// Transaction ids are issued after this value
pub const FIRST_TRANSACTION_BASE: TransactionId = 1000;

#[derive(Debug, Clone, Copy)]
struct TransactionRecord {
    customer_id: CustomerId,
    authorized: bool,
}

#[derive(Debug)]
pub struct SimulatedPayment {
    next_transaction: AtomicU64,
    credit_limits: Mutex<HashMap<CustomerId, Decimal>>,
    transactions: Mutex<HashMap<TransactionId, TransactionRecord>>,
}

impl Default for SimulatedPayment {
    fn default() -> Self {
        Self {
            next_transaction: AtomicU64::new(FIRST_TRANSACTION_BASE),
            credit_limits: Mutex::new(HashMap::new()),
            transactions: Mutex::new(HashMap::new()),
        }
    }
}

impl SimulatedPayment {
    /// Create with no credit limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with the demo credit limits
    pub fn with_default_limits() -> Self {
        Self::from_limits([
            (1, Decimal::from(5000)),
            (2, Decimal::from(1000)),
            (3, Decimal::from(100)),
            (4, Decimal::from(10000)),
        ])
    }

    /// Create from (customer, limit) pairs
    pub fn from_limits(limits: impl IntoIterator<Item = (CustomerId, Decimal)>) -> Self {
        Self {
            credit_limits: Mutex::new(limits.into_iter().collect()),
            ..Self::default()
        }
    }

    pub async fn set_credit_limit(&self, customer_id: CustomerId, limit: Decimal) {
        self.credit_limits.lock().await.insert(customer_id, limit);
    }

    pub async fn remove_credit_limit(&self, customer_id: CustomerId) {
        self.credit_limits.lock().await.remove(&customer_id);
    }

    /// Whether a transaction was authorized and not cancelled since
    pub async fn is_authorized(&self, transaction_id: TransactionId) -> bool {
        self.transactions
            .lock()
            .await
            .get(&transaction_id)
            .is_some_and(|record| record.authorized)
    }
}

#[async_trait]
impl PaymentProvider for SimulatedPayment {
    #[instrument(skip(self))]
    async fn authorize(
        &self,
        customer_id: CustomerId,
        amount: Decimal,
    ) -> CheckoutResult<PaymentAuthorization> {
        if amount <= Decimal::ZERO {
            debug!("declined non-positive amount");
            return Ok(PaymentAuthorization::declined());
        }

        let limit = self.credit_limits.lock().await.get(&customer_id).copied();
        if limit.is_some_and(|limit| amount > limit) {
            debug!(?limit, "declined over credit limit");
            return Ok(PaymentAuthorization::declined());
        }

        let transaction_id = self.next_transaction.fetch_add(1, Ordering::SeqCst) + 1;
        self.transactions.lock().await.insert(
            transaction_id,
            TransactionRecord {
                customer_id,
                authorized: true,
            },
        );
        info!(transaction_id, "payment authorized");
        Ok(PaymentAuthorization::approved(transaction_id))
    }

    #[instrument(skip(self))]
    async fn cancel(
        &self,
        customer_id: CustomerId,
        transaction_id: TransactionId,
    ) -> CheckoutResult<()> {
        let mut transactions = self.transactions.lock().await;
        match transactions.get_mut(&transaction_id) {
            Some(record) if record.customer_id != customer_id => Err(CheckoutError::provider(
                "payment",
                format!(
                    "transaction {} does not belong to customer {}",
                    transaction_id, customer_id
                ),
            )),
            Some(record) => {
                record.authorized = false;
                info!("payment cancelled");
                Ok(())
            }
            None => {
                debug!("cancel for unknown transaction ignored");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_transaction_ids_start_after_base() {
        let payment = SimulatedPayment::new();

        let first = payment.authorize(9, dec!(10)).await.unwrap();
        let second = payment.authorize(9, dec!(10)).await.unwrap();

        assert_eq!(first.transaction_id, Some(1001));
        assert_eq!(second.transaction_id, Some(1002));
        assert!(payment.is_authorized(1001).await);
    }

    #[tokio::test]
    async fn test_credit_limit_enforced() {
        let payment = SimulatedPayment::with_default_limits();

        let at_limit = payment.authorize(3, dec!(100)).await.unwrap();
        let over_limit = payment.authorize(3, dec!(100.01)).await.unwrap();

        assert!(at_limit.authorized);
        assert_eq!(over_limit, PaymentAuthorization::declined());
    }

    #[tokio::test]
    async fn test_no_limit_means_unbounded() {
        let payment = SimulatedPayment::with_default_limits();
        payment.remove_credit_limit(3).await;

        let result = payment.authorize(3, dec!(1000000)).await.unwrap();
        assert!(result.authorized);
    }

    #[tokio::test]
    async fn test_non_positive_amount_declined() {
        let payment = SimulatedPayment::new();
        assert!(!payment.authorize(1, dec!(0)).await.unwrap().authorized);
        assert!(!payment.authorize(1, dec!(-5)).await.unwrap().authorized);
    }

    #[tokio::test]
    async fn test_cancel_revokes_authorization() {
        let payment = SimulatedPayment::new();
        let auth = payment.authorize(1, dec!(50)).await.unwrap();
        let transaction_id = auth.transaction_id.unwrap();

        payment.cancel(1, transaction_id).await.unwrap();
        assert!(!payment.is_authorized(transaction_id).await);

        // Cancelling again or cancelling an unknown id is harmless
        payment.cancel(1, transaction_id).await.unwrap();
        payment.cancel(1, 999_999).await.unwrap();
        assert!(!payment.is_authorized(999_999).await);
    }

    #[tokio::test]
    async fn test_cancel_requires_owning_customer() {
        let payment = SimulatedPayment::new();
        let transaction_id = payment
            .authorize(1, dec!(50))
            .await
            .unwrap()
            .transaction_id
            .unwrap();

        let err = payment.cancel(2, transaction_id).await.unwrap_err();

        assert!(err.is_retryable());
        assert!(payment.is_authorized(transaction_id).await);
    }
}
