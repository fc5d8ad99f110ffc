//! # Simulated Stock
//!
//! In-memory stock levels behind the `StockProvider` trait.
//! Unknown products have zero stock.

use async_trait::async_trait;
use checkout_core::{Availability, CheckoutResult, ProductId, StockDeduction, StockProvider};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

/// Stock levels held in memory
#[derive(Debug, Default)]
pub struct SimulatedStock {
    levels: Mutex<HashMap<ProductId, u64>>,
}

impl SimulatedStock {
    /// Create with no stock at all
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with the demo stock levels (product 5 is sold out)
    pub fn with_default_levels() -> Self {
        Self::from_levels([(1, 100), (2, 50), (3, 200), (4, 10), (5, 0)])
    }

    /// Create from (product, quantity) pairs
    pub fn from_levels(levels: impl IntoIterator<Item = (ProductId, u64)>) -> Self {
        Self {
            levels: Mutex::new(levels.into_iter().collect()),
        }
    }

    /// Overwrite the stock of a product
    pub async fn set_stock(&self, product_id: ProductId, quantity: u64) {
        self.levels.lock().await.insert(product_id, quantity);
    }

    /// Add to the stock of a product
    pub async fn add_stock(&self, product_id: ProductId, quantity: u64) {
        let mut levels = self.levels.lock().await;
        let level = levels.entry(product_id).or_insert(0);
        *level = level.saturating_add(quantity);
    }

    /// Current stock of a product
    pub async fn stock_of(&self, product_id: ProductId) -> u64 {
        self.levels
            .lock()
            .await
            .get(&product_id)
            .copied()
            .unwrap_or(0)
    }
}

/// Products whose stock cannot cover the requested quantity.
///
/// Repeated lines for the same product are summed before comparing.
fn shortfalls(
    levels: &HashMap<ProductId, u64>,
    product_ids: &[ProductId],
    quantities: &[u64],
) -> Vec<ProductId> {
    let mut requested: Vec<(ProductId, u64)> = Vec::new();
    for (&id, &qty) in product_ids.iter().zip(quantities) {
        match requested.iter_mut().find(|(pid, _)| *pid == id) {
            Some((_, total)) => *total = total.saturating_add(qty),
            None => requested.push((id, qty)),
        }
    }

    requested
        .into_iter()
        .filter(|(id, qty)| levels.get(id).copied().unwrap_or(0) < *qty)
        .map(|(id, _)| id)
        .collect()
}

#[async_trait]
impl StockProvider for SimulatedStock {
    #[instrument(skip(self))]
    async fn check_availability(
        &self,
        product_ids: &[ProductId],
        quantities: &[u64],
    ) -> CheckoutResult<Availability> {
        if product_ids.len() != quantities.len() {
            debug!("mismatched availability request");
            return Ok(Availability::unavailable(Vec::new()));
        }

        let levels = self.levels.lock().await;
        let missing = shortfalls(&levels, product_ids, quantities);
        if missing.is_empty() {
            Ok(Availability::available())
        } else {
            debug!(?missing, "insufficient stock");
            Ok(Availability::unavailable(missing))
        }
    }

    #[instrument(skip(self))]
    async fn deduct(
        &self,
        product_ids: &[ProductId],
        quantities: &[u64],
    ) -> CheckoutResult<StockDeduction> {
        if product_ids.len() != quantities.len() {
            debug!("mismatched deduction request");
            return Ok(StockDeduction::failed());
        }

        // Verify every line before touching any of them
        let mut levels = self.levels.lock().await;
        if !shortfalls(&levels, product_ids, quantities).is_empty() {
            return Ok(StockDeduction::failed());
        }

        for (id, qty) in product_ids.iter().zip(quantities) {
            if let Some(level) = levels.get_mut(id) {
                *level -= qty;
            }
        }
        Ok(StockDeduction::succeeded())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_availability_lists_every_short_product() {
        let stock = SimulatedStock::with_default_levels();

        let result = stock
            .check_availability(&[1, 4, 5], &[10, 11, 1])
            .await
            .unwrap();

        assert!(!result.available);
        assert_eq!(result.unavailable, vec![4, 5]);
    }

    #[tokio::test]
    async fn test_unknown_product_has_no_stock() {
        let stock = SimulatedStock::new();
        let result = stock.check_availability(&[42], &[1]).await.unwrap();
        assert_eq!(result, Availability::unavailable(vec![42]));
        assert_eq!(stock.stock_of(42).await, 0);
    }

    #[tokio::test]
    async fn test_mismatched_lengths_are_unavailable() {
        let stock = SimulatedStock::with_default_levels();

        let availability = stock.check_availability(&[1, 2], &[1]).await.unwrap();
        let deduction = stock.deduct(&[1], &[1, 2]).await.unwrap();

        assert!(!availability.available);
        assert!(!deduction.success);
        assert_eq!(stock.stock_of(1).await, 100);
    }

    #[tokio::test]
    async fn test_deduct_reduces_stock() {
        let stock = SimulatedStock::with_default_levels();

        let result = stock.deduct(&[1, 2], &[2, 5]).await.unwrap();

        assert!(result.success);
        assert_eq!(stock.stock_of(1).await, 98);
        assert_eq!(stock.stock_of(2).await, 45);
    }

    #[tokio::test]
    async fn test_deduct_is_all_or_nothing() {
        let stock = SimulatedStock::with_default_levels();

        let result = stock.deduct(&[1, 4], &[2, 11]).await.unwrap();

        assert!(!result.success);
        assert_eq!(stock.stock_of(1).await, 100);
        assert_eq!(stock.stock_of(4).await, 10);
    }

    #[tokio::test]
    async fn test_repeated_product_lines_are_summed() {
        let stock = SimulatedStock::from_levels([(7, 5)]);

        let availability = stock.check_availability(&[7, 7], &[3, 3]).await.unwrap();
        let deduction = stock.deduct(&[7, 7], &[3, 3]).await.unwrap();

        assert_eq!(availability.unavailable, vec![7]);
        assert!(!deduction.success);
        assert_eq!(stock.stock_of(7).await, 5);
    }

    #[tokio::test]
    async fn test_add_and_set_stock() {
        let stock = SimulatedStock::new();
        stock.add_stock(3, 4).await;
        stock.add_stock(3, 6).await;
        assert_eq!(stock.stock_of(3).await, 10);

        stock.set_stock(3, 1).await;
        assert_eq!(stock.stock_of(3).await, 1);
    }
}
