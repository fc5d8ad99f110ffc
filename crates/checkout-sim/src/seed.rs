//! # Seed Data
//!
//! TOML description of a simulated storefront: customers, products, carts,
//! stock levels and credit limits. [`Simulation::from_seed`] turns it into
//! ready-to-use collaborators.
//!
//! ```toml
//! [[customers]]
//! id = 1
//! name = "Joana Silva"
//! region = "northeast"
//! tier = "gold"
//!
//! [[products]]
//! id = 1
//! name = "Notebook"
//! price = "2000.00"
//! weight = "2.5"
//!
//! [[carts]]
//! id = 1
//! customer_id = 1
//! items = [{ product_id = 1, quantity = 1 }]
//!
//! [[stock]]
//! product_id = 1
//! quantity = 100
//!
//! [[credit_limits]]
//! customer_id = 1
//! limit = "5000"
//! ```

use crate::payment::SimulatedPayment;
use crate::stock::SimulatedStock;
use crate::store::{InMemoryCarts, InMemoryCustomers};
use checkout_core::{
    Cart, CartId, CheckoutError, CheckoutResult, CheckoutService, Customer, CustomerId, Product,
    ProductId,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

const DEMO_SEED: &str = include_str!("../seeds/demo.toml");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineSeed {
    pub product_id: ProductId,
    pub quantity: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSeed {
    pub id: CartId,
    pub customer_id: CustomerId,
    /// Defaults to today
    #[serde(default)]
    pub created_on: Option<NaiveDate>,
    #[serde(default)]
    pub items: Vec<CartLineSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSeed {
    pub product_id: ProductId,
    pub quantity: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditLimitSeed {
    pub customer_id: CustomerId,
    pub limit: Decimal,
}

/// Everything a simulated storefront starts with
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub carts: Vec<CartSeed>,
    #[serde(default)]
    pub stock: Vec<StockSeed>,
    #[serde(default)]
    pub credit_limits: Vec<CreditLimitSeed>,
}

impl Seed {
    /// Parse a seed from TOML
    pub fn from_toml(toml_str: &str) -> CheckoutResult<Self> {
        toml::from_str(toml_str)
            .map_err(|e| CheckoutError::Configuration(format!("invalid seed: {}", e)))
    }

    /// The bundled demo storefront
    pub fn demo() -> CheckoutResult<Self> {
        Self::from_toml(DEMO_SEED)
    }

    /// Resolve cart lines against the product list.
    ///
    /// Products are copied into each cart as they are at seed time. Product
    /// data is not validated here; bad weights or prices surface at pricing.
    pub fn build_carts(&self) -> CheckoutResult<Vec<Cart>> {
        let products: HashMap<ProductId, &Product> =
            self.products.iter().map(|p| (p.id, p)).collect();

        self.carts
            .iter()
            .map(|seed| {
                if !self.customers.iter().any(|c| c.id == seed.customer_id) {
                    return Err(CheckoutError::Configuration(format!(
                        "cart {} references unknown customer {}",
                        seed.id, seed.customer_id
                    )));
                }

                let mut cart = Cart::new(seed.id, seed.customer_id);
                if let Some(date) = seed.created_on {
                    cart = cart.dated(date);
                }
                for line in &seed.items {
                    let product = products.get(&line.product_id).ok_or_else(|| {
                        CheckoutError::Configuration(format!(
                            "cart {} references unknown product {}",
                            seed.id, line.product_id
                        ))
                    })?;
                    cart = cart.with_product((*product).clone(), line.quantity);
                }
                Ok(cart)
            })
            .collect()
    }
}

/// Simulated collaborators sharing one seeded state
#[derive(Debug, Clone)]
pub struct Simulation {
    pub customers: Arc<InMemoryCustomers>,
    pub carts: Arc<InMemoryCarts>,
    pub stock: Arc<SimulatedStock>,
    pub payments: Arc<SimulatedPayment>,
}

impl Simulation {
    pub fn from_seed(seed: &Seed) -> CheckoutResult<Self> {
        let carts = seed.build_carts()?;

        info!(
            customers = seed.customers.len(),
            products = seed.products.len(),
            carts = carts.len(),
            "seeded simulation"
        );

        Ok(Self {
            customers: Arc::new(InMemoryCustomers::from_customers(seed.customers.clone())),
            carts: Arc::new(InMemoryCarts::from_carts(carts)),
            stock: Arc::new(SimulatedStock::from_levels(
                seed.stock.iter().map(|s| (s.product_id, s.quantity)),
            )),
            payments: Arc::new(SimulatedPayment::from_limits(
                seed.credit_limits.iter().map(|c| (c.customer_id, c.limit)),
            )),
        })
    }

    /// A checkout service wired to these collaborators
    pub fn checkout_service(&self) -> CheckoutService {
        CheckoutService::new(
            self.customers.clone(),
            self.carts.clone(),
            self.stock.clone(),
            self.payments.clone(),
        )
    }
}
