//! # In-Memory Stores
//!
//! Customer and cart lookup backed by hash maps.

use async_trait::async_trait;
use checkout_core::{
    Cart, CartId, CartRepository, CheckoutResult, Customer, CustomerId, CustomerRepository,
};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct InMemoryCustomers {
    customers: RwLock<HashMap<CustomerId, Customer>>,
}

impl InMemoryCustomers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_customers(customers: impl IntoIterator<Item = Customer>) -> Self {
        Self {
            customers: RwLock::new(customers.into_iter().map(|c| (c.id, c)).collect()),
        }
    }

    pub async fn insert(&self, customer: Customer) {
        self.customers.write().await.insert(customer.id, customer);
    }

    pub async fn count(&self) -> usize {
        self.customers.read().await.len()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomers {
    async fn find_by_id(&self, id: CustomerId) -> CheckoutResult<Option<Customer>> {
        Ok(self.customers.read().await.get(&id).cloned())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCarts {
    carts: RwLock<HashMap<CartId, Cart>>,
}

impl InMemoryCarts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_carts(carts: impl IntoIterator<Item = Cart>) -> Self {
        Self {
            carts: RwLock::new(carts.into_iter().map(|c| (c.id, c)).collect()),
        }
    }

    pub async fn insert(&self, cart: Cart) {
        self.carts.write().await.insert(cart.id, cart);
    }

    pub async fn count(&self) -> usize {
        self.carts.read().await.len()
    }
}

#[async_trait]
impl CartRepository for InMemoryCarts {
    async fn find_by_id_and_customer(
        &self,
        id: CartId,
        customer: &Customer,
    ) -> CheckoutResult<Option<Cart>> {
        Ok(self
            .carts
            .read()
            .await
            .get(&id)
            .filter(|cart| cart.customer_id == customer.id)
            .cloned())
    }
}
