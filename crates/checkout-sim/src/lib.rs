//! # checkout-sim
//!
//! In-memory collaborators for storefront-checkout-rs.
//!
//! The checkout core only talks to traits; this crate provides
//! implementations that keep everything in memory, for local runs and
//! integration tests:
//!
//! 1. **SimulatedStock** - per-product stock levels
//!    - Unknown products have zero stock
//!    - All-or-nothing deduction
//!
//! 2. **SimulatedPayment** - credit-limit authorization
//!    - Transaction ids counted up from 1001
//!    - Tracks which transactions were cancelled
//!
//! 3. **InMemoryCustomers / InMemoryCarts** - lookups by id
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use checkout_sim::{Seed, Simulation};
//!
//! let sim = Simulation::from_seed(&Seed::demo()?)?;
//! let service = sim.checkout_service();
//!
//! let outcome = service.finalize_checkout(1, 1).await?;
//! assert_eq!(sim.stock.stock_of(1).await, 99);
//! ```

pub mod payment;
pub mod seed;
pub mod stock;
pub mod store;

// Re-exports
pub use payment::SimulatedPayment;
pub use seed::{CartLineSeed, CartSeed, CreditLimitSeed, Seed, Simulation, StockSeed};
pub use stock::SimulatedStock;
pub use store::{InMemoryCarts, InMemoryCustomers};
