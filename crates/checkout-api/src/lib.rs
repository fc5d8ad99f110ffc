//! # checkout-api
//!
//! HTTP API layer for storefront-checkout-rs.
//!
//! Serves the checkout orchestrator over the simulated storefront.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/v1/checkout` | Finalize a cart |
//! | GET | `/api/v1/carts/{cart_id}/quote?customer_id=` | Price breakdown for a cart |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
