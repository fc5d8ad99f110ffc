//! # Storefront Checkout
//!
//! Checkout service over a simulated storefront.
//!
//! ## Usage
//!
//! ```bash
//! # Optional: custom storefront and pricing table
//! export SEED_FILE=config/seed.toml
//! export PRICING_FILE=config/pricing.toml
//! export LOG_FORMAT=json
//!
//! # Run the server
//! storefront-checkout
//! ```

use checkout_api::{routes, state::AppState, AppConfig};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    // Initialize logging
    let (plain_layer, json_layer) = if config.json_logs {
        (None, Some(fmt::layer().json()))
    } else {
        (Some(fmt::layer()), None)
    };
    tracing_subscriber::registry()
        .with(plain_layer)
        .with(json_layer)
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let state = AppState::from_config(config)?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Customers loaded: {}", state.simulation.customers.count().await);
    info!("Carts loaded: {}", state.simulation.carts.count().await);

    let app = routes::create_router(state);

    info!("Storefront checkout starting on http://{}", addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Checkout: POST http://{}/api/v1/checkout", addr);
        info!("Quote: GET http://{}/api/v1/carts/{{cart_id}}/quote?customer_id=", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  Storefront Checkout
  ━━━━━━━━━━━━━━━━━━━
  Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
