//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the checkout service, the simulated collaborators behind it,
//! and configuration.

use checkout_core::{CheckoutService, PricingEngine, PricingRules};
use checkout_sim::{Seed, Simulation};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Seed file for the simulated storefront
    pub seed_file: Option<PathBuf>,
    /// Pricing rules file
    pub pricing_file: Option<PathBuf>,
    /// Emit JSON log lines
    pub json_logs: bool,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            seed_file: std::env::var("SEED_FILE").ok().map(PathBuf::from),
            pricing_file: std::env::var("PRICING_FILE").ok().map(PathBuf::from),
            json_logs: std::env::var("LOG_FORMAT")
                .map(|f| f.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Checkout orchestrator
    pub checkout: CheckoutService,
    /// Collaborators the orchestrator is wired to
    pub simulation: Simulation,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState from environment configuration
    pub fn new() -> anyhow::Result<Self> {
        Self::from_config(AppConfig::from_env())
    }

    /// Load seed and pricing files named by an already-built config
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let seed = load_seed(config.seed_file.as_deref())?;
        let rules = load_pricing_rules(config.pricing_file.as_deref())?;
        Self::from_parts(config, &seed, rules)
    }

    /// Build state from already-loaded parts
    pub fn from_parts(config: AppConfig, seed: &Seed, rules: PricingRules) -> anyhow::Result<Self> {
        let simulation = Simulation::from_seed(seed)
            .map_err(|e| anyhow::anyhow!("Failed to seed simulation: {}", e))?;
        let pricing = PricingEngine::new(rules)
            .map_err(|e| anyhow::anyhow!("Invalid pricing rules: {}", e))?;
        let checkout = simulation.checkout_service().with_pricing(pricing);

        Ok(Self {
            checkout,
            simulation,
            config,
        })
    }
}

/// Try the configured path, then the usual config locations.
fn read_config_file(explicit: Option<&Path>, name: &str) -> anyhow::Result<Option<(String, String)>> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        return Ok(Some((path.display().to_string(), content)));
    }

    let config_paths = [
        format!("config/{}", name),
        format!("../config/{}", name),
        format!("../../config/{}", name),
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(&path) {
            return Ok(Some((path, content)));
        }
    }
    Ok(None)
}

/// Load the storefront seed, falling back to the bundled demo
fn load_seed(explicit: Option<&Path>) -> anyhow::Result<Seed> {
    match read_config_file(explicit, "seed.toml")? {
        Some((path, content)) => {
            let seed = Seed::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded seed from {}", path);
            Ok(seed)
        }
        None => {
            tracing::warn!("No seed file found, using bundled demo storefront");
            Seed::demo().map_err(|e| anyhow::anyhow!("Bundled demo seed is invalid: {}", e))
        }
    }
}

/// Load pricing rules, falling back to the defaults
fn load_pricing_rules(explicit: Option<&Path>) -> anyhow::Result<PricingRules> {
    match read_config_file(explicit, "pricing.toml")? {
        Some((path, content)) => {
            let rules = PricingRules::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded pricing rules from {}", path);
            Ok(rules)
        }
        None => {
            tracing::warn!("No pricing rules found, using defaults");
            Ok(PricingRules::default())
        }
    }
}
