//! # Storefront Configuration
//!
//! Unified configuration for the subsystems and the checkout flow.
//!
//! ## Environment Overrides
//!
//! | Variable | Field |
//! |----------|-------|
//! | `SF_BUS_CAPACITY` | `bus.capacity` |
//! | `SF_PAGE_LIMIT` | `market_list.page_limit` |
//! | `SF_CURRENCY` | `checkout.currency` |
//! | `SF_PAYMENT_KEY` | `checkout.publishable_key` |

use shared_bus::DEFAULT_CHANNEL_CAPACITY;
use std::env;
use thiserror::Error;
use tracing::warn;

/// Complete storefront configuration.
#[derive(Debug, Clone, Default)]
pub struct StorefrontConfig {
    /// Hub configuration.
    pub bus: BusConfig,
    /// Market list configuration.
    pub market_list: MarketListConfig,
    /// Checkout configuration.
    pub checkout: CheckoutConfig,
    /// Tags offered when creating a market.
    pub tag_catalog: TagCatalog,
}

impl StorefrontConfig {
    /// Defaults overridden by `SF_*` environment variables.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(capacity) = parse_var("SF_BUS_CAPACITY") {
            config.bus.capacity = capacity;
        }
        if let Some(limit) = parse_var("SF_PAGE_LIMIT") {
            config.market_list.page_limit = limit;
        }
        if let Ok(currency) = env::var("SF_CURRENCY") {
            config.checkout.currency = currency.to_lowercase();
        }
        if let Ok(key) = env::var("SF_PAYMENT_KEY") {
            config.checkout.publishable_key = key;
        }

        config
    }

    /// Reject configurations the runtime cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bus.capacity == 0 {
            return Err(ConfigError::ZeroBusCapacity);
        }
        if self.market_list.page_limit == 0 {
            return Err(ConfigError::ZeroPageLimit);
        }
        if self.checkout.publishable_key.trim().is_empty() {
            return Err(ConfigError::MissingPaymentKey);
        }
        if self.checkout.currency.len() != 3 {
            return Err(ConfigError::InvalidCurrency(self.checkout.currency.clone()));
        }
        Ok(())
    }
}

fn parse_var(name: &str) -> Option<usize> {
    let raw = env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(variable = name, value = %raw, error = %e, "Ignoring invalid override");
            None
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Hub capacity must be non-zero (SF_BUS_CAPACITY)")]
    ZeroBusCapacity,

    #[error("Market list page limit must be non-zero (SF_PAGE_LIMIT)")]
    ZeroPageLimit,

    #[error("Payment publishable key is not set. Set SF_PAYMENT_KEY.")]
    MissingPaymentKey,

    #[error("Currency must be a three-letter ISO code, got {0:?}")]
    InvalidCurrency(String),
}

/// Hub configuration.
#[derive(Debug, Clone)]
pub struct BusConfig {
    /// Capsules buffered per subscriber before it lags.
    pub capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Market list configuration.
#[derive(Debug, Clone)]
pub struct MarketListConfig {
    /// Markets fetched per page.
    pub page_limit: usize,
}

impl Default for MarketListConfig {
    fn default() -> Self {
        Self { page_limit: 20 }
    }
}

/// Checkout configuration.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Lowercase ISO currency code.
    pub currency: String,
    /// Publishable key handed to the payment widget.
    pub publishable_key: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            currency: "usd".to_string(),
            publishable_key: "pk_test_storefront".to_string(),
        }
    }
}

/// Tags offered by the market creation form.
#[derive(Debug, Clone)]
pub struct TagCatalog {
    pub tags: Vec<String>,
}

impl Default for TagCatalog {
    fn default() -> Self {
        Self {
            tags: ["Arts", "Web Dev", "Technology", "Crafts", "Entertainment"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}
