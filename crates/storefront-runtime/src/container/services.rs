//! # Service Container
//!
//! Builds the subsystems and wires them to the backend adapters.
//!
//! ## Initialization Order
//!
//! ```text
//! Level 0: Hub (event bus), backend adapters
//! Level 1: Auth session controller (identity provider + identity store)
//! Level 2: Market list pages (list store), mounted on demand
//! ```

use std::sync::Arc;

use shared_bus::InMemoryEventBus;
use shared_types::ListFilter;
use sf_01_auth_session::AuthSessionController;
use sf_02_live_list::CacheError;
use tracing::{info, instrument};

use crate::adapters::InMemoryBackend;
use crate::container::config::StorefrontConfig;
use crate::pages::MarketListPage;

/// Auth controller wired to the in-memory backend.
pub type ConcreteAuthController = AuthSessionController<Arc<InMemoryBackend>, Arc<InMemoryBackend>>;

/// Market list page wired to the in-memory backend.
pub type ConcreteMarketListPage = MarketListPage<Arc<InMemoryBackend>>;

/// Central container holding the subsystem instances.
pub struct StorefrontContainer {
    /// Hub carrying identity-provider lifecycle events.
    pub event_bus: Arc<InMemoryEventBus>,

    /// Backend serving every driven port.
    pub backend: Arc<InMemoryBackend>,

    /// Session controller (Subsystem 1).
    pub auth: ConcreteAuthController,

    /// Configuration (immutable after initialization).
    pub config: StorefrontConfig,
}

impl StorefrontContainer {
    /// Create the container with every subsystem initialized.
    #[instrument(name = "storefront_init", skip(config))]
    pub fn new(config: StorefrontConfig) -> Self {
        info!("Initializing storefront container");

        let event_bus = Arc::new(InMemoryEventBus::with_capacity(config.bus.capacity));
        let backend = Arc::new(InMemoryBackend::new(Arc::clone(&event_bus)));
        info!(capacity = config.bus.capacity, "  [0] Hub and backend adapters initialized");

        let auth = AuthSessionController::new(Arc::clone(&backend), Arc::clone(&backend));
        info!("  [1] Auth session controller initialized");

        Self {
            event_bus,
            backend,
            auth,
            config,
        }
    }

    /// Filter used by the market list page.
    #[must_use]
    pub fn market_filter(&self) -> ListFilter {
        ListFilter {
            limit: Some(self.config.market_list.page_limit),
            ..Default::default()
        }
    }

    /// Mount a market list page (Subsystems 2 and 3).
    pub async fn mount_market_list(&self) -> Result<ConcreteMarketListPage, CacheError> {
        MarketListPage::mount(Arc::clone(&self.backend), self.market_filter()).await
    }
}
