//! # Storefront Runtime
//!
//! Owns the container and the background tasks that keep it in sync with
//! the hub.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use sf_01_auth_session::{AuthBusAdapter, AuthSessionApi, SessionState};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::container::{StorefrontConfig, StorefrontContainer};

/// Time allowed for background tasks to stop at shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// The storefront runtime orchestrating all subsystems.
pub struct StorefrontRuntime {
    /// Subsystem container.
    container: Arc<StorefrontContainer>,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
    /// Shutdown signal receiver.
    shutdown_rx: watch::Receiver<bool>,
    /// Background listener tasks.
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl StorefrontRuntime {
    pub fn new(config: StorefrontConfig) -> Self {
        info!("Creating storefront runtime");
        let container = Arc::new(StorefrontContainer::new(config));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            container,
            shutdown_tx,
            shutdown_rx,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Start the hub listener and resolve any existing session.
    ///
    /// The listener subscribes before the session is resolved, so no
    /// lifecycle event published after this call is missed.
    pub async fn start(&self) -> SessionState {
        let listener = AuthBusAdapter::new(&self.container.event_bus, self.container.auth.clone());
        let handle = tokio::spawn(listener.run(self.shutdown_rx.clone()));
        self.tasks.lock().push(handle);
        info!("Auth listener spawned");

        let state = self.container.auth.start().await;
        info!(
            authenticated = state.is_authenticated(),
            "Storefront runtime started"
        );
        state
    }

    /// Stop background tasks and wait for them to exit.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        let tasks: Vec<_> = self.tasks.lock().drain(..).collect();
        for task in tasks {
            match tokio::time::timeout(SHUTDOWN_GRACE, task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "Background task ended abnormally"),
                Err(_) => warn!("Background task did not stop in time"),
            }
        }

        info!("Shutdown complete");
    }

    /// Get a reference to the container.
    pub fn container(&self) -> Arc<StorefrontContainer> {
        Arc::clone(&self.container)
    }
}
