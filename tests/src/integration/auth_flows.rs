//! # Auth Session Flows
//!
//! Tests that the identity provider's hub events drive the session
//! controller and that provisioning against the shared identity store
//! holds up across clients.
//!
//! ## Flows Tested:
//!
//! 1. **Hub → Controller (1)**: `signIn` capsules authenticate and provision
//! 2. **Sign-out races provisioning**: late results never resurrect a session
//! 3. **Two clients, one subject**: exactly one user record
//! 4. **Explicit sign-out**: every listener on the hub sees it

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use futures::StreamExt;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::{watch, Notify};
    use tokio::time::timeout;

    // Shared infrastructure
    use shared_bus::{AuthEvent, EventFilter, HubCapsule, InMemoryEventBus};
    use shared_types::{RemoteError, Session, SubjectId, UserRecord};

    // Subsystem 1: Auth Session
    use sf_01_auth_session::{
        AuthBusAdapter, AuthSessionApi, AuthSessionController, EventOutcome, IdentityStore,
        ProvisioningOutcome, SessionSnapshot,
    };

    // Runtime wiring
    use storefront_runtime::adapters::InMemoryBackend;
    use storefront_runtime::{StorefrontConfig, StorefrontRuntime};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn alice() -> Session {
        Session::new(SubjectId::new("sub-alice"), "alice", "alice@example.com")
    }

    fn backend(bus: &Arc<InMemoryEventBus>) -> Arc<InMemoryBackend> {
        Arc::new(InMemoryBackend::new(Arc::clone(bus)))
    }

    async fn wait_until<F>(rx: &mut watch::Receiver<SessionSnapshot>, condition: F)
    where
        F: FnMut(&SessionSnapshot) -> bool,
    {
        timeout(Duration::from_secs(1), rx.wait_for(condition))
            .await
            .expect("timeout")
            .expect("controller alive");
    }

    /// Identity store whose `create` parks until the test releases it.
    struct GatedStore {
        backend: Arc<InMemoryBackend>,
        entered: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl IdentityStore for GatedStore {
        async fn find(&self, subject_id: &SubjectId) -> Result<Option<UserRecord>, RemoteError> {
            self.backend.find(subject_id).await
        }

        async fn create(&self, record: UserRecord) -> Result<UserRecord, RemoteError> {
            self.entered.notify_one();
            self.release.notified().await;
            self.backend.create(record).await
        }
    }

    // =============================================================================
    // INTEGRATION TESTS: HUB → AUTH SESSION
    // =============================================================================

    /// Test that hub sign-ins authenticate and provision exactly once
    #[tokio::test]
    async fn test_hub_sign_in_provisions_once() {
        let runtime = StorefrontRuntime::new(StorefrontConfig::default());
        let container = runtime.container();
        runtime.start().await;
        let mut rx = container.auth.subscribe();

        container.backend.sign_in(alice()).await;
        wait_until(&mut rx, |s| s.account.is_some()).await;
        let first_epoch = rx.borrow().epoch;

        // A repeated signIn re-resolves and re-checks, but finds the record.
        container.backend.sign_in(alice()).await;
        wait_until(&mut rx, |s| s.epoch > first_epoch && s.account.is_some()).await;

        assert_eq!(container.backend.user_count(), 1);
        let account = container.auth.current_account().expect("account attached");
        assert_eq!(account.username, "alice");
        assert!(account.registered);

        runtime.shutdown().await;
    }

    /// Test that signUp, unknown events and foreign channels never transition
    #[tokio::test]
    async fn test_non_sign_in_capsules_leave_session_alone() {
        let bus = Arc::new(InMemoryEventBus::new());
        let backend = backend(&bus);
        let controller = AuthSessionController::new(Arc::clone(&backend), Arc::clone(&backend));
        let adapter = AuthBusAdapter::new(&bus, controller.clone());

        let sign_up = HubCapsule::auth("signUp", json!({"username": "alice"}));
        assert_eq!(
            adapter.handle_capsule(&sign_up).await,
            Some(EventOutcome::SignUpNoted)
        );

        let refresh = HubCapsule::auth("tokenRefresh", json!({}));
        assert_eq!(
            adapter.handle_capsule(&refresh).await,
            Some(EventOutcome::Ignored)
        );

        let storage = HubCapsule::new("storage", "signIn", json!({}));
        assert_eq!(adapter.handle_capsule(&storage).await, None);

        // signIn with nothing to resolve is logged and dropped.
        let sign_in = HubCapsule::auth("signIn", json!({}));
        assert_eq!(adapter.handle_capsule(&sign_in).await, None);

        assert!(controller.session().is_none());
        assert_eq!(backend.user_count(), 0);
    }

    // =============================================================================
    // INTEGRATION TESTS: PROVISIONING RACES
    // =============================================================================

    /// Test that a signOut arriving mid-provisioning wins over the late result
    #[tokio::test]
    async fn test_sign_out_during_provisioning_discards_result() {
        let bus = Arc::new(InMemoryEventBus::new());
        let backend = backend(&bus);
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let store = GatedStore {
            backend: Arc::clone(&backend),
            entered: Arc::clone(&entered),
            release: Arc::clone(&release),
        };
        let controller = AuthSessionController::new(Arc::clone(&backend), store);

        backend.sign_in(alice()).await;
        let (outcome, handle) = controller
            .dispatch(AuthEvent::SignIn(json!({})))
            .await
            .unwrap();
        assert_eq!(outcome, EventOutcome::SignedIn(alice()));
        let handle = handle.expect("provisioning started");

        timeout(Duration::from_secs(1), entered.notified())
            .await
            .expect("create reached");

        let (outcome, _) = controller.dispatch(AuthEvent::SignOut).await.unwrap();
        assert_eq!(outcome, EventOutcome::SignedOut);
        assert!(controller.session().is_none());

        release.notify_one();
        assert_eq!(handle.outcome().await, ProvisioningOutcome::Stale);

        let snapshot = controller.snapshot();
        assert!(!snapshot.state.is_authenticated());
        assert!(snapshot.account.is_none());

        // The record did land; the next sign-in just finds it.
        assert_eq!(backend.user_count(), 1);
        let (_, handle) = controller
            .dispatch(AuthEvent::SignIn(json!({})))
            .await
            .unwrap();
        let outcome = handle.expect("provisioning started").outcome().await;
        assert!(matches!(outcome, ProvisioningOutcome::AlreadyProvisioned(_)));
        assert_eq!(
            controller.current_account().map(|a| a.subject_id),
            Some(alice().subject_id)
        );
    }

    /// Test that two clients provisioning the same subject create one record
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_two_clients_race_to_provision() {
        let bus = Arc::new(InMemoryEventBus::new());
        let backend = backend(&bus);
        backend.sign_in(alice()).await;

        let first = AuthSessionController::new(Arc::clone(&backend), Arc::clone(&backend));
        let second = AuthSessionController::new(Arc::clone(&backend), Arc::clone(&backend));

        let (a, b) = tokio::join!(
            first.dispatch(AuthEvent::SignIn(json!({}))),
            second.dispatch(AuthEvent::SignIn(json!({}))),
        );
        let a = a.unwrap().1.expect("provisioning started").outcome().await;
        let b = b.unwrap().1.expect("provisioning started").outcome().await;

        assert!(a.is_provisioned(), "first client: {a:?}");
        assert!(b.is_provisioned(), "second client: {b:?}");
        let created = [&a, &b]
            .iter()
            .filter(|o| matches!(o, ProvisioningOutcome::Created(_)))
            .count();
        assert!(created <= 1);
        assert_eq!(backend.user_count(), 1);

        assert!(first.current_account().is_some());
        assert_eq!(first.current_account(), second.current_account());
    }

    // =============================================================================
    // INTEGRATION TESTS: SIGN-OUT FAN-OUT
    // =============================================================================

    /// Test that an explicit sign-out reaches every listener on the hub
    #[tokio::test]
    async fn test_explicit_sign_out_reaches_every_listener() {
        let runtime = StorefrontRuntime::new(StorefrontConfig::default());
        let container = runtime.container();
        runtime.start().await;

        // A second client on the same hub and backend.
        let other = AuthSessionController::new(
            Arc::clone(&container.backend),
            Arc::clone(&container.backend),
        );
        let (stop_tx, stop_rx) = watch::channel(false);
        let listener = AuthBusAdapter::new(&container.event_bus, other.clone());
        let listener = tokio::spawn(listener.run(stop_rx));
        let mut observer = container.event_bus.event_stream(EventFilter::auth());

        let mut mine = container.auth.subscribe();
        let mut theirs = other.subscribe();
        container.backend.sign_in(alice()).await;
        wait_until(&mut mine, |s| s.account.is_some()).await;
        wait_until(&mut theirs, |s| s.state.is_authenticated()).await;

        container.auth.sign_out().await.unwrap();
        assert!(container.auth.session().is_none());
        wait_until(&mut theirs, |s| !s.state.is_authenticated()).await;

        let mut names = Vec::new();
        for _ in 0..2 {
            let capsule = timeout(Duration::from_secs(1), observer.next())
                .await
                .expect("timeout")
                .expect("capsule");
            names.push(capsule.name);
        }
        assert_eq!(names, vec!["signIn".to_string(), "signOut".to_string()]);

        stop_tx.send(true).unwrap();
        timeout(Duration::from_secs(1), listener)
            .await
            .expect("listener stopped")
            .unwrap();
        runtime.shutdown().await;
    }
}
