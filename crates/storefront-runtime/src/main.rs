//! # Storefront Runtime
//!
//! Runs a scripted storefront session against the in-process backend:
//!
//! 1. Load configuration (environment overrides)
//! 2. Initialize telemetry
//! 3. Start the hub listener and resolve any existing session
//! 4. Sign up and sign in; wait for provisioning
//! 5. Mount the market list, create a market, search
//! 6. Check out a product
//! 7. Sign out, unmount, shut down

use std::collections::BTreeSet;
use std::time::Duration;

use anyhow::{Context, Result};
use shared_types::{ItemId, ListItem, Session, SubjectId};
use sf_01_auth_session::AuthSessionApi;
use sf_03_search::filter_tag_options;
use storefront_runtime::checkout::{checkout, cents_to_dollars, ChargeRequest};
use storefront_runtime::market::{create_market, is_market_owner, MarketDraft, Product};
use storefront_runtime::{StorefrontConfig, StorefrontRuntime};
use storefront_telemetry::{encode_metrics, init_telemetry, TelemetryConfig};
use tracing::{debug, info};

/// Upper bound for each asynchronous step of the script.
const STEP_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    let config = StorefrontConfig::from_env();
    config.validate().context("invalid storefront configuration")?;

    let _telemetry =
        init_telemetry(&TelemetryConfig::from_env()).context("failed to initialize telemetry")?;

    let runtime = StorefrontRuntime::new(config);
    runtime.start().await;
    let container = runtime.container();

    // Seed a few markets owned by someone else.
    container.backend.seed_markets([
        ListItem::new(ItemId::generate(), "Clay Studio", "bob").with_tags(["Arts", "Crafts"]),
        ListItem::new(ItemId::generate(), "Byte Books", "carol").with_tags(["Technology"]),
    ]);

    let alice = Session::new(SubjectId::new("sub-alice"), "alice", "alice@example.com");
    container.backend.sign_up(&alice).await;
    container.backend.sign_in(alice).await;

    let mut session_changes = container.auth.subscribe();
    tokio::time::timeout(
        STEP_TIMEOUT,
        session_changes.wait_for(|snapshot| snapshot.account.is_some()),
    )
    .await
    .context("provisioning did not finish in time")?
    .context("session controller stopped")?;
    let session = container.auth.session().context("sign-in did not resolve a session")?;
    info!(user = %session.display_name, "Signed in and provisioned");

    let mut page = container
        .mount_market_list()
        .await
        .context("failed to load markets")?;

    let tags: BTreeSet<String> = filter_tag_options(&container.config.tag_catalog.tags, "craft")
        .into_iter()
        .map(String::from)
        .collect();
    let market = create_market(
        container.backend.as_ref(),
        &session,
        MarketDraft::new("Alice's Pottery").with_tags(tags),
    )
    .await
    .context("failed to create market")?;
    info!(
        market = %market.name,
        owned = is_market_owner(Some(&session), &market),
        "Market created"
    );

    let mut cache_changes = sf_02_live_list::LiveListApi::subscribe(page.cache());
    tokio::time::timeout(
        STEP_TIMEOUT,
        cache_changes.wait_for(|snapshot| snapshot.items.iter().any(|m| m.id == market.id)),
    )
    .await
    .context("live creation did not arrive in time")?
    .context("market list closed")?;

    let hits = page.search("craft");
    let view = page.view();
    info!(hits, heading = ?view.heading, shown = view.markets.len(), "Search complete");
    for listed in &view.markets {
        info!(market = %listed.name, owner = %listed.owner, "Listed");
    }

    let product = Product {
        id: ItemId::generate(),
        market_id: market.id.clone(),
        description: "Hand-thrown mug".to_string(),
        price_cents: 2400,
        shipped: true,
        owner: SubjectId::new("sub-bob"),
    };
    let request =
        ChargeRequest::for_product(&container.config.checkout, &product, &session, "tok_visa")
            .context("failed to build charge")?;
    let receipt = checkout(container.backend.as_ref(), request)
        .await
        .context("checkout failed")?;
    info!(
        charge_id = %receipt.charge_id,
        amount = %cents_to_dollars(receipt.amount_cents),
        "Purchase complete"
    );

    container.auth.sign_out().await.context("sign-out failed")?;
    page.unmount().await;

    match encode_metrics() {
        Ok(metrics) => debug!(%metrics, "Final metrics"),
        Err(e) => debug!(error = %e, "Metrics unavailable"),
    }

    runtime.shutdown().await;
    Ok(())
}
