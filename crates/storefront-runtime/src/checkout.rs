//! # Checkout
//!
//! Builds charge requests for the payment gateway. The gateway itself is an
//! opaque service; this module only shapes what is sent to it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::{RemoteError, Session};
use std::sync::Arc;
use storefront_telemetry::log_event;
use thiserror::Error;

use crate::container::config::CheckoutConfig;
use crate::market::Product;

const SUBSYSTEM: &str = "checkout";

/// Format a cent amount as dollars, e.g. `1250` as `"12.50"`.
#[must_use]
pub fn cents_to_dollars(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

/// Convert a dollar amount to cents, rounding to the nearest cent.
pub fn dollars_to_cents(dollars: f64) -> Result<u64, CheckoutError> {
    if !dollars.is_finite() || dollars < 0.0 {
        return Err(CheckoutError::InvalidAmount(dollars.to_string()));
    }
    let cents = (dollars * 100.0).round();
    if cents > u64::MAX as f64 {
        return Err(CheckoutError::InvalidAmount(dollars.to_string()));
    }
    Ok(cents as u64)
}

/// Checkout errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Product has no price")]
    FreeProduct,

    #[error("Payment failed: {0}")]
    Payment(#[from] RemoteError),
}

/// Charge sent to the payment gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeRequest {
    /// Card token produced by the payment widget.
    pub token: String,
    pub currency: String,
    pub amount_cents: u64,
    pub description: String,
    /// Receipt address of the buyer.
    pub email: String,
    /// Whether a shipping address was collected.
    pub shipped: bool,
}

impl ChargeRequest {
    /// Build the charge for buying `product` as the signed-in user.
    pub fn for_product(
        config: &CheckoutConfig,
        product: &Product,
        session: &Session,
        token: impl Into<String>,
    ) -> Result<Self, CheckoutError> {
        if product.price_cents == 0 {
            return Err(CheckoutError::FreeProduct);
        }
        Ok(Self {
            token: token.into(),
            currency: config.currency.clone(),
            amount_cents: product.price_cents,
            description: product.description.clone(),
            email: session.email.clone(),
            shipped: product.shipped,
        })
    }
}

/// Gateway confirmation of a charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeReceipt {
    pub charge_id: String,
    pub amount_cents: u64,
}

/// Payment backend (Driven Port).
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, request: ChargeRequest) -> Result<ChargeReceipt, RemoteError>;
}

#[async_trait]
impl<T: PaymentGateway + ?Sized> PaymentGateway for Arc<T> {
    async fn charge(&self, request: ChargeRequest) -> Result<ChargeReceipt, RemoteError> {
        (**self).charge(request).await
    }
}

/// Submit a charge, logging the outcome.
pub async fn checkout<G>(
    gateway: &G,
    request: ChargeRequest,
) -> Result<ChargeReceipt, CheckoutError>
where
    G: PaymentGateway + ?Sized,
{
    let amount = cents_to_dollars(request.amount_cents);
    let currency = request.currency.clone();

    match gateway.charge(request).await {
        Ok(receipt) => {
            log_event!(
                info,
                SUBSYSTEM,
                "Charge accepted",
                charge_id = %receipt.charge_id,
                amount = %amount,
                currency = %currency
            );
            Ok(receipt)
        }
        Err(e) => {
            log_event!(error, SUBSYSTEM, "Charge failed", error = %e, amount = %amount);
            Err(CheckoutError::Payment(e))
        }
    }
}
