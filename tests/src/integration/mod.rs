//! # Integration Flows

pub mod auth_flows;
pub mod market_flows;
