//! Ports Layer
//!
//! - Driving Port (inbound) - `LiveListApi`, used by page components
//! - Driven Port (outbound) - `ListStore`, the remote list backend

pub mod inbound;
pub mod outbound;

pub use inbound::LiveListApi;
pub use outbound::{CreatedStream, ListStore};
