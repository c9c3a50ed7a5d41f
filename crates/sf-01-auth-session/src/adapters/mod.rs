//! Adapters Layer
//!
//! - `bus_adapter` - Hub listener feeding auth events to the controller

pub mod bus_adapter;

pub use bus_adapter::AuthBusAdapter;
