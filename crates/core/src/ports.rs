//! Port definitions — traits that transport adapters implement.
//!
//! The core never opens sockets or speaks a wire protocol. Everything it
//! needs from the outside world is expressed here, so a tokio MQTT client,
//! an embedded stack, or an in-memory test double can all drive a device.

pub mod broker;

pub use broker::{BrokerConnection, BrokerError, LastWill, Qos};
