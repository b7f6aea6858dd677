//! # homielink-core
//!
//! The device/node/property tree of the Homie convention, its lifecycle state
//! machine, and the extension hook protocol.
//!
//! ## Responsibilities
//! - Build the immutable entity tree: a [`device::Device`] owning ordered
//!   [`node::Node`]s, each owning ordered typed [`property::Property`]s
//! - Drive the init/ready/sleep/alert/disconnect lifecycle, publishing every
//!   attribute topic in its contractual order
//! - Bridge inbound `set` commands to application listeners through the
//!   property value codecs
//! - Invoke device/node/property **extensions** at fixed lifecycle points
//!
//! ## Dependency rule
//! Depends on `homielink-domain` only (plus `tokio::sync`/`tokio::time` for
//! channels and the periodic task). The broker is consumed through the
//! [`ports::BrokerConnection`] port; no concrete transport lives here.

pub mod config;
pub mod device;
pub mod error;
pub mod extension;
pub mod extensions;
pub mod node;
pub mod ports;
pub mod property;

pub(crate) mod sync;

pub use homielink_domain as domain;
