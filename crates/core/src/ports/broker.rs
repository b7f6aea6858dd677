//! Broker port — the pub/sub capability the device lifecycle consumes.

use futures_util::future::BoxFuture;
use serde::Deserialize;
use tokio::sync::mpsc;

/// Transport-level delivery guarantee for a publish or subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Qos {
    /// Fire and forget; the publish future may complete immediately with no
    /// delivery guarantee.
    AtMostOnce,
    /// Delivered at least once; duplicates are possible.
    AtLeastOnce,
    /// Delivered exactly once.
    ExactlyOnce,
}

/// The last-will message registered when a connection is established.
///
/// The broker delivers it on the device's behalf when the connection drops
/// without a clean disconnect; the device itself never publishes it.
#[derive(Debug, Clone)]
pub struct LastWill {
    pub topic: String,
    pub payload: Vec<u8>,
    pub retained: bool,
    pub qos: Qos,
}

/// Conditions a broker connection reports back to the core.
#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    /// A publish or subscribe raced with an in-progress disconnect.
    #[error("broker connection is disconnecting")]
    Disconnecting,

    /// `connect` was called twice on the same connection instance.
    #[error("connect was called twice on the same broker connection")]
    AlreadyConnected,

    /// Any other transport failure.
    #[error("transport failure")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// An abstract pub/sub connection.
///
/// One connection instance serves exactly one device; instances are never
/// shared. Reconnection, TLS, authentication, and retry policies all live
/// behind this trait — the core only awaits the returned futures, in order.
pub trait BrokerConnection: Send + Sync {
    /// Establish the connection, registering `last_will` with the broker.
    ///
    /// Callable exactly once per connection instance; a second call must
    /// fail with [`BrokerError::AlreadyConnected`].
    fn connect(&self, last_will: LastWill) -> BoxFuture<'_, Result<(), BrokerError>>;

    /// Publish a payload, completing once the requested quality of service
    /// is satisfied.
    ///
    /// Must fail with [`BrokerError::Disconnecting`] while a disconnect is
    /// in progress.
    fn publish<'a>(
        &'a self,
        topic: &'a str,
        payload: Vec<u8>,
        retained: bool,
        qos: Qos,
    ) -> BoxFuture<'a, Result<(), BrokerError>>;

    /// Subscribe to a topic, yielding inbound payloads over a channel.
    ///
    /// Must fail with [`BrokerError::Disconnecting`] while a disconnect is
    /// in progress.
    fn subscribe<'a>(
        &'a self,
        topic: &'a str,
        qos: Qos,
    ) -> BoxFuture<'a, Result<mpsc::Receiver<Vec<u8>>, BrokerError>>;

    /// Tear the connection down. In-flight publishes are allowed to
    /// complete; the last will must not fire.
    fn disconnect(&self) -> BoxFuture<'_, Result<(), BrokerError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_order_qos_levels_by_guarantee_strength() {
        assert!(Qos::AtMostOnce < Qos::AtLeastOnce);
        assert!(Qos::AtLeastOnce < Qos::ExactlyOnce);
    }

    #[test]
    fn should_deserialize_qos_from_kebab_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            qos: Qos,
        }
        let wrapper: Wrapper = toml::from_str("qos = \"exactly-once\"").unwrap();
        assert_eq!(wrapper.qos, Qos::ExactlyOnce);
    }
}
