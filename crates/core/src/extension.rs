//! The extension hook protocol.
//!
//! Extensions are capability objects attached at device, node, or property
//! granularity and invoked at fixed points of the lifecycle. Node- and
//! property-level extensions name the device extension they depend on
//! through a stable string key; the dependency is checked once, when the
//! device tree is built.
//!
//! Hook ordering contract:
//! - `on_state_change` fires once per transition, after the new `$state`
//!   value is already on the wire but before the device's in-memory state
//!   reflects it. During `init` it fires with [`DeviceState::Init`] once all
//!   device, node, and property attributes have been announced.
//! - `on_publish_node` / `on_publish_property` (and their unpublish
//!   mirrors) fire immediately after the entity's own attributes have been
//!   sent, before any nested children proceed.

use std::time::Duration;

use futures_util::future::BoxFuture;

use crate::device::{Device, DeviceState};
use crate::error::HomieError;
use crate::node::Node;
use crate::property::AnyProperty;

/// A capability attached to a device, advertised through `$extensions`.
pub trait DeviceExtension: Send + Sync {
    /// Stable identifier, e.g. `org.homie.legacy-stats`. Node and property
    /// extensions reference this key from [`NodeExtension::requires`] /
    /// [`PropertyExtension::requires`].
    fn extension_id(&self) -> &str;

    /// Extension version.
    fn version(&self) -> &str;

    /// Convention versions the extension supports, e.g. `["4.x"]`.
    fn homie_versions(&self) -> &[&str];

    /// The `$extensions` advertisement entry: `id:version:[v1;v2]`.
    fn advertisement(&self) -> String {
        format!(
            "{}:{}:[{}]",
            self.extension_id(),
            self.version(),
            self.homie_versions().join(";")
        )
    }

    /// Invoked once per state transition; see the module docs for ordering.
    fn on_state_change<'a>(
        &'a self,
        device: &'a Device,
        target: DeviceState,
    ) -> BoxFuture<'a, Result<(), HomieError>> {
        let _ = (device, target);
        Box::pin(async { Ok(()) })
    }

    /// Requested period for the background publish timer, if any.
    ///
    /// The timer only runs while the device is `ready` and is cancelled
    /// before any transition away from it.
    fn periodic_interval(&self) -> Option<Duration> {
        None
    }

    /// Invoked on each tick of the background timer while `ready`.
    fn on_periodic<'a>(&'a self, device: &'a Device) -> BoxFuture<'a, Result<(), HomieError>> {
        let _ = device;
        Box::pin(async { Ok(()) })
    }
}

/// A capability attached to a single node.
pub trait NodeExtension: Send + Sync {
    /// The [`DeviceExtension::extension_id`] this extension depends on.
    fn requires(&self) -> &str;

    /// Invoked right after the node's own attributes are announced, before
    /// its properties.
    fn on_publish_node<'a>(
        &'a self,
        device: &'a Device,
        node: &'a Node,
    ) -> BoxFuture<'a, Result<(), HomieError>> {
        let _ = (device, node);
        Box::pin(async { Ok(()) })
    }

    /// Invoked right after the node's own attributes are retracted, before
    /// its properties.
    fn on_unpublish_node<'a>(
        &'a self,
        device: &'a Device,
        node: &'a Node,
    ) -> BoxFuture<'a, Result<(), HomieError>> {
        let _ = (device, node);
        Box::pin(async { Ok(()) })
    }
}

/// A capability attached to a single property.
pub trait PropertyExtension: Send + Sync {
    /// The [`DeviceExtension::extension_id`] this extension depends on.
    fn requires(&self) -> &str;

    /// Invoked right after the property's attributes (and retained value,
    /// if any) are announced.
    fn on_publish_property<'a>(
        &'a self,
        device: &'a Device,
        property: &'a dyn AnyProperty,
    ) -> BoxFuture<'a, Result<(), HomieError>> {
        let _ = (device, property);
        Box::pin(async { Ok(()) })
    }

    /// Invoked right after the property's attributes and retained value are
    /// retracted.
    fn on_unpublish_property<'a>(
        &'a self,
        device: &'a Device,
        property: &'a dyn AnyProperty,
    ) -> BoxFuture<'a, Result<(), HomieError>> {
        let _ = (device, property);
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;

    impl DeviceExtension for Plain {
        fn extension_id(&self) -> &str {
            "com.example.test"
        }

        fn version(&self) -> &str {
            "1.2.0"
        }

        fn homie_versions(&self) -> &[&str] {
            &["3.0.1", "4.x"]
        }
    }

    #[test]
    fn should_format_advertisement_entry() {
        assert_eq!(Plain.advertisement(), "com.example.test:1.2.0:[3.0.1;4.x]");
    }

    #[test]
    fn should_format_single_version_advertisement_without_separator() {
        struct Single;
        impl DeviceExtension for Single {
            fn extension_id(&self) -> &str {
                "org.homie.legacy-stats"
            }
            fn version(&self) -> &str {
                "0.1.1"
            }
            fn homie_versions(&self) -> &[&str] {
                &["4.x"]
            }
        }
        assert_eq!(Single.advertisement(), "org.homie.legacy-stats:0.1.1:[4.x]");
    }
}
