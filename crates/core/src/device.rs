//! Devices — the root entities of the topic tree and their lifecycle.
//!
//! A device is built once, wired into an immutable tree, and then driven
//! through `init → ready → (sleep | alert)* → disconnect`. Every lifecycle
//! operation is a strictly ordered chain of publishes: no step starts before
//! the broker acknowledged the previous one, because controllers consuming
//! the protocol rely on attributes appearing in a legal order (`$nodes`
//! before any node subtopic, a node's attributes before its properties).

use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, Weak};

use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;

use homielink_domain::id::Identifier;
use homielink_domain::payload;
use homielink_domain::topic::TopicPath;
use homielink_domain::value::ValueCodec;

use crate::config::HomieConfig;
use crate::error::HomieError;
use crate::extension::DeviceExtension;
use crate::node::Node;
use crate::ports::{BrokerConnection, BrokerError, LastWill, Qos};
use crate::property::Property;
use crate::sync::lock;

const DEFAULT_IMPLEMENTATION: &str = "homielink";

/// The advertised lifecycle state of a device.
///
/// A device holds no state at all before `init`; [`DeviceState::Lost`] is
/// never set by the device itself — it only ever reaches the wire through
/// the last-will message the broker fires on an unclean connection loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Init,
    Ready,
    Sleeping,
    Alert,
    Disconnected,
    Lost,
}

impl DeviceState {
    /// The wire representation published to `$state`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Ready => "ready",
            Self::Sleeping => "sleeping",
            Self::Alert => "alert",
            Self::Disconnected => "disconnected",
            Self::Lost => "lost",
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// States from which `ready()` may be entered.
const READYABLE: &[DeviceState] = &[DeviceState::Init, DeviceState::Sleeping, DeviceState::Alert];
/// States from which `sleep()`, `alert()`, and `disconnect()` are legal.
const RUNNING: &[DeviceState] = &[DeviceState::Ready, DeviceState::Sleeping, DeviceState::Alert];

/// The root entity representing one addressable thing.
pub struct Device {
    id: Identifier,
    name: String,
    implementation: String,
    homie_version: String,
    qos: Qos,
    topic: TopicPath,
    nodes: Vec<Node>,
    extensions: Vec<Arc<dyn DeviceExtension>>,
    state: Mutex<Option<DeviceState>>,
    broker: OnceLock<Arc<dyn BrokerConnection>>,
    listener_tasks: Mutex<Vec<JoinHandle<()>>>,
    periodic_task: Mutex<Option<JoinHandle<()>>>,
    self_ref: Weak<Device>,
}

impl Device {
    /// Start building a device from the process configuration and its id.
    #[must_use]
    pub fn builder(config: &HomieConfig, id: Identifier) -> DeviceBuilder {
        DeviceBuilder {
            root_topic: config.root_topic.clone(),
            homie_version: config.homie_version.clone(),
            qos: config.qos,
            id,
            name: String::new(),
            implementation: DEFAULT_IMPLEMENTATION.to_string(),
            nodes: Vec::new(),
            extensions: Vec::new(),
        }
    }

    /// The device id.
    #[must_use]
    pub fn id(&self) -> &Identifier {
        &self.id
    }

    /// The display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `$implementation` advertisement.
    #[must_use]
    pub fn implementation(&self) -> &str {
        &self.implementation
    }

    /// The advertised convention version.
    #[must_use]
    pub fn homie_version(&self) -> &str {
        &self.homie_version
    }

    /// The full topic path (`root` + device id).
    #[must_use]
    pub fn topic(&self) -> &TopicPath {
        &self.topic
    }

    /// The owned nodes, in declaration order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Device-level extensions, in attachment order.
    #[must_use]
    pub fn extensions(&self) -> &[Arc<dyn DeviceExtension>] {
        &self.extensions
    }

    /// The quality of service used for publications.
    #[must_use]
    pub fn qos(&self) -> Qos {
        self.qos
    }

    /// The current lifecycle state; `None` before `init`.
    #[must_use]
    pub fn state(&self) -> Option<DeviceState> {
        *lock(&self.state)
    }

    /// Connect and announce the whole tree, ending in the `ready` state.
    ///
    /// Publishes, in order: `$state=init`, `$extensions`, `$homie`, `$name`,
    /// `$implementation`, `$nodes`, then every node with its properties in
    /// declaration order, then fires each device extension's
    /// `on_state_change(init)`, then transitions to `ready`.
    ///
    /// # Errors
    ///
    /// Returns [`HomieError::IllegalTransition`] unless this is the first
    /// lifecycle call on the device, and propagates any broker failure.
    pub async fn init(&self, broker: Arc<dyn BrokerConnection>) -> Result<(), HomieError> {
        if let Some(state) = self.state() {
            return Err(HomieError::IllegalTransition {
                operation: "init",
                state: Some(state),
            });
        }
        self.broker
            .set(Arc::clone(&broker))
            .map_err(|_| HomieError::AlreadyInitialised)?;

        broker
            .connect(LastWill {
                topic: self.topic.attribute("state"),
                payload: payload::encode(DeviceState::Lost.as_str()),
                retained: true,
                qos: self.qos,
            })
            .await?;

        self.publish_wire(&self.topic.attribute("state"), DeviceState::Init.as_str())
            .await?;
        let extensions = self
            .extensions
            .iter()
            .map(|extension| extension.advertisement())
            .collect::<Vec<_>>()
            .join(",");
        self.publish_wire(&self.topic.attribute("extensions"), &extensions)
            .await?;
        self.publish_wire(&self.topic.attribute("homie"), &self.homie_version)
            .await?;
        self.publish_wire(&self.topic.attribute("name"), &self.name)
            .await?;
        self.publish_wire(&self.topic.attribute("implementation"), &self.implementation)
            .await?;
        let node_ids = self
            .nodes
            .iter()
            .map(|node| node.id().as_str())
            .collect::<Vec<_>>()
            .join(",");
        self.publish_wire(&self.topic.attribute("nodes"), &node_ids)
            .await?;

        for node_index in 0..self.nodes.len() {
            self.announce_node(node_index).await?;
        }

        for extension in &self.extensions {
            extension.on_state_change(self, DeviceState::Init).await?;
        }
        *lock(&self.state) = Some(DeviceState::Init);
        tracing::debug!(device = %self.id, "device announced");

        self.ready().await
    }

    /// Publish `$state=ready` and enter the `ready` state.
    ///
    /// # Errors
    ///
    /// Returns [`HomieError::IllegalTransition`] unless the device is in
    /// `init`, `sleeping`, or `alert`.
    pub async fn ready(&self) -> Result<(), HomieError> {
        self.ensure_state("ready", READYABLE)?;
        self.transition(DeviceState::Ready).await?;
        self.start_periodic();
        Ok(())
    }

    /// Publish `$state=sleeping` and enter the `sleeping` state.
    ///
    /// # Errors
    ///
    /// Returns [`HomieError::IllegalTransition`] unless the device is in
    /// `ready`, `sleeping`, or `alert`.
    pub async fn sleep(&self) -> Result<(), HomieError> {
        self.ensure_state("sleep", RUNNING)?;
        self.stop_periodic();
        self.transition(DeviceState::Sleeping).await
    }

    /// Publish `$state=alert` and enter the `alert` state.
    ///
    /// # Errors
    ///
    /// Returns [`HomieError::IllegalTransition`] unless the device is in
    /// `ready`, `sleeping`, or `alert`.
    pub async fn alert(&self) -> Result<(), HomieError> {
        self.ensure_state("alert", RUNNING)?;
        self.stop_periodic();
        self.transition(DeviceState::Alert).await
    }

    /// Publish `$state=disconnected`, retract every announced attribute in
    /// announce order, and tear down the broker connection.
    ///
    /// The device object must not be reused afterwards; `disconnected` is
    /// terminal.
    ///
    /// # Errors
    ///
    /// Returns [`HomieError::IllegalTransition`] unless the device is in
    /// `ready`, `sleeping`, or `alert`.
    pub async fn disconnect(&self) -> Result<(), HomieError> {
        self.ensure_state("disconnect", RUNNING)?;
        self.stop_periodic();
        self.abort_listeners();

        self.publish_wire(
            &self.topic.attribute("state"),
            DeviceState::Disconnected.as_str(),
        )
        .await?;
        for attribute in ["extensions", "homie", "name", "implementation", "nodes"] {
            self.retract(&self.topic.attribute(attribute)).await?;
        }
        for node_index in 0..self.nodes.len() {
            self.forget_node(node_index).await?;
        }

        for extension in &self.extensions {
            extension
                .on_state_change(self, DeviceState::Disconnected)
                .await?;
        }
        *lock(&self.state) = Some(DeviceState::Disconnected);

        self.broker()?.disconnect().await?;
        tracing::debug!(device = %self.id, "device disconnected");
        Ok(())
    }

    /// Publish a new value for one of this device's properties.
    ///
    /// If the property is retained, the stored value is updated before the
    /// publish is handed to the broker. The publish completes once the
    /// broker confirms the write per its quality-of-service contract.
    ///
    /// # Errors
    ///
    /// Returns [`HomieError::NotReady`] unless the device is `ready`, a
    /// codec error when the value is outside the property's domain, and
    /// [`HomieError::ForeignProperty`] when the property is bound to a
    /// different device.
    pub async fn publish_value<C: ValueCodec + 'static>(
        &self,
        property: &Property<C>,
        value: C::Value,
    ) -> Result<(), HomieError> {
        let state = self.state();
        if state != Some(DeviceState::Ready) {
            return Err(HomieError::NotReady { state });
        }
        let topic = property
            .topic()
            .ok_or_else(|| HomieError::Unbound {
                kind: "property",
                id: property.id().clone(),
            })?
            .clone();
        let prefix = format!("{}/", self.topic);
        if !topic.as_str().starts_with(&prefix) {
            return Err(HomieError::ForeignProperty(property.id().clone()));
        }

        let wire = property.codec().to_wire(&value)?;
        property.store_value(value);
        self.broker()?
            .publish(
                topic.as_str(),
                payload::encode(&wire),
                property.is_retained(),
                self.qos,
            )
            .await?;
        Ok(())
    }

    /// Publish an additional retained attribute below the device topic.
    ///
    /// Intended for extensions (e.g. `$stats/uptime`); `subtopic` carries
    /// its own `$` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`HomieError::NotInitialised`] before `init` supplied a
    /// broker connection, and propagates broker failures.
    pub async fn publish_attribute(&self, subtopic: &str, value: &str) -> Result<(), HomieError> {
        self.publish_wire(&self.topic.suffix(subtopic), value).await
    }

    fn broker(&self) -> Result<&Arc<dyn BrokerConnection>, HomieError> {
        self.broker.get().ok_or(HomieError::NotInitialised)
    }

    fn ensure_state(
        &self,
        operation: &'static str,
        allowed: &[DeviceState],
    ) -> Result<(), HomieError> {
        let state = self.state();
        match state {
            Some(current) if allowed.contains(&current) => Ok(()),
            _ => Err(HomieError::IllegalTransition { operation, state }),
        }
    }

    async fn publish_wire(&self, topic: &str, value: &str) -> Result<(), HomieError> {
        self.broker()?
            .publish(topic, payload::encode(value), true, self.qos)
            .await?;
        Ok(())
    }

    async fn retract(&self, topic: &str) -> Result<(), HomieError> {
        self.publish_wire(topic, payload::EMPTY).await
    }

    /// Publish `$state`, fire the hooks, then flip the in-memory state.
    ///
    /// The hooks observe the previous state while the new value is already
    /// externally visible.
    async fn transition(&self, target: DeviceState) -> Result<(), HomieError> {
        self.publish_wire(&self.topic.attribute("state"), target.as_str())
            .await?;
        for extension in &self.extensions {
            extension.on_state_change(self, target).await?;
        }
        *lock(&self.state) = Some(target);
        Ok(())
    }

    async fn announce_node(&self, node_index: usize) -> Result<(), HomieError> {
        let node = &self.nodes[node_index];
        let topic = node.topic().ok_or_else(|| HomieError::Unbound {
            kind: "node",
            id: node.id().clone(),
        })?;

        self.publish_wire(&topic.attribute("name"), node.name()).await?;
        self.publish_wire(&topic.attribute("type"), node.node_type())
            .await?;
        self.publish_wire(&topic.attribute("properties"), &node.property_ids())
            .await?;
        for extension in node.extensions() {
            extension.on_publish_node(self, node).await?;
        }
        for property_index in 0..node.properties().len() {
            self.announce_property(node_index, property_index).await?;
        }
        Ok(())
    }

    async fn announce_property(
        &self,
        node_index: usize,
        property_index: usize,
    ) -> Result<(), HomieError> {
        let property = &self.nodes[node_index].properties()[property_index];
        let topic = property
            .topic()
            .ok_or_else(|| HomieError::Unbound {
                kind: "property",
                id: property.id().clone(),
            })?
            .clone();

        self.publish_wire(&topic.attribute("name"), property.name())
            .await?;
        self.publish_wire(&topic.attribute("settable"), &property.settable().to_string())
            .await?;
        self.publish_wire(
            &topic.attribute("retained"),
            &property.is_retained().to_string(),
        )
        .await?;
        self.publish_wire(&topic.attribute("unit"), property.unit().as_str())
            .await?;
        self.publish_wire(&topic.attribute("datatype"), property.datatype().as_str())
            .await?;
        if let Some(format) = property.format() {
            self.publish_wire(&topic.attribute("format"), &format).await?;
        }

        if property.settable() {
            let receiver = self
                .broker()?
                .subscribe(&topic.suffix("set"), self.qos)
                .await?;
            self.spawn_listener(node_index, property_index, receiver);
        }

        if let Some(wire) = property.retained_wire_value() {
            self.publish_wire(topic.as_str(), &wire).await?;
        }

        for extension in property.extensions() {
            extension.on_publish_property(self, property.as_ref()).await?;
        }
        Ok(())
    }

    async fn forget_node(&self, node_index: usize) -> Result<(), HomieError> {
        let node = &self.nodes[node_index];
        let topic = node.topic().ok_or_else(|| HomieError::Unbound {
            kind: "node",
            id: node.id().clone(),
        })?;

        for attribute in ["name", "type", "properties"] {
            self.retract(&topic.attribute(attribute)).await?;
        }
        for extension in node.extensions() {
            extension.on_unpublish_node(self, node).await?;
        }
        for property in node.properties() {
            let topic = property
                .topic()
                .ok_or_else(|| HomieError::Unbound {
                    kind: "property",
                    id: property.id().clone(),
                })?
                .clone();
            for attribute in ["name", "settable", "retained", "unit", "datatype"] {
                self.retract(&topic.attribute(attribute)).await?;
            }
            if property.format().is_some() {
                self.retract(&topic.attribute("format")).await?;
            }
            // Announce only publishes the value topic for a seeded retained
            // property, so the retraction mirrors that.
            if property.retained_wire_value().is_some() {
                self.retract(topic.as_str()).await?;
            }
            for extension in property.extensions() {
                extension
                    .on_unpublish_property(self, property.as_ref())
                    .await?;
            }
        }
        Ok(())
    }

    /// Forward inbound `set` payloads to the property, for as long as both
    /// the subscription and the device are alive.
    fn spawn_listener(
        &self,
        node_index: usize,
        property_index: usize,
        receiver: tokio::sync::mpsc::Receiver<Vec<u8>>,
    ) {
        let device = Weak::clone(&self.self_ref);
        let handle = tokio::spawn(async move {
            let mut stream = ReceiverStream::new(receiver);
            while let Some(message) = stream.next().await {
                let Some(device) = device.upgrade() else { break };
                if let Some(property) = device
                    .nodes
                    .get(node_index)
                    .and_then(|node| node.properties().get(property_index))
                {
                    property.apply_set_payload(&message);
                }
            }
        });
        lock(&self.listener_tasks).push(handle);
    }

    /// Start the single background publish timer, if any extension asked
    /// for one. Each extension fires at its own declared interval; the
    /// timer runs only while `ready`.
    fn start_periodic(&self) {
        let schedule: Vec<(usize, std::time::Duration)> = self
            .extensions
            .iter()
            .enumerate()
            .filter_map(|(index, extension)| {
                extension.periodic_interval().map(|period| (index, period))
            })
            .collect();
        if schedule.is_empty() {
            return;
        }
        let device = Weak::clone(&self.self_ref);
        let handle = tokio::spawn(async move {
            let started = tokio::time::Instant::now();
            let mut due: Vec<(usize, std::time::Duration, tokio::time::Instant)> = schedule
                .into_iter()
                .map(|(index, period)| (index, period, started + period))
                .collect();
            loop {
                let Some(next) = due.iter().map(|(_, _, at)| *at).min() else {
                    break;
                };
                tokio::time::sleep_until(next).await;
                let Some(device) = device.upgrade() else { break };
                let now = tokio::time::Instant::now();
                for (index, period, at) in &mut due {
                    if *at > now {
                        continue;
                    }
                    // Late ticks collapse into one; the next publish is a
                    // full period away.
                    *at = now + *period;
                    match device.extensions[*index].on_periodic(&device).await {
                        Ok(()) => {}
                        Err(HomieError::Broker(BrokerError::Disconnecting)) => {
                            // Shutdown race; skip this cycle.
                            tracing::debug!(device = %device.id, "broker disconnecting, skipping periodic publish");
                        }
                        Err(err) => {
                            tracing::warn!(%err, device = %device.id, "periodic extension publish failed");
                        }
                    }
                }
            }
        });
        if let Some(previous) = lock(&self.periodic_task).replace(handle) {
            previous.abort();
        }
    }

    /// Cancel the background timer synchronously.
    fn stop_periodic(&self) {
        if let Some(handle) = lock(&self.periodic_task).take() {
            handle.abort();
        }
    }

    fn abort_listeners(&self) {
        for handle in lock(&self.listener_tasks).drain(..) {
            handle.abort();
        }
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        self.stop_periodic();
        self.abort_listeners();
    }
}

/// Step-by-step builder for [`Device`].
pub struct DeviceBuilder {
    root_topic: String,
    homie_version: String,
    qos: Qos,
    id: Identifier,
    name: String,
    implementation: String,
    nodes: Vec<Node>,
    extensions: Vec<Arc<dyn DeviceExtension>>,
}

impl DeviceBuilder {
    /// Set the display name (default: empty).
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the `$implementation` advertisement (default: `homielink`).
    #[must_use]
    pub fn implementation(mut self, implementation: impl Into<String>) -> Self {
        self.implementation = implementation.into();
        self
    }

    /// Attach a node; order is preserved. Nodes move in by value, so one
    /// node instance can never belong to two devices.
    #[must_use]
    pub fn node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Attach a device-level extension; order is preserved.
    #[must_use]
    pub fn extension(mut self, extension: Arc<dyn DeviceExtension>) -> Self {
        self.extensions.push(extension);
        self
    }

    /// Consume the builder, bind the topic tree, and return the device.
    ///
    /// # Errors
    ///
    /// Returns [`HomieError::DuplicateId`] when two nodes share an id,
    /// [`HomieError::AlreadyBound`] when a property handle is reused across
    /// nodes or devices, and [`HomieError::MissingRequiredExtension`] when
    /// a node or property extension names a device extension that is not
    /// attached.
    pub fn build(self) -> Result<Arc<Device>, HomieError> {
        for (index, node) in self.nodes.iter().enumerate() {
            if self.nodes[..index].iter().any(|other| other.id() == node.id()) {
                return Err(HomieError::DuplicateId {
                    kind: "node",
                    id: node.id().clone(),
                });
            }
        }

        let topic = TopicPath::device(&self.root_topic, &self.id);
        for node in &self.nodes {
            node.bind(&topic)?;
        }

        let provided: Vec<&str> = self
            .extensions
            .iter()
            .map(|extension| extension.extension_id())
            .collect();
        for node in &self.nodes {
            for extension in node.extensions() {
                if !provided.contains(&extension.requires()) {
                    return Err(HomieError::MissingRequiredExtension {
                        holder: node.id().clone(),
                        required: extension.requires().to_string(),
                    });
                }
            }
            for property in node.properties() {
                for extension in property.extensions() {
                    if !provided.contains(&extension.requires()) {
                        return Err(HomieError::MissingRequiredExtension {
                            holder: property.id().clone(),
                            required: extension.requires().to_string(),
                        });
                    }
                }
            }
        }

        Ok(Arc::new_cyclic(|weak| Device {
            id: self.id,
            name: self.name,
            implementation: self.implementation,
            homie_version: self.homie_version,
            qos: self.qos,
            topic,
            nodes: self.nodes,
            extensions: self.extensions,
            state: Mutex::new(None),
            broker: OnceLock::new(),
            listener_tasks: Mutex::new(Vec::new()),
            periodic_task: Mutex::new(None),
            self_ref: weak.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use homielink_domain::value::FloatCodec;

    use crate::extension::{NodeExtension, PropertyExtension};

    use super::*;

    fn id(s: &str) -> Identifier {
        Identifier::new(s).unwrap()
    }

    fn float_node(node_id: &str, property_id: &str) -> Node {
        let property = Property::builder(id(property_id), FloatCodec::new())
            .build()
            .unwrap();
        Node::builder(id(node_id)).property(property).build().unwrap()
    }

    struct StatsLike;

    impl DeviceExtension for StatsLike {
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

    struct NeedsStats;

    impl NodeExtension for NeedsStats {
        fn requires(&self) -> &str {
            "org.homie.legacy-stats"
        }
    }

    impl PropertyExtension for NeedsStats {
        fn requires(&self) -> &str {
            "org.homie.legacy-stats"
        }
    }

    #[test]
    fn should_start_without_state() {
        let device = Device::builder(&HomieConfig::default(), id("super-car"))
            .build()
            .unwrap();
        assert_eq!(device.state(), None);
        assert_eq!(device.topic().as_str(), "homie/super-car");
    }

    #[test]
    fn should_bind_full_topic_paths_at_build_time() {
        let device = Device::builder(&HomieConfig::default(), id("super-car"))
            .node(float_node("engine", "temperature"))
            .build()
            .unwrap();
        let node = &device.nodes()[0];
        assert_eq!(node.topic().unwrap().as_str(), "homie/super-car/engine");
        assert_eq!(
            node.properties()[0].topic().unwrap().as_str(),
            "homie/super-car/engine/temperature"
        );
    }

    #[test]
    fn should_reject_duplicate_node_ids() {
        let result = Device::builder(&HomieConfig::default(), id("car"))
            .node(float_node("engine", "temperature"))
            .node(float_node("engine", "pressure"))
            .build();
        assert!(matches!(
            result,
            Err(HomieError::DuplicateId { kind: "node", .. })
        ));
    }

    #[test]
    fn should_reject_property_handle_reused_across_devices() {
        let shared = Property::builder(id("temperature"), FloatCodec::new())
            .build()
            .unwrap();
        let first_node = Node::builder(id("engine"))
            .property(shared.clone())
            .build()
            .unwrap();
        let second_node = Node::builder(id("engine")).property(shared).build().unwrap();

        Device::builder(&HomieConfig::default(), id("first"))
            .node(first_node)
            .build()
            .unwrap();
        let result = Device::builder(&HomieConfig::default(), id("second"))
            .node(second_node)
            .build();
        assert!(matches!(
            result,
            Err(HomieError::AlreadyBound { kind: "property", .. })
        ));
    }

    #[test]
    fn should_reject_node_extension_without_required_device_extension() {
        let node = Node::builder(id("engine"))
            .extension(Arc::new(NeedsStats))
            .build()
            .unwrap();
        let result = Device::builder(&HomieConfig::default(), id("car"))
            .node(node)
            .build();
        assert!(matches!(
            result,
            Err(HomieError::MissingRequiredExtension { .. })
        ));
    }

    #[test]
    fn should_reject_property_extension_without_required_device_extension() {
        let property = Property::builder(id("temperature"), FloatCodec::new())
            .extension(Arc::new(NeedsStats))
            .build()
            .unwrap();
        let node = Node::builder(id("engine")).property(property).build().unwrap();
        let result = Device::builder(&HomieConfig::default(), id("car"))
            .node(node)
            .build();
        assert!(matches!(
            result,
            Err(HomieError::MissingRequiredExtension { .. })
        ));
    }

    #[test]
    fn should_accept_extensions_when_requirement_is_attached() {
        let property = Property::builder(id("temperature"), FloatCodec::new())
            .extension(Arc::new(NeedsStats))
            .build()
            .unwrap();
        let node = Node::builder(id("engine"))
            .property(property)
            .extension(Arc::new(NeedsStats))
            .build()
            .unwrap();
        let device = Device::builder(&HomieConfig::default(), id("car"))
            .extension(Arc::new(StatsLike))
            .node(node)
            .build();
        assert!(device.is_ok());
    }

    #[tokio::test]
    async fn should_reject_lifecycle_calls_before_init() {
        let device = Device::builder(&HomieConfig::default(), id("car"))
            .build()
            .unwrap();
        assert!(matches!(
            device.sleep().await,
            Err(HomieError::IllegalTransition {
                operation: "sleep",
                state: None,
            })
        ));
        assert!(matches!(
            device.ready().await,
            Err(HomieError::IllegalTransition { .. })
        ));
        assert!(matches!(
            device.disconnect().await,
            Err(HomieError::IllegalTransition { .. })
        ));
    }

    #[tokio::test]
    async fn should_reject_value_publish_before_ready() {
        let property = Property::builder(id("temperature"), FloatCodec::new())
            .build()
            .unwrap();
        let node = Node::builder(id("engine"))
            .property(property.clone())
            .build()
            .unwrap();
        let device = Device::builder(&HomieConfig::default(), id("car"))
            .node(node)
            .build()
            .unwrap();

        let result = device.publish_value(&property, 21.5).await;
        assert!(matches!(result, Err(HomieError::NotReady { state: None })));
    }
}
