//! Nodes — the functional units of a device.

use std::sync::{Arc, OnceLock};

use homielink_domain::id::Identifier;
use homielink_domain::topic::TopicPath;

use crate::error::HomieError;
use crate::extension::NodeExtension;
use crate::property::AnyProperty;

/// A functional unit of a device, owning an ordered set of properties.
///
/// Nodes move by value into their device, so a node instance can never end
/// up under two devices.
pub struct Node {
    id: Identifier,
    name: String,
    node_type: String,
    properties: Vec<Box<dyn AnyProperty>>,
    extensions: Vec<Arc<dyn NodeExtension>>,
    topic: OnceLock<TopicPath>,
}

impl Node {
    /// Start building a node from its id.
    #[must_use]
    pub fn builder(id: Identifier) -> NodeBuilder {
        NodeBuilder {
            id,
            name: String::new(),
            node_type: String::new(),
            properties: Vec::new(),
            extensions: Vec::new(),
        }
    }

    /// The node id (its topic segment).
    #[must_use]
    pub fn id(&self) -> &Identifier {
        &self.id
    }

    /// The display name, empty by default.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The advertised `$type` string.
    #[must_use]
    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    /// The owned properties, in declaration order.
    #[must_use]
    pub fn properties(&self) -> &[Box<dyn AnyProperty>] {
        &self.properties
    }

    /// Node-level extensions, in attachment order.
    #[must_use]
    pub fn extensions(&self) -> &[Arc<dyn NodeExtension>] {
        &self.extensions
    }

    /// The full topic path, present once bound into a device tree.
    #[must_use]
    pub fn topic(&self) -> Option<&TopicPath> {
        self.topic.get()
    }

    /// Comma-joined property ids for the `$properties` advertisement.
    pub(crate) fn property_ids(&self) -> String {
        self.properties
            .iter()
            .map(|p| p.id().as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Bind this node and its properties below the device topic.
    ///
    /// Fails when any property handle is already bound elsewhere — a
    /// property belongs to exactly one node, in exactly one device.
    pub(crate) fn bind(&self, device_topic: &TopicPath) -> Result<(), HomieError> {
        let topic = device_topic.child(&self.id);
        self.topic
            .set(topic.clone())
            .map_err(|_| HomieError::AlreadyBound {
                kind: "node",
                id: self.id.clone(),
            })?;
        for property in &self.properties {
            property.bind(topic.child(property.id()))?;
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Node`].
pub struct NodeBuilder {
    id: Identifier,
    name: String,
    node_type: String,
    properties: Vec<Box<dyn AnyProperty>>,
    extensions: Vec<Arc<dyn NodeExtension>>,
}

impl NodeBuilder {
    /// Set the display name (default: empty).
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the advertised `$type` string (default: empty).
    #[must_use]
    pub fn node_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = node_type.into();
        self
    }

    /// Attach a property; order is preserved.
    #[must_use]
    pub fn property(mut self, property: impl AnyProperty + 'static) -> Self {
        self.properties.push(Box::new(property));
        self
    }

    /// Attach a node-level extension; order is preserved.
    #[must_use]
    pub fn extension(mut self, extension: Arc<dyn NodeExtension>) -> Self {
        self.extensions.push(extension);
        self
    }

    /// Consume the builder, validate, and return a [`Node`].
    ///
    /// # Errors
    ///
    /// Returns [`HomieError::DuplicateId`] when two properties share an id.
    pub fn build(self) -> Result<Node, HomieError> {
        for (index, property) in self.properties.iter().enumerate() {
            if self.properties[..index]
                .iter()
                .any(|other| other.id() == property.id())
            {
                return Err(HomieError::DuplicateId {
                    kind: "property",
                    id: property.id().clone(),
                });
            }
        }
        Ok(Node {
            id: self.id,
            name: self.name,
            node_type: self.node_type,
            properties: self.properties,
            extensions: self.extensions,
            topic: OnceLock::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use homielink_domain::value::{BooleanCodec, FloatCodec};

    use crate::property::Property;

    use super::*;

    fn id(s: &str) -> Identifier {
        Identifier::new(s).unwrap()
    }

    fn float_property(property_id: &str) -> Property<FloatCodec> {
        Property::builder(id(property_id), FloatCodec::new())
            .build()
            .unwrap()
    }

    #[test]
    fn should_build_node_with_ordered_properties() {
        let node = Node::builder(id("engine"))
            .name("Engine")
            .node_type("v8")
            .property(float_property("temperature"))
            .property(float_property("pressure"))
            .build()
            .unwrap();

        assert_eq!(node.id().as_str(), "engine");
        assert_eq!(node.name(), "Engine");
        assert_eq!(node.node_type(), "v8");
        assert_eq!(node.property_ids(), "temperature,pressure");
    }

    #[test]
    fn should_reject_duplicate_property_ids() {
        let result = Node::builder(id("engine"))
            .property(float_property("temperature"))
            .property(float_property("temperature"))
            .build();
        assert!(matches!(
            result,
            Err(HomieError::DuplicateId { kind: "property", .. })
        ));
    }

    #[test]
    fn should_bind_node_and_property_topics() {
        let node = Node::builder(id("engine"))
            .property(float_property("temperature"))
            .build()
            .unwrap();
        let device_topic = TopicPath::device("homie/", &id("super-car"));

        node.bind(&device_topic).unwrap();

        assert_eq!(node.topic().unwrap().as_str(), "homie/super-car/engine");
        assert_eq!(
            node.properties()[0].topic().unwrap().as_str(),
            "homie/super-car/engine/temperature"
        );
    }

    #[test]
    fn should_reject_property_handle_reused_across_nodes() {
        let shared = Property::builder(id("shared"), BooleanCodec).build().unwrap();
        let first = Node::builder(id("one")).property(shared.clone()).build().unwrap();
        let second = Node::builder(id("two")).property(shared).build().unwrap();
        let device_topic = TopicPath::device("homie/", &id("device"));

        first.bind(&device_topic).unwrap();
        let result = second.bind(&device_topic);
        assert!(matches!(
            result,
            Err(HomieError::AlreadyBound { kind: "property", .. })
        ));
    }
}
