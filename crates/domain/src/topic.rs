//! Topic paths — the slash-joined namespace a device occupies.
//!
//! A device's path is the configured root concatenated with its id; nodes and
//! properties extend it with one slash-separated segment each. Reserved
//! attribute segments carry a `$` prefix (`$state`, `$name`, …), and the
//! inbound command channel of a settable property is its `set` subtopic.

use std::fmt;

use crate::id::Identifier;

/// A full topic path for a device, node, or property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopicPath(String);

impl TopicPath {
    /// Build a device path from the topic root and the device id.
    ///
    /// The root is concatenated as-is, so it should end with `/`
    /// (e.g. `homie/`).
    #[must_use]
    pub fn device(root: &str, device_id: &Identifier) -> Self {
        Self(format!("{root}{device_id}"))
    }

    /// Extend this path with a child entity segment.
    #[must_use]
    pub fn child(&self, id: &Identifier) -> Self {
        Self(format!("{}/{id}", self.0))
    }

    /// The topic of a reserved `$`-prefixed attribute below this path.
    #[must_use]
    pub fn attribute(&self, name: &str) -> String {
        format!("{}/${name}", self.0)
    }

    /// The topic of an arbitrary subtopic below this path (e.g. `set`).
    #[must_use]
    pub fn suffix(&self, subtopic: &str) -> String {
        format!("{}/{subtopic}", self.0)
    }

    /// Access the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopicPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<str> for TopicPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
