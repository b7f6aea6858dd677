//! Process-wide defaults for device construction.
//!
//! Resolved once at startup and passed explicitly into [`Device::builder`];
//! nothing here is ambient global state.
//!
//! [`Device::builder`]: crate::device::Device::builder

use serde::Deserialize;

use crate::ports::Qos;

/// Defaults consumed when building devices.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HomieConfig {
    /// Topic root every device path starts with. Should end with `/`.
    pub root_topic: String,
    /// Convention version advertised through `$homie`.
    pub homie_version: String,
    /// Quality of service for attribute and value publications.
    pub qos: Qos,
}

impl Default for HomieConfig {
    fn default() -> Self {
        Self {
            root_topic: "homie/".to_string(),
            homie_version: "4.0.0".to_string(),
            qos: Qos::AtLeastOnce,
        }
    }
}
