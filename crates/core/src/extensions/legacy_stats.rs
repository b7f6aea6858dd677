//! The `org.homie.legacy-stats` extension.

use std::time::{Duration, Instant};

use futures_util::future::BoxFuture;

use homielink_domain::payload;

use crate::device::{Device, DeviceState};
use crate::error::HomieError;
use crate::extension::DeviceExtension;

/// Publishes the `$stats` attributes of Homie v3: the configured interval
/// once during announcement, and the device uptime on every periodic tick.
pub struct LegacyStats {
    interval: Duration,
    started: Instant,
}

impl LegacyStats {
    /// Create the extension with the advertised refresh interval.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            started: Instant::now(),
        }
    }

    fn uptime_seconds(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}

impl DeviceExtension for LegacyStats {
    fn extension_id(&self) -> &str {
        "org.homie.legacy-stats"
    }

    fn version(&self) -> &str {
        "0.1.1"
    }

    fn homie_versions(&self) -> &[&str] {
        &["4.x"]
    }

    fn on_state_change<'a>(
        &'a self,
        device: &'a Device,
        target: DeviceState,
    ) -> BoxFuture<'a, Result<(), HomieError>> {
        Box::pin(async move {
            match target {
                DeviceState::Init => {
                    device
                        .publish_attribute("$stats/interval", &self.interval.as_secs().to_string())
                        .await?;
                    device
                        .publish_attribute("$stats/uptime", &self.uptime_seconds().to_string())
                        .await
                }
                DeviceState::Disconnected => {
                    device.publish_attribute("$stats/interval", payload::EMPTY).await?;
                    device.publish_attribute("$stats/uptime", payload::EMPTY).await
                }
                _ => Ok(()),
            }
        })
    }

    fn periodic_interval(&self) -> Option<Duration> {
        Some(self.interval)
    }

    fn on_periodic<'a>(&'a self, device: &'a Device) -> BoxFuture<'a, Result<(), HomieError>> {
        Box::pin(async move {
            device
                .publish_attribute("$stats/uptime", &self.uptime_seconds().to_string())
                .await
        })
    }
}
