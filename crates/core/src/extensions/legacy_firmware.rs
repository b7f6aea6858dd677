//! The `org.homie.legacy-firmware` extension.

use futures_util::future::BoxFuture;

use homielink_domain::payload;

use crate::device::{Device, DeviceState};
use crate::error::HomieError;
use crate::extension::DeviceExtension;

/// Publishes the network and firmware attributes of Homie v3: `$localip`,
/// `$mac`, `$fw/name`, and `$fw/version`, once during announcement.
pub struct LegacyFirmware {
    local_ip: String,
    mac: String,
    firmware_name: String,
    firmware_version: String,
}

impl LegacyFirmware {
    #[must_use]
    pub fn new(
        local_ip: impl Into<String>,
        mac: impl Into<String>,
        firmware_name: impl Into<String>,
        firmware_version: impl Into<String>,
    ) -> Self {
        Self {
            local_ip: local_ip.into(),
            mac: mac.into(),
            firmware_name: firmware_name.into(),
            firmware_version: firmware_version.into(),
        }
    }
}

impl DeviceExtension for LegacyFirmware {
    fn extension_id(&self) -> &str {
        "org.homie.legacy-firmware"
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
                    device.publish_attribute("$localip", &self.local_ip).await?;
                    device.publish_attribute("$mac", &self.mac).await?;
                    device.publish_attribute("$fw/name", &self.firmware_name).await?;
                    device
                        .publish_attribute("$fw/version", &self.firmware_version)
                        .await
                }
                DeviceState::Disconnected => {
                    for attribute in ["$localip", "$mac", "$fw/name", "$fw/version"] {
                        device.publish_attribute(attribute, payload::EMPTY).await?;
                    }
                    Ok(())
                }
                _ => Ok(()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_advertise_legacy_firmware_entry() {
        let extension = LegacyFirmware::new("192.168.1.10", "aa:bb:cc:dd:ee:ff", "homielink", "1.0.0");
        assert_eq!(
            extension.advertisement(),
            "org.homie.legacy-firmware:0.1.1:[4.x]"
        );
        assert!(extension.periodic_interval().is_none());
    }
}
