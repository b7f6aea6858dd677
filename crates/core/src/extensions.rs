//! Ready-made extensions shipped with the crate.
//!
//! Both legacy Homie v4 extensions are ordinary [`DeviceExtension`]
//! implementations; nothing here uses machinery that is unavailable to
//! user-defined extensions.
//!
//! [`DeviceExtension`]: crate::extension::DeviceExtension

mod legacy_firmware;
mod legacy_stats;

pub use legacy_firmware::LegacyFirmware;
pub use legacy_stats::LegacyStats;
