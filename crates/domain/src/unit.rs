//! Measurement units advertised through a property's `$unit` attribute.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An immutable measurement unit.
///
/// The convention names a fixed set of recommended units, exposed here as
/// constants; anything else can be wrapped with [`Unit::custom`]. Equality
/// and ordering are based on the display string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Unit(Cow<'static, str>);

impl Unit {
    /// Degree Celsius (`°C`).
    pub const DEGREE_CELSIUS: Unit = Unit(Cow::Borrowed("°C"));
    /// Degree Fahrenheit (`°F`).
    pub const DEGREE_FAHRENHEIT: Unit = Unit(Cow::Borrowed("°F"));
    /// Degree (angle, `°`).
    pub const DEGREE: Unit = Unit(Cow::Borrowed("°"));
    /// Liter (`L`).
    pub const LITER: Unit = Unit(Cow::Borrowed("L"));
    /// Gallon (`gal`).
    pub const GALLON: Unit = Unit(Cow::Borrowed("gal"));
    /// Volt (`V`).
    pub const VOLT: Unit = Unit(Cow::Borrowed("V"));
    /// Watt (`W`).
    pub const WATT: Unit = Unit(Cow::Borrowed("W"));
    /// Ampere (`A`).
    pub const AMPERE: Unit = Unit(Cow::Borrowed("A"));
    /// Percent (`%`).
    pub const PERCENT: Unit = Unit(Cow::Borrowed("%"));
    /// Meter (`m`).
    pub const METER: Unit = Unit(Cow::Borrowed("m"));
    /// Feet (`ft`).
    pub const FEET: Unit = Unit(Cow::Borrowed("ft"));
    /// Pascal (`Pa`).
    pub const PASCAL: Unit = Unit(Cow::Borrowed("Pa"));
    /// Pounds per square inch (`psi`).
    pub const PSI: Unit = Unit(Cow::Borrowed("psi"));
    /// Amount or count (`#`).
    pub const COUNT: Unit = Unit(Cow::Borrowed("#"));
    /// No unit.
    pub const NONE: Unit = Unit(Cow::Borrowed(""));

    /// Wrap an arbitrary unit string.
    #[must_use]
    pub fn custom(unit: impl Into<String>) -> Self {
        Self(Cow::Owned(unit.into()))
    }

    /// Access the display string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Unit {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_expose_convention_constants() {
        assert_eq!(Unit::DEGREE_CELSIUS.as_str(), "°C");
        assert_eq!(Unit::PERCENT.as_str(), "%");
        assert_eq!(Unit::COUNT.as_str(), "#");
        assert_eq!(Unit::NONE.as_str(), "");
    }

    #[test]
    fn should_default_to_none() {
        assert_eq!(Unit::default(), Unit::NONE);
    }

    #[test]
    fn should_compare_custom_and_constant_by_string() {
        assert_eq!(Unit::custom("°C"), Unit::DEGREE_CELSIUS);
        assert_ne!(Unit::custom("K"), Unit::DEGREE_CELSIUS);
    }

    #[test]
    fn should_order_units_by_string_value() {
        assert!(Unit::AMPERE < Unit::VOLT);
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let unit = Unit::custom("lux");
        let json = serde_json::to_string(&unit).unwrap();
        let parsed: Unit = serde_json::from_str(&json).unwrap();
        assert_eq!(unit, parsed);
    }
}
