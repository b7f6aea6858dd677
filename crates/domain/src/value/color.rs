//! Color codecs delegating to the [`HsvColor`]/[`RgbColor`] wire formats.

use crate::color::{HsvColor, RgbColor};
use crate::error::ValueError;

use super::{Datatype, ValueCodec};

/// Codec for HSV color properties (`$format` = `hsv`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HsvCodec;

impl ValueCodec for HsvCodec {
    type Value = HsvColor;

    fn datatype(&self) -> Datatype {
        Datatype::Color
    }

    fn format(&self) -> Option<String> {
        Some("hsv".to_string())
    }

    fn to_wire(&self, value: &Self::Value) -> Result<String, ValueError> {
        Ok(value.to_string())
    }

    fn from_wire(&self, wire: &str) -> Result<Self::Value, ValueError> {
        wire.parse()
    }
}

/// Codec for RGB color properties (`$format` = `rgb`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RgbCodec;

impl ValueCodec for RgbCodec {
    type Value = RgbColor;

    fn datatype(&self) -> Datatype {
        Datatype::Color
    }

    fn format(&self) -> Option<String> {
        Some("rgb".to_string())
    }

    fn to_wire(&self, value: &Self::Value) -> Result<String, ValueError> {
        Ok(value.to_string())
    }

    fn from_wire(&self, wire: &str) -> Result<Self::Value, ValueError> {
        wire.parse()
    }
}
