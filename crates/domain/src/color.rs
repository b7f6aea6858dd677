//! HSV and RGB color value objects.
//!
//! Both types use a canonical `"a,b,c"` wire string. Cross-conversion is
//! lossy: round-tripping through the other representation may change the
//! result by a rounding step, but every component stays inside its bounds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// A color in HSV space: hue 0–360, saturation and value 0–100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HsvColor {
    hue: u16,
    saturation: u8,
    value: u8,
}

impl HsvColor {
    /// Build an HSV color, checking every component against its bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::OutOfRange`] when `hue > 360` or either of
    /// `saturation`/`value` exceeds 100.
    pub fn new(hue: u16, saturation: u8, value: u8) -> Result<Self, ValueError> {
        if hue > 360 {
            return Err(out_of_range(hue, 0, 360));
        }
        if saturation > 100 {
            return Err(out_of_range(saturation, 0, 100));
        }
        if value > 100 {
            return Err(out_of_range(value, 0, 100));
        }
        Ok(Self {
            hue,
            saturation,
            value,
        })
    }

    /// Hue component, 0–360.
    #[must_use]
    pub fn hue(self) -> u16 {
        self.hue
    }

    /// Saturation component, 0–100.
    #[must_use]
    pub fn saturation(self) -> u8 {
        self.saturation
    }

    /// Value (brightness) component, 0–100.
    #[must_use]
    pub fn value(self) -> u8 {
        self.value
    }
}

/// A color in RGB space, each channel 0–255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RgbColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl RgbColor {
    /// Build an RGB color. The `u8` channels make every input valid.
    #[must_use]
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red channel, 0–255.
    #[must_use]
    pub fn red(self) -> u8 {
        self.red
    }

    /// Green channel, 0–255.
    #[must_use]
    pub fn green(self) -> u8 {
        self.green
    }

    /// Blue channel, 0–255.
    #[must_use]
    pub fn blue(self) -> u8 {
        self.blue
    }
}

impl From<HsvColor> for RgbColor {
    fn from(hsv: HsvColor) -> Self {
        // 360° wraps onto 0°.
        let hue = f64::from(hsv.hue % 360);
        let saturation = f64::from(hsv.saturation) / 100.0;
        let value = f64::from(hsv.value) / 100.0;

        let chroma = value * saturation;
        let hue_prime = hue / 60.0;
        let x = chroma * (1.0 - (hue_prime % 2.0 - 1.0).abs());
        let (r1, g1, b1) = match hue_prime {
            h if h < 1.0 => (chroma, x, 0.0),
            h if h < 2.0 => (x, chroma, 0.0),
            h if h < 3.0 => (0.0, chroma, x),
            h if h < 4.0 => (0.0, x, chroma),
            h if h < 5.0 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = value - chroma;

        Self::new(
            to_channel(r1 + m),
            to_channel(g1 + m),
            to_channel(b1 + m),
        )
    }
}

impl From<RgbColor> for HsvColor {
    fn from(rgb: RgbColor) -> Self {
        let red = f64::from(rgb.red) / 255.0;
        let green = f64::from(rgb.green) / 255.0;
        let blue = f64::from(rgb.blue) / 255.0;

        let max = red.max(green).max(blue);
        let min = red.min(green).min(blue);
        let delta = max - min;

        let hue = if delta == 0.0 {
            0.0
        } else if max == red {
            60.0 * (((green - blue) / delta).rem_euclid(6.0))
        } else if max == green {
            60.0 * ((blue - red) / delta + 2.0)
        } else {
            60.0 * ((red - green) / delta + 4.0)
        };
        let saturation = if max == 0.0 { 0.0 } else { delta / max };

        // Components are mathematically in bounds, so the rounding cast
        // cannot overflow.
        Self {
            hue: hue.round().min(360.0) as u16,
            saturation: (saturation * 100.0).round().min(100.0) as u8,
            value: (max * 100.0).round().min(100.0) as u8,
        }
    }
}

fn to_channel(normalized: f64) -> u8 {
    (normalized * 255.0).round().clamp(0.0, 255.0) as u8
}

fn out_of_range(value: impl fmt::Display, min: u16, max: u16) -> ValueError {
    ValueError::OutOfRange {
        value: value.to_string(),
        min: min.to_string(),
        max: max.to_string(),
    }
}

impl fmt::Display for HsvColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.hue, self.saturation, self.value)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.red, self.green, self.blue)
    }
}

fn split_components(wire: &str) -> Result<[&str; 3], ValueError> {
    let mut parts = wire.split(',');
    let (Some(a), Some(b), Some(c), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ValueError::MalformedColor(wire.to_string()));
    };
    Ok([a.trim(), b.trim(), c.trim()])
}

impl FromStr for HsvColor {
    type Err = ValueError;

    fn from_str(wire: &str) -> Result<Self, Self::Err> {
        let [h, s, v] = split_components(wire)?;
        let hue: u16 = h
            .parse()
            .map_err(|_| ValueError::NotANumber(h.to_string()))?;
        let saturation: u8 = s
            .parse()
            .map_err(|_| ValueError::NotANumber(s.to_string()))?;
        let value: u8 = v
            .parse()
            .map_err(|_| ValueError::NotANumber(v.to_string()))?;
        Self::new(hue, saturation, value)
    }
}

impl FromStr for RgbColor {
    type Err = ValueError;

    fn from_str(wire: &str) -> Result<Self, Self::Err> {
        let [r, g, b] = split_components(wire)?;
        let red: u8 = r
            .parse()
            .map_err(|_| ValueError::NotANumber(r.to_string()))?;
        let green: u8 = g
            .parse()
            .map_err(|_| ValueError::NotANumber(g.to_string()))?;
        let blue: u8 = b
            .parse()
            .map_err(|_| ValueError::NotANumber(b.to_string()))?;
        Ok(Self::new(red, green, blue))
    }
}
