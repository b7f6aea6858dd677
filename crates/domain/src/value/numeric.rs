//! Integer and float codecs with range validation.
//!
//! The integer domain is the full 64-bit signed range; the float domain is
//! bounded by the largest finite single-precision magnitude in either sign.
//! An optional `min:max` sub-range narrows the domain at construction time
//! and is enforced on both encode and decode.

use crate::error::{ValidationError, ValueError};

use super::{Datatype, ValueCodec};

/// The float domain bound: the largest finite `f32` magnitude, widened.
const FLOAT_DOMAIN_MAX: f64 = f32::MAX as f64;

fn out_of_range<T: std::fmt::Display>(value: T, min: T, max: T) -> ValueError {
    ValueError::OutOfRange {
        value: value.to_string(),
        min: min.to_string(),
        max: max.to_string(),
    }
}

/// Codec for 64-bit signed integer properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerCodec {
    range: Option<(i64, i64)>,
}

impl IntegerCodec {
    /// A codec over the full integer domain, advertising no `$format`.
    #[must_use]
    pub fn new() -> Self {
        Self { range: None }
    }

    /// A codec restricted to `[min, max]`; open ends default to the domain
    /// bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRange`] when `min > max`.
    pub fn with_range(min: Option<i64>, max: Option<i64>) -> Result<Self, ValidationError> {
        let min = min.unwrap_or(i64::MIN);
        let max = max.unwrap_or(i64::MAX);
        if min > max {
            return Err(ValidationError::InvalidRange {
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        Ok(Self {
            range: Some((min, max)),
        })
    }

    fn bounds(&self) -> (i64, i64) {
        self.range.unwrap_or((i64::MIN, i64::MAX))
    }

    fn check(&self, value: i64) -> Result<i64, ValueError> {
        let (min, max) = self.bounds();
        if value < min || value > max {
            return Err(out_of_range(value, min, max));
        }
        Ok(value)
    }
}

impl Default for IntegerCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueCodec for IntegerCodec {
    type Value = i64;

    fn datatype(&self) -> Datatype {
        Datatype::Integer
    }

    fn format(&self) -> Option<String> {
        self.range.map(|(min, max)| format!("{min}:{max}"))
    }

    fn to_wire(&self, value: &Self::Value) -> Result<String, ValueError> {
        Ok(self.check(*value)?.to_string())
    }

    fn from_wire(&self, wire: &str) -> Result<Self::Value, ValueError> {
        let value: i64 = wire
            .trim()
            .parse()
            .map_err(|_| ValueError::NotANumber(wire.to_string()))?;
        self.check(value)
    }
}

/// Codec for floating-point properties.
///
/// Values travel as `f64` but the domain is capped at the single-precision
/// maximum so every in-domain value survives a single-precision consumer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatCodec {
    range: Option<(f64, f64)>,
}

impl FloatCodec {
    /// A codec over the full float domain, advertising no `$format`.
    #[must_use]
    pub fn new() -> Self {
        Self { range: None }
    }

    /// A codec restricted to `[min, max]`; open ends default to the domain
    /// bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRange`] when either bound is not a
    /// finite number inside the domain, or when `min > max`.
    pub fn with_range(min: Option<f64>, max: Option<f64>) -> Result<Self, ValidationError> {
        let min = min.unwrap_or(-FLOAT_DOMAIN_MAX);
        let max = max.unwrap_or(FLOAT_DOMAIN_MAX);
        let in_domain = |bound: f64| bound.is_finite() && bound.abs() <= FLOAT_DOMAIN_MAX;
        if !in_domain(min) || !in_domain(max) || min > max {
            return Err(ValidationError::InvalidRange {
                min: format!("{min:?}"),
                max: format!("{max:?}"),
            });
        }
        Ok(Self {
            range: Some((min, max)),
        })
    }

    fn bounds(&self) -> (f64, f64) {
        self.range.unwrap_or((-FLOAT_DOMAIN_MAX, FLOAT_DOMAIN_MAX))
    }

    fn check(&self, value: f64) -> Result<f64, ValueError> {
        if value.is_nan() {
            return Err(ValueError::NotANumber(format!("{value:?}")));
        }
        let (min, max) = self.bounds();
        if value < min || value > max {
            return Err(ValueError::OutOfRange {
                value: format!("{value:?}"),
                min: format!("{min:?}"),
                max: format!("{max:?}"),
            });
        }
        Ok(value)
    }
}

impl Default for FloatCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueCodec for FloatCodec {
    type Value = f64;

    fn datatype(&self) -> Datatype {
        Datatype::Float
    }

    fn format(&self) -> Option<String> {
        self.range.map(|(min, max)| format!("{min:?}:{max:?}"))
    }

    fn to_wire(&self, value: &Self::Value) -> Result<String, ValueError> {
        Ok(format!("{:?}", self.check(*value)?))
    }

    fn from_wire(&self, wire: &str) -> Result<Self::Value, ValueError> {
        let value: f64 = wire
            .trim()
            .parse()
            .map_err(|_| ValueError::NotANumber(wire.to_string()))?;
        self.check(value)
    }
}
