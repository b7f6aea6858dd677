//! The property value codec family.
//!
//! Every property datatype pairs a native value type with a wire-string
//! codec. Encoding and decoding both validate the value against the codec's
//! domain — range bounds for numbers, membership for enums, component bounds
//! for colors — so an out-of-domain value never reaches the wire and an
//! out-of-domain payload never reaches application code.

use std::fmt;

mod color;
mod enums;
mod numeric;
mod scalar;

pub use color::{HsvCodec, RgbCodec};
pub use enums::{EnumCodec, MappedEnumCodec};
pub use numeric::{FloatCodec, IntegerCodec};
pub use scalar::{BooleanCodec, StringCodec};

use crate::error::ValueError;

/// The datatype a property advertises through its `$datatype` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Datatype {
    String,
    Integer,
    Float,
    Boolean,
    Enum,
    Color,
}

impl Datatype {
    /// The wire representation of the datatype.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Enum => "enum",
            Self::Color => "color",
        }
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bidirectional codec between a native value type and its wire string.
///
/// Implementations are immutable after construction; the same codec instance
/// drives every encode and decode for the lifetime of its property.
pub trait ValueCodec: Send + Sync {
    /// The native value type.
    type Value: Clone + PartialEq + fmt::Debug + Send + Sync;

    /// The fixed datatype of this codec.
    fn datatype(&self) -> Datatype;

    /// The optional `$format` advertisement (e.g. `min:max` or the
    /// comma-joined enum members).
    fn format(&self) -> Option<String> {
        None
    }

    /// Encode a native value as a wire string.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] when the value is outside the codec's domain.
    fn to_wire(&self, value: &Self::Value) -> Result<String, ValueError>;

    /// Decode a wire string into a native value.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] when the string cannot be parsed or the
    /// parsed value is outside the codec's domain.
    fn from_wire(&self, wire: &str) -> Result<Self::Value, ValueError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_datatype_wire_names() {
        assert_eq!(Datatype::String.to_string(), "string");
        assert_eq!(Datatype::Integer.to_string(), "integer");
        assert_eq!(Datatype::Float.to_string(), "float");
        assert_eq!(Datatype::Boolean.to_string(), "boolean");
        assert_eq!(Datatype::Enum.to_string(), "enum");
        assert_eq!(Datatype::Color.to_string(), "color");
    }
}
