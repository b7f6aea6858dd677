//! String and boolean codecs.

use crate::error::ValueError;

use super::{Datatype, ValueCodec};

/// Codec for free-form string properties. Every string is in domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringCodec;

impl ValueCodec for StringCodec {
    type Value = String;

    fn datatype(&self) -> Datatype {
        Datatype::String
    }

    fn to_wire(&self, value: &Self::Value) -> Result<String, ValueError> {
        Ok(value.clone())
    }

    fn from_wire(&self, wire: &str) -> Result<Self::Value, ValueError> {
        Ok(wire.to_string())
    }
}

/// Codec for boolean properties. Only the literals `true` and `false` are
/// legal on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BooleanCodec;

impl ValueCodec for BooleanCodec {
    type Value = bool;

    fn datatype(&self) -> Datatype {
        Datatype::Boolean
    }

    fn to_wire(&self, value: &Self::Value) -> Result<String, ValueError> {
        Ok(value.to_string())
    }

    fn from_wire(&self, wire: &str) -> Result<Self::Value, ValueError> {
        match wire {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(ValueError::NotBoolean(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_roundtrip_arbitrary_strings() {
        let codec = StringCodec;
        let wire = codec.to_wire(&"hello world".to_string()).unwrap();
        assert_eq!(codec.from_wire(&wire).unwrap(), "hello world");
        assert_eq!(codec.datatype(), Datatype::String);
        assert_eq!(codec.format(), None);
    }

    #[test]
    fn should_roundtrip_both_boolean_values() {
        let codec = BooleanCodec;
        for value in [true, false] {
            let wire = codec.to_wire(&value).unwrap();
            assert_eq!(codec.from_wire(&wire).unwrap(), value);
        }
    }

    #[test]
    fn should_encode_booleans_as_lowercase_literals() {
        let codec = BooleanCodec;
        assert_eq!(codec.to_wire(&true).unwrap(), "true");
        assert_eq!(codec.to_wire(&false).unwrap(), "false");
    }

    #[test]
    fn should_reject_non_boolean_literals() {
        let codec = BooleanCodec;
        for wire in ["True", "1", "yes", "", "TRUE"] {
            assert_eq!(
                codec.from_wire(wire),
                Err(ValueError::NotBoolean(wire.to_string()))
            );
        }
    }
}
