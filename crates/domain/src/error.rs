//! Error types for the value-level model.
//!
//! Two classes exist: [`ValidationError`] covers construction-time contract
//! violations (invalid identifier, inverted range, empty enum) that should
//! never occur in correct calling code, while [`ValueError`] covers wire
//! payloads or values that fall outside a codec's domain.

/// A contract violation detected while constructing a value-level object.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The string is not a legal topic-segment identifier.
    #[error("invalid identifier {0:?}: must match [a-z0-9-]+ and not start or end with '-'")]
    InvalidIdentifier(String),

    /// A numeric sub-range is inverted or exceeds the datatype domain.
    #[error("invalid range {min}:{max}: bounds must satisfy domain min <= min <= max <= domain max")]
    InvalidRange { min: String, max: String },

    /// An enum codec was constructed without any members.
    #[error("enum codec requires at least one member")]
    EmptyEnum,

    /// An enum codec was constructed with an empty-string member.
    #[error("enum members must not be empty strings")]
    EmptyEnumMember,

    /// An enum codec was constructed with the same member name twice.
    #[error("duplicate enum member {0:?}")]
    DuplicateEnumMember(String),
}

/// A value or wire payload outside a codec's valid domain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    /// A numeric value falls outside the configured `min:max` range.
    #[error("value {value} outside allowed range {min}:{max}")]
    OutOfRange {
        value: String,
        min: String,
        max: String,
    },

    /// A boolean payload that is neither `true` nor `false`.
    #[error("expected \"true\" or \"false\", got {0:?}")]
    NotBoolean(String),

    /// A payload that cannot be parsed as a finite number.
    #[error("cannot parse {0:?} as a finite number")]
    NotANumber(String),

    /// A token that is not a member of the enum's declared set.
    #[error("{0:?} is not a member of the declared enum set")]
    UnknownEnumMember(String),

    /// A color payload with the wrong arity or shape.
    #[error("malformed color payload {0:?}: expected three comma-separated components")]
    MalformedColor(String),

    /// An inbound payload that is not valid UTF-8.
    #[error("payload is not valid UTF-8")]
    InvalidUtf8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_invalid_identifier_with_offending_string() {
        let err = ValidationError::InvalidIdentifier("Bad_Id".to_string());
        assert!(err.to_string().contains("Bad_Id"));
    }

    #[test]
    fn should_display_out_of_range_with_bounds() {
        let err = ValueError::OutOfRange {
            value: "150".to_string(),
            min: "0".to_string(),
            max: "100".to_string(),
        };
        assert_eq!(err.to_string(), "value 150 outside allowed range 0:100");
    }
}
