//! Enum codecs: plain string membership and explicit name↔value mapping.

use std::fmt;

use crate::error::{ValidationError, ValueError};

use super::{Datatype, ValueCodec};

fn validate_members<'a>(names: impl Iterator<Item = &'a str>) -> Result<(), ValidationError> {
    let mut seen: Vec<&str> = Vec::new();
    let mut empty = true;
    for name in names {
        empty = false;
        if name.is_empty() {
            return Err(ValidationError::EmptyEnumMember);
        }
        if seen.contains(&name) {
            return Err(ValidationError::DuplicateEnumMember(name.to_string()));
        }
        seen.push(name);
    }
    if empty {
        return Err(ValidationError::EmptyEnum);
    }
    Ok(())
}

/// Codec whose native values are the member strings themselves.
///
/// Membership is asserted on every encode and decode; the set is fixed and
/// ordered at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumCodec {
    members: Vec<String>,
}

impl EnumCodec {
    /// Build a codec from an ordered member set.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the set is empty, contains an
    /// empty string, or contains a duplicate.
    pub fn new<I, S>(members: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let members: Vec<String> = members.into_iter().map(Into::into).collect();
        validate_members(members.iter().map(String::as_str))?;
        Ok(Self { members })
    }

    /// The declared members, in declaration order.
    #[must_use]
    pub fn members(&self) -> &[String] {
        &self.members
    }
}

impl ValueCodec for EnumCodec {
    type Value = String;

    fn datatype(&self) -> Datatype {
        Datatype::Enum
    }

    fn format(&self) -> Option<String> {
        Some(self.members.join(","))
    }

    fn to_wire(&self, value: &Self::Value) -> Result<String, ValueError> {
        if self.members.iter().any(|m| m == value) {
            Ok(value.clone())
        } else {
            Err(ValueError::UnknownEnumMember(value.clone()))
        }
    }

    fn from_wire(&self, wire: &str) -> Result<Self::Value, ValueError> {
        if self.members.iter().any(|m| m == wire) {
            Ok(wire.to_string())
        } else {
            Err(ValueError::UnknownEnumMember(wire.to_string()))
        }
    }
}

/// Codec pairing each wire name with an arbitrary native value.
///
/// The mapping is supplied explicitly by the caller — nothing is derived
/// from native type structure — and is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedEnumCodec<T> {
    entries: Vec<(String, T)>,
}

impl<T> MappedEnumCodec<T>
where
    T: Clone + PartialEq + fmt::Debug + Send + Sync,
{
    /// Build a codec from ordered `(wire name, native value)` pairs.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the mapping is empty, a name is
    /// the empty string, or a name appears twice.
    pub fn new<I, S>(entries: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
    {
        let entries: Vec<(String, T)> = entries
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .collect();
        validate_members(entries.iter().map(|(name, _)| name.as_str()))?;
        Ok(Self { entries })
    }

    /// The declared wire names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl<T> ValueCodec for MappedEnumCodec<T>
where
    T: Clone + PartialEq + fmt::Debug + Send + Sync,
{
    type Value = T;

    fn datatype(&self) -> Datatype {
        Datatype::Enum
    }

    fn format(&self) -> Option<String> {
        Some(self.names().collect::<Vec<_>>().join(","))
    }

    fn to_wire(&self, value: &Self::Value) -> Result<String, ValueError> {
        self.entries
            .iter()
            .find(|(_, v)| v == value)
            .map(|(name, _)| name.clone())
            .ok_or_else(|| ValueError::UnknownEnumMember(format!("{value:?}")))
    }

    fn from_wire(&self, wire: &str) -> Result<Self::Value, ValueError> {
        self.entries
            .iter()
            .find(|(name, _)| name == wire)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| ValueError::UnknownEnumMember(wire.to_string()))
    }
}
