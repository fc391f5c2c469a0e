//! Type codes
//!
//! The closed, ordered set of logical data kinds the registry knows about.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical data kind of a mapped value.
///
/// The order is significant: the most common kinds come first and `Object`,
/// the catch-all, comes last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TypeTag {
    Null,
    String,
    Timestamp,
    Integer,
    Long,
    #[serde(rename = "UUID", alias = "Uuid")]
    Uuid,
    Enum,
    BigDecimal,
    Boolean,
    Byte,
    ByteArray,
    Date,
    Double,
    Float,
    Short,
    Time,
    Array,
    Blob,
    Clob,
    NClob,
    Ref,
    Rowid,
    Xml,
    Reader,
    Url,
    JsonString,
    Object,
}

impl TypeTag {
    /// Every tag, in declaration order.
    pub const ALL: [TypeTag; 27] = [
        TypeTag::Null,
        TypeTag::String,
        TypeTag::Timestamp,
        TypeTag::Integer,
        TypeTag::Long,
        TypeTag::Uuid,
        TypeTag::Enum,
        TypeTag::BigDecimal,
        TypeTag::Boolean,
        TypeTag::Byte,
        TypeTag::ByteArray,
        TypeTag::Date,
        TypeTag::Double,
        TypeTag::Float,
        TypeTag::Short,
        TypeTag::Time,
        TypeTag::Array,
        TypeTag::Blob,
        TypeTag::Clob,
        TypeTag::NClob,
        TypeTag::Ref,
        TypeTag::Rowid,
        TypeTag::Xml,
        TypeTag::Reader,
        TypeTag::Url,
        TypeTag::JsonString,
        TypeTag::Object,
    ];

    /// Canonical name of the tag
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Null => "Null",
            TypeTag::String => "String",
            TypeTag::Timestamp => "Timestamp",
            TypeTag::Integer => "Integer",
            TypeTag::Long => "Long",
            TypeTag::Uuid => "UUID",
            TypeTag::Enum => "Enum",
            TypeTag::BigDecimal => "BigDecimal",
            TypeTag::Boolean => "Boolean",
            TypeTag::Byte => "Byte",
            TypeTag::ByteArray => "ByteArray",
            TypeTag::Date => "Date",
            TypeTag::Double => "Double",
            TypeTag::Float => "Float",
            TypeTag::Short => "Short",
            TypeTag::Time => "Time",
            TypeTag::Array => "Array",
            TypeTag::Blob => "Blob",
            TypeTag::Clob => "Clob",
            TypeTag::NClob => "NClob",
            TypeTag::Ref => "Ref",
            TypeTag::Rowid => "Rowid",
            TypeTag::Xml => "Xml",
            TypeTag::Reader => "Reader",
            TypeTag::Url => "Url",
            TypeTag::JsonString => "JsonString",
            TypeTag::Object => "Object",
        }
    }

    /// Numeric kinds render as bare JSON numbers and may serve as optimistic locks
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            TypeTag::Integer
                | TypeTag::Long
                | TypeTag::BigDecimal
                | TypeTag::Byte
                | TypeTag::Double
                | TypeTag::Float
                | TypeTag::Short
        )
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a tag name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown type code: {0}")]
pub struct UnknownTypeTag(pub String);

impl FromStr for TypeTag {
    type Err = UnknownTypeTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownTypeTag(s.to_string()))
    }
}
