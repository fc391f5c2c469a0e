//! Native type identities and runtime values
//!
//! [`NativeType`] names the Rust representation a type code is defined over;
//! [`NativeValue`] carries one value in that representation.

use crate::enums::{EnumDescriptor, EnumValue, NamedEnum};
use crate::handles::{Blob, CharacterStream, Clob, NClob, RowId, SqlArray, SqlRef, SqlXml};
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use url::Url;
use uuid::Uuid;

#[derive(Clone, Copy)]
enum Identity {
    Plain(TypeId),
    Enumeration(&'static EnumDescriptor),
}

/// Identity of a native representation.
///
/// Plain types are identified by their `TypeId`. Enumerations carry their
/// descriptor, which is how inference recognizes a closed set of named
/// constants without runtime reflection.
#[derive(Clone, Copy)]
pub struct NativeType {
    identity: Identity,
    name: &'static str,
}

impl NativeType {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            identity: Identity::Plain(TypeId::of::<T>()),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn of_enum<E: NamedEnum>() -> Self {
        Self::enumeration(E::descriptor())
    }

    pub fn enumeration(descriptor: &'static EnumDescriptor) -> Self {
        Self {
            identity: Identity::Enumeration(descriptor),
            name: descriptor.type_name(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_enumeration(&self) -> bool {
        matches!(self.identity, Identity::Enumeration(_))
    }

    pub fn enum_descriptor(&self) -> Option<&'static EnumDescriptor> {
        match self.identity {
            Identity::Enumeration(descriptor) => Some(descriptor),
            Identity::Plain(_) => None,
        }
    }
}

impl PartialEq for NativeType {
    fn eq(&self, other: &Self) -> bool {
        match (self.identity, other.identity) {
            (Identity::Plain(a), Identity::Plain(b)) => a == b,
            (Identity::Enumeration(a), Identity::Enumeration(b)) => std::ptr::eq(a, b),
            _ => false,
        }
    }
}

impl Eq for NativeType {}

impl Hash for NativeType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.identity {
            Identity::Plain(id) => {
                0u8.hash(state);
                id.hash(state);
            }
            Identity::Enumeration(descriptor) => {
                1u8.hash(state);
                std::ptr::hash(descriptor, state);
            }
        }
    }
}

impl fmt::Debug for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.identity {
            Identity::Plain(_) => write!(f, "NativeType({})", self.name),
            Identity::Enumeration(_) => write!(f, "NativeType(enum {})", self.name),
        }
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A value in the native representation of its type code
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    Null,
    Text(String),
    Timestamp(DateTime<Utc>),
    Integer(i32),
    Long(i64),
    Uuid(Uuid),
    Enum(EnumValue),
    Decimal(BigDecimal),
    Boolean(bool),
    Byte(i8),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Double(f64),
    Float(f32),
    Short(i16),
    Time(NaiveTime),
    Array(SqlArray),
    Blob(Blob),
    Clob(Clob),
    NClob(NClob),
    Ref(SqlRef),
    RowId(RowId),
    Xml(SqlXml),
    Reader(CharacterStream),
    Url(Url),
    Json(serde_json::Value),
}

impl NativeValue {
    pub fn is_null(&self) -> bool {
        matches!(self, NativeValue::Null)
    }

    /// Short name of the variant, used in mismatch errors
    pub fn kind(&self) -> &'static str {
        match self {
            NativeValue::Null => "null",
            NativeValue::Text(_) => "text",
            NativeValue::Timestamp(_) => "timestamp",
            NativeValue::Integer(_) => "i32",
            NativeValue::Long(_) => "i64",
            NativeValue::Uuid(_) => "uuid",
            NativeValue::Enum(_) => "enum",
            NativeValue::Decimal(_) => "decimal",
            NativeValue::Boolean(_) => "bool",
            NativeValue::Byte(_) => "i8",
            NativeValue::Bytes(_) => "bytes",
            NativeValue::Date(_) => "date",
            NativeValue::Double(_) => "f64",
            NativeValue::Float(_) => "f32",
            NativeValue::Short(_) => "i16",
            NativeValue::Time(_) => "time",
            NativeValue::Array(_) => "array",
            NativeValue::Blob(_) => "blob",
            NativeValue::Clob(_) => "clob",
            NativeValue::NClob(_) => "nclob",
            NativeValue::Ref(_) => "ref",
            NativeValue::RowId(_) => "rowid",
            NativeValue::Xml(_) => "xml",
            NativeValue::Reader(_) => "reader",
            NativeValue::Url(_) => "url",
            NativeValue::Json(_) => "json",
        }
    }

    /// Identity of the value's representation; `None` for `Null`
    pub fn native_type(&self) -> Option<NativeType> {
        let native = match self {
            NativeValue::Null => return None,
            NativeValue::Text(_) => NativeType::of::<String>(),
            NativeValue::Timestamp(_) => NativeType::of::<DateTime<Utc>>(),
            NativeValue::Integer(_) => NativeType::of::<i32>(),
            NativeValue::Long(_) => NativeType::of::<i64>(),
            NativeValue::Uuid(_) => NativeType::of::<Uuid>(),
            NativeValue::Enum(value) => NativeType::enumeration(value.descriptor()),
            NativeValue::Decimal(_) => NativeType::of::<BigDecimal>(),
            NativeValue::Boolean(_) => NativeType::of::<bool>(),
            NativeValue::Byte(_) => NativeType::of::<i8>(),
            NativeValue::Bytes(_) => NativeType::of::<Vec<u8>>(),
            NativeValue::Date(_) => NativeType::of::<NaiveDate>(),
            NativeValue::Double(_) => NativeType::of::<f64>(),
            NativeValue::Float(_) => NativeType::of::<f32>(),
            NativeValue::Short(_) => NativeType::of::<i16>(),
            NativeValue::Time(_) => NativeType::of::<NaiveTime>(),
            NativeValue::Array(_) => NativeType::of::<SqlArray>(),
            NativeValue::Blob(_) => NativeType::of::<Blob>(),
            NativeValue::Clob(_) => NativeType::of::<Clob>(),
            NativeValue::NClob(_) => NativeType::of::<NClob>(),
            NativeValue::Ref(_) => NativeType::of::<SqlRef>(),
            NativeValue::RowId(_) => NativeType::of::<RowId>(),
            NativeValue::Xml(_) => NativeType::of::<SqlXml>(),
            NativeValue::Reader(_) => NativeType::of::<CharacterStream>(),
            NativeValue::Url(_) => NativeType::of::<Url>(),
            NativeValue::Json(_) => NativeType::of::<serde_json::Value>(),
        };
        Some(native)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            NativeValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Convert basic Rust types to NativeValue
impl From<String> for NativeValue {
    fn from(val: String) -> Self {
        NativeValue::Text(val)
    }
}

impl From<&str> for NativeValue {
    fn from(val: &str) -> Self {
        NativeValue::Text(val.to_string())
    }
}

impl From<char> for NativeValue {
    fn from(val: char) -> Self {
        NativeValue::Text(val.to_string())
    }
}

impl From<i8> for NativeValue {
    fn from(val: i8) -> Self {
        NativeValue::Byte(val)
    }
}

impl From<i16> for NativeValue {
    fn from(val: i16) -> Self {
        NativeValue::Short(val)
    }
}

impl From<i32> for NativeValue {
    fn from(val: i32) -> Self {
        NativeValue::Integer(val)
    }
}

impl From<i64> for NativeValue {
    fn from(val: i64) -> Self {
        NativeValue::Long(val)
    }
}

impl From<f32> for NativeValue {
    fn from(val: f32) -> Self {
        NativeValue::Float(val)
    }
}

impl From<f64> for NativeValue {
    fn from(val: f64) -> Self {
        NativeValue::Double(val)
    }
}

impl From<bool> for NativeValue {
    fn from(val: bool) -> Self {
        NativeValue::Boolean(val)
    }
}

impl From<Uuid> for NativeValue {
    fn from(val: Uuid) -> Self {
        NativeValue::Uuid(val)
    }
}

impl From<BigDecimal> for NativeValue {
    fn from(val: BigDecimal) -> Self {
        NativeValue::Decimal(val)
    }
}

impl From<Vec<u8>> for NativeValue {
    fn from(val: Vec<u8>) -> Self {
        NativeValue::Bytes(val)
    }
}

impl From<DateTime<Utc>> for NativeValue {
    fn from(val: DateTime<Utc>) -> Self {
        NativeValue::Timestamp(val)
    }
}

impl From<NaiveDate> for NativeValue {
    fn from(val: NaiveDate) -> Self {
        NativeValue::Date(val)
    }
}

impl From<NaiveTime> for NativeValue {
    fn from(val: NaiveTime) -> Self {
        NativeValue::Time(val)
    }
}

impl From<EnumValue> for NativeValue {
    fn from(val: EnumValue) -> Self {
        NativeValue::Enum(val)
    }
}

impl From<SqlArray> for NativeValue {
    fn from(val: SqlArray) -> Self {
        NativeValue::Array(val)
    }
}

impl From<Blob> for NativeValue {
    fn from(val: Blob) -> Self {
        NativeValue::Blob(val)
    }
}

impl From<Clob> for NativeValue {
    fn from(val: Clob) -> Self {
        NativeValue::Clob(val)
    }
}

impl From<NClob> for NativeValue {
    fn from(val: NClob) -> Self {
        NativeValue::NClob(val)
    }
}

impl From<SqlRef> for NativeValue {
    fn from(val: SqlRef) -> Self {
        NativeValue::Ref(val)
    }
}

impl From<RowId> for NativeValue {
    fn from(val: RowId) -> Self {
        NativeValue::RowId(val)
    }
}

impl From<SqlXml> for NativeValue {
    fn from(val: SqlXml) -> Self {
        NativeValue::Xml(val)
    }
}

impl From<CharacterStream> for NativeValue {
    fn from(val: CharacterStream) -> Self {
        NativeValue::Reader(val)
    }
}

impl From<Url> for NativeValue {
    fn from(val: Url) -> Self {
        NativeValue::Url(val)
    }
}

impl From<serde_json::Value> for NativeValue {
    fn from(val: serde_json::Value) -> Self {
        NativeValue::Json(val)
    }
}

impl<T> From<Option<T>> for NativeValue
where
    T: Into<NativeValue>,
{
    fn from(val: Option<T>) -> Self {
        match val {
            Some(v) => v.into(),
            None => NativeValue::Null,
        }
    }
}
