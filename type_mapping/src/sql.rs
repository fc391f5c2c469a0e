//! SQL type names
//!
//! Names the PostgreSQL column type each type code is stored in.

use crate::tag::TypeTag;

/// PostgreSQL column type that stores values of `tag`.
///
/// UUIDs are bound as 16 packed bytes, hence `BYTEA`; enumerations are
/// stored by name.
pub fn pg_type_for_tag(tag: TypeTag) -> &'static str {
    match tag {
        TypeTag::Null | TypeTag::String | TypeTag::Enum => "VARCHAR",
        TypeTag::Timestamp => "TIMESTAMP WITH TIME ZONE",
        TypeTag::Integer => "INTEGER",
        TypeTag::Long => "BIGINT",
        TypeTag::Uuid | TypeTag::ByteArray | TypeTag::Blob | TypeTag::Rowid => "BYTEA",
        TypeTag::BigDecimal => "NUMERIC",
        TypeTag::Boolean => "BOOLEAN",
        TypeTag::Byte => "\"char\"",
        TypeTag::Date => "DATE",
        TypeTag::Double => "DOUBLE PRECISION",
        TypeTag::Float => "REAL",
        TypeTag::Short => "SMALLINT",
        TypeTag::Time => "TIME",
        TypeTag::Array => "TEXT[]",
        TypeTag::Clob
        | TypeTag::NClob
        | TypeTag::Ref
        | TypeTag::Xml
        | TypeTag::Reader
        | TypeTag::Url
        | TypeTag::JsonString => "TEXT",
        TypeTag::Object => "JSONB",
    }
}
