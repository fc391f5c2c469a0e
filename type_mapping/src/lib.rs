//! Typed marshalling registry
//!
//! Maps a closed set of type codes to their native Rust representation and
//! to the conversions each code supports: binding into a statement slot,
//! reading from a result column, parsing from text and rendering as JSON.

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod conversions;
pub mod enums;
pub mod errors;
pub mod handles;
pub mod json;
pub mod memory;
pub mod record;
pub mod registry;
pub mod serialize;
pub mod slots;
pub mod sql;
pub mod tag;
pub mod types;
pub mod validate;

pub use conversions::{pack_uuid, unpack_uuid};
pub use enums::{resolve_enum, resolve_enum_as, EnumDescriptor, EnumValue, NamedEnum};
pub use errors::{BoxDynError, DataSourceError, MappingError, Operation};
pub use handles::{Blob, CharacterStream, Clob, NClob, RowId, SqlArray, SqlRef, SqlXml};
pub use memory::{Cell, MemoryRow, MemoryStatement};
pub use record::{BindFn, ConversionRecord, JsonFn, ParseFn, ParseOptions, ReadFn};
pub use registry::{Registry, RegistryBuilder};
pub use serialize::render_json_object;
pub use slots::{ParameterSlots, ResultRow};
pub use sql::pg_type_for_tag;
pub use tag::{TypeTag, UnknownTypeTag};
pub use types::{NativeType, NativeValue};

// Re-export the value crates that appear in the public API
pub use bigdecimal;
pub use chrono;
pub use url;
pub use uuid;
