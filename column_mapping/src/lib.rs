//! Column Mapping - entity to table mapping on top of the type registry
//!
//! This crate provides column and table definitions, the entity trait, the
//! registry-driven entity operations and the PostgreSQL row/argument adapter.

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

pub mod binding;
pub mod column;
pub mod entity;
pub mod errors;
pub mod pg;
pub mod table;
pub mod validation;

pub use binding::EntityBinding;
pub use column::{Column, ColumnDef, Generated};
pub use entity::{field_type_error, Entity};
pub use errors::ColumnMappingError;
pub use pg::{PgBindingError, PgBindings, PgResultRow};
pub use table::TableDef;
pub use validation::{SqlIdentifier, ValidationError};
