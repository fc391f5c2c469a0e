//! Convenience re-exports for common TypeCodes usage
//!
//! This prelude module re-exports the most commonly used items from the TypeCodes crates,
//! making it easier to import everything you need with a single use statement.
//!
//! # Example
//!
//! ```rust
//! use typecodes::prelude::*;
//!
//! let registry = Registry::standard();
//! assert_eq!(registry.infer_tag_of::<i64>(), TypeTag::Long);
//! ```

// Core TypeCodes components
pub use crate::core::{TypeCodes, parse_options};
pub use crate::errors::TypeCodesError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, MarshallingConfig};

// Registry, values and conversions
pub use type_mapping::{
    EnumDescriptor, EnumValue, MappingError, MemoryRow, MemoryStatement, NamedEnum, NativeType,
    NativeValue, ParameterSlots, ParseOptions, Registry, RegistryBuilder, ResultRow, TypeTag,
    named_enum,
};

// Column mapping
pub use column_mapping::{
    Column, ColumnDef, ColumnMappingError, Entity, EntityBinding, Generated, PgBindings,
    PgResultRow, TableDef,
};

// Common external dependencies
pub use anyhow;
pub use sqlx;
pub use tokio;

// Commonly used value types
pub use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
pub use sqlx::PgPool;
pub use uuid::Uuid;
