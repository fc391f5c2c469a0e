//! # TypeCodes
//!
//! A typed marshalling registry for PostgreSQL: every type code maps to one
//! native Rust representation and to the conversions that code supports
//! (bind into a statement, read from a row, parse from text, render as JSON).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use typecodes::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let typecodes = TypeCodes::connect(&config).await?;
//!
//!     let registry = typecodes.registry();
//!     let amount = registry.parse(TypeTag::BigDecimal, "1,234.50")?;
//!     println!("{}", registry.to_json(TypeTag::BigDecimal, &amount));
//!
//!     let rows = typecodes
//!         .fetch_values(
//!             "SELECT name, created_at FROM users WHERE id = $1",
//!             &[(TypeTag::Long, NativeValue::Long(42))],
//!             &[TypeTag::String, TypeTag::Timestamp],
//!         )
//!         .await?;
//!     println!("{} rows", rows.len());
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod prelude;

// Re-export the main public types for convenience
pub use core::{TypeCodes, parse_options};
pub use errors::TypeCodesError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, MarshallingConfig};

// Re-export internal crates used by the public API
pub use column_mapping;
pub use type_mapping;

// Re-export external dependencies used in public API
pub use sqlx;
