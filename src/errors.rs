//! Error types for the TypeCodes crate
//!
//! This module contains all error types that can be returned by TypeCodes operations.

use column_mapping::ColumnMappingError;
use config::ConfigError;
use thiserror::Error;
use type_mapping::MappingError;

#[derive(Error, Debug)]
pub enum TypeCodesError {
    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    ColumnMapping(#[from] ColumnMappingError),

    #[error("No database configured")]
    NoDatabase,
}
