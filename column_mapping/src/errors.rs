//! Error types for column mapping

use crate::validation::ValidationError;
use thiserror::Error;
use type_mapping::{MappingError, TypeTag};

#[derive(Error, Debug)]
pub enum ColumnMappingError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] ValidationError),

    #[error("Invalid column definition for field {field}: {reason}")]
    ColumnDefinition { field: String, reason: String },

    #[error("Invalid table definition for {table}: {reason}")]
    TableDefinition { table: String, reason: String },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Field {field} cannot hold a {found} value")]
    FieldType { field: String, found: &'static str },

    #[error("Cannot generate a value on the client for field {field} of type code {tag}")]
    GenerationUnsupported { field: String, tag: TypeTag },

    #[error(transparent)]
    Mapping(#[from] MappingError),
}

impl ColumnMappingError {
    pub(crate) fn column(field: &str, reason: impl Into<String>) -> Self {
        ColumnMappingError::ColumnDefinition {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn table(table: &str, reason: impl Into<String>) -> Self {
        ColumnMappingError::TableDefinition {
            table: table.to_string(),
            reason: reason.into(),
        }
    }
}
