//! Entity trait
//!
//! An entity exposes its table definition and get/set access to its mapped
//! fields by name. Everything else (binding, reading, REST parameters, JSON)
//! is provided on top of these three methods by [`crate::EntityBinding`].

use crate::errors::ColumnMappingError;
use crate::table::TableDef;
use std::sync::Arc;
use type_mapping::NativeValue;

pub trait Entity {
    /// Definition of the table this entity maps to
    fn table_def(&self) -> Arc<TableDef>;

    /// Current value of a mapped field, `None` if the field is unknown
    fn field_value(&self, field: &str) -> Option<NativeValue>;

    /// Store a value into a mapped field.
    ///
    /// The value arrives in the representation of the field's type code;
    /// `NativeValue::Null` means the field should become empty.
    fn set_field_value(&mut self, field: &str, value: NativeValue)
        -> Result<(), ColumnMappingError>;
}

/// Error for a value that does not fit the field it is stored into
pub fn field_type_error(field: &str, value: &NativeValue) -> ColumnMappingError {
    ColumnMappingError::FieldType {
        field: field.to_string(),
        found: value.kind(),
    }
}
