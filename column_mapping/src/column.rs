//! Per-field column declarations
//!
//! A [`Column`] is what an entity author writes for each mapped field. A
//! [`ColumnDef`] is the checked form: the field's type code has been inferred
//! through a [`Registry`] and the declaration validated against it.

use crate::errors::ColumnMappingError;
use crate::validation::SqlIdentifier;
use serde::{Deserialize, Serialize};
use type_mapping::{
    EnumDescriptor, MappingError, NamedEnum, NativeType, NativeValue, ParameterSlots, Registry,
    ResultRow, TypeTag,
};

/// How a column's value is produced when a new row is inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Generated {
    /// The value is never altered
    #[default]
    Never,
    /// The value is always generated before the insert
    OnTheClientAlways,
    /// The value is generated if it is null
    OnTheClientWhenNull,
    /// The column is left out of the insert and the database computes it
    OnTheDbAlways,
    /// The column is left out of the insert while its value is null
    OnTheDbWhenNull,
}

/// Mapping declaration for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    column_name: String,
    rest_param_name: Option<String>,
    pk_pos: u32,
    optimistic_lock: bool,
    on_insert: Generated,
    is_json: bool,
}

impl Column {
    pub fn new(column_name: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            rest_param_name: None,
            pk_pos: 0,
            optimistic_lock: false,
            on_insert: Generated::Never,
            is_json: false,
        }
    }

    /// Position within the primary key, starting at 1
    pub fn pk(mut self, position: u32) -> Self {
        self.pk_pos = position;
        self
    }

    /// Name used for text parameters and JSON keys; defaults to the field name
    pub fn rest_param(mut self, name: impl Into<String>) -> Self {
        self.rest_param_name = Some(name.into());
        self
    }

    pub fn optimistic_lock(mut self) -> Self {
        self.optimistic_lock = true;
        self
    }

    pub fn on_insert(mut self, generated: Generated) -> Self {
        self.on_insert = generated;
        self
    }

    /// Text column holding a JSON document, embedded as-is when rendered
    pub fn json(mut self) -> Self {
        self.is_json = true;
        self
    }
}

/// A validated column bound to a field
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    field_name: String,
    column_name: SqlIdentifier,
    rest_param_name: String,
    native_type: NativeType,
    tag: TypeTag,
    pk_pos: u32,
    optimistic_lock: bool,
    on_insert: Generated,
}

impl ColumnDef {
    pub fn new(
        registry: &Registry,
        field_name: &str,
        native_type: NativeType,
        column: Column,
    ) -> Result<Self, ColumnMappingError> {
        let mut tag = registry.infer_tag(Some(&native_type));

        if column.optimistic_lock && tag != TypeTag::Timestamp && !tag.is_numeric() {
            return Err(ColumnMappingError::column(
                field_name,
                format!("supported optimistic lock types are Timestamp and numeric, got {tag}"),
            ));
        }

        if column.pk_pos != 0 && column.optimistic_lock {
            return Err(ColumnMappingError::column(
                field_name,
                "optimistic lock can't be part of the primary key",
            ));
        }

        if column.is_json {
            if tag != TypeTag::String {
                return Err(ColumnMappingError::column(
                    field_name,
                    format!("JSON columns must be String fields, got {tag}"),
                ));
            }
            tag = TypeTag::JsonString;
        }

        let column_name = SqlIdentifier::new(&column.column_name)?;
        let rest_param_name = column
            .rest_param_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| field_name.to_string());

        trace_log!(
            "Column {} -> {} ({})",
            field_name,
            column_name,
            tag
        );

        Ok(Self {
            field_name: field_name.to_string(),
            column_name,
            rest_param_name,
            native_type,
            tag,
            pk_pos: column.pk_pos,
            optimistic_lock: column.optimistic_lock,
            on_insert: column.on_insert,
        })
    }

    /// Column for a field of plain type `T`
    pub fn of<T: 'static>(
        registry: &Registry,
        field_name: &str,
        column: Column,
    ) -> Result<Self, ColumnMappingError> {
        Self::new(registry, field_name, NativeType::of::<T>(), column)
    }

    /// Column for a field holding enumeration `E`
    pub fn of_enum<E: NamedEnum>(
        registry: &Registry,
        field_name: &str,
        column: Column,
    ) -> Result<Self, ColumnMappingError> {
        Self::new(registry, field_name, NativeType::of_enum::<E>(), column)
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn column_name(&self) -> &str {
        self.column_name.as_str()
    }

    pub fn rest_param_name(&self) -> &str {
        &self.rest_param_name
    }

    pub fn native_type(&self) -> NativeType {
        self.native_type
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn pk_pos(&self) -> u32 {
        self.pk_pos
    }

    pub fn is_pk(&self) -> bool {
        self.pk_pos > 0
    }

    pub fn is_optimistic_lock(&self) -> bool {
        self.optimistic_lock
    }

    pub fn on_insert(&self) -> Generated {
        self.on_insert
    }

    pub fn enum_descriptor(&self) -> Option<&'static EnumDescriptor> {
        self.native_type.enum_descriptor()
    }

    // ========================================
    // Per-column conversions
    // ========================================

    pub fn bind(
        &self,
        registry: &Registry,
        slots: &mut dyn ParameterSlots,
        index: usize,
        value: &NativeValue,
    ) -> Result<(), MappingError> {
        registry.bind(self.tag, slots, index, value)
    }

    /// Read this column from `row`; enumeration columns resolve through their descriptor
    pub fn read(
        &self,
        registry: &Registry,
        row: &dyn ResultRow,
        index: usize,
    ) -> Result<NativeValue, MappingError> {
        match self.enum_descriptor() {
            Some(descriptor) => registry.read_enum(row, index, descriptor),
            None => registry.read(self.tag, row, index),
        }
    }

    pub fn parse(&self, registry: &Registry, text: &str) -> Result<NativeValue, MappingError> {
        match self.enum_descriptor() {
            Some(descriptor) => registry.parse_enum(descriptor, text),
            None => registry.parse(self.tag, text),
        }
    }

    pub fn to_json(&self, registry: &Registry, value: &NativeValue) -> String {
        registry.to_json(self.tag, value)
    }
}
