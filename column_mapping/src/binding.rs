//! Entity operations built on the registry
//!
//! Provided for every [`Entity`] through the blanket [`EntityBinding`] impl.
//! Parameter and column indices are zero-based; each batch operation returns
//! the index following the last one it used.

use crate::column::{ColumnDef, Generated};
use crate::entity::Entity;
use crate::errors::ColumnMappingError;
use chrono::Utc;
use type_mapping::{render_json_object, NativeValue, ParameterSlots, Registry, ResultRow, TypeTag};
use uuid::Uuid;

pub trait EntityBinding: Entity {
    /// Bind the values of `columns` into consecutive slots starting at `first_index`
    fn bind_columns(
        &self,
        registry: &Registry,
        columns: &[&ColumnDef],
        slots: &mut dyn ParameterSlots,
        first_index: usize,
    ) -> Result<usize, ColumnMappingError> {
        let mut index = first_index;
        for column in columns {
            let value = self
                .field_value(column.field_name())
                .ok_or_else(|| ColumnMappingError::UnknownField(column.field_name().to_string()))?;
            trace_log!("Binding {} at {}", column.field_name(), index);
            column.bind(registry, slots, index, &value)?;
            index += 1;
        }
        Ok(index)
    }

    /// Bind every mapped column in table order
    fn bind_all(
        &self,
        registry: &Registry,
        slots: &mut dyn ParameterSlots,
        first_index: usize,
    ) -> Result<usize, ColumnMappingError> {
        let table = self.table_def();
        let columns: Vec<&ColumnDef> = table.columns().iter().collect();
        self.bind_columns(registry, &columns, slots, first_index)
    }

    /// Read consecutive result columns starting at `first_index` into the fields of `columns`
    fn read_columns(
        &mut self,
        registry: &Registry,
        columns: &[&ColumnDef],
        row: &dyn ResultRow,
        first_index: usize,
    ) -> Result<usize, ColumnMappingError> {
        let mut index = first_index;
        for column in columns {
            let value = column.read(registry, row, index)?;
            trace_log!("Read {} from {}", column.field_name(), index);
            self.set_field_value(column.field_name(), value)?;
            index += 1;
        }
        Ok(index)
    }

    /// Read every mapped column in table order
    fn read_all(
        &mut self,
        registry: &Registry,
        row: &dyn ResultRow,
        first_index: usize,
    ) -> Result<usize, ColumnMappingError> {
        let table = self.table_def();
        let columns: Vec<&ColumnDef> = table.columns().iter().collect();
        self.read_columns(registry, &columns, row, first_index)
    }

    /// Parse text parameters keyed by REST parameter name into their fields
    fn apply_rest_params<I, K, V>(
        &mut self,
        registry: &Registry,
        params: I,
    ) -> Result<(), ColumnMappingError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let table = self.table_def();
        for (name, text) in params {
            let name = name.as_ref();
            let column = table
                .column_by_rest_param(name)
                .ok_or_else(|| ColumnMappingError::UnknownParameter(name.to_string()))?;
            let value = column.parse(registry, text.as_ref())?;
            self.set_field_value(column.field_name(), value)?;
        }
        Ok(())
    }

    /// JSON object of all mapped fields keyed by REST parameter name
    fn to_json(&self, registry: &Registry) -> Result<String, ColumnMappingError> {
        let table = self.table_def();
        let mut values = Vec::with_capacity(table.columns().len());
        for column in table.columns() {
            let value = self
                .field_value(column.field_name())
                .ok_or_else(|| ColumnMappingError::UnknownField(column.field_name().to_string()))?;
            values.push(value);
        }

        Ok(render_json_object(
            registry,
            table
                .columns()
                .iter()
                .zip(values.iter())
                .map(|(column, value)| (column.rest_param_name(), column.tag(), value)),
        ))
    }

    /// Apply insert generation policies and return the columns to insert.
    ///
    /// Client-generated values are stored into the entity first; columns the
    /// database fills in are left out.
    fn prepare_insert(&mut self) -> Result<Vec<ColumnDef>, ColumnMappingError> {
        let table = self.table_def();
        let mut insert = Vec::with_capacity(table.columns().len());

        for column in table.columns() {
            let field = column.field_name();
            let is_null = self
                .field_value(field)
                .ok_or_else(|| ColumnMappingError::UnknownField(field.to_string()))?
                .is_null();

            match column.on_insert() {
                Generated::Never => {}
                Generated::OnTheDbAlways => continue,
                Generated::OnTheDbWhenNull if is_null => continue,
                Generated::OnTheDbWhenNull => {}
                Generated::OnTheClientAlways => {
                    self.set_field_value(field, generate_value(column)?)?;
                }
                Generated::OnTheClientWhenNull => {
                    if is_null {
                        self.set_field_value(field, generate_value(column)?)?;
                    }
                }
            }
            insert.push(column.clone());
        }

        debug_log!(
            "Insert into {} uses {} of {} columns",
            table.table_name(),
            insert.len(),
            table.columns().len()
        );
        Ok(insert)
    }
}

impl<T: Entity + ?Sized> EntityBinding for T {}

/// Client-side value for a generated column
fn generate_value(column: &ColumnDef) -> Result<NativeValue, ColumnMappingError> {
    match column.tag() {
        TypeTag::Uuid => Ok(NativeValue::Uuid(Uuid::new_v4())),
        TypeTag::Timestamp => Ok(NativeValue::Timestamp(Utc::now())),
        tag => Err(ColumnMappingError::GenerationUnsupported {
            field: column.field_name().to_string(),
            tag,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::entity::field_type_error;
    use crate::table::TableDef;
    use chrono::{DateTime, TimeZone};
    use std::sync::Arc;
    use type_mapping::{named_enum, MappingError, MemoryStatement, NamedEnum};

    named_enum! {
        pub enum Color { Red, Green, Blue }
    }

    #[derive(Debug, Default)]
    struct Widget {
        id: Option<Uuid>,
        name: Option<String>,
        color: Option<Color>,
        created: Option<DateTime<Utc>>,
        version: Option<i32>,
        extra: Option<String>,
    }

    fn widget_table() -> Arc<TableDef> {
        let registry = Registry::standard();
        let columns = vec![
            ColumnDef::of::<Uuid>(
                &registry,
                "id",
                Column::new("widget_id")
                    .pk(1)
                    .on_insert(Generated::OnTheClientWhenNull),
            )
            .unwrap(),
            ColumnDef::of::<String>(&registry, "name", Column::new("name")).unwrap(),
            ColumnDef::of_enum::<Color>(&registry, "color", Column::new("color")).unwrap(),
            ColumnDef::of::<DateTime<Utc>>(
                &registry,
                "created",
                Column::new("created_ts")
                    .rest_param("createdAt")
                    .on_insert(Generated::OnTheDbWhenNull),
            )
            .unwrap(),
            ColumnDef::of::<i32>(
                &registry,
                "version",
                Column::new("version")
                    .optimistic_lock()
                    .on_insert(Generated::OnTheDbAlways),
            )
            .unwrap(),
            ColumnDef::of::<String>(&registry, "extra", Column::new("extra").json()).unwrap(),
        ];
        Arc::new(TableDef::new("widget", columns).unwrap())
    }

    impl Entity for Widget {
        fn table_def(&self) -> Arc<TableDef> {
            widget_table()
        }

        fn field_value(&self, field: &str) -> Option<NativeValue> {
            match field {
                "id" => Some(self.id.into()),
                "name" => Some(self.name.clone().into()),
                "color" => Some(self.color.map(|c| c.to_enum_value()).into()),
                "created" => Some(self.created.into()),
                "version" => Some(self.version.into()),
                "extra" => Some(self.extra.clone().into()),
                _ => None,
            }
        }

        fn set_field_value(
            &mut self,
            field: &str,
            value: NativeValue,
        ) -> Result<(), ColumnMappingError> {
            match (field, value) {
                ("id", NativeValue::Uuid(v)) => self.id = Some(v),
                ("id", NativeValue::Null) => self.id = None,
                ("name", NativeValue::Text(v)) => self.name = Some(v),
                ("name", NativeValue::Null) => self.name = None,
                ("color", NativeValue::Enum(v)) => self.color = v.to_enum::<Color>(),
                ("color", NativeValue::Null) => self.color = None,
                ("created", NativeValue::Timestamp(v)) => self.created = Some(v),
                ("created", NativeValue::Null) => self.created = None,
                ("version", NativeValue::Integer(v)) => self.version = Some(v),
                ("version", NativeValue::Null) => self.version = None,
                ("extra", NativeValue::Text(v)) => self.extra = Some(v),
                ("extra", NativeValue::Null) => self.extra = None,
                ("id" | "name" | "color" | "created" | "version" | "extra", value) => {
                    return Err(field_type_error(field, &value))
                }
                _ => return Err(ColumnMappingError::UnknownField(field.to_string())),
            }
            Ok(())
        }
    }

    fn sample() -> Widget {
        Widget {
            id: Some(Uuid::from_u128(0x0011_2233_4455_6677_8899_aabb_ccdd_eeff)),
            name: Some("sprocket".to_string()),
            color: Some(Color::Green),
            created: Some(Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap()),
            version: Some(3),
            extra: Some(r#"{"size":[1,2]}"#.to_string()),
        }
    }

    // ========================================
    // Bind / read
    // ========================================

    #[test]
    fn test_bind_all_then_read_all() {
        let registry = Registry::standard();
        let original = sample();

        let mut statement = MemoryStatement::new();
        let next = original.bind_all(&registry, &mut statement, 0).unwrap();
        assert_eq!(next, 6);

        let row = statement.into_row().unwrap();
        let mut copy = Widget::default();
        copy.read_all(&registry, &row, 0).unwrap();

        assert_eq!(copy.id, original.id);
        assert_eq!(copy.name, original.name);
        assert_eq!(copy.color, original.color);
        assert_eq!(copy.created, original.created);
        assert_eq!(copy.version, original.version);
        assert_eq!(copy.extra, original.extra);
    }

    #[test]
    fn test_bind_subset_with_offset() {
        let registry = Registry::standard();
        let widget = sample();
        let table = widget.table_def();

        let mut statement = MemoryStatement::new();
        statement.set_text(0, "leading").unwrap();
        let next = widget
            .bind_columns(&registry, &table.pk_columns(), &mut statement, 1)
            .unwrap();
        assert_eq!(next, 2);
        assert_eq!(statement.len(), 2);
    }

    #[test]
    fn test_null_fields_bind_typed_nulls() {
        let registry = Registry::standard();
        let widget = Widget::default();

        let mut statement = MemoryStatement::new();
        widget.bind_all(&registry, &mut statement, 0).unwrap();
        assert_eq!(
            statement.cell(3),
            Some(&type_mapping::Cell::Null(TypeTag::Timestamp))
        );

        let row = statement.into_row().unwrap();
        let mut copy = sample();
        copy.read_all(&registry, &row, 0).unwrap();
        assert!(copy.id.is_none());
        assert!(copy.color.is_none());
        assert!(copy.extra.is_none());
    }

    #[test]
    fn test_unknown_enum_member_in_row() {
        let registry = Registry::standard();
        let widget = sample();
        let table = widget.table_def();
        let color = table.column("color").unwrap();

        let mut statement = MemoryStatement::new();
        statement.set_text(0, "Purple").unwrap();
        let row = statement.into_row().unwrap();

        let mut target = Widget::default();
        let err = target
            .read_columns(&registry, &[color], &row, 0)
            .unwrap_err();
        assert!(matches!(
            err,
            ColumnMappingError::Mapping(MappingError::UnknownEnumMember { .. })
        ));
    }

    // ========================================
    // REST parameters and JSON
    // ========================================

    #[test]
    fn test_apply_rest_params() {
        let registry = Registry::standard();
        let mut widget = Widget::default();

        widget
            .apply_rest_params(
                &registry,
                [
                    ("id", "00112233-4455-6677-8899-aabbccddeeff"),
                    ("name", "gear"),
                    ("color", "Blue"),
                    ("createdAt", "2024-05-06T07:08:09Z"),
                    ("version", "1024"),
                ],
            )
            .unwrap();

        assert_eq!(widget.id, sample().id);
        assert_eq!(widget.name.as_deref(), Some("gear"));
        assert_eq!(widget.color, Some(Color::Blue));
        assert_eq!(widget.created, sample().created);
        assert_eq!(widget.version, Some(1024));
    }

    #[test]
    fn test_apply_rest_params_rejects_unknown_names() {
        let registry = Registry::standard();
        let mut widget = Widget::default();

        let err = widget
            .apply_rest_params(&registry, [("created", "2024-05-06T07:08:09Z")])
            .unwrap_err();
        assert!(matches!(err, ColumnMappingError::UnknownParameter(name) if name == "created"));

        let err = widget
            .apply_rest_params(&registry, [("version", "seven")])
            .unwrap_err();
        assert!(matches!(
            err,
            ColumnMappingError::Mapping(MappingError::MalformedText { .. })
        ));
    }

    #[test]
    fn test_to_json_uses_rest_names() {
        let registry = Registry::standard();
        let rendered = sample().to_json(&registry).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!({
                "id": "00112233-4455-6677-8899-aabbccddeeff",
                "name": "sprocket",
                "color": "Green",
                "createdAt": "2024-05-06T07:08:09Z",
                "version": 3,
                "extra": {"size": [1, 2]}
            })
        );
    }

    // ========================================
    // Insert generation
    // ========================================

    #[test]
    fn test_prepare_insert_generates_and_omits() {
        let mut widget = Widget {
            name: Some("bolt".to_string()),
            ..Widget::default()
        };

        let columns = widget.prepare_insert().unwrap();
        let names: Vec<&str> = columns.iter().map(ColumnDef::column_name).collect();

        assert_eq!(names, vec!["widget_id", "name", "color", "extra"]);
        assert!(widget.id.is_some());
        assert!(widget.created.is_none());
    }

    #[test]
    fn test_prepare_insert_keeps_present_values() {
        let mut widget = sample();
        let id = widget.id;

        let columns = widget.prepare_insert().unwrap();
        let names: Vec<&str> = columns.iter().map(ColumnDef::column_name).collect();

        assert_eq!(names, vec!["widget_id", "name", "color", "created_ts", "extra"]);
        assert_eq!(widget.id, id);
    }

    #[test]
    fn test_generation_requires_uuid_or_timestamp() {
        let registry = Registry::standard();
        let column = ColumnDef::of::<i32>(
            &registry,
            "n",
            Column::new("n").on_insert(Generated::OnTheClientAlways),
        )
        .unwrap();
        let err = generate_value(&column).unwrap_err();
        assert!(matches!(
            err,
            ColumnMappingError::GenerationUnsupported { tag: TypeTag::Integer, .. }
        ));
    }
}
