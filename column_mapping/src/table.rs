//! Table definitions
//!
//! A [`TableDef`] groups the column definitions of one entity and keeps the
//! column subsets statements are built from.

use crate::column::ColumnDef;
use crate::errors::ColumnMappingError;
use crate::validation::SqlIdentifier;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub struct TableDef {
    table_name: SqlIdentifier,
    columns: Vec<ColumnDef>,
}

impl TableDef {
    pub fn new(table_name: &str, columns: Vec<ColumnDef>) -> Result<Self, ColumnMappingError> {
        let table_name = SqlIdentifier::new(table_name)?;
        let table = table_name.as_str();

        if columns.is_empty() {
            return Err(ColumnMappingError::table(table, "no mapped columns"));
        }

        let mut fields = HashSet::new();
        let mut column_names = HashSet::new();
        let mut rest_names = HashSet::new();
        for column in &columns {
            if !fields.insert(column.field_name()) {
                return Err(ColumnMappingError::table(
                    table,
                    format!("field {} is mapped twice", column.field_name()),
                ));
            }
            if !column_names.insert(column.column_name()) {
                return Err(ColumnMappingError::table(
                    table,
                    format!("column {} is mapped twice", column.column_name()),
                ));
            }
            if !rest_names.insert(column.rest_param_name()) {
                return Err(ColumnMappingError::table(
                    table,
                    format!("parameter name {} is used twice", column.rest_param_name()),
                ));
            }
        }

        let locks: Vec<&str> = columns
            .iter()
            .filter(|c| c.is_optimistic_lock())
            .map(ColumnDef::field_name)
            .collect();
        if locks.len() > 1 {
            return Err(ColumnMappingError::table(
                table,
                format!("more than one optimistic lock field: {}", locks.join(", ")),
            ));
        }

        validate_pk_positions(table, &columns)?;

        debug_log!(
            "Table definition {} with {} columns",
            table,
            columns.len()
        );

        Ok(Self {
            table_name,
            columns,
        })
    }

    pub fn table_name(&self) -> &str {
        self.table_name.as_str()
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Primary key columns ordered by position
    pub fn pk_columns(&self) -> Vec<&ColumnDef> {
        let mut pk: Vec<&ColumnDef> = self.columns.iter().filter(|c| c.is_pk()).collect();
        pk.sort_by_key(|c| c.pk_pos());
        pk
    }

    pub fn optimistic_lock_column(&self) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.is_optimistic_lock())
    }

    pub fn pk_and_lock_columns(&self) -> Vec<&ColumnDef> {
        self.columns
            .iter()
            .filter(|c| c.is_pk() || c.is_optimistic_lock())
            .collect()
    }

    pub fn columns_but_pk(&self) -> Vec<&ColumnDef> {
        self.columns.iter().filter(|c| !c.is_pk()).collect()
    }

    pub fn columns_but_pk_and_lock(&self) -> Vec<&ColumnDef> {
        self.columns
            .iter()
            .filter(|c| !c.is_pk() && !c.is_optimistic_lock())
            .collect()
    }

    pub fn column(&self, field_name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.field_name() == field_name)
    }

    pub fn column_by_rest_param(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.rest_param_name() == name)
    }

    pub fn column_by_name(&self, column_name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.column_name() == column_name)
    }
}

/// PK positions must be exactly 1..=n, each used once
fn validate_pk_positions(table: &str, columns: &[ColumnDef]) -> Result<(), ColumnMappingError> {
    let mut by_position: BTreeMap<u32, Vec<&str>> = BTreeMap::new();
    for column in columns.iter().filter(|c| c.is_pk()) {
        by_position
            .entry(column.pk_pos())
            .or_default()
            .push(column.field_name());
    }

    let Some((&max_position, fields)) = by_position.iter().next_back() else {
        return Err(ColumnMappingError::table(
            table,
            "no primary key fields; at least one column needs pk position 1",
        ));
    };

    if max_position as usize > by_position.len() {
        return Err(ColumnMappingError::table(
            table,
            format!(
                "field {}: pk position {} is greater than the number of pk fields {}",
                fields[0],
                max_position,
                by_position.len()
            ),
        ));
    }

    let missing: Vec<String> = (1..=max_position)
        .filter(|position| !by_position.contains_key(position))
        .map(|position| position.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ColumnMappingError::table(
            table,
            format!("missing pk positions {}", missing.join(", ")),
        ));
    }

    if let Some((position, fields)) = by_position.iter().find(|(_, fields)| fields.len() > 1) {
        return Err(ColumnMappingError::table(
            table,
            format!(
                "duplicate fields with pk position {}: {}",
                position,
                fields.join(", ")
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use chrono::{DateTime, Utc};
    use type_mapping::Registry;

    fn def<T: 'static>(field: &str, column: Column) -> ColumnDef {
        ColumnDef::of::<T>(&Registry::standard(), field, column).unwrap()
    }

    fn sample_columns() -> Vec<ColumnDef> {
        vec![
            def::<String>("name", Column::new("name")),
            def::<i32>("pk2", Column::new("pk2").pk(2)),
            def::<DateTime<Utc>>("updated", Column::new("updated").optimistic_lock()),
            def::<i64>("pk1", Column::new("pk1").pk(1)),
        ]
    }

    #[test]
    fn test_column_subsets() {
        let table = TableDef::new("test_tbl", sample_columns()).unwrap();

        let pk: Vec<&str> = table.pk_columns().iter().map(|c| c.field_name()).collect();
        assert_eq!(pk, vec!["pk1", "pk2"]);
        assert_eq!(
            table.optimistic_lock_column().map(ColumnDef::field_name),
            Some("updated")
        );
        assert_eq!(table.pk_and_lock_columns().len(), 3);
        assert_eq!(table.columns_but_pk().len(), 2);

        let rest: Vec<&str> = table
            .columns_but_pk_and_lock()
            .iter()
            .map(|c| c.field_name())
            .collect();
        assert_eq!(rest, vec!["name"]);
    }

    #[test]
    fn test_lookups() {
        let table = TableDef::new("test_tbl", sample_columns()).unwrap();
        assert!(table.column("pk1").is_some());
        assert!(table.column_by_rest_param("name").is_some());
        assert!(table.column_by_name("updated").is_some());
        assert!(table.column("nope").is_none());
    }

    #[test]
    fn test_requires_columns_and_pk() {
        assert!(TableDef::new("t", Vec::new()).is_err());

        let err = TableDef::new("t", vec![def::<String>("name", Column::new("name"))]).unwrap_err();
        assert!(err.to_string().contains("no primary key fields"));
    }

    #[test]
    fn test_pk_position_out_of_range() {
        let err = TableDef::new(
            "t",
            vec![
                def::<i32>("a", Column::new("a").pk(1)),
                def::<i32>("b", Column::new("b").pk(3)),
            ],
        )
        .unwrap_err();
        assert!(err.to_string().contains("pk position 3 is greater"));
    }

    #[test]
    fn test_duplicate_pk_position() {
        let err = TableDef::new(
            "t",
            vec![
                def::<i32>("a", Column::new("a").pk(1)),
                def::<i32>("b", Column::new("b").pk(1)),
            ],
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate fields with pk position 1: a, b"));
    }

    #[test]
    fn test_pk_position_must_start_at_one() {
        let err = TableDef::new("t", vec![def::<i32>("a", Column::new("a").pk(2))]).unwrap_err();
        assert!(err.to_string().contains("greater than the number of pk fields 1"));
    }

    #[test]
    fn test_single_optimistic_lock() {
        let err = TableDef::new(
            "t",
            vec![
                def::<i32>("id", Column::new("id").pk(1)),
                def::<i32>("v1", Column::new("v1").optimistic_lock()),
                def::<i64>("v2", Column::new("v2").optimistic_lock()),
            ],
        )
        .unwrap_err();
        assert!(err.to_string().contains("more than one optimistic lock field: v1, v2"));
    }

    #[test]
    fn test_duplicate_column_names() {
        let err = TableDef::new(
            "t",
            vec![
                def::<i32>("id", Column::new("id").pk(1)),
                def::<i32>("other", Column::new("id")),
            ],
        )
        .unwrap_err();
        assert!(err.to_string().contains("column id is mapped twice"));
    }

    #[test]
    fn test_invalid_table_name() {
        let err = TableDef::new("select", vec![def::<i32>("id", Column::new("id").pk(1))])
            .unwrap_err();
        assert!(matches!(err, ColumnMappingError::InvalidIdentifier(_)));
    }
}
