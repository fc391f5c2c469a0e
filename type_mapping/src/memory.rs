//! In-memory statement and row
//!
//! A [`MemoryStatement`] records what was bound into each slot and can be
//! turned into a [`MemoryRow`] that reads the same cells back. Reading a cell
//! through an accessor of a different kind fails the way a driver reports a
//! type mismatch.

use crate::errors::DataSourceError;
use crate::slots::{ParameterSlots, ResultRow};
use crate::tag::TypeTag;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use thiserror::Error;

/// One stored parameter or column value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null(TypeTag),
    Text(String),
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Decimal(BigDecimal),
    Bytes(Vec<u8>),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
    Time(NaiveTime),
    TextArray(Vec<String>),
    Json(serde_json::Value),
}

impl Cell {
    fn kind(&self) -> &'static str {
        match self {
            Cell::Null(_) => "null",
            Cell::Text(_) => "text",
            Cell::Bool(_) => "bool",
            Cell::I8(_) => "i8",
            Cell::I16(_) => "i16",
            Cell::I32(_) => "i32",
            Cell::I64(_) => "i64",
            Cell::F32(_) => "f32",
            Cell::F64(_) => "f64",
            Cell::Decimal(_) => "decimal",
            Cell::Bytes(_) => "bytes",
            Cell::Timestamp(_) => "timestamp",
            Cell::Date(_) => "date",
            Cell::Time(_) => "time",
            Cell::TextArray(_) => "text[]",
            Cell::Json(_) => "json",
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum MemoryError {
    #[error("column index {0} is out of range")]
    OutOfRange(usize),

    #[error("column {index} holds {found}, not {expected}")]
    TypeMismatch {
        index: usize,
        found: &'static str,
        expected: &'static str,
    },

    #[error("parameter {0} was never bound")]
    Unbound(usize),
}

/// Outbound statement that keeps bound values in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryStatement {
    slots: Vec<Option<Cell>>,
}

impl MemoryStatement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value bound at `index`, if any
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Turn the bound parameters into a row with the same cells
    pub fn into_row(self) -> Result<MemoryRow, MemoryError> {
        let cells = self
            .slots
            .into_iter()
            .enumerate()
            .map(|(index, cell)| cell.ok_or(MemoryError::Unbound(index)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MemoryRow { cells })
    }

    fn put(&mut self, index: usize, cell: Cell) -> Result<(), DataSourceError> {
        if self.slots.len() <= index {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(cell);
        Ok(())
    }
}

impl ParameterSlots for MemoryStatement {
    fn set_null(&mut self, index: usize, kind: TypeTag) -> Result<(), DataSourceError> {
        self.put(index, Cell::Null(kind))
    }

    fn set_text(&mut self, index: usize, value: &str) -> Result<(), DataSourceError> {
        self.put(index, Cell::Text(value.to_string()))
    }

    fn set_bool(&mut self, index: usize, value: bool) -> Result<(), DataSourceError> {
        self.put(index, Cell::Bool(value))
    }

    fn set_i8(&mut self, index: usize, value: i8) -> Result<(), DataSourceError> {
        self.put(index, Cell::I8(value))
    }

    fn set_i16(&mut self, index: usize, value: i16) -> Result<(), DataSourceError> {
        self.put(index, Cell::I16(value))
    }

    fn set_i32(&mut self, index: usize, value: i32) -> Result<(), DataSourceError> {
        self.put(index, Cell::I32(value))
    }

    fn set_i64(&mut self, index: usize, value: i64) -> Result<(), DataSourceError> {
        self.put(index, Cell::I64(value))
    }

    fn set_f32(&mut self, index: usize, value: f32) -> Result<(), DataSourceError> {
        self.put(index, Cell::F32(value))
    }

    fn set_f64(&mut self, index: usize, value: f64) -> Result<(), DataSourceError> {
        self.put(index, Cell::F64(value))
    }

    fn set_decimal(&mut self, index: usize, value: &BigDecimal) -> Result<(), DataSourceError> {
        self.put(index, Cell::Decimal(value.clone()))
    }

    fn set_bytes(&mut self, index: usize, value: &[u8]) -> Result<(), DataSourceError> {
        self.put(index, Cell::Bytes(value.to_vec()))
    }

    fn set_timestamp(
        &mut self,
        index: usize,
        value: DateTime<Utc>,
    ) -> Result<(), DataSourceError> {
        self.put(index, Cell::Timestamp(value))
    }

    fn set_date(&mut self, index: usize, value: NaiveDate) -> Result<(), DataSourceError> {
        self.put(index, Cell::Date(value))
    }

    fn set_time(&mut self, index: usize, value: NaiveTime) -> Result<(), DataSourceError> {
        self.put(index, Cell::Time(value))
    }

    fn set_text_array(&mut self, index: usize, value: &[String]) -> Result<(), DataSourceError> {
        self.put(index, Cell::TextArray(value.to_vec()))
    }

    fn set_json(
        &mut self,
        index: usize,
        value: &serde_json::Value,
    ) -> Result<(), DataSourceError> {
        self.put(index, Cell::Json(value.clone()))
    }
}

/// Inbound row backed by a vector of cells
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MemoryRow {
    cells: Vec<Cell>,
}

impl MemoryRow {
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

macro_rules! memory_getter {
    ($method:ident, $variant:ident, $ty:ty, $expected:literal) => {
        fn $method(&self, index: usize) -> Result<Option<$ty>, DataSourceError> {
            match self.cells.get(index) {
                None => Err(DataSourceError::new(MemoryError::OutOfRange(index))),
                Some(Cell::Null(_)) => Ok(None),
                Some(Cell::$variant(value)) => Ok(Some(value.clone())),
                Some(other) => Err(DataSourceError::new(MemoryError::TypeMismatch {
                    index,
                    found: other.kind(),
                    expected: $expected,
                })),
            }
        }
    };
}

impl ResultRow for MemoryRow {
    memory_getter!(get_text, Text, String, "text");
    memory_getter!(get_bool, Bool, bool, "bool");
    memory_getter!(get_i8, I8, i8, "i8");
    memory_getter!(get_i16, I16, i16, "i16");
    memory_getter!(get_i32, I32, i32, "i32");
    memory_getter!(get_i64, I64, i64, "i64");
    memory_getter!(get_f32, F32, f32, "f32");
    memory_getter!(get_f64, F64, f64, "f64");
    memory_getter!(get_decimal, Decimal, BigDecimal, "decimal");
    memory_getter!(get_bytes, Bytes, Vec<u8>, "bytes");
    memory_getter!(get_timestamp, Timestamp, DateTime<Utc>, "timestamp");
    memory_getter!(get_date, Date, NaiveDate, "date");
    memory_getter!(get_time, Time, NaiveTime, "time");
    memory_getter!(get_text_array, TextArray, Vec<String>, "text[]");
    memory_getter!(get_json, Json, serde_json::Value, "json");
}
