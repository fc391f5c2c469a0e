//! PostgreSQL adapter
//!
//! [`PgBindings`] collects statement arguments for `sqlx::query_with`, and
//! [`PgResultRow`] reads a `PgRow`'s columns through the registry's row
//! capability. Driver errors are passed through unchanged inside
//! [`DataSourceError`].

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{Arguments, Encode, Postgres, Row, Type};
use thiserror::Error;
use type_mapping::bigdecimal::BigDecimal;
use type_mapping::{DataSourceError, ParameterSlots, ResultRow, TypeTag};

#[derive(Debug, Error, PartialEq)]
pub enum PgBindingError {
    #[error("parameter {index} bound out of order; next parameter is {expected}")]
    OutOfOrder { index: usize, expected: usize },
}

/// Outbound slots over `PgArguments`.
///
/// Postgres placeholders are positional, so parameters must be bound in
/// order: index 0 is `$1`.
#[derive(Default)]
pub struct PgBindings {
    arguments: PgArguments,
}

impl PgBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.len() == 0
    }

    pub fn into_arguments(self) -> PgArguments {
        self.arguments
    }

    fn push<T>(&mut self, index: usize, value: T) -> Result<(), DataSourceError>
    where
        T: Encode<'static, Postgres> + Type<Postgres> + 'static,
    {
        let expected = self.arguments.len();
        if index != expected {
            return Err(DataSourceError::new(PgBindingError::OutOfOrder {
                index,
                expected,
            }));
        }
        self.arguments.add(value).map_err(DataSourceError::new)
    }
}

impl ParameterSlots for PgBindings {
    fn set_null(&mut self, index: usize, kind: TypeTag) -> Result<(), DataSourceError> {
        match kind {
            TypeTag::Timestamp => self.push(index, None::<DateTime<Utc>>),
            TypeTag::Integer => self.push(index, None::<i32>),
            TypeTag::Long => self.push(index, None::<i64>),
            TypeTag::Uuid | TypeTag::ByteArray | TypeTag::Blob | TypeTag::Rowid => {
                self.push(index, None::<Vec<u8>>)
            }
            TypeTag::BigDecimal => self.push(index, None::<BigDecimal>),
            TypeTag::Boolean => self.push(index, None::<bool>),
            TypeTag::Byte => self.push(index, None::<i8>),
            TypeTag::Date => self.push(index, None::<NaiveDate>),
            TypeTag::Double => self.push(index, None::<f64>),
            TypeTag::Float => self.push(index, None::<f32>),
            TypeTag::Short => self.push(index, None::<i16>),
            TypeTag::Time => self.push(index, None::<NaiveTime>),
            TypeTag::Array => self.push(index, None::<Vec<String>>),
            TypeTag::Object => self.push(index, None::<serde_json::Value>),
            TypeTag::Null
            | TypeTag::String
            | TypeTag::Enum
            | TypeTag::Clob
            | TypeTag::NClob
            | TypeTag::Ref
            | TypeTag::Xml
            | TypeTag::Reader
            | TypeTag::Url
            | TypeTag::JsonString => self.push(index, None::<String>),
        }
    }

    fn set_text(&mut self, index: usize, value: &str) -> Result<(), DataSourceError> {
        self.push(index, value.to_string())
    }

    fn set_bool(&mut self, index: usize, value: bool) -> Result<(), DataSourceError> {
        self.push(index, value)
    }

    fn set_i8(&mut self, index: usize, value: i8) -> Result<(), DataSourceError> {
        self.push(index, value)
    }

    fn set_i16(&mut self, index: usize, value: i16) -> Result<(), DataSourceError> {
        self.push(index, value)
    }

    fn set_i32(&mut self, index: usize, value: i32) -> Result<(), DataSourceError> {
        self.push(index, value)
    }

    fn set_i64(&mut self, index: usize, value: i64) -> Result<(), DataSourceError> {
        self.push(index, value)
    }

    fn set_f32(&mut self, index: usize, value: f32) -> Result<(), DataSourceError> {
        self.push(index, value)
    }

    fn set_f64(&mut self, index: usize, value: f64) -> Result<(), DataSourceError> {
        self.push(index, value)
    }

    fn set_decimal(&mut self, index: usize, value: &BigDecimal) -> Result<(), DataSourceError> {
        self.push(index, value.clone())
    }

    fn set_bytes(&mut self, index: usize, value: &[u8]) -> Result<(), DataSourceError> {
        self.push(index, value.to_vec())
    }

    fn set_timestamp(
        &mut self,
        index: usize,
        value: DateTime<Utc>,
    ) -> Result<(), DataSourceError> {
        self.push(index, value)
    }

    fn set_date(&mut self, index: usize, value: NaiveDate) -> Result<(), DataSourceError> {
        self.push(index, value)
    }

    fn set_time(&mut self, index: usize, value: NaiveTime) -> Result<(), DataSourceError> {
        self.push(index, value)
    }

    fn set_text_array(&mut self, index: usize, value: &[String]) -> Result<(), DataSourceError> {
        self.push(index, value.to_vec())
    }

    fn set_json(
        &mut self,
        index: usize,
        value: &serde_json::Value,
    ) -> Result<(), DataSourceError> {
        self.push(index, value.clone())
    }
}

macro_rules! pg_getter {
    ($name:ident, $ty:ty) => {
        fn $name(&self, index: usize) -> Result<Option<$ty>, DataSourceError> {
            self.0
                .try_get::<Option<$ty>, _>(index)
                .map_err(DataSourceError::new)
        }
    };
}

/// Inbound columns of a fetched `PgRow`, by zero-based position
#[derive(Clone, Copy)]
pub struct PgResultRow<'r>(pub &'r PgRow);

impl<'r> From<&'r PgRow> for PgResultRow<'r> {
    fn from(row: &'r PgRow) -> Self {
        Self(row)
    }
}

impl ResultRow for PgResultRow<'_> {
    pg_getter!(get_text, String);
    pg_getter!(get_bool, bool);
    pg_getter!(get_i8, i8);
    pg_getter!(get_i16, i16);
    pg_getter!(get_i32, i32);
    pg_getter!(get_i64, i64);
    pg_getter!(get_f32, f32);
    pg_getter!(get_f64, f64);
    pg_getter!(get_decimal, BigDecimal);
    pg_getter!(get_bytes, Vec<u8>);
    pg_getter!(get_timestamp, DateTime<Utc>);
    pg_getter!(get_date, NaiveDate);
    pg_getter!(get_time, NaiveTime);
    pg_getter!(get_text_array, Vec<String>);
    pg_getter!(get_json, serde_json::Value);
}
