//! Row and slot collaborators
//!
//! The registry never talks to a driver directly. Outbound values go through
//! [`ParameterSlots`], inbound values come from [`ResultRow`]. Both are
//! implemented by whatever owns the statement or cursor; the registry only
//! borrows them for a single call. Indices are zero-based.
//!
//! Readers return `Ok(None)` for SQL NULL. Any failure of the data source is
//! returned as a [`DataSourceError`] and passed to the caller untouched.

use crate::errors::DataSourceError;
use crate::tag::TypeTag;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Outbound "bind parameter at index" capability
pub trait ParameterSlots {
    /// Bind SQL NULL; `kind` says which type code the NULL stands for
    fn set_null(&mut self, index: usize, kind: TypeTag) -> Result<(), DataSourceError>;
    fn set_text(&mut self, index: usize, value: &str) -> Result<(), DataSourceError>;
    fn set_bool(&mut self, index: usize, value: bool) -> Result<(), DataSourceError>;
    fn set_i8(&mut self, index: usize, value: i8) -> Result<(), DataSourceError>;
    fn set_i16(&mut self, index: usize, value: i16) -> Result<(), DataSourceError>;
    fn set_i32(&mut self, index: usize, value: i32) -> Result<(), DataSourceError>;
    fn set_i64(&mut self, index: usize, value: i64) -> Result<(), DataSourceError>;
    fn set_f32(&mut self, index: usize, value: f32) -> Result<(), DataSourceError>;
    fn set_f64(&mut self, index: usize, value: f64) -> Result<(), DataSourceError>;
    fn set_decimal(&mut self, index: usize, value: &BigDecimal) -> Result<(), DataSourceError>;
    fn set_bytes(&mut self, index: usize, value: &[u8]) -> Result<(), DataSourceError>;
    fn set_timestamp(&mut self, index: usize, value: DateTime<Utc>)
        -> Result<(), DataSourceError>;
    fn set_date(&mut self, index: usize, value: NaiveDate) -> Result<(), DataSourceError>;
    fn set_time(&mut self, index: usize, value: NaiveTime) -> Result<(), DataSourceError>;
    fn set_text_array(&mut self, index: usize, value: &[String]) -> Result<(), DataSourceError>;
    fn set_json(&mut self, index: usize, value: &serde_json::Value)
        -> Result<(), DataSourceError>;
}

/// Inbound "read column at index" capability
pub trait ResultRow {
    fn get_text(&self, index: usize) -> Result<Option<String>, DataSourceError>;
    fn get_bool(&self, index: usize) -> Result<Option<bool>, DataSourceError>;
    fn get_i8(&self, index: usize) -> Result<Option<i8>, DataSourceError>;
    fn get_i16(&self, index: usize) -> Result<Option<i16>, DataSourceError>;
    fn get_i32(&self, index: usize) -> Result<Option<i32>, DataSourceError>;
    fn get_i64(&self, index: usize) -> Result<Option<i64>, DataSourceError>;
    fn get_f32(&self, index: usize) -> Result<Option<f32>, DataSourceError>;
    fn get_f64(&self, index: usize) -> Result<Option<f64>, DataSourceError>;
    fn get_decimal(&self, index: usize) -> Result<Option<BigDecimal>, DataSourceError>;
    fn get_bytes(&self, index: usize) -> Result<Option<Vec<u8>>, DataSourceError>;
    fn get_timestamp(&self, index: usize) -> Result<Option<DateTime<Utc>>, DataSourceError>;
    fn get_date(&self, index: usize) -> Result<Option<NaiveDate>, DataSourceError>;
    fn get_time(&self, index: usize) -> Result<Option<NaiveTime>, DataSourceError>;
    fn get_text_array(&self, index: usize) -> Result<Option<Vec<String>>, DataSourceError>;
    fn get_json(&self, index: usize) -> Result<Option<serde_json::Value>, DataSourceError>;
}
