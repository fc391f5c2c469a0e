//! JSON scalar rendering
//!
//! Renderers produce a JSON fragment for one value. Text-like codes are
//! quoted and escaped, numeric and boolean codes are emitted bare.

use crate::types::NativeValue;
use chrono::SecondsFormat;

/// Canonical text of a value, the same form the parsers accept
pub fn to_text(value: &NativeValue) -> String {
    match value {
        NativeValue::Null => String::new(),
        NativeValue::Text(s) => s.clone(),
        NativeValue::Timestamp(ts) => ts.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        NativeValue::Integer(n) => n.to_string(),
        NativeValue::Long(n) => n.to_string(),
        NativeValue::Uuid(uuid) => uuid.hyphenated().to_string(),
        NativeValue::Enum(e) => e.name().to_string(),
        NativeValue::Decimal(d) => d.to_string(),
        NativeValue::Boolean(b) => b.to_string(),
        NativeValue::Byte(n) => n.to_string(),
        NativeValue::Bytes(bytes) => hex::encode(bytes),
        NativeValue::Date(date) => date.format("%Y-%m-%d").to_string(),
        NativeValue::Double(n) => n.to_string(),
        NativeValue::Float(n) => n.to_string(),
        NativeValue::Short(n) => n.to_string(),
        NativeValue::Time(time) => time.format("%H:%M:%S%.f").to_string(),
        NativeValue::Array(array) => array.0.join(","),
        NativeValue::Blob(blob) => hex::encode(&blob.0),
        NativeValue::Clob(clob) => clob.0.clone(),
        NativeValue::NClob(nclob) => nclob.0.clone(),
        NativeValue::Ref(r) => r.0.clone(),
        NativeValue::RowId(rowid) => rowid.to_string(),
        NativeValue::Xml(xml) => xml.0.clone(),
        NativeValue::Reader(stream) => stream.0.clone(),
        NativeValue::Url(url) => url.as_str().to_string(),
        NativeValue::Json(json) => json.to_string(),
    }
}

/// Default: the value's text as a JSON string
pub fn quoted(value: &NativeValue) -> String {
    serde_json::Value::String(to_text(value)).to_string()
}

/// Numbers and booleans, unquoted.
///
/// JSON has no NaN or infinity, so non-finite floats fall back to a string.
pub fn bare(value: &NativeValue) -> String {
    match value {
        NativeValue::Double(n) if !n.is_finite() => quoted(value),
        NativeValue::Float(n) if !n.is_finite() => quoted(value),
        _ => to_text(value),
    }
}

pub fn null(_value: &NativeValue) -> String {
    "null".to_string()
}

/// Text that already holds JSON, embedded without quoting or escaping
pub fn embedded(value: &NativeValue) -> String {
    to_text(value)
}

/// Array elements as a JSON array of strings
pub fn string_array(value: &NativeValue) -> String {
    match value {
        NativeValue::Array(array) => serde_json::Value::Array(
            array
                .0
                .iter()
                .cloned()
                .map(serde_json::Value::String)
                .collect(),
        )
        .to_string(),
        other => quoted(other),
    }
}

/// JSON documents render as themselves
pub fn document(value: &NativeValue) -> String {
    match value {
        NativeValue::Json(json) => json.to_string(),
        other => quoted(other),
    }
}
