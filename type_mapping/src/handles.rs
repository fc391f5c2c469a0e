//! Driver-object representations
//!
//! Large objects and driver handles have no dedicated Rust type, so each gets
//! a thin wrapper. The wrappers give every tag its own native identity even
//! when two of them hold the same bytes or text.

use std::fmt;

/// SQL array of text elements
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SqlArray(pub Vec<String>);

/// Binary large object
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Blob(pub Vec<u8>);

/// Character large object
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Clob(pub String);

/// National character large object
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NClob(pub String);

/// Reference to a structured value held by the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlRef(pub String);

/// Physical row address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowId(pub Vec<u8>);

/// XML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlXml(pub String);

/// Character stream, passed through whole
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharacterStream(pub String);

impl From<Vec<String>> for SqlArray {
    fn from(elements: Vec<String>) -> Self {
        SqlArray(elements)
    }
}

impl From<Vec<u8>> for Blob {
    fn from(bytes: Vec<u8>) -> Self {
        Blob(bytes)
    }
}

impl From<String> for Clob {
    fn from(text: String) -> Self {
        Clob(text)
    }
}

impl From<String> for NClob {
    fn from(text: String) -> Self {
        NClob(text)
    }
}

impl From<String> for SqlXml {
    fn from(text: String) -> Self {
        SqlXml(text)
    }
}

impl From<String> for CharacterStream {
    fn from(text: String) -> Self {
        CharacterStream(text)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}
