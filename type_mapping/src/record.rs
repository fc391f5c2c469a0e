//! Conversion records
//!
//! One record per type code: the native representation plus the set of
//! conversions the code supports. `bind` is mandatory; `read` and `parse`
//! are optional; `to_json` defaults to a quoted string.

use crate::errors::MappingError;
use crate::json;
use crate::slots::{ParameterSlots, ResultRow};
use crate::tag::TypeTag;
use crate::types::{NativeType, NativeValue};
use std::fmt;

pub type BindFn = fn(&mut dyn ParameterSlots, usize, &NativeValue) -> Result<(), MappingError>;
pub type ReadFn = fn(&dyn ResultRow, usize) -> Result<NativeValue, MappingError>;
pub type ParseFn = fn(&str, &ParseOptions) -> Result<NativeValue, MappingError>;
pub type JsonFn = fn(&NativeValue) -> String;

/// Knobs for text parameter parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Thousands separator removed from decimal input
    pub grouping_separator: char,
    /// Trim surrounding whitespace before parsing
    pub trim: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            grouping_separator: ',',
            trim: false,
        }
    }
}

#[derive(Clone, Copy)]
pub struct ConversionRecord {
    tag: TypeTag,
    native_type: Option<NativeType>,
    owns_native_type: bool,
    bind: BindFn,
    read: Option<ReadFn>,
    parse: Option<ParseFn>,
    to_json: JsonFn,
}

impl fmt::Debug for ConversionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionRecord")
            .field("tag", &self.tag)
            .field("native_type", &self.native_type)
            .field("owns_native_type", &self.owns_native_type)
            .field("read", &self.read.is_some())
            .field("parse", &self.parse.is_some())
            .finish()
    }
}

impl ConversionRecord {
    pub fn new(tag: TypeTag, native_type: NativeType, bind: BindFn) -> Self {
        Self {
            tag,
            native_type: Some(native_type),
            owns_native_type: true,
            bind,
            read: None,
            parse: None,
            to_json: json::quoted,
        }
    }

    /// Record without a native representation, used for `Null`
    pub fn untyped(tag: TypeTag, bind: BindFn) -> Self {
        Self {
            tag,
            native_type: None,
            owns_native_type: false,
            bind,
            read: None,
            parse: None,
            to_json: json::null,
        }
    }

    pub fn with_reader(mut self, read: ReadFn) -> Self {
        self.read = Some(read);
        self
    }

    pub fn with_parser(mut self, parse: ParseFn) -> Self {
        self.parse = Some(parse);
        self
    }

    pub fn with_json(mut self, to_json: JsonFn) -> Self {
        self.to_json = to_json;
        self
    }

    /// Copy of this record under another tag that shares the native type.
    ///
    /// The copy inherits bind, read and parse and does not take part in
    /// reverse lookup.
    pub fn derive(&self, tag: TypeTag) -> Self {
        Self {
            tag,
            owns_native_type: false,
            ..*self
        }
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn native_type(&self) -> Option<NativeType> {
        self.native_type
    }

    /// Whether the native type maps back to this record's tag
    pub fn owns_native_type(&self) -> bool {
        self.owns_native_type
    }

    pub fn binder(&self) -> BindFn {
        self.bind
    }

    pub fn reader(&self) -> Option<ReadFn> {
        self.read
    }

    pub fn parser(&self) -> Option<ParseFn> {
        self.parse
    }

    pub fn json_renderer(&self) -> JsonFn {
        self.to_json
    }
}
