//! The conversion registry
//!
//! A [`Registry`] is built once from a list of [`ConversionRecord`]s and is
//! read-only afterwards. It keeps two tables: tag to record, and native type
//! to tag for inference. Every dispatch function only reads them, so a
//! registry can be shared between threads freely (`Arc<Registry>` or the
//! process-wide [`Registry::global`]).

use crate::conversions::standard_records;
use crate::enums::{resolve_enum, EnumDescriptor, EnumValue};
use crate::errors::{MappingError, Operation};
use crate::json;
use crate::record::{BindFn, ConversionRecord, JsonFn, ParseFn, ParseOptions, ReadFn};
use crate::slots::{ParameterSlots, ResultRow};
use crate::tag::TypeTag;
use crate::types::{NativeType, NativeValue};
use crate::validate::validate_records;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Collects records and options, then produces an immutable [`Registry`]
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    records: Vec<ConversionRecord>,
    options: ParseOptions,
}

impl RegistryBuilder {
    /// Builder with no records at all
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder preloaded with the standard record for every tag
    pub fn standard() -> Self {
        Self {
            records: standard_records(),
            options: ParseOptions::default(),
        }
    }

    /// Add a record, replacing any earlier record for the same tag
    pub fn record(mut self, record: ConversionRecord) -> Self {
        self.records.retain(|r| r.tag() != record.tag());
        self.records.push(record);
        self
    }

    /// Drop the record for `tag`
    pub fn without(mut self, tag: TypeTag) -> Self {
        self.records.retain(|r| r.tag() != tag);
        self
    }

    pub fn parse_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> Result<Registry, MappingError> {
        validate_records(&self.records)?;
        Ok(Registry::assemble(self.records, self.options))
    }
}

#[derive(Debug, Clone)]
pub struct Registry {
    by_tag: HashMap<TypeTag, ConversionRecord>,
    by_native_type: HashMap<NativeType, TypeTag>,
    options: ParseOptions,
}

static GLOBAL: OnceLock<Registry> = OnceLock::new();

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::standard()
    }

    /// Registry holding the standard record set
    pub fn standard() -> Self {
        Self::with_options(ParseOptions::default())
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self::assemble(standard_records(), options)
    }

    /// Process-wide standard registry, built on first access
    pub fn global() -> &'static Registry {
        GLOBAL.get_or_init(Registry::standard)
    }

    fn assemble(records: Vec<ConversionRecord>, options: ParseOptions) -> Self {
        let mut by_tag = HashMap::with_capacity(records.len());
        let mut by_native_type = HashMap::with_capacity(records.len());

        for record in records {
            trace_log!(
                "Registering type code {} over {:?}",
                record.tag(),
                record.native_type()
            );
            if let (Some(native), true) = (record.native_type(), record.owns_native_type()) {
                match by_native_type.get(&native) {
                    Some(_owner) => {
                        debug_log!(
                            "Native type {} is already owned by {}, {} is not reverse-mapped",
                            native,
                            _owner,
                            record.tag()
                        );
                    }
                    None => {
                        by_native_type.insert(native, record.tag());
                    }
                }
            }
            by_tag.insert(record.tag(), record);
        }

        Self {
            by_tag,
            by_native_type,
            options,
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn record(&self, tag: TypeTag) -> Option<&ConversionRecord> {
        self.by_tag.get(&tag)
    }

    /// Registered tags in tag order
    pub fn tags(&self) -> Vec<TypeTag> {
        let mut tags: Vec<TypeTag> = self.by_tag.keys().copied().collect();
        tags.sort();
        tags
    }

    // ========================================
    // Inference
    // ========================================

    /// Tag for a native type.
    ///
    /// `None` means no value and gives `Null`; any enumeration gives `Enum`;
    /// unknown types give `Object`. Never fails.
    pub fn infer_tag(&self, native_type: Option<&NativeType>) -> TypeTag {
        match native_type {
            None => TypeTag::Null,
            Some(native) if native.is_enumeration() => TypeTag::Enum,
            Some(native) => self
                .by_native_type
                .get(native)
                .copied()
                .unwrap_or(TypeTag::Object),
        }
    }

    pub fn infer_tag_of<T: ?Sized + 'static>(&self) -> TypeTag {
        self.infer_tag(Some(&NativeType::of::<T>()))
    }

    /// Tag matching the representation of `value`
    pub fn tag_of_value(&self, value: &NativeValue) -> TypeTag {
        self.infer_tag(value.native_type().as_ref())
    }

    /// Native type of a tag; `None` for no tag and for `Null`.
    ///
    /// A tag without a record resolves to the catch-all JSON document type.
    pub fn native_type_of(&self, tag: Option<TypeTag>) -> Option<NativeType> {
        let tag = tag?;
        match self.by_tag.get(&tag) {
            Some(record) => record.native_type(),
            None => Some(NativeType::of::<serde_json::Value>()),
        }
    }

    // ========================================
    // Capability accessors
    // ========================================

    pub fn binder(&self, tag: TypeTag) -> Result<BindFn, MappingError> {
        self.by_tag
            .get(&tag)
            .map(ConversionRecord::binder)
            .ok_or_else(|| unsupported(tag, Operation::Bind))
    }

    pub fn reader(&self, tag: TypeTag) -> Result<ReadFn, MappingError> {
        self.by_tag
            .get(&tag)
            .and_then(ConversionRecord::reader)
            .ok_or_else(|| unsupported(tag, Operation::Read))
    }

    pub fn parser(&self, tag: TypeTag) -> Result<ParseFn, MappingError> {
        self.by_tag
            .get(&tag)
            .and_then(ConversionRecord::parser)
            .ok_or_else(|| unsupported(tag, Operation::Parse))
    }

    pub fn json_renderer(&self, tag: TypeTag) -> JsonFn {
        self.by_tag
            .get(&tag)
            .map(ConversionRecord::json_renderer)
            .unwrap_or(json::quoted)
    }

    // ========================================
    // Dispatch
    // ========================================

    /// Write `value` into slot `index`.
    ///
    /// The value must already be in the tag's representation. A null value
    /// under a concrete tag is bound as a null of that tag.
    pub fn bind(
        &self,
        tag: TypeTag,
        slots: &mut dyn ParameterSlots,
        index: usize,
        value: &NativeValue,
    ) -> Result<(), MappingError> {
        let bind = self.binder(tag)?;
        if value.is_null() && tag != TypeTag::Null {
            return self.bind_null(slots, index, tag);
        }
        bind(slots, index, value)
    }

    /// Bind SQL NULL typed as `kind`
    pub fn bind_null(
        &self,
        slots: &mut dyn ParameterSlots,
        index: usize,
        kind: TypeTag,
    ) -> Result<(), MappingError> {
        slots.set_null(index, kind)?;
        Ok(())
    }

    /// Read column `index` as `tag`. SQL NULL comes back as `NativeValue::Null`.
    pub fn read(
        &self,
        tag: TypeTag,
        row: &dyn ResultRow,
        index: usize,
    ) -> Result<NativeValue, MappingError> {
        let read = self.reader(tag)?;
        read(row, index)
    }

    /// Read column `index` as text and resolve it against `descriptor`
    pub fn read_enum(
        &self,
        row: &dyn ResultRow,
        index: usize,
        descriptor: &'static EnumDescriptor,
    ) -> Result<NativeValue, MappingError> {
        match row.get_text(index)? {
            None => Ok(NativeValue::Null),
            Some(name) => resolve_enum(descriptor, &name).map(NativeValue::Enum),
        }
    }

    /// Parse a text parameter as `tag`
    pub fn parse(&self, tag: TypeTag, text: &str) -> Result<NativeValue, MappingError> {
        let parse = self.parser(tag)?;
        parse(text, &self.options)
    }

    /// Parse a text parameter naming a member of `descriptor`
    pub fn parse_enum(
        &self,
        descriptor: &'static EnumDescriptor,
        text: &str,
    ) -> Result<NativeValue, MappingError> {
        let name = if self.options.trim { text.trim() } else { text };
        resolve_enum(descriptor, name).map(NativeValue::Enum)
    }

    pub fn resolve_enum(
        &self,
        descriptor: &'static EnumDescriptor,
        name: &str,
    ) -> Result<EnumValue, MappingError> {
        resolve_enum(descriptor, name)
    }

    /// JSON scalar for `value`. Null values always render as `null`.
    pub fn to_json(&self, tag: TypeTag, value: &NativeValue) -> String {
        if value.is_null() {
            return json::null(value);
        }
        (self.json_renderer(tag))(value)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

fn unsupported(tag: TypeTag, operation: Operation) -> MappingError {
    debug_log!("No {} conversion registered for type code {}", operation, tag);
    MappingError::unsupported(tag, operation)
}
