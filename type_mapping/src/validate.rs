//! Validation utilities for type mapping
//!
//! Checks a record set before it becomes a registry.

use crate::errors::MappingError;
use crate::record::ConversionRecord;
use crate::tag::TypeTag;
use crate::types::NativeType;
use std::collections::HashMap;

/// Check that a record set is internally consistent.
///
/// Each tag appears once, only `Null` lacks a native type, and no two records
/// claim ownership of the same native type.
pub fn validate_records(records: &[ConversionRecord]) -> Result<(), MappingError> {
    let mut seen_tags: HashMap<TypeTag, usize> = HashMap::new();
    let mut owners: HashMap<NativeType, TypeTag> = HashMap::new();

    for record in records {
        let tag = record.tag();
        let count = seen_tags.entry(tag).or_insert(0);
        *count += 1;
        if *count > 1 {
            return Err(MappingError::Registry(format!(
                "type code {tag} is registered more than once"
            )));
        }

        match record.native_type() {
            None if tag != TypeTag::Null => {
                return Err(MappingError::Registry(format!(
                    "type code {tag} has no native type"
                )));
            }
            Some(_) if tag == TypeTag::Null => {
                return Err(MappingError::Registry(
                    "type code Null cannot carry a native type".to_string(),
                ));
            }
            Some(native) if record.owns_native_type() => {
                if let Some(owner) = owners.insert(native, tag) {
                    return Err(MappingError::Registry(format!(
                        "native type {native} is claimed by both {owner} and {tag}"
                    )));
                }
            }
            _ => {}
        }
    }

    Ok(())
}
