//! Error types for type mapping
//!
//! Every failure is surfaced to the immediate caller; nothing here is
//! retried or replaced with a default value.

use crate::tag::TypeTag;
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Boxed error produced by a row or slot implementation
pub type BoxDynError = Box<dyn StdError + Send + Sync + 'static>;

/// The conversion capability that was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Bind,
    Read,
    Parse,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Bind => f.write_str("bind"),
            Operation::Read => f.write_str("read"),
            Operation::Parse => f.write_str("parameter"),
        }
    }
}

/// Failure reported by the underlying data source while binding or reading.
///
/// The original error is kept as-is; use [`DataSourceError::downcast_ref`] to
/// inspect the driver error.
#[derive(Debug)]
pub struct DataSourceError {
    inner: BoxDynError,
}

impl DataSourceError {
    pub fn new(error: impl Into<BoxDynError>) -> Self {
        Self {
            inner: error.into(),
        }
    }

    pub fn get_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.inner.as_ref()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }

    pub fn into_inner(self) -> BoxDynError {
        self.inner
    }
}

impl fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl StdError for DataSourceError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source()
    }
}

#[derive(Error, Debug)]
pub enum MappingError {
    #[error("unsupported {operation} conversion for type code {tag}")]
    UnsupportedConversion { tag: TypeTag, operation: Operation },

    #[error(transparent)]
    DataSource(#[from] DataSourceError),

    #[error("unknown member '{name}' of enumeration {enumeration}")]
    UnknownEnumMember {
        enumeration: &'static str,
        name: String,
    },

    #[error("malformed {tag} text '{text}': {reason}")]
    MalformedText {
        tag: TypeTag,
        text: String,
        reason: String,
    },

    #[error("a {found} value cannot be bound as {tag}")]
    ValueMismatch { tag: TypeTag, found: &'static str },

    #[error("stored {tag} value cannot be decoded: {reason}")]
    UndecodableValue { tag: TypeTag, reason: String },

    #[error("registry error: {0}")]
    Registry(String),
}

impl MappingError {
    pub(crate) fn unsupported(tag: TypeTag, operation: Operation) -> Self {
        MappingError::UnsupportedConversion { tag, operation }
    }

    pub(crate) fn malformed(tag: TypeTag, text: &str, reason: impl fmt::Display) -> Self {
        MappingError::MalformedText {
            tag,
            text: text.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True when the error came from the row or slot rather than from the registry
    pub fn is_data_source(&self) -> bool {
        matches!(self, MappingError::DataSource(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("unique constraint violated")]
    struct DriverError;

    #[test]
    fn test_data_source_error_is_transparent() {
        let err: MappingError = DataSourceError::new(DriverError).into();
        assert!(err.is_data_source());
        assert_eq!(err.to_string(), "unique constraint violated");

        match err {
            MappingError::DataSource(inner) => {
                assert!(inner.downcast_ref::<DriverError>().is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_data_source_error_hands_back_driver_error() {
        let err = DataSourceError::new(DriverError);
        assert_eq!(err.get_ref().to_string(), "unique constraint violated");
        assert!(err.into_inner().downcast::<DriverError>().is_ok());
    }

    #[test]
    fn test_unsupported_message_names_tag() {
        let err = MappingError::unsupported(TypeTag::Array, Operation::Parse);
        assert_eq!(
            err.to_string(),
            "unsupported parameter conversion for type code Array"
        );
    }
}
