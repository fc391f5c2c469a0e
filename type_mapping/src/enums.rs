//! Enumeration support
//!
//! Enumerations all share the `Enum` type code, so turning a constant name
//! back into a value needs the concrete enumeration's descriptor. Types opt in
//! by implementing [`NamedEnum`], normally through the [`named_enum!`] macro.

use crate::errors::MappingError;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Static description of a closed set of named constants
#[derive(Debug)]
pub struct EnumDescriptor {
    type_name: &'static str,
    members: &'static [&'static str],
}

impl EnumDescriptor {
    pub const fn new(type_name: &'static str, members: &'static [&'static str]) -> Self {
        Self { type_name, members }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn members(&self) -> &'static [&'static str] {
        self.members
    }

    /// Position of the constant called `name`; names are case-sensitive
    pub fn position(&self, name: &str) -> Option<usize> {
        self.members.iter().position(|member| *member == name)
    }

    /// Resolve a constant name into a member of this enumeration
    pub fn resolve(&'static self, name: &str) -> Result<EnumValue, MappingError> {
        resolve_enum(self, name)
    }
}

/// A member of some enumeration, carried without its concrete Rust type
#[derive(Clone, Copy)]
pub struct EnumValue {
    descriptor: &'static EnumDescriptor,
    ordinal: usize,
}

impl EnumValue {
    pub fn descriptor(&self) -> &'static EnumDescriptor {
        self.descriptor
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn name(&self) -> &'static str {
        self.descriptor.members[self.ordinal]
    }

    /// Recover the concrete enumeration, if this value belongs to `E`
    pub fn to_enum<E: NamedEnum>(&self) -> Option<E> {
        if std::ptr::eq(self.descriptor, E::descriptor()) {
            E::from_ordinal(self.ordinal)
        } else {
            None
        }
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.descriptor, other.descriptor) && self.ordinal == other.ordinal
    }
}

impl Eq for EnumValue {}

impl Hash for EnumValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.descriptor, state);
        self.ordinal.hash(state);
    }
}

impl fmt::Debug for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.descriptor.type_name, self.name())
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A Rust enum whose variants are a closed set of named constants.
///
/// The ordinal is the variant's declaration position; bound and rendered
/// forms use the name only.
pub trait NamedEnum: Sized + Copy + 'static {
    fn descriptor() -> &'static EnumDescriptor;

    fn ordinal(&self) -> usize;

    fn from_ordinal(ordinal: usize) -> Option<Self>;

    fn name(&self) -> &'static str {
        Self::descriptor().members[self.ordinal()]
    }

    fn to_enum_value(&self) -> EnumValue {
        EnumValue {
            descriptor: Self::descriptor(),
            ordinal: self.ordinal(),
        }
    }
}

/// Find the member of `descriptor` called `name`.
///
/// Fails with [`MappingError::UnknownEnumMember`]; never falls back to a
/// default member.
pub fn resolve_enum(
    descriptor: &'static EnumDescriptor,
    name: &str,
) -> Result<EnumValue, MappingError> {
    descriptor
        .position(name)
        .map(|ordinal| EnumValue {
            descriptor,
            ordinal,
        })
        .ok_or_else(|| MappingError::UnknownEnumMember {
            enumeration: descriptor.type_name,
            name: name.to_string(),
        })
}

/// Typed variant of [`resolve_enum`]
pub fn resolve_enum_as<E: NamedEnum>(name: &str) -> Result<E, MappingError> {
    let value = resolve_enum(E::descriptor(), name)?;
    E::from_ordinal(value.ordinal).ok_or_else(|| MappingError::UnknownEnumMember {
        enumeration: E::descriptor().type_name,
        name: name.to_string(),
    })
}

/// Declare a fieldless enum and implement [`NamedEnum`] for it.
///
/// The macro derives `Debug, Clone, Copy, PartialEq, Eq, Hash`; do not derive
/// them again.
///
/// ```
/// use type_mapping::{named_enum, NamedEnum};
///
/// named_enum! {
///     pub enum GreekLetter { Alpha, Beta, Gamma }
/// }
///
/// assert_eq!(GreekLetter::Beta.name(), "Beta");
/// ```
#[macro_export]
macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident { $($variant:ident),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $crate::NamedEnum for $name {
            fn descriptor() -> &'static $crate::EnumDescriptor {
                static DESCRIPTOR: $crate::EnumDescriptor = $crate::EnumDescriptor::new(
                    stringify!($name),
                    &[$(stringify!($variant)),+],
                );
                &DESCRIPTOR
            }

            fn ordinal(&self) -> usize {
                *self as usize
            }

            fn from_ordinal(ordinal: usize) -> Option<Self> {
                const VARIANTS: &[$name] = &[$($name::$variant),+];
                VARIANTS.get(ordinal).copied()
            }
        }
    };
}
