//! Emitter error taxonomy.
//!
//! Mirrors `grue_compiler::error::CompilerError`'s shape: a flat enum with a
//! hand-rolled `Display` impl. The teacher carries no `thiserror` dependency
//! for its error type, so this crate doesn't add one either.

use std::fmt;

#[derive(Debug, Clone)]
pub enum EmitError {
    /// A version byte outside 3..=8 was requested.
    InvalidVersion(u8),

    /// A dictionary word contains characters with no mapping under the
    /// default ZSCII alphabets or escape sequence (spec §4.2 forbids
    /// escapes in dictionary words).
    EncodingUnsupported { word: String },

    /// A region base, packed address, or scaled file length overflowed 16
    /// bits.
    MemoryLayoutOverflow { what: String, value: u64 },

    /// A routine's static (unpacked) address is not divisible by the
    /// version's packing divisor.
    AddressAlignment { routine_offset: u32, divisor: u32 },

    /// An object's parent/sibling/child referred to an id that doesn't
    /// exist.
    InvalidObjectId { object_id: u16, field: &'static str, referenced: u16 },

    /// A property's payload exceeded the version's maximum size.
    PropertyTooLarge { object_id: u16, property: u8, size: usize, max: usize },

    /// Two properties on the same object used the same property number.
    DuplicatePropertyNumber { object_id: u16, property: u8 },
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EmitError::InvalidVersion(v) => {
                write!(f, "unsupported Z-Machine version {} (expected 3..=8)", v)
            }
            EmitError::EncodingUnsupported { word } => {
                write!(
                    f,
                    "dictionary word '{}' contains characters with no in-alphabet mapping",
                    word
                )
            }
            EmitError::MemoryLayoutOverflow { what, value } => {
                write!(f, "{} overflows 16 bits: 0x{:x}", what, value)
            }
            EmitError::AddressAlignment {
                routine_offset,
                divisor,
            } => write!(
                f,
                "routine offset 0x{:x} is not divisible by packing divisor {}",
                routine_offset, divisor
            ),
            EmitError::InvalidObjectId {
                object_id,
                field,
                referenced,
            } => write!(
                f,
                "object {} field '{}' references nonexistent object id {}",
                object_id, field, referenced
            ),
            EmitError::PropertyTooLarge {
                object_id,
                property,
                size,
                max,
            } => write!(
                f,
                "object {} property {} has {} bytes of data, exceeds max {}",
                object_id, property, size, max
            ),
            EmitError::DuplicatePropertyNumber {
                object_id,
                property,
            } => write!(
                f,
                "object {} defines property {} more than once",
                object_id, property
            ),
        }
    }
}

impl std::error::Error for EmitError {}
