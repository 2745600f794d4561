//! Z-Machine version table.
//!
//! Collapses the two-armed `match self.version { V3 => .., V4 | V5 => .. }`
//! style scattered through the teacher's `codegen_headers.rs` /
//! `codegen_objects.rs` into a single lookup keyed by version, per
//! DESIGN NOTES §9 ("Hard-coded v6/v8 feature assumptions... Parameterize
//! all version-dependent constants... in a single table keyed by version").

use std::fmt;

use crate::error::EmitError;

/// Supported Z-Machine story file versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZMachineVersion {
    V3,
    V4,
    V5,
    V6,
    V7,
    V8,
}

impl ZMachineVersion {
    pub fn from_u8(value: u8) -> Result<Self, EmitError> {
        match value {
            3 => Ok(ZMachineVersion::V3),
            4 => Ok(ZMachineVersion::V4),
            5 => Ok(ZMachineVersion::V5),
            6 => Ok(ZMachineVersion::V6),
            7 => Ok(ZMachineVersion::V7),
            8 => Ok(ZMachineVersion::V8),
            other => Err(EmitError::InvalidVersion(other)),
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            ZMachineVersion::V3 => 3,
            ZMachineVersion::V4 => 4,
            ZMachineVersion::V5 => 5,
            ZMachineVersion::V6 => 6,
            ZMachineVersion::V7 => 7,
            ZMachineVersion::V8 => 8,
        }
    }

    /// Default region bases chosen by the Layout Planner (spec §4.5).
    pub fn default_region_bases(self) -> (u16, u16) {
        match self {
            ZMachineVersion::V3 => (0x4000, 0x8000),
            ZMachineVersion::V4 | ZMachineVersion::V5 => (0x8000, 0xC000),
            ZMachineVersion::V6 | ZMachineVersion::V7 | ZMachineVersion::V8 => (0xA000, 0xF000),
        }
    }

    /// Object record size in bytes: 9 for v3, 14 for v4+.
    pub fn object_record_size(self) -> usize {
        match self {
            ZMachineVersion::V3 => 9,
            _ => 14,
        }
    }

    /// Attribute bitfield width in bytes: 4 for v3, 6 for v4+.
    pub fn attribute_bytes(self) -> usize {
        match self {
            ZMachineVersion::V3 => 4,
            _ => 6,
        }
    }

    /// Number of property-default slots: 31 for v3, 63 for v4+.
    pub fn max_properties(self) -> u8 {
        match self {
            ZMachineVersion::V3 => 31,
            _ => 63,
        }
    }

    /// Object id ceiling: 255 for v3, 65535 for v4+.
    pub fn max_objects(self) -> u32 {
        match self {
            ZMachineVersion::V3 => 255,
            _ => 65535,
        }
    }

    /// Maximum single property payload size in bytes.
    pub fn max_property_size(self) -> usize {
        match self {
            ZMachineVersion::V3 => 8,
            _ => 64,
        }
    }

    /// Dictionary entry length in bytes (Z-word + 3 data bytes).
    pub fn dictionary_entry_length(self) -> usize {
        match self {
            ZMachineVersion::V3 => 7,
            _ => 9,
        }
    }

    /// Dictionary Z-word width in bytes (6 z-chars for v3, 9 for v4+).
    pub fn dictionary_word_bytes(self) -> usize {
        match self {
            ZMachineVersion::V3 => 4,
            _ => 6,
        }
    }

    /// Max Z-characters folded into a dictionary word before truncation.
    pub fn dictionary_word_zchars(self) -> usize {
        match self {
            ZMachineVersion::V3 => 6,
            _ => 9,
        }
    }

    /// Packed-address divisor for routine addresses (spec §4.4).
    pub fn routine_packing_divisor(self) -> u32 {
        match self {
            ZMachineVersion::V3 => 2,
            ZMachineVersion::V4 | ZMachineVersion::V5 | ZMachineVersion::V6 | ZMachineVersion::V7 => 4,
            ZMachineVersion::V8 => 8,
        }
    }

    /// Packed-address divisor for string addresses (spec §4.4).
    pub fn string_packing_divisor(self) -> u32 {
        match self {
            ZMachineVersion::V6 => 8,
            other => other.routine_packing_divisor(),
        }
    }

    /// Header flags-2 default value (spec §4.6 offset 16-17).
    pub fn default_flags2(self) -> u16 {
        match self {
            ZMachineVersion::V3 => 0x0040,
            _ => 0x0002,
        }
    }

    /// Scale used for the header's length field (spec §4.6 offset 26-27).
    pub fn file_length_scale(self) -> u32 {
        match self {
            ZMachineVersion::V3 => 2,
            ZMachineVersion::V4 | ZMachineVersion::V5 => 4,
            ZMachineVersion::V6 | ZMachineVersion::V7 | ZMachineVersion::V8 => 8,
        }
    }
}

impl fmt::Display for ZMachineVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "v{}", self.as_u8())
    }
}
