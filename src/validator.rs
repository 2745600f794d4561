//! Validator (spec §4.7).
//!
//! No direct teacher equivalent — `grue_compiler` has no post-emission
//! verification pass. Built from the read-side field accessors in
//! `src/header.rs::Header`, reused here in reverse: instead of a VM reading
//! a header to execute it, this module reads a freshly emitted header to
//! double-check it. Findings are always non-fatal (spec §4.7: "never
//! fatal — emission already succeeded").

use std::fmt;

use crate::header::HeaderSummary;
use crate::version::ZMachineVersion;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    TotalSizeTooSmall { actual: usize },
    VersionMismatch { expected: u8, found: u8 },
    RegionOrdering { static_base: u16, high_base: u16 },
    DictionaryOutsideStatic { dictionary_addr: u16, static_base: u16, high_base: u16 },
    TableOverlapsHeader { name: &'static str, addr: u16 },
    ScaledLengthMismatch { scaled: usize, scale: u32, actual: usize },
    ChecksumMismatch { stored: u16, computed: u16 },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValidationWarning::TotalSizeTooSmall { actual } => {
                write!(f, "image is only {} bytes, smaller than the 64-byte header", actual)
            }
            ValidationWarning::VersionMismatch { expected, found } => write!(
                f,
                "header version {} does not match configured version {}",
                found, expected
            ),
            ValidationWarning::RegionOrdering {
                static_base,
                high_base,
            } => write!(
                f,
                "high memory base 0x{:04x} precedes static memory base 0x{:04x}",
                high_base, static_base
            ),
            ValidationWarning::DictionaryOutsideStatic {
                dictionary_addr,
                static_base,
                high_base,
            } => write!(
                f,
                "dictionary address 0x{:04x} falls outside static memory [0x{:04x}, 0x{:04x})",
                dictionary_addr, static_base, high_base
            ),
            ValidationWarning::TableOverlapsHeader { name, addr } => write!(
                f,
                "{} address 0x{:04x} overlaps the 64-byte header",
                name, addr
            ),
            ValidationWarning::ScaledLengthMismatch {
                scaled,
                scale,
                actual,
            } => write!(
                f,
                "scaled length {} * scale {} = {}, but image is {} bytes",
                scaled,
                scale,
                scaled * *scale as usize,
                actual
            ),
            ValidationWarning::ChecksumMismatch { stored, computed } => write!(
                f,
                "stored checksum 0x{:04x} does not match computed checksum 0x{:04x}",
                stored, computed
            ),
        }
    }
}

pub fn validate(image: &[u8], expected_version: ZMachineVersion) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let summary = match HeaderSummary::read(image) {
        Some(s) => s,
        None => {
            warnings.push(ValidationWarning::TotalSizeTooSmall { actual: image.len() });
            return warnings;
        }
    };

    if summary.version != expected_version.as_u8() {
        warnings.push(ValidationWarning::VersionMismatch {
            expected: expected_version.as_u8(),
            found: summary.version,
        });
    }

    if summary.high_memory_base < summary.static_base {
        warnings.push(ValidationWarning::RegionOrdering {
            static_base: summary.static_base,
            high_base: summary.high_memory_base,
        });
    }

    if summary.dictionary_addr < summary.static_base || summary.dictionary_addr >= summary.high_memory_base {
        warnings.push(ValidationWarning::DictionaryOutsideStatic {
            dictionary_addr: summary.dictionary_addr,
            static_base: summary.static_base,
            high_base: summary.high_memory_base,
        });
    }

    for (name, addr) in [
        ("object table", summary.object_table_addr),
        ("global variables", summary.globals_addr),
    ] {
        if (addr as usize) < 64 {
            warnings.push(ValidationWarning::TableOverlapsHeader { name, addr });
        }
    }

    let scale = expected_version.file_length_scale();
    let scaled = ((image[26] as usize) << 8) | image[27] as usize;
    if scaled * scale as usize != image.len() {
        warnings.push(ValidationWarning::ScaledLengthMismatch {
            scaled,
            scale,
            actual: image.len(),
        });
    }

    let mut computed: u32 = 0;
    for (i, &byte) in image.iter().enumerate() {
        if i != 28 && i != 29 {
            computed = computed.wrapping_add(byte as u32);
        }
    }
    let computed = (computed & 0xFFFF) as u16;
    if computed != summary.checksum {
        warnings.push(ValidationWarning::ChecksumMismatch {
            stored: summary.checksum,
            computed,
        });
    }

    if !warnings.is_empty() {
        for warning in &warnings {
            log::warn!("validation: {}", warning);
        }
    }

    warnings
}
