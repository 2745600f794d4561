//! Header Emitter + Checksum (spec §4.6).
//!
//! Grounded on `codegen_headers.rs::{generate_static_header_fields,
//! fixup_header_addresses, finalize_header_metadata, calculate_checksum}`,
//! collapsed into a single pass over the already-complete `LayoutPlan`
//! (the teacher writes static fields first, then patches addresses in a
//! second call once layout is known; here layout is known up front, so
//! both happen in one function). The read-side shape mirrors
//! `src/header.rs::Header`.

use crate::address;
use crate::error::EmitError;
use crate::layout::LayoutPlan;
use crate::model::EmitterInput;

const HEADER_SIZE: usize = 64;

pub fn finalize(plan: LayoutPlan, input: &EmitterInput) -> Result<Vec<u8>, EmitError> {
    let mut image = plan.image;
    let version = plan.version;

    image[0] = version.as_u8();
    image[1] = 0x00; // flags 1, interpreter-set

    let release = input.release_number.unwrap_or(0);
    image[2] = (release >> 8) as u8;
    image[3] = release as u8;

    image[4] = (plan.high_base >> 8) as u8;
    image[5] = plan.high_base as u8;

    let pc_packed = address::pack_routine(plan.start_routine_address, version)?;
    image[6] = (pc_packed >> 8) as u8;
    image[7] = pc_packed as u8;

    image[8] = (plan.dictionary_addr >> 8) as u8;
    image[9] = plan.dictionary_addr as u8;

    image[10] = (plan.object_table_addr >> 8) as u8;
    image[11] = plan.object_table_addr as u8;

    image[12] = (plan.globals_addr >> 8) as u8;
    image[13] = plan.globals_addr as u8;

    image[14] = (plan.static_base >> 8) as u8;
    image[15] = plan.static_base as u8;

    let flags2 = version.default_flags2();
    image[16] = (flags2 >> 8) as u8;
    image[17] = flags2 as u8;

    let serial = input.serial.unwrap_or(*b"000000");
    image[18..24].copy_from_slice(&serial);

    image[24] = (plan.abbreviations_addr >> 8) as u8;
    image[25] = plan.abbreviations_addr as u8;

    let scale = version.file_length_scale();
    let scaled_length = image.len() as u64 / scale as u64;
    if scaled_length > 0xFFFF {
        return Err(EmitError::MemoryLayoutOverflow {
            what: "scaled file length".into(),
            value: scaled_length,
        });
    }
    image[26] = (scaled_length >> 8) as u8;
    image[27] = scaled_length as u8;

    // bytes 30-63 (screen/colour fields etc.) are left zero; no terminal
    // capability negotiation is in scope for this emitter.

    let checksum = calculate_checksum(&image);
    image[28] = (checksum >> 8) as u8;
    image[29] = checksum as u8;

    log::debug!(
        "header finalized: version={} release={} pc=0x{:04x} checksum=0x{:04x} length={}",
        version,
        release,
        pc_packed,
        checksum,
        image.len()
    );

    Ok(image)
}

/// Sum bytes 0..28 and 30..end modulo 2^16 (spec §4.6).
fn calculate_checksum(image: &[u8]) -> u16 {
    let mut sum: u32 = 0;
    for (i, &byte) in image.iter().enumerate() {
        if i != 28 && i != 29 {
            sum = sum.wrapping_add(byte as u32);
        }
    }
    (sum & 0xFFFF) as u16
}

/// Read-only summary of an emitted header, for the `analyze --header` CLI
/// surface (spec §6). Grounded on `src/header.rs::Header`'s `Display` impl.
pub struct HeaderSummary {
    pub version: u8,
    pub release: u16,
    pub serial: String,
    pub high_memory_base: u16,
    pub initial_pc: u16,
    pub dictionary_addr: u16,
    pub object_table_addr: u16,
    pub globals_addr: u16,
    pub static_base: u16,
    pub abbreviations_addr: u16,
    pub file_length: usize,
    pub checksum: u16,
}

impl HeaderSummary {
    pub fn read(image: &[u8]) -> Option<Self> {
        if image.len() < HEADER_SIZE {
            return None;
        }
        let word = |offset: usize| -> u16 { ((image[offset] as u16) << 8) | image[offset + 1] as u16 };
        Some(HeaderSummary {
            version: image[0],
            release: word(2),
            serial: String::from_utf8_lossy(&image[18..24]).into_owned(),
            high_memory_base: word(4),
            initial_pc: word(6),
            dictionary_addr: word(8),
            object_table_addr: word(10),
            globals_addr: word(12),
            static_base: word(14),
            abbreviations_addr: word(24),
            file_length: image.len(),
            checksum: word(28),
        })
    }
}

impl std::fmt::Display for HeaderSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Z-code version:       {}\n\
             Release number:      {}\n\
             Serial number:        {}\n\
             High memory base:    {:#06x}\n\
             Initial PC:          {:#06x}\n\
             Dictionary address:  {:#06x}\n\
             Object table address:{:#06x}\n\
             Global variables:    {:#06x}\n\
             Static memory base:  {:#06x}\n\
             Abbreviations table: {:#06x}\n\
             File length:         {:#06x}\n\
             Checksum:            {:#06x}\n",
            self.version,
            self.release,
            self.serial,
            self.high_memory_base,
            self.initial_pc,
            self.dictionary_addr,
            self.object_table_addr,
            self.globals_addr,
            self.static_base,
            self.abbreviations_addr,
            self.file_length,
            self.checksum,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CodeImage;
    use crate::model::EmitterInput as Input;
    use crate::version::ZMachineVersion;

    fn empty_input(version: ZMachineVersion) -> Input {
        Input {
            version,
            objects: vec![],
            globals: [0; 240],
            dictionary_words: vec![],
            separators: None,
            strings: vec![],
            code_image: CodeImage {
                bytes: vec![],
                start_routine_offset: 0,
            },
            property_defaults: None,
            release_number: None,
            serial: Some(*b"000000"),
        }
    }

    #[test]
    fn checksum_matches_spec_formula() {
        let input = empty_input(ZMachineVersion::V3);
        let plan = crate::layout::plan(&input).unwrap();
        let image = finalize(plan, &input).unwrap();

        let mut expected: u32 = 0;
        for (i, &b) in image.iter().enumerate() {
            if i != 28 && i != 29 {
                expected = expected.wrapping_add(b as u32);
            }
        }
        let stored = ((image[28] as u16) << 8) | image[29] as u16;
        assert_eq!(stored, (expected & 0xFFFF) as u16);
    }

    #[test]
    fn scaled_length_round_trips() {
        let input = empty_input(ZMachineVersion::V3);
        let plan = crate::layout::plan(&input).unwrap();
        let image = finalize(plan, &input).unwrap();
        let scaled = ((image[26] as usize) << 8) | image[27] as usize;
        assert_eq!(scaled * 2, image.len());
    }
}
