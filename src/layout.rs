//! Layout Planner (spec §4.5).
//!
//! This is the two-pass restructuring DESIGN NOTES §9 calls for: region
//! bases and every region's final address are computed once, into an
//! immutable `LayoutPlan`, before the Header Emitter writes a single byte.
//! It replaces the teacher's pattern of writing a region, then reaching
//! back into already-emitted bytes to patch a forward reference
//! (`codegen_headers.rs::resolve_fixup` patching into `self.final_data`
//! after the fact); here, every region except the object table's own
//! internal prop-table-address patch (self-contained in `object_table`) is
//! appended in an order where nothing downstream needs to be revisited.

use indexmap::IndexMap;

use crate::address;
use crate::dictionary;
use crate::error::EmitError;
use crate::model::EmitterInput;
use crate::object_table;
use crate::version::ZMachineVersion;

const HEADER_SIZE: usize = 64;
const GLOBALS_COUNT: usize = 240;
const GLOBALS_BYTES: usize = GLOBALS_COUNT * 2;

pub struct LayoutPlan {
    pub version: ZMachineVersion,
    pub static_base: u16,
    pub high_base: u16,
    pub globals_addr: u16,
    pub object_table_addr: u16,
    pub dictionary_addr: u16,
    pub abbreviations_addr: u16,
    pub start_routine_address: u32,
    /// Logical string id -> final byte address in high memory.
    pub string_addresses: IndexMap<u32, u32>,
    /// The assembled image with header bytes 0..64 still zero-filled; the
    /// Header Emitter fills them in as the next step.
    pub image: Vec<u8>,
}

pub fn plan(input: &EmitterInput) -> Result<LayoutPlan, EmitError> {
    let version = input.version;
    let (static_base, high_base) = version.default_region_bases();

    let mut image = vec![0u8; HEADER_SIZE];

    let globals_addr = image.len() as u16;
    for &value in &input.globals {
        image.push((value >> 8) as u8);
        image.push(value as u8);
    }
    debug_assert_eq!(image.len() - globals_addr as usize, GLOBALS_BYTES);

    let object_table_addr = image.len() as u16;
    let object_region = object_table::build(input)?;
    image.extend_from_slice(&object_region.bytes);

    // Dynamic memory ends at static_base (spec §3); the object table must
    // fit ahead of it, and the dictionary — the first static-memory table —
    // starts exactly there, not wherever the object table happened to end.
    if image.len() > static_base as usize {
        return Err(EmitError::MemoryLayoutOverflow {
            what: "dynamic memory (globals + object table)".into(),
            value: image.len() as u64,
        });
    }
    image.resize(static_base as usize, 0);

    let dictionary_addr = image.len() as u16;
    let dictionary_table = dictionary::build_table(input)?;
    image.extend_from_slice(&dictionary_table);

    // Non-goal stub: no abbreviation compression, so the header's
    // abbreviations pointer just targets the dictionary (spec §4.6).
    let abbreviations_addr = dictionary_addr;

    if image.len() > high_base as usize {
        return Err(EmitError::MemoryLayoutOverflow {
            what: "static memory (dictionary)".into(),
            value: image.len() as u64,
        });
    }
    image.resize(high_base as usize, 0);

    let mut string_addresses = IndexMap::new();
    for entry in &input.strings {
        if image.len() % 2 != 0 {
            image.push(0);
        }
        let address = image.len() as u32;
        string_addresses.insert(entry.id, address);
        let encoded = crate::text::encode(&entry.content)?;
        image.extend_from_slice(&encoded);
    }

    let code_base = image.len() as u32;
    image.extend_from_slice(&input.code_image.bytes);
    let start_routine_address = code_base + input.code_image.start_routine_offset;

    let scale = version.file_length_scale() as usize;
    if image.len() % scale != 0 {
        image.resize(image.len() + (scale - image.len() % scale), 0);
    }

    log::debug!(
        "layout: static_base=0x{:04x} high_base=0x{:04x} object_table=0x{:04x} dictionary=0x{:04x} pc=0x{:04x} total={} bytes",
        static_base,
        high_base,
        object_table_addr,
        dictionary_addr,
        start_routine_address,
        image.len()
    );

    // Pack-and-validate now so alignment/overflow failures abort emission
    // before any header bytes are written (spec §4.5 failure model:
    // single-shot, no partial image).
    address::pack_routine(start_routine_address, version)?;

    Ok(LayoutPlan {
        version,
        static_base,
        high_base,
        globals_addr,
        object_table_addr,
        dictionary_addr,
        abbreviations_addr,
        start_routine_address,
        string_addresses,
        image,
    })
}
