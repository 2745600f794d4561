//! The frozen program model the emitter borrows.
//!
//! Grounded on `grue_compiler::ir`'s role as the frozen intermediate
//! representation handed to codegen, and on `object_system::ComprehensiveObject`
//! for the object/property shape. Unlike the teacher's `ZMachineCodeGen`
//! (which interleaves building the model with emitting bytes), every type
//! here is plain, owned data populated once by the caller (the assembler)
//! before `StoryFileEmitter::emit` ever runs — the "explicit object builder
//! that takes an owned `ObjectModel` and returns it sealed" called for in
//! DESIGN NOTES §9.

use indexmap::IndexMap;

/// One object's static record plus its property table contents.
///
/// `parent`/`sibling`/`child` are object ids, 0 meaning "none" (spec §3).
/// `attributes` packs all attribute bits (32 for v3, 48 for v4+) into a u64;
/// only the low `version.attribute_bytes() * 8` bits are meaningful.
#[derive(Debug, Clone)]
pub struct ObjectModel {
    pub id: u16,
    pub parent: u16,
    pub sibling: u16,
    pub child: u16,
    pub attributes: u64,
    pub short_name: String,
    /// Property number -> payload bytes, in the order the caller added them.
    /// Kept as a plain sequence (not a map) so a repeated property number
    /// survives to be rejected by `object_table::build` rather than being
    /// silently overwritten (spec §4.3, §3 invariant "strictly descending",
    /// spec §7 `DuplicatePropertyNumber`).
    pub properties: Vec<(u8, Vec<u8>)>,
}

impl ObjectModel {
    pub fn new(id: u16, short_name: impl Into<String>) -> Self {
        ObjectModel {
            id,
            parent: 0,
            sibling: 0,
            child: 0,
            attributes: 0,
            short_name: short_name.into(),
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, number: u8, data: Vec<u8>) -> Self {
        self.properties.push((number, data));
        self
    }
}

/// A dictionary word plus its optional 3-byte payload (spec §3, §6).
#[derive(Debug, Clone)]
pub struct DictionaryWord {
    pub word: String,
    pub data: [u8; 3],
}

impl DictionaryWord {
    pub fn new(word: impl Into<String>) -> Self {
        DictionaryWord {
            word: word.into(),
            data: [0, 0, 0],
        }
    }

    pub fn with_data(word: impl Into<String>, data: [u8; 3]) -> Self {
        DictionaryWord {
            word: word.into(),
            data,
        }
    }
}

/// A string awaiting placement in high memory. `address` starts as `None`
/// and is filled in by the Layout Planner (spec §3: "placeholder at add-time;
/// overwritten with real address during high-memory emission").
#[derive(Debug, Clone)]
pub struct StringEntry {
    pub id: u32,
    pub content: String,
}

/// The assembler's finalized routine bytecode, already containing local-count
/// prologues (spec §1 out-of-scope contract: the assembler, not this crate,
/// produces these bytes).
#[derive(Debug, Clone)]
pub struct CodeImage {
    pub bytes: Vec<u8>,
    /// Byte offset of the start routine within `bytes`.
    pub start_routine_offset: u32,
}

/// Everything the emitter needs, populated once by the caller (spec §6).
#[derive(Debug, Clone)]
pub struct EmitterInput {
    pub version: crate::version::ZMachineVersion,
    pub objects: Vec<ObjectModel>,
    pub globals: [u16; 240],
    pub dictionary_words: Vec<DictionaryWord>,
    /// Input delimiter bytes recorded in the dictionary header (spec §4.2);
    /// defaults to `" .,?!;:"` when `None`.
    pub separators: Option<Vec<u8>>,
    pub strings: Vec<StringEntry>,
    pub code_image: CodeImage,
    pub property_defaults: Option<IndexMap<u8, u16>>,
    pub release_number: Option<u16>,
    pub serial: Option<[u8; 6]>,
}

impl EmitterInput {
    pub const DEFAULT_SEPARATORS: &'static [u8] = b" .,?!;:";

    pub fn separator_bytes(&self) -> &[u8] {
        self.separators
            .as_deref()
            .unwrap_or(Self::DEFAULT_SEPARATORS)
    }
}
