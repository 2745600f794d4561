//! Integration scenarios S1-S6 from spec.md §8, plus the cross-cutting
//! invariants those scenarios exist to pin down.

use zstoryfile::error::EmitError;
use zstoryfile::model::{CodeImage, DictionaryWord, EmitterInput, ObjectModel, StringEntry};
use zstoryfile::version::ZMachineVersion;
use zstoryfile::StoryFileEmitter;

fn empty_input(version: ZMachineVersion) -> EmitterInput {
    EmitterInput {
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
fn s1_empty_model_v3() {
    let input = empty_input(ZMachineVersion::V3);
    let output = StoryFileEmitter::new().emit(&input).unwrap();

    assert!(output.image.len() >= 64);
    assert_eq!(output.image.len(), 0x8000); // zeros clear to high_base
    assert!(output.warnings.is_empty());

    let mut expected: u32 = 0;
    for (i, &b) in output.image.iter().enumerate() {
        if i != 28 && i != 29 {
            expected = expected.wrapping_add(b as u32);
        }
    }
    let stored = ((output.image[28] as u16) << 8) | output.image[29] as u16;
    assert_eq!(stored, (expected & 0xFFFF) as u16);
}

#[test]
fn s2_lamp_object_v5() {
    let mut input = empty_input(ZMachineVersion::V5);
    input.objects = vec![ObjectModel::new(1, "lamp").with_property(17, vec![0x01, 0x02])];
    let output = StoryFileEmitter::new().emit(&input).unwrap();
    assert!(output.warnings.is_empty());

    let object_table_addr = ((output.image[10] as usize) << 8) | output.image[11] as usize;
    let defaults_size = ZMachineVersion::V5.max_properties() as usize * 2;
    let record_size = ZMachineVersion::V5.object_record_size();
    let addr_field_offset = object_table_addr + defaults_size + record_size - 2;
    let table_addr = ((output.image[addr_field_offset] as usize) << 8)
        | output.image[addr_field_offset + 1] as usize;

    let table = &output.image[table_addr..];
    assert_eq!(table[0], 2); // "lamp" -> 2 words
    assert_eq!(table[5], 0x51); // ((2-1)<<6)|17
    assert_eq!(table[6], 0x01);
    assert_eq!(table[7], 0x02);
    assert_eq!(table[8], 0x00);
}

#[test]
fn s3_dictionary_go_north_go() {
    let mut input = empty_input(ZMachineVersion::V5);
    input.dictionary_words = vec!["go", "north", "go"]
        .into_iter()
        .map(DictionaryWord::new)
        .collect();
    let output = StoryFileEmitter::new().emit(&input).unwrap();
    assert!(output.warnings.is_empty());

    let dictionary_addr = ((output.image[8] as usize) << 8) | output.image[9] as usize;
    let table = &output.image[dictionary_addr..];
    assert_eq!(table[0] as usize, 7); // default separators " .,?!;:"
    assert_eq!(table[1 + 7], 9); // v5 entry length
    let count = ((table[2 + 7] as u16) << 8) | table[3 + 7] as u16;
    assert_eq!(count, 2); // "go" deduped

    let entries_start = 4 + 7;
    let entry_len = 9;
    let go = &table[entries_start..entries_start + 6];
    let north = &table[entries_start + entry_len..entries_start + entry_len + 6];
    assert!(go < north, "'go' must sort before 'north'");
}

#[test]
fn s4_two_strings_addresses_are_contiguous() {
    let mut input = empty_input(ZMachineVersion::V3);
    input.strings = vec![
        StringEntry {
            id: 1,
            content: "hi".into(),
        },
        StringEntry {
            id: 2,
            content: "".into(),
        },
    ];
    let output = StoryFileEmitter::new().emit(&input).unwrap();
    let high_base = ((output.image[4] as usize) << 8) | output.image[5] as usize;

    let hi_bytes = &output.image[high_base..high_base + 2];
    let hi_word = ((hi_bytes[0] as u16) << 8) | hi_bytes[1] as u16;
    assert_ne!(hi_word & 0x8000, 0);

    let empty_bytes = &output.image[high_base + 2..high_base + 4];
    assert_eq!(empty_bytes, &[0x80, 0x00]);
}

#[test]
fn s5_v3_packed_start_pc() {
    let mut input = empty_input(ZMachineVersion::V3);
    input.code_image = CodeImage {
        bytes: vec![0u8; 8],
        start_routine_offset: 4,
    };
    let output = StoryFileEmitter::new().emit(&input).unwrap();
    assert_eq!(output.image[6], 0x40);
    assert_eq!(output.image[7], 0x02);
}

#[test]
fn s6_v8_overflow_fails_emission() {
    let mut input = empty_input(ZMachineVersion::V8);
    // high_base for v8 is 0xF000; need (high_base + offset) / 8 > 0xFFFF.
    let needed = (0xFFFFu32 + 1) * 8 - 0xF000;
    input.code_image = CodeImage {
        bytes: vec![],
        start_routine_offset: needed,
    };
    let result = StoryFileEmitter::new().emit(&input);
    assert!(matches!(
        result,
        Err(EmitError::MemoryLayoutOverflow { .. })
    ));
}

#[test]
fn dictionary_with_single_word_round_trips() {
    let mut input = empty_input(ZMachineVersion::V3);
    input.dictionary_words = vec![DictionaryWord::new("lamp")];
    let output = StoryFileEmitter::new().emit(&input).unwrap();
    let dictionary_addr = ((output.image[8] as usize) << 8) | output.image[9] as usize;
    let table = &output.image[dictionary_addr..];
    let count = ((table[9] as u16) << 8) | table[10] as u16;
    assert_eq!(count, 1);
}

#[test]
fn object_with_63_properties_at_max_size_v5() {
    let mut obj = ObjectModel::new(1, "everything");
    for number in 1..=63u8 {
        obj = obj.with_property(number, vec![0xAB; 64]);
    }
    let mut input = empty_input(ZMachineVersion::V5);
    input.objects = vec![obj];
    let output = StoryFileEmitter::new().emit(&input).unwrap();
    assert!(output.warnings.is_empty());
}

#[test]
fn invalid_sibling_reference_fails_with_invalid_object_id() {
    let mut obj = ObjectModel::new(1, "thing");
    obj.sibling = 42;
    let mut input = empty_input(ZMachineVersion::V3);
    input.objects = vec![obj];
    let result = StoryFileEmitter::new().emit(&input);
    assert!(matches!(result, Err(EmitError::InvalidObjectId { .. })));
}
