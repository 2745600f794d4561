//! Dictionary Encoder (spec §4.2).
//!
//! Grounded on `codegen_strings.rs::{generate_dictionary_space,
//! encode_word_to_zchars}`, generalized from the teacher's v3-only,
//! zero-separator stub to the version-scaled entry width and real
//! separator bytes spec.md §4.2 requires.

use std::collections::BTreeMap;

use crate::error::EmitError;
use crate::model::{DictionaryWord, EmitterInput};
use crate::version::ZMachineVersion;

const PAD: u8 = 5;

/// Normalize, encode, sort, and lay out the dictionary table.
///
/// Returns the fully encoded table bytes, ready to be appended to the
/// layout's dictionary region.
pub fn build_table(input: &EmitterInput) -> Result<Vec<u8>, EmitError> {
    let version = input.version;
    let separators = input.separator_bytes();

    // Z-word bytes -> coalesced 3-byte data (spec: "Duplicate encoded keys
    // coalesce; their data bytes are OR-combined"). BTreeMap gives us the
    // ascending sort over the raw Z-word byte sequence for free.
    let mut entries: BTreeMap<Vec<u8>, [u8; 3]> = BTreeMap::new();

    for word in &input.dictionary_words {
        let key = encode_word(word, version)?;
        entries
            .entry(key)
            .and_modify(|data| {
                for i in 0..3 {
                    data[i] |= word.data[i];
                }
            })
            .or_insert(word.data);
    }

    let entry_length = version.dictionary_entry_length();
    let entry_count = entries.len();

    let mut table = Vec::new();
    table.push(separators.len() as u8);
    table.extend_from_slice(separators);
    table.push(entry_length as u8);

    // Signed big-endian entry count; positive means sorted (spec §4.2).
    let count = entry_count as i16;
    table.push((count >> 8) as u8);
    table.push(count as u8);

    for (zword, data) in &entries {
        table.extend_from_slice(zword);
        table.extend_from_slice(data);
    }

    log::debug!(
        "dictionary: {} entries, {} bytes/entry, {} separators",
        entry_count,
        entry_length,
        separators.len()
    );

    Ok(table)
}

/// Normalize one word to its fixed-length Z-word (spec §4.2): lowercase,
/// truncate to the version's Z-character budget, pad with Z-char 5, no
/// ZSCII escapes permitted.
fn encode_word(word: &DictionaryWord, version: ZMachineVersion) -> Result<Vec<u8>, EmitError> {
    let lower = word.word.to_lowercase();
    let mut zchars = Vec::new();

    for ch in lower.chars() {
        push_restricted(ch, &mut zchars, &word.word)?;
    }

    let max_zchars = version.dictionary_word_zchars();
    zchars.truncate(max_zchars);
    while zchars.len() < max_zchars {
        zchars.push(PAD);
    }

    let mut bytes = Vec::with_capacity(version.dictionary_word_bytes());
    let mut i = 0;
    while i < zchars.len() {
        let z1 = zchars[i];
        let z2 = zchars[i + 1];
        let z3 = zchars[i + 2];
        let mut value = ((z1 as u16) << 10) | ((z2 as u16) << 5) | (z3 as u16);
        if i + 3 >= zchars.len() {
            value |= 0x8000;
        }
        bytes.push((value >> 8) as u8);
        bytes.push(value as u8);
        i += 3;
    }

    Ok(bytes)
}

/// Like `text::push_char` but rejects anything requiring a ZSCII escape
/// (spec §4.2: "a word containing unrepresentable characters fails with
/// `EncodingUnsupported`").
fn push_restricted(ch: char, zchars: &mut Vec<u8>, original: &str) -> Result<(), EmitError> {
    match ch {
        ' ' => zchars.push(0),
        'a'..='z' => zchars.push(ch as u8 - b'a' + 6),
        '0'..='9' => {
            zchars.push(5);
            zchars.push(ch as u8 - b'0' + 8);
        }
        '.' => zchar_pair(zchars, 18),
        ',' => zchar_pair(zchars, 19),
        '!' => zchar_pair(zchars, 20),
        '?' => zchar_pair(zchars, 21),
        '_' => zchar_pair(zchars, 22),
        '#' => zchar_pair(zchars, 23),
        '\'' => zchar_pair(zchars, 24),
        '"' => zchar_pair(zchars, 25),
        '/' => zchar_pair(zchars, 26),
        '\\' => zchar_pair(zchars, 27),
        '-' => zchar_pair(zchars, 28),
        ':' => zchar_pair(zchars, 29),
        '(' => zchar_pair(zchars, 30),
        ')' => zchar_pair(zchars, 31),
        '\n' => zchar_pair(zchars, 7),
        _ => {
            return Err(EmitError::EncodingUnsupported {
                word: original.to_string(),
            })
        }
    }
    Ok(())
}

fn zchar_pair(zchars: &mut Vec<u8>, index: u8) {
    zchars.push(5);
    zchars.push(index);
}
