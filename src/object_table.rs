//! Object & Property Emitter (spec §4.3).
//!
//! Grounded on `codegen_objects.rs::{generate_objects_to_space,
//! write_to_object_space}` for the record/table shapes and
//! `object_system.rs` for the standard attribute/property numbering this
//! crate inherits. Unlike the teacher, which interleaves "write the object
//! record, then later patch its `prop_table_addr` in already-emitted bytes"
//! with live `&mut self.object_space` writes, this module builds the whole
//! region (defaults + records + property tables) in one local buffer and
//! performs its own small two-pass patch before returning — content first,
//! addresses second — per DESIGN NOTES §9.

use crate::error::EmitError;
use crate::model::EmitterInput;
use crate::text;
use crate::version::ZMachineVersion;

/// The fully assembled object-space region: property defaults, object
/// records, and property tables, concatenated in spec §4.5 step 3's order.
/// Addresses inside are relative to the start of this region (i.e. relative
/// to the header's object-table-address field); the Layout Planner adds the
/// absolute base.
pub struct ObjectTableRegion {
    pub bytes: Vec<u8>,
}

pub fn build(input: &EmitterInput) -> Result<ObjectTableRegion, EmitError> {
    let version = input.version;

    if input.objects.len() as u32 > version.max_objects() {
        return Err(EmitError::MemoryLayoutOverflow {
            what: "object count".into(),
            value: input.objects.len() as u64,
        });
    }

    let valid_ids: std::collections::HashSet<u16> =
        input.objects.iter().map(|o| o.id).collect();
    for object in &input.objects {
        for (field, referenced) in [
            ("parent", object.parent),
            ("sibling", object.sibling),
            ("child", object.child),
        ] {
            if referenced != 0 && !valid_ids.contains(&referenced) {
                return Err(EmitError::InvalidObjectId {
                    object_id: object.id,
                    field,
                    referenced,
                });
            }
        }
    }

    let mut bytes = property_defaults(input, version);
    let records_base = bytes.len();
    let record_size = version.object_record_size();
    bytes.resize(records_base + input.objects.len() * record_size, 0);

    // First pass: write each object's static record fields (attributes,
    // parent/sibling/child); leave prop_table_addr as 0 for now.
    for (index, object) in input.objects.iter().enumerate() {
        write_record(&mut bytes, records_base + index * record_size, object, version);
    }

    // Second pass: emit each property table, word-aligning between tables,
    // then patch the address back into this object's record (spec §4.3:
    // "After emitting each object's table, the emitter patches that
    // object's `prop_table_addr` in the already-emitted object record").
    for (index, object) in input.objects.iter().enumerate() {
        if bytes.len() % 2 != 0 {
            bytes.push(0);
        }
        let table_addr = bytes.len();
        write_property_table(&mut bytes, object, version)?;

        let record_offset = records_base + index * record_size;
        let addr_offset = record_offset + record_size - 2;
        bytes[addr_offset] = (table_addr >> 8) as u8;
        bytes[addr_offset + 1] = table_addr as u8;
    }

    Ok(ObjectTableRegion { bytes })
}

fn property_defaults(input: &EmitterInput, version: ZMachineVersion) -> Vec<u8> {
    let count = version.max_properties() as usize;
    let mut defaults = vec![0u8; count * 2];
    if let Some(overrides) = &input.property_defaults {
        for (&number, &value) in overrides {
            if number == 0 || number as usize > count {
                continue;
            }
            let slot = (number as usize - 1) * 2;
            defaults[slot] = (value >> 8) as u8;
            defaults[slot + 1] = value as u8;
        }
    }
    defaults
}

fn write_record(
    bytes: &mut [u8],
    offset: usize,
    object: &crate::model::ObjectModel,
    version: ZMachineVersion,
) {
    let attr_bytes = version.attribute_bytes();
    for byte_index in 0..attr_bytes {
        let mut byte = 0u8;
        for bit_in_byte in 0..8u32 {
            let attribute_number = byte_index as u32 * 8 + bit_in_byte;
            if object.attributes & (1u64 << attribute_number) != 0 {
                byte |= 1 << (7 - bit_in_byte);
            }
        }
        bytes[offset + byte_index] = byte;
    }

    let rel_offset = offset + attr_bytes;
    if version == ZMachineVersion::V3 {
        bytes[rel_offset] = object.parent as u8;
        bytes[rel_offset + 1] = object.sibling as u8;
        bytes[rel_offset + 2] = object.child as u8;
    } else {
        bytes[rel_offset] = (object.parent >> 8) as u8;
        bytes[rel_offset + 1] = object.parent as u8;
        bytes[rel_offset + 2] = (object.sibling >> 8) as u8;
        bytes[rel_offset + 3] = object.sibling as u8;
        bytes[rel_offset + 4] = (object.child >> 8) as u8;
        bytes[rel_offset + 5] = object.child as u8;
    }
    // prop_table_addr (final 2 bytes) left as 0x0000, patched later.
}

fn write_property_table(
    bytes: &mut Vec<u8>,
    object: &crate::model::ObjectModel,
    version: ZMachineVersion,
) -> Result<(), EmitError> {
    let name_words = text::encode(&object.short_name)?;
    bytes.push((name_words.len() / 2) as u8);
    bytes.extend_from_slice(&name_words);

    let mut seen = std::collections::HashSet::new();
    for (number, _) in &object.properties {
        if !seen.insert(*number) {
            return Err(EmitError::DuplicatePropertyNumber {
                object_id: object.id,
                property: *number,
            });
        }
    }

    let mut properties: Vec<(&u8, &Vec<u8>)> =
        object.properties.iter().map(|(n, d)| (n, d)).collect();
    properties.sort_by(|a, b| b.0.cmp(a.0));

    let max_size = version.max_property_size();
    for (&number, data) in properties {
        if data.len() > max_size || data.is_empty() {
            return Err(EmitError::PropertyTooLarge {
                object_id: object.id,
                property: number,
                size: data.len(),
                max: max_size,
            });
        }

        match version {
            ZMachineVersion::V3 => {
                bytes.push((((data.len() - 1) as u8) << 5) | number);
            }
            _ => {
                if data.len() <= 2 {
                    bytes.push((((data.len() - 1) as u8) << 6) | number);
                } else {
                    bytes.push(0x80 | number);
                    let size_field = if data.len() == 64 { 0 } else { data.len() as u8 };
                    bytes.push(0x80 | size_field);
                }
            }
        }
        bytes.extend_from_slice(data);
    }

    bytes.push(0); // terminator
    log::debug!(
        "object {} property table: {} properties, {} bytes",
        object.id,
        object.properties.len(),
        name_words.len() + 1
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CodeImage, ObjectModel};

    fn input_with(objects: Vec<ObjectModel>, version: ZMachineVersion) -> EmitterInput {
        EmitterInput {
            version,
            objects,
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
            serial: None,
        }
    }

    #[test]
    fn lamp_object_matches_scenario_s2() {
        let obj = ObjectModel::new(1, "lamp").with_property(17, vec![0x01, 0x02]);
        let input = input_with(vec![obj], ZMachineVersion::V5);
        let region = build(&input).unwrap();

        let defaults_size = ZMachineVersion::V5.max_properties() as usize * 2;
        let record_size = ZMachineVersion::V5.object_record_size();
        let table_addr_field = &region.bytes[defaults_size + record_size - 2..defaults_size + record_size];
        let table_addr = ((table_addr_field[0] as usize) << 8) | table_addr_field[1] as usize;

        let table = &region.bytes[table_addr..];
        assert_eq!(table[0], 2); // "lamp" -> 4 bytes = 2 words
        assert_eq!(table[5], 0x51); // ((2-1)<<6)|17
        assert_eq!(table[6], 0x01);
        assert_eq!(table[7], 0x02);
        assert_eq!(table[8], 0x00); // terminator
    }

    #[test]
    fn rejects_dangling_parent_reference() {
        let mut obj = ObjectModel::new(1, "thing");
        obj.parent = 99;
        let input = input_with(vec![obj], ZMachineVersion::V3);
        assert!(matches!(
            build(&input),
            Err(EmitError::InvalidObjectId { .. })
        ));
    }

    #[test]
    fn rejects_oversized_v3_property() {
        let obj = ObjectModel::new(1, "thing").with_property(5, vec![0u8; 9]);
        let input = input_with(vec![obj], ZMachineVersion::V3);
        assert!(matches!(
            build(&input),
            Err(EmitError::PropertyTooLarge { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_property_number() {
        let obj = ObjectModel::new(1, "thing")
            .with_property(5, vec![1])
            .with_property(5, vec![2]);
        let input = input_with(vec![obj], ZMachineVersion::V3);
        assert!(matches!(
            build(&input),
            Err(EmitError::DuplicatePropertyNumber { .. })
        ));
    }

    #[test]
    fn properties_emitted_in_descending_order() {
        let obj = ObjectModel::new(1, "thing")
            .with_property(3, vec![1])
            .with_property(10, vec![2])
            .with_property(1, vec![3]);
        let input = input_with(vec![obj], ZMachineVersion::V3);
        let region = build(&input).unwrap();

        let defaults_size = ZMachineVersion::V3.max_properties() as usize * 2;
        let record_size = ZMachineVersion::V3.object_record_size();
        let table_addr_field = &region.bytes[defaults_size + record_size - 2..defaults_size + record_size];
        let table_addr = ((table_addr_field[0] as usize) << 8) | table_addr_field[1] as usize;
        let table = &region.bytes[table_addr..];

        let name_len_words = table[0] as usize;
        let mut cursor = 1 + name_len_words * 2;
        let mut seen_numbers = Vec::new();
        loop {
            let header = table[cursor];
            if header == 0 {
                break;
            }
            let number = header & 0x1F;
            let size = ((header >> 5) + 1) as usize;
            seen_numbers.push(number);
            cursor += 1 + size;
        }
        assert_eq!(seen_numbers, vec![10, 3, 1]);
    }
}
