//! Address Packer (spec §4.4).
//!
//! Grounded on the packing arithmetic inlined in
//! `codegen_headers.rs::resolve_fixup`'s `ReferenceType::StringRef` /
//! `RoutineCall` arms, pulled out into standalone pure functions per
//! DESIGN NOTES §9.

use crate::error::EmitError;
use crate::version::ZMachineVersion;

/// Pack a byte-exact routine address into its 16-bit packed form.
pub fn pack_routine(address: u32, version: ZMachineVersion) -> Result<u16, EmitError> {
    pack(address, version.routine_packing_divisor())
}

/// Pack a byte-exact string address into its 16-bit packed form.
pub fn pack_string(address: u32, version: ZMachineVersion) -> Result<u16, EmitError> {
    pack(address, version.string_packing_divisor())
}

fn pack(address: u32, divisor: u32) -> Result<u16, EmitError> {
    if address % divisor != 0 {
        return Err(EmitError::AddressAlignment {
            routine_offset: address,
            divisor,
        });
    }
    let packed = address / divisor;
    if packed > 0xFFFF {
        return Err(EmitError::MemoryLayoutOverflow {
            what: "packed address".into(),
            value: packed as u64,
        });
    }
    Ok(packed as u16)
}

/// Unpack a routine's packed address back to a byte address.
pub fn unpack_routine(packed: u16, version: ZMachineVersion) -> u32 {
    packed as u32 * version.routine_packing_divisor()
}

/// Unpack a string's packed address back to a byte address.
pub fn unpack_string(packed: u16, version: ZMachineVersion) -> u32 {
    packed as u32 * version.string_packing_divisor()
}
