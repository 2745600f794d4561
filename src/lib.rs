//! Memory Layout & Story-File Emitter for the Z-Machine.
//!
//! Takes a populated program model (objects, globals, dictionary, strings,
//! assembled routine bytecode) and emits a byte-exact Z-Machine story file
//! whose header, object table, property tables, dictionary, packed
//! strings, code image, and checksum all agree with the Z-Machine
//! Standard (versions 3 through 8).
//!
//! The ZIL/ZAP frontend, instruction encoder, interpreter, and CLI
//! diagnostics formatter are external collaborators and out of scope for
//! this crate — see `model::EmitterInput` for the contract they populate.

pub mod address;
pub mod dictionary;
pub mod emitter;
pub mod error;
pub mod header;
pub mod layout;
pub mod model;
pub mod object_table;
pub mod text;
pub mod validator;
pub mod version;

pub use emitter::{EmitOutput, StoryFileEmitter};
pub use error::EmitError;
pub use model::EmitterInput;
pub use version::ZMachineVersion;
