//! Top-level orchestrator (spec §2: "Control flow is straight-line").
//!
//! Grounded on `grue_compiler::mod.rs::GrueCompiler::compile`'s
//! phase-sequenced `Result`-chaining style — each phase below returns
//! early on its own error type, matching spec §4's "Planner → encoders →
//! header(1st) → region concatenation → header(2nd, corrected) →
//! checksum patch → optional Validator."

use crate::error::EmitError;
use crate::header;
use crate::layout;
use crate::model::EmitterInput;
use crate::validator::{self, ValidationWarning};

pub struct EmitOutput {
    pub image: Vec<u8>,
    pub warnings: Vec<ValidationWarning>,
}

/// A single-threaded, deterministic, non-suspending transformer from a
/// populated program model to a byte-exact story file (spec §5: no I/O, no
/// blocking, no shared mutable state — trivially safe to run many instances
/// in parallel on distinct inputs).
#[derive(Default)]
pub struct StoryFileEmitter;

impl StoryFileEmitter {
    pub fn new() -> Self {
        StoryFileEmitter
    }

    pub fn emit(&self, input: &EmitterInput) -> Result<EmitOutput, EmitError> {
        log::info!("emitting story file for {}", input.version);

        let plan = layout::plan(input)?;
        let image = header::finalize(plan, input)?;
        let warnings = validator::validate(&image, input.version);

        if warnings.is_empty() {
            log::info!("emitted {} bytes, validator clean", image.len());
        } else {
            log::warn!("emitted {} bytes with {} validator warnings", image.len(), warnings.len());
        }

        Ok(EmitOutput { image, warnings })
    }
}
