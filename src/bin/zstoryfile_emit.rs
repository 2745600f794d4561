// zstoryfile-emit - minimal CLI wrapper around the story-file emitter
//
// The real `build` pipeline named in spec.md §6 (ZIL lexer/parser, semantic
// analyzer, ZAP codegen, assembler) is out of scope for this crate; those
// components are external collaborators that populate an `EmitterInput`
// before handing it to `StoryFileEmitter`. This binary exists only to
// exercise the emitter end to end, the way `src/bin/grue_compiler.rs` does
// for the teacher's full pipeline.

use std::env;
use std::fs;
use std::process;

use zstoryfile::model::{CodeImage, EmitterInput};
use zstoryfile::version::ZMachineVersion;
use zstoryfile::StoryFileEmitter;

fn main() {
    if let Ok(level) = env::var("ZIL_LOG_LEVEL") {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", level);
        }
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut output_file = "a.z3".to_string();
    let mut version = ZMachineVersion::V3;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: -o requires a filename");
                    process::exit(1);
                }
                output_file = args[i + 1].clone();
                i += 2;
            }
            "--version" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --version requires 3..8");
                    process::exit(1);
                }
                version = match args[i + 1].parse::<u8>().ok().and_then(|v| ZMachineVersion::from_u8(v).ok()) {
                    Some(v) => v,
                    None => {
                        eprintln!("Error: unsupported version '{}'", args[i + 1]);
                        process::exit(1);
                    }
                };
                i += 2;
            }
            other => {
                eprintln!("Warning: ignoring unrecognized argument '{}'", other);
                i += 1;
            }
        }
    }

    let input = EmitterInput {
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
        serial: None,
    };

    match StoryFileEmitter::new().emit(&input) {
        Ok(output) => {
            if !output.warnings.is_empty() {
                for warning in &output.warnings {
                    eprintln!("warning: {}", warning);
                }
            }
            if let Err(e) = fs::write(&output_file, &output.image) {
                eprintln!("Error writing '{}': {}", output_file, e);
                process::exit(1);
            }
            println!("Wrote {} ({} bytes)", output_file, output.image.len());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
