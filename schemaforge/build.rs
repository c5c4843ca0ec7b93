//! Compiles the test fixture schema so the round-trip tests exercise the
//! exact output of the compiler.

use schemaforge_codegen::{GeneratorConfig, compile_str};
use std::path::PathBuf;
use std::{env, fs};

const FIXTURE: &str = "tests/fixtures/model.json";
const LABEL: &str = "fixtures/model.json";
const OUTPUT: &str = "model.rs";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed={FIXTURE}");

    let text = fs::read_to_string(FIXTURE)?;
    let code = compile_str(&[(LABEL, &text)], &GeneratorConfig::default())?;

    let mut out_file = PathBuf::from(env::var("OUT_DIR")?);
    out_file.push(OUTPUT);
    fs::write(out_file, code)?;
    Ok(())
}
