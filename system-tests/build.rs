// system-tests/build.rs
// ============================================================================
// Module: Fixture Binding Generation
// Description: Build script rendering bindings for the fixture schemas.
// Purpose: Compile generated code exactly as consumers include it.
// Dependencies: toolbind-core
// ============================================================================

//! ## Overview
//! Runs the core generator over the catalog, invoice and tree fixtures and
//! writes each artifact under `OUT_DIR` at its relative output path.

#![allow(clippy::print_stdout, reason = "Cargo reads build directives from stdout.")]

use std::env;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

use toolbind_core::Generator;
use toolbind_core::fixtures;

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo::rerun-if-changed=build.rs");
    println!("cargo::rerun-if-changed=../crates/toolbind-core/src");

    let files = [fixtures::CATALOG_FILE, fixtures::INVOICE_FILE, fixtures::TREE_FILE]
        .map(str::to_string);
    let generated = Generator::default().generate(&fixtures::combined_set(), &files)?;

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    for file in generated {
        let dest = out_dir.join(&file.name);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&dest, file.content)?;
    }
    Ok(())
}
