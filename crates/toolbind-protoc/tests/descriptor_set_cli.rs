// crates/toolbind-protoc/tests/descriptor_set_cli.rs
// ============================================================================
// Module: Descriptor Set CLI Tests
// Description: generate, check and inspect against serialized descriptor sets.
// Purpose: Exercise the binary the way build tooling invokes it.
// Dependencies: prost-types, serde_json, tempfile, toolbind-protoc
// ============================================================================

//! ## Overview
//! Writes a `FileDescriptorSet` to a temporary directory and drives both the
//! library commands and the compiled binary over it.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_docs_in_private_items,
    reason = "Test-only assertions use panic-based helpers for clarity."
)]

mod common;

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Stdio;

use prost::Message;
use prost_types::compiler::CodeGeneratorResponse;
use serde_json::Value;
use toolbind_protoc::PluginError;
use toolbind_protoc::commands;

const BIN: &str = env!("CARGO_BIN_EXE_protoc-gen-agent-tools");

fn write_descriptor_set(dir: &Path) -> PathBuf {
    let path = dir.join("descriptors.pb");
    std::fs::write(&path, common::descriptor_set_bytes()).unwrap();
    path
}

fn quiet_config(dir: &Path) -> PathBuf {
    let path = dir.join("toolbind.toml");
    std::fs::write(&path, "[audit]\nsink = \"off\"\n").unwrap();
    path
}

fn cli(args: &[&str]) -> std::process::Output {
    Command::new(BIN).args(args).env_remove("TOOLBIND_CONFIG").output().unwrap()
}

#[test]
fn descriptor_sets_decode_and_default_to_service_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_descriptor_set(dir.path());
    let set = commands::read_descriptor_set(&path, 1 << 20).unwrap();
    assert_eq!(
        commands::select_files(&set, &[]),
        vec!["catalog.proto".to_string(), "invoice/v1/invoice.proto".to_string()]
    );
    assert!(set.message("types.v1.Counter").is_some());
}

#[test]
fn oversized_and_garbage_descriptor_sets_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_descriptor_set(dir.path());
    let err = commands::read_descriptor_set(&path, 16).unwrap_err();
    assert!(matches!(err, PluginError::Decode(_)));

    let garbage = dir.path().join("garbage.pb");
    std::fs::write(&garbage, [0xff_u8, 0xff, 0xff]).unwrap();
    assert!(matches!(commands::read_descriptor_set(&garbage, 1024), Err(PluginError::Decode(_))));

    let missing = dir.path().join("missing.pb");
    assert!(matches!(commands::read_descriptor_set(&missing, 1024), Err(PluginError::Io(_))));
}

#[test]
fn generate_then_check_round_trips_through_the_binary() {
    let dir = tempfile::tempdir().unwrap();
    let descriptors = write_descriptor_set(dir.path());
    let config = quiet_config(dir.path());
    let out = dir.path().join("gen");
    let base = [
        "--descriptor-set",
        descriptors.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
    ];

    let generate = cli(&[&["generate"][..], &base[..]].concat());
    assert!(generate.status.success(), "{}", String::from_utf8_lossy(&generate.stderr));
    assert!(out.join("catalog_agent_tools.rs").is_file());
    assert!(out.join("invoice/v1/invoice_agent_tools.rs").is_file());
    assert!(!out.join("types/v1/types_agent_tools.rs").exists());

    let check = cli(&[&["check"][..], &base[..]].concat());
    assert!(check.status.success());

    std::fs::write(out.join("catalog_agent_tools.rs"), "// stale\n").unwrap();
    let check = cli(&[&["check"][..], &base[..]].concat());
    assert!(!check.status.success());
    let stderr = String::from_utf8_lossy(&check.stderr);
    assert!(stderr.contains("generated output is stale: catalog_agent_tools.rs (content differs)"));
}

#[test]
fn inspect_prints_tools_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let descriptors = write_descriptor_set(dir.path());
    let config = quiet_config(dir.path());
    let output = cli(&[
        "inspect",
        "--descriptor-set",
        descriptors.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--file",
        "invoice/v1/invoice.proto",
    ]);
    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    let tools = report.as_array().unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["tool"], "create_invoice");
    assert_eq!(tools[0]["input_schema"]["properties"]["invoice"]["type"], "object");
}

#[test]
fn plugin_mode_speaks_protoc_on_stdio() {
    let mut child = Command::new(BIN)
        .env_remove("TOOLBIND_CONFIG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    let request = common::request_bytes(Some("audit=off"), &["catalog.proto"]);
    child.stdin.take().unwrap().write_all(&request).unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    let response = CodeGeneratorResponse::decode(output.stdout.as_slice()).unwrap();
    assert_eq!(response.error, None);
    assert_eq!(response.file[0].name.as_deref(), Some("catalog_agent_tools.rs"));
}

#[test]
fn unknown_requested_files_fail_with_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let descriptors = write_descriptor_set(dir.path());
    let config = quiet_config(dir.path());
    let output = cli(&[
        "generate",
        "--descriptor-set",
        descriptors.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--out",
        dir.path().join("gen").to_str().unwrap(),
        "--file",
        "nope.proto",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown file: nope.proto"));
    assert!(!dir.path().join("gen").exists());
}
