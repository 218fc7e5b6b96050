// crates/toolbind-protoc/src/commands/tests.rs
// ============================================================================
// Module: Generation Command Unit Tests
// Description: Audited generate, write, check and inspect runs.
// Purpose: Validate all-or-nothing output and the audit event sequence.
// Dependencies: proptest, tempfile, toolbind-config, toolbind-core
// ============================================================================

//! ## Overview
//! Drives [`GenerationRun`] over the core fixtures with a recording sink.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_docs_in_private_items,
    reason = "Test-only assertions use panic-based helpers for clarity."
)]

use std::sync::Arc;
use std::sync::Mutex;

use proptest::prelude::*;
use toolbind_core::FileDescriptor;
use toolbind_core::fixtures;

use super::*;

#[derive(Clone, Default)]
struct RecordingSink {
    events: Arc<Mutex<Vec<GenerationAuditEvent>>>,
}

impl RecordingSink {
    fn names(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|event| event.event).collect()
    }
}

impl AuditSink for RecordingSink {
    fn record(&self, event: &GenerationAuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

fn run(mode: RunMode) -> (GenerationRun, RecordingSink) {
    let sink = RecordingSink::default();
    let run = GenerationRun::with_audit(ToolbindConfig::default(), mode, Box::new(sink.clone()));
    (run, sink)
}

fn all_files() -> Vec<String> {
    vec![
        fixtures::CATALOG_FILE.to_string(),
        fixtures::INVOICE_FILE.to_string(),
        fixtures::TREE_FILE.to_string(),
    ]
}

#[test]
fn select_files_defaults_to_files_with_services() {
    let mut set = fixtures::combined_set();
    set.add_file(FileDescriptor::new("types/only.proto", "types"));
    assert_eq!(select_files(&set, &[]), all_files());
    assert_eq!(select_files(&set, &["types/only.proto".to_string()]), vec!["types/only.proto"]);
}

#[test]
fn read_bounded_rejects_oversized_input() {
    assert_eq!(read_bounded(&b"abcd"[..], 4).unwrap(), b"abcd");
    let err = read_bounded(&b"abcde"[..], 4).unwrap_err();
    assert_eq!(err.to_string(), "decode error: input exceeds 4 bytes");
}

#[test]
fn generation_records_start_and_each_file() {
    let (run, sink) = run(RunMode::Generate);
    let generated = run.generate(&fixtures::combined_set(), &all_files()).unwrap();
    assert_eq!(generated.len(), 3);
    assert_eq!(
        sink.names(),
        vec!["generation_started", "file_generated", "file_generated", "file_generated"]
    );
}

#[test]
fn failing_generation_writes_nothing_and_records_failure() {
    let dir = tempfile::tempdir().unwrap();
    let (run, sink) = run(RunMode::Generate);
    let files = vec![fixtures::CATALOG_FILE.to_string(), "missing.proto".to_string()];
    let err = run.write(&fixtures::combined_set(), &files, dir.path()).unwrap_err();

    assert_eq!(err.to_string(), "generation error: unknown file: missing.proto");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    assert_eq!(sink.names(), vec!["generation_started", "generation_failed"]);
}

#[test]
fn check_passes_after_write_and_reports_drift_after_edits() {
    let dir = tempfile::tempdir().unwrap();
    let set = fixtures::combined_set();
    let (writer, _) = run(RunMode::Generate);
    let written = writer.write(&set, &all_files(), dir.path()).unwrap();
    assert_eq!(written[1].name, "invoice/v1/invoice_agent_tools.rs");

    let (checker, sink) = run(RunMode::Check);
    checker.check(&set, &all_files(), dir.path()).unwrap();

    std::fs::write(dir.path().join("catalog_agent_tools.rs"), "// edited\n").unwrap();
    std::fs::remove_file(dir.path().join("tree/v1/tree_agent_tools.rs")).unwrap();
    let err = checker.check(&set, &all_files(), dir.path()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "generated output is stale: catalog_agent_tools.rs (content differs), \
         tree/v1/tree_agent_tools.rs (missing)"
    );
    assert_eq!(sink.names().iter().filter(|name| **name == "drift_detected").count(), 2);
}

#[test]
fn inspect_lists_tools_with_schemas() {
    let (run, _) = run(RunMode::Inspect);
    let report = run.inspect(&fixtures::catalog_set(), &[fixtures::CATALOG_FILE.to_string()]).unwrap();
    let tools = report.as_array().unwrap();
    assert_eq!(tools.len(), 2);
    assert_eq!(tools[0]["tool"], json!("get_weather"));
    assert_eq!(tools[0]["input_required"], json!(true));
    assert_eq!(tools[0]["input_schema"]["required"], json!(["city"]));
    assert_eq!(tools[1]["tool"], json!("tool_catalog_list_forecasts"));
    assert_eq!(tools[1]["input_required"], json!(false));
    assert_eq!(tools[1]["artifact"], json!("catalog_agent_tools.rs"));
}

#[test]
fn inspect_keeps_field_declaration_order() {
    let (run, _) = run(RunMode::Inspect);
    let report = run.inspect(&fixtures::invoice_set(), &[fixtures::INVOICE_FILE.to_string()]).unwrap();
    let invoice = &report[0]["input_schema"]["properties"]["invoice"]["properties"];
    let names: Vec<&str> = invoice.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(names, vec!["customer_id", "line_items", "tags", "memo"]);

    let text = serde_json::to_string(&report).unwrap();
    let tags = text.find("\"tags\"").unwrap();
    let memo = text.find("\"memo\"").unwrap();
    assert!(tags < memo, "{text}");
}

proptest! {
    #[test]
    fn read_bounded_accepts_exactly_up_to_the_limit(
        bytes in proptest::collection::vec(any::<u8>(), 0 .. 64),
        limit in 0_usize .. 64,
    ) {
        let result = read_bounded(bytes.as_slice(), limit);
        if bytes.len() <= limit {
            prop_assert_eq!(result.unwrap(), bytes);
        } else {
            prop_assert!(matches!(result, Err(PluginError::Decode(_))));
        }
    }
}
