// crates/toolbind-protoc/src/plugin/tests.rs
// ============================================================================
// Module: Protoc Plugin Unit Tests
// Description: Response shape for successful and failing requests.
// Purpose: Ensure failures surface in the response error, never as files.
// Dependencies: prost, prost-types, toolbind-config
// ============================================================================

//! ## Overview
//! Feeds encoded requests to [`respond`] and inspects the response.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_docs_in_private_items,
    reason = "Test-only assertions use panic-based helpers for clarity."
)]

use toolbind_config::AuditSinkKind;

use super::*;
use crate::request::RawDescriptorProto;
use crate::request::RawFieldDescriptorProto;
use crate::request::RawFieldMetadata;
use crate::request::RawFieldOptions;
use crate::request::RawFileDescriptorProto;
use crate::request::RawMethodDescriptorProto;
use crate::request::RawMethodOptions;
use crate::request::RawServiceDescriptorProto;
use crate::request::RawToolMetadata;

fn quiet() -> ToolbindConfig {
    let mut config = ToolbindConfig::default();
    config.audit.sink = AuditSinkKind::Off;
    config
}

fn echo_file() -> RawFileDescriptorProto {
    let text = RawFieldDescriptorProto {
        name: Some("text".to_string()),
        number: Some(1),
        label: Some(1),
        r#type: Some(9),
        type_name: None,
        options: Some(RawFieldOptions {
            field: Some(RawFieldMetadata {
                description: "Text to echo".to_string(),
                required: true,
                example: String::new(),
            }),
        }),
    };
    let echo = RawMethodDescriptorProto {
        name: Some("Echo".to_string()),
        input_type: Some(".echo.EchoRequest".to_string()),
        output_type: Some(".echo.EchoRequest".to_string()),
        options: Some(RawMethodOptions {
            tool: Some(RawToolMetadata {
                name: "echo".to_string(),
                description: "Echo text back.".to_string(),
            }),
        }),
        client_streaming: None,
        server_streaming: None,
    };
    RawFileDescriptorProto {
        name: Some("echo.proto".to_string()),
        package: Some("echo".to_string()),
        message_type: vec![RawDescriptorProto {
            name: Some("EchoRequest".to_string()),
            field: vec![text],
            nested_type: Vec::new(),
            options: None,
        }],
        service: vec![RawServiceDescriptorProto {
            name: Some("Echoer".to_string()),
            method: vec![echo],
        }],
    }
}

fn encoded(parameter: Option<&str>, files: Vec<&str>) -> Vec<u8> {
    RawCodeGeneratorRequest {
        file_to_generate: files.into_iter().map(str::to_string).collect(),
        parameter: parameter.map(str::to_string),
        proto_file: vec![echo_file()],
    }
    .encode_to_vec()
}

#[test]
fn successful_requests_return_one_file_per_input() {
    let response = respond(encoded(Some("audit=off"), vec!["echo.proto"]).as_slice(), &quiet());
    assert_eq!(response.error, None);
    assert_eq!(response.supported_features, Some(SUPPORTED_FEATURES));
    assert_eq!(response.file.len(), 1);
    assert_eq!(response.file[0].name.as_deref(), Some("echo_agent_tools.rs"));
    let content = response.file[0].content.as_deref().unwrap();
    assert!(content.contains("pub const ECHOER_ECHO_TOOL"));
    assert!(content.contains("\"echo requires input\""));
}

#[test]
fn parameters_override_the_output_suffix() {
    let response =
        respond(encoded(Some("audit=off,suffix=_tools.rs"), vec!["echo.proto"]).as_slice(), &quiet());
    assert_eq!(response.file[0].name.as_deref(), Some("echo_tools.rs"));
}

#[test]
fn generation_failures_become_response_errors() {
    let response = respond(encoded(Some("audit=off"), vec!["other.proto"]).as_slice(), &quiet());
    assert_eq!(response.error.as_deref(), Some("generation error: unknown file: other.proto"));
    assert!(response.file.is_empty());
    assert_eq!(response.supported_features, Some(SUPPORTED_FEATURES));
}

#[test]
fn bad_parameters_and_bytes_become_response_errors() {
    let response = respond(encoded(Some("colour=blue"), vec!["echo.proto"]).as_slice(), &quiet());
    assert!(response.error.unwrap().starts_with("config error: "));

    let response = respond(&[0xff_u8, 0xff, 0xff][..], &quiet());
    assert!(response.error.unwrap().starts_with("decode error: CodeGeneratorRequest"));
}

#[test]
fn oversized_requests_are_rejected() {
    let mut config = quiet();
    config.limits.max_request_bytes = 1024;
    let padding = "x".repeat(2048);
    let parameter = format!("audit=off,runtime_crate=::{padding}");
    let response = respond(encoded(Some(&parameter), vec!["echo.proto"]).as_slice(), &config);
    assert_eq!(response.error.as_deref(), Some("decode error: input exceeds 1024 bytes"));
}

#[test]
fn run_plugin_writes_an_encoded_response() {
    let mut output = Vec::new();
    run_plugin(encoded(Some("audit=off"), vec!["echo.proto"]).as_slice(), &mut output).unwrap();
    let response = CodeGeneratorResponse::decode(output.as_slice()).unwrap();
    assert_eq!(response.file.len(), 1);
}
