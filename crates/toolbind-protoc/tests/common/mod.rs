// crates/toolbind-protoc/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Raw protobuf descriptors mirroring the core fixtures.
// Purpose: Build encoded plugin requests and descriptor sets for tests.
// Dependencies: prost, toolbind-protoc
// ============================================================================

//! ## Overview
//! The builders here produce the wire form protoc would send for the catalog
//! and invoice schemas under `proto/`. Converted, they equal
//! `toolbind_core::fixtures::catalog_set` and `invoice_set`.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_docs_in_private_items,
    dead_code,
    reason = "Shared helpers are not used by every test binary."
)]

use prost::Message;
use toolbind_protoc::request::LABEL_REPEATED;
use toolbind_protoc::request::RawCodeGeneratorRequest;
use toolbind_protoc::request::RawDescriptorProto;
use toolbind_protoc::request::RawFieldDescriptorProto;
use toolbind_protoc::request::RawFieldMetadata;
use toolbind_protoc::request::RawFieldOptions;
use toolbind_protoc::request::RawFileDescriptorProto;
use toolbind_protoc::request::RawFileDescriptorSet;
use toolbind_protoc::request::RawMessageOptions;
use toolbind_protoc::request::RawMethodDescriptorProto;
use toolbind_protoc::request::RawMethodOptions;
use toolbind_protoc::request::RawServiceDescriptorProto;
use toolbind_protoc::request::RawToolMetadata;

pub const TYPE_DOUBLE: i32 = 1;
pub const TYPE_INT64: i32 = 3;
pub const TYPE_INT32: i32 = 5;
pub const TYPE_BOOL: i32 = 8;
pub const TYPE_STRING: i32 = 9;
pub const TYPE_MESSAGE: i32 = 11;
pub const TYPE_UINT32: i32 = 13;

// ============================================================================
// SECTION: Builders
// ============================================================================

pub fn scalar(name: &str, number: i32, code: i32) -> RawFieldDescriptorProto {
    RawFieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(1),
        r#type: Some(code),
        type_name: None,
        options: None,
    }
}

pub fn message_field(name: &str, number: i32, type_name: &str) -> RawFieldDescriptorProto {
    RawFieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..scalar(name, number, TYPE_MESSAGE)
    }
}

pub fn repeated(mut field: RawFieldDescriptorProto) -> RawFieldDescriptorProto {
    field.label = Some(LABEL_REPEATED);
    field
}

pub fn annotated(
    mut field: RawFieldDescriptorProto,
    description: &str,
    required: bool,
    example: &str,
) -> RawFieldDescriptorProto {
    field.options = Some(RawFieldOptions {
        field: Some(RawFieldMetadata {
            description: description.to_string(),
            required,
            example: example.to_string(),
        }),
    });
    field
}

pub fn message(name: &str, fields: Vec<RawFieldDescriptorProto>) -> RawDescriptorProto {
    RawDescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        nested_type: Vec::new(),
        options: None,
    }
}

pub fn method(name: &str, input: &str, output: &str) -> RawMethodDescriptorProto {
    RawMethodDescriptorProto {
        name: Some(name.to_string()),
        input_type: Some(input.to_string()),
        output_type: Some(output.to_string()),
        options: None,
        client_streaming: None,
        server_streaming: None,
    }
}

pub fn documented(
    mut method: RawMethodDescriptorProto,
    name: &str,
    description: &str,
) -> RawMethodDescriptorProto {
    method.options = Some(RawMethodOptions {
        tool: Some(RawToolMetadata {
            name: name.to_string(),
            description: description.to_string(),
        }),
    });
    method
}

// ============================================================================
// SECTION: Fixtures
// ============================================================================

pub fn catalog_file() -> RawFileDescriptorProto {
    RawFileDescriptorProto {
        name: Some("catalog.proto".to_string()),
        package: Some("catalog".to_string()),
        message_type: vec![
            message(
                "GetWeatherRequest",
                vec![
                    annotated(scalar("city", 1, TYPE_STRING), "City and optional units", true, ""),
                    annotated(
                        scalar("units", 2, TYPE_STRING),
                        "Unit system for temperatures",
                        false,
                        "metric",
                    ),
                ],
            ),
            message(
                "GetWeatherResponse",
                vec![scalar("summary", 1, TYPE_STRING), scalar("temperature", 2, TYPE_DOUBLE)],
            ),
            message(
                "ListForecastsRequest",
                vec![
                    annotated(scalar("days", 1, TYPE_INT32), "", false, "3"),
                    scalar("include_alerts", 2, TYPE_BOOL),
                ],
            ),
            message("ListForecastsResponse", vec![repeated(scalar("forecasts", 1, TYPE_STRING))]),
            message("UndocumentedRequest", Vec::new()),
            message("UndocumentedResponse", Vec::new()),
        ],
        service: vec![RawServiceDescriptorProto {
            name: Some("ToolCatalog".to_string()),
            method: vec![
                documented(
                    method("GetWeather", ".catalog.GetWeatherRequest", ".catalog.GetWeatherResponse"),
                    "get_weather",
                    "Get the current weather for a city.",
                ),
                method(
                    "Undocumented",
                    ".catalog.UndocumentedRequest",
                    ".catalog.UndocumentedResponse",
                ),
                documented(
                    method(
                        "ListForecasts",
                        ".catalog.ListForecastsRequest",
                        ".catalog.ListForecastsResponse",
                    ),
                    "",
                    "List upcoming daily forecasts.",
                ),
            ],
        }],
    }
}

pub fn invoice_file() -> RawFileDescriptorProto {
    let mut tags_entry = message(
        "TagsEntry",
        vec![scalar("key", 1, TYPE_STRING), message_field("value", 2, ".invoice.v1.Invoice.Tags")],
    );
    tags_entry.options = Some(RawMessageOptions {
        map_entry: Some(true),
    });
    let mut invoice = message(
        "Invoice",
        vec![
            scalar("customer_id", 1, TYPE_STRING),
            repeated(message_field("line_items", 2, ".invoice.v1.Invoice.LineItem")),
            repeated(message_field("tags", 3, ".invoice.v1.Invoice.TagsEntry")),
            annotated(
                scalar("memo", 4, TYPE_STRING),
                "Free-form note printed on the invoice",
                false,
                "",
            ),
        ],
    );
    invoice.nested_type = vec![
        message(
            "LineItem",
            vec![
                scalar("line_item_id", 1, TYPE_STRING),
                scalar("description", 2, TYPE_STRING),
                annotated(scalar("quantity", 3, TYPE_INT32), "Units billed", true, ""),
                scalar("unit_price_cents", 4, TYPE_INT64),
            ],
        ),
        message("Tags", vec![repeated(scalar("tag", 1, TYPE_STRING))]),
        tags_entry,
    ];
    RawFileDescriptorProto {
        name: Some("invoice/v1/invoice.proto".to_string()),
        package: Some("invoice.v1".to_string()),
        message_type: vec![
            invoice,
            message(
                "CreateInvoiceRequest",
                vec![annotated(
                    message_field("invoice", 1, ".invoice.v1.Invoice"),
                    "info to create invoice",
                    true,
                    "",
                )],
            ),
            message("CreateInvoiceResponse", vec![scalar("invoice_id", 1, TYPE_STRING)]),
        ],
        service: vec![RawServiceDescriptorProto {
            name: Some("InvoiceService".to_string()),
            method: vec![documented(
                method(
                    "CreateInvoice",
                    ".invoice.v1.CreateInvoiceRequest",
                    ".invoice.v1.CreateInvoiceResponse",
                ),
                "create_invoice",
                "Create a new invoice.",
            )],
        }],
    }
}

/// Message-only file, as protoc sends for imported dependencies.
pub fn types_file() -> RawFileDescriptorProto {
    RawFileDescriptorProto {
        name: Some("types/v1/types.proto".to_string()),
        package: Some("types.v1".to_string()),
        message_type: vec![message("Counter", vec![scalar("count", 1, TYPE_UINT32)])],
        service: Vec::new(),
    }
}

// ============================================================================
// SECTION: Encoding
// ============================================================================

pub fn request_bytes(parameter: Option<&str>, files: &[&str]) -> Vec<u8> {
    RawCodeGeneratorRequest {
        file_to_generate: files.iter().map(|file| (*file).to_string()).collect(),
        parameter: parameter.map(str::to_string),
        proto_file: vec![types_file(), catalog_file(), invoice_file()],
    }
    .encode_to_vec()
}

pub fn descriptor_set_bytes() -> Vec<u8> {
    RawFileDescriptorSet {
        file: vec![types_file(), catalog_file(), invoice_file()],
    }
    .encode_to_vec()
}
