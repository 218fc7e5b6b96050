// crates/toolbind-protoc/src/request.rs
// ============================================================================
// Module: Raw Descriptor Messages
// Description: Minimal prost views of the protoc plugin wire messages.
// Purpose: Decode requests with annotation extensions as typed fields.
// Dependencies: prost
// ============================================================================

//! ## Overview
//! protoc hands plugins a `CodeGeneratorRequest` whose descriptors carry
//! custom options as extension fields. Declaring the extension numbers as
//! ordinary fields on the option messages lets prost decode the annotations
//! straight into typed records; everything this crate does not read is
//! skipped as unknown fields.
//!
//! Only the descriptor fields the generator consumes are declared. Tag
//! numbers follow `google/protobuf/descriptor.proto` and
//! `google/protobuf/compiler/plugin.proto`.

use prost::alloc::string::String;
use prost::alloc::vec::Vec;

/// Extension number of the operation-level tool annotation.
pub const TOOL_EXTENSION_NUMBER: u32 = 51_000;
/// Extension number of the field-level annotation.
pub const FIELD_EXTENSION_NUMBER: u32 = 51_001;

/// Label value of repeated fields.
pub const LABEL_REPEATED: i32 = 3;

// ============================================================================
// SECTION: Plugin Envelope
// ============================================================================

/// `google.protobuf.compiler.CodeGeneratorRequest`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawCodeGeneratorRequest {
    /// Files protoc asked the plugin to generate.
    #[prost(string, repeated, tag = "1")]
    pub file_to_generate: Vec<String>,
    /// Raw `--agent-tools_opt` parameter string.
    #[prost(string, optional, tag = "2")]
    pub parameter: Option<String>,
    /// Every file in the request, dependencies first.
    #[prost(message, repeated, tag = "15")]
    pub proto_file: Vec<RawFileDescriptorProto>,
}

/// `google.protobuf.FileDescriptorSet`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawFileDescriptorSet {
    /// Files in the set.
    #[prost(message, repeated, tag = "1")]
    pub file: Vec<RawFileDescriptorProto>,
}

// ============================================================================
// SECTION: Descriptors
// ============================================================================

/// `google.protobuf.FileDescriptorProto`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawFileDescriptorProto {
    /// File name relative to the include root.
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    /// Protobuf package.
    #[prost(string, optional, tag = "2")]
    pub package: Option<String>,
    /// Top-level messages.
    #[prost(message, repeated, tag = "4")]
    pub message_type: Vec<RawDescriptorProto>,
    /// Services.
    #[prost(message, repeated, tag = "6")]
    pub service: Vec<RawServiceDescriptorProto>,
}

/// `google.protobuf.DescriptorProto`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawDescriptorProto {
    /// Simple message name.
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    /// Fields in declaration order.
    #[prost(message, repeated, tag = "2")]
    pub field: Vec<RawFieldDescriptorProto>,
    /// Nested messages, including synthesized map entries.
    #[prost(message, repeated, tag = "3")]
    pub nested_type: Vec<RawDescriptorProto>,
    /// Message options.
    #[prost(message, optional, tag = "7")]
    pub options: Option<RawMessageOptions>,
}

/// `google.protobuf.MessageOptions`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawMessageOptions {
    /// Set on map entry messages synthesized by protoc.
    #[prost(bool, optional, tag = "7")]
    pub map_entry: Option<bool>,
}

/// `google.protobuf.FieldDescriptorProto`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawFieldDescriptorProto {
    /// Field name.
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    /// Field number.
    #[prost(int32, optional, tag = "3")]
    pub number: Option<i32>,
    /// Label code (`1` optional, `2` required, `3` repeated).
    #[prost(int32, optional, tag = "4")]
    pub label: Option<i32>,
    /// Type code (`FieldDescriptorProto.Type`).
    #[prost(int32, optional, tag = "5")]
    pub r#type: Option<i32>,
    /// Fully qualified message or enum name for non-scalar fields.
    #[prost(string, optional, tag = "6")]
    pub type_name: Option<String>,
    /// Field options.
    #[prost(message, optional, tag = "8")]
    pub options: Option<RawFieldOptions>,
}

/// `google.protobuf.FieldOptions` with the field annotation extension.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawFieldOptions {
    /// `(agenttools.tool.v1.field)`.
    #[prost(message, optional, tag = "51001")]
    pub field: Option<RawFieldMetadata>,
}

/// `agenttools.tool.v1.FieldMetadata`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawFieldMetadata {
    /// Field description.
    #[prost(string, tag = "1")]
    pub description: String,
    /// Explicit required flag.
    #[prost(bool, tag = "2")]
    pub required: bool,
    /// Example value.
    #[prost(string, tag = "3")]
    pub example: String,
}

// ============================================================================
// SECTION: Services
// ============================================================================

/// `google.protobuf.ServiceDescriptorProto`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawServiceDescriptorProto {
    /// Service name.
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    /// Operations in declaration order.
    #[prost(message, repeated, tag = "2")]
    pub method: Vec<RawMethodDescriptorProto>,
}

/// `google.protobuf.MethodDescriptorProto`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawMethodDescriptorProto {
    /// Operation name.
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    /// Fully qualified input type.
    #[prost(string, optional, tag = "2")]
    pub input_type: Option<String>,
    /// Fully qualified output type.
    #[prost(string, optional, tag = "3")]
    pub output_type: Option<String>,
    /// Method options.
    #[prost(message, optional, tag = "4")]
    pub options: Option<RawMethodOptions>,
    /// Client-streaming flag.
    #[prost(bool, optional, tag = "5")]
    pub client_streaming: Option<bool>,
    /// Server-streaming flag.
    #[prost(bool, optional, tag = "6")]
    pub server_streaming: Option<bool>,
}

/// `google.protobuf.MethodOptions` with the tool annotation extension.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawMethodOptions {
    /// `(agenttools.tool.v1.tool)`.
    #[prost(message, optional, tag = "51000")]
    pub tool: Option<RawToolMetadata>,
}

/// `agenttools.tool.v1.ToolMetadata`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawToolMetadata {
    /// Declared tool name.
    #[prost(string, tag = "1")]
    pub name: String,
    /// Tool description.
    #[prost(string, tag = "2")]
    pub description: String,
}
