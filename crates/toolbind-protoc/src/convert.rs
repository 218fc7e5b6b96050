// crates/toolbind-protoc/src/convert.rs
// ============================================================================
// Module: Descriptor Conversion
// Description: Raw protobuf descriptors to the typed core model.
// Purpose: Decode annotations once, at the boundary, into typed records.
// Dependencies: toolbind-core
// ============================================================================

//! ## Overview
//! [`descriptor_set`] flattens nested messages into fully qualified entries,
//! maps field type codes onto [`FieldType`] and lifts the annotation
//! extensions into [`ToolAnnotation`] and [`FieldAnnotation`]. Files keep
//! request order so generation order follows protoc's.

use toolbind_core::Cardinality;
use toolbind_core::DescriptorSet;
use toolbind_core::FieldAnnotation;
use toolbind_core::FieldDescriptor;
use toolbind_core::FieldType;
use toolbind_core::FileDescriptor;
use toolbind_core::MessageDescriptor;
use toolbind_core::MethodDescriptor;
use toolbind_core::ScalarType;
use toolbind_core::ServiceDescriptor;
use toolbind_core::ToolAnnotation;

use crate::PluginError;
use crate::request::LABEL_REPEATED;
use crate::request::RawDescriptorProto;
use crate::request::RawFieldDescriptorProto;
use crate::request::RawFileDescriptorProto;
use crate::request::RawMethodDescriptorProto;
use crate::request::RawServiceDescriptorProto;

// ============================================================================
// SECTION: Conversion
// ============================================================================

/// Converts raw file descriptors into a resolved [`DescriptorSet`].
///
/// # Errors
///
/// Returns [`PluginError::Decode`] for descriptors missing names, unknown
/// field type codes, and message or enum fields without a type name.
pub fn descriptor_set(files: &[RawFileDescriptorProto]) -> Result<DescriptorSet, PluginError> {
    let mut set = DescriptorSet::new();
    for raw in files {
        let name = required_name(raw.name.as_deref(), "file descriptor")?;
        let package = raw.package.clone().unwrap_or_default();
        for message in &raw.message_type {
            add_message(&mut set, &package, &package, message)?;
        }
        let mut file = FileDescriptor::new(name, package);
        for service in &raw.service {
            file.services.push(convert_service(&file.name, service)?);
        }
        set.add_file(file);
    }
    Ok(set)
}

/// Adds `raw` and its nested messages under `scope`.
fn add_message(
    set: &mut DescriptorSet,
    package: &str,
    scope: &str,
    raw: &RawDescriptorProto,
) -> Result<(), PluginError> {
    let name = required_name(raw.name.as_deref(), &format!("message in `{scope}`"))?;
    let full_name = qualify(scope, name);
    let mut message = MessageDescriptor::new(package, full_name.as_str());
    message.map_entry = raw.options.as_ref().and_then(|options| options.map_entry).unwrap_or(false);
    for field in &raw.field {
        message.fields.push(convert_field(&full_name, field)?);
    }
    for nested in &raw.nested_type {
        add_message(set, package, &full_name, nested)?;
    }
    set.add_message(message);
    Ok(())
}

/// Converts one field, decoding its annotation.
fn convert_field(
    message: &str,
    raw: &RawFieldDescriptorProto,
) -> Result<FieldDescriptor, PluginError> {
    let name = required_name(raw.name.as_deref(), &format!("field of `{message}`"))?;
    let element = format!("{message}.{name}");
    let field_type = field_type(&element, raw)?;
    let mut field = FieldDescriptor::new(name, raw.number.unwrap_or_default(), field_type);
    if raw.label == Some(LABEL_REPEATED) {
        field.cardinality = Cardinality::Repeated;
    }
    if let Some(metadata) = raw.options.as_ref().and_then(|options| options.field.as_ref()) {
        field.annotation = Some(FieldAnnotation {
            description: metadata.description.clone(),
            required: metadata.required,
            example: metadata.example.clone(),
        });
    }
    Ok(field)
}

/// Maps a `FieldDescriptorProto.Type` code onto [`FieldType`].
fn field_type(element: &str, raw: &RawFieldDescriptorProto) -> Result<FieldType, PluginError> {
    let code = raw.r#type.unwrap_or_default();
    let scalar = match code {
        1 => ScalarType::Double,
        2 => ScalarType::Float,
        3 => ScalarType::Int64,
        4 => ScalarType::Uint64,
        5 => ScalarType::Int32,
        6 => ScalarType::Fixed64,
        7 => ScalarType::Fixed32,
        8 => ScalarType::Bool,
        9 => ScalarType::String,
        12 => ScalarType::Bytes,
        13 => ScalarType::Uint32,
        15 => ScalarType::Sfixed32,
        16 => ScalarType::Sfixed64,
        17 => ScalarType::Sint32,
        18 => ScalarType::Sint64,
        // Groups decode as messages.
        10 | 11 => return Ok(FieldType::Message(type_reference(element, raw)?)),
        14 => return Ok(FieldType::Enum(type_reference(element, raw)?)),
        other => {
            return Err(PluginError::Decode(format!("{element}: unknown field type code {other}")));
        }
    };
    Ok(FieldType::Scalar(scalar))
}

/// Returns the referenced type name of a message or enum field.
fn type_reference(element: &str, raw: &RawFieldDescriptorProto) -> Result<String, PluginError> {
    match raw.type_name.as_deref() {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(PluginError::Decode(format!("{element}: missing type name"))),
    }
}

// ============================================================================
// SECTION: Services
// ============================================================================

/// Converts a service and its operations.
fn convert_service(
    file: &str,
    raw: &RawServiceDescriptorProto,
) -> Result<ServiceDescriptor, PluginError> {
    let name = required_name(raw.name.as_deref(), &format!("service in `{file}`"))?;
    let mut service = ServiceDescriptor::new(name);
    for method in &raw.method {
        service.methods.push(convert_method(name, method)?);
    }
    Ok(service)
}

/// Converts an operation, decoding its tool annotation.
fn convert_method(
    service: &str,
    raw: &RawMethodDescriptorProto,
) -> Result<MethodDescriptor, PluginError> {
    let name = required_name(raw.name.as_deref(), &format!("method of `{service}`"))?;
    let mut method = MethodDescriptor::new(
        name,
        raw.input_type.clone().unwrap_or_default(),
        raw.output_type.clone().unwrap_or_default(),
    );
    method.client_streaming = raw.client_streaming.unwrap_or(false);
    method.server_streaming = raw.server_streaming.unwrap_or(false);
    if let Some(metadata) = raw.options.as_ref().and_then(|options| options.tool.as_ref()) {
        method.tool = Some(ToolAnnotation::new(metadata.name.as_str(), metadata.description.as_str()));
    }
    Ok(method)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns a non-empty descriptor name.
fn required_name<'a>(name: Option<&'a str>, what: &str) -> Result<&'a str, PluginError> {
    match name {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(PluginError::Decode(format!("{what} has no name"))),
    }
}

/// Joins a scope and a simple name.
fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() { name.to_string() } else { format!("{scope}.{name}") }
}
