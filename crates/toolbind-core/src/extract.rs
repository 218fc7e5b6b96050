// crates/toolbind-core/src/extract.rs
// ============================================================================
// Module: Annotation Extractor
// Description: Discovers tool-eligible operations and their field metadata.
// Purpose: Produce ordered tool specifications per schema file.
// Dependencies: std
// ============================================================================

//! ## Overview
//! [`extract_tools`] walks a file's services and operations in declaration
//! order. Operations without a documentation annotation are skipped entirely
//! and never reach the schema builder or emitter. Every remaining operation
//! becomes a [`ToolSpecification`] whose name is claimed in the run's
//! [`RunContext`].
//!
//! `required` on a [`FieldSpecification`] is copied from the field annotation
//! verbatim; type nullability and presence tracking are never consulted.

use std::collections::BTreeMap;

use crate::AnnotationError;
use crate::context::RunContext;
use crate::descriptor::DescriptorSet;
use crate::descriptor::FieldDescriptor;
use crate::descriptor::FieldType;
use crate::descriptor::FileDescriptor;
use crate::descriptor::MethodDescriptor;
use crate::descriptor::ServiceDescriptor;
use crate::naming;
use crate::naming::ToolIdents;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Shape category of an annotated input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Singular scalar or enum.
    Scalar,
    /// Singular message.
    Message,
    /// Repeated scalar, enum or message.
    Repeated,
    /// Map field.
    Map,
}

/// Annotated field of an operation's input type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpecification {
    /// Field name.
    pub name: String,
    /// Field description.
    pub description: String,
    /// Example value.
    pub example: String,
    /// True only when the annotation sets the required flag.
    pub required: bool,
    /// Shape category.
    pub kind: FieldKind,
    /// Element type (repeated) or value type (map) label.
    pub type_ref: String,
}

/// One tool-eligible operation.
///
/// # Invariants
/// - `tool_name` is unique within the run context scope it was claimed in.
/// - `fields` lists annotated direct input fields in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpecification {
    /// Unique tool name.
    pub tool_name: String,
    /// Tool description.
    pub description: String,
    /// Owning service name.
    pub service: String,
    /// Owning operation name.
    pub method: String,
    /// Fully qualified input message name.
    pub input_type: String,
    /// Fully qualified output message name.
    pub output_type: String,
    /// Annotated input fields.
    pub fields: Vec<FieldSpecification>,
    /// Generated identifiers.
    pub idents: ToolIdents,
}

impl ToolSpecification {
    /// Returns true when at least one input field is annotated required.
    #[must_use]
    pub fn input_required(&self) -> bool {
        self.fields.iter().any(|field| field.required)
    }
}

/// Metadata policy enforced during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnnotationPolicy {
    /// Documented operations must carry a non-empty description.
    pub require_tool_description: bool,
    /// Required fields must carry a non-empty description.
    pub require_required_field_description: bool,
}

// ============================================================================
// SECTION: Extraction
// ============================================================================

/// Extracts tool specifications from one file.
///
/// Starts a new file in `context` before claiming names.
///
/// # Errors
/// Returns [`AnnotationError`] for name or identifier conflicts, invalid
/// declared names, streaming operations, unresolved types and policy
/// violations.
pub fn extract_tools(
    descriptors: &DescriptorSet,
    file: &FileDescriptor,
    context: &mut RunContext,
    policy: AnnotationPolicy,
) -> Result<Vec<ToolSpecification>, AnnotationError> {
    context.begin_file();
    let mut idents: BTreeMap<String, String> = BTreeMap::new();
    let mut traits: BTreeMap<String, String> = BTreeMap::new();
    let mut tools = Vec::new();
    for service in &file.services {
        let mut methods: BTreeMap<String, String> = BTreeMap::new();
        for method in &service.methods {
            let Some(annotation) = &method.tool else {
                continue;
            };
            let element = qualified_operation(file, service, method);
            if method.client_streaming || method.server_streaming {
                return Err(AnnotationError::StreamingOperation {
                    element,
                });
            }
            if policy.require_tool_description && annotation.description.trim().is_empty() {
                return Err(AnnotationError::MissingDescription {
                    element,
                });
            }

            let tool_name = if annotation.name.is_empty() {
                naming::derive_tool_name(&service.name, &method.name)
            } else {
                annotation.name.clone()
            };
            if !naming::is_valid_tool_name(&tool_name) {
                return Err(AnnotationError::InvalidToolName {
                    element,
                    name: tool_name,
                });
            }

            let tool_idents = ToolIdents::derive(&service.name, &method.name);
            claim_ident(&mut idents, &tool_idents.name_const, &element)?;
            claim_ident(&mut methods, &tool_idents.trait_method, &element)?;
            if methods.len() == 1 {
                // First eligible operation: the service trait will be emitted.
                claim_ident(&mut traits, &naming::service_trait_name(&service.name), &element)?;
            }
            ensure_resolved(descriptors, &method.output_type, &element)?;
            let fields = input_fields(descriptors, method, &element, policy)?;
            context.claim(&tool_name, &element)?;

            tools.push(ToolSpecification {
                tool_name,
                description: annotation.description.clone(),
                service: service.name.clone(),
                method: method.name.clone(),
                input_type: crate::descriptor::normalize_type_name(&method.input_type).to_string(),
                output_type: crate::descriptor::normalize_type_name(&method.output_type)
                    .to_string(),
                fields,
                idents: tool_idents,
            });
        }
    }
    Ok(tools)
}

/// Returns the qualified element name of an operation.
fn qualified_operation(
    file: &FileDescriptor,
    service: &ServiceDescriptor,
    method: &MethodDescriptor,
) -> String {
    if file.package.is_empty() {
        format!("{}.{}", service.name, method.name)
    } else {
        format!("{}.{}.{}", file.package, service.name, method.name)
    }
}

/// Records a generated identifier, failing on reuse.
fn claim_ident(
    claimed: &mut BTreeMap<String, String>,
    ident: &str,
    owner: &str,
) -> Result<(), AnnotationError> {
    if let Some(first) = claimed.get(ident) {
        return Err(AnnotationError::IdentifierConflict {
            ident: ident.to_string(),
            first: first.clone(),
            second: owner.to_string(),
        });
    }
    claimed.insert(ident.to_string(), owner.to_string());
    Ok(())
}

/// Returns true for protobuf well-known types.
pub(crate) fn is_well_known(type_name: &str) -> bool {
    crate::descriptor::normalize_type_name(type_name)
        .strip_prefix(naming::WELL_KNOWN_PACKAGE)
        .is_some_and(|rest| rest.starts_with('.'))
}

/// Fails when an operation type is neither defined nor well known.
fn ensure_resolved(
    descriptors: &DescriptorSet,
    type_name: &str,
    element: &str,
) -> Result<(), AnnotationError> {
    if descriptors.message(type_name).is_some() || is_well_known(type_name) {
        return Ok(());
    }
    Err(AnnotationError::UnresolvedType {
        element: element.to_string(),
        type_name: crate::descriptor::normalize_type_name(type_name).to_string(),
    })
}

/// Collects annotated direct fields of an operation's input.
fn input_fields(
    descriptors: &DescriptorSet,
    method: &MethodDescriptor,
    element: &str,
    policy: AnnotationPolicy,
) -> Result<Vec<FieldSpecification>, AnnotationError> {
    ensure_resolved(descriptors, &method.input_type, element)?;
    let Some(input) = descriptors.message(&method.input_type) else {
        return Ok(Vec::new());
    };
    let mut fields = Vec::new();
    for field in &input.fields {
        let Some(annotation) = &field.annotation else {
            continue;
        };
        if policy.require_required_field_description
            && annotation.required
            && annotation.description.trim().is_empty()
        {
            return Err(AnnotationError::MissingDescription {
                element: format!("{}.{}", input.full_name, field.name),
            });
        }
        let (kind, type_ref) = classify(descriptors, field);
        fields.push(FieldSpecification {
            name: field.name.clone(),
            description: annotation.description.clone(),
            example: annotation.example.clone(),
            required: annotation.required,
            kind,
            type_ref,
        });
    }
    Ok(fields)
}

/// Classifies a field and returns its element or value type label.
fn classify(descriptors: &DescriptorSet, field: &FieldDescriptor) -> (FieldKind, String) {
    if descriptors.is_map_field(field) {
        let value = match &field.field_type {
            FieldType::Message(entry) => descriptors
                .message(entry)
                .and_then(|entry| entry.field("value"))
                .map(|value| value.field_type.label()),
            FieldType::Scalar(_) | FieldType::Enum(_) => None,
        };
        return (FieldKind::Map, value.unwrap_or_else(|| field.field_type.label()));
    }
    let kind = match (&field.cardinality, &field.field_type) {
        (crate::descriptor::Cardinality::Repeated, _) => FieldKind::Repeated,
        (_, FieldType::Message(_)) => FieldKind::Message,
        (_, FieldType::Scalar(_) | FieldType::Enum(_)) => FieldKind::Scalar,
    };
    (kind, field.field_type.label())
}
