// crates/toolbind-core/src/emit.rs
// ============================================================================
// Module: Code Emitter
// Description: Deterministic Rust source rendering for tool bindings.
// Purpose: Render name constants, schemas, dispatch and registration code.
// Dependencies: std
// ============================================================================

//! ## Overview
//! [`emit_file`] renders one artifact per input file. The artifact is meant to
//! be `include!`d next to the prost-generated message types of the same
//! protobuf package and compiles against the runtime crate configured in
//! [`EmitOptions`].
//!
//! Layout, in order: header, tool-name constants, input-schema constants, one
//! implementation trait per service, dispatch and constructor functions per
//! tool, and the per-file aggregator.
//!
//! ### Determinism
//! Rendering is a pure function of its inputs. Tools keep declaration order and
//! schemas are rendered with [`SchemaNode::render_json`], so identical input
//! always yields identical bytes.
//!
//! ### Text Safety
//! Descriptions are collapsed onto a single doc-comment line and every string
//! literal is escaped explicitly. Schemas use a raw string whose hash count is
//! larger than any quote-hash run inside the schema text.

use std::fmt;
use std::fmt::Write;

use crate::GenerationError;
use crate::extract::ToolSpecification;
use crate::naming;
use crate::schema::SchemaNode;

/// Default runtime crate path referenced by generated code.
pub const DEFAULT_RUNTIME_CRATE: &str = "::toolbind_runtime";

/// First header line of every artifact.
pub const GENERATED_HEADER: &str = "// @generated by protoc-gen-agent-tools. DO NOT EDIT.";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Rendering options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Path of the runtime crate (`::toolbind_runtime`).
    pub runtime_crate: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
        }
    }
}

/// Tool specification with its schema and resolved Rust type paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolBinding {
    /// Extracted tool specification.
    pub spec: ToolSpecification,
    /// Input schema.
    pub schema: SchemaNode,
    /// Rust path of the input type as seen from the artifact.
    pub input_path: String,
    /// Rust path of the output type as seen from the artifact.
    pub output_path: String,
}

// ============================================================================
// SECTION: File Rendering
// ============================================================================

/// Renders the artifact for one input file.
///
/// # Errors
/// Returns [`GenerationError::Emit`] when formatting fails.
pub fn emit_file(
    file_name: &str,
    bindings: &[ToolBinding],
    options: &EmitOptions,
) -> Result<String, GenerationError> {
    let mut out = String::new();
    render_file(&mut out, file_name, bindings, options.runtime_crate.as_str())
        .map_err(|err| GenerationError::Emit(format!("{file_name}: {err}")))?;
    Ok(out)
}

/// Writes every section of the artifact.
fn render_file(
    out: &mut String,
    file_name: &str,
    bindings: &[ToolBinding],
    rt: &str,
) -> fmt::Result {
    writeln!(out, "{GENERATED_HEADER}")?;
    writeln!(out, "// source: {}", normalize_doc(file_name))?;

    for binding in bindings {
        out.push('\n');
        render_name_const(out, binding, rt)?;
    }
    for binding in bindings {
        out.push('\n');
        render_schema_const(out, binding)?;
    }
    for (service, members) in group_by_service(bindings) {
        out.push('\n');
        render_service_trait(out, service, &members, rt)?;
    }
    for binding in bindings {
        out.push('\n');
        render_dispatch(out, binding, rt)?;
        out.push('\n');
        render_define(out, binding, rt)?;
    }
    out.push('\n');
    render_aggregator(out, file_name, bindings, rt)
}

/// Groups bindings by service, keeping first-appearance order.
fn group_by_service(bindings: &[ToolBinding]) -> Vec<(&str, Vec<&ToolBinding>)> {
    let mut groups: Vec<(&str, Vec<&ToolBinding>)> = Vec::new();
    for binding in bindings {
        let service = binding.spec.service.as_str();
        match groups.iter_mut().find(|(name, _)| *name == service) {
            Some((_, members)) => members.push(binding),
            None => groups.push((service, vec![binding])),
        }
    }
    groups
}

// ============================================================================
// SECTION: Items
// ============================================================================

/// Renders the tool-name constant.
fn render_name_const(out: &mut String, binding: &ToolBinding, rt: &str) -> fmt::Result {
    let spec = &binding.spec;
    writeln!(out, "/// {}", doc_line(&spec.description, &spec.tool_name))?;
    writeln!(
        out,
        "pub const {}: {rt}::ToolName = {rt}::ToolName::new({});",
        spec.idents.name_const,
        rust_string_literal(&spec.tool_name)
    )
}

/// Renders the input-schema constant.
fn render_schema_const(out: &mut String, binding: &ToolBinding) -> fmt::Result {
    let spec = &binding.spec;
    writeln!(out, "/// Input schema of the `{}` tool.", spec.tool_name)?;
    writeln!(
        out,
        "pub const {}: &str = {};",
        spec.idents.schema_const,
        raw_string_literal(&binding.schema.render_json())
    )
}

/// Renders the implementation trait of one service.
fn render_service_trait(
    out: &mut String,
    service: &str,
    members: &[&ToolBinding],
    rt: &str,
) -> fmt::Result {
    writeln!(out, "/// Implementation surface for the `{service}` tools.")?;
    writeln!(out, "#[{rt}::async_trait]")?;
    writeln!(out, "pub trait {}: Send + Sync {{", naming::service_trait_name(service))?;
    for (index, binding) in members.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let spec = &binding.spec;
        writeln!(out, "    /// {}", doc_line(&spec.description, &spec.tool_name))?;
        writeln!(
            out,
            "    async fn {}(&self, request: {}) -> ::core::result::Result<{}, {rt}::ToolError>;",
            spec.idents.trait_method, binding.input_path, binding.output_path
        )?;
    }
    writeln!(out, "}}")
}

/// Renders the dispatch function.
fn render_dispatch(out: &mut String, binding: &ToolBinding, rt: &str) -> fmt::Result {
    let spec = &binding.spec;
    let input = binding.input_path.as_str();
    writeln!(out, "/// Dispatches a `{}` call to `imp`.", spec.tool_name)?;
    if spec.input_required() {
        writeln!(out, "///")?;
        writeln!(out, "/// # Errors")?;
        writeln!(out, "/// Fails when `input` is absent or empty, otherwise returns the")?;
        writeln!(out, "/// implementation's result unchanged.")?;
    }
    writeln!(
        out,
        "pub async fn {}<I>(imp: &I, input: ::core::option::Option<{input}>) -> \
         ::core::result::Result<{}, {rt}::ToolError>",
        spec.idents.call_fn, binding.output_path
    )?;
    writeln!(out, "where")?;
    writeln!(out, "    I: {} + ?Sized,", naming::service_trait_name(&spec.service))?;
    writeln!(out, "{{")?;
    if spec.input_required() {
        writeln!(out, "    let request = match input {{")?;
        writeln!(
            out,
            "        ::core::option::Option::Some(request) if request != <{input} as \
             ::core::default::Default>::default() => request,"
        )?;
        writeln!(
            out,
            "        _ => return ::core::result::Result::Err({rt}::ToolError::invalid_input({})),",
            rust_string_literal(&format!("{} requires input", spec.tool_name))
        )?;
        writeln!(out, "    }};")?;
    } else {
        writeln!(out, "    let request = input.unwrap_or_default();")?;
    }
    writeln!(out, "    imp.{}(request).await", spec.idents.trait_method)?;
    writeln!(out, "}}")
}

/// Renders the tool constructor.
fn render_define(out: &mut String, binding: &ToolBinding, rt: &str) -> fmt::Result {
    let spec = &binding.spec;
    writeln!(out, "/// Builds the `{}` tool reference bound to `imp`.", spec.tool_name)?;
    writeln!(out, "///")?;
    writeln!(out, "/// # Errors")?;
    writeln!(out, "/// Fails when the embedded input schema is rejected by the runtime.")?;
    writeln!(
        out,
        "pub fn {}<I>(imp: &::std::sync::Arc<I>) -> ::core::result::Result<{rt}::ToolRef, \
         {rt}::ToolError>",
        spec.idents.define_fn
    )?;
    writeln!(out, "where")?;
    writeln!(out, "    I: {} + 'static,", naming::service_trait_name(&spec.service))?;
    writeln!(out, "{{")?;
    writeln!(out, "    let imp = ::std::sync::Arc::clone(imp);")?;
    writeln!(out, "    {rt}::ToolRef::new(")?;
    writeln!(out, "        {},", spec.idents.name_const)?;
    writeln!(out, "        {},", rust_string_literal(&spec.description))?;
    writeln!(out, "        {},", spec.idents.schema_const)?;
    writeln!(out, "        move |input: ::core::option::Option<{}>| {{", binding.input_path)?;
    writeln!(out, "            let imp = ::std::sync::Arc::clone(&imp);")?;
    writeln!(out, "            async move {{ {}(&*imp, input).await }}", spec.idents.call_fn)?;
    writeln!(out, "        }},")?;
    writeln!(out, "    )")?;
    writeln!(out, "}}")
}

/// Renders the per-file aggregator.
fn render_aggregator(
    out: &mut String,
    file_name: &str,
    bindings: &[ToolBinding],
    rt: &str,
) -> fmt::Result {
    let name = naming::aggregator_fn_name(file_name);
    writeln!(out, "/// Builds every tool declared in `{}`.", normalize_doc(file_name))?;
    writeln!(out, "///")?;
    writeln!(out, "/// # Errors")?;
    writeln!(out, "/// Fails on the first tool the runtime rejects.")?;
    if bindings.is_empty() {
        writeln!(
            out,
            "pub fn {name}<I>(_imp: ::std::sync::Arc<I>) -> \
             ::core::result::Result<::std::vec::Vec<{rt}::ToolRef>, {rt}::ToolError> {{"
        )?;
        writeln!(out, "    ::core::result::Result::Ok(::std::vec::Vec::new())")?;
        return writeln!(out, "}}");
    }
    let bounds: Vec<String> = group_by_service(bindings)
        .into_iter()
        .map(|(service, _)| naming::service_trait_name(service))
        .collect();
    writeln!(
        out,
        "pub fn {name}<I>(imp: ::std::sync::Arc<I>) -> \
         ::core::result::Result<::std::vec::Vec<{rt}::ToolRef>, {rt}::ToolError>"
    )?;
    writeln!(out, "where")?;
    writeln!(out, "    I: {} + 'static,", bounds.join(" + "))?;
    writeln!(out, "{{")?;
    writeln!(out, "    ::core::result::Result::Ok(::std::vec![")?;
    for binding in bindings {
        writeln!(out, "        {}(&imp)?,", binding.spec.idents.define_fn)?;
    }
    writeln!(out, "    ])")?;
    writeln!(out, "}}")
}

// ============================================================================
// SECTION: Literals
// ============================================================================

/// Returns the doc-comment text for a tool, falling back to its name.
fn doc_line(description: &str, tool_name: &str) -> String {
    let normalized = defuse_fences(&normalize_doc(description));
    if normalized.is_empty() { format!("Tool `{tool_name}`.") } else { normalized }
}

/// Collapses backtick and tilde runs so rustdoc never sees a code fence.
fn defuse_fences(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut previous = None;
    for ch in value.chars() {
        if matches!(ch, '`' | '~') && previous == Some(ch) {
            continue;
        }
        out.push(ch);
        previous = Some(ch);
    }
    out
}

/// Collapses whitespace and control characters onto a single comment line.
fn normalize_doc(value: &str) -> String {
    let cleaned: String = value.chars().map(|ch| if ch.is_control() { ' ' } else { ch }).collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Renders a Rust string literal with explicit escapes.
#[must_use]
pub fn rust_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            ch if ch.is_control() => {
                let _ = write!(out, "\\u{{{:x}}}", u32::from(ch));
            }
            ch => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Renders a raw string literal that `value` cannot terminate early.
#[must_use]
pub fn raw_string_literal(value: &str) -> String {
    let mut longest = 0_usize;
    let mut run: Option<usize> = None;
    for ch in value.chars() {
        run = match (ch, run) {
            ('"', _) => Some(0),
            ('#', Some(count)) => {
                longest = longest.max(count + 1);
                Some(count + 1)
            }
            _ => None,
        };
    }
    let hashes = "#".repeat(longest + 1);
    format!("r{hashes}\"{value}\"{hashes}")
}
