// crates/toolbind-core/src/lib.rs
// ============================================================================
// Module: Toolbind Core Library
// Description: Generation engine for agent tool bindings from service schemas.
// Purpose: Turn annotated RPC descriptors into deterministic tool bindings.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! `toolbind-core` is the pure generation engine. Given a fully resolved
//! [`DescriptorSet`] whose custom annotations are already decoded into typed
//! records, it:
//!
//! 1. discovers tool-eligible operations ([`extract`]),
//! 2. renders each operation's input message into a nested [`SchemaNode`]
//!    ([`schema`]),
//! 3. emits one deterministic Rust source artifact per input file ([`emit`]).
//!
//! The [`Generator`] drives the three stages as a single pass. The engine does
//! no I/O: reading descriptors and persisting artifacts belong to the host
//! driver.
//!
//! ### Design Notes
//! - Output is byte-stable: identical descriptors always produce identical text.
//! - Any extraction or schema failure aborts the run; no artifact is returned.
//! - Tool-name bookkeeping lives in an explicit [`RunContext`], never in
//!   ambient state.
//!
//! ## Index
//! - Model: [`descriptor`]
//! - Pipeline: [`extract`], [`schema`], [`emit`], [`generator`]
//! - Support: [`context`], [`naming`], [`fixtures`]

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod context;
pub mod descriptor;
pub mod emit;
pub mod extract;
pub mod fixtures;
pub mod generator;
pub mod naming;
pub mod schema;

// ============================================================================
// SECTION: Errors
// ============================================================================

use thiserror::Error;

/// Malformed or conflicting tool metadata.
///
/// # Invariants
/// - Every variant names the offending schema element by its qualified name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    /// Two operations resolve to the same tool name.
    #[error("tool name conflict: `{name}` is claimed by {first} and {second}")]
    NameConflict {
        /// Conflicting tool name.
        name: String,
        /// Operation that claimed the name first.
        first: String,
        /// Operation that attempted to claim it again.
        second: String,
    },
    /// Two operations in one file derive the same generated identifier.
    #[error("identifier conflict: `{ident}` is derived for {first} and {second}")]
    IdentifierConflict {
        /// Conflicting Rust identifier.
        ident: String,
        /// Operation that derived the identifier first.
        first: String,
        /// Operation that derived it again.
        second: String,
    },
    /// Declared tool name is not a valid agent tool identifier.
    #[error("{element}: invalid tool name `{name}`")]
    InvalidToolName {
        /// Offending operation.
        element: String,
        /// Declared name.
        name: String,
    },
    /// Policy requires a description that is missing.
    #[error("{element}: description is required by policy")]
    MissingDescription {
        /// Offending operation or field.
        element: String,
    },
    /// Streaming operations cannot be exposed as tools.
    #[error("{element}: streaming operations cannot be exposed as tools")]
    StreamingOperation {
        /// Offending operation.
        element: String,
    },
    /// Operation references a message that is not in the descriptor set.
    #[error("{element}: type `{type_name}` is not defined")]
    UnresolvedType {
        /// Offending operation.
        element: String,
        /// Unresolved message name.
        type_name: String,
    },
}

/// Field shapes the schema builder cannot map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Field references a message that is not in the descriptor set.
    #[error("{element}: type `{type_name}` is not defined")]
    UnresolvedType {
        /// Offending field or message.
        element: String,
        /// Unresolved message name.
        type_name: String,
    },
    /// Map key is not a string, integer or bool scalar.
    #[error("{element}: unsupported map key shape `{key}`")]
    UnsupportedMapKey {
        /// Offending map field.
        element: String,
        /// Description of the key shape.
        key: String,
    },
    /// Map entry message lacks its key or value field.
    #[error("{element}: malformed map entry")]
    MalformedMapEntry {
        /// Offending map field.
        element: String,
    },
    /// Expansion exceeded the configured depth limit.
    #[error("{element}: schema nesting exceeds depth limit {limit}")]
    DepthExceeded {
        /// Field at which the limit was hit.
        element: String,
        /// Configured limit.
        limit: usize,
    },
}

/// Errors that abort a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Tool metadata error.
    #[error("annotation error: {0}")]
    Annotation(#[from] AnnotationError),
    /// Schema construction error.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
    /// Requested file is not part of the descriptor set.
    #[error("unknown file: {0}")]
    UnknownFile(String),
    /// Rendering failed.
    #[error("emit error: {0}")]
    Emit(String),
}

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use context::NameScope;
pub use context::RunContext;
pub use descriptor::Cardinality;
pub use descriptor::DescriptorSet;
pub use descriptor::FieldAnnotation;
pub use descriptor::FieldDescriptor;
pub use descriptor::FieldType;
pub use descriptor::FileDescriptor;
pub use descriptor::MessageDescriptor;
pub use descriptor::MethodDescriptor;
pub use descriptor::ScalarType;
pub use descriptor::ServiceDescriptor;
pub use descriptor::ToolAnnotation;
pub use emit::EmitOptions;
pub use extract::AnnotationPolicy;
pub use extract::FieldKind;
pub use extract::FieldSpecification;
pub use extract::ToolSpecification;
pub use generator::GeneratedFile;
pub use generator::Generator;
pub use generator::GeneratorOptions;
pub use schema::ScalarKind;
pub use schema::SchemaBuilder;
pub use schema::SchemaNode;
pub use schema::SchemaProperty;
pub use schema::SchemaShape;
