// crates/toolbind-runtime/src/error.rs
// ============================================================================
// Module: Tool Errors
// Description: Error type shared by generated dispatchers and implementations.
// Purpose: Carry a caller-visible message without escalating failures.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! [`ToolError`] displays exactly its message. The kind lets callers tell
//! rejected input apart from implementation failures without parsing text.

use serde::Serialize;
use thiserror::Error;

/// Category of a tool error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    /// Input was absent, empty or malformed.
    InvalidInput,
    /// Embedded schema could not be parsed.
    InvalidSchema,
    /// A tool with the same name is already registered.
    DuplicateTool,
    /// No tool with the requested name is registered.
    UnknownTool,
    /// Output could not be serialized.
    InvalidOutput,
    /// Failure reported by the implementation.
    Failed,
}

/// Error returned by tools and the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct ToolError {
    /// Error category.
    kind: ToolErrorKind,
    /// Caller-visible message.
    message: String,
}

impl ToolError {
    /// Creates an implementation failure.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_kind(ToolErrorKind::Failed, message)
    }

    /// Creates an error of the given kind.
    #[must_use]
    pub fn with_kind(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates an input rejection.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::with_kind(ToolErrorKind::InvalidInput, message)
    }

    /// Creates a schema rejection for `tool`.
    #[must_use]
    pub fn invalid_schema(tool: &str, detail: impl std::fmt::Display) -> Self {
        Self::with_kind(ToolErrorKind::InvalidSchema, format!("{tool}: invalid input schema: {detail}"))
    }

    /// Creates a duplicate registration error for `tool`.
    #[must_use]
    pub fn duplicate_tool(tool: &str) -> Self {
        Self::with_kind(ToolErrorKind::DuplicateTool, format!("tool `{tool}` is already registered"))
    }

    /// Creates an unknown tool error.
    #[must_use]
    pub fn unknown_tool(tool: &str) -> Self {
        Self::with_kind(ToolErrorKind::UnknownTool, format!("tool `{tool}` is not registered"))
    }

    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ToolErrorKind {
        self.kind
    }

    /// Returns the caller-visible message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
