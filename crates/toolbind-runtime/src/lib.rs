// crates/toolbind-runtime/src/lib.rs
// ============================================================================
// Module: Toolbind Runtime Library
// Description: Agent runtime surface targeted by generated tool bindings.
// Purpose: Type-erase generated tools and register them in one call.
// Dependencies: async-trait, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Generated artifacts reference this crate through a configurable path
//! (`::toolbind_runtime` by default). They use:
//! - [`ToolName`] for tool-name constants,
//! - [`ToolError`] as the error type of every implementation method,
//! - [`ToolRef::new`] to wrap a typed async dispatcher into a JSON tool,
//! - [`async_trait`] on the generated service traits.
//!
//! [`ToolRegistry`] is a minimal in-process agent runtime: it registers the
//! output of a per-file aggregator atomically and dispatches JSON calls.

mod error;
mod registry;
mod tool;

pub use async_trait::async_trait;
pub use error::ToolError;
pub use error::ToolErrorKind;
pub use registry::ToolRegistry;
pub use serde_json;
pub use tool::ToolDefinition;
pub use tool::ToolFuture;
pub use tool::ToolName;
pub use tool::ToolRef;
