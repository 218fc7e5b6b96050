// crates/toolbind-runtime/src/registry.rs
// ============================================================================
// Module: Tool Registry
// Description: In-process registry for generated tools.
// Purpose: Register aggregator output atomically and dispatch JSON calls.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! [`ToolRegistry::register_all`] accepts the whole output of a per-file
//! aggregator. Duplicate names, against existing entries or inside the batch,
//! reject the batch without registering any of it.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::ToolError;
use crate::tool::ToolDefinition;
use crate::tool::ToolRef;

/// Registered tools in registration order.
///
/// # Invariants
/// - `index` maps every registered name to its position in `tools`.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    /// Tools in registration order.
    tools: Vec<ToolRef>,
    /// Name to position.
    index: BTreeMap<String, usize>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a batch of tools.
    ///
    /// # Errors
    ///
    /// Returns a duplicate-tool [`ToolError`] naming the first clash; the
    /// registry is unchanged in that case.
    pub fn register_all(&mut self, tools: Vec<ToolRef>) -> Result<(), ToolError> {
        let mut batch: Vec<&str> = Vec::with_capacity(tools.len());
        for tool in &tools {
            let name = tool.name();
            if self.index.contains_key(name) || batch.contains(&name) {
                return Err(ToolError::duplicate_tool(name));
            }
            batch.push(name);
        }
        for tool in tools {
            self.index.insert(tool.name().to_string(), self.tools.len());
            self.tools.push(tool);
        }
        Ok(())
    }

    /// Returns the tool registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ToolRef> {
        self.index.get(name).and_then(|position| self.tools.get(*position))
    }

    /// Returns tool definitions in registration order.
    #[must_use]
    pub fn definitions(&self) -> Vec<&ToolDefinition> {
        self.tools.iter().map(ToolRef::definition).collect()
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns true when no tool is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Calls a registered tool.
    ///
    /// # Errors
    ///
    /// Returns an unknown-tool [`ToolError`] for unregistered names, otherwise
    /// whatever the tool returns.
    pub async fn call(&self, name: &str, input: Value) -> Result<Value, ToolError> {
        let tool = self.get(name).ok_or_else(|| ToolError::unknown_tool(name))?;
        tool.call(input).await
    }
}
