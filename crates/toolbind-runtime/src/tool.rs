// crates/toolbind-runtime/src/tool.rs
// ============================================================================
// Module: Tool References
// Description: Tool names, definitions and type-erased tool handles.
// Purpose: Bridge typed generated dispatchers to JSON agent calls.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! [`ToolRef::new`] parses the embedded schema once and wraps a typed async
//! handler into a JSON-in/JSON-out closure. A `null` or `{}` input reaches
//! the handler as `None`, which generated dispatchers treat as absent.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ToolError;
use crate::error::ToolErrorKind;

/// Boxed future returned by type-erased tool handlers.
pub type ToolFuture = Pin<Box<dyn Future<Output = Result<Value, ToolError>> + Send>>;

/// Type-erased handler.
type Handler = Arc<dyn Fn(Value) -> ToolFuture + Send + Sync>;

// ============================================================================
// SECTION: Tool Name
// ============================================================================

/// Name of a generated tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ToolName(&'static str);

impl ToolName {
    /// Wraps a tool name literal.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

// ============================================================================
// SECTION: Tool Reference
// ============================================================================

/// Agent-facing description of a tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    /// Tool name.
    pub name: String,
    /// Tool description.
    pub description: String,
    /// Parsed input schema.
    pub input_schema: Value,
}

/// Registered tool: definition plus type-erased handler.
#[derive(Clone)]
pub struct ToolRef {
    /// Agent-facing definition.
    definition: ToolDefinition,
    /// JSON handler.
    handler: Handler,
}

impl fmt::Debug for ToolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRef").field("definition", &self.definition).finish_non_exhaustive()
    }
}

impl ToolRef {
    /// Builds a tool from a typed async handler.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] with kind [`ToolErrorKind::InvalidSchema`] when
    /// `schema_json` is not a JSON object.
    pub fn new<Req, Resp, H, Fut>(
        name: ToolName,
        description: &str,
        schema_json: &str,
        handler: H,
    ) -> Result<Self, ToolError>
    where
        Req: DeserializeOwned + Send + 'static,
        Resp: Serialize + Send + 'static,
        H: Fn(Option<Req>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Resp, ToolError>> + Send + 'static,
    {
        let input_schema: Value = serde_json::from_str(schema_json)
            .map_err(|err| ToolError::invalid_schema(name.as_str(), err))?;
        if !input_schema.is_object() {
            return Err(ToolError::invalid_schema(name.as_str(), "schema must be a JSON object"));
        }
        let tool = name.as_str();
        let handler: Handler = Arc::new(move |input: Value| -> ToolFuture {
            match decode_input::<Req>(tool, input) {
                Ok(request) => {
                    let pending = handler(request);
                    Box::pin(async move {
                        let response = pending.await?;
                        serde_json::to_value(response).map_err(|err| {
                            ToolError::with_kind(ToolErrorKind::InvalidOutput, format!("{tool}: {err}"))
                        })
                    })
                }
                Err(err) => Box::pin(std::future::ready(Err(err))),
            }
        });
        Ok(Self {
            definition: ToolDefinition {
                name: tool.to_string(),
                description: description.to_string(),
                input_schema,
            },
            handler,
        })
    }

    /// Returns the agent-facing definition.
    #[must_use]
    pub const fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Invokes the tool with a JSON input.
    #[must_use]
    pub fn call(&self, input: Value) -> ToolFuture {
        (self.handler)(input)
    }
}

/// Decodes a JSON input; `null` and `{}` decode to `None`.
fn decode_input<Req: DeserializeOwned>(tool: &str, input: Value) -> Result<Option<Req>, ToolError> {
    let absent = match &input {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if absent {
        return Ok(None);
    }
    serde_json::from_value(input)
        .map(Some)
        .map_err(|err| ToolError::invalid_input(format!("{tool}: {err}")))
}
