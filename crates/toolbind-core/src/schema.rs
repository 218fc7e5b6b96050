// crates/toolbind-core/src/schema.rs
// ============================================================================
// Module: Schema Builder
// Description: Recursive conversion of message types into schema descriptions.
// Purpose: Describe each tool input as a nested object/array/scalar tree.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! [`SchemaBuilder::build`] converts a message type into a [`SchemaNode`]
//! tree. Properties keep field declaration order; the `required` list of an
//! object is the ordered subset of its direct fields annotated required.
//!
//! ### Shape rules
//! - scalar and enum fields become scalar nodes,
//! - repeated fields become arrays whose `items` is the element node,
//! - message fields recurse into the referenced message,
//! - map fields become the value message's own object schema (scalar-valued
//!   maps become an object without properties).
//!
//! ### Cycle protection
//! The builder carries the active expansion path explicitly. When a message
//! re-enters its own path the occurrence becomes a terminal object node with
//! no properties, so self-referential schemas always terminate. An acyclic
//! path never exceeds the number of messages in the set, so nesting is
//! otherwise unbounded unless the caller opts into a depth limit.

use std::fmt::Write;

use serde_json::Map;
use serde_json::Value;

use crate::SchemaError;
use crate::descriptor::Cardinality;
use crate::descriptor::DescriptorSet;
use crate::descriptor::FieldAnnotation;
use crate::descriptor::FieldDescriptor;
use crate::descriptor::FieldType;
use crate::descriptor::MessageDescriptor;
use crate::descriptor::ScalarType;
use crate::descriptor::normalize_type_name;

// ============================================================================
// SECTION: Schema Model
// ============================================================================

/// Scalar schema types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// Text (strings, bytes, enums, well-known textual types).
    String,
    /// Whole number.
    Integer,
    /// Floating point number.
    Number,
    /// Boolean.
    Boolean,
}

impl ScalarKind {
    /// Returns the schema `type` value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

impl From<ScalarType> for ScalarKind {
    fn from(value: ScalarType) -> Self {
        match value {
            ScalarType::String | ScalarType::Bytes => Self::String,
            ScalarType::Bool => Self::Boolean,
            ScalarType::Double | ScalarType::Float => Self::Number,
            ScalarType::Int32
            | ScalarType::Int64
            | ScalarType::Uint32
            | ScalarType::Uint64
            | ScalarType::Sint32
            | ScalarType::Sint64
            | ScalarType::Fixed32
            | ScalarType::Fixed64
            | ScalarType::Sfixed32
            | ScalarType::Sfixed64 => Self::Integer,
        }
    }
}

/// Named child of an object node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaProperty {
    /// Property name (field name).
    pub name: String,
    /// Property schema.
    pub node: SchemaNode,
}

/// Shape of a schema node.
///
/// # Invariants
/// - Objects always carry `properties` and `required` (possibly empty).
/// - Arrays always carry `items`.
/// - Scalars carry neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaShape {
    /// Object with ordered properties.
    Object {
        /// Properties in declaration order.
        properties: Vec<SchemaProperty>,
        /// Required property names in declaration order.
        required: Vec<String>,
    },
    /// Array of a single element shape.
    Array {
        /// Element schema.
        items: Box<SchemaNode>,
    },
    /// Scalar value.
    Scalar(ScalarKind),
}

/// Recursive schema description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaNode {
    /// Node shape.
    pub shape: SchemaShape,
    /// Description; `None` when absent or empty.
    pub description: Option<String>,
    /// Example; `None` when absent or empty.
    pub example: Option<String>,
}

impl SchemaNode {
    /// Creates a scalar node.
    #[must_use]
    pub const fn scalar(kind: ScalarKind) -> Self {
        Self {
            shape: SchemaShape::Scalar(kind),
            description: None,
            example: None,
        }
    }

    /// Creates an object node without properties.
    #[must_use]
    pub const fn object() -> Self {
        Self::object_with(Vec::new(), Vec::new())
    }

    /// Creates an object node.
    #[must_use]
    pub const fn object_with(properties: Vec<SchemaProperty>, required: Vec<String>) -> Self {
        Self {
            shape: SchemaShape::Object {
                properties,
                required,
            },
            description: None,
            example: None,
        }
    }

    /// Creates an array node.
    #[must_use]
    pub fn array(items: Self) -> Self {
        Self {
            shape: SchemaShape::Array {
                items: Box::new(items),
            },
            description: None,
            example: None,
        }
    }

    /// Returns the schema `type` value.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match &self.shape {
            SchemaShape::Object {
                ..
            } => "object",
            SchemaShape::Array {
                ..
            } => "array",
            SchemaShape::Scalar(kind) => kind.as_str(),
        }
    }

    /// Returns object properties (empty for non-objects).
    #[must_use]
    pub fn properties(&self) -> &[SchemaProperty] {
        match &self.shape {
            SchemaShape::Object {
                properties,
                ..
            } => properties,
            SchemaShape::Array {
                ..
            }
            | SchemaShape::Scalar(_) => &[],
        }
    }

    /// Returns the named property.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Self> {
        self.properties().iter().find(|property| property.name == name).map(|property| &property.node)
    }

    /// Returns required property names (empty for non-objects).
    #[must_use]
    pub fn required(&self) -> &[String] {
        match &self.shape {
            SchemaShape::Object {
                required,
                ..
            } => required,
            SchemaShape::Array {
                ..
            }
            | SchemaShape::Scalar(_) => &[],
        }
    }

    /// Returns the array element schema.
    #[must_use]
    pub fn items(&self) -> Option<&Self> {
        match &self.shape {
            SchemaShape::Array {
                items,
            } => Some(items),
            SchemaShape::Object {
                ..
            }
            | SchemaShape::Scalar(_) => None,
        }
    }

    /// Applies non-empty description and example from a field annotation.
    fn annotate(&mut self, annotation: &FieldAnnotation) {
        if !annotation.description.is_empty() {
            self.description = Some(annotation.description.clone());
        }
        if !annotation.example.is_empty() {
            self.example = Some(annotation.example.clone());
        }
    }

    /// Returns a JSON view of the node for inspection.
    ///
    /// Properties keep declaration order. [`SchemaNode::render_json`] is the
    /// canonical rendering embedded in generated code.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        if let Some(description) = &self.description {
            map.insert(String::from("description"), Value::String(description.clone()));
        }
        if let Some(example) = &self.example {
            map.insert(String::from("example"), Value::String(example.clone()));
        }
        if let Some(items) = self.items() {
            map.insert(String::from("items"), items.to_json());
        }
        let properties = self.properties();
        if !properties.is_empty() {
            let mut props = Map::new();
            for property in properties {
                props.insert(property.name.clone(), property.node.to_json());
            }
            map.insert(String::from("properties"), Value::Object(props));
        }
        let required = self.required();
        if !required.is_empty() {
            map.insert(
                String::from("required"),
                Value::Array(required.iter().cloned().map(Value::String).collect()),
            );
        }
        map.insert(String::from("type"), Value::String(self.type_name().to_string()));
        Value::Object(map)
    }

    /// Renders the canonical single-line JSON text of the node.
    ///
    /// Keys appear in the fixed order `description`, `example`, `items`,
    /// `properties`, `required`, `type`; properties keep declaration order;
    /// absent or empty values are omitted.
    #[must_use]
    pub fn render_json(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    /// Appends the canonical rendering to `out`.
    fn render_into(&self, out: &mut String) {
        out.push('{');
        let mut first = true;
        if let Some(description) = &self.description {
            push_key(out, &mut first, "description");
            out.push_str(&json_string(description));
        }
        if let Some(example) = &self.example {
            push_key(out, &mut first, "example");
            out.push_str(&json_string(example));
        }
        if let Some(items) = self.items() {
            push_key(out, &mut first, "items");
            items.render_into(out);
        }
        let properties = self.properties();
        if !properties.is_empty() {
            push_key(out, &mut first, "properties");
            out.push('{');
            for (index, property) in properties.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                out.push_str(&json_string(&property.name));
                out.push_str(": ");
                property.node.render_into(out);
            }
            out.push('}');
        }
        let required = self.required();
        if !required.is_empty() {
            push_key(out, &mut first, "required");
            out.push('[');
            for (index, name) in required.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                out.push_str(&json_string(name));
            }
            out.push(']');
        }
        push_key(out, &mut first, "type");
        let _ = write!(out, "\"{}\"", self.type_name());
        out.push('}');
    }
}

/// Writes a key with its leading separator.
fn push_key(out: &mut String, first: &mut bool, key: &str) {
    if !*first {
        out.push_str(", ");
    }
    *first = false;
    out.push('"');
    out.push_str(key);
    out.push_str("\": ");
}

/// Renders a JSON string literal.
fn json_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value.replace('"', "\\\"")))
}

// ============================================================================
// SECTION: Expansion Path
// ============================================================================

/// Message types currently being expanded, outermost first.
#[derive(Debug, Default)]
struct ExpansionPath {
    /// Active message names.
    active: Vec<String>,
}

impl ExpansionPath {
    /// Returns true when `name` is on the active path.
    fn contains(&self, name: &str) -> bool {
        self.active.iter().any(|active| active == name)
    }

    /// Returns the active depth.
    const fn depth(&self) -> usize {
        self.active.len()
    }

    /// Enters a message.
    fn push(&mut self, name: &str) {
        self.active.push(name.to_string());
    }

    /// Leaves the innermost message.
    fn pop(&mut self) {
        self.active.pop();
    }
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Builds schema trees from a descriptor set.
#[derive(Debug, Clone, Copy)]
pub struct SchemaBuilder<'a> {
    /// Complete descriptor set.
    descriptors: &'a DescriptorSet,
    /// Optional maximum message nesting depth.
    max_depth: Option<usize>,
}

impl<'a> SchemaBuilder<'a> {
    /// Creates a builder without a depth limit.
    #[must_use]
    pub const fn new(descriptors: &'a DescriptorSet) -> Self {
        Self {
            descriptors,
            max_depth: None,
        }
    }

    /// Sets or clears the depth limit.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Builds the schema of a message type.
    ///
    /// # Errors
    /// Returns [`SchemaError`] for unresolved types, unsupported map keys,
    /// malformed map entries or nesting beyond a configured depth limit.
    pub fn build(&self, message: &str) -> Result<SchemaNode, SchemaError> {
        let mut path = ExpansionPath::default();
        let element = normalize_type_name(message).to_string();
        self.message_node(message, &element, &mut path)
    }

    /// Builds the node for a message reference.
    fn message_node(
        &self,
        type_name: &str,
        element: &str,
        path: &mut ExpansionPath,
    ) -> Result<SchemaNode, SchemaError> {
        let type_name = normalize_type_name(type_name);
        if let Some(node) = well_known_node(type_name) {
            return Ok(node);
        }
        let Some(message) = self.descriptors.message(type_name) else {
            return Err(SchemaError::UnresolvedType {
                element: element.to_string(),
                type_name: type_name.to_string(),
            });
        };
        if path.contains(type_name) {
            return Ok(SchemaNode::object());
        }
        if let Some(limit) = self.max_depth
            && path.depth() >= limit
        {
            return Err(SchemaError::DepthExceeded {
                element: element.to_string(),
                limit,
            });
        }
        path.push(type_name);
        let result = self.object_from_fields(message, path);
        path.pop();
        result
    }

    /// Builds an object node from a message's fields.
    fn object_from_fields(
        &self,
        message: &MessageDescriptor,
        path: &mut ExpansionPath,
    ) -> Result<SchemaNode, SchemaError> {
        let mut properties = Vec::with_capacity(message.fields.len());
        let mut required = Vec::new();
        for field in &message.fields {
            let element = format!("{}.{}", message.full_name, field.name);
            let mut node = self.field_node(field, &element, path)?;
            if let Some(annotation) = &field.annotation {
                node.annotate(annotation);
                if annotation.required {
                    required.push(field.name.clone());
                }
            }
            properties.push(SchemaProperty {
                name: field.name.clone(),
                node,
            });
        }
        Ok(SchemaNode::object_with(properties, required))
    }

    /// Builds the node for a field, honoring cardinality and maps.
    fn field_node(
        &self,
        field: &FieldDescriptor,
        element: &str,
        path: &mut ExpansionPath,
    ) -> Result<SchemaNode, SchemaError> {
        if self.descriptors.is_map_field(field) {
            return self.map_node(field, element, path);
        }
        let value = self.value_node(&field.field_type, element, path)?;
        match field.cardinality {
            Cardinality::Repeated => Ok(SchemaNode::array(value)),
            Cardinality::Singular => Ok(value),
        }
    }

    /// Builds the node for a single value of a field type.
    fn value_node(
        &self,
        field_type: &FieldType,
        element: &str,
        path: &mut ExpansionPath,
    ) -> Result<SchemaNode, SchemaError> {
        match field_type {
            FieldType::Scalar(scalar) => Ok(SchemaNode::scalar(ScalarKind::from(*scalar))),
            FieldType::Enum(_) => Ok(SchemaNode::scalar(ScalarKind::String)),
            FieldType::Message(name) => self.message_node(name, element, path),
        }
    }

    /// Builds the node for a map field.
    fn map_node(
        &self,
        field: &FieldDescriptor,
        element: &str,
        path: &mut ExpansionPath,
    ) -> Result<SchemaNode, SchemaError> {
        let FieldType::Message(entry_name) = &field.field_type else {
            return Err(SchemaError::MalformedMapEntry {
                element: element.to_string(),
            });
        };
        let Some(entry) = self.descriptors.message(entry_name) else {
            return Err(SchemaError::UnresolvedType {
                element: element.to_string(),
                type_name: normalize_type_name(entry_name).to_string(),
            });
        };
        let (Some(key), Some(value)) = (entry.field("key"), entry.field("value")) else {
            return Err(SchemaError::MalformedMapEntry {
                element: element.to_string(),
            });
        };
        match &key.field_type {
            FieldType::Scalar(scalar)
                if matches!(scalar, ScalarType::String | ScalarType::Bool)
                    || scalar.is_integer() => {}
            other => {
                return Err(SchemaError::UnsupportedMapKey {
                    element: element.to_string(),
                    key: other.label(),
                });
            }
        }
        match &value.field_type {
            FieldType::Message(name) => {
                let node = self.message_node(name, element, path)?;
                if matches!(node.shape, SchemaShape::Object { .. }) {
                    Ok(node)
                } else {
                    Ok(SchemaNode::object())
                }
            }
            FieldType::Scalar(_) | FieldType::Enum(_) => Ok(SchemaNode::object()),
        }
    }
}

// ============================================================================
// SECTION: Well-Known Types
// ============================================================================

/// Returns the fixed schema of a protobuf well-known type.
fn well_known_node(type_name: &str) -> Option<SchemaNode> {
    let name = type_name.strip_prefix("google.protobuf.")?;
    let node = match name {
        "Timestamp" | "Duration" | "FieldMask" | "StringValue" | "BytesValue" => {
            SchemaNode::scalar(ScalarKind::String)
        }
        "BoolValue" => SchemaNode::scalar(ScalarKind::Boolean),
        "Int32Value" | "Int64Value" | "UInt32Value" | "UInt64Value" => {
            SchemaNode::scalar(ScalarKind::Integer)
        }
        "FloatValue" | "DoubleValue" => SchemaNode::scalar(ScalarKind::Number),
        "Struct" | "Any" | "Empty" => SchemaNode::object(),
        _ => return None,
    };
    Some(node)
}
