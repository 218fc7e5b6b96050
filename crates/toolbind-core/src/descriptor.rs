// crates/toolbind-core/src/descriptor.rs
// ============================================================================
// Module: Descriptor Model
// Description: Resolved, typed view of service schema definitions.
// Purpose: Give the pipeline complete type information with typed annotations.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The descriptor model is the engine's only input. Host drivers build it from
//! whatever the schema toolchain hands them and decode custom metadata into
//! [`ToolAnnotation`] and [`FieldAnnotation`] at that boundary, so nothing
//! downstream performs dynamic option lookups.
//!
//! Message names are fully qualified without a leading dot
//! (`invoice.v1.Invoice.LineItem`). Lookups tolerate the leading dot that
//! protobuf descriptors carry in `type_name`.

use std::collections::BTreeMap;

// ============================================================================
// SECTION: Annotations
// ============================================================================

/// Operation-level documentation annotation.
///
/// # Invariants
/// - Presence of this record is what makes an operation tool-eligible.
/// - An empty `name` means the tool name is derived from identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolAnnotation {
    /// Declared tool name (may be empty).
    pub name: String,
    /// Tool description shown to the agent.
    pub description: String,
}

impl ToolAnnotation {
    /// Creates an annotation with a declared name and description.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Field-level annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldAnnotation {
    /// Field description.
    pub description: String,
    /// Explicit required flag. Never inferred.
    pub required: bool,
    /// Example value rendered verbatim.
    pub example: String,
}

impl FieldAnnotation {
    /// Creates an annotation with only a description.
    #[must_use]
    pub fn described(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    /// Marks the annotated field as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attaches an example value.
    #[must_use]
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = example.into();
        self
    }
}

// ============================================================================
// SECTION: Field Types
// ============================================================================

/// Protobuf scalar value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScalarType {
    /// 64-bit float.
    Double,
    /// 32-bit float.
    Float,
    /// Signed 32-bit varint.
    Int32,
    /// Signed 64-bit varint.
    Int64,
    /// Unsigned 32-bit varint.
    Uint32,
    /// Unsigned 64-bit varint.
    Uint64,
    /// Zigzag 32-bit.
    Sint32,
    /// Zigzag 64-bit.
    Sint64,
    /// Fixed 32-bit unsigned.
    Fixed32,
    /// Fixed 64-bit unsigned.
    Fixed64,
    /// Fixed 32-bit signed.
    Sfixed32,
    /// Fixed 64-bit signed.
    Sfixed64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    String,
    /// Raw bytes.
    Bytes,
}

impl ScalarType {
    /// Returns the protobuf spelling of the scalar type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Double => "double",
            Self::Float => "float",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Sint32 => "sint32",
            Self::Sint64 => "sint64",
            Self::Fixed32 => "fixed32",
            Self::Fixed64 => "fixed64",
            Self::Sfixed32 => "sfixed32",
            Self::Sfixed64 => "sfixed64",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Bytes => "bytes",
        }
    }

    /// Returns true for integer scalar types.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Int32
                | Self::Int64
                | Self::Uint32
                | Self::Uint64
                | Self::Sint32
                | Self::Sint64
                | Self::Fixed32
                | Self::Fixed64
                | Self::Sfixed32
                | Self::Sfixed64
        )
    }
}

/// Value type of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Scalar value.
    Scalar(ScalarType),
    /// Enum value, by fully qualified enum name.
    Enum(String),
    /// Message value, by fully qualified message name.
    Message(String),
}

impl FieldType {
    /// Returns a short human-readable label for diagnostics.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Scalar(scalar) => scalar.as_str().to_string(),
            Self::Enum(name) => format!("enum {name}"),
            Self::Message(name) => format!("message {name}"),
        }
    }
}

/// Field cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cardinality {
    /// Single value (including proto3 `optional`).
    #[default]
    Singular,
    /// Repeated value; map fields are repeated map-entry messages.
    Repeated,
}

// ============================================================================
// SECTION: Messages
// ============================================================================

/// Field of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name as declared.
    pub name: String,
    /// Field number.
    pub number: i32,
    /// Cardinality.
    pub cardinality: Cardinality,
    /// Value type.
    pub field_type: FieldType,
    /// Decoded field annotation, if any.
    pub annotation: Option<FieldAnnotation>,
}

impl FieldDescriptor {
    /// Creates a singular field of the given type.
    #[must_use]
    pub fn new(name: impl Into<String>, number: i32, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            number,
            cardinality: Cardinality::Singular,
            field_type,
            annotation: None,
        }
    }

    /// Creates a singular scalar field.
    #[must_use]
    pub fn scalar(name: impl Into<String>, number: i32, scalar: ScalarType) -> Self {
        Self::new(name, number, FieldType::Scalar(scalar))
    }

    /// Creates a singular message field.
    #[must_use]
    pub fn message(name: impl Into<String>, number: i32, type_name: impl Into<String>) -> Self {
        Self::new(name, number, FieldType::Message(type_name.into()))
    }

    /// Marks the field as repeated.
    #[must_use]
    pub const fn repeated(mut self) -> Self {
        self.cardinality = Cardinality::Repeated;
        self
    }

    /// Attaches a field annotation.
    #[must_use]
    pub fn annotated(mut self, annotation: FieldAnnotation) -> Self {
        self.annotation = Some(annotation);
        self
    }

    /// Returns true when the field is annotated as required.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.annotation.as_ref().is_some_and(|annotation| annotation.required)
    }
}

/// Message type definition.
///
/// # Invariants
/// - `full_name` is fully qualified without a leading dot.
/// - `package` is a prefix of `full_name` (or empty).
/// - Field order is declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDescriptor {
    /// Fully qualified message name.
    pub full_name: String,
    /// Protobuf package that declares the message.
    pub package: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
    /// True for synthesized map entry messages.
    pub map_entry: bool,
}

impl MessageDescriptor {
    /// Creates an empty message in the given package.
    #[must_use]
    pub fn new(package: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            package: package.into(),
            fields: Vec::new(),
            map_entry: false,
        }
    }

    /// Creates a map entry message with `key` and `value` fields.
    #[must_use]
    pub fn map_entry(
        package: impl Into<String>,
        full_name: impl Into<String>,
        key: FieldType,
        value: FieldType,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            package: package.into(),
            fields: vec![FieldDescriptor::new("key", 1, key), FieldDescriptor::new("value", 2, value)],
            map_entry: true,
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Returns the message name relative to its package (`Outer.Inner`).
    #[must_use]
    pub fn relative_name(&self) -> &str {
        if self.package.is_empty() {
            return &self.full_name;
        }
        self.full_name
            .strip_prefix(self.package.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(&self.full_name)
    }

    /// Returns the field with the given name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
}

// ============================================================================
// SECTION: Services
// ============================================================================

/// RPC operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    /// Operation name as declared (`GetWeather`).
    pub name: String,
    /// Fully qualified input message name.
    pub input_type: String,
    /// Fully qualified output message name.
    pub output_type: String,
    /// Client-streaming flag.
    pub client_streaming: bool,
    /// Server-streaming flag.
    pub server_streaming: bool,
    /// Decoded documentation annotation; `None` hides the operation.
    pub tool: Option<ToolAnnotation>,
}

impl MethodDescriptor {
    /// Creates a unary operation without annotation.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        input_type: impl Into<String>,
        output_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            input_type: input_type.into(),
            output_type: output_type.into(),
            client_streaming: false,
            server_streaming: false,
            tool: None,
        }
    }

    /// Attaches a documentation annotation.
    #[must_use]
    pub fn documented(mut self, tool: ToolAnnotation) -> Self {
        self.tool = Some(tool);
        self
    }
}

/// RPC service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// Service name as declared (`ToolCatalog`).
    pub name: String,
    /// Operations in declaration order.
    pub methods: Vec<MethodDescriptor>,
}

impl ServiceDescriptor {
    /// Creates a service without operations.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// Appends an operation.
    #[must_use]
    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }
}

// ============================================================================
// SECTION: Files and Sets
// ============================================================================

/// Schema source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// File name relative to the schema root (`invoice/v1/invoice.proto`).
    pub name: String,
    /// Protobuf package.
    pub package: String,
    /// Services in declaration order.
    pub services: Vec<ServiceDescriptor>,
}

impl FileDescriptor {
    /// Creates a file without services.
    #[must_use]
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            services: Vec::new(),
        }
    }

    /// Appends a service.
    #[must_use]
    pub fn with_service(mut self, service: ServiceDescriptor) -> Self {
        self.services.push(service);
        self
    }
}

/// Fully resolved descriptor set.
///
/// # Invariants
/// - Every message referenced by a field or operation is expected to be
///   present; missing references surface as errors during generation.
/// - `files` keeps insertion order; `messages` is keyed by full name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorSet {
    /// Files in insertion order.
    pub files: Vec<FileDescriptor>,
    /// Messages keyed by fully qualified name.
    pub messages: BTreeMap<String, MessageDescriptor>,
}

impl DescriptorSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file.
    pub fn add_file(&mut self, file: FileDescriptor) {
        self.files.push(file);
    }

    /// Adds a message, replacing any earlier definition with the same name.
    pub fn add_message(&mut self, message: MessageDescriptor) {
        self.messages.insert(message.full_name.clone(), message);
    }

    /// Looks up a message by fully qualified name (leading dot tolerated).
    #[must_use]
    pub fn message(&self, name: &str) -> Option<&MessageDescriptor> {
        self.messages.get(normalize_type_name(name))
    }

    /// Looks up a file by name.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&FileDescriptor> {
        self.files.iter().find(|file| file.name == name)
    }

    /// Returns true when `field` is a map field.
    #[must_use]
    pub fn is_map_field(&self, field: &FieldDescriptor) -> bool {
        if field.cardinality != Cardinality::Repeated {
            return false;
        }
        match &field.field_type {
            FieldType::Message(name) => self.message(name).is_some_and(|entry| entry.map_entry),
            FieldType::Scalar(_) | FieldType::Enum(_) => false,
        }
    }
}

/// Strips the leading dot protobuf uses for fully qualified type references.
#[must_use]
pub fn normalize_type_name(name: &str) -> &str {
    name.strip_prefix('.').unwrap_or(name)
}

#[cfg(test)]
mod tests;
