// crates/toolbind-core/src/naming.rs
// ============================================================================
// Module: Naming
// Description: Identifier, tool-name, file-name and type-path derivation.
// Purpose: Deterministic mapping from schema identifiers to generated names.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Every name that appears in generated output is derived here so that the
//! extractor (which checks uniqueness) and the emitter (which prints names)
//! can never disagree. Case conversion follows the prost conventions so
//! generated bindings line up with prost-generated message types.

/// Maximum length of a tool name accepted by agent runtimes.
pub const MAX_TOOL_NAME_LENGTH: usize = 64;

/// Keywords that must be emitted as raw identifiers.
const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers and get a trailing underscore.
const SUFFIXED_KEYWORDS: &[&str] = &["crate", "self", "super", "Self"];

// ============================================================================
// SECTION: Case Conversion
// ============================================================================

/// Splits an identifier into lowercase words.
///
/// Boundaries are non-alphanumeric characters, lower-to-upper transitions,
/// digit-to-upper transitions and the last capital of an acronym followed by
/// a lowercase letter (`HTTPStatus` -> `http`, `status`).
fn words(value: &str) -> Vec<String> {
    let chars: Vec<char> = value.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    for (index, &ch) in chars.iter().enumerate() {
        if !ch.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if ch.is_ascii_uppercase() && !current.is_empty() {
            let prev = chars[index - 1];
            let next_is_lower = chars.get(index + 1).is_some_and(char::is_ascii_lowercase);
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(ch.to_ascii_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Converts an identifier into `snake_case`.
#[must_use]
pub fn snake_case(value: &str) -> String {
    words(value).join("_")
}

/// Converts an identifier into `SCREAMING_SNAKE_CASE`.
#[must_use]
pub fn screaming_snake_case(value: &str) -> String {
    snake_case(value).to_ascii_uppercase()
}

/// Converts an identifier into `PascalCase`.
#[must_use]
pub fn pascal_case(value: &str) -> String {
    let mut output = String::new();
    for word in words(value) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            output.push(first.to_ascii_uppercase());
            output.extend(chars);
        }
    }
    output
}

/// Makes a derived identifier safe to emit.
///
/// Keywords become raw identifiers (or get a trailing underscore when raw
/// form is not allowed) and identifiers starting with a digit get a leading
/// underscore.
#[must_use]
pub fn rust_ident(value: &str) -> String {
    if value.is_empty() {
        return String::from("_");
    }
    if SUFFIXED_KEYWORDS.contains(&value) {
        return format!("{value}_");
    }
    if RAW_KEYWORDS.contains(&value) {
        return format!("r#{value}");
    }
    if value.starts_with(|ch: char| ch.is_ascii_digit()) {
        return format!("_{value}");
    }
    value.to_string()
}

// ============================================================================
// SECTION: Tool Names
// ============================================================================

/// Derives the tool name used when an annotation declares none.
#[must_use]
pub fn derive_tool_name(service: &str, method: &str) -> String {
    format!("{}_{}", snake_case(service), snake_case(method))
}

/// Returns true when `name` is an acceptable agent tool name.
#[must_use]
pub fn is_valid_tool_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_TOOL_NAME_LENGTH
        && name.chars().all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.'))
}

// ============================================================================
// SECTION: Generated Identifiers
// ============================================================================

/// Identifiers emitted for one tool.
///
/// # Invariants
/// - All identifiers are derived from the owning service and operation names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolIdents {
    /// Tool-name constant (`TOOL_CATALOG_GET_WEATHER_TOOL`).
    pub name_const: String,
    /// Schema constant (`TOOL_CATALOG_GET_WEATHER_INPUT_SCHEMA`).
    pub schema_const: String,
    /// Dispatch function (`call_tool_catalog_get_weather`).
    pub call_fn: String,
    /// Tool constructor (`define_tool_catalog_get_weather_tool`).
    pub define_fn: String,
    /// Service trait method (`get_weather`).
    pub trait_method: String,
}

impl ToolIdents {
    /// Derives the identifiers for `service` / `method`.
    #[must_use]
    pub fn derive(service: &str, method: &str) -> Self {
        let screaming = format!("{}_{}", screaming_snake_case(service), screaming_snake_case(method));
        let snake = format!("{}_{}", snake_case(service), snake_case(method));
        Self {
            name_const: rust_ident(&format!("{screaming}_TOOL")),
            schema_const: rust_ident(&format!("{screaming}_INPUT_SCHEMA")),
            call_fn: rust_ident(&format!("call_{snake}")),
            define_fn: rust_ident(&format!("define_{snake}_tool")),
            trait_method: rust_ident(&snake_case(method)),
        }
    }
}

/// Returns the trait name for a service (`ToolCatalogTools`).
#[must_use]
pub fn service_trait_name(service: &str) -> String {
    rust_ident(&format!("{}Tools", pascal_case(service)))
}

/// Returns the per-file aggregator function name (`catalog_tools`).
#[must_use]
pub fn aggregator_fn_name(file_name: &str) -> String {
    rust_ident(&format!("{}_tools", snake_case(file_stem(file_name))))
}

// ============================================================================
// SECTION: Files
// ============================================================================

/// Returns the last path component of `file_name` without its extension.
#[must_use]
pub fn file_stem(file_name: &str) -> &str {
    let base = file_name.rsplit('/').next().unwrap_or(file_name);
    match base.rfind('.') {
        Some(index) if index > 0 => &base[.. index],
        _ => base,
    }
}

/// Derives the output artifact name for an input file.
///
/// The extension of the last path component is replaced by `suffix`;
/// directories are kept so output mirrors input identity.
#[must_use]
pub fn output_file_name(file_name: &str, suffix: &str) -> String {
    let (dir, base) = match file_name.rfind('/') {
        Some(index) => (&file_name[..= index], &file_name[index + 1 ..]),
        None => ("", file_name),
    };
    let stem = match base.rfind('.') {
        Some(index) if index > 0 => &base[.. index],
        _ => base,
    };
    format!("{dir}{stem}{suffix}")
}

// ============================================================================
// SECTION: Type Paths
// ============================================================================

/// Package that hosts protobuf well-known types.
pub const WELL_KNOWN_PACKAGE: &str = "google.protobuf";

/// Resolves the Rust path of a message as seen from code in `from_package`.
///
/// `full_name` is the fully qualified message name and `target_package` the
/// package that declares it. Nested messages live in snake_case modules named
/// after their parents; other packages are reached through `super::` hops.
#[must_use]
pub fn rust_type_path(from_package: &str, target_package: &str, full_name: &str) -> String {
    let full_name = crate::descriptor::normalize_type_name(full_name);
    let relative = if target_package.is_empty() {
        full_name
    } else {
        full_name
            .strip_prefix(target_package)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(full_name)
    };
    if target_package == WELL_KNOWN_PACKAGE {
        if relative == "Empty" {
            return String::from("()");
        }
        return format!("::prost_types::{}", pascal_case(relative));
    }

    let from: Vec<&str> = package_segments(from_package);
    let target: Vec<&str> = package_segments(target_package);
    let common = from.iter().zip(target.iter()).take_while(|(lhs, rhs)| lhs == rhs).count();

    let mut segments: Vec<String> = Vec::new();
    for _ in common .. from.len() {
        segments.push(String::from("super"));
    }
    for segment in &target[common ..] {
        segments.push(rust_ident(&snake_case(segment)));
    }
    let nested: Vec<&str> = relative.split('.').collect();
    if let Some((last, parents)) = nested.split_last() {
        for parent in parents {
            segments.push(rust_ident(&snake_case(parent)));
        }
        segments.push(rust_ident(&pascal_case(last)));
    }
    segments.join("::")
}

/// Splits a package into segments; the root package has none.
fn package_segments(package: &str) -> Vec<&str> {
    if package.is_empty() { Vec::new() } else { package.split('.').collect() }
}
