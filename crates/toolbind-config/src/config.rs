// crates/toolbind-config/src/config.rs
// ============================================================================
// Module: Toolbind Configuration
// Description: Configuration loading and validation for generation runs.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, toml, toolbind-core
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! A missing default file yields defaults; an explicitly named file that
//! cannot be read is an error. Every value is validated before it reaches the
//! generator.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use toolbind_core::AnnotationPolicy;
use toolbind_core::EmitOptions;
use toolbind_core::GeneratorOptions;
use toolbind_core::NameScope;
use toolbind_core::emit::DEFAULT_RUNTIME_CRATE;
use toolbind_core::generator::DEFAULT_OUTPUT_SUFFIX;

use crate::parameters::AuditOverride;
use crate::parameters::PluginParameters;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "toolbind.toml";
/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "TOOLBIND_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum length of a full path.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum output suffix length.
const MAX_SUFFIX_LENGTH: usize = 64;
/// Maximum runtime crate path length.
const MAX_RUNTIME_CRATE_LENGTH: usize = 256;
/// Smallest accepted schema depth limit.
pub(crate) const MIN_SCHEMA_DEPTH: usize = 1;
/// Largest accepted schema depth limit.
pub(crate) const MAX_SCHEMA_DEPTH: usize = 256;
/// Default plugin request size limit.
pub(crate) const DEFAULT_MAX_REQUEST_BYTES: usize = 64 * 1024 * 1024;
/// Smallest accepted plugin request size limit.
pub(crate) const MIN_REQUEST_BYTES: usize = 1024;
/// Largest accepted plugin request size limit.
pub(crate) const MAX_REQUEST_BYTES: usize = 256 * 1024 * 1024;
/// Default audit log path for the file sink.
const DEFAULT_AUDIT_PATH: &str = "toolbind-audit.jsonl";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Toolbind configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolbindConfig {
    /// Output naming and dialect settings.
    #[serde(default)]
    pub output: OutputConfig,
    /// Tool-name uniqueness settings.
    #[serde(default)]
    pub naming: NamingConfig,
    /// Metadata policy.
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Hard limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Audit event sink.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl ToolbindConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: `path`, then [`CONFIG_ENV_VAR`], then
    /// `toolbind.toml` in the working directory. Only the last source may be
    /// absent, in which case defaults apply.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path)?;
        validate_path(&resolved)?;
        if !explicit && !resolved.exists() {
            return Ok(Self::default());
        }
        let bytes = fs::read(&resolved).map_err(|err| {
            ConfigError::Io(format!("{}: {err}", resolved.display()))
        })?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        if content.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the file named by the parameters, then applies the overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading, overriding or validation fails.
    pub fn resolve(parameters: &PluginParameters) -> Result<Self, ConfigError> {
        let mut config = Self::load(parameters.config.as_deref())?;
        config.apply(parameters);
        config.validate()?;
        Ok(config)
    }

    /// Applies plugin parameter overrides without validating.
    pub fn apply(&mut self, parameters: &PluginParameters) {
        if let Some(suffix) = &parameters.suffix {
            self.output.suffix.clone_from(suffix);
        }
        if let Some(runtime_crate) = &parameters.runtime_crate {
            self.output.runtime_crate.clone_from(runtime_crate);
        }
        if let Some(scope) = parameters.scope {
            self.naming.scope = scope;
        }
        if let Some(depth) = parameters.max_schema_depth {
            self.limits.max_schema_depth = Some(depth);
        }
        match &parameters.audit {
            Some(AuditOverride::Off) => self.audit.sink = AuditSinkKind::Off,
            Some(AuditOverride::Stderr) => self.audit.sink = AuditSinkKind::Stderr,
            Some(AuditOverride::File(path)) => {
                self.audit.sink = AuditSinkKind::File;
                self.audit.path = Some(path.clone());
            }
            None => {}
        }
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.output.validate()?;
        self.limits.validate()?;
        self.audit.validate()?;
        Ok(())
    }

    /// Returns generator options derived from this configuration.
    #[must_use]
    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            name_scope: self.naming.scope.into(),
            policy: AnnotationPolicy {
                require_tool_description: self.policy.require_tool_description,
                require_required_field_description: self
                    .policy
                    .require_required_field_description,
            },
            emit: EmitOptions {
                runtime_crate: self.output.runtime_crate.clone(),
            },
            max_schema_depth: self.limits.max_schema_depth,
            output_suffix: self.output.suffix.clone(),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Suffix replacing the input file extension.
    pub suffix: String,
    /// Runtime crate path referenced by generated code.
    pub runtime_crate: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
        }
    }
}

impl OutputConfig {
    /// Validates output settings.
    fn validate(&self) -> Result<(), ConfigError> {
        let suffix = self.suffix.as_str();
        if suffix.is_empty() || suffix.len() > MAX_SUFFIX_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "output.suffix must be 1..={MAX_SUFFIX_LENGTH} characters"
            )));
        }
        if !suffix.ends_with(".rs") {
            return Err(ConfigError::Invalid("output.suffix must end with .rs".to_string()));
        }
        if suffix.chars().any(|ch| matches!(ch, '/' | '\\') || ch.is_whitespace() || ch.is_control())
        {
            return Err(ConfigError::Invalid(
                "output.suffix must not contain separators or whitespace".to_string(),
            ));
        }
        if !is_rust_path(&self.runtime_crate) {
            return Err(ConfigError::Invalid(format!(
                "output.runtime_crate is not a Rust path: {}",
                self.runtime_crate
            )));
        }
        Ok(())
    }
}

/// Tool-name uniqueness scope as spelled in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingScope {
    /// Unique within each output file.
    File,
    /// Unique across the whole run.
    #[default]
    Run,
}

impl NamingScope {
    /// Parses a parameter value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "file" => Some(Self::File),
            "run" => Some(Self::Run),
            _ => None,
        }
    }
}

impl From<NamingScope> for NameScope {
    fn from(value: NamingScope) -> Self {
        match value {
            NamingScope::File => Self::File,
            NamingScope::Run => Self::Run,
        }
    }
}

/// Naming settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    /// Tool-name uniqueness scope.
    pub scope: NamingScope,
}

/// Metadata policy settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    /// Documented operations must carry a description.
    pub require_tool_description: bool,
    /// Required fields must carry a description.
    pub require_required_field_description: bool,
}

/// Hard limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Optional maximum schema nesting depth; unset leaves nesting bounded
    /// only by the cycle guard.
    pub max_schema_depth: Option<usize>,
    /// Maximum plugin request size in bytes.
    pub max_request_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_schema_depth: None,
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
        }
    }
}

impl LimitsConfig {
    /// Validates limit ranges.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(depth) = self.max_schema_depth
            && !(MIN_SCHEMA_DEPTH ..= MAX_SCHEMA_DEPTH).contains(&depth)
        {
            return Err(ConfigError::Invalid(format!(
                "limits.max_schema_depth must be between {MIN_SCHEMA_DEPTH} and {MAX_SCHEMA_DEPTH}"
            )));
        }
        if !(MIN_REQUEST_BYTES ..= MAX_REQUEST_BYTES).contains(&self.max_request_bytes) {
            return Err(ConfigError::Invalid(format!(
                "limits.max_request_bytes must be between {MIN_REQUEST_BYTES} and \
                 {MAX_REQUEST_BYTES}"
            )));
        }
        Ok(())
    }
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Audit disabled.
    Off,
}

/// Audit settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink selection.
    pub sink: AuditSinkKind,
    /// Log path for the file sink.
    pub path: Option<String>,
}

impl AuditConfig {
    /// Returns the effective file sink path.
    #[must_use]
    pub fn file_path(&self) -> PathBuf {
        PathBuf::from(self.path.as_deref().unwrap_or(DEFAULT_AUDIT_PATH))
    }

    /// Validates audit settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", path)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from arguments or environment defaults.
///
/// Returns the path and whether it was named explicitly.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        if !env_path.trim().is_empty() {
            return Ok((PathBuf::from(env_path), true));
        }
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
pub(crate) fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Returns true for `ident(::ident)*` with an optional leading `::`.
fn is_rust_path(value: &str) -> bool {
    if value.is_empty() || value.len() > MAX_RUNTIME_CRATE_LENGTH {
        return false;
    }
    let body = value.strip_prefix("::").unwrap_or(value);
    !body.is_empty() && body.split("::").all(is_rust_ident)
}

/// Returns true for a plain (non-raw) Rust identifier other than `_`.
fn is_rust_ident(segment: &str) -> bool {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && segment != "_"
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

#[cfg(test)]
mod tests;
