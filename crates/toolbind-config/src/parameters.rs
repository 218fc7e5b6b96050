// crates/toolbind-config/src/parameters.rs
// ============================================================================
// Module: Plugin Parameters
// Description: Parsing of the protoc plugin parameter string.
// Purpose: Turn `k=v,k=v` overrides into typed values.
// Dependencies: std
// ============================================================================

//! ## Overview
//! protoc passes `--agent-tools_opt` values to the plugin as one
//! comma-separated parameter string. Parsing is strict: unknown keys,
//! duplicate keys, segments without `=` and malformed values are errors.
//! Empty segments are ignored.

use std::path::PathBuf;

use crate::config::ConfigError;
use crate::config::NamingScope;
use crate::config::validate_path_string;

/// Maximum accepted parameter string length.
const MAX_PARAMETER_LENGTH: usize = 8192;

/// Audit sink override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditOverride {
    /// Disable auditing.
    Off,
    /// Write events to stderr.
    Stderr,
    /// Append events to the given file.
    File(String),
}

/// Parsed plugin parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginParameters {
    /// Configuration file path.
    pub config: Option<PathBuf>,
    /// Output suffix override.
    pub suffix: Option<String>,
    /// Runtime crate path override.
    pub runtime_crate: Option<String>,
    /// Uniqueness scope override.
    pub scope: Option<NamingScope>,
    /// Schema depth override.
    pub max_schema_depth: Option<usize>,
    /// Audit sink override.
    pub audit: Option<AuditOverride>,
}

impl PluginParameters {
    /// Parses a protoc parameter string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for unknown or duplicate keys,
    /// segments without `=`, and malformed values.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        if raw.len() > MAX_PARAMETER_LENGTH {
            return Err(ConfigError::Invalid("plugin parameter exceeds max length".to_string()));
        }
        let mut parameters = Self::default();
        let mut seen: Vec<&str> = Vec::new();
        for segment in raw.split(',') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let Some((key, value)) = segment.split_once('=') else {
                return Err(ConfigError::Invalid(format!(
                    "plugin parameter `{segment}` must be key=value"
                )));
            };
            let key = key.trim();
            let value = value.trim();
            if seen.contains(&key) {
                return Err(ConfigError::Invalid(format!("plugin parameter `{key}` repeated")));
            }
            seen.push(key);
            parameters.set(key, value)?;
        }
        Ok(parameters)
    }

    /// Stores one parameter value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "config" => {
                validate_path_string("config", value)?;
                self.config = Some(PathBuf::from(value));
            }
            "suffix" => self.suffix = Some(value.to_string()),
            "runtime_crate" => self.runtime_crate = Some(value.to_string()),
            "scope" => {
                let scope = NamingScope::parse(value).ok_or_else(|| {
                    ConfigError::Invalid(format!("scope must be `run` or `file`, got `{value}`"))
                })?;
                self.scope = Some(scope);
            }
            "max_schema_depth" => {
                let depth = value.parse::<usize>().map_err(|_| {
                    ConfigError::Invalid(format!("max_schema_depth must be an integer, got `{value}`"))
                })?;
                self.max_schema_depth = Some(depth);
            }
            "audit" => self.audit = Some(parse_audit(value)?),
            other => {
                return Err(ConfigError::Invalid(format!("unknown plugin parameter `{other}`")));
            }
        }
        Ok(())
    }
}

/// Parses an `audit` parameter value.
fn parse_audit(value: &str) -> Result<AuditOverride, ConfigError> {
    match value {
        "off" => Ok(AuditOverride::Off),
        "stderr" => Ok(AuditOverride::Stderr),
        _ => {
            let Some(path) = value.strip_prefix("file:") else {
                return Err(ConfigError::Invalid(format!(
                    "audit must be `off`, `stderr` or `file:<path>`, got `{value}`"
                )));
            };
            validate_path_string("audit", path)?;
            Ok(AuditOverride::File(path.to_string()))
        }
    }
}
