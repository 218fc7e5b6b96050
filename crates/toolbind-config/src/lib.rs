// crates/toolbind-config/src/lib.rs
// ============================================================================
// Module: Toolbind Config Library
// Description: Configuration model, loading and validation for toolbind.
// Purpose: Provide strict, fail-closed configuration for generation runs.
// Dependencies: serde, thiserror, toml, toolbind-core
// ============================================================================

//! ## Overview
//! `toolbind-config` owns the `toolbind.toml` model. Configuration is loaded
//! with a hard size limit, parsed strictly (unknown keys are rejected) and
//! validated before use. protoc plugin parameters are parsed here as well and
//! override file values.
//!
//! ## Index
//! - Model and loading: [`ToolbindConfig`], [`ConfigError`]
//! - Plugin parameters: [`PluginParameters`]

pub mod config;
pub mod parameters;

pub use config::AuditConfig;
pub use config::AuditSinkKind;
pub use config::CONFIG_ENV_VAR;
pub use config::ConfigError;
pub use config::LimitsConfig;
pub use config::NamingConfig;
pub use config::NamingScope;
pub use config::OutputConfig;
pub use config::PolicyConfig;
pub use config::ToolbindConfig;
pub use parameters::AuditOverride;
pub use parameters::PluginParameters;
