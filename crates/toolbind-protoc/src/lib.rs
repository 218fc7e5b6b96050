// crates/toolbind-protoc/src/lib.rs
// ============================================================================
// Module: Toolbind Protoc Library
// Description: Host driver for the toolbind generation engine.
// Purpose: Bridge protoc and descriptor-set files to the pure core engine.
// Dependencies: cap-std, prost, prost-types, serde, thiserror, toolbind-config, toolbind-core
// ============================================================================

//! ## Overview
//! `toolbind-protoc` owns every side effect around the core engine:
//! - [`plugin`] speaks the protoc plugin protocol on stdin and stdout,
//! - [`commands`] drives generation from serialized descriptor sets,
//! - [`convert`] turns raw descriptors into the typed core model, decoding
//!   the custom annotations at that boundary,
//! - [`output`] writes and verifies artifacts through no-follow directory
//!   handles,
//! - [`audit`] records structured generation events.
//!
//! Nothing is written until every artifact of a run has been rendered.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod commands;
pub mod convert;
pub mod output;
pub mod plugin;
pub mod request;

// ============================================================================
// SECTION: Errors
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;
use toolbind_config::ConfigError;
use toolbind_core::GenerationError;

/// Errors raised by the host driver.
///
/// # Invariants
/// - Variants carry human-readable context for diagnostics.
/// - [`PluginError::OutputPath`] always includes the offending path.
#[derive(Debug, Error)]
pub enum PluginError {
    /// IO failure while reading input or writing artifacts.
    #[error("io error: {0}")]
    Io(String),
    /// Request or descriptor bytes could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
    /// Configuration or parameter failure.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// The core engine rejected the descriptors.
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    /// Output path invalid or inaccessible.
    #[error("invalid output path: {0}")]
    OutputPath(PathBuf),
    /// Artifacts on disk differ from freshly generated ones.
    #[error("generated output is stale: {0}")]
    Drift(String),
}

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditSink;
pub use audit::FileAuditSink;
pub use audit::GenerationAuditEvent;
pub use audit::NoopAuditSink;
pub use audit::RunMode;
pub use audit::StderrAuditSink;
pub use commands::GenerationRun;
pub use convert::descriptor_set;
pub use plugin::run_plugin;
