// crates/toolbind-protoc/src/audit.rs
// ============================================================================
// Module: Generation Audit Logging
// Description: Structured audit events for generation runs.
// Purpose: Emit JSON-line events without touching generated bytes or stdout.
// Dependencies: serde, serde_json, toolbind-config
// ============================================================================

//! ## Overview
//! Every run records `generation_started`, then `file_generated` per artifact
//! or a single `generation_failed`. `check` additionally records
//! `drift_detected`. Sinks swallow their own write failures so auditing can
//! never change the outcome of a run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;
use toolbind_config::AuditConfig;
use toolbind_config::AuditSinkKind;
use toolbind_core::GeneratedFile;

use crate::PluginError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Host driver mode that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// protoc plugin protocol.
    Plugin,
    /// `generate` subcommand.
    Generate,
    /// `check` subcommand.
    Check,
    /// `inspect` subcommand.
    Inspect,
}

/// Generation audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Driver mode.
    pub mode: RunMode,
    /// Requested input files (run events only).
    pub files: Vec<String>,
    /// Input file name (file events only).
    pub source: Option<String>,
    /// Artifact name (file events only).
    pub output: Option<String>,
    /// Number of tools rendered into the artifact.
    pub tools: Option<usize>,
    /// Artifact size in bytes.
    pub bytes: Option<usize>,
    /// Error text for failures and drift.
    pub error: Option<String>,
}

impl GenerationAuditEvent {
    /// Creates an event with a consistent timestamp and no payload.
    fn base(event: &'static str, mode: RunMode) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event,
            timestamp_ms,
            mode,
            files: Vec::new(),
            source: None,
            output: None,
            tools: None,
            bytes: None,
            error: None,
        }
    }

    /// Run start for the requested files.
    #[must_use]
    pub fn started(mode: RunMode, files: &[String]) -> Self {
        Self {
            files: files.to_vec(),
            ..Self::base("generation_started", mode)
        }
    }

    /// One rendered artifact.
    #[must_use]
    pub fn file_generated(mode: RunMode, file: &GeneratedFile) -> Self {
        Self {
            source: Some(file.source.clone()),
            output: Some(file.name.clone()),
            tools: Some(file.tools.len()),
            bytes: Some(file.content.len()),
            ..Self::base("file_generated", mode)
        }
    }

    /// Run failure.
    #[must_use]
    pub fn failed(mode: RunMode, error: &PluginError) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::base("generation_failed", mode)
        }
    }

    /// Stale artifact found by `check`.
    #[must_use]
    pub fn drift(file: &GeneratedFile, detail: &str) -> Self {
        Self {
            source: Some(file.source.clone()),
            output: Some(file.name.clone()),
            error: Some(detail.to_string()),
            ..Self::base("drift_detected", RunMode::Check)
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for generation events.
pub trait AuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &GenerationAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record(&self, event: &GenerationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AuditSink for FileAuditSink {
    fn record(&self, event: &GenerationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &GenerationAuditEvent) {}
}

// ============================================================================
// SECTION: Construction
// ============================================================================

/// Builds the sink selected by configuration.
///
/// # Errors
///
/// Returns [`PluginError::Io`] when the file sink cannot be opened.
pub fn sink_from_config(config: &AuditConfig) -> Result<Box<dyn AuditSink>, PluginError> {
    match config.sink {
        AuditSinkKind::Off => Ok(Box::new(NoopAuditSink)),
        AuditSinkKind::Stderr => Ok(Box::new(StderrAuditSink)),
        AuditSinkKind::File => {
            let path = config.file_path();
            let sink = FileAuditSink::new(&path)
                .map_err(|err| PluginError::Io(format!("{}: {err}", path.display())))?;
            Ok(Box::new(sink))
        }
    }
}
