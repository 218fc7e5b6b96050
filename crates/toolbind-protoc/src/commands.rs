// crates/toolbind-protoc/src/commands.rs
// ============================================================================
// Module: Generation Commands
// Description: Audited generation runs shared by the plugin and the CLI.
// Purpose: Generate, write, verify and inspect tool bindings.
// Dependencies: prost, serde_json, toolbind-config, toolbind-core
// ============================================================================

//! ## Overview
//! A [`GenerationRun`] pairs a resolved [`ToolbindConfig`] with an audit sink.
//! Every operation renders the complete set of artifacts first and only then
//! touches the filesystem, so a failing run writes nothing.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use prost::Message;
use serde_json::Value;
use serde_json::json;
use toolbind_config::ToolbindConfig;
use toolbind_core::DescriptorSet;
use toolbind_core::GeneratedFile;
use toolbind_core::Generator;

use crate::PluginError;
use crate::audit;
use crate::audit::AuditSink;
use crate::audit::GenerationAuditEvent;
use crate::audit::RunMode;
use crate::convert;
use crate::output;
use crate::request::RawFileDescriptorSet;

// ============================================================================
// SECTION: Descriptor Input
// ============================================================================

/// Reads and converts a serialized `FileDescriptorSet`.
///
/// # Errors
///
/// Returns [`PluginError`] when the file cannot be read, exceeds `limit`
/// bytes, or does not decode.
pub fn read_descriptor_set(path: &Path, limit: usize) -> Result<DescriptorSet, PluginError> {
    let file = File::open(path).map_err(|err| PluginError::Io(format!("{}: {err}", path.display())))?;
    let bytes = read_bounded(file, limit)?;
    let raw = RawFileDescriptorSet::decode(bytes.as_slice())
        .map_err(|err| PluginError::Decode(format!("{}: {err}", path.display())))?;
    convert::descriptor_set(&raw.file)
}

/// Reads at most `limit` bytes; longer input is an error.
///
/// # Errors
///
/// Returns [`PluginError`] on read failure or when the input exceeds `limit`.
pub fn read_bounded<R: Read>(reader: R, limit: usize) -> Result<Vec<u8>, PluginError> {
    let cap = u64::try_from(limit)
        .map_err(|_| PluginError::Io("request limit exceeds addressable size".to_string()))?;
    let mut bytes = Vec::new();
    reader
        .take(cap.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|err| PluginError::Io(err.to_string()))?;
    if bytes.len() > limit {
        return Err(PluginError::Decode(format!("input exceeds {limit} bytes")));
    }
    Ok(bytes)
}

/// Selects the files to generate: `requested`, or every file with a service.
#[must_use]
pub fn select_files(descriptors: &DescriptorSet, requested: &[String]) -> Vec<String> {
    if !requested.is_empty() {
        return requested.to_vec();
    }
    descriptors
        .files
        .iter()
        .filter(|file| !file.services.is_empty())
        .map(|file| file.name.clone())
        .collect()
}

// ============================================================================
// SECTION: Generation Run
// ============================================================================

/// Audited generation run.
pub struct GenerationRun {
    /// Resolved configuration.
    config: ToolbindConfig,
    /// Event sink.
    audit: Box<dyn AuditSink>,
    /// Driver mode recorded on events.
    mode: RunMode,
}

impl GenerationRun {
    /// Creates a run with the sink selected by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Io`] when the configured file sink cannot be
    /// opened.
    pub fn new(config: ToolbindConfig, mode: RunMode) -> Result<Self, PluginError> {
        let audit = audit::sink_from_config(&config.audit)?;
        Ok(Self::with_audit(config, mode, audit))
    }

    /// Creates a run with an explicit sink.
    #[must_use]
    pub fn with_audit(config: ToolbindConfig, mode: RunMode, audit: Box<dyn AuditSink>) -> Self {
        Self {
            config,
            audit,
            mode,
        }
    }

    /// Returns the resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &ToolbindConfig {
        &self.config
    }

    /// Records a failure event and hands the error back.
    pub fn fail(&self, err: PluginError) -> PluginError {
        self.audit.record(&GenerationAuditEvent::failed(self.mode, &err));
        err
    }

    /// Renders artifacts for `files` in memory.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Generation`] when the engine rejects the input.
    pub fn generate(
        &self,
        descriptors: &DescriptorSet,
        files: &[String],
    ) -> Result<Vec<GeneratedFile>, PluginError> {
        self.audit.record(&GenerationAuditEvent::started(self.mode, files));
        let generator = Generator::new(self.config.generator_options());
        let generated =
            generator.generate(descriptors, files).map_err(|err| self.fail(err.into()))?;
        for file in &generated {
            self.audit.record(&GenerationAuditEvent::file_generated(self.mode, file));
        }
        Ok(generated)
    }

    /// Renders every artifact, then writes them under `out`.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError`] when generation or writing fails.
    pub fn write(
        &self,
        descriptors: &DescriptorSet,
        files: &[String],
        out: &Path,
    ) -> Result<Vec<GeneratedFile>, PluginError> {
        let generated = self.generate(descriptors, files)?;
        output::write_artifacts(out, &generated).map_err(|err| self.fail(err))?;
        Ok(generated)
    }

    /// Regenerates and compares with the artifacts under `out`.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Drift`] naming every stale artifact, or the
    /// generation or IO error that prevented the comparison.
    pub fn check(
        &self,
        descriptors: &DescriptorSet,
        files: &[String],
        out: &Path,
    ) -> Result<(), PluginError> {
        let generated = self.generate(descriptors, files)?;
        let directory = output::open_output_dir(out, false).map_err(|err| self.fail(err))?;
        let mut stale = Vec::new();
        for file in &generated {
            let drift = output::compare_artifact(&directory, file).map_err(|err| self.fail(err))?;
            if let Some(drift) = drift {
                self.audit.record(&GenerationAuditEvent::drift(file, drift.as_str()));
                stale.push(format!("{} ({})", file.name, drift.as_str()));
            }
        }
        if stale.is_empty() { Ok(()) } else { Err(PluginError::Drift(stale.join(", "))) }
    }

    /// Describes every extracted tool with its input schema.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Generation`] when the engine rejects the input.
    pub fn inspect(&self, descriptors: &DescriptorSet, files: &[String]) -> Result<Value, PluginError> {
        let generated = self.generate(descriptors, files)?;
        let mut tools = Vec::new();
        for file in &generated {
            for binding in &file.tools {
                let spec = &binding.spec;
                tools.push(json!({
                    "file": file.source,
                    "artifact": file.name,
                    "tool": spec.tool_name,
                    "service": spec.service,
                    "method": spec.method,
                    "description": spec.description,
                    "input_required": spec.input_required(),
                    "input_schema": binding.schema.to_json(),
                }));
            }
        }
        Ok(Value::Array(tools))
    }
}

#[cfg(test)]
mod tests;
