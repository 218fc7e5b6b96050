// crates/toolbind-protoc/src/plugin.rs
// ============================================================================
// Module: Protoc Plugin Protocol
// Description: CodeGeneratorRequest in, CodeGeneratorResponse out.
// Purpose: Run the generator as `protoc-gen-agent-tools`.
// Dependencies: prost, prost-types, toolbind-config
// ============================================================================

//! ## Overview
//! protoc expects a response even when generation fails, so every failure
//! after the request is read becomes `CodeGeneratorResponse.error` with no
//! files. Only a failure to write the response itself surfaces as an error.
//!
//! The request is read under the limit of the ambient configuration
//! (`TOOLBIND_CONFIG` or `toolbind.toml`). When the `config=` parameter
//! names another file, its limit is enforced again after decoding.

use std::io::Read;
use std::io::Write;

use prost::Message;
use prost_types::compiler::CodeGeneratorResponse;
use prost_types::compiler::code_generator_response;
use toolbind_config::PluginParameters;
use toolbind_config::ToolbindConfig;
use toolbind_core::GeneratedFile;

use crate::PluginError;
use crate::audit::NoopAuditSink;
use crate::audit::RunMode;
use crate::commands;
use crate::commands::GenerationRun;
use crate::convert;
use crate::request::RawCodeGeneratorRequest;

/// `CodeGeneratorResponse.Feature.FEATURE_PROTO3_OPTIONAL`.
pub const SUPPORTED_FEATURES: u64 = 1;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Reads a request from `input` and writes the response to `output`.
///
/// # Errors
///
/// Returns [`PluginError::Io`] when the response cannot be written.
pub fn run_plugin<R: Read, W: Write>(input: R, mut output: W) -> Result<(), PluginError> {
    let response = match ToolbindConfig::load(None) {
        Ok(ambient) => respond(input, &ambient),
        Err(err) => error_response(&PluginError::Config(err)),
    };
    output.write_all(&response.encode_to_vec()).map_err(|err| PluginError::Io(err.to_string()))?;
    output.flush().map_err(|err| PluginError::Io(err.to_string()))
}

/// Builds the response for one request.
#[must_use]
pub fn respond<R: Read>(input: R, ambient: &ToolbindConfig) -> CodeGeneratorResponse {
    let prepared = read_request(input, ambient.limits.max_request_bytes)
        .and_then(|(request, size)| prepare(request, size));
    let (request, run) = match prepared {
        Ok(prepared) => prepared,
        Err(err) => return error_response(&ambient_run(ambient).fail(err)),
    };
    match generate(&request, &run) {
        Ok(files) => success_response(files),
        Err(err) => error_response(&err),
    }
}

/// Run used to audit failures that happen before configuration resolves.
fn ambient_run(ambient: &ToolbindConfig) -> GenerationRun {
    GenerationRun::new(ambient.clone(), RunMode::Plugin).unwrap_or_else(|_| {
        GenerationRun::with_audit(ambient.clone(), RunMode::Plugin, Box::new(NoopAuditSink))
    })
}

// ============================================================================
// SECTION: Request Handling
// ============================================================================

/// Reads and decodes a request, returning it with its encoded size.
fn read_request<R: Read>(
    input: R,
    limit: usize,
) -> Result<(RawCodeGeneratorRequest, usize), PluginError> {
    let bytes = commands::read_bounded(input, limit)?;
    let request = RawCodeGeneratorRequest::decode(bytes.as_slice())
        .map_err(|err| PluginError::Decode(format!("CodeGeneratorRequest: {err}")))?;
    Ok((request, bytes.len()))
}

/// Resolves parameters and configuration for a decoded request.
fn prepare(
    request: RawCodeGeneratorRequest,
    size: usize,
) -> Result<(RawCodeGeneratorRequest, GenerationRun), PluginError> {
    let parameters = PluginParameters::parse(request.parameter.as_deref().unwrap_or_default())?;
    let config = ToolbindConfig::resolve(&parameters)?;
    if size > config.limits.max_request_bytes {
        return Err(PluginError::Decode(format!(
            "input exceeds {} bytes",
            config.limits.max_request_bytes
        )));
    }
    let run = GenerationRun::new(config, RunMode::Plugin)?;
    Ok((request, run))
}

/// Converts the descriptors and generates every requested file.
fn generate(
    request: &RawCodeGeneratorRequest,
    run: &GenerationRun,
) -> Result<Vec<GeneratedFile>, PluginError> {
    let descriptors = convert::descriptor_set(&request.proto_file).map_err(|err| run.fail(err))?;
    run.generate(&descriptors, &request.file_to_generate)
}

// ============================================================================
// SECTION: Responses
// ============================================================================

/// Response carrying every artifact.
fn success_response(files: Vec<GeneratedFile>) -> CodeGeneratorResponse {
    CodeGeneratorResponse {
        supported_features: Some(SUPPORTED_FEATURES),
        file: files
            .into_iter()
            .map(|file| code_generator_response::File {
                name: Some(file.name),
                content: Some(file.content),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

/// Response reporting a failure with no files.
fn error_response(err: &PluginError) -> CodeGeneratorResponse {
    CodeGeneratorResponse {
        error: Some(err.to_string()),
        supported_features: Some(SUPPORTED_FEATURES),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests;
