// crates/toolbind-core/src/generator.rs
// ============================================================================
// Module: Generator
// Description: Single-pass orchestration of extraction, schemas and emission.
// Purpose: Produce every artifact of a run or none at all.
// Dependencies: std
// ============================================================================

//! ## Overview
//! [`Generator::generate`] runs the pipeline for the requested files in three
//! phases: extraction for every file, schema construction for every tool, then
//! emission. All artifacts are held in memory until every phase succeeded, so
//! a failure anywhere yields an error and no output.

use crate::GenerationError;
use crate::context::NameScope;
use crate::context::RunContext;
use crate::descriptor::DescriptorSet;
use crate::descriptor::FileDescriptor;
use crate::descriptor::normalize_type_name;
use crate::emit;
use crate::emit::EmitOptions;
use crate::emit::ToolBinding;
use crate::extract;
use crate::extract::AnnotationPolicy;
use crate::extract::ToolSpecification;
use crate::naming;
use crate::schema::SchemaBuilder;

/// Default output suffix replacing the input file extension.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_agent_tools.rs";

/// Options for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Tool-name uniqueness scope.
    pub name_scope: NameScope,
    /// Metadata policy.
    pub policy: AnnotationPolicy,
    /// Rendering options.
    pub emit: EmitOptions,
    /// Optional maximum schema nesting depth; `None` leaves nesting unbounded.
    pub max_schema_depth: Option<usize>,
    /// Output file suffix.
    pub output_suffix: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            name_scope: NameScope::default(),
            policy: AnnotationPolicy::default(),
            emit: EmitOptions::default(),
            max_schema_depth: None,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
        }
    }
}

/// One rendered artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Input file name.
    pub source: String,
    /// Output artifact name (relative path).
    pub name: String,
    /// Rendered source text.
    pub content: String,
    /// Tools rendered into the artifact, in declaration order.
    pub tools: Vec<ToolBinding>,
}

/// Generation pipeline.
///
/// # Invariants
/// - Each call to [`Generator::generate`] uses a fresh [`RunContext`].
#[derive(Debug, Clone, Default)]
pub struct Generator {
    /// Run options.
    options: GeneratorOptions,
}

impl Generator {
    /// Creates a generator.
    #[must_use]
    pub const fn new(options: GeneratorOptions) -> Self {
        Self {
            options,
        }
    }

    /// Returns the run options.
    #[must_use]
    pub const fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Generates artifacts for `files_to_generate`, in request order.
    ///
    /// # Errors
    /// Returns [`GenerationError`] when a requested file is unknown or any
    /// extraction, schema or rendering step fails. No artifact is returned
    /// on error.
    pub fn generate(
        &self,
        descriptors: &DescriptorSet,
        files_to_generate: &[String],
    ) -> Result<Vec<GeneratedFile>, GenerationError> {
        let mut context = RunContext::new(self.options.name_scope);
        let mut extracted: Vec<(&FileDescriptor, Vec<ToolSpecification>)> =
            Vec::with_capacity(files_to_generate.len());
        for name in files_to_generate {
            let file = descriptors
                .file(name)
                .ok_or_else(|| GenerationError::UnknownFile(name.clone()))?;
            let tools = extract::extract_tools(descriptors, file, &mut context, self.options.policy)?;
            extracted.push((file, tools));
        }

        let builder = SchemaBuilder::new(descriptors).with_max_depth(self.options.max_schema_depth);
        let mut bound: Vec<(&FileDescriptor, Vec<ToolBinding>)> = Vec::with_capacity(extracted.len());
        for (file, tools) in extracted {
            let mut bindings = Vec::with_capacity(tools.len());
            for spec in tools {
                let schema = builder.build(&spec.input_type)?;
                bindings.push(ToolBinding {
                    input_path: type_path(descriptors, &file.package, &spec.input_type),
                    output_path: type_path(descriptors, &file.package, &spec.output_type),
                    spec,
                    schema,
                });
            }
            bound.push((file, bindings));
        }

        let mut generated = Vec::with_capacity(bound.len());
        for (file, tools) in bound {
            let content = emit::emit_file(&file.name, &tools, &self.options.emit)?;
            generated.push(GeneratedFile {
                source: file.name.clone(),
                name: naming::output_file_name(&file.name, &self.options.output_suffix),
                content,
                tools,
            });
        }
        Ok(generated)
    }
}

/// Resolves the Rust path of a message type referenced from `from_package`.
fn type_path(descriptors: &DescriptorSet, from_package: &str, type_name: &str) -> String {
    let name = normalize_type_name(type_name);
    let target_package = if extract::is_well_known(name) {
        naming::WELL_KNOWN_PACKAGE
    } else {
        descriptors.message(name).map_or("", |message| message.package.as_str())
    };
    naming::rust_type_path(from_package, target_package, name)
}
