// crates/toolbind-protoc/src/main.rs
// ============================================================================
// Module: Toolbind CLI
// Description: protoc plugin entrypoint and descriptor-set commands.
// Purpose: Generate agent tool bindings from protoc or from descriptor files.
// Dependencies: clap, serde_json, toolbind-config, toolbind-protoc
// ============================================================================

//! ## Overview
//! Without a subcommand the binary behaves as `protoc-gen-agent-tools`:
//! protoc writes a request to stdin and reads the response from stdout.
//! The `generate`, `check` and `inspect` subcommands work from a serialized
//! `FileDescriptorSet` (`protoc --descriptor_set_out`).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use toolbind_config::ToolbindConfig;
use toolbind_protoc::GenerationRun;
use toolbind_protoc::PluginError;
use toolbind_protoc::audit::RunMode;
use toolbind_protoc::commands;
use toolbind_protoc::run_plugin;

// ============================================================================
// SECTION: CLI Definition
// ============================================================================

/// Toolbind CLI arguments.
#[derive(Debug, Parser)]
#[command(
    name = "protoc-gen-agent-tools",
    about = "Generate agent tool bindings from annotated protobuf services."
)]
struct Cli {
    /// Subcommand to execute; none runs the protoc plugin protocol.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Supported CLI subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Generate bindings into an output directory.
    Generate {
        /// Input selection.
        #[command(flatten)]
        input: InputArgs,
        /// Output directory for generated artifacts.
        #[arg(long, value_name = "DIR")]
        out: PathBuf,
    },
    /// Verify generated bindings on disk are current.
    Check {
        /// Input selection.
        #[command(flatten)]
        input: InputArgs,
        /// Directory containing generated artifacts.
        #[arg(long, value_name = "DIR")]
        out: PathBuf,
    },
    /// Print extracted tools and their input schemas as JSON.
    Inspect {
        /// Input selection.
        #[command(flatten)]
        input: InputArgs,
    },
}

/// Descriptor input flags shared by every subcommand.
#[derive(Debug, Args)]
struct InputArgs {
    /// Serialized `FileDescriptorSet`.
    #[arg(long, value_name = "FILE")]
    descriptor_set: PathBuf,
    /// File to generate; repeatable. Defaults to every file with a service.
    #[arg(long = "file", value_name = "NAME")]
    files: Vec<String>,
    /// Configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: CLI Execution
// ============================================================================

/// CLI entrypoint.
fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_error(&err),
    }
}

/// Executes the CLI command.
fn run() -> Result<(), PluginError> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        return run_plugin(std::io::stdin().lock(), std::io::stdout().lock());
    };
    match command {
        Command::Generate {
            input,
            out,
        } => {
            let (run, descriptors, files) = prepare(&input, RunMode::Generate)?;
            run.write(&descriptors, &files, &out)?;
            Ok(())
        }
        Command::Check {
            input,
            out,
        } => {
            let (run, descriptors, files) = prepare(&input, RunMode::Check)?;
            run.check(&descriptors, &files, &out)
        }
        Command::Inspect {
            input,
        } => {
            let (run, descriptors, files) = prepare(&input, RunMode::Inspect)?;
            let report = run.inspect(&descriptors, &files)?;
            let text = serde_json::to_string_pretty(&report)
                .map_err(|err| PluginError::Io(err.to_string()))?;
            let mut stdout = std::io::stdout();
            writeln!(stdout, "{text}").map_err(|err| PluginError::Io(err.to_string()))
        }
    }
}

/// Loads configuration and descriptors for a subcommand.
fn prepare(
    input: &InputArgs,
    mode: RunMode,
) -> Result<(GenerationRun, toolbind_core::DescriptorSet, Vec<String>), PluginError> {
    let config = ToolbindConfig::load(input.config.as_deref())?;
    let run = GenerationRun::new(config, mode)?;
    let descriptors =
        commands::read_descriptor_set(&input.descriptor_set, run.config().limits.max_request_bytes)
            .map_err(|err| run.fail(err))?;
    let files = commands::select_files(&descriptors, &input.files);
    Ok((run, descriptors, files))
}

/// Reports CLI errors to stderr and returns a failure exit code.
fn report_error(err: &PluginError) -> ExitCode {
    let mut stderr = std::io::stderr();
    let _ = writeln!(stderr, "{err}");
    ExitCode::FAILURE
}
