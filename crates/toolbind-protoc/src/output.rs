// crates/toolbind-protoc/src/output.rs
// ============================================================================
// Module: Artifact Output
// Description: Sandboxed writes and drift checks for generated artifacts.
// Purpose: Persist artifacts without following symlinks or leaving partials.
// Dependencies: cap-primitives, cap-std
// ============================================================================

//! ## Overview
//! Artifact names are parsed into an `ArtifactPath` before anything touches
//! the disk: relative, no parent traversal, at least a file name. The output
//! directory and every directory below it are entered one component at a
//! time through capability handles with symlink following disabled.
//!
//! Writes stage each artifact in a hidden `.partial` sibling and rename it
//! over the target. Every name in a run is parsed before the first write, so
//! an invalid name never leaves a half-written run behind.
//!
//! Drift checks distinguish an artifact that does not exist from one that
//! cannot be inspected: only `NotFound` counts as [`Drift::Missing`]; symlinks,
//! permission failures and type mismatches are reported as errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ffi::OsStr;
use std::ffi::OsString;
use std::io;
use std::io::ErrorKind;
use std::io::Read;
use std::io::Write;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use cap_primitives::fs::FollowSymlinks;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use cap_std::fs::File;
use cap_std::fs::OpenOptions;
use toolbind_core::GeneratedFile;

use crate::PluginError;

/// Staging names tried per artifact before giving up.
const MAX_STAGING_ATTEMPTS: u32 = 64;

/// `ELOOP`: a no-follow open met a symlink.
#[cfg(any(target_os = "linux", target_os = "android"))]
const SYMLINK_ERRNO: Option<i32> = Some(40);
/// `ELOOP`: a no-follow open met a symlink.
#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd",
    target_os = "dragonfly"
))]
const SYMLINK_ERRNO: Option<i32> = Some(62);
/// No portable `ELOOP` on this target.
#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd",
    target_os = "dragonfly"
)))]
const SYMLINK_ERRNO: Option<i32> = None;

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Writes every artifact under `output_dir`, creating directories as needed.
///
/// # Errors
///
/// Returns [`PluginError`] when an artifact path is unsafe or writing fails.
pub fn write_artifacts(output_dir: &Path, files: &[GeneratedFile]) -> Result<(), PluginError> {
    let artifacts =
        files.iter().map(|file| ArtifactPath::parse(&file.name)).collect::<Result<Vec<_>, _>>()?;
    let output = open_output_dir(output_dir, true)?;
    for (file, artifact) in files.iter().zip(&artifacts) {
        let parent = artifact.open_parent(&output, true).map_err(|err| artifact.error(&err))?;
        replace_file(&parent, artifact, file.content.as_bytes())?;
    }
    Ok(())
}

/// Outcome of comparing one artifact with the file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Drift {
    /// The file does not exist.
    Missing,
    /// The file exists with different content.
    Changed,
}

impl Drift {
    /// Returns a short description for diagnostics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Changed => "content differs",
        }
    }
}

/// Compares an artifact with the file on disk.
///
/// # Errors
///
/// Returns [`PluginError`] when the name is unsafe, or when the artifact
/// exists but cannot be read as a regular file.
pub fn compare_artifact(output: &Dir, file: &GeneratedFile) -> Result<Option<Drift>, PluginError> {
    let artifact = ArtifactPath::parse(&file.name)?;
    let expected = file.content.as_bytes();
    let on_disk = artifact
        .open_parent(output, false)
        .and_then(|parent| read_if_length_matches(&parent, &artifact.file_name, expected.len()));
    match on_disk {
        Ok(Some(bytes)) if bytes == expected => Ok(None),
        Ok(_) => Ok(Some(Drift::Changed)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(Some(Drift::Missing)),
        Err(err) => Err(artifact.error(&err)),
    }
}

/// Opens the output directory as a capability handle.
///
/// # Errors
///
/// Returns [`PluginError`] when the path is invalid, unsafe, or inaccessible.
pub fn open_output_dir(output_dir: &Path, create_missing: bool) -> Result<Dir, PluginError> {
    if output_dir.as_os_str().is_empty() {
        return Err(PluginError::OutputPath(output_dir.to_path_buf()));
    }
    let absolute = std::path::absolute(output_dir)
        .map_err(|err| PluginError::Io(format!("{}: {err}", output_dir.display())))?;
    let mut anchor = PathBuf::new();
    let mut segments = Vec::new();
    for component in absolute.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => anchor.push(component),
            Component::CurDir => {}
            Component::Normal(segment) => segments.push(segment),
            Component::ParentDir => return Err(PluginError::OutputPath(output_dir.to_path_buf())),
        }
    }
    let mut current = Dir::open_ambient_dir(&anchor, ambient_authority())
        .map_err(|err| path_error(&err, output_dir))?;
    for segment in segments {
        current = enter_dir(&current, Path::new(segment), create_missing)
            .map_err(|err| path_error(&err, output_dir))?;
    }
    Ok(current)
}

// ============================================================================
// SECTION: Artifact Paths
// ============================================================================

/// Artifact location relative to the output root.
///
/// # Invariants
/// - `dirs` and `file_name` are plain path segments; no root, prefix or `..`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ArtifactPath {
    /// Directories between the output root and the file.
    dirs: Vec<OsString>,
    /// Final segment.
    file_name: OsString,
    /// Name as generated, for diagnostics.
    display: PathBuf,
}

impl ArtifactPath {
    /// Parses a generated artifact name.
    fn parse(name: &str) -> Result<Self, PluginError> {
        let display = PathBuf::from(name);
        if name.trim().is_empty() || display.is_absolute() {
            return Err(PluginError::OutputPath(display));
        }
        let mut segments = Vec::new();
        for component in display.components() {
            match component {
                Component::Normal(segment) => segments.push(segment.to_os_string()),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(PluginError::OutputPath(PathBuf::from(name)));
                }
            }
        }
        let Some(file_name) = segments.pop() else {
            return Err(PluginError::OutputPath(display));
        };
        Ok(Self {
            dirs: segments,
            file_name,
            display,
        })
    }

    /// Opens the directory that holds the artifact.
    fn open_parent(&self, root: &Dir, create_missing: bool) -> io::Result<Dir> {
        let mut current = root.try_clone()?;
        for dir in &self.dirs {
            current = enter_dir(&current, Path::new(dir), create_missing)?;
        }
        Ok(current)
    }

    /// Maps an IO failure on this artifact into a plugin error.
    fn error(&self, err: &io::Error) -> PluginError {
        path_error(err, &self.display)
    }
}

// ============================================================================
// SECTION: Directory Handles
// ============================================================================

/// Enters `name` under `parent` without following symlinks.
fn enter_dir(parent: &Dir, name: &Path, create_missing: bool) -> io::Result<Dir> {
    match open_dir_nofollow(parent, name) {
        Err(err) if err.kind() == ErrorKind::NotFound && create_missing => {
            parent.create_dir(name)?;
            open_dir_nofollow(parent, name)
        }
        other => other,
    }
}

/// Opens a directory entry that must itself be a directory.
fn open_dir_nofollow(parent: &Dir, name: &Path) -> io::Result<Dir> {
    let file = open_nofollow(parent, name)?;
    if !file.metadata()?.is_dir() {
        return Err(io::Error::new(ErrorKind::NotADirectory, "path segment is not a directory"));
    }
    Ok(Dir::from_std_file(file.into_std()))
}

/// Opens an entry for reading without following a symlink at `name`.
fn open_nofollow(parent: &Dir, name: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.read(true);
    options._cap_fs_ext_follow(FollowSymlinks::No);
    parent.open_with(name, &options)
}

/// Classifies an IO failure on `path`.
///
/// Refusals (missing, wrong type, denied, symlink) become
/// [`PluginError::OutputPath`]; anything else is [`PluginError::Io`].
fn path_error(err: &io::Error, path: &Path) -> PluginError {
    let refused = matches!(
        err.kind(),
        ErrorKind::NotFound
            | ErrorKind::InvalidInput
            | ErrorKind::PermissionDenied
            | ErrorKind::NotADirectory
            | ErrorKind::IsADirectory
            | ErrorKind::Unsupported
    ) || (SYMLINK_ERRNO.is_some() && err.raw_os_error() == SYMLINK_ERRNO);
    if refused {
        PluginError::OutputPath(path.to_path_buf())
    } else {
        PluginError::Io(format!("{}: {err}", path.display()))
    }
}

// ============================================================================
// SECTION: Files
// ============================================================================

/// Stages `bytes` in a fresh hidden sibling, then renames it over the artifact.
fn replace_file(parent: &Dir, artifact: &ArtifactPath, bytes: &[u8]) -> Result<(), PluginError> {
    let target = Path::new(&artifact.file_name);
    for attempt in 0 .. MAX_STAGING_ATTEMPTS {
        let staging = staging_name(&artifact.file_name, attempt);
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        options._cap_fs_ext_follow(FollowSymlinks::No);
        let mut staged = match parent.open_with(&staging, &options) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(artifact.error(&err)),
        };
        let committed = staged
            .write_all(bytes)
            .and_then(|()| staged.sync_all())
            .and_then(|()| parent.rename(&staging, parent, target));
        if let Err(err) = committed {
            let _ = parent.remove_file(&staging);
            return Err(PluginError::Io(format!("{}: {err}", artifact.display.display())));
        }
        return Ok(());
    }
    Err(PluginError::Io(format!("{}: no free staging name", artifact.display.display())))
}

/// Returns `.<name>.<pid>.<attempt>.partial`.
fn staging_name(file_name: &OsStr, attempt: u32) -> PathBuf {
    let mut staging = OsString::from(".");
    staging.push(file_name);
    staging.push(format!(".{}.{attempt}.partial", std::process::id()));
    PathBuf::from(staging)
}

/// Reads a regular file when its length equals `expected_len`.
///
/// Returns `None` for a length mismatch without reading the contents.
fn read_if_length_matches(
    parent: &Dir,
    file_name: &OsStr,
    expected_len: usize,
) -> io::Result<Option<Vec<u8>>> {
    let mut file = open_nofollow(parent, Path::new(file_name))?;
    let metadata = file.metadata()?;
    if metadata.is_dir() {
        return Err(io::Error::new(ErrorKind::IsADirectory, "artifact path is a directory"));
    }
    if !metadata.is_file() {
        return Err(io::Error::new(ErrorKind::InvalidInput, "artifact path is not a regular file"));
    }
    if metadata.len() != u64::try_from(expected_len).map_err(io::Error::other)? {
        return Ok(None);
    }
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(Some(bytes))
}

#[cfg(test)]
mod tests;
