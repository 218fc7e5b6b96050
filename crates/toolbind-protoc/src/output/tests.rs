// crates/toolbind-protoc/src/output/tests.rs
// ============================================================================
// Module: Artifact Output Unit Tests
// Description: Atomic writes, path validation and drift comparison.
// Purpose: Keep artifact persistence sandboxed and all-or-nothing.
// Dependencies: tempfile, toolbind-core
// ============================================================================

//! ## Overview
//! Exercises writes into fresh and nested directories, rejection of unsafe
//! artifact names before any write, and drift classification including the
//! cases that must surface as errors rather than as a missing artifact.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_docs_in_private_items,
    reason = "Test-only assertions use panic-based helpers for clarity."
)]

use super::*;

fn artifact(name: &str, content: &str) -> GeneratedFile {
    GeneratedFile {
        source: "src.proto".to_string(),
        name: name.to_string(),
        content: content.to_string(),
        tools: Vec::new(),
    }
}

#[test]
fn writes_nested_artifacts_and_leaves_no_temporaries() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("gen");
    let files = vec![
        artifact("catalog_agent_tools.rs", "a"),
        artifact("invoice/v1/invoice_agent_tools.rs", "b"),
    ];
    write_artifacts(&out, &files).unwrap();

    assert_eq!(std::fs::read_to_string(out.join("catalog_agent_tools.rs")).unwrap(), "a");
    assert_eq!(
        std::fs::read_to_string(out.join("invoice/v1/invoice_agent_tools.rs")).unwrap(),
        "b"
    );
    for dir in [out.clone(), out.join("invoice/v1")] {
        let names: Vec<String> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(names.iter().all(|name| !name.ends_with(".partial")), "{names:?}");
    }
}

#[test]
fn overwrites_existing_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path(), &[artifact("x_agent_tools.rs", "old")]).unwrap();
    write_artifacts(dir.path(), &[artifact("x_agent_tools.rs", "new")]).unwrap();
    assert_eq!(std::fs::read_to_string(dir.path().join("x_agent_tools.rs")).unwrap(), "new");
}

#[test]
fn unsafe_names_abort_before_any_write() {
    let dir = tempfile::tempdir().unwrap();
    for bad in ["../escape.rs", "/abs.rs", "  "] {
        let files = vec![artifact("ok_agent_tools.rs", "fine"), artifact(bad, "evil")];
        let err = write_artifacts(dir.path(), &files).unwrap_err();
        assert!(matches!(err, PluginError::OutputPath(_)), "{bad}");
        assert!(!dir.path().join("ok_agent_tools.rs").exists());
    }
}

#[test]
fn parent_traversal_in_output_dir_is_rejected() {
    let err = write_artifacts(Path::new("/tmp/../etc"), &[artifact("a.rs", "")]).unwrap_err();
    assert!(matches!(err, PluginError::OutputPath(_)));
}

#[cfg(unix)]
#[test]
fn symlinked_directories_are_not_followed() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("target");
    std::fs::create_dir(&target).unwrap();
    std::os::unix::fs::symlink(&target, dir.path().join("link")).unwrap();

    let err = write_artifacts(dir.path(), &[artifact("link/a.rs", "x")]).unwrap_err();
    assert!(matches!(err, PluginError::OutputPath(_)));
    assert!(!target.join("a.rs").exists());
}

#[test]
fn compare_classifies_missing_changed_and_current() {
    let dir = tempfile::tempdir().unwrap();
    let current = artifact("same_agent_tools.rs", "abc");
    write_artifacts(dir.path(), &[current.clone(), artifact("edited_agent_tools.rs", "abc")])
        .unwrap();
    let output = open_output_dir(dir.path(), false).unwrap();

    assert_eq!(compare_artifact(&output, &current).unwrap(), None);
    assert_eq!(
        compare_artifact(&output, &artifact("edited_agent_tools.rs", "abd")).unwrap(),
        Some(Drift::Changed)
    );
    assert_eq!(
        compare_artifact(&output, &artifact("edited_agent_tools.rs", "longer")).unwrap(),
        Some(Drift::Changed)
    );
    assert_eq!(
        compare_artifact(&output, &artifact("nested/absent_agent_tools.rs", "")).unwrap(),
        Some(Drift::Missing)
    );
    assert_eq!(Drift::Changed.as_str(), "content differs");
}

#[test]
fn missing_output_dir_is_not_created_for_checks() {
    let dir = tempfile::tempdir().unwrap();
    let err = open_output_dir(&dir.path().join("absent"), false).unwrap_err();
    assert!(matches!(err, PluginError::OutputPath(_)));
    assert!(!dir.path().join("absent").exists());
}

#[test]
fn artifact_paths_split_directories_from_the_file_name() {
    let path = ArtifactPath::parse("invoice/./v1/invoice_agent_tools.rs").unwrap();
    assert_eq!(path.dirs, vec![OsString::from("invoice"), OsString::from("v1")]);
    assert_eq!(path.file_name, OsString::from("invoice_agent_tools.rs"));
    for bad in ["", ".", "a/../b.rs", "/etc/passwd"] {
        assert!(matches!(ArtifactPath::parse(bad), Err(PluginError::OutputPath(_))), "{bad:?}");
    }
}

#[test]
fn unreadable_artifacts_are_errors_not_missing() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("blocker"), "file").unwrap();
    std::fs::create_dir(dir.path().join("dir_agent_tools.rs")).unwrap();
    let output = open_output_dir(dir.path(), false).unwrap();

    let under_file = compare_artifact(&output, &artifact("blocker/a_agent_tools.rs", "x"));
    assert!(matches!(under_file, Err(PluginError::OutputPath(_))), "{under_file:?}");
    let directory = compare_artifact(&output, &artifact("dir_agent_tools.rs", "x"));
    assert!(matches!(directory, Err(PluginError::OutputPath(_))), "{directory:?}");
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
#[test]
fn symlinked_artifacts_are_errors_not_missing() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("real.rs"), "abc").unwrap();
    std::os::unix::fs::symlink(dir.path().join("real.rs"), dir.path().join("link_agent_tools.rs"))
        .unwrap();
    let output = open_output_dir(dir.path(), false).unwrap();

    let result = compare_artifact(&output, &artifact("link_agent_tools.rs", "abc"));
    assert!(matches!(result, Err(PluginError::OutputPath(_))), "{result:?}");
}
