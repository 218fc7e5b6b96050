// crates/toolbind-config/src/config/tests.rs
// ============================================================================
// Module: Toolbind Configuration Unit Tests
// Description: Defaults, field rules and limit ranges.
// Purpose: Pin validation of the private configuration helpers.
// Dependencies: toolbind-config, toolbind-core
// ============================================================================

//! ## Overview
//! Exercises validation rules that the integration tests cannot reach
//! through the public loader.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_docs_in_private_items,
    reason = "Test-only assertions use panic-based helpers for clarity."
)]

use super::*;

// ============================================================================
// SECTION: Validation Tests
// ============================================================================

#[test]
fn defaults_validate() {
    let config = ToolbindConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.output.suffix, "_agent_tools.rs");
    assert_eq!(config.output.runtime_crate, "::toolbind_runtime");
    assert_eq!(config.naming.scope, NamingScope::Run);
    assert_eq!(config.limits.max_schema_depth, None);
    assert_eq!(config.audit.sink, AuditSinkKind::Stderr);
}

#[test]
fn suffix_rules_are_enforced() {
    for bad in ["", "_tools.txt", "a/b.rs", "with space.rs"] {
        let config = ToolbindConfig {
            output: OutputConfig {
                suffix: bad.to_string(),
                ..OutputConfig::default()
            },
            ..ToolbindConfig::default()
        };
        assert!(config.validate().is_err(), "suffix {bad:?} should fail");
    }
}

#[test]
fn runtime_crate_must_be_a_path() {
    for good in ["::toolbind_runtime", "crate::rt", "my_rt", "::a::b_c::D"] {
        assert!(is_rust_path(good), "{good} should pass");
    }
    for bad in ["", "::", "a::", "a:::b", "1rt", "a-b", "_", "a b"] {
        assert!(!is_rust_path(bad), "{bad:?} should fail");
    }
}

#[test]
fn limit_ranges_are_enforced() {
    let mut limits = LimitsConfig::default();
    assert!(limits.validate().is_ok());
    limits.max_schema_depth = Some(0);
    assert!(limits.validate().is_err());
    limits.max_schema_depth = Some(MAX_SCHEMA_DEPTH);
    assert!(limits.validate().is_ok());
    limits.max_schema_depth = Some(MAX_SCHEMA_DEPTH + 1);
    assert!(limits.validate().is_err());
    limits.max_schema_depth = Some(8);
    limits.max_request_bytes = MIN_REQUEST_BYTES - 1;
    assert!(limits.validate().is_err());
    limits.max_request_bytes = MAX_REQUEST_BYTES;
    assert!(limits.validate().is_ok());
}

#[test]
fn validate_path_string_rejects_empty_and_long_values() {
    assert!(validate_path_string("audit.path", "  ").is_err());
    let long_path = "a".repeat(MAX_TOTAL_PATH_LENGTH + 1);
    let err = validate_path_string("audit.path", &long_path).unwrap_err();
    assert!(err.to_string().contains("max length"));
    let long_component = "b".repeat(MAX_PATH_COMPONENT_LENGTH + 1);
    assert!(validate_path_string("audit.path", &long_component).is_err());
    assert!(validate_path_string("audit.path", "logs/audit.jsonl").is_ok());
}

#[test]
fn generator_options_follow_config() {
    let config = ToolbindConfig::from_toml_str(
        "[naming]\nscope = \"file\"\n[policy]\nrequire_tool_description = true\n[limits]\nmax_schema_depth = 12\n",
    )
    .unwrap();
    let options = config.generator_options();
    assert_eq!(options.name_scope, NameScope::File);
    assert!(options.policy.require_tool_description);
    assert!(!options.policy.require_required_field_description);
    assert_eq!(options.max_schema_depth, Some(12));
    assert_eq!(options.output_suffix, "_agent_tools.rs");
}

#[test]
fn audit_file_path_defaults() {
    let audit = AuditConfig {
        sink: AuditSinkKind::File,
        path: None,
    };
    assert_eq!(audit.file_path(), PathBuf::from("toolbind-audit.jsonl"));
}
