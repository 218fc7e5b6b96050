// crates/toolbind-core/src/descriptor/tests.rs
// ============================================================================
// Module: Descriptor Model Unit Tests
// Description: Lookup and map detection on the typed descriptor model.
// Purpose: Keep name normalization and map-entry detection stable.
// Dependencies: toolbind-core
// ============================================================================

//! ## Overview
//! Covers leading-dot tolerant lookups, relative naming and map detection.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_docs_in_private_items,
    reason = "Test-only assertions use panic-based helpers for clarity."
)]

use super::*;

fn set_with_map() -> DescriptorSet {
    let mut set = DescriptorSet::new();
    set.add_message(MessageDescriptor::map_entry(
        "demo.v1",
        "demo.v1.Bag.TagsEntry",
        FieldType::Scalar(ScalarType::String),
        FieldType::Scalar(ScalarType::Int64),
    ));
    set.add_message(
        MessageDescriptor::new("demo.v1", "demo.v1.Bag")
            .with_field(
                FieldDescriptor::message("tags", 1, ".demo.v1.Bag.TagsEntry").repeated(),
            )
            .with_field(FieldDescriptor::scalar("labels", 2, ScalarType::String).repeated()),
    );
    set
}

#[test]
fn message_lookup_tolerates_leading_dot() {
    let set = set_with_map();
    assert!(set.message(".demo.v1.Bag").is_some());
    assert!(set.message("demo.v1.Bag").is_some());
    assert!(set.message("demo.v1.Missing").is_none());
}

#[test]
fn relative_name_strips_package() {
    let set = set_with_map();
    let entry = set.message("demo.v1.Bag.TagsEntry").expect("entry");
    assert_eq!(entry.relative_name(), "Bag.TagsEntry");
    let rootless = MessageDescriptor::new("", "Plain");
    assert_eq!(rootless.relative_name(), "Plain");
}

#[test]
fn map_fields_are_repeated_map_entries_only() {
    let set = set_with_map();
    let bag = set.message("demo.v1.Bag").expect("bag");
    assert!(set.is_map_field(bag.field("tags").expect("tags")));
    assert!(!set.is_map_field(bag.field("labels").expect("labels")));
}

#[test]
fn required_comes_only_from_annotation() {
    let plain = FieldDescriptor::scalar("city", 1, ScalarType::String);
    assert!(!plain.is_required());
    let described = plain.clone().annotated(FieldAnnotation::described("City"));
    assert!(!described.is_required());
    let required = plain.annotated(FieldAnnotation::described("City").required());
    assert!(required.is_required());
}
