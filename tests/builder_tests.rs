//! Builder integration tests
//!
//! Snapshots, restores and repeated commits of whole resources.

use ddms::components::{Resource, ResourceBuilder, TextComponentBuilder, TextKind};
use ddms::validators::{
    restore, snapshot, Builder, Component, ExtensibleAttributes, SecurityAttribute, SecurityAttributesBuilder,
};
use ddms::{DdmsVersion, Error, VersionContext};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;

fn fixture_resource(name: &str) -> Resource {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    let xml = fs::read_to_string(path).expect("fixture should exist");
    Resource::from_xml(&xml).expect("fixture should be valid")
}

#[test]
fn test_snapshot_and_restore() {
    let resource = fixture_resource("resource_5_0.xml");
    let builder = ResourceBuilder::from(&resource);

    let json = snapshot(&builder).unwrap();
    let restored: ResourceBuilder = restore(&json).unwrap();
    assert_eq!(restored, builder);
    assert_eq!(restored.commit(VersionContext::latest()).unwrap(), Some(resource));
}

#[test]
fn test_restore_tolerates_missing_fields() {
    let restored: ResourceBuilder = restore(r#"{"titles": [{"value": "Draft"}]}"#).unwrap();
    assert_eq!(restored.titles.len(), 1);
    assert!(restored.identifiers.is_empty());
    assert!(!restored.is_empty());
}

#[test]
fn test_restore_rejects_malformed_json() {
    let err = restore::<ResourceBuilder>("{not json").unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn test_repeated_commits_are_equal() {
    let resource = fixture_resource("resource_3_1.xml");
    let builder = ResourceBuilder::from(&resource);
    let ctx = VersionContext::get(DdmsVersion::V3_1);

    let first = builder.commit(ctx).unwrap();
    let second = builder.commit(ctx).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, Some(resource));
}

#[test]
fn test_root_extensible_attributes_are_checked_on_commit() {
    let resource = fixture_resource("resource_3_1.xml");
    let ctx = VersionContext::get(DdmsVersion::V3_1);
    let mut builder = ResourceBuilder::from(&resource);

    builder.extensible = ExtensibleAttributes::new().with(ctx.ddms_namespace(), "madeUp", "x");
    let err = builder.commit(ctx).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidComponent { ref field, .. } if field == "{http://metadata.dod.mil/mdr/ns/DDMS/3.1/}madeUp"
    ));

    builder.extensible = ExtensibleAttributes::new().with(ctx.ism_namespace(), "classification", "U");
    let err = builder.commit(ctx).unwrap_err();
    assert!(matches!(err, Error::DuplicateAttributeClaim { ref claimed_by, .. } if claimed_by == "security"));

    builder.extensible = ExtensibleAttributes::new().with("http://example.com/ext", "note", "x");
    let committed = builder.commit(ctx).unwrap().unwrap();
    assert_eq!(committed.extensible_attributes().unwrap().len(), 1);
}

#[test]
fn test_failed_commit_can_be_corrected() {
    let resource = fixture_resource("resource_3_1.xml");
    let mut builder = ResourceBuilder::from(&resource);
    let ctx = VersionContext::get(DdmsVersion::V3_1);

    builder.titles[0].value = "   ".to_string();
    let before = builder.clone();
    let err = builder.commit(ctx).unwrap_err();
    assert!(matches!(err, Error::InvalidComponent { ref component, ref field, .. }
        if component == "ddms:title" && field == "value"));
    assert_eq!(builder, before);

    builder.titles[0].value = "Corrected".to_string();
    let committed = builder.commit(ctx).unwrap().unwrap();
    assert_eq!(committed.titles()[0].value(), "Corrected");
}

#[test]
fn test_commit_follows_target_version() {
    let resource = fixture_resource("resource_3_1.xml");
    let builder = ResourceBuilder::from(&resource);

    for version in [DdmsVersion::V3_0, DdmsVersion::V3_1, DdmsVersion::V4_0_1, DdmsVersion::V4_1] {
        let committed = builder.commit(VersionContext::get(version)).unwrap().unwrap();
        assert_eq!(committed.version(), version);
        for child in committed.children() {
            assert_eq!(child.version(), version, "{}", child.name());
        }
    }
}

#[test]
fn test_root_attributes_rejected_by_2_0() {
    let resource = fixture_resource("resource_3_1.xml");
    let mut builder = ResourceBuilder::from(&resource);
    builder.markings = SecurityAttributesBuilder::new();
    let err = builder.commit(VersionContext::get(DdmsVersion::V2_0)).unwrap_err();
    assert!(matches!(err, Error::VersionNotSupported { ref name, .. } if name == "ism:resourceElement"));
}

#[test]
fn test_empty_nested_builders_are_skipped() {
    let resource = fixture_resource("resource_3_1.xml");
    let mut builder = ResourceBuilder::from(&resource);
    builder.titles.push(TextComponentBuilder::new(TextKind::Title));
    builder.subtitles.push(TextComponentBuilder {
        security: SecurityAttributesBuilder::new().with(SecurityAttribute::Classification, " "),
        ..TextComponentBuilder::new(TextKind::Subtitle)
    });

    let committed = builder.commit(VersionContext::get(DdmsVersion::V3_1)).unwrap().unwrap();
    assert_eq!(committed, resource);
}
