//! Resource integration tests
//!
//! Parse complete records from fixtures and move content between versions
//! through builders.

use ddms::components::{
    ContactInfo, Identifier, Keyword, Person, ProducerEntity, ProducerRole, ProducerRoleKind, Resource,
    ResourceBuilder, ResourceComponent, Security, SubjectCoverage, TextComponent,
};
use ddms::validators::{Builder, Component, ExtensibleAttributes, SecurityAttribute, SecurityAttributes, SecurityAttributesBuilder};
use ddms::{Config, DdmsVersion, Error, VersionContext};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;

fn fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture should exist")
}

fn markings(ctx: &VersionContext) -> SecurityAttributes {
    SecurityAttributesBuilder::new()
        .with(SecurityAttribute::Classification, "U")
        .with(SecurityAttribute::OwnerProducer, "USA")
        .build_for(ctx, "test")
        .unwrap()
}

fn minimal_components(ctx: &VersionContext) -> Vec<ResourceComponent> {
    let person = Person::new(ctx, ContactInfo::new(&["Brian"]), "Uri", "", &[], ExtensibleAttributes::new()).unwrap();
    let no_poc_types: &[&str] = &[];
    let creator = ProducerRole::new(
        ctx,
        ProducerRoleKind::Creator,
        ProducerEntity::Person(person),
        no_poc_types,
        markings(ctx),
    )
    .unwrap();
    let keyword = Keyword::new(ctx, "DDMSence", SecurityAttributes::empty(), ExtensibleAttributes::new()).unwrap();
    let subject =
        SubjectCoverage::new(ctx, vec![keyword], Vec::new(), Vec::new(), Vec::new(), SecurityAttributes::empty())
            .unwrap();
    vec![
        Identifier::new(ctx, "URI", "urn:buri:ddmsence:testIdentifier").unwrap().into(),
        TextComponent::title(ctx, "DDMSence", markings(ctx)).unwrap().into(),
        creator.into(),
        subject.into(),
        Security::new(ctx, None, markings(ctx)).unwrap().into(),
    ]
}

// ============================================================================
// Fixture Parsing
// ============================================================================

#[test]
fn test_parse_3_1_fixture() {
    let resource = Resource::from_xml(&fixture("resource_3_1.xml")).unwrap();

    assert_eq!(resource.version(), DdmsVersion::V3_1);
    assert_eq!(resource.name(), "Resource");
    assert!(resource.warnings().is_empty());
    assert_eq!(resource.titles()[0].value(), "DDMSence");
    assert_eq!(resource.description().map(|d| d.value()), Some("A transformation of DDMS records."));
    assert_eq!(resource.subject_coverages().len(), 1);
    assert_eq!(resource.producers().len(), 1);
    assert_eq!(resource.attributes().create_date, "2010-01-21");
    assert_eq!(resource.markings().classification(), Some("U"));
    assert_eq!(resource.security().exclude_from_rollup(), "true");
}

#[test]
fn test_parse_5_0_fixture() {
    let resource = Resource::from_xml(&fixture("resource_5_0.xml")).unwrap();

    assert_eq!(resource.version(), DdmsVersion::V5_0);
    assert_eq!(resource.name(), "resource");
    assert_eq!(resource.attributes().ntk_des_version, "7");
    assert_eq!(resource.subtitles().len(), 1);
    assert_eq!(resource.subject_coverages().len(), 2);
    let access = resource.security().access().expect("access should be present");
    assert_eq!(access.individuals().len(), 1);
    assert_eq!(access.individuals()[0].system_name().value(), "DIAS");
}

#[test]
fn test_fixture_reparses_to_equal_resource() {
    for name in ["resource_3_1.xml", "resource_5_0.xml"] {
        let resource = Resource::from_xml(&fixture(name)).unwrap();
        let reparsed = Resource::from_xml(&resource.to_xml()).unwrap();
        assert_eq!(reparsed, resource, "{}", name);
    }
}

#[test]
fn test_missing_title_fixture() {
    let err = Resource::from_xml(&fixture("missing_title_4_1.xml")).unwrap_err();
    assert!(matches!(
        err,
        Error::CardinalityViolation { ref child, actual: 0, min: 1, .. } if child == "title"
    ));
}

#[test]
fn test_unknown_namespace_rejected() {
    let xml = r#"<Resource xmlns="http://example.com/not-ddms"/>"#;
    assert!(matches!(Resource::from_xml(xml).unwrap_err(), Error::UnknownVersion(_)));
}

#[test]
fn test_configured_limits_apply() {
    let config: Config = Config::from_json_str(r#"{"limits": {"max_document_bytes": 64}}"#).unwrap();
    let err = Resource::from_xml_with(&fixture("resource_3_1.xml"), &config).unwrap_err();
    assert!(matches!(err, Error::LimitExceeded(_)));
}

#[test]
fn test_xml_lang_survives_round_trip() {
    let xml = fixture("resource_3_1.xml").replace("<ddms:Resource ", "<ddms:Resource xml:lang=\"en\" ");
    let resource = Resource::from_xml(&xml).unwrap();
    let extensible = resource.extensible_attributes().unwrap();
    assert_eq!(extensible.get("http://www.w3.org/XML/1998/namespace", "lang"), Some("en"));

    let written = resource.to_xml();
    assert!(written.contains(" xml:lang=\"en\""));
    assert!(!written.contains("xmlns:ns1"));
    assert_eq!(Resource::from_xml(&written).unwrap(), resource);
}

#[test]
fn test_empty_extensible_attribute_survives_round_trip() {
    let xml = fixture("resource_3_1.xml")
        .replace("<ddms:Resource ", "<ddms:Resource xmlns:ext=\"http://example.com/ext\" ext:note=\"\" ");
    let resource = Resource::from_xml(&xml).unwrap();
    assert_eq!(resource.extensible_attributes().unwrap().get("http://example.com/ext", "note"), Some(""));

    let reparsed = Resource::from_xml(&resource.to_xml()).unwrap();
    assert_eq!(reparsed.extensible_attributes().unwrap().len(), 1);
    assert_eq!(reparsed, resource);
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_text_rendering_of_fixture() {
    let resource = Resource::from_xml(&fixture("resource_5_0.xml")).unwrap();
    let text = resource.to_text();

    assert!(text.contains("title: DDMSence\n"));
    assert!(text.starts_with("resourceElement: true\ncreateDate: 2010-01-21\nism.DESVersion: 9\nntk.DESVersion: 7\n"));
    assert!(text.contains("security.excludeFromRollup: true\n"));
    assert!(text.contains("DIAS"));
    assert!(text.ends_with("classification: U\nownerProducer: USA\n"));
}

#[test]
fn test_xml_rendering_with_custom_prefix() {
    let resource = Resource::from_xml(&fixture("resource_3_1.xml")).unwrap();
    let config = Config::new().with_prefix(ddms::NamespaceKind::Ddms, "d").unwrap();
    let xml = resource.to_xml_with(&config);

    assert!(xml.starts_with("<d:Resource"));
    assert_eq!(Resource::from_xml(&xml).unwrap(), resource);
}

// ============================================================================
// Version Conversion
// ============================================================================

#[test]
fn test_2_0_builder_committed_under_3_0() {
    let v2 = VersionContext::get(DdmsVersion::V2_0);
    let v3 = VersionContext::get(DdmsVersion::V3_0);
    let resource = Resource::new(
        v2,
        minimal_components(v2),
        Default::default(),
        SecurityAttributes::empty(),
        ExtensibleAttributes::new(),
    )
    .unwrap();

    let mut builder = ResourceBuilder::from(&resource);
    let err = builder.commit(v3).unwrap_err();
    assert!(matches!(err, Error::InvalidComponent { ref field, .. } if field == "ism:resourceElement"));

    builder.attributes.resource_element = "true".to_string();
    builder.attributes.create_date = "2010-01-21".to_string();
    builder.attributes.des_version = "5".to_string();
    let err = builder.commit(v3).unwrap_err();
    assert!(matches!(err, Error::InvalidComponent { ref field, .. } if field == "ism:classification"));

    builder.markings = SecurityAttributesBuilder::new()
        .with(SecurityAttribute::Classification, "U")
        .with(SecurityAttribute::OwnerProducer, "USA");
    let upgraded = builder.commit(v3).unwrap().unwrap();
    assert_eq!(upgraded.version(), DdmsVersion::V3_0);
    assert_eq!(upgraded.security().exclude_from_rollup(), "true");
    assert_eq!(upgraded.titles()[0].value(), "DDMSence");
}

#[test]
fn test_4_1_access_cannot_move_to_3_1() {
    let resource = Resource::from_xml(&fixture("resource_5_0.xml")).unwrap();
    let builder = ResourceBuilder::from(&resource);
    let err = builder.commit(VersionContext::get(DdmsVersion::V3_1)).unwrap_err();
    assert!(matches!(err, Error::VersionNotSupported { .. }));
}

#[test]
fn test_5_0_record_moves_to_4_1() {
    let resource = Resource::from_xml(&fixture("resource_5_0.xml")).unwrap();
    let builder = ResourceBuilder::from(&resource);
    let v41 = VersionContext::get(DdmsVersion::V4_1);

    let downgraded = builder.commit(v41).unwrap().unwrap();
    assert_eq!(downgraded.name(), "Resource");
    assert_eq!(downgraded.version(), DdmsVersion::V4_1);
    assert!(downgraded.security().access().is_some());
}
