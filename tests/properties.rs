//! Property-based tests for attribute classification and builders

use ddms::components::{IdentifierBuilder, TextComponentBuilder, TextKind};
use ddms::documents::Element;
use ddms::namespaces::QName;
use ddms::validators::{
    AttributeCategory, AttributeClassifier, AttributeProfile, Builder, ParameterName, ParameterSpec,
    SecurityAttribute, SecurityAttributesBuilder,
};
use ddms::{DdmsVersion, NamespaceKind, VersionContext};
use proptest::prelude::*;

const PROFILE: AttributeProfile = AttributeProfile {
    parameters: &[
        ParameterSpec::always(ParameterName::Local("qualifier")),
        ParameterSpec::always(ParameterName::Ddms("value")),
    ],
    markings_since: Some(DdmsVersion::V3_0),
    extensible_since: Some(DdmsVersion::V2_0),
};

fn version() -> impl Strategy<Value = DdmsVersion> {
    prop::sample::select(DdmsVersion::ALL.to_vec())
}

fn attribute_name() -> impl Strategy<Value = (Option<NamespaceKind>, Option<&'static str>, String)> {
    (
        prop::sample::select(vec![
            None,
            Some(NamespaceKind::Ddms),
            Some(NamespaceKind::Ism),
            Some(NamespaceKind::Ntk),
            Some(NamespaceKind::Xlink),
        ]),
        prop::sample::select(vec![None, Some("http://example.com/ext")]),
        prop::sample::select(vec![
            "qualifier".to_string(),
            "value".to_string(),
            "classification".to_string(),
            "ownerProducer".to_string(),
            "resourceElement".to_string(),
            "DESVersion".to_string(),
            "note".to_string(),
        ]),
    )
}

proptest! {
    /// Every attribute lands in exactly one category, and classify agrees with category_of
    #[test]
    fn classification_partitions_attributes(
        version in version(),
        names in prop::collection::vec(attribute_name(), 0..12),
    ) {
        let ctx = VersionContext::get(version);
        let classifier = AttributeClassifier::new(ctx, &PROFILE);
        let mut element = Element::namespaced(ctx.ddms_namespace(), "test");
        for (kind, foreign, local) in &names {
            let namespace = match (kind, foreign) {
                (_, Some(uri)) => Some(uri.to_string()),
                (Some(kind), None) => ctx.namespace(*kind).map(str::to_string),
                (None, None) => None,
            };
            element.set_attribute(QName::new(namespace, local.as_str()), "x");
        }

        let classified = classifier.classify("ddms:test", &element);
        let total = classified.parameters.len()
            + classified.markings.len()
            + classified.extensible.len()
            + classified.dropped.len();
        prop_assert_eq!(total, element.attributes.len());

        for qname in element.attributes.keys() {
            match classifier.category_of(qname) {
                AttributeCategory::Parameter(name) => {
                    prop_assert!(classified.parameters.contains_key(&name));
                }
                AttributeCategory::Marking(marking) => {
                    prop_assert!(classified.markings.contains_key(&marking));
                }
                AttributeCategory::Extensible => {
                    prop_assert!(classified.extensible.get(qname.namespace_str(), &qname.local_name).is_some());
                }
                AttributeCategory::Unclaimed => {}
            }
        }
    }

    /// Markings are never classified on an element whose version does not mark it
    #[test]
    fn no_markings_before_they_are_enabled(local in "[a-zA-Z]{1,12}") {
        let ctx = VersionContext::get(DdmsVersion::V2_0);
        let classifier = AttributeClassifier::new(ctx, &PROFILE);
        let qname = QName::namespaced(ctx.ism_namespace(), &local);
        prop_assert!(!matches!(classifier.category_of(&qname), AttributeCategory::Marking(_)));
    }

    /// Committing yields nothing exactly when the builder is empty
    #[test]
    fn commit_is_none_iff_empty(
        version in version(),
        qualifier in prop::sample::select(vec!["", "  ", "URI"]),
        value in prop::sample::select(vec!["", " ", "urn:buri:ddmsence:testIdentifier"]),
    ) {
        let ctx = VersionContext::get(version);
        let builder = IdentifierBuilder {
            qualifier: qualifier.to_string(),
            value: value.to_string(),
        };
        match builder.commit(ctx) {
            Ok(None) => {
                prop_assert!(builder.is_empty());
            }
            Ok(Some(_)) | Err(_) => {
                prop_assert!(!builder.is_empty());
            }
        }
    }

    /// A text builder with only blank markings is empty
    #[test]
    fn blank_markings_leave_text_builder_empty(
        version in version(),
        blank in "[ \t]{0,4}",
    ) {
        let builder = TextComponentBuilder {
            security: SecurityAttributesBuilder::new().with(SecurityAttribute::Classification, blank.clone()),
            ..TextComponentBuilder::new(TextKind::Subtitle)
        };
        prop_assert!(builder.is_empty());
        prop_assert!(builder.commit(VersionContext::get(version)).unwrap().is_none());
    }
}
