//! Attribute classification
//!
//! Every attribute found on an element falls into exactly one of three
//! categories: a recognized parameter of that element, an ISM security
//! marking, or an extensible attribute carried along uninterpreted.
//!
//! Recognized parameters are declared per element in a static
//! [`AttributeProfile`]. Names in the ISM namespace are claimed through the
//! single match in [`claim_ism`], so one ISM name can never be both a
//! parameter and a marking. The only runtime overlap check left is for
//! extensible attributes supplied by the caller.

use crate::documents::Element;
use crate::error::{Error, Result, ValidationMessage};
use crate::namespaces::QName;
use crate::validators::security::{SecurityAttribute, SecurityAttributes};
use crate::version::{DdmsVersion, NamespaceKind, VersionContext};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parameters in the ISM namespace that are not markings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IsmParameter {
    /// `ism:resourceElement`
    ResourceElement,
    /// `ism:createDate`
    CreateDate,
    /// `ism:DESVersion`
    DesVersion,
    /// `ism:pocType`
    PocType,
    /// `ism:excludeFromRollup`
    ExcludeFromRollup,
}

impl IsmParameter {
    /// The `ism:` local name
    pub fn as_str(&self) -> &'static str {
        match self {
            IsmParameter::ResourceElement => "resourceElement",
            IsmParameter::CreateDate => "createDate",
            IsmParameter::DesVersion => "DESVersion",
            IsmParameter::PocType => "pocType",
            IsmParameter::ExcludeFromRollup => "excludeFromRollup",
        }
    }
}

/// What an `ism:` name is claimed as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsmClaim {
    /// A structural parameter
    Parameter(IsmParameter),
    /// A security marking
    Marking(SecurityAttribute),
}

/// Claim an `ism:` local name
pub fn claim_ism(local_name: &str) -> Option<IsmClaim> {
    use IsmClaim::{Marking, Parameter};
    let claim = match local_name {
        "resourceElement" => Parameter(IsmParameter::ResourceElement),
        "createDate" => Parameter(IsmParameter::CreateDate),
        "DESVersion" => Parameter(IsmParameter::DesVersion),
        "pocType" => Parameter(IsmParameter::PocType),
        "excludeFromRollup" => Parameter(IsmParameter::ExcludeFromRollup),
        "classification" => Marking(SecurityAttribute::Classification),
        "ownerProducer" => Marking(SecurityAttribute::OwnerProducer),
        "SCIcontrols" => Marking(SecurityAttribute::SciControls),
        "SARIdentifier" => Marking(SecurityAttribute::SarIdentifier),
        "atomicEnergyMarkings" => Marking(SecurityAttribute::AtomicEnergyMarkings),
        "disseminationControls" => Marking(SecurityAttribute::DisseminationControls),
        "displayOnlyTo" => Marking(SecurityAttribute::DisplayOnlyTo),
        "FGIsourceOpen" => Marking(SecurityAttribute::FgiSourceOpen),
        "FGIsourceProtected" => Marking(SecurityAttribute::FgiSourceProtected),
        "releasableTo" => Marking(SecurityAttribute::ReleasableTo),
        "nonICmarkings" => Marking(SecurityAttribute::NonIcMarkings),
        "nonUSControls" => Marking(SecurityAttribute::NonUsControls),
        "classifiedBy" => Marking(SecurityAttribute::ClassifiedBy),
        "compilationReason" => Marking(SecurityAttribute::CompilationReason),
        "derivativelyClassifiedBy" => Marking(SecurityAttribute::DerivativelyClassifiedBy),
        "classificationReason" => Marking(SecurityAttribute::ClassificationReason),
        "derivedFrom" => Marking(SecurityAttribute::DerivedFrom),
        "declassDate" => Marking(SecurityAttribute::DeclassDate),
        "declassEvent" => Marking(SecurityAttribute::DeclassEvent),
        "declassException" => Marking(SecurityAttribute::DeclassException),
        "declassManualReview" => Marking(SecurityAttribute::DeclassManualReview),
        "dateOfExemptedSource" => Marking(SecurityAttribute::DateOfExemptedSource),
        "typeOfExemptedSource" => Marking(SecurityAttribute::TypeOfExemptedSource),
        "compliesWith" => Marking(SecurityAttribute::CompliesWith),
        _ => return None,
    };
    Some(claim)
}

/// A recognized parameter name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterName {
    /// An unqualified attribute
    Local(&'static str),
    /// An attribute in the DDMS namespace
    Ddms(&'static str),
    /// An attribute in the NTK namespace
    Ntk(&'static str),
    /// An attribute in the XLink namespace
    Xlink(&'static str),
    /// A non-marking attribute in the ISM namespace
    Ism(IsmParameter),
}

impl ParameterName {
    /// The vocabulary of the name, `None` when unqualified
    pub fn namespace_kind(&self) -> Option<NamespaceKind> {
        match self {
            ParameterName::Local(_) => None,
            ParameterName::Ddms(_) => Some(NamespaceKind::Ddms),
            ParameterName::Ntk(_) => Some(NamespaceKind::Ntk),
            ParameterName::Xlink(_) => Some(NamespaceKind::Xlink),
            ParameterName::Ism(_) => Some(NamespaceKind::Ism),
        }
    }

    /// The local part of the name
    pub fn local_name(&self) -> &'static str {
        match self {
            ParameterName::Local(name)
            | ParameterName::Ddms(name)
            | ParameterName::Ntk(name)
            | ParameterName::Xlink(name) => name,
            ParameterName::Ism(parameter) => parameter.as_str(),
        }
    }

    /// The namespace-resolved name, if its vocabulary is bound in the version
    pub fn qname(&self, ctx: &VersionContext) -> Option<QName> {
        match self.namespace_kind() {
            None => Some(QName::local(self.local_name())),
            Some(kind) => ctx
                .namespace(kind)
                .map(|uri| QName::namespaced(uri, self.local_name())),
        }
    }
}

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace_kind() {
            Some(kind) => write!(f, "{}:{}", kind.default_prefix(), self.local_name()),
            None => write!(f, "{}", self.local_name()),
        }
    }
}

/// A parameter and the first version that defines it
#[derive(Debug, Clone, Copy)]
pub struct ParameterSpec {
    /// The parameter
    pub name: ParameterName,
    /// First version that recognizes it
    pub since: DdmsVersion,
}

impl ParameterSpec {
    /// A parameter defined in every version
    pub const fn always(name: ParameterName) -> Self {
        Self {
            name,
            since: DdmsVersion::V2_0,
        }
    }

    /// A parameter introduced in `since`
    pub const fn since(name: ParameterName, since: DdmsVersion) -> Self {
        Self { name, since }
    }
}

/// The attributes an element recognizes
#[derive(Debug, Clone, Copy)]
pub struct AttributeProfile {
    /// Recognized parameters
    pub parameters: &'static [ParameterSpec],
    /// First version in which the element carries security markings
    pub markings_since: Option<DdmsVersion>,
    /// First version in which the element carries extensible attributes
    pub extensible_since: Option<DdmsVersion>,
}

impl AttributeProfile {
    /// A profile with no attributes at all
    pub const NONE: AttributeProfile = AttributeProfile {
        parameters: &[],
        markings_since: None,
        extensible_since: None,
    };

    /// Whether markings are recognized in the version
    pub fn markings_enabled(&self, ctx: &VersionContext) -> bool {
        self.markings_since.map_or(false, |since| ctx.is_at_least(since))
    }

    /// Whether extensible attributes are allowed in the version
    pub fn extensible_enabled(&self, ctx: &VersionContext) -> bool {
        self.extensible_since.map_or(false, |since| ctx.is_at_least(since))
    }

    fn find(&self, kind: Option<NamespaceKind>, local_name: &str) -> Option<&ParameterSpec> {
        self.parameters
            .iter()
            .find(|spec| spec.name.namespace_kind() == kind && spec.name.local_name() == local_name)
    }

    /// Whether a parameter is recognized in the version
    pub fn is_recognized(&self, name: ParameterName, ctx: &VersionContext) -> bool {
        self.parameters
            .iter()
            .any(|spec| spec.name == name && ctx.is_at_least(spec.since))
    }
}

/// The category an attribute is classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeCategory {
    /// A recognized parameter
    Parameter(ParameterName),
    /// A security marking
    Marking(SecurityAttribute),
    /// An uninterpreted attribute in a foreign namespace
    Extensible,
    /// Neither recognized nor allowed as extensible
    Unclaimed,
}

impl AttributeCategory {
    /// Category label used in messages
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeCategory::Parameter(_) => "recognized",
            AttributeCategory::Marking(_) => "security",
            AttributeCategory::Extensible => "extensible",
            AttributeCategory::Unclaimed => "unclaimed",
        }
    }
}

/// One extensible attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensibleAttribute {
    /// Namespace URI
    pub namespace: String,
    /// Local name
    pub name: String,
    /// Value
    pub value: String,
}

/// Attributes carried uninterpreted on an element
///
/// Equality ignores insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ExtensibleAttribute>", into = "Vec<ExtensibleAttribute>")]
pub struct ExtensibleAttributes {
    attributes: IndexMap<QName, String>,
}

impl ExtensibleAttributes {
    /// An empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute
    pub fn insert(&mut self, namespace: &str, name: &str, value: impl Into<String>) {
        self.attributes
            .insert(QName::namespaced(namespace, name), value.into());
    }

    /// Builder-style insert
    pub fn with(mut self, namespace: &str, name: &str, value: impl Into<String>) -> Self {
        self.insert(namespace, name, value);
        self
    }

    /// Get a value by name
    pub fn get(&self, namespace: &str, name: &str) -> Option<&str> {
        self.attributes
            .get(&QName::namespaced(namespace, name))
            .map(|s| s.as_str())
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Iterate over attributes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&QName, &str)> {
        self.attributes.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Write the attributes onto an element, empty values included
    pub fn apply_to(&self, element: &mut Element) {
        for (qname, value) in self.iter() {
            element.attributes.insert(qname.clone(), value.to_string());
        }
    }
}

impl From<Vec<ExtensibleAttribute>> for ExtensibleAttributes {
    fn from(list: Vec<ExtensibleAttribute>) -> Self {
        let mut attributes = Self::new();
        for attr in list {
            attributes.insert(&attr.namespace, &attr.name, attr.value);
        }
        attributes
    }
}

impl From<ExtensibleAttributes> for Vec<ExtensibleAttribute> {
    fn from(attributes: ExtensibleAttributes) -> Self {
        attributes
            .attributes
            .into_iter()
            .map(|(qname, value)| ExtensibleAttribute {
                namespace: qname.namespace.unwrap_or_default(),
                name: qname.local_name,
                value,
            })
            .collect()
    }
}

/// The result of classifying an element's attributes
#[derive(Debug, Clone, Default)]
pub struct ClassifiedAttributes {
    /// Recognized parameters and their values
    pub parameters: IndexMap<ParameterName, String>,
    /// Security markings
    pub markings: IndexMap<SecurityAttribute, String>,
    /// Extensible attributes
    pub extensible: ExtensibleAttributes,
    /// Attributes that were dropped, one warning each
    pub dropped: Vec<ValidationMessage>,
}

impl ClassifiedAttributes {
    /// Value of a recognized parameter, or the empty string
    pub fn parameter(&self, name: ParameterName) -> String {
        self.parameters.get(&name).cloned().unwrap_or_default()
    }

    /// Value of an unqualified parameter, or the empty string
    pub fn local(&self, name: &'static str) -> String {
        self.parameter(ParameterName::Local(name))
    }
}

/// Partitions attributes for one element under one version
#[derive(Debug, Clone, Copy)]
pub struct AttributeClassifier<'a> {
    ctx: &'a VersionContext,
    profile: &'a AttributeProfile,
}

impl<'a> AttributeClassifier<'a> {
    /// Create a classifier
    pub fn new(ctx: &'a VersionContext, profile: &'a AttributeProfile) -> Self {
        Self { ctx, profile }
    }

    /// Classify one attribute name
    pub fn category_of(&self, qname: &QName) -> AttributeCategory {
        let kind = match qname.namespace.as_deref() {
            None => None,
            Some(uri) => match self.ctx.namespaces().kind_of(uri) {
                Some(kind) => Some(kind),
                None => return self.foreign(),
            },
        };
        let local_name = qname.local_name.as_str();

        if kind == Some(NamespaceKind::Ism) {
            return match claim_ism(local_name) {
                Some(IsmClaim::Parameter(parameter))
                    if self
                        .profile
                        .is_recognized(ParameterName::Ism(parameter), self.ctx) =>
                {
                    AttributeCategory::Parameter(ParameterName::Ism(parameter))
                }
                Some(IsmClaim::Marking(marking)) if self.profile.markings_enabled(self.ctx) => {
                    AttributeCategory::Marking(marking)
                }
                _ => self.foreign(),
            };
        }

        // Version gates on these names are enforced by the owning component.
        match self.profile.find(kind, local_name) {
            Some(spec) => AttributeCategory::Parameter(spec.name),
            None if kind.is_none() || kind == Some(NamespaceKind::Ddms) => AttributeCategory::Unclaimed,
            None => self.foreign(),
        }
    }

    fn foreign(&self) -> AttributeCategory {
        if self.profile.extensible_enabled(self.ctx) {
            AttributeCategory::Extensible
        } else {
            AttributeCategory::Unclaimed
        }
    }

    /// Classify every attribute of an element named `component`
    pub fn classify(&self, component: &str, element: &Element) -> ClassifiedAttributes {
        let mut classified = ClassifiedAttributes::default();
        for (qname, value) in &element.attributes {
            match self.category_of(qname) {
                AttributeCategory::Parameter(name) => {
                    classified.parameters.insert(name, value.clone());
                }
                AttributeCategory::Marking(marking) => {
                    classified.markings.insert(marking, value.clone());
                }
                AttributeCategory::Extensible => {
                    classified
                        .extensible
                        .insert(qname.namespace_str(), &qname.local_name, value.clone());
                }
                AttributeCategory::Unclaimed => {
                    classified.dropped.push(ValidationMessage::warning(
                        format!(
                            "The attribute {} is not recognized on {} in DDMS {} and was ignored.",
                            qname,
                            component,
                            self.ctx.version()
                        ),
                        format!("/{}", component),
                    ));
                }
            }
        }
        tracing::trace!(
            component,
            parameters = classified.parameters.len(),
            markings = classified.markings.len(),
            extensible = classified.extensible.len(),
            dropped = classified.dropped.len(),
            "classified attributes"
        );
        classified
    }

    /// Reject a version-gated parameter set before its version
    pub fn check_parameter(&self, name: ParameterName, value: &str) -> Result<()> {
        if value.is_empty() || self.profile.is_recognized(name, self.ctx) {
            return Ok(());
        }
        let since = self
            .profile
            .parameters
            .iter()
            .find(|spec| spec.name == name)
            .map(|spec| spec.since);
        Err(match since {
            Some(since) => Error::unsupported(
                name.to_string(),
                self.ctx.version(),
                format!("it cannot be used until DDMS {} or later", since),
            ),
            None => Error::unsupported(name.to_string(), self.ctx.version(), "it is not recognized."),
        })
    }

    /// Check that the element may carry the given markings in the version
    pub fn check_markings(&self, component: &str, markings: &SecurityAttributes) -> Result<()> {
        if markings.is_empty() || self.profile.markings_enabled(self.ctx) {
            return markings.validate(self.ctx, component);
        }
        Err(match self.profile.markings_since {
            Some(since) => Error::unsupported(
                format!("security attributes on {}", component),
                self.ctx.version(),
                format!("they cannot be used until DDMS {} or later", since),
            ),
            None => Error::invalid(component, "security attributes", "are not allowed."),
        })
    }

    /// Check caller-supplied extensible attributes against the profile
    pub fn check_extensible(&self, component: &str, extensible: &ExtensibleAttributes) -> Result<()> {
        if extensible.is_empty() {
            return Ok(());
        }
        if !self.profile.extensible_enabled(self.ctx) {
            let since = self.profile.extensible_since.unwrap_or(DdmsVersion::V2_0);
            return Err(match self.profile.extensible_since {
                Some(_) => Error::unsupported(
                    format!("extensible attributes on {}", component),
                    self.ctx.version(),
                    format!("they cannot be used until DDMS {} or later", since),
                ),
                None => Error::invalid(component, "extensible attributes", "are not allowed."),
            });
        }
        for (qname, _) in extensible.iter() {
            let category = match qname.namespace.as_deref() {
                None | Some("") => {
                    return Err(Error::invalid(
                        component,
                        qname.local_name.clone(),
                        "must be namespace-qualified to be extensible.",
                    ))
                }
                Some(_) => self.category_of(qname),
            };
            match category {
                AttributeCategory::Extensible => {}
                AttributeCategory::Unclaimed => {
                    return Err(Error::invalid(
                        component,
                        qname.to_string(),
                        "cannot be an extensible attribute.",
                    ))
                }
                claimed => {
                    return Err(Error::DuplicateAttributeClaim {
                        name: qname.to_string(),
                        claimed_by: claimed.as_str().to_string(),
                    })
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: AttributeProfile = AttributeProfile {
        parameters: &[
            ParameterSpec::always(ParameterName::Local("qualifier")),
            ParameterSpec::since(ParameterName::Ism(IsmParameter::PocType), DdmsVersion::V4_1),
        ],
        markings_since: Some(DdmsVersion::V3_0),
        extensible_since: Some(DdmsVersion::V2_0),
    };

    fn ctx(version: DdmsVersion) -> &'static VersionContext {
        VersionContext::get(version)
    }

    #[test]
    fn test_ism_claims_are_exclusive() {
        assert_eq!(
            claim_ism("pocType"),
            Some(IsmClaim::Parameter(IsmParameter::PocType))
        );
        assert_eq!(
            claim_ism("classification"),
            Some(IsmClaim::Marking(SecurityAttribute::Classification))
        );
        assert_eq!(claim_ism("unknownThing"), None);
    }

    #[test]
    fn test_classify_partitions() {
        let v41 = ctx(DdmsVersion::V4_1);
        let ism = v41.ism_namespace();
        let element = Element::new(QName::local("x"))
            .with_attribute(QName::local("qualifier"), "q")
            .with_attribute(QName::namespaced(ism, "classification"), "U")
            .with_attribute(QName::namespaced(ism, "pocType"), "ICD-710")
            .with_attribute(QName::namespaced("urn:ext", "note"), "n")
            .with_attribute(QName::local("stray"), "s");
        let classified = AttributeClassifier::new(v41, &PROFILE).classify("ddms:x", &element);
        assert_eq!(classified.local("qualifier"), "q");
        assert_eq!(classified.parameter(ParameterName::Ism(IsmParameter::PocType)), "ICD-710");
        assert_eq!(classified.markings.len(), 1);
        assert_eq!(classified.extensible.get("urn:ext", "note"), Some("n"));
        assert_eq!(classified.dropped.len(), 1);
        assert!(classified.dropped[0].text.contains("stray"));
    }

    #[test]
    fn test_version_gated_names_fall_through() {
        let v20 = ctx(DdmsVersion::V2_0);
        let ism = v20.ism_namespace();
        let classifier = AttributeClassifier::new(v20, &PROFILE);
        assert_eq!(
            classifier.category_of(&QName::namespaced(ism, "classification")),
            AttributeCategory::Extensible
        );
        let v40 = ctx(DdmsVersion::V4_0_1);
        let classifier = AttributeClassifier::new(v40, &PROFILE);
        assert_eq!(
            classifier.category_of(&QName::namespaced(v40.ism_namespace(), "pocType")),
            AttributeCategory::Extensible
        );
    }

    #[test]
    fn test_duplicate_claim() {
        let v41 = ctx(DdmsVersion::V4_1);
        let classifier = AttributeClassifier::new(v41, &PROFILE);
        let extensible = ExtensibleAttributes::new().with(v41.ism_namespace(), "classification", "U");
        let err = classifier.check_extensible("ddms:x", &extensible).unwrap_err();
        match err {
            Error::DuplicateAttributeClaim { name, claimed_by } => {
                assert_eq!(name, "{urn:us:gov:ic:ism}classification");
                assert_eq!(claimed_by, "security");
            }
            other => panic!("unexpected error: {}", other),
        }

        let ok = ExtensibleAttributes::new().with("urn:ext", "note", "n");
        assert!(classifier.check_extensible("ddms:x", &ok).is_ok());
    }

    #[test]
    fn test_unclaimed_name_is_not_extensible() {
        let v31 = ctx(DdmsVersion::V3_1);
        let classifier = AttributeClassifier::new(v31, &PROFILE);
        let extensible = ExtensibleAttributes::new().with(v31.ddms_namespace(), "madeUp", "x");
        assert_eq!(
            classifier.category_of(&QName::namespaced(v31.ddms_namespace(), "madeUp")),
            AttributeCategory::Unclaimed
        );
        match classifier.check_extensible("ddms:x", &extensible).unwrap_err() {
            Error::InvalidComponent { component, field, .. } => {
                assert_eq!(component, "ddms:x");
                assert_eq!(field, "{http://metadata.dod.mil/mdr/ns/DDMS/3.1/}madeUp");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_extensible_not_allowed() {
        let v41 = ctx(DdmsVersion::V4_1);
        let classifier = AttributeClassifier::new(v41, &AttributeProfile::NONE);
        let extensible = ExtensibleAttributes::new().with("urn:ext", "note", "n");
        assert!(matches!(
            classifier.check_extensible("ddms:x", &extensible),
            Err(Error::InvalidComponent { .. })
        ));
    }

    #[test]
    fn test_extensible_equality_ignores_order() {
        let a = ExtensibleAttributes::new()
            .with("urn:a", "one", "1")
            .with("urn:a", "two", "2");
        let b = ExtensibleAttributes::new()
            .with("urn:a", "two", "2")
            .with("urn:a", "one", "1");
        assert_eq!(a, b);
        let json = serde_json::to_string(&a).unwrap();
        let back: ExtensibleAttributes = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
    }

    #[test]
    fn test_check_parameter_and_markings() {
        let v40 = ctx(DdmsVersion::V4_0_1);
        let classifier = AttributeClassifier::new(v40, &PROFILE);
        let err = classifier
            .check_parameter(ParameterName::Ism(IsmParameter::PocType), "ICD-710")
            .unwrap_err();
        assert!(err.to_string().contains("until DDMS 4.1"));
        assert!(classifier
            .check_parameter(ParameterName::Ism(IsmParameter::PocType), "")
            .is_ok());

        let v20 = ctx(DdmsVersion::V2_0);
        let mut markings = IndexMap::new();
        markings.insert(SecurityAttribute::Classification, "U".to_string());
        let attrs = SecurityAttributes::new(v20, "ddms:x", markings).unwrap();
        let err = AttributeClassifier::new(v20, &PROFILE)
            .check_markings("ddms:x", &attrs)
            .unwrap_err();
        assert!(matches!(err, Error::VersionNotSupported { .. }));
    }

    #[test]
    fn test_parameter_display() {
        assert_eq!(ParameterName::Ism(IsmParameter::DesVersion).to_string(), "ism:DESVersion");
        assert_eq!(ParameterName::Local("qualifier").to_string(), "qualifier");
        let v31 = ctx(DdmsVersion::V3_1);
        assert_eq!(ParameterName::Ntk("DESVersion").qname(v31), None);
    }
}
