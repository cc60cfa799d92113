//! ISM security marking attributes
//!
//! [`SecurityAttributes`] holds the `ism:` markings attached to an element
//! (classification, owner/producer, dissemination controls and so on). Values
//! are validated against the active version when the set is built: every
//! token of a multi-token attribute is checked individually, and attributes
//! outside their version range are rejected by name.

use crate::documents::Element;
use crate::error::{Error, Result};
use crate::names::is_valid_nmtoken;
use crate::namespaces::QName;
use crate::output::OutputWriter;
use crate::validators::attributes::{claim_ism, IsmClaim};
use crate::validators::builders::Builder;
use crate::validators::helpers::{
    validate_boolean, validate_enumeration, validate_tokens, validate_xs_date,
};
use crate::version::{DdmsVersion, VersionContext};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

lazy_static::lazy_static! {
    /// Values of `ism:classification`
    pub static ref CLASSIFICATIONS: HashSet<&'static str> = [
        "U", "C", "S", "TS", "R", "CTS", "CTS-B", "CTS-BALK", "NU", "NR", "NC", "NS", "CTSA",
        "NSAT", "NCA",
    ]
    .into_iter()
    .collect();

    /// Tokens of `ism:disseminationControls`
    pub static ref DISSEMINATION_CONTROLS: HashSet<&'static str> = [
        "FOUO", "OC", "IMC", "NF", "PR", "REL", "RELIDO", "RS", "EYES", "DSEN", "FISA",
        "DISPLAYONLY",
    ]
    .into_iter()
    .collect();

    /// Tokens of `ism:nonICmarkings`
    pub static ref NON_IC_MARKINGS: HashSet<&'static str> = [
        "DS", "XD", "ND", "SBU", "SBU-NF", "LES", "LES-NF", "SSI", "NNPI",
    ]
    .into_iter()
    .collect();

    /// Tokens of `ism:nonUSControls`
    pub static ref NON_US_CONTROLS: HashSet<&'static str> =
        ["ATOMAL", "BOHEMIA", "BALK"].into_iter().collect();

    /// Tokens of `ism:atomicEnergyMarkings`
    pub static ref ATOMIC_ENERGY_MARKINGS: HashSet<&'static str> = [
        "RD", "RD-CNWDI", "FRD", "DCNI", "UCNI", "TFNI",
    ]
    .into_iter()
    .collect();

    /// Tokens of `ism:compliesWith`
    pub static ref COMPLIES_WITH: HashSet<&'static str> =
        ["USGov", "USIC", "USDOD", "OtherAuthority"].into_iter().collect();
}

/// The shape a marking value must take
#[derive(Debug, Clone, Copy)]
enum ValueShape {
    /// Free text
    Text,
    /// Exactly one member of an enumeration
    Single(&'static HashSet<&'static str>),
    /// Whitespace-delimited NMTOKENs
    Tokens,
    /// Whitespace-delimited members of an enumeration
    Enumerated(&'static HashSet<&'static str>),
    /// xs:date
    Date,
    /// xs:boolean
    Boolean,
}

/// An ISM marking attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SecurityAttribute {
    /// `ism:classification`
    Classification,
    /// `ism:ownerProducer`
    OwnerProducer,
    /// `ism:SCIcontrols`
    #[serde(rename = "SCIcontrols")]
    SciControls,
    /// `ism:SARIdentifier`
    #[serde(rename = "SARIdentifier")]
    SarIdentifier,
    /// `ism:atomicEnergyMarkings`
    AtomicEnergyMarkings,
    /// `ism:disseminationControls`
    DisseminationControls,
    /// `ism:displayOnlyTo`
    DisplayOnlyTo,
    /// `ism:FGIsourceOpen`
    #[serde(rename = "FGIsourceOpen")]
    FgiSourceOpen,
    /// `ism:FGIsourceProtected`
    #[serde(rename = "FGIsourceProtected")]
    FgiSourceProtected,
    /// `ism:releasableTo`
    ReleasableTo,
    /// `ism:nonICmarkings`
    #[serde(rename = "nonICmarkings")]
    NonIcMarkings,
    /// `ism:nonUSControls`
    #[serde(rename = "nonUSControls")]
    NonUsControls,
    /// `ism:classifiedBy`
    ClassifiedBy,
    /// `ism:compilationReason`
    CompilationReason,
    /// `ism:derivativelyClassifiedBy`
    DerivativelyClassifiedBy,
    /// `ism:classificationReason`
    ClassificationReason,
    /// `ism:derivedFrom`
    DerivedFrom,
    /// `ism:declassDate`
    DeclassDate,
    /// `ism:declassEvent`
    DeclassEvent,
    /// `ism:declassException`
    DeclassException,
    /// `ism:declassManualReview`
    DeclassManualReview,
    /// `ism:dateOfExemptedSource`
    DateOfExemptedSource,
    /// `ism:typeOfExemptedSource`
    TypeOfExemptedSource,
    /// `ism:compliesWith`
    CompliesWith,
}

impl SecurityAttribute {
    /// Every marking, in output order
    pub const ALL: [SecurityAttribute; 24] = [
        SecurityAttribute::Classification,
        SecurityAttribute::OwnerProducer,
        SecurityAttribute::SciControls,
        SecurityAttribute::SarIdentifier,
        SecurityAttribute::AtomicEnergyMarkings,
        SecurityAttribute::DisseminationControls,
        SecurityAttribute::DisplayOnlyTo,
        SecurityAttribute::FgiSourceOpen,
        SecurityAttribute::FgiSourceProtected,
        SecurityAttribute::ReleasableTo,
        SecurityAttribute::NonIcMarkings,
        SecurityAttribute::NonUsControls,
        SecurityAttribute::ClassifiedBy,
        SecurityAttribute::CompilationReason,
        SecurityAttribute::DerivativelyClassifiedBy,
        SecurityAttribute::ClassificationReason,
        SecurityAttribute::DerivedFrom,
        SecurityAttribute::DeclassDate,
        SecurityAttribute::DeclassEvent,
        SecurityAttribute::DeclassException,
        SecurityAttribute::DeclassManualReview,
        SecurityAttribute::DateOfExemptedSource,
        SecurityAttribute::TypeOfExemptedSource,
        SecurityAttribute::CompliesWith,
    ];

    /// Look up a marking by its `ism:` local name
    pub fn from_str(s: &str) -> Option<Self> {
        match claim_ism(s) {
            Some(IsmClaim::Marking(attribute)) => Some(attribute),
            _ => None,
        }
    }

    /// The `ism:` local name
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityAttribute::Classification => "classification",
            SecurityAttribute::OwnerProducer => "ownerProducer",
            SecurityAttribute::SciControls => "SCIcontrols",
            SecurityAttribute::SarIdentifier => "SARIdentifier",
            SecurityAttribute::AtomicEnergyMarkings => "atomicEnergyMarkings",
            SecurityAttribute::DisseminationControls => "disseminationControls",
            SecurityAttribute::DisplayOnlyTo => "displayOnlyTo",
            SecurityAttribute::FgiSourceOpen => "FGIsourceOpen",
            SecurityAttribute::FgiSourceProtected => "FGIsourceProtected",
            SecurityAttribute::ReleasableTo => "releasableTo",
            SecurityAttribute::NonIcMarkings => "nonICmarkings",
            SecurityAttribute::NonUsControls => "nonUSControls",
            SecurityAttribute::ClassifiedBy => "classifiedBy",
            SecurityAttribute::CompilationReason => "compilationReason",
            SecurityAttribute::DerivativelyClassifiedBy => "derivativelyClassifiedBy",
            SecurityAttribute::ClassificationReason => "classificationReason",
            SecurityAttribute::DerivedFrom => "derivedFrom",
            SecurityAttribute::DeclassDate => "declassDate",
            SecurityAttribute::DeclassEvent => "declassEvent",
            SecurityAttribute::DeclassException => "declassException",
            SecurityAttribute::DeclassManualReview => "declassManualReview",
            SecurityAttribute::DateOfExemptedSource => "dateOfExemptedSource",
            SecurityAttribute::TypeOfExemptedSource => "typeOfExemptedSource",
            SecurityAttribute::CompliesWith => "compliesWith",
        }
    }

    fn shape(&self) -> ValueShape {
        match self {
            SecurityAttribute::Classification => ValueShape::Single(&CLASSIFICATIONS),
            SecurityAttribute::AtomicEnergyMarkings => {
                ValueShape::Enumerated(&ATOMIC_ENERGY_MARKINGS)
            }
            SecurityAttribute::DisseminationControls => {
                ValueShape::Enumerated(&DISSEMINATION_CONTROLS)
            }
            SecurityAttribute::NonIcMarkings => ValueShape::Enumerated(&NON_IC_MARKINGS),
            SecurityAttribute::NonUsControls => ValueShape::Enumerated(&NON_US_CONTROLS),
            SecurityAttribute::CompliesWith => ValueShape::Enumerated(&COMPLIES_WITH),
            SecurityAttribute::OwnerProducer
            | SecurityAttribute::SciControls
            | SecurityAttribute::SarIdentifier
            | SecurityAttribute::DisplayOnlyTo
            | SecurityAttribute::FgiSourceOpen
            | SecurityAttribute::FgiSourceProtected
            | SecurityAttribute::ReleasableTo
            | SecurityAttribute::DeclassException
            | SecurityAttribute::TypeOfExemptedSource => ValueShape::Tokens,
            SecurityAttribute::DeclassDate | SecurityAttribute::DateOfExemptedSource => {
                ValueShape::Date
            }
            SecurityAttribute::DeclassManualReview => ValueShape::Boolean,
            SecurityAttribute::ClassifiedBy
            | SecurityAttribute::CompilationReason
            | SecurityAttribute::DerivativelyClassifiedBy
            | SecurityAttribute::ClassificationReason
            | SecurityAttribute::DerivedFrom
            | SecurityAttribute::DeclassEvent => ValueShape::Text,
        }
    }

    /// First version that defines this marking
    pub fn since(&self) -> DdmsVersion {
        match self {
            SecurityAttribute::CompilationReason => DdmsVersion::V3_0,
            SecurityAttribute::CompliesWith => DdmsVersion::V3_1,
            SecurityAttribute::AtomicEnergyMarkings | SecurityAttribute::DisplayOnlyTo => {
                DdmsVersion::V4_0_1
            }
            SecurityAttribute::NonUsControls => DdmsVersion::V4_1,
            _ => DdmsVersion::V2_0,
        }
    }

    /// Last version that defines this marking
    pub fn until(&self) -> Option<DdmsVersion> {
        match self {
            SecurityAttribute::DeclassManualReview
            | SecurityAttribute::DateOfExemptedSource
            | SecurityAttribute::TypeOfExemptedSource => Some(DdmsVersion::V3_1),
            _ => None,
        }
    }

    /// Whether the marking exists in a version
    pub fn is_supported(&self, version: DdmsVersion) -> bool {
        version >= self.since() && self.until().map_or(true, |until| version <= until)
    }

    fn check_version(&self, ctx: &VersionContext) -> Result<()> {
        if self.is_supported(ctx.version()) {
            return Ok(());
        }
        let reason = match self.until() {
            Some(until) if ctx.version() > until => {
                format!("it was removed after DDMS {}", until)
            }
            _ => format!("it cannot be used until DDMS {} or later", self.since()),
        };
        Err(Error::unsupported(format!("ism:{}", self.as_str()), ctx.version(), reason))
    }

    fn check_value(&self, component: &str, value: &str) -> Result<()> {
        let field = format!("ism:{}", self.as_str());
        match self.shape() {
            ValueShape::Text => Ok(()),
            ValueShape::Single(allowed) => {
                if allowed.contains(value) {
                    Ok(())
                } else {
                    Err(Error::invalid(
                        component,
                        field,
                        format!("'{}' is not a valid value.", value),
                    ))
                }
            }
            ValueShape::Tokens => validate_tokens(component, &field, value, is_valid_nmtoken),
            ValueShape::Enumerated(allowed) => {
                validate_enumeration(component, &field, value, allowed)
            }
            ValueShape::Date => validate_xs_date(component, &field, value),
            ValueShape::Boolean => validate_boolean(component, &field, value).map(|_| ()),
        }
    }
}

impl fmt::Display for SecurityAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ism:{}", self.as_str())
    }
}

/// A validated set of ISM markings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityAttributes {
    values: IndexMap<SecurityAttribute, String>,
}

impl SecurityAttributes {
    /// An empty set
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate markings for `component` under the active version
    ///
    /// Blank values are dropped. Value formats are checked before version ranges.
    pub fn new(
        ctx: &VersionContext,
        component: &str,
        values: IndexMap<SecurityAttribute, String>,
    ) -> Result<Self> {
        let mut values: IndexMap<SecurityAttribute, String> = values
            .into_iter()
            .map(|(attribute, value)| (attribute, value.trim().to_string()))
            .filter(|(_, value)| !value.is_empty())
            .collect();
        values.sort_keys();

        let attributes = Self { values };
        attributes.validate(ctx, component)?;
        Ok(attributes)
    }

    /// Check every value and version range under `ctx`
    pub fn validate(&self, ctx: &VersionContext, component: &str) -> Result<()> {
        for (attribute, value) in &self.values {
            attribute.check_value(component, value)?;
        }
        for attribute in self.values.keys() {
            attribute.check_version(ctx)?;
        }
        Ok(())
    }

    /// Require the markings every classified element must carry
    pub fn require_markings(&self, component: &str) -> Result<()> {
        for attribute in [SecurityAttribute::Classification, SecurityAttribute::OwnerProducer] {
            if !self.values.contains_key(&attribute) {
                return Err(Error::invalid(component, attribute.to_string(), "is required."));
            }
        }
        Ok(())
    }

    /// Whether no marking is set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of markings set
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Get a marking value
    pub fn get(&self, attribute: SecurityAttribute) -> Option<&str> {
        self.values.get(&attribute).map(|s| s.as_str())
    }

    /// The classification, if set
    pub fn classification(&self) -> Option<&str> {
        self.get(SecurityAttribute::Classification)
    }

    /// The owner/producer tokens
    pub fn owner_producers(&self) -> Vec<&str> {
        self.get(SecurityAttribute::OwnerProducer)
            .map(|v| v.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Iterate over markings in output order
    pub fn iter(&self) -> impl Iterator<Item = (SecurityAttribute, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Write the markings onto an element
    pub fn apply_to(&self, ctx: &VersionContext, element: &mut Element) {
        for (attribute, value) in self.iter() {
            element.set_attribute(
                QName::namespaced(ctx.ism_namespace(), attribute.as_str()),
                value,
            );
        }
    }

    /// Add one output entry per marking
    pub fn write_output(&self, writer: &mut OutputWriter<'_>) {
        for (attribute, value) in self.iter() {
            writer.add(attribute.as_str(), value);
        }
    }
}

/// Unvalidated markings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecurityAttributesBuilder {
    /// Marking values by attribute
    pub markings: IndexMap<SecurityAttribute, String>,
}

impl SecurityAttributesBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, attribute: SecurityAttribute, value: impl Into<String>) -> Self {
        self.markings.insert(attribute, value.into());
        self
    }

    /// Build for a named component, keeping an empty set when nothing is set
    pub fn build_for(&self, ctx: &VersionContext, component: &str) -> Result<SecurityAttributes> {
        SecurityAttributes::new(ctx, component, self.markings.clone())
    }
}

impl From<&SecurityAttributes> for SecurityAttributesBuilder {
    fn from(attributes: &SecurityAttributes) -> Self {
        Self {
            markings: attributes.values.clone(),
        }
    }
}

impl Builder for SecurityAttributesBuilder {
    type Target = SecurityAttributes;

    fn is_empty(&self) -> bool {
        self.markings.values().all(|v| v.trim().is_empty())
    }

    fn build(&self, ctx: &VersionContext) -> Result<SecurityAttributes> {
        self.build_for(ctx, "security attributes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markings(pairs: &[(SecurityAttribute, &str)]) -> IndexMap<SecurityAttribute, String> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn test_name_lookup() {
        for attribute in SecurityAttribute::ALL {
            assert_eq!(SecurityAttribute::from_str(attribute.as_str()), Some(attribute));
        }
        assert_eq!(SecurityAttribute::from_str("pocType"), None);
        assert_eq!(SecurityAttribute::SciControls.to_string(), "ism:SCIcontrols");
    }

    #[test]
    fn test_valid_markings() {
        let ctx = VersionContext::get(DdmsVersion::V3_1);
        let attrs = SecurityAttributes::new(
            ctx,
            "ddms:title",
            markings(&[
                (SecurityAttribute::OwnerProducer, "USA AUS"),
                (SecurityAttribute::Classification, "U"),
            ]),
        )
        .unwrap();
        assert_eq!(attrs.classification(), Some("U"));
        assert_eq!(attrs.owner_producers(), vec!["USA", "AUS"]);
        let order: Vec<_> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(order[0], SecurityAttribute::Classification);
        assert!(attrs.require_markings("ddms:title").is_ok());
    }

    #[test]
    fn test_invalid_classification() {
        let ctx = VersionContext::latest();
        let err = SecurityAttributes::new(
            ctx,
            "ddms:title",
            markings(&[(SecurityAttribute::Classification, "SECRETISH")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("SECRETISH"));
    }

    #[test]
    fn test_invalid_token_is_named() {
        let ctx = VersionContext::latest();
        let err = SecurityAttributes::new(
            ctx,
            "ddms:title",
            markings(&[(SecurityAttribute::DisseminationControls, "FOUO BOGUS NF")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("'BOGUS'"));
    }

    #[test]
    fn test_version_ranges() {
        let v30 = VersionContext::get(DdmsVersion::V3_0);
        let err = SecurityAttributes::new(
            v30,
            "ddms:title",
            markings(&[(SecurityAttribute::CompliesWith, "USIC")]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::VersionNotSupported { ref name, .. } if name == "ism:compliesWith"));

        let v41 = VersionContext::get(DdmsVersion::V4_1);
        let err = SecurityAttributes::new(
            v41,
            "ddms:title",
            markings(&[(SecurityAttribute::DeclassManualReview, "true")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("removed after DDMS 3.1"));
    }

    #[test]
    fn test_required_markings() {
        let ctx = VersionContext::latest();
        let attrs = SecurityAttributes::new(
            ctx,
            "ddms:title",
            markings(&[(SecurityAttribute::Classification, "U")]),
        )
        .unwrap();
        let err = attrs.require_markings("ddms:title").unwrap_err();
        assert!(err.to_string().contains("ism:ownerProducer"));
    }

    #[test]
    fn test_blank_values_dropped() {
        let ctx = VersionContext::latest();
        let attrs = SecurityAttributes::new(
            ctx,
            "ddms:title",
            markings(&[(SecurityAttribute::ClassifiedBy, "  ")]),
        )
        .unwrap();
        assert!(attrs.is_empty());
        assert!(SecurityAttributesBuilder::new()
            .with(SecurityAttribute::ClassifiedBy, " ")
            .is_empty());
    }

    #[test]
    fn test_builder_json_keys() {
        let builder = SecurityAttributesBuilder::new()
            .with(SecurityAttribute::Classification, "U")
            .with(SecurityAttribute::SciControls, "SI");
        let json = serde_json::to_string(&builder).unwrap();
        assert_eq!(json, r#"{"classification":"U","SCIcontrols":"SI"}"#);
        let back: SecurityAttributesBuilder = serde_json::from_str(&json).unwrap();
        assert_eq!(back, builder);
    }
}
