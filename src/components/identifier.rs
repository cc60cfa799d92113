//! Identifier and language
//!
//! Both elements are a `ddms:qualifier`/`ddms:value` pair with no content.

use crate::documents::Element;
use crate::error::{Error, Result, ValidationMessage};
use crate::namespaces::QName;
use crate::output::OutputWriter;
use crate::validators::attributes::{AttributeClassifier, AttributeProfile, ParameterName, ParameterSpec};
use crate::validators::base::{expect_element, new_element, qualified, trace_built, Component, Warnings};
use crate::validators::builders::Builder;
use crate::validators::helpers::{require_value, validate_uri};
use crate::version::{DdmsVersion, NamespaceKind, VersionContext};
use serde::{Deserialize, Serialize};

const QUALIFIER: ParameterName = ParameterName::Ddms("qualifier");
const VALUE: ParameterName = ParameterName::Ddms("value");

const PROFILE: AttributeProfile = AttributeProfile {
    parameters: &[ParameterSpec::always(QUALIFIER), ParameterSpec::always(VALUE)],
    markings_since: None,
    extensible_since: None,
};

pub(crate) fn ddms_attribute(ctx: &VersionContext, name: &str) -> QName {
    QName::namespaced(ctx.ddms_namespace(), name)
}

/// A `ddms:identifier`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    version: DdmsVersion,
    qualifier: String,
    value: String,
    warnings: Warnings,
}

impl Identifier {
    /// Element name
    pub const NAME: &'static str = "identifier";

    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        expect_element(ctx, element, NamespaceKind::Ddms, Self::NAME)?;
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let attributes = AttributeClassifier::new(ctx, &PROFILE).classify(&name, element);
        Self::build(
            ctx,
            &attributes.parameter(QUALIFIER),
            &attributes.parameter(VALUE),
            attributes.dropped,
        )
    }

    /// Construct from values
    pub fn new(ctx: &VersionContext, qualifier: &str, value: &str) -> Result<Self> {
        Self::build(ctx, qualifier, value, Vec::new())
    }

    fn build(
        ctx: &VersionContext,
        qualifier: &str,
        value: &str,
        dropped: Vec<ValidationMessage>,
    ) -> Result<Self> {
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let (qualifier, value) = (qualifier.trim(), value.trim());
        require_value(&name, "qualifier", qualifier)?;
        require_value(&name, "value", value)?;
        validate_uri(&name, "qualifier", qualifier)?;

        let mut warnings = Warnings::new();
        warnings.extend(dropped);
        let component = Self {
            version: ctx.version(),
            qualifier: qualifier.to_string(),
            value: value.to_string(),
            warnings,
        };
        trace_built(&component);
        Ok(component)
    }

    /// The qualifier URI
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    /// The identifier value
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Component for Identifier {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> DdmsVersion {
        self.version
    }

    fn warnings(&self) -> &[ValidationMessage] {
        self.warnings.as_slice()
    }

    fn to_element(&self) -> Element {
        let ctx = self.context();
        new_element(ctx, NamespaceKind::Ddms, Self::NAME)
            .with_attribute(ddms_attribute(ctx, "qualifier"), &self.qualifier)
            .with_attribute(ddms_attribute(ctx, "value"), &self.value)
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        out.add("qualifier", &self.qualifier);
        out.add("value", &self.value);
    }
}

/// Builder for [`Identifier`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentifierBuilder {
    /// The qualifier URI
    pub qualifier: String,
    /// The identifier value
    pub value: String,
}

impl From<&Identifier> for IdentifierBuilder {
    fn from(component: &Identifier) -> Self {
        Self {
            qualifier: component.qualifier.clone(),
            value: component.value.clone(),
        }
    }
}

impl Builder for IdentifierBuilder {
    type Target = Identifier;

    fn is_empty(&self) -> bool {
        self.qualifier.trim().is_empty() && self.value.trim().is_empty()
    }

    fn build(&self, ctx: &VersionContext) -> Result<Identifier> {
        Identifier::new(ctx, &self.qualifier, &self.value)
    }
}

/// A `ddms:language`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    version: DdmsVersion,
    qualifier: String,
    value: String,
    warnings: Warnings,
}

impl Language {
    /// Element name
    pub const NAME: &'static str = "language";

    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        expect_element(ctx, element, NamespaceKind::Ddms, Self::NAME)?;
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let attributes = AttributeClassifier::new(ctx, &PROFILE).classify(&name, element);
        Self::build(
            ctx,
            &attributes.parameter(QUALIFIER),
            &attributes.parameter(VALUE),
            attributes.dropped,
        )
    }

    /// Construct from values
    pub fn new(ctx: &VersionContext, qualifier: &str, value: &str) -> Result<Self> {
        Self::build(ctx, qualifier, value, Vec::new())
    }

    fn build(
        ctx: &VersionContext,
        qualifier: &str,
        value: &str,
        dropped: Vec<ValidationMessage>,
    ) -> Result<Self> {
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let locator = format!("/{}", name);
        let (qualifier, value) = (qualifier.trim(), value.trim());
        if !value.is_empty() && qualifier.is_empty() {
            return Err(Error::invalid(&name, "qualifier", "is required when a value is set."));
        }

        let mut warnings = Warnings::new();
        warnings.extend(dropped);
        if qualifier.is_empty() && value.is_empty() {
            warnings.push("Neither a qualifier nor a value was set on this language.", &locator);
        } else if value.is_empty() {
            warnings.push(
                "A qualifier has been set without an accompanying value attribute.",
                &locator,
            );
        }

        let component = Self {
            version: ctx.version(),
            qualifier: qualifier.to_string(),
            value: value.to_string(),
            warnings,
        };
        trace_built(&component);
        Ok(component)
    }

    /// The qualifier
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    /// The language code
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Component for Language {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> DdmsVersion {
        self.version
    }

    fn warnings(&self) -> &[ValidationMessage] {
        self.warnings.as_slice()
    }

    fn to_element(&self) -> Element {
        let ctx = self.context();
        new_element(ctx, NamespaceKind::Ddms, Self::NAME)
            .with_attribute(ddms_attribute(ctx, "qualifier"), &self.qualifier)
            .with_attribute(ddms_attribute(ctx, "value"), &self.value)
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        out.add("qualifier", &self.qualifier);
        out.add("value", &self.value);
    }
}

/// Builder for [`Language`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageBuilder {
    /// The qualifier
    pub qualifier: String,
    /// The language code
    pub value: String,
}

impl From<&Language> for LanguageBuilder {
    fn from(component: &Language) -> Self {
        Self {
            qualifier: component.qualifier.clone(),
            value: component.value.clone(),
        }
    }
}

impl Builder for LanguageBuilder {
    type Target = Language;

    fn is_empty(&self) -> bool {
        self.qualifier.trim().is_empty() && self.value.trim().is_empty()
    }

    fn build(&self, ctx: &VersionContext) -> Result<Language> {
        Language::new(ctx, &self.qualifier, &self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Document;

    #[test]
    fn test_identifier_from_element() {
        let ctx = VersionContext::get(DdmsVersion::V4_1);
        let xml = format!(
            r#"<ddms:identifier xmlns:ddms="{}" ddms:qualifier="URI" ddms:value="urn:buri:ddmsence:testIdentifier" />"#,
            ctx.ddms_namespace()
        );
        let element = Document::from_string(&xml).unwrap().into_root();
        let parsed = Identifier::from_element(ctx, &element).unwrap();
        assert_eq!(parsed, Identifier::new(ctx, "URI", "urn:buri:ddmsence:testIdentifier").unwrap());
        assert_eq!(parsed.to_element(), element);
    }

    #[test]
    fn test_identifier_required_fields() {
        let ctx = VersionContext::latest();
        let err = Identifier::new(ctx, "", "x").unwrap_err();
        assert!(matches!(err, Error::InvalidComponent { ref field, .. } if field == "qualifier"));
        let err = Identifier::new(ctx, "URI", "").unwrap_err();
        assert!(matches!(err, Error::InvalidComponent { ref field, .. } if field == "value"));
        assert!(Identifier::new(ctx, "not a uri", "x").is_err());
    }

    #[test]
    fn test_identifier_drops_unknown_attribute() {
        let ctx = VersionContext::latest();
        let element = Identifier::new(ctx, "URI", "x")
            .unwrap()
            .to_element()
            .with_attribute(QName::local("extra"), "1");
        let parsed = Identifier::from_element(ctx, &element).unwrap();
        assert_eq!(parsed.warnings().len(), 1);
        assert!(parsed.warnings()[0].text.contains("extra"));
    }

    #[test]
    fn test_language_warnings() {
        let ctx = VersionContext::latest();
        assert_eq!(Language::new(ctx, "", "").unwrap().warnings().len(), 1);
        assert_eq!(Language::new(ctx, "ISO-639", "").unwrap().warnings().len(), 1);
        assert!(Language::new(ctx, "ISO-639", "en").unwrap().warnings().is_empty());
        assert!(Language::new(ctx, "", "en").is_err());
    }

    #[test]
    fn test_output() {
        let ctx = VersionContext::latest();
        let language = Language::new(ctx, "ISO-639", "en").unwrap();
        assert_eq!(language.to_text(), "language.qualifier: ISO-639\nlanguage.value: en\n");
    }

    #[test]
    fn test_builders() {
        let ctx = VersionContext::get(DdmsVersion::V3_0);
        let identifier = Identifier::new(ctx, "URI", "x").unwrap();
        assert_eq!(IdentifierBuilder::from(&identifier).commit(ctx).unwrap(), Some(identifier));
        assert!(LanguageBuilder::default().commit(ctx).unwrap().is_none());
    }
}
