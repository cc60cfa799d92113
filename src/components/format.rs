//! Format and extent
//!
//! Up to DDMS 3.1 the format details sit inside a `ddms:Media` wrapper;
//! from 4.0.1 they are direct children of `ddms:format`.

use crate::components::identifier::ddms_attribute;
use crate::documents::Element;
use crate::error::{Error, Result, ValidationMessage};
use crate::output::OutputWriter;
use crate::validators::attributes::{AttributeClassifier, AttributeProfile, ParameterName, ParameterSpec};
use crate::validators::base::{
    expect_element, new_element, qualified, require_same_version, trace_built, validate_child_elements,
    write_child, Component, Warnings,
};
use crate::validators::builders::Builder;
use crate::validators::cardinality::{CardinalityRule, RuleSet};
use crate::validators::helpers::{require_value, validate_uri};
use crate::version::{DdmsVersion, NamespaceKind, VersionContext};
use serde::{Deserialize, Serialize};

const QUALIFIER: ParameterName = ParameterName::Ddms("qualifier");
const VALUE: ParameterName = ParameterName::Ddms("value");

const EXTENT_PROFILE: AttributeProfile = AttributeProfile {
    parameters: &[ParameterSpec::always(QUALIFIER), ParameterSpec::always(VALUE)],
    markings_since: None,
    extensible_since: None,
};

const MEDIA: &str = "Media";
const MIME_TYPE: &str = "mimeType";
const MEDIUM: &str = "medium";

/// A `ddms:extent`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extent {
    version: DdmsVersion,
    qualifier: String,
    value: String,
    warnings: Warnings,
}

impl Extent {
    /// Element name
    pub const NAME: &'static str = "extent";

    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        expect_element(ctx, element, NamespaceKind::Ddms, Self::NAME)?;
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let attributes = AttributeClassifier::new(ctx, &EXTENT_PROFILE).classify(&name, element);
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
        if !qualifier.is_empty() {
            validate_uri(&name, "qualifier", qualifier)?;
        }

        let mut warnings = Warnings::new();
        warnings.extend(dropped);
        if qualifier.is_empty() && value.is_empty() {
            warnings.push(format!("A completely empty {} element was found.", name), &locator);
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

    /// The qualifier URI
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    /// The extent value
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Component for Extent {
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

/// Builder for [`Extent`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtentBuilder {
    /// The qualifier URI
    pub qualifier: String,
    /// The extent value
    pub value: String,
}

impl From<&Extent> for ExtentBuilder {
    fn from(component: &Extent) -> Self {
        Self {
            qualifier: component.qualifier.clone(),
            value: component.value.clone(),
        }
    }
}

impl Builder for ExtentBuilder {
    type Target = Extent;

    fn is_empty(&self) -> bool {
        self.qualifier.trim().is_empty() && self.value.trim().is_empty()
    }

    fn build(&self, ctx: &VersionContext) -> Result<Extent> {
        Extent::new(ctx, &self.qualifier, &self.value)
    }
}

fn media_rules() -> RuleSet {
    RuleSet::new(qualified(NamespaceKind::Ddms, Format::NAME))
        .rule(CardinalityRule::exactly_one(MIME_TYPE))
        .rule(CardinalityRule::optional(Extent::NAME))
        .rule(CardinalityRule::optional(MEDIUM))
}

/// A `ddms:format`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    version: DdmsVersion,
    mime_type: String,
    extent: Option<Extent>,
    medium: String,
    warnings: Warnings,
}

impl Format {
    /// Element name
    pub const NAME: &'static str = "format";

    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        expect_element(ctx, element, NamespaceKind::Ddms, Self::NAME)?;
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let attributes = AttributeClassifier::new(ctx, &AttributeProfile::NONE).classify(&name, element);
        let ddms = ctx.ddms_namespace();

        let details = if ctx.features().flat_format {
            element
        } else {
            let wrappers = element.find_children(ddms, MEDIA);
            if wrappers.len() != 1 {
                return Err(Error::CardinalityViolation {
                    parent: name,
                    child: MEDIA.to_string(),
                    actual: wrappers.len(),
                    min: 1,
                    max: Some(1),
                });
            }
            wrappers[0]
        };

        validate_child_elements(ctx, details, &[NamespaceKind::Ddms], &media_rules())?;

        let extent = details
            .find_child(ddms, Extent::NAME)
            .map(|e| Extent::from_element(ctx, e))
            .transpose()?;
        Self::build(
            ctx,
            &details.child_text(ddms, MIME_TYPE),
            extent,
            &details.child_text(ddms, MEDIUM),
            attributes.dropped,
        )
    }

    /// Construct from values
    pub fn new(ctx: &VersionContext, mime_type: &str, extent: Option<Extent>, medium: &str) -> Result<Self> {
        Self::build(ctx, mime_type, extent, medium, Vec::new())
    }

    fn build(
        ctx: &VersionContext,
        mime_type: &str,
        extent: Option<Extent>,
        medium: &str,
        dropped: Vec<ValidationMessage>,
    ) -> Result<Self> {
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let (mime_type, medium) = (mime_type.trim(), medium.trim());
        require_value(&name, MIME_TYPE, mime_type)?;

        let mut warnings = Warnings::new();
        warnings.extend(dropped);
        let parent = if ctx.features().flat_format {
            format!("/{}", name)
        } else {
            format!("/{}/ddms:{}", name, MEDIA)
        };
        if let Some(extent) = &extent {
            require_same_version(ctx, &name, extent)?;
            warnings.absorb(&parent, extent);
        }

        let component = Self {
            version: ctx.version(),
            mime_type: mime_type.to_string(),
            extent,
            medium: medium.to_string(),
            warnings,
        };
        trace_built(&component);
        Ok(component)
    }

    /// The MIME type
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The extent, if any
    pub fn extent(&self) -> Option<&Extent> {
        self.extent.as_ref()
    }

    /// The medium
    pub fn medium(&self) -> &str {
        &self.medium
    }
}

impl Component for Format {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> DdmsVersion {
        self.version
    }

    fn warnings(&self) -> &[ValidationMessage] {
        self.warnings.as_slice()
    }

    fn children(&self) -> Vec<&dyn Component> {
        self.extent.iter().map(|e| e as &dyn Component).collect()
    }

    fn to_element(&self) -> Element {
        let ctx = self.context();
        let mut details = new_element(ctx, NamespaceKind::Ddms, MEDIA);
        details.add_child(new_element(ctx, NamespaceKind::Ddms, MIME_TYPE).with_text(&self.mime_type));
        if let Some(extent) = &self.extent {
            details.add_child(extent.to_element());
        }
        if !self.medium.is_empty() {
            details.add_child(new_element(ctx, NamespaceKind::Ddms, MEDIUM).with_text(&self.medium));
        }

        let mut element = new_element(ctx, NamespaceKind::Ddms, Self::NAME);
        if ctx.features().flat_format {
            element.children = details.children;
        } else {
            element.add_child(details);
        }
        element
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        let media = if self.context().features().flat_format {
            String::new()
        } else {
            format!("{}.", MEDIA)
        };
        out.add(&format!("{}{}", media, MIME_TYPE), &self.mime_type);
        write_child(out, &format!("{}{}", media, Extent::NAME), self.extent.as_ref());
        out.add(&format!("{}{}", media, MEDIUM), &self.medium);
    }
}

/// Builder for [`Format`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatBuilder {
    /// The MIME type
    pub mime_type: String,
    /// The extent
    pub extent: ExtentBuilder,
    /// The medium
    pub medium: String,
}

impl From<&Format> for FormatBuilder {
    fn from(component: &Format) -> Self {
        Self {
            mime_type: component.mime_type.clone(),
            extent: component.extent.as_ref().map(ExtentBuilder::from).unwrap_or_default(),
            medium: component.medium.clone(),
        }
    }
}

impl Builder for FormatBuilder {
    type Target = Format;

    fn is_empty(&self) -> bool {
        self.mime_type.trim().is_empty() && self.medium.trim().is_empty() && self.extent.is_empty()
    }

    fn build(&self, ctx: &VersionContext) -> Result<Format> {
        Format::new(ctx, &self.mime_type, self.extent.commit(ctx)?, &self.medium)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Document;
    use pretty_assertions::assert_eq;

    fn sample(ctx: &VersionContext) -> Format {
        let extent = Extent::new(ctx, "sizeBytes", "75000").unwrap();
        Format::new(ctx, "text/xml", Some(extent), "digital").unwrap()
    }

    #[test]
    fn test_media_wrapper_by_version() {
        let old = VersionContext::get(DdmsVersion::V3_1);
        let element = sample(old).to_element();
        assert_eq!(element.children.len(), 1);
        assert_eq!(element.children[0].local_name(), "Media");

        let new = VersionContext::get(DdmsVersion::V4_1);
        let element = sample(new).to_element();
        assert_eq!(element.children.len(), 3);
        assert_eq!(element.children[0].local_name(), "mimeType");
    }

    #[test]
    fn test_round_trip_through_markup() {
        for version in [DdmsVersion::V2_0, DdmsVersion::V5_0] {
            let ctx = VersionContext::get(version);
            let format = sample(ctx);
            let parsed = Document::from_string(&format.to_xml()).unwrap().into_root();
            assert_eq!(Format::from_element(ctx, &parsed).unwrap(), format);
        }
    }

    #[test]
    fn test_mime_type_required() {
        let ctx = VersionContext::latest();
        let err = Format::new(ctx, " ", None, "digital").unwrap_err();
        assert!(matches!(err, Error::InvalidComponent { ref field, .. } if field == "mimeType"));
    }

    #[test]
    fn test_repeated_mime_type() {
        let ctx = VersionContext::latest();
        let mut element = sample(ctx).to_element();
        element.add_child(new_element(ctx, NamespaceKind::Ddms, MIME_TYPE).with_text("text/html"));
        let err = Format::from_element(ctx, &element).unwrap_err();
        assert!(matches!(err, Error::CardinalityViolation { actual: 2, .. }));
    }

    #[test]
    fn test_extent_warnings_are_located() {
        let ctx = VersionContext::get(DdmsVersion::V3_0);
        let extent = Extent::new(ctx, "sizeBytes", "").unwrap();
        let format = Format::new(ctx, "text/xml", Some(extent), "").unwrap();
        assert_eq!(format.warnings().len(), 1);
        assert_eq!(format.warnings()[0].locator, "/ddms:format/ddms:Media/ddms:extent");
        assert!(Extent::new(ctx, "", "75000").is_err());
    }

    #[test]
    fn test_output() {
        let ctx = VersionContext::latest();
        assert_eq!(
            sample(ctx).to_text(),
            "format.mimeType: text/xml\nformat.extent.qualifier: sizeBytes\nformat.extent.value: 75000\nformat.medium: digital\n"
        );
        let old = VersionContext::get(DdmsVersion::V3_1);
        assert!(sample(old).to_text().starts_with("format.Media.mimeType: text/xml\n"));
    }

    #[test]
    fn test_builder() {
        let ctx = VersionContext::get(DdmsVersion::V4_0_1);
        let format = sample(ctx);
        let builder = FormatBuilder::from(&format);
        let restored = VersionContext::get(DdmsVersion::V3_0);
        assert_eq!(builder.commit(restored).unwrap(), Some(sample(restored)));
        assert!(FormatBuilder::default().commit(ctx).unwrap().is_none());
    }
}
