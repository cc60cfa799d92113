//! Title, subtitle and description
//!
//! The three text elements of a resource share one shape: a text value with
//! mandatory security markings.

use crate::documents::Element;
use crate::error::{Error, Result, ValidationMessage};
use crate::output::OutputWriter;
use crate::validators::attributes::{AttributeClassifier, AttributeProfile};
use crate::validators::base::{expect_element, new_element, qualified, trace_built, Component, Warnings};
use crate::validators::builders::Builder;
use crate::validators::helpers::require_value;
use crate::validators::security::{SecurityAttributes, SecurityAttributesBuilder};
use crate::version::{DdmsVersion, NamespaceKind, VersionContext};
use serde::{Deserialize, Serialize};

const PROFILE: AttributeProfile = AttributeProfile {
    parameters: &[],
    markings_since: Some(DdmsVersion::V2_0),
    extensible_since: None,
};

/// Which text element a [`TextComponent`] is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextKind {
    /// `ddms:title`
    #[default]
    Title,
    /// `ddms:subtitle`
    Subtitle,
    /// `ddms:description`
    Description,
}

impl TextKind {
    /// Parse from an element name
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "title" => Some(TextKind::Title),
            "subtitle" => Some(TextKind::Subtitle),
            "description" => Some(TextKind::Description),
            _ => None,
        }
    }

    /// Get the element name
    pub fn as_str(&self) -> &'static str {
        match self {
            TextKind::Title => "title",
            TextKind::Subtitle => "subtitle",
            TextKind::Description => "description",
        }
    }
}

/// A marked-up text element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextComponent {
    version: DdmsVersion,
    kind: TextKind,
    value: String,
    security: SecurityAttributes,
    warnings: Warnings,
}

impl TextComponent {
    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        let kind = TextKind::from_str(element.local_name()).ok_or_else(|| {
            Error::invalid("ddms:title", "element", format!("{} is not a text element.", element.qname))
        })?;
        expect_element(ctx, element, NamespaceKind::Ddms, kind.as_str())?;
        let name = qualified(NamespaceKind::Ddms, kind.as_str());
        let mut attributes = AttributeClassifier::new(ctx, &PROFILE).classify(&name, element);
        let security = SecurityAttributes::new(ctx, &name, std::mem::take(&mut attributes.markings))?;
        Self::build(ctx, kind, element.text_or_empty(), security, attributes.dropped)
    }

    /// Construct from values
    pub fn new(
        ctx: &VersionContext,
        kind: TextKind,
        value: &str,
        security: SecurityAttributes,
    ) -> Result<Self> {
        Self::build(ctx, kind, value, security, Vec::new())
    }

    /// Construct a title
    pub fn title(ctx: &VersionContext, value: &str, security: SecurityAttributes) -> Result<Self> {
        Self::new(ctx, TextKind::Title, value, security)
    }

    fn build(
        ctx: &VersionContext,
        kind: TextKind,
        value: &str,
        security: SecurityAttributes,
        dropped: Vec<ValidationMessage>,
    ) -> Result<Self> {
        let name = qualified(NamespaceKind::Ddms, kind.as_str());
        let value = value.trim();
        if kind == TextKind::Title {
            require_value(&name, "value", value)?;
        }
        security.require_markings(&name)?;
        AttributeClassifier::new(ctx, &PROFILE).check_markings(&name, &security)?;

        let mut warnings = Warnings::new();
        warnings.extend(dropped);
        if value.is_empty() {
            warnings.push(
                format!("A {} element was found with no value.", name),
                format!("/{}", name),
            );
        }

        let component = Self {
            version: ctx.version(),
            kind,
            value: value.to_string(),
            security,
            warnings,
        };
        trace_built(&component);
        Ok(component)
    }

    /// Which text element this is
    pub fn kind(&self) -> TextKind {
        self.kind
    }

    /// The text
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Component for TextComponent {
    fn name(&self) -> &str {
        self.kind.as_str()
    }

    fn version(&self) -> DdmsVersion {
        self.version
    }

    fn warnings(&self) -> &[ValidationMessage] {
        self.warnings.as_slice()
    }

    fn security_attributes(&self) -> Option<&SecurityAttributes> {
        Some(&self.security)
    }

    fn to_element(&self) -> Element {
        let ctx = self.context();
        let mut element = new_element(ctx, NamespaceKind::Ddms, self.name()).with_text(&self.value);
        self.security.apply_to(ctx, &mut element);
        element
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        out.add_value(&self.value);
        self.security.write_output(out);
    }
}

/// Builder for [`TextComponent`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextComponentBuilder {
    /// Which text element to build
    pub kind: TextKind,
    /// The text
    pub value: String,
    /// Security markings
    pub security: SecurityAttributesBuilder,
}

impl TextComponentBuilder {
    /// An empty builder for a kind of text element
    pub fn new(kind: TextKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }
}

impl From<&TextComponent> for TextComponentBuilder {
    fn from(component: &TextComponent) -> Self {
        Self {
            kind: component.kind,
            value: component.value.clone(),
            security: (&component.security).into(),
        }
    }
}

impl Builder for TextComponentBuilder {
    type Target = TextComponent;

    fn is_empty(&self) -> bool {
        self.value.trim().is_empty() && self.security.is_empty()
    }

    fn build(&self, ctx: &VersionContext) -> Result<TextComponent> {
        let name = qualified(NamespaceKind::Ddms, self.kind.as_str());
        let security = self.security.build_for(ctx, &name)?;
        TextComponent::new(ctx, self.kind, &self.value, security)
    }
}
