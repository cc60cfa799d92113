//! Source, type and rights
//!
//! Small attribute-only descriptors of a resource.

use crate::components::identifier::ddms_attribute;
use crate::documents::Element;
use crate::error::{Error, Result, ValidationMessage};
use crate::output::OutputWriter;
use crate::validators::attributes::{AttributeClassifier, AttributeProfile, ParameterName, ParameterSpec};
use crate::validators::base::{expect_element, new_element, qualified, trace_built, Component, Warnings};
use crate::validators::builders::Builder;
use crate::validators::helpers::validate_boolean;
use crate::validators::helpers::validate_uri;
use crate::validators::security::{SecurityAttributes, SecurityAttributesBuilder};
use crate::version::{DdmsVersion, NamespaceKind, VersionContext};
use serde::{Deserialize, Serialize};

const QUALIFIER: ParameterName = ParameterName::Ddms("qualifier");
const VALUE: ParameterName = ParameterName::Ddms("value");
const SCHEMA_QUALIFIER: ParameterName = ParameterName::Ddms("schemaQualifier");
const SCHEMA_HREF: ParameterName = ParameterName::Ddms("schemaHref");

const SOURCE_PROFILE: AttributeProfile = AttributeProfile {
    parameters: &[
        ParameterSpec::always(QUALIFIER),
        ParameterSpec::always(VALUE),
        ParameterSpec::always(SCHEMA_QUALIFIER),
        ParameterSpec::always(SCHEMA_HREF),
    ],
    markings_since: Some(DdmsVersion::V3_0),
    extensible_since: None,
};

const TYPE_PROFILE: AttributeProfile = AttributeProfile {
    parameters: &[ParameterSpec::always(QUALIFIER), ParameterSpec::always(VALUE)],
    markings_since: Some(DdmsVersion::V4_0_1),
    extensible_since: None,
};

/// A `ddms:source`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    version: DdmsVersion,
    qualifier: String,
    value: String,
    schema_qualifier: String,
    schema_href: String,
    security: SecurityAttributes,
    warnings: Warnings,
}

impl Source {
    /// Element name
    pub const NAME: &'static str = "source";

    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        expect_element(ctx, element, NamespaceKind::Ddms, Self::NAME)?;
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let attributes = AttributeClassifier::new(ctx, &SOURCE_PROFILE).classify(&name, element);
        let security = SecurityAttributes::new(ctx, &name, attributes.markings.clone())?;
        let values = [QUALIFIER, VALUE, SCHEMA_QUALIFIER, SCHEMA_HREF].map(|p| attributes.parameter(p));
        Self::build(
            ctx,
            [&values[0], &values[1], &values[2], &values[3]].map(|v| v.as_str()),
            security,
            attributes.dropped,
        )
    }

    /// Construct from values
    pub fn new(
        ctx: &VersionContext,
        qualifier: &str,
        value: &str,
        schema_qualifier: &str,
        schema_href: &str,
        security: SecurityAttributes,
    ) -> Result<Self> {
        Self::build(
            ctx,
            [qualifier, value, schema_qualifier, schema_href],
            security,
            Vec::new(),
        )
    }

    fn build(
        ctx: &VersionContext,
        values: [&str; 4],
        security: SecurityAttributes,
        dropped: Vec<ValidationMessage>,
    ) -> Result<Self> {
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let [qualifier, value, schema_qualifier, schema_href] = values.map(str::trim);
        if !schema_href.is_empty() {
            validate_uri(&name, "schemaHref", schema_href)?;
        }
        AttributeClassifier::new(ctx, &SOURCE_PROFILE).check_markings(&name, &security)?;

        let mut warnings = Warnings::new();
        warnings.extend(dropped);
        if values.iter().all(|v| v.trim().is_empty()) {
            warnings.push(
                format!("A completely empty {} element was found.", name),
                format!("/{}", name),
            );
        }

        let component = Self {
            version: ctx.version(),
            qualifier: qualifier.to_string(),
            value: value.to_string(),
            schema_qualifier: schema_qualifier.to_string(),
            schema_href: schema_href.to_string(),
            security,
            warnings,
        };
        trace_built(&component);
        Ok(component)
    }

    /// The qualifier
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    /// The value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The schema qualifier
    pub fn schema_qualifier(&self) -> &str {
        &self.schema_qualifier
    }

    /// The schema location
    pub fn schema_href(&self) -> &str {
        &self.schema_href
    }
}

impl Component for Source {
    fn name(&self) -> &str {
        Self::NAME
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
        let mut element = new_element(ctx, NamespaceKind::Ddms, Self::NAME)
            .with_attribute(ddms_attribute(ctx, "qualifier"), &self.qualifier)
            .with_attribute(ddms_attribute(ctx, "value"), &self.value)
            .with_attribute(ddms_attribute(ctx, "schemaQualifier"), &self.schema_qualifier)
            .with_attribute(ddms_attribute(ctx, "schemaHref"), &self.schema_href);
        self.security.apply_to(ctx, &mut element);
        element
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        out.add("qualifier", &self.qualifier);
        out.add("value", &self.value);
        out.add("schemaQualifier", &self.schema_qualifier);
        out.add("schemaHref", &self.schema_href);
        self.security.write_output(out);
    }
}

/// Builder for [`Source`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceBuilder {
    /// The qualifier
    pub qualifier: String,
    /// The value
    pub value: String,
    /// The schema qualifier
    pub schema_qualifier: String,
    /// The schema location
    pub schema_href: String,
    /// Security markings
    pub security: SecurityAttributesBuilder,
}

impl From<&Source> for SourceBuilder {
    fn from(component: &Source) -> Self {
        Self {
            qualifier: component.qualifier.clone(),
            value: component.value.clone(),
            schema_qualifier: component.schema_qualifier.clone(),
            schema_href: component.schema_href.clone(),
            security: (&component.security).into(),
        }
    }
}

impl Builder for SourceBuilder {
    type Target = Source;

    fn is_empty(&self) -> bool {
        [&self.qualifier, &self.value, &self.schema_qualifier, &self.schema_href]
            .iter()
            .all(|v| v.trim().is_empty())
            && self.security.is_empty()
    }

    fn build(&self, ctx: &VersionContext) -> Result<Source> {
        let security = self.security.build_for(ctx, "ddms:source")?;
        Source::new(
            ctx,
            &self.qualifier,
            &self.value,
            &self.schema_qualifier,
            &self.schema_href,
            security,
        )
    }
}

/// A `ddms:type`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    version: DdmsVersion,
    qualifier: String,
    value: String,
    description: String,
    security: SecurityAttributes,
    warnings: Warnings,
}

impl Type {
    /// Element name
    pub const NAME: &'static str = "type";

    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        expect_element(ctx, element, NamespaceKind::Ddms, Self::NAME)?;
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let attributes = AttributeClassifier::new(ctx, &TYPE_PROFILE).classify(&name, element);
        let security = SecurityAttributes::new(ctx, &name, attributes.markings.clone())?;
        Self::build(
            ctx,
            &attributes.parameter(QUALIFIER),
            &attributes.parameter(VALUE),
            element.text_or_empty(),
            security,
            attributes.dropped,
        )
    }

    /// Construct from values
    pub fn new(
        ctx: &VersionContext,
        qualifier: &str,
        value: &str,
        description: &str,
        security: SecurityAttributes,
    ) -> Result<Self> {
        Self::build(ctx, qualifier, value, description, security, Vec::new())
    }

    fn build(
        ctx: &VersionContext,
        qualifier: &str,
        value: &str,
        description: &str,
        security: SecurityAttributes,
        dropped: Vec<ValidationMessage>,
    ) -> Result<Self> {
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let (qualifier, value, description) = (qualifier.trim(), value.trim(), description.trim());
        if !value.is_empty() && qualifier.is_empty() {
            return Err(Error::invalid(&name, "qualifier", "is required when a value is set."));
        }
        if !description.is_empty() {
            security.require_markings(&name)?;
        }
        if !description.is_empty() {
            ctx.require(
                ctx.features().keyword_security,
                "the ddms:type description",
                DdmsVersion::V4_0_1,
            )?;
        }
        AttributeClassifier::new(ctx, &TYPE_PROFILE).check_markings(&name, &security)?;

        let mut warnings = Warnings::new();
        warnings.extend(dropped);
        if !qualifier.is_empty() && value.is_empty() {
            warnings.push(
                "A qualifier has been set without an accompanying value attribute.",
                format!("/{}", name),
            );
        }

        let component = Self {
            version: ctx.version(),
            qualifier: qualifier.to_string(),
            value: value.to_string(),
            description: description.to_string(),
            security,
            warnings,
        };
        trace_built(&component);
        Ok(component)
    }

    /// The qualifier
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    /// The value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The description text
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl Component for Type {
    fn name(&self) -> &str {
        Self::NAME
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
        let mut element = new_element(ctx, NamespaceKind::Ddms, Self::NAME)
            .with_attribute(ddms_attribute(ctx, "qualifier"), &self.qualifier)
            .with_attribute(ddms_attribute(ctx, "value"), &self.value)
            .with_text(&self.description);
        self.security.apply_to(ctx, &mut element);
        element
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        out.add("description", &self.description);
        out.add("qualifier", &self.qualifier);
        out.add("value", &self.value);
        self.security.write_output(out);
    }
}

/// Builder for [`Type`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeBuilder {
    /// The qualifier
    pub qualifier: String,
    /// The value
    pub value: String,
    /// The description text
    pub description: String,
    /// Security markings
    pub security: SecurityAttributesBuilder,
}

impl From<&Type> for TypeBuilder {
    fn from(component: &Type) -> Self {
        Self {
            qualifier: component.qualifier.clone(),
            value: component.value.clone(),
            description: component.description.clone(),
            security: (&component.security).into(),
        }
    }
}

impl Builder for TypeBuilder {
    type Target = Type;

    fn is_empty(&self) -> bool {
        [&self.qualifier, &self.value, &self.description]
            .iter()
            .all(|v| v.trim().is_empty())
            && self.security.is_empty()
    }

    fn build(&self, ctx: &VersionContext) -> Result<Type> {
        let security = self.security.build_for(ctx, "ddms:type")?;
        Type::new(ctx, &self.qualifier, &self.value, &self.description, security)
    }
}

const RIGHTS_PROFILE: AttributeProfile = AttributeProfile {
    parameters: &[
        ParameterSpec::always(ParameterName::Ddms("privacyAct")),
        ParameterSpec::always(ParameterName::Ddms("intellectualProperty")),
        ParameterSpec::always(ParameterName::Ddms("copyright")),
    ],
    markings_since: None,
    extensible_since: None,
};

/// A `ddms:rights`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rights {
    version: DdmsVersion,
    privacy_act: bool,
    intellectual_property: bool,
    copyright: bool,
    warnings: Warnings,
}

impl Rights {
    /// Element name
    pub const NAME: &'static str = "rights";

    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        expect_element(ctx, element, NamespaceKind::Ddms, Self::NAME)?;
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let attributes = AttributeClassifier::new(ctx, &RIGHTS_PROFILE).classify(&name, element);
        let flag = |local: &'static str| -> Result<bool> {
            let value = attributes.parameter(ParameterName::Ddms(local));
            if value.is_empty() {
                Ok(false)
            } else {
                validate_boolean(&name, local, &value)
            }
        };
        let mut rights = Self::new(
            ctx,
            flag("privacyAct")?,
            flag("intellectualProperty")?,
            flag("copyright")?,
        )?;
        rights.warnings.extend(attributes.dropped);
        Ok(rights)
    }

    /// Construct from values
    pub fn new(
        ctx: &VersionContext,
        privacy_act: bool,
        intellectual_property: bool,
        copyright: bool,
    ) -> Result<Self> {
        let component = Self {
            version: ctx.version(),
            privacy_act,
            intellectual_property,
            copyright,
            warnings: Warnings::new(),
        };
        trace_built(&component);
        Ok(component)
    }

    /// Whether the Privacy Act applies
    pub fn privacy_act(&self) -> bool {
        self.privacy_act
    }

    /// Whether the resource is intellectual property
    pub fn intellectual_property(&self) -> bool {
        self.intellectual_property
    }

    /// Whether the resource is copyrighted
    pub fn copyright(&self) -> bool {
        self.copyright
    }
}

impl Component for Rights {
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
            .with_attribute(ddms_attribute(ctx, "privacyAct"), self.privacy_act.to_string())
            .with_attribute(
                ddms_attribute(ctx, "intellectualProperty"),
                self.intellectual_property.to_string(),
            )
            .with_attribute(ddms_attribute(ctx, "copyright"), self.copyright.to_string())
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        out.add("privacyAct", self.privacy_act.to_string());
        out.add("intellectualProperty", self.intellectual_property.to_string());
        out.add("copyright", self.copyright.to_string());
    }
}

/// Builder for [`Rights`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RightsBuilder {
    /// Whether the Privacy Act applies
    pub privacy_act: bool,
    /// Whether the resource is intellectual property
    pub intellectual_property: bool,
    /// Whether the resource is copyrighted
    pub copyright: bool,
}

impl From<&Rights> for RightsBuilder {
    fn from(component: &Rights) -> Self {
        Self {
            privacy_act: component.privacy_act,
            intellectual_property: component.intellectual_property,
            copyright: component.copyright,
        }
    }
}

impl Builder for RightsBuilder {
    type Target = Rights;

    fn is_empty(&self) -> bool {
        !self.privacy_act && !self.intellectual_property && !self.copyright
    }

    fn build(&self, ctx: &VersionContext) -> Result<Rights> {
        Rights::new(ctx, self.privacy_act, self.intellectual_property, self.copyright)
    }
}
