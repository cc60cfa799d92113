//! Subject coverage
//!
//! Keywords and categories describe what a resource is about. Production
//! metrics arrived in DDMS 4.0.1 and non-state actors in 4.1. Up to 3.1 the
//! children sit inside a `ddms:Subject` wrapper.

use crate::components::identifier::ddms_attribute;
use crate::documents::Element;
use crate::error::{Error, Result, ValidationMessage};
use crate::output::OutputWriter;
use crate::validators::attributes::{
    AttributeClassifier, AttributeProfile, ExtensibleAttributes, ParameterName, ParameterSpec,
};
use crate::validators::base::{
    check_child_elements, expect_element, new_element, qualified, require_same_version, trace_built,
    write_children, Component, Warnings,
};
use crate::validators::builders::{commit_all, Builder};
use crate::validators::cardinality::{CardinalityRule, ChildOccurrence, RuleSet};
use crate::validators::helpers::{require_value, validate_ordinal, validate_uri};
use crate::validators::security::{SecurityAttributes, SecurityAttributesBuilder};
use crate::version::{DdmsVersion, NamespaceKind, VersionContext};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const VALUE: ParameterName = ParameterName::Ddms("value");
const QUALIFIER: ParameterName = ParameterName::Ddms("qualifier");
const CODE: ParameterName = ParameterName::Ddms("code");
const LABEL: ParameterName = ParameterName::Ddms("label");
const SUBJECT: ParameterName = ParameterName::Ddms("subject");
const COVERAGE: ParameterName = ParameterName::Ddms("coverage");
const ORDER: ParameterName = ParameterName::Ddms("order");

const SUBJECT_WRAPPER: &str = "Subject";

const KEYWORD_PROFILE: AttributeProfile = AttributeProfile {
    parameters: &[ParameterSpec::always(VALUE)],
    markings_since: Some(DdmsVersion::V4_0_1),
    extensible_since: Some(DdmsVersion::V4_0_1),
};

const CATEGORY_PROFILE: AttributeProfile = AttributeProfile {
    parameters: &[
        ParameterSpec::always(QUALIFIER),
        ParameterSpec::always(CODE),
        ParameterSpec::always(LABEL),
    ],
    markings_since: Some(DdmsVersion::V4_0_1),
    extensible_since: Some(DdmsVersion::V4_0_1),
};

const METRIC_PROFILE: AttributeProfile = AttributeProfile {
    parameters: &[ParameterSpec::always(SUBJECT), ParameterSpec::always(COVERAGE)],
    markings_since: Some(DdmsVersion::V4_0_1),
    extensible_since: None,
};

const ACTOR_PROFILE: AttributeProfile = AttributeProfile {
    parameters: &[
        ParameterSpec::always(QUALIFIER),
        ParameterSpec::since(ORDER, DdmsVersion::V4_1),
    ],
    markings_since: Some(DdmsVersion::V4_1),
    extensible_since: None,
};

const COVERAGE_PROFILE: AttributeProfile = AttributeProfile {
    parameters: &[],
    markings_since: Some(DdmsVersion::V3_0),
    extensible_since: None,
};

/// A `ddms:keyword`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    version: DdmsVersion,
    value: String,
    security: SecurityAttributes,
    extensible: ExtensibleAttributes,
    warnings: Warnings,
}

impl Keyword {
    /// Element name
    pub const NAME: &'static str = "keyword";

    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        expect_element(ctx, element, NamespaceKind::Ddms, Self::NAME)?;
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let mut attributes = AttributeClassifier::new(ctx, &KEYWORD_PROFILE).classify(&name, element);
        let security = SecurityAttributes::new(ctx, &name, std::mem::take(&mut attributes.markings))?;
        Self::build(
            ctx,
            &attributes.parameter(VALUE),
            security,
            attributes.extensible,
            attributes.dropped,
        )
    }

    /// Construct from values
    pub fn new(
        ctx: &VersionContext,
        value: &str,
        security: SecurityAttributes,
        extensible: ExtensibleAttributes,
    ) -> Result<Self> {
        Self::build(ctx, value, security, extensible, Vec::new())
    }

    fn build(
        ctx: &VersionContext,
        value: &str,
        security: SecurityAttributes,
        extensible: ExtensibleAttributes,
        dropped: Vec<ValidationMessage>,
    ) -> Result<Self> {
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let value = value.trim();
        require_value(&name, "value", value)?;
        let classifier = AttributeClassifier::new(ctx, &KEYWORD_PROFILE);
        classifier.check_markings(&name, &security)?;
        classifier.check_extensible(&name, &extensible)?;

        let mut warnings = Warnings::new();
        warnings.extend(dropped);
        let component = Self {
            version: ctx.version(),
            value: value.to_string(),
            security,
            extensible,
            warnings,
        };
        trace_built(&component);
        Ok(component)
    }

    /// The keyword
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Component for Keyword {
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

    fn extensible_attributes(&self) -> Option<&ExtensibleAttributes> {
        Some(&self.extensible)
    }

    fn to_element(&self) -> Element {
        let ctx = self.context();
        let mut element = new_element(ctx, NamespaceKind::Ddms, Self::NAME)
            .with_attribute(ddms_attribute(ctx, VALUE.local_name()), &self.value);
        self.security.apply_to(ctx, &mut element);
        self.extensible.apply_to(&mut element);
        element
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        out.add_value(&self.value);
        self.security.write_output(out);
    }
}

/// Builder for [`Keyword`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordBuilder {
    /// The keyword
    pub value: String,
    /// Security markings (4.0.1+)
    pub security: SecurityAttributesBuilder,
    /// Extensible attributes (4.0.1+)
    pub extensible: ExtensibleAttributes,
}

impl KeywordBuilder {
    /// A builder holding just a value
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }
}

impl From<&Keyword> for KeywordBuilder {
    fn from(component: &Keyword) -> Self {
        Self {
            value: component.value.clone(),
            security: (&component.security).into(),
            extensible: component.extensible.clone(),
        }
    }
}

impl Builder for KeywordBuilder {
    type Target = Keyword;

    fn is_empty(&self) -> bool {
        self.value.trim().is_empty() && self.security.is_empty() && self.extensible.is_empty()
    }

    fn build(&self, ctx: &VersionContext) -> Result<Keyword> {
        let security = self.security.build_for(ctx, "ddms:keyword")?;
        Keyword::new(ctx, &self.value, security, self.extensible.clone())
    }
}

/// A `ddms:category`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    version: DdmsVersion,
    qualifier: String,
    code: String,
    label: String,
    security: SecurityAttributes,
    extensible: ExtensibleAttributes,
    warnings: Warnings,
}

impl Category {
    /// Element name
    pub const NAME: &'static str = "category";

    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        expect_element(ctx, element, NamespaceKind::Ddms, Self::NAME)?;
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let mut attributes = AttributeClassifier::new(ctx, &CATEGORY_PROFILE).classify(&name, element);
        let security = SecurityAttributes::new(ctx, &name, std::mem::take(&mut attributes.markings))?;
        Self::build(
            ctx,
            [
                &attributes.parameter(QUALIFIER),
                &attributes.parameter(CODE),
                &attributes.parameter(LABEL),
            ],
            security,
            attributes.extensible,
            attributes.dropped,
        )
    }

    /// Construct from values
    pub fn new(
        ctx: &VersionContext,
        qualifier: &str,
        code: &str,
        label: &str,
        security: SecurityAttributes,
        extensible: ExtensibleAttributes,
    ) -> Result<Self> {
        Self::build(ctx, [qualifier, code, label], security, extensible, Vec::new())
    }

    fn build(
        ctx: &VersionContext,
        [qualifier, code, label]: [&str; 3],
        security: SecurityAttributes,
        extensible: ExtensibleAttributes,
        dropped: Vec<ValidationMessage>,
    ) -> Result<Self> {
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let (qualifier, code, label) = (qualifier.trim(), code.trim(), label.trim());
        require_value(&name, "label", label)?;
        if !qualifier.is_empty() {
            validate_uri(&name, "qualifier", qualifier)?;
        }
        let classifier = AttributeClassifier::new(ctx, &CATEGORY_PROFILE);
        classifier.check_markings(&name, &security)?;
        classifier.check_extensible(&name, &extensible)?;

        let mut warnings = Warnings::new();
        warnings.extend(dropped);
        let component = Self {
            version: ctx.version(),
            qualifier: qualifier.to_string(),
            code: code.to_string(),
            label: label.to_string(),
            security,
            extensible,
            warnings,
        };
        trace_built(&component);
        Ok(component)
    }

    /// The qualifier URI
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    /// The code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The label
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Component for Category {
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

    fn extensible_attributes(&self) -> Option<&ExtensibleAttributes> {
        Some(&self.extensible)
    }

    fn to_element(&self) -> Element {
        let ctx = self.context();
        let mut element = new_element(ctx, NamespaceKind::Ddms, Self::NAME)
            .with_attribute(ddms_attribute(ctx, QUALIFIER.local_name()), &self.qualifier)
            .with_attribute(ddms_attribute(ctx, CODE.local_name()), &self.code)
            .with_attribute(ddms_attribute(ctx, LABEL.local_name()), &self.label);
        self.security.apply_to(ctx, &mut element);
        self.extensible.apply_to(&mut element);
        element
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        out.add("qualifier", &self.qualifier);
        out.add("code", &self.code);
        out.add("label", &self.label);
        self.security.write_output(out);
    }
}

/// Builder for [`Category`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryBuilder {
    /// The qualifier URI
    pub qualifier: String,
    /// The code
    pub code: String,
    /// The label
    pub label: String,
    /// Security markings (4.0.1+)
    pub security: SecurityAttributesBuilder,
    /// Extensible attributes (4.0.1+)
    pub extensible: ExtensibleAttributes,
}

impl From<&Category> for CategoryBuilder {
    fn from(component: &Category) -> Self {
        Self {
            qualifier: component.qualifier.clone(),
            code: component.code.clone(),
            label: component.label.clone(),
            security: (&component.security).into(),
            extensible: component.extensible.clone(),
        }
    }
}

impl Builder for CategoryBuilder {
    type Target = Category;

    fn is_empty(&self) -> bool {
        [&self.qualifier, &self.code, &self.label].iter().all(|v| v.trim().is_empty())
            && self.security.is_empty()
            && self.extensible.is_empty()
    }

    fn build(&self, ctx: &VersionContext) -> Result<Category> {
        let security = self.security.build_for(ctx, "ddms:category")?;
        Category::new(
            ctx,
            &self.qualifier,
            &self.code,
            &self.label,
            security,
            self.extensible.clone(),
        )
    }
}

/// A `ddms:productionMetric` (4.0.1+)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductionMetric {
    version: DdmsVersion,
    subject: String,
    coverage: String,
    security: SecurityAttributes,
    warnings: Warnings,
}

impl ProductionMetric {
    /// Element name
    pub const NAME: &'static str = "productionMetric";

    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        expect_element(ctx, element, NamespaceKind::Ddms, Self::NAME)?;
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let mut attributes = AttributeClassifier::new(ctx, &METRIC_PROFILE).classify(&name, element);
        let security = SecurityAttributes::new(ctx, &name, std::mem::take(&mut attributes.markings))?;
        Self::build(
            ctx,
            &attributes.parameter(SUBJECT),
            &attributes.parameter(COVERAGE),
            security,
            attributes.dropped,
        )
    }

    /// Construct from values
    pub fn new(ctx: &VersionContext, subject: &str, coverage: &str, security: SecurityAttributes) -> Result<Self> {
        Self::build(ctx, subject, coverage, security, Vec::new())
    }

    fn build(
        ctx: &VersionContext,
        subject: &str,
        coverage: &str,
        security: SecurityAttributes,
        dropped: Vec<ValidationMessage>,
    ) -> Result<Self> {
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let (subject, coverage) = (subject.trim(), coverage.trim());
        require_value(&name, "subject", subject)?;
        require_value(&name, "coverage", coverage)?;
        security.require_markings(&name)?;
        ctx.require(ctx.features().production_metrics, &name, DdmsVersion::V4_0_1)?;
        AttributeClassifier::new(ctx, &METRIC_PROFILE).check_markings(&name, &security)?;

        let mut warnings = Warnings::new();
        warnings.extend(dropped);
        let component = Self {
            version: ctx.version(),
            subject: subject.to_string(),
            coverage: coverage.to_string(),
            security,
            warnings,
        };
        trace_built(&component);
        Ok(component)
    }

    /// The measured subject
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The measured coverage
    pub fn coverage(&self) -> &str {
        &self.coverage
    }
}

impl Component for ProductionMetric {
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
            .with_attribute(ddms_attribute(ctx, SUBJECT.local_name()), &self.subject)
            .with_attribute(ddms_attribute(ctx, COVERAGE.local_name()), &self.coverage);
        self.security.apply_to(ctx, &mut element);
        element
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        out.add("subject", &self.subject);
        out.add("coverage", &self.coverage);
        self.security.write_output(out);
    }
}

/// Builder for [`ProductionMetric`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionMetricBuilder {
    /// The measured subject
    pub subject: String,
    /// The measured coverage
    pub coverage: String,
    /// Security markings
    pub security: SecurityAttributesBuilder,
}

impl From<&ProductionMetric> for ProductionMetricBuilder {
    fn from(component: &ProductionMetric) -> Self {
        Self {
            subject: component.subject.clone(),
            coverage: component.coverage.clone(),
            security: (&component.security).into(),
        }
    }
}

impl Builder for ProductionMetricBuilder {
    type Target = ProductionMetric;

    fn is_empty(&self) -> bool {
        self.subject.trim().is_empty() && self.coverage.trim().is_empty() && self.security.is_empty()
    }

    fn build(&self, ctx: &VersionContext) -> Result<ProductionMetric> {
        let security = self.security.build_for(ctx, "ddms:productionMetric")?;
        ProductionMetric::new(ctx, &self.subject, &self.coverage, security)
    }
}

/// A `ddms:nonStateActor` (4.1+)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonStateActor {
    version: DdmsVersion,
    value: String,
    qualifier: String,
    order: Option<u32>,
    security: SecurityAttributes,
    warnings: Warnings,
}

impl NonStateActor {
    /// Element name
    pub const NAME: &'static str = "nonStateActor";

    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        expect_element(ctx, element, NamespaceKind::Ddms, Self::NAME)?;
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let mut attributes = AttributeClassifier::new(ctx, &ACTOR_PROFILE).classify(&name, element);
        let security = SecurityAttributes::new(ctx, &name, std::mem::take(&mut attributes.markings))?;
        let order = attributes.parameter(ORDER);
        let order = match order.trim() {
            "" => None,
            order => Some(validate_ordinal(&name, &ORDER.to_string(), order)?),
        };
        Self::build(
            ctx,
            element.text_or_empty(),
            &attributes.parameter(QUALIFIER),
            order,
            security,
            attributes.dropped,
        )
    }

    /// Construct from values
    pub fn new(
        ctx: &VersionContext,
        value: &str,
        qualifier: &str,
        order: Option<u32>,
        security: SecurityAttributes,
    ) -> Result<Self> {
        Self::build(ctx, value, qualifier, order, security, Vec::new())
    }

    fn build(
        ctx: &VersionContext,
        value: &str,
        qualifier: &str,
        order: Option<u32>,
        security: SecurityAttributes,
        dropped: Vec<ValidationMessage>,
    ) -> Result<Self> {
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let (value, qualifier) = (value.trim(), qualifier.trim());
        security.require_markings(&name)?;
        if !qualifier.is_empty() {
            validate_uri(&name, "qualifier", qualifier)?;
        }
        if order == Some(0) {
            return Err(Error::invalid(&name, ORDER.to_string(), "must be a positive integer."));
        }
        ctx.require(ctx.features().order, &name, DdmsVersion::V4_1)?;
        AttributeClassifier::new(ctx, &ACTOR_PROFILE).check_markings(&name, &security)?;

        let mut warnings = Warnings::new();
        warnings.extend(dropped);
        if value.is_empty() {
            warnings.push(format!("A {} element was found with no value.", name), format!("/{}", name));
        }
        let component = Self {
            version: ctx.version(),
            value: value.to_string(),
            qualifier: qualifier.to_string(),
            order,
            security,
            warnings,
        };
        trace_built(&component);
        Ok(component)
    }

    /// The actor
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The qualifier URI
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    /// The ordinal, if assigned
    pub fn order(&self) -> Option<u32> {
        self.order
    }
}

impl Component for NonStateActor {
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
        let order = self.order.map(|o| o.to_string()).unwrap_or_default();
        let mut element = new_element(ctx, NamespaceKind::Ddms, Self::NAME)
            .with_attribute(ddms_attribute(ctx, ORDER.local_name()), order)
            .with_attribute(ddms_attribute(ctx, QUALIFIER.local_name()), &self.qualifier)
            .with_text(&self.value);
        self.security.apply_to(ctx, &mut element);
        element
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        out.add_value(&self.value);
        out.add("order", self.order.map(|o| o.to_string()).unwrap_or_default());
        out.add("qualifier", &self.qualifier);
        self.security.write_output(out);
    }
}

/// Builder for [`NonStateActor`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NonStateActorBuilder {
    /// The actor
    pub value: String,
    /// The qualifier URI
    pub qualifier: String,
    /// The ordinal
    pub order: Option<u32>,
    /// Security markings
    pub security: SecurityAttributesBuilder,
}

impl From<&NonStateActor> for NonStateActorBuilder {
    fn from(component: &NonStateActor) -> Self {
        Self {
            value: component.value.clone(),
            qualifier: component.qualifier.clone(),
            order: component.order,
            security: (&component.security).into(),
        }
    }
}

impl Builder for NonStateActorBuilder {
    type Target = NonStateActor;

    fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
            && self.qualifier.trim().is_empty()
            && self.order.is_none()
            && self.security.is_empty()
    }

    fn build(&self, ctx: &VersionContext) -> Result<NonStateActor> {
        let security = self.security.build_for(ctx, "ddms:nonStateActor")?;
        NonStateActor::new(ctx, &self.value, &self.qualifier, self.order, security)
    }
}

fn coverage_rules(ctx: &VersionContext) -> RuleSet {
    let features = ctx.features();
    RuleSet::new(qualified(NamespaceKind::Ddms, SubjectCoverage::NAME))
        .rule(CardinalityRule::any(Keyword::NAME))
        .rule(CardinalityRule::any(Category::NAME))
        .rule_if(features.production_metrics, CardinalityRule::any(ProductionMetric::NAME))
        .rule_if(features.order, CardinalityRule::any(NonStateActor::NAME).ordered())
        .order_sensitive(features.order)
}

fn parse_all<T>(
    ctx: &VersionContext,
    element: &Element,
    local_name: &str,
    parse: impl Fn(&VersionContext, &Element) -> Result<T>,
) -> Result<Vec<T>> {
    element
        .find_children(ctx.ddms_namespace(), local_name)
        .into_iter()
        .map(|child| parse(ctx, child))
        .collect()
}

/// A `ddms:subjectCoverage`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectCoverage {
    version: DdmsVersion,
    keywords: Vec<Keyword>,
    categories: Vec<Category>,
    production_metrics: Vec<ProductionMetric>,
    non_state_actors: Vec<NonStateActor>,
    security: SecurityAttributes,
    warnings: Warnings,
}

impl SubjectCoverage {
    /// Element name
    pub const NAME: &'static str = "subjectCoverage";

    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        expect_element(ctx, element, NamespaceKind::Ddms, Self::NAME)?;
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let mut attributes = AttributeClassifier::new(ctx, &COVERAGE_PROFILE).classify(&name, element);
        let security = SecurityAttributes::new(ctx, &name, std::mem::take(&mut attributes.markings))?;

        let details = if ctx.features().flat_subject {
            element
        } else {
            let wrappers = element.find_children(ctx.ddms_namespace(), SUBJECT_WRAPPER);
            if wrappers.len() != 1 {
                return Err(Error::CardinalityViolation {
                    parent: name,
                    child: SUBJECT_WRAPPER.to_string(),
                    actual: wrappers.len(),
                    min: 1,
                    max: Some(1),
                });
            }
            wrappers[0]
        };
        check_child_elements(ctx, details, &[NamespaceKind::Ddms], &coverage_rules(ctx))?;

        Self::build(
            ctx,
            parse_all(ctx, details, Keyword::NAME, Keyword::from_element)?,
            parse_all(ctx, details, Category::NAME, Category::from_element)?,
            parse_all(ctx, details, ProductionMetric::NAME, ProductionMetric::from_element)?,
            parse_all(ctx, details, NonStateActor::NAME, NonStateActor::from_element)?,
            security,
            attributes.dropped,
        )
    }

    /// Construct from values
    pub fn new(
        ctx: &VersionContext,
        keywords: Vec<Keyword>,
        categories: Vec<Category>,
        production_metrics: Vec<ProductionMetric>,
        non_state_actors: Vec<NonStateActor>,
        security: SecurityAttributes,
    ) -> Result<Self> {
        Self::build(
            ctx,
            keywords,
            categories,
            production_metrics,
            non_state_actors,
            security,
            Vec::new(),
        )
    }

    fn build(
        ctx: &VersionContext,
        keywords: Vec<Keyword>,
        categories: Vec<Category>,
        production_metrics: Vec<ProductionMetric>,
        non_state_actors: Vec<NonStateActor>,
        security: SecurityAttributes,
        dropped: Vec<ValidationMessage>,
    ) -> Result<Self> {
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        if keywords.is_empty() && categories.is_empty() {
            return Err(Error::invalid(
                &name,
                "keyword",
                "requires at least one keyword or category.",
            ));
        }

        let children: Vec<&dyn Component> = keywords
            .iter()
            .map(|c| c as &dyn Component)
            .chain(categories.iter().map(|c| c as &dyn Component))
            .chain(production_metrics.iter().map(|c| c as &dyn Component))
            .chain(non_state_actors.iter().map(|c| c as &dyn Component))
            .collect();
        for child in &children {
            require_same_version(ctx, &name, *child)?;
        }
        let occurrences: Vec<ChildOccurrence> = children
            .iter()
            .map(|child| ChildOccurrence::new(child.name()))
            .filter(|occurrence| occurrence.name != NonStateActor::NAME)
            .chain(
                non_state_actors
                    .iter()
                    .map(|actor| ChildOccurrence::with_ordinal(NonStateActor::NAME, actor.order)),
            )
            .collect();
        coverage_rules(ctx).validate(&occurrences)?;
        AttributeClassifier::new(ctx, &COVERAGE_PROFILE).check_markings(&name, &security)?;

        let mut warnings = Warnings::new();
        warnings.extend(dropped);
        let mut seen = HashSet::new();
        if keywords.iter().any(|k| !seen.insert(k.value())) {
            warnings.push("1 or more keywords have the same value.", format!("/{}", name));
        }
        let parent = if ctx.features().flat_subject {
            format!("/{}", name)
        } else {
            format!("/{}/ddms:{}", name, SUBJECT_WRAPPER)
        };
        for child in &children {
            warnings.absorb(&parent, *child);
        }

        let component = Self {
            version: ctx.version(),
            keywords,
            categories,
            production_metrics,
            non_state_actors,
            security,
            warnings,
        };
        trace_built(&component);
        Ok(component)
    }

    /// Keywords
    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    /// Categories
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Production metrics
    pub fn production_metrics(&self) -> &[ProductionMetric] {
        &self.production_metrics
    }

    /// Non-state actors
    pub fn non_state_actors(&self) -> &[NonStateActor] {
        &self.non_state_actors
    }
}

impl Component for SubjectCoverage {
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

    fn children(&self) -> Vec<&dyn Component> {
        self.keywords
            .iter()
            .map(|c| c as &dyn Component)
            .chain(self.categories.iter().map(|c| c as &dyn Component))
            .chain(self.production_metrics.iter().map(|c| c as &dyn Component))
            .chain(self.non_state_actors.iter().map(|c| c as &dyn Component))
            .collect()
    }

    fn to_element(&self) -> Element {
        let ctx = self.context();
        let mut details = new_element(ctx, NamespaceKind::Ddms, SUBJECT_WRAPPER);
        for child in self.children() {
            details.add_child(child.to_element());
        }

        let mut element = new_element(ctx, NamespaceKind::Ddms, Self::NAME);
        if ctx.features().flat_subject {
            element.children = details.children;
        } else {
            element.add_child(details);
        }
        self.security.apply_to(ctx, &mut element);
        element
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        let prefix = if self.context().features().flat_subject {
            String::new()
        } else {
            format!("{}.", SUBJECT_WRAPPER)
        };
        write_children(out, &format!("{}{}", prefix, Keyword::NAME), &self.keywords);
        write_children(out, &format!("{}{}", prefix, Category::NAME), &self.categories);
        write_children(out, &format!("{}{}", prefix, ProductionMetric::NAME), &self.production_metrics);
        write_children(out, &format!("{}{}", prefix, NonStateActor::NAME), &self.non_state_actors);
        self.security.write_output(out);
    }
}

/// Builder for [`SubjectCoverage`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectCoverageBuilder {
    /// Keywords
    pub keywords: Vec<KeywordBuilder>,
    /// Categories
    pub categories: Vec<CategoryBuilder>,
    /// Production metrics (4.0.1+)
    pub production_metrics: Vec<ProductionMetricBuilder>,
    /// Non-state actors (4.1+)
    pub non_state_actors: Vec<NonStateActorBuilder>,
    /// Security markings (3.0+)
    pub security: SecurityAttributesBuilder,
}

impl From<&SubjectCoverage> for SubjectCoverageBuilder {
    fn from(component: &SubjectCoverage) -> Self {
        Self {
            keywords: component.keywords.iter().map(Into::into).collect(),
            categories: component.categories.iter().map(Into::into).collect(),
            production_metrics: component.production_metrics.iter().map(Into::into).collect(),
            non_state_actors: component.non_state_actors.iter().map(Into::into).collect(),
            security: (&component.security).into(),
        }
    }
}

impl Builder for SubjectCoverageBuilder {
    type Target = SubjectCoverage;

    fn is_empty(&self) -> bool {
        self.keywords.iter().all(Builder::is_empty)
            && self.categories.iter().all(Builder::is_empty)
            && self.production_metrics.iter().all(Builder::is_empty)
            && self.non_state_actors.iter().all(Builder::is_empty)
            && self.security.is_empty()
    }

    fn build(&self, ctx: &VersionContext) -> Result<SubjectCoverage> {
        let security = self.security.build_for(ctx, "ddms:subjectCoverage")?;
        SubjectCoverage::new(
            ctx,
            commit_all(&self.keywords, ctx)?,
            commit_all(&self.categories, ctx)?,
            commit_all(&self.production_metrics, ctx)?,
            commit_all(&self.non_state_actors, ctx)?,
            security,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Document;
    use crate::validators::security::SecurityAttribute;
    use pretty_assertions::assert_eq;

    fn markings(ctx: &VersionContext) -> SecurityAttributes {
        SecurityAttributesBuilder::new()
            .with(SecurityAttribute::Classification, "U")
            .with(SecurityAttribute::OwnerProducer, "USA")
            .build_for(ctx, "test")
            .unwrap()
    }

    fn keyword(ctx: &VersionContext, value: &str) -> Keyword {
        Keyword::new(ctx, value, SecurityAttributes::empty(), ExtensibleAttributes::new()).unwrap()
    }

    fn actor(ctx: &VersionContext, value: &str, order: Option<u32>) -> NonStateActor {
        NonStateActor::new(ctx, value, "", order, markings(ctx)).unwrap()
    }

    fn coverage(ctx: &VersionContext, actors: Vec<NonStateActor>) -> Result<SubjectCoverage> {
        SubjectCoverage::new(
            ctx,
            vec![keyword(ctx, "DDMS"), keyword(ctx, "metadata")],
            Vec::new(),
            Vec::new(),
            actors,
            SecurityAttributes::empty(),
        )
    }

    #[test]
    fn test_wrapper_by_version() {
        let v31 = VersionContext::get(DdmsVersion::V3_1);
        let element = coverage(v31, Vec::new()).unwrap().to_element();
        assert_eq!(element.children.len(), 1);
        assert_eq!(element.children[0].local_name(), "Subject");

        let v50 = VersionContext::get(DdmsVersion::V5_0);
        let element = coverage(v50, Vec::new()).unwrap().to_element();
        assert_eq!(element.children.len(), 2);
        assert_eq!(element.children[0].local_name(), "keyword");
    }

    #[test]
    fn test_round_trip() {
        for version in [DdmsVersion::V2_0, DdmsVersion::V4_1] {
            let ctx = VersionContext::get(version);
            let actors = if ctx.features().order {
                vec![actor(ctx, "Laotian Monks", Some(1)), actor(ctx, "Gang", Some(2))]
            } else {
                Vec::new()
            };
            let original = coverage(ctx, actors).unwrap();
            let parsed = Document::from_string(&original.to_xml()).unwrap().into_root();
            assert_eq!(SubjectCoverage::from_element(ctx, &parsed).unwrap(), original);
        }
    }

    #[test]
    fn test_requires_keyword_or_category() {
        let ctx = VersionContext::latest();
        let err = SubjectCoverage::new(ctx, Vec::new(), Vec::new(), Vec::new(), Vec::new(), SecurityAttributes::empty())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidComponent { ref field, .. } if field == "keyword"));

        let category = Category::new(
            ctx,
            "http://metadata.dod.mil/mdr/artifiact/MET/severeWeatherCode_enum/xml",
            "T",
            "TORNADO",
            SecurityAttributes::empty(),
            ExtensibleAttributes::new(),
        )
        .unwrap();
        assert!(SubjectCoverage::new(ctx, Vec::new(), vec![category], Vec::new(), Vec::new(), SecurityAttributes::empty())
            .is_ok());
    }

    #[test]
    fn test_duplicate_keywords_warn() {
        let ctx = VersionContext::latest();
        let coverage = SubjectCoverage::new(
            ctx,
            vec![keyword(ctx, "DDMS"), keyword(ctx, "DDMS")],
            Vec::new(),
            Vec::new(),
            Vec::new(),
            SecurityAttributes::empty(),
        )
        .unwrap();
        assert_eq!(coverage.warnings().len(), 1);
        assert_eq!(coverage.warnings()[0].locator, "/ddms:subjectCoverage");
    }

    #[test]
    fn test_actor_ordinals() {
        let ctx = VersionContext::get(DdmsVersion::V4_1);
        assert!(coverage(ctx, vec![actor(ctx, "a", Some(1)), actor(ctx, "c", Some(3))]).is_ok());

        let err = coverage(ctx, vec![actor(ctx, "a", Some(1)), actor(ctx, "b", None)]).unwrap_err();
        assert!(matches!(err, Error::OrderConstraintViolation { ordinal: None, .. }));

        let err = coverage(ctx, vec![actor(ctx, "a", Some(2)), actor(ctx, "b", Some(2))]).unwrap_err();
        assert!(matches!(err, Error::OrderConstraintViolation { ordinal: Some(2), .. }));

        let err = coverage(ctx, vec![actor(ctx, "a", Some(3)), actor(ctx, "b", Some(1))]).unwrap_err();
        assert!(matches!(err, Error::OrderConstraintViolation { ordinal: Some(1), .. }));
    }

    #[test]
    fn test_version_gates() {
        let v40 = VersionContext::get(DdmsVersion::V4_0_1);
        assert!(matches!(
            NonStateActor::new(v40, "a", "", None, markings(v40)),
            Err(Error::VersionNotSupported { .. })
        ));
        let v31 = VersionContext::get(DdmsVersion::V3_1);
        assert!(matches!(
            ProductionMetric::new(v31, "FOOD", "AFG", markings(v31)),
            Err(Error::VersionNotSupported { .. })
        ));
        assert!(Keyword::new(v31, "DDMS", markings(v31), ExtensibleAttributes::new()).is_err());
        assert!(Keyword::new(v40, "DDMS", markings(v40), ExtensibleAttributes::new()).is_ok());
    }

    #[test]
    fn test_unexpected_child() {
        let ctx = VersionContext::get(DdmsVersion::V4_0_1);
        let mut element = coverage(ctx, Vec::new()).unwrap().to_element();
        element.add_child(new_element(ctx, NamespaceKind::Ddms, NonStateActor::NAME).with_text("a"));
        assert!(matches!(
            SubjectCoverage::from_element(ctx, &element),
            Err(Error::UnexpectedChildType { ref child, .. }) if child == "ddms:nonStateActor"
        ));
    }

    #[test]
    fn test_output() {
        let ctx = VersionContext::latest();
        assert_eq!(
            coverage(ctx, Vec::new()).unwrap().to_text(),
            "subjectCoverage.keyword: DDMS\nsubjectCoverage.keyword: metadata\n"
        );
        let v31 = VersionContext::get(DdmsVersion::V3_1);
        assert!(coverage(v31, Vec::new())
            .unwrap()
            .to_text()
            .starts_with("subjectCoverage.Subject.keyword: DDMS\n"));
    }

    #[test]
    fn test_builder() {
        let ctx = VersionContext::latest();
        let builder = SubjectCoverageBuilder {
            keywords: vec![KeywordBuilder::new("DDMS"), KeywordBuilder::default()],
            ..SubjectCoverageBuilder::default()
        };
        let committed = builder.commit(ctx).unwrap().unwrap();
        assert_eq!(committed.keywords().len(), 1);
        assert!(SubjectCoverageBuilder::default().commit(ctx).unwrap().is_none());
    }
}
