//! The resource root element
//!
//! A [`Resource`] owns every top-level component. Its child cardinality is
//! version dependent, and from DDMS 3.0 the root carries ISM attributes of
//! its own. Children are kept in schema order whatever order they were
//! supplied in, so markup and typed construction of the same content compare
//! equal.

use crate::components::coverage::{
    TemporalCoverage, TemporalCoverageBuilder, VirtualCoverage, VirtualCoverageBuilder,
};
use crate::components::dates::{DateValues, Dates};
use crate::components::descriptors::{Rights, RightsBuilder, Source, SourceBuilder, Type, TypeBuilder};
use crate::components::extensible::{ExtensibleElement, ExtensibleElementBuilder};
use crate::components::format::{Format, FormatBuilder};
use crate::components::identifier::{Identifier, IdentifierBuilder, Language, LanguageBuilder};
use crate::components::producers::{ProducerRole, ProducerRoleBuilder, ProducerRoleKind};
use crate::components::security::{Security, SecurityBuilder};
use crate::components::subject::{SubjectCoverage, SubjectCoverageBuilder};
use crate::components::text::{TextComponent, TextComponentBuilder, TextKind};
use crate::config::Config;
use crate::documents::{Document, Element};
use crate::error::{Error, Result, ValidationMessage};
use crate::output::OutputWriter;
use crate::validators::attributes::{
    AttributeClassifier, AttributeProfile, ExtensibleAttributes, IsmParameter, ParameterName, ParameterSpec,
};
use crate::validators::base::{
    display_name, expect_element, new_element, qualified, require_same_version, trace_built, Component,
    Warnings,
};
use crate::validators::builders::{all_empty, commit_all, Builder};
use crate::validators::cardinality::{CardinalityRule, ChildOccurrence, RuleSet};
use crate::validators::helpers::{require_value, validate_boolean, validate_integer, validate_xs_date};
use crate::validators::security::{SecurityAttributes, SecurityAttributesBuilder};
use crate::version::{DdmsVersion, NamespaceKind, VersionContext};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

const RESOURCE_ELEMENT: ParameterName = ParameterName::Ism(IsmParameter::ResourceElement);
const CREATE_DATE: ParameterName = ParameterName::Ism(IsmParameter::CreateDate);
const DES_VERSION: ParameterName = ParameterName::Ism(IsmParameter::DesVersion);
const NTK_DES_VERSION: ParameterName = ParameterName::Ntk("DESVersion");

const PROFILE: AttributeProfile = AttributeProfile {
    parameters: &[
        ParameterSpec::since(RESOURCE_ELEMENT, DdmsVersion::V3_0),
        ParameterSpec::since(CREATE_DATE, DdmsVersion::V3_0),
        ParameterSpec::since(DES_VERSION, DdmsVersion::V3_0),
        ParameterSpec::since(NTK_DES_VERSION, DdmsVersion::V4_1),
    ],
    markings_since: Some(DdmsVersion::V3_0),
    extensible_since: Some(DdmsVersion::V2_0),
};

/// Occurrence name shared by all extensible elements
pub const EXTENSIBLE_ELEMENT: &str = "extensibleElement";

/// Local name of the root element in a version
pub fn root_name(ctx: &VersionContext) -> &'static str {
    if ctx.features().lowercase_resource {
        "resource"
    } else {
        "Resource"
    }
}

/// Child rules of the root, in schema order
pub fn resource_rules(ctx: &VersionContext) -> RuleSet {
    let subject_coverage = if ctx.features().flat_subject {
        CardinalityRule::at_least_one(SubjectCoverage::NAME)
    } else {
        CardinalityRule::exactly_one(SubjectCoverage::NAME)
    };
    let extensible_max = if ctx.version() == DdmsVersion::V2_0 { Some(1) } else { None };
    let rules = RuleSet::new(qualified(NamespaceKind::Ddms, root_name(ctx)))
        .rule(CardinalityRule::at_least_one(Identifier::NAME))
        .rule(CardinalityRule::at_least_one(TextKind::Title.as_str()))
        .rule(CardinalityRule::any(TextKind::Subtitle.as_str()))
        .rule(CardinalityRule::optional(TextKind::Description.as_str()))
        .rule(CardinalityRule::any(Language::NAME))
        .rule(CardinalityRule::optional(Dates::NAME))
        .rule(CardinalityRule::optional(Rights::NAME))
        .rule(CardinalityRule::any(Source::NAME))
        .rule(CardinalityRule::any(Type::NAME));
    ProducerRoleKind::ALL
        .iter()
        .fold(rules, |rules, role| rules.rule(CardinalityRule::any(role.as_str())))
        .rule(CardinalityRule::optional(Format::NAME))
        .rule(subject_coverage)
        .rule(CardinalityRule::any(VirtualCoverage::NAME))
        .rule(CardinalityRule::any(TemporalCoverage::NAME))
        .rule(CardinalityRule::exactly_one(Security::NAME))
        .rule(CardinalityRule::new(EXTENSIBLE_ELEMENT, 0, extensible_max))
}

/// One top-level component of a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceComponent {
    /// `ddms:identifier`
    Identifier(Identifier),
    /// `ddms:title`, `ddms:subtitle` or `ddms:description`
    Text(TextComponent),
    /// `ddms:language`
    Language(Language),
    /// `ddms:dates`
    Dates(Dates),
    /// `ddms:rights`
    Rights(Rights),
    /// `ddms:source`
    Source(Source),
    /// `ddms:type`
    Type(Type),
    /// A producer role
    Producer(ProducerRole),
    /// `ddms:format`
    Format(Format),
    /// `ddms:subjectCoverage`
    SubjectCoverage(SubjectCoverage),
    /// `ddms:virtualCoverage`
    VirtualCoverage(VirtualCoverage),
    /// `ddms:temporalCoverage`
    TemporalCoverage(TemporalCoverage),
    /// `ddms:security`
    Security(Security),
    /// An element from another vocabulary
    Extensible(ExtensibleElement),
}

impl ResourceComponent {
    /// Read a child of the root element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        if !element.qname.is_in(ctx.ddms_namespace()) {
            let reserved = [NamespaceKind::Ism, NamespaceKind::Ntk]
                .iter()
                .any(|kind| ctx.namespace(*kind).map_or(false, |uri| element.qname.is_in(uri)));
            if reserved {
                return Err(unexpected_child(ctx, element));
            }
            return ExtensibleElement::from_element(ctx, element).map(ResourceComponent::Extensible);
        }
        let component = match element.local_name() {
            Identifier::NAME => ResourceComponent::Identifier(Identifier::from_element(ctx, element)?),
            "title" | "subtitle" | "description" => ResourceComponent::Text(TextComponent::from_element(ctx, element)?),
            Language::NAME => ResourceComponent::Language(Language::from_element(ctx, element)?),
            Dates::NAME => ResourceComponent::Dates(Dates::from_element(ctx, element)?),
            Rights::NAME => ResourceComponent::Rights(Rights::from_element(ctx, element)?),
            Source::NAME => ResourceComponent::Source(Source::from_element(ctx, element)?),
            Type::NAME => ResourceComponent::Type(Type::from_element(ctx, element)?),
            "creator" | "publisher" | "contributor" | "pointOfContact" => {
                ResourceComponent::Producer(ProducerRole::from_element(ctx, element)?)
            }
            Format::NAME => ResourceComponent::Format(Format::from_element(ctx, element)?),
            SubjectCoverage::NAME => ResourceComponent::SubjectCoverage(SubjectCoverage::from_element(ctx, element)?),
            VirtualCoverage::NAME => ResourceComponent::VirtualCoverage(VirtualCoverage::from_element(ctx, element)?),
            TemporalCoverage::NAME => {
                ResourceComponent::TemporalCoverage(TemporalCoverage::from_element(ctx, element)?)
            }
            Security::NAME => ResourceComponent::Security(Security::from_element(ctx, element)?),
            _ => return Err(unexpected_child(ctx, element)),
        };
        Ok(component)
    }

    /// The wrapped component
    pub fn as_component(&self) -> &dyn Component {
        match self {
            ResourceComponent::Identifier(c) => c,
            ResourceComponent::Text(c) => c,
            ResourceComponent::Language(c) => c,
            ResourceComponent::Dates(c) => c,
            ResourceComponent::Rights(c) => c,
            ResourceComponent::Source(c) => c,
            ResourceComponent::Type(c) => c,
            ResourceComponent::Producer(c) => c,
            ResourceComponent::Format(c) => c,
            ResourceComponent::SubjectCoverage(c) => c,
            ResourceComponent::VirtualCoverage(c) => c,
            ResourceComponent::TemporalCoverage(c) => c,
            ResourceComponent::Security(c) => c,
            ResourceComponent::Extensible(c) => c,
        }
    }

    /// Name the cardinality rules count this component under
    pub fn occurrence_name(&self) -> &str {
        match self {
            ResourceComponent::Extensible(_) => EXTENSIBLE_ELEMENT,
            other => other.as_component().name(),
        }
    }
}

macro_rules! resource_component_from {
    ($($variant:ident($component:ty)),* $(,)?) => {
        $(
            impl From<$component> for ResourceComponent {
                fn from(component: $component) -> Self {
                    ResourceComponent::$variant(component)
                }
            }
        )*
    };
}

resource_component_from!(
    Identifier(Identifier),
    Text(TextComponent),
    Language(Language),
    Dates(Dates),
    Rights(Rights),
    Source(Source),
    Type(Type),
    Producer(ProducerRole),
    Format(Format),
    SubjectCoverage(SubjectCoverage),
    VirtualCoverage(VirtualCoverage),
    TemporalCoverage(TemporalCoverage),
    Security(Security),
    Extensible(ExtensibleElement),
);

fn unexpected_child(ctx: &VersionContext, element: &Element) -> Error {
    Error::UnexpectedChildType {
        parent: qualified(NamespaceKind::Ddms, root_name(ctx)),
        child: display_name(ctx, &element.qname),
    }
}

/// Attributes of the root element, as raw strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceAttributes {
    /// `ism:resourceElement` (3.0+, required)
    pub resource_element: String,
    /// `ism:createDate` (3.0+, required)
    pub create_date: String,
    /// `ism:DESVersion` (3.0+, required)
    pub des_version: String,
    /// `ntk:DESVersion` (4.1+, required in 5.0)
    pub ntk_des_version: String,
}

impl ResourceAttributes {
    fn trimmed(&self) -> Self {
        Self {
            resource_element: self.resource_element.trim().to_string(),
            create_date: self.create_date.trim().to_string(),
            des_version: self.des_version.trim().to_string(),
            ntk_des_version: self.ntk_des_version.trim().to_string(),
        }
    }

    fn pairs(&self) -> [(ParameterName, &str); 4] {
        [
            (RESOURCE_ELEMENT, &self.resource_element),
            (CREATE_DATE, &self.create_date),
            (DES_VERSION, &self.des_version),
            (NTK_DES_VERSION, &self.ntk_des_version),
        ]
    }

    /// Whether every value is blank
    pub fn is_empty(&self) -> bool {
        self.pairs().iter().all(|(_, v)| v.trim().is_empty())
    }
}

/// A secondary validator driven by an external rule file
///
/// Findings are returned to the caller unmodified.
pub trait RuleValidator {
    /// Validate a rendered root element against the rules in `rule_file`
    fn validate(&self, root: &Element, rule_file: &Path) -> Result<Vec<ValidationMessage>>;
}

/// A `ddms:Resource`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    version: DdmsVersion,
    components: Vec<ResourceComponent>,
    security: Security,
    attributes: ResourceAttributes,
    markings: SecurityAttributes,
    extensible: ExtensibleAttributes,
    warnings: Warnings,
}

impl Resource {
    /// Parse a document, detecting the version from the root namespace
    pub fn from_xml(xml: &str) -> Result<Self> {
        Self::from_xml_with(xml, &Config::default())
    }

    /// Parse a document with configured limits
    pub fn from_xml_with(xml: &str, config: &Config) -> Result<Self> {
        let root = Document::parse(xml, &config.limits)?.into_root();
        let namespace = root.namespace().unwrap_or_default();
        let ctx = VersionContext::for_namespace(namespace)?;
        debug!(version = %ctx.version(), "detected DDMS version");
        Self::from_element(ctx, &root)
    }

    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        expect_element(ctx, element, NamespaceKind::Ddms, root_name(ctx))?;
        let name = qualified(NamespaceKind::Ddms, root_name(ctx));
        let mut attributes = AttributeClassifier::new(ctx, &PROFILE).classify(&name, element);
        let markings = SecurityAttributes::new(ctx, &name, std::mem::take(&mut attributes.markings))?;
        let root_attributes = ResourceAttributes {
            resource_element: attributes.parameter(RESOURCE_ELEMENT),
            create_date: attributes.parameter(CREATE_DATE),
            des_version: attributes.parameter(DES_VERSION),
            ntk_des_version: attributes.parameter(NTK_DES_VERSION),
        };
        let components = element
            .children
            .iter()
            .map(|child| ResourceComponent::from_element(ctx, child))
            .collect::<Result<Vec<_>>>()?;
        Self::build(
            ctx,
            components,
            root_attributes,
            markings,
            attributes.extensible,
            attributes.dropped,
        )
    }

    /// Construct from top-level components, in any order
    pub fn new(
        ctx: &VersionContext,
        components: Vec<ResourceComponent>,
        attributes: ResourceAttributes,
        markings: SecurityAttributes,
        extensible: ExtensibleAttributes,
    ) -> Result<Self> {
        Self::build(ctx, components, attributes, markings, extensible, Vec::new())
    }

    fn build(
        ctx: &VersionContext,
        components: Vec<ResourceComponent>,
        attributes: ResourceAttributes,
        markings: SecurityAttributes,
        extensible: ExtensibleAttributes,
        dropped: Vec<ValidationMessage>,
    ) -> Result<Self> {
        let name = qualified(NamespaceKind::Ddms, root_name(ctx));
        let features = ctx.features();
        let attributes = attributes.trimmed();

        if features.resource_attributes {
            for (parameter, value) in &attributes.pairs()[..3] {
                require_value(&name, &parameter.to_string(), value)?;
            }
        }
        if features.ntk_des_version_required {
            require_value(&name, &NTK_DES_VERSION.to_string(), &attributes.ntk_des_version)?;
        }
        if !attributes.resource_element.is_empty() {
            validate_boolean(&name, &RESOURCE_ELEMENT.to_string(), &attributes.resource_element)?;
        }
        if !attributes.create_date.is_empty() {
            validate_xs_date(&name, &CREATE_DATE.to_string(), &attributes.create_date)?;
        }
        for (parameter, value) in &attributes.pairs()[2..] {
            if !value.is_empty() {
                validate_integer(&name, &parameter.to_string(), value)?;
            }
        }
        let classifier = AttributeClassifier::new(ctx, &PROFILE);
        for (parameter, value) in attributes.pairs() {
            classifier.check_parameter(parameter, value)?;
        }

        let rules = resource_rules(ctx);
        for component in &components {
            rules.check_legal(component.occurrence_name())?;
            require_same_version(ctx, &name, component.as_component())?;
        }
        let occurrences: Vec<_> = components
            .iter()
            .map(|c| ChildOccurrence::new(c.occurrence_name()))
            .collect();
        rules.validate(&occurrences)?;
        if !components.iter().any(|c| matches!(c, ResourceComponent::Producer(_))) {
            return Err(Error::invalid(
                &name,
                "producer role",
                "requires at least one creator, publisher, contributor, or point of contact.",
            ));
        }

        if features.resource_attributes {
            markings.require_markings(&name)?;
        }
        classifier.check_markings(&name, &markings)?;
        classifier.check_extensible(&name, &extensible)?;

        let mut warnings = Warnings::new();
        warnings.extend(dropped);
        let parent = format!("/{}", name);
        for component in &components {
            warnings.absorb(&parent, component.as_component());
        }

        // Producer roles form one repeatable choice, so they share the first role's rank.
        let rank = |component: &ResourceComponent| {
            let child = match component {
                ResourceComponent::Producer(_) => ProducerRoleKind::ALL[0].as_str(),
                other => other.occurrence_name(),
            };
            rules
                .rules()
                .iter()
                .position(|rule| rule.child == child)
                .unwrap_or(usize::MAX)
        };
        let mut security = None;
        let mut ordered = Vec::with_capacity(components.len());
        for component in components {
            match component {
                ResourceComponent::Security(s) => security = Some(s),
                other => ordered.push(other),
            }
        }
        ordered.sort_by_key(|c| rank(c));
        let security = security.ok_or_else(|| Error::CardinalityViolation {
            parent: name.clone(),
            child: Security::NAME.to_string(),
            actual: 0,
            min: 1,
            max: Some(1),
        })?;

        let component = Self {
            version: ctx.version(),
            components: ordered,
            security,
            attributes,
            markings,
            extensible,
            warnings,
        };
        trace_built(&component);
        Ok(component)
    }

    /// Top-level components in schema order, without `ddms:security`
    pub fn components(&self) -> &[ResourceComponent] {
        &self.components
    }

    /// The resource-level `ddms:security`
    pub fn security(&self) -> &Security {
        &self.security
    }

    /// Root attribute values
    pub fn attributes(&self) -> &ResourceAttributes {
        &self.attributes
    }

    /// Markings on the root element
    pub fn markings(&self) -> &SecurityAttributes {
        &self.markings
    }

    /// Titles
    pub fn titles(&self) -> Vec<&TextComponent> {
        self.texts(TextKind::Title)
    }

    /// Subtitles
    pub fn subtitles(&self) -> Vec<&TextComponent> {
        self.texts(TextKind::Subtitle)
    }

    /// The description, if any
    pub fn description(&self) -> Option<&TextComponent> {
        self.texts(TextKind::Description).into_iter().next()
    }

    fn texts(&self, kind: TextKind) -> Vec<&TextComponent> {
        self.components
            .iter()
            .filter_map(|c| match c {
                ResourceComponent::Text(text) if text.kind() == kind => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Identifiers
    pub fn identifiers(&self) -> Vec<&Identifier> {
        self.components
            .iter()
            .filter_map(|c| match c {
                ResourceComponent::Identifier(identifier) => Some(identifier),
                _ => None,
            })
            .collect()
    }

    /// Producer roles, creators first
    pub fn producers(&self) -> Vec<&ProducerRole> {
        self.components
            .iter()
            .filter_map(|c| match c {
                ResourceComponent::Producer(role) => Some(role),
                _ => None,
            })
            .collect()
    }

    /// Subject coverage elements
    pub fn subject_coverages(&self) -> Vec<&SubjectCoverage> {
        self.components
            .iter()
            .filter_map(|c| match c {
                ResourceComponent::SubjectCoverage(subject) => Some(subject),
                _ => None,
            })
            .collect()
    }

    /// Extensible elements
    pub fn extensible_elements(&self) -> Vec<&ExtensibleElement> {
        self.components
            .iter()
            .filter_map(|c| match c {
                ResourceComponent::Extensible(element) => Some(element),
                _ => None,
            })
            .collect()
    }

    /// Run a secondary rule validator over the rendered resource
    pub fn validate_with_rules(
        &self,
        validator: &dyn RuleValidator,
        rule_file: &Path,
    ) -> Result<Vec<ValidationMessage>> {
        debug!(rule_file = %rule_file.display(), "running rule validation");
        validator.validate(&self.to_element(), rule_file)
    }
}

impl Component for Resource {
    fn name(&self) -> &str {
        root_name(self.context())
    }

    fn version(&self) -> DdmsVersion {
        self.version
    }

    fn warnings(&self) -> &[ValidationMessage] {
        self.warnings.as_slice()
    }

    fn security_attributes(&self) -> Option<&SecurityAttributes> {
        Some(&self.markings)
    }

    fn extensible_attributes(&self) -> Option<&ExtensibleAttributes> {
        Some(&self.extensible)
    }

    fn children(&self) -> Vec<&dyn Component> {
        let (extensible, structured): (Vec<_>, Vec<_>) = self
            .components
            .iter()
            .partition(|c| matches!(c, ResourceComponent::Extensible(_)));
        structured
            .into_iter()
            .map(ResourceComponent::as_component)
            .chain(std::iter::once(&self.security as &dyn Component))
            .chain(extensible.into_iter().map(ResourceComponent::as_component))
            .collect()
    }

    fn to_element(&self) -> Element {
        let ctx = self.context();
        let mut element = new_element(ctx, NamespaceKind::Ddms, self.name());
        for (parameter, value) in self.attributes.pairs() {
            if let Some(qname) = parameter.qname(ctx) {
                element.set_attribute(qname, value);
            }
        }
        self.markings.apply_to(ctx, &mut element);
        self.extensible.apply_to(&mut element);
        for child in self.children() {
            element.add_child(child.to_element());
        }
        element
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        out.add("resourceElement", &self.attributes.resource_element);
        out.add("createDate", &self.attributes.create_date);
        out.add("ism.DESVersion", &self.attributes.des_version);
        out.add("ntk.DESVersion", &self.attributes.ntk_des_version);
        let children = self.children();
        for (i, child) in children.iter().enumerate() {
            let label = child.output_label();
            let total = children.iter().filter(|c| c.output_label() == label).count();
            let index = children[..i].iter().filter(|c| c.output_label() == label).count();
            let suffix = out.options().index_level.suffix(index, total);
            let entries = child.output_entries(&out.label(&format!("{}{}", label, suffix)), out.options());
            out.extend(entries);
        }
        self.markings.write_output(out);
    }

    fn output_label(&self) -> &str {
        ""
    }
}

/// Builder for [`Resource`]
///
/// Loading a resource into a builder and committing it under another version
/// re-runs every check of that version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceBuilder {
    /// Identifiers
    pub identifiers: Vec<IdentifierBuilder>,
    /// Titles
    pub titles: Vec<TextComponentBuilder>,
    /// Subtitles
    pub subtitles: Vec<TextComponentBuilder>,
    /// Description
    pub description: TextComponentBuilder,
    /// Languages
    pub languages: Vec<LanguageBuilder>,
    /// Dates
    pub dates: DateValues,
    /// Rights
    pub rights: RightsBuilder,
    /// Sources
    pub sources: Vec<SourceBuilder>,
    /// Types
    pub types: Vec<TypeBuilder>,
    /// Producer roles
    pub producers: Vec<ProducerRoleBuilder>,
    /// Format
    pub format: FormatBuilder,
    /// Subject coverage
    pub subject_coverages: Vec<SubjectCoverageBuilder>,
    /// Virtual coverage
    pub virtual_coverages: Vec<VirtualCoverageBuilder>,
    /// Temporal coverage
    pub temporal_coverages: Vec<TemporalCoverageBuilder>,
    /// The resource-level security element
    pub security: SecurityBuilder,
    /// Extensible elements, as markup
    pub extensible_elements: Vec<ExtensibleElementBuilder>,
    /// Root attributes
    pub attributes: ResourceAttributes,
    /// Root markings
    pub markings: SecurityAttributesBuilder,
    /// Root extensible attributes
    pub extensible: ExtensibleAttributes,
}

fn commit_texts(
    builders: &[TextComponentBuilder],
    kind: TextKind,
    ctx: &VersionContext,
) -> Result<Vec<TextComponent>> {
    let builders: Vec<_> = builders
        .iter()
        .map(|b| TextComponentBuilder { kind, ..b.clone() })
        .collect();
    commit_all(&builders, ctx)
}

fn push_all<T: Into<ResourceComponent>>(components: &mut Vec<ResourceComponent>, committed: Vec<T>) {
    components.extend(committed.into_iter().map(Into::into));
}

impl From<&Resource> for ResourceBuilder {
    fn from(resource: &Resource) -> Self {
        let mut builder = Self {
            security: resource.security().into(),
            attributes: resource.attributes.clone(),
            markings: (&resource.markings).into(),
            extensible: resource.extensible.clone(),
            ..Self::default()
        };
        for component in &resource.components {
            match component {
                ResourceComponent::Identifier(c) => builder.identifiers.push(c.into()),
                ResourceComponent::Text(c) => match c.kind() {
                    TextKind::Title => builder.titles.push(c.into()),
                    TextKind::Subtitle => builder.subtitles.push(c.into()),
                    TextKind::Description => builder.description = c.into(),
                },
                ResourceComponent::Language(c) => builder.languages.push(c.into()),
                ResourceComponent::Dates(c) => builder.dates = c.into(),
                ResourceComponent::Rights(c) => builder.rights = c.into(),
                ResourceComponent::Source(c) => builder.sources.push(c.into()),
                ResourceComponent::Type(c) => builder.types.push(c.into()),
                ResourceComponent::Producer(c) => builder.producers.push(c.into()),
                ResourceComponent::Format(c) => builder.format = c.into(),
                ResourceComponent::SubjectCoverage(c) => builder.subject_coverages.push(c.into()),
                ResourceComponent::VirtualCoverage(c) => builder.virtual_coverages.push(c.into()),
                ResourceComponent::TemporalCoverage(c) => builder.temporal_coverages.push(c.into()),
                ResourceComponent::Security(c) => builder.security = c.into(),
                ResourceComponent::Extensible(c) => builder.extensible_elements.push(c.into()),
            }
        }
        builder
    }
}

impl Builder for ResourceBuilder {
    type Target = Resource;

    fn is_empty(&self) -> bool {
        all_empty(&self.identifiers)
            && all_empty(&self.titles)
            && all_empty(&self.subtitles)
            && self.description.is_empty()
            && all_empty(&self.languages)
            && self.dates.is_empty()
            && self.rights.is_empty()
            && all_empty(&self.sources)
            && all_empty(&self.types)
            && all_empty(&self.producers)
            && self.format.is_empty()
            && all_empty(&self.subject_coverages)
            && all_empty(&self.virtual_coverages)
            && all_empty(&self.temporal_coverages)
            && self.security.is_empty()
            && all_empty(&self.extensible_elements)
            && self.attributes.is_empty()
            && self.markings.is_empty()
            && self.extensible.is_empty()
    }

    fn build(&self, ctx: &VersionContext) -> Result<Resource> {
        let name = qualified(NamespaceKind::Ddms, root_name(ctx));
        let mut components = Vec::new();
        push_all(&mut components, commit_all(&self.identifiers, ctx)?);
        push_all(&mut components, commit_texts(&self.titles, TextKind::Title, ctx)?);
        push_all(&mut components, commit_texts(&self.subtitles, TextKind::Subtitle, ctx)?);
        push_all(
            &mut components,
            commit_texts(std::slice::from_ref(&self.description), TextKind::Description, ctx)?,
        );
        push_all(&mut components, commit_all(&self.languages, ctx)?);
        push_all(&mut components, self.dates.commit(ctx)?.into_iter().collect());
        push_all(&mut components, self.rights.commit(ctx)?.into_iter().collect());
        push_all(&mut components, commit_all(&self.sources, ctx)?);
        push_all(&mut components, commit_all(&self.types, ctx)?);
        push_all(&mut components, commit_all(&self.producers, ctx)?);
        push_all(&mut components, self.format.commit(ctx)?.into_iter().collect());
        push_all(&mut components, commit_all(&self.subject_coverages, ctx)?);
        push_all(&mut components, commit_all(&self.virtual_coverages, ctx)?);
        push_all(&mut components, commit_all(&self.temporal_coverages, ctx)?);
        push_all(&mut components, self.security.commit(ctx)?.into_iter().collect());
        push_all(&mut components, commit_all(&self.extensible_elements, ctx)?);
        let markings = self.markings.build_for(ctx, &name)?;
        Resource::new(ctx, components, self.attributes.clone(), markings, self.extensible.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::producers::{ContactInfo, Person, ProducerEntity};
    use crate::components::subject::Keyword;
    use crate::validators::security::SecurityAttribute;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::path::PathBuf;

    const NO_POC_TYPES: &[&str] = &[];

    fn markings(ctx: &VersionContext) -> SecurityAttributes {
        SecurityAttributesBuilder::new()
            .with(SecurityAttribute::Classification, "U")
            .with(SecurityAttribute::OwnerProducer, "USA")
            .build_for(ctx, "test")
            .unwrap()
    }

    fn root_markings(ctx: &VersionContext) -> SecurityAttributes {
        if ctx.features().resource_attributes {
            markings(ctx)
        } else {
            SecurityAttributes::empty()
        }
    }

    fn attributes(ctx: &VersionContext) -> ResourceAttributes {
        let mut attributes = ResourceAttributes::default();
        if ctx.features().resource_attributes {
            attributes.resource_element = "true".to_string();
            attributes.create_date = "2010-01-21".to_string();
            attributes.des_version = "5".to_string();
        }
        if ctx.features().ntk_des_version {
            attributes.ntk_des_version = "7".to_string();
        }
        attributes
    }

    fn creator(ctx: &VersionContext) -> ProducerRole {
        let person = Person::new(
            ctx,
            ContactInfo::new(&["Brian"]),
            "Uri",
            "",
            &[],
            ExtensibleAttributes::new(),
        )
        .unwrap();
        ProducerRole::new(ctx, ProducerRoleKind::Creator, ProducerEntity::Person(person), NO_POC_TYPES, markings(ctx))
            .unwrap()
    }

    fn subject(ctx: &VersionContext) -> SubjectCoverage {
        let keyword = Keyword::new(ctx, "DDMSence", SecurityAttributes::empty(), ExtensibleAttributes::new()).unwrap();
        SubjectCoverage::new(ctx, vec![keyword], Vec::new(), Vec::new(), Vec::new(), SecurityAttributes::empty())
            .unwrap()
    }

    fn components(ctx: &VersionContext) -> Vec<ResourceComponent> {
        vec![
            Identifier::new(ctx, "URI", "urn:buri:ddmsence:testIdentifier").unwrap().into(),
            TextComponent::title(ctx, "DDMSence", markings(ctx)).unwrap().into(),
            creator(ctx).into(),
            subject(ctx).into(),
            Security::new(ctx, None, markings(ctx)).unwrap().into(),
        ]
    }

    fn resource(ctx: &VersionContext, components: Vec<ResourceComponent>) -> Result<Resource> {
        Resource::new(ctx, components, attributes(ctx), root_markings(ctx), ExtensibleAttributes::new())
    }

    #[test]
    fn test_round_trip_every_version() {
        for ctx in VersionContext::catalog() {
            let built = resource(ctx, components(ctx)).unwrap();
            assert!(built.warnings().is_empty(), "{}", ctx.version());
            let xml = built.to_xml();
            let parsed = Resource::from_xml(&xml).unwrap();
            assert_eq!(parsed.to_xml(), xml);
            let parsed_ctx = VersionContext::for_namespace(ctx.ddms_namespace()).unwrap();
            if parsed_ctx.version() == ctx.version() {
                assert_eq!(parsed, built);
            }
        }
    }

    #[test]
    fn test_root_name_by_version() {
        let v5 = VersionContext::get(DdmsVersion::V5_0);
        assert_eq!(resource(v5, components(v5)).unwrap().name(), "resource");
        let v4 = VersionContext::get(DdmsVersion::V4_1);
        assert_eq!(resource(v4, components(v4)).unwrap().name(), "Resource");
    }

    #[test]
    fn test_children_sorted_into_schema_order() {
        let ctx = VersionContext::get(DdmsVersion::V3_1);
        let mut reversed = components(ctx);
        reversed.reverse();
        let built = resource(ctx, reversed).unwrap();
        assert_eq!(built, resource(ctx, components(ctx)).unwrap());
        let names: Vec<_> = built.children().iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, ["identifier", "title", "creator", "subjectCoverage", "security"]);
    }

    #[test]
    fn test_producer_roles_keep_their_order() {
        let ctx = VersionContext::get(DdmsVersion::V4_1);
        let role = |kind: ProducerRoleKind| {
            let no_poc_types: &[&str] = &[];
            let entity = creator(ctx).entity().clone();
            ProducerRole::new(ctx, kind, entity, no_poc_types, markings(ctx)).unwrap()
        };
        let mut parts = components(ctx);
        parts.remove(2);
        parts.insert(2, role(ProducerRoleKind::Publisher).into());
        parts.insert(3, role(ProducerRoleKind::Creator).into());
        parts.insert(4, role(ProducerRoleKind::Publisher).into());

        let built = resource(ctx, parts).unwrap();
        let roles: Vec<_> = built.producers().iter().map(|p| p.role()).collect();
        assert_eq!(
            roles,
            [ProducerRoleKind::Publisher, ProducerRoleKind::Creator, ProducerRoleKind::Publisher]
        );
        assert_eq!(Resource::from_xml(&built.to_xml()).unwrap(), built);
    }

    #[test]
    fn test_title_required() {
        let ctx = VersionContext::get(DdmsVersion::V4_1);
        let mut parts = components(ctx);
        parts.remove(1);
        let err = resource(ctx, parts).unwrap_err();
        assert!(matches!(
            err,
            Error::CardinalityViolation { ref child, actual: 0, min: 1, max: None, .. } if child == "title"
        ));
    }

    #[test]
    fn test_single_description() {
        let ctx = VersionContext::get(DdmsVersion::V4_1);
        let mut parts = components(ctx);
        for text in ["First", "Second"] {
            parts.push(TextComponent::new(ctx, TextKind::Description, text, markings(ctx)).unwrap().into());
        }
        let err = resource(ctx, parts).unwrap_err();
        assert!(matches!(
            err,
            Error::CardinalityViolation { ref child, actual: 2, min: 0, max: Some(1), .. } if child == "description"
        ));
    }

    #[test]
    fn test_duplicate_security() {
        let ctx = VersionContext::get(DdmsVersion::V3_0);
        let mut parts = components(ctx);
        parts.push(Security::new(ctx, None, markings(ctx)).unwrap().into());
        let err = resource(ctx, parts).unwrap_err();
        assert!(matches!(
            err,
            Error::CardinalityViolation { ref child, actual: 2, min: 1, max: Some(1), .. } if child == "security"
        ));
    }

    #[test]
    fn test_subject_coverage_count_by_version() {
        for (version, allowed) in [(DdmsVersion::V3_1, false), (DdmsVersion::V4_0_1, true)] {
            let ctx = VersionContext::get(version);
            let mut parts = components(ctx);
            parts.push(subject(ctx).into());
            assert_eq!(resource(ctx, parts).is_ok(), allowed, "{}", version);
        }
    }

    #[test]
    fn test_producer_required() {
        let ctx = VersionContext::get(DdmsVersion::V2_0);
        let mut parts = components(ctx);
        parts.remove(2);
        let err = resource(ctx, parts).unwrap_err();
        assert!(matches!(err, Error::InvalidComponent { ref field, .. } if field == "producer role"));
    }

    #[test]
    fn test_one_extensible_element_in_2_0() {
        let extension = |ctx: &VersionContext| -> ResourceComponent {
            let element = Element::namespaced("http://ddmsence.urizone.net/", "extension");
            ExtensibleElement::from_element(ctx, &element).unwrap().into()
        };
        let v2 = VersionContext::get(DdmsVersion::V2_0);
        let mut parts = components(v2);
        parts.push(extension(v2));
        assert!(resource(v2, parts.clone()).is_ok());
        parts.push(extension(v2));
        assert!(matches!(resource(v2, parts).unwrap_err(), Error::CardinalityViolation { .. }));

        let v3 = VersionContext::get(DdmsVersion::V3_0);
        let mut parts = components(v3);
        parts.push(extension(v3));
        parts.push(extension(v3));
        let built = resource(v3, parts).unwrap();
        assert_eq!(built.extensible_elements().len(), 2);
        assert_eq!(built.children().last().map(|c| c.name()), Some("extension"));
    }

    #[test]
    fn test_root_attributes_required_from_3_0() {
        let ctx = VersionContext::get(DdmsVersion::V3_0);
        let err = Resource::new(ctx, components(ctx), ResourceAttributes::default(), markings(ctx), ExtensibleAttributes::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidComponent { ref field, .. } if field == "ism:resourceElement"));

        let mut bad = attributes(ctx);
        bad.create_date = "2010".to_string();
        let err = Resource::new(ctx, components(ctx), bad, markings(ctx), ExtensibleAttributes::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidComponent { ref field, .. } if field == "ism:createDate"));

        let err = Resource::new(ctx, components(ctx), attributes(ctx), SecurityAttributes::empty(), ExtensibleAttributes::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidComponent { ref field, .. } if field == "ism:classification"));
    }

    #[test]
    fn test_ntk_des_version() {
        let v401 = VersionContext::get(DdmsVersion::V4_0_1);
        let mut attrs = attributes(v401);
        attrs.ntk_des_version = "7".to_string();
        let err = Resource::new(v401, components(v401), attrs, markings(v401), ExtensibleAttributes::new()).unwrap_err();
        assert!(matches!(err, Error::VersionNotSupported { ref name, .. } if name == "ntk:DESVersion"));

        let v41 = VersionContext::get(DdmsVersion::V4_1);
        let mut attrs = attributes(v41);
        attrs.ntk_des_version.clear();
        assert!(Resource::new(v41, components(v41), attrs.clone(), markings(v41), ExtensibleAttributes::new()).is_ok());

        let v5 = VersionContext::get(DdmsVersion::V5_0);
        let err = Resource::new(v5, components(v5), attrs, markings(v5), ExtensibleAttributes::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidComponent { ref field, .. } if field == "ntk:DESVersion"));
    }

    #[test]
    fn test_unexpected_child() {
        let ctx = VersionContext::get(DdmsVersion::V4_1);
        let mut element = resource(ctx, components(ctx)).unwrap().to_element();
        element.add_child(Element::namespaced(ctx.ddms_namespace(), "geospatialCoverage"));
        let err = Resource::from_element(ctx, &element).unwrap_err();
        assert!(matches!(err, Error::UnexpectedChildType { ref child, .. } if child == "ddms:geospatialCoverage"));

        let mut element = resource(ctx, components(ctx)).unwrap().to_element();
        element.add_child(Element::namespaced(ctx.ism_namespace(), "Notice"));
        assert!(matches!(
            Resource::from_element(ctx, &element).unwrap_err(),
            Error::UnexpectedChildType { .. }
        ));
    }

    #[test]
    fn test_mixed_versions_rejected() {
        let ctx = VersionContext::get(DdmsVersion::V4_1);
        let v3 = VersionContext::get(DdmsVersion::V3_1);
        let mut parts = components(ctx);
        parts[0] = Identifier::new(v3, "URI", "urn:buri:ddmsence:testIdentifier").unwrap().into();
        let err = resource(ctx, parts).unwrap_err();
        assert!(matches!(err, Error::InvalidComponent { ref field, .. } if field == "ddms:identifier"));
    }

    #[test]
    fn test_text_output() {
        let ctx = VersionContext::get(DdmsVersion::V4_1);
        let text = resource(ctx, components(ctx)).unwrap().to_text();
        assert!(text.starts_with(
            "resourceElement: true\ncreateDate: 2010-01-21\nism.DESVersion: 5\nntk.DESVersion: 7\n\
             identifier.qualifier: URI\n"
        ));
        assert!(text.contains("title: DDMSence\n"));
        assert!(text.contains("security.excludeFromRollup: true\n"));
        assert!(text.ends_with("classification: U\nownerProducer: USA\n"));
    }

    struct RecordingValidator {
        seen: RefCell<Vec<(String, PathBuf)>>,
    }

    impl RuleValidator for RecordingValidator {
        fn validate(&self, root: &Element, rule_file: &Path) -> Result<Vec<ValidationMessage>> {
            self.seen
                .borrow_mut()
                .push((root.local_name().to_string(), rule_file.to_path_buf()));
            Ok(vec![ValidationMessage::warning("A rule fired.", "/ddms:Resource")])
        }
    }

    #[test]
    fn test_rule_validator_findings_pass_through() {
        let ctx = VersionContext::get(DdmsVersion::V4_1);
        let validator = RecordingValidator { seen: RefCell::new(Vec::new()) };
        let findings = resource(ctx, components(ctx))
            .unwrap()
            .validate_with_rules(&validator, Path::new("rules/test.sch"))
            .unwrap();
        assert_eq!(findings, vec![ValidationMessage::warning("A rule fired.", "/ddms:Resource")]);
        assert_eq!(
            validator.seen.into_inner(),
            vec![("Resource".to_string(), PathBuf::from("rules/test.sch"))]
        );
    }

    #[test]
    fn test_builder_round_trip() {
        for ctx in VersionContext::catalog() {
            let built = resource(ctx, components(ctx)).unwrap();
            let builder = ResourceBuilder::from(&built);
            assert!(!builder.is_empty());
            assert_eq!(builder.commit(ctx).unwrap(), Some(built));
        }
        assert!(ResourceBuilder::default().commit(VersionContext::latest()).unwrap().is_none());
    }
}
