//! Producers
//!
//! A producer role (`ddms:creator`, `ddms:publisher`, `ddms:contributor` or
//! `ddms:pointOfContact`) wraps exactly one producer entity. Entity element
//! names are capitalised up to DDMS 3.1 and lowercase from 4.0.1.

use crate::components::identifier::ddms_attribute;
use crate::documents::Element;
use crate::error::{Error, Result, ValidationMessage};
use crate::names::{join_tokens, split_tokens};
use crate::output::OutputWriter;
use crate::validators::attributes::{
    AttributeClassifier, AttributeProfile, ExtensibleAttributes, IsmParameter, ParameterName, ParameterSpec,
};
use crate::validators::base::{
    expect_element, new_element, qualified, require_same_version, trace_built, validate_child_elements,
    write_children, Component, Warnings,
};
use crate::validators::builders::{commit_all, Builder};
use crate::validators::cardinality::{CardinalityRule, ChildOccurrence, RuleSet};
use crate::validators::helpers::{require_value, validate_enumeration};
use crate::validators::security::{SecurityAttributes, SecurityAttributesBuilder};
use crate::version::{DdmsVersion, NamespaceKind, VersionContext};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

lazy_static! {
    /// Legal `ism:pocType` tokens
    pub static ref POC_TYPES: HashSet<&'static str> = [
        "ICD-710", "DoD-Dist-A", "DoD-Dist-B", "DoD-Dist-C", "DoD-Dist-D", "DoD-Dist-E",
        "DoD-Dist-F", "DoD-Dist-X",
    ]
    .into_iter()
    .collect();
}

const POC_TYPE: ParameterName = ParameterName::Ism(IsmParameter::PocType);
const ACRONYM: ParameterName = ParameterName::Ddms("acronym");

const ROLE_PROFILE: AttributeProfile = AttributeProfile {
    parameters: &[ParameterSpec::since(POC_TYPE, DdmsVersion::V4_1)],
    markings_since: Some(DdmsVersion::V2_0),
    extensible_since: None,
};

const ENTITY_PROFILE: AttributeProfile = AttributeProfile {
    parameters: &[],
    markings_since: None,
    extensible_since: Some(DdmsVersion::V2_0),
};

const ORGANIZATION_PROFILE: AttributeProfile = AttributeProfile {
    parameters: &[ParameterSpec::since(ACRONYM, DdmsVersion::V4_0_1)],
    markings_since: None,
    extensible_since: Some(DdmsVersion::V2_0),
};

const SUB_ORGANIZATION_PROFILE: AttributeProfile = AttributeProfile {
    parameters: &[],
    markings_since: Some(DdmsVersion::V4_0_1),
    extensible_since: None,
};

/// The four producer roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProducerRoleKind {
    /// `ddms:creator`
    #[default]
    Creator,
    /// `ddms:publisher`
    Publisher,
    /// `ddms:contributor`
    Contributor,
    /// `ddms:pointOfContact`
    PointOfContact,
}

impl ProducerRoleKind {
    /// Every role, in resource order
    pub const ALL: [ProducerRoleKind; 4] = [
        ProducerRoleKind::Creator,
        ProducerRoleKind::Publisher,
        ProducerRoleKind::Contributor,
        ProducerRoleKind::PointOfContact,
    ];

    /// Parse from an element name
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }

    /// Get the element name
    pub fn as_str(&self) -> &'static str {
        match self {
            ProducerRoleKind::Creator => "creator",
            ProducerRoleKind::Publisher => "publisher",
            ProducerRoleKind::Contributor => "contributor",
            ProducerRoleKind::PointOfContact => "pointOfContact",
        }
    }
}

/// The kinds of producer entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A person
    #[default]
    Person,
    /// An organization
    Organization,
    /// A service
    Service,
    /// An unknown entity (3.0+)
    Unknown,
}

impl EntityKind {
    /// Every kind
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Person,
        EntityKind::Organization,
        EntityKind::Service,
        EntityKind::Unknown,
    ];

    /// The element name in a version
    pub fn element_name(&self, version: DdmsVersion) -> &'static str {
        let lowercase = VersionContext::get(version).features().lowercase_entities;
        match (self, lowercase) {
            (EntityKind::Person, false) => "Person",
            (EntityKind::Person, true) => "person",
            (EntityKind::Organization, false) => "Organization",
            (EntityKind::Organization, true) => "organization",
            (EntityKind::Service, false) => "Service",
            (EntityKind::Service, true) => "service",
            (EntityKind::Unknown, false) => "Unknown",
            (EntityKind::Unknown, true) => "unknown",
        }
    }

    /// Find the kind named by an element in a version
    pub fn from_element_name(version: DdmsVersion, name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.element_name(version) == name)
    }
}

fn clean(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

fn add_text_children(ctx: &VersionContext, element: &mut Element, local_name: &str, values: &[String]) {
    for value in values {
        element.add_child(new_element(ctx, NamespaceKind::Ddms, local_name).with_text(value));
    }
}

/// Names, phone numbers and email addresses shared by every entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    /// Names, at least one
    pub names: Vec<String>,
    /// Phone numbers
    pub phones: Vec<String>,
    /// Email addresses
    pub emails: Vec<String>,
}

impl ContactInfo {
    /// Contact details with the given names
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        Self {
            names: names.iter().map(|n| n.as_ref().to_string()).collect(),
            ..Self::default()
        }
    }

    /// Builder-style phone setter
    pub fn with_phones<S: AsRef<str>>(mut self, phones: &[S]) -> Self {
        self.phones = phones.iter().map(|p| p.as_ref().to_string()).collect();
        self
    }

    /// Builder-style email setter
    pub fn with_emails<S: AsRef<str>>(mut self, emails: &[S]) -> Self {
        self.emails = emails.iter().map(|e| e.as_ref().to_string()).collect();
        self
    }

    /// Whether every value is blank
    pub fn is_empty(&self) -> bool {
        self.names.iter().chain(&self.phones).chain(&self.emails).all(|v| v.trim().is_empty())
    }

    fn read(ctx: &VersionContext, element: &Element) -> Self {
        let ddms = ctx.ddms_namespace();
        Self {
            names: element.child_texts(ddms, "name"),
            phones: element.child_texts(ddms, "phone"),
            emails: element.child_texts(ddms, "email"),
        }
    }

    fn cleaned(&self) -> Self {
        Self {
            names: clean(&self.names),
            phones: clean(&self.phones),
            emails: clean(&self.emails),
        }
    }

    fn validate(&self, component: &str) -> Result<()> {
        if self.names.is_empty() {
            return Err(Error::invalid(component, "name", "requires at least one value."));
        }
        Ok(())
    }

    fn occurrences(&self) -> impl Iterator<Item = ChildOccurrence> + '_ {
        let names = self.names.iter().map(|_| ChildOccurrence::new("name"));
        let phones = self.phones.iter().map(|_| ChildOccurrence::new("phone"));
        let emails = self.emails.iter().map(|_| ChildOccurrence::new("email"));
        names.chain(phones).chain(emails)
    }
}

fn entity_rules(parent: String) -> RuleSet {
    RuleSet::new(parent)
        .rule(CardinalityRule::at_least_one("name"))
        .rule(CardinalityRule::any("phone"))
        .rule(CardinalityRule::any("email"))
}

fn person_rules(ctx: &VersionContext, parent: String) -> RuleSet {
    let affiliation = if ctx.features().production_metrics {
        CardinalityRule::any("affiliation")
    } else {
        CardinalityRule::optional("affiliation")
    };
    entity_rules(parent)
        .rule(CardinalityRule::exactly_one("surname"))
        .rule(CardinalityRule::optional("userID"))
        .rule(affiliation)
}

/// A `ddms:person`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    version: DdmsVersion,
    contact: ContactInfo,
    surname: String,
    user_id: String,
    affiliations: Vec<String>,
    extensible: ExtensibleAttributes,
    warnings: Warnings,
}

impl Person {
    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        let local = EntityKind::Person.element_name(ctx.version());
        expect_element(ctx, element, NamespaceKind::Ddms, local)?;
        let name = qualified(NamespaceKind::Ddms, local);
        validate_child_elements(ctx, element, &[NamespaceKind::Ddms], &person_rules(ctx, name.clone()))?;
        let attributes = AttributeClassifier::new(ctx, &ENTITY_PROFILE).classify(&name, element);
        let ddms = ctx.ddms_namespace();
        Self::build(
            ctx,
            ContactInfo::read(ctx, element),
            &element.child_text(ddms, "surname"),
            &element.child_text(ddms, "userID"),
            &element.child_texts(ddms, "affiliation"),
            attributes.extensible,
            attributes.dropped,
        )
    }

    /// Construct from values
    pub fn new(
        ctx: &VersionContext,
        contact: ContactInfo,
        surname: &str,
        user_id: &str,
        affiliations: &[String],
        extensible: ExtensibleAttributes,
    ) -> Result<Self> {
        Self::build(ctx, contact, surname, user_id, affiliations, extensible, Vec::new())
    }

    fn build(
        ctx: &VersionContext,
        contact: ContactInfo,
        surname: &str,
        user_id: &str,
        affiliations: &[String],
        extensible: ExtensibleAttributes,
        dropped: Vec<ValidationMessage>,
    ) -> Result<Self> {
        let name = qualified(NamespaceKind::Ddms, EntityKind::Person.element_name(ctx.version()));
        let contact = contact.cleaned();
        let (surname, user_id) = (surname.trim(), user_id.trim());
        let affiliations = clean(affiliations);
        contact.validate(&name)?;
        require_value(&name, "surname", surname)?;

        let mut occurrences: Vec<_> = contact.occurrences().collect();
        occurrences.push(ChildOccurrence::new("surname"));
        if !user_id.is_empty() {
            occurrences.push(ChildOccurrence::new("userID"));
        }
        occurrences.extend(affiliations.iter().map(|_| ChildOccurrence::new("affiliation")));
        person_rules(ctx, name.clone()).validate(&occurrences)?;
        AttributeClassifier::new(ctx, &ENTITY_PROFILE).check_extensible(&name, &extensible)?;

        let mut warnings = Warnings::new();
        warnings.extend(dropped);
        let component = Self {
            version: ctx.version(),
            contact,
            surname: surname.to_string(),
            user_id: user_id.to_string(),
            affiliations,
            extensible,
            warnings,
        };
        trace_built(&component);
        Ok(component)
    }

    /// Names, phones and emails
    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    /// The surname
    pub fn surname(&self) -> &str {
        &self.surname
    }

    /// The user ID
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Affiliations
    pub fn affiliations(&self) -> &[String] {
        &self.affiliations
    }
}

impl Component for Person {
    fn name(&self) -> &str {
        EntityKind::Person.element_name(self.version)
    }

    fn version(&self) -> DdmsVersion {
        self.version
    }

    fn warnings(&self) -> &[ValidationMessage] {
        self.warnings.as_slice()
    }

    fn extensible_attributes(&self) -> Option<&ExtensibleAttributes> {
        Some(&self.extensible)
    }

    fn to_element(&self) -> Element {
        let ctx = self.context();
        let mut element = new_element(ctx, NamespaceKind::Ddms, self.name());
        add_text_children(ctx, &mut element, "name", &self.contact.names);
        add_text_children(ctx, &mut element, "surname", std::slice::from_ref(&self.surname));
        if !self.user_id.is_empty() {
            add_text_children(ctx, &mut element, "userID", std::slice::from_ref(&self.user_id));
        }
        add_text_children(ctx, &mut element, "affiliation", &self.affiliations);
        add_text_children(ctx, &mut element, "phone", &self.contact.phones);
        add_text_children(ctx, &mut element, "email", &self.contact.emails);
        self.extensible.apply_to(&mut element);
        element
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        out.add_list("name", &self.contact.names);
        out.add("surname", &self.surname);
        out.add("userID", &self.user_id);
        out.add_list("affiliation", &self.affiliations);
        out.add_list("phone", &self.contact.phones);
        out.add_list("email", &self.contact.emails);
    }
}

/// Builder for [`Person`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonBuilder {
    /// Names, phones and emails
    pub contact: ContactInfo,
    /// The surname
    pub surname: String,
    /// The user ID
    pub user_id: String,
    /// Affiliations
    pub affiliations: Vec<String>,
    /// Extensible attributes
    pub extensible: ExtensibleAttributes,
}

impl From<&Person> for PersonBuilder {
    fn from(component: &Person) -> Self {
        Self {
            contact: component.contact.clone(),
            surname: component.surname.clone(),
            user_id: component.user_id.clone(),
            affiliations: component.affiliations.clone(),
            extensible: component.extensible.clone(),
        }
    }
}

impl Builder for PersonBuilder {
    type Target = Person;

    fn is_empty(&self) -> bool {
        self.contact.is_empty()
            && self.surname.trim().is_empty()
            && self.user_id.trim().is_empty()
            && self.affiliations.iter().all(|a| a.trim().is_empty())
            && self.extensible.is_empty()
    }

    fn build(&self, ctx: &VersionContext) -> Result<Person> {
        Person::new(
            ctx,
            self.contact.clone(),
            &self.surname,
            &self.user_id,
            &self.affiliations,
            self.extensible.clone(),
        )
    }
}

/// A `ddms:subOrganization` (4.0.1+)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubOrganization {
    version: DdmsVersion,
    value: String,
    security: SecurityAttributes,
    warnings: Warnings,
}

impl SubOrganization {
    /// Element name
    pub const NAME: &'static str = "subOrganization";

    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        expect_element(ctx, element, NamespaceKind::Ddms, Self::NAME)?;
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let mut attributes = AttributeClassifier::new(ctx, &SUB_ORGANIZATION_PROFILE).classify(&name, element);
        let security = SecurityAttributes::new(ctx, &name, std::mem::take(&mut attributes.markings))?;
        Self::build(ctx, element.text_or_empty(), security, attributes.dropped)
    }

    /// Construct from values
    pub fn new(ctx: &VersionContext, value: &str, security: SecurityAttributes) -> Result<Self> {
        Self::build(ctx, value, security, Vec::new())
    }

    fn build(
        ctx: &VersionContext,
        value: &str,
        security: SecurityAttributes,
        dropped: Vec<ValidationMessage>,
    ) -> Result<Self> {
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let value = value.trim();
        require_value(&name, "value", value)?;
        ctx.require(ctx.features().production_metrics, &name, DdmsVersion::V4_0_1)?;
        AttributeClassifier::new(ctx, &SUB_ORGANIZATION_PROFILE).check_markings(&name, &security)?;

        let mut warnings = Warnings::new();
        warnings.extend(dropped);
        let component = Self {
            version: ctx.version(),
            value: value.to_string(),
            security,
            warnings,
        };
        trace_built(&component);
        Ok(component)
    }

    /// The suborganization name
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Component for SubOrganization {
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
        let mut element = new_element(ctx, NamespaceKind::Ddms, Self::NAME).with_text(&self.value);
        self.security.apply_to(ctx, &mut element);
        element
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        out.add_value(&self.value);
        self.security.write_output(out);
    }
}

/// Builder for [`SubOrganization`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubOrganizationBuilder {
    /// The suborganization name
    pub value: String,
    /// Security markings
    pub security: SecurityAttributesBuilder,
}

impl From<&SubOrganization> for SubOrganizationBuilder {
    fn from(component: &SubOrganization) -> Self {
        Self {
            value: component.value.clone(),
            security: (&component.security).into(),
        }
    }
}

impl Builder for SubOrganizationBuilder {
    type Target = SubOrganization;

    fn is_empty(&self) -> bool {
        self.value.trim().is_empty() && self.security.is_empty()
    }

    fn build(&self, ctx: &VersionContext) -> Result<SubOrganization> {
        let security = self.security.build_for(ctx, "ddms:subOrganization")?;
        SubOrganization::new(ctx, &self.value, security)
    }
}

/// A `ddms:organization`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization {
    version: DdmsVersion,
    contact: ContactInfo,
    sub_organizations: Vec<SubOrganization>,
    acronym: String,
    extensible: ExtensibleAttributes,
    warnings: Warnings,
}

impl Organization {
    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        let local = EntityKind::Organization.element_name(ctx.version());
        expect_element(ctx, element, NamespaceKind::Ddms, local)?;
        let name = qualified(NamespaceKind::Ddms, local);
        let rules = entity_rules(name.clone()).rule(CardinalityRule::any(SubOrganization::NAME));
        validate_child_elements(ctx, element, &[NamespaceKind::Ddms], &rules)?;
        let attributes = AttributeClassifier::new(ctx, &ORGANIZATION_PROFILE).classify(&name, element);
        let sub_organizations = element
            .find_children(ctx.ddms_namespace(), SubOrganization::NAME)
            .into_iter()
            .map(|e| SubOrganization::from_element(ctx, e))
            .collect::<Result<Vec<_>>>()?;
        Self::build(
            ctx,
            ContactInfo::read(ctx, element),
            sub_organizations,
            &attributes.parameter(ACRONYM),
            attributes.extensible,
            attributes.dropped,
        )
    }

    /// Construct from values
    pub fn new(
        ctx: &VersionContext,
        contact: ContactInfo,
        sub_organizations: Vec<SubOrganization>,
        acronym: &str,
        extensible: ExtensibleAttributes,
    ) -> Result<Self> {
        Self::build(ctx, contact, sub_organizations, acronym, extensible, Vec::new())
    }

    fn build(
        ctx: &VersionContext,
        contact: ContactInfo,
        sub_organizations: Vec<SubOrganization>,
        acronym: &str,
        extensible: ExtensibleAttributes,
        dropped: Vec<ValidationMessage>,
    ) -> Result<Self> {
        let name = qualified(NamespaceKind::Ddms, EntityKind::Organization.element_name(ctx.version()));
        let contact = contact.cleaned();
        let acronym = acronym.trim();
        contact.validate(&name)?;
        for sub_organization in &sub_organizations {
            require_same_version(ctx, &name, sub_organization)?;
        }
        let classifier = AttributeClassifier::new(ctx, &ORGANIZATION_PROFILE);
        classifier.check_parameter(ACRONYM, acronym)?;
        classifier.check_extensible(&name, &extensible)?;

        let mut warnings = Warnings::new();
        warnings.extend(dropped);
        for sub_organization in &sub_organizations {
            warnings.absorb(&format!("/{}", name), sub_organization);
        }
        let component = Self {
            version: ctx.version(),
            contact,
            sub_organizations,
            acronym: acronym.to_string(),
            extensible,
            warnings,
        };
        trace_built(&component);
        Ok(component)
    }

    /// Names, phones and emails
    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    /// Suborganizations
    pub fn sub_organizations(&self) -> &[SubOrganization] {
        &self.sub_organizations
    }

    /// The acronym
    pub fn acronym(&self) -> &str {
        &self.acronym
    }
}

impl Component for Organization {
    fn name(&self) -> &str {
        EntityKind::Organization.element_name(self.version)
    }

    fn version(&self) -> DdmsVersion {
        self.version
    }

    fn warnings(&self) -> &[ValidationMessage] {
        self.warnings.as_slice()
    }

    fn extensible_attributes(&self) -> Option<&ExtensibleAttributes> {
        Some(&self.extensible)
    }

    fn children(&self) -> Vec<&dyn Component> {
        self.sub_organizations.iter().map(|s| s as &dyn Component).collect()
    }

    fn to_element(&self) -> Element {
        let ctx = self.context();
        let mut element = new_element(ctx, NamespaceKind::Ddms, self.name())
            .with_attribute(ddms_attribute(ctx, ACRONYM.local_name()), &self.acronym);
        add_text_children(ctx, &mut element, "name", &self.contact.names);
        add_text_children(ctx, &mut element, "phone", &self.contact.phones);
        add_text_children(ctx, &mut element, "email", &self.contact.emails);
        for sub_organization in &self.sub_organizations {
            element.add_child(sub_organization.to_element());
        }
        self.extensible.apply_to(&mut element);
        element
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        out.add_list("name", &self.contact.names);
        out.add_list("phone", &self.contact.phones);
        out.add_list("email", &self.contact.emails);
        write_children(out, SubOrganization::NAME, &self.sub_organizations);
        out.add("acronym", &self.acronym);
    }
}

/// Builder for [`Organization`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationBuilder {
    /// Names, phones and emails
    pub contact: ContactInfo,
    /// Suborganizations
    pub sub_organizations: Vec<SubOrganizationBuilder>,
    /// The acronym
    pub acronym: String,
    /// Extensible attributes
    pub extensible: ExtensibleAttributes,
}

impl From<&Organization> for OrganizationBuilder {
    fn from(component: &Organization) -> Self {
        Self {
            contact: component.contact.clone(),
            sub_organizations: component.sub_organizations.iter().map(Into::into).collect(),
            acronym: component.acronym.clone(),
            extensible: component.extensible.clone(),
        }
    }
}

impl Builder for OrganizationBuilder {
    type Target = Organization;

    fn is_empty(&self) -> bool {
        self.contact.is_empty()
            && self.sub_organizations.iter().all(Builder::is_empty)
            && self.acronym.trim().is_empty()
            && self.extensible.is_empty()
    }

    fn build(&self, ctx: &VersionContext) -> Result<Organization> {
        Organization::new(
            ctx,
            self.contact.clone(),
            commit_all(&self.sub_organizations, ctx)?,
            &self.acronym,
            self.extensible.clone(),
        )
    }
}

/// Shared shape of the entities that only carry contact details
fn build_contact_entity(
    ctx: &VersionContext,
    kind: EntityKind,
    contact: ContactInfo,
    extensible: &ExtensibleAttributes,
) -> Result<ContactInfo> {
    let name = qualified(NamespaceKind::Ddms, kind.element_name(ctx.version()));
    let contact = contact.cleaned();
    contact.validate(&name)?;
    if kind == EntityKind::Unknown {
        ctx.require(ctx.features().unknown_producer, &name, DdmsVersion::V3_0)?;
    }
    AttributeClassifier::new(ctx, &ENTITY_PROFILE).check_extensible(&name, extensible)?;
    Ok(contact)
}

fn read_contact_entity(
    ctx: &VersionContext,
    kind: EntityKind,
    element: &Element,
) -> Result<(ContactInfo, ExtensibleAttributes, Vec<ValidationMessage>)> {
    let local = kind.element_name(ctx.version());
    expect_element(ctx, element, NamespaceKind::Ddms, local)?;
    let name = qualified(NamespaceKind::Ddms, local);
    validate_child_elements(ctx, element, &[NamespaceKind::Ddms], &entity_rules(name.clone()))?;
    let attributes = AttributeClassifier::new(ctx, &ENTITY_PROFILE).classify(&name, element);
    Ok((ContactInfo::read(ctx, element), attributes.extensible, attributes.dropped))
}

fn contact_element(component: &dyn Component, contact: &ContactInfo, extensible: &ExtensibleAttributes) -> Element {
    let ctx = component.context();
    let mut element = new_element(ctx, NamespaceKind::Ddms, component.name());
    add_text_children(ctx, &mut element, "name", &contact.names);
    add_text_children(ctx, &mut element, "phone", &contact.phones);
    add_text_children(ctx, &mut element, "email", &contact.emails);
    extensible.apply_to(&mut element);
    element
}

fn write_contact(out: &mut OutputWriter<'_>, contact: &ContactInfo) {
    out.add_list("name", &contact.names);
    out.add_list("phone", &contact.phones);
    out.add_list("email", &contact.emails);
}

/// A `ddms:service`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    version: DdmsVersion,
    contact: ContactInfo,
    extensible: ExtensibleAttributes,
    warnings: Warnings,
}

impl Service {
    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        let (contact, extensible, dropped) = read_contact_entity(ctx, EntityKind::Service, element)?;
        Self::build(ctx, contact, extensible, dropped)
    }

    /// Construct from values
    pub fn new(ctx: &VersionContext, contact: ContactInfo, extensible: ExtensibleAttributes) -> Result<Self> {
        Self::build(ctx, contact, extensible, Vec::new())
    }

    fn build(
        ctx: &VersionContext,
        contact: ContactInfo,
        extensible: ExtensibleAttributes,
        dropped: Vec<ValidationMessage>,
    ) -> Result<Self> {
        let contact = build_contact_entity(ctx, EntityKind::Service, contact, &extensible)?;
        let mut warnings = Warnings::new();
        warnings.extend(dropped);
        let component = Self {
            version: ctx.version(),
            contact,
            extensible,
            warnings,
        };
        trace_built(&component);
        Ok(component)
    }

    /// Names, phones and emails
    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }
}

impl Component for Service {
    fn name(&self) -> &str {
        EntityKind::Service.element_name(self.version)
    }

    fn version(&self) -> DdmsVersion {
        self.version
    }

    fn warnings(&self) -> &[ValidationMessage] {
        self.warnings.as_slice()
    }

    fn extensible_attributes(&self) -> Option<&ExtensibleAttributes> {
        Some(&self.extensible)
    }

    fn to_element(&self) -> Element {
        contact_element(self, &self.contact, &self.extensible)
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        write_contact(out, &self.contact);
    }
}

/// Builder for [`Service`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceBuilder {
    /// Names, phones and emails
    pub contact: ContactInfo,
    /// Extensible attributes
    pub extensible: ExtensibleAttributes,
}

impl From<&Service> for ServiceBuilder {
    fn from(component: &Service) -> Self {
        Self {
            contact: component.contact.clone(),
            extensible: component.extensible.clone(),
        }
    }
}

impl Builder for ServiceBuilder {
    type Target = Service;

    fn is_empty(&self) -> bool {
        self.contact.is_empty() && self.extensible.is_empty()
    }

    fn build(&self, ctx: &VersionContext) -> Result<Service> {
        Service::new(ctx, self.contact.clone(), self.extensible.clone())
    }
}

/// A `ddms:unknown` (3.0+)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unknown {
    version: DdmsVersion,
    contact: ContactInfo,
    extensible: ExtensibleAttributes,
    warnings: Warnings,
}

impl Unknown {
    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        let (contact, extensible, dropped) = read_contact_entity(ctx, EntityKind::Unknown, element)?;
        Self::build(ctx, contact, extensible, dropped)
    }

    /// Construct from values
    pub fn new(ctx: &VersionContext, contact: ContactInfo, extensible: ExtensibleAttributes) -> Result<Self> {
        Self::build(ctx, contact, extensible, Vec::new())
    }

    fn build(
        ctx: &VersionContext,
        contact: ContactInfo,
        extensible: ExtensibleAttributes,
        dropped: Vec<ValidationMessage>,
    ) -> Result<Self> {
        let contact = build_contact_entity(ctx, EntityKind::Unknown, contact, &extensible)?;
        let mut warnings = Warnings::new();
        warnings.extend(dropped);
        let component = Self {
            version: ctx.version(),
            contact,
            extensible,
            warnings,
        };
        trace_built(&component);
        Ok(component)
    }

    /// Names, phones and emails
    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }
}

impl Component for Unknown {
    fn name(&self) -> &str {
        EntityKind::Unknown.element_name(self.version)
    }

    fn version(&self) -> DdmsVersion {
        self.version
    }

    fn warnings(&self) -> &[ValidationMessage] {
        self.warnings.as_slice()
    }

    fn extensible_attributes(&self) -> Option<&ExtensibleAttributes> {
        Some(&self.extensible)
    }

    fn to_element(&self) -> Element {
        contact_element(self, &self.contact, &self.extensible)
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        write_contact(out, &self.contact);
    }
}

/// Builder for [`Unknown`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnknownBuilder {
    /// Names, phones and emails
    pub contact: ContactInfo,
    /// Extensible attributes
    pub extensible: ExtensibleAttributes,
}

impl From<&Unknown> for UnknownBuilder {
    fn from(component: &Unknown) -> Self {
        Self {
            contact: component.contact.clone(),
            extensible: component.extensible.clone(),
        }
    }
}

impl Builder for UnknownBuilder {
    type Target = Unknown;

    fn is_empty(&self) -> bool {
        self.contact.is_empty() && self.extensible.is_empty()
    }

    fn build(&self, ctx: &VersionContext) -> Result<Unknown> {
        Unknown::new(ctx, self.contact.clone(), self.extensible.clone())
    }
}

/// The entity inside a producer role
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProducerEntity {
    /// A person
    Person(Person),
    /// An organization
    Organization(Organization),
    /// A service
    Service(Service),
    /// An unknown entity
    Unknown(Unknown),
}

impl ProducerEntity {
    /// Read whichever entity an element holds
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        let kind = EntityKind::from_element_name(ctx.version(), element.local_name()).ok_or_else(|| {
            Error::invalid(
                "producer entity",
                "element",
                format!("{} is not a producer entity in DDMS {}.", element.qname, ctx.version()),
            )
        })?;
        Ok(match kind {
            EntityKind::Person => ProducerEntity::Person(Person::from_element(ctx, element)?),
            EntityKind::Organization => ProducerEntity::Organization(Organization::from_element(ctx, element)?),
            EntityKind::Service => ProducerEntity::Service(Service::from_element(ctx, element)?),
            EntityKind::Unknown => ProducerEntity::Unknown(Unknown::from_element(ctx, element)?),
        })
    }

    /// Which kind of entity this is
    pub fn kind(&self) -> EntityKind {
        match self {
            ProducerEntity::Person(_) => EntityKind::Person,
            ProducerEntity::Organization(_) => EntityKind::Organization,
            ProducerEntity::Service(_) => EntityKind::Service,
            ProducerEntity::Unknown(_) => EntityKind::Unknown,
        }
    }

    /// The entity as a component
    pub fn as_component(&self) -> &dyn Component {
        match self {
            ProducerEntity::Person(c) => c,
            ProducerEntity::Organization(c) => c,
            ProducerEntity::Service(c) => c,
            ProducerEntity::Unknown(c) => c,
        }
    }

    /// The entity's names
    pub fn names(&self) -> &[String] {
        match self {
            ProducerEntity::Person(c) => &c.contact.names,
            ProducerEntity::Organization(c) => &c.contact.names,
            ProducerEntity::Service(c) => &c.contact.names,
            ProducerEntity::Unknown(c) => &c.contact.names,
        }
    }
}

/// A producer role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerRole {
    version: DdmsVersion,
    role: ProducerRoleKind,
    entity: ProducerEntity,
    poc_types: Vec<String>,
    security: SecurityAttributes,
    warnings: Warnings,
}

impl ProducerRole {
    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        let role = ProducerRoleKind::from_str(element.local_name()).ok_or_else(|| {
            Error::invalid("ddms:creator", "element", format!("{} is not a producer role.", element.qname))
        })?;
        expect_element(ctx, element, NamespaceKind::Ddms, role.as_str())?;
        let name = qualified(NamespaceKind::Ddms, role.as_str());

        let rules = EntityKind::ALL.iter().fold(RuleSet::new(name.clone()), |rules, kind| {
            rules.rule(CardinalityRule::optional(kind.element_name(ctx.version())))
        });
        validate_child_elements(ctx, element, &[NamespaceKind::Ddms], &rules)?;
        if element.children.len() != 1 {
            return Err(Error::CardinalityViolation {
                parent: name,
                child: "producer entity".to_string(),
                actual: element.children.len(),
                min: 1,
                max: Some(1),
            });
        }
        let entity = ProducerEntity::from_element(ctx, &element.children[0])?;

        let mut attributes = AttributeClassifier::new(ctx, &ROLE_PROFILE).classify(&name, element);
        let security = SecurityAttributes::new(ctx, &name, std::mem::take(&mut attributes.markings))?;
        let poc_types = attributes.parameter(POC_TYPE);
        Self::build(
            ctx,
            role,
            entity,
            &split_tokens(&poc_types),
            security,
            attributes.dropped,
        )
    }

    /// Construct from values
    pub fn new<S: AsRef<str>>(
        ctx: &VersionContext,
        role: ProducerRoleKind,
        entity: ProducerEntity,
        poc_types: &[S],
        security: SecurityAttributes,
    ) -> Result<Self> {
        Self::build(ctx, role, entity, poc_types, security, Vec::new())
    }

    fn build<S: AsRef<str>>(
        ctx: &VersionContext,
        role: ProducerRoleKind,
        entity: ProducerEntity,
        poc_types: &[S],
        security: SecurityAttributes,
        dropped: Vec<ValidationMessage>,
    ) -> Result<Self> {
        let name = qualified(NamespaceKind::Ddms, role.as_str());
        require_same_version(ctx, &name, entity.as_component())?;
        security.require_markings(&name)?;
        let poc_types: Vec<String> = poc_types
            .iter()
            .flat_map(|p| split_tokens(p.as_ref()))
            .map(str::to_string)
            .collect();
        let joined = join_tokens(&poc_types);
        validate_enumeration(&name, &POC_TYPE.to_string(), &joined, &POC_TYPES)?;
        let classifier = AttributeClassifier::new(ctx, &ROLE_PROFILE);
        classifier.check_parameter(POC_TYPE, &joined)?;
        classifier.check_markings(&name, &security)?;

        let mut warnings = Warnings::new();
        warnings.extend(dropped);
        warnings.absorb(&format!("/{}", name), entity.as_component());
        let component = Self {
            version: ctx.version(),
            role,
            entity,
            poc_types,
            security,
            warnings,
        };
        trace_built(&component);
        Ok(component)
    }

    /// Which role this is
    pub fn role(&self) -> ProducerRoleKind {
        self.role
    }

    /// The producer entity
    pub fn entity(&self) -> &ProducerEntity {
        &self.entity
    }

    /// `ism:pocType` tokens
    pub fn poc_types(&self) -> &[String] {
        &self.poc_types
    }
}

impl Component for ProducerRole {
    fn name(&self) -> &str {
        self.role.as_str()
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
        vec![self.entity.as_component()]
    }

    fn to_element(&self) -> Element {
        let ctx = self.context();
        let mut element = new_element(ctx, NamespaceKind::Ddms, self.name());
        if let Some(qname) = POC_TYPE.qname(ctx) {
            element.set_attribute(qname, join_tokens(&self.poc_types));
        }
        self.security.apply_to(ctx, &mut element);
        element.add_child(self.entity.as_component().to_element());
        element
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        let entity = self.entity.as_component();
        out.add("entityType", entity.name());
        let entries = entity.output_entries(&out.label(""), out.options());
        out.extend(entries);
        out.add("pocType", join_tokens(&self.poc_types));
        self.security.write_output(out);
    }
}

/// Builder for [`ProducerRole`]
///
/// Holds one entity builder per kind; `entity_type` picks the one committed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProducerRoleBuilder {
    /// Which role to build
    pub role: ProducerRoleKind,
    /// Which entity to build
    pub entity_type: EntityKind,
    /// Person fields
    pub person: PersonBuilder,
    /// Organization fields
    pub organization: OrganizationBuilder,
    /// Service fields
    pub service: ServiceBuilder,
    /// Unknown entity fields
    pub unknown: UnknownBuilder,
    /// `ism:pocType` tokens
    pub poc_types: Vec<String>,
    /// Security markings
    pub security: SecurityAttributesBuilder,
}

impl ProducerRoleBuilder {
    /// An empty builder for a role
    pub fn new(role: ProducerRoleKind, entity_type: EntityKind) -> Self {
        Self {
            role,
            entity_type,
            ..Self::default()
        }
    }

    fn entity_is_empty(&self) -> bool {
        match self.entity_type {
            EntityKind::Person => self.person.is_empty(),
            EntityKind::Organization => self.organization.is_empty(),
            EntityKind::Service => self.service.is_empty(),
            EntityKind::Unknown => self.unknown.is_empty(),
        }
    }

    fn commit_entity(&self, ctx: &VersionContext) -> Result<Option<ProducerEntity>> {
        Ok(match self.entity_type {
            EntityKind::Person => self.person.commit(ctx)?.map(ProducerEntity::Person),
            EntityKind::Organization => self.organization.commit(ctx)?.map(ProducerEntity::Organization),
            EntityKind::Service => self.service.commit(ctx)?.map(ProducerEntity::Service),
            EntityKind::Unknown => self.unknown.commit(ctx)?.map(ProducerEntity::Unknown),
        })
    }
}

impl From<&ProducerRole> for ProducerRoleBuilder {
    fn from(component: &ProducerRole) -> Self {
        let mut builder = Self::new(component.role, component.entity.kind());
        match &component.entity {
            ProducerEntity::Person(c) => builder.person = c.into(),
            ProducerEntity::Organization(c) => builder.organization = c.into(),
            ProducerEntity::Service(c) => builder.service = c.into(),
            ProducerEntity::Unknown(c) => builder.unknown = c.into(),
        }
        builder.poc_types = component.poc_types.clone();
        builder.security = (&component.security).into();
        builder
    }
}

impl Builder for ProducerRoleBuilder {
    type Target = ProducerRole;

    fn is_empty(&self) -> bool {
        self.entity_is_empty()
            && self.poc_types.iter().all(|p| p.trim().is_empty())
            && self.security.is_empty()
    }

    fn build(&self, ctx: &VersionContext) -> Result<ProducerRole> {
        let name = qualified(NamespaceKind::Ddms, self.role.as_str());
        let entity = self
            .commit_entity(ctx)?
            .ok_or_else(|| Error::invalid(&name, "entity", "is required."))?;
        let security = self.security.build_for(ctx, &name)?;
        ProducerRole::new(ctx, self.role, entity, &self.poc_types, security)
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

    fn person(ctx: &VersionContext) -> Person {
        Person::new(
            ctx,
            ContactInfo::new(&["Brian", "BU"]).with_phones(&["703-885-1000"]),
            "Uri",
            "123",
            &["DISA".to_string()],
            ExtensibleAttributes::new(),
        )
        .unwrap()
    }

    fn creator(ctx: &VersionContext, poc_types: &[&str]) -> Result<ProducerRole> {
        ProducerRole::new(
            ctx,
            ProducerRoleKind::Creator,
            ProducerEntity::Person(person(ctx)),
            poc_types,
            markings(ctx),
        )
    }

    #[test]
    fn test_entity_names_by_version() {
        assert_eq!(EntityKind::Person.element_name(DdmsVersion::V3_1), "Person");
        assert_eq!(EntityKind::Person.element_name(DdmsVersion::V4_0_1), "person");
        assert_eq!(
            EntityKind::from_element_name(DdmsVersion::V2_0, "Organization"),
            Some(EntityKind::Organization)
        );
        assert_eq!(EntityKind::from_element_name(DdmsVersion::V5_0, "Organization"), None);
    }

    #[test]
    fn test_round_trip_every_version() {
        for ctx in VersionContext::catalog() {
            let role = creator(ctx, &[]).unwrap();
            let parsed = Document::from_string(&role.to_xml()).unwrap().into_root();
            assert_eq!(ProducerRole::from_element(ctx, &parsed).unwrap(), role);
        }
    }

    #[test]
    fn test_poc_type_names_invalid_token() {
        let ctx = VersionContext::get(DdmsVersion::V4_1);
        assert!(creator(ctx, &["DoD-Dist-B"]).is_ok());
        let err = creator(ctx, &["DoD-Dist-B Unknown"]).unwrap_err();
        assert!(matches!(err, Error::InvalidComponent { .. }));
        assert!(err.to_string().contains("'Unknown'"));
        assert!(!err.to_string().contains("'DoD-Dist-B'"));
    }

    #[test]
    fn test_poc_type_version_gate() {
        let ctx = VersionContext::get(DdmsVersion::V4_0_1);
        let err = creator(ctx, &["ICD-710"]).unwrap_err();
        assert!(matches!(err, Error::VersionNotSupported { ref name, .. } if name == "ism:pocType"));
    }

    #[test]
    fn test_poc_type_from_markup() {
        let ctx = VersionContext::get(DdmsVersion::V4_1);
        let role = creator(ctx, &["ICD-710", "DoD-Dist-A"]).unwrap();
        let element = role.to_element();
        assert_eq!(
            element.get_attribute_ns(ctx.ism_namespace(), "pocType"),
            Some("ICD-710 DoD-Dist-A")
        );
        assert_eq!(ProducerRole::from_element(ctx, &element).unwrap().poc_types().len(), 2);
    }

    #[test]
    fn test_person_requires_surname() {
        let ctx = VersionContext::latest();
        let err = Person::new(ctx, ContactInfo::new(&["Brian"]), " ", "", &[], ExtensibleAttributes::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidComponent { ref field, .. } if field == "surname"));
        let err = Person::new(ctx, ContactInfo::default(), "Uri", "", &[], ExtensibleAttributes::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidComponent { ref field, .. } if field == "name"));
    }

    #[test]
    fn test_repeated_surname_in_markup() {
        let ctx = VersionContext::latest();
        let mut element = person(ctx).to_element();
        element.add_child(new_element(ctx, NamespaceKind::Ddms, "surname").with_text("Again"));
        let err = Person::from_element(ctx, &element).unwrap_err();
        assert!(matches!(err, Error::CardinalityViolation { ref child, actual: 2, .. } if child == "surname"));
    }

    #[test]
    fn test_affiliations_by_version() {
        let affiliations = vec!["DISA".to_string(), "DoD".to_string()];
        let build = |ctx: &VersionContext| {
            Person::new(ctx, ContactInfo::new(&["Brian"]), "Uri", "", &affiliations, ExtensibleAttributes::new())
        };
        let err = build(VersionContext::get(DdmsVersion::V3_1)).unwrap_err();
        assert!(matches!(err, Error::CardinalityViolation { ref child, .. } if child == "affiliation"));
        assert!(build(VersionContext::get(DdmsVersion::V4_0_1)).is_ok());
    }

    #[test]
    fn test_organization_gates() {
        let v31 = VersionContext::get(DdmsVersion::V3_1);
        let err = Organization::new(v31, ContactInfo::new(&["DISA"]), Vec::new(), "DISA", ExtensibleAttributes::new())
            .unwrap_err();
        assert!(matches!(err, Error::VersionNotSupported { ref name, .. } if name == "ddms:acronym"));
        assert!(SubOrganization::new(v31, "sub", SecurityAttributes::empty()).is_err());

        let v41 = VersionContext::get(DdmsVersion::V4_1);
        let sub = SubOrganization::new(v41, "sub", markings(v41)).unwrap();
        let org = Organization::new(v41, ContactInfo::new(&["DISA"]), vec![sub], "DISA", ExtensibleAttributes::new())
            .unwrap();
        let parsed = Document::from_string(&org.to_xml()).unwrap().into_root();
        assert_eq!(Organization::from_element(v41, &parsed).unwrap(), org);
    }

    #[test]
    fn test_unknown_entity_since_3_0() {
        let contact = ContactInfo::new(&["Unknown Entity"]);
        let v20 = VersionContext::get(DdmsVersion::V2_0);
        assert!(matches!(
            Unknown::new(v20, contact.clone(), ExtensibleAttributes::new()),
            Err(Error::VersionNotSupported { .. })
        ));
        let v30 = VersionContext::get(DdmsVersion::V3_0);
        assert_eq!(Unknown::new(v30, contact, ExtensibleAttributes::new()).unwrap().name(), "Unknown");
    }

    #[test]
    fn test_entity_extensible_attributes() {
        let ctx = VersionContext::latest();
        let extensible = ExtensibleAttributes::new().with("urn:ext", "role", "lead");
        let service = Service::new(ctx, ContactInfo::new(&["Ingest"]), extensible).unwrap();
        let parsed = Document::from_string(&service.to_xml()).unwrap().into_root();
        let reparsed = Service::from_element(ctx, &parsed).unwrap();
        assert_eq!(reparsed.extensible_attributes().unwrap().get("urn:ext", "role"), Some("lead"));

        let clash = ExtensibleAttributes::new().with(ctx.ddms_namespace(), "name", "x");
        assert!(Service::new(ctx, ContactInfo::new(&["Ingest"]), clash).is_err());
    }

    #[test]
    fn test_missing_entity() {
        let ctx = VersionContext::latest();
        let mut element = creator(ctx, &[]).unwrap().to_element();
        element.children.clear();
        assert!(matches!(
            ProducerRole::from_element(ctx, &element),
            Err(Error::CardinalityViolation { actual: 0, .. })
        ));
    }

    #[test]
    fn test_output() {
        let ctx = VersionContext::latest();
        let text = creator(ctx, &[]).unwrap().to_text();
        assert!(text.starts_with("creator.entityType: person\ncreator.name: Brian\ncreator.name: BU\n"));
        assert!(text.contains("creator.surname: Uri\n"));
        assert!(text.ends_with("creator.classification: U\ncreator.ownerProducer: USA\n"));
    }

    #[test]
    fn test_builder_switches_entity() {
        let ctx = VersionContext::get(DdmsVersion::V4_1);
        let role = creator(ctx, &["ICD-710"]).unwrap();
        let mut builder = ProducerRoleBuilder::from(&role);
        assert_eq!(builder.commit(ctx).unwrap(), Some(role));

        builder.entity_type = EntityKind::Service;
        assert!(builder.commit(ctx).is_err());
        builder.service.contact = ContactInfo::new(&["Ingest"]);
        let committed = builder.commit(ctx).unwrap().unwrap();
        assert_eq!(committed.entity().kind(), EntityKind::Service);
        assert!(ProducerRoleBuilder::default().commit(ctx).unwrap().is_none());
    }
}
