//! Need-to-know access control (`ntk:Access`, DDMS 4.1+)
//!
//! Individuals, groups and profiles share one shape: a system name plus at
//! least one value, each with its own markings. [`AccessList`] marker types
//! select the element names.

use crate::documents::Element;
use crate::error::{Error, Result, ValidationMessage};
use crate::output::OutputWriter;
use crate::validators::attributes::{AttributeClassifier, AttributeProfile, ParameterName, ParameterSpec};
use crate::validators::base::{
    expect_element, new_element, qualified, require_same_version, trace_built, validate_child_elements,
    write_children, Component, Warnings,
};
use crate::validators::builders::{all_empty, commit_all, Builder};
use crate::validators::cardinality::{CardinalityRule, RuleSet};
use crate::validators::helpers::require_value;
use crate::validators::security::{SecurityAttributes, SecurityAttributesBuilder};
use crate::version::{DdmsVersion, NamespaceKind, VersionContext};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

const VOCABULARY: ParameterName = ParameterName::Ntk("vocabulary");

const MARKED: AttributeProfile = AttributeProfile {
    parameters: &[],
    markings_since: Some(DdmsVersion::V4_1),
    extensible_since: None,
};

const PROFILE_VALUE: AttributeProfile = AttributeProfile {
    parameters: &[ParameterSpec::always(VOCABULARY)],
    markings_since: Some(DdmsVersion::V4_1),
    extensible_since: None,
};

fn require_access(ctx: &VersionContext, local_name: &str) -> Result<()> {
    ctx.require(
        ctx.features().access,
        &qualified(NamespaceKind::Ntk, local_name),
        DdmsVersion::V4_1,
    )
}

/// Element names of one access list
pub trait AccessList: fmt::Debug + Clone + Copy + Default + PartialEq + Eq + 'static {
    /// The list wrapper, e.g. `AccessIndividualList`
    const LIST: &'static str;
    /// One entry, e.g. `AccessIndividual`
    const ENTRY: &'static str;
    /// One value, e.g. `AccessIndividualValue`
    const VALUE: &'static str;
    /// Output label of the list
    const LABEL: &'static str;
    /// Whether values carry `ntk:vocabulary`
    const VOCABULARY: bool = false;
}

/// `ntk:AccessIndividualList`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualList;

impl AccessList for IndividualList {
    const LIST: &'static str = "AccessIndividualList";
    const ENTRY: &'static str = "AccessIndividual";
    const VALUE: &'static str = "AccessIndividualValue";
    const LABEL: &'static str = "individual";
}

/// `ntk:AccessGroupList`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupList;

impl AccessList for GroupList {
    const LIST: &'static str = "AccessGroupList";
    const ENTRY: &'static str = "AccessGroup";
    const VALUE: &'static str = "AccessGroupValue";
    const LABEL: &'static str = "group";
}

/// `ntk:AccessProfileList`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileList;

impl AccessList for ProfileList {
    const LIST: &'static str = "AccessProfileList";
    const ENTRY: &'static str = "AccessProfile";
    const VALUE: &'static str = "AccessProfileValue";
    const LABEL: &'static str = "profile";
    const VOCABULARY: bool = true;
}

/// An `ntk:AccessSystemName`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemName {
    version: DdmsVersion,
    value: String,
    security: SecurityAttributes,
    warnings: Warnings,
}

impl SystemName {
    /// Element name
    pub const NAME: &'static str = "AccessSystemName";

    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        require_access(ctx, Self::NAME)?;
        expect_element(ctx, element, NamespaceKind::Ntk, Self::NAME)?;
        let name = qualified(NamespaceKind::Ntk, Self::NAME);
        let mut attributes = AttributeClassifier::new(ctx, &MARKED).classify(&name, element);
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
        let name = qualified(NamespaceKind::Ntk, Self::NAME);
        let value = value.trim();
        require_value(&name, "value", value)?;
        security.require_markings(&name)?;
        require_access(ctx, Self::NAME)?;
        AttributeClassifier::new(ctx, &MARKED).check_markings(&name, &security)?;

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

    /// The system name
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Component for SystemName {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn namespace_kind(&self) -> NamespaceKind {
        NamespaceKind::Ntk
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
        let mut element = new_element(ctx, NamespaceKind::Ntk, Self::NAME).with_text(&self.value);
        self.security.apply_to(ctx, &mut element);
        element
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        out.add_value(&self.value);
        self.security.write_output(out);
    }
}

/// Builder for [`SystemName`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemNameBuilder {
    /// The system name
    pub value: String,
    /// Security markings
    pub security: SecurityAttributesBuilder,
}

impl From<&SystemName> for SystemNameBuilder {
    fn from(component: &SystemName) -> Self {
        Self {
            value: component.value.clone(),
            security: (&component.security).into(),
        }
    }
}

impl Builder for SystemNameBuilder {
    type Target = SystemName;

    fn is_empty(&self) -> bool {
        self.value.trim().is_empty() && self.security.is_empty()
    }

    fn build(&self, ctx: &VersionContext) -> Result<SystemName> {
        let security = self.security.build_for(ctx, "ntk:AccessSystemName")?;
        SystemName::new(ctx, &self.value, security)
    }
}

/// One value of an access entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessValue<K: AccessList> {
    version: DdmsVersion,
    value: String,
    vocabulary: String,
    security: SecurityAttributes,
    warnings: Warnings,
    list: PhantomData<K>,
}

/// A value of an individual entry
pub type IndividualValue = AccessValue<IndividualList>;
/// A value of a group entry
pub type GroupValue = AccessValue<GroupList>;
/// A value of a profile entry, qualified by a vocabulary
pub type ProfileValue = AccessValue<ProfileList>;

impl<K: AccessList> AccessValue<K> {
    fn profile() -> &'static AttributeProfile {
        if K::VOCABULARY {
            &PROFILE_VALUE
        } else {
            &MARKED
        }
    }

    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        require_access(ctx, K::VALUE)?;
        expect_element(ctx, element, NamespaceKind::Ntk, K::VALUE)?;
        let name = qualified(NamespaceKind::Ntk, K::VALUE);
        let mut attributes = AttributeClassifier::new(ctx, Self::profile()).classify(&name, element);
        let security = SecurityAttributes::new(ctx, &name, std::mem::take(&mut attributes.markings))?;
        Self::build(
            ctx,
            element.text_or_empty(),
            &attributes.parameter(VOCABULARY),
            security,
            attributes.dropped,
        )
    }

    /// Construct from values; `vocabulary` is only used by profile values
    pub fn new(ctx: &VersionContext, value: &str, vocabulary: &str, security: SecurityAttributes) -> Result<Self> {
        Self::build(ctx, value, vocabulary, security, Vec::new())
    }

    fn build(
        ctx: &VersionContext,
        value: &str,
        vocabulary: &str,
        security: SecurityAttributes,
        dropped: Vec<ValidationMessage>,
    ) -> Result<Self> {
        let name = qualified(NamespaceKind::Ntk, K::VALUE);
        let (value, vocabulary) = (value.trim(), vocabulary.trim());
        require_value(&name, "value", value)?;
        if K::VOCABULARY {
            require_value(&name, &VOCABULARY.to_string(), vocabulary)?;
        } else if !vocabulary.is_empty() {
            return Err(Error::invalid(&name, VOCABULARY.to_string(), "is only allowed on profile values."));
        }
        security.require_markings(&name)?;
        require_access(ctx, K::VALUE)?;
        AttributeClassifier::new(ctx, Self::profile()).check_markings(&name, &security)?;

        let mut warnings = Warnings::new();
        warnings.extend(dropped);
        let component = Self {
            version: ctx.version(),
            value: value.to_string(),
            vocabulary: vocabulary.to_string(),
            security,
            warnings,
            list: PhantomData,
        };
        trace_built(&component);
        Ok(component)
    }

    /// The value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The vocabulary of a profile value
    pub fn vocabulary(&self) -> &str {
        &self.vocabulary
    }
}

impl<K: AccessList> Component for AccessValue<K> {
    fn name(&self) -> &str {
        K::VALUE
    }

    fn namespace_kind(&self) -> NamespaceKind {
        NamespaceKind::Ntk
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
        let mut element = new_element(ctx, NamespaceKind::Ntk, K::VALUE).with_text(&self.value);
        if let Some(qname) = VOCABULARY.qname(ctx) {
            element.set_attribute(qname, &self.vocabulary);
        }
        self.security.apply_to(ctx, &mut element);
        element
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        out.add_value(&self.value);
        out.add("vocabulary", &self.vocabulary);
        self.security.write_output(out);
    }
}

/// Builder for [`AccessValue`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, bound = "K: AccessList")]
pub struct AccessValueBuilder<K> {
    /// The value
    pub value: String,
    /// The vocabulary of a profile value
    pub vocabulary: String,
    /// Security markings
    pub security: SecurityAttributesBuilder,
    #[serde(skip)]
    list: PhantomData<K>,
}

impl<K: AccessList> AccessValueBuilder<K> {
    /// Start a builder for a value
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }
}

impl<K: AccessList> From<&AccessValue<K>> for AccessValueBuilder<K> {
    fn from(component: &AccessValue<K>) -> Self {
        Self {
            value: component.value.clone(),
            vocabulary: component.vocabulary.clone(),
            security: (&component.security).into(),
            list: PhantomData,
        }
    }
}

impl<K: AccessList> Builder for AccessValueBuilder<K> {
    type Target = AccessValue<K>;

    fn is_empty(&self) -> bool {
        self.value.trim().is_empty() && self.vocabulary.trim().is_empty() && self.security.is_empty()
    }

    fn build(&self, ctx: &VersionContext) -> Result<AccessValue<K>> {
        let security = self.security.build_for(ctx, &qualified(NamespaceKind::Ntk, K::VALUE))?;
        AccessValue::new(ctx, &self.value, &self.vocabulary, security)
    }
}

fn entry_rules<K: AccessList>() -> RuleSet {
    RuleSet::new(qualified(NamespaceKind::Ntk, K::ENTRY))
        .rule(CardinalityRule::optional(SystemName::NAME))
        .rule(CardinalityRule::any(K::VALUE))
}

/// One individual, group or profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessEntry<K: AccessList> {
    version: DdmsVersion,
    system_name: SystemName,
    values: Vec<AccessValue<K>>,
    security: SecurityAttributes,
    warnings: Warnings,
}

/// An `ntk:AccessIndividual`
pub type Individual = AccessEntry<IndividualList>;
/// An `ntk:AccessGroup`
pub type Group = AccessEntry<GroupList>;
/// An `ntk:AccessProfile`
pub type Profile = AccessEntry<ProfileList>;

impl<K: AccessList> AccessEntry<K> {
    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        require_access(ctx, K::ENTRY)?;
        expect_element(ctx, element, NamespaceKind::Ntk, K::ENTRY)?;
        let name = qualified(NamespaceKind::Ntk, K::ENTRY);
        validate_child_elements(ctx, element, &[NamespaceKind::Ntk], &entry_rules::<K>())?;
        let mut attributes = AttributeClassifier::new(ctx, &MARKED).classify(&name, element);
        let security = SecurityAttributes::new(ctx, &name, std::mem::take(&mut attributes.markings))?;

        let ntk = ctx.ntk_namespace().unwrap_or_default();
        let system_name = element
            .find_child(ntk, SystemName::NAME)
            .map(|e| SystemName::from_element(ctx, e))
            .transpose()?;
        let values = element
            .find_children(ntk, K::VALUE)
            .into_iter()
            .map(|e| AccessValue::from_element(ctx, e))
            .collect::<Result<Vec<_>>>()?;
        Self::build(ctx, system_name, values, security, attributes.dropped)
    }

    /// Construct from values
    pub fn new(
        ctx: &VersionContext,
        system_name: SystemName,
        values: Vec<AccessValue<K>>,
        security: SecurityAttributes,
    ) -> Result<Self> {
        Self::build(ctx, Some(system_name), values, security, Vec::new())
    }

    fn build(
        ctx: &VersionContext,
        system_name: Option<SystemName>,
        values: Vec<AccessValue<K>>,
        security: SecurityAttributes,
        dropped: Vec<ValidationMessage>,
    ) -> Result<Self> {
        let name = qualified(NamespaceKind::Ntk, K::ENTRY);
        let system_name = system_name
            .ok_or_else(|| Error::invalid(&name, qualified(NamespaceKind::Ntk, SystemName::NAME), "is required."))?;
        if values.is_empty() {
            return Err(Error::invalid(
                &name,
                qualified(NamespaceKind::Ntk, K::VALUE),
                "requires at least one value.",
            ));
        }
        security.require_markings(&name)?;
        require_access(ctx, K::ENTRY)?;
        require_same_version(ctx, &name, &system_name)?;
        for value in &values {
            require_same_version(ctx, &name, value)?;
        }
        AttributeClassifier::new(ctx, &MARKED).check_markings(&name, &security)?;

        let mut warnings = Warnings::new();
        warnings.extend(dropped);
        let parent = format!("/{}", name);
        warnings.absorb(&parent, &system_name);
        for value in &values {
            warnings.absorb(&parent, value);
        }
        let component = Self {
            version: ctx.version(),
            system_name,
            values,
            security,
            warnings,
        };
        trace_built(&component);
        Ok(component)
    }

    /// The system name
    pub fn system_name(&self) -> &SystemName {
        &self.system_name
    }

    /// The values
    pub fn values(&self) -> &[AccessValue<K>] {
        &self.values
    }
}

impl<K: AccessList> Component for AccessEntry<K> {
    fn name(&self) -> &str {
        K::ENTRY
    }

    fn namespace_kind(&self) -> NamespaceKind {
        NamespaceKind::Ntk
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
        std::iter::once(&self.system_name as &dyn Component)
            .chain(self.values.iter().map(|v| v as &dyn Component))
            .collect()
    }

    fn to_element(&self) -> Element {
        let ctx = self.context();
        let mut element = new_element(ctx, NamespaceKind::Ntk, K::ENTRY);
        self.security.apply_to(ctx, &mut element);
        for child in self.children() {
            element.add_child(child.to_element());
        }
        element
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        let label = out.label("systemName");
        let entries = self.system_name.output_entries(&label, out.options());
        out.extend(entries);
        write_children(out, "value", &self.values);
        self.security.write_output(out);
    }
}

/// Builder for [`AccessEntry`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, bound = "K: AccessList")]
pub struct AccessEntryBuilder<K> {
    /// The system name
    pub system_name: SystemNameBuilder,
    /// The values
    pub values: Vec<AccessValueBuilder<K>>,
    /// Security markings
    pub security: SecurityAttributesBuilder,
}

impl<K: AccessList> From<&AccessEntry<K>> for AccessEntryBuilder<K> {
    fn from(component: &AccessEntry<K>) -> Self {
        Self {
            system_name: (&component.system_name).into(),
            values: component.values.iter().map(Into::into).collect(),
            security: (&component.security).into(),
        }
    }
}

impl<K: AccessList> Builder for AccessEntryBuilder<K> {
    type Target = AccessEntry<K>;

    fn is_empty(&self) -> bool {
        self.system_name.is_empty() && all_empty(&self.values) && self.security.is_empty()
    }

    fn build(&self, ctx: &VersionContext) -> Result<AccessEntry<K>> {
        let security = self.security.build_for(ctx, &qualified(NamespaceKind::Ntk, K::ENTRY))?;
        let values = commit_all(&self.values, ctx)?;
        AccessEntry::build(ctx, self.system_name.commit(ctx)?, values, security, Vec::new())
    }
}

fn access_rules() -> RuleSet {
    RuleSet::new(qualified(NamespaceKind::Ntk, Access::NAME))
        .rule(CardinalityRule::optional(IndividualList::LIST))
        .rule(CardinalityRule::optional(GroupList::LIST))
        .rule(CardinalityRule::optional(ProfileList::LIST))
}

fn read_list<K: AccessList>(ctx: &VersionContext, element: &Element) -> Result<Vec<AccessEntry<K>>> {
    let ntk = ctx.ntk_namespace().unwrap_or_default();
    let Some(list) = element.find_child(ntk, K::LIST) else {
        return Ok(Vec::new());
    };
    let rules = RuleSet::new(qualified(NamespaceKind::Ntk, K::LIST)).rule(CardinalityRule::at_least_one(K::ENTRY));
    validate_child_elements(ctx, list, &[NamespaceKind::Ntk], &rules)?;
    list.children
        .iter()
        .map(|entry| AccessEntry::from_element(ctx, entry))
        .collect()
}

fn list_element<K: AccessList>(ctx: &VersionContext, entries: &[AccessEntry<K>]) -> Option<Element> {
    if entries.is_empty() {
        return None;
    }
    let mut list = new_element(ctx, NamespaceKind::Ntk, K::LIST);
    for entry in entries {
        list.add_child(entry.to_element());
    }
    Some(list)
}

/// An `ntk:Access`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Access {
    version: DdmsVersion,
    individuals: Vec<Individual>,
    groups: Vec<Group>,
    profiles: Vec<Profile>,
    security: SecurityAttributes,
    warnings: Warnings,
}

impl Access {
    /// Element name
    pub const NAME: &'static str = "Access";

    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        require_access(ctx, Self::NAME)?;
        expect_element(ctx, element, NamespaceKind::Ntk, Self::NAME)?;
        let name = qualified(NamespaceKind::Ntk, Self::NAME);
        validate_child_elements(ctx, element, &[NamespaceKind::Ntk], &access_rules())?;
        let mut attributes = AttributeClassifier::new(ctx, &MARKED).classify(&name, element);
        let security = SecurityAttributes::new(ctx, &name, std::mem::take(&mut attributes.markings))?;
        Self::build(
            ctx,
            read_list(ctx, element)?,
            read_list(ctx, element)?,
            read_list(ctx, element)?,
            security,
            attributes.dropped,
        )
    }

    /// Construct from values
    pub fn new(
        ctx: &VersionContext,
        individuals: Vec<Individual>,
        groups: Vec<Group>,
        profiles: Vec<Profile>,
        security: SecurityAttributes,
    ) -> Result<Self> {
        Self::build(ctx, individuals, groups, profiles, security, Vec::new())
    }

    fn build(
        ctx: &VersionContext,
        individuals: Vec<Individual>,
        groups: Vec<Group>,
        profiles: Vec<Profile>,
        security: SecurityAttributes,
        dropped: Vec<ValidationMessage>,
    ) -> Result<Self> {
        let name = qualified(NamespaceKind::Ntk, Self::NAME);
        security.require_markings(&name)?;
        require_access(ctx, Self::NAME)?;
        let entries: Vec<(&str, &dyn Component)> = individuals
            .iter()
            .map(|e| (IndividualList::LIST, e as &dyn Component))
            .chain(groups.iter().map(|e| (GroupList::LIST, e as &dyn Component)))
            .chain(profiles.iter().map(|e| (ProfileList::LIST, e as &dyn Component)))
            .collect();
        for (_, entry) in &entries {
            require_same_version(ctx, &name, *entry)?;
        }
        AttributeClassifier::new(ctx, &MARKED).check_markings(&name, &security)?;

        let mut warnings = Warnings::new();
        warnings.extend(dropped);
        if entries.is_empty() {
            warnings.push(
                format!("An {} element was found with no individual, group, or profile information.", name),
                format!("/{}", name),
            );
        }
        for (list, entry) in &entries {
            warnings.absorb(&format!("/{}/ntk:{}", name, list), *entry);
        }

        let component = Self {
            version: ctx.version(),
            individuals,
            groups,
            profiles,
            security,
            warnings,
        };
        trace_built(&component);
        Ok(component)
    }

    /// Individuals
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Groups
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Profiles
    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }
}

impl Component for Access {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn namespace_kind(&self) -> NamespaceKind {
        NamespaceKind::Ntk
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
        self.individuals
            .iter()
            .map(|e| e as &dyn Component)
            .chain(self.groups.iter().map(|e| e as &dyn Component))
            .chain(self.profiles.iter().map(|e| e as &dyn Component))
            .collect()
    }

    fn to_element(&self) -> Element {
        let ctx = self.context();
        let mut element = new_element(ctx, NamespaceKind::Ntk, Self::NAME);
        self.security.apply_to(ctx, &mut element);
        let lists = [
            list_element(ctx, &self.individuals),
            list_element(ctx, &self.groups),
            list_element(ctx, &self.profiles),
        ];
        for list in lists.into_iter().flatten() {
            element.add_child(list);
        }
        element
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        write_children(out, &format!("{}List.{}", IndividualList::LABEL, IndividualList::LABEL), &self.individuals);
        write_children(out, &format!("{}List.{}", GroupList::LABEL, GroupList::LABEL), &self.groups);
        write_children(out, &format!("{}List.{}", ProfileList::LABEL, ProfileList::LABEL), &self.profiles);
        self.security.write_output(out);
    }

    fn output_label(&self) -> &str {
        "access"
    }
}

/// Builder for [`Access`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessBuilder {
    /// Individuals
    pub individuals: Vec<AccessEntryBuilder<IndividualList>>,
    /// Groups
    pub groups: Vec<AccessEntryBuilder<GroupList>>,
    /// Profiles
    pub profiles: Vec<AccessEntryBuilder<ProfileList>>,
    /// Security markings
    pub security: SecurityAttributesBuilder,
}

impl From<&Access> for AccessBuilder {
    fn from(component: &Access) -> Self {
        Self {
            individuals: component.individuals.iter().map(Into::into).collect(),
            groups: component.groups.iter().map(Into::into).collect(),
            profiles: component.profiles.iter().map(Into::into).collect(),
            security: (&component.security).into(),
        }
    }
}

impl Builder for AccessBuilder {
    type Target = Access;

    fn is_empty(&self) -> bool {
        all_empty(&self.individuals)
            && all_empty(&self.groups)
            && all_empty(&self.profiles)
            && self.security.is_empty()
    }

    fn build(&self, ctx: &VersionContext) -> Result<Access> {
        let security = self.security.build_for(ctx, "ntk:Access")?;
        Access::new(
            ctx,
            commit_all(&self.individuals, ctx)?,
            commit_all(&self.groups, ctx)?,
            commit_all(&self.profiles, ctx)?,
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

    fn ctx() -> &'static VersionContext {
        VersionContext::get(DdmsVersion::V4_1)
    }

    fn markings() -> SecurityAttributes {
        SecurityAttributesBuilder::new()
            .with(SecurityAttribute::Classification, "U")
            .with(SecurityAttribute::OwnerProducer, "USA")
            .build_for(ctx(), "test")
            .unwrap()
    }

    fn system_name() -> SystemName {
        SystemName::new(ctx(), "DIAS", markings()).unwrap()
    }

    fn individual() -> Individual {
        let value = IndividualValue::new(ctx(), "user_2321889:Doe_John_H", "", markings()).unwrap();
        Individual::new(ctx(), system_name(), vec![value], markings()).unwrap()
    }

    fn profile() -> Profile {
        let value = ProfileValue::new(ctx(), "profile", "vocabulary", markings()).unwrap();
        Profile::new(ctx(), system_name(), vec![value], markings()).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let access = Access::new(ctx(), vec![individual()], Vec::new(), vec![profile()], markings()).unwrap();
        assert!(access.warnings().is_empty());
        let parsed = Document::from_string(&access.to_xml()).unwrap().into_root();
        assert_eq!(parsed.children.len(), 2);
        assert_eq!(parsed.children[1].local_name(), "AccessProfileList");
        assert_eq!(Access::from_element(ctx(), &parsed).unwrap(), access);
    }

    #[test]
    fn test_empty_access_warns() {
        let access = Access::new(ctx(), Vec::new(), Vec::new(), Vec::new(), markings()).unwrap();
        assert_eq!(access.warnings().len(), 1);
        assert_eq!(access.warnings()[0].locator, "/ntk:Access");
    }

    #[test]
    fn test_access_requires_markings() {
        let err = Access::new(ctx(), Vec::new(), Vec::new(), Vec::new(), SecurityAttributes::empty()).unwrap_err();
        assert!(matches!(err, Error::InvalidComponent { ref field, .. } if field == "ism:classification"));
    }

    #[test]
    fn test_version_gate() {
        let v40 = VersionContext::get(DdmsVersion::V4_0_1);
        let err = Access::new(v40, Vec::new(), Vec::new(), Vec::new(), markings()).unwrap_err();
        assert!(matches!(err, Error::VersionNotSupported { ref name, .. } if name == "ntk:Access"));
    }

    #[test]
    fn test_entry_requires_system_name_and_value() {
        let err = Individual::new(ctx(), system_name(), Vec::new(), markings()).unwrap_err();
        assert!(matches!(err, Error::InvalidComponent { ref field, .. } if field == "ntk:AccessIndividualValue"));

        let mut element = individual().to_element();
        element.children.remove(0);
        let err = Individual::from_element(ctx(), &element).unwrap_err();
        assert!(matches!(err, Error::InvalidComponent { ref field, .. } if field == "ntk:AccessSystemName"));
    }

    #[test]
    fn test_profile_value_needs_vocabulary() {
        let err = ProfileValue::new(ctx(), "profile", "", markings()).unwrap_err();
        assert!(matches!(err, Error::InvalidComponent { ref field, .. } if field == "ntk:vocabulary"));
        assert!(GroupValue::new(ctx(), "WISE/RODCA", "vocabulary", markings()).is_err());
    }

    #[test]
    fn test_output() {
        let access = Access::new(ctx(), vec![individual()], Vec::new(), Vec::new(), markings()).unwrap();
        let text = access.to_text();
        assert!(text.starts_with(
            "access.individualList.individual.systemName: DIAS\n\
             access.individualList.individual.systemName.classification: U\n"
        ));
        assert!(text.contains("access.individualList.individual.value: user_2321889:Doe_John_H\n"));
    }

    #[test]
    fn test_builder() {
        let access = Access::new(ctx(), vec![individual()], Vec::new(), vec![profile()], markings()).unwrap();
        let builder = AccessBuilder::from(&access);
        assert_eq!(builder.commit(ctx()).unwrap(), Some(access));

        let mut broken = builder.clone();
        broken.profiles[0].values[0].vocabulary.clear();
        assert!(broken.commit(ctx()).is_err());
        assert!(AccessBuilder::default().commit(ctx()).unwrap().is_none());
    }

    #[test]
    fn test_builder_snapshot() {
        use crate::validators::builders::{restore, snapshot};

        let access = Access::new(ctx(), vec![individual()], Vec::new(), vec![profile()], markings()).unwrap();
        let builder = AccessBuilder::from(&access);
        let restored: AccessBuilder = restore(&snapshot(&builder).unwrap()).unwrap();
        assert_eq!(restored, builder);
        assert_eq!(restored.commit(ctx()).unwrap(), Some(access));

        let entry: AccessEntryBuilder<GroupList> = restore("{}").unwrap();
        assert!(entry.is_empty());
        let value: AccessValueBuilder<ProfileList> = restore(r#"{"value": "profile"}"#).unwrap();
        assert_eq!(value.value, "profile");
        assert!(value.vocabulary.is_empty());
    }
}
