//! Temporal and virtual coverage

use crate::components::identifier::ddms_attribute;
use crate::documents::Element;
use crate::error::{Error, Result, ValidationMessage};
use crate::output::OutputWriter;
use crate::validators::attributes::{AttributeClassifier, AttributeProfile, ParameterName, ParameterSpec};
use crate::validators::base::{
    expect_element, new_element, qualified, trace_built, validate_child_elements, Component, Warnings,
};
use crate::validators::builders::Builder;
use crate::validators::cardinality::{CardinalityRule, RuleSet};
use crate::validators::helpers::{date_grammar, require_value};
use crate::validators::security::{SecurityAttributes, SecurityAttributesBuilder};
use crate::version::{DdmsVersion, NamespaceKind, VersionContext};
use serde::{Deserialize, Serialize};

const COVERAGE_PROFILE: AttributeProfile = AttributeProfile {
    parameters: &[],
    markings_since: Some(DdmsVersion::V3_0),
    extensible_since: None,
};

const TIME_PERIOD: &str = "TimePeriod";
const PERIOD_NAME: &str = "name";
const START: &str = "start";
const END: &str = "end";

/// Values accepted in place of a date
pub const EXTENDED_DATE_VALUES: [&str; 2] = ["Not Applicable", "Unknown"];

fn period_rules() -> RuleSet {
    RuleSet::new(qualified(NamespaceKind::Ddms, TIME_PERIOD))
        .rule(CardinalityRule::optional(PERIOD_NAME))
        .rule(CardinalityRule::exactly_one(START))
        .rule(CardinalityRule::exactly_one(END))
}

fn validate_period_bound(component: &str, field: &str, value: &str) -> Result<()> {
    if EXTENDED_DATE_VALUES.contains(&value) || date_grammar(value).is_some() {
        return Ok(());
    }
    Err(Error::invalid(
        component,
        field,
        format!(
            "must be a date or one of '{}', but was '{}'.",
            EXTENDED_DATE_VALUES.join("', '"),
            value
        ),
    ))
}

/// A `ddms:temporalCoverage`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalCoverage {
    version: DdmsVersion,
    period_name: String,
    start: String,
    end: String,
    security: SecurityAttributes,
    warnings: Warnings,
}

impl TemporalCoverage {
    /// Element name
    pub const NAME: &'static str = "temporalCoverage";

    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        expect_element(ctx, element, NamespaceKind::Ddms, Self::NAME)?;
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let mut attributes = AttributeClassifier::new(ctx, &COVERAGE_PROFILE).classify(&name, element);
        let security = SecurityAttributes::new(ctx, &name, std::mem::take(&mut attributes.markings))?;

        let ddms = ctx.ddms_namespace();
        let periods = element.find_children(ddms, TIME_PERIOD);
        if periods.len() != 1 || element.children.len() != 1 {
            return Err(Error::CardinalityViolation {
                parent: name,
                child: TIME_PERIOD.to_string(),
                actual: periods.len().max(element.children.len()),
                min: 1,
                max: Some(1),
            });
        }
        let period = periods[0];
        validate_child_elements(ctx, period, &[NamespaceKind::Ddms], &period_rules())?;
        Self::build(
            ctx,
            &period.child_text(ddms, PERIOD_NAME),
            &period.child_text(ddms, START),
            &period.child_text(ddms, END),
            security,
            attributes.dropped,
        )
    }

    /// Construct from values
    pub fn new(
        ctx: &VersionContext,
        period_name: &str,
        start: &str,
        end: &str,
        security: SecurityAttributes,
    ) -> Result<Self> {
        Self::build(ctx, period_name, start, end, security, Vec::new())
    }

    fn build(
        ctx: &VersionContext,
        period_name: &str,
        start: &str,
        end: &str,
        security: SecurityAttributes,
        dropped: Vec<ValidationMessage>,
    ) -> Result<Self> {
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let (period_name, start, end) = (period_name.trim(), start.trim(), end.trim());
        require_value(&name, START, start)?;
        require_value(&name, END, end)?;
        validate_period_bound(&name, START, start)?;
        validate_period_bound(&name, END, end)?;
        AttributeClassifier::new(ctx, &COVERAGE_PROFILE).check_markings(&name, &security)?;

        let mut warnings = Warnings::new();
        warnings.extend(dropped);
        let component = Self {
            version: ctx.version(),
            period_name: period_name.to_string(),
            start: start.to_string(),
            end: end.to_string(),
            security,
            warnings,
        };
        trace_built(&component);
        Ok(component)
    }

    /// The period name
    pub fn period_name(&self) -> &str {
        &self.period_name
    }

    /// The start date or extended value
    pub fn start(&self) -> &str {
        &self.start
    }

    /// The end date or extended value
    pub fn end(&self) -> &str {
        &self.end
    }
}

impl Component for TemporalCoverage {
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
        let mut period = new_element(ctx, NamespaceKind::Ddms, TIME_PERIOD);
        if !self.period_name.is_empty() {
            period.add_child(new_element(ctx, NamespaceKind::Ddms, PERIOD_NAME).with_text(&self.period_name));
        }
        period.add_child(new_element(ctx, NamespaceKind::Ddms, START).with_text(&self.start));
        period.add_child(new_element(ctx, NamespaceKind::Ddms, END).with_text(&self.end));

        let mut element = new_element(ctx, NamespaceKind::Ddms, Self::NAME);
        self.security.apply_to(ctx, &mut element);
        element.add_child(period);
        element
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        out.add(PERIOD_NAME, &self.period_name);
        out.add(START, &self.start);
        out.add(END, &self.end);
        self.security.write_output(out);
    }
}

/// Builder for [`TemporalCoverage`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalCoverageBuilder {
    /// The period name
    pub period_name: String,
    /// The start date
    pub start: String,
    /// The end date
    pub end: String,
    /// Security markings (3.0+)
    pub security: SecurityAttributesBuilder,
}

impl From<&TemporalCoverage> for TemporalCoverageBuilder {
    fn from(component: &TemporalCoverage) -> Self {
        Self {
            period_name: component.period_name.clone(),
            start: component.start.clone(),
            end: component.end.clone(),
            security: (&component.security).into(),
        }
    }
}

impl Builder for TemporalCoverageBuilder {
    type Target = TemporalCoverage;

    fn is_empty(&self) -> bool {
        [&self.period_name, &self.start, &self.end].iter().all(|v| v.trim().is_empty())
            && self.security.is_empty()
    }

    fn build(&self, ctx: &VersionContext) -> Result<TemporalCoverage> {
        let security = self.security.build_for(ctx, "ddms:temporalCoverage")?;
        TemporalCoverage::new(ctx, &self.period_name, &self.start, &self.end, security)
    }
}

const ADDRESS: ParameterName = ParameterName::Ddms("address");
const PROTOCOL: ParameterName = ParameterName::Ddms("protocol");

const VIRTUAL_PROFILE: AttributeProfile = AttributeProfile {
    parameters: &[ParameterSpec::always(ADDRESS), ParameterSpec::always(PROTOCOL)],
    markings_since: Some(DdmsVersion::V3_0),
    extensible_since: None,
};

/// A `ddms:virtualCoverage`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualCoverage {
    version: DdmsVersion,
    address: String,
    protocol: String,
    security: SecurityAttributes,
    warnings: Warnings,
}

impl VirtualCoverage {
    /// Element name
    pub const NAME: &'static str = "virtualCoverage";

    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        expect_element(ctx, element, NamespaceKind::Ddms, Self::NAME)?;
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let mut attributes = AttributeClassifier::new(ctx, &VIRTUAL_PROFILE).classify(&name, element);
        let security = SecurityAttributes::new(ctx, &name, std::mem::take(&mut attributes.markings))?;
        Self::build(
            ctx,
            &attributes.parameter(ADDRESS),
            &attributes.parameter(PROTOCOL),
            security,
            attributes.dropped,
        )
    }

    /// Construct from values
    pub fn new(ctx: &VersionContext, address: &str, protocol: &str, security: SecurityAttributes) -> Result<Self> {
        Self::build(ctx, address, protocol, security, Vec::new())
    }

    fn build(
        ctx: &VersionContext,
        address: &str,
        protocol: &str,
        security: SecurityAttributes,
        dropped: Vec<ValidationMessage>,
    ) -> Result<Self> {
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let (address, protocol) = (address.trim(), protocol.trim());
        if !address.is_empty() {
            require_value(&name, "protocol", protocol)?;
        }
        AttributeClassifier::new(ctx, &VIRTUAL_PROFILE).check_markings(&name, &security)?;

        let mut warnings = Warnings::new();
        warnings.extend(dropped);
        if address.is_empty() && protocol.is_empty() {
            warnings.push(
                format!("A completely empty {} element was found.", name),
                format!("/{}", name),
            );
        }
        let component = Self {
            version: ctx.version(),
            address: address.to_string(),
            protocol: protocol.to_string(),
            security,
            warnings,
        };
        trace_built(&component);
        Ok(component)
    }

    /// The network address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The network protocol
    pub fn protocol(&self) -> &str {
        &self.protocol
    }
}

impl Component for VirtualCoverage {
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
            .with_attribute(ddms_attribute(ctx, ADDRESS.local_name()), &self.address)
            .with_attribute(ddms_attribute(ctx, PROTOCOL.local_name()), &self.protocol);
        self.security.apply_to(ctx, &mut element);
        element
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        out.add("address", &self.address);
        out.add("protocol", &self.protocol);
        self.security.write_output(out);
    }
}

/// Builder for [`VirtualCoverage`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualCoverageBuilder {
    /// The network address
    pub address: String,
    /// The network protocol
    pub protocol: String,
    /// Security markings (3.0+)
    pub security: SecurityAttributesBuilder,
}

impl From<&VirtualCoverage> for VirtualCoverageBuilder {
    fn from(component: &VirtualCoverage) -> Self {
        Self {
            address: component.address.clone(),
            protocol: component.protocol.clone(),
            security: (&component.security).into(),
        }
    }
}

impl Builder for VirtualCoverageBuilder {
    type Target = VirtualCoverage;

    fn is_empty(&self) -> bool {
        self.address.trim().is_empty() && self.protocol.trim().is_empty() && self.security.is_empty()
    }

    fn build(&self, ctx: &VersionContext) -> Result<VirtualCoverage> {
        let security = self.security.build_for(ctx, "ddms:virtualCoverage")?;
        VirtualCoverage::new(ctx, &self.address, &self.protocol, security)
    }
}
