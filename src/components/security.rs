//! The resource-level `ddms:security` element

use crate::components::access::{Access, AccessBuilder};
use crate::documents::Element;
use crate::error::{Error, Result, ValidationMessage};
use crate::output::OutputWriter;
use crate::validators::attributes::{AttributeClassifier, AttributeProfile, IsmParameter, ParameterName, ParameterSpec};
use crate::validators::base::{
    expect_element, new_element, qualified, require_same_version, trace_built, validate_child_elements,
    write_child, Component, Warnings,
};
use crate::validators::builders::Builder;
use crate::validators::cardinality::{CardinalityRule, RuleSet};
use crate::validators::security::{SecurityAttributes, SecurityAttributesBuilder};
use crate::version::{DdmsVersion, NamespaceKind, VersionContext};
use serde::{Deserialize, Serialize};

const EXCLUDE_FROM_ROLLUP: ParameterName = ParameterName::Ism(IsmParameter::ExcludeFromRollup);

const PROFILE: AttributeProfile = AttributeProfile {
    parameters: &[ParameterSpec::since(EXCLUDE_FROM_ROLLUP, DdmsVersion::V3_0)],
    markings_since: Some(DdmsVersion::V2_0),
    extensible_since: None,
};

fn security_rules(ctx: &VersionContext) -> RuleSet {
    RuleSet::new(qualified(NamespaceKind::Ddms, Security::NAME))
        .rule_if(ctx.features().access, CardinalityRule::optional(Access::NAME))
}

fn rollup_required(ctx: &VersionContext) -> bool {
    ctx.is_at_least(DdmsVersion::V3_0)
}

/// A `ddms:security`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Security {
    version: DdmsVersion,
    access: Option<Access>,
    security: SecurityAttributes,
    warnings: Warnings,
}

impl Security {
    /// Element name
    pub const NAME: &'static str = "security";

    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        expect_element(ctx, element, NamespaceKind::Ddms, Self::NAME)?;
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        validate_child_elements(ctx, element, &[NamespaceKind::Ntk], &security_rules(ctx))?;
        let mut attributes = AttributeClassifier::new(ctx, &PROFILE).classify(&name, element);
        let security = SecurityAttributes::new(ctx, &name, std::mem::take(&mut attributes.markings))?;

        if rollup_required(ctx) {
            let rollup = attributes.parameter(EXCLUDE_FROM_ROLLUP);
            match rollup.trim() {
                "true" => {}
                "" => return Err(Error::invalid(&name, EXCLUDE_FROM_ROLLUP.to_string(), "is required.")),
                other => {
                    return Err(Error::invalid(
                        &name,
                        EXCLUDE_FROM_ROLLUP.to_string(),
                        format!("must have a fixed value of \"true\", but was \"{}\".", other),
                    ))
                }
            }
        }

        let access = match ctx.ntk_namespace() {
            Some(ntk) => element
                .find_child(ntk, Access::NAME)
                .map(|e| Access::from_element(ctx, e))
                .transpose()?,
            None => None,
        };
        Self::build(ctx, access, security, attributes.dropped)
    }

    /// Construct from values; `ism:excludeFromRollup` is set automatically from 3.0
    pub fn new(ctx: &VersionContext, access: Option<Access>, security: SecurityAttributes) -> Result<Self> {
        Self::build(ctx, access, security, Vec::new())
    }

    fn build(
        ctx: &VersionContext,
        access: Option<Access>,
        security: SecurityAttributes,
        dropped: Vec<ValidationMessage>,
    ) -> Result<Self> {
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        security.require_markings(&name)?;
        if let Some(access) = &access {
            ctx.require(
                ctx.features().access,
                &qualified(NamespaceKind::Ntk, Access::NAME),
                DdmsVersion::V4_1,
            )?;
            require_same_version(ctx, &name, access)?;
        }
        AttributeClassifier::new(ctx, &PROFILE).check_markings(&name, &security)?;

        let mut warnings = Warnings::new();
        warnings.extend(dropped);
        if let Some(access) = &access {
            warnings.absorb(&format!("/{}", name), access);
        }
        let component = Self {
            version: ctx.version(),
            access,
            security,
            warnings,
        };
        trace_built(&component);
        Ok(component)
    }

    /// The access control subtree, if any
    pub fn access(&self) -> Option<&Access> {
        self.access.as_ref()
    }

    /// The value of `ism:excludeFromRollup`, empty before 3.0
    pub fn exclude_from_rollup(&self) -> &'static str {
        if rollup_required(self.context()) {
            "true"
        } else {
            ""
        }
    }
}

impl Component for Security {
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
        self.access.iter().map(|a| a as &dyn Component).collect()
    }

    fn to_element(&self) -> Element {
        let ctx = self.context();
        let mut element = new_element(ctx, NamespaceKind::Ddms, Self::NAME);
        if let Some(qname) = EXCLUDE_FROM_ROLLUP.qname(ctx) {
            element.set_attribute(qname, self.exclude_from_rollup());
        }
        self.security.apply_to(ctx, &mut element);
        if let Some(access) = &self.access {
            element.add_child(access.to_element());
        }
        element
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        out.add("excludeFromRollup", self.exclude_from_rollup());
        self.security.write_output(out);
        write_child(out, "access", self.access.as_ref());
    }
}

/// Builder for [`Security`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityBuilder {
    /// Need-to-know access control (4.1+)
    pub access: AccessBuilder,
    /// Security markings
    pub security: SecurityAttributesBuilder,
}

impl From<&Security> for SecurityBuilder {
    fn from(component: &Security) -> Self {
        Self {
            access: component.access.as_ref().map(Into::into).unwrap_or_default(),
            security: (&component.security).into(),
        }
    }
}

impl Builder for SecurityBuilder {
    type Target = Security;

    fn is_empty(&self) -> bool {
        self.access.is_empty() && self.security.is_empty()
    }

    fn build(&self, ctx: &VersionContext) -> Result<Security> {
        let security = self.security.build_for(ctx, "ddms:security")?;
        Security::new(ctx, self.access.commit(ctx)?, security)
    }
}
