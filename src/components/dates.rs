//! Resource dates

use crate::components::identifier::ddms_attribute;
use crate::documents::Element;
use crate::error::{Result, ValidationMessage};
use crate::output::OutputWriter;
use crate::validators::attributes::{AttributeClassifier, AttributeProfile, ParameterName, ParameterSpec};
use crate::validators::base::{expect_element, new_element, qualified, trace_built, Component, Warnings};
use crate::validators::builders::Builder;
use crate::validators::helpers::validate_date;
use crate::version::{DdmsVersion, NamespaceKind, VersionContext};
use serde::{Deserialize, Serialize};

/// The date attributes in output order
const FIELDS: [(&str, DdmsVersion); 6] = [
    ("created", DdmsVersion::V2_0),
    ("posted", DdmsVersion::V2_0),
    ("validTil", DdmsVersion::V2_0),
    ("infoCutOff", DdmsVersion::V2_0),
    ("approvedOn", DdmsVersion::V3_1),
    ("receivedOn", DdmsVersion::V4_0_1),
];

const PROFILE: AttributeProfile = AttributeProfile {
    parameters: &[
        ParameterSpec::always(ParameterName::Ddms("created")),
        ParameterSpec::always(ParameterName::Ddms("posted")),
        ParameterSpec::always(ParameterName::Ddms("validTil")),
        ParameterSpec::always(ParameterName::Ddms("infoCutOff")),
        ParameterSpec::since(ParameterName::Ddms("approvedOn"), DdmsVersion::V3_1),
        ParameterSpec::since(ParameterName::Ddms("receivedOn"), DdmsVersion::V4_0_1),
    ],
    markings_since: None,
    extensible_since: None,
};

/// Raw date values, one per attribute
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateValues {
    /// `ddms:created`
    pub created: String,
    /// `ddms:posted`
    pub posted: String,
    /// `ddms:validTil`
    pub valid_til: String,
    /// `ddms:infoCutOff`
    pub info_cut_off: String,
    /// `ddms:approvedOn` (3.1+)
    pub approved_on: String,
    /// `ddms:receivedOn` (4.0.1+)
    pub received_on: String,
}

impl DateValues {
    fn as_array(&self) -> [&str; 6] {
        [
            &self.created,
            &self.posted,
            &self.valid_til,
            &self.info_cut_off,
            &self.approved_on,
            &self.received_on,
        ]
        .map(|v| v.as_str())
    }

    fn trimmed(&self) -> Self {
        Self {
            created: self.created.trim().to_string(),
            posted: self.posted.trim().to_string(),
            valid_til: self.valid_til.trim().to_string(),
            info_cut_off: self.info_cut_off.trim().to_string(),
            approved_on: self.approved_on.trim().to_string(),
            received_on: self.received_on.trim().to_string(),
        }
    }

    /// Whether no date is set
    pub fn is_empty(&self) -> bool {
        self.as_array().iter().all(|v| v.trim().is_empty())
    }
}

/// A `ddms:dates`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dates {
    version: DdmsVersion,
    values: DateValues,
    warnings: Warnings,
}

impl Dates {
    /// Element name
    pub const NAME: &'static str = "dates";

    /// Read from an element
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        expect_element(ctx, element, NamespaceKind::Ddms, Self::NAME)?;
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let attributes = AttributeClassifier::new(ctx, &PROFILE).classify(&name, element);
        let get = |local: &'static str| attributes.parameter(ParameterName::Ddms(local));
        let values = DateValues {
            created: get("created"),
            posted: get("posted"),
            valid_til: get("validTil"),
            info_cut_off: get("infoCutOff"),
            approved_on: get("approvedOn"),
            received_on: get("receivedOn"),
        };
        Self::build(ctx, values, attributes.dropped)
    }

    /// Construct from values
    pub fn new(ctx: &VersionContext, values: DateValues) -> Result<Self> {
        Self::build(ctx, values, Vec::new())
    }

    fn build(ctx: &VersionContext, values: DateValues, dropped: Vec<ValidationMessage>) -> Result<Self> {
        let name = qualified(NamespaceKind::Ddms, Self::NAME);
        let values = values.trimmed();
        let set = FIELDS.iter().zip(values.as_array()).filter(|(_, v)| !v.is_empty());
        for ((field, _), value) in set.clone() {
            validate_date(&name, field, value)?;
        }
        let classifier = AttributeClassifier::new(ctx, &PROFILE);
        for ((field, _), value) in set {
            classifier.check_parameter(ParameterName::Ddms(field), value)?;
        }

        let mut warnings = Warnings::new();
        warnings.extend(dropped);
        if values.is_empty() {
            warnings.push(
                format!("A completely empty {} element was found.", name),
                format!("/{}", name),
            );
        }

        let component = Self {
            version: ctx.version(),
            values,
            warnings,
        };
        trace_built(&component);
        Ok(component)
    }

    /// The date values
    pub fn values(&self) -> &DateValues {
        &self.values
    }

    /// The creation date
    pub fn created(&self) -> &str {
        &self.values.created
    }
}

impl Component for Dates {
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
        let mut element = new_element(ctx, NamespaceKind::Ddms, Self::NAME);
        for ((field, _), value) in FIELDS.iter().zip(self.values.as_array()) {
            element.set_attribute(ddms_attribute(ctx, field), value);
        }
        element
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        for ((field, _), value) in FIELDS.iter().zip(self.values.as_array()) {
            out.add(field, value);
        }
    }
}

/// Builder for [`Dates`]
pub type DatesBuilder = DateValues;

impl From<&Dates> for DateValues {
    fn from(component: &Dates) -> Self {
        component.values.clone()
    }
}

impl Builder for DateValues {
    type Target = Dates;

    fn is_empty(&self) -> bool {
        DateValues::is_empty(self)
    }

    fn build(&self, ctx: &VersionContext) -> Result<Dates> {
        Dates::new(ctx, self.clone())
    }
}
