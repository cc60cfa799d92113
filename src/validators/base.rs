//! Base component infrastructure
//!
//! This module provides the [`Component`] contract every metadata element
//! implements, the [`Warnings`] list components carry, and the helpers used
//! while reading components out of an element tree.

use crate::config::Config;
use crate::documents::Element;
use crate::error::{Error, Result, ValidationMessage};
use crate::namespaces::QName;
use crate::output::{render_html, render_text, OutputEntry, OutputOptions, OutputWriter};
use crate::validators::attributes::ExtensibleAttributes;
use crate::validators::cardinality::{ChildOccurrence, RuleSet};
use crate::validators::security::SecurityAttributes;
use crate::version::{DdmsVersion, NamespaceKind, VersionContext};
use std::fmt;

/// Advisory findings attached to a successfully built component
///
/// Warnings never take part in equality: two components with the same
/// validated fields are equal whatever their warnings.
#[derive(Debug, Clone, Default)]
pub struct Warnings(Vec<ValidationMessage>);

impl PartialEq for Warnings {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for Warnings {}

impl Warnings {
    /// An empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a warning located at `locator`
    pub fn push(&mut self, text: impl Into<String>, locator: impl Into<String>) {
        self.0.push(ValidationMessage::warning(text, locator));
    }

    /// Add prepared messages
    pub fn extend(&mut self, messages: impl IntoIterator<Item = ValidationMessage>) {
        self.0.extend(messages);
    }

    /// Take over a child's warnings, prefixing their locators with `parent`
    pub fn absorb(&mut self, parent: &str, child: &dyn Component) {
        self.0.extend(
            child
                .warnings()
                .iter()
                .cloned()
                .map(|message| message.with_parent(parent)),
        );
    }

    /// The warnings, in the order they were raised
    pub fn as_slice(&self) -> &[ValidationMessage] {
        &self.0
    }

    /// Whether there are no warnings
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of warnings
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Contract implemented by every metadata component
///
/// Components are validated when they are constructed, so every value of a
/// type implementing this trait is valid for [`Component::version`]. Output
/// methods are projections of that state and never fail.
pub trait Component: fmt::Debug {
    /// Local name of the element in the component's version
    fn name(&self) -> &str;

    /// Vocabulary of the element
    fn namespace_kind(&self) -> NamespaceKind {
        NamespaceKind::Ddms
    }

    /// The version the component was validated against
    fn version(&self) -> DdmsVersion;

    /// Warnings raised by this component and its descendants
    fn warnings(&self) -> &[ValidationMessage];

    /// Security markings, for components that carry them
    fn security_attributes(&self) -> Option<&SecurityAttributes> {
        None
    }

    /// Extensible attributes, for components that carry them
    fn extensible_attributes(&self) -> Option<&ExtensibleAttributes> {
        None
    }

    /// Nested components, in output order
    fn children(&self) -> Vec<&dyn Component> {
        Vec::new()
    }

    /// Project the component onto an element tree
    fn to_element(&self) -> Element;

    /// Add output entries under the writer's label
    fn write_output(&self, out: &mut OutputWriter<'_>);

    /// The version context the component was validated against
    fn context(&self) -> &'static VersionContext {
        VersionContext::get(self.version())
    }

    /// Namespace URI of the element
    fn namespace(&self) -> &str {
        self.context().namespace(self.namespace_kind()).unwrap_or_default()
    }

    /// Name with its conventional prefix, e.g. `ddms:title`
    fn qualified_name(&self) -> String {
        qualified(self.namespace_kind(), self.name())
    }

    /// Locator step of the element, e.g. `/ddms:title`
    fn locator(&self) -> String {
        format!("/{}", self.qualified_name())
    }

    /// Output entries labelled under `label`
    fn output_entries(&self, label: &str, options: &OutputOptions) -> Vec<OutputEntry> {
        let mut out = OutputWriter::new(label, options);
        self.write_output(&mut out);
        out.finish()
    }

    /// Serialize with default prefixes
    fn to_xml(&self) -> String {
        self.to_xml_with(&Config::default())
    }

    /// Serialize with configured prefixes
    fn to_xml_with(&self, config: &Config) -> String {
        self.to_element()
            .to_xml_string(&config.prefix_map(self.context()))
    }

    /// Render as HTML `meta` tags
    fn to_html(&self) -> String {
        self.to_html_with(&Config::default())
    }

    /// Render as HTML `meta` tags with configured output options
    fn to_html_with(&self, config: &Config) -> String {
        render_html(&self.output_entries(self.output_label(), &config.output))
    }

    /// Render as `name: value` text
    fn to_text(&self) -> String {
        self.to_text_with(&Config::default())
    }

    /// Render as text with configured output options
    fn to_text_with(&self, config: &Config) -> String {
        render_text(&self.output_entries(self.output_label(), &config.output))
    }

    /// Label used when the component is rendered on its own
    fn output_label(&self) -> &str {
        self.name()
    }
}

/// A name with the conventional prefix of its vocabulary
pub fn qualified(kind: NamespaceKind, local_name: &str) -> String {
    format!("{}:{}", kind.default_prefix(), local_name)
}

/// Create an element in a vocabulary of the version
pub fn new_element(ctx: &VersionContext, kind: NamespaceKind, local_name: &str) -> Element {
    Element::new(QName::new(ctx.namespace(kind), local_name))
}

/// Check that an element has the expected name in the version
pub fn expect_element(
    ctx: &VersionContext,
    element: &Element,
    kind: NamespaceKind,
    local_name: &str,
) -> Result<()> {
    let namespace = ctx.namespace(kind);
    if element.local_name() != local_name || element.namespace() != namespace {
        return Err(Error::invalid(
            qualified(kind, local_name),
            "element",
            format!(
                "is expected in DDMS {}, but {} was found.",
                ctx.version(),
                element.qname
            ),
        ));
    }
    Ok(())
}

/// Display form of a child element name for messages
pub fn display_name(ctx: &VersionContext, qname: &QName) -> String {
    match qname
        .namespace
        .as_deref()
        .and_then(|uri| ctx.namespaces().kind_of(uri))
    {
        Some(kind) => qualified(kind, &qname.local_name),
        None => qname.to_string(),
    }
}

/// Reject child elements that are not legal under a parent in the version
///
/// A child is legal when it lives in one of `kinds` and its local name has a
/// rule in `rules`.
pub fn check_child_elements(
    ctx: &VersionContext,
    element: &Element,
    kinds: &[NamespaceKind],
    rules: &RuleSet,
) -> Result<()> {
    for child in &element.children {
        let in_vocabulary = kinds
            .iter()
            .any(|kind| ctx.namespace(*kind).map_or(false, |uri| child.qname.is_in(uri)));
        if !in_vocabulary || !rules.is_legal(child.local_name()) {
            return Err(Error::UnexpectedChildType {
                parent: rules.parent().to_string(),
                child: display_name(ctx, &child.qname),
            });
        }
    }
    Ok(())
}

/// Check the children of an element: legality, then occurrence counts
pub fn validate_child_elements(
    ctx: &VersionContext,
    element: &Element,
    kinds: &[NamespaceKind],
    rules: &RuleSet,
) -> Result<()> {
    check_child_elements(ctx, element, kinds, rules)?;
    let occurrences: Vec<_> = element
        .children
        .iter()
        .map(|child| ChildOccurrence::new(child.local_name()))
        .collect();
    rules.validate(&occurrences)
}

/// Require a nested component to have been validated against the same version
pub fn require_same_version(ctx: &VersionContext, parent: &str, child: &dyn Component) -> Result<()> {
    if child.version() != ctx.version() {
        return Err(Error::invalid(
            parent,
            child.qualified_name(),
            format!(
                "was built for DDMS {}, but the parent is being built for DDMS {}.",
                child.version(),
                ctx.version()
            ),
        ));
    }
    Ok(())
}

/// Write nested components under `name`, numbered per the index level
pub fn write_children<C: Component>(out: &mut OutputWriter<'_>, name: &str, children: &[C]) {
    let options = out.options();
    for (i, child) in children.iter().enumerate() {
        let suffix = options.index_level.suffix(i, children.len());
        let label = out.label(&format!("{}{}", name, suffix));
        out.extend(child.output_entries(&label, options));
    }
}

/// Write an optional nested component under `name`
pub fn write_child<C: Component>(out: &mut OutputWriter<'_>, name: &str, child: Option<&C>) {
    if let Some(child) = child {
        let label = out.label(name);
        out.extend(child.output_entries(&label, out.options()));
    }
}

/// Log a successful construction
pub fn trace_built(component: &dyn Component) {
    tracing::trace!(
        component = %component.qualified_name(),
        version = %component.version(),
        warnings = component.warnings().len(),
        "component validated"
    );
}
