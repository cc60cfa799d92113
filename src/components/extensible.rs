//! Extensible elements from vocabularies outside DDMS

use crate::documents::{Document, Element};
use crate::error::{Error, Result, ValidationMessage};
use crate::output::OutputWriter;
use crate::validators::base::{trace_built, Component, Warnings};
use crate::validators::builders::Builder;
use crate::version::{DdmsVersion, NamespaceKind, VersionContext};
use serde::{Deserialize, Serialize};

const COMPONENT: &str = "extensible element";

/// A foreign element carried through unchanged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensibleElement {
    version: DdmsVersion,
    element: Element,
    warnings: Warnings,
}

impl ExtensibleElement {
    /// Wrap an element, which must live in a namespace other than ddms, ism or ntk
    pub fn from_element(ctx: &VersionContext, element: &Element) -> Result<Self> {
        let namespace = element
            .namespace()
            .ok_or_else(|| Error::invalid(COMPONENT, "namespace", "is required."))?;
        let reserved = [NamespaceKind::Ddms, NamespaceKind::Ism, NamespaceKind::Ntk]
            .into_iter()
            .find(|kind| ctx.namespace(*kind) == Some(namespace));
        if let Some(kind) = reserved {
            return Err(Error::invalid(
                COMPONENT,
                "namespace",
                format!("cannot be the {} namespace.", kind.default_prefix()),
            ));
        }

        let component = Self {
            version: ctx.version(),
            element: element.clone(),
            warnings: Warnings::new(),
        };
        trace_built(&component);
        Ok(component)
    }

    /// The wrapped element
    pub fn element(&self) -> &Element {
        &self.element
    }
}

impl Component for ExtensibleElement {
    fn name(&self) -> &str {
        self.element.local_name()
    }

    fn version(&self) -> DdmsVersion {
        self.version
    }

    fn warnings(&self) -> &[ValidationMessage] {
        self.warnings.as_slice()
    }

    fn namespace(&self) -> &str {
        self.element.namespace().unwrap_or_default()
    }

    fn qualified_name(&self) -> String {
        self.element.qname.to_string()
    }

    fn to_element(&self) -> Element {
        self.element.clone()
    }

    fn write_output(&self, out: &mut OutputWriter<'_>) {
        out.add("layer", "true");
    }

    fn output_label(&self) -> &str {
        "extensible"
    }
}

/// Builder for [`ExtensibleElement`], holding the element as markup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensibleElementBuilder {
    /// The element as XML
    pub xml: String,
}

impl From<&ExtensibleElement> for ExtensibleElementBuilder {
    fn from(component: &ExtensibleElement) -> Self {
        Self { xml: component.to_xml() }
    }
}

impl Builder for ExtensibleElementBuilder {
    type Target = ExtensibleElement;

    fn is_empty(&self) -> bool {
        self.xml.trim().is_empty()
    }

    fn build(&self, ctx: &VersionContext) -> Result<ExtensibleElement> {
        let element = Document::from_string(&self.xml)?.into_root();
        ExtensibleElement::from_element(ctx, &element)
    }
}
