//! XML element tree
//!
//! This module is the markup boundary: documents are read into a
//! namespace-resolved [`Element`] tree and written back from one. Components
//! never see raw markup, only this tree.

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::namespaces::{PrefixMap, QName};
use indexmap::IndexMap;
use quick_xml::escape::escape;

/// XML Element in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Element qualified name
    pub qname: QName,
    /// Element attributes, in document order
    pub attributes: IndexMap<QName, String>,
    /// Text content (if any)
    pub text: Option<String>,
    /// Child elements
    pub children: Vec<Element>,
}

impl Element {
    /// Create a new element
    pub fn new(qname: QName) -> Self {
        Self {
            qname,
            attributes: IndexMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Create a new element in a namespace
    pub fn namespaced(namespace: &str, local_name: &str) -> Self {
        Self::new(QName::namespaced(namespace, local_name))
    }

    /// Get the local name of the element
    pub fn local_name(&self) -> &str {
        &self.qname.local_name
    }

    /// Get the namespace of the element
    pub fn namespace(&self) -> Option<&str> {
        self.qname.namespace.as_deref()
    }

    /// Get an unqualified attribute value by name
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&QName::local(name))
            .map(|s| s.as_str())
    }

    /// Get an attribute value by namespace and local name
    pub fn get_attribute_ns(&self, namespace: &str, name: &str) -> Option<&str> {
        self.attributes
            .get(&QName::namespaced(namespace, name))
            .map(|s| s.as_str())
    }

    /// Set an attribute, skipping empty values
    pub fn set_attribute(&mut self, qname: QName, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.attributes.insert(qname, value);
        }
    }

    /// Builder-style attribute setter, skipping empty values
    pub fn with_attribute(mut self, qname: QName, value: impl Into<String>) -> Self {
        self.set_attribute(qname, value);
        self
    }

    /// Add a child element
    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Set text content
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Builder-style text setter; empty text leaves the element empty
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if !text.is_empty() {
            self.text = Some(text);
        }
        self
    }

    /// Text content, or the empty string
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Find child elements by namespace and local name
    pub fn find_children(&self, namespace: &str, local_name: &str) -> Vec<&Element> {
        self.children
            .iter()
            .filter(|e| e.local_name() == local_name && e.namespace() == Some(namespace))
            .collect()
    }

    /// Find the first child element with the given namespace and local name
    pub fn find_child(&self, namespace: &str, local_name: &str) -> Option<&Element> {
        self.children
            .iter()
            .find(|e| e.local_name() == local_name && e.namespace() == Some(namespace))
    }

    /// Text of the first matching child, or the empty string
    pub fn child_text(&self, namespace: &str, local_name: &str) -> String {
        self.find_child(namespace, local_name)
            .map(|e| e.text_or_empty().to_string())
            .unwrap_or_default()
    }

    /// Texts of every matching child
    pub fn child_texts(&self, namespace: &str, local_name: &str) -> Vec<String> {
        self.find_children(namespace, local_name)
            .into_iter()
            .map(|e| e.text_or_empty().to_string())
            .collect()
    }

    /// Write this element as a standalone document fragment
    ///
    /// Every namespace used anywhere in the tree is declared on this element.
    pub fn to_xml_string(&self, prefixes: &PrefixMap) -> String {
        let mut prefixes = prefixes.clone();
        let mut used = Vec::new();
        self.collect_namespaces(&mut used);
        for uri in &used {
            prefixes.ensure(uri);
        }

        let mut out = String::new();
        self.write(&prefixes, Some(used.as_slice()), 0, &mut out);
        out
    }

    fn collect_namespaces(&self, used: &mut Vec<String>) {
        let names = std::iter::once(&self.qname).chain(self.attributes.keys());
        for ns in names.filter_map(|q| q.namespace.as_ref()) {
            if PrefixMap::needs_declaration(ns) && !used.contains(ns) {
                used.push(ns.clone());
            }
        }
        for child in &self.children {
            child.collect_namespaces(used);
        }
    }

    fn write(&self, prefixes: &PrefixMap, declare: Option<&[String]>, depth: usize, out: &mut String) {
        let indent = "    ".repeat(depth);
        let name = prefixes.qualify(&self.qname);
        out.push_str(&indent);
        out.push('<');
        out.push_str(&name);

        if let Some(uris) = declare {
            for uri in uris {
                if let Some(prefix) = prefixes.prefix(uri) {
                    out.push_str(&format!(" xmlns:{}=\"{}\"", prefix, escape(uri.as_str())));
                }
            }
        }
        for (qname, value) in &self.attributes {
            out.push_str(&format!(" {}=\"{}\"", prefixes.qualify(qname), escape(value.as_str())));
        }

        let text = self.text.as_deref().filter(|t| !t.is_empty());
        match (text, self.children.is_empty()) {
            (None, true) => out.push_str(" />\n"),
            (Some(text), true) => {
                out.push_str(&format!(">{}</{}>\n", escape(text), name));
            }
            (text, false) => {
                out.push('>');
                if let Some(text) = text {
                    out.push_str(&escape(text));
                }
                out.push('\n');
                for child in &self.children {
                    child.write(prefixes, None, depth + 1, out);
                }
                out.push_str(&indent);
                out.push_str(&format!("</{}>\n", name));
            }
        }
    }
}

/// XML Document representation
#[derive(Debug, Clone)]
pub struct Document {
    /// Root element of the document
    pub root: Element,
}

impl Document {
    /// Parse an XML document from a string with default limits
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse(xml, &Limits::default())
    }

    /// Parse an XML document from a string
    pub fn parse(xml: &str, limits: &Limits) -> Result<Self> {
        limits.check_document_bytes(xml.len())?;

        let doc = roxmltree::Document::parse(xml)
            .map_err(|e| Error::Xml(format!("Error parsing XML: {}", e)))?;
        let root = Self::convert(doc.root_element(), limits, 1)?;
        tracing::trace!(root = %root.qname, "parsed markup document");
        Ok(Self { root })
    }

    fn convert(node: roxmltree::Node<'_, '_>, limits: &Limits, depth: usize) -> Result<Element> {
        limits.check_depth(depth)?;

        let tag = node.tag_name();
        let mut element = Element::new(QName::new(tag.namespace(), tag.name()));

        limits.check_attributes(node.attributes().count())?;
        for attr in node.attributes() {
            element
                .attributes
                .insert(QName::new(attr.namespace(), attr.name()), attr.value().to_string());
        }

        let mut text = String::new();
        for child in node.children() {
            if child.is_element() {
                element.add_child(Self::convert(child, limits, depth + 1)?);
            } else if child.is_text() {
                text.push_str(child.text().unwrap_or(""));
            }
        }
        let text = text.trim();
        limits.check_text_bytes(text.len())?;
        if !text.is_empty() {
            element.set_text(text);
        }

        Ok(element)
    }

    /// Get the root element
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Take the root element
    pub fn into_root(self) -> Element {
        self.root
    }
}
