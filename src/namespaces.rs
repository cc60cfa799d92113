//! XML namespace handling
//!
//! This module provides qualified names and the prefix map used when a
//! component tree is written back out. Prefixes are always re-derived from the
//! version's namespace table at output time.

use crate::version::{NamespaceKind, VersionContext};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// XML Namespace URI
pub type NamespaceUri = String;

/// Namespace prefix
pub type Prefix = String;

/// The `xml` namespace, implicitly bound to the `xml` prefix
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Qualified name (QName) - combination of namespace and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<NamespaceUri>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a new QName
    pub fn new(namespace: Option<impl Into<String>>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(|s| s.into()),
            local_name: local_name.into(),
        }
    }

    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }

    /// Get the namespace URI, or the empty string
    pub fn namespace_str(&self) -> &str {
        self.namespace.as_deref().unwrap_or("")
    }

    /// Check whether this name lives in `uri`
    pub fn is_in(&self, uri: &str) -> bool {
        self.namespace.as_deref() == Some(uri)
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// Namespace URI to prefix bindings used for output
///
/// Known vocabularies take their prefix from the version table (optionally
/// overridden by configuration); other namespaces get `ns1`, `ns2`, ... in the
/// order they are first seen.
#[derive(Debug, Clone, Default)]
pub struct PrefixMap {
    by_uri: IndexMap<NamespaceUri, Prefix>,
    generated: usize,
}

impl PrefixMap {
    /// Create an empty prefix map
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the bindings of a version, applying prefix overrides
    pub fn for_version(ctx: &VersionContext, overrides: &IndexMap<NamespaceKind, Prefix>) -> Self {
        let mut map = Self::new();
        for (kind, uri) in ctx.namespaces().bindings() {
            let prefix = overrides
                .get(&kind)
                .cloned()
                .unwrap_or_else(|| kind.default_prefix().to_string());
            map.add(prefix, uri);
        }
        map
    }

    /// Add a binding; an existing binding for the URI wins
    pub fn add(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.by_uri.entry(uri.into()).or_insert_with(|| prefix.into());
    }

    /// Get the prefix bound to a URI
    pub fn prefix(&self, uri: &str) -> Option<&str> {
        if uri == XML_NAMESPACE {
            return Some("xml");
        }
        self.by_uri.get(uri).map(|s| s.as_str())
    }

    /// Whether a URI needs an `xmlns` declaration when used
    pub fn needs_declaration(uri: &str) -> bool {
        uri != XML_NAMESPACE
    }

    /// Bind `uri` if it is not yet bound and return its prefix
    pub fn ensure(&mut self, uri: &str) -> &str {
        if uri == XML_NAMESPACE {
            return "xml";
        }
        if !self.by_uri.contains_key(uri) {
            loop {
                self.generated += 1;
                let candidate = format!("ns{}", self.generated);
                if !self.by_uri.values().any(|p| *p == candidate) {
                    self.by_uri.insert(uri.to_string(), candidate);
                    break;
                }
            }
        }
        self.by_uri.get(uri).map(|s| s.as_str()).unwrap_or_default()
    }

    /// Render a name as `prefix:local` (or `local` when it has no namespace)
    pub fn qualify(&self, qname: &QName) -> String {
        match qname.namespace.as_deref().and_then(|ns| self.prefix(ns)) {
            Some(prefix) => format!("{}:{}", prefix, qname.local_name),
            None => qname.local_name.clone(),
        }
    }

    /// Iterate over (prefix, uri) bindings in insertion order
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_uri.iter().map(|(uri, prefix)| (prefix.as_str(), uri.as_str()))
    }
}
