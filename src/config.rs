//! Library configuration
//!
//! [`Config`] gathers the knobs that affect how documents are read and
//! written: namespace prefix overrides, output numbering and parse limits.
//! How a configuration is obtained is up to the caller; it deserializes from
//! JSON with every field optional.

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::names::is_valid_ncname;
use crate::namespaces::PrefixMap;
use crate::output::{IndexLevel, OutputOptions};
use crate::version::{NamespaceKind, VersionContext};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Configuration for reading and writing documents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix overrides, keyed by vocabulary
    pub prefixes: IndexMap<NamespaceKind, String>,
    /// HTML and text output options
    pub output: OutputOptions,
    /// Parse limits
    pub limits: Limits,
}

impl Config {
    /// Create a configuration with every default
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Override the prefix of a vocabulary
    pub fn with_prefix(mut self, kind: NamespaceKind, prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        validate_prefix(kind, &prefix)?;
        self.prefixes.insert(kind, prefix);
        Ok(self)
    }

    /// Set the output index level
    pub fn with_index_level(mut self, level: IndexLevel) -> Self {
        self.output.index_level = level;
        self
    }

    /// Set the parse limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Check that every override is a usable, unique prefix
    pub fn validate(&self) -> Result<()> {
        for (kind, prefix) in &self.prefixes {
            validate_prefix(*kind, prefix)?;
        }
        let mut seen: Vec<&str> = Vec::new();
        for kind in NamespaceKind::ALL {
            let prefix = self.prefix(kind);
            if seen.contains(&prefix) {
                return Err(Error::Config(format!(
                    "Prefix '{}' is bound to more than one namespace",
                    prefix
                )));
            }
            seen.push(prefix);
        }
        Ok(())
    }

    /// The prefix in effect for a vocabulary
    pub fn prefix(&self, kind: NamespaceKind) -> &str {
        self.prefixes
            .get(&kind)
            .map(|s| s.as_str())
            .unwrap_or_else(|| kind.default_prefix())
    }

    /// Output prefixes for a version
    pub fn prefix_map(&self, ctx: &VersionContext) -> PrefixMap {
        PrefixMap::for_version(ctx, &self.prefixes)
    }
}

fn validate_prefix(kind: NamespaceKind, prefix: &str) -> Result<()> {
    if !is_valid_ncname(prefix) || prefix.to_ascii_lowercase().starts_with("xml") {
        return Err(Error::Config(format!(
            "'{}' is not a valid prefix for the {} namespace",
            prefix,
            kind.default_prefix()
        )));
    }
    Ok(())
}
