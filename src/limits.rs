//! Parse limits
//!
//! Bounds applied while a record is read into the element tree. Discovery
//! records are small; anything past these bounds is treated as hostile.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Bounds on the markup accepted by [`Document::parse`](crate::documents::Document::parse)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Deepest element nesting, the root being depth 1
    pub max_depth: usize,
    /// Largest document, in bytes
    pub max_document_bytes: usize,
    /// Most attributes on one element
    pub max_attributes: usize,
    /// Largest text content of one element, in bytes
    pub max_text_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_document_bytes: 4 * 1024 * 1024,
            max_attributes: 128,
            max_text_bytes: 256 * 1024,
        }
    }
}

fn within(what: &str, actual: usize, max: usize) -> Result<()> {
    if actual > max {
        return Err(Error::LimitExceeded(format!("{} is {}, over the limit of {}", what, actual, max)));
    }
    Ok(())
}

impl Limits {
    /// Default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Tighter limits for untrusted input
    pub fn strict() -> Self {
        Self {
            max_depth: 24,
            max_document_bytes: 512 * 1024,
            max_attributes: 48,
            max_text_bytes: 16 * 1024,
        }
    }

    /// Check the nesting depth of an element
    pub fn check_depth(&self, depth: usize) -> Result<()> {
        within("element depth", depth, self.max_depth)
    }

    /// Check the size of a whole document
    pub fn check_document_bytes(&self, size: usize) -> Result<()> {
        within("document size", size, self.max_document_bytes)
    }

    /// Check the attribute count of an element
    pub fn check_attributes(&self, count: usize) -> Result<()> {
        within("attribute count", count, self.max_attributes)
    }

    /// Check the text size of an element
    pub fn check_text_bytes(&self, size: usize) -> Result<()> {
        within("text size", size, self.max_text_bytes)
    }
}
