//! Error types for ddms
//!
//! This module defines the error taxonomy used throughout the library and the
//! non-fatal [`ValidationMessage`] that successfully constructed components
//! carry as warnings.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias using ddms Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ddms operations
///
/// Every variant is terminal for the construction or commit that raised it.
#[derive(Error, Debug)]
pub enum Error {
    /// A version string matched no entry of the version catalog
    #[error("unknown DDMS version: '{0}'")]
    UnknownVersion(String),

    /// A field, attribute or element is not legal in the active version
    #[error("{name} is not supported in DDMS {version}: {reason}")]
    VersionNotSupported {
        /// Qualified name of the offending element or attribute
        name: String,
        /// The active version
        version: String,
        /// Why the name is unavailable
        reason: String,
    },

    /// A required field is missing or a value is malformed
    #[error("invalid {component}: {field} {reason}")]
    InvalidComponent {
        /// Qualified name of the component being built
        component: String,
        /// The offending field
        field: String,
        /// What is wrong with it
        reason: String,
    },

    /// A child type occurs more or fewer times than its rule allows
    #[error(
        "{parent} must contain {} {child} element(s), but {actual} were found",
        bounds(.min, .max)
    )]
    CardinalityViolation {
        /// Qualified name of the parent
        parent: String,
        /// Name of the child type
        child: String,
        /// Number of children found
        actual: usize,
        /// Minimum occurrences
        min: usize,
        /// Maximum occurrences (None means unbounded)
        max: Option<usize>,
    },

    /// A child type is not in the legal child set of its parent
    #[error("{child} is not a legal child of {parent}")]
    UnexpectedChildType {
        /// Qualified name of the parent
        parent: String,
        /// Qualified name of the rejected child
        child: String,
    },

    /// Caller-assigned ordinals are duplicated or not increasing
    #[error("{} in {parent} is out of order: {reason}", ordinal_label(.ordinal))]
    OrderConstraintViolation {
        /// Qualified name of the parent
        parent: String,
        /// The offending ordinal value, `None` when a child carries none
        ordinal: Option<u32>,
        /// Why the ordinal was rejected
        reason: String,
    },

    /// An extensible attribute reuses a name claimed by another category
    #[error("the extensible attribute {name} conflicts with a {claimed_by} attribute")]
    DuplicateAttributeClaim {
        /// Namespace-qualified attribute name, `{namespace}local`
        name: String,
        /// The category that already claims the name
        claimed_by: String,
    },

    /// Markup could not be parsed
    #[error("XML error: {0}")]
    Xml(String),

    /// A parse limit was exceeded
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// Configuration value is unusable
    #[error("configuration error: {0}")]
    Config(String),

    /// The secondary rule validator failed to run
    #[error("rule validation error: {0}")]
    Rules(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Builder snapshot or configuration (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn bounds(min: &usize, max: &Option<usize>) -> String {
    match *max {
        Some(max) if max == *min => format!("exactly {}", min),
        Some(max) => format!("between {} and {}", min, max),
        None => format!("at least {}", min),
    }
}

fn ordinal_label(ordinal: &Option<u32>) -> String {
    match ordinal {
        Some(ordinal) => format!("ordinal {}", ordinal),
        None => "a missing ordinal".to_string(),
    }
}

impl Error {
    /// Create an `InvalidComponent` error
    pub fn invalid(
        component: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidComponent {
            component: component.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a `VersionNotSupported` error
    pub fn unsupported(
        name: impl Into<String>,
        version: impl fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        Error::VersionNotSupported {
            name: name.into(),
            version: version.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error is a validation failure rather than an I/O or markup problem
    pub fn is_validation_failure(&self) -> bool {
        matches!(
            self,
            Error::VersionNotSupported { .. }
                | Error::InvalidComponent { .. }
                | Error::CardinalityViolation { .. }
                | Error::UnexpectedChildType { .. }
                | Error::OrderConstraintViolation { .. }
                | Error::DuplicateAttributeClaim { .. }
        )
    }
}

/// Severity of a [`ValidationMessage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A finding that makes the document invalid
    Error,
    /// An advisory finding
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A located validation finding
///
/// Components attach warnings of this type; rule validators return them as findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMessage {
    /// Severity of the finding
    pub severity: Severity,
    /// Human-readable text
    pub text: String,
    /// Absolute path to the offending node, e.g. `/ddms:Resource/ddms:dates`
    pub locator: String,
}

impl ValidationMessage {
    /// Create a new warning located at `locator`
    pub fn warning(text: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            text: text.into(),
            locator: locator.into(),
        }
    }

    /// Create a new error finding located at `locator`
    pub fn error(text: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            text: text.into(),
            locator: locator.into(),
        }
    }

    /// Prepend a parent step to the locator
    pub fn with_parent(mut self, parent: &str) -> Self {
        self.locator = format!("{}{}", parent, self.locator);
        self
    }
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.text)?;
        if !self.locator.is_empty() {
            write!(f, "\n\nLocator: {}", self.locator)?;
        }
        Ok(())
    }
}
