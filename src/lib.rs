//! # ddms
//!
//! A document object model for DDMS, the DoD Discovery Metadata
//! Schema, covering DDMS 2.0 through 5.0 together with ISM security
//! markings and NTK access control.
//!
//! ## Features
//!
//! - Every component validates at construction, from markup or typed values
//! - Version-dependent cardinality and attribute rules
//! - Builders that can be committed under any supported version
//! - XML, HTML and plain-text output
//!
//! ## Example
//!
//! ```rust,ignore
//! use ddms::components::{Resource, ResourceBuilder};
//! use ddms::validators::Builder;
//! use ddms::VersionContext;
//!
//! // Load a DDMS 3.1 record
//! let resource = Resource::from_xml(&xml)?;
//!
//! // Commit the same content under DDMS 4.1
//! let builder = ResourceBuilder::from(&resource);
//! let upgraded = builder.commit(VersionContext::resolve("4.1")?)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;
pub mod version;

// Markup
pub mod names;
pub mod namespaces;
pub mod documents;

// Configuration and output
pub mod config;
pub mod output;

// Validation engine and components
pub mod validators;
pub mod components;

// Re-exports for convenience
pub use config::Config;
pub use error::{Error, Result, Severity, ValidationMessage};
pub use version::{DdmsVersion, NamespaceKind, VersionContext};

/// Version of the ddms library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
