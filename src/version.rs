//! DDMS version catalog
//!
//! A [`VersionContext`] names one revision of DDMS together with
//! its namespace bindings and the feature flags that gate components and
//! attributes. The catalog is built once and never mutated; contexts are
//! passed explicitly to every construction, parse and commit call.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A supported DDMS revision, in catalog order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DdmsVersion {
    /// DDMS 2.0
    #[serde(rename = "2.0")]
    V2_0,
    /// DDMS 3.0
    #[serde(rename = "3.0")]
    V3_0,
    /// DDMS 3.1
    #[serde(rename = "3.1")]
    V3_1,
    /// DDMS 4.0.1
    #[serde(rename = "4.0.1")]
    V4_0_1,
    /// DDMS 4.1
    #[serde(rename = "4.1")]
    V4_1,
    /// DDMS 5.0
    #[serde(rename = "5.0")]
    V5_0,
}

impl DdmsVersion {
    /// Every version, oldest first
    pub const ALL: [DdmsVersion; 6] = [
        DdmsVersion::V2_0,
        DdmsVersion::V3_0,
        DdmsVersion::V3_1,
        DdmsVersion::V4_0_1,
        DdmsVersion::V4_1,
        DdmsVersion::V5_0,
    ];

    /// Parse from string. `4.0` is accepted as an alias of `4.0.1`.
    pub fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "2.0" => Ok(DdmsVersion::V2_0),
            "3.0" => Ok(DdmsVersion::V3_0),
            "3.1" => Ok(DdmsVersion::V3_1),
            "4.0" | "4.0.1" => Ok(DdmsVersion::V4_0_1),
            "4.1" => Ok(DdmsVersion::V4_1),
            "5.0" => Ok(DdmsVersion::V5_0),
            other => Err(Error::UnknownVersion(other.to_string())),
        }
    }

    /// Get as string
    pub fn as_str(&self) -> &'static str {
        match self {
            DdmsVersion::V2_0 => "2.0",
            DdmsVersion::V3_0 => "3.0",
            DdmsVersion::V3_1 => "3.1",
            DdmsVersion::V4_0_1 => "4.0.1",
            DdmsVersion::V4_1 => "4.1",
            DdmsVersion::V5_0 => "5.0",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for DdmsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The vocabularies a version binds to namespace URIs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamespaceKind {
    /// DDMS core elements
    Ddms,
    /// Information Security Marking attributes
    Ism,
    /// Need-To-Know access control
    Ntk,
    /// Geography Markup Language
    Gml,
    /// XLink attributes
    Xlink,
    /// XML Schema instance attributes
    Xsi,
}

impl NamespaceKind {
    /// Every kind, in declaration order
    pub const ALL: [NamespaceKind; 6] = [
        NamespaceKind::Ddms,
        NamespaceKind::Ism,
        NamespaceKind::Ntk,
        NamespaceKind::Gml,
        NamespaceKind::Xlink,
        NamespaceKind::Xsi,
    ];

    /// The conventional prefix for this vocabulary
    pub fn default_prefix(&self) -> &'static str {
        match self {
            NamespaceKind::Ddms => "ddms",
            NamespaceKind::Ism => "ism",
            NamespaceKind::Ntk => "ntk",
            NamespaceKind::Gml => "gml",
            NamespaceKind::Xlink => "xlink",
            NamespaceKind::Xsi => "xsi",
        }
    }

    /// Parse from a prefix-style name (`ddms`, `ism`, ...)
    pub fn from_str(s: &str) -> Result<Self> {
        NamespaceKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.default_prefix() == s)
            .ok_or_else(|| Error::Config(format!("Unknown namespace kind: '{}'", s)))
    }
}

/// XLink namespace, identical in every version
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// XML Schema instance namespace
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Namespace bindings of one version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceTable {
    /// DDMS namespace
    pub ddms: &'static str,
    /// ISM namespace
    pub ism: &'static str,
    /// NTK namespace, when the version supports access control
    pub ntk: Option<&'static str>,
    /// GML namespace
    pub gml: &'static str,
}

impl NamespaceTable {
    /// Get the URI bound to a vocabulary
    pub fn uri(&self, kind: NamespaceKind) -> Option<&'static str> {
        match kind {
            NamespaceKind::Ddms => Some(self.ddms),
            NamespaceKind::Ism => Some(self.ism),
            NamespaceKind::Ntk => self.ntk,
            NamespaceKind::Gml => Some(self.gml),
            NamespaceKind::Xlink => Some(XLINK_NAMESPACE),
            NamespaceKind::Xsi => Some(XSI_NAMESPACE),
        }
    }

    /// Find the vocabulary bound to a URI
    pub fn kind_of(&self, uri: &str) -> Option<NamespaceKind> {
        NamespaceKind::ALL
            .iter()
            .copied()
            .find(|kind| self.uri(*kind) == Some(uri))
    }

    /// Iterate over every bound (kind, uri) pair
    pub fn bindings(&self) -> impl Iterator<Item = (NamespaceKind, &'static str)> + '_ {
        NamespaceKind::ALL
            .iter()
            .filter_map(move |kind| self.uri(*kind).map(|uri| (*kind, uri)))
    }
}

/// Version-dependent capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    /// Security markings on coverage, source and similar elements (3.0+)
    pub component_security: bool,
    /// `ism:resourceElement`, `ism:createDate` and `ism:DESVersion` on the root (3.0+)
    pub resource_attributes: bool,
    /// `ddms:Unknown` producer entity (3.0+)
    pub unknown_producer: bool,
    /// `ddms:approvedOn` date (3.1+)
    pub approved_on: bool,
    /// `ism:compliesWith` marking (3.1+)
    pub complies_with: bool,
    /// `ism:dateOfExemptedSource`, `ism:typeOfExemptedSource` and `ism:declassManualReview` (up to 3.1)
    pub exempted_source: bool,
    /// Producer entities use lowercase element names (4.0.1+)
    pub lowercase_entities: bool,
    /// `ddms:format` without the `ddms:Media` wrapper (4.0.1+)
    pub flat_format: bool,
    /// `ddms:subjectCoverage` without the `ddms:Subject` wrapper (4.0.1+)
    pub flat_subject: bool,
    /// `ddms:productionMetric`, suborganizations, repeated affiliations (4.0.1+)
    pub production_metrics: bool,
    /// `ddms:receivedOn` date (4.0.1+)
    pub received_on: bool,
    /// Security and extensible attributes on keywords and categories (4.0.1+)
    pub keyword_security: bool,
    /// `ism:pocType` on producer roles (4.1+)
    pub poc_type: bool,
    /// `ddms:order` ordinals on non-state actors (4.1+)
    pub order: bool,
    /// `ntk:Access` inside `ddms:security` (4.1+)
    pub access: bool,
    /// `ntk:DESVersion` on the root (4.1+)
    pub ntk_des_version: bool,
    /// `ntk:DESVersion` is mandatory (5.0)
    pub ntk_des_version_required: bool,
    /// Root element is `ddms:resource` rather than `ddms:Resource` (5.0)
    pub lowercase_resource: bool,
}

impl Features {
    fn for_version(version: DdmsVersion) -> Self {
        let at_least = |other: DdmsVersion| version >= other;
        Self {
            component_security: at_least(DdmsVersion::V3_0),
            resource_attributes: at_least(DdmsVersion::V3_0),
            unknown_producer: at_least(DdmsVersion::V3_0),
            approved_on: at_least(DdmsVersion::V3_1),
            complies_with: at_least(DdmsVersion::V3_1),
            exempted_source: version <= DdmsVersion::V3_1,
            lowercase_entities: at_least(DdmsVersion::V4_0_1),
            flat_format: at_least(DdmsVersion::V4_0_1),
            flat_subject: at_least(DdmsVersion::V4_0_1),
            production_metrics: at_least(DdmsVersion::V4_0_1),
            received_on: at_least(DdmsVersion::V4_0_1),
            keyword_security: at_least(DdmsVersion::V4_0_1),
            poc_type: at_least(DdmsVersion::V4_1),
            order: at_least(DdmsVersion::V4_1),
            access: at_least(DdmsVersion::V4_1),
            ntk_des_version: at_least(DdmsVersion::V4_1),
            ntk_des_version_required: at_least(DdmsVersion::V5_0),
            lowercase_resource: at_least(DdmsVersion::V5_0),
        }
    }
}

/// One entry of the version catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionContext {
    version: DdmsVersion,
    namespaces: NamespaceTable,
    features: Features,
}

const GML_2: &str = "http://www.opengis.net/gml";
const GML_3_2: &str = "http://www.opengis.net/gml/3.2";
const ISM: &str = "urn:us:gov:ic:ism";
const NTK: &str = "urn:us:gov:ic:ntk";

static CATALOG: Lazy<Vec<VersionContext>> = Lazy::new(|| {
    DdmsVersion::ALL
        .iter()
        .map(|version| {
            let namespaces = match version {
                DdmsVersion::V2_0 => NamespaceTable {
                    ddms: "http://metadata.dod.mil/mdr/ns/DDMS/2.0/",
                    ism: "urn:us:gov:ic:ism:v2",
                    ntk: None,
                    gml: GML_2,
                },
                DdmsVersion::V3_0 => NamespaceTable {
                    ddms: "http://metadata.dod.mil/mdr/ns/DDMS/3.0/",
                    ism: ISM,
                    ntk: None,
                    gml: GML_2,
                },
                DdmsVersion::V3_1 => NamespaceTable {
                    ddms: "http://metadata.dod.mil/mdr/ns/DDMS/3.1/",
                    ism: ISM,
                    ntk: None,
                    gml: GML_2,
                },
                DdmsVersion::V4_0_1 => NamespaceTable {
                    ddms: "urn:us:mil:ces:metadata:ddms:4",
                    ism: ISM,
                    ntk: None,
                    gml: GML_3_2,
                },
                DdmsVersion::V4_1 => NamespaceTable {
                    ddms: "urn:us:mil:ces:metadata:ddms:4",
                    ism: ISM,
                    ntk: Some(NTK),
                    gml: GML_3_2,
                },
                DdmsVersion::V5_0 => NamespaceTable {
                    ddms: "urn:us:mil:ces:metadata:ddms:5",
                    ism: ISM,
                    ntk: Some(NTK),
                    gml: GML_3_2,
                },
            };
            VersionContext {
                version: *version,
                namespaces,
                features: Features::for_version(*version),
            }
        })
        .collect()
});

impl VersionContext {
    /// Resolve a version string against the catalog
    pub fn resolve(version: &str) -> Result<&'static VersionContext> {
        match DdmsVersion::from_str(version) {
            Ok(version) => Ok(Self::get(version)),
            Err(err) => {
                tracing::debug!(version, "version string matched no catalog entry");
                Err(err)
            }
        }
    }

    /// Get the context of a known version
    pub fn get(version: DdmsVersion) -> &'static VersionContext {
        &CATALOG[version.index()]
    }

    /// The newest version in the catalog
    pub fn latest() -> &'static VersionContext {
        Self::get(DdmsVersion::V5_0)
    }

    /// The whole catalog, oldest first
    pub fn catalog() -> &'static [VersionContext] {
        &CATALOG
    }

    /// The newest version whose DDMS namespace is `uri`
    ///
    /// 4.0.1 and 4.1 share a namespace; documents in it resolve to 4.1.
    pub fn for_namespace(uri: &str) -> Result<&'static VersionContext> {
        CATALOG
            .iter()
            .rev()
            .find(|ctx| ctx.namespaces.ddms == uri)
            .ok_or_else(|| Error::UnknownVersion(format!("no DDMS version uses namespace '{}'", uri)))
    }

    /// The version named by this context
    pub fn version(&self) -> DdmsVersion {
        self.version
    }

    /// Catalog-order comparison
    pub fn is_at_least(&self, other: DdmsVersion) -> bool {
        self.version >= other
    }

    /// Namespace bindings
    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    /// Feature flags
    pub fn features(&self) -> &Features {
        &self.features
    }

    /// The URI bound to a vocabulary, if the version has one
    pub fn namespace(&self, kind: NamespaceKind) -> Option<&'static str> {
        self.namespaces.uri(kind)
    }

    /// The DDMS namespace
    pub fn ddms_namespace(&self) -> &'static str {
        self.namespaces.ddms
    }

    /// The ISM namespace
    pub fn ism_namespace(&self) -> &'static str {
        self.namespaces.ism
    }

    /// The NTK namespace
    pub fn ntk_namespace(&self) -> Option<&'static str> {
        self.namespaces.ntk
    }

    /// Require a feature, naming the element or attribute that needs it
    pub fn require(&self, supported: bool, name: &str, since: DdmsVersion) -> Result<()> {
        if supported {
            Ok(())
        } else {
            Err(Error::unsupported(
                name,
                self.version,
                format!("it cannot be used until DDMS {} or later", since),
            ))
        }
    }
}

impl fmt::Display for VersionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DDMS {}", self.version)
    }
}
