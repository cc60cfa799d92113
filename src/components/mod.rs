//! Concrete DDMS components
//!
//! Each component validates itself at construction, from markup or from
//! typed values, and has a matching builder.

pub mod access;
pub mod coverage;
pub mod dates;
pub mod descriptors;
pub mod extensible;
pub mod format;
pub mod identifier;
pub mod producers;
pub mod resource;
pub mod security;
pub mod subject;
pub mod text;

pub use access::{
    Access, AccessBuilder, AccessEntry, AccessEntryBuilder, AccessList, AccessValue, AccessValueBuilder, Group,
    GroupList, GroupValue, Individual, IndividualList, IndividualValue, Profile, ProfileList, ProfileValue,
    SystemName, SystemNameBuilder,
};
pub use coverage::{TemporalCoverage, TemporalCoverageBuilder, VirtualCoverage, VirtualCoverageBuilder};
pub use dates::{DateValues, Dates};
pub use descriptors::{Rights, RightsBuilder, Source, SourceBuilder, Type, TypeBuilder};
pub use extensible::{ExtensibleElement, ExtensibleElementBuilder};
pub use format::{Extent, ExtentBuilder, Format, FormatBuilder};
pub use identifier::{Identifier, IdentifierBuilder, Language, LanguageBuilder};
pub use producers::{
    ContactInfo, EntityKind, Organization, OrganizationBuilder, Person, PersonBuilder, ProducerEntity, ProducerRole,
    ProducerRoleBuilder, ProducerRoleKind, Service, ServiceBuilder, SubOrganization, SubOrganizationBuilder, Unknown,
    UnknownBuilder,
};
pub use resource::{Resource, ResourceAttributes, ResourceBuilder, ResourceComponent, RuleValidator};
pub use security::{Security, SecurityBuilder};
pub use subject::{
    Category, CategoryBuilder, Keyword, KeywordBuilder, NonStateActor, NonStateActorBuilder, ProductionMetric,
    ProductionMetricBuilder, SubjectCoverage, SubjectCoverageBuilder,
};
pub use text::{TextComponent, TextComponentBuilder, TextKind};
