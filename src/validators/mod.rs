//! Validation engine
//!
//! The pieces every component is built from: attribute classification,
//! security markings, cardinality rules, the [`Component`] contract and the
//! [`Builder`] commit cycle.

pub mod attributes;
pub mod base;
pub mod builders;
pub mod cardinality;
pub mod helpers;
pub mod security;

pub use attributes::{
    claim_ism, AttributeCategory, AttributeClassifier, AttributeProfile, ClassifiedAttributes,
    ExtensibleAttribute, ExtensibleAttributes, IsmClaim, IsmParameter, ParameterName,
    ParameterSpec,
};
pub use base::{Component, Warnings};
pub use builders::{commit_all, restore, snapshot, Builder};
pub use cardinality::{CardinalityRule, ChildOccurrence, RuleSet};
pub use security::{SecurityAttribute, SecurityAttributes, SecurityAttributesBuilder};
