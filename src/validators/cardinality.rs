//! Child cardinality rules
//!
//! A [`RuleSet`] lists, for one parent under one version, the legal child
//! types with their `[min, max]` occurrence bounds. Rules for ordered children
//! also check the ordinals callers assign to them.

use crate::error::{Error, Result};

/// Occurrence bounds for one child type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardinalityRule {
    /// Child type name
    pub child: &'static str,
    /// Minimum occurrences
    pub min: usize,
    /// Maximum occurrences (None means unbounded)
    pub max: Option<usize>,
    /// Whether children of this type carry ordinals
    pub ordered: bool,
}

impl CardinalityRule {
    /// Create a rule with explicit bounds
    pub const fn new(child: &'static str, min: usize, max: Option<usize>) -> Self {
        Self {
            child,
            min,
            max,
            ordered: false,
        }
    }

    /// `1..1`
    pub const fn exactly_one(child: &'static str) -> Self {
        Self::new(child, 1, Some(1))
    }

    /// `1..∞`
    pub const fn at_least_one(child: &'static str) -> Self {
        Self::new(child, 1, None)
    }

    /// `0..1`
    pub const fn optional(child: &'static str) -> Self {
        Self::new(child, 0, Some(1))
    }

    /// `0..∞`
    pub const fn any(child: &'static str) -> Self {
        Self::new(child, 0, None)
    }

    /// Mark children of this type as carrying ordinals
    pub const fn ordered(mut self) -> Self {
        self.ordered = true;
        self
    }

    /// Whether `count` is within bounds
    pub fn allows(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

/// One realized child, as seen by the cardinality check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildOccurrence {
    /// Child type name
    pub name: String,
    /// Caller-assigned ordinal, if any
    pub ordinal: Option<u32>,
}

impl ChildOccurrence {
    /// A child without an ordinal
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ordinal: None,
        }
    }

    /// A child with an optional ordinal
    pub fn with_ordinal(name: impl Into<String>, ordinal: Option<u32>) -> Self {
        Self {
            name: name.into(),
            ordinal,
        }
    }
}

/// The cardinality rules of one parent under one version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    parent: String,
    rules: Vec<CardinalityRule>,
    order_sensitive: bool,
}

impl RuleSet {
    /// Create an empty rule set for `parent`
    pub fn new(parent: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            rules: Vec::new(),
            order_sensitive: false,
        }
    }

    /// Add a rule
    pub fn rule(mut self, rule: CardinalityRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Add a rule only when `enabled`
    pub fn rule_if(self, enabled: bool, rule: CardinalityRule) -> Self {
        if enabled {
            self.rule(rule)
        } else {
            self
        }
    }

    /// Turn ordinal checking on or off
    pub fn order_sensitive(mut self, order_sensitive: bool) -> Self {
        self.order_sensitive = order_sensitive;
        self
    }

    /// The parent name
    pub fn parent(&self) -> &str {
        &self.parent
    }

    /// The rules, in declaration order
    pub fn rules(&self) -> &[CardinalityRule] {
        &self.rules
    }

    /// Find the rule for a child type
    pub fn find(&self, child: &str) -> Option<&CardinalityRule> {
        self.rules.iter().find(|rule| rule.child == child)
    }

    /// Whether a child type is legal under this parent
    pub fn is_legal(&self, child: &str) -> bool {
        self.find(child).is_some()
    }

    /// Reject a child type that is not legal under this parent
    pub fn check_legal(&self, child: &str) -> Result<()> {
        if self.is_legal(child) {
            Ok(())
        } else {
            Err(Error::UnexpectedChildType {
                parent: self.parent.clone(),
                child: child.to_string(),
            })
        }
    }

    /// Count children per type
    pub fn count(&self, children: &[ChildOccurrence], child: &str) -> usize {
        children.iter().filter(|c| c.name == child).count()
    }

    /// Check legality, counts and (when enabled) ordinals
    pub fn validate(&self, children: &[ChildOccurrence]) -> Result<()> {
        for child in children {
            self.check_legal(&child.name)?;
        }
        for rule in &self.rules {
            let actual = self.count(children, rule.child);
            if !rule.allows(actual) {
                return Err(Error::CardinalityViolation {
                    parent: self.parent.clone(),
                    child: rule.child.to_string(),
                    actual,
                    min: rule.min,
                    max: rule.max,
                });
            }
        }
        if self.order_sensitive {
            self.validate_order(children)?;
        }
        Ok(())
    }

    /// Check that every ordered child carries an ordinal and that the
    /// ordinals are unique and increasing
    pub fn validate_order(&self, children: &[ChildOccurrence]) -> Result<()> {
        let mut seen: Vec<u32> = Vec::new();
        let ordered = children
            .iter()
            .filter(|c| self.find(&c.name).map_or(false, |rule| rule.ordered));
        for child in ordered {
            let ordinal = match child.ordinal {
                Some(ordinal) => ordinal,
                None => {
                    return Err(Error::OrderConstraintViolation {
                        parent: self.parent.clone(),
                        ordinal: None,
                        reason: format!("{} carries no ordinal", child.name),
                    })
                }
            };
            if seen.contains(&ordinal) {
                return Err(Error::OrderConstraintViolation {
                    parent: self.parent.clone(),
                    ordinal: Some(ordinal),
                    reason: "the ordinal is used more than once".to_string(),
                });
            }
            if let Some(previous) = seen.last() {
                if ordinal < *previous {
                    return Err(Error::OrderConstraintViolation {
                        parent: self.parent.clone(),
                        ordinal: Some(ordinal),
                        reason: format!("it follows the larger ordinal {}", previous),
                    });
                }
            }
            seen.push(ordinal);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource_rules() -> RuleSet {
        RuleSet::new("ddms:Resource")
            .rule(CardinalityRule::at_least_one("title"))
            .rule(CardinalityRule::optional("description"))
            .rule(CardinalityRule::exactly_one("security"))
    }

    fn children(names: &[&str]) -> Vec<ChildOccurrence> {
        names.iter().map(|n| ChildOccurrence::new(*n)).collect()
    }

    #[test]
    fn test_valid_counts() {
        let rules = resource_rules();
        assert!(rules.validate(&children(&["title", "title", "security"])).is_ok());
    }

    #[test]
    fn test_missing_required() {
        let err = resource_rules()
            .validate(&children(&["security"]))
            .unwrap_err();
        match err {
            Error::CardinalityViolation { child, actual, min, max, .. } => {
                assert_eq!((child.as_str(), actual, min, max), ("title", 0, 1, None));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_too_many() {
        let err = resource_rules()
            .validate(&children(&["title", "description", "description", "security"]))
            .unwrap_err();
        match err {
            Error::CardinalityViolation { child, actual, min, max, .. } => {
                assert_eq!((child.as_str(), actual, min, max), ("description", 2, 0, Some(1)));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_unexpected_child_before_count() {
        let err = resource_rules()
            .validate(&children(&["bogus"]))
            .unwrap_err();
        assert!(matches!(err, Error::UnexpectedChildType { ref child, .. } if child == "bogus"));
    }

    #[test]
    fn test_rule_if() {
        let rules = RuleSet::new("p")
            .rule_if(false, CardinalityRule::any("a"))
            .rule_if(true, CardinalityRule::any("b"));
        assert!(!rules.is_legal("a"));
        assert!(rules.is_legal("b"));
    }

    #[test]
    fn test_order() {
        let rules = RuleSet::new("ddms:subjectCoverage")
            .rule(CardinalityRule::any("nonStateActor").ordered())
            .rule(CardinalityRule::any("keyword"))
            .order_sensitive(true);
        let ok = vec![
            ChildOccurrence::with_ordinal("nonStateActor", Some(1)),
            ChildOccurrence::new("keyword"),
            ChildOccurrence::with_ordinal("nonStateActor", Some(3)),
        ];
        assert!(rules.validate(&ok).is_ok());

        let unnumbered = vec![
            ChildOccurrence::with_ordinal("nonStateActor", Some(1)),
            ChildOccurrence::with_ordinal("nonStateActor", None),
        ];
        let err = rules.validate(&unnumbered).unwrap_err();
        assert!(matches!(err, Error::OrderConstraintViolation { ordinal: None, .. }));
        assert!(rules.clone().order_sensitive(false).validate(&unnumbered).is_ok());

        let duplicate = vec![
            ChildOccurrence::with_ordinal("nonStateActor", Some(2)),
            ChildOccurrence::with_ordinal("nonStateActor", Some(2)),
        ];
        let err = rules.validate(&duplicate).unwrap_err();
        assert!(matches!(err, Error::OrderConstraintViolation { ordinal: Some(2), .. }));

        let decreasing = vec![
            ChildOccurrence::with_ordinal("nonStateActor", Some(3)),
            ChildOccurrence::with_ordinal("nonStateActor", Some(1)),
        ];
        let err = rules.validate(&decreasing).unwrap_err();
        assert!(matches!(err, Error::OrderConstraintViolation { ordinal: Some(1), .. }));

        assert!(rules.clone().order_sensitive(false).validate(&decreasing).is_ok());
    }
}
