use crate::value::Value;
use groupcheck_policy::Policy;
use serde::{Serialize, Serializer};
use std::fmt;

/// Error key reported by required field rules when the field is absent.
pub const MISSING: &str = "missing";

/// Dotted location of a rule within the configuration tree, e.g. `topics.name`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RulePath(Vec<&'static str>);

impl RulePath {
    pub fn new(field: &'static str) -> Self {
        Self(vec![field])
    }

    /// Last segment; this is the identity the message catalog is keyed by.
    pub fn terminal(&self) -> &'static str {
        self.0.last().copied().unwrap_or_default()
    }

    pub fn prefixed(&self, field: &'static str) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.push(field);
        segments.extend_from_slice(&self.0);
        Self(segments)
    }

    pub fn is_field(&self, field: &str) -> bool {
        self.0.len() == 1 && self.0[0] == field
    }
}

impl fmt::Display for RulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl Serialize for RulePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Predicate over a single field value.
pub type FieldCheck = fn(&Value) -> bool;
/// Predicate over the whole record, with the policy in force.
pub type RelationCheck = fn(&Value, &Policy) -> bool;

#[derive(Clone, Copy)]
pub enum Check {
    Field { check: FieldCheck, optional: bool },
    Relation(RelationCheck),
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::Field { optional, .. } => f
                .debug_struct("Field")
                .field("optional", optional)
                .finish_non_exhaustive(),
            Check::Relation(_) => f.write_str("Relation(..)"),
        }
    }
}

/// One atomic, path-identified check. Rules never mutate or panic; a failing rule yields its
/// error key.
#[derive(Debug, Clone)]
pub struct Rule {
    path: RulePath,
    key: &'static str,
    check: Check,
    after: Option<&'static str>,
}

impl Rule {
    /// The field must be present; `check` decides whether its value (nil included) is valid.
    pub fn required(field: &'static str, key: &'static str, check: FieldCheck) -> Self {
        Self::build(field, key, Check::Field { check, optional: false })
    }

    /// Absent and nil values pass; anything else goes through `check`.
    pub fn optional(field: &'static str, key: &'static str, check: FieldCheck) -> Self {
        Self::build(field, key, Check::Field { check, optional: true })
    }

    /// Cross-field or cross-element invariant reported against `field`.
    pub fn relation(field: &'static str, key: &'static str, check: RelationCheck) -> Self {
        Self::build(field, key, Check::Relation(check))
    }

    fn build(field: &'static str, key: &'static str, check: Check) -> Self {
        Self {
            path: RulePath::new(field),
            key,
            check,
            after: None,
        }
    }

    /// Skip this rule when a field rule on `field` has already failed.
    pub fn after(mut self, field: &'static str) -> Self {
        self.after = Some(field);
        self
    }

    pub fn path(&self) -> &RulePath {
        &self.path
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn gate(&self) -> Option<&'static str> {
        self.after
    }

    /// Field rules check the shape of one value; a failure there gates dependent rules.
    pub fn is_field(&self) -> bool {
        matches!(self.check, Check::Field { .. })
    }

    /// Required field rules can also report [`MISSING`].
    pub fn is_required(&self) -> bool {
        matches!(self.check, Check::Field { optional: false, .. })
    }

    /// Catalog identity of this rule's failure, e.g. `id_format`.
    pub fn catalog_key(&self) -> String {
        format!("{}_{}", self.path.terminal(), self.key)
    }

    /// `Some(error_key)` when the rule fails against `record`.
    pub fn evaluate(&self, record: &Value, policy: &Policy) -> Option<&'static str> {
        match self.check {
            Check::Field { check, optional } => match record.get(self.path.terminal()) {
                None if optional => None,
                None => Some(MISSING),
                Some(Value::Nil) if optional => None,
                Some(value) => (!check(value)).then_some(self.key),
            },
            Check::Relation(check) => (!check(record, policy)).then_some(self.key),
        }
    }
}

/// One failed rule: the rule set it came from, where, and which key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Failure {
    pub scope: &'static str,
    pub path: RulePath,
    pub key: &'static str,
}
