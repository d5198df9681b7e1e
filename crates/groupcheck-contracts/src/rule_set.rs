use crate::rule::{Failure, Rule};
use crate::value::Value;
use groupcheck_policy::Policy;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nesting {
    /// Apply the child set to every element of a sequence.
    Each,
    /// Apply the child set to a sub-object.
    Object,
}

#[derive(Debug, Clone)]
struct NestedSet {
    field: &'static str,
    nesting: Nesting,
    set: RuleSet,
}

/// Ordered, nestable collection of rules for one configuration shape. The name doubles as the
/// message catalog scope for failures the set produces.
#[derive(Debug, Clone)]
pub struct RuleSet {
    name: &'static str,
    rules: Vec<Rule>,
    nested: Vec<NestedSet>,
}

impl RuleSet {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rules: Vec::new(),
            nested: Vec::new(),
        }
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Validate each element of the `field` sequence with `set`. Skipped when a field rule
    /// on `field` itself failed.
    pub fn each(mut self, field: &'static str, set: RuleSet) -> Self {
        self.nested.push(NestedSet {
            field,
            nesting: Nesting::Each,
            set,
        });
        self
    }

    /// Validate the `field` sub-object with `set`. Skipped when a field rule on `field` failed.
    pub fn nested(mut self, field: &'static str, set: RuleSet) -> Self {
        self.nested.push(NestedSet {
            field,
            nesting: Nesting::Object,
            set,
        });
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Every rule reachable from this set, paired with the set that owns it.
    pub fn walk(&self) -> Vec<(&RuleSet, &Rule)> {
        let mut out: Vec<(&RuleSet, &Rule)> = self.rules.iter().map(|r| (self, r)).collect();
        for nested in &self.nested {
            out.extend(nested.set.walk());
        }
        out
    }

    /// Run every rule against `value`. Unrelated rules are all evaluated; only gated rules and
    /// nested sets whose field failed a field rule are skipped. Duplicate failures collapse.
    pub fn evaluate(&self, value: &Value, policy: &Policy) -> Vec<Failure> {
        let mut failures: Vec<Failure> = Vec::new();
        // Fields whose own shape is wrong; relations on them fail as data, never gate.
        let mut broken: HashSet<&'static str> = HashSet::new();
        for rule in &self.rules {
            if rule.gate().is_some_and(|gate| broken.contains(gate)) {
                continue;
            }
            if let Some(key) = rule.evaluate(value, policy) {
                if rule.is_field() {
                    broken.insert(rule.path().terminal());
                }
                failures.push(Failure {
                    scope: self.name,
                    path: rule.path().clone(),
                    key,
                });
            }
        }

        for nested in &self.nested {
            if broken.contains(nested.field) {
                continue;
            }
            let Some(child) = value.get(nested.field) else {
                continue;
            };
            let found: Vec<Failure> = match (nested.nesting, child) {
                (Nesting::Each, Value::Seq(items)) => items
                    .iter()
                    .flat_map(|item| nested.set.evaluate(item, policy))
                    .collect(),
                (Nesting::Object, _) => nested.set.evaluate(child, policy),
                _ => Vec::new(),
            };
            failures.extend(found.into_iter().map(|f| Failure {
                path: f.path.prefixed(nested.field),
                ..f
            }));
        }

        let mut seen = HashSet::new();
        failures.retain(|f| seen.insert(f.clone()));
        tracing::debug!(
            rule_set = self.name,
            failures = failures.len(),
            "rule set evaluated"
        );
        failures
    }
}
