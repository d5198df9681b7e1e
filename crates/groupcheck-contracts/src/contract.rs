use crate::catalog::MessageCatalog;
use crate::outcome::Outcome;
use crate::rule_set::RuleSet;
use crate::value::Value;
use groupcheck_policy::Policy;
use std::sync::Arc;

/// Where a contract reads its policy from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PolicySource {
    /// Snapshot the process-wide store at the start of every call.
    Global,
    Fixed(Policy),
}

/// Binds a rule set to its message catalog and exposes the validation entry point.
#[derive(Debug, Clone)]
pub struct Contract {
    rules: RuleSet,
    catalog: Arc<MessageCatalog>,
    policy: PolicySource,
}

impl Contract {
    pub fn new(rules: RuleSet, catalog: Arc<MessageCatalog>) -> Self {
        Self {
            rules,
            catalog,
            policy: PolicySource::Global,
        }
    }

    /// Pin `policy` instead of reading the process-wide store.
    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = PolicySource::Fixed(policy);
        self
    }

    /// Policy a call made now would use.
    pub fn policy(&self) -> Policy {
        match self.policy {
            PolicySource::Global => groupcheck_policy::current(),
            PolicySource::Fixed(policy) => policy,
        }
    }

    /// Validate `config`. Never panics; every problem is reported in the outcome.
    pub fn call(&self, config: &Value) -> Outcome {
        let policy = self.policy();
        self.call_with(config, &policy)
    }

    pub fn call_with(&self, config: &Value, policy: &Policy) -> Outcome {
        let failures = self.rules.evaluate(config, policy);
        tracing::debug!(
            contract = self.rules.name(),
            strict_topics_namespacing = policy.strict_topics_namespacing,
            failures = failures.len(),
            "contract called"
        );
        Outcome::new(failures, Arc::clone(&self.catalog))
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Unrenderable catalog identities for this contract's rules; empty when complete.
    pub fn audit(&self) -> Vec<String> {
        self.catalog.audit(&self.rules)
    }
}
