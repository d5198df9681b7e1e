use crate::catalog::MessageCatalog;
use crate::contract::Contract;
use crate::rule::Rule;
use crate::rule_set::RuleSet;
use crate::value::Value;
use groupcheck_policy::Policy;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

pub const CONSUMER_GROUP: &str = "consumer_group";
pub const CONSUMER_GROUP_TOPIC: &str = "consumer_group_topic";

pub const BOOTSTRAP_SERVERS: &str = "bootstrap.servers";
pub const INITIAL_OFFSETS: [&str; 2] = ["earliest", "latest"];

/// Characters Kafka accepts in topic and group identifiers.
static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("identifier regex"));

pub fn is_identifier(v: &Value) -> bool {
    v.as_str().is_some_and(|s| IDENTIFIER_RE.is_match(s))
}

fn is_handle(v: &Value) -> bool {
    v.as_handle().is_some()
}

fn is_filled_seq(v: &Value) -> bool {
    v.as_seq().is_some_and(|items| !items.is_empty())
}

fn is_kafka_settings(v: &Value) -> bool {
    v.as_map().is_some_and(|settings| {
        !settings.is_empty()
            && settings.values().all(|setting| {
                matches!(
                    setting,
                    Value::Str(_) | Value::Int(_) | Value::Float(_) | Value::Bool(_)
                )
            })
    })
}

fn is_non_negative_int(v: &Value) -> bool {
    v.as_int().is_some_and(|n| n >= 0)
}

fn is_bool(v: &Value) -> bool {
    v.as_bool().is_some()
}

fn is_initial_offset(v: &Value) -> bool {
    v.as_str().is_some_and(|s| INITIAL_OFFSETS.contains(&s))
}

fn has_bootstrap_servers(topic: &Value, _: &Policy) -> bool {
    topic
        .get("kafka")
        .and_then(|kafka| kafka.get(BOOTSTRAP_SERVERS))
        .and_then(Value::as_str)
        .is_some_and(|servers| !servers.trim().is_empty())
}

/// String names of every topic; malformed entries are left to the topic rules.
fn topic_names(group: &Value) -> Vec<&str> {
    group
        .get("topics")
        .and_then(Value::as_seq)
        .map(|topics| {
            topics
                .iter()
                .filter_map(|t| t.get("name").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}

fn names_unique(group: &Value, _: &Policy) -> bool {
    let mut seen = HashSet::new();
    topic_names(group).into_iter().all(|name| seen.insert(name))
}

/// Name a topic resolves to once `.` and `_` are treated as the same separator.
pub fn normalize_topic_name(name: &str) -> String {
    name.replace('.', "_")
}

fn namespaced_names_unique(group: &Value, policy: &Policy) -> bool {
    if policy.strict_topics_namespacing {
        return true;
    }
    let mut by_normalized: HashMap<String, &str> = HashMap::new();
    for name in topic_names(group) {
        match by_normalized.entry(normalize_topic_name(name)) {
            Entry::Occupied(seen) if *seen.get() != name => return false,
            Entry::Occupied(_) => {}
            Entry::Vacant(slot) => {
                slot.insert(name);
            }
        }
    }
    true
}

pub fn topic_rules() -> RuleSet {
    RuleSet::new(CONSUMER_GROUP_TOPIC)
        .rule(Rule::required("id", "format", is_identifier))
        .rule(Rule::required("name", "format", is_identifier))
        .rule(Rule::required("consumer", "format", is_handle))
        .rule(Rule::required("deserializer", "format", is_handle))
        .rule(Rule::required("kafka", "format", is_kafka_settings))
        .rule(Rule::relation("kafka", "bootstrap_servers", has_bootstrap_servers).after("kafka"))
        .rule(Rule::required("max_wait_time", "format", is_non_negative_int))
        .rule(Rule::required("max_messages", "format", is_non_negative_int))
        .rule(Rule::required("manual_offset_management", "format", is_bool))
        .rule(Rule::required("initial_offset", "format", is_initial_offset))
        .rule(Rule::optional("subscription_group", "format", is_identifier))
}

pub fn consumer_group_rules() -> RuleSet {
    RuleSet::new(CONSUMER_GROUP)
        .rule(Rule::required("id", "format", is_identifier))
        .rule(Rule::required("deserializer", "format", is_handle))
        .rule(Rule::required("topics", "format", is_filled_seq))
        .rule(Rule::relation("topics", "names_not_unique", names_unique).after("topics"))
        .rule(
            Rule::relation(
                "topics",
                "namespaced_names_not_unique",
                namespaced_names_unique,
            )
            .after("topics"),
        )
        .each("topics", topic_rules())
}

/// Contract for a whole consumer group, topics included.
pub fn consumer_group() -> Contract {
    Contract::new(consumer_group_rules(), MessageCatalog::embedded())
}

/// Contract for a single topic definition.
pub fn consumer_group_topic() -> Contract {
    Contract::new(topic_rules(), MessageCatalog::embedded())
}
