use groupcheck_contracts::{consumer_group, consumer_group_topic, Handle, Policy, Value};
use serial_test::serial;

fn topic() -> Value {
    Value::record([
        ("id", "id".into()),
        ("name", "name".into()),
        ("consumer", Handle::anonymous().into()),
        ("deserializer", Handle::anonymous().into()),
        (
            "kafka",
            Value::record([("bootstrap.servers", "localhost:9092".into())]),
        ),
        ("max_wait_time", 10_000.into()),
        ("max_messages", 10.into()),
        ("manual_offset_management", true.into()),
        ("initial_offset", "earliest".into()),
        ("subscription_group", Value::Nil),
    ])
}

fn config() -> Value {
    Value::record([
        ("id", "id".into()),
        ("deserializer", Handle::anonymous().into()),
        ("topics", Value::Seq(vec![topic()])),
    ])
}

fn topics_mut(config: &mut Value) -> &mut Value {
    config.get_mut("topics").expect("topics present")
}

/// Second topic copied from the first one, renamed.
fn with_second_topic(name: &str) -> Value {
    let mut cfg = config();
    let mut second = topic();
    second.insert("name", name);
    topics_mut(&mut cfg).push(second);
    cfg
}

fn with_namespaced_pair(other: &str) -> Value {
    let mut cfg = with_second_topic(other);
    topics_mut(&mut cfg)
        .element_mut(0)
        .expect("first topic")
        .insert("name", "some.namespaced.topic-name");
    cfg
}

#[test]
#[serial]
fn valid_config_passes() {
    let outcome = consumer_group().call(&config());
    assert!(outcome.success(), "{:?}", outcome.errors());
    assert!(outcome.errors().is_empty());
}

#[test]
#[serial]
fn empty_topics_fail() {
    let mut cfg = config();
    cfg.insert("topics", Value::Seq(vec![]));
    let outcome = consumer_group().call(&cfg);
    assert!(!outcome.success());
    assert_eq!(outcome.error_keys()["topics"], vec!["format"]);
}

#[test]
#[serial]
fn nil_topics_fail_without_cascading() {
    let mut cfg = config();
    cfg.insert("topics", Value::Nil);
    let outcome = consumer_group().call(&cfg);
    assert!(!outcome.success());
    assert_eq!(outcome.failures().len(), 1);
    assert_eq!(
        outcome.errors()["topics"],
        vec!["needs to be a non-empty array".to_string()]
    );
}

#[test]
#[serial]
fn missing_topics_fail() {
    let mut cfg = config();
    cfg.remove("topics");
    let outcome = consumer_group().call(&cfg);
    assert_eq!(outcome.error_keys()["topics"], vec!["missing"]);
}

#[test]
#[serial]
fn duplicated_topic_names_fail() {
    let mut cfg = config();
    let copy = topic();
    topics_mut(&mut cfg).push(copy);
    let outcome = consumer_group().call(&cfg);
    assert!(!outcome.success());
    assert_eq!(outcome.error_keys()["topics"], vec!["names_not_unique"]);
    assert_eq!(
        outcome.errors()["topics"],
        vec!["all topic names within a single consumer group must be unique".to_string()]
    );
}

#[test]
#[serial]
fn unique_topic_names_pass() {
    let outcome = consumer_group().call(&with_second_topic("0.6188470203"));
    assert!(outcome.success(), "{:?}", outcome.errors());
}

#[test]
#[serial]
fn differently_namespaced_names_pass() {
    groupcheck_policy::reset();
    let outcome = consumer_group().call(&with_namespaced_pair("another_namespaced_topic-name"));
    assert!(outcome.success(), "{:?}", outcome.errors());
}

#[test]
#[serial]
fn namespace_collision_passes_under_strict_namespacing() {
    groupcheck_policy::reset();
    let outcome = consumer_group().call(&with_namespaced_pair("some_namespaced_topic-name"));
    assert!(outcome.success(), "{:?}", outcome.errors());
}

#[test]
#[serial]
fn namespace_collision_fails_without_strict_namespacing() {
    groupcheck_policy::set_strict_topics_namespacing(false);
    let outcome = consumer_group().call(&with_namespaced_pair("some_namespaced_topic-name"));
    groupcheck_policy::reset();
    assert!(!outcome.success());
    assert_eq!(
        outcome.error_keys()["topics"],
        vec!["namespaced_names_not_unique"]
    );

    let relaxed = Policy {
        strict_topics_namespacing: false,
    };
    let pinned = consumer_group().with_policy(relaxed);
    let again = pinned.call(&with_namespaced_pair("another_namespaced_topic-name"));
    assert!(again.success(), "{:?}", again.errors());
}

#[test]
#[serial]
fn invalid_ids_fail() {
    for id in [Value::Nil, Value::Int(2), "%^&*(".into()] {
        let mut cfg = config();
        cfg.insert("id", id.clone());
        let outcome = consumer_group().call(&cfg);
        assert!(!outcome.success(), "{id:?}");
        assert_eq!(outcome.error_keys()["id"], vec!["format"]);
    }
}

#[test]
#[serial]
fn errors_never_panic_on_malformed_input() {
    let inputs = [
        Value::Nil,
        Value::Int(7),
        Value::Seq(vec![Value::Nil]),
        Value::record([("topics", Value::Seq(vec![Value::Nil, Value::Int(1)]))]),
        Value::record([("topics", "not a list".into()), ("id", Value::Float(1.5))]),
    ];
    for input in inputs {
        let outcome = consumer_group().call(&input);
        assert!(!outcome.success());
        assert!(!outcome.errors().is_empty());
    }
}

#[test]
#[serial]
fn topic_errors_are_reported_per_field_class() {
    let mut cfg = with_second_topic("other");
    for index in 0..2 {
        let topic = topics_mut(&mut cfg).element_mut(index).expect("topic");
        topic.insert("max_messages", -1);
        topic.insert("initial_offset", "middle");
    }
    cfg.insert("id", "%^&*(");
    let outcome = consumer_group().call(&cfg);
    let keys = outcome.error_keys();
    assert_eq!(keys["id"], vec!["format"]);
    assert_eq!(keys["topics.max_messages"], vec!["format"]);
    assert_eq!(keys["topics.initial_offset"], vec!["format"]);
    assert_eq!(outcome.failures().len(), 3);
}

#[test]
#[serial]
fn wrong_typed_topic_fields_fail_their_format_rule() {
    let cases: Vec<(&str, Value)> = vec![
        ("id", "%^&*(".into()),
        ("id", Value::Int(2)),
        ("deserializer", "JsonDeserializer".into()),
        ("consumer", Value::Nil),
        ("kafka", Value::Int(1)),
        ("kafka", Value::Map(Default::default())),
        ("kafka", Value::record([("bootstrap.servers", Value::Seq(vec![]))])),
        ("max_wait_time", Value::Int(-1)),
        ("max_wait_time", Value::Float(1.5)),
        ("max_wait_time", "10000".into()),
        ("max_messages", Value::Bool(true)),
        ("manual_offset_management", "yes".into()),
        ("manual_offset_management", Value::Int(1)),
        ("initial_offset", Value::Nil),
    ];
    for (field, value) in cases {
        let mut cfg = config();
        topics_mut(&mut cfg)
            .element_mut(0)
            .expect("topic")
            .insert(field, value.clone());
        let outcome = consumer_group().call(&cfg);
        let keys = outcome.error_keys();
        let path = format!("topics.{field}");
        assert_eq!(keys.len(), 1, "{field} = {value:?}: {keys:?}");
        assert_eq!(keys[&path], vec!["format"], "{field} = {value:?}");
        assert!(!outcome.errors()[&path].is_empty());
    }
}

#[test]
#[serial]
fn wrong_typed_group_fields_fail_their_format_rule() {
    let cases: Vec<(&str, Value)> = vec![
        ("deserializer", "str".into()),
        ("deserializer", Value::Nil),
        ("topics", Value::record([("name", "events".into())])),
    ];
    for (field, value) in cases {
        let mut cfg = config();
        cfg.insert(field, value.clone());
        let outcome = consumer_group().call(&cfg);
        let keys = outcome.error_keys();
        assert_eq!(keys.len(), 1, "{field} = {value:?}: {keys:?}");
        assert_eq!(keys[field], vec!["format"], "{field} = {value:?}");
    }
}

#[test]
#[serial]
fn kafka_requires_bootstrap_servers() {
    let mut cfg = config();
    topics_mut(&mut cfg)
        .element_mut(0)
        .expect("topic")
        .insert("kafka", Value::record([("client.id", "app".into())]));
    let outcome = consumer_group().call(&cfg);
    assert_eq!(
        outcome.errors()["topics.kafka"],
        vec!["topics.kafka needs a non-empty 'bootstrap.servers' entry".to_string()]
    );
}

#[test]
#[serial]
fn topic_contract_checks_optional_subscription_group() {
    let contract = consumer_group_topic();
    let mut t = topic();
    t.remove("subscription_group");
    assert!(contract.call(&t).success());
    t.insert("subscription_group", "group-1");
    assert!(contract.call(&t).success());
    t.insert("subscription_group", "");
    assert_eq!(
        contract.call(&t).error_keys()["subscription_group"],
        vec!["format"]
    );
    t.insert("consumer", "NotAHandle");
    assert!(contract.call(&t).error_keys().contains_key("consumer"));
}

#[test]
#[serial]
fn repeated_calls_are_identical() {
    let contract = consumer_group();
    let mut cfg = with_namespaced_pair("some_namespaced_topic-name");
    cfg.insert("id", Value::Nil);
    let first = contract.call(&cfg);
    let second = contract.call(&cfg);
    assert_eq!(first, second);
    assert_eq!(first.errors(), second.errors());
    assert_eq!(first.success(), second.success());
}

#[test]
fn contracts_are_shareable_across_threads() {
    let contract = std::sync::Arc::new(consumer_group().with_policy(Policy::default()));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let contract = std::sync::Arc::clone(&contract);
            std::thread::spawn(move || contract.call(&config()).success())
        })
        .collect();
    for handle in handles {
        assert!(handle.join().expect("thread"));
    }
}
