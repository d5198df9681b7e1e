//! Loading consumer group definitions from disk.
//!
//! Capability fields (`deserializer`, `consumer`) are written as names in documents and bound
//! to opaque handles here; anything that is not a string is left for the contract to reject.

use anyhow::{bail, Context, Result};
use groupcheck_contracts::{Handle, Value};
use serde_json::Value as JsonValue;
use std::path::Path;

const GROUP_CAPABILITIES: [&str; 1] = ["deserializer"];
const TOPIC_CAPABILITIES: [&str; 2] = ["consumer", "deserializer"];

pub(crate) fn load_document(path: &Path) -> Result<JsonValue> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let doc = match ext.as_str() {
        "json" => serde_json::from_str(&raw)
            .with_context(|| format!("parsing JSON {}", path.display()))?,
        "yaml" | "yml" => serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing YAML {}", path.display()))?,
        "toml" => {
            let value: toml::Value = toml::from_str(&raw)
                .with_context(|| format!("parsing TOML {}", path.display()))?;
            serde_json::to_value(value)?
        }
        other => bail!(
            "unsupported extension {other:?} for {} (expected json, yaml, yml or toml)",
            path.display()
        ),
    };
    Ok(doc)
}

/// Replace capability names with handles, in place.
pub(crate) fn bind_capabilities(group: &mut Value) {
    bind_fields(group, &GROUP_CAPABILITIES);
    if let Some(Value::Seq(topics)) = group.get_mut("topics") {
        for topic in topics {
            bind_fields(topic, &TOPIC_CAPABILITIES);
        }
    }
}

fn bind_fields(record: &mut Value, fields: &[&str]) {
    for field in fields {
        let Some(slot) = record.get_mut(field) else {
            continue;
        };
        if let Some(name) = slot.as_str().map(str::to_owned) {
            *slot = Value::Handle(Handle::new(name));
        }
    }
}

pub(crate) fn load_consumer_group(path: &Path) -> Result<Value> {
    let mut group = Value::from(load_document(path)?);
    bind_capabilities(&mut group);
    tracing::debug!(path = %path.display(), "consumer group loaded");
    Ok(group)
}
