pub mod audit;
pub mod policy;
pub mod validate;

use anyhow::{Context, Result};
use groupcheck_policy::Policy;
use serde::Serialize;
use std::path::Path;

/// Install the policy from an optional file plus the environment.
pub(crate) fn load_policy(path: Option<&Path>) -> Result<Policy> {
    if let Some(p) = path {
        anyhow::ensure!(p.exists(), "policy file {} not found", p.display());
    }
    groupcheck_policy::init_from_config(path).context("loading validation policy")
}

pub(crate) fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}
