//! Process-wide policy flags read by contract rules during evaluation.
//!
//! The store is written at configuration time (policy file, environment, or host code) and
//! copied once at the start of every validation call, so rules never hold the lock.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{PoisonError, RwLock};

/// Environment override for [`Policy::strict_topics_namespacing`].
pub const ENV_STRICT_TOPICS_NAMESPACING: &str = "GROUPCHECK_STRICT_TOPICS_NAMESPACING";

#[derive(thiserror::Error, Debug)]
pub enum PolicyError {
    #[error("reading policy file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing policy file {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// When true, topic names are compared exactly as given. When false, `.` and `_` are
    /// treated as the same namespace separator before names are compared.
    #[serde(default = "default_strict_topics_namespacing")]
    pub strict_topics_namespacing: bool,
}

fn default_strict_topics_namespacing() -> bool {
    true
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            strict_topics_namespacing: default_strict_topics_namespacing(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PolicyFile {
    #[serde(default)]
    policy: Policy,
}

static STATE: OnceCell<RwLock<Policy>> = OnceCell::new();

fn cell() -> &'static RwLock<Policy> {
    STATE.get_or_init(|| RwLock::new(Policy::default()))
}

/// Snapshot of the policy currently in force.
pub fn current() -> Policy {
    *cell().read().unwrap_or_else(PoisonError::into_inner)
}

/// Install `policy` process-wide and return the previous one.
pub fn replace(policy: Policy) -> Policy {
    let mut st = cell().write().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *st, policy)
}

/// Mutate the process-wide policy in place and return the result.
pub fn update<F>(f: F) -> Policy
where
    F: FnOnce(&mut Policy),
{
    let mut st = cell().write().unwrap_or_else(PoisonError::into_inner);
    f(&mut st);
    *st
}

pub fn set_strict_topics_namespacing(enabled: bool) {
    update(|p| p.strict_topics_namespacing = enabled);
}

/// Restore the built-in defaults; returns the policy that was replaced.
pub fn reset() -> Policy {
    replace(Policy::default())
}

/// Parse a `[policy]` table from TOML text. Missing tables and keys fall back to defaults.
pub fn parse_toml(src: &str, origin: &str) -> Result<Policy, PolicyError> {
    toml::from_str::<PolicyFile>(src)
        .map(|file| file.policy)
        .map_err(|source| PolicyError::Toml {
            path: origin.to_string(),
            source,
        })
}

pub fn load_file(path: &Path) -> Result<Policy, PolicyError> {
    let origin = path.display().to_string();
    let src = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
        path: origin.clone(),
        source,
    })?;
    parse_toml(&src, &origin)
}

/// Accepts the usual spellings of a boolean switch.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Apply an environment override (if any) on top of `base`.
pub fn with_env_override(base: Policy, raw: Option<&str>) -> Result<Policy, PolicyError> {
    let Some(raw) = raw else {
        return Ok(base);
    };
    let enabled = parse_flag(raw).ok_or_else(|| PolicyError::InvalidEnv {
        var: ENV_STRICT_TOPICS_NAMESPACING,
        value: raw.to_string(),
    })?;
    Ok(Policy {
        strict_topics_namespacing: enabled,
    })
}

/// Load the policy from an optional TOML file plus the environment and install it
/// process-wide. A missing file means defaults; an unreadable or malformed one is an error.
pub fn init_from_config(path: Option<&Path>) -> Result<Policy, PolicyError> {
    let mut policy = match path {
        Some(p) if p.exists() => load_file(p)?,
        _ => Policy::default(),
    };
    let env = std::env::var(ENV_STRICT_TOPICS_NAMESPACING).ok();
    match with_env_override(policy, env.as_deref()) {
        Ok(p) => policy = p,
        Err(err) => tracing::warn!(%err, "ignoring policy environment override"),
    }
    replace(policy);
    tracing::info!(
        strict_topics_namespacing = policy.strict_topics_namespacing,
        "validation policy loaded"
    );
    Ok(policy)
}
