use crate::rule::{Failure, MISSING};
use crate::rule_set::RuleSet;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

pub const DEFAULT_LOCALE: &str = "en";

const EMBEDDED_SOURCE: &str = include_str!("../locales/errors.yml");

static EMBEDDED: Lazy<Arc<MessageCatalog>> = Lazy::new(|| {
    Arc::new(
        MessageCatalog::from_yaml(EMBEDDED_SOURCE, DEFAULT_LOCALE).expect("embedded error catalog"),
    )
});

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("parsing message catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("locale {0:?} not present in message catalog")]
    UnknownLocale(String),
}

/// scope -> key -> template
type Scopes = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Deserialize)]
struct LocaleSection {
    #[serde(default)]
    validations: Scopes,
}

/// Error templates for one locale, laid out as `<locale>.validations.<scope>.<key>`.
///
/// A failure resolves to `{terminal}_{key}` (for example `topics_names_not_unique`) in its
/// rule set's scope, falling back to the bare `{key}` (`missing`). Templates may reference
/// `%{path}`.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageCatalog {
    locale: String,
    scopes: Scopes,
}

impl MessageCatalog {
    pub fn from_yaml(src: &str, locale: &str) -> Result<Self, CatalogError> {
        let mut locales: BTreeMap<String, LocaleSection> = serde_yaml::from_str(src)?;
        let section = locales
            .remove(locale)
            .ok_or_else(|| CatalogError::UnknownLocale(locale.to_string()))?;
        Ok(Self {
            locale: locale.to_string(),
            scopes: section.validations,
        })
    }

    /// The English catalog shipped with the crate.
    pub fn embedded() -> Arc<Self> {
        Arc::clone(&*EMBEDDED)
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn lookup(&self, scope: &str, terminal: &str, key: &str) -> Option<&str> {
        let messages = self.scopes.get(scope)?;
        messages
            .get(&format!("{terminal}_{key}"))
            .or_else(|| messages.get(key))
            .map(String::as_str)
    }

    /// Human-readable text for a failure. Never panics: a catalog miss is logged and a
    /// generic message is returned.
    pub fn render(&self, failure: &Failure) -> String {
        let path = failure.path.to_string();
        match self.lookup(failure.scope, failure.path.terminal(), failure.key) {
            Some(template) => template.replace("%{path}", &path),
            None => {
                tracing::warn!(
                    scope = failure.scope,
                    path = %path,
                    key = failure.key,
                    locale = %self.locale,
                    "no catalog message for failure"
                );
                format!("is invalid ({})", failure.key)
            }
        }
    }

    /// Catalog identities (`scope.key`) that a rule in `rules`, or any nested set, could
    /// report but this catalog cannot render. Empty means complete.
    pub fn audit(&self, rules: &RuleSet) -> Vec<String> {
        let mut unresolved = BTreeSet::new();
        for (owner, rule) in rules.walk() {
            let terminal = rule.path().terminal();
            if self.lookup(owner.name(), terminal, rule.key()).is_none() {
                unresolved.insert(format!("{}.{}", owner.name(), rule.catalog_key()));
            }
            if rule.is_required() && self.lookup(owner.name(), terminal, MISSING).is_none() {
                unresolved.insert(format!("{}.{terminal}_{MISSING}", owner.name()));
            }
        }
        unresolved.into_iter().collect()
    }

    /// YAML text of this locale's messages.
    pub fn serialized(&self) -> String {
        serde_yaml::to_string(&self.scopes).unwrap_or_default()
    }
}
