use crate::catalog::MessageCatalog;
use crate::rule::Failure;
use once_cell::sync::OnceCell;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Rendered messages keyed by dotted path.
pub type Errors = BTreeMap<String, Vec<String>>;

/// Result of one contract call. Holds the raw failures; human-readable errors are rendered on
/// first access and cached.
#[derive(Debug, Clone)]
pub struct Outcome {
    failures: Vec<Failure>,
    catalog: Arc<MessageCatalog>,
    rendered: OnceCell<Errors>,
}

impl Outcome {
    /// Accepts any failure list, duplicates included.
    pub fn new<I>(failures: I, catalog: Arc<MessageCatalog>) -> Self
    where
        I: IntoIterator<Item = Failure>,
    {
        let mut seen = HashSet::new();
        let failures = failures
            .into_iter()
            .filter(|f| seen.insert(f.clone()))
            .collect();
        Self {
            failures,
            catalog,
            rendered: OnceCell::new(),
        }
    }

    pub fn success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// Raw error keys keyed by dotted path.
    pub fn error_keys(&self) -> BTreeMap<String, Vec<&'static str>> {
        let mut out: BTreeMap<String, Vec<&'static str>> = BTreeMap::new();
        for f in &self.failures {
            out.entry(f.path.to_string()).or_default().push(f.key);
        }
        out
    }

    /// `path -> [message]`. Empty exactly when [`Outcome::success`] is true.
    pub fn errors(&self) -> &Errors {
        self.rendered.get_or_init(|| {
            let mut out = Errors::new();
            for f in &self.failures {
                let messages = out.entry(f.path.to_string()).or_default();
                let message = self.catalog.render(f);
                if !messages.contains(&message) {
                    messages.push(message);
                }
            }
            out
        })
    }
}

impl PartialEq for Outcome {
    fn eq(&self, other: &Self) -> bool {
        self.failures == other.failures
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("Outcome", 2)?;
        st.serialize_field("success", &self.success())?;
        st.serialize_field("errors", self.errors())?;
        st.end()
    }
}
