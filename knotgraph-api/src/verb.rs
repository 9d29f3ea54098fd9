//! Relationship semantics.
//!
//! A [`Verb`] tells the plan builder what a relationship kind points at: the
//! label expected on the destination node and the attribute that `Has(kind,
//! value)` compares against.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Match attribute used when a verb leaves `match_on` empty, or when the
/// relationship kind has no registered verb.
pub const DEFAULT_MATCH_PROPERTY: &str = "name";

/// Target label assumed for relationship kinds without a registered verb.
pub const FALLBACK_TARGET_LABEL: &str = "Entity";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verb {
    /// Expected label of the destination node.
    pub target_label: String,
    /// Property compared by `Has(kind, value)`.
    pub match_on: String,
}

impl Verb {
    pub fn new(target_label: impl Into<String>, match_on: impl Into<String>) -> Self {
        Self {
            target_label: target_label.into(),
            match_on: match_on.into(),
        }
    }

    /// The effective match attribute, falling back to [`DEFAULT_MATCH_PROPERTY`].
    pub fn match_property(&self) -> &str {
        if self.match_on.is_empty() {
            DEFAULT_MATCH_PROPERTY
        } else {
            &self.match_on
        }
    }
}

/// Concurrent map from relationship kind to its [`Verb`].
///
/// Lookups are exact and case-sensitive: `has_skill` and `HAS_SKILL` are
/// distinct verbs. The registry carries its own lock, independent of the
/// graph store, so verbs can be registered while queries run.
#[derive(Debug, Default)]
pub struct VerbRegistry {
    verbs: RwLock<BTreeMap<String, Verb>>,
}

impl VerbRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `verb` under `name`, replacing any previous definition.
    pub fn register(&self, name: impl Into<String>, verb: Verb) {
        self.verbs.write().insert(name.into(), verb);
    }

    pub fn unregister(&self, name: &str) -> Option<Verb> {
        self.verbs.write().remove(name)
    }

    pub fn lookup(&self, name: &str) -> Option<Verb> {
        self.verbs.read().get(name).cloned()
    }

    /// A point-in-time copy of every registered verb.
    pub fn all(&self) -> BTreeMap<String, Verb> {
        self.verbs.read().clone()
    }

    /// Swaps the whole registry contents in one step.
    pub fn replace_all(&self, verbs: BTreeMap<String, Verb>) {
        *self.verbs.write() = verbs;
    }

    pub fn len(&self) -> usize {
        self.verbs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.read().is_empty()
    }
}
