//! The ordered, fixed-shape result map (component C1).
//!
//! Mirrors the shape of `juniper::value::Object`, but trades its
//! merge-on-insert `add_field` for the stricter contract §4.1 asks for: once
//! built, a map's key set is frozen. Values only ever move through
//! `update`, never through insertion — the planner, not this container, is
//! the source of truth for which keys a result map has.

use std::fmt;

use indexmap::IndexMap;

use super::Value;

/// Failure returned by a [`ResultMap`] operation that the fixed-shape
/// contract forbids (looking up, or updating, a key that was never part of
/// the map's shape).
#[derive(Clone, Debug, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ResultMapError {
    #[display("key {_0:?} is not present in this result map")]
    MissingKey(#[error(not(source))] String),
}

/// An ordered key/value container with a shape fixed at construction time.
///
/// This is the node type of the response tree: every GraphQL object value
/// produced by completion (§4.5) is a `ResultMap`. Keys cannot be added or
/// removed after construction — only [`ResultMap::update`] may change a
/// value, and only for a key that already exists.
#[derive(Clone, Debug)]
pub struct ResultMap {
    entries: IndexMap<String, Value>,
}

impl ResultMap {
    /// Builds a map from an ordered list of keys, each initialised to
    /// [`Value::Null`].
    pub fn from_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let mut entries = IndexMap::new();
        for k in keys {
            entries.entry(k.into()).or_insert(Value::Null);
        }
        Self { entries }
    }

    /// Builds a map from an ordered list of (key, value) pairs. If a key
    /// repeats, the first occurrence wins and later ones are dropped —
    /// matching §4.1 ("duplicate keys: first occurrence wins").
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut entries = IndexMap::new();
        for (k, v) in pairs {
            entries.entry(k.into()).or_insert(v);
        }
        Self { entries }
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up `key`. Fails if the key is not part of this map's shape.
    pub fn get(&self, key: &str) -> Result<&Value, ResultMapError> {
        self.entries
            .get(key)
            .ok_or_else(|| ResultMapError::MissingKey(key.to_owned()))
    }

    /// Replaces the value stored at `key`. Fails if the key is absent.
    pub fn update(&mut self, key: &str, value: Value) -> Result<(), ResultMapError> {
        match self.entries.get_mut(key) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(ResultMapError::MissingKey(key.to_owned())),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl PartialEq for ResultMap {
    /// Structural equality: same keys in the same order, each value equal —
    /// nested maps and sequences are compared recursively through
    /// [`Value`]'s own `PartialEq`.
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Display for ResultMap {
    /// Deterministic, human-readable rendering for diagnostics only — not a
    /// wire format. `{ k: v, k2: v2 }`, matching the notation of the GraphQL
    /// response tree it mirrors.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{k}: {v}")?;
        }
        write!(f, " }}")
    }
}

impl From<ResultMap> for Value {
    fn from(m: ResultMap) -> Self {
        Value::Object(m)
    }
}
