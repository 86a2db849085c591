//! A registry keyed by partial object patterns rather than exact keys.
//!
//! A pattern like `{"type": "action"}` matches any candidate object carrying
//! that key/value pair, however many other fields the candidate has. Lookup
//! returns the value of the *most specific* matching pattern, where
//! specificity is the number of leaf key/value pairs in the flattened
//! pattern. Asset-implementation lookup and test fingerprinting are both
//! built on this structure.

use serde_json::Value;

/// One registered pattern with its flattened pair list and payload.
struct Entry<V> {
    pattern: Value,
    pairs: Vec<(Vec<String>, Value)>,
    value: V,
}

impl<V> Entry<V> {
    fn specificity(&self) -> usize {
        self.pairs.len()
    }

    fn matches(&self, candidate: &Value) -> bool {
        self.pairs
            .iter()
            .all(|(path, leaf)| lookup_path(candidate, path) == Some(leaf))
    }
}

/// Specificity-ordered pattern registry.
///
/// Entries are stored in ascending specificity order; [`get`] scans from the
/// most specific entry down, so the tightest matching pattern wins. Equal
/// specificities break toward the most recently inserted entry.
///
/// [`get`]: PartialMatchRegistry::get
pub struct PartialMatchRegistry<V> {
    entries: Vec<Entry<V>>,
}

impl<V> Default for PartialMatchRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> PartialMatchRegistry<V> {
    pub fn new() -> Self {
        PartialMatchRegistry {
            entries: Vec::new(),
        }
    }

    /// Registers `value` under `pattern`. A pattern that is deep-value equal
    /// to an existing one overwrites that entry in place; otherwise the new
    /// entry is inserted after all entries of equal or lower specificity.
    pub fn set(&mut self, pattern: Value, value: V) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.pattern == pattern) {
            existing.value = value;
            return;
        }
        let entry = Entry {
            pairs: flatten(&pattern),
            pattern,
            value,
        };
        let at = self
            .entries
            .partition_point(|e| e.specificity() <= entry.specificity());
        self.entries.insert(at, entry);
    }

    /// Returns the value of the most specific pattern matching `query`, or
    /// `None` if nothing matches. A miss is an expected case, not an error.
    pub fn get(&self, query: &Value) -> Option<&V> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.matches(query))
            .map(|e| &e.value)
    }

    /// Iterates entries in stored (specificity-ascending) order. Callers
    /// needing most-specific-first iterate in reverse themselves.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &V)> {
        self.entries.iter().map(|e| (&e.pattern, &e.value))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Flattens a pattern into `(dotted path, leaf)` pairs by depth-first
/// traversal. Only plain objects are descended into; arrays and scalars are
/// leaves. A primitive pattern degenerates to a single empty-path pair,
/// which makes its matcher an identity-equality check.
fn flatten(pattern: &Value) -> Vec<(Vec<String>, Value)> {
    match pattern {
        Value::Object(_) => {
            let mut out = Vec::new();
            let mut prefix = Vec::new();
            walk(pattern, &mut prefix, &mut out);
            out
        }
        other => vec![(Vec::new(), other.clone())],
    }
}

fn walk(value: &Value, prefix: &mut Vec<String>, out: &mut Vec<(Vec<String>, Value)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                prefix.push(key.clone());
                walk(child, prefix, out);
                prefix.pop();
            }
        }
        leaf => out.push((prefix.clone(), leaf.clone())),
    }
}

/// Deep lookup of a dotted path in a candidate value. An empty path is the
/// candidate itself.
fn lookup_path<'a>(candidate: &'a Value, path: &[String]) -> Option<&'a Value> {
    let mut current = candidate;
    for key in path {
        current = current.as_object()?.get(key)?;
    }
    Some(current)
}
