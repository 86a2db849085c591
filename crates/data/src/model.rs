//! The data-model accessor: read and write model values by parsed binding.
use crate::eval::loose_eq;
use serde_json::Value;
use weft_binding::{AnyNode, PathNode};

/// The model boundary the resolver reads through. Writes happen only as a
/// side effect of action handlers, outside resolution.
pub trait DataModel {
    /// Reads the value a binding points at, or `None` if the path does not
    /// resolve.
    fn get(&self, binding: &PathNode) -> Option<Value>;

    /// Applies a write transaction of `(binding, value)` pairs.
    fn set(&mut self, transaction: &[(PathNode, Value)]);
}

/// A binding segment reduced to its concrete lookup form.
enum FlatSegment {
    Key(String),
    Query { key: String, value: Option<Value> },
}

/// An in-memory model backed by a JSON tree.
#[derive(Debug, Clone, Default)]
pub struct LocalModel {
    data: Value,
}

impl LocalModel {
    pub fn new(data: Value) -> Self {
        LocalModel { data }
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Reduces a binding segment to a key or query. Nested paths resolve
    /// against the model first and splice in; concatenations join their
    /// resolved parts. Backtick expressions belong to the expression
    /// evaluator and do not resolve at the model layer.
    fn flatten_segment(&self, segment: &AnyNode) -> Option<FlatSegment> {
        match segment {
            AnyNode::Query { key, value } => Some(FlatSegment::Query {
                key: self.segment_key(key)?,
                value: match value {
                    Some(v) => Some(self.segment_value(v)?),
                    None => None,
                },
            }),
            other => self.segment_key(other).map(FlatSegment::Key),
        }
    }

    fn segment_key(&self, segment: &AnyNode) -> Option<String> {
        self.segment_value(segment).map(|v| match v {
            Value::String(s) => s,
            other => other.to_string(),
        })
    }

    fn segment_value(&self, segment: &AnyNode) -> Option<Value> {
        match segment {
            AnyNode::Value(lit) => Some(Value::String(lit.as_key())),
            AnyNode::Path(inner) => self.get(&PathNode::new(inner.clone())),
            AnyNode::Concatenated(parts) => {
                let mut joined = String::new();
                for part in parts {
                    joined.push_str(&self.segment_key(part)?);
                }
                Some(Value::String(joined))
            }
            AnyNode::Expression(_) | AnyNode::Query { .. } => None,
        }
    }

    fn walk<'a>(&self, current: &'a Value, segment: &FlatSegment) -> Option<&'a Value> {
        match segment {
            FlatSegment::Key(key) => match current {
                Value::Object(map) => map.get(key),
                Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            },
            FlatSegment::Query { key, value } => {
                current.as_array()?.iter().find(|item| match value {
                    Some(expected) => item.get(key).is_some_and(|found| loose_eq(found, expected)),
                    None => item.get(key).is_some(),
                })
            }
        }
    }
}

impl DataModel for LocalModel {
    fn get(&self, binding: &PathNode) -> Option<Value> {
        let mut current = &self.data;
        for segment in &binding.path {
            let flat = self.flatten_segment(segment)?;
            current = self.walk(current, &flat)?;
        }
        Some(current.clone())
    }

    fn set(&mut self, transaction: &[(PathNode, Value)]) {
        for (binding, value) in transaction {
            let keys: Option<Vec<String>> = binding
                .path
                .iter()
                .map(|segment| self.segment_key(segment))
                .collect();
            let Some(keys) = keys else {
                continue;
            };
            set_at(&mut self.data, &keys, value.clone());
        }
    }
}

/// Writes `value` at the given key path, creating intermediate objects as
/// needed. Array positions are written in place and never grown.
fn set_at(target: &mut Value, keys: &[String], value: Value) {
    let Some((head, tail)) = keys.split_first() else {
        *target = value;
        return;
    };
    match target {
        Value::Array(items) => {
            if let Some(slot) = head.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
                set_at(slot, tail, value);
            }
        }
        Value::Object(map) => {
            let slot = map
                .entry(head.clone())
                .or_insert(Value::Object(serde_json::Map::new()));
            set_at(slot, tail, value);
        }
        other => {
            let mut map = serde_json::Map::new();
            map.insert(head.clone(), Value::Null);
            *other = Value::Object(map);
            if let Some(slot) = other.get_mut(head) {
                set_at(slot, tail, value);
            }
        }
    }
}
