//! Decodes raw JSON content into the [`Node`] model.
//!
//! Decoding is bottom-up: every constructed node is threaded through the
//! registered `onCreateASTNode` hooks in registration order, which is where
//! parse-time rewrites (static switch resolution in particular) happen.
use crate::error::NodeError;
use crate::node::{AssetNode, Node, NodeChild, Segment, SwitchCase, SwitchNode, ValueNode};
use log::debug;
use serde_json::Value;
use weft_binding::contains_binding;

/// A named decode-time rewrite. Returning `Ok(None)` keeps the node as-is;
/// `Ok(Some(_))` replaces it for the rest of the hook pipeline. Errors are
/// surfaced as [`NodeError::Hook`].
pub type CreateHook<'h> = Box<dyn Fn(&Node) -> Result<Option<Node>, String> + 'h>;

/// Parses raw JSON content into a `Node` tree. The lifetime lets hooks
/// borrow the data model and evaluator they close over.
#[derive(Default)]
pub struct ContentParser<'h> {
    hooks: Vec<(String, CreateHook<'h>)>,
}

impl<'h> ContentParser<'h> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an `onCreateASTNode` hook. Hooks fire in registration order
    /// on every node as it is constructed.
    pub fn hook_on_create_ast_node<F>(&mut self, name: impl Into<String>, hook: F)
    where
        F: Fn(&Node) -> Result<Option<Node>, String> + 'h,
    {
        self.hooks.push((name.into(), Box::new(hook)));
    }

    pub fn parse(&self, content: &Value) -> Result<Node, NodeError> {
        debug!("decoding content node tree");
        self.decode(content)
    }

    fn decode(&self, raw: &Value) -> Result<Node, NodeError> {
        let node = match raw {
            Value::Object(map) => self.decode_object(map)?,
            Value::Array(items) => self.decode_array(items)?,
            other => Node::leaf(other.clone()),
        };
        self.apply_hooks(node)
    }

    fn decode_object(&self, map: &serde_json::Map<String, Value>) -> Result<Node, NodeError> {
        if let Some(expr) = map.get("applicability") {
            let expression = expression_string(expr)?;
            let mut rest = map.clone();
            rest.remove("applicability");
            let value = self.decode(&Value::Object(rest))?;
            return Ok(Node::Applicability {
                expression,
                value: Box::new(value),
            });
        }
        for (key, dynamic) in [("dynamicSwitch", true), ("staticSwitch", false)] {
            if let Some(cases) = map.get(key) {
                return self.decode_switch(cases, dynamic);
            }
        }
        if let (Some(Value::String(id)), Some(Value::String(kind))) =
            (map.get("id"), map.get("type"))
        {
            let mut fields = Vec::new();
            for (key, value) in map {
                if key == "id" || key == "type" {
                    continue;
                }
                fields.push((key.clone(), self.decode(value)?));
            }
            return Ok(Node::Asset(AssetNode {
                id: id.clone(),
                kind: kind.clone(),
                fields,
            }));
        }
        // Plain object: a Value node recording any dynamic sub-nodes as
        // children, addressable by structural path.
        let mut children = Vec::new();
        for (key, value) in map {
            let child = self.decode(value)?;
            if is_dynamic(&child) {
                children.push(NodeChild {
                    path: vec![Segment::Key(key.clone())],
                    value: child,
                });
            }
        }
        Ok(Node::Value(ValueNode {
            value: Value::Object(map.clone()),
            children,
        }))
    }

    fn decode_array(&self, items: &[Value]) -> Result<Node, NodeError> {
        let nodes = items
            .iter()
            .map(|item| self.decode(item))
            .collect::<Result<Vec<_>, _>>()?;
        if nodes.iter().any(is_dynamic) {
            Ok(Node::Multi(nodes))
        } else {
            Ok(Node::leaf(Value::Array(items.to_vec())))
        }
    }

    fn decode_switch(&self, cases_raw: &Value, dynamic: bool) -> Result<Node, NodeError> {
        let Value::Array(items) = cases_raw else {
            return Err(NodeError::Decode(
                "switch cases must be an array".to_string(),
            ));
        };
        let mut cases = Vec::new();
        for item in items {
            let Value::Object(entry) = item else {
                return Err(NodeError::Decode(
                    "switch case must be an object with 'case' and 'value'".to_string(),
                ));
            };
            let case = entry
                .get("case")
                .ok_or_else(|| NodeError::Decode("switch case missing 'case'".to_string()))
                .and_then(expression_string)?;
            let value_raw = entry
                .get("value")
                .ok_or_else(|| NodeError::Decode("switch case missing 'value'".to_string()))?;
            cases.push(SwitchCase {
                case,
                value: self.decode(value_raw)?,
            });
        }
        Ok(Node::Switch(SwitchNode { dynamic, cases }))
    }

    fn apply_hooks(&self, mut node: Node) -> Result<Node, NodeError> {
        for (name, hook) in &self.hooks {
            match hook(&node) {
                Ok(Some(replacement)) => node = replacement,
                Ok(None) => {}
                Err(message) => {
                    return Err(NodeError::Hook {
                        name: name.clone(),
                        message,
                    });
                }
            }
        }
        Ok(node)
    }
}

/// True if a node needs resolver attention: anything but a plain static
/// `Value` leaf.
fn is_dynamic(node: &Node) -> bool {
    match node {
        Node::Value(v) => {
            if !v.children.is_empty() {
                return true;
            }
            matches!(&v.value, Value::String(s) if contains_binding(s))
        }
        Node::Asset(_)
        | Node::Applicability { .. }
        | Node::Switch(_)
        | Node::Multi(_)
        | Node::Empty => true,
    }
}

/// Case and applicability expressions may be written as strings or bare
/// scalars in the wire format.
fn expression_string(raw: &Value) -> Result<String, NodeError> {
    match raw {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(NodeError::Decode(format!(
            "expected an expression string, found: {}",
            other
        ))),
    }
}
