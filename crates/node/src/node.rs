//! The resolved-content node model.
//!
//! Raw JSON content decodes into this closed tagged union; the resolver
//! eliminates the intermediate forms (`Applicability`, `Switch`) so that a
//! fully resolved tree contains only `Asset` and `Value` nodes, `Multi`
//! containers of those, and `Empty` placeholders.
use serde_json::Value;

/// One segment of a structural path into decoded content (an object key or
/// an array position). Distinct from a binding path, which addresses the
/// data model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    pub fn key(s: impl Into<String>) -> Self {
        Segment::Key(s.into())
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::Key(k) => write!(f, "{}", k),
            Segment::Index(i) => write!(f, "{}", i),
        }
    }
}

/// A dynamic sub-node discovered while decoding a `Value`'s raw JSON,
/// addressed by its structural path relative to the owning node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeChild {
    pub path: Vec<Segment>,
    pub value: Node,
}

/// A decoded JSON leaf (or plain subtree). `children` records any nested
/// dynamic nodes so the resolver can patch them without re-decoding.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueNode {
    pub value: Value,
    pub children: Vec<NodeChild>,
}

impl ValueNode {
    pub fn leaf(value: Value) -> Self {
        ValueNode {
            value,
            children: Vec::new(),
        }
    }
}

/// A content unit with an `id` and `type`, decoded by a platform renderer.
/// Field order is declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetNode {
    pub id: String,
    pub kind: String,
    pub fields: Vec<(String, Node)>,
}

/// One arm of a switch: the first case whose expression evaluates truthy
/// supplies the resolved value.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub case: String,
    pub value: Node,
}

/// A content-level conditional. Static switches (`dynamic: false`) are
/// resolved once at decode time; dynamic switches re-resolve on every pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchNode {
    pub dynamic: bool,
    pub cases: Vec<SwitchCase>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Value(ValueNode),
    Asset(AssetNode),
    /// Conditional wrapper: the expression decides whether `value` survives.
    Applicability { expression: String, value: Box<Node> },
    Switch(SwitchNode),
    /// An ordered, array-expanded position in the tree.
    Multi(Vec<Node>),
    /// The distinguished no-op node a matchless switch resolves to. Kept
    /// distinct from removal so sibling array indices stay stable.
    Empty,
}

impl Node {
    pub fn leaf(value: Value) -> Self {
        Node::Value(ValueNode::leaf(value))
    }

    /// Renders a resolved tree as the UI-consumable JSON asset tree.
    /// `Empty` serializes as `null` to hold its sibling position.
    pub fn to_json(&self) -> Value {
        match self {
            Node::Value(v) => {
                let mut out = v.value.clone();
                for child in &v.children {
                    set_at_path(&mut out, &child.path, child.value.to_json());
                }
                out
            }
            Node::Asset(asset) => {
                let mut map = serde_json::Map::new();
                map.insert("id".to_string(), Value::String(asset.id.clone()));
                map.insert("type".to_string(), Value::String(asset.kind.clone()));
                for (key, node) in &asset.fields {
                    map.insert(key.clone(), node.to_json());
                }
                Value::Object(map)
            }
            Node::Multi(nodes) => Value::Array(nodes.iter().map(Node::to_json).collect()),
            Node::Empty => Value::Null,
            // Intermediate forms never survive resolution; render their
            // content as a best effort for diagnostics.
            Node::Applicability { value, .. } => value.to_json(),
            Node::Switch(_) => Value::Null,
        }
    }
}

fn set_at_path(target: &mut Value, path: &[Segment], replacement: Value) {
    let Some((head, tail)) = path.split_first() else {
        *target = replacement;
        return;
    };
    let slot = match (head, &mut *target) {
        (Segment::Key(k), Value::Object(map)) => map.get_mut(k),
        (Segment::Index(i), Value::Array(items)) => items.get_mut(*i),
        _ => None,
    };
    if let Some(slot) = slot {
        set_at_path(slot, tail, replacement);
    }
}

/// Locates a node by structural path, following the recorded `children` of
/// `Value` nodes. Among a node's children, the one sharing the longest exact
/// segment prefix with the target wins; if that child's full path is a
/// proper prefix of the target, the search recurses with the remaining
/// suffix. A failed lookup is `None`, never an error.
pub fn extract_node_from_path<'a>(node: &'a Node, target: &[Segment]) -> Option<&'a Node> {
    if target.is_empty() {
        return Some(node);
    }
    let Node::Value(value) = node else {
        return None;
    };
    let mut best: Option<(&NodeChild, usize)> = None;
    for child in &value.children {
        let shared = prefix_len(&child.path, target);
        if shared == 0 {
            continue;
        }
        if best.is_none_or(|(_, len)| shared > len) {
            best = Some((child, shared));
        }
    }
    let (child, shared) = best?;
    if shared < child.path.len() {
        // The child diverges from the target before its own path ends.
        return None;
    }
    if shared == target.len() {
        Some(&child.value)
    } else {
        extract_node_from_path(&child.value, &target[shared..])
    }
}

fn prefix_len(a: &[Segment], b: &[Segment]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}
