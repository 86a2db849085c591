//! The resolution pass: before-resolve taps, then structural recursion.
use crate::error::ResolveError;
use crate::hooks::TapList;
use log::debug;
use serde_json::Value;
use weft_data::{DataModel, EvalError, ExpressionEvaluator};
use weft_node::{AssetNode, Node, NodeChild, Segment, ValueNode};

/// Everything a tap can see during a pass. The model is read-only here;
/// writes flow through the controller boundary between passes.
pub struct ResolveContext<'a> {
    pub evaluator: &'a dyn ExpressionEvaluator,
    pub model: &'a dyn DataModel,
}

/// A `beforeResolve` tap: may rewrite the node, delete it (`None`), or pass
/// it through. Taps form a sequential pipeline; each sees the output of the
/// previous one.
pub type BeforeResolveTap =
    Box<dyn Fn(Option<Node>, &ResolveContext) -> Result<Option<Node>, ResolveError>>;

#[derive(Default)]
pub struct ResolverHooks {
    pub before_resolve: TapList<BeforeResolveTap>,
}

/// Transforms a decoded content tree into a UI-consumable tree. A pass is
/// synchronous and run-to-completion; re-running it against the same input
/// is idempotent because every pass re-applies the full tap chain.
#[derive(Default)]
pub struct Resolver {
    pub hooks: ResolverHooks,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one resolution pass over `node`. `None` means the node resolved
    /// to nothing (an applicability removed it).
    pub fn resolve(
        &self,
        node: &Node,
        ctx: &ResolveContext,
    ) -> Result<Option<Node>, ResolveError> {
        debug!("resolution pass ({} before-resolve taps)", self.hooks.before_resolve.len());
        self.resolve_node(node, ctx)
    }

    fn resolve_node(
        &self,
        node: &Node,
        ctx: &ResolveContext,
    ) -> Result<Option<Node>, ResolveError> {
        // Phase 1: the before-resolve pipeline. Parent runs before children.
        // The chain re-applies until the node stabilizes so a rewrite
        // produced by a late tap (a switch arm holding an applicability) is
        // still seen by earlier taps. Taps must be idempotent.
        let mut current = Some(node.clone());
        loop {
            let mut next = current.clone();
            for (_, tap) in self.hooks.before_resolve.iter() {
                next = tap(next, ctx)?;
            }
            if next == current {
                break;
            }
            current = next;
            if current.is_none() {
                break;
            }
        }
        let Some(current) = current else {
            return Ok(None);
        };

        // Phase 2: structural recursion in declaration order. A parent is
        // complete only once all of its children are.
        match current {
            Node::Asset(asset) => self
                .resolve_asset(asset, ctx)
                .map(|resolved| Some(Node::Asset(resolved))),
            Node::Value(value) => self
                .resolve_value(value, ctx)
                .map(|resolved| Some(Node::Value(resolved))),
            Node::Multi(items) => {
                let mut resolved = Vec::new();
                for item in &items {
                    // Removed nodes vanish; Empty placeholders survive to
                    // keep sibling indices stable.
                    if let Some(node) = self.resolve_node(item, ctx)? {
                        resolved.push(node);
                    }
                }
                Ok(Some(Node::Multi(resolved)))
            }
            Node::Empty => Ok(Some(Node::Empty)),
            // Without the default taps installed these forms pass through
            // with their content resolved as far as structure allows.
            Node::Applicability { expression, value } => {
                let inner = self.resolve_node(&value, ctx)?.unwrap_or(Node::Empty);
                Ok(Some(Node::Applicability {
                    expression,
                    value: Box::new(inner),
                }))
            }
            Node::Switch(switch) => Ok(Some(Node::Switch(switch))),
        }
    }

    fn resolve_asset(
        &self,
        asset: AssetNode,
        ctx: &ResolveContext,
    ) -> Result<AssetNode, ResolveError> {
        let mut fields = Vec::new();
        for (key, child) in &asset.fields {
            let resolved = self
                .resolve_node(child, ctx)
                .map_err(|e| e.with_frame(&asset.id, &asset.kind))?;
            if let Some(node) = resolved {
                fields.push((key.clone(), node));
            }
        }
        Ok(AssetNode {
            id: asset.id,
            kind: asset.kind,
            fields,
        })
    }

    fn resolve_value(
        &self,
        value: ValueNode,
        ctx: &ResolveContext,
    ) -> Result<ValueNode, ResolveError> {
        let mut raw = value.value.clone();
        let mut children = Vec::new();
        for child in &value.children {
            match self.resolve_node(&child.value, ctx)? {
                Some(resolved) => children.push(NodeChild {
                    path: child.path.clone(),
                    value: resolved,
                }),
                None => remove_at_path(&mut raw, &child.path),
            }
        }
        if children.is_empty()
            && let Value::String(s) = &raw
            && weft_binding::contains_binding(s)
        {
            raw = resolve_binding_string(s, ctx)?;
        }
        Ok(ValueNode {
            value: raw,
            children,
        })
    }
}

/// Deletes the value at `path`. Object keys are removed outright; array
/// positions are nulled so sibling indices stay stable.
fn remove_at_path(target: &mut Value, path: &[Segment]) {
    let Some((head, tail)) = path.split_first() else {
        *target = Value::Null;
        return;
    };
    match (head, &mut *target) {
        (Segment::Key(k), Value::Object(map)) => {
            if tail.is_empty() {
                map.remove(k);
            } else if let Some(slot) = map.get_mut(k) {
                remove_at_path(slot, tail);
            }
        }
        (Segment::Index(i), Value::Array(items)) => {
            if let Some(slot) = items.get_mut(*i) {
                if tail.is_empty() {
                    *slot = Value::Null;
                } else {
                    remove_at_path(slot, tail);
                }
            }
        }
        _ => {}
    }
}

/// Resolves the binding syntax inside a raw string value. A string that is
/// exactly one `{{binding}}` takes the model value wholesale (whatever its
/// type); anything else interpolates each binding's display form into the
/// surrounding text.
pub fn resolve_binding_string(s: &str, ctx: &ResolveContext) -> Result<Value, ResolveError> {
    let trimmed = s.trim();
    if let Some(body) = trimmed.strip_prefix("{{")
        && let Some(end) = weft_binding::closing_brace_offset(body)
        && body[end + 2..].is_empty()
    {
        let path = weft_binding::parse(&body[..end]).map_err(EvalError::from)?;
        return Ok(ctx.model.get(&path).unwrap_or(Value::Null));
    }

    let mut out = String::new();
    let mut rest = s;
    while let Some(start) = rest.find("{{") {
        let body = &rest[start + 2..];
        let Some(end) = weft_binding::closing_brace_offset(body) else {
            break;
        };
        out.push_str(&rest[..start]);
        let path = weft_binding::parse(&body[..end]).map_err(EvalError::from)?;
        let resolved = ctx.model.get(&path).unwrap_or(Value::Null);
        out.push_str(&display_value(&resolved));
        rest = &body[end + 2..];
    }
    out.push_str(rest);
    Ok(Value::String(out))
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
