//! The built-in resolution stages: applicability and switch.
use crate::resolver::{BeforeResolveTap, Resolver};
use weft_data::ExpressionEvaluator;
use weft_node::Node;

/// Tap names, also useful to tests asserting registration order.
pub const APPLICABILITY_TAP: &str = "applicability";
pub const DYNAMIC_SWITCH_TAP: &str = "dynamic-switch";

/// Builds a resolver with the standard tap chain installed: applicability
/// first, then dynamic switch, so an unwrapped applicability value still
/// flows through switch resolution.
pub fn default_resolver() -> Resolver {
    let mut resolver = Resolver::new();
    resolver
        .hooks
        .before_resolve
        .tap(APPLICABILITY_TAP, applicability_tap());
    resolver
        .hooks
        .before_resolve
        .tap(DYNAMIC_SWITCH_TAP, dynamic_switch_tap());
    resolver
}

/// Evaluates applicability expressions: a falsy expression deletes the node
/// and its whole subtree; a truthy one unwraps the value and resolution
/// continues on it.
pub fn applicability_tap() -> BeforeResolveTap {
    Box::new(|node, ctx| {
        let mut current = node;
        while let Some(Node::Applicability { expression, value }) = current {
            if ctx.evaluator.evaluate_as_bool(&expression)? {
                current = Some(*value);
            } else {
                return Ok(None);
            }
        }
        Ok(current)
    })
}

/// Resolves dynamic switches: case expressions are tried in declared order
/// and the first truthy one wins. No match yields the distinguished empty
/// node, keeping sibling bookkeeping stable. Static switches are not
/// handled here; they were locked in at decode time.
pub fn dynamic_switch_tap() -> BeforeResolveTap {
    Box::new(|node, ctx| match node {
        Some(Node::Switch(switch)) if switch.dynamic => {
            for case in switch.cases {
                if ctx.evaluator.evaluate_as_bool(&case.case)? {
                    return Ok(Some(case.value));
                }
            }
            Ok(Some(Node::Empty))
        }
        other => Ok(other),
    })
}

/// The decode-time (`onCreateASTNode`) stage for static switches: resolved
/// once as the node is constructed, so they never pay a re-evaluation cost
/// on data changes. Install via `ContentParser::hook_on_create_ast_node`.
pub fn resolve_static_switch(
    node: &Node,
    evaluator: &dyn ExpressionEvaluator,
) -> Result<Option<Node>, String> {
    let Node::Switch(switch) = node else {
        return Ok(None);
    };
    if switch.dynamic {
        return Ok(None);
    }
    for case in &switch.cases {
        let matched = evaluator
            .evaluate_as_bool(&case.case)
            .map_err(|e| e.to_string())?;
        if matched {
            return Ok(Some(case.value.clone()));
        }
    }
    Ok(Some(Node::Empty))
}
