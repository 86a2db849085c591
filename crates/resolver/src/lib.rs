//! The view resolver.
//!
//! Given a decoded content tree, a resolution pass threads every node
//! through an ordered chain of named `beforeResolve` taps (where
//! applicability and switch resolution live), then recurses structurally to
//! produce a tree of only concrete nodes. Passes are synchronous,
//! deterministic and re-runnable on every data-model change.

pub mod error;
pub mod hooks;
pub mod plugins;
pub mod resolver;

// --- Public API ---
pub use error::{AssetFrame, ResolveError, ResolveErrorKind};
pub use hooks::TapList;
pub use plugins::{
    APPLICABILITY_TAP, DYNAMIC_SWITCH_TAP, applicability_tap, default_resolver,
    dynamic_switch_tap, resolve_static_switch,
};
pub use resolver::{BeforeResolveTap, ResolveContext, Resolver, resolve_binding_string};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use weft_data::{BasicEvaluator, LocalModel};
    use weft_node::{ContentParser, Node};

    fn ctx_fixture(model: &LocalModel) -> (BasicEvaluator<'_>, &LocalModel) {
        (BasicEvaluator::new(model), model)
    }

    #[test]
    fn taps_fire_in_registration_order() {
        let model = LocalModel::new(json!({}));
        let (evaluator, model_ref) = ctx_fixture(&model);
        let ctx = ResolveContext {
            evaluator: &evaluator,
            model: model_ref,
        };

        let mut resolver = Resolver::new();
        resolver.hooks.before_resolve.tap(
            "stamp-a",
            Box::new(|node: Option<Node>, _: &ResolveContext| {
                Ok(node.map(|n| match n {
                    Node::Value(v) if v.value == json!("seed") => Node::leaf(json!("a")),
                    other => other,
                }))
            }) as BeforeResolveTap,
        );
        resolver.hooks.before_resolve.tap(
            "stamp-b",
            Box::new(|node: Option<Node>, _: &ResolveContext| {
                Ok(node.map(|n| match n {
                    Node::Value(v) if v.value == json!("a") => Node::leaf(json!("ab")),
                    other => other,
                }))
            }) as BeforeResolveTap,
        );

        let resolved = resolver
            .resolve(&Node::leaf(json!("seed")), &ctx)
            .unwrap()
            .unwrap();
        assert_eq!(resolved, Node::leaf(json!("ab")));
    }

    #[test]
    fn tap_error_gains_ancestor_breadcrumbs() {
        let model = LocalModel::new(json!({}));
        let (evaluator, model_ref) = ctx_fixture(&model);
        let ctx = ResolveContext {
            evaluator: &evaluator,
            model: model_ref,
        };

        let content = json!({
            "id": "root", "type": "view",
            "body": {
                "id": "inner", "type": "text",
                "value": { "id": "target", "type": "marker" }
            }
        });
        let node = ContentParser::new().parse(&content).unwrap();

        let mut resolver = Resolver::new();
        resolver.hooks.before_resolve.tap(
            "explode-on-marker",
            Box::new(|node: Option<Node>, _: &ResolveContext| match node {
                Some(Node::Asset(ref asset)) if asset.kind == "marker" => {
                    Err(ResolveError::tap("explode-on-marker", "marker rejected"))
                }
                other => Ok(other),
            }) as BeforeResolveTap,
        );

        let err = resolver.resolve(&node, &ctx).unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains("marker rejected"), "{}", rendered);
        assert!(
            rendered.contains("found in (root, view) -> (inner, text)"),
            "{}",
            rendered
        );
    }

    #[test]
    fn whole_string_binding_takes_the_model_value_type() {
        let model = LocalModel::new(json!({ "count": 4 }));
        let (evaluator, model_ref) = ctx_fixture(&model);
        let ctx = ResolveContext {
            evaluator: &evaluator,
            model: model_ref,
        };
        let resolved = resolve_binding_string("{{count}}", &ctx).unwrap();
        assert_eq!(resolved, json!(4));
    }

    #[test]
    fn partial_binding_interpolates_as_text() {
        let model = LocalModel::new(json!({ "name": "ada", "n": 2 }));
        let (evaluator, model_ref) = ctx_fixture(&model);
        let ctx = ResolveContext {
            evaluator: &evaluator,
            model: model_ref,
        };
        let resolved = resolve_binding_string("hi {{name}}, you have {{n}}", &ctx).unwrap();
        assert_eq!(resolved, json!("hi ada, you have 2"));
    }

    #[test]
    fn nested_binding_resolves_through_the_model() {
        let model = LocalModel::new(json!({ "foo": { "bar": "hello" }, "key": "bar" }));
        let (evaluator, model_ref) = ctx_fixture(&model);
        let ctx = ResolveContext {
            evaluator: &evaluator,
            model: model_ref,
        };
        assert_eq!(
            resolve_binding_string("{{foo.{{key}}}}", &ctx).unwrap(),
            json!("hello")
        );
        assert_eq!(
            resolve_binding_string("say {{foo.{{key}}}}!", &ctx).unwrap(),
            json!("say hello!")
        );
    }

    #[test]
    fn malformed_binding_in_content_is_an_error() {
        let model = LocalModel::new(json!({}));
        let (evaluator, model_ref) = ctx_fixture(&model);
        let ctx = ResolveContext {
            evaluator: &evaluator,
            model: model_ref,
        };
        let result = resolve_binding_string("{{foo..bar}}", &ctx);
        assert!(matches!(
            result,
            Err(ResolveError {
                kind: ResolveErrorKind::Eval(_),
                ..
            })
        ));
    }

    #[test]
    fn value_fields_with_bindings_resolve_in_place() {
        let model = LocalModel::new(json!({ "user": { "name": "ada" } }));
        let (evaluator, model_ref) = ctx_fixture(&model);
        let ctx = ResolveContext {
            evaluator: &evaluator,
            model: model_ref,
        };
        let node = ContentParser::new()
            .parse(&json!({ "greeting": "{{user.name}}", "static": true }))
            .unwrap();
        let resolved = default_resolver().resolve(&node, &ctx).unwrap().unwrap();
        assert_eq!(
            resolved.to_json(),
            json!({ "greeting": "ada", "static": true })
        );
    }
}
