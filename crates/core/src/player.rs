//! The player facade: wires the data model, decode hooks and resolver
//! together and drives a flow's views through resolution.
use crate::error::FlowError;
use crate::flow::Flow;
use log::debug;
use serde_json::Value;
use weft_binding::PathNode;
use weft_data::{BasicEvaluator, DataModel, LocalModel};
use weft_node::{ContentParser, Node};
use weft_resolver::{ResolveContext, Resolver, default_resolver, resolve_static_switch};

/// The outcome of entering a navigation state.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// A view was loaded and resolved.
    View(Value),
    /// The flow finished.
    End { outcome: Option<String> },
}

struct CurrentView {
    flow_name: String,
    node: Node,
}

/// One player instance: single-threaded, one flow at a time. A resolution
/// pass is synchronous and run-to-completion; entering a new view discards
/// the previous view's tree, so only the latest view's result is ever
/// surfaced.
pub struct Player {
    flow: Flow,
    model: LocalModel,
    resolver: Resolver,
    current: Option<CurrentView>,
}

impl Player {
    pub fn new(flow: Flow) -> Self {
        let data = if flow.data.is_object() {
            flow.data.clone()
        } else {
            Value::Object(serde_json::Map::new())
        };
        Player {
            model: LocalModel::new(data),
            resolver: default_resolver(),
            flow,
            current: None,
        }
    }

    /// Plugin access to the hook registration surface.
    pub fn resolver_mut(&mut self) -> &mut Resolver {
        &mut self.resolver
    }

    pub fn model(&self) -> &LocalModel {
        &self.model
    }

    /// Follows `BEGIN` to the starting view and resolves it.
    pub fn start(&mut self) -> Result<Value, FlowError> {
        debug!("starting flow '{}'", self.flow.id);
        let begin = self
            .flow
            .navigation
            .begin()
            .ok_or_else(|| FlowError::Navigation("navigation is missing 'BEGIN'".to_string()))?
            .to_string();
        let start = self
            .flow
            .navigation
            .start_state(&begin)
            .ok_or_else(|| {
                FlowError::Navigation(format!("flow '{}' has no startState", begin))
            })?
            .to_string();
        match self.enter_state(&begin, &start)? {
            Transition::View(view) => Ok(view),
            Transition::End { .. } => Err(FlowError::Navigation(
                "flow begins at an END state".to_string(),
            )),
        }
    }

    /// Enters a named state in the current flow. Only VIEW and END states
    /// are meaningful at this boundary; transition selection (actions,
    /// expressions on edges) belongs to the flow controller.
    pub fn transition(&mut self, state_name: &str) -> Result<Transition, FlowError> {
        let flow_name = self
            .current
            .as_ref()
            .map(|c| c.flow_name.clone())
            .or_else(|| self.flow.navigation.begin().map(String::from))
            .ok_or(FlowError::NoCurrentView)?;
        self.enter_state(&flow_name, state_name)
    }

    /// Applies a write transaction and re-resolves the current view only.
    /// Other views are untouched until navigated to.
    pub fn update(&mut self, transaction: &[(PathNode, Value)]) -> Result<Value, FlowError> {
        self.model.set(transaction);
        debug!("data change: re-resolving current view");
        self.resolve_current()
    }

    fn enter_state(&mut self, flow_name: &str, state_name: &str) -> Result<Transition, FlowError> {
        let (state_type, reference, outcome) = {
            let state = self
                .flow
                .navigation
                .state(flow_name, state_name)
                .ok_or_else(|| {
                    FlowError::Navigation(format!(
                        "unknown state '{}' in flow '{}'",
                        state_name, flow_name
                    ))
                })?;
            (
                state.state_type.to_string(),
                state.reference.map(String::from),
                state.outcome.map(String::from),
            )
        };
        match state_type.as_str() {
            "VIEW" => {
                let view_id = reference.ok_or_else(|| {
                    FlowError::Navigation(format!("VIEW state '{}' is missing 'ref'", state_name))
                })?;
                let view = self
                    .flow
                    .view_by_id(&view_id)
                    .ok_or_else(|| FlowError::MissingView(view_id.clone()))?
                    .clone();
                debug!("entering view '{}'", view_id);
                let node = self.decode_view(&view)?;
                self.current = Some(CurrentView {
                    flow_name: flow_name.to_string(),
                    node,
                });
                self.resolve_current().map(Transition::View)
            }
            "END" => {
                debug!("flow '{}' ended", self.flow.id);
                self.current = None;
                Ok(Transition::End { outcome })
            }
            other => Err(FlowError::Navigation(format!(
                "unsupported state type '{}'",
                other
            ))),
        }
    }

    /// Decodes view content with the static-switch stage installed, so
    /// static switches are locked in against the model as it is right now.
    fn decode_view(&self, view: &Value) -> Result<Node, FlowError> {
        let evaluator = BasicEvaluator::new(&self.model);
        let mut parser = ContentParser::new();
        parser.hook_on_create_ast_node("static-switch", move |node| {
            resolve_static_switch(node, &evaluator)
        });
        Ok(parser.parse(view)?)
    }

    fn resolve_current(&self) -> Result<Value, FlowError> {
        let current = self.current.as_ref().ok_or(FlowError::NoCurrentView)?;
        let evaluator = BasicEvaluator::new(&self.model);
        let ctx = ResolveContext {
            evaluator: &evaluator,
            model: &self.model,
        };
        let resolved = self.resolver.resolve(&current.node, &ctx)?;
        Ok(resolved.map(|n| n.to_json()).unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::make_flow;
    use serde_json::json;
    use weft_binding::parse;

    #[test]
    fn start_resolves_the_first_view() {
        let mut player = Player::new(make_flow(json!({
            "id": "some-id",
            "type": "text",
            "value": "I am a text asset"
        })));
        let view = player.start().unwrap();
        assert_eq!(view["id"], "some-id");
        assert_eq!(view["type"], "text");
        assert_eq!(view["value"], "I am a text asset");
    }

    #[test]
    fn update_re_resolves_bindings() {
        let mut flow = make_flow(json!({
            "id": "some-id",
            "type": "text",
            "value": "{{foo.bar}}"
        }));
        flow.data = json!({ "foo": { "bar": "hello" } });
        let mut player = Player::new(flow);

        let view = player.start().unwrap();
        assert_eq!(view["value"], "hello");

        let view = player
            .update(&[(parse("foo.bar").unwrap(), json!("goodbye"))])
            .unwrap();
        assert_eq!(view["value"], "goodbye");
    }

    #[test]
    fn transition_to_end_surfaces_the_outcome() {
        let mut player = Player::new(make_flow(json!({ "id": "v", "type": "text" })));
        player.start().unwrap();
        let result = player.transition("END_Done").unwrap();
        assert_eq!(
            result,
            Transition::End {
                outcome: Some("done".to_string())
            }
        );
    }

    #[test]
    fn unknown_state_is_a_navigation_error() {
        let mut player = Player::new(make_flow(json!({ "id": "v", "type": "text" })));
        player.start().unwrap();
        let result = player.transition("NOPE");
        assert!(matches!(result, Err(FlowError::Navigation(_))));
    }

    #[test]
    fn missing_view_is_reported_by_id() {
        let mut flow = make_flow(json!({ "id": "v", "type": "text" }));
        flow.views.clear();
        let mut player = Player::new(flow);
        let result = player.start();
        assert!(matches!(result, Err(FlowError::MissingView(ref id)) if id == "v"));
    }

    #[test]
    fn static_switch_in_a_view_ignores_later_data_changes() {
        let mut flow = make_flow(json!({
            "id": "v",
            "type": "view",
            "label": {
                "staticSwitch": [
                    { "case": "{{mode}} == 'a'", "value": "mode a" },
                    { "case": "true", "value": "other mode" }
                ]
            }
        }));
        flow.data = json!({ "mode": "a" });
        let mut player = Player::new(flow);

        let view = player.start().unwrap();
        assert_eq!(view["label"], "mode a");

        let view = player
            .update(&[(parse("mode").unwrap(), json!("z"))])
            .unwrap();
        assert_eq!(view["label"], "mode a");
    }

    #[test]
    fn dynamic_switch_in_a_view_follows_data_changes() {
        let mut flow = make_flow(json!({
            "id": "v",
            "type": "view",
            "label": {
                "dynamicSwitch": [
                    { "case": "{{mode}} == 'a'", "value": "mode a" },
                    { "case": "true", "value": "other mode" }
                ]
            }
        }));
        flow.data = json!({ "mode": "a" });
        let mut player = Player::new(flow);

        let view = player.start().unwrap();
        assert_eq!(view["label"], "mode a");

        let view = player
            .update(&[(parse("mode").unwrap(), json!("z"))])
            .unwrap();
        assert_eq!(view["label"], "other mode");
    }
}
