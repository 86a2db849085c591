//! The flow wire format: views, navigation state machine, data and schema.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// A complete content document. Binding strings embedded anywhere in view
/// content follow the binding grammar; no alternate delimiters are
/// tolerated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flow {
    pub id: String,
    #[serde(default)]
    pub views: Vec<Value>,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub navigation: Navigation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

impl Flow {
    pub fn from_json(raw: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(raw)
    }

    pub fn view_by_id(&self, id: &str) -> Option<&Value> {
        self.views
            .iter()
            .find(|view| view.get("id").and_then(Value::as_str) == Some(id))
    }
}

/// The navigation state machine, kept as raw JSON with typed accessors for
/// the pieces the resolver boundary needs. Transition execution itself is
/// the flow controller's concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Navigation(pub Map<String, Value>);

impl Navigation {
    /// The name of the flow the `BEGIN` pointer starts in.
    pub fn begin(&self) -> Option<&str> {
        self.0.get("BEGIN")?.as_str()
    }

    fn flow(&self, flow_name: &str) -> Option<&Map<String, Value>> {
        self.0.get(flow_name)?.as_object()
    }

    pub fn start_state(&self, flow_name: &str) -> Option<&str> {
        self.flow(flow_name)?.get("startState")?.as_str()
    }

    pub fn state(&self, flow_name: &str, state_name: &str) -> Option<NavState<'_>> {
        let state = self.flow(flow_name)?.get(state_name)?.as_object()?;
        let state_type = state.get("state_type")?.as_str()?;
        Some(NavState {
            state_type,
            reference: state.get("ref").and_then(Value::as_str),
            outcome: state.get("outcome").and_then(Value::as_str),
        })
    }
}

/// One navigation state, borrowed out of the raw document.
#[derive(Debug, Clone, Copy)]
pub struct NavState<'a> {
    pub state_type: &'a str,
    pub reference: Option<&'a str>,
    pub outcome: Option<&'a str>,
}

/// Wraps a single piece of asset content into a complete one-view flow, the
/// shape every scenario test starts from.
pub fn make_flow(content: Value) -> Flow {
    let view_id = content
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or("root")
        .to_string();
    Flow {
        id: "generated-flow".to_string(),
        views: vec![content],
        data: json!({}),
        navigation: Navigation(
            json!({
                "BEGIN": "FLOW_1",
                "FLOW_1": {
                    "startState": "VIEW_1",
                    "VIEW_1": {
                        "state_type": "VIEW",
                        "ref": view_id,
                        "transitions": { "*": "END_Done" }
                    },
                    "END_Done": { "state_type": "END", "outcome": "done" }
                }
            })
            .as_object()
            .cloned()
            .unwrap_or_default(),
        ),
        schema: None,
    }
}
