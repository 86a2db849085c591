//! End-to-end scenarios: flow in, resolved asset tree out.
use serde_json::json;
use weft::resolver::BeforeResolveTap;
use weft::{
    Node, PartialMatchRegistry, Player, ResolveError, Transition, make_flow, parse,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn single_text_asset_flow() {
    init_logging();
    let mut player = Player::new(make_flow(json!({
        "id": "some-id",
        "type": "text",
        "value": "I am a text asset"
    })));
    let view = player.start().unwrap();
    assert_eq!(view["id"], "some-id");
    assert_eq!(view["type"], "text");
    assert_eq!(view["value"], "I am a text asset");

    let ended = player.transition("END_Done").unwrap();
    assert_eq!(
        ended,
        Transition::End {
            outcome: Some("done".to_string())
        }
    );
}

#[test]
fn binding_in_asset_value_resolves_from_data() {
    init_logging();
    let mut flow = make_flow(json!({
        "id": "some-id",
        "type": "text",
        "value": "{{foo.bar}}"
    }));
    flow.data = json!({ "foo": { "bar": "hello" } });
    let mut player = Player::new(flow);
    let view = player.start().unwrap();
    assert_eq!(view["value"], "hello");
}

#[test]
fn nested_binding_in_asset_value_resolves() {
    init_logging();
    let mut flow = make_flow(json!({
        "id": "some-id",
        "type": "text",
        "value": "{{foo.{{key}}}}"
    }));
    flow.data = json!({ "foo": { "bar": "hello" }, "key": "bar" });
    let mut player = Player::new(flow);
    let view = player.start().unwrap();
    assert_eq!(view["value"], "hello");
}

#[test]
fn applicability_toggles_a_field_across_updates() {
    init_logging();
    let mut flow = make_flow(json!({
        "id": "v",
        "type": "view",
        "body": { "applicability": "{{flag}}", "id": "b", "type": "text" }
    }));
    flow.data = json!({ "flag": false });
    let mut player = Player::new(flow);

    let view = player.start().unwrap();
    assert!(view.get("body").is_none(), "inapplicable field must vanish");

    let view = player.update(&[(parse("flag").unwrap(), json!(true))]).unwrap();
    assert_eq!(view["body"]["id"], "b");
}

#[test]
fn matchless_switch_holds_its_array_position() {
    init_logging();
    let mut flow = make_flow(json!({
        "id": "v",
        "type": "view",
        "items": [
            { "id": "first", "type": "text" },
            { "dynamicSwitch": [ { "case": "false", "value": { "id": "never", "type": "text" } } ] },
            { "id": "third", "type": "text" }
        ]
    }));
    flow.data = json!({});
    let mut player = Player::new(flow);

    let view = player.start().unwrap();
    let items = view["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["id"], "first");
    assert!(items[1].is_null(), "empty node keeps its slot");
    assert_eq!(items[2]["id"], "third");
}

#[test]
fn inapplicable_array_entry_is_removed_outright() {
    init_logging();
    let mut flow = make_flow(json!({
        "id": "v",
        "type": "view",
        "items": [
            { "id": "first", "type": "text" },
            { "applicability": "false", "id": "gone", "type": "text" },
            { "id": "third", "type": "text" }
        ]
    }));
    flow.data = json!({});
    let mut player = Player::new(flow);

    let view = player.start().unwrap();
    let items = view["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], "first");
    assert_eq!(items[1]["id"], "third");
}

#[test]
fn custom_tap_rewrites_assets_before_structural_resolution() {
    init_logging();
    let mut player = Player::new(make_flow(json!({
        "id": "v",
        "type": "view",
        "body": { "id": "b", "type": "placeholder" }
    })));

    let tap: BeforeResolveTap = Box::new(|node, _ctx| {
        Ok(node.map(|n| match n {
            Node::Asset(mut asset) if asset.kind == "placeholder" => {
                asset.kind = "text".to_string();
                Node::Asset(asset)
            }
            other => other,
        }))
    });
    player
        .resolver_mut()
        .hooks
        .before_resolve
        .tap("placeholder-upgrade", tap);

    let view = player.start().unwrap();
    assert_eq!(view["body"]["type"], "text");
}

#[test]
fn failing_tap_surfaces_a_breadcrumbed_flow_error() {
    init_logging();
    let mut player = Player::new(make_flow(json!({
        "id": "v",
        "type": "view",
        "body": { "id": "bad", "type": "broken" }
    })));

    let tap: BeforeResolveTap = Box::new(|node, _ctx| match node {
        Some(Node::Asset(ref asset)) if asset.kind == "broken" => {
            Err(ResolveError::tap("reject-broken", "unsupported asset"))
        }
        other => Ok(other),
    });
    player
        .resolver_mut()
        .hooks
        .before_resolve
        .tap("reject-broken", tap);

    let err = player.start().unwrap_err();
    let rendered = err.to_string();
    assert!(rendered.contains("unsupported asset"), "{}", rendered);
    assert!(rendered.contains("found in (v, view)"), "{}", rendered);
}

#[test]
fn resolved_assets_look_up_implementations_by_pattern() {
    init_logging();
    let mut registry: PartialMatchRegistry<&str> = PartialMatchRegistry::new();
    registry.set(json!({ "type": "text" }), "text-renderer");
    registry.set(json!({ "type": "text", "size": "large" }), "headline-renderer");

    let mut player = Player::new(make_flow(json!({
        "id": "t",
        "type": "text",
        "size": "large"
    })));
    let view = player.start().unwrap();
    assert_eq!(registry.get(&view), Some(&"headline-renderer"));
}
