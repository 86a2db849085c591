//! The integration layer: flow documents in, resolved asset trees out.
//!
//! A [`Player`] owns one flow, its data model and a resolver with the
//! standard taps installed. The UI layer consumes resolved view JSON and
//! looks up asset implementations through a [`PartialMatchRegistry`] keyed
//! on partial asset patterns.

pub mod error;
pub mod flow;
pub mod player;

// --- Public API ---
pub use error::FlowError;
pub use flow::{Flow, NavState, Navigation, make_flow};
pub use player::{Player, Transition};
pub use weft_registry::PartialMatchRegistry;

use serde_json::{Value, json};
use weft_node::AssetNode;

/// The lookup key the UI layer's asset registry is queried with for a
/// resolved asset. Plugins register implementations under patterns like
/// `{"type": "action"}`, or tighter ones carrying extra fields.
pub fn asset_lookup_query(asset: &AssetNode) -> Value {
    json!({ "type": asset.kind })
}
