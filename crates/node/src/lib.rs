//! The shared node vocabulary for content resolution.
//!
//! Raw JSON content is decoded into a closed tagged union ([`Node`]) that the
//! parser emits and the resolver consumes. `Value` nodes track their dynamic
//! sub-nodes by structural path so re-resolution can patch a specific
//! sub-tree without re-decoding.

pub mod decode;
pub mod error;
pub mod node;

// --- Public API ---
pub use decode::{ContentParser, CreateHook};
pub use error::NodeError;
pub use node::{
    AssetNode, Node, NodeChild, Segment, SwitchCase, SwitchNode, ValueNode,
    extract_node_from_path,
};
