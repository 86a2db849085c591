//! Weft: a content-resolution engine.
//!
//! A JSON flow document (views, navigation state machine, data, schema) is
//! resolved at runtime into a tree of renderable assets, kept in sync with
//! the data model and driven through the navigation machine until
//! completion. Platform layers stay thin: they consume resolved view JSON
//! and register asset implementations by partial-pattern lookup.
//!
//! The member crates, re-exported here:
//! - [`weft_binding`]: the binding grammar (`{{foo.bar}}`, `a[k=v]`) and its
//!   two equivalent parsers.
//! - [`weft_registry`]: the partial-match registry.
//! - [`weft_node`]: the node model and JSON content decoding.
//! - [`weft_data`]: data-model access and expression evaluation.
//! - [`weft_resolver`]: the hook-driven view resolver.
//! - [`weft_core`]: the flow wire format and the player facade.

pub use weft_binding as binding;
pub use weft_core as core;
pub use weft_data as data;
pub use weft_node as node;
pub use weft_registry as registry;
pub use weft_resolver as resolver;

// The names most embedders reach for.
pub use weft_binding::{AnyNode, BindingError, PathNode, parse};
pub use weft_core::{Flow, FlowError, Player, Transition, make_flow};
pub use weft_data::{BasicEvaluator, DataModel, ExpressionEvaluator, LocalModel};
pub use weft_node::{AssetNode, Node, NodeError};
pub use weft_registry::PartialMatchRegistry;
pub use weft_resolver::{ResolveContext, ResolveError, Resolver, default_resolver};
