//! Data-model access and expression evaluation.
//!
//! The resolver reads model values through the [`DataModel`] trait and tests
//! applicability/switch cases through [`ExpressionEvaluator`]. [`LocalModel`]
//! and [`BasicEvaluator`] are the built-in implementations used by the
//! player and the test suites.

pub mod error;
pub mod eval;
pub mod model;

// --- Public API ---
pub use error::EvalError;
pub use eval::{BasicEvaluator, ExpressionEvaluator, loose_eq, truthy};
pub use model::{DataModel, LocalModel};
