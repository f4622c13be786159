pub mod config;
pub mod engine;
pub mod error;
pub mod functions;
pub mod postfix;
pub mod stack;
pub mod statement;
pub mod store;

pub use config::EngineConfig;
pub use engine::{EvalMath, Evaluation};
pub use error::{EvalError, Result};

/// Evaluates a single expression on a fresh engine with default settings.
///
/// Every call builds a new engine and its built-in registry; keep an
/// [`EvalMath`] around when evaluating in a loop.
pub fn evaluate_expression(expression: &str) -> Result<f64> {
    EvalMath::default().evaluate_expression(expression)
}
