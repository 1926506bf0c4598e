//! # Errors
//!
//! Failure taxonomy for the computation core. Errors are raised at the
//! point of detection and propagated to the caller unchanged; the core
//! never substitutes a default result for a failed computation.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PortfolioError {
  /// No usable observations remain after alignment.
  #[error("empty price series: no usable observations after alignment")]
  EmptyPriceSeries,

  /// Too few price observations to form a single return.
  #[error("insufficient data: need at least 2 price observations, got {got}")]
  InsufficientData { got: usize },

  /// Zero or non-finite volatility makes the Sharpe ratio undefined.
  #[error("degenerate volatility {value}: Sharpe ratio is undefined")]
  DegenerateVolatility { value: f64 },

  /// The constrained solver exhausted its budget without converging.
  /// Carries the last iterate so the caller can decide whether a
  /// near-feasible result is acceptable.
  #[error(
    "optimization did not converge after {iterations} iterations \
     (best cost {best_cost}, constraint violation {constraint_violation})"
  )]
  OptimizationFailure {
    last_iterate: Vec<f64>,
    iterations: u64,
    best_cost: f64,
    constraint_violation: f64,
  },

  /// A caller-supplied parameter violates its precondition.
  #[error("invalid parameter: {0}")]
  InvalidParameter(String),

  /// The underlying optimizer machinery failed to set up or run.
  #[error("solver error: {0}")]
  Solver(String),
}
