//! # Portfolio Types
//!
//! $$
//! \mathbf{w} \in \Delta^{N-1}: \quad w_i \in [0,1], \ \textstyle\sum_i w_i = 1
//! $$
//!
//! Result containers and the immutable optimization configuration.

use ndarray::Array1;

use crate::DEFAULT_PERIODS_PER_YEAR;

/// Annualized performance of one weight vector (or leverage scalar).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PortfolioPoint {
  /// Annualized expected return.
  pub annual_return: f64,
  /// Annualized volatility.
  pub annual_volatility: f64,
  /// Excess return per unit of volatility.
  pub sharpe: f64,
}

/// Maximum-Sharpe portfolio on the simplex.
#[derive(Clone, Debug)]
pub struct TangencyPortfolio {
  /// Converged weights, non-negative and summing to 1.
  pub weights: Array1<f64>,
  pub performance: PortfolioPoint,
}

/// One efficient-frontier solve at a fixed target return.
#[derive(Clone, Debug)]
pub struct FrontierPoint {
  /// Annualized target return this point was constrained to.
  pub target_return: f64,
  /// Minimal achieved annualized volatility.
  pub volatility: f64,
  pub weights: Array1<f64>,
}

/// Frontier curve, ascending by target return.
#[derive(Clone, Debug, Default)]
pub struct EfficientFrontier {
  pub points: Vec<FrontierPoint>,
}

impl EfficientFrontier {
  /// Smallest volatility on the curve; anchors the tangency line.
  pub fn min_volatility(&self) -> Option<f64> {
    self
      .points
      .iter()
      .map(|p| p.volatility)
      .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.min(v))))
  }

  /// Largest volatility on the curve.
  pub fn max_volatility(&self) -> Option<f64> {
    self
      .points
      .iter()
      .map(|p| p.volatility)
      .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
  }

  pub fn len(&self) -> usize {
    self.points.len()
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }
}

/// Immutable configuration for one optimization request.
///
/// Passed explicitly into the core; nothing is read from ambient state.
#[derive(Clone, Copy, Debug)]
pub struct OptimizationRequest {
  /// Annualized risk-free rate used in Sharpe computations.
  pub risk_free: f64,
  /// Annualization constant (365 for continuously-traded assets).
  pub periods_per_year: f64,
  /// Number of target returns on the frontier grid.
  pub frontier_grid_size: usize,
  /// Number of random portfolios drawn by the sampler.
  pub num_portfolios: usize,
}

impl Default for OptimizationRequest {
  fn default() -> Self {
    Self {
      risk_free: 0.0,
      periods_per_year: DEFAULT_PERIODS_PER_YEAR,
      frontier_grid_size: 100,
      num_portfolios: 5000,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_request_matches_continuous_trading() {
    let request = OptimizationRequest::default();
    assert_eq!(request.periods_per_year, 365.0);
    assert_eq!(request.frontier_grid_size, 100);
    assert_eq!(request.risk_free, 0.0);
  }

  #[test]
  fn frontier_volatility_bounds() {
    let frontier = EfficientFrontier {
      points: vec![
        FrontierPoint {
          target_return: 0.1,
          volatility: 0.25,
          weights: Array1::ones(1),
        },
        FrontierPoint {
          target_return: 0.2,
          volatility: 0.18,
          weights: Array1::ones(1),
        },
      ],
    };

    assert_eq!(frontier.min_volatility(), Some(0.18));
    assert_eq!(frontier.max_volatility(), Some(0.25));
    assert_eq!(EfficientFrontier::default().min_volatility(), None);
  }
}
