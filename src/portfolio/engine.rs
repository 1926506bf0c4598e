//! # Portfolio Engine
//!
//! $$
//! \text{prices} \to (\mu, \Sigma) \to \{\mathbf{w}^\*,\ \text{frontier},\ \text{cloud}\}
//! $$
//!
//! High-level orchestration over the computation core: one configured
//! entry point from aligned prices to tangency portfolio, frontier,
//! sampled cloud and per-asset leverage curve.

use ndarray::Array2;

use crate::error::PortfolioError;
use crate::leverage::compute_leverage_curve;
use crate::leverage::LeverageCurve;
use crate::portfolio::optimizers::compute_efficient_frontier_with;
use crate::portfolio::optimizers::compute_tangency_portfolio_with;
use crate::portfolio::sampler::sample_portfolios_using;
use crate::portfolio::solver::NelderMeadSolver;
use crate::portfolio::solver::SimplexSolver;
use crate::portfolio::types::EfficientFrontier;
use crate::portfolio::types::OptimizationRequest;
use crate::portfolio::types::PortfolioPoint;
use crate::portfolio::types::TangencyPortfolio;
use crate::stats::drop_incomplete_rows;
use crate::stats::ReturnStatistics;

/// Single entry point binding an [`OptimizationRequest`] to a solver.
#[derive(Clone, Debug)]
pub struct PortfolioEngine<S = NelderMeadSolver> {
  request: OptimizationRequest,
  solver: S,
}

impl PortfolioEngine<NelderMeadSolver> {
  /// Engine with the default Nelder-Mead solver.
  pub fn new(request: OptimizationRequest) -> Self {
    Self {
      request,
      solver: NelderMeadSolver::default(),
    }
  }
}

impl<S: SimplexSolver + Sync> PortfolioEngine<S> {
  /// Engine with an explicit solver implementation.
  pub fn with_solver(request: OptimizationRequest, solver: S) -> Self {
    Self { request, solver }
  }

  pub fn request(&self) -> &OptimizationRequest {
    &self.request
  }

  /// Align a raw price matrix (dropping incomplete rows) and compute
  /// return statistics.
  pub fn statistics(&self, prices: &Array2<f64>) -> Result<ReturnStatistics, PortfolioError> {
    let aligned = drop_incomplete_rows(prices);
    if aligned.nrows() == 0 {
      return Err(PortfolioError::EmptyPriceSeries);
    }
    ReturnStatistics::from_prices(&aligned)
  }

  pub fn tangency(&self, stats: &ReturnStatistics) -> Result<TangencyPortfolio, PortfolioError> {
    compute_tangency_portfolio_with(
      &self.solver,
      &stats.mean,
      &stats.covariance,
      &self.request,
      None,
    )
  }

  pub fn frontier(&self, stats: &ReturnStatistics) -> Result<EfficientFrontier, PortfolioError> {
    compute_efficient_frontier_with(&self.solver, &stats.mean, &stats.covariance, &self.request)
  }

  pub fn sample<R: rand::Rng + ?Sized>(
    &self,
    stats: &ReturnStatistics,
    rng: &mut R,
  ) -> Result<Vec<PortfolioPoint>, PortfolioError> {
    sample_portfolios_using(&stats.mean, &stats.covariance, &self.request, rng)
  }

  /// Leverage curve for one asset of the statistics, identified by column.
  pub fn leverage_curve(
    &self,
    stats: &ReturnStatistics,
    asset: usize,
    upper_lev: f64,
    fees: f64,
  ) -> Result<LeverageCurve, PortfolioError> {
    if asset >= stats.n_assets() {
      return Err(PortfolioError::InvalidParameter(format!(
        "asset index {asset} out of range for {} assets",
        stats.n_assets()
      )));
    }
    compute_leverage_curve(stats.mean[asset], stats.std()[asset], upper_lev, fees)
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use ndarray::array;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  use super::*;

  fn trending_prices() -> Array2<f64> {
    let mut rows = Vec::new();
    let mut a = 100.0;
    let mut b = 50.0;
    for i in 0..40 {
      // deterministic wobbles with different periods around two drifts
      let wa = if i % 2 == 0 { 1.004 } else { 0.997 };
      let wb = if i % 3 == 0 { 1.006 } else { 0.999 };
      a *= 1.001 * wa;
      b *= 1.002 * wb;
      rows.push([a, b]);
    }
    Array2::from_shape_vec((40, 2), rows.into_iter().flatten().collect()).unwrap()
  }

  #[test]
  fn prices_to_tangency_end_to_end() {
    let engine = PortfolioEngine::new(OptimizationRequest::default());
    let stats = engine.statistics(&trending_prices()).unwrap();
    let tangency = engine.tangency(&stats).unwrap();

    assert_abs_diff_eq!(tangency.weights.sum(), 1.0, epsilon = 1e-6);
    assert!(tangency.performance.annual_volatility > 0.0);
  }

  #[test]
  fn frontier_and_cloud_share_statistics() {
    let engine = PortfolioEngine::new(OptimizationRequest {
      frontier_grid_size: 10,
      num_portfolios: 200,
      ..OptimizationRequest::default()
    });
    let stats = engine.statistics(&trending_prices()).unwrap();

    let frontier = engine.frontier(&stats).unwrap();
    assert_eq!(frontier.len(), 10);
    assert!(frontier.min_volatility().unwrap() <= frontier.max_volatility().unwrap());

    let mut rng = StdRng::seed_from_u64(99);
    let cloud = engine.sample(&stats, &mut rng).unwrap();
    assert_eq!(cloud.len(), 200);
  }

  #[test]
  fn leverage_curve_for_one_column() {
    let engine = PortfolioEngine::new(OptimizationRequest::default());
    let stats = engine.statistics(&trending_prices()).unwrap();

    let curve = engine.leverage_curve(&stats, 1, 5.0, 0.0).unwrap();
    assert_eq!(curve.k.len(), 100);
    assert!(curve.k_max >= 0.0);

    assert!(matches!(
      engine.leverage_curve(&stats, 2, 5.0, 0.0),
      Err(PortfolioError::InvalidParameter(_))
    ));
  }

  #[test]
  fn all_nan_prices_are_empty_after_alignment() {
    let engine = PortfolioEngine::new(OptimizationRequest::default());
    let prices = array![[f64::NAN, 1.0], [2.0, f64::NAN]];

    assert!(matches!(
      engine.statistics(&prices),
      Err(PortfolioError::EmptyPriceSeries)
    ));
  }
}
