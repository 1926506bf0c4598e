//! # Portfolio Optimizers
//!
//! $$
//! \min_{\mathbf{w}} \ -\frac{\mu_p - r_f}{\sigma_p} + \lambda(\mu_p - r^\*)^2
//! $$
//!
//! Tangency-portfolio and efficient-frontier solves on the long-only
//! simplex. The frontier fixes the annualized portfolio return to each
//! target with a quadratic penalty on the shared Sharpe objective.

use ndarray::Array1;
use ndarray::Array2;
use ndarray_stats::QuantileExt;
use rayon::prelude::*;
use tracing::debug;

use crate::error::PortfolioError;
use crate::portfolio::performance::PerformanceModel;
use crate::portfolio::solver::NelderMeadSolver;
use crate::portfolio::solver::SimplexSolver;
use crate::portfolio::solver::SolverSolution;
use crate::portfolio::types::EfficientFrontier;
use crate::portfolio::types::FrontierPoint;
use crate::portfolio::types::OptimizationRequest;
use crate::portfolio::types::TangencyPortfolio;

/// Weight of the target-return equality penalty in the frontier objective.
const TARGET_RETURN_PENALTY: f64 = 1e4;

fn validate_inputs(
  mean_returns: &Array1<f64>,
  covariance: &Array2<f64>,
) -> Result<(), PortfolioError> {
  let n = mean_returns.len();
  if n == 0 {
    return Err(PortfolioError::EmptyPriceSeries);
  }
  if covariance.nrows() != n || covariance.ncols() != n {
    return Err(PortfolioError::InvalidParameter(format!(
      "covariance is {}x{} for {} assets",
      covariance.nrows(),
      covariance.ncols(),
      n
    )));
  }
  if mean_returns.iter().any(|v| !v.is_finite())
    || covariance.iter().any(|v| !v.is_finite())
  {
    return Err(PortfolioError::InvalidParameter(
      "mean returns and covariance must be finite".to_string(),
    ));
  }
  Ok(())
}

fn failure_from(solution: SolverSolution) -> PortfolioError {
  PortfolioError::OptimizationFailure {
    last_iterate: solution.weights,
    iterations: solution.diagnostics.iterations,
    best_cost: solution.diagnostics.best_cost,
    constraint_violation: solution.diagnostics.constraint_violation,
  }
}

/// Maximum-Sharpe weights with the default Nelder-Mead solver, seeded from
/// equal weights.
pub fn compute_tangency_portfolio(
  mean_returns: &Array1<f64>,
  covariance: &Array2<f64>,
  request: &OptimizationRequest,
) -> Result<TangencyPortfolio, PortfolioError> {
  compute_tangency_portfolio_with(
    &NelderMeadSolver::default(),
    mean_returns,
    covariance,
    request,
    None,
  )
}

/// [`compute_tangency_portfolio`] with a caller-supplied initial weight
/// vector instead of the equal-weight seed.
pub fn compute_tangency_portfolio_seeded(
  mean_returns: &Array1<f64>,
  covariance: &Array2<f64>,
  request: &OptimizationRequest,
  seed: &[f64],
) -> Result<TangencyPortfolio, PortfolioError> {
  compute_tangency_portfolio_with(
    &NelderMeadSolver::default(),
    mean_returns,
    covariance,
    request,
    Some(seed),
  )
}

/// Maximum-Sharpe weights using any [`SimplexSolver`] implementation.
///
/// Non-convergence surfaces as [`PortfolioError::OptimizationFailure`]
/// carrying the last iterate; an unconverged vector is never returned as a
/// result.
pub fn compute_tangency_portfolio_with<S: SimplexSolver>(
  solver: &S,
  mean_returns: &Array1<f64>,
  covariance: &Array2<f64>,
  request: &OptimizationRequest,
  seed: Option<&[f64]>,
) -> Result<TangencyPortfolio, PortfolioError> {
  validate_inputs(mean_returns, covariance)?;

  let n = mean_returns.len();
  let model = PerformanceModel::new(
    mean_returns,
    covariance,
    request.risk_free,
    request.periods_per_year,
  );

  // One asset admits exactly one fully-invested point.
  if n == 1 {
    let weights = Array1::ones(1);
    let performance = model.evaluate(weights.view())?;
    return Ok(TangencyPortfolio {
      weights,
      performance,
    });
  }

  let solution = solver.minimize(|w: &[f64]| model.negative_sharpe(w), n, seed)?;
  if !solution.converged {
    return Err(failure_from(solution));
  }

  let weights = Array1::from(solution.weights);
  let performance = model.evaluate(weights.view())?;

  Ok(TangencyPortfolio {
    weights,
    performance,
  })
}

/// Efficient frontier with the default Nelder-Mead solver.
pub fn compute_efficient_frontier(
  mean_returns: &Array1<f64>,
  covariance: &Array2<f64>,
  request: &OptimizationRequest,
) -> Result<EfficientFrontier, PortfolioError> {
  compute_efficient_frontier_with(&NelderMeadSolver::default(), mean_returns, covariance, request)
}

/// Efficient frontier using any [`SimplexSolver`] implementation.
///
/// The target grid spans the annualized per-asset mean range. Grid points
/// have no data dependency on each other and are solved in parallel, each
/// from the equal-weight seed.
pub fn compute_efficient_frontier_with<S: SimplexSolver + Sync>(
  solver: &S,
  mean_returns: &Array1<f64>,
  covariance: &Array2<f64>,
  request: &OptimizationRequest,
) -> Result<EfficientFrontier, PortfolioError> {
  validate_inputs(mean_returns, covariance)?;
  if request.frontier_grid_size < 2 {
    return Err(PortfolioError::InvalidParameter(
      "frontier grid needs at least 2 target returns".to_string(),
    ));
  }

  let n = mean_returns.len();
  let model = PerformanceModel::new(
    mean_returns,
    covariance,
    request.risk_free,
    request.periods_per_year,
  );

  let lo = *mean_returns
    .min()
    .map_err(|e| PortfolioError::InvalidParameter(e.to_string()))?
    * request.periods_per_year;
  let hi = *mean_returns
    .max()
    .map_err(|e| PortfolioError::InvalidParameter(e.to_string()))?
    * request.periods_per_year;

  let targets = Array1::linspace(lo, hi, request.frontier_grid_size).to_vec();

  let points = targets
    .into_par_iter()
    .map(|target| {
      let weights = if n == 1 {
        Array1::ones(1)
      } else {
        let objective = |w: &[f64]| {
          let ret = model.annual_return(ndarray::ArrayView1::from(w));
          model.negative_sharpe(w) + TARGET_RETURN_PENALTY * (ret - target) * (ret - target)
        };
        let solution = solver.minimize(objective, n, None)?;
        if !solution.converged {
          return Err(failure_from(solution));
        }
        Array1::from(solution.weights)
      };

      let point = model.evaluate(weights.view())?;
      Ok(FrontierPoint {
        target_return: target,
        volatility: point.annual_volatility,
        weights,
      })
    })
    .collect::<Result<Vec<_>, PortfolioError>>()?;

  debug!(
    grid_size = points.len(),
    "efficient frontier sweep finished"
  );

  Ok(EfficientFrontier { points })
}
