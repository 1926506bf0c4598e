//! # Simplex Solver
//!
//! $$
//! w_i = \frac{e^{x_i}}{\sum_j e^{x_j}}
//! $$
//!
//! Constrained nonlinear minimization over the long-only fully-invested
//! simplex. The softmax reparameterization keeps every iterate strictly
//! feasible, so the derivative-free search runs unconstrained in `x`.

use argmin::core::CostFunction;
use argmin::core::Executor;
use argmin::core::TerminationReason;
use argmin::core::TerminationStatus;
use argmin::solver::neldermead::NelderMead;
use tracing::debug;

use crate::error::PortfolioError;

/// Solver run diagnostics reported back to the caller.
#[derive(Clone, Debug)]
pub struct SolverDiagnostics {
  pub iterations: u64,
  pub best_cost: f64,
  /// Deviation of the weight sum from 1.
  pub constraint_violation: f64,
  pub termination: String,
}

/// Outcome of one simplex minimization.
#[derive(Clone, Debug)]
pub struct SolverSolution {
  /// Best feasible weight vector found.
  pub weights: Vec<f64>,
  /// Whether the solver terminated by its own convergence criterion
  /// rather than by exhausting the iteration budget.
  pub converged: bool,
  pub diagnostics: SolverDiagnostics,
}

/// Derivative-free minimization of an objective over the simplex.
///
/// Implementations guarantee the returned weights are non-negative and sum
/// to 1; the caller decides whether to accept an unconverged iterate.
pub trait SimplexSolver {
  fn minimize<F>(
    &self,
    objective: F,
    n_assets: usize,
    seed: Option<&[f64]>,
  ) -> Result<SolverSolution, PortfolioError>
  where
    F: Fn(&[f64]) -> f64;
}

pub(crate) fn softmax(x: &[f64]) -> Vec<f64> {
  if x.is_empty() {
    return Vec::new();
  }

  let max_x = x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
  let exps: Vec<f64> = x.iter().map(|&v| (v - max_x).exp()).collect();
  let sum: f64 = exps.iter().sum();

  if sum < 1e-15 {
    vec![1.0 / x.len() as f64; x.len()]
  } else {
    exps.iter().map(|&e| e / sum).collect()
  }
}

struct SimplexCost<F> {
  objective: F,
}

impl<F> CostFunction for SimplexCost<F>
where
  F: Fn(&[f64]) -> f64,
{
  type Param = Vec<f64>;
  type Output = f64;

  fn cost(&self, x: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
    Ok((self.objective)(&softmax(x)))
  }
}

/// Nelder-Mead search over the softmax reparameterization.
#[derive(Clone, Copy, Debug)]
pub struct NelderMeadSolver {
  /// Iteration budget bounding worst-case latency per solve.
  pub max_iters: u64,
  /// Cost standard-deviation tolerance for convergence.
  pub sd_tolerance: f64,
}

impl Default for NelderMeadSolver {
  fn default() -> Self {
    Self {
      max_iters: 5000,
      sd_tolerance: 1e-8,
    }
  }
}

impl SimplexSolver for NelderMeadSolver {
  fn minimize<F>(
    &self,
    objective: F,
    n_assets: usize,
    seed: Option<&[f64]>,
  ) -> Result<SolverSolution, PortfolioError>
  where
    F: Fn(&[f64]) -> f64,
  {
    if n_assets == 0 {
      return Err(PortfolioError::InvalidParameter(
        "cannot optimize over zero assets".to_string(),
      ));
    }

    // Equal weights map to the origin; an explicit seed maps through the
    // softmax inverse up to an additive constant.
    let x0: Vec<f64> = match seed {
      Some(w) if w.len() == n_assets => w.iter().map(|&wi| wi.max(1e-12).ln()).collect(),
      Some(w) => {
        return Err(PortfolioError::InvalidParameter(format!(
          "seed has {} entries for {} assets",
          w.len(),
          n_assets
        )));
      }
      None => vec![0.0; n_assets],
    };

    let mut simplex = Vec::with_capacity(n_assets + 1);
    simplex.push(x0.clone());
    for i in 0..n_assets {
      let mut point = x0.clone();
      point[i] += 1.0;
      simplex.push(point);
    }

    let solver = NelderMead::new(simplex)
      .with_sd_tolerance(self.sd_tolerance)
      .map_err(|e| PortfolioError::Solver(e.to_string()))?;

    let res = Executor::new(SimplexCost { objective }, solver)
      .configure(|state| state.max_iters(self.max_iters))
      .run()
      .map_err(|e| PortfolioError::Solver(e.to_string()))?;

    let best_x = res.state.best_param.clone().unwrap_or(x0);
    let weights = softmax(&best_x);
    let converged = matches!(
      res.state.termination_status,
      TerminationStatus::Terminated(TerminationReason::SolverConverged)
        | TerminationStatus::Terminated(TerminationReason::TargetCostReached)
    );
    let constraint_violation = (weights.iter().sum::<f64>() - 1.0).abs();

    debug!(
      iterations = res.state.iter,
      best_cost = res.state.best_cost,
      converged,
      "nelder-mead simplex solve finished"
    );

    Ok(SolverSolution {
      weights,
      converged,
      diagnostics: SolverDiagnostics {
        iterations: res.state.iter,
        best_cost: res.state.best_cost,
        constraint_violation,
        termination: format!("{:?}", res.state.termination_status),
      },
    })
  }
}
