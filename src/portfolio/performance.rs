//! # Portfolio Performance
//!
//! $$
//! \mu_p = P\,\mathbf{w}^\top\boldsymbol{\mu}, \qquad
//! \sigma_p = \sqrt{\mathbf{w}^\top (P\Sigma)\, \mathbf{w}}
//! $$
//!
//! Annualized return, volatility and Sharpe ratio for portfolio weights.
//! The annualized covariance is scaled once per model so the per-iteration
//! objective pays no re-scaling cost.

use ndarray::Array1;
use ndarray::Array2;
use ndarray::ArrayView1;
use ndarray::Axis;

use crate::error::PortfolioError;
use crate::portfolio::types::PortfolioPoint;

/// Volatility below this is treated as degenerate.
const VOL_EPS: f64 = 1e-12;

/// Objective value standing in for an undefined Sharpe ratio inside the
/// solver loop, where the objective cannot fail.
pub(crate) const DEGENERATE_COST: f64 = 1e10;

/// Precomputed inputs for repeated performance evaluation.
#[derive(Clone, Debug)]
pub struct PerformanceModel {
  mean_returns: Array1<f64>,
  annual_cov: Array2<f64>,
  risk_free: f64,
  periods_per_year: f64,
}

impl PerformanceModel {
  pub fn new(
    mean_returns: &Array1<f64>,
    covariance: &Array2<f64>,
    risk_free: f64,
    periods_per_year: f64,
  ) -> Self {
    Self {
      mean_returns: mean_returns.clone(),
      annual_cov: covariance * periods_per_year,
      risk_free,
      periods_per_year,
    }
  }

  pub fn n_assets(&self) -> usize {
    self.mean_returns.len()
  }

  /// Annualized expected portfolio return.
  pub fn annual_return(&self, weights: ArrayView1<f64>) -> f64 {
    self.periods_per_year * weights.dot(&self.mean_returns)
  }

  /// Annualized portfolio volatility.
  pub fn annual_volatility(&self, weights: ArrayView1<f64>) -> f64 {
    weights.dot(&self.annual_cov.dot(&weights)).sqrt()
  }

  /// Full performance triple for one weight vector.
  pub fn evaluate(&self, weights: ArrayView1<f64>) -> Result<PortfolioPoint, PortfolioError> {
    let annual_return = self.annual_return(weights);
    let annual_volatility = self.annual_volatility(weights);

    if !annual_volatility.is_finite() || annual_volatility < VOL_EPS {
      return Err(PortfolioError::DegenerateVolatility {
        value: annual_volatility,
      });
    }

    Ok(PortfolioPoint {
      annual_return,
      annual_volatility,
      sharpe: (annual_return - self.risk_free) / annual_volatility,
    })
  }

  /// Performance triples for a batch of weight rows, computed with matrix
  /// operations rather than row-by-row.
  pub fn evaluate_batch(
    &self,
    weights: &Array2<f64>,
  ) -> Result<Vec<PortfolioPoint>, PortfolioError> {
    let annual_returns = weights.dot(&self.mean_returns) * self.periods_per_year;
    let variances = (weights.dot(&self.annual_cov) * weights).sum_axis(Axis(1));

    annual_returns
      .iter()
      .zip(variances.iter())
      .map(|(&annual_return, &var)| {
        let annual_volatility = var.sqrt();
        if !annual_volatility.is_finite() || annual_volatility < VOL_EPS {
          return Err(PortfolioError::DegenerateVolatility {
            value: annual_volatility,
          });
        }
        Ok(PortfolioPoint {
          annual_return,
          annual_volatility,
          sharpe: (annual_return - self.risk_free) / annual_volatility,
        })
      })
      .collect()
  }

  /// Negative Sharpe ratio as a solver objective. Degenerate volatility
  /// maps to a large finite cost instead of an error so the simplex walk
  /// steers away from it.
  pub(crate) fn negative_sharpe(&self, weights: &[f64]) -> f64 {
    let w = ArrayView1::from(weights);
    let vol = self.annual_volatility(w);
    if !vol.is_finite() || vol < VOL_EPS {
      return DEGENERATE_COST;
    }
    -(self.annual_return(w) - self.risk_free) / vol
  }
}

/// One-shot performance computation for a single weight vector.
pub fn portfolio_performance(
  weights: &Array1<f64>,
  mean_returns: &Array1<f64>,
  covariance: &Array2<f64>,
  risk_free: f64,
  periods_per_year: f64,
) -> Result<PortfolioPoint, PortfolioError> {
  if weights.len() != mean_returns.len() {
    return Err(PortfolioError::InvalidParameter(format!(
      "weight vector has {} entries for {} assets",
      weights.len(),
      mean_returns.len()
    )));
  }
  PerformanceModel::new(mean_returns, covariance, risk_free, periods_per_year)
    .evaluate(weights.view())
}
