//! # Optimal Leverage
//!
//! $$
//! R(k) = k\mu - \frac{\tfrac{1}{2}k^2\sigma^2}{1 + k\sigma}
//! $$
//!
//! Grid search for the leverage factor maximizing expected
//! continuously-compounded growth, with a financing-cost-adjusted variant.
//! The correction term models the compounding drag volatility imposes on
//! geometric returns, growing with leverage.

use ndarray::Array1;
use ndarray_stats::QuantileExt;

use crate::error::PortfolioError;
use crate::DEFAULT_PERIODS_PER_YEAR;

/// Fixed resolution of the leverage grid.
pub const LEVERAGE_GRID_POINTS: usize = 100;

/// Growth-rate samples over an ascending leverage grid, plus the grid
/// argmax of the pre-fee curve.
#[derive(Clone, Debug)]
pub struct LeverageCurve {
  /// Leverage factors, ascending and uniformly spaced.
  pub k: Array1<f64>,
  /// Expected growth rate `R(k)` per period.
  pub growth: Array1<f64>,
  /// Growth rate net of financing costs, `R(k) - fees/365`.
  pub growth_net_fees: Array1<f64>,
  /// Leverage at the maximum of the pre-fee curve.
  pub k_max: f64,
  /// Pre-fee growth rate at `k_max`.
  pub r_max: f64,
}

/// Evaluate the leverage curve on a uniform grid from 0 to `upper_lev`.
///
/// `mu` and `sigma` are per-period (unannualized); `fees` is an annualized
/// cost rate. The reported optimum is the argmax of the pre-fee curve even
/// when `fees > 0`; the net curve is returned alongside for the caller to
/// weigh. Ties resolve to the lowest leverage.
pub fn compute_leverage_curve(
  mu: f64,
  sigma: f64,
  upper_lev: f64,
  fees: f64,
) -> Result<LeverageCurve, PortfolioError> {
  compute_leverage_curve_bounded(mu, sigma, 0.0, upper_lev, fees)
}

/// [`compute_leverage_curve`] with an explicit lower grid bound.
pub fn compute_leverage_curve_bounded(
  mu: f64,
  sigma: f64,
  lower_lev: f64,
  upper_lev: f64,
  fees: f64,
) -> Result<LeverageCurve, PortfolioError> {
  if !mu.is_finite() {
    return Err(PortfolioError::InvalidParameter(
      "mean return must be finite".to_string(),
    ));
  }
  if !sigma.is_finite() || sigma < 0.0 {
    return Err(PortfolioError::InvalidParameter(
      "standard deviation must be finite and non-negative".to_string(),
    ));
  }
  if !lower_lev.is_finite() || lower_lev < 0.0 {
    return Err(PortfolioError::InvalidParameter(
      "lower leverage bound must be finite and non-negative".to_string(),
    ));
  }
  if !upper_lev.is_finite() || upper_lev < lower_lev {
    return Err(PortfolioError::InvalidParameter(
      "upper leverage bound must be finite and at least the lower bound".to_string(),
    ));
  }
  if !fees.is_finite() || fees < 0.0 {
    return Err(PortfolioError::InvalidParameter(
      "fees must be finite and non-negative".to_string(),
    ));
  }

  let k = Array1::linspace(lower_lev, upper_lev, LEVERAGE_GRID_POINTS);
  let growth = k.mapv(|ki| ki * mu - 0.5 * ki * ki * sigma * sigma / (1.0 + ki * sigma));
  let growth_net_fees = &growth - fees / DEFAULT_PERIODS_PER_YEAR;

  let max_idx = growth
    .argmax()
    .map_err(|e| PortfolioError::Solver(format!("leverage grid argmax failed: {e}")))?;

  Ok(LeverageCurve {
    k_max: k[max_idx],
    r_max: growth[max_idx],
    k,
    growth,
    growth_net_fees,
  })
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;

  use super::*;

  #[test]
  fn zero_volatility_degenerates_to_linear_growth() {
    let curve = compute_leverage_curve(0.01, 0.0, 5.0, 0.0).unwrap();

    assert_eq!(curve.k.len(), LEVERAGE_GRID_POINTS);
    for (ki, ri) in curve.k.iter().zip(curve.growth.iter()) {
      assert_relative_eq!(*ri, 0.01 * ki, epsilon = 1e-12);
    }
    for w in curve.growth.to_vec().windows(2) {
      assert!(w[1] > w[0]);
    }
    // monotone increasing, so the argmax sits on the last grid point
    assert_relative_eq!(curve.k_max, 5.0, epsilon = 1e-12);
    assert_relative_eq!(curve.r_max, 0.05, epsilon = 1e-12);
  }

  #[test]
  fn zero_fees_leave_curve_unchanged() {
    let curve = compute_leverage_curve(0.002, 0.03, 4.0, 0.0).unwrap();
    for (r, rf) in curve.growth.iter().zip(curve.growth_net_fees.iter()) {
      assert_eq!(r, rf);
    }
  }

  #[test]
  fn fees_shift_net_curve_by_daily_cost() {
    let fees = 3.65;
    let curve = compute_leverage_curve(0.002, 0.03, 4.0, fees).unwrap();
    for (r, rf) in curve.growth.iter().zip(curve.growth_net_fees.iter()) {
      assert_relative_eq!(r - rf, fees / 365.0, epsilon = 1e-12);
    }
  }

  #[test]
  fn drag_term_caps_optimal_leverage() {
    // with volatility the optimum moves off the grid ceiling
    let curve = compute_leverage_curve(0.001, 0.04, 5.0, 0.0).unwrap();
    assert!(curve.k_max < 5.0);
    assert!(curve.k_max > 0.0);
    let max_r = curve.growth.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    assert_relative_eq!(curve.r_max, max_r, epsilon = 1e-15);
  }

  #[test]
  fn grid_spans_bounds_inclusive() {
    let curve = compute_leverage_curve_bounded(0.001, 0.02, 1.0, 3.0, 0.0).unwrap();
    assert_relative_eq!(curve.k[0], 1.0, epsilon = 1e-12);
    assert_relative_eq!(curve.k[LEVERAGE_GRID_POINTS - 1], 3.0, epsilon = 1e-12);
  }

  #[test]
  fn invalid_bounds_are_rejected() {
    assert!(matches!(
      compute_leverage_curve(0.001, 0.02, -1.0, 0.0),
      Err(PortfolioError::InvalidParameter(_))
    ));
    assert!(matches!(
      compute_leverage_curve(0.001, 0.02, 5.0, -0.5),
      Err(PortfolioError::InvalidParameter(_))
    ));
    assert!(matches!(
      compute_leverage_curve(0.001, -0.02, 5.0, 0.0),
      Err(PortfolioError::InvalidParameter(_))
    ));
  }
}
