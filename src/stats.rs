//! # Return Statistics
//!
//! $$
//! r_t = \frac{p_t}{p_{t-1}} - 1, \qquad
//! \Sigma = \frac{1}{T-1}\,C^\top C
//! $$
//!
//! Per-period fractional returns, mean vector and sample covariance matrix
//! derived from an aligned price matrix (rows = time, columns = assets).

use ndarray::s;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::Axis;

use crate::error::PortfolioError;

/// Drop every row of the price matrix containing a non-finite observation.
///
/// Alignment is all-or-nothing per row: a period missing any asset's price
/// is excluded for all assets.
pub fn drop_incomplete_rows(prices: &Array2<f64>) -> Array2<f64> {
  let kept: Vec<usize> = prices
    .rows()
    .into_iter()
    .enumerate()
    .filter(|(_, row)| row.iter().all(|v| v.is_finite()))
    .map(|(i, _)| i)
    .collect();

  let mut out = Array2::zeros((kept.len(), prices.ncols()));
  for (i, &ri) in kept.iter().enumerate() {
    out.row_mut(i).assign(&prices.row(ri));
  }
  out
}

/// Per-period return statistics for one or more assets.
///
/// Immutable once computed; a changed price series means a new instance.
#[derive(Clone, Debug)]
pub struct ReturnStatistics {
  /// Per-period fractional changes, `(T-1) x N`.
  pub returns: Array2<f64>,
  /// Per-period mean return for each asset.
  pub mean: Array1<f64>,
  /// Sample covariance matrix with Bessel's correction, `N x N`.
  pub covariance: Array2<f64>,
}

impl ReturnStatistics {
  /// Compute statistics from an aligned price matrix with no missing
  /// values (rows = time, columns = assets).
  pub fn from_prices(prices: &Array2<f64>) -> Result<Self, PortfolioError> {
    if prices.nrows() == 0 || prices.ncols() == 0 {
      return Err(PortfolioError::EmptyPriceSeries);
    }
    if prices.nrows() < 2 {
      return Err(PortfolioError::InsufficientData {
        got: prices.nrows(),
      });
    }
    if prices.iter().any(|&p| !p.is_finite() || p <= 0.0) {
      return Err(PortfolioError::InvalidParameter(
        "prices must be finite and strictly positive".to_string(),
      ));
    }

    let curr = prices.slice(s![1.., ..]);
    let prev = prices.slice(s![..-1, ..]);
    let returns = &curr / &prev - 1.0;

    let mean = returns
      .mean_axis(Axis(0))
      .ok_or(PortfolioError::EmptyPriceSeries)?;

    let t = returns.nrows();
    let n = returns.ncols();
    // A single return row has no sample variance.
    let covariance = if t < 2 {
      Array2::zeros((n, n))
    } else {
      let centered = &returns - &mean;
      centered.t().dot(&centered) / (t as f64 - 1.0)
    };

    Ok(Self {
      returns,
      mean,
      covariance,
    })
  }

  /// Single-asset convenience over [`ReturnStatistics::from_prices`].
  pub fn from_series(prices: &[f64]) -> Result<Self, PortfolioError> {
    let matrix = Array2::from_shape_vec((prices.len(), 1), prices.to_vec())
      .map_err(|e| PortfolioError::InvalidParameter(e.to_string()))?;
    Self::from_prices(&matrix)
  }

  /// Per-period standard deviation of each asset (diagonal of the
  /// covariance matrix).
  pub fn std(&self) -> Array1<f64> {
    self.covariance.diag().mapv(|v| v.max(0.0).sqrt())
  }

  pub fn n_assets(&self) -> usize {
    self.mean.len()
  }

  pub fn n_periods(&self) -> usize {
    self.returns.nrows()
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use ndarray::array;

  use super::*;

  #[test]
  fn fractional_returns_drop_first_period() {
    let prices = array![[100.0], [110.0], [121.0]];
    let stats = ReturnStatistics::from_prices(&prices).unwrap();

    assert_eq!(stats.n_periods(), 2);
    assert_relative_eq!(stats.returns[[0, 0]], 0.1, epsilon = 1e-12);
    assert_relative_eq!(stats.returns[[1, 0]], 0.1, epsilon = 1e-12);
    assert_relative_eq!(stats.mean[0], 0.1, epsilon = 1e-12);
  }

  #[test]
  fn sample_std_uses_bessel_correction() {
    let prices = array![[100.0], [110.0], [99.0]];
    let stats = ReturnStatistics::from_prices(&prices).unwrap();

    // returns are [0.1, -0.1], sample variance 0.02
    assert_relative_eq!(stats.mean[0], 0.0, epsilon = 1e-12);
    assert_relative_eq!(stats.std()[0], 0.02_f64.sqrt(), epsilon = 1e-12);
  }

  #[test]
  fn two_observations_yield_zero_std() {
    let prices = array![[100.0], [105.0]];
    let stats = ReturnStatistics::from_prices(&prices).unwrap();

    assert_relative_eq!(stats.mean[0], 0.05, epsilon = 1e-12);
    assert_eq!(stats.std()[0], 0.0);
  }

  #[test]
  fn std_is_non_negative_for_valid_series() {
    let prices = array![[50.0, 3.0], [52.0, 2.7], [47.0, 3.3], [51.0, 3.1]];
    let stats = ReturnStatistics::from_prices(&prices).unwrap();

    for s in stats.std() {
      assert!(s >= 0.0);
    }
  }

  #[test]
  fn covariance_is_symmetric() {
    let prices = array![
      [100.0, 20.0, 5.0],
      [101.0, 21.0, 4.8],
      [99.5, 20.5, 5.2],
      [102.0, 19.8, 5.1],
      [103.0, 20.2, 5.3]
    ];
    let stats = ReturnStatistics::from_prices(&prices).unwrap();

    for i in 0..3 {
      for j in 0..3 {
        assert_relative_eq!(
          stats.covariance[[i, j]],
          stats.covariance[[j, i]],
          epsilon = 1e-15
        );
      }
    }
  }

  #[test]
  fn empty_matrix_is_rejected() {
    let prices = Array2::<f64>::zeros((0, 2));
    assert_eq!(
      ReturnStatistics::from_prices(&prices).unwrap_err(),
      PortfolioError::EmptyPriceSeries
    );
  }

  #[test]
  fn single_observation_is_insufficient() {
    let prices = array![[100.0, 20.0]];
    assert_eq!(
      ReturnStatistics::from_prices(&prices).unwrap_err(),
      PortfolioError::InsufficientData { got: 1 }
    );
  }

  #[test]
  fn non_positive_prices_are_rejected() {
    let prices = array![[100.0], [0.0], [90.0]];
    assert!(matches!(
      ReturnStatistics::from_prices(&prices),
      Err(PortfolioError::InvalidParameter(_))
    ));
  }

  #[test]
  fn incomplete_rows_are_dropped_whole() {
    let prices = array![
      [100.0, 20.0],
      [101.0, f64::NAN],
      [102.0, 21.0],
      [f64::NAN, 22.0],
      [104.0, 21.5]
    ];
    let aligned = drop_incomplete_rows(&prices);

    assert_eq!(aligned.nrows(), 3);
    assert_eq!(aligned.row(0).to_vec(), vec![100.0, 20.0]);
    assert_eq!(aligned.row(1).to_vec(), vec![102.0, 21.0]);
    assert_eq!(aligned.row(2).to_vec(), vec![104.0, 21.5]);
  }
}
