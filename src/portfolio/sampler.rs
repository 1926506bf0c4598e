//! # Random Portfolio Sampler
//!
//! $$
//! w_i = \frac{u_i^{1.5}}{\sum_j u_j^{1.5}}, \quad u_j \sim U(0,1)
//! $$
//!
//! Random feasible weight vectors for visual context around the frontier.
//! The power bias tilts draws toward concentrated allocations so the
//! scatter covers the interesting edge of the cloud; no coverage property
//! is claimed.

use ndarray::Array1;
use ndarray::Array2;
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::Uniform;

use crate::error::PortfolioError;
use crate::portfolio::performance::PerformanceModel;
use crate::portfolio::types::OptimizationRequest;
use crate::portfolio::types::PortfolioPoint;

/// Exponent biasing draws toward concentrated allocations.
pub const CONCENTRATION_BIAS: f64 = 1.5;

/// Draw `num` random weight rows on the `n_assets` simplex.
pub fn random_simplex_weights<R: Rng + ?Sized>(
  num: usize,
  n_assets: usize,
  rng: &mut R,
) -> Array2<f64> {
  let mut weights = Array2::random_using((num, n_assets), Uniform::new(0.0, 1.0), rng)
    .mapv(|u: f64| u.powf(CONCENTRATION_BIAS));

  for mut row in weights.rows_mut() {
    let sum = row.sum();
    if sum < 1e-12 {
      row.fill(1.0 / n_assets as f64);
    } else {
      row /= sum;
    }
  }

  weights
}

/// Performance triples for `request.num_portfolios` random portfolios,
/// in draw order, computed batched via matrix operations.
pub fn sample_portfolios(
  mean_returns: &Array1<f64>,
  covariance: &Array2<f64>,
  request: &OptimizationRequest,
) -> Result<Vec<PortfolioPoint>, PortfolioError> {
  sample_portfolios_using(mean_returns, covariance, request, &mut rand::thread_rng())
}

/// [`sample_portfolios`] with a caller-owned RNG for reproducible draws.
pub fn sample_portfolios_using<R: Rng + ?Sized>(
  mean_returns: &Array1<f64>,
  covariance: &Array2<f64>,
  request: &OptimizationRequest,
  rng: &mut R,
) -> Result<Vec<PortfolioPoint>, PortfolioError> {
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

  let weights = random_simplex_weights(request.num_portfolios, n, rng);
  let model = PerformanceModel::new(
    mean_returns,
    covariance,
    request.risk_free,
    request.periods_per_year,
  );
  model.evaluate_batch(&weights)
}
