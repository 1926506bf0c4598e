//! # frontier-rs
//!
//! $$
//! \mathbf{w}^\*=\arg\max_{\mathbf{w}\in\Delta^{N-1}} \frac{\mathbb E[R_p]-r_f}{\sigma_p}
//! $$
//!
//! Mean-variance portfolio analytics under Modern Portfolio Theory: return
//! statistics from price series, the maximum-Sharpe (tangency) portfolio,
//! the efficient frontier, random portfolio sampling for visual context and
//! an optimal-leverage grid search for a single asset.
//!
//! The crate is a pure computation core: price data in, numeric results
//! out. Fetching, caching and presentation live with the caller.

pub mod error;
pub mod leverage;
pub mod portfolio;
pub mod stats;

/// Trading periods per year for continuously-traded assets.
pub const DEFAULT_PERIODS_PER_YEAR: f64 = 365.0;
