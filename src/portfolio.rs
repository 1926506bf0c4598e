//! # Portfolio
//!
//! $$
//! \sigma_p^2 = \mathbf{w}^\top \Sigma \mathbf{w}
//! $$
//!
//! Tangency portfolio, efficient frontier and random portfolio sampling on
//! the long-only fully-invested simplex.

pub mod engine;
pub mod optimizers;
pub mod performance;
pub mod sampler;
pub mod solver;
pub mod types;

pub use engine::PortfolioEngine;
pub use optimizers::compute_efficient_frontier;
pub use optimizers::compute_efficient_frontier_with;
pub use optimizers::compute_tangency_portfolio;
pub use optimizers::compute_tangency_portfolio_seeded;
pub use optimizers::compute_tangency_portfolio_with;
pub use performance::portfolio_performance;
pub use performance::PerformanceModel;
pub use sampler::random_simplex_weights;
pub use sampler::sample_portfolios;
pub use sampler::sample_portfolios_using;
pub use solver::NelderMeadSolver;
pub use solver::SimplexSolver;
pub use solver::SolverDiagnostics;
pub use solver::SolverSolution;
pub use types::EfficientFrontier;
pub use types::FrontierPoint;
pub use types::OptimizationRequest;
pub use types::PortfolioPoint;
pub use types::TangencyPortfolio;
