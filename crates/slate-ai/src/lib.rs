//! slate-ai
//!
//! Estimation adapter: turns a shooting schedule into a per-date cost
//! estimate by planning shoot days, prompting a generative model, and
//! parsing its JSON reply. The model itself sits behind the
//! [`GenerativeModel`] trait so the parsing and error classification can be
//! exercised without network access.

pub mod error;
pub mod estimator;
pub mod model;
pub mod rate_limit;

pub use error::AiError;
pub use estimator::BudgetEstimator;
pub use model::{GeminiModel, GenerativeModel, ReplayModel};
pub use rate_limit::RateLimiter;
