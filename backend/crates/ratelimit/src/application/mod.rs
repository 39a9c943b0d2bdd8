//! Application Layer - Use Cases
//!
//! Orchestrates the clock, a counter store and the decision rule.

pub mod check_rate_limit;

pub use check_rate_limit::CheckRateLimitUseCase;
