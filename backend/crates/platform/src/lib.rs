//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Rate limit policy and the clock capability
//! - Policy resolution from process configuration
//! - Client identity extraction

pub mod client;
pub mod config;
pub mod rate_limit;
