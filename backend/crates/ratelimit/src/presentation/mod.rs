//! Presentation Layer
//!
//! The gate middleware, the endpoints it protects, and their DTOs.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;
