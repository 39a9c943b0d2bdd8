//! Domain Layer
//!
//! Core types and the decision rule. No I/O happens here; backends are
//! reached through the traits in [`repository`].

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;
