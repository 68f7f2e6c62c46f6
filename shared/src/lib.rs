//! Shared domain types for the HeatLens urban heat analysis platform
//!
//! This crate contains the pure analysis core shared between the backend
//! and other components: heat-zone classification, planting impact
//! estimation, and input validation. It performs no I/O.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
