//! Core domain concepts shared across all subdomains.
//!
//! - [`error::ValidationError`] - fatal pre-execution plan errors
//! - [`error::StepError`] - errors recovered locally at the step boundary
//! - [`error::AggregationError`] - synthesis failures (degrade, never fatal)

pub mod error;
