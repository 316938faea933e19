//! Domain layer for strata
//!
//! This crate contains the core model of the plan execution engine and
//! performs no I/O. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Plan / Step
//!
//! A [`Plan`] is a declarative, read-only description of typed steps with
//! priorities and inter-step dependencies. The engine never mutates a plan.
//!
//! ## Layers
//!
//! The dependency resolver turns an acyclic plan into execution *layers*:
//! layer 0 holds the steps with no dependencies, layer *k* the steps whose
//! dependencies all settle in layers 0..k-1. Steps within a layer carry no
//! ordering constraint and are candidates for parallel execution.
//!
//! ## Settlement
//!
//! Every step ends in exactly one terminal state - `Completed`, `Failed`,
//! or `Skipped` - captured as an immutable [`StepRecord`]. Settled records
//! are synthesized into a single budget-constrained result.

pub mod core;
pub mod execution;
pub mod plan;
pub mod schedule;
pub mod synthesis;
pub mod util;

// Re-export commonly used types
pub use crate::core::error::{AggregationError, StepError, ValidationError};
pub use execution::{
    record::{ExecutionMetrics, ExecutionResult, StepRecord},
    status::{StatusBoard, StepStatus, TransitionError},
};
pub use plan::{
    entities::{Plan, Step},
    value_objects::{Priority, StepId, StepKind, StepOutput},
};
pub use schedule::resolver::{Schedule, resolve};
pub use synthesis::{
    aggregator::{Synthesis, aggregate, raw_synthesis},
    budget::SynthesisBudget,
};
