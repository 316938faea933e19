//! Application layer for strata
//!
//! This crate contains the execution scheduler use case, port definitions,
//! and engine parameters. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod tracker;
pub mod use_cases;

// Re-export commonly used types
pub use config::{EngineParams, ExecutionMode};
pub use ports::{
    progress::{NoProgress, ProgressNotifier},
    step_handler::{HandlerError, HandlerRegistry, StepHandler},
};
pub use tracker::StatusTracker;
pub use use_cases::run_plan::{RunPlanError, RunPlanUseCase};
