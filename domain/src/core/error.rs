//! Domain error types

use crate::plan::value_objects::{StepId, StepKind};
use thiserror::Error;

/// Fatal plan validation errors.
///
/// Every variant is detected by the pre-execution linting pass; a plan that
/// fails validation is never scheduled and no handler runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("step id cannot be empty")]
    EmptyStepId,

    #[error("duplicate step id: {0}")]
    DuplicateStepId(StepId),

    #[error("step '{step}' depends on unknown step '{dependency}'")]
    UnknownDependency { step: StepId, dependency: StepId },

    #[error("dependency cycle detected: {}", format_cycle(.cycle))]
    DependencyCycle { cycle: Vec<StepId> },

    #[error("step '{step}' has kind '{kind}' with no registered handler")]
    UnknownStepKind { step: StepId, kind: StepKind },
}

fn format_cycle(cycle: &[StepId]) -> String {
    cycle
        .iter()
        .map(StepId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Errors recovered locally at the step boundary.
///
/// These never unwind across the scheduler: they are recorded on the
/// failing step's [`StepRecord`](crate::execution::record::StepRecord) as
/// a `Failed` settlement, and only that step's dependents are skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    #[error("handler error: {0}")]
    Handler(String),

    #[error("step timed out after {secs}s")]
    Timeout { secs: u64 },
}

/// Synthesis failure. The run degrades to a raw concatenation instead of
/// failing when aggregation cannot honor its budget.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregationError {
    #[error("invalid synthesis budget: {0}")]
    InvalidBudget(String),
}
