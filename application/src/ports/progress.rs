//! Progress notification port
//!
//! [`ProgressNotifier`] is an **output port** that the presentation layer
//! implements to display real-time run progress (console output, chat UI
//! push, log line). All callbacks are best-effort: the trait is infallible
//! and implementations must not abort the run.
//!
//! All methods have default no-op implementations, so implementers only
//! need to override the callbacks they care about.

use strata_domain::{ExecutionMetrics, StepId, StepStatus};

/// Callback interface for observing a run.
pub trait ProgressNotifier: Send + Sync {
    /// Called once, before the first layer is admitted.
    fn on_plan_start(&self, _total_steps: usize, _layer_count: usize) {}

    /// Called when a layer is admitted for execution.
    fn on_layer_start(&self, _layer_index: usize, _step_count: usize) {}

    /// Called on every step status transition.
    ///
    /// `percent_complete` is settled steps over total steps at the time of
    /// the transition.
    fn on_step_transition(&self, _step_id: &StepId, _status: StepStatus, _percent_complete: f64) {
    }

    /// Called once, after every step has settled.
    fn on_plan_complete(&self, _metrics: &ExecutionMetrics) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {}
