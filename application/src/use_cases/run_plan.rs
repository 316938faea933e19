//! Run Plan use case.
//!
//! The execution scheduler: drives a validated plan through its layers
//! under the configured concurrency policy, isolating per-step failures,
//! propagating dependency skips, and assembling the final
//! [`ExecutionResult`].
//!
//! # Scheduling model
//!
//! A bounded worker pool (a semaphore with `concurrency_limit` permits, 1
//! in sequential mode) drains the ready steps of one layer at a time. A
//! step is marked `Running` only after its permit is acquired, so the
//! concurrency bound is observable from the outside. Layer boundaries are
//! full barriers: layer *k+1* is not admitted until every step of layer
//! *k* has settled.
//!
//! # Failure semantics
//!
//! Step failures are values, never unwinds: a handler error or timeout
//! becomes a `Failed` record and only that step's dependents are skipped.
//! The caller receives either a pre-execution validation error or a
//! complete result - even when every step failed.

use crate::config::EngineParams;
use crate::ports::progress::ProgressNotifier;
use crate::ports::step_handler::HandlerRegistry;
use crate::tracker::StatusTracker;
use chrono::Utc;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use strata_domain::{
    ExecutionResult, Plan, Schedule, Step, StepError, StepId, StepRecord, StepStatus,
    ValidationError, aggregate, raw_synthesis, resolve,
};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Skip reason recorded on steps that never started because the run was
/// cancelled.
pub const CANCELLED_REASON: &str = "plan cancelled";

/// Fatal errors of a run. Everything else settles into step records.
#[derive(Debug, Error)]
pub enum RunPlanError {
    #[error("plan validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// Use case for executing a validated plan.
pub struct RunPlanUseCase {
    registry: Arc<HandlerRegistry>,
    params: EngineParams,
    cancellation_token: Option<CancellationToken>,
}

impl RunPlanUseCase {
    pub fn new(registry: Arc<HandlerRegistry>, params: EngineParams) -> Self {
        Self {
            registry,
            params,
            cancellation_token: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Pre-execution linting pass: structural validation, handler
    /// resolution, dependency layering. Nothing executes if any check
    /// fails.
    pub fn lint(&self, plan: &Plan) -> Result<Schedule, ValidationError> {
        plan.validate()?;
        self.registry.lint(plan)?;
        resolve(plan)
    }

    /// Execute the plan and return the aggregate result.
    ///
    /// The plan is read-only for the duration of the run. Records in the
    /// result are in original plan order regardless of how execution
    /// interleaved.
    pub async fn execute(
        &self,
        plan: &Plan,
        progress: &dyn ProgressNotifier,
    ) -> Result<ExecutionResult, RunPlanError> {
        let schedule = self.lint(plan)?;
        let started = Instant::now();

        info!(
            steps = plan.len(),
            layers = schedule.layer_count(),
            mode = %self.params.mode,
            limit = self.params.effective_concurrency(),
            "starting plan run"
        );
        progress.on_plan_start(plan.len(), schedule.layer_count());

        let tracker = StatusTracker::new(plan, progress);
        let semaphore = Semaphore::new(self.params.effective_concurrency());
        let mut settled: HashMap<StepId, StepRecord> = HashMap::new();

        for (layer_index, layer) in schedule.layers().iter().enumerate() {
            progress.on_layer_start(layer_index, layer.len());
            debug!(layer = layer_index, steps = layer.len(), "admitting layer");

            let mut runnable: Vec<&Step> = Vec::new();
            for step_id in layer {
                let Some(step) = plan.step(step_id) else { continue };
                if let Some(reason) = self.skip_reason(step, &settled) {
                    tracker.record_transition(&step.id, StepStatus::Skipped);
                    settled.insert(
                        step.id.clone(),
                        StepRecord::skipped(step.id.clone(), reason),
                    );
                } else {
                    runnable.push(step);
                }
            }

            // Layer barrier: every step settles before the next layer is admitted.
            let records = if self.params.mode.is_sequential() {
                let mut records = Vec::with_capacity(runnable.len());
                for step in runnable {
                    records.push(self.run_step(step, &tracker).await);
                }
                records
            } else {
                join_all(runnable.into_iter().map(|step| {
                    let semaphore = &semaphore;
                    let tracker = &tracker;
                    async move {
                        let _permit =
                            semaphore.acquire().await.expect("semaphore never closed");
                        self.run_step(step, tracker).await
                    }
                }))
                .await
            };

            for record in records {
                settled.insert(record.step_id.clone(), record);
            }
        }

        let records: Vec<StepRecord> = plan
            .steps
            .iter()
            .map(|step| {
                settled
                    .remove(&step.id)
                    .unwrap_or_else(|| StepRecord::skipped(step.id.clone(), CANCELLED_REASON))
            })
            .collect();

        let synthesis = match aggregate(plan, &records, &self.params.budget) {
            Ok(synthesis) => synthesis,
            Err(error) => {
                warn!(%error, "synthesis degraded to raw concatenation");
                raw_synthesis(plan, &records)
            }
        };

        let result = ExecutionResult::new(
            plan.objective.clone(),
            records,
            synthesis,
            started.elapsed(),
        );
        progress.on_plan_complete(&result.metrics);
        info!(
            completed = result.metrics.completed,
            failed = result.metrics.failed,
            skipped = result.metrics.skipped,
            partial_success = result.partial_success,
            "plan run finished"
        );

        Ok(result)
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation_token
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }

    /// Why a step must settle without running, if any reason applies.
    ///
    /// A dependency that settled as anything other than `Completed` skips
    /// the dependent, naming the unmet dependency; this propagates
    /// transitively through later layers because the skipped record itself
    /// is not `Completed`.
    fn skip_reason(&self, step: &Step, settled: &HashMap<StepId, StepRecord>) -> Option<String> {
        for dependency in &step.depends_on {
            let completed = settled
                .get(dependency)
                .is_some_and(|record| record.is_completed());
            if !completed {
                return Some(format!("unmet dependency: {dependency}"));
            }
        }
        if self.is_cancelled() {
            return Some(CANCELLED_REASON.to_string());
        }
        None
    }

    /// Run a single step inside a worker slot and settle it.
    async fn run_step(&self, step: &Step, tracker: &StatusTracker<'_>) -> StepRecord {
        // A permit may have been held while cancellation arrived.
        if self.is_cancelled() {
            tracker.record_transition(&step.id, StepStatus::Skipped);
            return StepRecord::skipped(step.id.clone(), CANCELLED_REASON);
        }

        let handler = self
            .registry
            .handler_for(&step.kind)
            .expect("handler presence checked by lint");

        tracker.record_transition(&step.id, StepStatus::Running);
        let timeout = step
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(self.params.step_timeout);
        let started_at = Utc::now();
        debug!(step = %step.id, kind = %step.kind, "dispatching step");

        let outcome = tokio::time::timeout(timeout, handler.execute(step)).await;
        let ended_at = Utc::now();

        match outcome {
            Ok(Ok(output)) => {
                tracker.record_transition(&step.id, StepStatus::Completed);
                StepRecord::completed(step.id.clone(), output, started_at, ended_at)
            }
            Ok(Err(error)) => {
                warn!(step = %step.id, %error, "step failed");
                tracker.record_transition(&step.id, StepStatus::Failed);
                StepRecord::failed(
                    step.id.clone(),
                    &StepError::Handler(error.to_string()),
                    started_at,
                    ended_at,
                )
            }
            Err(_) => {
                warn!(step = %step.id, timeout_secs = timeout.as_secs(), "step timed out");
                tracker.record_transition(&step.id, StepStatus::Failed);
                StepRecord::failed(
                    step.id.clone(),
                    &StepError::Timeout {
                        secs: timeout.as_secs(),
                    },
                    started_at,
                    ended_at,
                )
            }
        }
    }
}
