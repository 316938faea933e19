//! Immutable run records.
//!
//! A [`StepRecord`] is produced once per step when it settles and never
//! mutated afterward. [`ExecutionResult`] is assembled once at the end of
//! a run, with records in original plan order regardless of how execution
//! interleaved.

use crate::core::error::StepError;
use crate::execution::status::StepStatus;
use crate::plan::value_objects::{StepId, StepOutput};
use crate::synthesis::aggregator::Synthesis;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settlement record for a single step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub step_id: StepId,
    /// Terminal status of the step
    pub status: StepStatus,
    /// Handler payload (completed steps only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<StepOutput>,
    /// Error description (failed steps only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Why the step was never dispatched (skipped steps only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

impl StepRecord {
    pub fn completed(
        step_id: StepId,
        output: StepOutput,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
    ) -> Self {
        Self {
            step_id,
            status: StepStatus::Completed,
            output: Some(output),
            error: None,
            skip_reason: None,
            started_at: Some(started_at),
            ended_at: Some(ended_at),
        }
    }

    pub fn failed(
        step_id: StepId,
        error: &StepError,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
    ) -> Self {
        Self {
            step_id,
            status: StepStatus::Failed,
            output: None,
            error: Some(error.to_string()),
            skip_reason: None,
            started_at: Some(started_at),
            ended_at: Some(ended_at),
        }
    }

    pub fn skipped(step_id: StepId, reason: impl Into<String>) -> Self {
        Self {
            step_id,
            status: StepStatus::Skipped,
            output: None,
            error: None,
            skip_reason: Some(reason.into()),
            started_at: None,
            ended_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == StepStatus::Completed
    }

    /// Wall-clock time the handler held a worker slot.
    pub fn duration(&self) -> Option<Duration> {
        let (start, end) = (self.started_at?, self.ended_at?);
        (end - start).to_std().ok()
    }
}

/// Plan-level execution counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionMetrics {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Total wall-clock time of the run
    pub wall_clock: Duration,
}

impl ExecutionMetrics {
    pub fn from_records(records: &[StepRecord], wall_clock: Duration) -> Self {
        let mut metrics = Self {
            total: records.len(),
            wall_clock,
            ..Self::default()
        };
        for record in records {
            match record.status {
                StepStatus::Completed => metrics.completed += 1,
                StepStatus::Failed => metrics.failed += 1,
                StepStatus::Skipped => metrics.skipped += 1,
                StepStatus::Pending | StepStatus::Running => {}
            }
        }
        metrics
    }

    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64
    }
}

/// Final aggregate of a run, returned to the caller and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Objective of the executed plan
    pub objective: String,
    /// Step records in original plan order
    pub records: Vec<StepRecord>,
    /// Budget-constrained combination of step payloads
    pub synthesis: Synthesis,
    pub metrics: ExecutionMetrics,
    /// At least one step completed and at least one failed or was skipped
    pub partial_success: bool,
}

impl ExecutionResult {
    /// Assemble a result from settled records (already in plan order).
    pub fn new(
        objective: impl Into<String>,
        records: Vec<StepRecord>,
        synthesis: Synthesis,
        wall_clock: Duration,
    ) -> Self {
        let metrics = ExecutionMetrics::from_records(&records, wall_clock);
        let partial_success =
            metrics.completed > 0 && (metrics.failed > 0 || metrics.skipped > 0);
        Self {
            objective: objective.into(),
            records,
            synthesis,
            metrics,
            partial_success,
        }
    }

    /// Every step completed.
    pub fn success(&self) -> bool {
        self.metrics.completed == self.metrics.total
    }

    pub fn record(&self, id: &StepId) -> Option<&StepRecord> {
        self.records.iter().find(|r| &r.step_id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(id: &str) -> StepRecord {
        let now = Utc::now();
        StepRecord::completed(id.into(), StepOutput::text("ok"), now, now)
    }

    fn failed(id: &str) -> StepRecord {
        let now = Utc::now();
        StepRecord::failed(id.into(), &StepError::Handler("boom".into()), now, now)
    }

    #[test]
    fn test_record_constructors() {
        let record = completed("a");
        assert!(record.is_completed());
        assert!(record.error.is_none());

        let record = failed("b");
        assert_eq!(record.status, StepStatus::Failed);
        assert_eq!(record.error.as_deref(), Some("handler error: boom"));

        let record = StepRecord::skipped("c".into(), "unmet dependency: b");
        assert_eq!(record.status, StepStatus::Skipped);
        assert_eq!(record.skip_reason.as_deref(), Some("unmet dependency: b"));
        assert!(record.duration().is_none());
    }

    #[test]
    fn test_metrics_counts() {
        let records = vec![
            completed("a"),
            failed("b"),
            StepRecord::skipped("c".into(), "unmet dependency: b"),
        ];
        let metrics = ExecutionMetrics::from_records(&records, Duration::from_secs(2));

        assert_eq!(metrics.total, 3);
        assert_eq!(metrics.completed, 1);
        assert_eq!(metrics.failed, 1);
        assert_eq!(metrics.skipped, 1);
        assert!((metrics.success_rate() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_success_requires_mixed_outcome() {
        let synthesis = Synthesis::default();

        let all_ok = ExecutionResult::new(
            "plan",
            vec![completed("a"), completed("b")],
            synthesis.clone(),
            Duration::ZERO,
        );
        assert!(all_ok.success());
        assert!(!all_ok.partial_success);

        let mixed = ExecutionResult::new(
            "plan",
            vec![completed("a"), failed("b")],
            synthesis.clone(),
            Duration::ZERO,
        );
        assert!(!mixed.success());
        assert!(mixed.partial_success);

        let none = ExecutionResult::new(
            "plan",
            vec![
                failed("a"),
                StepRecord::skipped("b".into(), "unmet dependency: a"),
            ],
            synthesis,
            Duration::ZERO,
        );
        assert!(!none.success());
        assert!(!none.partial_success);
    }

    #[test]
    fn test_result_is_serializable() {
        let result = ExecutionResult::new(
            "plan",
            vec![completed("a")],
            Synthesis::default(),
            Duration::from_millis(5),
        );
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"partial_success\""));
    }
}
