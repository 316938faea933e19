//! Step status state machine.
//!
//! `Pending -> Running -> {Completed | Failed | Skipped}`. The three
//! right-hand states are terminal; no legal transition leaves them.
//! `Pending -> Skipped` is also legal (a step whose dependency failed, or
//! a cancelled run, settles without ever starting).

use crate::plan::entities::Plan;
use crate::plan::value_objects::StepId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Status of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Waiting for its dependencies and a worker slot
    #[default]
    Pending,
    /// Handler currently executing
    Running,
    /// Handler returned a payload
    Completed,
    /// Handler returned an error or timed out
    Failed,
    /// Never dispatched (unmet dependency or cancellation)
    Skipped,
}

impl StepStatus {
    pub fn as_str(&self) -> &str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Running => "running",
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
            StepStatus::Skipped => "skipped",
        }
    }

    /// Whether this status is a settlement (cannot be left).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StepStatus::Completed | StepStatus::Failed | StepStatus::Skipped
        )
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transition rejected by the state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("unknown step: {0}")]
    UnknownStep(StepId),

    #[error("illegal transition for step '{step}': {from} -> {to}")]
    Illegal {
        step: StepId,
        from: StepStatus,
        to: StepStatus,
    },
}

/// Per-step status map with transition enforcement.
///
/// The board itself is not synchronized; the application layer wraps it in
/// the single-owner status tracker through which all workers funnel.
#[derive(Debug, Clone)]
pub struct StatusBoard {
    statuses: HashMap<StepId, StepStatus>,
}

impl StatusBoard {
    /// Board for a plan, every step `Pending`.
    pub fn new(plan: &Plan) -> Self {
        Self {
            statuses: plan
                .steps
                .iter()
                .map(|s| (s.id.clone(), StepStatus::Pending))
                .collect(),
        }
    }

    pub fn status(&self, id: &StepId) -> Option<StepStatus> {
        self.statuses.get(id).copied()
    }

    /// Apply a transition, enforcing legality.
    pub fn transition(
        &mut self,
        id: &StepId,
        to: StepStatus,
    ) -> Result<StepStatus, TransitionError> {
        let current = self
            .statuses
            .get_mut(id)
            .ok_or_else(|| TransitionError::UnknownStep(id.clone()))?;

        let legal = match (*current, to) {
            (StepStatus::Pending, StepStatus::Running) => true,
            (StepStatus::Pending, StepStatus::Skipped) => true,
            (StepStatus::Running, StepStatus::Completed) => true,
            (StepStatus::Running, StepStatus::Failed) => true,
            (StepStatus::Running, StepStatus::Skipped) => true,
            _ => false,
        };
        if !legal {
            return Err(TransitionError::Illegal {
                step: id.clone(),
                from: *current,
                to,
            });
        }

        *current = to;
        Ok(to)
    }

    /// Read-only snapshot for progress notifiers.
    pub fn snapshot(&self) -> HashMap<StepId, StepStatus> {
        self.statuses.clone()
    }

    pub fn total(&self) -> usize {
        self.statuses.len()
    }

    /// Number of settled steps.
    pub fn settled(&self) -> usize {
        self.statuses.values().filter(|s| s.is_terminal()).count()
    }

    pub fn all_settled(&self) -> bool {
        self.settled() == self.total()
    }

    /// Settled steps over total, as a percentage. An empty board is 100%.
    pub fn percent_complete(&self) -> f64 {
        if self.statuses.is_empty() {
            return 100.0;
        }
        self.settled() as f64 / self.total() as f64 * 100.0
    }
}
