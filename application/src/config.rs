//! Engine parameters - execution loop control.
//!
//! [`EngineParams`] groups the static parameters that control the
//! scheduler in [`RunPlanUseCase`](crate::use_cases::run_plan::RunPlanUseCase).
//! These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use strata_domain::SynthesisBudget;

/// Concurrency policy for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Strictly one step at a time, in schedule order. Used when
    /// reproducible ordering is required or handlers share resources that
    /// are not safe to use concurrently.
    Sequential,
    /// Up to `concurrency_limit` steps of a layer at once.
    #[default]
    Concurrent,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &str {
        match self {
            ExecutionMode::Sequential => "sequential",
            ExecutionMode::Concurrent => "concurrent",
        }
    }

    pub fn is_sequential(&self) -> bool {
        matches!(self, ExecutionMode::Sequential)
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" | "seq" => Ok(ExecutionMode::Sequential),
            "concurrent" | "parallel" => Ok(ExecutionMode::Concurrent),
            _ => Err(format!("Invalid ExecutionMode: {}", s)),
        }
    }
}

/// Scheduler control parameters.
///
/// Controls the concurrency policy, worker-pool bound, per-step timeout
/// default, and the synthesis budget applied at the end of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineParams {
    /// Concurrency policy
    pub mode: ExecutionMode,
    /// Maximum steps of one layer in flight at once (concurrent mode)
    pub concurrency_limit: usize,
    /// Default per-step timeout; steps may override via `timeout_secs`
    pub step_timeout: Duration,
    /// Budget applied by the result synthesizer
    pub budget: SynthesisBudget,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Concurrent,
            concurrency_limit: 4,
            step_timeout: Duration::from_secs(60),
            budget: SynthesisBudget::default(),
        }
    }
}

impl EngineParams {
    /// Worker-pool size the scheduler actually uses: 1 in sequential
    /// mode, at least 1 otherwise.
    pub fn effective_concurrency(&self) -> usize {
        if self.mode.is_sequential() {
            1
        } else {
            self.concurrency_limit.max(1)
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit;
        self
    }

    pub fn with_step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout = timeout;
        self
    }

    pub fn with_budget(mut self, budget: SynthesisBudget) -> Self {
        self.budget = budget;
        self
    }
}
