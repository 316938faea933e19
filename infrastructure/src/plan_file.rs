//! Plan document loading.
//!
//! Plans arrive as JSON or TOML documents produced by an external planner.
//! This module deserializes them into the domain [`Plan`]; the engine's
//! linting pass (unknown ids, cycles, unknown step kinds) runs on the
//! converted plan before any execution begins.
//!
//! ```toml
//! objective = "Summarize the state of Rust schedulers"
//!
//! [[steps]]
//! id = "find"
//! kind = "search"
//! objective = "Find recent articles"
//! priority = 1
//! parameters = { query = "rust scheduler" }
//!
//! [[steps]]
//! id = "read"
//! kind = "read_url"
//! depends_on = ["find"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use strata_domain::{Plan, Priority, Step};
use thiserror::Error;
use tracing::debug;

/// Errors loading a plan document.
#[derive(Debug, Error)]
pub enum PlanFileError {
    #[error("failed to read plan file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse JSON plan: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse TOML plan: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported plan format '{0}' (expected .json or .toml)")]
    UnsupportedFormat(String),
}

/// Wire representation of a plan document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDocument {
    pub objective: String,
    #[serde(default)]
    pub expected_outcome: Option<String>,
    #[serde(default)]
    pub steps: Vec<StepDocument>,
}

/// Wire representation of a single step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDocument {
    pub id: String,
    pub kind: String,
    #[serde(default)]
    pub objective: String,
    #[serde(default)]
    pub parameters: HashMap<String, serde_json::Value>,
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_priority() -> u8 {
    Priority::default().get()
}

impl PlanDocument {
    /// Convert the document into a domain plan.
    pub fn into_plan(self) -> Plan {
        let mut plan = Plan::new(self.objective);
        if let Some(outcome) = self.expected_outcome {
            plan = plan.with_expected_outcome(outcome);
        }
        for doc in self.steps {
            let mut step = Step::new(doc.id, doc.kind, doc.objective)
                .with_priority(doc.priority);
            step.parameters = doc.parameters;
            step.depends_on = doc.depends_on.into_iter().map(Into::into).collect();
            step.timeout_secs = doc.timeout_secs;
            plan.add_step(step);
        }
        plan
    }
}

/// Parse a JSON plan document.
pub fn parse_plan_json(content: &str) -> Result<Plan, PlanFileError> {
    let document: PlanDocument = serde_json::from_str(content)?;
    Ok(document.into_plan())
}

/// Parse a TOML plan document.
pub fn parse_plan_toml(content: &str) -> Result<Plan, PlanFileError> {
    let document: PlanDocument = toml::from_str(content)?;
    Ok(document.into_plan())
}

/// Load a plan from a file, dispatching on its extension.
pub fn load_plan(path: &Path) -> Result<Plan, PlanFileError> {
    let content = std::fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    debug!(path = %path.display(), format = %extension, "loading plan document");

    match extension.as_str() {
        "json" => parse_plan_json(&content),
        "toml" => parse_plan_toml(&content),
        other => Err(PlanFileError::UnsupportedFormat(other.to_string())),
    }
}
