//! Plan domain entities

use super::value_objects::{Priority, StepId, StepKind};
use crate::core::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A single unit of work within a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// Unique identifier within the plan
    pub id: StepId,
    /// The capability this step is routed to
    pub kind: StepKind,
    /// Human-readable goal; opaque to the engine
    pub objective: String,
    /// Kind-specific payload, passed verbatim to the dispatched handler
    #[serde(default)]
    pub parameters: HashMap<String, serde_json::Value>,
    /// Intra-layer tie-breaker (1 = highest)
    #[serde(default)]
    pub priority: Priority,
    /// Steps that must settle before this one may start
    #[serde(default)]
    pub depends_on: Vec<StepId>,
    /// Per-step timeout override in seconds; engine default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Step {
    pub fn new(
        id: impl Into<StepId>,
        kind: impl Into<StepKind>,
        objective: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            objective: objective.into(),
            parameters: HashMap::new(),
            priority: Priority::default(),
            depends_on: Vec::new(),
            timeout_secs: None,
        }
    }

    pub fn with_param(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn with_priority(mut self, priority: impl Into<Priority>) -> Self {
        self.priority = priority.into();
        self
    }

    pub fn with_dependency(mut self, step_id: impl Into<StepId>) -> Self {
        self.depends_on.push(step_id.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

/// A declarative plan: ordered steps plus plan-level metadata.
///
/// Plans are produced by an external planner, validated on entry, and
/// read-only for the duration of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Overall goal of the plan
    pub objective: String,
    /// Description of the expected outcome (if provided by the planner)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_outcome: Option<String>,
    /// Ordered list of steps
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Plan {
    pub fn new(objective: impl Into<String>) -> Self {
        Self {
            objective: objective.into(),
            expected_outcome: None,
            steps: Vec::new(),
        }
    }

    pub fn with_expected_outcome(mut self, outcome: impl Into<String>) -> Self {
        self.expected_outcome = Some(outcome.into());
        self
    }

    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn add_step(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Look up a step by id.
    pub fn step(&self, id: &StepId) -> Option<&Step> {
        self.steps.iter().find(|s| &s.id == id)
    }

    /// Original plan position of a step.
    pub fn position(&self, id: &StepId) -> Option<usize> {
        self.steps.iter().position(|s| &s.id == id)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Structural validation: non-empty unique ids, every dependency
    /// reference resolves to a step in this plan.
    ///
    /// Cycle detection is the resolver's job; handler-kind linting is the
    /// dispatch registry's.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for step in &self.steps {
            if step.id.is_empty() {
                return Err(ValidationError::EmptyStepId);
            }
            if !seen.insert(&step.id) {
                return Err(ValidationError::DuplicateStepId(step.id.clone()));
            }
        }
        for step in &self.steps {
            for dependency in &step.depends_on {
                if !seen.contains(dependency) {
                    return Err(ValidationError::UnknownDependency {
                        step: step.id.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_builder() {
        let step = Step::new("s1", StepKind::SEARCH, "find recent papers")
            .with_param("query", "rust scheduler")
            .with_priority(1)
            .with_dependency("s0")
            .with_timeout_secs(30);

        assert_eq!(step.id.as_str(), "s1");
        assert_eq!(step.kind.as_str(), "search");
        assert_eq!(step.priority, Priority::HIGHEST);
        assert_eq!(step.depends_on, vec![StepId::new("s0")]);
        assert_eq!(step.timeout_secs, Some(30));
    }

    #[test]
    fn test_plan_lookup() {
        let plan = Plan::new("research")
            .with_step(Step::new("a", StepKind::SEARCH, ""))
            .with_step(Step::new("b", StepKind::VERIFY, ""));

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.position(&"b".into()), Some(1));
        assert!(plan.step(&"c".into()).is_none());
    }

    #[test]
    fn test_validate_accepts_well_formed_plan() {
        let plan = Plan::new("ok")
            .with_step(Step::new("a", StepKind::SEARCH, ""))
            .with_step(Step::new("b", StepKind::VERIFY, "").with_dependency("a"));

        assert!(plan.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_id() {
        let plan = Plan::new("dup")
            .with_step(Step::new("a", StepKind::SEARCH, ""))
            .with_step(Step::new("a", StepKind::VERIFY, ""));

        assert_eq!(
            plan.validate(),
            Err(ValidationError::DuplicateStepId("a".into()))
        );
    }

    #[test]
    fn test_validate_rejects_empty_id() {
        let plan = Plan::new("empty").with_step(Step::new("", StepKind::SEARCH, ""));
        assert_eq!(plan.validate(), Err(ValidationError::EmptyStepId));
    }

    #[test]
    fn test_validate_rejects_unknown_dependency() {
        let plan = Plan::new("missing")
            .with_step(Step::new("a", StepKind::SEARCH, "").with_dependency("ghost"));

        assert_eq!(
            plan.validate(),
            Err(ValidationError::UnknownDependency {
                step: "a".into(),
                dependency: "ghost".into(),
            })
        );
    }

    #[test]
    fn test_empty_plan_is_valid() {
        assert!(Plan::new("nothing to do").validate().is_ok());
    }
}
