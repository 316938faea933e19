//! Dependency resolver: plan -> ordered execution layers.
//!
//! Layer 0 holds the steps with no dependencies; layer *k* holds the steps
//! whose dependencies are all satisfied by layers 0..k-1. Steps within a
//! layer have no ordering constraint among themselves; their order in the
//! layer is a scheduling hint only (ascending priority, then original plan
//! order, stable).
//!
//! Any cycle is reported with its full path for diagnostics.

use crate::core::error::ValidationError;
use crate::plan::entities::Plan;
use crate::plan::value_objects::StepId;
use std::collections::{HashMap, HashSet};

/// A valid layering of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    layers: Vec<Vec<StepId>>,
}

impl Schedule {
    /// The execution layers, outermost first.
    pub fn layers(&self) -> &[Vec<StepId>] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Total number of scheduled steps.
    pub fn step_count(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    /// Index of the layer a step was placed in.
    pub fn layer_of(&self, id: &StepId) -> Option<usize> {
        self.layers
            .iter()
            .position(|layer| layer.iter().any(|s| s == id))
    }
}

/// Resolve a plan into execution layers.
///
/// Runs structural validation first, then Kahn-style layering. A graph
/// that cannot be fully layered contains a cycle; the cycle path is
/// recovered via DFS coloring and returned in the error.
pub fn resolve(plan: &Plan) -> Result<Schedule, ValidationError> {
    plan.validate()?;

    let n = plan.steps.len();
    let index_of: HashMap<&StepId, usize> = plan
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| (&step.id, i))
        .collect();

    let mut in_degree = vec![0usize; n];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, step) in plan.steps.iter().enumerate() {
        let mut seen = HashSet::new();
        for dependency in &step.depends_on {
            if !seen.insert(dependency) {
                continue;
            }
            let d = index_of[dependency];
            in_degree[i] += 1;
            dependents[d].push(i);
        }
    }

    let mut ready: Vec<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut layers = Vec::new();
    let mut placed = 0usize;

    while !ready.is_empty() {
        // Stable sort: ascending priority, plan order preserved within a tier.
        let mut layer = ready.clone();
        layer.sort_by_key(|&i| plan.steps[i].priority);
        placed += layer.len();

        let mut next = Vec::new();
        for &i in &ready {
            for &dependent in &dependents[i] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    next.push(dependent);
                }
            }
        }
        next.sort_unstable();

        layers.push(
            layer
                .into_iter()
                .map(|i| plan.steps[i].id.clone())
                .collect(),
        );
        ready = next;
    }

    if placed != n {
        return Err(ValidationError::DependencyCycle {
            cycle: find_cycle(plan, &index_of),
        });
    }

    Ok(Schedule { layers })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Visiting,
    Visited,
}

/// Recover one cycle path for the error message. Only called on graphs
/// already known to be cyclic.
fn find_cycle(plan: &Plan, index_of: &HashMap<&StepId, usize>) -> Vec<StepId> {
    let mut states: HashMap<usize, VisitState> = HashMap::new();
    let mut stack = Vec::new();

    for start in 0..plan.steps.len() {
        if states.contains_key(&start) {
            continue;
        }
        if let Some(cycle) = visit(plan, index_of, start, &mut states, &mut stack) {
            return cycle;
        }
    }

    Vec::new()
}

fn visit(
    plan: &Plan,
    index_of: &HashMap<&StepId, usize>,
    node: usize,
    states: &mut HashMap<usize, VisitState>,
    stack: &mut Vec<usize>,
) -> Option<Vec<StepId>> {
    states.insert(node, VisitState::Visiting);
    stack.push(node);

    for dependency in &plan.steps[node].depends_on {
        let d = index_of[dependency];
        match states.get(&d) {
            Some(VisitState::Visiting) => {
                let from = stack.iter().position(|&entry| entry == d).unwrap_or(0);
                let mut cycle: Vec<StepId> = stack[from..]
                    .iter()
                    .map(|&i| plan.steps[i].id.clone())
                    .collect();
                cycle.push(plan.steps[d].id.clone());
                return Some(cycle);
            }
            Some(VisitState::Visited) => {}
            None => {
                if let Some(cycle) = visit(plan, index_of, d, states, stack) {
                    return Some(cycle);
                }
            }
        }
    }

    stack.pop();
    states.insert(node, VisitState::Visited);
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::entities::Step;
    use crate::plan::value_objects::StepKind;

    fn step(id: &str) -> Step {
        Step::new(id, StepKind::SEARCH, "")
    }

    fn ids(layer: &[StepId]) -> Vec<&str> {
        layer.iter().map(StepId::as_str).collect()
    }

    #[test]
    fn test_independent_steps_form_one_layer() {
        let plan = Plan::new("flat")
            .with_step(step("a"))
            .with_step(step("b"))
            .with_step(step("c"));

        let schedule = resolve(&plan).unwrap();
        assert_eq!(schedule.layer_count(), 1);
        assert_eq!(ids(&schedule.layers()[0]), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_diamond_layers() {
        let plan = Plan::new("diamond")
            .with_step(step("a"))
            .with_step(step("b").with_dependency("a"))
            .with_step(step("c").with_dependency("a"))
            .with_step(step("d").with_dependency("b").with_dependency("c"));

        let schedule = resolve(&plan).unwrap();
        assert_eq!(schedule.layer_count(), 3);
        assert_eq!(ids(&schedule.layers()[0]), vec!["a"]);
        assert_eq!(ids(&schedule.layers()[1]), vec!["b", "c"]);
        assert_eq!(ids(&schedule.layers()[2]), vec!["d"]);
    }

    #[test]
    fn test_fan_in_example() {
        // [A(no deps), B(no deps), C(depends_on=[A,B])] -> [[A,B],[C]]
        let plan = Plan::new("fan-in")
            .with_step(step("a"))
            .with_step(step("b"))
            .with_step(step("c").with_dependency("a").with_dependency("b"));

        let schedule = resolve(&plan).unwrap();
        assert_eq!(schedule.layer_count(), 2);
        assert_eq!(ids(&schedule.layers()[0]), vec!["a", "b"]);
        assert_eq!(ids(&schedule.layers()[1]), vec!["c"]);
    }

    #[test]
    fn test_every_step_appears_exactly_once() {
        let plan = Plan::new("coverage")
            .with_step(step("a"))
            .with_step(step("b").with_dependency("a"))
            .with_step(step("c"))
            .with_step(step("d").with_dependency("b").with_dependency("c"));

        let schedule = resolve(&plan).unwrap();
        assert_eq!(schedule.step_count(), 4);
        for s in &plan.steps {
            let layer = schedule.layer_of(&s.id).unwrap();
            for dependency in &s.depends_on {
                assert!(schedule.layer_of(dependency).unwrap() < layer);
            }
        }
    }

    #[test]
    fn test_priority_orders_within_layer_only() {
        let plan = Plan::new("priorities")
            .with_step(step("slow").with_priority(5))
            .with_step(step("urgent").with_priority(1))
            .with_step(step("mid"));

        let schedule = resolve(&plan).unwrap();
        assert_eq!(ids(&schedule.layers()[0]), vec!["urgent", "mid", "slow"]);
    }

    #[test]
    fn test_priority_tie_break_is_stable() {
        let plan = Plan::new("stable")
            .with_step(step("first"))
            .with_step(step("second"))
            .with_step(step("third"));

        let schedule = resolve(&plan).unwrap();
        assert_eq!(
            ids(&schedule.layers()[0]),
            vec!["first", "second", "third"]
        );
    }

    #[test]
    fn test_two_node_cycle_reports_path() {
        let plan = Plan::new("cycle")
            .with_step(step("a").with_dependency("b"))
            .with_step(step("b").with_dependency("a"));

        let error = resolve(&plan).unwrap_err();
        match error {
            ValidationError::DependencyCycle { cycle } => {
                assert_eq!(cycle.first(), cycle.last());
                assert_eq!(cycle.len(), 3);
            }
            other => panic!("expected cycle error, got {other:?}"),
        }
    }

    #[test]
    fn test_self_cycle() {
        let plan = Plan::new("self").with_step(step("a").with_dependency("a"));

        let error = resolve(&plan).unwrap_err();
        assert_eq!(
            error.to_string(),
            "dependency cycle detected: a -> a"
        );
    }

    #[test]
    fn test_cycle_in_subgraph() {
        let plan = Plan::new("subgraph")
            .with_step(step("ok"))
            .with_step(step("b").with_dependency("d"))
            .with_step(step("c").with_dependency("b"))
            .with_step(step("d").with_dependency("c"));

        let error = resolve(&plan).unwrap_err();
        match error {
            ValidationError::DependencyCycle { cycle } => {
                assert!(cycle.len() >= 4);
                assert_eq!(cycle.first(), cycle.last());
            }
            other => panic!("expected cycle error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_dependency_rejected_before_layering() {
        let plan = Plan::new("missing").with_step(step("a").with_dependency("ghost"));

        assert!(matches!(
            resolve(&plan),
            Err(ValidationError::UnknownDependency { .. })
        ));
    }

    #[test]
    fn test_duplicate_dependencies_counted_once() {
        let plan = Plan::new("dup-edge")
            .with_step(step("a"))
            .with_step(step("b").with_dependency("a").with_dependency("a"));

        let schedule = resolve(&plan).unwrap();
        assert_eq!(schedule.layer_count(), 2);
    }

    #[test]
    fn test_empty_plan() {
        let schedule = resolve(&Plan::new("empty")).unwrap();
        assert_eq!(schedule.layer_count(), 0);
        assert_eq!(schedule.step_count(), 0);
    }
}
