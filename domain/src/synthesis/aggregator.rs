//! Budget-aware aggregation of settled step records.
//!
//! Walks completed records in original plan order (not completion order,
//! so output is deterministic regardless of concurrency), concatenating
//! payload content under a [`SynthesisBudget`]. When the total budget
//! would be exceeded, whole entries are dropped lowest-value first:
//! `follow_up` steps, then lower-priority steps, then later plan
//! positions. Aggregating the same record set twice yields identical
//! output.

use crate::core::error::AggregationError;
use crate::execution::record::StepRecord;
use crate::execution::status::StepStatus;
use crate::plan::entities::Plan;
use crate::plan::value_objects::{Priority, StepId};
use crate::synthesis::budget::SynthesisBudget;
use crate::util::truncate_head_tail;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Aggregated, budget-constrained combination of step payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Synthesis {
    /// Narrative execution summary
    pub summary: String,
    /// Combined payload content, in plan order
    pub content: String,
    /// Steps whose content appears in full
    pub included: Vec<StepId>,
    /// Steps whose content was truncated to the per-entry budget
    pub truncated: Vec<StepId>,
    /// Steps whose content was dropped under the total budget
    pub dropped: Vec<StepId>,
}

struct Entry {
    step_id: StepId,
    position: usize,
    priority: Priority,
    follow_up: bool,
    formatted: String,
    truncated: bool,
}

/// Aggregate settled records into a synthesis.
///
/// Best-effort: zero completed steps still yields an explanatory
/// synthesis. Only an unusable budget is an error, and the caller is
/// expected to degrade to [`raw_synthesis`] in that case.
pub fn aggregate(
    plan: &Plan,
    records: &[StepRecord],
    budget: &SynthesisBudget,
) -> Result<Synthesis, AggregationError> {
    let issues = budget.validate();
    if !issues.is_empty() {
        return Err(AggregationError::InvalidBudget(issues.join("; ")));
    }

    let mut entries = build_entries(plan, records, budget.max_entry_bytes());

    // Drop whole entries until the total fits, lowest-value first.
    let mut total: usize = entries.iter().map(|e| e.formatted.len()).sum();
    let mut dropped_ids = Vec::new();
    while total > budget.max_total_bytes() && !entries.is_empty() {
        let victim = entries
            .iter()
            .enumerate()
            .max_by_key(|(_, e)| (e.follow_up, e.priority, e.position))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let entry = entries.remove(victim);
        total -= entry.formatted.len();
        dropped_ids.push(entry.step_id);
    }
    dropped_ids.sort_by_key(|id| plan.position(id).unwrap_or(usize::MAX));

    let mut content: String = entries.iter().map(|e| e.formatted.as_str()).collect();
    if content.len() > budget.max_total_bytes() {
        content = truncate_head_tail(&content, budget.max_total_bytes());
    }

    let included = entries
        .iter()
        .filter(|e| !e.truncated)
        .map(|e| e.step_id.clone())
        .collect();
    let truncated: Vec<StepId> = entries
        .iter()
        .filter(|e| e.truncated)
        .map(|e| e.step_id.clone())
        .collect();

    let summary = narrative(records, &dropped_ids, &truncated);

    Ok(Synthesis {
        summary,
        content,
        included,
        truncated,
        dropped: dropped_ids,
    })
}

/// Budget-free fallback: plain plan-order concatenation of completed
/// payloads. Used when [`aggregate`] rejects the configured budget.
pub fn raw_synthesis(plan: &Plan, records: &[StepRecord]) -> Synthesis {
    let entries = build_entries(plan, records, usize::MAX);
    let content: String = entries.iter().map(|e| e.formatted.as_str()).collect();
    let included = entries.iter().map(|e| e.step_id.clone()).collect();
    let summary = narrative(records, &[], &[]);

    Synthesis {
        summary,
        content,
        included,
        truncated: Vec::new(),
        dropped: Vec::new(),
    }
}

fn build_entries(plan: &Plan, records: &[StepRecord], max_entry: usize) -> Vec<Entry> {
    let mut entries: Vec<Entry> = records
        .iter()
        .filter_map(|record| {
            let output = record.output.as_ref().filter(|_| record.is_completed())?;
            let position = plan.position(&record.step_id).unwrap_or(usize::MAX);
            let step = plan.step(&record.step_id);
            let original_bytes = output.content.len();
            let truncated = original_bytes > max_entry;
            let body = if truncated {
                truncate_head_tail(&output.content, max_entry)
            } else {
                output.content.clone()
            };
            let note = if truncated {
                format!(" [truncated from {original_bytes} bytes]")
            } else {
                String::new()
            };
            Some(Entry {
                step_id: record.step_id.clone(),
                position,
                priority: step.map(|s| s.priority).unwrap_or_default(),
                follow_up: step.map(|s| s.kind.is_follow_up()).unwrap_or(false),
                formatted: format!(
                    "\n---\nStep {}{}:\n{}\n",
                    record.step_id, note, body
                ),
                truncated,
            })
        })
        .collect();
    entries.sort_by_key(|e| e.position);
    entries
}

fn narrative(records: &[StepRecord], dropped: &[StepId], truncated: &[StepId]) -> String {
    let total = records.len();
    let completed = records.iter().filter(|r| r.is_completed()).count();
    let failed: Vec<&str> = records
        .iter()
        .filter(|r| r.status == StepStatus::Failed)
        .map(|r| r.step_id.as_str())
        .collect();
    let skipped: Vec<&str> = records
        .iter()
        .filter(|r| r.status == StepStatus::Skipped)
        .map(|r| r.step_id.as_str())
        .collect();

    let mut summary = format!(
        "{completed} of {total} steps completed ({} failed, {} skipped).",
        failed.len(),
        skipped.len()
    );
    if completed == 0 {
        summary.push_str(" No step produced content; there is nothing to synthesize.");
    }
    if !failed.is_empty() {
        summary.push_str(&format!(" Failed: {}.", failed.join(", ")));
    }
    if !skipped.is_empty() {
        summary.push_str(&format!(" Skipped: {}.", skipped.join(", ")));
    }
    let trimmed: HashSet<&StepId> = dropped.iter().chain(truncated.iter()).collect();
    if !trimmed.is_empty() {
        summary.push_str(&format!(
            " Output budget trimmed content from {} step(s).",
            trimmed.len()
        ));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::StepError;
    use crate::plan::entities::Step;
    use crate::plan::value_objects::{StepKind, StepOutput};
    use chrono::Utc;

    fn completed(id: &str, content: &str) -> StepRecord {
        let now = Utc::now();
        StepRecord::completed(id.into(), StepOutput::text(content), now, now)
    }

    fn failed(id: &str) -> StepRecord {
        let now = Utc::now();
        StepRecord::failed(id.into(), &StepError::Handler("boom".into()), now, now)
    }

    fn three_step_plan() -> Plan {
        Plan::new("aggregate")
            .with_step(Step::new("a", StepKind::SEARCH, ""))
            .with_step(Step::new("b", StepKind::SEARCH, ""))
            .with_step(Step::new("c", StepKind::SEARCH, ""))
    }

    #[test]
    fn test_all_within_budget() {
        let plan = three_step_plan();
        let records = vec![
            completed("a", "alpha"),
            completed("b", "bravo"),
            completed("c", "charlie"),
        ];

        let synthesis = aggregate(&plan, &records, &SynthesisBudget::default()).unwrap();
        assert_eq!(synthesis.included.len(), 3);
        assert!(synthesis.dropped.is_empty());
        assert!(synthesis.content.contains("alpha"));
        assert!(synthesis.content.contains("charlie"));
        assert!(synthesis.summary.starts_with("3 of 3 steps completed"));
    }

    #[test]
    fn test_total_budget_drops_third_payload() {
        // 400 + 400 + 400 under a 900-byte budget: first two stay, third drops.
        let plan = three_step_plan();
        let records = vec![
            completed("a", &"a".repeat(400)),
            completed("b", &"b".repeat(400)),
            completed("c", &"c".repeat(400)),
        ];
        let budget = SynthesisBudget::new(500, 900);

        let synthesis = aggregate(&plan, &records, &budget).unwrap();
        assert_eq!(synthesis.dropped, vec![StepId::new("c")]);
        assert!(synthesis.content.contains(&"a".repeat(400)));
        assert!(synthesis.content.contains(&"b".repeat(400)));
        assert!(!synthesis.content.contains(&"c".repeat(400)));
        assert!(synthesis.content.len() <= 900);
        assert!(synthesis.summary.contains("trimmed content from 1 step(s)"));
    }

    #[test]
    fn test_follow_up_content_drops_first() {
        let plan = Plan::new("follow-up")
            .with_step(Step::new("extra", StepKind::FOLLOW_UP, ""))
            .with_step(Step::new("main", StepKind::SEARCH, ""));
        let records = vec![
            completed("extra", &"x".repeat(400)),
            completed("main", &"m".repeat(400)),
        ];
        let budget = SynthesisBudget::new(500, 500);

        let synthesis = aggregate(&plan, &records, &budget).unwrap();
        // The follow_up step drops even though it comes first in plan order.
        assert_eq!(synthesis.dropped, vec![StepId::new("extra")]);
        assert!(synthesis.content.contains(&"m".repeat(400)));
    }

    #[test]
    fn test_lower_priority_drops_before_higher() {
        let plan = Plan::new("priorities")
            .with_step(Step::new("low", StepKind::SEARCH, "").with_priority(5))
            .with_step(Step::new("high", StepKind::SEARCH, "").with_priority(1));
        let records = vec![
            completed("low", &"l".repeat(400)),
            completed("high", &"h".repeat(400)),
        ];
        let budget = SynthesisBudget::new(500, 500);

        let synthesis = aggregate(&plan, &records, &budget).unwrap();
        assert_eq!(synthesis.dropped, vec![StepId::new("low")]);
    }

    #[test]
    fn test_oversized_entry_is_truncated_and_recorded() {
        let plan = three_step_plan();
        let records = vec![completed("a", &"z".repeat(2_000))];
        let budget = SynthesisBudget::new(500, 5_000);

        let synthesis = aggregate(&plan, &records, &budget).unwrap();
        assert_eq!(synthesis.truncated, vec![StepId::new("a")]);
        assert!(synthesis.content.contains("[truncated from 2000 bytes]"));
    }

    #[test]
    fn test_zero_completions_still_synthesizes() {
        let plan = three_step_plan();
        let records = vec![
            failed("a"),
            StepRecord::skipped("b".into(), "unmet dependency: a"),
        ];

        let synthesis = aggregate(&plan, &records, &SynthesisBudget::default()).unwrap();
        assert!(synthesis.content.is_empty());
        assert!(synthesis.summary.contains("nothing to synthesize"));
        assert!(synthesis.summary.contains("Failed: a."));
        assert!(synthesis.summary.contains("Skipped: b."));
    }

    #[test]
    fn test_plan_order_regardless_of_record_order() {
        let plan = three_step_plan();
        let forward = vec![completed("a", "alpha"), completed("c", "charlie")];
        let reversed = vec![completed("c", "charlie"), completed("a", "alpha")];
        let budget = SynthesisBudget::default();

        let a = aggregate(&plan, &forward, &budget).unwrap();
        let b = aggregate(&plan, &reversed, &budget).unwrap();
        assert_eq!(a.content, b.content);
        assert!(a.content.find("alpha").unwrap() < a.content.find("charlie").unwrap());
    }

    #[test]
    fn test_idempotent_re_aggregation() {
        let plan = three_step_plan();
        let records = vec![
            completed("a", &"a".repeat(300)),
            completed("b", &"b".repeat(300)),
            completed("c", &"c".repeat(300)),
        ];
        let budget = SynthesisBudget::new(250, 600);

        let first = aggregate(&plan, &records, &budget).unwrap();
        let second = aggregate(&plan, &records, &budget).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_budget_is_an_error() {
        let plan = three_step_plan();
        let records = vec![completed("a", "alpha")];
        let budget = SynthesisBudget::new(1_000, 10);

        assert!(matches!(
            aggregate(&plan, &records, &budget),
            Err(AggregationError::InvalidBudget(_))
        ));
    }

    #[test]
    fn test_raw_synthesis_keeps_everything() {
        let plan = three_step_plan();
        let records = vec![
            completed("a", &"a".repeat(10_000)),
            completed("b", &"b".repeat(10_000)),
        ];

        let synthesis = raw_synthesis(&plan, &records);
        assert_eq!(synthesis.included.len(), 2);
        assert!(synthesis.dropped.is_empty());
        assert!(synthesis.content.len() > 20_000);
    }
}
