//! Single-owner status tracking.
//!
//! [`StatusTracker`] is the only component that mutates step status during
//! a run. Worker tasks funnel every transition through
//! [`record_transition`](StatusTracker::record_transition), which enforces
//! the state machine and forwards the updated completion percentage to the
//! progress notifier. This keeps status mutation race-free without any
//! locking in step logic itself.

use crate::ports::progress::ProgressNotifier;
use std::collections::HashMap;
use std::sync::Mutex;
use strata_domain::{Plan, StatusBoard, StepId, StepStatus};
use tracing::{debug, warn};

/// Synchronized owner of the run's status board.
pub struct StatusTracker<'a> {
    board: Mutex<StatusBoard>,
    notifier: &'a dyn ProgressNotifier,
}

impl<'a> StatusTracker<'a> {
    pub fn new(plan: &Plan, notifier: &'a dyn ProgressNotifier) -> Self {
        Self {
            board: Mutex::new(StatusBoard::new(plan)),
            notifier,
        }
    }

    /// Apply a transition and notify the observer.
    ///
    /// Illegal transitions are logged and dropped rather than propagated:
    /// the board's terminal states are never left, so a late transition
    /// (e.g. a worker settling after cancellation skipped its step) is
    /// simply ignored.
    pub fn record_transition(&self, step_id: &StepId, status: StepStatus) {
        let percent = {
            let mut board = self.board.lock().unwrap();
            if let Err(error) = board.transition(step_id, status) {
                warn!(%error, "ignored status transition");
                return;
            }
            board.percent_complete()
        };

        debug!(step = %step_id, status = %status, percent, "step transition");
        self.notifier.on_step_transition(step_id, status, percent);
    }

    pub fn status(&self, step_id: &StepId) -> Option<StepStatus> {
        self.board.lock().unwrap().status(step_id)
    }

    /// Read-only snapshot of all step statuses.
    pub fn snapshot(&self) -> HashMap<StepId, StepStatus> {
        self.board.lock().unwrap().snapshot()
    }

    pub fn percent_complete(&self) -> f64 {
        self.board.lock().unwrap().percent_complete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use std::sync::Mutex as StdMutex;
    use strata_domain::{Step, StepKind};

    struct RecordingNotifier {
        events: StdMutex<Vec<(StepId, StepStatus, f64)>>,
    }

    impl RecordingNotifier {
        fn new() -> Self {
            Self {
                events: StdMutex::new(Vec::new()),
            }
        }
    }

    impl ProgressNotifier for RecordingNotifier {
        fn on_step_transition(&self, step_id: &StepId, status: StepStatus, percent: f64) {
            self.events
                .lock()
                .unwrap()
                .push((step_id.clone(), status, percent));
        }
    }

    fn plan() -> Plan {
        Plan::new("tracked")
            .with_step(Step::new("a", StepKind::SEARCH, ""))
            .with_step(Step::new("b", StepKind::SEARCH, ""))
    }

    #[test]
    fn test_transitions_reach_notifier_with_percent() {
        let plan = plan();
        let notifier = RecordingNotifier::new();
        let tracker = StatusTracker::new(&plan, &notifier);

        tracker.record_transition(&"a".into(), StepStatus::Running);
        tracker.record_transition(&"a".into(), StepStatus::Completed);

        let events = notifier.events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].1, StepStatus::Running);
        assert_eq!(events[0].2, 0.0);
        assert_eq!(events[1].1, StepStatus::Completed);
        assert_eq!(events[1].2, 50.0);
    }

    #[test]
    fn test_illegal_transition_is_dropped_silently() {
        let plan = plan();
        let notifier = RecordingNotifier::new();
        let tracker = StatusTracker::new(&plan, &notifier);

        tracker.record_transition(&"a".into(), StepStatus::Skipped);
        tracker.record_transition(&"a".into(), StepStatus::Running);

        assert_eq!(tracker.status(&"a".into()), Some(StepStatus::Skipped));
        assert_eq!(notifier.events.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_snapshot_is_decoupled() {
        let plan = plan();
        let tracker = StatusTracker::new(&plan, &NoProgress);

        let before = tracker.snapshot();
        tracker.record_transition(&"a".into(), StepStatus::Running);

        assert_eq!(before[&"a".into()], StepStatus::Pending);
        assert_eq!(tracker.snapshot()[&"a".into()], StepStatus::Running);
    }
}
