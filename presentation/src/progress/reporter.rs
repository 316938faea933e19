//! Progress reporting for plan execution

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use strata_application::ProgressNotifier;
use strata_domain::{ExecutionMetrics, StepId, StepStatus};

/// Reports progress during plan execution with a console progress bar
pub struct ProgressReporter {
    multi: MultiProgress,
    bar: Mutex<Option<ProgressBar>>,
    verbose: bool,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bar: Mutex::new(None),
            verbose: false,
        }
    }

    /// Create with verbose output (prints every transition)
    pub fn verbose() -> Self {
        Self {
            multi: MultiProgress::new(),
            bar: Mutex::new(None),
            verbose: true,
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-")
    }

    fn status_line(step_id: &StepId, status: StepStatus) -> String {
        match status {
            StepStatus::Running => format!("{} {}", "->".blue(), step_id),
            StepStatus::Completed => format!("{} {}", "ok".green().bold(), step_id),
            StepStatus::Failed => format!("{} {}", "failed".red().bold(), step_id),
            StepStatus::Skipped => format!("{} {}", "skipped".yellow(), step_id),
            StepStatus::Pending => format!("   {}", step_id),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_plan_start(&self, total_steps: usize, layer_count: usize) {
        let pb = self.multi.add(ProgressBar::new(total_steps as u64));
        pb.set_style(Self::bar_style());
        pb.set_prefix("Executing");
        pb.set_message(format!("{layer_count} layers"));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        *self.bar.lock().unwrap() = Some(pb);
    }

    fn on_layer_start(&self, layer_index: usize, step_count: usize) {
        if let Some(pb) = self.bar.lock().unwrap().as_ref() {
            pb.set_message(format!("layer {} ({} steps)", layer_index + 1, step_count));
        }
    }

    fn on_step_transition(&self, step_id: &StepId, status: StepStatus, _percent: f64) {
        let guard = self.bar.lock().unwrap();
        let line = Self::status_line(step_id, status);
        if let Some(pb) = guard.as_ref() {
            if status.is_terminal() {
                pb.inc(1);
            }
            if self.verbose || status != StepStatus::Running {
                pb.println(line);
            }
        } else if self.verbose {
            println!("{line}");
        }
    }

    fn on_plan_complete(&self, metrics: &ExecutionMetrics) {
        if let Some(pb) = self.bar.lock().unwrap().take() {
            pb.finish_and_clear();
        }
        let summary = format!(
            "{} completed, {} failed, {} skipped in {:.2}s",
            metrics.completed,
            metrics.failed,
            metrics.skipped,
            metrics.wall_clock.as_secs_f64()
        );
        if metrics.failed == 0 && metrics.skipped == 0 {
            println!("{} {}", "done".green().bold(), summary);
        } else {
            println!("{} {}", "done".yellow().bold(), summary);
        }
    }
}
