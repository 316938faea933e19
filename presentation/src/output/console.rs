//! Console output formatter for execution results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use strata_domain::{ExecutionResult, StepRecord, StepStatus};

/// Formats execution results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete execution result
    pub fn format(result: &ExecutionResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Plan Execution Result"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n\n",
            "Objective:".cyan().bold(),
            result.objective
        ));

        output.push_str(&Self::section_header("Steps"));
        for record in &result.records {
            output.push_str(&Self::format_record(record));
        }

        output.push_str(&Self::section_header("Synthesis"));
        output.push_str(&format!("\n{}\n", result.synthesis.summary));
        if !result.synthesis.content.is_empty() {
            output.push_str(&result.synthesis.content);
            output.push('\n');
        }

        let metrics = &result.metrics;
        output.push_str(&format!(
            "\n{} {} completed, {} failed, {} skipped of {} in {:.2}s\n",
            "Totals:".cyan().bold(),
            metrics.completed,
            metrics.failed,
            metrics.skipped,
            metrics.total,
            metrics.wall_clock.as_secs_f64()
        ));

        let verdict = if result.success() {
            "SUCCESS".green().bold()
        } else if result.partial_success {
            "PARTIAL SUCCESS".yellow().bold()
        } else {
            "FAILED".red().bold()
        };
        output.push_str(&format!("{} {}\n", "Outcome:".cyan().bold(), verdict));

        output
    }

    /// Format as JSON
    pub fn format_json(result: &ExecutionResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format synthesis only (concise output)
    pub fn format_synthesis_only(result: &ExecutionResult) -> String {
        let mut output = String::new();
        output.push_str(&result.synthesis.summary);
        output.push('\n');
        if !result.synthesis.content.is_empty() {
            output.push_str(&result.synthesis.content);
            output.push('\n');
        }
        output
    }

    fn format_record(record: &StepRecord) -> String {
        let glyph = match record.status {
            StepStatus::Completed => "[ok]".green(),
            StepStatus::Failed => "[failed]".red(),
            StepStatus::Skipped => "[skipped]".yellow(),
            StepStatus::Pending | StepStatus::Running => "[?]".normal(),
        };

        let mut line = format!("\n{:>10} {}", glyph, record.step_id.to_string().bold());

        if let Some(duration) = record.duration() {
            line.push_str(&format!(" ({:.2}s)", duration.as_secs_f64()));
        }
        if let Some(error) = &record.error {
            line.push_str(&format!("\n           {}", error.red()));
        }
        if let Some(reason) = &record.skip_reason {
            line.push_str(&format!("\n           {}", reason.dimmed()));
        }
        line.push('\n');
        line
    }

    fn header(title: &str) -> String {
        format!(
            "\n{}\n{}\n",
            format!("=== {} ===", title).cyan().bold(),
            "=".repeat(title.len() + 8).dimmed()
        )
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n", format!("--- {} ---", title).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, result: &ExecutionResult) -> String {
        Self::format(result)
    }

    fn format_json(&self, result: &ExecutionResult) -> String {
        Self::format_json(result)
    }

    fn format_synthesis_only(&self, result: &ExecutionResult) -> String {
        Self::format_synthesis_only(result)
    }
}
