//! Output formatter trait

use strata_domain::ExecutionResult;

/// Trait for formatting execution results
pub trait OutputFormatter {
    /// Format the complete execution result
    fn format(&self, result: &ExecutionResult) -> String;

    /// Format as JSON
    fn format_json(&self, result: &ExecutionResult) -> String;

    /// Format synthesis only (concise output)
    fn format_synthesis_only(&self, result: &ExecutionResult) -> String;
}
