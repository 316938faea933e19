//! Synthesis budget: bounds on aggregated output size.
//!
//! [`SynthesisBudget`] limits how much settled-step content the
//! synthesizer emits, preventing unbounded growth when plans fan out into
//! many content-producing steps.
//!
//! Two knobs:
//! - `max_entry_bytes`: maximum bytes for a single step's contribution
//!   (head+tail truncated beyond that)
//! - `max_total_bytes`: maximum bytes for the combined synthesis content
//!   (whole entries are dropped, lowest-value first, beyond that)

use serde::{Deserialize, Serialize};

/// Budget controlling synthesized output size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisBudget {
    max_entry_bytes: usize,
    max_total_bytes: usize,
}

impl SynthesisBudget {
    /// Create a budget with explicit values.
    pub fn new(max_entry_bytes: usize, max_total_bytes: usize) -> Self {
        Self {
            max_entry_bytes,
            max_total_bytes,
        }
    }

    /// Strict preset: tight limits for cost-sensitive consumers.
    pub fn strict() -> Self {
        Self {
            max_entry_bytes: 4_000,
            max_total_bytes: 12_000,
        }
    }

    /// Generous preset: larger limits for report-style output.
    pub fn generous() -> Self {
        Self {
            max_entry_bytes: 40_000,
            max_total_bytes: 120_000,
        }
    }

    /// Unlimited preset: no truncation.
    pub fn unlimited() -> Self {
        Self {
            max_entry_bytes: usize::MAX,
            max_total_bytes: usize::MAX,
        }
    }

    pub fn max_entry_bytes(&self) -> usize {
        self.max_entry_bytes
    }

    pub fn max_total_bytes(&self) -> usize {
        self.max_total_bytes
    }

    // ==================== Builder Methods ====================

    pub fn with_max_entry_bytes(mut self, bytes: usize) -> Self {
        self.max_entry_bytes = bytes;
        self
    }

    pub fn with_max_total_bytes(mut self, bytes: usize) -> Self {
        self.max_total_bytes = bytes;
        self
    }

    // ==================== Validation ====================

    /// Validate this budget, returning a list of issues.
    ///
    /// Rules:
    /// - `max_total_bytes >= max_entry_bytes`
    /// - both limits non-zero
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.max_total_bytes < self.max_entry_bytes {
            issues.push(format!(
                "synthesis_budget: max_total_bytes ({}) must be >= max_entry_bytes ({})",
                self.max_total_bytes, self.max_entry_bytes
            ));
        }
        if self.max_entry_bytes == 0 || self.max_total_bytes == 0 {
            issues.push("synthesis_budget: limits must be non-zero".to_string());
        }
        issues
    }
}

impl Default for SynthesisBudget {
    /// Default: 16KB per entry, 48KB total.
    fn default() -> Self {
        Self {
            max_entry_bytes: 16_000,
            max_total_bytes: 48_000,
        }
    }
}
