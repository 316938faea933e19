//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application-layer
//! [`EngineParams`].

use serde::{Deserialize, Serialize};
use std::time::Duration;
use strata_application::{EngineParams, ExecutionMode};
use strata_domain::SynthesisBudget;

/// Top-level configuration file structure.
///
/// ```toml
/// [engine]
/// mode = "concurrent"
/// concurrency_limit = 4
/// step_timeout_secs = 60
///
/// [synthesis]
/// max_entry_bytes = 16000
/// max_total_bytes = 48000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub engine: EngineSection,
    pub synthesis: SynthesisSection,
}

/// `[engine]` section: scheduler policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    pub mode: ExecutionMode,
    pub concurrency_limit: usize,
    pub step_timeout_secs: u64,
}

impl Default for EngineSection {
    fn default() -> Self {
        let params = EngineParams::default();
        Self {
            mode: params.mode,
            concurrency_limit: params.concurrency_limit,
            step_timeout_secs: params.step_timeout.as_secs(),
        }
    }
}

/// `[synthesis]` section: output budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisSection {
    pub max_entry_bytes: usize,
    pub max_total_bytes: usize,
}

impl Default for SynthesisSection {
    fn default() -> Self {
        let budget = SynthesisBudget::default();
        Self {
            max_entry_bytes: budget.max_entry_bytes(),
            max_total_bytes: budget.max_total_bytes(),
        }
    }
}

impl FileConfig {
    /// Convert the file representation into engine parameters.
    pub fn engine_params(&self) -> EngineParams {
        EngineParams::default()
            .with_mode(self.engine.mode)
            .with_concurrency_limit(self.engine.concurrency_limit)
            .with_step_timeout(Duration::from_secs(self.engine.step_timeout_secs))
            .with_budget(SynthesisBudget::new(
                self.synthesis.max_entry_bytes,
                self.synthesis.max_total_bytes,
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_engine_params() {
        let params = FileConfig::default().engine_params();
        let reference = EngineParams::default();
        assert_eq!(params.mode, reference.mode);
        assert_eq!(params.concurrency_limit, reference.concurrency_limit);
        assert_eq!(params.step_timeout, reference.step_timeout);
        assert_eq!(params.budget, reference.budget);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: FileConfig = toml::from_str(
            r#"
            [engine]
            mode = "sequential"
            step_timeout_secs = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.engine.mode, ExecutionMode::Sequential);
        assert_eq!(config.engine.step_timeout_secs, 10);
        // Unspecified fields keep their defaults
        assert_eq!(config.engine.concurrency_limit, 4);
        assert_eq!(config.synthesis, SynthesisSection::default());
    }

    #[test]
    fn test_engine_params_conversion() {
        let config: FileConfig = toml::from_str(
            r#"
            [engine]
            concurrency_limit = 16

            [synthesis]
            max_entry_bytes = 100
            max_total_bytes = 500
            "#,
        )
        .unwrap();

        let params = config.engine_params();
        assert_eq!(params.concurrency_limit, 16);
        assert_eq!(params.budget, SynthesisBudget::new(100, 500));
    }
}
