//! Configuration file loading for strata
//!
//! This module handles file I/O and merging of configuration from multiple
//! sources. The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./strata.toml` or `./.strata.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/strata/config.toml`
//! 4. Fallback: `~/.config/strata/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{EngineSection, FileConfig, SynthesisSection};
pub use loader::ConfigLoader;
