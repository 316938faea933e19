//! Infrastructure layer for strata
//!
//! This crate contains adapters around the application layer's ports:
//! plan-document loading, configuration file loading, and the built-in
//! step handlers.

pub mod config;
pub mod handlers;
pub mod plan_file;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig};
pub use handlers::command::CommandHandler;
#[cfg(feature = "web-handlers")]
pub use handlers::web::WebFetchHandler;
pub use plan_file::{PlanFileError, load_plan, parse_plan_json, parse_plan_toml};
