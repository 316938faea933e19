//! Built-in step handlers.
//!
//! These implement the application layer's [`StepHandler`] port for common
//! capabilities. Domain behavior lives entirely here; the engine only sees
//! a payload or an error.
//!
//! - [`command::CommandHandler`] - run a shell command (always available)
//! - [`web::WebFetchHandler`] - fetch a URL and extract its text
//!   (behind the `web-handlers` feature)
//!
//! [`StepHandler`]: strata_application::StepHandler

pub mod command;
#[cfg(feature = "web-handlers")]
pub mod web;
