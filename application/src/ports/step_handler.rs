//! Step handler capability port and the dispatch registry.
//!
//! A [`StepHandler`] is an external collaborator that knows how to execute
//! steps of one kind (a search provider, a content fetcher, a summarizer).
//! The [`HandlerRegistry`] is the engine's dispatcher: a registration
//! table from step kind to handler, resolved once during the plan-linting
//! pass so that an unknown kind fails before any execution begins. The
//! registry performs no retries and carries no business logic.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use strata_domain::{Plan, Step, StepKind, StepOutput, ValidationError};
use thiserror::Error;

/// Error reported by a step handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The step's parameters don't fit the capability's contract
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The capability ran and failed
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// The capability cannot run at all (missing binary, no network, ...)
    #[error("capability unavailable: {0}")]
    Unavailable(String),
}

impl HandlerError {
    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::InvalidParameters(message.into())
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::ExecutionFailed(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

/// A pluggable capability that executes steps of one kind.
///
/// Handlers may be asynchronous internally (network I/O, subprocesses) but
/// resolve to a single payload or error. The engine calls `execute` from
/// within a worker slot and treats the step's parameters as opaque.
#[async_trait]
pub trait StepHandler: Send + Sync {
    async fn execute(&self, step: &Step) -> Result<StepOutput, HandlerError>;
}

/// Registration table mapping step kinds to handlers.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<StepKind, Arc<dyn StepHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a step kind. A later registration for the
    /// same kind replaces the earlier one.
    pub fn register<H: StepHandler + 'static>(
        self,
        kind: impl Into<StepKind>,
        handler: H,
    ) -> Self {
        self.register_arc(kind, Arc::new(handler))
    }

    /// Register a handler (Arc version).
    pub fn register_arc(
        mut self,
        kind: impl Into<StepKind>,
        handler: Arc<dyn StepHandler>,
    ) -> Self {
        self.handlers.insert(kind.into(), handler);
        self
    }

    /// Resolve the handler for a step kind.
    pub fn handler_for(&self, kind: &StepKind) -> Option<Arc<dyn StepHandler>> {
        self.handlers.get(kind).cloned()
    }

    pub fn registered_kinds(&self) -> Vec<&StepKind> {
        self.handlers.keys().collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Upfront lint: every step kind in the plan must have a registered
    /// handler, so a bad plan fails fast instead of deep into a run.
    pub fn lint(&self, plan: &Plan) -> Result<(), ValidationError> {
        for step in &plan.steps {
            if !self.handlers.contains_key(&step.kind) {
                return Err(ValidationError::UnknownStepKind {
                    step: step.id.clone(),
                    kind: step.kind.clone(),
                });
            }
        }
        Ok(())
    }
}
