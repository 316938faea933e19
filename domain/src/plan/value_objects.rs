//! Plan value objects - immutable types used throughout the engine.
//!
//! # Identifiers
//! - [`StepId`] - Unique identifier for a step within a plan
//! - [`StepKind`] - The capability a step is routed to
//!
//! # Scheduling
//! - [`Priority`] - Intra-layer tie-breaker, 1 (highest) to 5 (lowest)
//!
//! # Execution Data
//! - [`StepOutput`] - Payload produced by a step handler

use serde::{Deserialize, Serialize};

/// Unique identifier for a step within a plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepId(String);

impl StepId {
    /// Creates a StepId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is empty (rejected by plan validation).
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl<T: Into<String>> From<T> for StepId {
    fn from(s: T) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of work a step performs.
///
/// Kinds are an open set: the engine routes a step to whatever handler is
/// registered for its kind, so new capabilities are added by registration
/// rather than by extending an enum. The constants below are the
/// well-known kinds; `follow_up` is the only one the engine itself
/// interprets (the synthesizer drops follow-up content first under budget
/// pressure).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepKind(String);

impl StepKind {
    pub const SEARCH: &'static str = "search";
    pub const READ_URL: &'static str = "read_url";
    pub const VERIFY: &'static str = "verify";
    pub const SYNTHESIZE: &'static str = "synthesize";
    pub const FOLLOW_UP: &'static str = "follow_up";

    /// Creates a StepKind from a string.
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    /// Returns the kind as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the well-known `follow_up` kind.
    pub fn is_follow_up(&self) -> bool {
        self.0 == Self::FOLLOW_UP
    }
}

impl<T: Into<String>> From<T> for StepKind {
    fn from(s: T) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Step priority: 1 is highest, 5 is lowest.
///
/// Priority is only a tie-breaker among ready steps within a layer when
/// concurrency is bounded; it never overrides dependency order and never
/// moves a step across a layer boundary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const HIGHEST: Priority = Priority(1);
    pub const LOWEST: Priority = Priority(5);

    /// Creates a priority, clamping the value into the 1..=5 range.
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 5))
    }

    /// Returns the numeric priority value.
    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self(3)
    }
}

impl From<u8> for Priority {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payload produced by a step handler.
///
/// `content` feeds the synthesizer; `data` is an optional structured
/// payload the engine passes through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepOutput {
    /// Human-readable result content.
    pub content: String,
    /// Optional structured payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl StepOutput {
    /// Creates a text-only output.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            data: None,
        }
    }

    /// Attaches a structured payload.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Whether the output carries neither content nor data.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.data.is_none()
    }
}
