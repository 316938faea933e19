//! Synthesis subdomain: budget-constrained aggregation of step payloads.

pub mod aggregator;
pub mod budget;
