//! Schedule subdomain: dependency resolution into execution layers.

pub mod resolver;
