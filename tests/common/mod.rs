//! Shared fixtures for the scenario tests
//!
//! Fixed instants, session builders and edge constructors that the
//! integration tests reuse. Each test binary only uses some of them.

#![allow(dead_code)]

pub mod fixtures;

pub use fixtures::{
    at_minutes, consolidation_candidate, dormant_node, edge_with_weight, engine_at, session, t0, user_edge,
};
