//! Edges a user creates explicitly
//!
//! Only allow-listed types (`EdgeType::is_user_creatable`) may be created
//! this way; the caller checks that before asking for a weight.

use super::PolicyOutcome;
use crate::config::UserConfig;
use crate::graph::CreationSource;

/// The requested strength, or the default when none was given.
pub fn resolve_user_strength(requested: Option<f64>, config: &UserConfig) -> f64 {
    requested.unwrap_or(config.default_strength)
}

pub fn calculate_user_edge(requested: Option<f64>, config: &UserConfig) -> PolicyOutcome {
    let strength = resolve_user_strength(requested, config);
    let weight = strength.clamp(config.min_strength, config.max_strength);
    if weight != strength {
        tracing::warn!(requested = strength, weight, "user strength outside configured range, clamped");
    }
    PolicyOutcome::confirmed(weight, 1.0, CreationSource::User)
}
