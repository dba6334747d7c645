//! Provisional edge lifecycle
//!
//! A provisional edge is promoted once it has been activated often enough,
//! or expires if its time-to-live runs out first.

use crate::clock::saturating_add;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionalEdgeState {
    pub created_at: DateTime<Utc>,
    pub activation_count: u32,
    pub expires_at: DateTime<Utc>,
}

impl ProvisionalEdgeState {
    pub fn new(created_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            created_at,
            activation_count: 0,
            expires_at: saturating_add(created_at, ttl),
        }
    }

    /// Count one more activation.
    pub fn record_activation(self) -> Self {
        Self {
            activation_count: self.activation_count.saturating_add(1),
            ..self
        }
    }

    pub fn should_promote(&self, promotion_threshold: u32) -> bool {
        self.activation_count >= promotion_threshold
    }

    /// Expired: past `expires_at` without having reached promotion.
    pub fn is_expired(&self, now: DateTime<Utc>, promotion_threshold: u32) -> bool {
        now > self.expires_at && !self.should_promote(promotion_threshold)
    }
}
