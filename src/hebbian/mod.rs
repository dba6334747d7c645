//! Hebbian learning loop
//!
//! Edges that fire together get stronger; edges that are passed over, or
//! left idle, get weaker until they die.

mod decay;
mod prune;
mod reinforcement;

pub use decay::{apply_time_decay, decay_periods, is_edge_dead, DecayResult};
pub use prune::{classify_edge, is_provisional_expired, prune_candidates, EdgeDisposition};
pub use reinforcement::{is_engaged, update_coactivation, CoactivationUpdateResult, HebbianAction};
