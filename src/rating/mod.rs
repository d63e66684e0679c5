//! Skill and interaction ratings
//!
//! This module provides skill validation, the team interaction score, the
//! match recorder that feeds outcomes back into ratings, and the roster that
//! holds the authoritative player records.

pub mod interaction;
pub mod recorder;
pub mod roster;
pub mod skill;

// Re-export commonly used types
pub use interaction::{pair_interaction, team_interaction, DEFAULT_INTERACTION};
pub use recorder::{MatchRecorder, PlayerUpdate, RecordedResult, RecorderConfig};
pub use roster::{compose_name, Partner, Roster};
