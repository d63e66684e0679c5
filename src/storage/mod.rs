//! Persistence collaborators
//!
//! This module provides the local snapshot store, the player data source, and
//! the load/save policy that ties the two together.

pub mod local;
pub mod source;
pub mod sync;

// Re-export commonly used types
pub use local::{FileSnapshotStore, InMemorySnapshotStore, SnapshotStore, PLAYERS_KEY, SESSION_KEY};
pub use source::{FilePlayerSource, PlayerDocument, PlayerSource, StaticPlayerSource};
pub use sync::{load_players, save_players, DataOrigin, LoadOutcome, SaveReport};
