//! Team formation
//!
//! This module handles automatic balancing of selected players into teams and
//! the session that holds the current teams, including manual placement.

pub mod balancer;
pub mod session;

// Re-export commonly used types
pub use balancer::{snake_slot, BalancerConfig, SnakeDraftBalancer, TeamBalancer};
pub use session::{SessionId, TeamSession};
