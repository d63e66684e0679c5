//! Squad Forge - roster keeping and balanced team formation for pickup games
//!
//! This crate stores players with skill ratings and pairwise interaction
//! scores, splits players into balanced teams, and feeds match and cup results
//! back into those ratings.

pub mod config;
pub mod error;
pub mod rating;
pub mod service;
pub mod storage;
pub mod teams;
pub mod types;
pub mod utils;
pub mod views;

// Re-export commonly used types and traits
pub use error::{Result, RosterError};
pub use types::*;

// Re-export key components
pub use rating::{MatchRecorder, Roster};
pub use service::RosterService;
pub use teams::{SnakeDraftBalancer, TeamBalancer, TeamSession};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
