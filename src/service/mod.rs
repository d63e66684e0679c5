//! Service layer
//!
//! This module contains the roster service that coordinates the roster, team
//! formation, result recording and persistence, plus status reporting.

pub mod app;
pub mod status;

// Re-export commonly used types
pub use app::RosterService;
pub use status::{ConnectionStatus, StatusReport};
