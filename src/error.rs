//! Error types for the roster service
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application.

use crate::types::PlayerId;

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific roster scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RosterError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Player not found: {player_id}")]
    PlayerNotFound { player_id: PlayerId },

    #[error("Team not found: {team_index}")]
    TeamNotFound { team_index: usize },

    #[error("Not enough players: {required} required, {available} available")]
    InsufficientPlayers { required: usize, available: usize },

    #[error("No team formation is in progress")]
    NoActiveSession,

    #[error("Failed to load players: {message}")]
    LoadFailure { message: String },

    #[error("Failed to persist players: {message}")]
    PersistenceFailed { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

impl RosterError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        RosterError::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Pull a `RosterError` back out of an `anyhow::Error`, if that is what it carries
    pub fn from_anyhow(err: &anyhow::Error) -> Option<&RosterError> {
        err.downcast_ref::<RosterError>()
    }
}
