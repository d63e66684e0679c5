//! Utility functions for the roster service

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new unique formation session ID
pub fn generate_session_id() -> Uuid {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Format a skill or interaction score with two decimals
pub fn format_score(score: f64) -> String {
    format!("{:.2}", score)
}

/// Parse a comma separated list of player ids such as "1, 4,7"
pub fn parse_id_list(raw: &str) -> Option<Vec<u32>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse().ok())
        .collect()
}
