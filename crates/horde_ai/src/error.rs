//! Error types for the behavior engine

use horde_core::AgentId;
use thiserror::Error;

/// Behavior engine errors.
///
/// The per-tick path never returns these: missing states, waypoints or
/// registry entries degrade to a fallback. Errors come from loading and
/// validating configuration and from checked waypoint indexing.
#[derive(Debug, Error)]
pub enum AiError {
    /// Reading a configuration file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed
    #[error("Config error: {0}")]
    Config(String),

    /// A configuration value is out of range
    #[error("Invalid config field `{field}`: {reason}")]
    InvalidConfig {
        /// Dotted path of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// A waypoint network without waypoints
    #[error("Waypoint network is empty")]
    EmptyWaypointNetwork,

    /// Waypoint index past the end of the network
    #[error("Waypoint index {index} out of range (network has {len})")]
    WaypointOutOfRange {
        /// Requested index
        index: usize,
        /// Number of waypoints
        len: usize,
    },

    /// An agent with this id is already part of the horde
    #[error("Agent {0} already spawned")]
    DuplicateAgent(AgentId),
}

impl From<serde_json::Error> for AiError {
    fn from(err: serde_json::Error) -> Self {
        AiError::Config(err.to_string())
    }
}

/// Result type for behavior engine operations
pub type Result<T> = std::result::Result<T, AiError>;
