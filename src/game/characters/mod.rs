// Character system
//
// This module contains the behaviour core of the player character:
// - Agent controller and its context
// - State machine with every state variant
// - Animation callback bridge
// - Capabilities of the collaborating systems and their wiring
// - Player stats and the persisted player record

pub mod animation;
pub mod capabilities;
pub mod character;
pub mod config;
pub mod context;
pub mod state;
pub mod stats;
pub mod wiring;

#[cfg(test)]
pub(crate) mod testing;

use crate::engine::input::InputError;

// Re-export commonly used types
pub use animation::{Signal, SignalKind};
pub use character::Agent;
pub use config::AgentConfig;
pub use context::AgentContext;
pub use state::{CharacterState, StateId, Transition};
pub use stats::{PlayerData, PlayerStats};
pub use wiring::{AgentEvent, Mailbox};

/// Failures of the agent's public API
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AgentError {
    #[error("No spawn point has been recorded yet")]
    NoSpawnPoint,
    #[error("Invalid save data: {0}")]
    InvalidSaveData(String),
    #[error("Hotbar slot out of range: {0} (expected 0-9)")]
    InvalidHotbarSlot(u8),
}

impl From<InputError> for AgentError {
    fn from(err: InputError) -> Self {
        match err {
            InputError::InvalidHotbarSlot(slot) => Self::InvalidHotbarSlot(slot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            AgentError::NoSpawnPoint.to_string(),
            "No spawn point has been recorded yet"
        );
        assert_eq!(
            AgentError::InvalidSaveData("health -1".into()).to_string(),
            "Invalid save data: health -1"
        );
    }

    #[test]
    fn test_input_error_converts() {
        let err: AgentError = InputError::InvalidHotbarSlot(11).into();
        assert_eq!(err, AgentError::InvalidHotbarSlot(11));
    }
}
