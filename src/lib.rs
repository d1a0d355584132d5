// Survival agent - behaviour core of the player character
//
// The crate is organised the same way as the game it is embedded in:
// - `core`: math helpers shared by every layer
// - `engine`: frame timing and input translation
// - `game`: the character state machine and combat rules

pub mod core;
pub mod engine;
pub mod game;

pub use game::characters::{Agent, AgentConfig, AgentError, AgentEvent, StateId};
