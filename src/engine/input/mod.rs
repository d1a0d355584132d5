// Input handling system
//
// Translates raw keyboard and mouse input into the discrete events the
// character state machine understands.
//
// ## Architecture
//
// - `action`: Defines actions, discrete input events and default bindings
// - `player`: Pressed/held tracking that emits events in arrival order
// - `config`: Input configuration and remapping system
// - `manager`: Main input manager consuming winit events
//
// ## Usage Example
//
// ```rust,ignore
// let mut input = InputManager::new();
//
// // In your event loop, forward keyboard and mouse events
// input.process_keyboard_event(&key_event);
// input.process_mouse_button(button, state);
//
// // Once per frame, hand the events to the agent in order
// for event in input.update() {
//     agent.handle_input(event);
// }
// agent.set_motion(input.movement_vector(), camera_forward);
// ```

pub mod action;
pub mod config;
pub mod manager;
pub mod player;

// Re-export commonly used types
pub use action::{Action, HotbarSlot, InputEvent, InputSource};
pub use config::InputConfig;
pub use manager::InputManager;
pub use player::PlayerInput;

/// Input translation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Hotbar slot out of range: {0} (expected 0-9)")]
    InvalidHotbarSlot(u8),
}
