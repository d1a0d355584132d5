// Input manager - translates winit input into character input events

use super::action::{Action, InputEvent, InputSource};
use super::config::InputConfig;
use super::player::PlayerInput;
use glam::Vec2;
use winit::event::{ElementState, KeyEvent, MouseButton};
use winit::keyboard::PhysicalKey;

/// Main input manager for the local player
#[derive(Debug, Default)]
pub struct InputManager {
    /// Key and button bindings
    config: InputConfig,

    /// Pressed/held state
    player: PlayerInput,
}

impl InputManager {
    /// Create a new input manager with the default bindings
    pub fn new() -> Self {
        Self::with_config(InputConfig::with_defaults())
    }

    /// Create an input manager with custom bindings
    pub fn with_config(config: InputConfig) -> Self {
        Self {
            config,
            player: PlayerInput::new(),
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        // Only process physical key presses
        if let PhysicalKey::Code(key_code) = event.physical_key {
            if event.repeat {
                return;
            }
            self.process_source(InputSource::key(key_code), event.state);
        }
    }

    /// Process a mouse button event from winit
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        self.process_source(InputSource::mouse(button), state);
    }

    /// Apply a press or release of any bound source
    pub fn process_source(&mut self, source: InputSource, state: ElementState) {
        let Some(action) = self.config.action_for(source) else {
            return;
        };

        match state {
            ElementState::Pressed => self.press(action),
            ElementState::Released => self.release(action),
        }
    }

    /// Press an action directly (scripted input, tests)
    pub fn press(&mut self, action: Action) {
        self.player.press(action);
    }

    /// Release an action directly (scripted input, tests)
    pub fn release(&mut self, action: Action) {
        self.player.release(action);
    }

    /// Advance one frame and return this frame's events in arrival order.
    /// Call this once per frame after processing all window events.
    pub fn update(&mut self) -> Vec<InputEvent> {
        self.player
            .update(self.config.hold_threshold_frames())
    }

    /// Current movement input
    pub fn movement_vector(&self) -> Vec2 {
        self.player.movement_vector()
    }

    /// Get the local player input state
    pub fn player(&self) -> &PlayerInput {
        &self.player
    }

    /// Get the binding configuration
    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    /// Get mutable binding configuration
    pub fn config_mut(&mut self) -> &mut InputConfig {
        &mut self.config
    }

    /// Drop all pressed state (focus lost, menu opened)
    pub fn reset(&mut self) {
        self.player.reset();
    }
}
