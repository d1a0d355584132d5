// Local player input state

use super::action::{Action, InputEvent};
use glam::Vec2;
use std::collections::{HashSet, VecDeque};

/// Pressed/held bookkeeping for the local player.
///
/// Presses become discrete [`InputEvent`]s in the order they arrive, so the
/// state machine sees exactly one event per physical trigger.
#[derive(Debug, Default)]
pub struct PlayerInput {
    /// Actions that are currently pressed
    pressed: HashSet<Action>,

    /// Events produced since the last `update`, in arrival order
    pending: VecDeque<InputEvent>,

    /// Frames the secondary button has been down
    secondary_frames: u32,

    /// Whether "held down" was already reported for this press
    secondary_held_reported: bool,
}

impl PlayerInput {
    /// Create a new player input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently pressed
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Register an action press
    pub(crate) fn press(&mut self, action: Action) {
        if !self.pressed.insert(action) {
            // Already down, key repeat
            return;
        }

        let event = match action {
            Action::Jump => Some(InputEvent::Jump),
            Action::Primary => Some(InputEvent::PrimaryAction),
            Action::Secondary => {
                self.secondary_frames = 0;
                self.secondary_held_reported = false;
                Some(InputEvent::SecondaryClick)
            }
            Action::Reload => Some(InputEvent::Reload),
            Action::EquipToggle => Some(InputEvent::EquipToggle),
            Action::Hotbar(slot) => Some(InputEvent::Hotbar(slot)),
            Action::Interact => Some(InputEvent::Interact),
            Action::Inventory => Some(InputEvent::InventoryToggle),
            Action::Menu => Some(InputEvent::MenuToggle),
            // Continuous, read through movement_vector
            Action::MoveForward | Action::MoveBack | Action::MoveLeft | Action::MoveRight => None,
        };

        if let Some(event) = event {
            self.pending.push_back(event);
        }
    }

    /// Register an action release
    pub(crate) fn release(&mut self, action: Action) {
        if self.pressed.remove(&action) && action == Action::Secondary {
            self.pending.push_back(InputEvent::SecondaryUp);
            self.secondary_frames = 0;
            self.secondary_held_reported = false;
        }
    }

    /// Advance one frame and take the events produced since the last call
    pub(crate) fn update(&mut self, hold_threshold_frames: u32) -> Vec<InputEvent> {
        if self.is_pressed(Action::Secondary) && !self.secondary_held_reported {
            self.secondary_frames += 1;
            if self.secondary_frames >= hold_threshold_frames {
                self.secondary_held_reported = true;
                self.pending.push_back(InputEvent::SecondaryHeldDown);
            }
        }

        self.pending.drain(..).collect()
    }

    /// Reset all input state
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.pending.clear();
        self.secondary_frames = 0;
        self.secondary_held_reported = false;
    }

    /// Movement input as a normalized vector (x = strafe, y = forward)
    pub fn movement_vector(&self) -> Vec2 {
        let mut direction = Vec2::ZERO;

        if self.is_pressed(Action::MoveLeft) {
            direction.x -= 1.0;
        }
        if self.is_pressed(Action::MoveRight) {
            direction.x += 1.0;
        }
        if self.is_pressed(Action::MoveForward) {
            direction.y += 1.0;
        }
        if self.is_pressed(Action::MoveBack) {
            direction.y -= 1.0;
        }

        direction.normalize_or_zero()
    }
}
