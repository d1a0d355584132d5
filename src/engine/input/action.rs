// Game action definitions and mappings

use super::InputError;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Number of hotbar slots reachable from the digit row
pub const HOTBAR_SLOTS: u8 = 10;

/// A validated hotbar slot (digit key 0-9)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HotbarSlot(u8);

impl HotbarSlot {
    /// Create a hotbar slot, rejecting anything outside the digit row
    pub fn new(slot: u8) -> Result<Self, InputError> {
        if slot < HOTBAR_SLOTS {
            Ok(Self(slot))
        } else {
            Err(InputError::InvalidHotbarSlot(slot))
        }
    }

    /// The digit the slot is bound to
    pub fn index(&self) -> u8 {
        self.0
    }
}

/// Represents all possible physical in-game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
    Jump,

    // Combat (mouse buttons)
    Primary,   // Left mouse
    Secondary, // Right mouse
    Reload,
    EquipToggle,

    // Items and world
    Hotbar(HotbarSlot),
    Interact,
    Inventory,

    // Meta actions
    Menu,
}

/// A discrete input event forwarded to the active character state.
/// Each physical trigger produces at most one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    Jump,
    Hotbar(HotbarSlot),
    InventoryToggle,
    PrimaryAction,
    SecondaryClick,
    SecondaryHeldDown,
    SecondaryUp,
    MenuToggle,
    Reload,
    EquipToggle,
    /// Raised by the inventory when a structure item is used
    Placement,
    Interact,
}

/// Represents an input source (keyboard key or mouse button)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard(KeyCode),
    Mouse(MouseButton),
}

impl InputSource {
    /// Create a keyboard input source
    pub fn key(code: KeyCode) -> Self {
        Self::Keyboard(code)
    }

    /// Create a mouse button input source
    pub fn mouse(button: MouseButton) -> Self {
        Self::Mouse(button)
    }
}

const DIGIT_KEYS: [KeyCode; HOTBAR_SLOTS as usize] = [
    KeyCode::Digit0,
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

/// Default keyboard/mouse bindings
pub fn default_bindings() -> Vec<(InputSource, Action)> {
    let mut bindings = vec![
        // Movement (WASD - standard gaming layout)
        (InputSource::key(KeyCode::KeyW), Action::MoveForward),
        (InputSource::key(KeyCode::KeyS), Action::MoveBack),
        (InputSource::key(KeyCode::KeyA), Action::MoveLeft),
        (InputSource::key(KeyCode::KeyD), Action::MoveRight),
        (InputSource::key(KeyCode::Space), Action::Jump),
        // Combat
        (InputSource::mouse(MouseButton::Left), Action::Primary),
        (InputSource::mouse(MouseButton::Right), Action::Secondary),
        (InputSource::key(KeyCode::KeyR), Action::Reload),
        (InputSource::key(KeyCode::KeyF), Action::EquipToggle),
        // Items and world
        (InputSource::key(KeyCode::KeyE), Action::Interact),
        (InputSource::key(KeyCode::KeyI), Action::Inventory),
        (InputSource::key(KeyCode::Escape), Action::Menu),
    ];

    for (index, key) in DIGIT_KEYS.iter().enumerate() {
        if let Ok(slot) = HotbarSlot::new(index as u8) {
            bindings.push((InputSource::key(*key), Action::Hotbar(slot)));
        }
    }

    bindings
}
