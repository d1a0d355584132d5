// Rebindable mapping from keys and mouse buttons to character actions

use super::action::{default_bindings, Action, InputSource};
use std::collections::HashMap;

/// Frames the secondary button must stay down before it counts as held
pub const DEFAULT_HOLD_THRESHOLD_FRAMES: u32 = 12;

/// Key and button bindings of the player, kept in both directions
#[derive(Debug, Clone)]
pub struct InputConfig {
    bindings: HashMap<InputSource, Action>,
    sources: HashMap<Action, Vec<InputSource>>,
    hold_threshold_frames: u32,
}

impl InputConfig {
    /// No bindings at all
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            sources: HashMap::new(),
            hold_threshold_frames: DEFAULT_HOLD_THRESHOLD_FRAMES,
        }
    }

    pub fn with_defaults() -> Self {
        Self::from_bindings(default_bindings())
    }

    pub fn from_bindings(bindings: Vec<(InputSource, Action)>) -> Self {
        let mut config = Self::new();
        for (source, action) in bindings {
            config.bind(source, action);
        }
        config
    }

    /// Set how many frames the secondary button must be held
    pub fn with_hold_threshold(mut self, frames: u32) -> Self {
        self.hold_threshold_frames = frames.max(1);
        self
    }

    /// Frames before a pressed secondary button reports "held down"
    pub fn hold_threshold_frames(&self) -> u32 {
        self.hold_threshold_frames
    }

    /// Bind `source` to `action`, replacing whatever `source` did before
    pub fn bind(&mut self, source: InputSource, action: Action) {
        self.unbind_source(source);
        self.bindings.insert(source, action);
        self.sources.entry(action).or_default().push(source);
    }

    pub fn unbind_source(&mut self, source: InputSource) {
        let Some(action) = self.bindings.remove(&source) else {
            return;
        };
        if let Some(sources) = self.sources.get_mut(&action) {
            sources.retain(|s| *s != source);
            if sources.is_empty() {
                self.sources.remove(&action);
            }
        }
    }

    /// Drop every source bound to `action`
    pub fn unbind_action(&mut self, action: Action) {
        for source in self.sources.remove(&action).unwrap_or_default() {
            self.bindings.remove(&source);
        }
    }

    pub fn action_for(&self, source: InputSource) -> Option<Action> {
        self.bindings.get(&source).copied()
    }

    pub fn sources_for(&self, action: Action) -> Vec<InputSource> {
        self.sources.get(&action).cloned().unwrap_or_default()
    }

    pub fn is_bound(&self, action: Action) -> bool {
        self.sources.contains_key(&action)
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
        self.sources.clear();
    }

    /// Throw away custom bindings and go back to the stock layout
    pub fn reset_to_defaults(&mut self) {
        *self = Self::with_defaults().with_hold_threshold(self.hold_threshold_frames);
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::HotbarSlot;
    use winit::keyboard::KeyCode;

    #[test]
    fn test_bind_action() {
        let mut config = InputConfig::new();
        let source = InputSource::key(KeyCode::KeyQ);
        config.bind(source, Action::Reload);

        assert_eq!(config.action_for(source), Some(Action::Reload));
    }

    #[test]
    fn test_unbind_source() {
        let mut config = InputConfig::new();
        let source = InputSource::key(KeyCode::KeyQ);
        config.bind(source, Action::Reload);
        config.unbind_source(source);

        assert_eq!(config.action_for(source), None);
        assert!(!config.is_bound(Action::Reload));
    }

    #[test]
    fn test_unbind_action() {
        let mut config = InputConfig::new();
        let source1 = InputSource::key(KeyCode::KeyR);
        let source2 = InputSource::key(KeyCode::KeyT);

        config.bind(source1, Action::Reload);
        config.bind(source2, Action::Reload);
        config.unbind_action(Action::Reload);

        assert_eq!(config.action_for(source1), None);
        assert_eq!(config.action_for(source2), None);
    }

    #[test]
    fn test_rebind_source() {
        let mut config = InputConfig::new();
        let source = InputSource::key(KeyCode::KeyF);

        config.bind(source, Action::EquipToggle);
        config.bind(source, Action::Interact);

        assert_eq!(config.action_for(source), Some(Action::Interact));
        assert!(!config.is_bound(Action::EquipToggle));
        assert_eq!(config.sources_for(Action::Interact), vec![source]);
    }

    #[test]
    fn test_reset_to_defaults() {
        let mut config = InputConfig::new();
        config.bind(InputSource::key(KeyCode::KeyZ), Action::Jump);
        config.reset_to_defaults();

        assert_eq!(config.action_for(InputSource::key(KeyCode::KeyZ)), None);
        assert_eq!(
            config.action_for(InputSource::key(KeyCode::Digit3)),
            HotbarSlot::new(3).ok().map(Action::Hotbar)
        );
    }

    #[test]
    fn test_hold_threshold_never_zero() {
        let config = InputConfig::new().with_hold_threshold(0);
        assert_eq!(config.hold_threshold_frames(), 1);
    }
}
