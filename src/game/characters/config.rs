// Agent tuning

use crate::game::combat::ItemId;
use std::time::Duration;

/// Span after a combo step starts during which a follow-up primary input
/// chains into the next step (seconds since the step was entered)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComboWindow {
    pub opens_after: f32,
    pub closes_after: f32,
}

impl ComboWindow {
    /// Check if an input `elapsed` seconds into the step is accepted
    pub fn accepts(&self, elapsed: f32) -> bool {
        elapsed >= self.opens_after && elapsed <= self.closes_after
    }
}

/// Tuning values of the character core
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    /// Item id of the bare-hands weapon
    pub unarmed_weapon: ItemId,
    /// Follow-up window of every melee combo step
    pub combo_window: ComboWindow,
    /// How long impact effects stay in the world
    pub impact_effect_lifetime: Duration,
    /// Height added to the spawn point when respawning
    pub respawn_lift: f32,
    /// Entry hooks may request further transitions; a chain longer than
    /// this is cut
    pub max_chained_transitions: usize,
}

pub const UNARMED_WEAPON: &str = "unarmed";

pub const DEFAULT_COMBO_WINDOW: ComboWindow = ComboWindow {
    opens_after: 0.1,
    closes_after: 0.9,
};

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            unarmed_weapon: ItemId::new(UNARMED_WEAPON),
            combo_window: DEFAULT_COMBO_WINDOW,
            impact_effect_lifetime: Duration::from_secs(2),
            respawn_lift: 1.0,
            max_chained_transitions: 8,
        }
    }
}

impl AgentConfig {
    /// Use a different bare-hands weapon id
    pub fn with_unarmed_weapon(mut self, id: ItemId) -> Self {
        self.unarmed_weapon = id;
        self
    }

    /// Use a different combo window
    pub fn with_combo_window(mut self, opens_after: f32, closes_after: f32) -> Self {
        self.combo_window = ComboWindow {
            opens_after: opens_after.max(0.0),
            closes_after: closes_after.max(opens_after),
        };
        self
    }
}
