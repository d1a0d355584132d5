// Player stats and the persisted player record

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Health and stamina of the player character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerStats {
    /// Current health points
    pub health: i32,
    /// Current stamina points
    pub stamina: i32,
    /// Health restored on respawn
    pub max_health: i32,
    /// Stamina restored on respawn
    pub max_stamina: i32,
}

/// Stats every player spawns with
pub const BASE_STATS: PlayerStats = PlayerStats {
    health: 100,
    stamina: 100,
    max_health: 100,
    max_stamina: 100,
};

impl Default for PlayerStats {
    fn default() -> Self {
        BASE_STATS
    }
}

impl PlayerStats {
    /// Apply damage, health never drops below zero
    pub fn take_damage(&mut self, damage: i32) {
        self.health = (self.health - damage.max(0)).max(0);
    }

    /// Check if the player has run out of health
    pub fn is_depleted(&self) -> bool {
        self.health <= 0
    }

    /// Refill health and stamina
    pub fn restore_full(&mut self) {
        self.health = self.max_health;
        self.stamina = self.max_stamina;
    }
}

/// Flat record handed to the save system.
/// The save system owns the encoding; this is only the shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerData {
    pub position: Vec3,
    pub health: i32,
    pub stamina: i32,
}
