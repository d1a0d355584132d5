// Weapon data and hit resolution

use crate::core::math::impact_impulse;
use crate::game::characters::animation::params;
use crate::game::characters::capabilities::World;
use glam::Vec3;
use std::fmt;
use std::time::Duration;

/// Identifier of an inventory item (weapons, ammo, structures, resources)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an entity in the world that can be struck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u64);

/// Identifier of a visual effect the world knows how to spawn
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EffectId(pub String);

/// Broad weapon category, decides which attack stance is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WeaponKind {
    #[default]
    None,
    Ranged,
    Melee,
}

/// Static data of a weapon item
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponData {
    pub id: ItemId,
    pub kind: WeaponKind,
    /// Damage dealt per successful hit
    pub damage: i32,
    /// Impulse applied to simulated bodies along the inverted hit normal
    pub impact_force: f32,
    /// Animator bool raised while the weapon's attack stance is held
    pub stance_animation: String,
}

impl WeaponData {
    pub fn new(id: ItemId, kind: WeaponKind, damage: i32, impact_force: f32) -> Self {
        let stance_animation = match kind {
            WeaponKind::Ranged => params::RANGED_ATTACK_STANCE,
            WeaponKind::Melee | WeaponKind::None => params::MELEE_ATTACK_STANCE,
        };
        Self {
            id,
            kind,
            damage,
            impact_force,
            stance_animation: stance_animation.to_string(),
        }
    }

    /// Use a custom animator bool for the attack stance
    pub fn with_stance_animation(mut self, name: &str) -> Self {
        self.stance_animation = name.to_string();
        self
    }
}

/// A successful detection hit reported while an attack is active
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub entity: EntityId,
    pub point: Vec3,
    /// Surface normal at the hit point, pointing away from the surface
    pub normal: Vec3,
}

/// What a resolved hit did to the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HitOutcome {
    pub damaged: bool,
    pub pushed: bool,
}

/// Apply one hit of `weapon`: damage if the entity can take it, an impulse
/// if its body is simulated, and a short-lived impact effect in every case.
pub fn resolve_hit(
    world: &mut dyn World,
    weapon: &WeaponData,
    hit: &Hit,
    effect: &EffectId,
    effect_lifetime: Duration,
) -> HitOutcome {
    let damaged = world.apply_damage(hit.entity, weapon.damage);
    if damaged {
        log::debug!(
            "{} dealt {} damage to {:?}",
            weapon.id,
            weapon.damage,
            hit.entity
        );
    }

    let pushed = world.apply_impulse(hit.entity, impact_impulse(hit.normal, weapon.impact_force));

    world.spawn_effect(effect, hit.point, hit.normal, effect_lifetime);

    HitOutcome { damaged, pushed }
}
