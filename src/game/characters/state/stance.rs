// Attack stances
//
// Melee and ranged stances share one implementation: aim visuals, weapon
// bookkeeping and the equip toggle. Only the attack inputs differ.

use super::locomotion::use_hotbar;
use super::{go, CharacterState, ComboStep, Outcome, StateId, Transition};
use crate::engine::input::HotbarSlot;
use crate::game::characters::animation::params;
use crate::game::characters::context::AgentContext;
use crate::game::combat::{ItemId, WeaponKind};

/// Zoom in, aim flag on, crosshair on
pub(super) fn raise_aim(ctx: &mut AgentContext) {
    let aim = &mut ctx.caps.aim;
    aim.set_zoom_in();
    aim.set_aim_active(true);
    aim.set_crosshair_visible(true);
}

/// Zoom out, crosshair off, aim flag off
pub(super) fn lower_aim(ctx: &mut AgentContext) {
    let aim = &mut ctx.caps.aim;
    aim.set_zoom_out();
    aim.set_crosshair_visible(false);
    aim.set_aim_active(false);
}

/// Raise or drop the stance pose of `weapon`
pub(super) fn set_stance_pose(ctx: &mut AgentContext, weapon: &ItemId, on: bool) {
    let name = ctx
        .weapon_data(weapon)
        .map(|data| data.stance_animation)
        .unwrap_or_else(|| params::MELEE_ATTACK_STANCE.to_string());
    ctx.caps.animation.set_bool(&name, on);
}

/// Stance a weapon is held in, None for items missing from the catalog
pub(super) fn stance_for(ctx: &AgentContext, weapon: &ItemId) -> Option<StateId> {
    match ctx.weapon_kind(weapon) {
        Some(WeaponKind::Ranged) => Some(StateId::RangedAttackStance),
        Some(WeaponKind::Melee | WeaponKind::None) => Some(StateId::MeleeAttackStance),
        None => {
            log::warn!("{} is not in the item catalog, no stance to enter", weapon);
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StanceKind {
    Melee,
    Ranged,
}

impl StanceKind {
    pub fn id(&self) -> StateId {
        match self {
            Self::Melee => StateId::MeleeAttackStance,
            Self::Ranged => StateId::RangedAttackStance,
        }
    }

    /// Check if `next` is played out of this stance and keeps its visuals
    fn keeps_pose_for(&self, next: StateId) -> bool {
        match self {
            Self::Melee => next.is_melee_action(),
            Self::Ranged => next.is_ranged_action(),
        }
    }
}

/// Weapon drawn and ready, waiting for an attack input
pub struct AttackStanceState {
    kind: StanceKind,
    /// Weapon this activation was entered with. Survives only a direct
    /// re-entry of the same stance, where it detects a weapon swap.
    weapon: Option<ItemId>,
}

impl AttackStanceState {
    pub fn new(kind: StanceKind) -> Self {
        Self { kind, weapon: None }
    }

    /// Put the weapon away: bare hands go straight back to movement, a real
    /// weapon goes through the unequip animation first.
    fn equip_toggle(&mut self, ctx: &mut AgentContext, incoming: ItemId) -> Outcome {
        let weapon = self.weapon.take().unwrap_or(incoming);
        set_stance_pose(ctx, &weapon, false);
        lower_aim(ctx);

        if ctx.is_unarmed(&weapon) {
            ctx.weapon = None;
            go(StateId::Movement)
        } else {
            Some(Transition::with_weapon(StateId::UnequipItem, weapon))
        }
    }

    fn held_weapon(&self, ctx: &AgentContext) -> ItemId {
        ctx.weapon
            .clone()
            .or_else(|| self.weapon.clone())
            .unwrap_or_else(|| ctx.equipped_or_unarmed())
    }
}

impl CharacterState for AttackStanceState {
    fn enter(&mut self, ctx: &mut AgentContext, weapon: Option<ItemId>) -> Outcome {
        let weapon = weapon
            .or_else(|| ctx.weapon.clone())
            .unwrap_or_else(|| ctx.equipped_or_unarmed());

        ctx.caps.movement.stop_movement();
        raise_aim(ctx);

        // A different real weapon still in hand has to go away first
        let in_hand = ctx
            .weapon
            .clone()
            .filter(|held| *held != weapon && !ctx.is_unarmed(held));
        let recorded = self.weapon.clone().filter(|past| *past != weapon);
        let swapped = recorded.or(in_hand);

        if swapped.is_some() || ctx.caps.item_slot.is_weapon_on_back_and_in_hand() {
            let old = swapped.unwrap_or_else(|| weapon.clone());
            log::debug!("{} entered mid-swap, putting {} away", self.kind.id(), old);
            self.weapon = None;
            return self.equip_toggle(ctx, old);
        }

        set_stance_pose(ctx, &weapon, true);
        if !ctx.is_unarmed(&weapon) && ctx.weapon.as_ref() != Some(&weapon) {
            ctx.caps.item_slot.swap_back_item_to_hand();
        }
        ctx.weapon = Some(weapon.clone());
        self.weapon = Some(weapon);
        None
    }

    fn exit(&mut self, ctx: &mut AgentContext, next: StateId) {
        if next == self.kind.id() {
            return;
        }
        self.weapon = None;

        if !self.kind.keeps_pose_for(next) {
            lower_aim(ctx);
            if let Some(weapon) = ctx.weapon.clone() {
                set_stance_pose(ctx, &weapon, false);
            }
        }
    }

    fn on_equip_toggle(&mut self, ctx: &mut AgentContext) -> Outcome {
        let weapon = self.held_weapon(ctx);
        self.equip_toggle(ctx, weapon)
    }

    fn on_hotbar(&mut self, ctx: &mut AgentContext, slot: HotbarSlot) -> Outcome {
        use_hotbar(ctx, slot)
    }

    fn on_inventory_toggle(&mut self, _ctx: &mut AgentContext) -> Outcome {
        go(StateId::Inventory)
    }

    fn on_menu_toggle(&mut self, _ctx: &mut AgentContext) -> Outcome {
        go(StateId::Menu)
    }

    /// Bare hands open the combo chain. Any real melee weapon plays its
    /// single weapon attack instead, so an equipped sword never combos.
    fn on_primary(&mut self, ctx: &mut AgentContext) -> Outcome {
        match self.kind {
            StanceKind::Melee => {
                if ctx.is_unarmed(&self.held_weapon(ctx)) {
                    go(StateId::MeleeUnarmedAttack(ComboStep::One))
                } else {
                    go(StateId::MeleeWeaponAttack)
                }
            }
            StanceKind::Ranged => None,
        }
    }

    fn on_secondary_held(&mut self, ctx: &mut AgentContext) -> Outcome {
        match self.kind {
            StanceKind::Melee => {
                if ctx.is_unarmed(&self.held_weapon(ctx)) {
                    go(StateId::Defense)
                } else {
                    go(StateId::BlockStance)
                }
            }
            StanceKind::Ranged => go(StateId::RangedWeaponAim),
        }
    }

    fn on_reload(&mut self, _ctx: &mut AgentContext) -> Outcome {
        match self.kind {
            StanceKind::Melee => None,
            StanceKind::Ranged => go(StateId::ReloadRangedWeapon),
        }
    }
}
