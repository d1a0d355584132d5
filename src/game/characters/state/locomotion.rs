// Ground and air movement states

use super::stance::{self, stance_for};
use super::{go, CharacterState, Outcome, StateId, Transition};
use crate::engine::input::HotbarSlot;
use crate::game::characters::animation::params;
use crate::game::characters::context::AgentContext;
use crate::game::combat::ItemId;

/// Feed the sampled movement input to the movement capability
pub(super) fn locomote(ctx: &mut AgentContext) {
    let input = ctx.motion.movement;
    ctx.caps.movement.handle_movement(input);
}

/// Draw the equipped weapon (bare hands if none) into its attack stance
pub(super) fn draw_weapon(ctx: &mut AgentContext) -> Outcome {
    let weapon = ctx.equipped_or_unarmed();
    let stance = stance_for(ctx, &weapon)?;
    Some(Transition::with_weapon(stance, weapon))
}

/// Use a hotbar slot. A newly equipped weapon is strapped to the back by
/// EquipItem before anything draws it.
pub(super) fn use_hotbar(ctx: &mut AgentContext, slot: HotbarSlot) -> Outcome {
    let before = ctx.caps.inventory.borrow().equipped_weapon_id();
    ctx.caps.inventory.borrow_mut().use_hotbar_slot(slot);
    let after = ctx.caps.inventory.borrow().equipped_weapon_id();

    match after {
        Some(weapon) if before.as_ref() != Some(&weapon) => {
            Some(Transition::with_weapon(StateId::EquipItem, weapon))
        }
        _ => None,
    }
}

/// Free movement on the ground, the hub every other state returns to
pub struct MovementState;

impl CharacterState for MovementState {
    fn enter(&mut self, ctx: &mut AgentContext, _weapon: Option<ItemId>) -> Outcome {
        stance::lower_aim(ctx);
        if let Some(weapon) = ctx.weapon.clone() {
            stance::set_stance_pose(ctx, &weapon, false);
        }
        None
    }

    fn update(&mut self, ctx: &mut AgentContext) -> Outcome {
        locomote(ctx);
        None
    }

    fn fixed_update(&mut self, ctx: &mut AgentContext) -> Outcome {
        let movement = &ctx.caps.movement;
        if !movement.is_grounded() && movement.is_falling() {
            return go(StateId::Falling);
        }
        None
    }

    fn on_primary(&mut self, ctx: &mut AgentContext) -> Outcome {
        draw_weapon(ctx)
    }

    fn on_equip_toggle(&mut self, ctx: &mut AgentContext) -> Outcome {
        draw_weapon(ctx)
    }

    fn on_jump(&mut self, ctx: &mut AgentContext) -> Outcome {
        if ctx.caps.movement.is_grounded() {
            return go(StateId::Jump);
        }
        None
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

    fn on_placement(&mut self, _ctx: &mut AgentContext) -> Outcome {
        go(StateId::Placement)
    }

    fn on_interact(&mut self, _ctx: &mut AgentContext) -> Outcome {
        go(StateId::Interact)
    }
}

/// Rising part of a jump
pub struct JumpState;

impl CharacterState for JumpState {
    fn enter(&mut self, ctx: &mut AgentContext, _weapon: Option<ItemId>) -> Outcome {
        ctx.caps.movement.jump();
        ctx.caps.animation.set_trigger(params::JUMP);
        None
    }

    fn update(&mut self, ctx: &mut AgentContext) -> Outcome {
        locomote(ctx);
        None
    }

    fn fixed_update(&mut self, ctx: &mut AgentContext) -> Outcome {
        if ctx.caps.movement.is_falling() {
            return go(StateId::Falling);
        }
        None
    }

    fn on_menu_toggle(&mut self, _ctx: &mut AgentContext) -> Outcome {
        go(StateId::Menu)
    }
}

/// Airborne and moving down, until the ground is reached
pub struct FallingState;

impl CharacterState for FallingState {
    fn enter(&mut self, ctx: &mut AgentContext, _weapon: Option<ItemId>) -> Outcome {
        ctx.caps.animation.set_trigger(params::FALL);
        ctx.caps.movement.set_jump_completed_false();
        None
    }

    fn update(&mut self, ctx: &mut AgentContext) -> Outcome {
        locomote(ctx);
        None
    }

    fn fixed_update(&mut self, ctx: &mut AgentContext) -> Outcome {
        if ctx.caps.movement.is_grounded() {
            return go(StateId::Movement);
        }
        None
    }

    fn on_menu_toggle(&mut self, _ctx: &mut AgentContext) -> Outcome {
        go(StateId::Menu)
    }
}
