// Equip, unequip and hurt: states that play one clip and wait for its
// function trigger

use super::stance::stance_for;
use super::{go, CharacterState, Outcome, StateId, Transition};
use crate::game::characters::animation::{params, Delivery, Signal, SignalKind};
use crate::game::characters::context::AgentContext;
use crate::game::combat::ItemId;

/// Newly equipped weapon is strapped to the back. Entered from an attack
/// stance, it goes back to the stance of the new weapon, which then finds
/// the old one still in hand and puts it away.
#[derive(Default)]
pub struct EquipItemState {
    weapon: Option<ItemId>,
    from_stance: bool,
}

impl CharacterState for EquipItemState {
    fn enter(&mut self, ctx: &mut AgentContext, weapon: Option<ItemId>) -> Outcome {
        self.weapon = weapon.or_else(|| ctx.caps.inventory.borrow().equipped_weapon_id());
        self.from_stance = ctx.previous_state().is_attack_stance();
        ctx.caps.animation.set_trigger(params::EQUIP_ITEM);
        ctx.subscribe(SignalKind::AnimationFunctionTrigger, Delivery::Once);
        None
    }

    fn exit(&mut self, ctx: &mut AgentContext, _next: StateId) {
        ctx.unsubscribe(SignalKind::AnimationFunctionTrigger);
        self.weapon = None;
        self.from_stance = false;
    }

    fn on_signal(&mut self, ctx: &mut AgentContext, signal: Signal) -> Outcome {
        if signal != Signal::AnimationFunctionTrigger {
            return None;
        }
        let Some(weapon) = self.weapon.take() else {
            return go(StateId::Movement);
        };
        ctx.caps.item_slot.attach_to_back(&weapon);

        match stance_for(ctx, &weapon) {
            Some(stance) if self.from_stance => Some(Transition::with_weapon(stance, weapon)),
            _ => go(StateId::Movement),
        }
    }
}

/// Weapon in hand goes back onto the back
pub struct UnequipItemState;

impl CharacterState for UnequipItemState {
    fn enter(&mut self, ctx: &mut AgentContext, _weapon: Option<ItemId>) -> Outcome {
        ctx.caps.animation.set_trigger(params::UNEQUIP_ITEM);
        ctx.subscribe(SignalKind::AnimationFunctionTrigger, Delivery::Once);
        None
    }

    fn exit(&mut self, ctx: &mut AgentContext, _next: StateId) {
        ctx.unsubscribe(SignalKind::AnimationFunctionTrigger);
    }

    fn on_signal(&mut self, ctx: &mut AgentContext, signal: Signal) -> Outcome {
        if signal != Signal::AnimationFunctionTrigger {
            return None;
        }
        ctx.caps.item_slot.swap_hand_item_to_back();
        ctx.weapon = None;
        go(StateId::Movement)
    }
}

/// Flinch after taking damage
pub struct HurtState;

impl CharacterState for HurtState {
    fn enter(&mut self, ctx: &mut AgentContext, _weapon: Option<ItemId>) -> Outcome {
        ctx.caps.movement.stop_movement();
        ctx.caps.animation.set_trigger(params::HURT);
        ctx.subscribe(SignalKind::AnimationFunctionTrigger, Delivery::Once);
        None
    }

    fn exit(&mut self, ctx: &mut AgentContext, _next: StateId) {
        ctx.unsubscribe(SignalKind::AnimationFunctionTrigger);
    }

    fn on_signal(&mut self, _ctx: &mut AgentContext, signal: Signal) -> Outcome {
        match signal {
            Signal::AnimationFunctionTrigger => go(StateId::Movement),
            _ => None,
        }
    }
}
