// Melee attacks and guards

use super::{go, strike, CharacterState, ComboStep, Outcome, StateId, Transition};
use crate::game::characters::animation::{params, Delivery, Signal, SignalKind};
use crate::game::characters::context::AgentContext;
use crate::game::combat::{ItemId, WeaponData};

/// Back to the melee stance with the weapon still in hand
fn back_to_stance(ctx: &AgentContext) -> Outcome {
    Some(Transition {
        to: StateId::MeleeAttackStance,
        weapon: ctx.weapon.clone(),
    })
}

/// Data of the weapon in hand, looked up once per attack
fn attacking_weapon(ctx: &AgentContext) -> Option<WeaponData> {
    let weapon = ctx.weapon.as_ref()?;
    ctx.weapon_data(weapon)
}

fn subscribe_attack(ctx: &mut AgentContext) {
    ctx.subscribe(SignalKind::FinishedAttacking, Delivery::Once);
    ctx.subscribe(SignalKind::AttackHit, Delivery::Repeating);
}

fn unsubscribe_attack(ctx: &mut AgentContext) {
    ctx.unsubscribe(SignalKind::FinishedAttacking);
    ctx.unsubscribe(SignalKind::AttackHit);
}

/// One step of the unarmed combo
pub struct MeleeComboState {
    step: ComboStep,
    entered_at: f32,
    /// A primary input landed inside the combo window
    follow_up: bool,
    weapon: Option<WeaponData>,
}

impl MeleeComboState {
    pub fn new(step: ComboStep) -> Self {
        Self {
            step,
            entered_at: 0.0,
            follow_up: false,
            weapon: None,
        }
    }
}

impl CharacterState for MeleeComboState {
    fn enter(&mut self, ctx: &mut AgentContext, _weapon: Option<ItemId>) -> Outcome {
        self.entered_at = ctx.time();
        self.follow_up = false;
        self.weapon = attacking_weapon(ctx);

        ctx.caps.movement.stop_movement();
        subscribe_attack(ctx);
        ctx.caps.animation.set_trigger(self.step.trigger());
        None
    }

    fn exit(&mut self, ctx: &mut AgentContext, _next: StateId) {
        unsubscribe_attack(ctx);
        self.weapon = None;
    }

    fn on_primary(&mut self, ctx: &mut AgentContext) -> Outcome {
        // Only the latest input decides
        let elapsed = ctx.time() - self.entered_at;
        self.follow_up = ctx.config.combo_window.accepts(elapsed);
        None
    }

    fn on_signal(&mut self, ctx: &mut AgentContext, signal: Signal) -> Outcome {
        match signal {
            Signal::AttackHit(hit) => {
                strike(ctx, self.weapon.as_ref(), &hit);
                None
            }
            Signal::FinishedAttacking => {
                ctx.unsubscribe(SignalKind::AttackHit);
                match self.step.next() {
                    Some(next) if self.follow_up => go(StateId::MeleeUnarmedAttack(next)),
                    _ => back_to_stance(ctx),
                }
            }
            _ => None,
        }
    }
}

/// Single swing of a held melee weapon
#[derive(Default)]
pub struct MeleeWeaponAttackState {
    weapon: Option<WeaponData>,
}

impl CharacterState for MeleeWeaponAttackState {
    fn enter(&mut self, ctx: &mut AgentContext, _weapon: Option<ItemId>) -> Outcome {
        self.weapon = attacking_weapon(ctx);

        ctx.caps.movement.stop_movement();
        subscribe_attack(ctx);
        ctx.caps.animation.set_trigger(params::MELEE_WEAPON_ATTACK);
        None
    }

    fn exit(&mut self, ctx: &mut AgentContext, _next: StateId) {
        unsubscribe_attack(ctx);
        self.weapon = None;
    }

    fn on_signal(&mut self, ctx: &mut AgentContext, signal: Signal) -> Outcome {
        match signal {
            Signal::AttackHit(hit) => {
                strike(ctx, self.weapon.as_ref(), &hit);
                None
            }
            Signal::FinishedAttacking => {
                ctx.unsubscribe(SignalKind::AttackHit);
                back_to_stance(ctx)
            }
            _ => None,
        }
    }
}

/// Raised guard of an armed melee weapon
pub struct BlockStanceState;

impl BlockStanceState {
    fn lower_guard(ctx: &mut AgentContext) {
        ctx.caps.block.set_blocking(false);
        ctx.caps.animation.set_bool(params::BLOCK_STANCE, false);
    }
}

impl CharacterState for BlockStanceState {
    fn enter(&mut self, ctx: &mut AgentContext, _weapon: Option<ItemId>) -> Outcome {
        ctx.caps.animation.set_bool(params::BLOCK_STANCE, true);
        ctx.caps.block.set_blocking(true);
        ctx.subscribe(SignalKind::BlockSuccessful, Delivery::Once);
        None
    }

    fn exit(&mut self, ctx: &mut AgentContext, _next: StateId) {
        ctx.unsubscribe(SignalKind::BlockSuccessful);
        if ctx.caps.block.is_blocking() {
            Self::lower_guard(ctx);
        }
    }

    fn on_secondary_up(&mut self, ctx: &mut AgentContext) -> Outcome {
        Self::lower_guard(ctx);
        back_to_stance(ctx)
    }

    fn on_signal(&mut self, ctx: &mut AgentContext, signal: Signal) -> Outcome {
        match signal {
            Signal::BlockSuccessful => {
                Self::lower_guard(ctx);
                go(StateId::BlockReaction)
            }
            _ => None,
        }
    }
}

/// Recoil after absorbing a hit
pub struct BlockReactionState;

impl CharacterState for BlockReactionState {
    fn enter(&mut self, ctx: &mut AgentContext, _weapon: Option<ItemId>) -> Outcome {
        ctx.caps.animation.set_trigger(params::BLOCK_REACTION);
        ctx.subscribe(SignalKind::AnimationFunctionTrigger, Delivery::Once);
        None
    }

    fn exit(&mut self, ctx: &mut AgentContext, _next: StateId) {
        ctx.unsubscribe(SignalKind::AnimationFunctionTrigger);
    }

    fn on_signal(&mut self, ctx: &mut AgentContext, signal: Signal) -> Outcome {
        match signal {
            Signal::AnimationFunctionTrigger => back_to_stance(ctx),
            _ => None,
        }
    }
}

/// Bare-hands guard, held while the secondary input is down
pub struct DefenseState;

impl CharacterState for DefenseState {
    fn enter(&mut self, ctx: &mut AgentContext, _weapon: Option<ItemId>) -> Outcome {
        ctx.caps.animation.set_bool(params::DEFENSE, true);
        None
    }

    fn exit(&mut self, ctx: &mut AgentContext, _next: StateId) {
        ctx.caps.animation.set_bool(params::DEFENSE, false);
    }

    fn on_secondary_up(&mut self, ctx: &mut AgentContext) -> Outcome {
        back_to_stance(ctx)
    }
}
