// Ranged weapon states: aim, shoot, reload

use super::locomotion::locomote;
use super::{go, strike, CharacterState, Outcome, StateId, Transition};
use crate::game::characters::animation::{params, Delivery, Signal, SignalKind};
use crate::game::characters::context::AgentContext;
use crate::game::combat::{ItemId, WeaponData};

fn back_to_ranged_stance(ctx: &AgentContext) -> Outcome {
    Some(Transition {
        to: StateId::RangedAttackStance,
        weapon: ctx.weapon.clone(),
    })
}

/// Aiming down the sights, free to walk
pub struct RangedWeaponAimState;

impl RangedWeaponAimState {
    fn leave(ctx: &mut AgentContext, to: StateId) -> Outcome {
        ctx.caps.aim.set_aim_active(false);
        match to {
            StateId::RangedAttackStance => back_to_ranged_stance(ctx),
            _ => go(to),
        }
    }
}

impl CharacterState for RangedWeaponAimState {
    fn enter(&mut self, ctx: &mut AgentContext, _weapon: Option<ItemId>) -> Outcome {
        ctx.caps.aim.set_aim_active(true);
        None
    }

    fn update(&mut self, ctx: &mut AgentContext) -> Outcome {
        let direction = ctx.motion.direction;
        ctx.caps.detection.perform_detection(direction);
        locomote(ctx);
        ctx.caps.aim.look_towards(direction);
        None
    }

    fn on_primary(&mut self, ctx: &mut AgentContext) -> Outcome {
        Self::leave(ctx, StateId::RangedAttack)
    }

    fn on_reload(&mut self, ctx: &mut AgentContext) -> Outcome {
        Self::leave(ctx, StateId::ReloadRangedWeapon)
    }

    fn on_equip_toggle(&mut self, ctx: &mut AgentContext) -> Outcome {
        Self::leave(ctx, StateId::RangedAttackStance)
    }

    fn on_secondary_up(&mut self, ctx: &mut AgentContext) -> Outcome {
        Self::leave(ctx, StateId::RangedAttackStance)
    }
}

/// One shot. Ammo is spent when the shot is triggered, hits are resolved
/// as detection reports them.
#[derive(Default)]
pub struct RangedAttackState {
    weapon: Option<WeaponData>,
}

impl CharacterState for RangedAttackState {
    fn enter(&mut self, ctx: &mut AgentContext, _weapon: Option<ItemId>) -> Outcome {
        self.weapon = None;

        let empty = ctx.caps.item_slot.ammo_holder().map(|holder| holder.is_empty());
        match empty {
            None => {
                log::debug!("No ammo holder in hand, back to {}", ctx.previous_state());
                return go(ctx.previous_state());
            }
            Some(true) => return go(StateId::ReloadRangedWeapon),
            Some(false) => {}
        }

        ctx.caps.movement.stop_movement();
        let equipped = ctx.caps.inventory.borrow().equipped_weapon_id();
        self.weapon = equipped.and_then(|id| ctx.weapon_data(&id));

        ctx.subscribe(SignalKind::FinishedAttacking, Delivery::Once);
        ctx.subscribe(SignalKind::AttackHit, Delivery::Repeating);
        ctx.caps.animation.trigger_shoot_animation();

        if let Some(holder) = ctx.caps.item_slot.ammo_holder() {
            holder.consume_one();
        }
        None
    }

    fn exit(&mut self, ctx: &mut AgentContext, _next: StateId) {
        ctx.unsubscribe(SignalKind::FinishedAttacking);
        ctx.unsubscribe(SignalKind::AttackHit);
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
                go(StateId::Movement)
            }
            _ => None,
        }
    }
}

/// Refill the magazine from storage
pub struct ReloadState;

impl CharacterState for ReloadState {
    fn enter(&mut self, ctx: &mut AgentContext, _weapon: Option<ItemId>) -> Outcome {
        let holder = ctx
            .caps
            .item_slot
            .ammo_holder()
            .map(|holder| (holder.is_full(), holder.ammo_item()));
        let Some((full, ammo)) = holder else {
            log::debug!("Nothing to reload, back to {}", ctx.previous_state());
            return go(ctx.previous_state());
        };

        if full || !ctx.caps.ammo.borrow().has_reserve(&ammo) {
            log::debug!("Reload skipped (full: {}, ammo: {})", full, ammo);
            return back_to_ranged_stance(ctx);
        }

        ctx.caps.movement.stop_movement();
        ctx.caps.animation.set_trigger(params::RELOAD);
        ctx.subscribe(SignalKind::AnimationFunctionTrigger, Delivery::Once);
        None
    }

    fn exit(&mut self, ctx: &mut AgentContext, _next: StateId) {
        ctx.unsubscribe(SignalKind::AnimationFunctionTrigger);
    }

    fn on_signal(&mut self, ctx: &mut AgentContext, signal: Signal) -> Outcome {
        match signal {
            Signal::AnimationFunctionTrigger => {
                if let Some(holder) = ctx.caps.item_slot.ammo_holder() {
                    let loaded = ctx.caps.ammo.borrow_mut().reload(holder);
                    log::debug!("Reloaded {} round(s)", loaded);
                }
                back_to_ranged_stance(ctx)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::InputEvent;
    use crate::game::characters::state::StateMachine;
    use crate::game::characters::testing::Rig;
    use crate::game::combat::{EntityId, Hit};
    use approx::assert_relative_eq;
    use glam::{Vec2, Vec3};

    fn aiming(rig: &Rig) -> (StateMachine, AgentContext) {
        rig.equip("bow");
        let mut ctx = rig.context();
        let mut machine = StateMachine::new();
        machine.start(&mut ctx);
        machine.dispatch_input(&mut ctx, InputEvent::EquipToggle);
        machine.dispatch_input(&mut ctx, InputEvent::SecondaryHeldDown);
        assert_eq!(ctx.current_state(), StateId::RangedWeaponAim);
        (machine, ctx)
    }

    #[test]
    fn test_shot_spends_exactly_one_round() {
        let rig = Rig::new();
        rig.give_holder("arrow", 5, 10);
        let (mut machine, mut ctx) = aiming(&rig);

        machine.dispatch_input(&mut ctx, InputEvent::PrimaryAction);
        assert_eq!(ctx.current_state(), StateId::RangedAttack);
        assert_eq!(rig.rounds(), Some(4));
        assert_eq!(rig.probe().shots, 1);
        assert!(!rig.probe().aim_active);

        // No hit reported at all, still one round spent
        machine.deliver(&mut ctx, Signal::FinishedAttacking);
        assert_eq!(ctx.current_state(), StateId::Movement);
        assert_eq!(rig.rounds(), Some(4));
        assert!(ctx.signals().counts(SignalKind::AttackHit).is_balanced());
        assert!(ctx.signals().counts(SignalKind::FinishedAttacking).is_balanced());
    }

    #[test]
    fn test_empty_holder_goes_to_reload() {
        let rig = Rig::new();
        rig.give_holder("arrow", 0, 10);
        rig.store("arrow", 20);
        let (mut machine, mut ctx) = aiming(&rig);

        machine.dispatch_input(&mut ctx, InputEvent::PrimaryAction);
        assert_eq!(ctx.current_state(), StateId::ReloadRangedWeapon);
        assert_eq!(rig.probe().shots, 0);
        assert_eq!(rig.probe().rounds_consumed, 0);
        assert_eq!(ctx.signals().counts(SignalKind::FinishedAttacking).subscribed, 0);
    }

    #[test]
    fn test_missing_holder_returns_to_previous() {
        let rig = Rig::new();
        let (mut machine, mut ctx) = aiming(&rig);

        machine.dispatch_input(&mut ctx, InputEvent::PrimaryAction);
        assert_eq!(ctx.current_state(), StateId::RangedWeaponAim);
        assert_eq!(ctx.previous_state(), StateId::RangedAttack);
        assert_eq!(rig.probe().shots, 0);
    }

    #[test]
    fn test_hits_damage_and_push() {
        let rig = Rig::new();
        rig.give_holder("arrow", 3, 10);
        rig.add_target(9, 100, true);
        let (mut machine, mut ctx) = aiming(&rig);
        machine.dispatch_input(&mut ctx, InputEvent::PrimaryAction);

        machine.deliver(
            &mut ctx,
            Signal::AttackHit(Hit {
                entity: EntityId(9),
                point: Vec3::ONE,
                normal: Vec3::Y,
            }),
        );

        let probe = rig.probe();
        let bow = rig.weapon("bow");
        assert_eq!(probe.targets[&EntityId(9)].health, 100 - bow.damage);
        assert_relative_eq!(probe.impulses[0].1.y, -bow.impact_force);
        assert_eq!(probe.effects.len(), 1);
        assert_eq!(probe.effects[0].lifetime, ctx.config.impact_effect_lifetime);
    }

    #[test]
    fn test_reload_fills_from_storage() {
        let rig = Rig::new();
        rig.give_holder("arrow", 2, 10);
        rig.store("arrow", 5);
        let (mut machine, mut ctx) = aiming(&rig);

        machine.dispatch_input(&mut ctx, InputEvent::Reload);
        assert_eq!(ctx.current_state(), StateId::ReloadRangedWeapon);
        assert!(rig.probe().triggers.contains(&"reload".to_string()));

        machine.deliver(&mut ctx, Signal::AnimationFunctionTrigger);
        assert_eq!(ctx.current_state(), StateId::RangedAttackStance);
        assert_eq!(rig.rounds(), Some(7));
        assert_eq!(rig.stored("arrow"), 0);
    }

    #[test]
    fn test_reload_skipped_without_reserve() {
        let rig = Rig::new();
        rig.give_holder("arrow", 2, 10);
        let (mut machine, mut ctx) = aiming(&rig);

        machine.dispatch_input(&mut ctx, InputEvent::Reload);
        assert_eq!(ctx.current_state(), StateId::RangedAttackStance);
        assert!(!rig.probe().triggers.contains(&"reload".to_string()));
    }

    #[test]
    fn test_aim_update_tracks_camera() {
        let rig = Rig::new();
        let (mut machine, mut ctx) = aiming(&rig);
        ctx.motion.direction = Vec3::new(0.0, 0.0, -1.0);
        ctx.motion.movement = Vec2::new(1.0, 0.0);

        machine.update(&mut ctx);
        let probe = rig.probe();
        assert_eq!(probe.detections, vec![Vec3::new(0.0, 0.0, -1.0)]);
        assert_eq!(probe.look_direction, Some(Vec3::new(0.0, 0.0, -1.0)));
        assert_eq!(probe.last_movement, Some(Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn test_aim_released_back_to_stance() {
        let rig = Rig::new();
        let (mut machine, mut ctx) = aiming(&rig);

        machine.dispatch_input(&mut ctx, InputEvent::SecondaryUp);
        assert_eq!(ctx.current_state(), StateId::RangedAttackStance);
        assert_eq!(ctx.weapon, Some(ItemId::new("bow")));
    }
}
