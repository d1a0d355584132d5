// Transition engine and input router

use super::{Outcome, StateRegistry, Transition};
use crate::engine::input::InputEvent;
use crate::game::characters::animation::Signal;
use crate::game::characters::context::AgentContext;

/// Drives the registry: exactly one state is current, and every change of
/// state goes through `transition_to`.
pub struct StateMachine {
    registry: StateRegistry,
    started: bool,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            registry: StateRegistry::new(),
            started: false,
        }
    }

    /// Run the entry hook of the initial state. Only the first call does
    /// anything.
    pub fn start(&mut self, ctx: &mut AgentContext) {
        if self.started {
            return;
        }
        self.started = true;

        let initial = ctx.current_state();
        log::debug!("Starting in {}", initial);
        let outcome = self.registry.get_mut(initial).enter(ctx, None);
        self.follow(ctx, outcome);
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Leave the current state and enter `transition.to`.
    ///
    /// Entry hooks may ask for a further transition. Those are carried out
    /// here, one after the other, so a transition requested while another
    /// one is entering always completes. A chain longer than
    /// `max_chained_transitions` is cut.
    pub fn transition_to(&mut self, ctx: &mut AgentContext, transition: Transition) {
        let limit = ctx.config.max_chained_transitions.max(1);
        let mut pending = Some(transition);
        let mut chained = 0;

        while let Some(Transition { to, weapon }) = pending.take() {
            if chained == limit {
                log::error!(
                    "Transition chain cut after {} steps: {} -> {} dropped",
                    chained,
                    ctx.current_state(),
                    to
                );
                return;
            }
            chained += 1;

            let from = ctx.current_state();
            let outgoing = ctx.activation();
            self.registry.get_mut(from).exit(ctx, to);

            let leaked = ctx.signals.release(outgoing);
            if leaked > 0 {
                log::warn!("{} exited with {} live subscription(s), released", from, leaked);
            }

            ctx.swap_state(to);
            log::debug!("{} -> {}", from, to);

            pending = self.registry.get_mut(to).enter(ctx, weapon);
        }
    }

    /// Forward one input event, unmodified, to the current state
    pub fn dispatch_input(&mut self, ctx: &mut AgentContext, event: InputEvent) {
        let current = ctx.current_state();
        let state = self.registry.get_mut(current);
        let outcome = match event {
            InputEvent::Jump => state.on_jump(ctx),
            InputEvent::Hotbar(slot) => state.on_hotbar(ctx, slot),
            InputEvent::InventoryToggle => state.on_inventory_toggle(ctx),
            InputEvent::PrimaryAction => state.on_primary(ctx),
            InputEvent::SecondaryClick => state.on_secondary_click(ctx),
            InputEvent::SecondaryHeldDown => state.on_secondary_held(ctx),
            InputEvent::SecondaryUp => state.on_secondary_up(ctx),
            InputEvent::MenuToggle => state.on_menu_toggle(ctx),
            InputEvent::Reload => state.on_reload(ctx),
            InputEvent::EquipToggle => state.on_equip_toggle(ctx),
            InputEvent::Placement => state.on_placement(ctx),
            InputEvent::Interact => state.on_interact(ctx),
        };

        if outcome.is_none() {
            log::trace!("{} did not act on {:?}", current, event);
        }
        self.follow(ctx, outcome);
    }

    /// Per-frame hook of the current state
    pub fn update(&mut self, ctx: &mut AgentContext) {
        let outcome = self.registry.get_mut(ctx.current_state()).update(ctx);
        self.follow(ctx, outcome);
    }

    /// Fixed-timestep hook of the current state
    pub fn fixed_update(&mut self, ctx: &mut AgentContext) {
        let outcome = self.registry.get_mut(ctx.current_state()).fixed_update(ctx);
        self.follow(ctx, outcome);
    }

    /// Hand a collaborator signal to the activation waiting for it. Signals
    /// nobody waits for, or that were subscribed by an activation that has
    /// since ended, are dropped.
    pub fn deliver(&mut self, ctx: &mut AgentContext, signal: Signal) {
        let current = ctx.activation();
        if !ctx.signals.route(signal.kind(), current) {
            return;
        }
        let outcome = self.registry.get_mut(current.state).on_signal(ctx, signal);
        self.follow(ctx, outcome);
    }

    fn follow(&mut self, ctx: &mut AgentContext, outcome: Outcome) {
        if let Some(transition) = outcome {
            self.transition_to(ctx, transition);
        }
    }
}
