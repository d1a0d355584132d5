// Inventory, menu, placement and interaction states

use super::locomotion::locomote;
use super::{go, CharacterState, Outcome, StateId};
use crate::game::characters::animation::{params, Delivery, Signal, SignalKind};
use crate::game::characters::context::AgentContext;
use crate::game::combat::ItemId;

/// Inventory screen open, character stands still
pub struct InventoryState;

impl CharacterState for InventoryState {
    fn enter(&mut self, ctx: &mut AgentContext, _weapon: Option<ItemId>) -> Outcome {
        ctx.caps.movement.stop_movement();
        ctx.caps.inventory.borrow_mut().set_inventory_visible(true);
        None
    }

    fn exit(&mut self, ctx: &mut AgentContext, _next: StateId) {
        ctx.caps.inventory.borrow_mut().set_inventory_visible(false);
    }

    fn on_inventory_toggle(&mut self, _ctx: &mut AgentContext) -> Outcome {
        go(StateId::Movement)
    }

    fn on_menu_toggle(&mut self, _ctx: &mut AgentContext) -> Outcome {
        go(StateId::Menu)
    }

    /// Structure items are used from the inventory screen
    fn on_placement(&mut self, _ctx: &mut AgentContext) -> Outcome {
        go(StateId::Placement)
    }
}

/// Pause menu open
pub struct MenuState;

impl CharacterState for MenuState {
    fn enter(&mut self, ctx: &mut AgentContext, _weapon: Option<ItemId>) -> Outcome {
        ctx.caps.movement.stop_movement();
        ctx.caps.menu.set_menu_open(true);
        None
    }

    fn exit(&mut self, ctx: &mut AgentContext, _next: StateId) {
        ctx.caps.menu.set_menu_open(false);
    }

    fn on_menu_toggle(&mut self, _ctx: &mut AgentContext) -> Outcome {
        go(StateId::Movement)
    }
}

/// Placing a structure picked from the inventory
#[derive(Default)]
pub struct PlacementState {
    /// A placement session is open on the tool
    active: bool,
}

impl PlacementState {
    fn cancel(&mut self, ctx: &mut AgentContext) -> Outcome {
        if self.active {
            ctx.caps.placement.cancel();
            self.active = false;
        }
        go(StateId::Movement)
    }
}

impl CharacterState for PlacementState {
    fn enter(&mut self, ctx: &mut AgentContext, _weapon: Option<ItemId>) -> Outcome {
        self.active = ctx.caps.placement.begin();
        if !self.active {
            log::debug!("No structure to place, back to {}", ctx.previous_state());
            return go(ctx.previous_state());
        }
        None
    }

    fn exit(&mut self, ctx: &mut AgentContext, _next: StateId) {
        if self.active {
            ctx.caps.placement.cancel();
            self.active = false;
        }
    }

    fn update(&mut self, ctx: &mut AgentContext) -> Outcome {
        let direction = ctx.motion.direction;
        ctx.caps.placement.preview(direction);
        locomote(ctx);
        None
    }

    fn on_primary(&mut self, ctx: &mut AgentContext) -> Outcome {
        if ctx.caps.placement.confirm() {
            self.active = false;
            return go(StateId::Movement);
        }
        log::trace!("Placement spot rejected");
        None
    }

    fn on_secondary_click(&mut self, ctx: &mut AgentContext) -> Outcome {
        self.cancel(ctx)
    }

    fn on_inventory_toggle(&mut self, ctx: &mut AgentContext) -> Outcome {
        self.cancel(ctx)
    }

    fn on_menu_toggle(&mut self, ctx: &mut AgentContext) -> Outcome {
        self.cancel(ctx)
    }
}

/// Picking up whatever lies within reach
pub struct InteractState;

impl CharacterState for InteractState {
    fn enter(&mut self, ctx: &mut AgentContext, _weapon: Option<ItemId>) -> Outcome {
        ctx.caps.movement.stop_movement();
        ctx.caps.animation.set_trigger(params::INTERACT);
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

        let radius = ctx.caps.detection.detection_radius();
        let pickups = ctx.caps.detection.collect_pickups(radius);
        let mut inventory = ctx.caps.inventory.borrow_mut();
        for stack in &pickups {
            let leftover = inventory.add_to_storage(stack);
            if leftover > 0 {
                log::warn!("Inventory full, {} x {} left behind", leftover, stack.id);
            }
        }
        drop(inventory);

        go(StateId::Movement)
    }
}
