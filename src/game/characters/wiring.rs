// Cross-system wiring
//
// Composes the inventory with the crafting and ammo systems and routes
// inventory notifications back to the agent. No game rules live here.
// Notifications are posted to the agent mailbox instead of being run in
// place, so no system is ever re-entered while it is still borrowed.

use super::animation::Signal;
use super::capabilities::{
    AmmoPort, AmmoSystem, CraftingPort, CraftingSystem, Inventory, Listener, Recipe, Shared,
};
use crate::game::combat::ItemId;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Something that happened outside the state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AgentEvent {
    /// Animator, detection or block callback
    Signal(Signal),
    /// Inventory contents changed
    InventoryStateChanged,
    /// A structure item was used from the inventory
    StructureUseRequested,
    /// An unblocked attack landed on the player
    DamageTaken(i32),
}

/// Single-threaded FIFO shared between the agent and its collaborators
#[derive(Debug, Clone, Default)]
pub struct Mailbox {
    queue: Rc<RefCell<VecDeque<AgentEvent>>>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for the agent
    pub fn post(&self, event: AgentEvent) {
        self.queue.borrow_mut().push_back(event);
    }

    /// Take the oldest queued event
    pub fn take(&self) -> Option<AgentEvent> {
        self.queue.borrow_mut().pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// A listener that posts `event` each time it is invoked
    pub fn listener(&self, event: AgentEvent) -> Listener {
        let mailbox = self.clone();
        Box::new(move || mailbox.post(event))
    }
}

/// Inventory seen through the crafting and ammo ports
pub struct InventoryPort {
    inventory: Shared<dyn Inventory>,
}

impl InventoryPort {
    pub fn new(inventory: Shared<dyn Inventory>) -> Self {
        Self { inventory }
    }
}

impl CraftingPort for InventoryPort {
    fn check_resource_availability(&self, id: &ItemId, count: u32) -> bool {
        self.inventory.borrow().check_resource_availability(id, count)
    }

    fn check_inventory_is_full(&self) -> bool {
        self.inventory.borrow().check_inventory_is_full()
    }

    fn craft_item(&mut self, recipe: &Recipe) {
        self.inventory.borrow_mut().craft_item(recipe);
    }
}

impl AmmoPort for InventoryPort {
    fn ammo_availability(&self, id: &ItemId, count: u32) -> bool {
        self.inventory.borrow().check_resource_availability(id, count)
    }

    fn request_ammo_items(&mut self, id: &ItemId, count: u32) -> u32 {
        self.inventory.borrow_mut().remove_item_count(id, count)
    }

    fn count_in_storage(&self, id: &ItemId) -> u32 {
        self.inventory.borrow().item_amount_in_storage(id)
    }

    fn equipped_item(&self) -> Option<ItemId> {
        self.inventory.borrow().equipped_weapon_id()
    }
}

/// The systems composed around the agent
pub struct SystemWiring {
    pub inventory: Shared<dyn Inventory>,
    pub crafting: Shared<dyn CraftingSystem>,
    pub ammo: Shared<dyn AmmoSystem>,
    pub mailbox: Mailbox,
}

impl SystemWiring {
    /// Connect every system to the others. Each connection replaces the
    /// previous one, so calling this again after re-initialising a system
    /// leaves exactly one connection in place.
    pub fn connect(&self) {
        self.crafting
            .borrow_mut()
            .connect_inventory(Box::new(InventoryPort::new(self.inventory.clone())));
        self.ammo
            .borrow_mut()
            .connect_inventory(Box::new(InventoryPort::new(self.inventory.clone())));

        let mut inventory = self.inventory.borrow_mut();
        inventory.set_state_changed_listener(self.mailbox.listener(AgentEvent::InventoryStateChanged));
        inventory.set_structure_use_listener(self.mailbox.listener(AgentEvent::StructureUseRequested));

        log::debug!("Inventory, crafting and ammo systems wired");
    }

    /// Inventory changed: let crafting re-evaluate what can be made
    pub fn on_inventory_state_changed(&self) {
        self.crafting.borrow_mut().recheck_ingredients();
    }
}
