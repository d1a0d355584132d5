// Collaborator capabilities consumed by the state machine
//
// Each trait is the narrow contract of an external system. Implementations
// live in the host game (physics, animator, UI); the core never looks them
// up globally, they are injected once through `Capabilities`.

use crate::engine::input::HotbarSlot;
use crate::game::combat::{EffectId, EntityId, ItemId, WeaponData};
use glam::{Vec2, Vec3};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Single-threaded shared ownership for systems wired to each other
pub type Shared<T> = Rc<RefCell<T>>;

/// Notification callback installed on a collaborator
pub type Listener = Box<dyn FnMut()>;

/// A stack of identical items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStack {
    pub id: ItemId,
    pub count: u32,
}

impl ItemStack {
    pub fn new(id: ItemId, count: u32) -> Self {
        Self { id, count }
    }
}

/// A crafting recipe: consumes the ingredients, produces the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub output: ItemStack,
    pub ingredients: Vec<ItemStack>,
}

/// Character locomotion
pub trait Movement {
    fn stop_movement(&mut self);
    fn handle_movement(&mut self, input: Vec2);
    fn jump(&mut self);
    fn teleport_to(&mut self, position: Vec3);
    fn set_jump_completed_false(&mut self);
    fn is_grounded(&self) -> bool;
    /// Airborne and moving downward
    fn is_falling(&self) -> bool;
    fn position(&self) -> Vec3;
}

/// Animator parameters. Completion callbacks come back as signals.
pub trait Animation {
    fn set_bool(&mut self, name: &str, value: bool);
    fn set_trigger(&mut self, name: &str);
    fn trigger_shoot_animation(&mut self);
}

/// Camera zoom, aim flag and crosshair
pub trait Aim {
    fn set_zoom_in(&mut self);
    fn set_zoom_out(&mut self);
    fn set_aim_active(&mut self, active: bool);
    fn set_crosshair_visible(&mut self, visible: bool);
    fn look_towards(&mut self, direction: Vec3);
}

/// Hit and proximity queries
pub trait Detection {
    fn perform_detection(&mut self, direction: Vec3);
    /// Reach of hit and pickup queries around the character
    fn detection_radius(&self) -> f32;
    fn impact_effect(&self) -> EffectId;
    /// Remove and return the pickups within `radius`
    fn collect_pickups(&mut self, radius: f32) -> Vec<ItemStack>;
}

/// Blocking flag; success is reported as a signal
pub trait Block {
    fn set_blocking(&mut self, blocking: bool);
    fn is_blocking(&self) -> bool;
}

/// Magazine of the ranged weapon currently in hand
pub trait AmmoHolder {
    fn is_empty(&self) -> bool;
    fn is_full(&self) -> bool;
    fn consume_one(&mut self);
    /// Item the magazine is refilled with
    fn ammo_item(&self) -> ItemId;
    fn missing_rounds(&self) -> u32;
    fn load(&mut self, rounds: u32);
}

/// Hand and back attachment points of the character
pub trait ItemSlot {
    /// Ammo holder of the item in hand, if it has one
    fn ammo_holder(&mut self) -> Option<&mut dyn AmmoHolder>;
    /// A weapon is drawn while another one is still carried on the back
    fn is_weapon_on_back_and_in_hand(&self) -> bool;
    fn attach_to_back(&mut self, weapon: &ItemId);
    fn swap_back_item_to_hand(&mut self);
    fn swap_hand_item_to_back(&mut self);
}

/// Static item data
pub trait ItemCatalog {
    fn weapon(&self, id: &ItemId) -> Option<WeaponData>;
}

/// Everything attacks can touch
pub trait World {
    /// Returns false when the entity has no way to receive damage
    fn apply_damage(&mut self, entity: EntityId, amount: i32) -> bool;
    /// Returns false when the entity has no simulated body
    fn apply_impulse(&mut self, entity: EntityId, impulse: Vec3) -> bool;
    fn spawn_effect(&mut self, effect: &EffectId, point: Vec3, normal: Vec3, lifetime: Duration);
}

/// Structure placement preview
pub trait PlacementTool {
    /// Start placing the selected structure, false if there is none
    fn begin(&mut self) -> bool;
    fn preview(&mut self, direction: Vec3);
    /// Place the structure, false if the spot is invalid
    fn confirm(&mut self) -> bool;
    fn cancel(&mut self);
}

/// Pause menu
pub trait GameMenu {
    fn set_menu_open(&mut self, open: bool);
}

/// Inventory data model as seen by the character
pub trait Inventory {
    fn check_resource_availability(&self, id: &ItemId, count: u32) -> bool;
    fn check_inventory_is_full(&self) -> bool;
    fn craft_item(&mut self, recipe: &Recipe);
    /// Remove up to `count` items, returns how many were removed
    fn remove_item_count(&mut self, id: &ItemId, count: u32) -> u32;
    fn item_amount_in_storage(&self, id: &ItemId) -> u32;
    fn equipped_weapon_id(&self) -> Option<ItemId>;
    /// Store a stack, returns the amount that did not fit
    fn add_to_storage(&mut self, stack: &ItemStack) -> u32;
    fn use_hotbar_slot(&mut self, slot: HotbarSlot);
    fn set_inventory_visible(&mut self, visible: bool);
    /// Replaces any previously installed listener
    fn set_state_changed_listener(&mut self, listener: Listener);
    /// Replaces any previously installed listener
    fn set_structure_use_listener(&mut self, listener: Listener);
}

/// Inventory queries and mutations the crafting system needs
pub trait CraftingPort {
    fn check_resource_availability(&self, id: &ItemId, count: u32) -> bool;
    fn check_inventory_is_full(&self) -> bool;
    fn craft_item(&mut self, recipe: &Recipe);
}

/// Inventory queries and mutations the ammo system needs
pub trait AmmoPort {
    fn ammo_availability(&self, id: &ItemId, count: u32) -> bool;
    fn request_ammo_items(&mut self, id: &ItemId, count: u32) -> u32;
    fn count_in_storage(&self, id: &ItemId) -> u32;
    fn equipped_item(&self) -> Option<ItemId>;
}

pub trait CraftingSystem {
    /// Replaces any previous connection
    fn connect_inventory(&mut self, port: Box<dyn CraftingPort>);
    fn recheck_ingredients(&mut self);
}

pub trait AmmoSystem {
    /// Replaces any previous connection
    fn connect_inventory(&mut self, port: Box<dyn AmmoPort>);
    /// Reserve rounds available for `ammo`
    fn has_reserve(&self, ammo: &ItemId) -> bool;
    /// Refill `holder` from storage, returns the rounds loaded
    fn reload(&mut self, holder: &mut dyn AmmoHolder) -> u32;
}

/// Every capability the agent is composed from
pub struct Capabilities {
    pub movement: Box<dyn Movement>,
    pub animation: Box<dyn Animation>,
    pub aim: Box<dyn Aim>,
    pub detection: Box<dyn Detection>,
    pub block: Box<dyn Block>,
    pub item_slot: Box<dyn ItemSlot>,
    pub items: Box<dyn ItemCatalog>,
    pub world: Box<dyn World>,
    pub placement: Box<dyn PlacementTool>,
    pub menu: Box<dyn GameMenu>,
    pub inventory: Shared<dyn Inventory>,
    pub ammo: Shared<dyn AmmoSystem>,
}
