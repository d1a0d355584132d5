// Recording fakes of every capability, shared by the unit tests

use super::capabilities::{
    Aim, AmmoHolder, AmmoPort, AmmoSystem, Animation, Block, Capabilities, CraftingPort,
    CraftingSystem, Detection, GameMenu, Inventory, ItemCatalog, ItemSlot, ItemStack, Listener,
    Movement, PlacementTool, Recipe, Shared, World,
};
use super::character::Agent;
use super::config::AgentConfig;
use super::context::AgentContext;
use super::wiring::{Mailbox, SystemWiring};
use crate::engine::input::HotbarSlot;
use crate::game::combat::{EffectId, EntityId, ItemId, WeaponData, WeaponKind};
use glam::{Vec2, Vec3};
use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct Target {
    pub health: i32,
    pub simulated: bool,
}

#[derive(Debug, Clone)]
pub struct SpawnedEffect {
    pub effect: EffectId,
    pub point: Vec3,
    pub lifetime: Duration,
}

#[derive(Debug, Clone)]
pub struct HolderProbe {
    pub ammo: ItemId,
    pub rounds: u32,
    pub capacity: u32,
}

/// Everything the fakes record, plus the knobs tests turn
#[derive(Debug)]
pub struct Probe {
    // Movement
    pub grounded: bool,
    pub falling: bool,
    pub position: Vec3,
    pub stops: u32,
    pub jumps: u32,
    pub jump_completed_reset: bool,
    pub last_movement: Option<Vec2>,
    pub teleports: Vec<Vec3>,

    // Animation
    pub triggers: Vec<String>,
    pub bools: HashMap<String, bool>,
    pub shots: u32,

    // Aim
    pub aim_active: bool,
    pub zoomed_in: bool,
    pub crosshair_visible: bool,
    pub look_direction: Option<Vec3>,

    // Detection and world
    pub detection_radius: f32,
    pub pickup_radius: Option<f32>,
    pub detections: Vec<Vec3>,
    pub pickups: Vec<ItemStack>,
    pub targets: HashMap<EntityId, Target>,
    pub impulses: Vec<(EntityId, Vec3)>,
    pub effects: Vec<SpawnedEffect>,

    // Block
    pub blocking: bool,

    // Item slot
    pub holder: Option<HolderProbe>,
    pub rounds_consumed: u32,
    pub weapon_on_back_and_in_hand: bool,
    pub back_attachments: Vec<ItemId>,
    pub hand_draws: u32,
    pub hand_stows: u32,

    // Items and inventory
    pub catalog: HashMap<ItemId, WeaponData>,
    pub storage: HashMap<ItemId, u32>,
    pub equipped: Option<ItemId>,
    pub hotbar: HashMap<u8, ItemId>,
    pub hotbar_uses: Vec<u8>,
    pub inventory_visible: bool,

    // Placement and menu
    pub placement_available: bool,
    pub placement_spot_valid: bool,
    pub previews: u32,
    pub placements_confirmed: u32,
    pub placements_cancelled: u32,
    pub menu_open: bool,

    // Crafting and ammo systems
    pub crafting_connections: u32,
    pub crafting_port_connected: bool,
    pub ammo_port_connected: bool,
    pub crafting_rechecks: u32,
}

impl Default for Probe {
    fn default() -> Self {
        let catalog = [
            WeaponData::new(ItemId::new("unarmed"), WeaponKind::Melee, 5, 2.0),
            WeaponData::new(ItemId::new("sword"), WeaponKind::Melee, 20, 10.0),
            WeaponData::new(ItemId::new("club"), WeaponKind::Melee, 12, 8.0),
            WeaponData::new(ItemId::new("bow"), WeaponKind::Ranged, 25, 40.0),
        ]
        .into_iter()
        .map(|data| (data.id.clone(), data))
        .collect();

        Self {
            grounded: true,
            falling: false,
            position: Vec3::ZERO,
            stops: 0,
            jumps: 0,
            jump_completed_reset: false,
            last_movement: None,
            teleports: Vec::new(),
            triggers: Vec::new(),
            bools: HashMap::new(),
            shots: 0,
            aim_active: false,
            zoomed_in: false,
            crosshair_visible: false,
            look_direction: None,
            detection_radius: 2.0,
            pickup_radius: None,
            detections: Vec::new(),
            pickups: Vec::new(),
            targets: HashMap::new(),
            impulses: Vec::new(),
            effects: Vec::new(),
            blocking: false,
            holder: None,
            rounds_consumed: 0,
            weapon_on_back_and_in_hand: false,
            back_attachments: Vec::new(),
            hand_draws: 0,
            hand_stows: 0,
            catalog,
            storage: HashMap::new(),
            equipped: None,
            hotbar: HashMap::new(),
            hotbar_uses: Vec::new(),
            inventory_visible: false,
            placement_available: true,
            placement_spot_valid: true,
            previews: 0,
            placements_confirmed: 0,
            placements_cancelled: 0,
            menu_open: false,
            crafting_connections: 0,
            crafting_port_connected: false,
            ammo_port_connected: false,
            crafting_rechecks: 0,
        }
    }
}

type ProbeRef = Rc<RefCell<Probe>>;

struct FakeMovement(ProbeRef);

impl Movement for FakeMovement {
    fn stop_movement(&mut self) {
        self.0.borrow_mut().stops += 1;
    }

    fn handle_movement(&mut self, input: Vec2) {
        self.0.borrow_mut().last_movement = Some(input);
    }

    fn jump(&mut self) {
        self.0.borrow_mut().jumps += 1;
    }

    fn teleport_to(&mut self, position: Vec3) {
        let mut probe = self.0.borrow_mut();
        probe.position = position;
        probe.teleports.push(position);
    }

    fn set_jump_completed_false(&mut self) {
        self.0.borrow_mut().jump_completed_reset = true;
    }

    fn is_grounded(&self) -> bool {
        self.0.borrow().grounded
    }

    fn is_falling(&self) -> bool {
        self.0.borrow().falling
    }

    fn position(&self) -> Vec3 {
        self.0.borrow().position
    }
}

struct FakeAnimation(ProbeRef);

impl Animation for FakeAnimation {
    fn set_bool(&mut self, name: &str, value: bool) {
        self.0.borrow_mut().bools.insert(name.to_string(), value);
    }

    fn set_trigger(&mut self, name: &str) {
        self.0.borrow_mut().triggers.push(name.to_string());
    }

    fn trigger_shoot_animation(&mut self) {
        self.0.borrow_mut().shots += 1;
    }
}

struct FakeAim(ProbeRef);

impl Aim for FakeAim {
    fn set_zoom_in(&mut self) {
        self.0.borrow_mut().zoomed_in = true;
    }

    fn set_zoom_out(&mut self) {
        self.0.borrow_mut().zoomed_in = false;
    }

    fn set_aim_active(&mut self, active: bool) {
        self.0.borrow_mut().aim_active = active;
    }

    fn set_crosshair_visible(&mut self, visible: bool) {
        self.0.borrow_mut().crosshair_visible = visible;
    }

    fn look_towards(&mut self, direction: Vec3) {
        self.0.borrow_mut().look_direction = Some(direction);
    }
}

struct FakeDetection(ProbeRef);

impl Detection for FakeDetection {
    fn perform_detection(&mut self, direction: Vec3) {
        self.0.borrow_mut().detections.push(direction);
    }

    fn detection_radius(&self) -> f32 {
        self.0.borrow().detection_radius
    }

    fn impact_effect(&self) -> EffectId {
        EffectId("impact".into())
    }

    fn collect_pickups(&mut self, radius: f32) -> Vec<ItemStack> {
        let mut probe = self.0.borrow_mut();
        probe.pickup_radius = Some(radius);
        std::mem::take(&mut probe.pickups)
    }
}

struct FakeBlock(ProbeRef);

impl Block for FakeBlock {
    fn set_blocking(&mut self, blocking: bool) {
        self.0.borrow_mut().blocking = blocking;
    }

    fn is_blocking(&self) -> bool {
        self.0.borrow().blocking
    }
}

struct FakeHolder(ProbeRef);

impl FakeHolder {
    fn read<T>(&self, f: impl FnOnce(&HolderProbe) -> T, fallback: T) -> T {
        self.0.borrow().holder.as_ref().map_or(fallback, f)
    }
}

impl AmmoHolder for FakeHolder {
    fn is_empty(&self) -> bool {
        self.read(|h| h.rounds == 0, true)
    }

    fn is_full(&self) -> bool {
        self.read(|h| h.rounds >= h.capacity, true)
    }

    fn consume_one(&mut self) {
        let mut probe = self.0.borrow_mut();
        if let Some(holder) = probe.holder.as_mut() {
            holder.rounds = holder.rounds.saturating_sub(1);
        }
        probe.rounds_consumed += 1;
    }

    fn ammo_item(&self) -> ItemId {
        self.read(|h| h.ammo.clone(), ItemId::new(""))
    }

    fn missing_rounds(&self) -> u32 {
        self.read(|h| h.capacity.saturating_sub(h.rounds), 0)
    }

    fn load(&mut self, rounds: u32) {
        if let Some(holder) = self.0.borrow_mut().holder.as_mut() {
            holder.rounds = (holder.rounds + rounds).min(holder.capacity);
        }
    }
}

struct FakeItemSlot {
    probe: ProbeRef,
    holder: FakeHolder,
}

impl ItemSlot for FakeItemSlot {
    fn ammo_holder(&mut self) -> Option<&mut dyn AmmoHolder> {
        let present = self.probe.borrow().holder.is_some();
        if present {
            Some(&mut self.holder as &mut dyn AmmoHolder)
        } else {
            None
        }
    }

    fn is_weapon_on_back_and_in_hand(&self) -> bool {
        self.probe.borrow().weapon_on_back_and_in_hand
    }

    fn attach_to_back(&mut self, weapon: &ItemId) {
        self.probe.borrow_mut().back_attachments.push(weapon.clone());
    }

    fn swap_back_item_to_hand(&mut self) {
        self.probe.borrow_mut().hand_draws += 1;
    }

    fn swap_hand_item_to_back(&mut self) {
        self.probe.borrow_mut().hand_stows += 1;
    }
}

struct FakeCatalog(ProbeRef);

impl ItemCatalog for FakeCatalog {
    fn weapon(&self, id: &ItemId) -> Option<WeaponData> {
        self.0.borrow().catalog.get(id).cloned()
    }
}

pub struct FakeWorld(ProbeRef);

impl World for FakeWorld {
    fn apply_damage(&mut self, entity: EntityId, amount: i32) -> bool {
        match self.0.borrow_mut().targets.get_mut(&entity) {
            Some(target) => {
                target.health -= amount;
                true
            }
            None => false,
        }
    }

    fn apply_impulse(&mut self, entity: EntityId, impulse: Vec3) -> bool {
        let mut probe = self.0.borrow_mut();
        let simulated = probe.targets.get(&entity).is_some_and(|t| t.simulated);
        if simulated {
            probe.impulses.push((entity, impulse));
        }
        simulated
    }

    fn spawn_effect(&mut self, effect: &EffectId, point: Vec3, _normal: Vec3, lifetime: Duration) {
        self.0.borrow_mut().effects.push(SpawnedEffect {
            effect: effect.clone(),
            point,
            lifetime,
        });
    }
}

struct FakePlacement(ProbeRef);

impl PlacementTool for FakePlacement {
    fn begin(&mut self) -> bool {
        self.0.borrow().placement_available
    }

    fn preview(&mut self, _direction: Vec3) {
        self.0.borrow_mut().previews += 1;
    }

    fn confirm(&mut self) -> bool {
        let mut probe = self.0.borrow_mut();
        if probe.placement_spot_valid {
            probe.placements_confirmed += 1;
        }
        probe.placement_spot_valid
    }

    fn cancel(&mut self) {
        self.0.borrow_mut().placements_cancelled += 1;
    }
}

struct FakeMenu(ProbeRef);

impl GameMenu for FakeMenu {
    fn set_menu_open(&mut self, open: bool) {
        self.0.borrow_mut().menu_open = open;
    }
}

pub struct FakeInventory {
    probe: ProbeRef,
    state_changed: Option<Listener>,
    structure_use: Option<Listener>,
}

impl FakeInventory {
    fn changed(&mut self) {
        if let Some(listener) = self.state_changed.as_mut() {
            listener();
        }
    }
}

impl Inventory for FakeInventory {
    fn check_resource_availability(&self, id: &ItemId, count: u32) -> bool {
        self.item_amount_in_storage(id) >= count
    }

    fn check_inventory_is_full(&self) -> bool {
        false
    }

    fn craft_item(&mut self, recipe: &Recipe) {
        {
            let mut probe = self.probe.borrow_mut();
            for ingredient in &recipe.ingredients {
                let stored = probe.storage.entry(ingredient.id.clone()).or_default();
                *stored = stored.saturating_sub(ingredient.count);
            }
            *probe.storage.entry(recipe.output.id.clone()).or_default() += recipe.output.count;
        }
        self.changed();
    }

    fn remove_item_count(&mut self, id: &ItemId, count: u32) -> u32 {
        let removed = {
            let mut probe = self.probe.borrow_mut();
            let stored = probe.storage.entry(id.clone()).or_default();
            let removed = count.min(*stored);
            *stored -= removed;
            removed
        };
        self.changed();
        removed
    }

    fn item_amount_in_storage(&self, id: &ItemId) -> u32 {
        self.probe.borrow().storage.get(id).copied().unwrap_or(0)
    }

    fn equipped_weapon_id(&self) -> Option<ItemId> {
        self.probe.borrow().equipped.clone()
    }

    fn add_to_storage(&mut self, stack: &ItemStack) -> u32 {
        *self
            .probe
            .borrow_mut()
            .storage
            .entry(stack.id.clone())
            .or_default() += stack.count;
        self.changed();
        0
    }

    fn use_hotbar_slot(&mut self, slot: HotbarSlot) {
        let mut probe = self.probe.borrow_mut();
        probe.hotbar_uses.push(slot.index());
        if let Some(id) = probe.hotbar.get(&slot.index()).cloned() {
            probe.equipped = Some(id);
        }
    }

    fn set_inventory_visible(&mut self, visible: bool) {
        self.probe.borrow_mut().inventory_visible = visible;
    }

    fn set_state_changed_listener(&mut self, listener: Listener) {
        self.state_changed = Some(listener);
    }

    fn set_structure_use_listener(&mut self, listener: Listener) {
        self.structure_use = Some(listener);
    }
}

pub struct FakeCrafting {
    probe: ProbeRef,
    port: Option<Box<dyn CraftingPort>>,
}

impl CraftingSystem for FakeCrafting {
    fn connect_inventory(&mut self, port: Box<dyn CraftingPort>) {
        self.port = Some(port);
        let mut probe = self.probe.borrow_mut();
        probe.crafting_connections += 1;
        probe.crafting_port_connected = true;
    }

    fn recheck_ingredients(&mut self) {
        self.probe.borrow_mut().crafting_rechecks += 1;
    }
}

pub struct FakeAmmo {
    probe: ProbeRef,
    port: Option<Box<dyn AmmoPort>>,
}

impl AmmoSystem for FakeAmmo {
    fn connect_inventory(&mut self, port: Box<dyn AmmoPort>) {
        self.port = Some(port);
        self.probe.borrow_mut().ammo_port_connected = true;
    }

    fn has_reserve(&self, ammo: &ItemId) -> bool {
        self.port
            .as_ref()
            .is_some_and(|port| port.count_in_storage(ammo) > 0)
    }

    fn reload(&mut self, holder: &mut dyn AmmoHolder) -> u32 {
        let Some(port) = self.port.as_mut() else {
            return 0;
        };
        let loaded = port.request_ammo_items(&holder.ammo_item(), holder.missing_rounds());
        holder.load(loaded);
        loaded
    }
}

/// A full set of fakes around one shared probe
pub struct Rig {
    probe: ProbeRef,
    inventory: Rc<RefCell<FakeInventory>>,
    crafting: Rc<RefCell<FakeCrafting>>,
    ammo: Rc<RefCell<FakeAmmo>>,
}

impl Rig {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let probe: ProbeRef = Rc::new(RefCell::new(Probe::default()));
        Self {
            inventory: Rc::new(RefCell::new(FakeInventory {
                probe: probe.clone(),
                state_changed: None,
                structure_use: None,
            })),
            crafting: Rc::new(RefCell::new(FakeCrafting {
                probe: probe.clone(),
                port: None,
            })),
            ammo: Rc::new(RefCell::new(FakeAmmo {
                probe: probe.clone(),
                port: None,
            })),
            probe,
        }
    }

    pub fn probe(&self) -> Ref<'_, Probe> {
        self.probe.borrow()
    }

    pub fn probe_mut(&self) -> RefMut<'_, Probe> {
        self.probe.borrow_mut()
    }

    pub fn capabilities(&self) -> Capabilities {
        let probe = &self.probe;
        Capabilities {
            movement: Box::new(FakeMovement(probe.clone())),
            animation: Box::new(FakeAnimation(probe.clone())),
            aim: Box::new(FakeAim(probe.clone())),
            detection: Box::new(FakeDetection(probe.clone())),
            block: Box::new(FakeBlock(probe.clone())),
            item_slot: Box::new(FakeItemSlot {
                probe: probe.clone(),
                holder: FakeHolder(probe.clone()),
            }),
            items: Box::new(FakeCatalog(probe.clone())),
            world: Box::new(self.world()),
            placement: Box::new(FakePlacement(probe.clone())),
            menu: Box::new(FakeMenu(probe.clone())),
            inventory: self.inventory.clone(),
            ammo: self.ammo.clone(),
        }
    }

    pub fn world(&self) -> FakeWorld {
        FakeWorld(self.probe.clone())
    }

    /// Wiring around the rig's systems with a fresh mailbox, not yet
    /// connected
    pub fn wiring(&self) -> SystemWiring {
        SystemWiring {
            inventory: self.inventory.clone(),
            crafting: self.crafting.clone(),
            ammo: self.ammo.clone(),
            mailbox: Mailbox::new(),
        }
    }

    /// Connected systems and a context over the fakes, for driving a
    /// state machine by hand
    pub fn context(&self) -> AgentContext {
        self.wiring().connect();
        AgentContext::new(self.capabilities(), AgentConfig::default())
    }

    pub fn agent(&self) -> Agent {
        let crafting: Shared<dyn CraftingSystem> = self.crafting.clone();
        Agent::new(
            self.capabilities(),
            crafting,
            Mailbox::new(),
            AgentConfig::default(),
        )
    }

    /// Invoke the inventory's state-changed listener, if one is installed
    pub fn fire_inventory_changed(&self) {
        self.inventory.borrow_mut().changed();
    }

    /// Invoke the inventory's structure-use listener, if one is installed
    pub fn fire_structure_use(&self) {
        if let Some(listener) = self.inventory.borrow_mut().structure_use.as_mut() {
            listener();
        }
    }

    pub fn add_target(&self, entity: u64, health: i32, simulated: bool) {
        self.probe_mut()
            .targets
            .insert(EntityId(entity), Target { health, simulated });
    }

    pub fn store(&self, id: &str, count: u32) {
        *self.probe_mut().storage.entry(ItemId::new(id)).or_default() += count;
    }

    pub fn stored(&self, id: &str) -> u32 {
        self.probe().storage.get(&ItemId::new(id)).copied().unwrap_or(0)
    }

    pub fn equip(&self, id: &str) {
        self.probe_mut().equipped = Some(ItemId::new(id));
    }

    pub fn add_weapon_to_hotbar(&self, slot: u8, id: &str) {
        self.probe_mut().hotbar.insert(slot, ItemId::new(id));
    }

    /// Put a magazine into the item in hand
    pub fn give_holder(&self, ammo: &str, rounds: u32, capacity: u32) {
        self.probe_mut().holder = Some(HolderProbe {
            ammo: ItemId::new(ammo),
            rounds,
            capacity,
        });
    }

    pub fn rounds(&self) -> Option<u32> {
        self.probe().holder.as_ref().map(|h| h.rounds)
    }

    pub fn weapon(&self, id: &str) -> WeaponData {
        self.probe().catalog[&ItemId::new(id)].clone()
    }

    pub fn unarmed_damage(&self) -> i32 {
        self.weapon("unarmed").damage
    }
}
