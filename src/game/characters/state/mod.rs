// Character state machine
//
// A closed set of states, one pre-built instance per variant kept in the
// registry for the agent's lifetime. Hooks never transition directly: they
// return the transition they want and the machine carries it out.

mod equipment;
mod locomotion;
mod machine;
mod melee;
mod menus;
mod ranged;
mod stance;

pub use machine::StateMachine;

use super::animation::Signal;
use super::context::AgentContext;
use crate::engine::input::HotbarSlot;
use crate::game::combat::{resolve_hit, Hit, ItemId, WeaponData};
use std::fmt;

use equipment::{EquipItemState, HurtState, UnequipItemState};
use locomotion::{FallingState, JumpState, MovementState};
use melee::{BlockReactionState, BlockStanceState, DefenseState, MeleeComboState, MeleeWeaponAttackState};
use menus::{InteractState, InventoryState, MenuState, PlacementState};
use ranged::{RangedAttackState, RangedWeaponAimState, ReloadState};
use stance::{AttackStanceState, StanceKind};

/// Position in the unarmed melee combo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComboStep {
    One,
    Two,
    Three,
    Four,
}

impl ComboStep {
    pub const ALL: [ComboStep; 4] = [Self::One, Self::Two, Self::Three, Self::Four];

    /// Step that follows this one, None once the chain is exhausted
    pub fn next(&self) -> Option<ComboStep> {
        match self {
            Self::One => Some(Self::Two),
            Self::Two => Some(Self::Three),
            Self::Three => Some(Self::Four),
            Self::Four => None,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
            Self::Three => 2,
            Self::Four => 3,
        }
    }

    /// Animator trigger of this step
    pub fn trigger(&self) -> &'static str {
        match self {
            Self::One => "attack1",
            Self::Two => "attack2",
            Self::Three => "attack3",
            Self::Four => "attack4",
        }
    }
}

/// Identifies one state of the character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateId {
    Movement,
    Jump,
    Falling,
    Inventory,
    Interact,
    Menu,
    Placement,
    MeleeUnarmedAttack(ComboStep),
    MeleeWeaponAttack,
    RangedAttack,
    MeleeAttackStance,
    RangedAttackStance,
    RangedWeaponAim,
    ReloadRangedWeapon,
    EquipItem,
    UnequipItem,
    BlockStance,
    BlockReaction,
    Defense,
    Hurt,
}

impl Default for StateId {
    fn default() -> Self {
        Self::Movement
    }
}

impl StateId {
    /// Get the display name of this state
    pub fn name(&self) -> &'static str {
        match self {
            Self::Movement => "Movement",
            Self::Jump => "Jump",
            Self::Falling => "Falling",
            Self::Inventory => "Inventory",
            Self::Interact => "Interact",
            Self::Menu => "Menu",
            Self::Placement => "Placement",
            Self::MeleeUnarmedAttack(ComboStep::One) => "MeleeUnarmedAttack1",
            Self::MeleeUnarmedAttack(ComboStep::Two) => "MeleeUnarmedAttack2",
            Self::MeleeUnarmedAttack(ComboStep::Three) => "MeleeUnarmedAttack3",
            Self::MeleeUnarmedAttack(ComboStep::Four) => "MeleeUnarmedAttack4",
            Self::MeleeWeaponAttack => "MeleeWeaponAttack",
            Self::RangedAttack => "RangedAttack",
            Self::MeleeAttackStance => "MeleeAttackStance",
            Self::RangedAttackStance => "RangedAttackStance",
            Self::RangedWeaponAim => "RangedWeaponAim",
            Self::ReloadRangedWeapon => "ReloadRangedWeapon",
            Self::EquipItem => "EquipItem",
            Self::UnequipItem => "UnequipItem",
            Self::BlockStance => "BlockStance",
            Self::BlockReaction => "BlockReaction",
            Self::Defense => "Defense",
            Self::Hurt => "Hurt",
        }
    }

    /// Check if this is one of the two attack stances
    pub fn is_attack_stance(&self) -> bool {
        matches!(self, Self::MeleeAttackStance | Self::RangedAttackStance)
    }

    /// Check if this is a melee attack or a guard played out of the melee
    /// stance (the stance keeps its aim visuals across these)
    pub fn is_melee_action(&self) -> bool {
        matches!(
            self,
            Self::MeleeUnarmedAttack(_)
                | Self::MeleeWeaponAttack
                | Self::BlockStance
                | Self::BlockReaction
                | Self::Defense
        )
    }

    /// Check if this is a ranged action played out of the ranged stance
    pub fn is_ranged_action(&self) -> bool {
        matches!(
            self,
            Self::RangedWeaponAim | Self::RangedAttack | Self::ReloadRangedWeapon
        )
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A requested change of state. The weapon override is handed to the
/// next state's entry hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub to: StateId,
    pub weapon: Option<ItemId>,
}

impl Transition {
    pub fn to(state: StateId) -> Self {
        Self {
            to: state,
            weapon: None,
        }
    }

    pub fn with_weapon(state: StateId, weapon: ItemId) -> Self {
        Self {
            to: state,
            weapon: Some(weapon),
        }
    }
}

/// What a hook asks of the machine
pub type Outcome = Option<Transition>;

/// Shorthand for a hook that wants to leave for `state`
pub(crate) fn go(state: StateId) -> Outcome {
    Some(Transition::to(state))
}

/// Resolve a detection hit of the running attack
pub(crate) fn strike(ctx: &mut AgentContext, weapon: Option<&WeaponData>, hit: &Hit) {
    let Some(weapon) = weapon else {
        log::warn!("Hit on {:?} ignored: attacking weapon has no item data", hit.entity);
        return;
    };
    let effect = ctx.caps.detection.impact_effect();
    let lifetime = ctx.config.impact_effect_lifetime;
    resolve_hit(ctx.caps.world.as_mut(), weapon, hit, &effect, lifetime);
}

/// Contract every state implements. Every hook defaults to doing nothing,
/// a state opts in to an input by overriding its hook.
pub trait CharacterState {
    /// Activation starts. Activation-scoped fields are reset here.
    fn enter(&mut self, _ctx: &mut AgentContext, _weapon: Option<ItemId>) -> Outcome {
        None
    }

    /// Activation ends, `next` is about to be entered
    fn exit(&mut self, _ctx: &mut AgentContext, _next: StateId) {}

    /// Once per frame
    fn update(&mut self, _ctx: &mut AgentContext) -> Outcome {
        None
    }

    /// Once per fixed timestep
    fn fixed_update(&mut self, _ctx: &mut AgentContext) -> Outcome {
        None
    }

    fn on_primary(&mut self, _ctx: &mut AgentContext) -> Outcome {
        None
    }

    fn on_secondary_click(&mut self, _ctx: &mut AgentContext) -> Outcome {
        None
    }

    fn on_secondary_held(&mut self, _ctx: &mut AgentContext) -> Outcome {
        None
    }

    fn on_secondary_up(&mut self, _ctx: &mut AgentContext) -> Outcome {
        None
    }

    fn on_jump(&mut self, _ctx: &mut AgentContext) -> Outcome {
        None
    }

    fn on_hotbar(&mut self, _ctx: &mut AgentContext, _slot: HotbarSlot) -> Outcome {
        None
    }

    fn on_inventory_toggle(&mut self, _ctx: &mut AgentContext) -> Outcome {
        None
    }

    fn on_menu_toggle(&mut self, _ctx: &mut AgentContext) -> Outcome {
        None
    }

    fn on_reload(&mut self, _ctx: &mut AgentContext) -> Outcome {
        None
    }

    fn on_equip_toggle(&mut self, _ctx: &mut AgentContext) -> Outcome {
        None
    }

    fn on_placement(&mut self, _ctx: &mut AgentContext) -> Outcome {
        None
    }

    fn on_interact(&mut self, _ctx: &mut AgentContext) -> Outcome {
        None
    }

    /// A signal this activation subscribed to has been routed to it
    fn on_signal(&mut self, _ctx: &mut AgentContext, _signal: Signal) -> Outcome {
        None
    }
}

/// One instance of every state, reused for the agent's lifetime
pub struct StateRegistry {
    movement: MovementState,
    jump: JumpState,
    falling: FallingState,
    inventory: InventoryState,
    interact: InteractState,
    menu: MenuState,
    placement: PlacementState,
    combo: [MeleeComboState; 4],
    melee_weapon_attack: MeleeWeaponAttackState,
    ranged_attack: RangedAttackState,
    melee_stance: AttackStanceState,
    ranged_stance: AttackStanceState,
    ranged_aim: RangedWeaponAimState,
    reload: ReloadState,
    equip_item: EquipItemState,
    unequip_item: UnequipItemState,
    block_stance: BlockStanceState,
    block_reaction: BlockReactionState,
    defense: DefenseState,
    hurt: HurtState,
}

impl Default for StateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StateRegistry {
    pub fn new() -> Self {
        Self {
            movement: MovementState,
            jump: JumpState,
            falling: FallingState,
            inventory: InventoryState,
            interact: InteractState,
            menu: MenuState,
            placement: PlacementState::default(),
            combo: ComboStep::ALL.map(MeleeComboState::new),
            melee_weapon_attack: MeleeWeaponAttackState::default(),
            ranged_attack: RangedAttackState::default(),
            melee_stance: AttackStanceState::new(StanceKind::Melee),
            ranged_stance: AttackStanceState::new(StanceKind::Ranged),
            ranged_aim: RangedWeaponAimState,
            reload: ReloadState,
            equip_item: EquipItemState::default(),
            unequip_item: UnequipItemState,
            block_stance: BlockStanceState,
            block_reaction: BlockReactionState,
            defense: DefenseState,
            hurt: HurtState,
        }
    }

    /// The instance behind `id`
    pub fn get_mut(&mut self, id: StateId) -> &mut dyn CharacterState {
        match id {
            StateId::Movement => &mut self.movement,
            StateId::Jump => &mut self.jump,
            StateId::Falling => &mut self.falling,
            StateId::Inventory => &mut self.inventory,
            StateId::Interact => &mut self.interact,
            StateId::Menu => &mut self.menu,
            StateId::Placement => &mut self.placement,
            StateId::MeleeUnarmedAttack(step) => &mut self.combo[step.index()],
            StateId::MeleeWeaponAttack => &mut self.melee_weapon_attack,
            StateId::RangedAttack => &mut self.ranged_attack,
            StateId::MeleeAttackStance => &mut self.melee_stance,
            StateId::RangedAttackStance => &mut self.ranged_stance,
            StateId::RangedWeaponAim => &mut self.ranged_aim,
            StateId::ReloadRangedWeapon => &mut self.reload,
            StateId::EquipItem => &mut self.equip_item,
            StateId::UnequipItem => &mut self.unequip_item,
            StateId::BlockStance => &mut self.block_stance,
            StateId::BlockReaction => &mut self.block_reaction,
            StateId::Defense => &mut self.defense,
            StateId::Hurt => &mut self.hurt,
        }
    }
}
