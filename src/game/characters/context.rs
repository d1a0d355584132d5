// Agent context - the single mutable record every state operates on

use super::animation::{Activation, Delivery, SignalBridge, SignalKind};
use super::capabilities::Capabilities;
use super::config::AgentConfig;
use super::state::StateId;
use super::stats::PlayerStats;
use crate::game::combat::{ItemId, WeaponData, WeaponKind};
use glam::{Vec2, Vec3};

/// Continuous input sampled once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionInput {
    /// Movement stick/WASD (x = strafe, y = forward)
    pub movement: Vec2,
    /// Camera forward direction in world space
    pub direction: Vec3,
}

/// Which state is active, which one was active before it, and which
/// activation of it this is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateRecord {
    current: StateId,
    previous: StateId,
    serial: u64,
}

impl StateRecord {
    fn new(initial: StateId) -> Self {
        Self {
            current: initial,
            previous: initial,
            serial: 0,
        }
    }
}

/// Everything a state hook may read or mutate. Owned by the agent; states
/// only ever borrow it for the duration of one hook call.
pub struct AgentContext {
    pub caps: Capabilities,
    pub config: AgentConfig,
    pub stats: PlayerStats,
    /// Weapon currently drawn in hand
    pub weapon: Option<ItemId>,
    pub motion: MotionInput,
    pub(crate) signals: SignalBridge,
    record: StateRecord,
    /// Seconds of simulated time since the agent was created
    time: f32,
}

impl AgentContext {
    pub fn new(caps: Capabilities, config: AgentConfig) -> Self {
        Self {
            caps,
            config,
            stats: PlayerStats::default(),
            weapon: None,
            motion: MotionInput::default(),
            signals: SignalBridge::new(),
            record: StateRecord::new(StateId::Movement),
            time: 0.0,
        }
    }

    /// The active state
    pub fn current_state(&self) -> StateId {
        self.record.current
    }

    /// The state that was active before the last transition
    pub fn previous_state(&self) -> StateId {
        self.record.previous
    }

    /// The running activation of the active state
    pub fn activation(&self) -> Activation {
        Activation {
            state: self.record.current,
            serial: self.record.serial,
        }
    }

    /// Make `next` the active state; only the transition engine calls this
    pub(crate) fn swap_state(&mut self, next: StateId) {
        self.record.previous = self.record.current;
        self.record.current = next;
        self.record.serial += 1;
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub(crate) fn advance_time(&mut self, dt: f32) {
        self.time += dt.max(0.0);
    }

    /// Wait for `kind` on behalf of the running activation
    pub fn subscribe(&mut self, kind: SignalKind, delivery: Delivery) {
        let owner = self.activation();
        self.signals.subscribe(owner, kind, delivery);
    }

    /// Stop waiting for `kind`, harmless if nothing was registered
    pub fn unsubscribe(&mut self, kind: SignalKind) -> bool {
        self.signals.unsubscribe(kind)
    }

    pub fn is_subscribed(&self, kind: SignalKind) -> bool {
        self.signals.is_subscribed(kind)
    }

    pub fn signals(&self) -> &SignalBridge {
        &self.signals
    }

    /// Look up weapon data in the item catalog
    pub fn weapon_data(&self, id: &ItemId) -> Option<WeaponData> {
        self.caps.items.weapon(id)
    }

    /// Equipped weapon according to the inventory, bare hands otherwise
    pub fn equipped_or_unarmed(&self) -> ItemId {
        self.caps
            .inventory
            .borrow()
            .equipped_weapon_id()
            .unwrap_or_else(|| self.config.unarmed_weapon.clone())
    }

    /// Category of a weapon; bare hands and unknown items fight in melee
    pub fn weapon_kind(&self, id: &ItemId) -> Option<WeaponKind> {
        if *id == self.config.unarmed_weapon {
            return Some(WeaponKind::Melee);
        }
        self.weapon_data(id).map(|data| data.kind)
    }

    pub fn is_unarmed(&self, id: &ItemId) -> bool {
        *id == self.config.unarmed_weapon
    }
}
