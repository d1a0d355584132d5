// Player agent: owns the context and the state machine, and is the only
// entry point the host game talks to

use crate::core::math::is_finite_vec;
use crate::engine::game_loop::FrameStep;
use crate::engine::input::{HotbarSlot, InputEvent, InputManager};
use glam::{Vec2, Vec3};

use super::animation::{Signal, SignalKind, SubscriptionCounts};
use super::capabilities::{Capabilities, CraftingSystem, Shared};
use super::config::AgentConfig;
use super::context::{AgentContext, MotionInput};
use super::state::{StateId, StateMachine, Transition};
use super::stats::{PlayerData, PlayerStats};
use super::wiring::{AgentEvent, Mailbox, SystemWiring};
use super::AgentError;

/// Upper bound on mailbox events handled in one flush. Whatever is left
/// waits for the next one.
const MAX_EVENTS_PER_FLUSH: usize = 64;

/// The player character's behaviour core
pub struct Agent {
    ctx: AgentContext,
    machine: StateMachine,
    wiring: SystemWiring,
    spawn_point: Option<Vec3>,
}

impl Agent {
    /// Compose the agent from its capabilities, wire the inventory to the
    /// crafting and ammo systems, and enter Movement
    pub fn new(
        caps: Capabilities,
        crafting: Shared<dyn CraftingSystem>,
        mailbox: Mailbox,
        config: AgentConfig,
    ) -> Self {
        let wiring = SystemWiring {
            inventory: caps.inventory.clone(),
            crafting,
            ammo: caps.ammo.clone(),
            mailbox,
        };
        wiring.connect();

        let mut ctx = AgentContext::new(caps, config);
        let mut machine = StateMachine::new();
        machine.start(&mut ctx);

        let mut agent = Self {
            ctx,
            machine,
            wiring,
            spawn_point: None,
        };
        agent.flush();
        agent
    }

    /// Re-establish the system wiring after a collaborator was re-initialised
    pub fn rewire(&self) {
        self.wiring.connect();
    }

    /// Mailbox collaborators post their events to
    pub fn mailbox(&self) -> &Mailbox {
        &self.wiring.mailbox
    }

    // ==================== Input ====================

    /// Route one discrete input to the active state
    pub fn handle_input(&mut self, event: InputEvent) {
        self.machine.dispatch_input(&mut self.ctx, event);
        self.flush();
    }

    /// Use a hotbar slot by number
    pub fn select_hotbar(&mut self, slot: u8) -> Result<(), AgentError> {
        let slot = HotbarSlot::new(slot)?;
        self.handle_input(InputEvent::Hotbar(slot));
        Ok(())
    }

    /// Take this frame's movement vector and events from the input manager
    pub fn poll_input(&mut self, input: &mut InputManager) {
        self.ctx.motion.movement = input.movement_vector();
        for event in input.update() {
            self.handle_input(event);
        }
    }

    /// Continuous input: movement vector and camera forward direction
    pub fn set_motion(&mut self, movement: Vec2, direction: Vec3) {
        self.ctx.motion = MotionInput {
            movement,
            direction,
        };
    }

    // ==================== Frame driving ====================

    /// Per-frame update of the active state
    pub fn update(&mut self, dt: f32) {
        self.ctx.advance_time(dt);
        self.machine.update(&mut self.ctx);
        self.flush();
    }

    /// Fixed-timestep update of the active state
    pub fn fixed_update(&mut self) {
        self.machine.fixed_update(&mut self.ctx);
        self.flush();
    }

    /// Run one frame as produced by the frame clock
    pub fn tick(&mut self, step: FrameStep) {
        self.update(step.dt);
        for _ in 0..step.fixed_steps {
            self.fixed_update();
        }
    }

    // ==================== Collaborator events ====================

    /// Deliver an animation, detection or block signal right away
    pub fn deliver(&mut self, signal: Signal) {
        self.machine.deliver(&mut self.ctx, signal);
        self.flush();
    }

    /// Queue an event and process the mailbox
    pub fn post(&mut self, event: AgentEvent) {
        self.wiring.mailbox.post(event);
        self.flush();
    }

    /// Process queued collaborator events in arrival order
    pub fn flush(&mut self) {
        let mut handled = 0;
        while handled < MAX_EVENTS_PER_FLUSH {
            let Some(event) = self.wiring.mailbox.take() else {
                return;
            };
            self.handle_event(event);
            handled += 1;
        }

        if !self.wiring.mailbox.is_empty() {
            log::warn!(
                "{} mailbox event(s) deferred after handling {}",
                self.wiring.mailbox.len(),
                handled
            );
        }
    }

    fn handle_event(&mut self, event: AgentEvent) {
        match event {
            AgentEvent::Signal(signal) => self.machine.deliver(&mut self.ctx, signal),
            AgentEvent::InventoryStateChanged => self.wiring.on_inventory_state_changed(),
            AgentEvent::StructureUseRequested => {
                self.machine.dispatch_input(&mut self.ctx, InputEvent::Placement)
            }
            AgentEvent::DamageTaken(amount) => self.take_damage(amount),
        }
    }

    // ==================== Health ====================

    /// Apply damage from an unblocked attack
    pub fn apply_damage(&mut self, amount: i32) {
        self.take_damage(amount);
        self.flush();
    }

    fn take_damage(&mut self, amount: i32) {
        if amount <= 0 {
            return;
        }

        self.ctx.stats.take_damage(amount);
        log::debug!("Took {} damage, {} health left", amount, self.ctx.stats.health);

        if self.ctx.stats.is_depleted() {
            log::info!("Player died");
            self.respawn();
        } else if self.ctx.current_state() != StateId::Hurt {
            self.machine
                .transition_to(&mut self.ctx, Transition::to(StateId::Hurt));
        }
    }

    fn respawn(&mut self) {
        match self.spawn_point {
            Some(spawn) => {
                let position = spawn + Vec3::Y * self.ctx.config.respawn_lift;
                self.ctx.caps.movement.teleport_to(position);
                log::info!("Respawned at {}", position);
            }
            None => log::warn!("No spawn point recorded, respawning in place"),
        }
        self.ctx.stats.restore_full();
        self.machine
            .transition_to(&mut self.ctx, Transition::to(StateId::Movement));
    }

    // ==================== Save / restore ====================

    /// Record the current position as the spawn point
    pub fn save_spawn_point(&mut self) {
        let position = self.ctx.caps.movement.position();
        self.spawn_point = Some(position);
        log::info!("Spawn point saved at {}", position);
    }

    pub fn spawn_point(&self) -> Option<Vec3> {
        self.spawn_point
    }

    /// Record handed to the save system
    pub fn snapshot(&self) -> Result<PlayerData, AgentError> {
        let position = self.spawn_point.ok_or(AgentError::NoSpawnPoint)?;
        Ok(PlayerData {
            position,
            health: self.ctx.stats.health,
            stamina: self.ctx.stats.stamina,
        })
    }

    /// Apply a saved record: respawn at its position with its stats
    pub fn restore(&mut self, data: &PlayerData) -> Result<(), AgentError> {
        if !is_finite_vec(data.position) {
            return Err(AgentError::InvalidSaveData(format!(
                "position {} is not finite",
                data.position
            )));
        }
        if data.health <= 0 || data.stamina < 0 {
            return Err(AgentError::InvalidSaveData(format!(
                "health {} / stamina {}",
                data.health, data.stamina
            )));
        }

        self.spawn_point = Some(data.position);
        self.respawn();
        self.ctx.stats.health = data.health.min(self.ctx.stats.max_health);
        self.ctx.stats.stamina = data.stamina.min(self.ctx.stats.max_stamina);
        log::info!("Restored player data");

        self.flush();
        Ok(())
    }

    // ==================== Accessors ====================

    /// Current state
    pub fn state(&self) -> StateId {
        self.ctx.current_state()
    }

    /// State active before the last transition
    pub fn previous_state(&self) -> StateId {
        self.ctx.previous_state()
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.ctx.stats
    }

    pub fn context(&self) -> &AgentContext {
        &self.ctx
    }

    /// Lifetime subscribe/unsubscribe totals for a signal kind
    pub fn subscription_counts(&self, kind: SignalKind) -> SubscriptionCounts {
        self.ctx.signals().counts(kind)
    }
}
