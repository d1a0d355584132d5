// Animation callback bridge
//
// States that wait for the animator (or the detection and block systems)
// register interest in a signal kind for the duration of their activation.
// A delivered signal is routed to the registered activation only; anything
// else is a stale callback and is dropped.

use super::state::StateId;
use crate::game::combat::Hit;
use std::collections::HashMap;

/// Animator parameter names used by the states
pub mod params {
    pub const JUMP: &str = "jump";
    pub const FALL: &str = "fall";
    pub const INTERACT: &str = "interact";
    pub const EQUIP_ITEM: &str = "equipItem";
    pub const UNEQUIP_ITEM: &str = "unequipItem";
    pub const RELOAD: &str = "reload";
    pub const HURT: &str = "hurt";
    pub const MELEE_WEAPON_ATTACK: &str = "meleeWeaponAttack";
    pub const MELEE_ATTACK_STANCE: &str = "meleeAttackStance";
    pub const RANGED_ATTACK_STANCE: &str = "rangedAttackStance";
    pub const BLOCK_STANCE: &str = "blockStance";
    pub const BLOCK_REACTION: &str = "blockReaction";
    pub const DEFENSE: &str = "defense";
}

/// A callback raised by a collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    /// Keyframe event placed in equip/unequip/reload/interact/hurt clips
    AnimationFunctionTrigger,
    /// End of an attack clip
    FinishedAttacking,
    /// Detection confirmed a hit for the running attack
    AttackHit(Hit),
    /// The block collaborator absorbed an incoming attack
    BlockSuccessful,
}

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Self::AnimationFunctionTrigger => SignalKind::AnimationFunctionTrigger,
            Self::FinishedAttacking => SignalKind::FinishedAttacking,
            Self::AttackHit(_) => SignalKind::AttackHit,
            Self::BlockSuccessful => SignalKind::BlockSuccessful,
        }
    }
}

/// Subscribable signal categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    AnimationFunctionTrigger,
    FinishedAttacking,
    AttackHit,
    BlockSuccessful,
}

/// How long a subscription lives once registered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Removed the instant the first matching signal is routed
    Once,
    /// Stays until unsubscribed or the activation ends
    Repeating,
}

/// One enter-to-exit occupancy of a state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    pub state: StateId,
    pub serial: u64,
}

#[derive(Debug, Clone, Copy)]
struct Subscription {
    kind: SignalKind,
    owner: Activation,
    delivery: Delivery,
}

/// Subscribe/unsubscribe totals for one signal kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscriptionCounts {
    pub subscribed: u32,
    pub unsubscribed: u32,
}

impl SubscriptionCounts {
    /// Every subscription has been matched by an unsubscription
    pub fn is_balanced(&self) -> bool {
        self.subscribed == self.unsubscribed
    }
}

/// Registry of pending continuations, at most one per signal kind
#[derive(Debug, Default)]
pub struct SignalBridge {
    subscriptions: Vec<Subscription>,
    counts: HashMap<SignalKind, SubscriptionCounts>,
}

impl SignalBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `owner` for `kind`. Any previous registration for the kind
    /// is removed first, so repeated entry never doubles a subscription.
    pub fn subscribe(&mut self, owner: Activation, kind: SignalKind, delivery: Delivery) {
        if self.unsubscribe(kind) {
            log::trace!("{:?} re-subscribed by {}", kind, owner.state);
        }
        self.subscriptions.push(Subscription {
            kind,
            owner,
            delivery,
        });
        self.counts.entry(kind).or_default().subscribed += 1;
    }

    /// Remove the registration for `kind`, returns whether one existed
    pub fn unsubscribe(&mut self, kind: SignalKind) -> bool {
        let Some(index) = self.subscriptions.iter().position(|s| s.kind == kind) else {
            return false;
        };
        self.subscriptions.remove(index);
        self.counts.entry(kind).or_default().unsubscribed += 1;
        true
    }

    /// Decide whether a signal reaches `current`. One-shot registrations
    /// are consumed here, before the continuation runs.
    pub fn route(&mut self, kind: SignalKind, current: Activation) -> bool {
        let Some(index) = self.subscriptions.iter().position(|s| s.kind == kind) else {
            log::trace!("Dropping {:?}: nobody is waiting for it", kind);
            return false;
        };

        let subscription = self.subscriptions[index];
        if subscription.owner != current {
            log::trace!(
                "Dropping {:?}: registered by {} #{} but {} #{} is active",
                kind,
                subscription.owner.state,
                subscription.owner.serial,
                current.state,
                current.serial
            );
            return false;
        }

        if subscription.delivery == Delivery::Once {
            self.subscriptions.remove(index);
            self.counts.entry(kind).or_default().unsubscribed += 1;
        }
        true
    }

    /// Drop everything still registered by `owner`, returns how many
    pub fn release(&mut self, owner: Activation) -> usize {
        let mut released = 0;
        let counts = &mut self.counts;
        self.subscriptions.retain(|s| {
            if s.owner == owner {
                counts.entry(s.kind).or_default().unsubscribed += 1;
                released += 1;
                false
            } else {
                true
            }
        });
        released
    }

    /// Check if anything is waiting for `kind`
    pub fn is_subscribed(&self, kind: SignalKind) -> bool {
        self.subscriptions.iter().any(|s| s.kind == kind)
    }

    /// Number of live registrations
    pub fn active_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Lifetime subscribe/unsubscribe totals for `kind`
    pub fn counts(&self, kind: SignalKind) -> SubscriptionCounts {
        self.counts.get(&kind).copied().unwrap_or_default()
    }
}
