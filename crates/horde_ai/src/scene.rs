//! Scene registry: which agent owns which collider

use crate::physics::PhysicsQuery;
use glam::Vec3;
use horde_core::{AgentId, ColliderId};
use std::collections::{HashMap, HashSet};

/// Maps collider ids to the agents that own them and remembers which
/// colliders belong to players.
///
/// Constructed by the scene and passed by reference to whoever needs a
/// lookup; there is no global instance.
#[derive(Debug, Default, Clone)]
pub struct SceneRegistry {
    owners: HashMap<ColliderId, AgentId>,
    players: HashSet<ColliderId>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collider as owned by `agent`.
    ///
    /// The first registration wins; returns false if the collider already
    /// has an owner.
    pub fn register(&mut self, collider: ColliderId, agent: AgentId) -> bool {
        match self.owners.get(&collider) {
            Some(&existing) => {
                if existing != agent {
                    log::warn!(
                        "Collider {} already owned by {}, ignoring registration for {}",
                        collider,
                        existing,
                        agent
                    );
                }
                false
            }
            None => {
                self.owners.insert(collider, agent);
                true
            }
        }
    }

    /// Owning agent of a collider, `None` for anything that is not an agent
    pub fn lookup(&self, collider: ColliderId) -> Option<AgentId> {
        self.owners.get(&collider).copied()
    }

    pub fn unregister(&mut self, collider: ColliderId) -> Option<AgentId> {
        self.owners.remove(&collider)
    }

    /// Remove every collider owned by `agent`, returning how many were removed
    pub fn unregister_agent(&mut self, agent: AgentId) -> usize {
        let before = self.owners.len();
        self.owners.retain(|_, owner| *owner != agent);
        before - self.owners.len()
    }

    /// Tag a collider as a player
    pub fn register_player(&mut self, collider: ColliderId) {
        self.players.insert(collider);
    }

    pub fn unregister_player(&mut self, collider: ColliderId) -> bool {
        self.players.remove(&collider)
    }

    pub fn is_player(&self, collider: ColliderId) -> bool {
        self.players.contains(&collider)
    }

    /// Number of agent-owned colliders
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// A collider reported by a trigger volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderInfo {
    pub id: ColliderId,
    pub position: Vec3,
    /// Tagged as a player in the scene registry
    pub is_player: bool,
}

impl ColliderInfo {
    pub fn new(id: ColliderId, position: Vec3) -> Self {
        Self {
            id,
            position,
            is_player: false,
        }
    }

    /// Mark as a player
    pub fn player(mut self) -> Self {
        self.is_player = true;
        self
    }

    /// Resolve the player tag through the registry
    pub fn resolve(id: ColliderId, position: Vec3, registry: &SceneRegistry) -> Self {
        Self {
            id,
            position,
            is_player: registry.is_player(id),
        }
    }
}

/// What a state may query about the rest of the scene during a callback
#[derive(Clone, Copy)]
pub struct SceneContext<'a> {
    pub registry: &'a SceneRegistry,
    pub physics: &'a dyn PhysicsQuery,
}

impl<'a> SceneContext<'a> {
    pub fn new(registry: &'a SceneRegistry, physics: &'a dyn PhysicsQuery) -> Self {
        Self { registry, physics }
    }
}
