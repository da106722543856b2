//! Horde AI - agent behavior engine
//!
//! Drives non-player agents through perception, threat arbitration and a
//! per-agent finite state machine.
//!
//! # Features
//!
//! - Per-agent state machine with a dense state registry and Idle fallback
//! - Target and threat records with closer-wins player perception
//! - View cone and line of sight tests against a physics query service
//! - Root motion authority with acquire/release tokens
//! - Waypoint networks with sequential or random patrol
//! - Zombie archetype with Idle, Patrol, Alerted, Pursuit, Attack, Feeding and Dead states
//! - Scene driver running sensors, melee zones, damage zones and target volumes
//!
//! # Example
//!
//! ```ignore
//! use horde_ai::prelude::*;
//!
//! let config = HordeConfig::load("horde.json")?;
//! let mut horde = Horde::new();
//! let id = horde.next_agent_id();
//! let machine = Zombie::build(id, horde.next_collider_id(), &config);
//! horde.spawn(machine, horde.next_collider_id(), &[])?;
//! horde.step(1.0 / 60.0, &players, &world);
//! ```

pub mod agent;
pub mod animation;
pub mod config;
pub mod damage;
pub mod error;
pub mod geometry;
pub mod horde;
pub mod navigation;
pub mod perception;
pub mod physics;
pub mod root_motion;
pub mod scene;
pub mod sensor;
pub mod state;
pub mod state_machine;
pub mod target;
pub mod waypoint;
pub mod zombie;

pub mod prelude {
    pub use crate::agent::{Agent, Archetype, Transform};
    pub use crate::animation::{AnimationDriver, AnimatorParameters};
    pub use crate::config::HordeConfig;
    pub use crate::damage::{DamageEvent, DamageZone};
    pub use crate::error::AiError;
    pub use crate::horde::Horde;
    pub use crate::navigation::{DirectPathFollower, PathFollower, PathStatus};
    pub use crate::perception::{ViewCone, Vision};
    pub use crate::physics::{CollisionLayer, PhysicsQuery, RaycastHit, SphereWorld};
    pub use crate::root_motion::{RootMotionConfigurator, RootMotionRequests, RootMotionToken};
    pub use crate::scene::{ColliderInfo, SceneContext, SceneRegistry};
    pub use crate::sensor::{Sensor, SensorEvent};
    pub use crate::state::{BehaviorState, StateId};
    pub use crate::state_machine::AgentStateMachine;
    pub use crate::target::{Target, TargetKind};
    pub use crate::waypoint::{Waypoint, WaypointNetwork};
    pub use crate::zombie::Zombie;
}

pub use prelude::*;
