//! Zombie archetype
//!
//! Traits and animation drives of a zombie, the perception hook shared by
//! its states and the seven concrete behavior states.

mod alerted;
mod attack;
mod dead;
mod feeding;
mod idle;
mod patrol;
mod pursuit;

pub use alerted::AlertedState;
pub use attack::AttackState;
pub use dead::DeadState;
pub use feeding::FeedingState;
pub use idle::IdleState;
pub use patrol::PatrolState;
pub use pursuit::PursuitState;

use crate::agent::{Agent, Archetype};
use crate::config::{HordeConfig, ZombieConfig};
use crate::geometry::{angle_between, lerp};
use crate::perception::{perceive, Vision};
use crate::scene::{ColliderInfo, SceneContext};
use crate::state::StateId;
use crate::state_machine::AgentStateMachine;
use crate::target::TargetKind;
use glam::Vec3;
use horde_core::{AgentId, ColliderId};
use horde_triggers::TriggerEventType;
use std::sync::Arc;

/// Animator parameter names written every tick
pub mod params {
    pub const SPEED: &str = "Speed";
    pub const FEEDING: &str = "Feeding";
    pub const SEEKING: &str = "Seeking";
    pub const ATTACK: &str = "Attack";
}

/// Zombie traits and the values its states drive the animator with
#[derive(Debug, Clone, PartialEq)]
pub struct Zombie {
    config: ZombieConfig,
    pub health: i32,
    /// 1 is full, 0 is starving
    pub satisfaction: f32,
    pub aggression: f32,
    pub speed: f32,
    /// Turn direction while searching: -1, 0 or 1
    pub seeking: i32,
    pub feeding: bool,
    /// Attack animation variant, 0 when not attacking
    pub attack_type: i32,
}

impl Zombie {
    pub fn new(config: ZombieConfig) -> Self {
        Self {
            health: config.health,
            satisfaction: config.satisfaction,
            aggression: config.aggression,
            speed: 0.0,
            seeking: 0,
            feeding: false,
            attack_type: 0,
            config,
        }
    }

    pub fn config(&self) -> &ZombieConfig {
        &self.config
    }

    pub fn intelligence(&self) -> f32 {
        self.config.intelligence
    }

    pub fn hearing(&self) -> f32 {
        self.config.hearing
    }

    pub fn replenish_rate(&self) -> f32 {
        self.config.replenish_rate
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Set the movement speed and clear the other drives
    pub fn reset_drives(&mut self, speed: f32) {
        self.speed = speed;
        self.seeking = 0;
        self.feeding = false;
        self.attack_type = 0;
    }

    /// Hungry enough to leave the path for food `distance` away.
    ///
    /// Compares the hunger deficit with the distance as a fraction of the
    /// sensor radius; both are in 0..=1.
    pub fn is_hungry_for(&self, distance: f32, sensor_radius: f32) -> bool {
        if sensor_radius <= 0.0 {
            return false;
        }
        (1.0 - self.satisfaction) > distance / sensor_radius
    }

    /// Build a zombie agent from a config
    pub fn agent(id: AgentId, body: ColliderId, config: &HordeConfig) -> Agent<Zombie> {
        let mut agent =
            Agent::new(id, body, Zombie::new(config.zombie.clone())).with_config(config.agent.clone());
        if let Some(network) = config.waypoints.as_ref() {
            agent = agent.with_waypoints(Arc::new(network.clone()));
        }
        agent
    }

    /// Register every zombie state on a new machine for `agent`
    pub fn machine(agent: Agent<Zombie>, config: &HordeConfig) -> AgentStateMachine<Zombie> {
        AgentStateMachine::new(agent)
            .with_state(IdleState::new(config.idle.clone()))
            .with_state(PatrolState::new(config.patrol.clone()))
            .with_state(AlertedState::new(config.alerted.clone()))
            .with_state(PursuitState::new(config.pursuit.clone()))
            .with_state(AttackState::new(config.attack.clone()))
            .with_state(FeedingState::new(config.feeding.clone()))
            .with_state(DeadState)
    }

    /// Build and register in one go
    pub fn build(id: AgentId, body: ColliderId, config: &HordeConfig) -> AgentStateMachine<Zombie> {
        Self::machine(Self::agent(id, body, config), config)
    }
}

impl Default for Zombie {
    fn default() -> Self {
        Self::new(ZombieConfig::default())
    }
}

impl Vision for Zombie {
    fn fov(&self) -> f32 {
        self.config.fov
    }

    fn sight(&self) -> f32 {
        self.config.sight
    }
}

impl Archetype for Zombie {
    fn after_update(agent: &mut Agent<Self>) {
        let zombie = &agent.archetype;
        let (speed, feeding, seeking, attack_type) =
            (zombie.speed, zombie.feeding, zombie.seeking, zombie.attack_type);

        let animator = agent.animator_mut();
        animator.set_float(params::SPEED, speed);
        animator.set_bool(params::FEEDING, feeding);
        animator.set_integer(params::SEEKING, seeking);
        animator.set_integer(params::ATTACK, attack_type);

        let delta_time = agent.delta_time();
        let zombie = &mut agent.archetype;
        let depletion = (zombie.config.depletion_rate * delta_time / 100.0) * speed.powi(3);
        zombie.satisfaction = (zombie.satisfaction - depletion).max(0.0);
    }

    fn on_sensor_event(
        agent: &mut Agent<Self>,
        kind: TriggerEventType,
        other: &ColliderInfo,
        scene: &SceneContext<'_>,
    ) {
        perceive(agent, kind, other, scene);
    }
}

impl AgentStateMachine<Zombie> {
    /// Apply damage; reaching zero health switches to Dead.
    ///
    /// Returns true if this hit killed the agent.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        let zombie = &mut self.agent_mut().archetype;
        if zombie.is_dead() {
            return false;
        }
        zombie.health = (zombie.health - amount.max(0)).max(0);
        if !zombie.is_dead() {
            return false;
        }

        log::debug!("{}: killed", self.id());
        if !self.force_state(StateId::Dead) {
            log::warn!("{}: died without a Dead state to enter", self.id());
        }
        true
    }

    pub fn is_dead(&self) -> bool {
        self.agent().archetype.is_dead()
    }
}

/// Threat response of a calm zombie: a seen player or food worth the detour
/// is pursued, a light or a sound raises the alert
pub(crate) fn calm_threat_response(agent: &mut Agent<Zombie>) -> Option<StateId> {
    let visual = *agent.visual_threat();
    let audio = *agent.audio_threat();

    match visual.kind() {
        TargetKind::VisualPlayer => {
            agent.set_target_from(&visual);
            return Some(StateId::Pursuit);
        }
        TargetKind::VisualLight => {
            agent.set_target_from(&visual);
            return Some(StateId::Alerted);
        }
        _ => {}
    }

    if audio.is(TargetKind::Audio) {
        agent.set_target_from(&audio);
        return Some(StateId::Alerted);
    }

    if visual.is(TargetKind::VisualFood)
        && agent
            .archetype
            .is_hungry_for(visual.distance(), agent.sensor_radius())
    {
        agent.set_target_from(&visual);
        return Some(StateId::Pursuit);
    }

    None
}

/// Select a waypoint and send the path follower to it
pub(crate) fn head_to_waypoint(agent: &mut Agent<Zombie>, increment: bool) -> bool {
    match agent.next_waypoint_position(increment) {
        Some(position) => {
            agent.nav_mut().set_destination(position);
            true
        }
        None => false,
    }
}

/// Turn towards the current target on the horizontal plane
pub(crate) fn face_target(agent: &mut Agent<Zombie>, t: f32) {
    let direction = agent.flat_direction_to(agent.target_position());
    agent.turn_towards(direction, t);
}

/// Head look-at driven through inverse kinematics.
///
/// The weight eases towards `max_weight` while the target is inside the
/// angle threshold and back to zero otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LookAt {
    weight: f32,
}

impl LookAt {
    pub fn reset(&mut self) {
        self.weight = 0.0;
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn update<A>(&mut self, agent: &mut Agent<A>, max_weight: f32, angle_threshold: f32) {
        let target = agent.target_position();
        let delta_time = agent.delta_time();
        let angle = angle_between(agent.forward(), target - agent.position());

        if angle < angle_threshold {
            agent.animator_mut().set_look_at_position(target + Vec3::Y);
            self.weight = lerp(self.weight, max_weight, delta_time);
        } else {
            self.weight = lerp(self.weight, 0.0, delta_time);
        }
        agent.animator_mut().set_look_at_weight(self.weight);
    }
}
