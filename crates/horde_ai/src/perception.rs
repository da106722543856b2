//! Visual perception: turns sensor events into player sightings
//!
//! A player inside the sensor volume becomes the visual threat when it is
//! inside the view cone, nothing but the agent's own colliders lies between
//! the sensor and the player, and it is not farther than a player already
//! seen this physics step.

use crate::agent::Agent;
use crate::geometry::angle_between;
use crate::physics::LINE_OF_SIGHT_MASK;
use crate::scene::{ColliderInfo, SceneContext};
use crate::target::TargetKind;
use glam::Vec3;
use horde_core::AgentId;
use horde_triggers::TriggerEventType;

/// Archetypes that can see
pub trait Vision {
    /// Field of view in degrees
    fn fov(&self) -> f32;

    /// Fraction of the sensor radius the agent can see across
    fn sight(&self) -> f32;
}

/// A view cone in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewCone {
    pub origin: Vec3,
    pub forward: Vec3,
    /// Full opening angle in degrees
    pub fov: f32,
    /// Maximum line of sight distance
    pub range: f32,
}

impl ViewCone {
    /// The cone an agent sees with
    pub fn of<A: Vision>(agent: &Agent<A>) -> Self {
        Self {
            origin: agent.sensor_position(),
            forward: agent.forward(),
            fov: agent.archetype.fov(),
            range: agent.sensor_radius() * agent.archetype.sight(),
        }
    }

    /// Whether `point` is inside the opening angle; the exact edge counts
    /// as inside
    pub fn contains(&self, point: Vec3) -> bool {
        angle_between(point - self.origin, self.forward) <= self.fov * 0.5
    }
}

/// Handle a sensor event for an agent that can see
pub fn perceive<A: Vision>(
    agent: &mut Agent<A>,
    kind: TriggerEventType,
    other: &ColliderInfo,
    scene: &SceneContext<'_>,
) {
    if kind == TriggerEventType::Exit || !other.is_player {
        return;
    }

    let distance = agent.sensor_position().distance(other.position);
    let current = agent.visual_threat();
    if current.is(TargetKind::VisualPlayer) && distance >= current.distance() {
        return;
    }

    if is_visible(agent.id(), &ViewCone::of(agent), other, scene) {
        agent.set_visual_threat(
            TargetKind::VisualPlayer,
            Some(other.id),
            other.position,
            distance,
        );
    }
}

/// Test a collider against a view cone and for an unobstructed line of sight.
///
/// Every hit along the ray is considered; hits on colliders owned by
/// `observer` are skipped. The collider is visible only if it is the nearest
/// remaining hit.
pub fn is_visible(
    observer: AgentId,
    cone: &ViewCone,
    other: &ColliderInfo,
    scene: &SceneContext<'_>,
) -> bool {
    if !cone.contains(other.position) {
        return false;
    }

    let direction = (other.position - cone.origin).normalize_or_zero();
    if direction == Vec3::ZERO {
        return false;
    }

    let hits = scene
        .physics
        .raycast_all(cone.origin, direction, cone.range, LINE_OF_SIGHT_MASK);

    hits.iter()
        .filter(|hit| scene.registry.lookup(hit.collider) != Some(observer))
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
        .map_or(false, |nearest| nearest.collider == other.id)
}
