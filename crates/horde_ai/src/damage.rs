//! Attack hit volumes
//!
//! A damage zone rides on an agent (usually a hand or the jaw) and hurts
//! players that stay inside it while the attack animation flags its hitting
//! frames through a float parameter.

use crate::agent::Transform;
use crate::animation::AnimationDriver;
use glam::Vec3;
use horde_core::{AgentId, ColliderId};

/// Parameter value above which an attack animation is landing hits
pub const HIT_PARAMETER_THRESHOLD: f32 = 0.9;

/// A hit volume attached to an agent
#[derive(Debug, Clone, PartialEq)]
pub struct DamageZone {
    /// Agent carrying the zone
    pub owner: AgentId,
    /// Animator float gating the zone
    pub parameter: String,
    /// Damage dealt per physics step a player stays inside
    pub amount: f32,
    /// Position in the owner's local frame
    pub offset: Vec3,
}

impl DamageZone {
    pub fn new(owner: AgentId, parameter: impl Into<String>, amount: f32) -> Self {
        Self {
            owner,
            parameter: parameter.into(),
            amount,
            offset: Vec3::ZERO,
        }
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Whether the owner's animation is in its hitting frames
    pub fn is_active(&self, animator: &dyn AnimationDriver) -> bool {
        animator
            .float(&self.parameter)
            .map_or(false, |value| value > HIT_PARAMETER_THRESHOLD)
    }

    /// World position of the zone on an owner at `transform`
    pub fn world_position(&self, transform: &Transform) -> Vec3 {
        transform.position + transform.rotation * (self.offset * transform.scale)
    }
}

/// A hit landed on a player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageEvent {
    pub attacker: AgentId,
    pub zone: ColliderId,
    pub player: ColliderId,
    pub amount: f32,
    /// Where the zone was when the hit landed
    pub point: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimatorParameters;
    use approx::assert_relative_eq;
    use glam::Quat;

    #[test]
    fn test_zone_gated_by_parameter() {
        let zone = DamageZone::new(AgentId::from_index(0), "RightHand", 10.0);
        let mut animator = AnimatorParameters::new();
        assert!(!zone.is_active(&animator));

        animator.set_float("RightHand", 0.9);
        assert!(!zone.is_active(&animator));

        animator.set_float("RightHand", 0.95);
        assert!(zone.is_active(&animator));
    }

    #[test]
    fn test_offset_follows_owner() {
        let zone = DamageZone::new(AgentId::from_index(0), "Bite", 5.0).with_offset(Vec3::new(0.0, 1.5, 0.5));
        let transform = Transform {
            position: Vec3::new(2.0, 0.0, 0.0),
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            scale: Vec3::ONE,
        };

        let point = zone.world_position(&transform);
        assert_relative_eq!(point.x, 2.5, epsilon = 1e-5);
        assert_relative_eq!(point.y, 1.5, epsilon = 1e-5);
        assert_relative_eq!(point.z, 0.0, epsilon = 1e-5);
    }
}
