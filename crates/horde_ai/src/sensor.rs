//! Sensors forward trigger events from a detection volume to its owner

use glam::Vec3;
use horde_core::{AgentId, ColliderId};
use horde_triggers::TriggerEventType;

/// An event accepted by a sensor, addressed to the owning agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorEvent {
    pub owner: AgentId,
    pub kind: TriggerEventType,
    pub other: ColliderId,
}

/// The detection volume of an agent.
///
/// Holds no decision logic: every Enter, Stay or Exit is forwarded to the
/// owner untouched. Events arriving before an owner is configured are
/// dropped.
#[derive(Debug, Clone)]
pub struct Sensor {
    collider: ColliderId,
    owner: Option<AgentId>,
    forwarded: u64,
    dropped: u64,
}

impl Sensor {
    pub fn new(collider: ColliderId) -> Self {
        Self {
            collider,
            owner: None,
            forwarded: 0,
            dropped: 0,
        }
    }

    pub fn owned_by(mut self, owner: AgentId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn set_owner(&mut self, owner: Option<AgentId>) {
        self.owner = owner;
    }

    pub fn owner(&self) -> Option<AgentId> {
        self.owner
    }

    pub fn collider(&self) -> ColliderId {
        self.collider
    }

    /// Address a trigger callback to the owner
    pub fn forward(&mut self, kind: TriggerEventType, other: ColliderId) -> Option<SensorEvent> {
        match self.owner {
            Some(owner) => {
                self.forwarded += 1;
                Some(SensorEvent { owner, kind, other })
            }
            None => {
                self.dropped += 1;
                log::debug!("Sensor {} has no owner, dropped {:?} from {}", self.collider, kind, other);
                None
            }
        }
    }

    /// Events handed to the owner so far
    pub fn forwarded_count(&self) -> u64 {
        self.forwarded
    }

    /// Events dropped for lack of an owner
    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }
}

/// Convert a sphere attached to a scaled transform into world space.
///
/// The center offset scales per axis and the radius by the largest axis.
/// Rotation is not applied to the offset.
pub fn sphere_to_world(origin: Vec3, offset: Vec3, radius: f32, scale: Vec3) -> (Vec3, f32) {
    let center = origin + offset * scale;
    let scale = scale.abs();
    let world_radius = radius * scale.x.max(scale.y).max(scale.z);
    (center, world_radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_forward_to_owner() {
        let owner = AgentId::from_index(3);
        let mut sensor = Sensor::new(ColliderId::from_index(1)).owned_by(owner);

        let event = sensor
            .forward(TriggerEventType::Stay, ColliderId::from_index(9))
            .unwrap();
        assert_eq!(event.owner, owner);
        assert_eq!(event.kind, TriggerEventType::Stay);
        assert_eq!(event.other, ColliderId::from_index(9));
        assert_eq!(sensor.forwarded_count(), 1);
    }

    #[test]
    fn test_unowned_sensor_drops() {
        let mut sensor = Sensor::new(ColliderId::from_index(1));
        assert!(sensor.forward(TriggerEventType::Enter, ColliderId::from_index(2)).is_none());
        assert_eq!(sensor.dropped_count(), 1);

        sensor.set_owner(Some(AgentId::from_index(0)));
        assert!(sensor.forward(TriggerEventType::Exit, ColliderId::from_index(2)).is_some());
    }

    #[test]
    fn test_sphere_to_world() {
        let (center, radius) = sphere_to_world(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.5),
            2.0,
            Vec3::new(1.0, 2.0, 3.0),
        );
        assert_relative_eq!(center.x, 10.0);
        assert_relative_eq!(center.y, 2.0);
        assert_relative_eq!(center.z, 1.5);
        assert_relative_eq!(radius, 6.0);
    }
}
