//! Trigger events

use glam::Vec3;
use horde_core::ColliderId;
use serde::{Deserialize, Serialize};

/// Type of trigger event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerEventType {
    /// Collider entered the trigger volume
    Enter,
    /// Collider is inside the trigger volume (every step)
    Stay,
    /// Collider left the trigger volume
    Exit,
}

/// A trigger event
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerEvent {
    /// Type of event
    pub event_type: TriggerEventType,
    /// The trigger collider
    pub trigger: ColliderId,
    /// The collider that caused the event
    pub other: ColliderId,
    /// World position of the trigger
    pub trigger_position: Vec3,
    /// Position of the other collider
    pub other_position: Vec3,
    /// Time spent in the trigger (Stay and Exit events)
    pub time_in_trigger: f32,
}

impl TriggerEvent {
    fn with_type(event_type: TriggerEventType, trigger: ColliderId, other: ColliderId) -> Self {
        Self {
            event_type,
            trigger,
            other,
            trigger_position: Vec3::ZERO,
            other_position: Vec3::ZERO,
            time_in_trigger: 0.0,
        }
    }

    /// Create an enter event
    pub fn enter(trigger: ColliderId, other: ColliderId) -> Self {
        Self::with_type(TriggerEventType::Enter, trigger, other)
    }

    /// Create a stay event
    pub fn stay(trigger: ColliderId, other: ColliderId, time_spent: f32) -> Self {
        Self {
            time_in_trigger: time_spent,
            ..Self::with_type(TriggerEventType::Stay, trigger, other)
        }
    }

    /// Create an exit event
    pub fn exit(trigger: ColliderId, other: ColliderId, time_spent: f32) -> Self {
        Self {
            time_in_trigger: time_spent,
            ..Self::with_type(TriggerEventType::Exit, trigger, other)
        }
    }

    /// Set trigger position
    pub fn with_trigger_position(mut self, pos: Vec3) -> Self {
        self.trigger_position = pos;
        self
    }

    /// Set other collider position
    pub fn with_other_position(mut self, pos: Vec3) -> Self {
        self.other_position = pos;
        self
    }

    /// Check if this is an enter event
    pub fn is_enter(&self) -> bool {
        self.event_type == TriggerEventType::Enter
    }

    /// Check if this is a stay event
    pub fn is_stay(&self) -> bool {
        self.event_type == TriggerEventType::Stay
    }

    /// Check if this is an exit event
    pub fn is_exit(&self) -> bool {
        self.event_type == TriggerEventType::Exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let trigger = ColliderId::from_index(1);
        let other = ColliderId::from_index(2);
        let event = TriggerEvent::enter(trigger, other)
            .with_trigger_position(Vec3::new(1.0, 2.0, 3.0))
            .with_other_position(Vec3::new(4.0, 5.0, 6.0));

        assert!(event.is_enter());
        assert_eq!(event.trigger, trigger);
        assert_eq!(event.other, other);
        assert_eq!(event.other_position, Vec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_exit_keeps_time_spent() {
        let event = TriggerEvent::exit(ColliderId::from_index(1), ColliderId::from_index(2), 1.5);
        assert!(event.is_exit());
        assert!(!event.is_stay());
        assert_eq!(event.time_in_trigger, 1.5);
    }
}
