//! Trigger system for processing overlaps

use crate::events::TriggerEvent;
use crate::trigger::TriggerComponent;
use glam::Vec3;
use horde_core::ColliderId;
use std::collections::{BTreeMap, HashSet};

/// A collider the trigger system tests against its volumes
#[derive(Debug, Clone)]
pub struct TriggerBody {
    /// Collider id
    pub id: ColliderId,
    /// World position
    pub position: Vec3,
    /// Collision layers
    pub layers: u32,
    /// Collider tags
    pub tags: HashSet<String>,
}

impl TriggerBody {
    /// Create a new body at the origin on every layer
    pub fn new(id: ColliderId) -> Self {
        Self {
            id,
            position: Vec3::ZERO,
            layers: u32::MAX,
            tags: HashSet::new(),
        }
    }

    /// Set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set layers
    pub fn with_layers(mut self, layers: u32) -> Self {
        self.layers = layers;
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Check for a tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// The trigger system that processes all triggers
#[derive(Debug, Default)]
pub struct TriggerSystem {
    /// Registered triggers, ordered so events come out deterministically
    triggers: BTreeMap<ColliderId, TriggerComponent>,
    /// Current simulation time
    current_time: f32,
    /// Collected events from last update
    last_events: Vec<TriggerEvent>,
}

impl TriggerSystem {
    /// Create a new trigger system
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trigger
    pub fn register_trigger(&mut self, id: ColliderId, trigger: TriggerComponent) {
        if self.triggers.insert(id, trigger).is_some() {
            log::debug!("Replaced trigger {}", id);
        }
    }

    /// Unregister a trigger
    pub fn unregister_trigger(&mut self, id: ColliderId) -> Option<TriggerComponent> {
        self.triggers.remove(&id)
    }

    /// Get a trigger
    pub fn get_trigger(&self, id: ColliderId) -> Option<&TriggerComponent> {
        self.triggers.get(&id)
    }

    /// Get a mutable trigger
    pub fn get_trigger_mut(&mut self, id: ColliderId) -> Option<&mut TriggerComponent> {
        self.triggers.get_mut(&id)
    }

    /// Step every trigger against the tracked bodies.
    ///
    /// Bodies that were inside a trigger but are missing from `bodies`
    /// produce an Exit event.
    pub fn update(&mut self, delta_time: f32, bodies: &[TriggerBody]) -> &[TriggerEvent] {
        self.current_time += delta_time;
        self.last_events.clear();

        for (&trigger_id, trigger) in self.triggers.iter_mut() {
            if !trigger.is_enabled() {
                continue;
            }

            step_trigger(trigger_id, trigger, delta_time, self.current_time, bodies);
            self.last_events.extend(trigger.drain_events());
        }

        &self.last_events
    }

    /// Get events from the last update
    pub fn events(&self) -> &[TriggerEvent] {
        &self.last_events
    }

    /// Get all trigger ids
    pub fn trigger_ids(&self) -> impl Iterator<Item = ColliderId> + '_ {
        self.triggers.keys().copied()
    }

    /// Get trigger count
    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    /// Current simulation time
    pub fn current_time(&self) -> f32 {
        self.current_time
    }
}

/// Step a single trigger against the tracked bodies, queueing its events
pub fn step_trigger(
    trigger_id: ColliderId,
    trigger: &mut TriggerComponent,
    delta_time: f32,
    current_time: f32,
    bodies: &[TriggerBody],
) {
    for body in bodies {
        let inside = trigger.contains(body.position);
        trigger.process_overlap(trigger_id, body, inside, current_time);
    }

    let vanished: Vec<ColliderId> = trigger
        .overlapping()
        .filter(|id| !bodies.iter().any(|b| b.id == *id))
        .collect();
    for id in vanished {
        let position = trigger.position;
        trigger.force_exit(trigger_id, id, position);
    }

    trigger.update(trigger_id, delta_time, bodies);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::TriggerEventType;
    use crate::volume::TriggerVolume;

    fn id(index: u32) -> ColliderId {
        ColliderId::from_index(index)
    }

    #[test]
    fn test_trigger_system() {
        let mut system = TriggerSystem::new();
        system.register_trigger(id(1), TriggerComponent::new(TriggerVolume::sphere(1.0)));

        assert_eq!(system.trigger_count(), 1);
        assert!(system.get_trigger(id(1)).is_some());
    }

    #[test]
    fn test_trigger_overlap_detection() {
        let mut system = TriggerSystem::new();
        system.register_trigger(id(1), TriggerComponent::new(TriggerVolume::sphere(2.0)));

        let bodies = vec![TriggerBody::new(id(2)).with_position(Vec3::new(0.5, 0.0, 0.0))];
        let events = system.update(0.016, &bodies).to_vec();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, TriggerEventType::Enter);
        assert!(system.get_trigger(id(1)).unwrap().is_inside(id(2)));
    }

    #[test]
    fn test_trigger_exit() {
        let mut system = TriggerSystem::new();
        system.register_trigger(id(1), TriggerComponent::new(TriggerVolume::sphere(1.0)));

        let inside = vec![TriggerBody::new(id(2))];
        system.update(0.016, &inside);
        assert!(system.get_trigger(id(1)).unwrap().is_inside(id(2)));

        let outside = vec![TriggerBody::new(id(2)).with_position(Vec3::new(10.0, 0.0, 0.0))];
        let events = system.update(0.016, &outside).to_vec();
        assert!(!system.get_trigger(id(1)).unwrap().is_inside(id(2)));
        assert!(events[0].is_exit());
    }

    #[test]
    fn test_vanished_body_exits() {
        let mut system = TriggerSystem::new();
        system.register_trigger(id(1), TriggerComponent::new(TriggerVolume::sphere(1.0)));

        system.update(0.016, &[TriggerBody::new(id(2))]);
        let events = system.update(0.016, &[]).to_vec();

        assert_eq!(events.len(), 1);
        assert!(events[0].is_exit());
        assert_eq!(events[0].other, id(2));
    }

    #[test]
    fn test_moved_trigger_follows_position() {
        let mut system = TriggerSystem::new();
        system.register_trigger(id(1), TriggerComponent::new(TriggerVolume::sphere(1.0)));
        let bodies = vec![TriggerBody::new(id(2)).with_position(Vec3::new(5.0, 0.0, 0.0))];

        assert!(system.update(0.016, &bodies).is_empty());

        system
            .get_trigger_mut(id(1))
            .unwrap()
            .set_position(Vec3::new(5.0, 0.0, 0.5));
        assert!(system.update(0.016, &bodies)[0].is_enter());
    }
}
