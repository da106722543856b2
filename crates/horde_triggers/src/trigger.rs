//! Trigger component

use crate::events::TriggerEvent;
use crate::filter::TriggerFilter;
use crate::system::TriggerBody;
use crate::volume::TriggerVolume;
use glam::Vec3;
use horde_core::ColliderId;
use std::collections::BTreeMap;

/// State of a collider inside a trigger
#[derive(Debug, Clone)]
pub struct TriggerOverlapState {
    /// When the collider entered
    pub enter_time: f32,
    /// Total time inside
    pub time_inside: f32,
    /// Entered during the current step, Stay starts on the next one
    fresh: bool,
}

/// Trigger component for detecting overlaps
#[derive(Debug, Clone)]
pub struct TriggerComponent {
    /// Trigger volume shape
    pub volume: TriggerVolume,
    /// Trigger filter
    pub filter: TriggerFilter,
    /// World position of the volume center
    pub position: Vec3,
    /// Whether the trigger is enabled
    enabled: bool,
    /// Whether to emit Stay events
    pub emit_stay_events: bool,
    /// Currently overlapping colliders
    overlapping: BTreeMap<ColliderId, TriggerOverlapState>,
    /// Queue of events to be processed
    event_queue: Vec<TriggerEvent>,
    /// Total trigger activations
    pub activation_count: u32,
}

impl TriggerComponent {
    /// Create a new trigger
    pub fn new(volume: TriggerVolume) -> Self {
        Self {
            volume,
            filter: TriggerFilter::new(),
            position: Vec3::ZERO,
            enabled: true,
            emit_stay_events: false,
            overlapping: BTreeMap::new(),
            event_queue: Vec::new(),
            activation_count: 0,
        }
    }

    /// Set filter
    pub fn with_filter(mut self, filter: TriggerFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Enable stay events
    pub fn with_stay_events(mut self) -> Self {
        self.emit_stay_events = true;
        self
    }

    /// Place the volume
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Start disabled
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Move the volume
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Resize the volume
    pub fn set_radius(&mut self, radius: f32) {
        self.volume.set_radius(radius);
    }

    /// Current bounding radius
    pub fn radius(&self) -> f32 {
        self.volume.bounding_radius()
    }

    /// Check if a world-space point is inside the volume
    pub fn contains(&self, point: Vec3) -> bool {
        self.volume.contains_point_at(point, self.position)
    }

    /// Check if a collider is currently inside this trigger
    pub fn is_inside(&self, collider: ColliderId) -> bool {
        self.overlapping.contains_key(&collider)
    }

    /// Get all colliders currently inside
    pub fn overlapping(&self) -> impl Iterator<Item = ColliderId> + '_ {
        self.overlapping.keys().copied()
    }

    /// Get the time a collider has been inside
    pub fn time_inside(&self, collider: ColliderId) -> Option<f32> {
        self.overlapping.get(&collider).map(|s| s.time_inside)
    }

    /// Whether the trigger reports overlaps
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable the trigger
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Disable the trigger.
    ///
    /// Overlaps are forgotten without Exit events, so a re-enabled trigger
    /// reports Enter for anything already inside.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.overlapping.clear();
        self.event_queue.clear();
    }

    /// Process a collider overlapping or not overlapping the volume
    pub fn process_overlap(
        &mut self,
        trigger: ColliderId,
        body: &TriggerBody,
        is_overlapping: bool,
        current_time: f32,
    ) {
        if !self.enabled {
            return;
        }

        if !self.filter.passes(body.id, body.layers, &body.tags, trigger) {
            return;
        }

        let was_overlapping = self.overlapping.contains_key(&body.id);

        if is_overlapping && !was_overlapping {
            self.overlapping.insert(
                body.id,
                TriggerOverlapState {
                    enter_time: current_time,
                    time_inside: 0.0,
                    fresh: true,
                },
            );

            let event = TriggerEvent::enter(trigger, body.id)
                .with_trigger_position(self.position)
                .with_other_position(body.position);
            self.event_queue.push(event);
            self.activation_count += 1;
        } else if !is_overlapping && was_overlapping {
            self.force_exit(trigger, body.id, body.position);
        }
    }

    /// Emit an Exit for a collider that is no longer tracked at all
    pub fn force_exit(&mut self, trigger: ColliderId, other: ColliderId, last_position: Vec3) {
        if let Some(state) = self.overlapping.remove(&other) {
            let event = TriggerEvent::exit(trigger, other, state.time_inside)
                .with_trigger_position(self.position)
                .with_other_position(last_position);
            self.event_queue.push(event);
        }
    }

    /// Update the trigger (call once per step, after overlaps were processed)
    pub fn update(&mut self, trigger: ColliderId, delta_time: f32, bodies: &[TriggerBody]) {
        if !self.enabled {
            return;
        }

        for (&collider, state) in self.overlapping.iter_mut() {
            if state.fresh {
                state.fresh = false;
                continue;
            }
            state.time_inside += delta_time;

            if self.emit_stay_events {
                let other_position = bodies
                    .iter()
                    .find(|b| b.id == collider)
                    .map(|b| b.position)
                    .unwrap_or(self.position);
                let event = TriggerEvent::stay(trigger, collider, state.time_inside)
                    .with_trigger_position(self.position)
                    .with_other_position(other_position);
                self.event_queue.push(event);
            }
        }
    }

    /// Drain events for external processing
    pub fn drain_events(&mut self) -> Vec<TriggerEvent> {
        std::mem::take(&mut self.event_queue)
    }

    /// Forget every overlap and queued event
    pub fn reset(&mut self) {
        self.overlapping.clear();
        self.event_queue.clear();
    }
}

impl Default for TriggerComponent {
    fn default() -> Self {
        Self::new(TriggerVolume::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::TriggerEventType;

    fn id(index: u32) -> ColliderId {
        ColliderId::from_index(index)
    }

    #[test]
    fn test_trigger_overlap() {
        let mut trigger = TriggerComponent::new(TriggerVolume::sphere(1.0));
        let body = TriggerBody::new(id(2));

        trigger.process_overlap(id(1), &body, true, 0.0);
        assert!(trigger.is_inside(id(2)));

        trigger.process_overlap(id(1), &body, false, 1.0);
        assert!(!trigger.is_inside(id(2)));

        let kinds: Vec<_> = trigger.drain_events().iter().map(|e| e.event_type).collect();
        assert_eq!(kinds, vec![TriggerEventType::Enter, TriggerEventType::Exit]);
    }

    #[test]
    fn test_stay_starts_after_enter_step() {
        let mut trigger = TriggerComponent::new(TriggerVolume::sphere(1.0)).with_stay_events();
        let bodies = vec![TriggerBody::new(id(2))];

        trigger.process_overlap(id(1), &bodies[0], true, 0.0);
        trigger.update(id(1), 0.1, &bodies);
        assert_eq!(trigger.drain_events().len(), 1);

        trigger.process_overlap(id(1), &bodies[0], true, 0.1);
        trigger.update(id(1), 0.1, &bodies);
        let events = trigger.drain_events();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_stay());
        assert!((events[0].time_in_trigger - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_disabled_trigger_ignores_overlaps() {
        let mut trigger = TriggerComponent::new(TriggerVolume::sphere(1.0));
        let body = TriggerBody::new(id(2));

        trigger.process_overlap(id(1), &body, true, 0.0);
        trigger.disable();
        assert!(!trigger.is_inside(id(2)));
        assert!(trigger.drain_events().is_empty());

        trigger.process_overlap(id(1), &body, true, 0.5);
        assert!(!trigger.is_inside(id(2)));

        trigger.enable();
        trigger.process_overlap(id(1), &body, true, 1.0);
        assert!(trigger.drain_events()[0].is_enter());
    }

    #[test]
    fn test_filter_rejects() {
        let mut trigger = TriggerComponent::new(TriggerVolume::sphere(1.0))
            .with_filter(TriggerFilter::new().only_colliders([id(3)]));

        trigger.process_overlap(id(1), &TriggerBody::new(id(2)), true, 0.0);
        assert!(!trigger.is_inside(id(2)));

        trigger.process_overlap(id(1), &TriggerBody::new(id(3)), true, 0.0);
        assert!(trigger.is_inside(id(3)));
        assert_eq!(trigger.activation_count, 1);
    }
}
