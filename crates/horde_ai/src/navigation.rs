//! Path following
//!
//! The behavior engine never plans paths itself. States hand destinations to
//! a [`PathFollower`] and read back its status and steering every tick.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Outcome of the last path request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PathStatus {
    /// The path reaches the destination
    #[default]
    Complete,
    /// The path ends short of the destination
    Partial,
    /// No path could be found
    Invalid,
}

/// A movement service that follows paths to destinations
pub trait PathFollower {
    /// Request a path to `destination`; false if the request was refused
    fn set_destination(&mut self, destination: Vec3) -> bool;

    fn has_path(&self) -> bool;

    /// A path request is still being computed
    fn path_pending(&self) -> bool;

    /// The current path was invalidated by a world change
    fn is_path_stale(&self) -> bool;

    fn path_status(&self) -> PathStatus;

    /// Next corner the follower is steering towards
    fn steering_target(&self) -> Vec3;

    /// Velocity the follower wants to move at
    fn desired_velocity(&self) -> Vec3;

    /// Override the velocity for the next movement step
    fn set_velocity(&mut self, velocity: Vec3);

    /// Let the follower drive the agent's position
    fn set_update_position(&mut self, enabled: bool);

    /// Let the follower drive the agent's rotation
    fn set_update_rotation(&mut self, enabled: bool);

    fn updates_position(&self) -> bool;

    fn updates_rotation(&self) -> bool;

    fn set_stopped(&mut self, stopped: bool);

    fn is_stopped(&self) -> bool;

    /// Current position of the simulated agent
    fn position(&self) -> Vec3;

    /// Teleport without pathing
    fn warp(&mut self, position: Vec3);

    /// Advance movement by `delta_time` seconds
    fn update(&mut self, delta_time: f32);

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Follows a straight line to its destination at a fixed speed.
///
/// Path status, pending and stale flags can be forced to simulate the
/// responses of a real navigation mesh.
#[derive(Debug, Clone)]
pub struct DirectPathFollower {
    position: Vec3,
    velocity: Vec3,
    destination: Option<Vec3>,
    /// Movement speed
    pub speed: f32,
    /// Distance at which the destination counts as reached
    pub arrival_threshold: f32,
    update_position: bool,
    update_rotation: bool,
    stopped: bool,
    status: PathStatus,
    pending_steps: u32,
    /// Steps each new path request stays pending
    pub path_latency: u32,
    /// The previous path stays usable while a new one is pending
    keeps_path: bool,
    stale: bool,
    velocity_override: Option<Vec3>,
}

impl DirectPathFollower {
    /// Create a new follower
    pub fn new(speed: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            destination: None,
            speed,
            arrival_threshold: 0.05,
            update_position: true,
            update_rotation: true,
            stopped: false,
            status: PathStatus::Complete,
            pending_steps: 0,
            path_latency: 0,
            keeps_path: false,
            stale: false,
            velocity_override: None,
        }
    }

    /// Start at `position`
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Keep new path requests pending for `steps` updates
    pub fn with_path_latency(mut self, steps: u32) -> Self {
        self.path_latency = steps;
        self
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Force the reported path status
    pub fn set_path_status(&mut self, status: PathStatus) {
        self.status = status;
    }

    /// Force the stale flag
    pub fn set_path_stale(&mut self, stale: bool) {
        self.stale = stale;
    }

    /// Force the pending flag for `steps` updates, re-planning the current
    /// path if there is one
    pub fn set_pending_steps(&mut self, steps: u32) {
        self.keeps_path = self.destination.is_some();
        self.pending_steps = steps;
    }

    /// Drop the current path
    pub fn reset_path(&mut self) {
        self.destination = None;
        self.velocity = Vec3::ZERO;
        self.pending_steps = 0;
        self.keeps_path = false;
    }

    /// Check if the destination has been reached
    pub fn has_arrived(&self) -> bool {
        match self.destination {
            Some(destination) => self.position.distance(destination) <= self.arrival_threshold,
            None => true,
        }
    }

    /// Get distance to destination
    pub fn distance_to_destination(&self) -> f32 {
        self.destination
            .map_or(0.0, |destination| self.position.distance(destination))
    }
}

impl Default for DirectPathFollower {
    fn default() -> Self {
        Self::new(3.5)
    }
}

impl PathFollower for DirectPathFollower {
    fn set_destination(&mut self, destination: Vec3) -> bool {
        if !destination.is_finite() {
            log::warn!("Rejected non-finite destination {:?}", destination);
            return false;
        }
        self.keeps_path = self.has_path();
        self.destination = Some(destination);
        self.pending_steps = self.path_latency;
        self.stale = false;
        true
    }

    fn has_path(&self) -> bool {
        self.destination.is_some() && (self.pending_steps == 0 || self.keeps_path)
    }

    fn path_pending(&self) -> bool {
        self.pending_steps > 0
    }

    fn is_path_stale(&self) -> bool {
        self.stale
    }

    fn path_status(&self) -> PathStatus {
        self.status
    }

    fn steering_target(&self) -> Vec3 {
        match self.destination {
            Some(destination) if self.pending_steps == 0 => destination,
            _ => self.position,
        }
    }

    fn desired_velocity(&self) -> Vec3 {
        if self.stopped || !self.has_path() || self.has_arrived() {
            return Vec3::ZERO;
        }
        (self.steering_target() - self.position).normalize_or_zero() * self.speed
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity_override = Some(velocity);
    }

    fn set_update_position(&mut self, enabled: bool) {
        self.update_position = enabled;
    }

    fn set_update_rotation(&mut self, enabled: bool) {
        self.update_rotation = enabled;
    }

    fn updates_position(&self) -> bool {
        self.update_position
    }

    fn updates_rotation(&self) -> bool {
        self.update_rotation
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn warp(&mut self, position: Vec3) {
        self.position = position;
        self.velocity = Vec3::ZERO;
    }

    fn update(&mut self, delta_time: f32) {
        if self.pending_steps > 0 {
            self.pending_steps -= 1;
            self.velocity = Vec3::ZERO;
            return;
        }

        if self.stopped || delta_time <= 0.0 {
            self.velocity = Vec3::ZERO;
            self.velocity_override = None;
            return;
        }

        let step = match self.velocity_override.take() {
            Some(velocity) => velocity * delta_time,
            None => {
                let Some(destination) = self.destination else {
                    self.velocity = Vec3::ZERO;
                    return;
                };
                let to_destination = destination - self.position;
                let distance = to_destination.length();
                if distance <= self.arrival_threshold {
                    self.velocity = Vec3::ZERO;
                    return;
                }
                to_destination / distance * (self.speed * delta_time).min(distance)
            }
        };

        self.velocity = step / delta_time;
        if self.update_position {
            self.position += step;
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_follower_movement() {
        let mut follower = DirectPathFollower::new(5.0);
        follower.set_destination(Vec3::new(10.0, 0.0, 0.0));
        assert!(follower.has_path());

        for _ in 0..10 {
            follower.update(0.1);
        }

        assert_relative_eq!(follower.position().x, 5.0, epsilon = 1e-4);
        assert_relative_eq!(follower.desired_velocity().x, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_follower_arrival() {
        let mut follower = DirectPathFollower::new(10.0);
        follower.set_destination(Vec3::new(1.0, 0.0, 0.0));

        for _ in 0..100 {
            follower.update(0.1);
            if follower.has_arrived() {
                break;
            }
        }

        assert!(follower.has_arrived());
        assert!(follower.has_path());
        assert_eq!(follower.desired_velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_pending_path() {
        let mut follower = DirectPathFollower::new(1.0).with_path_latency(2);
        follower.set_destination(Vec3::X);

        assert!(follower.path_pending());
        assert!(!follower.has_path());
        assert_eq!(follower.steering_target(), Vec3::ZERO);

        follower.update(0.1);
        follower.update(0.1);
        assert!(!follower.path_pending());
        assert!(follower.has_path());
        assert_eq!(follower.steering_target(), Vec3::X);

        follower.set_destination(Vec3::Z);
        assert!(follower.path_pending());
        assert!(follower.has_path());
    }

    #[test]
    fn test_stopped_follower_does_not_move() {
        let mut follower = DirectPathFollower::new(1.0);
        follower.set_destination(Vec3::X);
        follower.set_stopped(true);
        follower.update(0.5);

        assert_eq!(follower.position(), Vec3::ZERO);
        assert_eq!(follower.desired_velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_velocity_override_moves_once() {
        let mut follower = DirectPathFollower::new(1.0);
        follower.set_velocity(Vec3::new(0.0, 0.0, 2.0));
        follower.update(0.5);
        assert_relative_eq!(follower.position().z, 1.0);

        follower.update(0.5);
        assert_relative_eq!(follower.position().z, 1.0);
    }

    #[test]
    fn test_position_authority() {
        let mut follower = DirectPathFollower::new(1.0);
        follower.set_destination(Vec3::X);
        follower.set_update_position(false);
        follower.update(0.5);

        assert_eq!(follower.position(), Vec3::ZERO);
        assert_relative_eq!(follower.velocity().x, 1.0);
    }

    #[test]
    fn test_rejects_non_finite_destination() {
        let mut follower = DirectPathFollower::new(1.0);
        assert!(!follower.set_destination(Vec3::new(f32::NAN, 0.0, 0.0)));
        assert!(!follower.has_path());
    }
}
