//! Animation driving
//!
//! Agents write named parameters to an [`AnimationDriver`] once per tick and
//! read root motion back from it.

use glam::{Quat, Vec3};
use std::any::Any;
use std::collections::{HashMap, HashSet};

/// An animation system the behavior engine drives through named parameters
pub trait AnimationDriver {
    fn set_float(&mut self, name: &str, value: f32);
    fn set_bool(&mut self, name: &str, value: bool);
    fn set_integer(&mut self, name: &str, value: i32);

    fn float(&self, name: &str) -> Option<f32>;
    fn bool(&self, name: &str) -> Option<bool>;
    fn integer(&self, name: &str) -> Option<i32>;

    /// Root motion translation produced during the last tick
    fn delta_position(&self) -> Vec3;

    /// Root rotation after the last tick
    fn root_rotation(&self) -> Quat;

    /// Whether `state` is the current state of `layer`
    fn is_playing(&self, layer: &str, state: &str) -> bool;

    fn set_look_at_position(&mut self, position: Vec3);
    fn set_look_at_weight(&mut self, weight: f32);

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Records parameters and serves scripted root motion.
///
/// Stands in for a full animation system in headless simulation.
#[derive(Debug, Clone, Default)]
pub struct AnimatorParameters {
    floats: HashMap<String, f32>,
    bools: HashMap<String, bool>,
    integers: HashMap<String, i32>,
    delta_position: Vec3,
    root_rotation: Quat,
    playing: HashMap<String, String>,
    look_at_position: Option<Vec3>,
    look_at_weight: f32,
}

impl AnimatorParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the root motion returned from now on
    pub fn set_root_motion(&mut self, delta_position: Vec3, root_rotation: Quat) {
        self.delta_position = delta_position;
        self.root_rotation = root_rotation;
    }

    /// Make `state` the current state of `layer`
    pub fn play(&mut self, layer: impl Into<String>, state: impl Into<String>) {
        self.playing.insert(layer.into(), state.into());
    }

    /// Leave `layer` without a current state
    pub fn stop(&mut self, layer: &str) {
        self.playing.remove(layer);
    }

    pub fn current_state(&self, layer: &str) -> Option<&str> {
        self.playing.get(layer).map(String::as_str)
    }

    pub fn look_at_position(&self) -> Option<Vec3> {
        self.look_at_position
    }

    pub fn look_at_weight(&self) -> f32 {
        self.look_at_weight
    }

    /// Names of every parameter written so far
    pub fn parameter_names(&self) -> HashSet<&str> {
        self.floats
            .keys()
            .chain(self.bools.keys())
            .chain(self.integers.keys())
            .map(String::as_str)
            .collect()
    }
}

impl AnimationDriver for AnimatorParameters {
    fn set_float(&mut self, name: &str, value: f32) {
        self.floats.insert(name.to_string(), value);
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        self.bools.insert(name.to_string(), value);
    }

    fn set_integer(&mut self, name: &str, value: i32) {
        self.integers.insert(name.to_string(), value);
    }

    fn float(&self, name: &str) -> Option<f32> {
        self.floats.get(name).copied()
    }

    fn bool(&self, name: &str) -> Option<bool> {
        self.bools.get(name).copied()
    }

    fn integer(&self, name: &str) -> Option<i32> {
        self.integers.get(name).copied()
    }

    fn delta_position(&self) -> Vec3 {
        self.delta_position
    }

    fn root_rotation(&self) -> Quat {
        self.root_rotation
    }

    fn is_playing(&self, layer: &str, state: &str) -> bool {
        self.playing.get(layer).map_or(false, |current| current == state)
    }

    fn set_look_at_position(&mut self, position: Vec3) {
        self.look_at_position = Some(position);
    }

    fn set_look_at_weight(&mut self, weight: f32) {
        self.look_at_weight = weight;
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

    #[test]
    fn test_parameters_recorded() {
        let mut animator = AnimatorParameters::new();
        animator.set_float("Speed", 2.0);
        animator.set_bool("Feeding", true);
        animator.set_integer("Seeking", -1);

        assert_eq!(animator.float("Speed"), Some(2.0));
        assert_eq!(animator.bool("Feeding"), Some(true));
        assert_eq!(animator.integer("Seeking"), Some(-1));
        assert_eq!(animator.float("Attack"), None);
        assert_eq!(animator.parameter_names().len(), 3);
    }

    #[test]
    fn test_layer_states() {
        let mut animator = AnimatorParameters::new();
        animator.play("Cinematic", "Feeding");

        assert!(animator.is_playing("Cinematic", "Feeding"));
        assert!(!animator.is_playing("Base", "Feeding"));

        animator.stop("Cinematic");
        assert_eq!(animator.current_state("Cinematic"), None);
    }
}
