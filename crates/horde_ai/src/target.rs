//! Targets and threats

use glam::Vec3;
use horde_core::ColliderId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a target refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TargetKind {
    /// No target
    #[default]
    None,
    /// A patrol waypoint
    Waypoint,
    /// A player seen with line of sight
    VisualPlayer,
    /// A light source
    VisualLight,
    /// Something to eat
    VisualFood,
    /// A sound
    Audio,
}

impl TargetKind {
    /// Whether this is one of the visual kinds
    pub fn is_visual(self) -> bool {
        matches!(
            self,
            TargetKind::VisualPlayer | TargetKind::VisualLight | TargetKind::VisualFood
        )
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetKind::None => "None",
            TargetKind::Waypoint => "Waypoint",
            TargetKind::VisualPlayer => "VisualPlayer",
            TargetKind::VisualLight => "VisualLight",
            TargetKind::VisualFood => "VisualFood",
            TargetKind::Audio => "Audio",
        };
        f.write_str(name)
    }
}

/// A point of interest: the current target or a perceived threat.
///
/// A target of kind [`TargetKind::None`] always has infinite distance and no
/// source. Each agent owns three of these by value (target, visual threat,
/// audio threat), so copying one into another never aliases.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    kind: TargetKind,
    source: Option<ColliderId>,
    position: Vec3,
    distance: f32,
    timestamp: f32,
}

impl Target {
    /// The "no target" sentinel
    pub const NONE: Self = Self {
        kind: TargetKind::None,
        source: None,
        position: Vec3::ZERO,
        distance: f32::INFINITY,
        timestamp: 0.0,
    };

    /// Create an empty target
    pub const fn new() -> Self {
        Self::NONE
    }

    /// Overwrite every field and stamp with `now`.
    ///
    /// Setting kind `None` is the same as [`Target::clear`].
    pub fn set(
        &mut self,
        kind: TargetKind,
        source: Option<ColliderId>,
        position: Vec3,
        distance: f32,
        now: f32,
    ) {
        if kind == TargetKind::None {
            self.clear();
            return;
        }
        self.kind = kind;
        self.source = source;
        self.position = position;
        self.distance = distance.max(0.0);
        self.timestamp = now;
    }

    /// Reset to the "no target" sentinel
    pub fn clear(&mut self) {
        *self = Self::NONE;
    }

    /// Refresh the distance without touching the timestamp
    pub fn set_distance(&mut self, distance: f32) {
        if self.kind != TargetKind::None {
            self.distance = distance.max(0.0);
        }
    }

    #[inline]
    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    #[inline]
    pub fn source(&self) -> Option<ColliderId> {
        self.source
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Time of the last [`Target::set`]
    #[inline]
    pub fn timestamp(&self) -> f32 {
        self.timestamp
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        self.kind == TargetKind::None
    }

    #[inline]
    pub fn is(&self, kind: TargetKind) -> bool {
        self.kind == kind
    }
}

impl Default for Target {
    fn default() -> Self {
        Self::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_target_is_none() {
        let target = Target::new();
        assert!(target.is_none());
        assert_eq!(target.distance(), f32::INFINITY);
        assert_eq!(target.source(), None);
    }

    #[test]
    fn test_set_and_clear() {
        let mut target = Target::new();
        let source = ColliderId::from_index(4);
        target.set(TargetKind::Audio, Some(source), Vec3::new(1.0, 0.0, 2.0), 3.0, 1.5);

        assert!(target.is(TargetKind::Audio));
        assert_eq!(target.source(), Some(source));
        assert_eq!(target.distance(), 3.0);
        assert_eq!(target.timestamp(), 1.5);

        target.clear();
        assert_eq!(target.kind(), TargetKind::None);
        assert_eq!(target.distance(), f32::INFINITY);
        assert_eq!(target.source(), None);
    }

    #[test]
    fn test_set_none_clears() {
        let mut target = Target::new();
        target.set(TargetKind::Waypoint, None, Vec3::ONE, 2.0, 1.0);
        target.set(TargetKind::None, Some(ColliderId::from_index(1)), Vec3::ONE, 2.0, 2.0);
        assert_eq!(target, Target::NONE);
    }

    #[test]
    fn test_timestamp_follows_last_set() {
        let mut target = Target::new();
        let mut last = 0.0;
        for (i, now) in [0.0, 0.5, 0.5, 2.0].into_iter().enumerate() {
            target.set(TargetKind::Waypoint, None, Vec3::ZERO, i as f32, now);
            assert!(target.timestamp() >= last);
            last = target.timestamp();
        }
        assert_eq!(target.timestamp(), 2.0);
    }

    #[test]
    fn test_set_distance_ignored_when_none() {
        let mut target = Target::new();
        target.set_distance(4.0);
        assert_eq!(target.distance(), f32::INFINITY);

        target.set(TargetKind::VisualFood, None, Vec3::ZERO, 1.0, 0.0);
        target.set_distance(4.0);
        assert_eq!(target.distance(), 4.0);
    }

    #[test]
    fn test_copies_do_not_alias() {
        let mut visual = Target::new();
        visual.set(TargetKind::VisualLight, None, Vec3::X, 1.0, 0.0);
        let mut current = visual;
        visual.clear();
        assert!(current.is(TargetKind::VisualLight));
        current.clear();
        assert!(visual.is_none());
    }

    #[test]
    fn test_visual_kinds() {
        assert!(TargetKind::VisualPlayer.is_visual());
        assert!(TargetKind::VisualLight.is_visual());
        assert!(TargetKind::VisualFood.is_visual());
        assert!(!TargetKind::Audio.is_visual());
        assert!(!TargetKind::Waypoint.is_visual());
        assert!(!TargetKind::None.is_visual());
    }
}
