//! Trigger volume shapes

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Trigger volume shapes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TriggerVolume {
    /// Axis-aligned box
    Box {
        /// Half-extents (width/2, height/2, depth/2)
        half_extents: Vec3,
    },
    /// Sphere
    Sphere {
        /// Radius
        radius: f32,
    },
}

impl TriggerVolume {
    /// Create a box trigger volume
    pub fn box_shape(width: f32, height: f32, depth: f32) -> Self {
        Self::Box {
            half_extents: Vec3::new(width / 2.0, height / 2.0, depth / 2.0),
        }
    }

    /// Create a cube trigger volume
    pub fn cube(size: f32) -> Self {
        Self::box_shape(size, size, size)
    }

    /// Create a sphere trigger volume
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// Check if a point is inside this volume (at origin)
    pub fn contains_point(&self, point: Vec3) -> bool {
        match self {
            Self::Box { half_extents } => {
                let p = point.abs();
                p.x <= half_extents.x && p.y <= half_extents.y && p.z <= half_extents.z
            }
            Self::Sphere { radius } => point.length_squared() <= radius * radius,
        }
    }

    /// Check if a world-space point is inside the volume centered at `center`
    pub fn contains_point_at(&self, point: Vec3, center: Vec3) -> bool {
        self.contains_point(point - center)
    }

    /// Radius of the smallest sphere enclosing the volume
    pub fn bounding_radius(&self) -> f32 {
        match self {
            Self::Box { half_extents } => half_extents.length(),
            Self::Sphere { radius } => *radius,
        }
    }

    /// Resize the volume so its bounding radius equals `radius`.
    ///
    /// Boxes are scaled uniformly.
    pub fn set_radius(&mut self, radius: f32) {
        let radius = radius.max(0.0);
        match self {
            Self::Sphere { radius: r } => *r = radius,
            Self::Box { half_extents } => {
                let current = half_extents.length();
                if current > f32::EPSILON {
                    *half_extents *= radius / current;
                }
            }
        }
    }
}

impl Default for TriggerVolume {
    fn default() -> Self {
        Self::Sphere { radius: 1.0 }
    }
}
