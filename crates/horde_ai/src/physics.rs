//! Collision layers and the physics queries perception relies on

use glam::Vec3;
use horde_core::ColliderId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A collision layer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionLayer(pub u32);

impl CollisionLayer {
    /// Default layer (world geometry)
    pub const DEFAULT: Self = Self(0);
    /// Player layer
    pub const PLAYER: Self = Self(1);
    /// Hit boxes of agents
    pub const AI_BODY_PART: Self = Self(2);
    /// Agent root colliders
    pub const AI_ENTITY: Self = Self(3);
    /// Agent trigger volumes
    pub const AI_TRIGGER: Self = Self(4);
    /// Lights and food agents can see
    pub const VISUAL_AGGRAVATOR: Self = Self(5);
    /// Sound emitters agents can hear
    pub const AUDIO_AGGRAVATOR: Self = Self(6);

    /// Create a custom layer
    pub const fn custom(id: u32) -> Self {
        Self(id)
    }

    /// Get the layer as a bitmask
    pub const fn as_mask(&self) -> u32 {
        1 << self.0
    }

    /// Combine layers into one mask
    pub fn mask(layers: &[CollisionLayer]) -> u32 {
        layers.iter().fold(0u32, |acc, l| acc | l.as_mask())
    }

    /// Check membership in a mask
    pub const fn in_mask(&self, mask: u32) -> bool {
        mask & self.as_mask() != 0
    }
}

impl Default for CollisionLayer {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Layers that can block or complete a line of sight to the player
pub const LINE_OF_SIGHT_MASK: u32 = CollisionLayer::DEFAULT.as_mask()
    | CollisionLayer::PLAYER.as_mask()
    | CollisionLayer::AI_BODY_PART.as_mask();

/// A single ray intersection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub collider: ColliderId,
    pub point: Vec3,
    /// Distance from the ray origin
    pub distance: f32,
    pub layer: CollisionLayer,
}

/// Physics queries consumed by the behavior engine
pub trait PhysicsQuery {
    /// Every intersection along a ray, in no particular order.
    ///
    /// `direction` is normalized; only colliders on a layer in `mask` are
    /// reported. Colliders containing the origin are not reported.
    fn raycast_all(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: u32) -> Vec<RaycastHit>;
}

/// A world without colliders
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyWorld;

impl PhysicsQuery for EmptyWorld {
    fn raycast_all(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32, _mask: u32) -> Vec<RaycastHit> {
        Vec::new()
    }
}

/// A sphere collider in a [`SphereWorld`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereCollider {
    pub center: Vec3,
    pub radius: f32,
    pub layer: CollisionLayer,
}

/// A physics world made of sphere colliders.
///
/// Enough to answer line-of-sight queries in headless simulations and tests.
#[derive(Debug, Clone, Default)]
pub struct SphereWorld {
    colliders: BTreeMap<ColliderId, SphereCollider>,
}

impl SphereWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a collider
    pub fn insert(&mut self, id: ColliderId, center: Vec3, radius: f32, layer: CollisionLayer) {
        self.colliders.insert(
            id,
            SphereCollider {
                center,
                radius: radius.max(0.0),
                layer,
            },
        );
    }

    pub fn remove(&mut self, id: ColliderId) -> Option<SphereCollider> {
        self.colliders.remove(&id)
    }

    /// Move a collider, returning false if it does not exist
    pub fn set_position(&mut self, id: ColliderId, center: Vec3) -> bool {
        match self.colliders.get_mut(&id) {
            Some(collider) => {
                collider.center = center;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: ColliderId) -> Option<&SphereCollider> {
        self.colliders.get(&id)
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}

impl PhysicsQuery for SphereWorld {
    fn raycast_all(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: u32) -> Vec<RaycastHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO || max_distance <= 0.0 {
            return Vec::new();
        }

        self.colliders
            .iter()
            .filter(|(_, sphere)| sphere.layer.in_mask(mask))
            .filter_map(|(&id, sphere)| {
                let distance = ray_sphere(origin, direction, sphere.center, sphere.radius)?;
                (distance <= max_distance).then(|| RaycastHit {
                    collider: id,
                    point: origin + direction * distance,
                    distance,
                    layer: sphere.layer,
                })
            })
            .collect()
    }
}

/// Distance along a normalized ray to the first sphere surface hit, if the
/// origin is outside the sphere
fn ray_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let offset = origin - center;
    let c = offset.length_squared() - radius * radius;
    if c <= 0.0 {
        return None;
    }
    let b = offset.dot(direction);
    if b > 0.0 {
        return None;
    }
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    Some(-b - discriminant.sqrt())
}
