//! Angle and orientation helpers shared by the behavior states
//!
//! Forward is +Z and up is +Y.

use glam::{Quat, Vec3};

/// Unsigned angle between two vectors in degrees, 0 if either is degenerate
pub fn angle_between(from: Vec3, to: Vec3) -> f32 {
    let denominator = (from.length_squared() * to.length_squared()).sqrt();
    if denominator < 1e-15 {
        return 0.0;
    }
    let cos = (from.dot(to) / denominator).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Angle from `from` to `to` in degrees, signed by the Y component of their
/// cross product
pub fn signed_angle(from: Vec3, to: Vec3) -> f32 {
    if from == to {
        return 0.0;
    }
    let angle = angle_between(from, to);
    if from.cross(to).y < 0.0 {
        -angle
    } else {
        angle
    }
}

/// Direction sign with zero counted as positive
pub fn sign(value: f32) -> i32 {
    if value < 0.0 {
        -1
    } else {
        1
    }
}

/// Yaw-only rotation facing `direction`, `None` if it has no horizontal part
pub fn look_rotation(direction: Vec3) -> Option<Quat> {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    if flat.length_squared() < 1e-8 {
        return None;
    }
    Some(Quat::from_rotation_y(flat.x.atan2(flat.z)))
}

/// Rotate `current` towards `target` by fraction `t` (clamped to 0..=1)
pub fn slerp_towards(current: Quat, target: Quat, t: f32) -> Quat {
    current.slerp(target, t.clamp(0.0, 1.0)).normalize()
}

/// Linear interpolation with `t` clamped to 0..=1
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_angle_between() {
        assert_relative_eq!(angle_between(Vec3::Z, Vec3::X), 90.0, epsilon = 1e-4);
        assert_relative_eq!(angle_between(Vec3::Z, -Vec3::Z), 180.0, epsilon = 1e-4);
        assert_eq!(angle_between(Vec3::ZERO, Vec3::X), 0.0);
    }

    #[test]
    fn test_signed_angle() {
        assert_relative_eq!(signed_angle(Vec3::Z, Vec3::X), 90.0, epsilon = 1e-4);
        assert_relative_eq!(signed_angle(Vec3::Z, -Vec3::X), -90.0, epsilon = 1e-4);
        assert_eq!(signed_angle(Vec3::Z, Vec3::Z), 0.0);
    }

    #[test]
    fn test_sign() {
        assert_eq!(sign(0.0), 1);
        assert_eq!(sign(-0.5), -1);
        assert_eq!(sign(3.0), 1);
    }

    #[test]
    fn test_look_rotation() {
        let rotation = look_rotation(Vec3::new(1.0, 5.0, 0.0)).unwrap();
        let forward = rotation * Vec3::Z;
        assert_relative_eq!(forward.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(forward.y, 0.0, epsilon = 1e-5);

        let behind = look_rotation(-Vec3::Z).unwrap() * Vec3::Z;
        assert_relative_eq!(behind.z, -1.0, epsilon = 1e-5);

        assert!(look_rotation(Vec3::Y).is_none());
    }

    #[test]
    fn test_lerp_clamps() {
        assert_relative_eq!(lerp(0.0, 1.0, 0.25), 0.25);
        assert_relative_eq!(lerp(0.0, 1.0, 4.0), 1.0);
    }
}
