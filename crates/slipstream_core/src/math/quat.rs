//! Unit quaternions for orientation.

use bytemuck::{Pod, Zeroable};

/// Unit quaternion.
///
/// Orientation of a character. Only yaw rotations are produced by the
/// movement model, but interpolation must handle arbitrary unit quaternions
/// arriving in snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Quat {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
    /// W (scalar) component.
    pub w: f32,
}

impl Quat {
    /// The identity rotation.
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a quaternion from raw components.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Creates a rotation of `angle` radians about the world up axis.
    #[inline]
    #[must_use]
    pub fn from_yaw(angle: f32) -> Self {
        let half = angle * 0.5;
        Self::new(0.0, half.sin(), 0.0, half.cos())
    }

    /// Dot product with another quaternion.
    #[inline]
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Returns the length of the quaternion.
    #[inline]
    #[must_use]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Returns the normalized quaternion, or identity if the length is zero.
    #[inline]
    #[must_use]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self::new(self.x / len, self.y / len, self.z / len, self.w / len)
        } else {
            Self::IDENTITY
        }
    }

    /// Spherical interpolation between `self` and `other` at fraction `t`.
    ///
    /// Always takes the shortest arc. Near-parallel quaternions fall back to
    /// normalized linear interpolation to avoid dividing by a vanishing sine.
    #[must_use]
    pub fn slerp(self, other: Self, t: f32) -> Self {
        let mut dot = self.dot(other);

        // Take the shortest path around the hypersphere.
        let mut end = other;
        if dot < 0.0 {
            dot = -dot;
            end = Self::new(-other.x, -other.y, -other.z, -other.w);
        }

        if dot > 0.9995 {
            // Angles this small lose precision in sin(); nlerp is exact enough.
            return Self::new(
                self.x + (end.x - self.x) * t,
                self.y + (end.y - self.y) * t,
                self.z + (end.z - self.z) * t,
                self.w + (end.w - self.w) * t,
            )
            .normalize();
        }

        let theta = dot.clamp(-1.0, 1.0).acos();
        let sin_theta = theta.sin();
        let a = ((1.0 - t) * theta).sin() / sin_theta;
        let b = (t * theta).sin() / sin_theta;

        Self::new(
            self.x * a + end.x * b,
            self.y * a + end.y * b,
            self.z * a + end.z * b,
            self.w * a + end.w * b,
        )
    }

    /// Angular distance in radians to another unit quaternion.
    ///
    /// Computed from the relative rotation's vector part rather than `acos`
    /// of the dot product, which loses precision near zero angle. `q` and
    /// `-q` are the same rotation, so the result is always the shortest arc.
    #[must_use]
    pub fn angle_to(self, other: Self) -> f32 {
        // Relative rotation self * other⁻¹: scalar part cos(θ/2), vector
        // part with norm sin(θ/2).
        let w = self.dot(other);
        let x = self.x * other.w - self.w * other.x - self.y * other.z + self.z * other.y;
        let y = self.y * other.w - self.w * other.y + self.x * other.z - self.z * other.x;
        let z = self.z * other.w - self.w * other.z - self.x * other.y + self.y * other.x;
        let sin_half = (x * x + y * y + z * z).sqrt();
        2.0 * sin_half.atan2(w.abs())
    }

    /// Returns true if all components are finite.
    #[inline]
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }
}

impl Default for Quat {
    /// Identity, not the zero quaternion.
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_identity_default() {
        assert_eq!(Quat::default(), Quat::IDENTITY);
        assert!((Quat::IDENTITY.length() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_from_yaw_is_unit() {
        for angle in [0.0, 0.3, FRAC_PI_2, PI, -2.1] {
            let q = Quat::from_yaw(angle);
            assert!((q.length() - 1.0).abs() < 1e-6, "yaw {angle} not unit");
        }
    }

    #[test]
    fn test_slerp_endpoints() {
        let a = Quat::from_yaw(0.0);
        let b = Quat::from_yaw(FRAC_PI_2);

        let start = a.slerp(b, 0.0);
        let end = a.slerp(b, 1.0);
        assert!(start.angle_to(a) < 1e-5);
        assert!(end.angle_to(b) < 1e-5);
    }

    #[test]
    fn test_slerp_midpoint() {
        let a = Quat::from_yaw(0.0);
        let b = Quat::from_yaw(FRAC_PI_2);
        let mid = a.slerp(b, 0.5);
        let expected = Quat::from_yaw(FRAC_PI_2 * 0.5);
        assert!(mid.angle_to(expected) < 1e-5);
    }

    #[test]
    fn test_slerp_angle_monotonic() {
        // Angular distance from each endpoint is monotonic in t.
        let a = Quat::from_yaw(-1.0);
        let b = Quat::from_yaw(1.5);

        let mut prev_from_a = 0.0;
        let mut prev_from_b = a.angle_to(b);
        for i in 1..=10 {
            let t = i as f32 / 10.0;
            let q = a.slerp(b, t);
            let from_a = a.angle_to(q);
            let from_b = b.angle_to(q);
            assert!(from_a >= prev_from_a - 1e-5);
            assert!(from_b <= prev_from_b + 1e-5);
            prev_from_a = from_a;
            prev_from_b = from_b;
        }
    }

    #[test]
    fn test_slerp_shortest_arc() {
        // q and -q are the same rotation; slerp must not take the long way.
        let a = Quat::from_yaw(0.1);
        let b = Quat::from_yaw(0.4);
        let negated = Quat::new(-b.x, -b.y, -b.z, -b.w);

        let direct = a.slerp(b, 0.5);
        let flipped = a.slerp(negated, 0.5);
        assert!(direct.angle_to(flipped) < 1e-5);
    }

    #[test]
    fn test_angle_to_identical_rotation_is_zero() {
        // acos of the dot product would amplify f32 rounding near 1 into
        // ~1e-3; the vector-part form must not.
        let q = Quat::from_yaw(0.73);
        assert!(q.angle_to(q) < 1e-6);
        assert!(q.angle_to(q.normalize()) < 1e-6);
        // The negation is the same rotation.
        let negated = Quat::new(-q.x, -q.y, -q.z, -q.w);
        assert!(q.angle_to(negated) < 1e-6);
    }

    #[test]
    fn test_angle_to_known_yaw_separation() {
        let angle = Quat::from_yaw(0.2).angle_to(Quat::from_yaw(1.2));
        assert!((angle - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_normalize_zero_is_identity() {
        let zero = Quat::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(zero.normalize(), Quat::IDENTITY);
    }

    #[test]
    fn test_pod_size() {
        assert_eq!(std::mem::size_of::<Quat>(), 16);
    }
}
