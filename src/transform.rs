//! Rigid transforms in double precision.

use std::ops::Mul;

use glam::{DQuat, DVec3, EulerRot};

/// A rotation followed by a translation.
///
/// Applied to a point `p` it yields `rotation * p + translation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    pub rotation: DQuat,
    pub translation: DVec3,
}

impl RigidTransform {
    pub const IDENTITY: Self = Self {
        rotation: DQuat::IDENTITY,
        translation: DVec3::ZERO,
    };

    /// Create a transform from a rotation and a translation.
    pub fn new(rotation: DQuat, translation: DVec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Create a pure translation.
    pub fn from_translation(translation: DVec3) -> Self {
        Self {
            rotation: DQuat::IDENTITY,
            translation,
        }
    }

    /// Create a transform from an origin and fixed-axis roll, pitch, yaw.
    ///
    /// The rotation is `Rz(yaw) * Ry(pitch) * Rx(roll)`, the URDF convention.
    pub fn from_origin_rpy(origin: DVec3, rpy: DVec3) -> Self {
        Self {
            rotation: quat_from_rpy(rpy),
            translation: origin,
        }
    }

    /// Decompose into origin and (roll, pitch, yaw).
    pub fn to_origin_rpy(&self) -> (DVec3, DVec3) {
        let (yaw, pitch, roll) = self.rotation.to_euler(EulerRot::ZYX);
        (self.translation, DVec3::new(roll, pitch, yaw))
    }

    /// Inverse transform.
    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        Self {
            rotation,
            translation: -(rotation * self.translation),
        }
    }

    /// Transform a point (rotation and translation).
    pub fn transform_point(&self, point: DVec3) -> DVec3 {
        self.rotation * point + self.translation
    }

    /// Transform a direction (rotation only).
    pub fn transform_vector(&self, vector: DVec3) -> DVec3 {
        self.rotation * vector
    }

    /// True if every component is finite.
    pub fn is_finite(&self) -> bool {
        self.rotation.is_finite() && self.translation.is_finite()
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for RigidTransform {
    type Output = RigidTransform;

    /// `(a * b).transform_point(p) == a.transform_point(b.transform_point(p))`
    fn mul(self, rhs: RigidTransform) -> RigidTransform {
        RigidTransform {
            rotation: self.rotation * rhs.rotation,
            translation: self.rotation * rhs.translation + self.translation,
        }
    }
}

/// Quaternion from fixed-axis roll, pitch, yaw.
pub fn quat_from_rpy(rpy: DVec3) -> DQuat {
    DQuat::from_euler(EulerRot::ZYX, rpy.z, rpy.y, rpy.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_identity() {
        let t = RigidTransform::default();
        let p = DVec3::new(1.0, -2.0, 3.0);
        assert_eq!(t, RigidTransform::IDENTITY);
        assert_eq!(t.transform_point(p), p);
    }

    #[test]
    fn test_rpy_yaw_rotates_x_to_y() {
        let t = RigidTransform::from_origin_rpy(DVec3::ZERO, DVec3::new(0.0, 0.0, FRAC_PI_2));
        let v = t.transform_vector(DVec3::X);
        assert!((v - DVec3::Y).length() < EPS, "got {v:?}");
    }

    #[test]
    fn test_rpy_roll_rotates_y_to_z() {
        let t = RigidTransform::from_origin_rpy(DVec3::ZERO, DVec3::new(FRAC_PI_2, 0.0, 0.0));
        let v = t.transform_vector(DVec3::Y);
        assert!((v - DVec3::Z).length() < EPS, "got {v:?}");
    }

    #[test]
    fn test_rpy_composition_order() {
        // yaw is applied last
        let rpy = DVec3::new(FRAC_PI_2, 0.0, FRAC_PI_2);
        let t = RigidTransform::from_origin_rpy(DVec3::ZERO, rpy);
        // Rx(90) maps Y to Z, Rz(90) leaves Z alone
        let v = t.transform_vector(DVec3::Y);
        assert!((v - DVec3::Z).length() < EPS, "got {v:?}");
    }

    #[test]
    fn test_to_origin_rpy_roundtrip() {
        let origin = DVec3::new(0.1, 0.2, 0.3);
        let rpy = DVec3::new(0.3, -0.2, 1.1);
        let (o, r) = RigidTransform::from_origin_rpy(origin, rpy).to_origin_rpy();
        assert!((o - origin).length() < EPS);
        assert!((r - rpy).length() < 1e-9, "got {r:?}");
    }

    #[test]
    fn test_inverse() {
        let t = RigidTransform::from_origin_rpy(
            DVec3::new(1.0, 2.0, 3.0),
            DVec3::new(0.4, 0.5, 0.6),
        );
        let p = DVec3::new(-0.5, 0.25, 2.0);
        let back = t.inverse().transform_point(t.transform_point(p));
        assert!((back - p).length() < 1e-9);

        let id = t * t.inverse();
        assert!(id.translation.length() < 1e-9);
        assert!((id.rotation.dot(DQuat::IDENTITY).abs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_compose_matches_sequential_application() {
        let a = RigidTransform::from_origin_rpy(
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 0.0, FRAC_PI_2),
        );
        let b = RigidTransform::from_translation(DVec3::new(0.0, 2.0, 0.0));
        let p = DVec3::new(1.0, 1.0, 1.0);
        let composed = (a * b).transform_point(p);
        let sequential = a.transform_point(b.transform_point(p));
        assert!((composed - sequential).length() < EPS);
    }

    #[test]
    fn test_transform_vector_ignores_translation() {
        let t = RigidTransform::from_translation(DVec3::new(5.0, 5.0, 5.0));
        assert_eq!(t.transform_vector(DVec3::Z), DVec3::Z);
    }

    #[test]
    fn test_is_finite() {
        assert!(RigidTransform::IDENTITY.is_finite());
        let t = RigidTransform::from_translation(DVec3::new(f64::NAN, 0.0, 0.0));
        assert!(!t.is_finite());
    }
}
