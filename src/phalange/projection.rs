//! Contact averaging and orientation projection.
//!
//! The contact frame of a phalange is anchored on its reference transform.
//! A measured contact normal tilts that frame: the frame's Z axis follows the
//! normal, X and Y span the tangent plane.

use glam::{DMat3, DQuat, DVec3};
use tracing::warn;

use crate::transform::RigidTransform;

/// Normals shorter than this (in the reference frame) carry no direction.
pub const DEGENERATE_NORMAL_EPS: f64 = 1e-9;

/// Below this length a projected axis is treated as collapsed onto the normal.
const COLLAPSED_AXIS_EPS: f64 = 1e-6;

/// Arithmetic mean of `vectors`; the zero vector when empty.
pub fn average_vectors(vectors: &[DVec3]) -> DVec3 {
    if vectors.is_empty() {
        return DVec3::ZERO;
    }
    let sum: DVec3 = vectors.iter().copied().sum();
    sum / vectors.len() as f64
}

/// Orthonormal basis with `normal` as its third column.
///
/// The first column is the world X axis projected onto the plane orthogonal
/// to `normal` (`P = I - n nᵀ`), the second completes a right-handed frame.
/// `normal` must be finite and non-zero; its length is ignored.
pub(crate) fn tangent_basis(normal: DVec3) -> DMat3 {
    let normal = normal.normalize();
    let projector = DMat3::IDENTITY - outer(normal, normal);

    let projected_x = projector * DVec3::X;
    let (x_axis, y_axis) = if projected_x.length() < COLLAPSED_AXIS_EPS {
        // Normal along X: anchor on the projected Y axis instead.
        let y_axis = (projector * DVec3::Y).normalize();
        (y_axis.cross(normal), y_axis)
    } else {
        let x_axis = projected_x.normalize();
        (x_axis, normal.cross(x_axis))
    };

    DMat3::from_cols(x_axis, y_axis, normal)
}

/// Orientation of the contact frame for an averaged contact `normal`.
///
/// `normal` is expressed in the same frame as `reference`. A normal equal to
/// the reference frame's own Z axis returns the reference rotation unchanged.
/// A zero or non-finite normal also returns the reference rotation.
pub fn project_orientation(reference: &RigidTransform, normal: DVec3) -> DQuat {
    let n_ref = reference.rotation.inverse() * normal;
    let length = n_ref.length();
    if !length.is_finite() || length < DEGENERATE_NORMAL_EPS {
        warn!(
            "Degenerate contact normal {:?}, keeping reference orientation",
            normal
        );
        return reference.rotation.normalize();
    }

    let basis = tangent_basis(n_ref / length);
    let correction = DQuat::from_mat3(&basis);

    (reference.rotation * correction).normalize()
}

fn outer(a: DVec3, b: DVec3) -> DMat3 {
    DMat3::from_cols(a * b.x, a * b.y, a * b.z)
}
