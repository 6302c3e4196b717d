//! Contact pose values and the stamped notification published for them.

use glam::{DQuat, DVec3};

use crate::contact::Header;
use crate::transform::RigidTransform;

/// Estimated contact position and orientation of a phalange.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPose {
    pub position: DVec3,
    pub orientation: DQuat,
}

impl ContactPose {
    pub fn new(position: DVec3, orientation: DQuat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// The nominal pose of a reference transform, with its rotation normalized.
    pub fn from_reference(reference: &RigidTransform) -> Self {
        Self {
            position: reference.translation,
            orientation: reference.rotation.normalize(),
        }
    }
}

impl Default for ContactPose {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            orientation: DQuat::IDENTITY,
        }
    }
}

/// A contact pose with message metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactPoseStamped {
    pub header: Header,
    pub pose: ContactPose,
}
