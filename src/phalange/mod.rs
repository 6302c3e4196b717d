//! Phalange contact adapter.
//!
//! A [`Phalange`] listens to the contact sensor of one finger segment and
//! turns every batch into exactly one contact pose:
//!
//! - if the batch holds a record of the phalange's own geometry touching the
//!   current target geometry, the pose is the mean contact position with an
//!   orientation projected from the mean contact normal;
//! - otherwise the pose falls back to the reference contact transform.
//!
//! All mutable state sits behind one lock. Processing a batch, changing the
//! target and resetting the reference each hold it for their whole
//! read-compute-write-publish sequence.

pub mod projection;

use std::sync::Arc;

use glam::{DQuat, DVec3};
use parking_lot::Mutex;
use tracing::{error, info, trace};

use crate::config::{PhalangeConfig, DEFAULT_TARGET_GEOM};
use crate::contact::{ContactBus, ContactSink, ContactsState, Header};
use crate::error::{IcrError, Result};
use crate::pose::{ContactPose, ContactPoseStamped};
use crate::publisher::PosePublisher;
use crate::service::{SetPoseRequest, SetPoseResponse};
use crate::transform::RigidTransform;

pub use projection::{average_vectors, project_orientation, DEGENERATE_NORMAL_EPS};

/// Identity of a phalange within the hand model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhalangeModel {
    /// Namespace of the phalange's topics and services.
    pub name: String,
    /// Frame the published contact poses are expressed in.
    pub frame_id: String,
    /// Collision geometry of the phalange as named by the contact sensor.
    pub geom: String,
}

impl PhalangeModel {
    pub fn new(name: &str, frame_id: &str, geom: &str) -> Self {
        Self {
            name: name.to_string(),
            frame_id: frame_id.to_string(),
            geom: geom.to_string(),
        }
    }
}

struct PhalangeState {
    reference: RigidTransform,
    target_geom: String,
    touching: bool,
    pose: ContactPose,
}

/// Contact pose estimator for one finger segment.
pub struct Phalange {
    model: PhalangeModel,
    sensor_topic: String,
    publisher: Box<dyn PosePublisher>,
    state: Mutex<PhalangeState>,
}

impl Phalange {
    /// Create a phalange whose reference contact frame is `reference`.
    ///
    /// Until the first batch arrives the contact pose is the reference pose.
    /// A reference that is not a finite rigid transform is replaced by the
    /// identity.
    pub fn new(
        reference: RigidTransform,
        model: PhalangeModel,
        sensor_topic: impl Into<String>,
        publisher: Box<dyn PosePublisher>,
    ) -> Self {
        let sensor_topic = sensor_topic.into();
        let reference = if is_valid_reference(&reference) {
            reference
        } else {
            error!(
                "{}: rejecting invalid reference pose {:?}, using identity",
                model.name, reference
            );
            RigidTransform::IDENTITY
        };
        info!(
            "Phalange {} listening on {} for geometry {}",
            model.name, sensor_topic, model.geom
        );
        Self {
            model,
            sensor_topic,
            publisher,
            state: Mutex::new(PhalangeState {
                reference,
                target_geom: DEFAULT_TARGET_GEOM.to_string(),
                touching: false,
                pose: ContactPose::from_reference(&reference),
            }),
        }
    }

    /// Create a phalange from its configuration, with the configured target
    /// or `target_geom` when the configuration names none.
    pub fn from_config(
        config: &PhalangeConfig,
        target_geom: &str,
        publisher: Box<dyn PosePublisher>,
    ) -> Result<Self> {
        config.validate()?;
        let phalange = Self::new(
            config.reference(),
            config.model(),
            config.sensor_topic.clone(),
            publisher,
        );
        let target = config.target_geom.as_deref().unwrap_or(target_geom);
        if target != DEFAULT_TARGET_GEOM && !phalange.set_target_obj_geom(target) {
            return Err(IcrError::InvalidPhalange {
                name: config.name.clone(),
                reason: "empty target geometry id".to_string(),
            });
        }
        Ok(phalange)
    }

    /// Process one contact batch and publish the resulting pose.
    pub fn listen_contacts(&self, contacts: &ContactsState) -> ContactPose {
        let header = Header {
            seq: contacts.header.seq,
            stamp: contacts.header.stamp,
            frame_id: self.model.frame_id.clone(),
        };

        let mut guard = self.state.lock();
        let state = &mut *guard;

        let mut matches = contacts
            .states
            .iter()
            .filter(|c| c.is_pair(&self.model.geom, &state.target_geom));

        let pose = match matches.next() {
            Some(contact) => {
                let skipped = matches.count();
                if skipped > 0 {
                    trace!(
                        "{}: ignoring {} further contact records against {}",
                        self.model.name,
                        skipped,
                        state.target_geom
                    );
                }
                let position = average_vectors(&contact.contact_positions);
                let normal = average_vectors(&contact.contact_normals);
                state.touching = true;
                ContactPose::new(position, project_orientation(&state.reference, normal))
            }
            None => {
                state.touching = false;
                ContactPose::from_reference(&state.reference)
            }
        };
        state.pose = pose;

        self.publisher.publish(&ContactPoseStamped { header, pose });
        pose
    }

    /// Change the geometry whose contacts this phalange tracks.
    ///
    /// Returns false and leaves the target unchanged if `obj_geom` is empty.
    pub fn set_target_obj_geom(&self, obj_geom: &str) -> bool {
        if obj_geom.is_empty() {
            error!("Invalid target object geometry for {}", self.model.name);
            return false;
        }
        self.state.lock().target_geom = obj_geom.to_string();
        info!("{}: target geometry set to {}", self.model.name, obj_geom);
        true
    }

    /// Replace the reference contact transform.
    ///
    /// Returns false and leaves the reference unchanged on non-finite input.
    pub fn set_reference_pose(&self, origin: DVec3, rpy: DVec3) -> bool {
        let reference = RigidTransform::from_origin_rpy(origin, rpy);
        if !reference.is_finite() {
            error!(
                "{}: rejecting non-finite reference pose {:?} {:?}",
                self.model.name, origin, rpy
            );
            return false;
        }
        self.state.lock().reference = reference;
        info!(
            "{}: reference contact pose set to {:?} rpy {:?}",
            self.model.name, origin, rpy
        );
        true
    }

    /// The `set_ref_contact_pose` service.
    pub fn set_ref_contact_pose(&self, req: &SetPoseRequest) -> SetPoseResponse {
        SetPoseResponse {
            success: self.set_reference_pose(req.origin, req.rpy),
        }
    }

    /// Last published contact pose.
    pub fn contact_pose(&self) -> ContactPose {
        self.state.lock().pose
    }

    pub fn contact_position(&self) -> DVec3 {
        self.state.lock().pose.position
    }

    pub fn contact_orientation(&self) -> DQuat {
        self.state.lock().pose.orientation
    }

    /// Whether the last batch contained a contact with the target geometry.
    pub fn touching(&self) -> bool {
        self.state.lock().touching
    }

    /// Touch flag and pose of the same batch.
    pub fn snapshot(&self) -> (bool, ContactPose) {
        let state = self.state.lock();
        (state.touching, state.pose)
    }

    pub fn target_obj_geom(&self) -> String {
        self.state.lock().target_geom.clone()
    }

    pub fn reference(&self) -> RigidTransform {
        self.state.lock().reference
    }

    pub fn model(&self) -> &PhalangeModel {
        &self.model
    }

    pub fn sensor_topic(&self) -> &str {
        &self.sensor_topic
    }

    /// Topic the contact poses are published on.
    pub fn pose_topic(&self) -> String {
        format!("{}/contact_pose", self.model.name)
    }

    /// Name of the reference pose reset service.
    pub fn set_pose_service(&self) -> String {
        format!("{}/set_ref_contact_pose", self.model.name)
    }
}

fn is_valid_reference(reference: &RigidTransform) -> bool {
    reference.is_finite() && reference.rotation.length() > DEGENERATE_NORMAL_EPS
}

impl ContactSink for Phalange {
    fn deliver(&self, batch: &ContactsState) {
        self.listen_contacts(batch);
    }
}

/// Subscribe `phalange` to its sensor topic on `bus`.
pub fn attach(phalange: &Arc<Phalange>, bus: &mut ContactBus) {
    let sink: Arc<dyn ContactSink> = phalange.clone();
    bus.subscribe(phalange.sensor_topic.clone(), sink);
}
