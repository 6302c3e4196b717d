//! ICR grasp support
//!
//! Contact-pose estimation for the phalanges of a robotic hand and a test
//! client for the independent contact region (ICR) server.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **transform** - Rigid transforms in double precision
//! 2. **contact** - Contact sensor messages and the topic bus delivering them
//! 3. **pose** / **publisher** - Contact pose values and their outbound channel
//! 4. **phalange** - Per-segment contact pose estimation (averaging + projection)
//! 5. **hand** - Phalanges sharing a target object
//! 6. **service** / **client** - ICR server services and the three-step test workflow
//! 7. **config** - TOML configuration
//! 8. **urdf** - Phalange models from URDF hand descriptions (feature = "urdf")

pub mod client;
pub mod config;
pub mod contact;
pub mod error;
pub mod hand;
pub mod phalange;
pub mod pose;
pub mod publisher;
pub mod service;
pub mod transform;

#[cfg(feature = "urdf")]
pub mod urdf;

// Re-export commonly used types
pub use client::{ClientReport, ServiceTestClient, StepOutcome};
pub use config::{ClientConfig, HandConfig, PhalangeConfig};
pub use contact::{ContactBus, ContactSink, ContactState, ContactsState, Header};
pub use error::{IcrError, Result, ServiceError};
pub use hand::{Hand, PhalangeContact};
pub use phalange::{Phalange, PhalangeModel};
pub use pose::{ContactPose, ContactPoseStamped};
pub use publisher::{ChannelPublisher, NullPublisher, PosePublisher};
pub use service::{IcrService, LoopbackIcrServer, SetPoseRequest, SetPoseResponse};
pub use transform::RigidTransform;

#[cfg(feature = "urdf")]
pub use urdf::UrdfHandLoader;

// Re-export glam for convenience
pub use glam;
