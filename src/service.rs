//! Request/response types of the phalange and ICR server services.

use std::fs;
use std::path::{Path, PathBuf};

use glam::DVec3;
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::error::ServiceError;

pub const ADD_FINGERS_SERVICE: &str = "/icr_server/add_fingers";
pub const LOAD_OBJECT_SERVICE: &str = "/icr_server/load_wfront_obj";
pub const COMPUTE_ICR_SERVICE: &str = "/icr_server/compute_icr";

/// Reference contact pose reset: origin plus roll, pitch, yaw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetPoseRequest {
    pub origin: DVec3,
    pub rpy: DVec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SetPoseResponse {
    pub success: bool,
}

/// Set the number of fingers of the grasp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddFingersRequest {
    pub number: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AddFingersResponse {
    pub success: bool,
}

/// Load a Wavefront object file under a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadObjectRequest {
    pub path: PathBuf,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadObjectResponse {
    pub success: bool,
}

/// Compute independent contact regions around the given object vertices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeIcrRequest {
    pub centerpoint_ids: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComputeIcrResponse {
    pub success: bool,
}

/// The ICR server as seen by a client.
///
/// `Err` means the call could not be made; a refused request is
/// `Ok` with `success == false`.
pub trait IcrService {
    fn add_fingers(&self, req: &AddFingersRequest) -> Result<AddFingersResponse, ServiceError>;

    fn load_object(&self, req: &LoadObjectRequest) -> Result<LoadObjectResponse, ServiceError>;

    fn compute_icr(&self, req: &ComputeIcrRequest) -> Result<ComputeIcrResponse, ServiceError>;
}

#[derive(Debug, Default)]
struct LoopbackState {
    fingers: u64,
    object: Option<LoadedObject>,
}

#[derive(Debug, Clone)]
struct LoadedObject {
    name: String,
    vertex_count: usize,
}

/// In-process stand-in for the ICR server.
///
/// Checks requests and their order the way the server does; it performs no
/// ICR computation.
#[derive(Debug, Default)]
pub struct LoopbackIcrServer {
    state: Mutex<LoopbackState>,
}

impl LoopbackIcrServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fingers(&self) -> u64 {
        self.state.lock().fingers
    }

    /// Name and vertex count of the loaded object.
    pub fn object(&self) -> Option<(String, usize)> {
        self.state
            .lock()
            .object
            .as_ref()
            .map(|o| (o.name.clone(), o.vertex_count))
    }
}

/// Number of `v` records in a Wavefront object file.
///
/// Comments and names are not required to be UTF-8.
pub fn count_obj_vertices(path: &Path) -> std::io::Result<usize> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .filter(|line| line.split_whitespace().next() == Some("v"))
        .count())
}

impl IcrService for LoopbackIcrServer {
    fn add_fingers(&self, req: &AddFingersRequest) -> Result<AddFingersResponse, ServiceError> {
        if req.number == 0 {
            warn!("Refusing to configure zero fingers");
            return Ok(AddFingersResponse { success: false });
        }
        self.state.lock().fingers = req.number;
        info!("Configured {} fingers", req.number);
        Ok(AddFingersResponse { success: true })
    }

    fn load_object(&self, req: &LoadObjectRequest) -> Result<LoadObjectResponse, ServiceError> {
        let vertex_count = match count_obj_vertices(&req.path) {
            Ok(n) => n,
            Err(e) => {
                warn!("Cannot read object file {:?}: {}", req.path, e);
                return Ok(LoadObjectResponse { success: false });
            }
        };
        if vertex_count == 0 {
            warn!("Object file {:?} has no vertices", req.path);
            return Ok(LoadObjectResponse { success: false });
        }
        info!(
            "Loaded object {} with {} vertices from {:?}",
            req.name, vertex_count, req.path
        );
        self.state.lock().object = Some(LoadedObject {
            name: req.name.clone(),
            vertex_count,
        });
        Ok(LoadObjectResponse { success: true })
    }

    fn compute_icr(&self, req: &ComputeIcrRequest) -> Result<ComputeIcrResponse, ServiceError> {
        let state = self.state.lock();
        let Some(object) = state.object.as_ref() else {
            warn!("No object loaded");
            return Ok(ComputeIcrResponse { success: false });
        };
        if state.fingers == 0 {
            warn!("No fingers configured");
            return Ok(ComputeIcrResponse { success: false });
        }
        if req.centerpoint_ids.is_empty() {
            warn!("No center points given");
            return Ok(ComputeIcrResponse { success: false });
        }
        if let Some(id) = req
            .centerpoint_ids
            .iter()
            .find(|&&id| id as usize >= object.vertex_count)
        {
            warn!(
                "Center point {} out of range for {} ({} vertices)",
                id, object.name, object.vertex_count
            );
            return Ok(ComputeIcrResponse { success: false });
        }
        Ok(ComputeIcrResponse { success: true })
    }
}
