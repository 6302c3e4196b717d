//! Three-step ICR server test workflow.
//!
//! 1. set the number of fingers
//! 2. load an object file
//! 3. compute ICRs, only if both previous steps succeeded

use std::path::PathBuf;

use tracing::{error, info};

use crate::config::ClientConfig;
use crate::error::ServiceError;
use crate::service::{
    AddFingersRequest, ComputeIcrRequest, IcrService, LoadObjectRequest, ADD_FINGERS_SERVICE,
    COMPUTE_ICR_SERVICE, LOAD_OBJECT_SERVICE,
};

/// Outcome of one service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The server answered with success.
    Succeeded,
    /// The server answered without success.
    Refused,
    /// The call could not be made.
    CallFailed(String),
    /// Not attempted because an earlier step did not succeed.
    Skipped,
}

impl StepOutcome {
    fn from_call(result: Result<bool, ServiceError>) -> Self {
        match result {
            Ok(true) => StepOutcome::Succeeded,
            Ok(false) => StepOutcome::Refused,
            Err(e) => StepOutcome::CallFailed(e.to_string()),
        }
    }

    pub fn succeeded(&self) -> bool {
        *self == StepOutcome::Succeeded
    }
}

/// Outcome of every step of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientReport {
    pub add_fingers: StepOutcome,
    pub load_object: StepOutcome,
    pub compute_icr: StepOutcome,
}

impl ClientReport {
    /// True if the ICR computation was requested and succeeded.
    pub fn succeeded(&self) -> bool {
        self.compute_icr.succeeded()
    }
}

/// Drives the ICR server services in order.
pub struct ServiceTestClient<S> {
    service: S,
    config: ClientConfig,
}

impl<S: IcrService> ServiceTestClient<S> {
    pub fn new(service: S, config: ClientConfig) -> Self {
        Self { service, config }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Run the workflow for `number` fingers and the object at `path`.
    ///
    /// Service failures are logged and reported, never returned as errors.
    pub fn run(&self, number: u64, path: impl Into<PathBuf>) -> ClientReport {
        let add_fingers = AddFingersRequest { number };
        let load_object = LoadObjectRequest {
            path: path.into(),
            name: self.config.object_name.clone(),
        };
        let compute_icr = ComputeIcrRequest {
            centerpoint_ids: self.config.centerpoint_ids.clone(),
        };

        info!("Path where the *.obj file will be searched: {:?}", load_object.path);
        info!("Object will have default name: {}", load_object.name);
        info!(
            "Number of loaded center-points: {}",
            compute_icr.centerpoint_ids.len()
        );

        let fingers_outcome = call(ADD_FINGERS_SERVICE, || {
            self.service.add_fingers(&add_fingers).map(|r| r.success)
        });
        let object_outcome = call(LOAD_OBJECT_SERVICE, || {
            self.service.load_object(&load_object).map(|r| r.success)
        });

        let icr_outcome = if fingers_outcome.succeeded() && object_outcome.succeeded() {
            let outcome = call(COMPUTE_ICR_SERVICE, || {
                self.service.compute_icr(&compute_icr).map(|r| r.success)
            });
            if outcome.succeeded() {
                info!("ICR server computed the regions");
            }
            outcome
        } else {
            error!("ICR server does not know about the loaded object and/or added fingers");
            StepOutcome::Skipped
        };

        ClientReport {
            add_fingers: fingers_outcome,
            load_object: object_outcome,
            compute_icr: icr_outcome,
        }
    }
}

fn call(name: &str, f: impl FnOnce() -> Result<bool, ServiceError>) -> StepOutcome {
    let outcome = StepOutcome::from_call(f());
    match &outcome {
        StepOutcome::CallFailed(reason) => error!("{}: {}", name, reason),
        other => info!("{} response: {}", name, other.succeeded()),
    }
    outcome
}
