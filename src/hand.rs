//! A set of phalanges tracking contacts with one target object.

use std::sync::Arc;

use tracing::{error, info};

use crate::config::HandConfig;
use crate::contact::ContactBus;
use crate::error::Result;
use crate::phalange::{self, Phalange};
use crate::pose::ContactPose;
use crate::publisher::PosePublisher;

/// Contact state of one phalange.
#[derive(Debug, Clone, PartialEq)]
pub struct PhalangeContact {
    pub name: String,
    pub touching: bool,
    pub pose: ContactPose,
}

/// Phalanges of a hand, in configuration order.
pub struct Hand {
    phalanges: Vec<Arc<Phalange>>,
}

impl Hand {
    pub fn new(phalanges: Vec<Arc<Phalange>>) -> Self {
        Self { phalanges }
    }

    /// Build every configured phalange, asking `make_publisher` for each one's
    /// pose publisher by phalange name.
    pub fn from_config<F>(config: &HandConfig, mut make_publisher: F) -> Result<Self>
    where
        F: FnMut(&str) -> Box<dyn PosePublisher>,
    {
        config.validate()?;
        let phalanges = config
            .phalanges
            .iter()
            .map(|p| {
                let target = config.target_for(p);
                Phalange::from_config(p, target, make_publisher(&p.name)).map(Arc::new)
            })
            .collect::<Result<Vec<_>>>()?;
        info!("Hand with {} phalanges", phalanges.len());
        Ok(Self { phalanges })
    }

    /// Subscribe every phalange to its sensor topic.
    pub fn attach(&self, bus: &mut ContactBus) {
        for p in &self.phalanges {
            phalange::attach(p, bus);
        }
    }

    /// Point every phalange at `obj_geom`. An empty id changes nothing.
    pub fn set_target_obj_geom(&self, obj_geom: &str) -> bool {
        if obj_geom.is_empty() {
            error!("Invalid target object geometry");
            return false;
        }
        self.phalanges
            .iter()
            .all(|p| p.set_target_obj_geom(obj_geom))
    }

    pub fn phalange(&self, name: &str) -> Option<&Arc<Phalange>> {
        self.phalanges.iter().find(|p| p.model().name == name)
    }

    pub fn phalanges(&self) -> &[Arc<Phalange>] {
        &self.phalanges
    }

    pub fn len(&self) -> usize {
        self.phalanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phalanges.is_empty()
    }

    /// Number of phalanges currently touching their target.
    pub fn touching_count(&self) -> usize {
        self.phalanges.iter().filter(|p| p.touching()).count()
    }

    pub fn contacts(&self) -> Vec<PhalangeContact> {
        self.phalanges
            .iter()
            .map(|p| {
                let (touching, pose) = p.snapshot();
                PhalangeContact {
                    name: p.model().name.clone(),
                    touching,
                    pose,
                }
            })
            .collect()
    }
}
