//! URDF hand descriptions
//!
//! Derives one phalange configuration per link carrying a collision element.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::config::PhalangeConfig;

/// Phalange configurations extracted from a URDF robot description.
pub struct UrdfHandLoader;

impl UrdfHandLoader {
    /// Load a URDF file, keeping links whose name starts with `link_prefix`.
    pub fn load<P: AsRef<Path>>(path: P, link_prefix: &str) -> Result<Vec<PhalangeConfig>> {
        let path = path.as_ref();
        info!("Loading hand description from {:?}", path);

        let robot = urdf_rs::read_file(path)
            .with_context(|| format!("Failed to load URDF from {:?}", path))?;
        Ok(Self::phalanges(&robot, link_prefix))
    }

    /// Parse a URDF document held in memory.
    pub fn load_str(urdf: &str, link_prefix: &str) -> Result<Vec<PhalangeConfig>> {
        let robot = urdf_rs::read_from_string(urdf).context("Failed to parse URDF")?;
        Ok(Self::phalanges(&robot, link_prefix))
    }

    fn phalanges(robot: &urdf_rs::Robot, link_prefix: &str) -> Vec<PhalangeConfig> {
        let phalanges: Vec<PhalangeConfig> = robot
            .links
            .iter()
            .filter(|link| link.name.starts_with(link_prefix))
            .filter_map(|link| {
                // The first collision element is the one the contact sensor reports.
                let collision = link.collision.first()?;
                let geom = collision
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("{}_collision", link.name));

                let mut config = PhalangeConfig::named(&link.name, &geom);
                config.origin = Self::vec3(&collision.origin.xyz);
                config.rpy = Self::vec3(&collision.origin.rpy);
                Some(config)
            })
            .collect();

        info!(
            "Found {} phalanges in robot {}",
            phalanges.len(),
            robot.name
        );
        phalanges
    }

    fn vec3(v: &urdf_rs::Vec3) -> [f64; 3] {
        [v[0], v[1], v[2]]
    }
}
