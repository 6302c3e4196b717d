//! Configuration for phalanges, hands and the service client
//!
//! Loaded from TOML. Every section has defaults so a configuration file only
//! needs to name what differs.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{IcrError, Result};
use crate::phalange::PhalangeModel;
use crate::transform::RigidTransform;

/// Target geometry a phalange matches against until told otherwise.
pub const DEFAULT_TARGET_GEOM: &str = "default";

/// One phalange: its identity, sensor topic and reference contact pose.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PhalangeConfig {
    /// Namespace of the phalange's topics and services.
    pub name: String,
    /// Frame the published contact poses are expressed in.
    pub frame_id: String,
    /// Collision geometry of this phalange as named by the contact sensor.
    pub geom: String,
    /// Topic the contact sensor publishes on.
    pub sensor_topic: String,
    /// Reference contact frame origin in the phalange frame.
    #[serde(default)]
    pub origin: [f64; 3],
    /// Reference contact frame roll, pitch, yaw.
    #[serde(default)]
    pub rpy: [f64; 3],
    /// Initial target geometry. Falls back to the hand's, then to `"default"`.
    #[serde(default)]
    pub target_geom: Option<String>,
}

impl PhalangeConfig {
    /// Configuration for a phalange whose frame and sensor follow the usual naming.
    pub fn named(name: &str, geom: &str) -> Self {
        Self {
            name: name.to_string(),
            frame_id: name.to_string(),
            geom: geom.to_string(),
            sensor_topic: format!("{name}_contact_sensor_state"),
            origin: [0.0; 3],
            rpy: [0.0; 3],
            target_geom: None,
        }
    }

    pub fn model(&self) -> PhalangeModel {
        PhalangeModel::new(&self.name, &self.frame_id, &self.geom)
    }

    pub fn reference(&self) -> RigidTransform {
        RigidTransform::from_origin_rpy(DVec3::from_array(self.origin), DVec3::from_array(self.rpy))
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| IcrError::InvalidPhalange {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        if self.name.is_empty() {
            return Err(invalid("empty name"));
        }
        if self.geom.is_empty() {
            return Err(invalid("empty geometry id"));
        }
        if self.sensor_topic.is_empty() {
            return Err(invalid("empty sensor topic"));
        }
        if matches!(&self.target_geom, Some(t) if t.is_empty()) {
            return Err(invalid("empty target geometry id"));
        }
        if !self.origin.iter().chain(&self.rpy).all(|v| v.is_finite()) {
            return Err(invalid("non-finite reference pose"));
        }
        Ok(())
    }
}

fn default_publisher_capacity() -> usize {
    16
}

/// A set of phalanges sharing one target object.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HandConfig {
    #[serde(default)]
    pub target_geom: Option<String>,
    /// Capacity of each phalange's pose channel.
    #[serde(default = "default_publisher_capacity")]
    pub publisher_capacity: usize,
    #[serde(default, rename = "phalange")]
    pub phalanges: Vec<PhalangeConfig>,
}

impl Default for HandConfig {
    fn default() -> Self {
        Self {
            target_geom: None,
            publisher_capacity: default_publisher_capacity(),
            phalanges: Vec::new(),
        }
    }
}

impl HandConfig {
    /// Load a hand configuration from a TOML file.
    ///
    /// ```no_run
    /// use icr::config::HandConfig;
    ///
    /// let config = HandConfig::from_file("hand.toml")?;
    /// # Ok::<(), icr::IcrError>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate a hand configuration.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: HandConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as TOML.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| IcrError::Config(e.to_string()))?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.phalanges.is_empty() {
            return Err(IcrError::Config("no phalanges configured".to_string()));
        }
        if self.publisher_capacity == 0 {
            return Err(IcrError::Config("publisher_capacity must be > 0".to_string()));
        }
        if matches!(&self.target_geom, Some(t) if t.is_empty()) {
            return Err(IcrError::Config("empty target geometry id".to_string()));
        }
        let mut names = HashSet::new();
        for phalange in &self.phalanges {
            phalange.validate()?;
            if !names.insert(phalange.name.as_str()) {
                return Err(IcrError::InvalidPhalange {
                    name: phalange.name.clone(),
                    reason: "duplicate name".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Initial target geometry of `phalange` within this hand.
    pub fn target_for<'a>(&'a self, phalange: &'a PhalangeConfig) -> &'a str {
        phalange
            .target_geom
            .as_deref()
            .or(self.target_geom.as_deref())
            .unwrap_or(DEFAULT_TARGET_GEOM)
    }
}

fn default_object_name() -> String {
    "example_object".to_string()
}

fn default_centerpoint_ids() -> Vec<u8> {
    vec![1, 2, 3, 4, 5]
}

/// Parameters of the ICR service test client beyond its command line.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Name the loaded object is registered under.
    #[serde(default = "default_object_name")]
    pub object_name: String,
    /// Object vertices used as ICR center points.
    #[serde(default = "default_centerpoint_ids")]
    pub centerpoint_ids: Vec<u8>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            object_name: default_object_name(),
            centerpoint_ids: default_centerpoint_ids(),
        }
    }
}

impl ClientConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&contents)?;
        if config.object_name.is_empty() {
            return Err(IcrError::Config("empty object_name".to_string()));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HAND: &str = r#"
target_geom = "plate"
publisher_capacity = 4

[[phalange]]
name = "thumb_distal"
frame_id = "thumb_distal_link"
geom = "thumb_distal_collision"
sensor_topic = "thumb_distal_contacts"
origin = [0.0, 0.0, 0.02]
rpy = [0.0, 1.5707963267948966, 0.0]

[[phalange]]
name = "index_distal"
frame_id = "index_distal_link"
geom = "index_distal_collision"
sensor_topic = "index_distal_contacts"
target_geom = "cup"
"#;

    #[test]
    fn test_parse_hand() {
        let config = HandConfig::from_toml_str(HAND).unwrap();
        assert_eq!(config.phalanges.len(), 2);
        assert_eq!(config.publisher_capacity, 4);
        assert_eq!(config.phalanges[0].origin, [0.0, 0.0, 0.02]);
        assert_eq!(config.phalanges[1].rpy, [0.0; 3]);
        assert_eq!(config.target_for(&config.phalanges[0]), "plate");
        assert_eq!(config.target_for(&config.phalanges[1]), "cup");
    }

    #[test]
    fn test_target_defaults() {
        let config = HandConfig {
            phalanges: vec![PhalangeConfig::named("f", "f_geom")],
            ..Default::default()
        };
        assert_eq!(config.target_for(&config.phalanges[0]), DEFAULT_TARGET_GEOM);
        assert_eq!(config.phalanges[0].sensor_topic, "f_contact_sensor_state");
    }

    #[test]
    fn test_reference_from_config() {
        let config = HandConfig::from_toml_str(HAND).unwrap();
        let reference = config.phalanges[0].reference();
        assert!((reference.translation - DVec3::new(0.0, 0.0, 0.02)).length() < 1e-12);
        // pitch of 90 degrees maps Z onto X
        assert!((reference.transform_vector(DVec3::Z) - DVec3::X).length() < 1e-9);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let config = HandConfig {
            phalanges: vec![
                PhalangeConfig::named("f", "a"),
                PhalangeConfig::named("f", "b"),
            ],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(IcrError::InvalidPhalange { reason, .. }) if reason == "duplicate name"
        ));
    }

    #[test]
    fn test_invalid_phalanges_rejected() {
        let mut p = PhalangeConfig::named("f", "");
        assert!(p.validate().is_err());

        p.geom = "g".to_string();
        p.target_geom = Some(String::new());
        assert!(p.validate().is_err());

        p.target_geom = None;
        p.rpy[2] = f64::INFINITY;
        assert!(p.validate().is_err());

        p.rpy[2] = 0.0;
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_empty_hand_rejected() {
        assert!(HandConfig::from_toml_str("").is_err());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        assert!(matches!(
            HandConfig::from_toml_str("[[phalange]]\nname = 3"),
            Err(IcrError::Config(_))
        ));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hand.toml");
        let config = HandConfig::from_toml_str(HAND).unwrap();
        config.save(&path).unwrap();
        assert_eq!(HandConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_client_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.object_name, "example_object");
        assert_eq!(config.centerpoint_ids, vec![1, 2, 3, 4, 5]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.toml");
        fs::write(&path, "centerpoint_ids = [7, 8]\n").unwrap();
        let loaded = ClientConfig::from_file(&path).unwrap();
        assert_eq!(loaded.object_name, "example_object");
        assert_eq!(loaded.centerpoint_ids, vec![7, 8]);
    }
}
