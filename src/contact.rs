//! Contact sensor messages and the topic bus that delivers them.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use glam::DVec3;
use tracing::trace;

/// Message metadata passed through from sensor to published pose.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    /// Sequence number of the message.
    pub seq: u32,
    /// Simulation or wall-clock time the message refers to.
    pub stamp: Duration,
    /// Frame the message contents are expressed in.
    pub frame_id: String,
}

/// Contacts between one pair of collision geometries at one time step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactState {
    /// Geometry reporting the contact.
    pub geom1_name: String,
    /// Geometry being touched.
    pub geom2_name: String,
    /// Contact positions.
    pub contact_positions: Vec<DVec3>,
    /// Contact normals, same frame as the positions.
    pub contact_normals: Vec<DVec3>,
    /// Penetration depth per contact.
    pub depths: Vec<f64>,
}

impl ContactState {
    /// Create a contact record between two geometries.
    pub fn new(geom1_name: impl Into<String>, geom2_name: impl Into<String>) -> Self {
        Self {
            geom1_name: geom1_name.into(),
            geom2_name: geom2_name.into(),
            ..Default::default()
        }
    }

    /// Add one contact with zero penetration.
    pub fn with_contact(mut self, position: DVec3, normal: DVec3) -> Self {
        self.contact_positions.push(position);
        self.contact_normals.push(normal);
        self.depths.push(0.0);
        self
    }

    /// True if this record is `geom1` touching `geom2`, in that order.
    pub fn is_pair(&self, geom1: &str, geom2: &str) -> bool {
        self.geom1_name == geom1 && self.geom2_name == geom2
    }
}

/// All contact records reported by one sensor for one time step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactsState {
    pub header: Header,
    pub states: Vec<ContactState>,
}

impl ContactsState {
    pub fn new(header: Header, states: Vec<ContactState>) -> Self {
        Self { header, states }
    }
}

/// A consumer of contact batches.
///
/// Anything implementing this can be subscribed to a [`ContactBus`] topic.
pub trait ContactSink: Send + Sync {
    fn deliver(&self, batch: &ContactsState);
}

impl<F> ContactSink for F
where
    F: Fn(&ContactsState) + Send + Sync,
{
    fn deliver(&self, batch: &ContactsState) {
        self(batch)
    }
}

/// Topic-keyed fan-out of contact batches to subscribed sinks.
///
/// Delivery is synchronous on the publishing thread, in subscription order.
#[derive(Default)]
pub struct ContactBus {
    topics: HashMap<String, Vec<Arc<dyn ContactSink>>>,
}

impl ContactBus {
    pub fn new() -> Self {
        Self {
            topics: HashMap::new(),
        }
    }

    /// Register `sink` for batches published on `topic`.
    pub fn subscribe(&mut self, topic: impl Into<String>, sink: Arc<dyn ContactSink>) {
        self.topics.entry(topic.into()).or_default().push(sink);
    }

    /// Remove every sink registered on `topic`. Returns how many were removed.
    pub fn unsubscribe_all(&mut self, topic: &str) -> usize {
        self.topics.remove(topic).map_or(0, |sinks| sinks.len())
    }

    /// Deliver `batch` to every sink on `topic`. Returns the number of sinks reached.
    pub fn publish(&self, topic: &str, batch: &ContactsState) -> usize {
        let Some(sinks) = self.topics.get(topic) else {
            trace!("No subscribers on {}, dropping seq {}", topic, batch.header.seq);
            return 0;
        };
        for sink in sinks {
            sink.deliver(batch);
        }
        sinks.len()
    }

    /// Number of sinks registered on `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.get(topic).map_or(0, Vec::len)
    }

    /// Topics with at least one subscriber, sorted.
    pub fn topics(&self) -> Vec<&str> {
        let mut topics: Vec<&str> = self.topics.keys().map(String::as_str).collect();
        topics.sort_unstable();
        topics
    }
}
