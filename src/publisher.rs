//! Outbound contact pose notification.

use crossbeam_channel::{Receiver, Sender, TrySendError};
use tracing::debug;

use crate::pose::ContactPoseStamped;

/// Receives every contact pose a phalange publishes.
///
/// Implementations must not block: they are called with the phalange lock held.
pub trait PosePublisher: Send + Sync {
    fn publish(&self, pose: &ContactPoseStamped);
}

/// Publishes into a bounded channel, dropping notifications the consumer has no room for.
#[derive(Debug, Clone)]
pub struct ChannelPublisher {
    sender: Sender<ContactPoseStamped>,
}

impl ChannelPublisher {
    pub fn new(sender: Sender<ContactPoseStamped>) -> Self {
        Self { sender }
    }

    /// Create a publisher and the receiving end of a channel holding `capacity` poses.
    pub fn bounded(capacity: usize) -> (Self, Receiver<ContactPoseStamped>) {
        let (sender, receiver) = crossbeam_channel::bounded(capacity);
        (Self { sender }, receiver)
    }
}

impl PosePublisher for ChannelPublisher {
    fn publish(&self, pose: &ContactPoseStamped) {
        match self.sender.try_send(pose.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(dropped)) => {
                debug!(
                    "Pose channel full, dropping seq {} ({})",
                    dropped.header.seq, dropped.header.frame_id
                );
            }
            Err(TrySendError::Disconnected(dropped)) => {
                debug!(
                    "Pose consumer gone, dropping seq {} ({})",
                    dropped.header.seq, dropped.header.frame_id
                );
            }
        }
    }
}

/// Discards every pose.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPublisher;

impl PosePublisher for NullPublisher {
    fn publish(&self, _pose: &ContactPoseStamped) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::Header;
    use crate::pose::ContactPose;

    fn stamped(seq: u32) -> ContactPoseStamped {
        ContactPoseStamped {
            header: Header {
                seq,
                frame_id: "link".to_string(),
                ..Default::default()
            },
            pose: ContactPose::default(),
        }
    }

    #[test]
    fn test_channel_publisher_delivers() {
        let (publisher, rx) = ChannelPublisher::bounded(4);
        publisher.publish(&stamped(1));
        publisher.publish(&stamped(2));
        assert_eq!(rx.try_recv().map(|p| p.header.seq), Ok(1));
        assert_eq!(rx.try_recv().map(|p| p.header.seq), Ok(2));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_publisher_drops_when_full() {
        let (publisher, rx) = ChannelPublisher::bounded(1);
        publisher.publish(&stamped(1));
        publisher.publish(&stamped(2));
        assert_eq!(rx.len(), 1);
        assert_eq!(rx.try_recv().map(|p| p.header.seq), Ok(1));
    }

    #[test]
    fn test_channel_publisher_survives_dropped_receiver() {
        let (publisher, rx) = ChannelPublisher::bounded(1);
        drop(rx);
        publisher.publish(&stamped(1));
    }
}
