//! Best-effort state publishing.
//!
//! Every tick the engine state is sent to a handful of topics. A failed
//! publish is logged and dropped; the next tick simply tries again.

use core::convert::Infallible;

use crate::config::FRAME_BYTES;
use crate::player::PlayerPose;
use crate::render::ArcParams;

pub mod topics {
    pub const ORIENTATION: &str = "vision/orientation";
    pub const LEDS: &str = "vision/leds";
    pub const ARC_LENGTH: &str = "vision/circleArc";
    pub const ARC_ORIENTATION: &str = "vision/circleOrientation";
    pub const ARC_RADIUS: &str = "vision/circleRadius";
    pub const MAZE: &str = "vision/maze";
}

/// A pub/sub sink.
#[allow(async_fn_in_trait)]
pub trait Publish {
    type Error;
    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), Self::Error>;
}

/// Used when no broker link exists; accepts and drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPublisher;

impl Publish for NoopPublisher {
    type Error = Infallible;

    async fn publish(&mut self, _topic: &str, _payload: &[u8]) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// What gets published for one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub ring_index: usize,
    pub frame: [u8; FRAME_BYTES],
    /// Present while the arc timer runs.
    pub arc: Option<ArcParams>,
    /// Present while the maze runs.
    pub pose: Option<PlayerPose>,
}

/// Maze position as two big-endian `i32`s.
pub fn encode_pose(pose: PlayerPose) -> [u8; 8] {
    let mut out = [0u8; 8];
    out[..4].copy_from_slice(&pose.x.to_be_bytes());
    out[4..].copy_from_slice(&pose.y.to_be_bytes());
    out
}

/// Publish a snapshot. Returns how many publishes failed.
pub async fn publish_snapshot<P: Publish>(publisher: &mut P, snapshot: &Snapshot) -> usize {
    let mut failed = 0;
    let mut number = itoa::Buffer::new();

    let orientation = number.format(snapshot.ring_index);
    failed += send(publisher, topics::ORIENTATION, orientation.as_bytes()).await;
    failed += send(publisher, topics::LEDS, &snapshot.frame).await;

    if let Some(arc) = snapshot.arc {
        let length = number.format(arc.length);
        failed += send(publisher, topics::ARC_LENGTH, length.as_bytes()).await;
        let orientation = number.format(arc.orientation);
        failed += send(publisher, topics::ARC_ORIENTATION, orientation.as_bytes()).await;
        failed += send(publisher, topics::ARC_RADIUS, &arc.radius.to_be_bytes()).await;
    }

    if let Some(pose) = snapshot.pose {
        failed += send(publisher, topics::MAZE, &encode_pose(pose)).await;
    }

    failed
}

async fn send<P: Publish>(publisher: &mut P, topic: &str, payload: &[u8]) -> usize {
    match publisher.publish(topic, payload).await {
        Ok(()) => 0,
        Err(_) => {
            warn!("publish to {=str} failed", topic);
            1
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use embassy_futures::block_on;

    /// Records every publish; fails topics listed in `reject`.
    #[derive(Default)]
    pub struct Recorder {
        pub sent: Vec<(String, Vec<u8>)>,
        pub reject: Vec<&'static str>,
    }

    impl Recorder {
        pub fn payload(&self, topic: &str) -> Option<&[u8]> {
            self.sent
                .iter()
                .rev()
                .find(|(t, _)| t == topic)
                .map(|(_, p)| p.as_slice())
        }
    }

    impl Publish for Recorder {
        type Error = ();

        async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), ()> {
            if self.reject.iter().any(|t| *t == topic) {
                return Err(());
            }
            self.sent.push((topic.to_string(), payload.to_vec()));
            Ok(())
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            ring_index: 42,
            frame: [7; FRAME_BYTES],
            arc: None,
            pose: None,
        }
    }

    #[test]
    fn test_compass_snapshot() {
        let mut recorder = Recorder::default();
        assert_eq!(block_on(publish_snapshot(&mut recorder, &snapshot())), 0);
        assert_eq!(recorder.sent.len(), 2);
        assert_eq!(recorder.payload(topics::ORIENTATION), Some(&b"42"[..]));
        assert_eq!(recorder.payload(topics::LEDS), Some(&[7u8; FRAME_BYTES][..]));
    }

    #[test]
    fn test_arc_and_maze_payloads() {
        let mut recorder = Recorder::default();
        let mut snap = snapshot();
        snap.arc = Some(ArcParams {
            length: 12,
            orientation: 5,
            radius: 260,
        });
        snap.pose = Some(PlayerPose::new(450, 9_599));
        block_on(publish_snapshot(&mut recorder, &snap));

        assert_eq!(recorder.payload(topics::ARC_LENGTH), Some(&b"12"[..]));
        assert_eq!(recorder.payload(topics::ARC_ORIENTATION), Some(&b"5"[..]));
        assert_eq!(recorder.payload(topics::ARC_RADIUS), Some(&[0, 0, 1, 4][..]));
        assert_eq!(
            recorder.payload(topics::MAZE),
            Some(&[0, 0, 0x01, 0xC2, 0, 0, 0x25, 0x7F][..])
        );
    }

    #[test]
    fn test_failures_are_counted_not_fatal() {
        let mut recorder = Recorder {
            reject: vec![topics::ORIENTATION],
            ..Default::default()
        };
        assert_eq!(block_on(publish_snapshot(&mut recorder, &snapshot())), 1);
        assert!(recorder.payload(topics::LEDS).is_some());
    }

    #[test]
    fn test_noop_publisher() {
        let mut publisher = NoopPublisher;
        assert_eq!(block_on(publish_snapshot(&mut publisher, &snapshot())), 0);
    }
}
